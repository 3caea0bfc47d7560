//! Offline seeder: writes a demo admin user and sample posts, and renders a
//! gradient hero image for each post. Run before first start:
//!
//!     cargo run --bin seed -- --data-dir ~/.limelight

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::Parser;
use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

use limelight::auth::password;
use limelight::config::{Cli, Config};
use limelight::store::models::{Post, User};
use limelight::store::posts::read_time;
use limelight::store::slug::slugify;

const ADMIN_USERNAME: &str = "editor";
const ADMIN_DISPLAY_NAME: &str = "The Editor";
const ADMIN_PASSWORD: &str = "limelight-demo";

struct Sample {
    title: &'static str,
    tags: &'static [&'static str],
    teaser: &'static str,
    body: &'static str,
}

const SAMPLES: &[Sample] = &[
    Sample {
        title: "Why This Blog Runs on Flat Files",
        tags: &["Engineering", "Opinion"],
        teaser: "No database, no migrations, no connection pool. Two JSON files and a directory of images are plenty for a single-author blog.",
        body: "Every few months someone asks why this site does not run on Postgres, and every few months the answer gets shorter: because it does not need to.\n\nThe whole corpus is a few hundred posts. The write rate is one author on a good week. A pair of JSON files covers that with room to spare, and the operational story is unbeatable: backup is cp, inspection is less, and a catastrophic migration is impossible because there are no migrations.\n\nFlat files stop being cute somewhere around the point where two writers race each other, or where you want a query planner. If this blog ever grows an editorial team, it will grow a database the same week. Until then the simplest storage engine is the filesystem you already trust with everything else.",
    },
    Sample {
        title: "Self-Hosting on a Shelf: the Hardware Tour",
        tags: &["How-tos", "Engineering"],
        teaser: "The entire production environment is a fanless mini PC on a bookshelf, and deployments are one rsync away.",
        body: "Production for this site is a fanless mini PC wedged between two paperbacks. It draws about six watts, makes no noise, and has survived three house moves.\n\nThe deploy pipeline is deliberately boring. Build a release binary, rsync it over, restart the service. There is no container registry, no orchestrator, and no YAML beyond one systemd unit. When something breaks, journalctl tells me what happened and a reboot takes eleven seconds.\n\nIf you have never self-hosted anything, a blog is the perfect first tenant. The blast radius of an outage is your own vanity, and everything you learn about DNS, TLS, and backups transfers directly to things that matter more.",
    },
    Sample {
        title: "Tag Filters Have Landed",
        tags: &["Updates"],
        teaser: "The front page can now be narrowed to a single tag, and the tag rail is built from whatever tags posts actually carry.",
        body: "Small quality-of-life release this week: the front page grew a tag rail. Click a tag and the grid narrows to matching posts; click All and you are back to everything.\n\nThere is no tag registry to maintain. The rail is computed from the union of tags on published posts, so a tag exists exactly as long as something carries it. Typos die with the post that introduced them, which is the only tag moderation policy I have ever seen actually work.\n\nNext on the list is a proper feed. If you have opinions about full-text versus teaser-only RSS, now is the time to send them.",
    },
    Sample {
        title: "A Love Letter to Plain Text",
        tags: &["Opinion"],
        teaser: "Every clever format I have adopted in twenty years is gone. The plain text survived all of them.",
        body: "I have lost work to a discontinued wiki, an abandoned note-taking startup, and one very expensive proprietary outliner. I have never lost a line of plain text.\n\nPlain text is not a format so much as a treaty. Every editor honors it, every version control system diffs it, every operating system searches it. It compresses well, greps instantly, and degrades never. The file I wrote on a 2004 laptop opens today without ceremony, which is more than I can say for anything else I touched that year.\n\nSo the posts here are written as text, stored as text, and served with as little transformation as I can get away with. Ask me about my feelings on WYSIWYG editors some other day.",
    },
    Sample {
        title: "The Road Ahead for Limelight",
        tags: &["News", "Updates"],
        teaser: "A feed, draft posts, and image resizing are on the list. A comment section is not.",
        body: "A short roadmap post, mostly so future me can grade past me.\n\nComing soon: an Atom feed, because several of you read exclusively through feed readers and I respect that lifestyle. Draft posts, so half-written ideas stop living in a separate text file. And server-side image resizing, because shipping a 4000-pixel photo to a phone is rude.\n\nNot coming: comments. Every comment system I have run converged to a part-time moderation job with a spam hobby. The reply button on your own blog remains undefeated.",
    },
];

#[derive(Parser, Debug)]
#[command(name = "seed", about = "Seed demo users, posts, and hero images")]
struct SeedCli {
    /// Path to data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let seed_cli = SeedCli::parse();
    let cli = Cli {
        config: None,
        host: None,
        port: None,
        data_dir: seed_cli.data_dir,
    };
    let config = Config::load(&cli)?;

    std::fs::create_dir_all(config.data_path())?;
    std::fs::create_dir_all(config.uploads_path())?;

    // Admin user
    let (hash, salt) = password::hash_new_password(ADMIN_PASSWORD);
    let users = vec![User {
        username: ADMIN_USERNAME.to_string(),
        display_name: ADMIN_DISPLAY_NAME.to_string(),
        password_hash: hash,
        salt,
    }];
    std::fs::write(
        config.users_path(),
        serde_json::to_string_pretty(&users)?,
    )
    .context("writing users.json")?;
    println!("Created admin user ({ADMIN_USERNAME} / {ADMIN_PASSWORD})");

    // Sample posts, back-dated one day apart so the front page has an order
    let now = Utc::now();
    let mut posts = Vec::with_capacity(SAMPLES.len());
    for (i, sample) in SAMPLES.iter().enumerate() {
        let slug = slugify(sample.title);
        let image_filename = format!("{slug}.jpg");
        let created = now - Duration::days((SAMPLES.len() - i) as i64);

        generate_hero(&config.uploads_path().join(&image_filename), i)
            .with_context(|| format!("rendering hero image for {slug}"))?;

        posts.push(Post {
            title: sample.title.to_string(),
            slug,
            tags: sample.tags.iter().map(|t| t.to_string()).collect(),
            teaser: sample.teaser.to_string(),
            body: sample.body.to_string(),
            image: image_filename,
            youtube_url: String::new(),
            github_url: String::new(),
            huggingface_url: String::new(),
            twitter_url: String::new(),
            arxiv_url: String::new(),
            author: ADMIN_DISPLAY_NAME.to_string(),
            created,
            updated: created,
            read_time: read_time(sample.body),
        });
        println!("  Created post: {}", sample.title);
    }

    std::fs::write(
        config.posts_path(),
        serde_json::to_string_pretty(&posts)?,
    )
    .context("writing posts.json")?;

    println!("\nGenerated {} posts with hero images.", posts.len());
    println!("Data saved to {}", config.data_path().display());
    println!("Images saved to {}", config.uploads_path().display());
    println!("\nStart the app with: cargo run -- --port 8001");

    Ok(())
}

/// Color palettes for the gradient backgrounds.
const PALETTES: &[([u8; 3], [u8; 3])] = &[
    ([44, 62, 80], [52, 152, 219]),   // dark blue -> light blue
    ([142, 68, 173], [41, 128, 185]), // purple -> blue
    ([39, 174, 96], [22, 160, 133]),  // green -> teal
    ([211, 84, 0], [243, 156, 18]),   // orange -> yellow
    ([192, 57, 43], [231, 76, 60]),   // dark red -> light red
    ([44, 62, 80], [197, 230, 54]),   // dark -> lime green
];

fn lerp(c1: [u8; 3], c2: [u8; 3], t: f32) -> [u8; 3] {
    let mut out = [0u8; 3];
    for i in 0..3 {
        out[i] = (c1[i] as f32 + (c2[i] as f32 - c1[i] as f32) * t) as u8;
    }
    out
}

/// Render an 800x500 vertical gradient with a few decorative circles.
/// Deterministic per palette index.
fn generate_hero(path: &Path, palette_idx: usize) -> Result<()> {
    const WIDTH: u32 = 800;
    const HEIGHT: u32 = 500;

    let (c1, c2) = PALETTES[palette_idx % PALETTES.len()];

    let mut img = RgbImage::new(WIDTH, HEIGHT);
    for y in 0..HEIGHT {
        let color = Rgb(lerp(c1, c2, y as f32 / HEIGHT as f32));
        for x in 0..WIDTH {
            img.put_pixel(x, y, color);
        }
    }

    let mid = lerp(c1, c2, 0.5);
    let fill = Rgb([
        mid[0].saturating_add(30),
        mid[1].saturating_add(30),
        mid[2].saturating_add(30),
    ]);

    let mut rng = StdRng::seed_from_u64(palette_idx as u64);
    for _ in 0..5 {
        let cx = rng.gen_range(0..WIDTH as i64);
        let cy = rng.gen_range(0..HEIGHT as i64);
        let r = rng.gen_range(30..=120i64);
        for y in (cy - r).max(0)..(cy + r).min(HEIGHT as i64) {
            for x in (cx - r).max(0)..(cx + r).min(WIDTH as i64) {
                let dx = x - cx;
                let dy = y - cy;
                if dx * dx + dy * dy <= r * r {
                    img.put_pixel(x as u32, y as u32, fill);
                }
            }
        }
    }

    let mut out = File::create(path)?;
    let mut encoder = JpegEncoder::new_with_quality(&mut out, 85);
    encoder.encode(img.as_raw(), WIDTH, HEIGHT, ExtendedColorType::Rgb8)?;
    Ok(())
}
