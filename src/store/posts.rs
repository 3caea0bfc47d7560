use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::store::models::{ImageUpload, Post, PostDraft};
use crate::store::{slug, StoreError};

/// Teaser and read-time derivation constants, matching the editor's
/// documented behavior.
const TEASER_CHARS: usize = 200;
const WORDS_PER_MINUTE: usize = 200;

/// Post collection backed by a single JSON file. Mutations reload the full
/// collection, apply the change, and rewrite the file through a temp-file
/// rename; a process-wide mutex serializes the read-modify-write cycle.
/// Reads take no lock.
#[derive(Clone)]
pub struct PostStore {
    posts_path: PathBuf,
    uploads_dir: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl PostStore {
    pub fn new(posts_path: PathBuf, uploads_dir: PathBuf) -> Self {
        Self {
            posts_path,
            uploads_dir,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Every post, in file order. Callers sort.
    pub fn list_all(&self) -> Result<Vec<Post>, StoreError> {
        self.load()
    }

    pub fn find_by_slug(&self, slug: &str) -> Result<Post, StoreError> {
        self.load()?
            .into_iter()
            .find(|p| p.slug == slug)
            .ok_or(StoreError::NotFound)
    }

    /// Create a post from a draft. Assigns a unique slug, derives teaser and
    /// read time, stamps created == updated, stores the uploaded image (if
    /// any) under the post's slug, and persists the collection.
    pub async fn create(&self, draft: &PostDraft, author: &str) -> Result<Post, StoreError> {
        validate(draft)?;

        let _guard = self.write_lock.lock().await;
        let mut posts = self.load()?;

        let existing: HashSet<String> = posts.iter().map(|p| p.slug.clone()).collect();
        let slug = slug::allocate(&draft.title, &existing);

        let image = match &draft.image {
            Some(upload) => self.store_image(&slug, upload)?,
            None => String::new(),
        };

        let now = Utc::now();
        let post = Post {
            title: draft.title.clone(),
            slug,
            tags: draft.tags.clone(),
            teaser: make_teaser(&draft.body, &draft.teaser),
            body: draft.body.clone(),
            image,
            youtube_url: draft.youtube_url.clone(),
            github_url: draft.github_url.clone(),
            huggingface_url: draft.huggingface_url.clone(),
            twitter_url: draft.twitter_url.clone(),
            arxiv_url: draft.arxiv_url.clone(),
            author: author.to_string(),
            created: now,
            updated: now,
            read_time: read_time(&draft.body),
        };

        posts.push(post.clone());
        self.save(&posts)?;
        Ok(post)
    }

    /// Update the post with the given slug. Slug, created timestamp, and
    /// author are preserved; the image is only replaced when the draft
    /// carries a new upload.
    pub async fn update(&self, slug: &str, draft: &PostDraft) -> Result<Post, StoreError> {
        validate(draft)?;

        let _guard = self.write_lock.lock().await;
        let mut posts = self.load()?;

        let post = posts
            .iter_mut()
            .find(|p| p.slug == slug)
            .ok_or(StoreError::NotFound)?;

        post.title = draft.title.clone();
        post.tags = draft.tags.clone();
        post.teaser = make_teaser(&draft.body, &draft.teaser);
        post.body = draft.body.clone();
        post.youtube_url = draft.youtube_url.clone();
        post.github_url = draft.github_url.clone();
        post.huggingface_url = draft.huggingface_url.clone();
        post.twitter_url = draft.twitter_url.clone();
        post.arxiv_url = draft.arxiv_url.clone();
        post.updated = Utc::now();
        post.read_time = read_time(&draft.body);

        if let Some(upload) = &draft.image {
            let filename = self.store_image(slug, upload)?;
            post.image = filename;
        }

        let updated = post.clone();
        self.save(&posts)?;
        Ok(updated)
    }

    /// Remove the post with the given slug along with its image file.
    /// Unknown slugs are a success no-op.
    pub async fn delete(&self, slug: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut posts = self.load()?;

        let Some(idx) = posts.iter().position(|p| p.slug == slug) else {
            return Ok(());
        };

        let post = posts.remove(idx);
        if !post.image.is_empty() {
            let image_path = self.uploads_dir.join(&post.image);
            if image_path.exists() {
                fs::remove_file(image_path)?;
            }
        }

        self.save(&posts)
    }

    fn load(&self) -> Result<Vec<Post>, StoreError> {
        if !self.posts_path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.posts_path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, posts: &[Post]) -> Result<(), StoreError> {
        if let Some(parent) = self.posts_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(posts)?;
        // Rename-after-write so a crash cannot leave a half-written file
        let tmp = self.posts_path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.posts_path)?;
        Ok(())
    }

    /// Write an uploaded image as `<slug><original extension or .jpg>` and
    /// return the stored filename.
    fn store_image(&self, slug: &str, upload: &ImageUpload) -> Result<String, StoreError> {
        let ext = Path::new(&upload.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_else(|| ".jpg".to_string());
        let filename = format!("{slug}{ext}");

        fs::create_dir_all(&self.uploads_dir)?;
        fs::write(self.uploads_dir.join(&filename), &upload.data)?;
        Ok(filename)
    }
}

fn validate(draft: &PostDraft) -> Result<(), StoreError> {
    if draft.title.trim().is_empty() || draft.body.trim().is_empty() {
        return Err(StoreError::Validation(
            "Title and body are required.".to_string(),
        ));
    }
    Ok(())
}

/// The author's teaser when supplied, otherwise the first 200 characters of
/// the body with an ellipsis when truncated.
fn make_teaser(body: &str, teaser: &str) -> String {
    let teaser = teaser.trim();
    if !teaser.is_empty() {
        return teaser.to_string();
    }
    let mut out: String = body.chars().take(TEASER_CHARS).collect();
    if body.chars().count() > TEASER_CHARS {
        out.push_str("...");
    }
    out
}

/// Estimated reading time in minutes, never below one.
pub fn read_time(body: &str) -> u32 {
    let words = body.split_whitespace().count();
    ((words as f64 / WORDS_PER_MINUTE as f64).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (PostStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = PostStore::new(
            temp_dir.path().join("data/posts.json"),
            temp_dir.path().join("uploads"),
        );
        (store, temp_dir)
    }

    fn draft(title: &str, body: &str) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            body: body.to_string(),
            tags: vec!["Engineering".to_string()],
            ..PostDraft::default()
        }
    }

    #[tokio::test]
    async fn create_then_find_round_trips() {
        let (store, _temp) = create_test_store();

        let created = store
            .create(&draft("Hello, World! 2024", "Some body text"), "Ada")
            .await
            .unwrap();
        assert_eq!(created.slug, "hello-world-2024");
        assert_eq!(created.created, created.updated);

        let found = store.find_by_slug("hello-world-2024").unwrap();
        assert_eq!(found.title, "Hello, World! 2024");
        assert_eq!(found.body, "Some body text");
        assert_eq!(found.tags, vec!["Engineering".to_string()]);
        assert_eq!(found.author, "Ada");
    }

    #[tokio::test]
    async fn create_rejects_empty_title_and_body() {
        let (store, _temp) = create_test_store();

        let err = store.create(&draft("", "body"), "Ada").await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let err = store
            .create(&draft("title", "   "), "Ada")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        // nothing persisted
        assert!(store.list_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_titles_get_distinct_slugs() {
        let (store, _temp) = create_test_store();

        let first = store
            .create(&draft("Same Title", "body one"), "Ada")
            .await
            .unwrap();
        let second = store
            .create(&draft("Same Title", "body two"), "Ada")
            .await
            .unwrap();

        assert_eq!(first.slug, "same-title");
        assert!(second.slug.starts_with("same-title-"));
        assert_eq!(second.slug.len(), "same-title-".len() + 6);
        assert_ne!(first.slug, second.slug);
    }

    #[tokio::test]
    async fn teaser_is_derived_from_body_when_absent() {
        let (store, _temp) = create_test_store();

        let long_body = "x".repeat(450);
        let post = store
            .create(&draft("Long One", &long_body), "Ada")
            .await
            .unwrap();
        assert_eq!(post.teaser.chars().count(), 203);
        assert!(post.teaser.ends_with("..."));

        let short = store
            .create(&draft("Short One", "short body"), "Ada")
            .await
            .unwrap();
        assert_eq!(short.teaser, "short body");
    }

    #[tokio::test]
    async fn supplied_teaser_wins_over_derived_one() {
        let (store, _temp) = create_test_store();

        let mut d = draft("Teased", &"word ".repeat(100));
        d.teaser = "  A hand-written teaser.  ".to_string();
        let post = store.create(&d, "Ada").await.unwrap();
        assert_eq!(post.teaser, "A hand-written teaser.");
    }

    #[tokio::test]
    async fn update_preserves_slug_created_and_author() {
        let (store, _temp) = create_test_store();

        let created = store
            .create(&draft("Original Title", "original body"), "Ada")
            .await
            .unwrap();

        let updated = store
            .update(&created.slug, &draft("New Title", "new body"))
            .await
            .unwrap();

        assert_eq!(updated.slug, created.slug);
        assert_eq!(updated.created, created.created);
        assert_eq!(updated.author, "Ada");
        assert_eq!(updated.title, "New Title");
        assert!(updated.updated >= created.updated);

        let found = store.find_by_slug(&created.slug).unwrap();
        assert_eq!(found.title, "New Title");
        assert_eq!(found.body, "new body");
    }

    #[tokio::test]
    async fn update_unknown_slug_is_not_found() {
        let (store, _temp) = create_test_store();
        let err = store
            .update("missing", &draft("t", "b"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn delete_removes_post_and_image() {
        let (store, temp) = create_test_store();

        let mut d = draft("With Image", "body");
        d.image = Some(ImageUpload {
            filename: "hero.png".to_string(),
            data: vec![1, 2, 3],
        });
        let post = store.create(&d, "Ada").await.unwrap();
        assert_eq!(post.image, "with-image.png");

        let image_path = temp.path().join("uploads/with-image.png");
        assert!(image_path.exists());

        store.delete(&post.slug).await.unwrap();
        assert!(!image_path.exists());
        assert!(matches!(
            store.find_by_slug(&post.slug),
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn delete_unknown_slug_is_a_noop() {
        let (store, _temp) = create_test_store();

        store.create(&draft("Keeper", "body"), "Ada").await.unwrap();
        store.delete("does-not-exist").await.unwrap();

        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn image_upload_without_extension_defaults_to_jpg() {
        let (store, _temp) = create_test_store();

        let mut d = draft("No Extension", "body");
        d.image = Some(ImageUpload {
            filename: "hero".to_string(),
            data: vec![0xff],
        });
        let post = store.create(&d, "Ada").await.unwrap();
        assert_eq!(post.image, "no-extension.jpg");
    }

    #[tokio::test]
    async fn update_without_upload_keeps_existing_image() {
        let (store, _temp) = create_test_store();

        let mut d = draft("Pictured", "body");
        d.image = Some(ImageUpload {
            filename: "hero.jpg".to_string(),
            data: vec![0xff],
        });
        let post = store.create(&d, "Ada").await.unwrap();

        let updated = store
            .update(&post.slug, &draft("Pictured", "new body"))
            .await
            .unwrap();
        assert_eq!(updated.image, "pictured.jpg");
    }

    #[tokio::test]
    async fn posts_file_is_human_readable_json() {
        let (store, temp) = create_test_store();

        store.create(&draft("Pretty", "body"), "Ada").await.unwrap();

        let raw = fs::read_to_string(temp.path().join("data/posts.json")).unwrap();
        // pretty-printed array, one field per line
        assert!(raw.starts_with("[\n"));
        assert!(raw.contains("\"slug\": \"pretty\""));
    }

    #[test]
    fn read_time_rounds_and_floors_at_one() {
        assert_eq!(read_time(""), 1);
        assert_eq!(read_time("one two three"), 1);
        assert_eq!(read_time(&"word ".repeat(200)), 1);
        assert_eq!(read_time(&"word ".repeat(350)), 2);
        assert_eq!(read_time(&"word ".repeat(800)), 4);
    }
}
