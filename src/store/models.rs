use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub teaser: String,
    pub body: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub youtube_url: String,
    #[serde(default)]
    pub github_url: String,
    #[serde(default)]
    pub huggingface_url: String,
    #[serde(default)]
    pub twitter_url: String,
    #[serde(default)]
    pub arxiv_url: String,
    pub author: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub read_time: u32,
}

impl Post {
    /// Thumbnail URL for the post's YouTube link, when a video id can be
    /// extracted from it.
    pub fn youtube_thumb(&self) -> Option<String> {
        let url = self.youtube_url.as_str();
        let rest = ["v=", "youtu.be/", "/embed/", "/shorts/"]
            .iter()
            .find_map(|marker| url.split_once(marker).map(|(_, rest)| rest))?;
        let id: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .take(11)
            .collect();
        if id.len() == 11 {
            Some(format!("https://img.youtube.com/vi/{id}/hqdefault.jpg"))
        } else {
            None
        }
    }
}

/// Editor input for create and update. Built from the submitted form; the
/// store derives everything else (slug, teaser, timestamps, read time).
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    pub tags: Vec<String>,
    pub teaser: String,
    pub body: String,
    pub youtube_url: String,
    pub github_url: String,
    pub huggingface_url: String,
    pub twitter_url: String,
    pub arxiv_url: String,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub display_name: String,
    /// Hex-encoded PBKDF2 digest. The on-disk key is `password` but no
    /// plaintext is ever stored.
    #[serde(rename = "password")]
    pub password_hash: String,
    pub salt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_with_youtube(url: &str) -> Post {
        Post {
            title: "t".into(),
            slug: "t".into(),
            tags: vec![],
            teaser: String::new(),
            body: "b".into(),
            image: String::new(),
            youtube_url: url.into(),
            github_url: String::new(),
            huggingface_url: String::new(),
            twitter_url: String::new(),
            arxiv_url: String::new(),
            author: "a".into(),
            created: Utc::now(),
            updated: Utc::now(),
            read_time: 1,
        }
    }

    #[test]
    fn youtube_thumb_from_watch_url() {
        let post = post_with_youtube("https://www.youtube.com/watch?v=dQw4w9WgXcQ");
        assert_eq!(
            post.youtube_thumb().as_deref(),
            Some("https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg")
        );
    }

    #[test]
    fn youtube_thumb_from_short_url() {
        let post = post_with_youtube("https://youtu.be/dQw4w9WgXcQ");
        assert!(post.youtube_thumb().is_some());
    }

    #[test]
    fn youtube_thumb_absent_for_empty_url() {
        let post = post_with_youtube("");
        assert_eq!(post.youtube_thumb(), None);
    }

    #[test]
    fn youtube_thumb_rejects_short_ids() {
        let post = post_with_youtube("https://www.youtube.com/watch?v=abc");
        assert_eq!(post.youtube_thumb(), None);
    }

    #[test]
    fn user_serializes_hash_under_password_key() {
        let user = User {
            username: "ada".into(),
            display_name: "Ada".into(),
            password_hash: "deadbeef".into(),
            salt: "cafe".into(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"password\":\"deadbeef\""));
        assert!(!json.contains("password_hash"));
    }
}
