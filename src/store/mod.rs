// File-backed content stores. posts.json and users.json are the durable
// source of truth; every mutation reloads and rewrites the whole file.
pub mod models;
pub mod posts;
pub mod slug;
pub mod users;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("Not found")]
    NotFound,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
