use std::sync::Arc;

use tokio::sync::Mutex;

use crate::auth::session::SessionStore;
use crate::config::Config;
use crate::store::posts::PostStore;
use crate::store::users::CredentialStore;

#[derive(Clone)]
pub struct AppState {
    pub posts: PostStore,
    pub users: CredentialStore,
    pub sessions: Arc<Mutex<SessionStore>>,
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            posts: PostStore::new(config.posts_path(), config.uploads_path().clone()),
            users: CredentialStore::new(config.users_path()),
            sessions: Arc::new(Mutex::new(SessionStore::new())),
            config,
        }
    }
}
