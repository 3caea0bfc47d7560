use std::fs;
use std::path::PathBuf;

use crate::store::models::User;
use crate::store::StoreError;

/// Read-only accessor over users.json. Accounts are created by the seed
/// binary, not at runtime.
#[derive(Clone)]
pub struct CredentialStore {
    users_path: PathBuf,
}

impl CredentialStore {
    pub fn new(users_path: PathBuf) -> Self {
        Self { users_path }
    }

    pub fn load_all(&self) -> Result<Vec<User>, StoreError> {
        if !self.users_path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.users_path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .load_all()?
            .into_iter()
            .find(|u| u.username == username))
    }
}
