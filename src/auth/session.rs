use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Server-side session state: an opaque token mapped to a username and an
/// expiry. Nothing else is carried.
#[derive(Debug, Clone)]
struct Session {
    username: String,
    expires_at: DateTime<Utc>,
}

/// In-memory session table. Sessions are created on login, removed on
/// logout, and dropped lazily once expired. Restarting the process logs
/// everyone out, which is fine for a single-operator blog.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<String, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for a user. Returns the session token.
    pub fn create(&mut self, username: &str, hours: u64) -> String {
        let token = generate_token();
        self.sessions.insert(
            token.clone(),
            Session {
                username: username.to_string(),
                expires_at: Utc::now() + Duration::hours(hours as i64),
            },
        );
        token
    }

    /// Resolve a token to its username. Expired sessions are removed and
    /// resolve to nothing.
    pub fn resolve(&mut self, token: &str) -> Option<String> {
        let session = self.sessions.get(token)?;
        if session.expires_at > Utc::now() {
            return Some(session.username.clone());
        }
        self.sessions.remove(token);
        None
    }

    /// Invalidate a session by token. Unknown tokens are ignored.
    pub fn destroy(&mut self, token: &str) {
        self.sessions.remove(token);
    }
}

/// Generate a cryptographically random 32-byte hex token.
fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    hex::encode(bytes)
}
