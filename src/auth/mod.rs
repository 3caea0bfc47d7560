pub mod handlers;
pub mod password;
pub mod session;

use thiserror::Error;

use crate::store::users::CredentialStore;
use crate::store::StoreError;
use session::SessionStore;

#[derive(Debug, Error)]
pub enum AuthError {
    /// One message for unknown user and wrong password; callers must not be
    /// able to tell the two apart.
    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Check a username/password pair against the credential store and issue a
/// session on success. Returns the session token.
pub fn login(
    users: &CredentialStore,
    sessions: &mut SessionStore,
    username: &str,
    password: &str,
    session_hours: u64,
) -> Result<String, AuthError> {
    let user = users
        .find_by_username(username)?
        .ok_or(AuthError::InvalidCredentials)?;

    if !password::verify_password(password, &user.password_hash, &user.salt) {
        return Err(AuthError::InvalidCredentials);
    }

    Ok(sessions.create(&user.username, session_hours))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn seeded_store(username: &str, password: &str) -> (CredentialStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let (hash, salt) = password::hash_new_password(password);
        let json = serde_json::json!([{
            "username": username,
            "display_name": "Test User",
            "password": hash,
            "salt": salt,
        }]);
        let path = temp_dir.path().join("users.json");
        std::fs::write(&path, serde_json::to_string_pretty(&json).unwrap()).unwrap();
        (CredentialStore::new(path), temp_dir)
    }

    #[test]
    fn login_with_correct_password_issues_session() {
        let (users, _temp) = seeded_store("ada", "s3cret");
        let mut sessions = SessionStore::new();

        let token = login(&users, &mut sessions, "ada", "s3cret", 1).unwrap();
        assert_eq!(sessions.resolve(&token).as_deref(), Some("ada"));
    }

    #[test]
    fn login_with_wrong_password_fails_without_session() {
        let (users, _temp) = seeded_store("ada", "s3cret");
        let mut sessions = SessionStore::new();

        let err = login(&users, &mut sessions, "ada", "wrong", 1).unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[test]
    fn login_with_unknown_user_fails_with_same_message() {
        let (users, _temp) = seeded_store("ada", "s3cret");
        let mut sessions = SessionStore::new();

        let unknown = login(&users, &mut sessions, "nobody", "s3cret", 1).unwrap_err();
        let wrong = login(&users, &mut sessions, "ada", "wrong", 1).unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
    }
}
