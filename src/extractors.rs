use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap};

use crate::error::AppError;
use crate::state::AppState;

/// Represents the currently authenticated user.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub username: String,
    pub display_name: String,
}

/// Extractor that requires authentication. Resolves the session cookie
/// against the session table and the credential store; rejects (redirect to
/// login) when either lookup fails.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = cookie_value(&parts.headers, &state.config.auth.cookie_name)
            .ok_or(AppError::Unauthorized)?;

        let username = state
            .sessions
            .lock()
            .await
            .resolve(token)
            .ok_or(AppError::Unauthorized)?;

        // The session may outlive the user record; treat that as logged out
        let user = state
            .users
            .find_by_username(&username)?
            .ok_or(AppError::Unauthorized)?;

        Ok(CurrentUser {
            username: user.username,
            display_name: user.display_name,
        })
    }
}

/// Optional user extractor: returns None instead of rejecting when not
/// authenticated.
pub struct MaybeUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match CurrentUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(MaybeUser(Some(user))),
            Err(_) => Ok(MaybeUser(None)),
        }
    }
}

/// Pull a named cookie's value out of the Cookie headers.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|s| s.split(';'))
        .map(|s| s.trim())
        .find_map(|cookie| {
            let mut split = cookie.splitn(2, '=');
            let key = split.next()?.trim();
            let val = split.next()?.trim();
            if key == name {
                Some(val)
            } else {
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn finds_cookie_among_several() {
        let headers = headers_with_cookie("a=1; limelight_session=tok123; b=2");
        assert_eq!(cookie_value(&headers, "limelight_session"), Some("tok123"));
    }

    #[test]
    fn missing_cookie_is_none() {
        let headers = headers_with_cookie("a=1; b=2");
        assert_eq!(cookie_value(&headers, "limelight_session"), None);
    }

    #[test]
    fn cookie_value_may_contain_equals() {
        let headers = headers_with_cookie("limelight_session=abc=def");
        assert_eq!(cookie_value(&headers, "limelight_session"), Some("abc=def"));
    }
}
