use askama::Template;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{AppendHeaders, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::auth::{self, AuthError};
use crate::error::AppResult;
use crate::extractors::{cookie_value, MaybeUser};
use crate::routes::home::Html;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "pages/login.html")]
pub struct LoginTemplate {
    pub user: Option<String>,
    pub error: String,
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

// -- Cookie helpers --

fn session_cookie(name: &str, token: &str, max_age_hours: u64) -> String {
    let max_age_secs = max_age_hours * 3600;
    format!(
        "{}={}; HttpOnly; SameSite=Strict; Path=/; Max-Age={}",
        name, token, max_age_secs
    )
}

fn clear_session_cookie(name: &str) -> String {
    format!("{}=; HttpOnly; SameSite=Strict; Path=/; Max-Age=0", name)
}

/// GET /login: render the login form
pub async fn login_page(maybe_user: MaybeUser) -> AppResult<Response> {
    Ok(Html(LoginTemplate {
        user: maybe_user.0.map(|u| u.display_name),
        error: String::new(),
    })
    .into_response())
}

/// POST /login: check credentials, set the session cookie
pub async fn login_submit(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let username = form.username.trim();

    let mut sessions = state.sessions.lock().await;
    match auth::login(
        &state.users,
        &mut sessions,
        username,
        &form.password,
        state.config.auth.session_hours,
    ) {
        Ok(token) => {
            let cookie = session_cookie(
                &state.config.auth.cookie_name,
                &token,
                state.config.auth.session_hours,
            );
            Ok((
                AppendHeaders([(header::SET_COOKIE, cookie)]),
                Redirect::to("/"),
            )
                .into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!("Failed login attempt for {:?}", username);
            Ok(Html(LoginTemplate {
                user: None,
                error: "Invalid username or password.".to_string(),
            })
            .into_response())
        }
        Err(AuthError::Store(e)) => Err(e.into()),
    }
}

/// POST /logout: invalidate the session, clear the cookie
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = cookie_value(&headers, &state.config.auth.cookie_name) {
        state.sessions.lock().await.destroy(token);
    }
    (
        AppendHeaders([(
            header::SET_COOKIE,
            clear_session_cookie(&state.config.auth.cookie_name),
        )]),
        Redirect::to("/"),
    )
        .into_response()
}
