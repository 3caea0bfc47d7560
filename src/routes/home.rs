use std::collections::BTreeSet;

use askama::Template;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::error::AppResult;
use crate::extractors::MaybeUser;
use crate::state::AppState;
use crate::store::models::Post;

#[derive(Template)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub user: Option<String>,
    pub featured: Option<Post>,
    pub posts: Vec<Post>,
    pub all_tags: Vec<String>,
    pub active_tag: String,
}

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!("Template render error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

#[derive(Deserialize, Default)]
pub struct HomeQuery {
    #[serde(default)]
    pub tag: String,
}

/// GET /: newest-first post grid with an optional tag filter. The newest
/// matching post is featured above the grid.
pub async fn index(
    State(state): State<AppState>,
    maybe_user: MaybeUser,
    Query(query): Query<HomeQuery>,
) -> AppResult<Response> {
    let mut posts = state.posts.list_all()?;
    posts.sort_by(|a, b| b.created.cmp(&a.created));

    let all_tags: Vec<String> = posts
        .iter()
        .flat_map(|p| p.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let filtered: Vec<Post> = if query.tag.is_empty() {
        posts
    } else {
        posts
            .into_iter()
            .filter(|p| p.tags.iter().any(|t| t == &query.tag))
            .collect()
    };

    let mut filtered = filtered.into_iter();
    let featured = filtered.next();
    let grid_posts: Vec<Post> = filtered.collect();

    Ok(Html(HomeTemplate {
        user: maybe_user.0.map(|u| u.display_name),
        featured,
        posts: grid_posts,
        all_tags,
        active_tag: query.tag,
    })
    .into_response())
}
