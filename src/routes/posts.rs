use askama::Template;
use axum::extract::{Multipart, Path, State};
use axum::response::{IntoResponse, Redirect, Response};

use crate::error::{AppError, AppResult};
use crate::extractors::{CurrentUser, MaybeUser};
use crate::routes::home::Html;
use crate::state::AppState;
use crate::store::models::{ImageUpload, Post, PostDraft};
use crate::store::StoreError;

#[derive(Template)]
#[template(path = "pages/post.html")]
pub struct PostTemplate {
    pub user: Option<String>,
    pub post: Post,
    pub youtube_thumb: Option<String>,
}

#[derive(Template)]
#[template(path = "pages/editor.html")]
pub struct EditorTemplate {
    pub user: Option<String>,
    /// Form target: /new or /edit/{slug}
    pub action: String,
    pub title: String,
    pub tags: String,
    pub teaser: String,
    pub body: String,
    pub youtube_url: String,
    pub github_url: String,
    pub huggingface_url: String,
    pub twitter_url: String,
    pub arxiv_url: String,
    pub error: String,
}

impl EditorTemplate {
    fn blank(user: String) -> Self {
        Self {
            user: Some(user),
            action: "/new".to_string(),
            title: String::new(),
            tags: String::new(),
            teaser: String::new(),
            body: String::new(),
            youtube_url: String::new(),
            github_url: String::new(),
            huggingface_url: String::new(),
            twitter_url: String::new(),
            arxiv_url: String::new(),
            error: String::new(),
        }
    }

    fn from_post(user: String, post: &Post) -> Self {
        Self {
            user: Some(user),
            action: format!("/edit/{}", post.slug),
            title: post.title.clone(),
            tags: post.tags.join(" "),
            teaser: post.teaser.clone(),
            body: post.body.clone(),
            youtube_url: post.youtube_url.clone(),
            github_url: post.github_url.clone(),
            huggingface_url: post.huggingface_url.clone(),
            twitter_url: post.twitter_url.clone(),
            arxiv_url: post.arxiv_url.clone(),
            error: String::new(),
        }
    }

    /// Re-render the editor with the submitted values after a validation
    /// failure, so nothing the author typed is lost.
    fn from_draft(user: String, action: String, draft: &PostDraft, error: String) -> Self {
        Self {
            user: Some(user),
            action,
            title: draft.title.clone(),
            tags: draft.tags.join(" "),
            teaser: draft.teaser.clone(),
            body: draft.body.clone(),
            youtube_url: draft.youtube_url.clone(),
            github_url: draft.github_url.clone(),
            huggingface_url: draft.huggingface_url.clone(),
            twitter_url: draft.twitter_url.clone(),
            arxiv_url: draft.arxiv_url.clone(),
            error,
        }
    }
}

/// GET /post/{slug}: post detail; unknown slugs go back to the front page
pub async fn detail(
    State(state): State<AppState>,
    maybe_user: MaybeUser,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    match state.posts.find_by_slug(&slug) {
        Ok(post) => {
            let youtube_thumb = post.youtube_thumb();
            Ok(Html(PostTemplate {
                user: maybe_user.0.map(|u| u.display_name),
                post,
                youtube_thumb,
            })
            .into_response())
        }
        Err(StoreError::NotFound) => Ok(Redirect::to("/").into_response()),
        Err(e) => Err(e.into()),
    }
}

/// GET /new: empty editor
pub async fn new_page(user: CurrentUser) -> Response {
    Html(EditorTemplate::blank(user.display_name)).into_response()
}

/// POST /new: create a post from the submitted form
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    multipart: Multipart,
) -> AppResult<Response> {
    let draft = read_draft(multipart).await?;

    match state.posts.create(&draft, &user.display_name).await {
        Ok(post) => Ok(Redirect::to(&format!("/post/{}", post.slug)).into_response()),
        Err(StoreError::Validation(msg)) => Ok(Html(EditorTemplate::from_draft(
            user.display_name,
            "/new".to_string(),
            &draft,
            msg,
        ))
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// GET /edit/{slug}: editor prefilled from the stored post
pub async fn edit_page(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    match state.posts.find_by_slug(&slug) {
        Ok(post) => Ok(Html(EditorTemplate::from_post(user.display_name, &post)).into_response()),
        Err(StoreError::NotFound) => Ok(Redirect::to("/").into_response()),
        Err(e) => Err(e.into()),
    }
}

/// POST /edit/{slug}: apply the submitted form to an existing post
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(slug): Path<String>,
    multipart: Multipart,
) -> AppResult<Response> {
    let draft = read_draft(multipart).await?;

    match state.posts.update(&slug, &draft).await {
        Ok(post) => Ok(Redirect::to(&format!("/post/{}", post.slug)).into_response()),
        Err(StoreError::Validation(msg)) => Ok(Html(EditorTemplate::from_draft(
            user.display_name,
            format!("/edit/{}", slug),
            &draft,
            msg,
        ))
        .into_response()),
        Err(StoreError::NotFound) => Ok(Redirect::to("/").into_response()),
        Err(e) => Err(e.into()),
    }
}

/// POST /delete/{slug}: remove a post; deleting twice is fine
pub async fn remove(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    state.posts.delete(&slug).await?;
    Ok(Redirect::to("/").into_response())
}

/// Collect the editor's multipart form into a draft. Text fields are
/// trimmed; tags are whitespace-separated; the image field only counts when
/// a file was actually chosen.
async fn read_draft(mut multipart: Multipart) -> Result<PostDraft, AppError> {
    let mut draft = PostDraft::default();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == "image" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field.bytes().await?;
            if !filename.is_empty() && !data.is_empty() {
                draft.image = Some(ImageUpload {
                    filename,
                    data: data.to_vec(),
                });
            }
            continue;
        }

        let value = field.text().await?;
        let value = value.trim();
        match name.as_str() {
            "title" => draft.title = value.to_string(),
            "tags" => draft.tags = value.split_whitespace().map(str::to_string).collect(),
            "teaser" => draft.teaser = value.to_string(),
            "body" => draft.body = value.to_string(),
            "youtube_url" => draft.youtube_url = value.to_string(),
            "github_url" => draft.github_url = value.to_string(),
            "huggingface_url" => draft.huggingface_url = value.to_string(),
            "twitter_url" => draft.twitter_url = value.to_string(),
            "arxiv_url" => draft.arxiv_url = value.to_string(),
            _ => {}
        }
    }

    Ok(draft)
}
