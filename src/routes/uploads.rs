use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::state::AppState;

/// GET /uploads/{file}: serve an uploaded image from the uploads directory.
pub async fn serve(State(state): State<AppState>, Path(file): Path<String>) -> Response {
    // Stored image names are flat `<slug>.<ext>` files; anything else is
    // not ours to serve.
    if file.contains("..") || file.contains('/') || file.contains('\\') {
        return StatusCode::NOT_FOUND.into_response();
    }

    let path = state.config.uploads_path().join(&file);
    match tokio::fs::read(&path).await {
        Ok(data) => {
            let mime = mime_guess::from_path(&file).first_or_octet_stream();
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, mime.as_ref().to_string()),
                    (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
                ],
                data,
            )
                .into_response()
        }
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}
