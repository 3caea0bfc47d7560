use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Form error: {0}")]
    Multipart(#[from] MultipartError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Unauthenticated page access goes to the login form
            AppError::Unauthorized => Redirect::to("/login").into_response(),
            AppError::Store(StoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, msg).into_response()
            }
            AppError::Store(StoreError::NotFound) => {
                (StatusCode::NOT_FOUND, "Not found".to_string()).into_response()
            }
            AppError::Store(e) => {
                tracing::error!("Store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
                    .into_response()
            }
            AppError::Multipart(e) => {
                tracing::error!("Form error: {}", e);
                (StatusCode::BAD_REQUEST, "Invalid form data".to_string()).into_response()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
