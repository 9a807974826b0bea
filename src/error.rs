use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Session superseded by a newer login")]
    SessionConflict,

    #[error("Manifest not found")]
    NotFound,

    #[error("Action webhook refused with status {0}")]
    Webhook(u16),

    #[error("Webhook unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Store read failed: {0}")]
    Store(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedPayload { .. } => StatusCode::BAD_REQUEST,
            AppError::NotAuthenticated { .. } | AppError::SessionConflict { .. } => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Webhook { .. } | AppError::Transport { .. } | AppError::Store { .. } => {
                StatusCode::BAD_GATEWAY
            }
        };

        (status, self.to_string()).into_response()
    }
}
