use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::types::ValidationErrors;

/// Social service error variants.
#[derive(Debug, thiserror::Error)]
pub enum SocialServiceError {
    #[error("validation failed")]
    Validation(#[from] ValidationErrors),
    #[error("user not found")]
    UserNotFound,
    #[error("micropost not found")]
    MicropostNotFound,
    /// Unknown email and wrong password share this variant on purpose.
    #[error("invalid email/password combination")]
    InvalidCredentials,
    #[error("sign in required")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("you cannot delete your own account")]
    CannotDestroySelf,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl SocialServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::MicropostNotFound => "MICROPOST_NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::CannotDestroySelf => "CANNOT_DESTROY_SELF",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::UserNotFound | Self::MicropostNotFound => StatusCode::NOT_FOUND,
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden | Self::CannotDestroySelf => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SocialServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 4xx are expected client errors and TraceLayer already records them.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        let mut body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        if let Self::Validation(ref errors) = self {
            body["errors"] = serde_json::to_value(errors).unwrap_or_default();
        }
        (status, axum::Json(body)).into_response()
    }
}
