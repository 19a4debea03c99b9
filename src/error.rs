use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::notify::NotifyError;

#[derive(Error, Debug)]
pub enum PortalError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Notification failed: {0}")]
    Notification(#[from] NotifyError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PortalError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }
}

impl From<actix_web::error::BlockingError> for PortalError {
    fn from(e: actix_web::error::BlockingError) -> Self {
        PortalError::Internal(format!("Blocking task failed: {}", e))
    }
}

impl ResponseError for PortalError {
    fn status_code(&self) -> StatusCode {
        match self {
            PortalError::Validation(_) => StatusCode::BAD_REQUEST,
            PortalError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            PortalError::Forbidden(_) => StatusCode::FORBIDDEN,
            PortalError::NotFound { .. } => StatusCode::NOT_FOUND,
            PortalError::Conflict(_) => StatusCode::CONFLICT,
            PortalError::Notification(_) => StatusCode::BAD_GATEWAY,
            PortalError::Database(_)
            | PortalError::Io(_)
            | PortalError::Config(_)
            | PortalError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "success": false,
            "error": self.to_string()
        }))
    }
}

pub type Result<T> = std::result::Result<T, PortalError>;
