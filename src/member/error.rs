// Member error types
// Maps every failure of the member flow to an HTTP status and a JSON body

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Errors raised by registration, authentication and token handling
#[derive(Debug, Error)]
pub enum MemberError {
    /// Request failed field validation
    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Body is not JSON or does not match the request shape
    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    /// Username is already taken
    #[error("Member '{0}' already exists")]
    AlreadyExists(String),

    /// No member with this username
    #[error("Member '{0}' does not exist")]
    NotFound(String),

    /// Password did not match the stored hash
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Missing authentication token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token generation error: {0}")]
    TokenGeneration(String),

    /// Database operation errors
    /// Details are logged but never sent to clients
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<JsonRejection> for MemberError {
    fn from(rejection: JsonRejection) -> Self {
        MemberError::MalformedBody(rejection.body_text())
    }
}

/// Result type alias for member operations
pub type MemberResult<T> = Result<T, MemberError>;

impl MemberError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            MemberError::Validation(_) => StatusCode::BAD_REQUEST,
            MemberError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            MemberError::AlreadyExists(_) => StatusCode::CONFLICT,
            MemberError::NotFound(_) => StatusCode::NOT_FOUND,
            MemberError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            MemberError::MissingToken => StatusCode::UNAUTHORIZED,
            MemberError::InvalidToken => StatusCode::UNAUTHORIZED,
            MemberError::ExpiredToken => StatusCode::UNAUTHORIZED,
            MemberError::PasswordHash(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MemberError::TokenGeneration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MemberError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code
    pub fn error_code(&self) -> &'static str {
        match self {
            MemberError::Validation(_) => "VALIDATION_ERROR",
            MemberError::MalformedBody(_) => "MALFORMED_BODY",
            MemberError::AlreadyExists(_) => "ALREADY_EXISTS",
            MemberError::NotFound(_) => "NOT_FOUND",
            MemberError::InvalidCredentials => "INVALID_CREDENTIALS",
            MemberError::MissingToken => "MISSING_TOKEN",
            MemberError::InvalidToken => "INVALID_TOKEN",
            MemberError::ExpiredToken => "EXPIRED_TOKEN",
            MemberError::PasswordHash(_) => "INTERNAL_ERROR",
            MemberError::TokenGeneration(_) => "INTERNAL_ERROR",
            MemberError::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Message that is safe to send to clients
    pub fn error_message(&self) -> String {
        match self {
            MemberError::PasswordHash(_)
            | MemberError::TokenGeneration(_)
            | MemberError::Database(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for MemberError {
    fn into_response(self) -> Response {
        match &self {
            MemberError::Validation(errors) => debug!("Validation error: {:?}", errors),
            MemberError::MalformedBody(msg) => debug!("Malformed request body: {}", msg),
            MemberError::NotFound(username) => debug!("Member not found: {}", username),
            MemberError::AlreadyExists(username) => {
                warn!("Registration attempted for existing member: {}", username)
            }
            MemberError::InvalidCredentials => warn!("Authentication failed: invalid credentials"),
            MemberError::MissingToken => warn!("Missing token in request"),
            MemberError::InvalidToken => warn!("Invalid token attempt"),
            MemberError::ExpiredToken => warn!("Expired token attempt"),
            MemberError::PasswordHash(msg) => error!("Password hashing error: {}", msg),
            MemberError::TokenGeneration(msg) => error!("Token generation error: {}", msg),
            MemberError::Database(e) => error!("Database error in member flow: {:?}", e),
        }

        let body = Json(json!({
            "error": self.error_code(),
            "message": self.error_message(),
        }));

        (self.status_code(), body).into_response()
    }
}
