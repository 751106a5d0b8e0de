use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::response::IntoResponse;
use serde_json::json;

/// Represent errors in the application
///
/// All `ServiceError`s are rendered as the uniform `{success: false, message}` envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// A required field is missing or malformed. The message is shown verbatim.
    Validation(String),
    /// Username and password did not match.
    Unauthorized(&'static str),
    /// The acting user does not own the requested resource, or it does not exist.
    PermissionDenied(&'static str),
    MethodNotAllowed(String),
    DuplicateEntry(&'static str),
    /// Data store failure. The detail is logged but never sent to the client.
    StorageError(String),
    /// Upload rejected by policy, or a filesystem failure while writing it.
    ImageError(String),
    InternalServerError(String),
}

impl ServiceError {
    /// Message sent to the client.
    pub fn message(&self) -> String {
        match self {
            ServiceError::Validation(message) => message.clone(),
            ServiceError::Unauthorized(message) => message.to_string(),
            ServiceError::PermissionDenied(message) => message.to_string(),
            ServiceError::MethodNotAllowed(message) => message.clone(),
            ServiceError::DuplicateEntry(message) => message.to_string(),
            ServiceError::StorageError(_) => "A database error occurred.".to_string(),
            ServiceError::ImageError(message) => message.clone(),
            ServiceError::InternalServerError(_) => "An internal error occurred.".to_string(),
        }
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for ServiceError {}

/// Helper for `ServiceError` result
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<sqlx::Error> for ServiceError {
    fn from(error: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref database_error) = error {
            if database_error.is_unique_violation() {
                return ServiceError::DuplicateEntry(
                    "A record with the same unique value already exists.",
                );
            }
        }
        ServiceError::StorageError(error.to_string())
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(error: serde_json::Error) -> Self {
        ServiceError::InternalServerError(format!("Serialization error: {}", error))
    }
}

impl From<MultipartError> for ServiceError {
    fn from(error: MultipartError) -> Self {
        ServiceError::Validation(format!("Invalid multipart body: {}", error.body_text()))
    }
}

impl From<MultipartRejection> for ServiceError {
    fn from(error: MultipartRejection) -> Self {
        ServiceError::Validation(format!("Invalid multipart body: {}", error.body_text()))
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ServiceError::StorageError(ref cause) => log::error!("Database error: {}", cause),
            ServiceError::InternalServerError(ref cause) => log::error!("Internal error: {}", cause),
            _ => {}
        }

        axum::Json(json!({
            "success": false,
            "message": self.message(),
        }))
        .into_response()
    }
}
