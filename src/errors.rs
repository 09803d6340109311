use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use std::fmt;

/// A single field-level validation failure, surfaced to the client.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Application-specific error types.
#[derive(Debug)]
pub enum AppError {
    /// Client-supplied inquiry data failed schema checks.
    Validation(Vec<FieldError>),
    /// Mail transport misconfiguration or provider failure.
    EmailDelivery(String),
    /// Database-related errors.
    DatabaseError(sqlx::Error),
    /// Missing or invalid configuration detected at construction time.
    Config(String),
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(errors) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                write!(f, "Validation error: {}", fields.join(", "))
            }
            AppError::EmailDelivery(msg) => write!(f, "Email delivery error: {}", msg),
            AppError::DatabaseError(e) => write!(f, "Database error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Validation failures carry itemized field errors; everything else maps to
    /// a generic failure envelope so internal details never leak to the client.
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                tracing::debug!("Validation failed: {:?}", errors);
                let body = Json(json!({
                    "success": false,
                    "message": "Validation error",
                    "errors": errors,
                }));
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            AppError::EmailDelivery(msg) => {
                tracing::error!("Email delivery error: {}", msg);
                failure_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to deliver email",
                )
            }
            AppError::DatabaseError(e) => {
                tracing::error!("Database error: {:?}", e);
                failure_response(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
            AppError::Config(msg) => {
                tracing::error!("Configuration error: {}", msg);
                failure_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while processing your inquiry",
                )
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                failure_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while processing your inquiry",
                )
            }
            AppError::WithContext { source, context } => {
                // Log full context chain, then delegate to the underlying error
                tracing::error!("Error with context: {} -> {}", context, source);
                source.into_response()
            }
        }
    }
}

fn failure_response(status: StatusCode, message: &str) -> Response {
    let body = Json(json!({
        "success": false,
        "message": message,
    }));
    (status, body).into_response()
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::DatabaseError(err)
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    #[allow(dead_code)]
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}

impl<T> ResultExt<T> for Result<T, sqlx::Error> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(AppError::DatabaseError(e)),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(AppError::DatabaseError(e)),
            context: f(),
        })
    }
}
