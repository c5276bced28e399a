//! Typed error handling for the tent-house service
//!
//! Every fallible operation of the billing core returns [`TentError`], which
//! wraps one category enum per failure family. Each category knows its HTTP
//! status and a stable error code, so handlers can return `TentError`
//! directly.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: missing or invalid user input, never sent to the store
//! - [`EntityError`]: records that do not exist
//! - [`LifecycleError`]: bill status transitions that are not allowed
//! - [`AuthError`]: identity boundary failures
//! - [`StorageError`]: document store failures, surfaced verbatim
//! - [`ConfigError`]: configuration parsing and validation
//!
//! # Example
//!
//! ```rust,ignore
//! match manager.approve_bill(id).await {
//!     Ok(outcome) => println!("booked {}", outcome.booking.date),
//!     Err(TentError::Lifecycle(LifecycleError::InvalidTransition { from, .. })) => {
//!         println!("bill is already {}", from);
//!     }
//!     Err(e) => eprintln!("{}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::BillStatus;

/// Result alias used across the billing core
pub type TentResult<T> = std::result::Result<T, TentError>;

/// The main error type for the service
#[derive(Debug, Error)]
pub enum TentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Should not happen in normal operation
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl TentError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            TentError::Validation(e) => e.status_code(),
            TentError::Entity(e) => e.status_code(),
            TentError::Lifecycle(_) => StatusCode::CONFLICT,
            TentError::Auth(_) => StatusCode::UNAUTHORIZED,
            TentError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TentError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TentError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            TentError::Validation(e) => e.error_code(),
            TentError::Entity(e) => e.error_code(),
            TentError::Lifecycle(e) => e.error_code(),
            TentError::Auth(e) => e.error_code(),
            TentError::Storage(e) => e.error_code(),
            TentError::Config(_) => "CONFIG_ERROR",
            TentError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True when the error was raised before any store call was attempted
    pub fn is_validation(&self) -> bool {
        matches!(self, TentError::Validation(_))
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            TentError::Entity(EntityError::NotFound { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id.to_string()
                }))
            }
            TentError::Validation(ValidationError::FieldError { field, .. }) => {
                Some(serde_json::json!({ "field": field }))
            }
            TentError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            TentError::Validation(ValidationError::DateUnavailable { date }) => {
                Some(serde_json::json!({ "date": date }))
            }
            TentError::Lifecycle(LifecycleError::InvalidTransition { bill_id, from, to }) => {
                Some(serde_json::json!({
                    "bill_id": bill_id.to_string(),
                    "from": from,
                    "to": to
                }))
            }
            TentError::Storage(StorageError::BookingNotRecorded { bill_id, .. }) => {
                Some(serde_json::json!({ "bill_id": bill_id.to_string() }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for TentError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{message}")]
    FieldError { field: String, message: String },

    #[error("Validation errors: {}", join_field_errors(.0))]
    FieldErrors(Vec<FieldValidationError>),

    /// The requested event date already carries a booking
    #[error("Selected date {date} is not available")]
    DateUnavailable { date: NaiveDate },

    #[error("Invalid JSON: {message}")]
    InvalidJson { message: String },
}

/// A single field validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

fn join_field_errors(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    /// Shorthand for a single-field error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::FieldError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ValidationError::DateUnavailable { .. } => StatusCode::CONFLICT,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::DateUnavailable { .. } => "DATE_UNAVAILABLE",
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
            _ => "VALIDATION_ERROR",
        }
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldValidationError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldValidationError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        ValidationError::FieldErrors(fields)
    }
}

impl From<validator::ValidationErrors> for TentError {
    fn from(errors: validator::ValidationErrors) -> Self {
        TentError::Validation(errors.into())
    }
}

impl From<serde_json::Error> for TentError {
    fn from(err: serde_json::Error) -> Self {
        TentError::Validation(ValidationError::InvalidJson {
            message: err.to_string(),
        })
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to record lookups
#[derive(Debug, Error)]
pub enum EntityError {
    #[error("{entity_type} with id '{id}' not found")]
    NotFound { entity_type: String, id: Uuid },
}

impl EntityError {
    pub fn not_found(entity_type: &str, id: Uuid) -> Self {
        EntityError::NotFound {
            entity_type: entity_type.to_string(),
            id,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
        }
    }
}

// =============================================================================
// Lifecycle Errors
// =============================================================================

/// Bill state machine violations
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Bill '{bill_id}' is {from} and cannot become {to}")]
    InvalidTransition {
        bill_id: Uuid,
        from: BillStatus,
        to: BillStatus,
    },

    #[error("Bill '{bill_id}' is {status}; received amount can only be recorded on approved bills")]
    NotApproved { bill_id: Uuid, status: BillStatus },
}

impl LifecycleError {
    pub fn error_code(&self) -> &'static str {
        match self {
            LifecycleError::InvalidTransition { .. } => "INVALID_TRANSITION",
            LifecycleError::NotApproved { .. } => "BILL_NOT_APPROVED",
        }
    }
}

// =============================================================================
// Auth Errors
// =============================================================================

/// Errors raised at the identity boundary
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Missing bearer token")]
    MissingToken,

    #[error("Session is invalid or has ended")]
    InvalidToken,
}

impl AuthError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::MissingToken => "MISSING_TOKEN",
            AuthError::InvalidToken => "INVALID_TOKEN",
        }
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to the document store
#[derive(Debug, Error)]
pub enum StorageError {
    /// A store call failed; the backend message is kept verbatim
    #[error("{backend} {operation} failed: {message}")]
    Backend {
        backend: String,
        operation: String,
        message: String,
    },

    /// The bill write succeeded but its booking could not be stored
    #[error("Bill '{bill_id}' is approved but its booking was not recorded: {message}")]
    BookingNotRecorded { bill_id: Uuid, message: String },
}

impl StorageError {
    /// Wrap a store failure for the given operation
    pub fn backend(backend: &str, operation: &str, err: anyhow::Error) -> Self {
        StorageError::Backend {
            backend: backend.to_string(),
            operation: operation.to_string(),
            message: err.to_string(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StorageError::Backend { .. } => "STORAGE_ERROR",
            StorageError::BookingNotRecorded { .. } => "BOOKING_NOT_RECORDED",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config{}: {message}", .file.as_ref().map(|f| format!(" file '{}'", f)).unwrap_or_default())]
    ParseError {
        file: Option<String>,
        message: String,
    },

    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}
