// ABOUTME: Unified error handling for the Macrocoach engine and its service layer
// ABOUTME: Defines ErrorCode, ErrorKind, AppError with context, and convenience constructors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Macrocoach Contributors

//! # Unified Error Handling System
//!
//! Every fallible operation in the workspace returns [`AppResult`]. Errors carry a
//! stable [`ErrorCode`] (serialized in `SCREAMING_SNAKE_CASE`), a human readable
//! message that names the violated condition, and optional structured details
//! (for range violations: the field and its inclusive bounds).
//!
//! Codes group into the coarse [`ErrorKind`] families callers branch on:
//! validation, not-found, permission, state, planning, insufficient data and
//! external failures.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication & Authorization (1000-1999)
    /// Caller is not authenticated
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired = 1000,
    /// Entity exists but belongs to another user
    #[serde(rename = "PERMISSION_DENIED")]
    PermissionDenied = 1004,

    // Validation (3000-3999)
    /// Malformed or otherwise invalid input
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// A required field was not supplied
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,
    /// A numeric field fell outside its inclusive legal range
    #[serde(rename = "VALUE_OUT_OF_RANGE")]
    ValueOutOfRange = 3003,

    // Resource Management (4000-4999)
    /// Referenced entity is absent
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound = 4000,
    /// Operation is invalid for the entity's lifecycle state
    #[serde(rename = "INVALID_STATE")]
    InvalidState = 4010,
    /// Meal-plan preconditions are unmet
    #[serde(rename = "PLANNING_FAILED")]
    PlanningFailed = 4020,
    /// Not enough history to compute a trend
    #[serde(rename = "INSUFFICIENT_DATA")]
    InsufficientData = 4030,

    // External Services (5000-5999)
    /// AI or storage collaborator failure
    #[serde(rename = "EXTERNAL_SERVICE_ERROR")]
    ExternalServiceError = 5000,

    // Configuration (6000-6999)
    /// Configuration is invalid
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6002,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
}

/// Coarse error families exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Out-of-range or missing input
    Validation,
    /// Referenced entity absent
    NotFound,
    /// Caller is not allowed to act on the entity
    Permission,
    /// Invalid lifecycle transition or conflicting write
    State,
    /// Meal-plan preconditions unmet
    Planning,
    /// Too little history
    InsufficientData,
    /// Collaborator failure, surfaced without retry
    External,
    /// Configuration or internal fault
    Internal,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput | Self::MissingRequiredField | Self::ValueOutOfRange => 400,
            Self::AuthRequired => 401,
            Self::PermissionDenied => 403,
            Self::ResourceNotFound => 404,
            Self::InvalidState => 409,
            Self::PlanningFailed | Self::InsufficientData => 422,
            Self::ExternalServiceError => 502,
            Self::ConfigInvalid | Self::InternalError => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication is required to perform this action",
            Self::PermissionDenied => "You do not have permission to perform this action",
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::InvalidState => "The operation is not allowed in the current state",
            Self::PlanningFailed => "A meal plan could not be generated",
            Self::InsufficientData => "Not enough data is available for this calculation",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal error occurred",
        }
    }

    /// Map the code onto its caller-facing error family
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        match self {
            Self::InvalidInput | Self::MissingRequiredField | Self::ValueOutOfRange => {
                ErrorKind::Validation
            }
            Self::ResourceNotFound => ErrorKind::NotFound,
            Self::AuthRequired | Self::PermissionDenied => ErrorKind::Permission,
            Self::InvalidState => ErrorKind::State,
            Self::PlanningFailed => ErrorKind::Planning,
            Self::InsufficientData => ErrorKind::InsufficientData,
            Self::ExternalServiceError => ErrorKind::External,
            Self::ConfigInvalid | Self::InternalError => ErrorKind::Internal,
        }
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// User ID if available
    pub user_id: Option<Uuid>,
    /// Resource ID if applicable
    pub resource_id: Option<String>,
    /// Additional key-value context
    pub details: serde_json::Value,
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self {
            user_id: None,
            resource_id: None,
            details: serde_json::Value::Object(serde_json::Map::new()),
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add a user ID to the error context
    #[must_use]
    pub const fn with_user_id(mut self, user_id: Uuid) -> Self {
        self.context.user_id = Some(user_id);
        self
    }

    /// Add a resource ID to the error context
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Add details to the error context
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Caller-facing error family
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.code.kind()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// Serializable error payload for callers
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error body
    pub error: ErrorResponseDetails,
}

/// Body of an [`ErrorResponse`]
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Stable error code
    pub code: ErrorCode,
    /// Caller-facing family
    pub kind: ErrorKind,
    /// Actionable message
    pub message: String,
    /// Structured details (field, bounds, ids)
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                kind: error.code.kind(),
                message: error.message,
                details: error.context.details,
            },
        }
    }
}

/// Convenience functions for creating common errors
impl AppError {
    /// Authentication required
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Please sign in to continue")
    }

    /// Entity exists but is owned by someone else
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Required field missing
    pub fn missing_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MissingRequiredField, message)
            .with_details(serde_json::json!({ "field": field }))
    }

    /// Numeric field outside its inclusive legal range
    pub fn out_of_range(field: &'static str, min: impl fmt::Display, max: impl fmt::Display) -> Self {
        let min = min.to_string();
        let max = max.to_string();
        Self::new(
            ErrorCode::ValueOutOfRange,
            format!("{field} must be between {min} and {max}"),
        )
        .with_details(serde_json::json!({
            "field": field,
            "min": min,
            "max": max,
        }))
    }

    /// Operation not allowed in the current lifecycle state
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidState, message)
    }

    /// Meal-plan preconditions unmet
    pub fn planning(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PlanningFailed, message)
    }

    /// Not enough history
    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InsufficientData, message)
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// External service error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }
}

/// Conversion from `anyhow::Error` to `AppError`
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        match error.source() {
            Some(source) => Self::new(ErrorCode::InternalError, error.to_string())
                .with_details(serde_json::json!({
                    "source": source.to_string()
                })),
            None => Self::new(ErrorCode::InternalError, error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::AuthRequired.http_status(), 401);
        assert_eq!(ErrorCode::ValueOutOfRange.http_status(), 400);
        assert_eq!(ErrorCode::ResourceNotFound.http_status(), 404);
        assert_eq!(ErrorCode::InvalidState.http_status(), 409);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(ErrorCode::MissingRequiredField.kind(), ErrorKind::Validation);
        assert_eq!(ErrorCode::PermissionDenied.kind(), ErrorKind::Permission);
        assert_eq!(ErrorCode::PlanningFailed.kind(), ErrorKind::Planning);
        assert_eq!(ErrorCode::ExternalServiceError.kind(), ErrorKind::External);
    }

    #[test]
    fn test_out_of_range_names_field_and_bounds() {
        let error = AppError::out_of_range("age", 16, 100);

        assert_eq!(error.code, ErrorCode::ValueOutOfRange);
        assert_eq!(error.message, "age must be between 16 and 100");
        assert_eq!(error.context.details["field"], "age");
        assert_eq!(error.context.details["min"], "16");
        assert_eq!(error.context.details["max"], "100");
    }

    #[test]
    fn test_error_response_serialization() {
        let error = AppError::invalid_state("session already in progress")
            .with_user_id(Uuid::new_v4());
        let response = ErrorResponse::from(error);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("INVALID_STATE"));
        assert!(json.contains("\"kind\":\"state\""));
    }
}
