// HTTP API Error Types
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::store::StoreError;

/// A single violated constraint reported in the `errors` list of the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// JSON pointer rooted at the request part (`/body/name`, `/query/limit`)
    /// or at `/response` for outbound checks.
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    ValidationError {
        message: String,
        errors: Vec<ValidationIssue>,
    },
    InvalidJson(String),

    // 404 Not Found
    NotFound(String),

    // 405 Method Not Allowed
    MethodNotAllowed(String),

    // 413 Payload Too Large
    PayloadTooLarge(String),

    // 415 Unsupported Media Type
    UnsupportedMediaType(String),

    // 500 Internal Server Error (handler produced something the contract forbids)
    ResponseValidation {
        message: String,
        errors: Vec<ValidationIssue>,
    },

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ValidationError { .. } => 400,
            ApiError::InvalidJson(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::MethodNotAllowed(_) => 405,
            ApiError::PayloadTooLarge(_) => 413,
            ApiError::UnsupportedMediaType(_) => 415,
            ApiError::ResponseValidation { .. } => 500,
            ApiError::InternalServerError(_) => 500,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ValidationError { message, .. } => message,
            ApiError::InvalidJson(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::MethodNotAllowed(msg) => msg,
            ApiError::PayloadTooLarge(msg) => msg,
            ApiError::UnsupportedMediaType(msg) => msg,
            ApiError::ResponseValidation { message, .. } => message,
            ApiError::InternalServerError(msg) => msg,
        }
    }

    /// Violated constraints, only present for schema failures
    pub fn issues(&self) -> Option<&[ValidationIssue]> {
        match self {
            ApiError::ValidationError { errors, .. } => Some(errors),
            ApiError::ResponseValidation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// Convert to the `{message, errors?}` envelope
    pub fn to_json(&self) -> Value {
        let mut response = json!({ "message": self.message() });
        if let Some(errors) = self.issues() {
            response["errors"] = json!(errors);
        }
        response
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    /// Builds a 400 whose message lists every issue, e.g. `request/body/age ...`.
    pub fn from_issues(prefix: &str, errors: Vec<ValidationIssue>) -> Self {
        let message = summarize(prefix, &errors);
        ApiError::ValidationError { message, errors }
    }

    pub fn invalid_json(message: impl Into<String>) -> Self {
        ApiError::InvalidJson(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        ApiError::MethodNotAllowed(message.into())
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        ApiError::PayloadTooLarge(message.into())
    }

    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        ApiError::UnsupportedMediaType(message.into())
    }

    pub fn response_validation(errors: Vec<ValidationIssue>) -> Self {
        let message = summarize("", &errors);
        ApiError::ResponseValidation { message, errors }
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }
}

fn summarize(prefix: &str, errors: &[ValidationIssue]) -> String {
    errors
        .iter()
        .map(|issue| {
            let location = format!("{}{}", prefix, issue.path);
            format!("{} {}", location.trim_start_matches('/'), issue.message)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

// Convert other error types to ApiError
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        // Don't expose internal state to clients
        tracing::error!("Store error: {}", err);
        ApiError::internal_server_error("An error occurred while processing your request")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(r) => {
                ApiError::unsupported_media_type(r.body_text())
            }
            JsonRejection::JsonSyntaxError(r) => ApiError::invalid_json(r.body_text()),
            JsonRejection::JsonDataError(r) => ApiError::bad_request(r.body_text()),
            other => {
                if other.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    ApiError::payload_too_large(other.body_text())
                } else {
                    ApiError::bad_request(other.body_text())
                }
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_without_issues_has_only_message() {
        let err = ApiError::not_found("Usuario no encontrado");
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_json(), json!({ "message": "Usuario no encontrado" }));
    }

    #[test]
    fn envelope_lists_schema_issues() {
        let err = ApiError::from_issues(
            "request",
            vec![
                ValidationIssue::new("/body", "\"name\" is a required property"),
                ValidationIssue::new("/body/age", "-1 is less than the minimum of 0"),
            ],
        );
        assert_eq!(err.status_code(), 400);

        let body = err.to_json();
        assert_eq!(
            body["message"],
            "request/body \"name\" is a required property, request/body/age -1 is less than the minimum of 0"
        );
        assert_eq!(body["errors"].as_array().map(|a| a.len()), Some(2));
        assert_eq!(body["errors"][1]["path"], "/body/age");
    }

    #[test]
    fn store_errors_are_hidden_behind_a_generic_500() {
        let err: ApiError = StoreError::Poisoned("users").into();
        assert_eq!(err.status_code(), 500);
        assert!(!err.message().contains("users"));
        assert!(err.to_json().get("errors").is_none());
    }

    #[test]
    fn response_validation_is_a_server_error() {
        let err = ApiError::response_validation(vec![ValidationIssue::new(
            "/response/id",
            "1 is not of type \"string\"",
        )]);
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.message(), "response/id 1 is not of type \"string\"");
    }
}
