// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// File-level failures of a grading run.
/// Any of these aborts the whole upload; no partial report is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GradingError {
    /// The file extension is not one of the supported tabular formats.
    Format(String),

    /// One or more required columns are absent from the header row.
    Schema(Vec<String>),

    /// The content could not be read as the declared format.
    Malformed(String),
}

impl fmt::Display for GradingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradingError::Format(name) => write!(
                f,
                "Invalid file format: '{}' (expected .csv, .xlsx or .xls)",
                name
            ),
            GradingError::Schema(missing) => {
                write!(f, "Missing required columns: {}", missing.join(", "))
            }
            GradingError::Malformed(msg) => write!(f, "Error processing file: {}", msg),
        }
    }
}

impl std::error::Error for GradingError {}

/// Every file-level grading error is the client's fault.
impl From<GradingError> for AppError {
    fn from(err: GradingError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Failure of a single delegated scoring call.
/// Absorbed by the scorer and turned into a degraded record, never returned to a client.
#[derive(Debug)]
pub enum ScoringError {
    /// No API key was configured for the completion service.
    MissingCredential,

    /// The request could not be sent or the body could not be read.
    Transport(String),

    /// The service answered with a non-success status.
    Status(u16, String),

    /// The reply did not contain a usable `{"correct", "feedback"}` verdict.
    MalformedResponse(String),
}

impl fmt::Display for ScoringError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringError::MissingCredential => write!(f, "completion service API key is not set"),
            ScoringError::Transport(msg) => write!(f, "transport error: {}", msg),
            ScoringError::Status(code, body) => {
                write!(f, "completion service returned {}: {}", code, body)
            }
            ScoringError::MalformedResponse(msg) => write!(f, "malformed response: {}", msg),
        }
    }
}

impl std::error::Error for ScoringError {}

impl From<reqwest::Error> for ScoringError {
    fn from(err: reqwest::Error) -> Self {
        ScoringError::Transport(err.to_string())
    }
}

/// Startup failures while building the grading configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(String, std::io::Error),
    Parse(String, serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "failed to read '{}': {}", path, e),
            ConfigError::Parse(path, e) => write!(f, "failed to parse '{}': {}", path, e),
            ConfigError::Invalid(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_names_missing_columns() {
        let err = GradingError::Schema(vec!["student_answer".to_string()]);
        assert_eq!(err.to_string(), "Missing required columns: student_answer");
    }

    #[test]
    fn grading_errors_map_to_bad_request() {
        let response = AppError::from(GradingError::Format("notes.txt".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_errors_hide_details() {
        let response = AppError::InternalServerError("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
