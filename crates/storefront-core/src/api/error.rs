//! API Errors
//!
//! Failure taxonomy for backend calls. Non-2xx bodies are parsed into
//! [`ProblemDetails`] so forms can show the server's field errors inline.

use serde::Deserialize;
use thiserror::Error;

use crate::validation::FieldErrors;

pub type ApiResult<T> = Result<T, ApiError>;

/// Error body returned by the backend on non-2xx responses
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ProblemDetails {
    #[serde(default)]
    pub errors: FieldErrors,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl ProblemDetails {
    /// Parse a response body; anything that is not a problem object
    /// becomes an empty one
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    fn summary(&self, status: u16) -> String {
        if let Some(detail) = self.detail.as_deref().filter(|d| !d.is_empty()) {
            return detail.to_string();
        }
        if let Some(title) = self.title.as_deref().filter(|t| !t.is_empty()) {
            return title.to_string();
        }
        if let Some(message) = self.errors.fields().find_map(|field| self.errors.first(field)) {
            return message.to_string();
        }
        format!("Request failed with status {}", status)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Transport failure before any response arrived
    #[error("Network error: {0}")]
    Network(String),

    #[error("Please sign in to continue")]
    Unauthorized,

    #[error("The requested resource was not found")]
    NotFound,

    /// Non-2xx response
    #[error("{}", .problem.summary(*.status))]
    Rejected { status: u16, problem: ProblemDetails },

    /// 2xx response whose body did not match the expected shape
    #[error("Unexpected response from server: {0}")]
    Decode(String),
}

impl ApiError {
    /// Map a non-success status and its body
    pub fn from_status(status: u16, body: &str) -> Self {
        let problem = ProblemDetails::from_body(body);
        match status {
            404 => ApiError::NotFound,
            401 if problem == ProblemDetails::default() => ApiError::Unauthorized,
            _ => ApiError::Rejected { status, problem },
        }
    }

    /// Human-readable message stored in UI state
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Server field errors, empty for anything but a rejected request
    pub fn field_errors(&self) -> FieldErrors {
        match self {
            ApiError::Rejected { problem, .. } => problem.errors.clone(),
            _ => FieldErrors::new(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized | ApiError::Rejected { status: 401, .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_prefers_detail() {
        let err = ApiError::from_status(
            400,
            r#"{"detail":"Quantity exceeds stock","errors":{"quantity":["Too many"]}}"#,
        );
        assert_eq!(err.user_message(), "Quantity exceeds stock");
        assert_eq!(err.field_errors().first("quantity"), Some("Too many"));
    }

    #[test]
    fn test_rejected_falls_back_to_field_error_then_status() {
        let err = ApiError::from_status(422, r#"{"errors":{"email":["Email already registered"]}}"#);
        assert_eq!(err.user_message(), "Email already registered");

        let err = ApiError::from_status(500, "<html>oops</html>");
        assert_eq!(err.user_message(), "Request failed with status 500");
        assert!(err.field_errors().is_empty());
    }

    #[test]
    fn test_status_mapping() {
        assert!(ApiError::from_status(404, "").is_not_found());
        assert_eq!(ApiError::from_status(401, ""), ApiError::Unauthorized);

        let err = ApiError::from_status(401, r#"{"detail":"Invalid credentials"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(err.user_message(), "Invalid credentials");
    }
}
