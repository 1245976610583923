//! Error response DTOs.

use axum::http::StatusCode;
use jiff::Timestamp;
use serde::Serialize;
use utoipa::ToSchema;

/// Standard error body for every non-validation failure.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[schema(value_type = String, example = "2024-05-01T12:00:00Z")]
    pub timestamp: Timestamp,
    #[schema(example = 404)]
    pub status: u16,
    /// Reason phrase of `status`
    #[schema(example = "Not Found")]
    pub error: String,
    #[schema(example = "Account not found with id: 7")]
    pub message: String,
    #[schema(example = "/api/users/me/accounts/7")]
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response stamped with the current time.
    ///
    /// `path` is left empty until the request context is known.
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            timestamp: Timestamp::now(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message: message.into(),
            path: String::new(),
            request_id: None,
        }
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = path.to_string();
        self
    }

    /// Adds request ID to the error response for correlation.
    pub fn with_request_id(mut self, request_id: &str) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_phrase_follows_status() {
        let response = ErrorResponse::new(StatusCode::PRECONDITION_FAILED, "taken");
        assert_eq!(response.status, 412);
        assert_eq!(response.error, "Precondition Failed");
    }

    #[test]
    fn test_request_id_omitted_when_absent() {
        let response = ErrorResponse::new(StatusCode::NOT_FOUND, "missing").with_path("/api/x");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["path"], "/api/x");
        assert!(json.get("requestId").is_none());
        assert!(json["timestamp"].is_string());

        let json = serde_json::to_value(response.with_request_id("abc")).unwrap();
        assert_eq!(json["requestId"], "abc");
    }
}
