//! API response envelope types
//!
//! Every endpoint responds with one of two shapes:
//! success `{"success": true, "data": ..., "message": ...}` or
//! error `{"success": false, "error": {"code", "message", "details"}, "timestamp", "path"}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Standard success response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,

    /// Response data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Optional human-readable message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    /// Create a successful response with a message
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
        }
    }

    /// Extract the data, consuming the response
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// Error detail carried inside the error envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error code for client-side handling
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

/// Standardized error response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Always `false` for errors
    pub success: bool,

    /// Error details
    pub error: ErrorBody,

    /// Timestamp of when the error occurred
    pub timestamp: DateTime<Utc>,

    /// Request path that produced the error
    pub path: String,
}

impl ErrorEnvelope {
    /// Create a new error envelope
    pub fn new(code: impl Into<String>, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
                details: None,
            },
            timestamp: Utc::now(),
            path: path.into(),
        }
    }

    /// Attach additional details to the error
    pub fn with_details(mut self, details: HashMap<String, serde_json::Value>) -> Self {
        self.error.details = Some(details);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response_serialization() {
        let response = ApiResponse::success(serde_json::json!({"id": 1}));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["id"], 1);
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_error_envelope_serialization() {
        let envelope = ErrorEnvelope::new("UNAUTHORIZED", "Authentication required", "/api/v1/auth/me");
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["error"]["code"], "UNAUTHORIZED");
        assert_eq!(json["path"], "/api/v1/auth/me");
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn test_error_envelope_with_details() {
        let mut details = HashMap::new();
        details.insert("field".to_string(), serde_json::json!("email"));

        let envelope = ErrorEnvelope::new("INVALID_CREDENTIALS", "Invalid email or password", "/api/v1/auth/login")
            .with_details(details);

        assert_eq!(envelope.error.details.unwrap()["field"], "email");
    }
}
