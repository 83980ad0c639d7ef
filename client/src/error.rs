//! Error type returned by every API call.

use newsdesk_shared::{normalize::server_message, NormalizeError};
use serde_json::Value;
use thiserror::Error;

/// Failure of a single API call.
///
/// Transport failures and non-2xx statuses pass through the client layer
/// unchanged; stores turn them into display text with [`ApiError::user_message`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP error: {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: Value,
    },

    /// A 2xx body did not have the expected shape.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

impl ApiError {
    /// HTTP status of the failure, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status {
                status, ..
            } => Some(*status),
            Self::Network(err) => err.status().map(|status| status.as_u16()),
            Self::Normalize(_) => None,
        }
    }

    /// Response body of a status failure.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Status {
                body, ..
            } => Some(body),
            _ => None,
        }
    }

    /// Server-supplied error text, if the response carried one.
    pub fn server_message(&self) -> Option<String> {
        self.body().and_then(server_message)
    }

    /// Human-readable message for the store's error field.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status {
                status, ..
            } => {
                let server = self.server_message();
                match status {
                    400 => server.unwrap_or_else(|| "Invalid request".to_string()),
                    401 => "Authorization required".to_string(),
                    403 => "Access denied".to_string(),
                    404 => "Resource not found".to_string(),
                    422 => server.unwrap_or_else(|| "Validation error".to_string()),
                    500 => "Server error. Please try again later.".to_string(),
                    other => server.unwrap_or_else(|| format!("Error {other}")),
                }
            },
            Self::Network(err) => {
                let text = err.to_string();
                if text.trim().is_empty() {
                    "Unknown network error".to_string()
                } else {
                    text
                }
            },
            Self::Normalize(_) => "Unexpected response from server".to_string(),
        }
    }
}
