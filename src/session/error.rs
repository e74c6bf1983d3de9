//! Errors surfaced for a failed exchange.

use crate::client::ApiError;

/// Why an exchange failed.
///
/// Whatever the cause, the controller discards the partial assistant text
/// and returns to idle; a half-delivered answer is never committed as a
/// message. Retrying is the caller's policy.
#[derive(Debug)]
pub enum StreamError {
    /// Request or transport failure from the API client
    Api(ApiError),
    /// No stream event arrived within the idle window
    IdleTimeout { secs: u64 },
    /// The response body ended before a terminal `done` record
    ClosedWithoutDone,
}

impl std::fmt::Display for StreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StreamError::Api(e) => write!(f, "{}", e),
            StreamError::IdleTimeout { secs } => {
                write!(f, "No response from server for {} seconds", secs)
            }
            StreamError::ClosedWithoutDone => {
                write!(f, "Stream closed before the response completed")
            }
        }
    }
}

impl std::error::Error for StreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StreamError::Api(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ApiError> for StreamError {
    fn from(e: ApiError) -> Self {
        StreamError::Api(e)
    }
}
