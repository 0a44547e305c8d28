//! Unified client error types.

use thiserror::Error;

/// Top-level client error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Call error: {0}")]
    Call(#[from] CallError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("{0}")]
    Other(String),
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Timeout")]
    Timeout,

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

/// Failure of a single remote procedure call.
///
/// This is what bindings keep in their `error` slot and hand to `on_error`,
/// so it is `Clone` and carries no transport handles.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    /// The call never produced a response (connect, TLS, body read).
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("Status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Rate limited")]
    RateLimited,

    #[error("Timeout")]
    Timeout,

    /// The service refused the call before running it.
    #[error("Rejected ({code}): {message}")]
    Rejected { code: String, message: String },

    /// The response did not match the expected result shape.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl From<HttpError> for CallError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::ServerError { status, body } => CallError::Status { status, body },
            HttpError::NotFound(body) => CallError::Status { status: 404, body },
            HttpError::BadRequest(body) => CallError::Status { status: 400, body },
            HttpError::RateLimited { .. } => CallError::RateLimited,
            HttpError::Unauthorized => CallError::Unauthorized,
            HttpError::Timeout => CallError::Timeout,
            #[cfg(feature = "http")]
            HttpError::Reqwest(e) if e.is_timeout() => CallError::Timeout,
            #[cfg(feature = "http")]
            HttpError::Reqwest(e) if e.is_decode() => CallError::Decode(e.to_string()),
            other => CallError::Transport(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for CallError {
    fn from(err: serde_json::Error) -> Self {
        CallError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_maps_to_call_error() {
        let err: CallError = HttpError::ServerError {
            status: 503,
            body: "busy".into(),
        }
        .into();
        assert_eq!(
            err,
            CallError::Status {
                status: 503,
                body: "busy".into()
            }
        );

        let err: CallError = HttpError::MaxRetriesExceeded {
            attempts: 4,
            last_error: "Timeout".into(),
        }
        .into();
        assert!(matches!(err, CallError::Transport(_)));

        let err: CallError = HttpError::Unauthorized.into();
        assert_eq!(err, CallError::Unauthorized);
    }

    #[test]
    fn test_serde_error_is_decode() {
        let bad = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let err: CallError = bad.into();
        assert!(matches!(err, CallError::Decode(_)));
    }

    #[test]
    fn test_call_error_lifts_into_sdk_error() {
        let err: SdkError = CallError::Timeout.into();
        assert_eq!(err.to_string(), "Call error: Timeout");
    }
}
