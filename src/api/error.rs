//! Errors raised while talking to the record-keeping API.

use crate::models::CollectionKind;

/// Failure of a single list request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    /// The API host could not be reached.
    #[error("cannot connect to API at {url}. Is the server running?")]
    Connect { url: String },

    /// The API answered with a non-success status.
    #[error("API error {status} from {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The response body was not the expected list envelope.
    #[error("failed to decode {collection} response: {message}")]
    Decode {
        collection: CollectionKind,
        message: String,
    },

    /// Any other transport failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl ApiError {
    /// Classify a transport error the way the CLI reports it.
    pub fn from_transport(error: reqwest::Error, url: &str, seconds: u64) -> Self {
        if error.is_timeout() {
            ApiError::Timeout {
                url: url.to_string(),
                seconds,
            }
        } else if error.is_connect() {
            ApiError::Connect {
                url: url.to_string(),
            }
        } else {
            ApiError::Request(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ApiError::Timeout {
            url: "http://localhost/api/show-students/".to_string(),
            seconds: 30,
        };
        assert_eq!(
            err.to_string(),
            "request to http://localhost/api/show-students/ timed out after 30s"
        );

        let err = ApiError::Decode {
            collection: CollectionKind::Payments,
            message: "expected an array".to_string(),
        };
        assert!(err.to_string().contains("Payments"));
        assert!(err.to_string().contains("expected an array"));
    }
}
