//! Error types for the sandkit library.
//!
//! This module provides structured, typed errors for all failure scenarios.
//! The library never panics; all errors are returned as `Result` values.

use bytes::Bytes;
use reqwest::StatusCode;
use thiserror::Error;

use crate::core::envelope::RemoteError;

/// The main error type for sandbox client operations.
#[derive(Debug, Error)]
pub enum SandboxError {
    /// A caller-side argument violation, detected before any network call.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the violated constraint.
        reason: String,
    },

    /// The server answered with a non-2xx HTTP status.
    #[error("server returned {status} for {url}")]
    Status {
        /// The HTTP status code.
        status: StatusCode,
        /// The request URL.
        url: String,
    },

    /// The HTTP request itself failed (connect, TLS, timeout, body I/O).
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body did not match the expected schema.
    ///
    /// The raw payload is retained for offline diagnosis; see
    /// [`ClientConfig::debug_dump_dir`](crate::config::ClientConfig::debug_dump_dir).
    #[error("response deserialization failed: {reason}")]
    Deserialize {
        /// The underlying serde error message.
        reason: String,
        /// The raw response body as received.
        payload: Bytes,
    },

    /// The response carried a non-empty `errors` list despite HTTP 200.
    #[error("remote reported errors: {}", format_remote_errors(.errors))]
    Remote {
        /// Errors reported by the remote service.
        errors: Vec<RemoteError>,
    },

    /// UI session authentication or token acquisition failed.
    #[error("authentication failed: {reason}")]
    Auth {
        /// Reason for the failure.
        reason: String,
    },

    /// An I/O error occurred reading a local upload source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_remote_errors(errors: &[RemoteError]) -> String {
    errors
        .iter()
        .map(|e| format!("[{}] {}", e.kind, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl SandboxError {
    /// Creates an `InvalidArgument` error.
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Creates an `Auth` error.
    pub fn auth(reason: impl Into<String>) -> Self {
        Self::Auth {
            reason: reason.into(),
        }
    }

    /// Creates a `Deserialize` error from a serde failure and the raw body.
    pub fn deserialize(err: serde_json::Error, payload: Bytes) -> Self {
        Self::Deserialize {
            reason: err.to_string(),
            payload,
        }
    }

    /// Returns `true` if this error came from the network rather than from
    /// the caller or the remote service's application layer.
    ///
    /// The poll loop's error budget absorbs only these.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Status { .. } | Self::Deserialize { .. }
        )
    }

    /// Returns the HTTP status code, if this error carries one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status(),
            _ => None,
        }
    }
}

/// A specialized `Result` type for sandbox client operations.
pub type Result<T> = std::result::Result<T, SandboxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_errors_render_in_display() {
        let err = SandboxError::Remote {
            errors: vec![
                RemoteError {
                    message: "file not found".into(),
                    kind: "FILE_NOT_FOUND".into(),
                },
                RemoteError {
                    message: "scan cancelled".into(),
                    kind: "CANCELLED_BY_USER".into(),
                },
            ],
        };
        let rendered = err.to_string();
        assert!(rendered.contains("FILE_NOT_FOUND"));
        assert!(rendered.contains("scan cancelled"));
    }

    #[test]
    fn transport_classification() {
        let status = SandboxError::Status {
            status: StatusCode::BAD_GATEWAY,
            url: "https://sandbox.example/api/v1/analysis/report".into(),
        };
        assert!(status.is_transport());
        assert_eq!(status.status(), Some(StatusCode::BAD_GATEWAY));

        let arg = SandboxError::invalid_argument("empty upload");
        assert!(!arg.is_transport());
        assert_eq!(arg.status(), None);

        let remote = SandboxError::Remote { errors: vec![] };
        assert!(!remote.is_transport());
    }
}
