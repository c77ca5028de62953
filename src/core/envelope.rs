//! The response envelope shared by every sandbox API call.
//!
//! Every response body is `{"data": ..., "errors": [...]}`. A non-empty
//! `errors` list means the call failed even when the HTTP status was 200,
//! so the error list must be checked before the payload is interpreted.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SandboxError};

/// One error entry reported by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteError {
    /// Human-readable description.
    pub message: String,

    /// Machine-readable error type, e.g. `FILE_NOT_FOUND`.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Generic response envelope around a `data` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// The payload. Interpretation is only valid when `errors` is empty.
    pub data: T,

    /// Errors reported by the service; non-empty means the call failed.
    #[serde(default)]
    pub errors: Vec<RemoteError>,
}

impl<T> Envelope<T> {
    /// Returns the payload, or `SandboxError::Remote` if the service
    /// reported any errors.
    pub fn into_data(self) -> Result<T> {
        if self.errors.is_empty() {
            Ok(self.data)
        } else {
            Err(SandboxError::Remote {
                errors: self.errors,
            })
        }
    }

    /// Borrows the payload after checking the error list.
    pub fn data(&self) -> Result<&T> {
        if self.errors.is_empty() {
            Ok(&self.data)
        } else {
            Err(SandboxError::Remote {
                errors: self.errors.clone(),
            })
        }
    }

    /// Returns `true` if the service reported at least one error.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Payload {
        value: u32,
    }

    #[test]
    fn clean_envelope_yields_data() {
        let env: Envelope<Payload> =
            serde_json::from_str(r#"{"data": {"value": 7}, "errors": []}"#).unwrap();
        assert!(!env.has_errors());
        assert_eq!(env.into_data().unwrap().value, 7);
    }

    #[test]
    fn missing_errors_list_defaults_to_empty() {
        let env: Envelope<Payload> = serde_json::from_str(r#"{"data": {"value": 1}}"#).unwrap();
        assert!(!env.has_errors());
    }

    #[test]
    fn remote_errors_short_circuit_payload() {
        let env: Envelope<Payload> = serde_json::from_str(
            r#"{"data": {"value": 7}, "errors": [{"message": "boom", "type": "ENGINE_ERROR"}]}"#,
        )
        .unwrap();
        assert!(env.has_errors());
        match env.into_data() {
            Err(SandboxError::Remote { errors }) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].kind, "ENGINE_ERROR");
            }
            other => panic!("expected remote error, got {other:?}"),
        }
    }
}
