//! Shared response decoding for both clients.
//!
//! Non-2xx statuses become status errors. Bodies that fail schema
//! validation are never swallowed: the raw payload travels inside the
//! error, and is additionally written to the configured debug directory
//! for offline diagnosis.

use std::path::PathBuf;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::core::error::{Result, SandboxError};

/// Decodes JSON responses, dumping unparseable payloads when configured.
#[derive(Debug, Clone, Default)]
pub(crate) struct JsonDecoder {
    dump_dir: Option<PathBuf>,
}

impl JsonDecoder {
    pub(crate) fn new(dump_dir: Option<PathBuf>) -> Self {
        Self { dump_dir }
    }

    /// Fails on non-2xx status, otherwise returns the response unchanged.
    pub(crate) fn expect_success(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(SandboxError::Status {
                status,
                url: response.url().to_string(),
            })
        }
    }

    /// Reads the body and deserializes it, keeping the raw payload on
    /// failure. `context` names the call for the dump file and the log.
    pub(crate) async fn decode<T: DeserializeOwned>(
        &self,
        context: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let response = Self::expect_success(response)?;
        let payload = response.bytes().await?;
        self.decode_bytes(context, payload)
    }

    pub(crate) fn decode_bytes<T: DeserializeOwned>(
        &self,
        context: &str,
        payload: Bytes,
    ) -> Result<T> {
        match serde_json::from_slice(&payload) {
            Ok(value) => Ok(value),
            Err(err) => {
                tracing::warn!(
                    context,
                    error = %err,
                    body_len = payload.len(),
                    "response failed schema validation"
                );
                self.dump(context, &payload);
                Err(SandboxError::deserialize(err, payload))
            }
        }
    }

    fn dump(&self, context: &str, payload: &[u8]) {
        let Some(dir) = &self.dump_dir else {
            return;
        };
        let path = dir.join(format!("report_debug_{context}.json"));
        if let Err(err) = std::fs::write(&path, payload) {
            tracing::warn!(path = %path.display(), error = %err, "failed to write debug dump");
        } else {
            tracing::warn!(path = %path.display(), "wrote raw payload of failed deserialization");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[allow(dead_code)]
        value: u32,
    }

    #[test]
    fn schema_mismatch_keeps_raw_payload() {
        let decoder = JsonDecoder::new(None);
        let body = Bytes::from_static(b"{\"value\": \"not a number\"}");
        let err = decoder
            .decode_bytes::<Payload>("unit", body.clone())
            .unwrap_err();
        match err {
            SandboxError::Deserialize { payload, .. } => assert_eq!(payload, body),
            other => panic!("expected deserialize error, got {other:?}"),
        }
    }

    #[test]
    fn dump_written_when_dir_configured() {
        let dir = std::env::temp_dir().join(format!("sandkit-dump-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let decoder = JsonDecoder::new(Some(dir.clone()));
        let _ = decoder.decode_bytes::<Payload>("dump_test", Bytes::from_static(b"not json"));
        let dumped = std::fs::read(dir.join("report_debug_dump_test.json")).unwrap();
        assert_eq!(dumped, b"not json");
        let _ = std::fs::remove_dir_all(&dir);
    }
}
