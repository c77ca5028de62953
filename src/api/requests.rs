//! Wire-level request and storage response types of the key-authenticated API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::options::{SandboxOptionsNew, ScanOptions};

/// Body of `POST /analysis/createScanTask`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateScanTaskRequest {
    /// Temporary URI of the uploaded sample.
    pub file_uri: String,

    /// Display name of the sample; the service falls back to its SHA-256.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Return only the task id; results are fetched separately.
    pub async_result: bool,

    /// Return the overall result without artifact detail. Ignored when
    /// `async_result` is set.
    pub short_result: bool,

    /// Scan options (legacy schema).
    pub options: ScanOptions,
}

/// Body of `POST /analysis/createRetroTask` (rescan with raw traces).
#[derive(Debug, Clone, Serialize)]
pub struct CreateRescanTaskRequest {
    /// Temporary URI of the (dummy) sample.
    pub file_uri: String,

    /// Display name of the sample.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Temporary URI of the raw event trace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_events_uri: Option<String>,

    /// Temporary URI of the raw network capture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_network_uri: Option<String>,

    /// Return only the task id.
    pub async_result: bool,

    /// Return the overall result without artifact detail.
    pub short_result: bool,

    /// Scan options (legacy schema).
    pub options: ScanOptions,
}

/// Body of `POST /analysis/createScanURLTask`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateUrlScanTaskRequest {
    /// The URL to download and scan.
    pub url: String,

    /// Return only the task id.
    pub async_result: bool,

    /// Return the overall result without artifact detail.
    pub short_result: bool,

    /// Scan options (legacy schema).
    pub options: ScanOptions,
}

/// Body of `POST /analysis/createBAScanTask` on the debug API host.
#[derive(Debug, Clone, Serialize)]
pub struct CreateNewScanTaskRequest {
    /// Temporary URI of the uploaded sample.
    pub file_uri: String,

    /// Display name of the sample.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Return the overall result without artifact detail.
    pub short_result: bool,

    /// Return only the task id.
    pub async_result: bool,

    /// Queue priority, 1 (lowest) to 4 (highest).
    pub priority: u8,

    /// Scan options (new-generation schema).
    pub sandbox: SandboxOptionsNew,
}

/// Body of `POST /analysis/checkTask`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckTaskRequest {
    /// Task identifier.
    pub scan_id: Uuid,

    /// Allow an intermediate result for multi-stage scans (marked with
    /// `is_preflight` in the response).
    pub allow_preflight: bool,
}

/// Body of `POST /analysis/report`.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRequest {
    /// Task identifier.
    pub scan_id: Uuid,
}

/// Body of `POST /storage/downloadArtifact`.
#[derive(Debug, Clone, Serialize)]
pub struct DownloadArtifactRequest {
    /// Content reference in `algorithm:hexdigest` form.
    pub file_uri: String,
}

/// Payload of a successful `POST /storage/uploadScanFile`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedFile {
    /// Temporary storage reference for the uploaded file; used when
    /// creating a scan task.
    pub file_uri: String,

    /// Seconds the file is kept if no scan is started against it.
    pub ttl: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_optionals_are_absent_from_json() {
        let request = CreateScanTaskRequest {
            file_uri: "transient/1234".into(),
            file_name: None,
            async_result: true,
            short_result: false,
            options: ScanOptions::default(),
        };
        let value = serde_json::to_value(&request).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("file_name"));
        assert_eq!(object["async_result"], true);
    }

    #[test]
    fn rescan_request_carries_trace_uris() {
        let request = CreateRescanTaskRequest {
            file_uri: "transient/1".into(),
            file_name: Some("sample.pdf".into()),
            raw_events_uri: Some("transient/2".into()),
            raw_network_uri: Some("transient/3".into()),
            async_result: false,
            short_result: false,
            options: ScanOptions::default(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["raw_events_uri"], "transient/2");
        assert_eq!(value["raw_network_uri"], "transient/3");
    }

    #[test]
    fn check_request_shape() {
        let id: Uuid = "8e0b3eac-6f97-4ac9-9533-1a2b78e01e2a".parse().unwrap();
        let request = CheckTaskRequest {
            scan_id: id,
            allow_preflight: true,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["scan_id"], "8e0b3eac-6f97-4ac9-9533-1a2b78e01e2a");
        assert_eq!(value["allow_preflight"], true);
    }
}
