//! Scan task result envelopes and the artifact tree.
//!
//! A submission or status call answers with either a "short" report (task id
//! only, the task keeps running server-side) or a "long" report (id plus
//! verdict and artifacts). The two shapes share one `data` slot; which one
//! arrived is decided by the presence of the required `result` field, trying
//! the more specific shape first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::envelope::RemoteError;
use crate::core::enums::{
    ArtifactType, EngineSubsystem, LogType, NetworkObjectType, ScanState, Verdict,
};
use crate::core::error::{Result, SandboxError};

/// Overall result of one analysis (or one analysis stage).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanVerdict {
    /// Completion state of the analysis.
    pub scan_state: ScanState,

    /// Analysis duration in seconds. Absent on intermediate check results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// Duration including persistence overhead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_full: Option<f64>,

    /// The verdict, when one was produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,

    /// Malware family/type when detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threat: Option<String>,

    /// Errors raised during the analysis itself.
    #[serde(default)]
    pub errors: Vec<RemoteError>,
}

/// A network observable extracted during analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkObject {
    /// Kind of the observable.
    #[serde(rename = "type")]
    pub kind: NetworkObjectType,

    /// The observable itself (URL, IP or domain).
    pub value: String,
}

/// A behavior matched against the suspicious-activity catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspiciousBehavior {
    /// Rule name.
    pub name: String,

    /// Rule version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// MITRE ATT&CK technique id.
    pub mitre_threat_id: String,

    /// Contribution to the overall score.
    pub weight: i64,
}

/// One malware detection by an engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// Detection name, e.g. a signature id.
    pub detect: String,

    /// Threat type of the detection.
    pub threat: String,
}

/// A log produced by behavioral analysis (traffic capture, video, events).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogFile {
    /// Kind of the log.
    #[serde(rename = "type")]
    pub kind: LogType,

    /// Storage reference used to download the log.
    pub file_uri: String,

    /// Display name.
    pub file_name: String,
}

/// Operating system of a VM image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsInfo {
    /// OS name.
    pub name: String,

    /// OS version.
    pub version: String,

    /// CPU architecture the OS supports.
    pub architecture: String,

    /// Service pack name. The API reports `service_pack`, the UI
    /// `servicePack`; both spellings are accepted.
    #[serde(
        default,
        alias = "servicePack",
        skip_serializing_if = "Option::is_none"
    )]
    pub service_pack: Option<String>,

    /// OS locale.
    pub locale: String,
}

/// A virtual machine image installed on the endpoint.
///
/// The service occasionally answers with an entirely empty object here,
/// so every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VmImage {
    /// Image identifier, e.g. `win7-sp1-x64`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_id: Option<String>,

    /// Display name (UI responses only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Image kind (UI responses only).
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Image version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Operating system details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<OsInfo>,
}

/// A dump of a process taken during behavioral analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessDump {
    /// Name of the dumped process.
    pub process_name: String,

    /// PID of the dumped process.
    pub process_id: i64,

    /// Why the dump was taken.
    pub dump_trigger: String,

    /// When the dump was taken.
    pub dump_create_time: f64,
}

/// Extra detail attached to a file description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfoDetails {
    /// Present when the file is a process dump.
    pub process_dump: ProcessDump,
}

/// Description of a scanned file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    /// Storage reference; can be fed to artifact download.
    pub file_uri: String,

    /// Path inside the parent container, empty for the root object.
    pub file_path: String,

    /// MIME type detected during the scan.
    pub mime_type: String,

    /// MD5 hex digest.
    pub md5: String,

    /// SHA-1 hex digest.
    pub sha1: String,

    /// SHA-256 hex digest.
    pub sha256: String,

    /// File size in bytes.
    pub size: u64,

    /// Extra details for special artifact kinds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<FileInfoDetails>,
}

/// One stage of a multi-stage (bootkit-monitoring) behavioral run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxStage {
    /// Stage result.
    pub result: ScanVerdict,

    /// Detections made during the stage.
    #[serde(default)]
    pub detections: Vec<Detection>,

    /// Logs produced by the stage.
    #[serde(default)]
    pub logs: Vec<LogFile>,

    /// Files dropped inside the VM during the stage.
    #[serde(default)]
    pub artifacts: Vec<Artifact>,

    /// Actual stage duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_duration: Option<f64>,

    /// Suspicious behaviors seen during the stage.
    #[serde(default)]
    pub suspicious_behaviors: Vec<SuspiciousBehavior>,
}

/// Behavioral-analysis detail of an engine result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxDetails {
    /// VM image the sample ran on.
    pub image: VmImage,

    /// Logs of the run.
    pub logs: Vec<LogFile>,

    /// Files created inside the VM during the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<Vec<Artifact>>,

    /// Bootkit-monitoring stages, if any.
    #[serde(default)]
    pub stages: Vec<SandboxStage>,

    /// Actual run duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_duration: Option<f64>,

    /// Whether bootkit monitoring ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootkitmon: Option<bool>,

    /// Network observables seen during the run.
    #[serde(default)]
    pub network_objects: Vec<NetworkObject>,

    /// Suspicious behaviors seen during the run.
    #[serde(default)]
    pub suspicious_behaviors: Vec<SuspiciousBehavior>,
}

/// Engine-specific detail payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineDetails {
    /// Present on results produced by the behavioral subsystem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sandbox: Option<SandboxDetails>,
}

/// Result of one engine (antivirus, static analysis, behavioral run).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineResult {
    /// Subsystem that produced the result.
    pub engine_subsystem: EngineSubsystem,

    /// Engine code name.
    pub engine_code_name: String,

    /// Engine version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_version: Option<String>,

    /// Signature/knowledge database version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_version: Option<String>,

    /// Database update time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_time: Option<DateTime<Utc>>,

    /// The engine's verdict.
    pub result: ScanVerdict,

    /// Detections made by the engine.
    #[serde(default)]
    pub detections: Vec<Detection>,

    /// Engine-specific details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<EngineDetails>,
}

/// A scanned object: file, archive, e-mail, URL or process dump.
///
/// Artifacts form a tree; an archive's extracted members appear in its
/// `artifacts` child list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    /// Kind of the object.
    #[serde(rename = "type")]
    pub artifact_type: ArtifactType,

    /// Overall result for the object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ScanVerdict>,

    /// File description, when the object is file-backed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_info: Option<FileInfo>,

    /// Per-engine results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_results: Option<Vec<EngineResult>>,

    /// Extracted children, for containers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifacts: Option<Vec<Artifact>>,

    /// Network observables attached to the object.
    #[serde(default)]
    pub network_objects: Vec<NetworkObject>,
}

impl Artifact {
    /// Returns the behavioral-analysis engine result for this artifact.
    ///
    /// An archive has no behavioral result of its own; the run is performed
    /// on its single extracted payload, so the lookup recurses into the
    /// first child rather than scanning siblings.
    pub fn find_sandbox_result(&self) -> Option<&EngineResult> {
        if self.artifact_type == ArtifactType::Archive {
            return self
                .artifacts
                .as_ref()
                .and_then(|children| children.first())
                .and_then(Artifact::find_sandbox_result);
        }
        self.engine_results
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|r| r.engine_subsystem == EngineSubsystem::Sandbox)
    }

    /// Returns the static-analysis engine result for this artifact.
    pub fn find_static_result(&self) -> Option<&EngineResult> {
        self.engine_results
            .as_deref()
            .unwrap_or_default()
            .iter()
            .find(|r| r.engine_subsystem == EngineSubsystem::Static)
    }
}

/// Report carrying only the task identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortReport {
    /// Opaque identifier of the scan task.
    pub scan_id: Uuid,
}

/// Report carrying the full analysis outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LongReport {
    /// Opaque identifier of the scan task.
    pub scan_id: Uuid,

    /// Overall result of the task.
    pub result: ScanVerdict,

    /// The scanned objects, root first.
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

/// The `data` slot of a task response: long shape attempted first, then
/// the short fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportData {
    /// Task fully completed and detail was requested.
    Long(LongReport),
    /// Task accepted or still in flight.
    Short(ShortReport),
}

impl ReportData {
    /// Returns the task identifier regardless of shape.
    pub fn scan_id(&self) -> Uuid {
        match self {
            Self::Long(report) => report.scan_id,
            Self::Short(report) => report.scan_id,
        }
    }
}

/// Response of any submission or report call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResponse {
    /// The short or long report.
    pub data: ReportData,

    /// Errors reported by the service; must be checked before `data`.
    #[serde(default)]
    pub errors: Vec<RemoteError>,
}

impl TaskResponse {
    fn check_errors(&self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(SandboxError::Remote {
                errors: self.errors.clone(),
            })
        }
    }

    /// Returns the short view of the report (always available on success).
    pub fn short_report(&self) -> Result<ShortReport> {
        self.check_errors()?;
        Ok(ShortReport {
            scan_id: self.data.scan_id(),
        })
    }

    /// Returns the long report if the task has fully completed.
    pub fn long_report(&self) -> Result<Option<&LongReport>> {
        self.check_errors()?;
        match &self.data {
            ReportData::Long(report) => Ok(Some(report)),
            ReportData::Short(_) => Ok(None),
        }
    }

    /// Returns `true` when a long report is present and no errors were
    /// reported.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty() && matches!(self.data, ReportData::Long(_))
    }
}

/// Response of a task status check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckTaskResponse {
    /// The short or long report.
    pub data: ReportData,

    /// Errors reported by the service.
    #[serde(default)]
    pub errors: Vec<RemoteError>,

    /// Whether the result is an intermediate (e.g. static-only) one for a
    /// multi-stage analysis that has not fully finished.
    pub is_preflight: bool,
}

impl CheckTaskResponse {
    /// Converts into the plain task response, dropping the preflight flag.
    pub fn into_task_response(self) -> TaskResponse {
        TaskResponse {
            data: self.data,
            errors: self.errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(v: Verdict) -> ScanVerdict {
        ScanVerdict {
            scan_state: ScanState::Full,
            duration: Some(12.5),
            duration_full: None,
            verdict: Some(v),
            threat: None,
            errors: vec![],
        }
    }

    fn engine(subsystem: EngineSubsystem, code_name: &str) -> EngineResult {
        EngineResult {
            engine_subsystem: subsystem,
            engine_code_name: code_name.into(),
            engine_version: None,
            database_version: None,
            database_time: None,
            result: verdict(Verdict::Dangerous),
            detections: vec![],
            details: None,
        }
    }

    #[test]
    fn data_with_result_parses_as_long_report() {
        let body = serde_json::json!({
            "data": {
                "scan_id": "8e0b3eac-6f97-4ac9-9533-1a2b78e01e2a",
                "result": {"scan_state": "FULL", "verdict": "CLEAN", "errors": []},
                "artifacts": []
            },
            "errors": []
        });
        let response: TaskResponse = serde_json::from_value(body).unwrap();
        assert!(response.is_complete());
        let long = response.long_report().unwrap().unwrap();
        assert_eq!(long.result.verdict, Some(Verdict::Clean));
    }

    #[test]
    fn data_without_result_falls_back_to_short_report() {
        let body = serde_json::json!({
            "data": {"scan_id": "8e0b3eac-6f97-4ac9-9533-1a2b78e01e2a"},
            "errors": []
        });
        let response: TaskResponse = serde_json::from_value(body).unwrap();
        assert!(!response.is_complete());
        assert!(response.long_report().unwrap().is_none());
        assert_eq!(
            response.short_report().unwrap().scan_id.to_string(),
            "8e0b3eac-6f97-4ac9-9533-1a2b78e01e2a"
        );
    }

    #[test]
    fn report_accessors_check_errors_first() {
        let body = serde_json::json!({
            "data": {"scan_id": "8e0b3eac-6f97-4ac9-9533-1a2b78e01e2a"},
            "errors": [{"message": "task expired", "type": "TIMEOUT_ERROR"}]
        });
        let response: TaskResponse = serde_json::from_value(body).unwrap();
        assert!(matches!(
            response.short_report(),
            Err(SandboxError::Remote { .. })
        ));
        assert!(matches!(
            response.long_report(),
            Err(SandboxError::Remote { .. })
        ));
    }

    #[test]
    fn archive_sandbox_result_comes_from_first_child() {
        let payload = Artifact {
            artifact_type: ArtifactType::File,
            result: None,
            file_info: None,
            engine_results: Some(vec![
                engine(EngineSubsystem::Av, "clamav"),
                engine(EngineSubsystem::Sandbox, "drakvuf"),
            ]),
            artifacts: None,
            network_objects: vec![],
        };
        let sibling = Artifact {
            artifact_type: ArtifactType::File,
            result: None,
            file_info: None,
            engine_results: Some(vec![engine(EngineSubsystem::Sandbox, "wrong-one")]),
            artifacts: None,
            network_objects: vec![],
        };
        let archive = Artifact {
            artifact_type: ArtifactType::Archive,
            result: None,
            file_info: None,
            // The archive itself has no behavioral result.
            engine_results: Some(vec![engine(EngineSubsystem::Static, "static")]),
            artifacts: Some(vec![payload, sibling]),
            network_objects: vec![],
        };

        let found = archive.find_sandbox_result().unwrap();
        assert_eq!(found.engine_code_name, "drakvuf");
    }

    #[test]
    fn archive_without_children_has_no_sandbox_result() {
        let archive = Artifact {
            artifact_type: ArtifactType::Archive,
            result: None,
            file_info: None,
            engine_results: Some(vec![engine(EngineSubsystem::Sandbox, "on-archive")]),
            artifacts: None,
            network_objects: vec![],
        };
        assert!(archive.find_sandbox_result().is_none());
    }

    #[test]
    fn static_result_found_in_place() {
        let file = Artifact {
            artifact_type: ArtifactType::File,
            result: None,
            file_info: None,
            engine_results: Some(vec![
                engine(EngineSubsystem::Sandbox, "drakvuf"),
                engine(EngineSubsystem::Static, "ptesc"),
            ]),
            artifacts: None,
            network_objects: vec![],
        };
        assert_eq!(
            file.find_static_result().unwrap().engine_code_name,
            "ptesc"
        );
    }

    #[test]
    fn check_response_carries_preflight_flag() {
        let body = serde_json::json!({
            "data": {"scan_id": "8e0b3eac-6f97-4ac9-9533-1a2b78e01e2a"},
            "errors": [],
            "is_preflight": true
        });
        let response: CheckTaskResponse = serde_json::from_value(body).unwrap();
        assert!(response.is_preflight);
    }
}
