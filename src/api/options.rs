//! Scan option schemas.
//!
//! Two generations of the scan-creation endpoint exist, each with its own
//! option schema: [`ScanOptions`]/[`SandboxOptions`] for the legacy
//! endpoints and [`SandboxOptionsNew`] for the new one. They are not
//! interchangeable and the request types keep them apart.
//!
//! Unset optional fields are omitted from the emitted JSON entirely; the
//! service rejects explicit nulls.

use serde::Serialize;

use crate::core::enums::VncMode;
use crate::core::error::{Result, SandboxError};

/// Behavioral-analysis duration bounds, in seconds.
pub const ANALYSIS_DURATION_RANGE: std::ops::RangeInclusive<u32> = 10..=600;

/// Debug switches understood by the analysis workers.
///
/// Every field is optional; only explicitly set switches are serialized.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DebugOptions {
    /// Keep the sandbox VM alive after the scan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_sandbox: Option<bool>,

    /// Skip the data-collection phase entirely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_work: Option<bool>,

    /// Extract crash dumps from the VM.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract_crashdumps: Option<bool>,

    /// Save files needed for debugging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_debug_files: Option<bool>,

    /// URL of a compiled normalization/correlation rules bundle to use
    /// instead of the built-in one. Filled in automatically when a rules
    /// bundle is attached to a submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules_url: Option<String>,

    /// Replace data collection with an equivalent idle wait.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_work: Option<bool>,

    /// Disable syscall hooking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_syscall_hooks: Option<bool>,

    /// Disable DLL hooking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_dll_hooks: Option<bool>,

    /// URL of a custom syscall hook list, one name per line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_syscall_hooks: Option<String>,

    /// URL of a custom user-function hook list in apimon plugin format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_dll_hooks: Option<String>,

    /// Do not re-run the task after a scan error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_retries: Option<bool>,

    /// Enable the "sanitizers" debug group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_sanitizers: Option<bool>,

    /// IP addresses the VM may connect out to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_outbound_connections: Option<Vec<String>>,

    /// Regex over raw events marking the end of the sample's useful work.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_completion_event: Option<String>,

    /// Do not dump the sample's memory at the end of observation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_procdump_on_finish: Option<bool>,

    /// Do not synchronize VM time with the host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_update_time: Option<bool>,

    /// Suppress interactive-analysis lifecycle notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_manual_scan_events: Option<bool>,

    /// Maximum VM boot wait in seconds for bootkit monitoring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bootkitmon_boot_timeout: Option<u32>,

    /// URL of a file listing processes (path regexes) to skip when
    /// dumping memory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_procdump_exclude: Option<String>,

    /// URL of a file listing files (path regexes) not to extract.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fileextractor_exclude: Option<String>,

    /// Require every plugin to log at least one event during the run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate_plugins: Option<bool>,

    /// URL of a script run inside the VM right before the analysis starts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_vm_init_url: Option<String>,
}

/// Heuristics that mark files as suspicious during decomposition.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SuspiciousFileOptions {
    /// Encrypted file that could not be unpacked.
    pub encrypted_not_unpacked: bool,
    /// Decomposition depth was exceeded.
    pub max_depth_exceeded: bool,
    /// Encrypted office document.
    pub office_encrypted: bool,
    /// Office document with macros.
    pub office_has_macros: bool,
    /// Office document with embedded objects.
    pub office_has_embedded: bool,
    /// Office document with ActiveX elements.
    pub office_has_active_x: bool,
    /// Office document with dynamic data exchange.
    pub office_has_dde: bool,
    /// Office document with remote data.
    pub office_has_remote_data: bool,
    /// Office document with a remote template.
    pub office_has_remote_template: bool,
    /// Office document with an Action.
    pub office_has_action: bool,
    /// Encrypted PDF.
    pub pdf_encrypted: bool,
    /// PDF with embedded objects.
    pub pdf_has_embedded: bool,
    /// PDF with an OpenAction.
    pub pdf_has_open_action: bool,
    /// PDF with an Action.
    pub pdf_has_action: bool,
    /// PDF with JavaScript.
    pub pdf_has_javascript: bool,
}

/// Behavioral-analysis options for the legacy scan-creation endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct SandboxOptions {
    /// Run behavioral analysis at all.
    pub enabled: bool,

    /// VM image identifier.
    pub image_id: String,

    /// Command line used to start the sample; `{file}` expands to the
    /// sample path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_command: Option<String>,

    /// Dump all spawned processes still alive at the end of the run.
    pub procdump_new_processes_on_finish: bool,

    /// Observation duration in seconds; valid range is
    /// [`ANALYSIS_DURATION_RANGE`].
    pub analysis_duration: u32,

    /// Run bootkit monitoring.
    pub bootkitmon: bool,

    /// Observation duration of the bootkit-monitoring stage in seconds.
    pub analysis_duration_bootkitmon: u32,

    /// Record a video of the VM screen.
    pub save_video: bool,

    /// Intercept and re-sign TLS traffic.
    pub mitm_enabled: bool,

    /// Debug switches.
    pub debug_options: DebugOptions,
}

impl Default for SandboxOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            image_id: "win7-sp1-x64".into(),
            custom_command: None,
            procdump_new_processes_on_finish: false,
            analysis_duration: 300,
            bootkitmon: false,
            analysis_duration_bootkitmon: 60,
            save_video: true,
            mitm_enabled: true,
            debug_options: DebugOptions {
                save_debug_files: Some(false),
                ..DebugOptions::default()
            },
        }
    }
}

impl SandboxOptions {
    pub(crate) fn validate(&self) -> Result<()> {
        validate_duration(self.analysis_duration)?;
        if self.bootkitmon {
            validate_duration(self.analysis_duration_bootkitmon)?;
        }
        Ok(())
    }
}

/// Top-level options for the legacy scan-creation endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ScanOptions {
    /// Maximum decomposition depth for containers; 0 disables
    /// decomposition entirely.
    pub analysis_depth: u32,

    /// Passwords tried when unpacking encrypted archives.
    pub passwords_for_unpack: Vec<String>,

    /// Reuse results of earlier scans of the same object.
    pub cache_enabled: bool,

    /// Extract URLs from scanned objects.
    pub url_extract_enabled: bool,

    /// Suspicious-file marking heuristics. When unset the endpoint's own
    /// configuration applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mark_suspicious_files_options: Option<SuspiciousFileOptions>,

    /// Behavioral-analysis options.
    pub sandbox: SandboxOptions,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            analysis_depth: 0,
            passwords_for_unpack: vec![],
            cache_enabled: false,
            url_extract_enabled: false,
            mark_suspicious_files_options: None,
            sandbox: SandboxOptions::default(),
        }
    }
}

impl ScanOptions {
    pub(crate) fn validate(&self) -> Result<()> {
        self.sandbox.validate()
    }
}

/// An extra file planted into the VM before the run.
#[derive(Debug, Clone, Serialize)]
pub struct ExtraFile {
    /// Storage reference of the uploaded file.
    pub uri: String,
    /// Path/name inside the VM.
    pub name: String,
}

/// Behavioral-analysis options for the new-generation scan endpoint.
///
/// Not available on every endpoint; the new endpoint lives on the debug
/// API host.
#[derive(Debug, Clone, Serialize)]
pub struct SandboxOptionsNew {
    /// VM image identifier.
    pub image_id: String,

    /// Command line used to start the sample; `{file}` expands to the
    /// sample path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_command: Option<String>,

    /// Dump all spawned processes still alive at the end of the run.
    pub procdump_new_processes_on_finish: bool,

    /// Observation duration in seconds.
    pub analysis_duration: u32,

    /// Run bootkit monitoring.
    pub bootkitmon: bool,

    /// Observation duration of the bootkit-monitoring stage in seconds.
    pub analysis_duration_bootkitmon: u32,

    /// Record a video of the VM screen.
    pub save_video: bool,

    /// Intercept and re-sign TLS traffic.
    pub mitm_enabled: bool,

    /// Do not run the auto-clicker.
    pub disable_clicker: bool,

    /// Plant the sample but do not start it.
    pub skip_sample_run: bool,

    /// VNC access mode.
    pub vnc_mode: VncMode,

    /// Debug switches.
    pub debug_options: DebugOptions,

    /// Extra files planted into the VM.
    pub extra_files: Vec<ExtraFile>,
}

impl Default for SandboxOptionsNew {
    fn default() -> Self {
        Self {
            image_id: "win7-sp1-x64".into(),
            custom_command: None,
            procdump_new_processes_on_finish: false,
            analysis_duration: 300,
            bootkitmon: false,
            analysis_duration_bootkitmon: 60,
            save_video: true,
            mitm_enabled: true,
            disable_clicker: false,
            skip_sample_run: false,
            vnc_mode: VncMode::Disabled,
            debug_options: DebugOptions {
                save_debug_files: Some(false),
                ..DebugOptions::default()
            },
            extra_files: vec![],
        }
    }
}

impl SandboxOptionsNew {
    pub(crate) fn validate(&self) -> Result<()> {
        validate_duration(self.analysis_duration)?;
        if self.bootkitmon {
            validate_duration(self.analysis_duration_bootkitmon)?;
        }
        Ok(())
    }
}

fn validate_duration(seconds: u32) -> Result<()> {
    if ANALYSIS_DURATION_RANGE.contains(&seconds) {
        Ok(())
    } else {
        Err(SandboxError::invalid_argument(format!(
            "analysis duration {seconds}s outside [{}, {}]",
            ANALYSIS_DURATION_RANGE.start(),
            ANALYSIS_DURATION_RANGE.end()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_debug_options_are_omitted() {
        let options = DebugOptions {
            keep_sandbox: Some(true),
            ..DebugOptions::default()
        };
        let value = serde_json::to_value(&options).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["keep_sandbox"], true);
        assert!(!object.contains_key("rules_url"));
    }

    #[test]
    fn default_sandbox_options_serialize_without_nulls() {
        let options = SandboxOptions::default();
        let value = serde_json::to_value(&options).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("custom_command"));
        assert_eq!(object["image_id"], "win7-sp1-x64");
        assert_eq!(object["analysis_duration"], 300);
        assert_eq!(object["debug_options"]["save_debug_files"], false);
    }

    #[test]
    fn duration_bounds_validated() {
        let mut options = SandboxOptions::default();
        options.analysis_duration = 9;
        assert!(options.validate().is_err());
        options.analysis_duration = 10;
        assert!(options.validate().is_ok());
        options.analysis_duration = 600;
        assert!(options.validate().is_ok());
        options.analysis_duration = 601;
        assert!(options.validate().is_err());
    }

    #[test]
    fn bootkitmon_duration_checked_only_when_enabled() {
        let mut options = SandboxOptionsNew::default();
        options.analysis_duration_bootkitmon = 5;
        assert!(options.validate().is_ok());
        options.bootkitmon = true;
        assert!(options.validate().is_err());
    }

    #[test]
    fn suspicious_options_only_sent_when_set() {
        let options = ScanOptions::default();
        let value = serde_json::to_value(&options).unwrap();
        assert!(!value
            .as_object()
            .unwrap()
            .contains_key("mark_suspicious_files_options"));
    }
}
