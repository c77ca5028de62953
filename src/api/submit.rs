//! Builders for scan submissions.
//!
//! Each builder uploads its payloads (sample, raw traces, optional custom
//! rules bundle) and then posts one structured scan-creation request.

use std::time::Duration;

use crate::api::client::SandboxClient;
use crate::api::options::{SandboxOptionsNew, ScanOptions};
use crate::api::requests::{
    CreateNewScanTaskRequest, CreateRescanTaskRequest, CreateScanTaskRequest,
    CreateUrlScanTaskRequest,
};
use crate::core::error::Result;
use crate::core::input::UploadSource;
use crate::core::report::TaskResponse;

/// Minimal PDF sent as the dummy sample of a rescan; the analysis replays
/// the recorded traces, so the sample content is irrelevant.
const DUMMY_SAMPLE: &[u8] = b"%PDF-1.4\n1 0 obj<</Type/Catalog/Pages 2 0 R>>endobj\n2 0 obj<</Type/Pages/Kids[3 0 R]/Count 1>>endobj\n3 0 obj<</Type/Page/Parent 2 0 R/MediaBox[0 0 612 792]>>endobj\ntrailer<</Root 1 0 R>>\n%%EOF\n";
const DUMMY_SAMPLE_NAME: &str = "sample.pdf";

/// Builder for a file scan against the legacy endpoint.
pub struct FileScanBuilder<'a> {
    client: &'a SandboxClient,
    source: UploadSource,
    file_name: Option<String>,
    rules: Option<Vec<u8>>,
    options: ScanOptions,
    extra_read_timeout: u64,
    upload_timeout: Option<Duration>,
    async_result: bool,
    short_result: bool,
}

impl<'a> FileScanBuilder<'a> {
    pub(crate) fn new(client: &'a SandboxClient, source: UploadSource) -> Self {
        Self {
            client,
            source,
            file_name: None,
            rules: None,
            options: ScanOptions::default(),
            extra_read_timeout: 0,
            upload_timeout: None,
            async_result: false,
            short_result: false,
        }
    }

    /// Sets the display name of the sample.
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Attaches a compiled correlation-rules bundle; it is uploaded first
    /// and referenced through the debug options.
    pub fn rules(mut self, rules: impl Into<Vec<u8>>) -> Self {
        self.rules = Some(rules.into());
        self
    }

    /// Replaces the scan options.
    pub fn options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Adds seconds on top of the computed scan read timeout.
    pub fn extra_read_timeout(mut self, seconds: u64) -> Self {
        self.extra_read_timeout = seconds;
        self
    }

    /// Overrides the upload timeout for this submission.
    pub fn upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = Some(timeout);
        self
    }

    /// Requests only the task id; results are polled separately.
    pub fn async_result(mut self, enabled: bool) -> Self {
        self.async_result = enabled;
        self
    }

    /// Requests the overall result without artifact detail. Only
    /// meaningful when `async_result` is off.
    pub fn short_result(mut self, enabled: bool) -> Self {
        self.short_result = enabled;
        self
    }

    /// Uploads the sample (and rules, if any) and creates the scan task.
    pub async fn send(mut self) -> Result<TaskResponse> {
        self.options.validate()?;

        let upload_timeout = self
            .upload_timeout
            .unwrap_or(self.client.config().upload_timeout);
        let file_name = self.file_name.or_else(|| self.source.display_name());

        let uploaded = self.client.upload(self.source, upload_timeout).await?;
        if let Some(rules) = self.rules {
            let uploaded_rules = self
                .client
                .upload(UploadSource::from_bytes(rules), upload_timeout)
                .await?;
            self.options.sandbox.debug_options.rules_url = Some(uploaded_rules.file_uri);
        }

        let request = CreateScanTaskRequest {
            file_uri: uploaded.file_uri,
            file_name,
            async_result: self.async_result,
            short_result: self.short_result,
            options: self.options,
        };
        self.client
            .create_scan(request, self.extra_read_timeout)
            .await
    }
}

/// Builder for a URL scan.
pub struct UrlScanBuilder<'a> {
    client: &'a SandboxClient,
    url: String,
    rules: Option<Vec<u8>>,
    options: ScanOptions,
    extra_read_timeout: u64,
    async_result: bool,
    short_result: bool,
}

impl<'a> UrlScanBuilder<'a> {
    pub(crate) fn new(client: &'a SandboxClient, url: String) -> Self {
        Self {
            client,
            url,
            rules: None,
            options: ScanOptions::default(),
            extra_read_timeout: 0,
            async_result: false,
            short_result: false,
        }
    }

    /// Attaches a compiled correlation-rules bundle.
    pub fn rules(mut self, rules: impl Into<Vec<u8>>) -> Self {
        self.rules = Some(rules.into());
        self
    }

    /// Replaces the scan options.
    pub fn options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Adds seconds on top of the computed scan read timeout.
    pub fn extra_read_timeout(mut self, seconds: u64) -> Self {
        self.extra_read_timeout = seconds;
        self
    }

    /// Requests only the task id.
    pub fn async_result(mut self, enabled: bool) -> Self {
        self.async_result = enabled;
        self
    }

    /// Requests the overall result without artifact detail.
    pub fn short_result(mut self, enabled: bool) -> Self {
        self.short_result = enabled;
        self
    }

    /// Uploads the rules (if any) and creates the URL scan task.
    pub async fn send(mut self) -> Result<TaskResponse> {
        self.options.validate()?;

        if let Some(rules) = self.rules {
            let uploaded_rules = self.client.upload_bytes(rules).await?;
            self.options.sandbox.debug_options.rules_url = Some(uploaded_rules.file_uri);
        }

        let request = CreateUrlScanTaskRequest {
            url: self.url,
            async_result: self.async_result,
            short_result: self.short_result,
            options: self.options,
        };
        self.client
            .create_scan_url(request, self.extra_read_timeout)
            .await
    }
}

/// Builder for a rescan replaying recorded traces through the
/// correlation pipeline.
pub struct RescanBuilder<'a> {
    client: &'a SandboxClient,
    raw_trace: UploadSource,
    raw_network: UploadSource,
    rules: Option<Vec<u8>>,
    options: ScanOptions,
    extra_read_timeout: u64,
    async_result: bool,
}

impl<'a> RescanBuilder<'a> {
    pub(crate) fn new(
        client: &'a SandboxClient,
        raw_trace: UploadSource,
        raw_network: UploadSource,
    ) -> Self {
        Self {
            client,
            raw_trace,
            raw_network,
            rules: None,
            options: ScanOptions::default(),
            extra_read_timeout: 0,
            async_result: false,
        }
    }

    /// Attaches a compiled correlation-rules bundle.
    pub fn rules(mut self, rules: impl Into<Vec<u8>>) -> Self {
        self.rules = Some(rules.into());
        self
    }

    /// Replaces the scan options.
    pub fn options(mut self, options: ScanOptions) -> Self {
        self.options = options;
        self
    }

    /// Adds seconds on top of the computed rescan read timeout.
    pub fn extra_read_timeout(mut self, seconds: u64) -> Self {
        self.extra_read_timeout = seconds;
        self
    }

    /// Requests only the task id.
    pub fn async_result(mut self, enabled: bool) -> Self {
        self.async_result = enabled;
        self
    }

    /// Uploads the dummy sample, both traces and the rules (if any), then
    /// creates the rescan task.
    pub async fn send(mut self) -> Result<TaskResponse> {
        self.options.validate()?;

        let dummy = self.client.upload_bytes(DUMMY_SAMPLE).await?;
        let trace = self.client.upload_file(self.raw_trace).await?;
        let network = self.client.upload_file(self.raw_network).await?;

        if let Some(rules) = self.rules {
            let uploaded_rules = self.client.upload_bytes(rules).await?;
            self.options.sandbox.debug_options.rules_url = Some(uploaded_rules.file_uri);
        }

        let request = CreateRescanTaskRequest {
            file_uri: dummy.file_uri,
            file_name: Some(DUMMY_SAMPLE_NAME.into()),
            raw_events_uri: Some(trace.file_uri),
            raw_network_uri: Some(network.file_uri),
            async_result: self.async_result,
            short_result: false,
            options: self.options,
        };
        self.client
            .create_rescan(request, self.extra_read_timeout)
            .await
    }
}

/// Builder for a file scan against the new-generation endpoint.
pub struct NewScanBuilder<'a> {
    client: &'a SandboxClient,
    source: UploadSource,
    file_name: Option<String>,
    rules: Option<Vec<u8>>,
    options: SandboxOptionsNew,
    priority: u8,
    extra_read_timeout: u64,
    upload_timeout: Option<Duration>,
    async_result: bool,
    short_result: bool,
}

impl<'a> NewScanBuilder<'a> {
    pub(crate) fn new(client: &'a SandboxClient, source: UploadSource) -> Self {
        Self {
            client,
            source,
            file_name: None,
            rules: None,
            options: SandboxOptionsNew::default(),
            priority: 3,
            extra_read_timeout: 0,
            upload_timeout: None,
            async_result: false,
            short_result: false,
        }
    }

    /// Sets the display name of the sample.
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Attaches a compiled correlation-rules bundle.
    pub fn rules(mut self, rules: impl Into<Vec<u8>>) -> Self {
        self.rules = Some(rules.into());
        self
    }

    /// Replaces the behavioral-analysis options.
    pub fn options(mut self, options: SandboxOptionsNew) -> Self {
        self.options = options;
        self
    }

    /// Sets the queue priority, clamped to 1..=4.
    pub fn priority(mut self, priority: u8) -> Self {
        self.priority = priority.clamp(1, 4);
        self
    }

    /// Adds seconds on top of the computed scan read timeout.
    pub fn extra_read_timeout(mut self, seconds: u64) -> Self {
        self.extra_read_timeout = seconds;
        self
    }

    /// Overrides the upload timeout for this submission.
    pub fn upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = Some(timeout);
        self
    }

    /// Requests only the task id.
    pub fn async_result(mut self, enabled: bool) -> Self {
        self.async_result = enabled;
        self
    }

    /// Requests the overall result without artifact detail.
    pub fn short_result(mut self, enabled: bool) -> Self {
        self.short_result = enabled;
        self
    }

    /// Uploads the sample (and rules, if any) and creates the scan task.
    pub async fn send(mut self) -> Result<TaskResponse> {
        self.options.validate()?;

        let upload_timeout = self
            .upload_timeout
            .unwrap_or(self.client.config().upload_timeout);
        let file_name = self.file_name.or_else(|| self.source.display_name());

        let uploaded = self.client.upload(self.source, upload_timeout).await?;
        if let Some(rules) = self.rules {
            let uploaded_rules = self
                .client
                .upload(UploadSource::from_bytes(rules), upload_timeout)
                .await?;
            self.options.debug_options.rules_url = Some(uploaded_rules.file_uri);
        }

        let request = CreateNewScanTaskRequest {
            file_uri: uploaded.file_uri,
            file_name,
            short_result: self.short_result,
            async_result: self.async_result,
            priority: self.priority,
            sandbox: self.options,
        };
        self.client
            .create_scan_new(request, self.extra_read_timeout)
            .await
    }
}
