//! The key-authenticated sandbox client.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::{Stream, StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, HeaderValue};
use tokio::io::AsyncReadExt;
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::api::requests::{
    CheckTaskRequest, CreateNewScanTaskRequest, CreateRescanTaskRequest, CreateScanTaskRequest,
    CreateUrlScanTaskRequest, DownloadArtifactRequest, ReportRequest, UploadedFile,
};
use crate::api::submit::{FileScanBuilder, NewScanBuilder, RescanBuilder, UrlScanBuilder};
use crate::api::wait::{wait_for_report, WaitOutcome, WaitPolicy};
use crate::config::ClientConfig;
use crate::core::envelope::Envelope;
use crate::core::error::{Result, SandboxError};
use crate::core::hash::ContentHash;
use crate::core::input::UploadSource;
use crate::core::key::ScanKey;
use crate::core::report::{CheckTaskResponse, TaskResponse, VmImage};
use crate::transport::JsonDecoder;

/// Files are read and forwarded in fixed-size pieces of this many bytes.
const UPLOAD_CHUNK: usize = 1024 * 1024;

/// Computes the read timeout for a scan-creation call.
///
/// Behavioral analysis duration is bounded and known up front, so the
/// worst-case wall time is derivable: four times the observation window
/// plus a pipeline allowance (larger for short scans, whose fixed
/// overhead dominates), plus a caller-supplied extra.
pub fn scan_read_timeout(analysis_duration: u32, extra: u64) -> Duration {
    let allowance = if analysis_duration < 80 { 300 } else { 120 };
    Duration::from_secs(u64::from(analysis_duration) * 4 + allowance + extra)
}

/// Computes the read timeout for a rescan call.
///
/// Rescans replay recorded traces instead of re-running the sample, so
/// the wait scales with 1.5x the original observation window, floored
/// at 70 seconds.
pub fn rescan_read_timeout(analysis_duration: u32, extra: u64) -> Duration {
    let base = if analysis_duration > 70 {
        (f64::from(analysis_duration) * 1.5).round() as u64
    } else {
        70
    };
    Duration::from_secs(base + extra)
}

/// Asynchronous client for the key-authenticated sandbox API.
///
/// One instance owns one connection pool and one upload admission
/// semaphore. The pool is long-lived; call [`SandboxClient::close`] when
/// the client is no longer needed.
///
/// # Example
///
/// ```rust,ignore
/// use sandkit::{ClientConfig, SandboxClient, ScanKey};
///
/// let key = ScanKey::new("lab", "api-key", "10.0.0.5");
/// let client = SandboxClient::new(key, ClientConfig::default())?;
///
/// let response = client.submit_file("/samples/dropper.exe").send().await?;
/// let report = client.wait_for_report(&response, 300.0).await.into_report();
/// ```
pub struct SandboxClient {
    key: ScanKey,
    config: ClientConfig,
    http: reqwest::Client,
    decoder: JsonDecoder,
    upload_slots: Arc<Semaphore>,
}

impl SandboxClient {
    /// Creates a client for the given endpoint key.
    pub fn new(key: ScanKey, config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut api_key = HeaderValue::from_str(key.expose_key())
            .map_err(|_| SandboxError::invalid_argument("API key is not a valid header value"))?;
        api_key.set_sensitive(true);
        headers.insert("X-Api-Key", api_key);

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(config.connect_timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs);
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }
        let http = builder.build()?;

        Ok(Self {
            decoder: JsonDecoder::new(config.debug_dump_dir.clone()),
            upload_slots: Arc::new(Semaphore::new(config.upload_concurrency)),
            key,
            config,
            http,
        })
    }

    /// Returns the endpoint key this client talks to.
    pub fn key(&self) -> &ScanKey {
        &self.key
    }

    /// Returns the configuration the client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Shuts the client down, dropping its connection pool.
    ///
    /// Callers must invoke this (or let a scope own the client) instead of
    /// relying on destructor timing to release connections.
    pub fn close(self) {
        tracing::debug!(endpoint = self.key.host(), "sandbox client closed");
        drop(self);
    }

    // ---- transfer layer -------------------------------------------------

    /// Uploads a file to remote temporary storage.
    ///
    /// At most `upload_concurrency` uploads are in flight per client;
    /// additional callers suspend until a slot frees up. The source is
    /// read in 1 MiB pieces and sent as one contiguous body, never with
    /// chunked transfer encoding, which the service does not tolerate.
    pub async fn upload_file(&self, source: impl Into<UploadSource>) -> Result<UploadedFile> {
        self.upload(source.into(), self.config.upload_timeout).await
    }

    /// Uploads an in-memory buffer to remote temporary storage.
    pub async fn upload_bytes(&self, data: impl Into<Vec<u8>>) -> Result<UploadedFile> {
        self.upload(UploadSource::from_bytes(data), self.config.upload_timeout)
            .await
    }

    pub(crate) async fn upload(
        &self,
        source: UploadSource,
        timeout: Duration,
    ) -> Result<UploadedFile> {
        let body = read_source(source).await?;
        let _permit = self
            .upload_slots
            .acquire()
            .await
            .expect("upload semaphore never closed");

        tracing::debug!(bytes = body.len(), "uploading file to temporary storage");
        let response = self
            .http
            .post(format!("{}/storage/uploadScanFile", self.key.url()))
            .timeout(timeout)
            .body(body)
            .send()
            .await?;

        let envelope: Envelope<UploadedFile> =
            self.decoder.decode("api_upload_scan_file", response).await?;
        envelope.into_data()
    }

    /// Downloads an artifact by content hash, fully buffered.
    pub async fn download_artifact(&self, hash: &ContentHash) -> Result<Bytes> {
        let response = self.download_request(hash).await?;
        Ok(response.bytes().await?)
    }

    /// Downloads an artifact by content hash as a lazy chunk sequence.
    ///
    /// The stream is finite and not restartable; collect it or fail.
    pub async fn download_artifact_stream(
        &self,
        hash: &ContentHash,
    ) -> Result<impl Stream<Item = Result<Bytes>>> {
        let response = self.download_request(hash).await?;
        Ok(response
            .bytes_stream()
            .map_err(SandboxError::from)
            .boxed())
    }

    async fn download_request(&self, hash: &ContentHash) -> Result<reqwest::Response> {
        let request = DownloadArtifactRequest {
            file_uri: hash.to_string(),
        };
        let response = self
            .http
            .post(format!("{}/storage/downloadArtifact", self.key.url()))
            .timeout(self.config.download_timeout)
            .json(&request)
            .send()
            .await?;
        JsonDecoder::expect_success(response)
    }

    /// Uploads an e-mail and returns its raw headers.
    pub async fn get_email_headers(&self, source: impl Into<UploadSource>) -> Result<Bytes> {
        let body = read_source(source.into()).await?;
        let _permit = self
            .upload_slots
            .acquire()
            .await
            .expect("upload semaphore never closed");

        let response = self
            .http
            .post(format!("{}/analysis/getHeaders", self.key.url()))
            .timeout(self.config.read_timeout)
            .body(body)
            .send()
            .await?;
        let response = JsonDecoder::expect_success(response)?;
        Ok(response.bytes().await?)
    }

    /// Lists the VM images installed on the endpoint.
    pub async fn get_images(&self) -> Result<Vec<VmImage>> {
        let response = self
            .http
            .post(format!("{}/engines/sandbox/getImages", self.key.url()))
            .timeout(self.config.read_timeout)
            .send()
            .await?;
        let envelope: Envelope<Vec<VmImage>> =
            self.decoder.decode("api_get_images", response).await?;
        envelope.into_data()
    }

    // ---- submission -----------------------------------------------------

    /// Starts building a file scan. Finish with
    /// [`send`](FileScanBuilder::send).
    pub fn submit_file(&self, source: impl Into<UploadSource>) -> FileScanBuilder<'_> {
        FileScanBuilder::new(self, source.into())
    }

    /// Starts building a URL scan.
    pub fn submit_url(&self, url: impl Into<String>) -> UrlScanBuilder<'_> {
        UrlScanBuilder::new(self, url.into())
    }

    /// Starts building a rescan from a recorded event trace and network
    /// capture, used to exercise correlation rules without re-running the
    /// sample.
    pub fn submit_rescan(
        &self,
        raw_trace: impl Into<UploadSource>,
        raw_network: impl Into<UploadSource>,
    ) -> RescanBuilder<'_> {
        RescanBuilder::new(self, raw_trace.into(), raw_network.into())
    }

    /// Starts building a file scan against the new-generation endpoint.
    ///
    /// Not available on every endpoint.
    pub fn submit_file_v2(&self, source: impl Into<UploadSource>) -> NewScanBuilder<'_> {
        NewScanBuilder::new(self, source.into())
    }

    pub(crate) async fn create_scan(
        &self,
        request: CreateScanTaskRequest,
        extra_read_timeout: u64,
    ) -> Result<TaskResponse> {
        let timeout = scan_read_timeout(request.options.sandbox.analysis_duration, extra_read_timeout);
        self.post_task("analysis/createScanTask", &request, timeout, "api_create_scan")
            .await
    }

    pub(crate) async fn create_scan_url(
        &self,
        request: CreateUrlScanTaskRequest,
        extra_read_timeout: u64,
    ) -> Result<TaskResponse> {
        let timeout = scan_read_timeout(request.options.sandbox.analysis_duration, extra_read_timeout);
        self.post_task(
            "analysis/createScanURLTask",
            &request,
            timeout,
            "api_create_scan_url",
        )
        .await
    }

    pub(crate) async fn create_rescan(
        &self,
        request: CreateRescanTaskRequest,
        extra_read_timeout: u64,
    ) -> Result<TaskResponse> {
        let timeout =
            rescan_read_timeout(request.options.sandbox.analysis_duration, extra_read_timeout);
        self.post_task(
            "analysis/createRetroTask",
            &request,
            timeout,
            "api_create_rescan",
        )
        .await
    }

    pub(crate) async fn create_scan_new(
        &self,
        request: CreateNewScanTaskRequest,
        extra_read_timeout: u64,
    ) -> Result<TaskResponse> {
        let timeout = scan_read_timeout(request.sandbox.analysis_duration, extra_read_timeout);
        let response = self
            .http
            .post(format!("{}/analysis/createBAScanTask", self.key.debug_url()))
            .timeout(timeout)
            .json(&request)
            .send()
            .await?;
        self.decoder.decode("api_create_scan_new", response).await
    }

    async fn post_task<B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
        context: &str,
    ) -> Result<TaskResponse> {
        let response = self
            .http
            .post(format!("{}/{}", self.key.url(), path))
            .timeout(timeout)
            .json(body)
            .send()
            .await?;
        self.decoder.decode(context, response).await
    }

    // ---- status ---------------------------------------------------------

    /// Checks whether a task has finished, allowing preflight results.
    pub async fn check_task(&self, scan_id: Uuid) -> Result<CheckTaskResponse> {
        let request = CheckTaskRequest {
            scan_id,
            allow_preflight: true,
        };
        let response = self
            .http
            .post(format!("{}/analysis/checkTask", self.key.url()))
            .timeout(self.config.read_timeout)
            .json(&request)
            .send()
            .await?;
        self.decoder.decode("api_check_task", response).await
    }

    /// Fetches the full report for a task.
    ///
    /// Only the key the analysis was started with can see the result.
    pub async fn get_report(&self, scan_id: Uuid) -> Result<TaskResponse> {
        let request = ReportRequest { scan_id };
        let response = self
            .http
            .post(format!("{}/analysis/report", self.key.url()))
            .timeout(self.config.read_timeout)
            .json(&request)
            .send()
            .await?;
        self.decoder.decode("api_report", response).await
    }

    /// Polls until `initial`'s task has a long report, the time budget
    /// `budget_secs` runs out, or the error budget is exhausted.
    ///
    /// See [`wait_for_report`] for the polling contract.
    pub async fn wait_for_report(
        &self,
        initial: &TaskResponse,
        budget_secs: f64,
    ) -> WaitOutcome {
        wait_for_report(self, initial, budget_secs, WaitPolicy::default()).await
    }
}

impl std::fmt::Debug for SandboxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SandboxClient")
            .field("endpoint", &self.key.host())
            .field("upload_concurrency", &self.config.upload_concurrency)
            .finish()
    }
}

/// Reads a source into one contiguous body, 1 MiB at a time.
async fn read_source(source: UploadSource) -> Result<Vec<u8>> {
    let body = match source {
        UploadSource::Bytes { data, .. } => data,
        UploadSource::Path(path) => {
            let file = tokio::fs::File::open(&path).await?;
            drain_reader(file).await?
        }
        UploadSource::Reader { reader, .. } => drain_reader(reader).await?,
    };
    if body.is_empty() {
        return Err(SandboxError::invalid_argument("upload source is empty"));
    }
    Ok(body)
}

async fn drain_reader(mut reader: impl tokio::io::AsyncRead + Unpin) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    let mut chunk = vec![0u8; UPLOAD_CHUNK];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_client(concurrency: usize) -> SandboxClient {
        SandboxClient::new(
            ScanKey::new("lab", "secret", "127.0.0.1"),
            ClientConfig::default().with_upload_concurrency(concurrency),
        )
        .unwrap()
    }

    #[test]
    fn scan_timeout_formula() {
        assert_eq!(scan_read_timeout(60, 0), Duration::from_secs(540));
        assert_eq!(scan_read_timeout(120, 0), Duration::from_secs(600));
        assert_eq!(scan_read_timeout(79, 0), Duration::from_secs(616));
        assert_eq!(scan_read_timeout(80, 0), Duration::from_secs(440));
        assert_eq!(scan_read_timeout(60, 30), Duration::from_secs(570));
    }

    #[test]
    fn rescan_timeout_formula() {
        assert_eq!(rescan_read_timeout(60, 0), Duration::from_secs(70));
        assert_eq!(rescan_read_timeout(70, 0), Duration::from_secs(70));
        assert_eq!(rescan_read_timeout(100, 0), Duration::from_secs(150));
        assert_eq!(rescan_read_timeout(60, 15), Duration::from_secs(85));
    }

    #[tokio::test]
    async fn empty_source_rejected_before_any_network_call() {
        let err = read_source(UploadSource::from_bytes(Vec::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, SandboxError::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn reader_source_drained_in_full() {
        let data = vec![7u8; UPLOAD_CHUNK + 11];
        let source = UploadSource::from_reader(std::io::Cursor::new(data.clone()));
        let body = read_source(source).await.unwrap();
        assert_eq!(body, data);
    }

    #[tokio::test]
    async fn fifth_concurrent_upload_waits_for_a_slot() {
        let client = Arc::new(test_client(4));
        let in_flight = Arc::new(AtomicUsize::new(0));

        let mut permits = Vec::new();
        for _ in 0..4 {
            let permit = client.upload_slots.clone().acquire_owned().await.unwrap();
            in_flight.fetch_add(1, Ordering::SeqCst);
            permits.push(permit);
        }

        let fifth = {
            let client = Arc::clone(&client);
            let in_flight = Arc::clone(&in_flight);
            tokio::spawn(async move {
                let _permit = client.upload_slots.clone().acquire_owned().await.unwrap();
                in_flight.fetch_add(1, Ordering::SeqCst);
            })
        };

        // Give the fifth task a chance to (incorrectly) get through.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(in_flight.load(Ordering::SeqCst), 4);

        // A released slot admits it.
        drop(permits.pop());
        fifth.await.unwrap();
        assert_eq!(in_flight.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn slot_released_on_drop_even_after_error_paths() {
        let client = test_client(1);
        {
            let _permit = client.upload_slots.acquire().await.unwrap();
            assert_eq!(client.upload_slots.available_permits(), 0);
        }
        assert_eq!(client.upload_slots.available_permits(), 1);
    }
}
