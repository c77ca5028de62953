//! Models of the session-authenticated UI API: task listings and the
//! entry-point descriptor.
//!
//! The wire encodes the entry point as one record with ~13 all-optional
//! payload fields, at most one of which is populated. Here it is an
//! explicit [`EntryPointDetails`] variant keyed by the `type` field; a
//! record with more than one populated payload is a contract violation
//! and logged.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::enums::{
    DeliveryStatus, DpiState, EmailDisposition, EngineName, EntryPointAction, EntryPointStatus,
    EntryPointType, MailAction, ObjectKind, QuarantineEventType, ScanState, ThreatClassification,
    ThreatPlatform, Verdict,
};

/// Query parameters of `GET /v2/tasks`.
#[derive(Debug, Clone, Serialize)]
pub struct TaskQuery {
    /// Maximum number of records returned (0..=200).
    pub limit: u32,

    /// Pagination cursor from a previous page.
    #[serde(rename = "nextCursor", skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,

    /// Offset of the returned records; relative to the cursor if one is
    /// set (0..=10000).
    pub offset: u32,

    /// Filter in the service's query language, e.g.
    /// `age < 30d AND (task.correlated.state != UNKNOWN) ORDER BY start desc`.
    pub query: String,

    /// The caller's offset from UTC, applied to times inside `query`.
    #[serde(rename = "utcOffsetSeconds")]
    pub utc_offset_seconds: i32,
}

impl Default for TaskQuery {
    fn default() -> Self {
        Self {
            limit: 20,
            next_cursor: None,
            offset: 0,
            query: String::new(),
            utc_offset_seconds: 0,
        }
    }
}

impl TaskQuery {
    /// Creates a query with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.min(200);
        self
    }

    /// Continues from a pagination cursor.
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.next_cursor = Some(cursor.into());
        self
    }

    /// Sets the record offset.
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Replaces the filter expression.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Restricts results to tasks started inside `[from, to]`.
    pub fn filter_date_range(mut self, from: NaiveDateTime, to: NaiveDateTime) -> Self {
        let clause = format!(
            "(start >= {} AND start <= {})",
            from.format("%Y-%m-%dT%H:%M:%S"),
            to.format("%Y-%m-%dT%H:%M:%S"),
        );
        self.query.push_str(&clause);
        self
    }

    /// Restricts results to tasks that did (or did not) reach behavioral
    /// analysis.
    pub fn filter_sandboxed(mut self, sandboxed: bool) -> Self {
        if sandboxed {
            self.query
                .push_str(" AND (sandbox.state IN (UNSCANNED, PARTIAL, FULL))");
        } else {
            self.query.push_str(
                " AND (task.sandbox.correlated.state = UNKNOWN AND task.correlated.state IN (FULL,UNSCANNED,PARTIAL))",
            );
        }
        self
    }

    /// Orders results newest first.
    pub fn order_by_start_desc(mut self) -> Self {
        self.query.push_str(" ORDER BY start desc");
        self
    }
}

/// Combined verdict information produced by correlation.
#[derive(Debug, Clone, Deserialize)]
pub struct CorrelationInfo {
    /// Correlation completeness.
    pub state: ScanState,

    /// Threat class (VIRUS, SPAM, WORM, ...).
    #[serde(rename = "threatClassification")]
    pub threat_classification: ThreatClassification,

    /// Threat level.
    #[serde(rename = "threatLevel")]
    pub threat_level: Verdict,

    /// Priority of the verdict.
    #[serde(default, rename = "verdictPriority")]
    pub verdict_priority: Option<i64>,

    /// Platform of the threat.
    #[serde(rename = "threatPlatform")]
    pub threat_platform: ThreatPlatform,
}

/// Per-recipient outcome of processing a mail task.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailResult {
    /// Recipient address.
    pub recipient: String,
    /// Action taken for the recipient.
    pub action: MailAction,
    /// What the recipient received.
    pub email_type: EmailDisposition,
    /// Whether delivery succeeded.
    pub delivery_status: DeliveryStatus,
    /// Downstream SMTP server address.
    pub server_address: String,
    /// Downstream SMTP server port.
    pub server_port: u16,
}

/// Description of a captured HTTP request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpExchange {
    /// `Referer` header value.
    pub referer: String,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// `Host` header value.
    pub host: String,
    /// Full request URL.
    pub uri: String,
}

/// One quarantine lifecycle event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarantineEvent {
    /// Event kind.
    #[serde(rename = "type")]
    pub kind: QuarantineEventType,

    /// Event time (UNIX timestamp).
    pub time: i64,

    /// User that released the object (SEND only).
    #[serde(default)]
    pub user_id: Option<String>,

    /// SMTP host used for release (SEND only).
    #[serde(default)]
    pub smtp_host: Option<String>,

    /// SMTP port used for release (SEND only).
    #[serde(default)]
    pub smtp_port: Option<u16>,

    /// Recipients of the release (SEND only).
    #[serde(default)]
    pub recipients: Option<Vec<String>>,
}

/// Quarantine status of a task's object.
#[derive(Debug, Clone, Deserialize)]
pub struct QuarantineInfo {
    /// Quarantine state.
    pub state: String,

    /// Lifecycle events; only present in summary responses.
    #[serde(default)]
    pub events: Option<Vec<QuarantineEvent>>,
}

/// SMTP session information shared by the mail-flavored entry points.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailSessionInfo {
    /// Sender from the SMTP session (`MAIL FROM`).
    pub from_address: String,

    /// Recipients from the SMTP session (`RCPT TO`).
    pub recipients: Vec<String>,
}

/// Mail session info plus per-recipient outcomes (agent/gateway flows).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailFlowInfo {
    /// Sender from the SMTP session (`MAIL FROM`).
    pub from_address: String,

    /// Recipients from the SMTP session (`RCPT TO`).
    pub recipients: Vec<String>,

    /// Per-recipient outcomes; only present in summary responses.
    #[serde(default)]
    pub mail_results: Option<Vec<MailResult>>,
}

/// ICAP session information.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IcapInfo {
    /// ICAP method (RESPMOD, REQMOD).
    pub method: String,
    /// ICAP service address.
    pub url: String,
    /// ICAP version.
    pub version: String,
    /// `X-Client-IP` header value.
    pub client_ip: String,
    /// `X-Client-Username` header value.
    pub client_username: String,
}

/// SMTP detail of a DPI capture.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DpiSmtpInfo {
    /// `Message-Id` header of the captured message.
    pub message_id: String,
    /// Sender from the message's `From` header.
    pub sender: String,
}

/// Traffic-capture entry point information.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DpiInfo {
    /// Source IP of the captured object.
    pub src_ip: String,
    /// Source port.
    pub src_port: u16,
    /// Destination IP.
    pub dst_ip: String,
    /// Destination port.
    pub dst_port: u16,
    /// Protocol; HTTP and SMTP add the matching detail field.
    pub proto: String,
    /// Capture completeness.
    pub state: DpiState,
    /// HTTP detail, when `proto` is HTTP.
    #[serde(default)]
    pub http: Option<HttpExchange>,
    /// SMTP detail, when `proto` is SMTP.
    #[serde(default)]
    pub smtp: Option<DpiSmtpInfo>,
}

/// File-inbox entry point information.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInboxInfo {
    /// Original file path.
    pub src_path: String,
    /// Path the file was moved to.
    pub dst_path: String,
}

/// File-monitor entry point information.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMonitorInfo {
    /// Observed file path.
    pub src_path: String,
}

/// Network traffic analysis entry point information.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PtnadInfo {
    /// Source IP of the captured object.
    pub src_ip: String,
    /// Source port.
    pub src_port: u16,
    /// Destination IP.
    pub dst_ip: String,
    /// Destination port.
    pub dst_port: u16,
    /// Link to the capture session.
    pub r#ref: String,
    /// Protocol.
    pub proto: String,
    /// HTTP detail, when available.
    #[serde(default)]
    pub http: Option<HttpExchange>,
}

/// HTTP client info of API-originated tasks.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebClientInfo {
    /// `User-Agent` header value.
    pub user_agent: String,
    /// `X-Forwarded-For` header value.
    pub x_forwarded_for: String,
    /// `Referer` header value.
    pub referer: String,
}

/// HTTP client info plus the authenticated UI user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullWebClientInfo {
    /// `User-Agent` header value.
    pub user_agent: String,
    /// `X-Forwarded-For` header value.
    pub x_forwarded_for: String,
    /// `Referer` header value.
    pub referer: String,
    /// UI user id.
    pub user_id: String,
    /// UI user login.
    pub user_login: String,
    /// UI user display name.
    pub user_name: String,
    /// Whether the user is anonymous.
    pub user_is_anonymous: bool,
}

/// Channel-specific payload of an entry point, keyed by its type.
#[derive(Debug, Clone)]
pub enum EntryPointDetails {
    /// Plain mail check submission.
    CheckMe(MailSessionInfo),
    /// ICAP proxy integration.
    Icap(IcapInfo),
    /// Passive traffic capture.
    Dpi(DpiInfo),
    /// Inline mail agent.
    MailAgent(MailFlowInfo),
    /// Blind-carbon-copy mail monitoring.
    MailBcc(MailSessionInfo),
    /// Mail gateway.
    MailGateway(MailFlowInfo),
    /// Watched inbox directory.
    FileInbox(FileInboxInfo),
    /// Watched directory (monitor only).
    FileMonitor(FileMonitorInfo),
    /// Network traffic analysis integration.
    Ptnad(PtnadInfo),
    /// Public REST API.
    PublicApi(WebClientInfo),
    /// Scan API.
    ScanApi(WebClientInfo),
    /// Interactive web upload.
    Web(FullWebClientInfo),
    /// Interactive behavioral analysis session.
    InteractiveAnalysis(FullWebClientInfo),
    /// No payload was present for the entry point's type.
    None,
}

/// The ingestion channel that originated a task.
#[derive(Debug, Clone)]
pub struct EntryPoint {
    /// Source identifier.
    pub id: String,

    /// Channel type.
    pub entry_type: EntryPointType,

    /// Processing status at the channel.
    pub status: EntryPointStatus,

    /// Action taken at the channel.
    pub action: EntryPointAction,

    /// Quarantine status.
    pub quarantine: QuarantineInfo,

    /// Client IP address.
    pub client_ip: String,

    /// Channel-specific payload.
    pub details: EntryPointDetails,
}

/// Wire shape of the entry point: one all-optional field per channel.
#[derive(Debug, Deserialize)]
struct EntryPointWire {
    id: String,
    #[serde(rename = "type")]
    entry_type: EntryPointType,
    status: EntryPointStatus,
    action: EntryPointAction,
    quarantine: QuarantineInfo,
    #[serde(rename = "clientIp")]
    client_ip: String,
    #[serde(default)]
    check_me: Option<MailSessionInfo>,
    #[serde(default)]
    icap: Option<IcapInfo>,
    #[serde(default)]
    dpi: Option<DpiInfo>,
    #[serde(default, rename = "mailAgent")]
    mail_agent: Option<MailFlowInfo>,
    #[serde(default, rename = "mailBcc")]
    mail_bcc: Option<MailSessionInfo>,
    #[serde(default, rename = "mailGateway")]
    mail_gateway: Option<MailFlowInfo>,
    #[serde(default, rename = "fileInbox")]
    file_inbox: Option<FileInboxInfo>,
    #[serde(default, rename = "fileMonitor")]
    file_monitor: Option<FileMonitorInfo>,
    #[serde(default)]
    ptnad: Option<PtnadInfo>,
    #[serde(default, rename = "publicApi")]
    public_api: Option<WebClientInfo>,
    #[serde(default, rename = "scanApi")]
    scan_api: Option<WebClientInfo>,
    #[serde(default)]
    web: Option<FullWebClientInfo>,
    #[serde(default, rename = "interactiveAnalysis")]
    interactive_analysis: Option<FullWebClientInfo>,
}

impl EntryPointWire {
    fn populated_payloads(&self) -> usize {
        usize::from(self.check_me.is_some())
            + usize::from(self.icap.is_some())
            + usize::from(self.dpi.is_some())
            + usize::from(self.mail_agent.is_some())
            + usize::from(self.mail_bcc.is_some())
            + usize::from(self.mail_gateway.is_some())
            + usize::from(self.file_inbox.is_some())
            + usize::from(self.file_monitor.is_some())
            + usize::from(self.ptnad.is_some())
            + usize::from(self.public_api.is_some())
            + usize::from(self.scan_api.is_some())
            + usize::from(self.web.is_some())
            + usize::from(self.interactive_analysis.is_some())
    }
}

impl From<EntryPointWire> for EntryPoint {
    fn from(wire: EntryPointWire) -> Self {
        if wire.populated_payloads() > 1 {
            tracing::warn!(
                id = wire.id,
                entry_type = %wire.entry_type,
                "entry point carries more than one payload, keeping the type-matching one"
            );
        }

        let details = match wire.entry_type {
            EntryPointType::CheckMe => wire.check_me.map(EntryPointDetails::CheckMe),
            EntryPointType::Icap => wire.icap.map(EntryPointDetails::Icap),
            EntryPointType::Dpi => wire.dpi.map(EntryPointDetails::Dpi),
            EntryPointType::MailAgent => wire.mail_agent.map(EntryPointDetails::MailAgent),
            EntryPointType::MailBcc => wire.mail_bcc.map(EntryPointDetails::MailBcc),
            EntryPointType::MailGateway => wire.mail_gateway.map(EntryPointDetails::MailGateway),
            EntryPointType::FileInbox => wire.file_inbox.map(EntryPointDetails::FileInbox),
            EntryPointType::FileMonitor => wire.file_monitor.map(EntryPointDetails::FileMonitor),
            EntryPointType::Ptnad => wire.ptnad.map(EntryPointDetails::Ptnad),
            EntryPointType::PublicApi => wire.public_api.map(EntryPointDetails::PublicApi),
            EntryPointType::ScanApi => wire.scan_api.map(EntryPointDetails::ScanApi),
            EntryPointType::Web => wire.web.map(EntryPointDetails::Web),
            EntryPointType::InteractiveAnalysis => wire
                .interactive_analysis
                .map(EntryPointDetails::InteractiveAnalysis),
            EntryPointType::Unknown | EntryPointType::Other(_) => None,
        }
        .unwrap_or(EntryPointDetails::None);

        Self {
            id: wire.id,
            entry_type: wire.entry_type,
            status: wire.status,
            action: wire.action,
            quarantine: wire.quarantine,
            client_ip: wire.client_ip,
            details,
        }
    }
}

impl<'de> Deserialize<'de> for EntryPoint {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        EntryPointWire::deserialize(deserializer).map(Self::from)
    }
}

/// One task in a UI listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    /// Task identifier.
    pub id: Uuid,

    /// Display name.
    pub name: String,

    /// Kind of the scanned object.
    #[serde(rename = "objectType")]
    pub object_type: ObjectKind,

    /// Creation time.
    #[serde(with = "chrono::serde::ts_seconds")]
    pub start: DateTime<Utc>,

    /// Overall verdict of the product (sandbox, antivirus and static
    /// analysis combined).
    pub correlation: CorrelationInfo,

    /// Verdict of the behavioral analysis alone.
    #[serde(default, rename = "sandboxCorrelation")]
    pub sandbox_correlation: Option<CorrelationInfo>,

    /// Where the task came from.
    #[serde(rename = "entryPoint")]
    pub entry_point: EntryPoint,

    /// Creation time (float UNIX timestamp).
    #[serde(rename = "startTime")]
    pub start_time: f64,

    /// Processing time (float UNIX timestamp).
    #[serde(rename = "processedTime")]
    pub processed_time: f64,

    /// Verdict time (float UNIX timestamp).
    #[serde(rename = "verdictTime")]
    pub verdict_time: f64,
}

/// One page of a task listing.
#[derive(Debug, Clone, Deserialize)]
pub struct TasksPage {
    /// The tasks on this page.
    pub tasks: Vec<Task>,

    /// Cursor pointing right after the first record.
    #[serde(rename = "currentCursor")]
    pub current_cursor: String,

    /// Cursor pointing after the last record; empty when no more data.
    #[serde(rename = "nextCursor")]
    pub next_cursor: String,
}

impl TasksPage {
    /// Returns `true` when a further page exists.
    pub fn has_more(&self) -> bool {
        !self.next_cursor.is_empty()
    }
}

/// Response of `GET /v2/tasks/{id}/summary`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskSummary {
    /// The task, with summary-only fields populated.
    pub task: Task,
}

/// One detection in a UI scan result.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectionInfo {
    /// Detection name.
    pub name: String,

    /// Threat class of the detection.
    #[serde(rename = "threatClassification")]
    pub threat_classification: ThreatClassification,
}

/// Engine block of a UI scan result.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanEngine {
    /// Engine identifier.
    pub name: EngineName,

    /// Signature database time; the overall sandbox result omits it.
    #[serde(default, rename = "databaseTime")]
    pub database_time: Option<DateTime<Utc>>,

    /// Engine version.
    pub version: String,

    /// Detections by the engine.
    pub detections: Vec<DetectionInfo>,
}

/// Result of one engine over one artifact, as shown in the UI.
#[derive(Debug, Clone, Deserialize)]
pub struct Scan {
    /// The engine that produced the result.
    pub engine: ScanEngine,

    /// The engine's verdict.
    pub result: CorrelationInfo,
}

/// Response of `GET /v2/tasks/{id}/artifacts/{node}/scans`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScansResponse {
    /// Per-engine results for the artifact.
    pub scans: Vec<Scan>,
}

/// One log file requested from `POST /sandbox/logs`.
#[derive(Debug, Clone, Serialize)]
pub struct LogRequestEntry {
    /// File name.
    pub name: String,

    /// SHA-256 of the file.
    pub sha256: String,
}

/// Body of `POST /sandbox/logs`.
#[derive(Debug, Clone, Serialize)]
pub struct LogsRequest {
    /// The files to pack into the archive.
    pub logs: Vec<LogRequestEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_point_json(entry_type: &str, extra: serde_json::Value) -> serde_json::Value {
        let mut base = serde_json::json!({
            "id": "ep-1",
            "type": entry_type,
            "status": "SUCCESS",
            "action": "PASS",
            "quarantine": {"state": "UNKNOWN"},
            "clientIp": "10.20.30.40"
        });
        base.as_object_mut()
            .unwrap()
            .extend(extra.as_object().unwrap().clone());
        base
    }

    #[test]
    fn entry_point_details_keyed_by_type() {
        let value = entry_point_json(
            "MAIL_GATEWAY",
            serde_json::json!({
                "mailGateway": {
                    "fromAddress": "evil@example.org",
                    "recipients": ["victim@example.com"]
                }
            }),
        );
        let parsed: EntryPoint = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.entry_type, EntryPointType::MailGateway);
        match parsed.details {
            EntryPointDetails::MailGateway(info) => {
                assert_eq!(info.from_address, "evil@example.org");
                assert!(info.mail_results.is_none());
            }
            other => panic!("expected mail gateway details, got {other:?}"),
        }
    }

    #[test]
    fn missing_payload_yields_none_details() {
        let value = entry_point_json("WEB", serde_json::json!({}));
        let parsed: EntryPoint = serde_json::from_value(value).unwrap();
        assert!(matches!(parsed.details, EntryPointDetails::None));
    }

    #[test]
    fn conflicting_payloads_resolve_to_the_type_matching_one() {
        let value = entry_point_json(
            "ICAP",
            serde_json::json!({
                "icap": {
                    "method": "RESPMOD",
                    "url": "icap://proxy/av",
                    "version": "1.0",
                    "clientIp": "10.0.0.9",
                    "clientUsername": "jdoe"
                },
                "check_me": {"fromAddress": "a@b", "recipients": []}
            }),
        );
        let parsed: EntryPoint = serde_json::from_value(value).unwrap();
        assert!(matches!(parsed.details, EntryPointDetails::Icap(_)));
    }

    #[test]
    fn unknown_entry_type_parses_with_none_details() {
        let value = entry_point_json("CARRIER_PIGEON", serde_json::json!({}));
        let parsed: EntryPoint = serde_json::from_value(value).unwrap();
        assert_eq!(
            parsed.entry_type,
            EntryPointType::Other("CARRIER_PIGEON".into())
        );
        assert!(matches!(parsed.details, EntryPointDetails::None));
    }

    #[test]
    fn tasks_page_pagination() {
        let page = TasksPage {
            tasks: vec![],
            current_cursor: "cur".into(),
            next_cursor: String::new(),
        };
        assert!(!page.has_more());
    }

    #[test]
    fn task_query_builders_compose_qsl() {
        let from = NaiveDateTime::parse_from_str("2026-08-01 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let to = NaiveDateTime::parse_from_str("2026-08-07 23:59:59", "%Y-%m-%d %H:%M:%S").unwrap();
        let query = TaskQuery::new()
            .filter_date_range(from, to)
            .filter_sandboxed(true)
            .order_by_start_desc();
        assert_eq!(
            query.query,
            "(start >= 2026-08-01T00:00:00 AND start <= 2026-08-07T23:59:59) AND (sandbox.state IN (UNSCANNED, PARTIAL, FULL)) ORDER BY start desc"
        );
    }

    #[test]
    fn task_query_omits_unset_cursor() {
        let query = TaskQuery::new().with_limit(50);
        let value = serde_json::to_value(&query).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("nextCursor"));
        assert_eq!(object["limit"], 50);
        assert_eq!(object["utcOffsetSeconds"], 0);
    }

    #[test]
    fn task_parses_listing_shape() {
        let value = serde_json::json!({
            "id": "8e0b3eac-6f97-4ac9-9533-1a2b78e01e2a",
            "name": "dropper.exe",
            "objectType": "FILE",
            "start": 1754600000,
            "correlation": {
                "state": "FULL",
                "threatClassification": "TROJAN",
                "threatLevel": "DANGEROUS",
                "threatPlatform": "WINDOWS"
            },
            "entryPoint": entry_point_json("SCAN_API", serde_json::json!({
                "scanApi": {"userAgent": "curl/8", "xForwardedFor": "", "referer": ""}
            })),
            "startTime": 1754600000.5,
            "processedTime": 1754600100.0,
            "verdictTime": 1754600101.25
        });
        let task: Task = serde_json::from_value(value).unwrap();
        assert_eq!(task.object_type, ObjectKind::File);
        assert_eq!(
            task.correlation.threat_classification,
            ThreatClassification::Trojan
        );
        assert!(task.sandbox_correlation.is_none());
        assert!(matches!(
            task.entry_point.details,
            EntryPointDetails::ScanApi(_)
        ));
    }
}
