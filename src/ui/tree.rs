//! Result-tree models of the UI API.
//!
//! A task's result is a tree of nodes (artifacts, behavioral runs and
//! their stages). Kind-specific node payloads arrive as all-optional
//! fields on the wire; [`NodeDetail`] reshapes them into one variant
//! keyed by the node's object kind.

use serde::{Deserialize, Serialize};

use crate::core::enums::{
    BlacklistStatus, BootkitmonStage, ContextType, CrawlerEngine, ErrorKind, FileProperty,
    HashKind, HttpDirection, NetworkObjectType, ObjectKind, ScanArtifactType, ScanState,
    TreeNodeType,
};
use crate::core::report::VmImage;
use crate::ui::models::{CorrelationInfo, DetectionInfo, Scan};

/// Node ordering of tree queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortMode {
    /// Most dangerous nodes first.
    Dangerous,
    /// Alphabetical by name.
    Alphabetical,
}

/// Query parameters of `GET /v2/tasks/{id}/tree`.
#[derive(Debug, Clone, Serialize)]
pub struct TreeQuery {
    /// Full path of the parent to load from, comma-separated node ids
    /// (e.g. `"0,2,10"`).
    #[serde(rename = "parentPath", skip_serializing_if = "Option::is_none")]
    pub parent_path: Option<String>,

    /// Specific node ids to return, comma-separated.
    #[serde(rename = "filteredByIds", skip_serializing_if = "Option::is_none")]
    pub filtered_by_ids: Option<String>,

    /// Maximum number of records returned.
    pub limit: u32,

    /// Record offset, for pagination.
    pub offset: u32,

    /// Maximum depth returned, relative to the parent.
    #[serde(rename = "maxTreeLevel")]
    pub max_tree_level: u32,

    /// Node ordering.
    #[serde(rename = "sortMode")]
    pub sort_mode: SortMode,
}

impl Default for TreeQuery {
    fn default() -> Self {
        Self {
            parent_path: None,
            filtered_by_ids: None,
            limit: 1000,
            offset: 0,
            max_tree_level: 3,
            sort_mode: SortMode::Alphabetical,
        }
    }
}

impl TreeQuery {
    /// Creates a query with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the subtree under the given parent path.
    pub fn with_parent_path(mut self, path: impl Into<String>) -> Self {
        self.parent_path = Some(path.into());
        self
    }

    /// Returns only the listed node ids.
    pub fn with_filtered_ids(mut self, ids: impl Into<String>) -> Self {
        self.filtered_by_ids = Some(ids.into());
        self
    }

    /// Sets the page size.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the record offset.
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Sets the maximum returned depth.
    pub fn with_max_tree_level(mut self, level: u32) -> Self {
        self.max_tree_level = level;
        self
    }

    /// Sets the node ordering.
    pub fn with_sort_mode(mut self, mode: SortMode) -> Self {
        self.sort_mode = mode;
        self
    }
}

/// Query parameters of `GET /v2/tasks/{id}/tree/download`.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveQuery {
    /// Tree filter in the service's query language.
    pub query: String,

    /// Include behavioral-analysis logs in the archive.
    #[serde(
        rename = "includeSandboxLogs",
        serialize_with = "bool_as_literal_string"
    )]
    pub include_sandbox_logs: bool,
}

impl Default for ArchiveQuery {
    fn default() -> Self {
        Self {
            query: String::new(),
            include_sandbox_logs: true,
        }
    }
}

impl ArchiveQuery {
    /// Creates a query with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the tree filter.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Includes or excludes behavioral-analysis logs.
    pub fn with_sandbox_logs(mut self, include: bool) -> Self {
        self.include_sandbox_logs = include;
        self
    }
}

// The endpoint expects literal "true"/"false" strings.
fn bool_as_literal_string<S: serde::Serializer>(
    value: &bool,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "true" } else { "false" })
}

/// A behavioral-analysis artifact (trace, video, graph) attached to a node.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanArtifact {
    /// File name.
    pub name: String,

    /// SHA-256 of the file.
    pub sha256: String,

    /// File size in bytes.
    pub size: u64,

    /// Artifact kind.
    #[serde(default, rename = "type")]
    pub kind: Option<ScanArtifactType>,
}

/// An MSDN error raised while initializing the VM image.
#[derive(Debug, Clone, Deserialize)]
pub struct MsdnError {
    /// Error name.
    pub name: String,

    /// Error code.
    pub code: i64,
}

/// An error attached to a behavioral run or unpacking step.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeError {
    /// Error kind.
    #[serde(rename = "type")]
    pub kind: ErrorKind,

    /// Wait duration associated with the error, if any.
    #[serde(default)]
    pub duration: Option<i64>,

    /// The limit that was hit, if any.
    #[serde(default)]
    pub limit_size: Option<i64>,
}

/// A suspicious behavior entry as shown in the UI.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuspiciousBehaviorInfo {
    /// Rule name.
    pub name: String,

    /// Contribution to the overall score.
    #[serde(default)]
    pub weight: Option<i64>,

    /// MITRE ATT&CK technique id.
    #[serde(default)]
    pub mitre_threat_id: Option<String>,

    /// Rule version.
    pub version: String,
}

/// Details of one behavioral-analysis run.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxRunInfo {
    /// Actual observation duration in seconds.
    pub analysis_duration: i64,

    /// Planned observation duration in seconds.
    pub analysis_planned_duration: i64,

    /// DPI rules version.
    pub dpi_rules_version: String,

    /// Correlation rules version.
    pub correlation_rules_version: String,

    /// Whether TLS interception was on.
    pub mitm: bool,

    /// File type the sample was launched as.
    #[serde(default)]
    pub file_type: Option<String>,

    /// The VM image used.
    pub image_info: VmImage,

    /// Whether the image was selected automatically.
    pub auto_select: bool,

    /// Suspicious behaviors observed.
    pub suspicious_behaviors: Vec<SuspiciousBehaviorInfo>,

    /// Malware detections.
    pub detections: Vec<DetectionInfo>,

    /// Image initialization error, if any.
    #[serde(default)]
    pub init_msdn_error: Option<MsdnError>,

    /// Errors of the run.
    pub errors: Vec<NodeError>,

    /// Whether bootkit monitoring was on.
    pub bootkitmon: bool,

    /// Stage of the bootkit-monitoring run.
    #[serde(default)]
    pub bootkitmon_stage: Option<BootkitmonStage>,

    /// Index of the bootkit-monitoring stage.
    pub stage_index: i64,
}

/// Hashes and naming of a tree node's object.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeInfo {
    /// Object kind.
    #[serde(rename = "type")]
    pub kind: ObjectKind,

    /// Object name.
    pub name: String,

    /// Size in bytes.
    pub size: u64,

    /// SHA-1 hex digest.
    pub sha1: String,

    /// SHA-256 hex digest.
    pub sha256: String,

    /// MD5 hex digest.
    pub md5: String,

    /// ssdeep fuzzy hash.
    pub ssdeep: String,

    /// MIME type.
    #[serde(rename = "mimeType")]
    pub mime_type: String,

    /// libmagic description.
    #[serde(rename = "magicString")]
    pub magic_string: String,

    /// Detected file type.
    #[serde(rename = "fileType")]
    pub file_type: String,

    /// Structural properties of the object.
    pub properties: Vec<FileProperty>,
}

/// E-mail headers of an EMAIL node.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailInfo {
    /// Subject line.
    pub subject: String,

    /// `From` header.
    #[serde(default, rename = "from")]
    pub from_address: Option<String>,

    /// `To` recipients.
    pub to: Vec<String>,

    /// `Cc` recipients.
    pub cc: Vec<String>,

    /// `Bcc` recipients.
    pub bcc: Vec<String>,
}

/// Archive password recovered during unpacking.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveInfo {
    /// The password that opened the archive.
    pub password: String,
}

/// One redirect hop of a crawled URL.
#[derive(Debug, Clone, Deserialize)]
pub struct UrlRedirect {
    /// Redirect target.
    #[serde(default)]
    pub url: Option<String>,

    /// HTTP status of the hop.
    #[serde(default)]
    pub status: Option<i32>,
}

/// Crawling detail of a URL node.
#[derive(Debug, Clone, Deserialize)]
pub struct UrlInfo {
    /// The URL.
    #[serde(default)]
    pub url: Option<String>,

    /// Redirect chain followed.
    #[serde(default)]
    pub redirects: Option<Vec<UrlRedirect>>,
}

/// Provenance of a file dropped or dumped during behavioral analysis.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropInfo {
    /// PID of the writing process.
    pub process_id: i64,

    /// Name of the writing process.
    pub process_name: String,

    /// Creation time (UNIX timestamp).
    pub create_time: i64,

    /// What triggered the capture.
    pub trigger: String,

    /// Whether bootkit monitoring was on.
    pub bootkitmon: bool,

    /// Stage of the bootkit-monitoring run.
    pub bootkitmon_stage: BootkitmonStage,

    /// Index of the bootkit-monitoring stage.
    // Snake case on the wire, unlike the rest of this record.
    #[serde(default, rename = "stage_index")]
    pub stage_index: Option<i64>,

    /// Node id on the behavior graph.
    #[serde(default, rename = "graph_node_id")]
    pub graph_node_id: Option<i64>,
}

/// Captured request/response pair of an HTTP node.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpInfo {
    /// Direction of the capture.
    pub direction: HttpDirection,

    /// The request, when captured.
    #[serde(default)]
    pub request: Option<HttpRequestInfo>,

    /// The response, when captured.
    #[serde(default)]
    pub response: Option<HttpResponseInfo>,
}

/// Captured HTTP request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequestInfo {
    /// HTTP method.
    pub method: String,
    /// Request URL.
    pub url: String,
    /// `Host` header value.
    pub host: String,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// `X-Forwarded-For` header value.
    pub x_forwarded_for: String,
    /// `Referer` header value.
    pub referer: String,
    /// `Content-Type` header value.
    pub content_type: String,
}

/// Captured HTTP response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponseInfo {
    /// Status code.
    pub code: i32,
    /// Status reason phrase.
    pub reason: String,
    /// `Server` header value.
    pub server: String,
    /// `Content-Type` header value.
    pub content_type: String,
    /// `Content-Disposition` header value.
    pub content_disposition: String,
}

/// Unpacking outcome of a container node.
#[derive(Debug, Clone, Deserialize)]
pub struct UnpackerInfo {
    /// Unpacking completeness.
    pub state: ScanState,

    /// Errors hit while unpacking.
    #[serde(default)]
    pub errors: Vec<NodeError>,
}

/// Download outcome of a URL node.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadUrlInfo {
    /// Download completeness.
    pub state: ScanState,

    /// Errors hit while downloading.
    #[serde(default)]
    pub errors: Vec<NodeError>,
}

/// Black/white list lookup of a node.
#[derive(Debug, Clone, Deserialize)]
pub struct BwListsInfo {
    /// Lookup completeness.
    pub state: ScanState,

    /// Lookup result.
    pub status: BlacklistStatus,

    /// Hash kinds that matched a list.
    pub hashes: Vec<HashKind>,
}

/// Provenance of a result reused from an earlier task.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheInfo {
    /// The original task id.
    pub source_scan_id: String,

    /// The original node id.
    pub source_node_id: serde_json::Value,

    /// Creation time of the original task (UNIX timestamp).
    pub timestamp: i64,
}

/// A network observable attached to a tree node.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeNetworkObject {
    /// Kind of the observable.
    #[serde(rename = "type")]
    pub kind: NetworkObjectType,

    /// The observable itself.
    pub value: String,

    /// Whether the observable was itself scanned.
    #[serde(rename = "isScanned")]
    pub is_scanned: bool,
}

/// The container a node was extracted from.
#[derive(Debug, Clone, Deserialize)]
pub struct ParentObjectInfo {
    /// Kind of the parent object.
    #[serde(rename = "type")]
    pub kind: ObjectKind,

    /// Name of the parent object.
    pub name: String,
}

/// Crawler context of a downloaded file.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerInfo {
    /// URL the file was fetched from.
    pub url: String,

    /// Engine used for the fetch.
    #[serde(default)]
    pub engine_name: Option<CrawlerEngine>,
}

/// Correlated behavioral result of a node.
#[derive(Debug, Clone, Deserialize)]
pub struct SandboxCorrelatedInfo {
    /// The correlated result.
    pub result: CorrelationInfo,
}

/// Kind-specific payload of a tree node, keyed by its object kind.
#[derive(Debug, Clone)]
pub enum NodeDetail {
    /// An e-mail message.
    Email(EmailInfo),
    /// An archive whose password was recovered.
    Archive(ArchiveInfo),
    /// A crawled URL.
    Url(UrlInfo),
    /// A file dropped during behavioral analysis.
    SandboxDrop(DropInfo),
    /// A process memory dump.
    SandboxProcessDump(DropInfo),
    /// A full memory dump.
    SandboxMemoryDump(DropInfo),
    /// A captured HTTP exchange.
    Http(HttpInfo),
    /// No kind-specific payload was present.
    None,
}

/// One node of a task's result tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Node identifier, starting at 1.
    pub node_id: i64,

    /// Chain of parent node ids, root first.
    pub parent_ids: Option<Vec<i64>>,

    /// Kind of the node.
    pub node_type: TreeNodeType,

    /// Per-engine results.
    pub scans: Vec<Scan>,

    /// Hashes and naming of the node's object.
    pub info: NodeInfo,

    /// Correlated verdict of the node.
    pub correlation: CorrelationInfo,

    /// Rule-engine result of the node.
    pub rule_engine_info: Scan,

    /// Kind-specific payload.
    pub detail: NodeDetail,

    /// Behavioral-run detail, for SANDBOX nodes.
    pub sandbox_info: Option<SandboxRunInfo>,

    /// Correlated behavioral result, when one exists.
    pub sandbox_correlated_info: Option<SandboxCorrelatedInfo>,

    /// Behavioral-analysis artifacts (traces, video, graph).
    pub scan_artifacts: Option<Vec<ScanArtifact>>,

    /// Unpacking outcome, for containers.
    pub unpacker_info: Option<UnpackerInfo>,

    /// Download outcome, for URLs.
    pub download_url_info: Option<DownloadUrlInfo>,

    /// Black/white list lookup.
    pub bw_lists_info: Option<BwListsInfo>,

    /// Cache provenance, for reused results.
    pub cache_info: Option<CacheInfo>,

    /// Network observables of the node.
    pub network_objects: Option<Vec<NodeNetworkObject>>,

    /// The container the node came from.
    pub parent_object_info: Option<ParentObjectInfo>,

    /// Processing context of the node.
    pub context_type: Option<ContextType>,

    /// Crawler context, for downloaded files.
    pub context_crawler_info: Option<CrawlerInfo>,

    /// Number of first-level children.
    pub first_child_count: i64,

    /// Search filtering: whether the node itself matched.
    pub is_match: Option<bool>,

    /// Search filtering: fields matching the text query.
    pub matched_fields: Option<Vec<Vec<String>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TreeNodeWire {
    node_id: i64,
    #[serde(default)]
    parent_ids: Option<Vec<i64>>,
    node_type: TreeNodeType,
    scans: Vec<Scan>,
    info: NodeInfo,
    correlation: CorrelationInfo,
    rule_engine_info: Scan,
    #[serde(default)]
    email_info: Option<EmailInfo>,
    #[serde(default)]
    archive_info: Option<ArchiveInfo>,
    #[serde(default)]
    url_info: Option<UrlInfo>,
    #[serde(default)]
    sandbox_info: Option<SandboxRunInfo>,
    #[serde(default)]
    sandbox_drop_info: Option<DropInfo>,
    #[serde(default)]
    sandbox_proc_dump_info: Option<DropInfo>,
    #[serde(default)]
    sandbox_mem_dump_info: Option<DropInfo>,
    #[serde(default)]
    sandbox_correlated_info: Option<SandboxCorrelatedInfo>,
    #[serde(default)]
    scan_artifacts: Option<Vec<ScanArtifact>>,
    #[serde(default)]
    http_info: Option<HttpInfo>,
    #[serde(default)]
    unpacker_info: Option<UnpackerInfo>,
    #[serde(default)]
    download_url_info: Option<DownloadUrlInfo>,
    #[serde(default)]
    bw_lists_info: Option<BwListsInfo>,
    #[serde(default)]
    cache_info: Option<CacheInfo>,
    #[serde(default)]
    network_objects: Option<Vec<NodeNetworkObject>>,
    #[serde(default)]
    parent_object_info: Option<ParentObjectInfo>,
    #[serde(default)]
    context_type: Option<ContextType>,
    #[serde(default)]
    context_crawler_info: Option<CrawlerInfo>,
    first_child_count: i64,
    #[serde(default)]
    is_match: Option<bool>,
    #[serde(default)]
    matched_fields: Option<Vec<Vec<String>>>,
}

impl From<TreeNodeWire> for TreeNode {
    fn from(mut wire: TreeNodeWire) -> Self {
        let kind_specific = usize::from(wire.email_info.is_some())
            + usize::from(wire.archive_info.is_some())
            + usize::from(wire.url_info.is_some())
            + usize::from(wire.sandbox_drop_info.is_some())
            + usize::from(wire.sandbox_proc_dump_info.is_some())
            + usize::from(wire.sandbox_mem_dump_info.is_some())
            + usize::from(wire.http_info.is_some());
        if kind_specific > 1 {
            tracing::warn!(
                node_id = wire.node_id,
                kind = %wire.info.kind,
                "tree node carries more than one kind payload, keeping the kind-matching one"
            );
        }

        let detail = match wire.info.kind {
            ObjectKind::Email | ObjectKind::EmailBody => {
                wire.email_info.take().map(NodeDetail::Email)
            }
            ObjectKind::Archive | ObjectKind::CompressedFile => {
                wire.archive_info.take().map(NodeDetail::Archive)
            }
            ObjectKind::Url => wire.url_info.take().map(NodeDetail::Url),
            ObjectKind::SandboxDrop => wire.sandbox_drop_info.take().map(NodeDetail::SandboxDrop),
            ObjectKind::SandboxProcessMemoryDump => wire
                .sandbox_proc_dump_info
                .take()
                .map(NodeDetail::SandboxProcessDump),
            ObjectKind::SandboxMemoryDump => wire
                .sandbox_mem_dump_info
                .take()
                .map(NodeDetail::SandboxMemoryDump),
            ObjectKind::Http => wire.http_info.take().map(NodeDetail::Http),
            _ => None,
        }
        .unwrap_or(NodeDetail::None);

        Self {
            node_id: wire.node_id,
            parent_ids: wire.parent_ids,
            node_type: wire.node_type,
            scans: wire.scans,
            info: wire.info,
            correlation: wire.correlation,
            rule_engine_info: wire.rule_engine_info,
            detail,
            sandbox_info: wire.sandbox_info,
            sandbox_correlated_info: wire.sandbox_correlated_info,
            scan_artifacts: wire.scan_artifacts,
            unpacker_info: wire.unpacker_info,
            download_url_info: wire.download_url_info,
            bw_lists_info: wire.bw_lists_info,
            cache_info: wire.cache_info,
            network_objects: wire.network_objects,
            parent_object_info: wire.parent_object_info,
            context_type: wire.context_type,
            context_crawler_info: wire.context_crawler_info,
            first_child_count: wire.first_child_count,
            is_match: wire.is_match,
            matched_fields: wire.matched_fields,
        }
    }
}

impl<'de> Deserialize<'de> for TreeNode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        TreeNodeWire::deserialize(deserializer).map(Self::from)
    }
}

/// One page of a result tree.
#[derive(Debug, Clone, Deserialize)]
pub struct TreePage {
    /// Nodes on this page.
    pub children: Vec<TreeNode>,

    /// `true` when more records exist past the limit; fetch them with
    /// an increased offset.
    #[serde(default, rename = "hasMore")]
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_json(kind: &str, extra: serde_json::Value) -> serde_json::Value {
        let correlation = serde_json::json!({
            "state": "FULL",
            "threatClassification": "TROJAN",
            "threatLevel": "DANGEROUS",
            "threatPlatform": "WINDOWS"
        });
        let scan = serde_json::json!({
            "engine": {
                "name": "rule_engine",
                "version": "5.1",
                "detections": []
            },
            "result": correlation.clone()
        });
        let mut base = serde_json::json!({
            "nodeId": 1,
            "parentIds": [0],
            "nodeType": "ARTIFACT",
            "scans": [scan.clone()],
            "info": {
                "type": kind,
                "name": "payload.bin",
                "size": 1024,
                "sha1": "a".repeat(40),
                "sha256": "b".repeat(64),
                "md5": "c".repeat(32),
                "ssdeep": "3:abc:def",
                "mimeType": "application/octet-stream",
                "magicString": "data",
                "fileType": "raw",
                "properties": ["ENCRYPTED"]
            },
            "correlation": correlation,
            "ruleEngineInfo": scan,
            "firstChildCount": 0
        });
        base.as_object_mut()
            .unwrap()
            .extend(extra.as_object().unwrap().clone());
        base
    }

    #[test]
    fn email_node_detail_is_keyed_by_kind() {
        let value = node_json(
            "EMAIL",
            serde_json::json!({
                "emailInfo": {
                    "subject": "invoice",
                    "from": "a@b.example",
                    "to": ["c@d.example"],
                    "cc": [],
                    "bcc": []
                }
            }),
        );
        let node: TreeNode = serde_json::from_value(value).unwrap();
        match node.detail {
            NodeDetail::Email(info) => assert_eq!(info.subject, "invoice"),
            other => panic!("expected email detail, got {other:?}"),
        }
    }

    #[test]
    fn kind_without_payload_gives_none_detail() {
        let node: TreeNode = serde_json::from_value(node_json("FILE", serde_json::json!({})))
            .unwrap();
        assert!(matches!(node.detail, NodeDetail::None));
        assert_eq!(node.info.properties, vec![FileProperty::Encrypted]);
    }

    #[test]
    fn conflicting_payloads_resolve_to_kind_matching_one() {
        let value = node_json(
            "SANDBOX_DROP",
            serde_json::json!({
                "sandboxDropInfo": {
                    "processId": 42,
                    "processName": "evil.exe",
                    "createTime": 1754600000,
                    "trigger": "file_write",
                    "bootkitmon": false,
                    "bootkitmonStage": "UNKNOWN"
                },
                "urlInfo": {"url": "https://example.org"}
            }),
        );
        let node: TreeNode = serde_json::from_value(value).unwrap();
        match node.detail {
            NodeDetail::SandboxDrop(info) => assert_eq!(info.process_name, "evil.exe"),
            other => panic!("expected drop detail, got {other:?}"),
        }
    }

    #[test]
    fn orthogonal_payloads_survive_next_to_detail() {
        let value = node_json(
            "ARCHIVE",
            serde_json::json!({
                "archiveInfo": {"password": "infected"},
                "unpackerInfo": {"state": "FULL", "errors": []},
                "bwListsInfo": {
                    "state": "FULL",
                    "status": "NOT_IN_LISTS",
                    "hashes": ["SHA256"]
                }
            }),
        );
        let node: TreeNode = serde_json::from_value(value).unwrap();
        assert!(matches!(node.detail, NodeDetail::Archive(_)));
        assert_eq!(node.unpacker_info.unwrap().state, ScanState::Full);
        assert_eq!(
            node.bw_lists_info.unwrap().status,
            BlacklistStatus::NotInLists
        );
    }

    #[test]
    fn tree_page_defaults_has_more() {
        let page: TreePage = serde_json::from_value(serde_json::json!({"children": []})).unwrap();
        assert!(!page.has_more);
    }

    #[test]
    fn tree_query_serializes_camel_case_params() {
        let query = TreeQuery::new()
            .with_parent_path("0,2")
            .with_sort_mode(SortMode::Dangerous);
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["parentPath"], "0,2");
        assert_eq!(value["maxTreeLevel"], 3);
        assert_eq!(value["sortMode"], "DANGEROUS");
        assert!(!value.as_object().unwrap().contains_key("filteredByIds"));
    }

    #[test]
    fn archive_query_uses_literal_bool_strings() {
        let query = ArchiveQuery::new().with_sandbox_logs(false);
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["includeSandboxLogs"], "false");
    }
}
