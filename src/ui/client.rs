//! The session-authenticated UI client.
//!
//! The UI backend separates session establishment (a login redirect flow
//! that sets cookies) from API authorization (a short-lived bearer token
//! fetched against a per-session fingerprint). [`UiClient`] drives both.

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use uuid::Uuid;

use crate::config::UiConfig;
use crate::core::error::{Result, SandboxError};
use crate::transport::JsonDecoder;
use crate::ui::models::{
    LogRequestEntry, LogsRequest, Scan, ScansResponse, TaskQuery, TaskSummary, TasksPage,
};
use crate::ui::token::TokenCache;
use crate::ui::tree::{ArchiveQuery, TreePage, TreeQuery};

/// Port of the login service referenced by the authorize redirect.
const AUTH_PORT: &str = ":3334";

/// The UI backend expects a browser-looking client.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/63.0.3239.132 Safari/537.36";

/// How login credentials are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthKind {
    /// Local user database.
    #[default]
    Local,
    /// LDAP directory.
    Ldap,
}

impl AuthKind {
    fn code(self) -> u8 {
        match self {
            Self::Local => 0,
            Self::Ldap => 1,
        }
    }
}

/// Credentials of one UI account on one endpoint.
#[derive(Debug, Clone)]
pub struct UiCredentials {
    name: String,
    host: String,
    login: String,
    password: SecretString,
    auth: AuthKind,
}

impl UiCredentials {
    /// Creates credentials for `host`.
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        login: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            login: login.into(),
            password: SecretString::from(password.into()),
            auth: AuthKind::Local,
        }
    }

    /// Switches to LDAP credential validation.
    pub fn with_ldap(mut self) -> Self {
        self.auth = AuthKind::Ldap;
        self
    }

    /// Returns the descriptive name of the credentials.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the endpoint host.
    pub fn host(&self) -> &str {
        &self.host
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    auth_type: u8,
    remember_login: bool,
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    fingerprint: &'a str,
}

/// Asynchronous client for the session-authenticated UI API.
///
/// Independent from [`SandboxClient`](crate::api::SandboxClient): it
/// browses and downloads from already-completed tasks and takes no part
/// in the submission pipeline. Call [`UiClient::close`] on disposal.
pub struct UiClient {
    credentials: UiCredentials,
    config: UiConfig,
    http: reqwest::Client,
    decoder: JsonDecoder,
    token: TokenCache,
    fingerprint: String,
    base: String,
}

impl UiClient {
    /// Creates a client for the given account. [`authenticate`] must be
    /// called before any data call.
    ///
    /// [`authenticate`]: UiClient::authenticate
    pub fn new(credentials: UiCredentials, config: UiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("User-Agent", HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .connect_timeout(config.connect_timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs);
        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }
        let http = builder.build()?;

        // One random fingerprint per session, 32 hex digits.
        let fingerprint = Uuid::new_v4().simple().to_string();
        let base = format!("https://{}/api/ui", credentials.host);

        Ok(Self {
            token: TokenCache::new(config.token_lifetime),
            decoder: JsonDecoder::new(config.debug_dump_dir.clone()),
            credentials,
            config,
            http,
            fingerprint,
            base,
        })
    }

    /// Shuts the client down, dropping its session and connection pool.
    pub fn close(self) {
        tracing::debug!(endpoint = self.credentials.host(), "UI client closed");
        drop(self);
    }

    /// Establishes the cookie session and fetches the first access token.
    ///
    /// Requests an authorization redirect for the session fingerprint,
    /// submits the credentials to the login service behind it, follows
    /// the redirect back, then fetches a token.
    pub async fn authenticate(&self) -> Result<()> {
        let authorize_url = format!("{}/auth/authorize", self.base);
        let response = self
            .http
            .get(&authorize_url)
            .timeout(self.config.read_timeout)
            .query(&[("fingerprint", self.fingerprint.as_str())])
            .send()
            .await?;
        let response = JsonDecoder::expect_success(response)?;
        let redirect: serde_json::Value = response.json().await?;
        let location = redirect["data"]["location"].as_str().ok_or_else(|| {
            SandboxError::auth("authorize response carries no redirect location")
        })?;
        let login_host = auth_host(location)?;
        tracing::debug!(login_host, "following authorization redirect");

        let login = LoginRequest {
            username: &self.credentials.login,
            password: self.credentials.password.expose_secret(),
            auth_type: self.credentials.auth.code(),
            remember_login: true,
        };
        let response = self
            .http
            .post(format!("https://{login_host}{AUTH_PORT}/ui/login"))
            .timeout(self.config.read_timeout)
            .json(&login)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SandboxError::auth(format!(
                "login rejected with status {}",
                response.status()
            )));
        }

        // Completes the redirect flow and binds the session cookies.
        let response = self
            .http
            .get(location)
            .timeout(self.config.read_timeout)
            .send()
            .await?;
        JsonDecoder::expect_success(response)?;

        self.refresh_token_if_needed(false).await
    }

    /// Refreshes the access token if forced, never fetched, or older than
    /// the configured lifetime. Safe to call concurrently; only one
    /// refresh runs at a time and late arrivals re-check freshness.
    pub async fn refresh_token_if_needed(&self, force: bool) -> Result<()> {
        self.token
            .refresh_with(force, || self.fetch_token())
            .await
    }

    async fn fetch_token(&self) -> Result<Option<String>> {
        let request = TokenRequest {
            fingerprint: &self.fingerprint,
        };
        let response = self
            .http
            .post(format!("{}/auth/token", self.base))
            .timeout(self.config.read_timeout)
            .json(&request)
            .send()
            .await?;
        let response = JsonDecoder::expect_success(response)?;
        let body: serde_json::Value = response.json().await?;

        // Two response shapes exist: the token nested under a data
        // envelope, or flat at the top level.
        let token = body["data"]["accessToken"]
            .as_str()
            .or_else(|| body["accessToken"].as_str());
        if token.is_none() {
            tracing::warn!("token response carries no accessToken, keeping the previous token");
        }
        Ok(token.map(str::to_owned))
    }

    /// Sends a request built by `build`, refreshing the token first and
    /// retrying exactly once on 401 after a forced refresh.
    async fn authorized<F>(&self, build: F) -> Result<reqwest::Response>
    where
        F: Fn(&reqwest::Client, Option<String>) -> reqwest::RequestBuilder,
    {
        self.refresh_token_if_needed(false).await?;
        let response = build(&self.http, self.token.bearer()).send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::debug!("UI API answered 401, forcing a token refresh and retrying once");
        self.refresh_token_if_needed(true).await?;
        Ok(build(&self.http, self.token.bearer()).send().await?)
    }

    /// Lists tasks matching the query.
    pub async fn get_tasks(&self, query: &TaskQuery) -> Result<TasksPage> {
        let response = self
            .authorized(|http, token| {
                with_bearer(
                    http.get(format!("{}/v2/tasks", self.base))
                        .timeout(self.config.read_timeout)
                        .query(query),
                    token,
                )
            })
            .await?;
        self.decoder.decode("ui_v2_get_tasks", response).await
    }

    /// Fetches the summary of one task.
    pub async fn get_summary(&self, scan_id: Uuid) -> Result<TaskSummary> {
        let response = self
            .authorized(|http, token| {
                with_bearer(
                    http.get(format!("{}/v2/tasks/{scan_id}/summary", self.base))
                        .timeout(self.config.read_timeout),
                    token,
                )
            })
            .await?;
        self.decoder.decode("ui_v2_get_summary", response).await
    }

    /// Fetches (part of) the result tree of one task.
    pub async fn get_tree(&self, scan_id: Uuid, query: &TreeQuery) -> Result<TreePage> {
        let response = self
            .authorized(|http, token| {
                with_bearer(
                    http.get(format!("{}/v2/tasks/{scan_id}/tree", self.base))
                        .timeout(self.config.read_timeout)
                        .query(query),
                    token,
                )
            })
            .await?;
        self.decoder.decode("ui_v2_get_tree", response).await
    }

    /// Fetches the per-engine results of one artifact node.
    pub async fn get_artifact_scans(&self, scan_id: Uuid, node_id: i64) -> Result<Vec<Scan>> {
        let response = self
            .authorized(|http, token| {
                with_bearer(
                    http.get(format!(
                        "{}/v2/tasks/{scan_id}/artifacts/{node_id}/scans",
                        self.base
                    ))
                    .timeout(self.config.read_timeout),
                    token,
                )
            })
            .await?;
        let scans: ScansResponse = self.decoder.decode("ui_get_scans", response).await?;
        Ok(scans.scans)
    }

    /// Downloads behavioral-analysis logs as one archive.
    ///
    /// The service answers with an encrypted zip (password `infected`),
    /// returned as opaque bytes; decryption is the caller's concern.
    pub async fn download_logs(&self, entries: Vec<LogRequestEntry>) -> Result<Bytes> {
        let request = LogsRequest { logs: entries };
        let response = self
            .authorized(|http, token| {
                with_bearer(
                    http.post(format!("{}/sandbox/logs", self.base))
                        .timeout(self.config.read_timeout)
                        .json(&request),
                    token,
                )
            })
            .await?;
        let response = JsonDecoder::expect_success(response)?;
        Ok(response.bytes().await?)
    }

    /// Downloads all artifacts of a task as one archive.
    ///
    /// Same encrypted-zip convention as [`download_logs`](UiClient::download_logs).
    pub async fn download_artifacts(&self, scan_id: Uuid, query: &ArchiveQuery) -> Result<Bytes> {
        let response = self
            .authorized(|http, token| {
                with_bearer(
                    http.get(format!("{}/v2/tasks/{scan_id}/tree/download", self.base))
                        .timeout(self.config.read_timeout)
                        .query(query),
                    token,
                )
            })
            .await?;
        let response = JsonDecoder::expect_success(response)?;
        Ok(response.bytes().await?)
    }
}

impl std::fmt::Debug for UiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiClient")
            .field("endpoint", &self.credentials.host())
            .field("login", &self.credentials.login)
            .finish()
    }
}

fn with_bearer(
    builder: reqwest::RequestBuilder,
    token: Option<String>,
) -> reqwest::RequestBuilder {
    match token {
        Some(token) => builder.bearer_auth(token),
        None => builder,
    }
}

/// Extracts the login-service host from an authorize redirect URL.
fn auth_host(location: &str) -> Result<String> {
    let rest = location.strip_prefix("https://").ok_or_else(|| {
        SandboxError::auth(format!("unexpected authorize redirect: {location}"))
    })?;
    let host = match rest.find(AUTH_PORT) {
        Some(idx) => &rest[..idx],
        None => rest,
    };
    Ok(host.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_host_extracted_from_redirect() {
        let host = auth_host("https://10.1.2.3:3334/ui/authorize?code=x").unwrap();
        assert_eq!(host, "10.1.2.3");
    }

    #[test]
    fn auth_host_requires_https() {
        assert!(auth_host("http://10.1.2.3:3334/ui/").is_err());
    }

    #[test]
    fn fingerprint_is_32_hex_digits() {
        let client = UiClient::new(
            UiCredentials::new("lab", "10.1.2.3", "analyst", "secret"),
            UiConfig::default(),
        )
        .unwrap();
        assert_eq!(client.fingerprint.len(), 32);
        assert!(client.fingerprint.bytes().all(|b| b.is_ascii_hexdigit()));
    }

    #[test]
    fn login_request_wire_shape() {
        let request = LoginRequest {
            username: "analyst",
            password: "secret",
            auth_type: AuthKind::Ldap.code(),
            remember_login: true,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["username"], "analyst");
        assert_eq!(value["authType"], 1);
        assert_eq!(value["rememberLogin"], true);
    }
}
