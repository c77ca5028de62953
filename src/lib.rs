//! # Sandkit
//!
//! An asynchronous client library for a remote malware-sandbox analysis
//! service: upload samples, create scan tasks, wait for verdicts and pull
//! artifacts — plus a second, session-authenticated client for the
//! service's UI backend.
//!
//! ## Overview
//!
//! The service exposes two independent HTTP surfaces:
//!
//! - The **key-authenticated API** (header `X-Api-Key`): temporary file
//!   storage, scan creation (file, URL, rescan-from-traces), task status
//!   and reports, artifact download. Driven by [`SandboxClient`].
//! - The **session-authenticated UI API** (login/password, cookie session
//!   plus a short-lived bearer token): task listings, result trees and
//!   log/archive downloads for already-completed tasks. Driven by
//!   [`UiClient`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sandkit::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let key = ScanKey::new("lab", "api-key", "10.0.0.5");
//!     let client = SandboxClient::new(key, ClientConfig::default())?;
//!
//!     // Submit asynchronously and poll for the verdict.
//!     let response = client
//!         .submit_file("/samples/dropper.exe")
//!         .async_result(true)
//!         .send()
//!         .await?;
//!     match client.wait_for_report(&response, 600.0).await.into_report() {
//!         Some(report) => {
//!             let long = report.long_report()?.expect("completed");
//!             println!("verdict: {:?}", long.result.verdict);
//!         }
//!         // Indeterminate: the verdict is unknown, not CLEAN.
//!         None => println!("no result within the budget"),
//!     }
//!
//!     client.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **core**: keys, content hashes, the response envelope, soft enums,
//!   reports and the artifact tree
//! - **api**: the key-authenticated client — transfer layer, submission
//!   builders and the poll/wait orchestrator
//! - **ui**: the session-authenticated client and its models
//! - **config**: per-client configuration values (no global settings)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod api;
pub mod config;
pub mod core;
pub mod ui;

mod transport;

// Re-export commonly used types at the crate root
pub use crate::api::{
    SandboxClient, SandboxOptions, SandboxOptionsNew, ScanOptions, WaitOutcome, WaitPolicy,
};
pub use crate::config::{ClientConfig, UiConfig};
pub use crate::core::{
    Artifact, ContentHash, HashAlgorithm, LongReport, RemoteError, Result, SandboxError, ScanKey,
    ShortReport, TaskResponse, UploadSource, Verdict,
};
pub use crate::ui::{UiClient, UiCredentials};

/// Prelude module for convenient imports.
///
/// ```rust
/// use sandkit::prelude::*;
/// ```
pub mod prelude {
    pub use crate::api::{
        SandboxClient, SandboxOptions, SandboxOptionsNew, ScanOptions, WaitOutcome, WaitPolicy,
    };
    pub use crate::config::{ClientConfig, UiConfig};
    pub use crate::core::{
        Artifact, ContentHash, HashAlgorithm, LongReport, RemoteError, Result, SandboxError,
        ScanKey, ShortReport, TaskResponse, UploadSource, Verdict,
    };
    pub use crate::ui::{TaskQuery, TreeQuery, UiClient, UiCredentials};
}
