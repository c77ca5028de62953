//! The session-authenticated UI API: task browsing, result trees and
//! archive downloads.
//!
//! - [`client`] - The [`UiClient`]
//! - [`models`] - Task listings and the entry-point descriptor
//! - [`tree`] - Result-tree models
//! - [`token`] - Access token cache (internal)

pub mod client;
pub mod models;
pub(crate) mod token;
pub mod tree;

pub use client::{AuthKind, UiClient, UiCredentials};
pub use models::{
    CorrelationInfo, EntryPoint, EntryPointDetails, LogRequestEntry, Scan, Task, TaskQuery,
    TaskSummary, TasksPage,
};
pub use tree::{ArchiveQuery, NodeDetail, SortMode, TreeNode, TreePage, TreeQuery};
