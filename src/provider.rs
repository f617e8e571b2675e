//! Repository descriptors and the listing contract the mirror engine consumes.
//!
//! Hosting providers (GitLab, GitHub, or anything else) sit behind the
//! [`RepoSource`] trait. The engine never needs more than a flat list of
//! repositories per group, so the trait exposes exactly that.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A remote repository as reported by a hosting provider.
///
/// Immutable once fetched; the mirror engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    /// Hierarchical path under the group, e.g. `group/subgroup/project`.
    /// Mirrored clones preserve this hierarchy on disk.
    pub full_path: String,
    /// HTTPS clone URL.
    pub clone_url: String,
    /// SSH clone URL, empty if the provider has none.
    #[serde(default)]
    pub ssh_url: String,
    #[serde(default)]
    pub default_branch: String,
    #[serde(default)]
    pub archived: bool,
    /// Last push/activity timestamp, if the provider reports one.
    #[serde(default)]
    pub last_activity: Option<DateTime<Utc>>,
    /// Repository size in bytes as reported by the provider.
    #[serde(default)]
    pub size_bytes: i64,
}

/// The one capability the mirror engine needs from a provider.
#[async_trait]
pub trait RepoSource: Send + Sync {
    /// Lists every repository visible under a group or organization,
    /// including nested subgroups. Implementations handle pagination
    /// transparently.
    async fn list_group_repositories(&self, group: &str) -> Result<Vec<Repository>>;
}
