//! Common test utilities and helpers
#![allow(dead_code, unused_imports)]

pub mod git;

pub use self::git::{
    amend_head_commit, create_test_commit, is_git_available, setup_git_repo,
};

use anyhow::Result;
use async_trait::async_trait;
use gitmirror::config::MirrorOptions;
use gitmirror::provider::{RepoSource, Repository};
use std::path::Path;

/// A RepoSource over a fixed, in-memory repository list
pub struct StaticSource {
    pub repos: Vec<Repository>,
}

#[async_trait]
impl RepoSource for StaticSource {
    async fn list_group_repositories(&self, _group: &str) -> Result<Vec<Repository>> {
        Ok(self.repos.clone())
    }
}

/// Builds a repository descriptor whose clone URL is a local path
pub fn local_repo(full_path: &str, clone_url: &Path) -> Repository {
    Repository {
        id: 0,
        name: full_path.rsplit('/').next().unwrap_or(full_path).to_string(),
        full_path: full_path.to_string(),
        clone_url: clone_url.to_string_lossy().to_string(),
        ssh_url: String::new(),
        default_branch: "main".to_string(),
        archived: false,
        last_activity: None,
        size_bytes: 0,
    }
}

/// Mirror options suitable for sandboxed tests: quiet, no preflight, no
/// staleness window.
pub fn test_options(base_dir: &Path) -> MirrorOptions {
    MirrorOptions {
        base_dir: base_dir.to_path_buf(),
        parallel: 2,
        skip_archived: true,
        max_age_months: 0,
        verbose: false,
        skip_preflight: true,
        prefer_ssh: false,
    }
}
