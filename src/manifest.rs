//! Manifest-backed repository source.
//!
//! The engine talks to hosting providers only through the
//! [`RepoSource`](crate::provider::RepoSource) contract. The bundled
//! implementation reads a JSON manifest describing the repositories in each
//! group, which keeps the engine (and its tests) independent of any provider
//! API.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::provider::{RepoSource, Repository};

#[derive(Debug, Deserialize)]
struct Manifest {
    groups: HashMap<String, Vec<Repository>>,
}

/// A [`RepoSource`] over a JSON manifest file.
pub struct ManifestSource {
    manifest: Manifest,
}

impl ManifestSource {
    /// Loads a manifest from disk. The expected shape is
    /// `{"groups": {"my-group": [{"full_path": ..., "clone_url": ...}]}}`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        let manifest: Manifest = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse manifest {}", path.display()))?;
        Ok(Self { manifest })
    }
}

#[async_trait]
impl RepoSource for ManifestSource {
    async fn list_group_repositories(&self, group: &str) -> Result<Vec<Repository>> {
        self.manifest
            .groups
            .get(group)
            .cloned()
            .with_context(|| format!("group {group:?} not present in manifest"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "groups": {
            "acme": [
                {
                    "name": "widgets",
                    "full_path": "acme/widgets",
                    "clone_url": "https://gitlab.example.com/acme/widgets.git",
                    "ssh_url": "git@gitlab.example.com:acme/widgets.git",
                    "archived": false,
                    "last_activity": "2026-01-15T12:00:00Z",
                    "size_bytes": 2048
                },
                {
                    "full_path": "acme/legacy",
                    "clone_url": "https://gitlab.example.com/acme/legacy.git",
                    "archived": true
                }
            ]
        }
    }"#;

    #[tokio::test]
    async fn test_manifest_lists_group_repositories() {
        let manifest: Manifest = serde_json::from_str(SAMPLE).unwrap();
        let source = ManifestSource { manifest };

        let repos = source.list_group_repositories("acme").await.unwrap();
        assert_eq!(repos.len(), 2);
        assert_eq!(repos[0].full_path, "acme/widgets");
        assert_eq!(repos[0].size_bytes, 2048);
        assert!(repos[0].last_activity.is_some());
        // Optional fields fall back to defaults
        assert!(repos[1].archived);
        assert!(repos[1].ssh_url.is_empty());
        assert!(repos[1].last_activity.is_none());
    }

    #[tokio::test]
    async fn test_unknown_group_is_an_error() {
        let manifest: Manifest = serde_json::from_str(SAMPLE).unwrap();
        let source = ManifestSource { manifest };

        let err = source.list_group_repositories("nope").await.unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
