//! # gitmirror
//!
//! `gitmirror` mirrors every repository under a set of GitLab groups or
//! GitHub organizations to local disk, cloning new repositories and updating
//! existing clones with bounded parallelism.
//!
//! ## Core Features
//!
//! - **Concurrent Mirroring**: semaphore-bounded clone/update fan-out over
//!   hundreds of repositories, one result per repository.
//! - **Credential Preflight**: probes HTTPS and SSH before any clone work so
//!   a broken credential setup fails fast with remediation guidance.
//! - **Filtering Policy**: skips archived repositories and repositories with
//!   no recent activity.
//! - **Conflict-Safe Updates**: fetch, stash, checkout, pull — with a hard
//!   reset to the remote branch tip when histories have diverged.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gitmirror::config::MirrorOptions;
//! use gitmirror::manifest::ManifestSource;
//! use gitmirror::mirror::MirrorEngine;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let source = ManifestSource::load(std::path::Path::new("repos.json"))?;
//!     let engine = MirrorEngine::new(source, MirrorOptions::default());
//!     let results = engine.mirror_groups(&["my-group".to_string()]).await?;
//!     gitmirror::report::print_results(&results);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod git;
pub mod manifest;
pub mod mirror;
pub mod provider;
pub mod report;
