//! The mirror engine: listing, preflight, filtering, and the bounded-parallel
//! fan-out over the surviving repositories.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::{watch, Semaphore};

use crate::config::MirrorOptions;
use crate::mirror::filter::{partition_repos, FilterOutcome};
use crate::mirror::operator::clone_or_update;
use crate::mirror::outcome::MirrorResult;
use crate::mirror::preflight::{preflight, Transport};
use crate::provider::{RepoSource, Repository};
use crate::report::format_size;

const CANCELLED_MESSAGE: &str = "cancelled before start";
const PROGRESS_TEMPLATE: &str = "{prefix:.bold} [{bar:30}] {pos}/{len} {wide_msg}";
const PROGRESS_CHARS: &str = "##-";

/// Drives a mirror run over a [`RepoSource`].
pub struct MirrorEngine<S> {
    source: S,
    options: MirrorOptions,
    cancel: watch::Receiver<bool>,
}

impl<S: RepoSource> MirrorEngine<S> {
    /// Creates an engine without an external cancellation signal.
    pub fn new(source: S, options: MirrorOptions) -> Self {
        let (_cancel_tx, cancel_rx) = watch::channel(false);
        Self::with_cancel(source, options, cancel_rx)
    }

    /// Creates an engine observing a cancellation signal. Units of work that
    /// have not started when the signal fires complete as failed results
    /// without touching the network or the filesystem.
    pub fn with_cancel(source: S, mut options: MirrorOptions, cancel: watch::Receiver<bool>) -> Self {
        options.parallel = options.parallel.max(1);
        Self {
            source,
            options,
            cancel,
        }
    }

    pub fn options(&self) -> &MirrorOptions {
        &self.options
    }

    /// Mirrors every repository under the given groups.
    ///
    /// Listing and preflight failures abort the run before any clone work;
    /// per-repository failures are isolated and surface as data in the
    /// returned results. Every repository fetched from the source yields
    /// exactly one result.
    pub async fn mirror_groups(&self, groups: &[String]) -> Result<Vec<MirrorResult>> {
        let mut all_repos = Vec::new();
        for group in groups {
            println!("→ Fetching repos from {group}...");
            let repos = self
                .source
                .list_group_repositories(group)
                .await
                .with_context(|| format!("failed to list repositories for group {group}"))?;

            let total_size: i64 = repos.iter().map(|r| r.size_bytes).sum();
            println!("→ Found {} repos ({})\n", repos.len(), format_size(total_size));
            all_repos.extend(repos);
        }

        let mut transport = Transport::preferred(self.options.prefer_ssh);
        if !all_repos.is_empty() && !self.options.skip_preflight {
            println!("→ Checking git credentials...");
            transport = preflight(&all_repos, self.options.prefer_ssh).await?;
            if transport == Transport::Ssh && !self.options.prefer_ssh {
                println!("✓ HTTPS unavailable, using SSH\n");
            } else {
                println!("✓ Git credentials OK ({})\n", transport.label());
            }
        }

        let FilterOutcome {
            proceed,
            mut skipped,
        } = partition_repos(all_repos, &self.options, Utc::now());

        let mut results = self.execute(proceed, transport).await;
        results.append(&mut skipped);
        Ok(results)
    }

    /// Runs the clone/update operator for every repository with at most
    /// `options.parallel` in flight.
    async fn execute(&self, repos: Vec<Repository>, transport: Transport) -> Vec<MirrorResult> {
        let total = repos.len();
        let semaphore = Arc::new(Semaphore::new(self.options.parallel));
        let options = Arc::new(self.options.clone());
        let progress = if !self.options.verbose && total > 0 {
            Some(create_mirror_progress(total as u64))
        } else {
            None
        };

        let mut futures = FuturesUnordered::new();
        for repo in repos {
            let semaphore = Arc::clone(&semaphore);
            let options = Arc::clone(&options);
            let cancel = self.cancel.clone();
            futures.push(async move { mirror_one(repo, options, transport, semaphore, cancel).await });
        }

        let mut results = Vec::with_capacity(total);
        while let Some(result) = futures.next().await {
            if let Some(pb) = &progress {
                pb.set_message(result.repository.full_path.clone());
                pb.inc(1);
            }
            results.push(result);
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }
        results
    }
}

/// One unit of work. The duration spans only the clone-or-update itself,
/// never time spent queued on the admission gate.
async fn mirror_one(
    repo: Repository,
    options: Arc<MirrorOptions>,
    transport: Transport,
    semaphore: Arc<Semaphore>,
    cancel: watch::Receiver<bool>,
) -> MirrorResult {
    if *cancel.borrow() {
        return MirrorResult::failed(repo, CANCELLED_MESSAGE, Duration::ZERO);
    }

    let _permit = match semaphore.acquire().await {
        Ok(permit) => permit,
        Err(e) => {
            return MirrorResult::failed(repo, format!("semaphore error: {e}"), Duration::ZERO)
        }
    };

    if *cancel.borrow() {
        return MirrorResult::failed(repo, CANCELLED_MESSAGE, Duration::ZERO);
    }

    let start = Instant::now();
    match clone_or_update(&repo, &options, transport).await {
        Ok(outcome) => MirrorResult::completed(repo, outcome, start.elapsed()),
        Err(e) => MirrorResult::failed(repo, format!("{e:#}"), start.elapsed()),
    }
}

fn create_mirror_progress(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(PROGRESS_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars(PROGRESS_CHARS);
    pb.set_style(style);
    pb.set_prefix("mirroring");
    pb
}
