//! Per-repository outcomes and results

use std::time::Duration;

use crate::provider::Repository;

/// What happened to one repository during a mirror run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// No local clone existed; one was created
    Cloned,
    /// An existing clone was brought up to date
    Updated,
    /// Excluded by the archived-repository policy
    SkippedArchived,
    /// Excluded by the staleness policy
    SkippedStale,
    /// Clone or update failed; details in [`MirrorResult::error`]
    Failed,
}

impl Outcome {
    /// Returns the emoji symbol for this outcome
    pub fn symbol(&self) -> &str {
        match self {
            Outcome::Cloned | Outcome::Updated => "🟢",
            Outcome::SkippedArchived | Outcome::SkippedStale => "🟠",
            Outcome::Failed => "🔴",
        }
    }

    /// Returns the text representation of this outcome
    pub fn text(&self) -> &str {
        match self {
            Outcome::Cloned => "cloned",
            Outcome::Updated => "updated",
            Outcome::SkippedArchived => "skipped (archived)",
            Outcome::SkippedStale => "skipped (stale)",
            Outcome::Failed => "failed",
        }
    }
}

/// One result per repository considered by the engine.
///
/// Skipped repositories carry a zero duration; for clone/update work the
/// duration spans only the operation itself, not queueing time.
#[derive(Clone, Debug)]
pub struct MirrorResult {
    pub repository: Repository,
    pub outcome: Outcome,
    pub error: Option<String>,
    pub duration: Duration,
}

impl MirrorResult {
    pub fn completed(repository: Repository, outcome: Outcome, duration: Duration) -> Self {
        Self {
            repository,
            outcome,
            error: None,
            duration,
        }
    }

    pub fn skipped(repository: Repository, outcome: Outcome) -> Self {
        Self {
            repository,
            outcome,
            error: None,
            duration: Duration::ZERO,
        }
    }

    pub fn failed(repository: Repository, error: impl Into<String>, duration: Duration) -> Self {
        Self {
            repository,
            outcome: Outcome::Failed,
            error: Some(error.into()),
            duration,
        }
    }
}
