//! Archival and staleness policy over the fetched repository list

use chrono::{DateTime, Months, Utc};

use crate::config::MirrorOptions;
use crate::mirror::outcome::{MirrorResult, Outcome};
use crate::provider::Repository;

/// The partition produced by [`partition_repos`]: repositories that proceed
/// to the executor, and pre-built results for everything the policy skipped.
pub struct FilterOutcome {
    pub proceed: Vec<Repository>,
    pub skipped: Vec<MirrorResult>,
}

/// Applies the archival and staleness policy.
///
/// Archived is checked first, so a repository that is both archived and stale
/// reports as archived. Repositories with no known last-activity timestamp
/// are never treated as stale.
pub fn partition_repos(
    repos: Vec<Repository>,
    options: &MirrorOptions,
    now: DateTime<Utc>,
) -> FilterOutcome {
    let cutoff = if options.max_age_months > 0 {
        now.checked_sub_months(Months::new(options.max_age_months))
    } else {
        None
    };

    let mut proceed = Vec::with_capacity(repos.len());
    let mut skipped = Vec::new();

    for repo in repos {
        if options.skip_archived && repo.archived {
            skipped.push(MirrorResult::skipped(repo, Outcome::SkippedArchived));
            continue;
        }

        if let (Some(cutoff), Some(last_activity)) = (cutoff, repo.last_activity) {
            if last_activity < cutoff {
                skipped.push(MirrorResult::skipped(repo, Outcome::SkippedStale));
                continue;
            }
        }

        proceed.push(repo);
    }

    FilterOutcome { proceed, skipped }
}
