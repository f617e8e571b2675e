//! Mirror configuration and concurrency defaults

use std::path::PathBuf;

// Concurrency Configuration
//
// Clone and update operations are I/O-bound but each one holds a git process
// and a network connection, so the default is derived from the CPU count and
// capped to avoid hammering a single remote host.

/// Concurrency cap for clone/update operations
pub const MIRROR_CONCURRENT_CAP: usize = 12;

/// Default staleness window in months (0 disables the check)
pub const DEFAULT_MAX_AGE_MONTHS: u32 = 12;

/// Recognized options for a mirror run.
#[derive(Debug, Clone)]
pub struct MirrorOptions {
    /// Destination root; each repository lands at `<base_dir>/<full_path>`
    pub base_dir: PathBuf,
    /// Maximum concurrent clone/update operations (coerced to at least 1)
    pub parallel: usize,
    /// Skip repositories the provider has archived
    pub skip_archived: bool,
    /// Skip repositories with no activity in this many months (0 = no limit)
    pub max_age_months: u32,
    /// Stream git's own stdout/stderr instead of the progress display
    pub verbose: bool,
    /// Skip the credential preflight probe
    pub skip_preflight: bool,
    /// Probe and clone over SSH before HTTPS
    pub prefer_ssh: bool,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            parallel: default_parallelism(),
            skip_archived: true,
            max_age_months: DEFAULT_MAX_AGE_MONTHS,
            verbose: false,
            skip_preflight: false,
            prefer_ssh: false,
        }
    }
}

/// `~/git-repos`, falling back to the current directory when the home
/// directory cannot be determined.
pub fn default_base_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("git-repos")
}

/// Smart default: CPU cores + 2, capped at [`MIRROR_CONCURRENT_CAP`].
pub fn default_parallelism() -> usize {
    (num_cpus::get() + 2).clamp(1, MIRROR_CONCURRENT_CAP)
}
