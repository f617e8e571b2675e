//! Git process plumbing: command execution, remote probes, availability check

use anyhow::Result;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

// Timeout constants
const GIT_OPERATION_TIMEOUT_SECS: u64 = 1800; // Clones of large repositories take a while
const LS_REMOTE_TIMEOUT_SECS: u64 = 10; // Preflight probes must fail fast

/// Runs a git command with a timeout, optionally inside a directory.
/// Returns (success, stdout, stderr).
///
/// In verbose mode git's own stdout/stderr stream straight to the terminal
/// and the captured strings are empty.
pub async fn run_git(
    dir: Option<&Path>,
    args: &[&str],
    verbose: bool,
) -> Result<(bool, String, String)> {
    let timeout_duration = Duration::from_secs(GIT_OPERATION_TIMEOUT_SECS);

    let mut cmd = Command::new("git");
    cmd.args(args);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    if verbose {
        let result = tokio::time::timeout(timeout_duration, cmd.status()).await;
        return match result {
            Ok(Ok(status)) => Ok((status.success(), String::new(), String::new())),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(anyhow::anyhow!(
                "git operation timed out after {} seconds",
                GIT_OPERATION_TIMEOUT_SECS
            )),
        };
    }

    let result = tokio::time::timeout(timeout_duration, cmd.output()).await;
    match result {
        Ok(Ok(output)) => Ok((
            output.status.success(),
            String::from_utf8_lossy(&output.stdout).trim().to_string(),
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        )),
        Ok(Err(e)) => Err(e.into()),
        Err(_) => Err(anyhow::anyhow!(
            "git operation timed out after {} seconds",
            GIT_OPERATION_TIMEOUT_SECS
        )),
    }
}

/// Tests whether git can reach and authenticate against a remote URL without
/// cloning, via `ls-remote`. Interactive credential prompts are disabled so a
/// broken credential setup fails instead of hanging on user input.
pub async fn probe_remote(url: &str) -> bool {
    let result = tokio::time::timeout(
        Duration::from_secs(LS_REMOTE_TIMEOUT_SECS),
        Command::new("git")
            .args(["ls-remote", "--quiet", url])
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status(),
    )
    .await;

    matches!(result, Ok(Ok(status)) if status.success())
}

/// A directory counts as an existing clone iff it has a `.git` subdirectory.
pub fn is_git_repo(dir: &Path) -> bool {
    dir.join(".git").is_dir()
}

/// Verifies that git is available before any run begins.
/// Returns an error with platform-specific installation instructions if not.
pub fn check_git_installed() -> Result<()> {
    let available = std::process::Command::new("git")
        .arg("--version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false);

    if available {
        Ok(())
    } else {
        anyhow::bail!(git_not_found_message())
    }
}

fn git_not_found_message() -> String {
    let instructions = if cfg!(target_os = "windows") {
        "  Install git using one of:\n\
         \n\
         \x20   • winget (recommended):\n\
         \x20     winget install Git.Git\n\
         \n\
         \x20   • Chocolatey:\n\
         \x20     choco install git\n\
         \n\
         \x20   • Manual download:\n\
         \x20     https://git-scm.com/download/win\n\
         \n\
         \x20 After installing, restart your terminal."
    } else if cfg!(target_os = "macos") {
        "  Install git using one of:\n\
         \n\
         \x20   • Xcode Command Line Tools (recommended):\n\
         \x20     xcode-select --install\n\
         \n\
         \x20   • Homebrew:\n\
         \x20     brew install git\n\
         \n\
         \x20   • Manual download:\n\
         \x20     https://git-scm.com/download/mac"
    } else if cfg!(target_os = "linux") {
        "  Install git using your package manager:\n\
         \n\
         \x20   • Debian/Ubuntu:\n\
         \x20     sudo apt install git\n\
         \n\
         \x20   • Fedora:\n\
         \x20     sudo dnf install git\n\
         \n\
         \x20   • Arch:\n\
         \x20     sudo pacman -S git"
    } else {
        "  Install git from:\n\
         \x20     https://git-scm.com/downloads"
    };

    format!("git is not installed\n\n{instructions}\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_directory_is_not_a_repo() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_git_repo(dir.path()));
    }

    #[test]
    fn test_git_dir_must_be_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        // A `.git` file (as used by worktrees) does not count here
        std::fs::write(dir.path().join(".git"), "gitdir: elsewhere").unwrap();
        assert!(!is_git_repo(dir.path()));
    }

    #[test]
    fn test_git_not_found_message_names_the_tool() {
        assert!(git_not_found_message().contains("git is not installed"));
    }

    #[tokio::test]
    async fn test_probe_remote_fails_for_missing_path() {
        assert!(!probe_remote("/definitely/not/a/repo").await);
    }
}
