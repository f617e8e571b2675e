//! Per-repository clone-or-update operator.
//!
//! A repository is either `NEW` (no local clone) or `EXISTING` (a `.git`
//! directory is present at its destination). New repositories are cloned
//! with a transport fallback; existing clones go through the smart update
//! sequence: fetch, resolve the remote default branch, best-effort stash,
//! checkout, pull — falling back to a hard reset when the pull fails.

use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::config::MirrorOptions;
use crate::git::{is_git_repo, run_git};
use crate::mirror::outcome::Outcome;
use crate::mirror::path::{validate_absolute, validate_relative};
use crate::mirror::preflight::Transport;
use crate::provider::Repository;

/// Stash message marking stashes this tool created
pub const STASH_MESSAGE: &str = "gitmirror auto-stash";

/// Clones or updates a single repository under `options.base_dir`.
///
/// Both path-validation phases run before any directory is created; a
/// violation aborts only this repository's operation.
pub async fn clone_or_update(
    repo: &Repository,
    options: &MirrorOptions,
    transport: Transport,
) -> Result<Outcome> {
    validate_relative(&repo.full_path)
        .with_context(|| format!("invalid path {:?}", repo.full_path))?;

    // Clone into base_dir/<full-path> to preserve the group hierarchy
    let dest = options.base_dir.join(&repo.full_path);
    validate_absolute(&dest).with_context(|| format!("full path too long {:?}", dest))?;

    if is_git_repo(&dest) {
        if options.verbose {
            println!("  ↻ {}", repo.full_path);
        }
        update_repo(&dest, options.verbose)
            .await
            .context("update failed")?;
        return Ok(Outcome::Updated);
    }

    if options.verbose {
        println!("  ↓ {}", repo.full_path);
    }
    clone_with_fallback(repo, &dest, options.verbose, transport).await?;
    Ok(Outcome::Cloned)
}

/// Primary and fallback (url, transport label) per the configured preference.
fn clone_urls(repo: &Repository, transport: Transport) -> [(&str, &'static str); 2] {
    match transport {
        Transport::Ssh => [(repo.ssh_url.as_str(), "SSH"), (repo.clone_url.as_str(), "HTTPS")],
        Transport::Https => [(repo.clone_url.as_str(), "HTTPS"), (repo.ssh_url.as_str(), "SSH")],
    }
}

async fn clone_with_fallback(
    repo: &Repository,
    dest: &Path,
    verbose: bool,
    transport: Transport,
) -> Result<()> {
    let [(primary_url, primary_name), (fallback_url, fallback_name)] = clone_urls(repo, transport);

    let primary_err = match clone_repo(primary_url, dest, verbose).await {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };

    if fallback_url.is_empty() {
        return Err(primary_err).context("clone failed");
    }

    println!("    ! {primary_name} failed, trying {fallback_name}...");
    match clone_repo(fallback_url, dest, verbose).await {
        Ok(()) => Ok(()),
        Err(fallback_err) => bail!(
            "clone failed ({primary_name}: {primary_err:#}, {fallback_name}: {fallback_err:#})"
        ),
    }
}

async fn clone_repo(url: &str, dest: &Path, verbose: bool) -> Result<()> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .context("failed to create directory")?;
    }

    let dest_str = dest.to_string_lossy();
    match run_git(None, &["clone", url, dest_str.as_ref()], verbose).await? {
        (true, _, _) => Ok(()),
        (false, _, stderr) => bail!("git clone failed: {}", short_error(&stderr)),
    }
}

/// Brings an existing clone in line with its remote without losing local work.
async fn update_repo(dir: &Path, verbose: bool) -> Result<()> {
    match run_git(Some(dir), &["fetch", "--all"], verbose).await? {
        (true, _, _) => {}
        (false, _, stderr) => bail!("git fetch failed: {}", short_error(&stderr)),
    }

    let branch = default_branch(dir).await?;

    // The dirtiness check must succeed; proceeding blind could clobber
    // uncommitted work. Only the stash push itself is best-effort: a failed
    // stash is indistinguishable from having nothing to stash and never
    // blocks the update.
    let dirty = match run_git(Some(dir), &["status", "--porcelain"], false).await? {
        (true, output, _) => !output.is_empty(),
        (false, _, stderr) => bail!("git status failed: {}", short_error(&stderr)),
    };
    if dirty {
        match run_git(Some(dir), &["stash", "push", "-m", STASH_MESSAGE], false).await {
            Ok((true, _, _)) => {}
            Ok((false, _, stderr)) => {
                if verbose {
                    eprintln!("    stash failed, continuing: {}", short_error(&stderr));
                }
            }
            Err(e) => {
                if verbose {
                    eprintln!("    stash failed, continuing: {e}");
                }
            }
        }
    }

    checkout_branch(dir, &branch)
        .await
        .with_context(|| format!("failed to checkout {branch}"))?;

    match run_git(Some(dir), &["pull", "origin", &branch], verbose).await {
        Ok((true, _, _)) => Ok(()),
        pull_result => {
            // Divergent histories (a force-pushed upstream) make a plain pull
            // fail even though "make local match remote" is still satisfiable.
            let remote_ref = format!("origin/{branch}");
            match run_git(Some(dir), &["reset", "--hard", &remote_ref], false).await {
                Ok((true, _, _)) => Ok(()),
                _ => {
                    let detail = match pull_result {
                        Ok((_, _, stderr)) => short_error(&stderr).to_string(),
                        Err(e) => e.to_string(),
                    };
                    bail!("git pull and reset failed: {detail}")
                }
            }
        }
    }
}

/// Resolves the remote default branch by reading the symbolic `origin/HEAD`
/// reference and stripping the remote-name prefix.
async fn default_branch(dir: &Path) -> Result<String> {
    match run_git(Some(dir), &["rev-parse", "--abbrev-ref", "origin/HEAD"], false).await? {
        (true, output, _) => {
            let branch = output.strip_prefix("origin/").unwrap_or(&output);
            Ok(branch.to_string())
        }
        (false, _, stderr) => bail!("failed to resolve default branch: {}", short_error(&stderr)),
    }
}

/// Switches to a branch, creating a local tracking branch from the remote if
/// none exists locally yet.
async fn checkout_branch(dir: &Path, branch: &str) -> Result<()> {
    let (ok, _, _) = run_git(Some(dir), &["checkout", branch], false).await?;
    if ok {
        return Ok(());
    }

    let remote_ref = format!("origin/{branch}");
    match run_git(Some(dir), &["checkout", "-b", branch, &remote_ref], false).await? {
        (true, _, _) => Ok(()),
        (false, _, _) => bail!("branch {branch} not found locally or on remote"),
    }
}

/// Last non-empty stderr line; git puts the `fatal:` diagnostic there.
fn short_error(stderr: &str) -> &str {
    stderr
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .unwrap_or("unknown error")
}
