//! gitmirror: mirror GitLab groups and GitHub organizations to local disk

use anyhow::{ensure, Result};
use clap::{Arg, ArgAction, Command as ClapCommand};
use std::path::PathBuf;
use tokio::sync::watch;

use gitmirror::config::{default_base_dir, default_parallelism, MirrorOptions, DEFAULT_MAX_AGE_MONTHS};
use gitmirror::git::check_git_installed;
use gitmirror::manifest::ManifestSource;
use gitmirror::mirror::MirrorEngine;
use gitmirror::report::print_results;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = ClapCommand::new("gitmirror")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Mirror repositories from GitLab groups and GitHub organizations to local disk")
        .arg(
            Arg::new("groups")
                .required(true)
                .value_name("GROUPS")
                .help("Comma-separated group/organization paths to mirror"),
        )
        .arg(
            Arg::new("manifest")
                .long("manifest")
                .short('m')
                .required(true)
                .value_name("FILE")
                .help("JSON manifest describing the repositories in each group"),
        )
        .arg(
            Arg::new("dir")
                .long("dir")
                .short('d')
                .value_name("DIR")
                .help("Destination root directory (default: ~/git-repos)"),
        )
        .arg(
            Arg::new("parallel")
                .long("parallel")
                .value_name("N")
                .value_parser(clap::value_parser!(usize))
                .help("Number of parallel clone/update operations"),
        )
        .arg(
            Arg::new("max-age")
                .long("max-age")
                .value_name("MONTHS")
                .value_parser(clap::value_parser!(u32))
                .help("Skip repos not updated in this many months, 0 = no limit (default: 12)"),
        )
        .arg(
            Arg::new("include-archived")
                .long("include-archived")
                .action(ArgAction::SetTrue)
                .help("Mirror archived repositories too"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .action(ArgAction::SetTrue)
                .help("Stream git output instead of the progress display"),
        )
        .arg(
            Arg::new("skip-preflight")
                .long("skip-preflight")
                .action(ArgAction::SetTrue)
                .help("Skip git credential validation before cloning"),
        )
        .arg(
            Arg::new("ssh")
                .long("ssh")
                .action(ArgAction::SetTrue)
                .help("Prefer SSH URLs over HTTPS for git operations"),
        )
        .get_matches();

    // Check git is installed before doing anything else
    check_git_installed()?;

    let groups: Vec<String> = matches
        .get_one::<String>("groups")
        .map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();
    ensure!(!groups.is_empty(), "no groups given");

    let options = MirrorOptions {
        base_dir: matches
            .get_one::<String>("dir")
            .map(PathBuf::from)
            .unwrap_or_else(default_base_dir),
        parallel: matches
            .get_one::<usize>("parallel")
            .copied()
            .unwrap_or_else(default_parallelism),
        skip_archived: !matches.get_flag("include-archived"),
        max_age_months: matches
            .get_one::<u32>("max-age")
            .copied()
            .unwrap_or(DEFAULT_MAX_AGE_MONTHS),
        verbose: matches.get_flag("verbose"),
        skip_preflight: matches.get_flag("skip-preflight"),
        prefer_ssh: matches.get_flag("ssh"),
    };

    let manifest_path = matches
        .get_one::<String>("manifest")
        .map(PathBuf::from)
        .unwrap_or_default();
    let source = ManifestSource::load(&manifest_path)?;

    // Ctrl-C flips the cancellation signal; queued work completes as failed
    // results instead of starting new clones.
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\ninterrupt received, finishing in-flight operations...");
            let _ = cancel_tx.send(true);
        }
    });

    let engine = MirrorEngine::with_cancel(source, options, cancel_rx);
    let results = engine.mirror_groups(&groups).await?;
    print_results(&results);

    Ok(())
}
