//! Update-path tests: idempotence, dirty worktrees, and divergent histories

mod common;

use common::git::{head_commit, stash_list};
use common::{amend_head_commit, create_test_commit, is_git_available, local_repo, setup_git_repo, test_options};
use gitmirror::mirror::{clone_or_update, Outcome, Transport};
use tempfile::TempDir;

#[tokio::test]
async fn test_second_run_updates_instead_of_recloning() {
    if !is_git_available() {
        eprintln!("Skipping test: git not available");
        return;
    }

    let source_dir = TempDir::new().unwrap();
    setup_git_repo(source_dir.path()).unwrap();
    create_test_commit(source_dir.path(), "a.txt", "one", "Initial commit").unwrap();

    let base_dir = TempDir::new().unwrap();
    let repo = local_repo("group/proj", source_dir.path());
    let options = test_options(base_dir.path());

    let first = clone_or_update(&repo, &options, Transport::Https).await.unwrap();
    assert_eq!(first, Outcome::Cloned);

    create_test_commit(source_dir.path(), "b.txt", "two", "Second commit").unwrap();

    let second = clone_or_update(&repo, &options, Transport::Https).await.unwrap();
    assert_eq!(second, Outcome::Updated);

    let dest = base_dir.path().join("group/proj");
    assert!(dest.join("b.txt").is_file());
    assert_eq!(
        head_commit(&dest).unwrap(),
        head_commit(source_dir.path()).unwrap()
    );
}

#[tokio::test]
async fn test_local_changes_are_stashed_before_update() {
    if !is_git_available() {
        eprintln!("Skipping test: git not available");
        return;
    }

    let source_dir = TempDir::new().unwrap();
    setup_git_repo(source_dir.path()).unwrap();
    create_test_commit(source_dir.path(), "a.txt", "one", "Initial commit").unwrap();

    let base_dir = TempDir::new().unwrap();
    let repo = local_repo("group/proj", source_dir.path());
    let options = test_options(base_dir.path());
    clone_or_update(&repo, &options, Transport::Https).await.unwrap();

    // Dirty the clone, then advance the source
    let dest = base_dir.path().join("group/proj");
    std::fs::write(dest.join("a.txt"), "local edit").unwrap();
    create_test_commit(source_dir.path(), "a.txt", "upstream edit", "Upstream change").unwrap();

    let outcome = clone_or_update(&repo, &options, Transport::Https).await.unwrap();
    assert_eq!(outcome, Outcome::Updated);

    // The local edit survived as a stash entry instead of blocking the pull
    let stashes = stash_list(&dest).unwrap();
    assert!(stashes.contains("gitmirror auto-stash"), "stash list: {stashes}");
    assert_eq!(
        std::fs::read_to_string(dest.join("a.txt")).unwrap(),
        "upstream edit"
    );
}

#[tokio::test]
async fn test_status_failure_aborts_the_update() {
    if !is_git_available() {
        eprintln!("Skipping test: git not available");
        return;
    }

    let source_dir = TempDir::new().unwrap();
    setup_git_repo(source_dir.path()).unwrap();
    create_test_commit(source_dir.path(), "a.txt", "one", "Initial commit").unwrap();

    let base_dir = TempDir::new().unwrap();
    let repo = local_repo("group/proj", source_dir.path());
    let options = test_options(base_dir.path());
    clone_or_update(&repo, &options, Transport::Https).await.unwrap();

    // A corrupt index breaks `git status` but not the fetch that precedes it.
    // The update must stop rather than assume the worktree is clean.
    let dest = base_dir.path().join("group/proj");
    std::fs::write(dest.join(".git/index"), "not an index").unwrap();

    let err = clone_or_update(&repo, &options, Transport::Https)
        .await
        .unwrap_err();
    assert!(
        format!("{err:#}").contains("git status failed"),
        "unexpected error: {err:#}"
    );
}

#[tokio::test]
async fn test_divergent_history_resets_to_remote() {
    if !is_git_available() {
        eprintln!("Skipping test: git not available");
        return;
    }

    let source_dir = TempDir::new().unwrap();
    setup_git_repo(source_dir.path()).unwrap();
    create_test_commit(source_dir.path(), "a.txt", "one", "Initial commit").unwrap();
    create_test_commit(source_dir.path(), "b.txt", "two", "Second commit").unwrap();

    let base_dir = TempDir::new().unwrap();
    let repo = local_repo("group/proj", source_dir.path());
    let options = test_options(base_dir.path());
    clone_or_update(&repo, &options, Transport::Https).await.unwrap();

    // Rewrite upstream history so a plain pull cannot fast-forward
    amend_head_commit(source_dir.path(), "Rewritten second commit").unwrap();

    let outcome = clone_or_update(&repo, &options, Transport::Https).await.unwrap();
    assert_eq!(outcome, Outcome::Updated);

    let dest = base_dir.path().join("group/proj");
    assert_eq!(
        head_commit(&dest).unwrap(),
        head_commit(source_dir.path()).unwrap()
    );
}
