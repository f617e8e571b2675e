//! Human-readable rendering of mirror results

use std::time::Duration;

use crate::mirror::outcome::{MirrorResult, Outcome};

const KB: i64 = 1024;
const MB: i64 = KB * 1024;
const GB: i64 = MB * 1024;

/// Formats a byte count as a human-readable size
pub fn format_size(bytes: i64) -> String {
    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.0} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

fn format_duration(duration: Duration) -> String {
    format!("{:.1}s", duration.as_secs_f64())
}

/// Prints one line per repository followed by a summary with counts per
/// outcome kind. Failures are listed individually with their diagnostic.
pub fn print_results(results: &[MirrorResult]) {
    let mut cloned = 0usize;
    let mut updated = 0usize;
    let mut archived = 0usize;
    let mut stale = 0usize;
    let mut failed = 0usize;

    println!();
    for result in results {
        let path = &result.repository.full_path;
        match result.outcome {
            Outcome::Cloned => {
                cloned += 1;
                println!("  🟢 {path} {}", format_duration(result.duration));
            }
            Outcome::Updated => {
                updated += 1;
                println!("  🟢 {path} {}", format_duration(result.duration));
            }
            Outcome::SkippedArchived => {
                archived += 1;
                println!("  🟠 {path} (archived)");
            }
            Outcome::SkippedStale => {
                stale += 1;
                let last = result
                    .repository
                    .last_activity
                    .map(|t| t.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                println!("  🟠 {path} (stale: {last})");
            }
            Outcome::Failed => {
                failed += 1;
                let detail = result.error.as_deref().unwrap_or("unknown error");
                println!("  🔴 {path} {detail}");
            }
        }
    }

    println!();
    println!("Summary");
    if cloned > 0 {
        println!("  🟢 Cloned:   {cloned}");
    }
    if updated > 0 {
        println!("  🟢 Updated:  {updated}");
    }
    if archived > 0 {
        println!("  🟠 Archived: {archived}");
    }
    if stale > 0 {
        println!("  🟠 Stale:    {stale}");
    }
    if failed > 0 {
        println!("  🔴 Failed:   {failed}");
    }
    println!("  Total:    {}", results.len());
}
