//! Filesystem path validation for repository destinations.
//!
//! Validation runs in two phases. The relative check rejects unsafe paths
//! before the destination root is even known; after joining to the root, a
//! second check enforces the true absolute-path ceiling. Both phases must
//! pass before any directory is created.
//!
//! The platform rules are parameterized so the Windows rules stay testable
//! on any host.

use anyhow::{bail, Result};
use std::path::Path;

// Windows MAX_PATH is 260 characters including the terminator; 259 is the
// safe absolute limit. The relative budget assumes the destination root may
// eat ~60 characters of it.
const WINDOWS_MAX_ABSOLUTE: usize = 259;
const WINDOWS_MAX_RELATIVE: usize = 199;

// Unix PATH_MAX is typically 4096 for the full path.
const UNIX_MAX_ABSOLUTE: usize = 4096;
const UNIX_MAX_RELATIVE: usize = 3000;

const WINDOWS_INVALID_CHARS: &[char] = &['<', '>', ':', '"', '|', '?', '*', '\0'];
const UNIX_INVALID_CHARS: &[char] = &['\0'];

const WINDOWS_RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Validates a relative hierarchical path before it is joined to the
/// destination root.
pub fn validate_relative(path: &str) -> Result<()> {
    validate_relative_for(path, cfg!(windows))
}

/// Validates the complete absolute path length after joining.
pub fn validate_absolute(path: &Path) -> Result<()> {
    validate_absolute_for(path.to_string_lossy().len(), cfg!(windows))
}

fn validate_relative_for(path: &str, windows: bool) -> Result<()> {
    if path.is_empty() {
        bail!("path cannot be empty");
    }

    let invalid_chars = if windows {
        WINDOWS_INVALID_CHARS
    } else {
        UNIX_INVALID_CHARS
    };
    for ch in invalid_chars {
        if path.contains(*ch) {
            bail!("path contains invalid character: {:?}", ch);
        }
    }

    if path.contains("..") {
        bail!("path contains invalid sequence: ..");
    }

    if windows {
        validate_windows_components(path)?;
    }

    let max_len = if windows {
        WINDOWS_MAX_RELATIVE
    } else {
        UNIX_MAX_RELATIVE
    };
    if path.len() > max_len {
        bail!(
            "path exceeds maximum length of {} characters (got {})",
            max_len,
            path.len()
        );
    }

    Ok(())
}

fn validate_absolute_for(len: usize, windows: bool) -> Result<()> {
    let max_len = if windows {
        WINDOWS_MAX_ABSOLUTE
    } else {
        UNIX_MAX_ABSOLUTE
    };
    if len > max_len {
        bail!(
            "absolute path length {} exceeds the platform limit of {}",
            len,
            max_len
        );
    }
    Ok(())
}

/// Rejects Windows reserved device names and components that end in a dot or
/// space. The reserved-name check applies to each component's basename before
/// its extension, case-insensitively.
fn validate_windows_components(path: &str) -> Result<()> {
    for component in path.split(['/', '\\']) {
        let base = match component.rsplit_once('.') {
            Some((base, _ext)) => base,
            None => component,
        };
        let base_upper = base.to_ascii_uppercase();
        if WINDOWS_RESERVED_NAMES.contains(&base_upper.as_str()) {
            bail!("path contains Windows reserved name: {:?}", component);
        }

        if component.ends_with('.') || component.ends_with(' ') {
            bail!(
                "path component {:?} ends with an invalid character (dot or space)",
                component
            );
        }
    }
    Ok(())
}
