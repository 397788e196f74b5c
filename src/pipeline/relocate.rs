//! Moving files between the working directories.
//!
//! `rename(2)` is atomic but only works within one filesystem. The input,
//! output and trash directories may well be different mounts (a network
//! share for the archive, say), so [`move_file`] falls back to copy + remove
//! when the kernel reports a cross-device rename.

use crate::error::OrganizerError;
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Move `from` to `to`, creating parent directories of `to` as needed.
///
/// Refuses to replace an existing destination.
pub fn move_file(from: &Path, to: &Path) -> Result<(), OrganizerError> {
    if to.exists() {
        return Err(OrganizerError::DestinationExists {
            path: to.to_path_buf(),
        });
    }
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| OrganizerError::io("Failed to create directory", parent, e))?;
    }

    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::CrossesDevices => {
            debug!(
                "Cross-device move {} → {}, copying",
                from.display(),
                to.display()
            );
            std::fs::copy(from, to).map_err(|e| OrganizerError::io("Failed to copy", from, e))?;
            std::fs::remove_file(from)
                .map_err(|e| OrganizerError::io("Failed to remove after copy", from, e))
        }
        Err(e) => Err(OrganizerError::io("Failed to move", from, e)),
    }
}

/// First free path in `dir` for `name`: `name`, then `stem_(1).ext`, …
pub fn unique_destination(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let desired = Path::new(name);
    let stem = desired
        .file_stem()
        .and_then(OsStr::to_str)
        .filter(|s| !s.is_empty())
        .unwrap_or("document");
    let extension = desired.extension().and_then(OsStr::to_str);

    let mut index = 1usize;
    loop {
        let file_name = match extension {
            Some(ext) if !ext.is_empty() => format!("{stem}_({index}).{ext}"),
            _ => format!("{stem}_({index})"),
        };
        let candidate = dir.join(file_name);
        if !candidate.exists() {
            return candidate;
        }
        index += 1;
    }
}
