//! Validation of names typed into the page.
//!
//! Every operator-supplied string is checked here before it is joined onto
//! a directory, so a name like `../../etc/x` never reaches the filesystem.

use crate::error::OrganizerError;
use std::path::{Path, PathBuf};

/// Normalise a new file name: trimmed, single component, `.pdf` suffix.
///
/// The suffix check is case-insensitive so `Scan.PDF` is kept as is.
pub fn pdf_file_name(raw: &str) -> Result<String, OrganizerError> {
    let name = raw.trim();
    let invalid = |reason| OrganizerError::InvalidName {
        name: raw.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.contains(['/', '\\']) {
        return Err(invalid("contains a path separator"));
    }
    if name.contains('\0') {
        return Err(invalid("contains a NUL byte"));
    }
    if name == "." || name == ".." {
        return Err(invalid("is a directory reference"));
    }

    if name.to_lowercase().ends_with(".pdf") {
        Ok(name.to_string())
    } else {
        Ok(format!("{name}.pdf"))
    }
}

/// Parse an optional subfolder of the output directory.
///
/// Empty input means the output directory itself. Both `/` and `\` separate
/// segments; empty and `.` segments are dropped. Hidden segments are refused
/// since the folder list never shows them.
pub fn relative_folder(raw: &str) -> Result<PathBuf, OrganizerError> {
    let invalid = |reason| OrganizerError::InvalidFolder {
        folder: raw.to_string(),
        reason,
    };
    let path = relative_path(raw).map_err(invalid)?;
    if path
        .components()
        .any(|c| c.as_os_str().as_encoded_bytes().starts_with(b"."))
    {
        return Err(invalid("must not contain hidden folders"));
    }
    Ok(path)
}

/// Parse a merge target: a non-empty relative file path under the output
/// directory.
pub fn merge_target(raw: &str) -> Result<PathBuf, OrganizerError> {
    let invalid = |reason| OrganizerError::InvalidTarget {
        target: raw.to_string(),
        reason,
    };
    let path = relative_path(raw).map_err(invalid)?;
    if path.as_os_str().is_empty() {
        return Err(invalid("no target selected"));
    }
    Ok(path)
}

/// Render a relative path with `/` separators, as shown on the page.
pub fn display_relative(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn relative_path(raw: &str) -> Result<PathBuf, &'static str> {
    let trimmed = raw.trim();
    if trimmed.contains('\0') {
        return Err("contains a NUL byte");
    }
    if trimmed.starts_with(['/', '\\']) || Path::new(trimmed).is_absolute() {
        return Err("must be relative to the output directory");
    }

    let mut path = PathBuf::new();
    for segment in trimmed.split(['/', '\\']) {
        let segment = segment.trim();
        match segment {
            "" | "." => continue,
            ".." => return Err("must not climb out of the output directory"),
            s if cfg!(windows) && s.ends_with(':') => {
                return Err("must be relative to the output directory")
            }
            s => path.push(s),
        }
    }
    Ok(path)
}
