//! Error types for the scan-organizer library.
//!
//! Every failure surfaces as an [`OrganizerError`]. The variants fall into
//! three groups that the HTTP layer maps onto status codes:
//!
//! * **Operator errors**: a bad name, folder or merge target typed into the
//!   page. Nothing on disk was touched. (`400`, `404`, `409`)
//! * **Tool errors**: `pdftoppm` or `pdfcpu` could not be started or exited
//!   non-zero. The captured output is kept so the operator can see it. (`500`)
//! * **I/O errors**: a rename, copy or directory scan failed. (`500`)
//!
//! See [`OrganizerError::status_code`] for the exact mapping.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the scan-organizer library.
#[derive(Debug, Error)]
pub enum OrganizerError {
    // ── Queue errors ──────────────────────────────────────────────────────
    /// The pending queue is empty; there is nothing to show or consume.
    #[error("No PDFs found")]
    NoPending,

    // ── Operator input errors ─────────────────────────────────────────────
    /// The new file name is empty or would escape its directory.
    #[error("Invalid file name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// The folder is absolute or climbs out of the output directory.
    #[error("Invalid folder '{folder}': {reason}")]
    InvalidFolder { folder: String, reason: &'static str },

    /// The merge target is not a relative path inside the output directory.
    #[error("Invalid merge target '{target}': {reason}")]
    InvalidTarget { target: String, reason: &'static str },

    /// The merge target does not exist in the output directory.
    #[error("Merge target '{target}' not found in the output directory")]
    UnknownTarget { target: String },

    /// A rename would overwrite an existing file.
    #[error("Destination already exists: '{path}'\nPick another name or folder.")]
    DestinationExists { path: PathBuf },

    // ── External tool errors ──────────────────────────────────────────────
    /// The external program could not be started at all.
    #[error("Failed to run '{program}': {source}\nIs it installed and on PATH?")]
    ToolUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The rasterizer exited non-zero or produced no image.
    #[error("Preview rendering failed for '{path}': {detail}")]
    RasterisationFailed { path: PathBuf, detail: String },

    /// The PDF merge utility exited non-zero.
    #[error("Failed to merge: {status}\nStdout: {stdout}\nStderr: {stderr}")]
    MergeFailed {
        status: String,
        stdout: String,
        stderr: String,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// A filesystem operation failed.
    #[error("{action} '{path}': {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl OrganizerError {
    /// Shorthand for wrapping an [`std::io::Error`] with the path it concerns.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// HTTP status code the web layer answers with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NoPending | Self::UnknownTarget { .. } => 404,
            Self::InvalidName { .. } | Self::InvalidFolder { .. } | Self::InvalidTarget { .. } => {
                400
            }
            Self::DestinationExists { .. } => 409,
            Self::ToolUnavailable { .. }
            | Self::RasterisationFailed { .. }
            | Self::MergeFailed { .. }
            | Self::Io { .. }
            | Self::InvalidConfig(_)
            | Self::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_pending_matches_page_text() {
        assert_eq!(OrganizerError::NoPending.to_string(), "No PDFs found");
        assert_eq!(OrganizerError::NoPending.status_code(), 404);
    }

    #[test]
    fn merge_failed_carries_tool_output() {
        let e = OrganizerError::MergeFailed {
            status: "exit status: 1".into(),
            stdout: "reading a.pdf".into(),
            stderr: "pdfcpu: invalid xref".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("exit status: 1"), "got: {msg}");
        assert!(msg.contains("invalid xref"), "got: {msg}");
        assert_eq!(e.status_code(), 500);
    }

    #[test]
    fn operator_errors_are_client_errors() {
        let e = OrganizerError::InvalidName {
            name: "../x".into(),
            reason: "contains a path separator",
        };
        assert_eq!(e.status_code(), 400);

        let e = OrganizerError::DestinationExists {
            path: PathBuf::from("output/a.pdf"),
        };
        assert_eq!(e.status_code(), 409);
        assert!(e.to_string().contains("output/a.pdf"));
    }

    #[test]
    fn io_error_names_action_and_path() {
        let e = OrganizerError::io(
            "Failed to move",
            "input/scan.pdf",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let msg = e.to_string();
        assert!(msg.starts_with("Failed to move 'input/scan.pdf'"), "got: {msg}");
    }
}
