//! Appending one PDF onto another through an external merge utility.
//!
//! The merged document is written into a hidden scratch directory next to
//! the target and only renamed over the target once the tool has exited
//! successfully. A failed or interrupted merge therefore never leaves a
//! truncated target behind.

use crate::error::OrganizerError;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Merges several PDFs, in order, into a new file.
///
/// Implementations are called from a blocking thread and may block freely.
pub trait PdfMerger: Send + Sync {
    /// Write the concatenation of `inputs` to `output`.
    fn merge(&self, output: &Path, inputs: &[&Path]) -> Result<(), OrganizerError>;
}

/// [`PdfMerger`] backed by `pdfcpu merge <out> <in>...`.
#[derive(Debug, Clone)]
pub struct Pdfcpu {
    pub program: String,
}

impl PdfMerger for Pdfcpu {
    fn merge(&self, output: &Path, inputs: &[&Path]) -> Result<(), OrganizerError> {
        let mut cmd = Command::new(&self.program);
        cmd.arg("merge").arg(output).args(inputs);
        debug!("Running {:?}", cmd);

        let result = cmd.output().map_err(|e| OrganizerError::ToolUnavailable {
            program: self.program.clone(),
            source: e,
        })?;
        let stdout = String::from_utf8_lossy(&result.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&result.stderr).into_owned();

        if !result.status.success() {
            warn!("Merge command failed with {}", result.status);
            warn!("Stdout: {}", stdout);
            warn!("Stderr: {}", stderr);
            return Err(OrganizerError::MergeFailed {
                status: result.status.to_string(),
                stdout,
                stderr,
            });
        }

        debug!("Merge output:\n{}", stdout);
        Ok(())
    }
}

/// Append `addition` to the end of `target`, replacing `target` in place.
pub async fn merge_onto(
    merger: Arc<dyn PdfMerger>,
    target: &Path,
    addition: &Path,
) -> Result<(), OrganizerError> {
    let target = target.to_path_buf();
    let addition = addition.to_path_buf();

    tokio::task::spawn_blocking(move || merge_onto_blocking(merger.as_ref(), &target, &addition))
        .await
        .map_err(|e| OrganizerError::Internal(format!("Merge task panicked: {}", e)))?
}

/// Blocking implementation of [`merge_onto`].
fn merge_onto_blocking(
    merger: &dyn PdfMerger,
    target: &Path,
    addition: &Path,
) -> Result<(), OrganizerError> {
    info!(
        "Merging PDFs: target {} ← {}",
        target.display(),
        addition.display()
    );

    let parent: PathBuf = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    // Same directory as the target, so the final rename never crosses devices.
    let scratch = tempfile::Builder::new()
        .prefix(".merge-")
        .tempdir_in(&parent)
        .map_err(|e| OrganizerError::io("Failed to create merge scratch directory", &parent, e))?;
    let merged = scratch.path().join("merged.pdf");

    merger.merge(&merged, &[target, addition])?;

    if !merged.exists() {
        return Err(OrganizerError::MergeFailed {
            status: "success".into(),
            stdout: String::new(),
            stderr: format!("merge tool wrote no output to {}", merged.display()),
        });
    }

    std::fs::rename(&merged, target)
        .map_err(|e| OrganizerError::io("Failed to replace merge target", target, e))?;
    info!("Merge successful: {}", target.display());
    Ok(())
}
