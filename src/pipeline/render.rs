//! Preview rasterisation: render the first page of a PDF to a PNG.
//!
//! Rendering is delegated to an external rasterizer (poppler's `pdftoppm`
//! by default). The work is blocking, so [`ensure_preview`] moves it onto
//! the tokio blocking pool with `spawn_blocking`.
//!
//! ## Cache keys
//!
//! Previews are named by a hash of the PDF's file name, size and
//! modification time rather than by the file name itself. The resulting
//! names are always safe to put in a URL, and a file that is replaced in
//! the input directory under the same name gets a fresh preview instead of
//! the stale cached one.

use crate::error::OrganizerError;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::time::UNIX_EPOCH;
use tracing::{debug, info, warn};

/// Produces a PNG preview of a PDF's first page.
///
/// Implementations are called from a blocking thread and may block freely.
pub trait PreviewRenderer: Send + Sync {
    /// Rasterise the first page of `pdf` into the file `<out_prefix>.png`.
    fn render(&self, pdf: &Path, out_prefix: &Path) -> Result<(), OrganizerError>;
}

/// [`PreviewRenderer`] backed by poppler's `pdftoppm`.
#[derive(Debug, Clone)]
pub struct Pdftoppm {
    pub program: String,
    pub dpi: u32,
    pub max_pixels: u32,
}

impl PreviewRenderer for Pdftoppm {
    fn render(&self, pdf: &Path, out_prefix: &Path) -> Result<(), OrganizerError> {
        let output = Command::new(&self.program)
            .arg("-png")
            .arg("-singlefile")
            .arg("-f")
            .arg("1")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-scale-to")
            .arg(self.max_pixels.to_string())
            .arg(pdf)
            .arg(out_prefix)
            .output()
            .map_err(|e| OrganizerError::ToolUnavailable {
                program: self.program.clone(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OrganizerError::RasterisationFailed {
                path: pdf.to_path_buf(),
                detail: format!("{} ({})", stderr.trim(), output.status),
            });
        }
        Ok(())
    }
}

/// File name of the cached preview for `pdf`, e.g. `3f9c…e1.png`.
pub fn preview_file_name(pdf: &Path) -> Result<String, OrganizerError> {
    let meta = std::fs::metadata(pdf).map_err(|e| OrganizerError::io("Failed to stat", pdf, e))?;
    let mtime = meta
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_nanos())
        .unwrap_or(0);

    let mut hasher = Sha256::new();
    hasher.update(pdf.file_name().unwrap_or(pdf.as_os_str()).as_encoded_bytes());
    hasher.update(meta.len().to_le_bytes());
    hasher.update(mtime.to_le_bytes());
    Ok(format!("{}.png", &format!("{:x}", hasher.finalize())[..32]))
}

/// Make sure a preview for `pdf` exists in `preview_dir`, rendering it if
/// needed. Returns the preview's file name.
pub async fn ensure_preview(
    renderer: Arc<dyn PreviewRenderer>,
    pdf: &Path,
    preview_dir: &Path,
) -> Result<String, OrganizerError> {
    let pdf = pdf.to_path_buf();
    let preview_dir = preview_dir.to_path_buf();

    tokio::task::spawn_blocking(move || ensure_preview_blocking(renderer.as_ref(), &pdf, &preview_dir))
        .await
        .map_err(|e| OrganizerError::Internal(format!("Render task panicked: {}", e)))?
}

/// Blocking implementation of [`ensure_preview`].
fn ensure_preview_blocking(
    renderer: &dyn PreviewRenderer,
    pdf: &Path,
    preview_dir: &Path,
) -> Result<String, OrganizerError> {
    let file_name = preview_file_name(pdf)?;
    let png = preview_dir.join(&file_name);
    if png.exists() {
        debug!("Preview cache hit for {}", pdf.display());
        return Ok(file_name);
    }

    let prefix: PathBuf = png.with_extension("");
    renderer.render(pdf, &prefix)?;

    if !png.exists() {
        return Err(OrganizerError::RasterisationFailed {
            path: pdf.to_path_buf(),
            detail: "rasterizer finished but wrote no image".into(),
        });
    }
    info!("Rendered preview for {}", pdf.display());
    Ok(file_name)
}

/// Remove a cached preview. Failures are logged, never returned.
pub fn discard_preview(preview_dir: &Path, file_name: &str) {
    let png = preview_dir.join(file_name);
    match std::fs::remove_file(&png) {
        Ok(()) => debug!("Removed preview {}", png.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Could not remove preview {}: {}", png.display(), e),
    }
}
