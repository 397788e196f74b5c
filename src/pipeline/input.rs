//! Directory scans: pending PDFs in the input directory and the folder set
//! under the output directory.

use crate::error::OrganizerError;
use crate::names::display_relative;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Whether a file name carries a `.pdf` suffix, in any letter case.
pub fn is_pdf_name(name: &str) -> bool {
    name.to_lowercase().ends_with(".pdf")
}

/// List the PDF file names directly inside `input_dir`, sorted.
///
/// Subdirectories are not descended into. Names that are not valid UTF-8
/// cannot round-trip through an HTML form and are skipped.
pub fn scan_pending(input_dir: &Path) -> Result<Vec<String>, OrganizerError> {
    let entries = std::fs::read_dir(input_dir)
        .map_err(|e| OrganizerError::io("Failed to read input directory", input_dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| OrganizerError::io("Failed to read input directory", input_dir, e))?;
        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) if is_pdf_name(&name) => files.push(name),
            Ok(_) => {}
            Err(raw) => warn!("Skipping non UTF-8 file name: {:?}", raw),
        }
    }
    files.sort();
    debug!("Found {} pending PDFs in {}", files.len(), input_dir.display());
    Ok(files)
}

/// Every subdirectory below `output_dir`, relative and `/`-separated, sorted.
///
/// Hidden directories (and everything beneath them) are left out; merge
/// scratch space lives in one.
pub fn scan_folders(output_dir: &Path) -> Result<Vec<String>, OrganizerError> {
    let mut folders = Vec::new();
    let walker = WalkDir::new(output_dir)
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.'));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(output_dir).to_path_buf();
            let source = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory loop"));
            OrganizerError::io("Failed to scan output directory", path, source)
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        if let Ok(rel) = entry.path().strip_prefix(output_dir) {
            folders.push(display_relative(rel));
        }
    }
    folders.sort();
    Ok(folders)
}
