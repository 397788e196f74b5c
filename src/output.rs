//! Snapshots handed from the triage core to the web layer.

use serde::{Deserialize, Serialize};

/// Everything the index page needs to draw the current item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageView {
    /// File name of the current pending PDF.
    pub current: String,
    /// 1-indexed position of the current file in the queue.
    pub position: usize,
    /// Number of pending files.
    pub total: usize,
    /// URL of the rendered preview, when rendering succeeded.
    pub preview_url: Option<String>,
    /// Why there is no preview, when rendering failed.
    pub preview_error: Option<String>,
    /// Merge targets, newest first.
    pub renamed: Vec<String>,
    /// Subfolders of the output directory, sorted.
    pub folders: Vec<String>,
}

/// JSON body of `GET /api/status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageStatus {
    /// Current file, if any is pending.
    pub current: Option<String>,
    /// 0-indexed cursor, if any file is pending.
    pub position: Option<usize>,
    /// Pending file names in queue order.
    pub pending: Vec<String>,
    /// Merge targets in the order they were created.
    pub renamed: Vec<String>,
    /// Subfolders of the output directory, sorted.
    pub folders: Vec<String>,
}

/// What happened to a consumed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Disposition {
    /// Moved into the output directory under `destination` (relative).
    Renamed { source: String, destination: String },
    /// Appended onto `target` (relative to the output directory).
    Appended { source: String, target: String },
    /// Moved into the trash directory as `trashed_as`.
    Trashed { source: String, trashed_as: String },
}
