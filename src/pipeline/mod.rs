//! Filesystem and subprocess stages behind the triage operations.
//!
//! Each submodule does one job and knows nothing about the queue or HTTP:
//!
//! ```text
//! input ──▶ render ──▶ (operator decides) ──▶ relocate / merge
//! (scan)    (pdftoppm)                        (rename)   (pdfcpu)
//! ```
//!
//! 1. [`input`]   : list pending PDFs and the output folder tree
//! 2. [`render`]  : rasterise the first page to a cached PNG; runs in
//!    `spawn_blocking` because the rasterizer is an external process
//! 3. [`relocate`]: move files between directories without clobbering
//! 4. [`merge`]   : append a PDF onto an earlier one via the merge tool,
//!    atomically replacing the target

pub mod input;
pub mod merge;
pub mod relocate;
pub mod render;
