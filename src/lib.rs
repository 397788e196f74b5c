//! # scan-organizer
//!
//! Triage a folder of scanned PDFs from a local web page, one document at a
//! time. For each scan the operator sees a rendered preview of the first page
//! and picks one of three dispositions:
//!
//! * **rename**: move it into the output directory under a new name,
//!   optionally inside a (new or existing) subfolder;
//! * **append**: merge it onto the end of a file renamed earlier in the
//!   session (the second page of a letter scanned separately, say);
//! * **trash**: move it into the trash directory.
//!
//! ## Architecture
//!
//! ```text
//! browser ──HTTP──▶ server (axum)
//!                     │
//!                     ▼
//!                   Triage ── one Mutex over queue + history + folders
//!                     │
//!                     ├─ pipeline::input     scan input / output dirs
//!                     ├─ pipeline::render    pdftoppm → cached PNG
//!                     ├─ pipeline::relocate  non-clobbering moves
//!                     └─ pipeline::merge     pdfcpu merge, atomic replace
//! ```
//!
//! Rendering and merging are delegated to external programs (`pdftoppm`
//! from poppler, `pdfcpu`). Both sit behind traits
//! ([`PreviewRenderer`], [`PdfMerger`]) so they can be swapped or faked.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scan_organizer::{serve, OrganizerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OrganizerConfig::builder()
//!         .input_dir("./input")
//!         .output_dir("./output")
//!         .build()?;
//!     serve(config, async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `scan-organizer` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod names;
pub mod output;
pub mod page;
pub mod pipeline;
pub mod queue;
pub mod server;
pub mod triage;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{OrganizerConfig, OrganizerConfigBuilder};
pub use error::OrganizerError;
pub use output::{Disposition, PageView, TriageStatus};
pub use pipeline::merge::{PdfMerger, Pdfcpu};
pub use pipeline::render::{Pdftoppm, PreviewRenderer};
pub use queue::PendingQueue;
pub use server::{router, serve};
pub use triage::Triage;
