//! Configuration for the triage server.
//!
//! Everything the server needs (the working directories, the listen
//! address, how previews and merges are produced) lives in
//! [`OrganizerConfig`], built via [`OrganizerConfigBuilder`]. The defaults
//! reproduce the conventional layout next to the working directory:
//!
//! ```text
//! ./input             PDFs waiting to be triaged
//! ./output            renamed (and merged) files, with any subfolders
//! ./trash             discarded files
//! ./static/previews   cached PNG previews served to the page
//! ```

use crate::error::OrganizerError;
use crate::pipeline::merge::{PdfMerger, Pdfcpu};
use crate::pipeline::render::{Pdftoppm, PreviewRenderer};
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Configuration for a triage session.
///
/// # Example
/// ```rust
/// use scan_organizer::OrganizerConfig;
///
/// let config = OrganizerConfig::builder()
///     .input_dir("/srv/scans/incoming")
///     .output_dir("/srv/scans/archive")
///     .preview_dpi(120)
///     .build()
///     .unwrap();
/// assert_eq!(config.preview_dpi, 120);
/// ```
#[derive(Clone)]
pub struct OrganizerConfig {
    /// Directory scanned for pending `*.pdf` files. Default: `./input`.
    pub input_dir: PathBuf,

    /// Destination of renamed files. Default: `./output`.
    pub output_dir: PathBuf,

    /// Destination of trashed files (and of sources consumed by a merge).
    /// Default: `./trash`.
    pub trash_dir: PathBuf,

    /// Where rendered preview PNGs are cached and served from.
    /// Default: `./static/previews`.
    pub preview_dir: PathBuf,

    /// Address the HTTP server listens on. Default: `127.0.0.1:8080`.
    pub bind: SocketAddr,

    /// Rasterizer executable. Default: `pdftoppm`.
    pub rasterizer_program: String,

    /// PDF merge executable. Default: `pdfcpu`.
    pub merge_program: String,

    /// Preview rendering resolution. Range: 36–600. Default: 100.
    pub preview_dpi: u32,

    /// Cap on the longest preview edge in pixels. Default: 1600.
    ///
    /// An A3 scan at 300 DPI is roughly 3500 × 5000 px; the page only ever
    /// shows it at about 50rem tall.
    pub max_preview_pixels: u32,

    /// Pre-constructed renderer. Takes precedence over `rasterizer_program`.
    pub renderer: Option<Arc<dyn PreviewRenderer>>,

    /// Pre-constructed merger. Takes precedence over `merge_program`.
    pub merger: Option<Arc<dyn PdfMerger>>,
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./input"),
            output_dir: PathBuf::from("./output"),
            trash_dir: PathBuf::from("./trash"),
            preview_dir: PathBuf::from("./static/previews"),
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
            rasterizer_program: "pdftoppm".to_string(),
            merge_program: "pdfcpu".to_string(),
            preview_dpi: 100,
            max_preview_pixels: 1600,
            renderer: None,
            merger: None,
        }
    }
}

impl fmt::Debug for OrganizerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrganizerConfig")
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field("trash_dir", &self.trash_dir)
            .field("preview_dir", &self.preview_dir)
            .field("bind", &self.bind)
            .field("rasterizer_program", &self.rasterizer_program)
            .field("merge_program", &self.merge_program)
            .field("preview_dpi", &self.preview_dpi)
            .field("max_preview_pixels", &self.max_preview_pixels)
            .field("renderer", &self.renderer.as_ref().map(|_| "<dyn PreviewRenderer>"))
            .field("merger", &self.merger.as_ref().map(|_| "<dyn PdfMerger>"))
            .finish()
    }
}

impl OrganizerConfig {
    /// Create a new builder for `OrganizerConfig`.
    pub fn builder() -> OrganizerConfigBuilder {
        OrganizerConfigBuilder {
            config: Self::default(),
        }
    }

    /// The renderer to use: the injected one, else `pdftoppm`-style.
    pub fn resolve_renderer(&self) -> Arc<dyn PreviewRenderer> {
        match self.renderer {
            Some(ref r) => Arc::clone(r),
            None => Arc::new(Pdftoppm {
                program: self.rasterizer_program.clone(),
                dpi: self.preview_dpi,
                max_pixels: self.max_preview_pixels,
            }),
        }
    }

    /// The merger to use: the injected one, else `pdfcpu`-style.
    pub fn resolve_merger(&self) -> Arc<dyn PdfMerger> {
        match self.merger {
            Some(ref m) => Arc::clone(m),
            None => Arc::new(Pdfcpu {
                program: self.merge_program.clone(),
            }),
        }
    }
}

/// Builder for [`OrganizerConfig`].
#[derive(Debug)]
pub struct OrganizerConfigBuilder {
    config: OrganizerConfig,
}

impl OrganizerConfigBuilder {
    pub fn input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.input_dir = dir.into();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn trash_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.trash_dir = dir.into();
        self
    }

    pub fn preview_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.preview_dir = dir.into();
        self
    }

    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.config.bind = addr;
        self
    }

    pub fn rasterizer_program(mut self, program: impl Into<String>) -> Self {
        self.config.rasterizer_program = program.into();
        self
    }

    pub fn merge_program(mut self, program: impl Into<String>) -> Self {
        self.config.merge_program = program.into();
        self
    }

    pub fn preview_dpi(mut self, dpi: u32) -> Self {
        self.config.preview_dpi = dpi;
        self
    }

    pub fn max_preview_pixels(mut self, px: u32) -> Self {
        self.config.max_preview_pixels = px.max(100);
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn PreviewRenderer>) -> Self {
        self.config.renderer = Some(renderer);
        self
    }

    pub fn merger(mut self, merger: Arc<dyn PdfMerger>) -> Self {
        self.config.merger = Some(merger);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<OrganizerConfig, OrganizerError> {
        let c = &self.config;
        if c.preview_dpi < 36 || c.preview_dpi > 600 {
            return Err(OrganizerError::InvalidConfig(format!(
                "Preview DPI must be 36–600, got {}",
                c.preview_dpi
            )));
        }
        if c.rasterizer_program.trim().is_empty() || c.merge_program.trim().is_empty() {
            return Err(OrganizerError::InvalidConfig(
                "External program names must not be empty".into(),
            ));
        }

        // Renaming a file onto its own directory would silently re-queue it.
        let dirs = [
            ("input", &c.input_dir),
            ("output", &c.output_dir),
            ("trash", &c.trash_dir),
            ("preview", &c.preview_dir),
        ];
        for (i, (a_name, a)) in dirs.iter().enumerate() {
            for (b_name, b) in &dirs[i + 1..] {
                if a == b {
                    return Err(OrganizerError::InvalidConfig(format!(
                        "The {a_name} and {b_name} directories must differ (both are {})",
                        a.display()
                    )));
                }
            }
        }
        Ok(self.config)
    }
}
