//! CLI binary for scan-organizer.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `OrganizerConfig` and runs the web server until Ctrl+C.

use anyhow::{Context, Result};
use clap::Parser;
use scan_organizer::{serve, OrganizerConfig};
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Triage ./input into ./output with default tools
  scan-organizer

  # Custom directories, reachable from other machines on the LAN
  scan-organizer --input ~/Scans/inbox --output ~/Documents/Archive --host 0.0.0.0

  # Sharper previews
  scan-organizer --dpi 150 --max-preview-pixels 2400

KEYBOARD SHORTCUTS (in the page):
  Ctrl+U   focus the folder input
  Ctrl+I   focus the Trash button
  Ctrl+O   focus the merge-target list

EXTERNAL TOOLS:
  pdftoppm   from poppler-utils, renders previews    (--rasterizer)
  pdfcpu     merges PDFs for "Append to selected"    (--merger)

ENVIRONMENT VARIABLES:
  RUST_LOG   Override the log filter, e.g. RUST_LOG=scan_organizer=debug
"#;

/// Triage scanned PDFs from a local web page: rename, merge, or trash.
#[derive(Parser, Debug)]
#[command(
    name = "scan-organizer",
    version,
    about = "Triage scanned PDFs from a local web page: rename, merge, or trash",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory holding the PDFs to triage.
    #[arg(long, env = "SCAN_ORGANIZER_INPUT", default_value = "./input")]
    input: PathBuf,

    /// Directory renamed files are moved into.
    #[arg(long, env = "SCAN_ORGANIZER_OUTPUT", default_value = "./output")]
    output: PathBuf,

    /// Directory trashed files are moved into.
    #[arg(long, env = "SCAN_ORGANIZER_TRASH", default_value = "./trash")]
    trash: PathBuf,

    /// Directory for cached preview images.
    #[arg(long, env = "SCAN_ORGANIZER_PREVIEWS", default_value = "./static/previews")]
    previews: PathBuf,

    /// Address to listen on.
    #[arg(long, env = "SCAN_ORGANIZER_HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on.
    #[arg(short, long, env = "SCAN_ORGANIZER_PORT", default_value_t = 8080)]
    port: u16,

    /// Rasterizer executable (pdftoppm-compatible).
    #[arg(long, env = "SCAN_ORGANIZER_RASTERIZER", default_value = "pdftoppm")]
    rasterizer: String,

    /// PDF merge executable (pdfcpu-compatible).
    #[arg(long, env = "SCAN_ORGANIZER_MERGER", default_value = "pdfcpu")]
    merger: String,

    /// Preview rendering DPI (36–600).
    #[arg(long, env = "SCAN_ORGANIZER_DPI", default_value_t = 100,
          value_parser = clap::value_parser!(u32).range(36..=600))]
    dpi: u32,

    /// Longest preview edge in pixels.
    #[arg(long, env = "SCAN_ORGANIZER_MAX_PREVIEW_PIXELS", default_value_t = 1600)]
    max_preview_pixels: u32,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SCAN_ORGANIZER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "SCAN_ORGANIZER_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli)?;

    if !cli.quiet {
        eprintln!(
            "{}  {} → {}  {}",
            bold("scan-organizer"),
            config.input_dir.display(),
            config.output_dir.display(),
            dim(&format!("http://{}", config.bind)),
        );
    }

    // ── Run server ───────────────────────────────────────────────────────
    serve(config, shutdown_signal())
        .await
        .context("Server failed")?;

    Ok(())
}

/// Map CLI args to `OrganizerConfig`.
fn build_config(cli: &Cli) -> Result<OrganizerConfig> {
    OrganizerConfig::builder()
        .input_dir(&cli.input)
        .output_dir(&cli.output)
        .trash_dir(&cli.trash)
        .preview_dir(&cli.previews)
        .bind(SocketAddr::new(cli.host, cli.port))
        .rasterizer_program(&cli.rasterizer)
        .merge_program(&cli.merger)
        .preview_dpi(cli.dpi)
        .max_preview_pixels(cli.max_preview_pixels)
        .build()
        .context("Invalid configuration")
}

/// Resolve on Ctrl+C so in-flight requests finish before exit.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
