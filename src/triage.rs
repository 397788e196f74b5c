//! The triage core: one queue, one lock, three ways to consume the head.
//!
//! [`Triage`] owns the pending queue, the history of renamed files and the
//! output folder set behind a single [`tokio::sync::Mutex`]. Every operation
//! holds that lock from start to finish, subprocess calls included, so two
//! requests can never consume the same file or observe a half-updated
//! cursor. Requests simply queue up behind each other; for one operator
//! clicking through scans that is never noticeable.

use crate::config::OrganizerConfig;
use crate::error::OrganizerError;
use crate::names;
use crate::output::{Disposition, PageView, TriageStatus};
use crate::pipeline::merge::{self, PdfMerger};
use crate::pipeline::render::{self, PreviewRenderer};
use crate::pipeline::{input, relocate};
use crate::queue::PendingQueue;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// URL prefix under which the preview directory is served.
pub const PREVIEW_ROUTE: &str = "/static/previews";

#[derive(Debug, Default)]
struct TriageState {
    queue: PendingQueue,
    /// Paths relative to the output directory, oldest first.
    renamed: Vec<String>,
    folders: Vec<String>,
    /// Pending file name to the preview rendered for it.
    previews: HashMap<String, String>,
}

/// Shared triage session.
pub struct Triage {
    config: OrganizerConfig,
    renderer: Arc<dyn PreviewRenderer>,
    merger: Arc<dyn PdfMerger>,
    state: Mutex<TriageState>,
}

impl Triage {
    /// Create the working directories and load the queue and folder set.
    pub fn open(config: OrganizerConfig) -> Result<Self, OrganizerError> {
        for dir in [
            &config.input_dir,
            &config.output_dir,
            &config.trash_dir,
            &config.preview_dir,
        ] {
            std::fs::create_dir_all(dir)
                .map_err(|e| OrganizerError::io("Failed to create directory", dir, e))?;
        }

        let pending = input::scan_pending(&config.input_dir)?;
        let folders = input::scan_folders(&config.output_dir)?;
        info!(
            "Loaded {} pending PDFs from {} ({} output folders)",
            pending.len(),
            config.input_dir.display(),
            folders.len()
        );

        Ok(Self {
            renderer: config.resolve_renderer(),
            merger: config.resolve_merger(),
            state: Mutex::new(TriageState {
                queue: PendingQueue::new(pending),
                renamed: Vec::new(),
                folders,
                previews: HashMap::new(),
            }),
            config,
        })
    }

    pub fn config(&self) -> &OrganizerConfig {
        &self.config
    }

    /// Describe the current file, rendering its preview on first view.
    ///
    /// A rendering failure is reported on the page rather than failing it,
    /// so an unreadable scan can still be trashed.
    pub async fn view(&self) -> Result<PageView, OrganizerError> {
        let mut state = self.state.lock().await;
        let current = state.queue.current().ok_or(OrganizerError::NoPending)?.to_owned();
        let position = state.queue.position().unwrap_or(0) + 1;

        let pdf = self.config.input_dir.join(&current);
        let (preview_url, preview_error) =
            match render::ensure_preview(Arc::clone(&self.renderer), &pdf, &self.config.preview_dir)
                .await
            {
                Ok(name) => {
                    let url = format!("{PREVIEW_ROUTE}/{name}");
                    state.previews.insert(current.clone(), name);
                    (Some(url), None)
                }
                Err(e) => {
                    warn!("No preview for {}: {}", current, e);
                    (None, Some(e.to_string()))
                }
            };

        Ok(PageView {
            current,
            position,
            total: state.queue.len(),
            preview_url,
            preview_error,
            renamed: state.renamed.iter().rev().cloned().collect(),
            folders: state.folders.clone(),
        })
    }

    /// Move the current file to `output/<folder>/<new_name>`.
    pub async fn rename(&self, new_name: &str, folder: &str) -> Result<Disposition, OrganizerError> {
        let name = names::pdf_file_name(new_name)?;
        let relative = names::relative_folder(folder)?.join(&name);

        let mut state = self.state.lock().await;
        let current = state.queue.current().ok_or(OrganizerError::NoPending)?.to_owned();
        let source = self.config.input_dir.join(&current);
        let destination = self.config.output_dir.join(&relative);
        let preview = render::preview_file_name(&source).ok();

        blocking({
            let (source, destination) = (source.clone(), destination.clone());
            move || relocate::move_file(&source, &destination)
        })
        .await?;

        let destination_name = names::display_relative(&relative);
        if !state.renamed.contains(&destination_name) {
            state.renamed.push(destination_name.clone());
        }
        let output_dir = self.config.output_dir.clone();
        match blocking(move || input::scan_folders(&output_dir)).await {
            Ok(folders) => state.folders = folders,
            Err(e) => warn!("Could not refresh output folders: {}", e),
        }
        self.consume(&mut state, preview);

        info!("Renamed {} → {}", current, destination_name);
        Ok(Disposition::Renamed {
            source: current,
            destination: destination_name,
        })
    }

    /// Append the current file onto `target`, a file under the output
    /// directory, then move the consumed source into the trash.
    pub async fn append(&self, target: &str) -> Result<Disposition, OrganizerError> {
        let relative = names::merge_target(target)?;
        let target_name = names::display_relative(&relative);

        let mut state = self.state.lock().await;
        let current = state.queue.current().ok_or(OrganizerError::NoPending)?.to_owned();
        let target_path = self.config.output_dir.join(&relative);
        if !target_path.is_file() {
            return Err(OrganizerError::UnknownTarget {
                target: target_name,
            });
        }
        let source = self.config.input_dir.join(&current);
        let preview = render::preview_file_name(&source).ok();

        merge::merge_onto(Arc::clone(&self.merger), &target_path, &source).await?;

        // The pages now live in the target; keep the original out of the
        // input directory so a rescan does not offer it again.
        match self.move_to_trash(&source, &current).await {
            Ok(trashed) => debug!("Merged source kept as {}", trashed.display()),
            Err(e) => warn!("Merged {} but could not move it to trash: {}", current, e),
        }
        self.consume(&mut state, preview);

        info!("Appended {} onto {}", current, target_name);
        Ok(Disposition::Appended {
            source: current,
            target: target_name,
        })
    }

    /// Move the current file into the trash directory.
    pub async fn trash(&self) -> Result<Disposition, OrganizerError> {
        let mut state = self.state.lock().await;
        let current = state.queue.current().ok_or(OrganizerError::NoPending)?.to_owned();
        let source = self.config.input_dir.join(&current);
        let preview = render::preview_file_name(&source).ok();

        let trashed = self.move_to_trash(&source, &current).await?;
        self.consume(&mut state, preview);

        let trashed_as = trashed
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| current.clone());
        info!("Trashed {} as {}", current, trashed_as);
        Ok(Disposition::Trashed {
            source: current,
            trashed_as,
        })
    }

    /// Step to the next pending file (stays put on the last one).
    pub async fn next(&self) -> Result<(), OrganizerError> {
        let mut state = self.state.lock().await;
        if state.queue.is_empty() {
            return Err(OrganizerError::NoPending);
        }
        state.queue.advance();
        Ok(())
    }

    /// Step to the previous pending file (stays put on the first one).
    pub async fn prev(&self) -> Result<(), OrganizerError> {
        let mut state = self.state.lock().await;
        if state.queue.is_empty() {
            return Err(OrganizerError::NoPending);
        }
        state.queue.retreat();
        Ok(())
    }

    /// Re-read the input and output directories. Returns the pending count.
    pub async fn rescan(&self) -> Result<usize, OrganizerError> {
        let mut state = self.state.lock().await;
        let input_dir = self.config.input_dir.clone();
        let output_dir = self.config.output_dir.clone();
        let (pending, folders) = blocking(move || {
            Ok((input::scan_pending(&input_dir)?, input::scan_folders(&output_dir)?))
        })
        .await?;

        // Files removed behind our back leave their cached previews behind.
        let vanished: Vec<String> = state
            .previews
            .keys()
            .filter(|name| pending.binary_search(name).is_err())
            .cloned()
            .collect();
        for name in vanished {
            if let Some(png) = state.previews.remove(&name) {
                debug!("{} vanished from the input directory", name);
                render::discard_preview(&self.config.preview_dir, &png);
            }
        }

        state.queue.replace(pending);
        state.folders = folders;
        info!("Rescanned: {} pending PDFs", state.queue.len());
        Ok(state.queue.len())
    }

    /// Snapshot of the session for the JSON API.
    pub async fn status(&self) -> TriageStatus {
        let state = self.state.lock().await;
        TriageStatus {
            current: state.queue.current().map(str::to_owned),
            position: state.queue.position(),
            pending: state.queue.files().to_vec(),
            renamed: state.renamed.clone(),
            folders: state.folders.clone(),
        }
    }

    async fn move_to_trash(&self, source: &Path, name: &str) -> Result<PathBuf, OrganizerError> {
        let source = source.to_path_buf();
        let trash_dir = self.config.trash_dir.clone();
        let name = name.to_owned();
        blocking(move || {
            let destination = relocate::unique_destination(&trash_dir, &name);
            relocate::move_file(&source, &destination)?;
            Ok(destination)
        })
        .await
    }

    fn consume(&self, state: &mut TriageState, preview: Option<String>) {
        if let Some(taken) = state.queue.take_current() {
            state.previews.remove(&taken);
        }
        if let Some(name) = preview {
            render::discard_preview(&self.config.preview_dir, &name);
        }
    }
}

/// Run blocking filesystem work off the async worker threads.
async fn blocking<T, F>(f: F) -> Result<T, OrganizerError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, OrganizerError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| OrganizerError::Internal(format!("Blocking task panicked: {}", e)))?
}
