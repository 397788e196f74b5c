//! HTTP surface: axum routes over a shared [`Triage`].
//!
//! | Method | Path                 | Effect |
//! |--------|----------------------|--------|
//! | GET    | `/`                  | page for the current file |
//! | POST   | `/rename`            | form `newname`, `folder` |
//! | POST   | `/append`            | form `target` |
//! | POST   | `/trash`             | discard current file |
//! | POST   | `/next`, `/prev`     | move the cursor |
//! | POST   | `/rescan`            | re-read the directories |
//! | GET    | `/api/status`        | JSON snapshot |
//! | GET    | `/static/previews/*` | preview images |
//!
//! Mutating routes answer `303 See Other` back to `/` on success. Errors are
//! plain-text bodies with the status from [`OrganizerError::status_code`].

use crate::config::OrganizerConfig;
use crate::error::OrganizerError;
use crate::output::TriageStatus;
use crate::page;
use crate::triage::{Triage, PREVIEW_ROUTE};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

impl IntoResponse for OrganizerError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            warn!("{}", self);
        }
        (status, self.to_string()).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct RenameForm {
    pub newname: String,
    #[serde(default)]
    pub folder: String,
}

#[derive(Debug, Deserialize)]
pub struct AppendForm {
    #[serde(default)]
    pub target: String,
}

/// Build the application router around an opened session.
pub fn router(triage: Arc<Triage>) -> Router {
    let previews = ServeDir::new(&triage.config().preview_dir);
    Router::new()
        .route("/", get(index))
        .route("/rename", post(rename))
        .route("/append", post(append))
        .route("/trash", post(trash))
        .route("/next", post(next))
        .route("/prev", post(prev))
        .route("/rescan", post(rescan))
        .route("/api/status", get(status))
        .nest_service(PREVIEW_ROUTE, previews)
        .layer(TraceLayer::new_for_http())
        .with_state(triage)
}

/// Open a session from `config` and serve it until `shutdown` resolves.
pub async fn serve<F>(config: OrganizerConfig, shutdown: F) -> Result<(), OrganizerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let bind = config.bind;
    let triage = Arc::new(Triage::open(config)?);
    let app = router(triage);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| OrganizerError::Internal(format!("Failed to bind {bind}: {e}")))?;
    info!("Server started at http://{}", bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| OrganizerError::Internal(format!("Server error: {e}")))
}

async fn index(State(triage): State<Arc<Triage>>) -> Result<Html<String>, OrganizerError> {
    let view = triage.view().await?;
    Ok(Html(page::render_index(&view)))
}

async fn rename(
    State(triage): State<Arc<Triage>>,
    Form(form): Form<RenameForm>,
) -> Result<Redirect, OrganizerError> {
    triage.rename(&form.newname, &form.folder).await?;
    Ok(Redirect::to("/"))
}

async fn append(
    State(triage): State<Arc<Triage>>,
    Form(form): Form<AppendForm>,
) -> Result<Redirect, OrganizerError> {
    triage.append(&form.target).await?;
    Ok(Redirect::to("/"))
}

async fn trash(State(triage): State<Arc<Triage>>) -> Result<Redirect, OrganizerError> {
    triage.trash().await?;
    Ok(Redirect::to("/"))
}

async fn next(State(triage): State<Arc<Triage>>) -> Result<Redirect, OrganizerError> {
    triage.next().await?;
    Ok(Redirect::to("/"))
}

async fn prev(State(triage): State<Arc<Triage>>) -> Result<Redirect, OrganizerError> {
    triage.prev().await?;
    Ok(Redirect::to("/"))
}

async fn rescan(State(triage): State<Arc<Triage>>) -> Result<Redirect, OrganizerError> {
    triage.rescan().await?;
    Ok(Redirect::to("/"))
}

async fn status(State(triage): State<Arc<Triage>>) -> Json<TriageStatus> {
    Json(triage.status().await)
}
