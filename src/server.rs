//! HTTP front end for an [`Explorer`].
//!
//! | Method | Path            | Response                                   |
//! |--------|-----------------|--------------------------------------------|
//! | GET    | `/`             | current [`Snapshot`] as JSON               |
//! | GET    | `/snapshot`     | same as `/`                                |
//! | GET    | `/roots`        | root labels as a JSON array                |
//! | POST   | `/instructions` | [`Navigation`](crate::Navigation) as JSON  |
//!
//! A rejected instruction (invalid action, malformed body) gets
//! `400 Bad Request` with `{"error": "..."}`, and the grid is left as it was.
//!
//! Snapshots and instructions read the explored values through their own
//! locks, which the host program may hold for as long as it likes. They run
//! on tokio's blocking pool so a held lock stalls only its own request.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tokio::{net::TcpListener, task};
use tokio_util::sync::CancellationToken;

use crate::{Explorer, Result, Snapshot};

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Routes serving `explorer`.
pub fn router(explorer: Explorer) -> Router {
    Router::new()
        .route("/", get(snapshot))
        .route("/snapshot", get(snapshot))
        .route("/roots", get(roots))
        .route("/instructions", post(instructions))
        .with_state(explorer)
}

/// Serves `explorer` on `127.0.0.1` at [`Config::http_port`](crate::Config)
/// until `cancel` is triggered.
pub async fn serve(explorer: Explorer, cancel: CancellationToken) -> Result {
    let listener = TcpListener::bind(("127.0.0.1", explorer.config().http_port)).await?;
    serve_with_listener(listener, explorer, cancel).await
}

/// Like [`serve`], on a listener bound by the caller.
pub async fn serve_with_listener(
    listener: TcpListener,
    explorer: Explorer,
    cancel: CancellationToken,
) -> Result {
    let addr = listener.local_addr()?;
    tracing::info!(roots = ?explorer.root_labels(), "Serving structview at http://{addr}");

    axum::serve(listener, router(explorer))
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;

    tracing::info!("structview server stopped");
    Ok(())
}

async fn snapshot(State(explorer): State<Explorer>) -> Response {
    match task::spawn_blocking(move || explorer.snapshot()).await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(e) => internal_error(e),
    }
}

async fn roots(State(explorer): State<Explorer>) -> Json<Vec<String>> {
    Json(explorer.root_labels())
}

async fn instructions(State(explorer): State<Explorer>, body: String) -> Response {
    let applied = match task::spawn_blocking(move || explorer.apply_json(&body)).await {
        Ok(applied) => applied,
        Err(e) => return internal_error(e),
    };
    match applied {
        Ok(navigation) => Json(navigation).into_response(),
        Err(e) => {
            let status = if e.is_bad_request() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            tracing::warn!(status = %status, error = %e, "Instruction rejected");
            (status, Json(ErrorBody { error: e.to_string() })).into_response()
        }
    }
}

fn internal_error(e: task::JoinError) -> Response {
    tracing::error!(error = %e, "Request task failed");
    let body = ErrorBody {
        error: e.to_string(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
