//! Forwarding handlers for the algorithm-service routes and the embedded UI.

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tracing::{info, warn};

use edgesim_core::api::{ApiRequest, OVERVIEW_PATH, RUN_ALGORITHM_PATH};
use edgesim_core::EdgesimError;

use crate::state::AppState;

// ─── Router ──────────────────────────────────────────────────────────────────

pub fn router() -> Router<AppState> {
    Router::new()
        .route(&format!("{RUN_ALGORITHM_PATH}/{{name}}"), get(run_algorithm))
        .route(OVERVIEW_PATH, get(get_overview))
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn run_algorithm(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    forward(
        &state,
        ApiRequest {
            path: format!("{RUN_ALGORITHM_PATH}/{name}"),
            query,
        },
    )
    .await
}

async fn get_overview(
    State(state): State<AppState>,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    forward(
        &state,
        ApiRequest {
            path: OVERVIEW_PATH.to_string(),
            query,
        },
    )
    .await
}

/// Replay `request` against the upstream service and relay status and body verbatim.
async fn forward(state: &AppState, request: ApiRequest) -> Response {
    match state.upstream.send(&request).await {
        Ok(upstream) => {
            info!(path = %request.path, status = upstream.status, "forwarded");
            let status =
                StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
            Response::builder()
                .status(status)
                .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
                .body(Body::from(upstream.body))
                .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
        Err(EdgesimError::Network(e)) => {
            warn!(path = %request.path, error = %e, "upstream unreachable");
            (StatusCode::BAD_GATEWAY, format!("algorithm service unreachable: {e}")).into_response()
        }
        Err(e) => {
            warn!(path = %request.path, error = %e, "forwarding failed");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

// ─── Frontend (embedded) ─────────────────────────────────────────────────────

/// Serve the embedded frontend HTML/JS/CSS; unknown paths get `index.html` so
/// client-side routes survive a reload.
pub async fn serve_frontend(uri: axum::http::Uri) -> impl IntoResponse {
    let path = uri.path().trim_start_matches('/');

    let (actual_path, content) = match Assets::get(path) {
        Some(content) => (path, content),
        None => match Assets::get("index.html") {
            Some(content) => ("index.html", content),
            None => return StatusCode::NOT_FOUND.into_response(),
        },
    };

    let mime = mime_guess::from_path(actual_path).first_or_octet_stream();

    Response::builder()
        .header(header::CONTENT_TYPE, mime.as_ref())
        .body(Body::from(content.data.into_owned()))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

#[derive(rust_embed::Embed)]
#[folder = "../../frontend/dist"]
#[include = "*.html"]
#[include = "*.js"]
#[include = "*.css"]
#[include = "*.wasm"]
struct Assets;
