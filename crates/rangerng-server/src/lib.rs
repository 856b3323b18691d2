//! HTTP front-end for rangerng.
//!
//! Serves bounded random integers as JSON. The core is synchronous, so every
//! draw runs on tokio's blocking pool and the async workers stay free.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};

use rangerng_core::{BackendId, GenerationError, Generator, Platform, Requirement};

/// Most values a single request may ask for.
pub const MAX_COUNT: usize = 1024;

/// Shared server state.
struct AppState {
    generator: Generator,
}

#[derive(Debug, Default, Deserialize)]
struct RandomParams {
    /// Backend name; defaults to `os_pool`.
    backend: Option<String>,
    min: Option<i64>,
    max: Option<i64>,
    /// Number of values (1-1024, default: 1).
    count: Option<usize>,
}

#[derive(Debug, Serialize)]
struct RandomResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    backend: Option<BackendId>,
    min: i64,
    max: i64,
    values: Vec<i64>,
    success: bool,
    /// Error message if request failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    backends_supported: usize,
    backends_total: usize,
}

#[derive(Debug, Serialize)]
struct BackendsResponse {
    backends: Vec<BackendEntry>,
    total: usize,
}

#[derive(Debug, Serialize)]
struct BackendEntry {
    name: BackendId,
    label: &'static str,
    description: &'static str,
    platform: Platform,
    requirements: &'static [Requirement],
    supported: bool,
}

/// HTTP status for a generation failure.
pub fn status_for(err: &GenerationError) -> StatusCode {
    match err {
        GenerationError::InvalidRange { .. } => StatusCode::BAD_REQUEST,
        GenerationError::SourceUnavailable { .. } => StatusCode::NOT_IMPLEMENTED,
        GenerationError::HardwareRandomExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
        GenerationError::ContextAcquisitionFailed { .. }
        | GenerationError::RandomGenerationFailed { .. }
        | GenerationError::AllocationFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn failure(
    status: StatusCode,
    backend: Option<BackendId>,
    min: i64,
    max: i64,
    msg: String,
) -> (StatusCode, Json<RandomResponse>) {
    (
        status,
        Json(RandomResponse {
            backend,
            min,
            max,
            values: Vec::new(),
            success: false,
            error: Some(msg),
        }),
    )
}

async fn handle_random(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RandomParams>,
) -> (StatusCode, Json<RandomResponse>) {
    let min = params.min.unwrap_or(1);
    let max = params.max.unwrap_or(100);
    let count = params.count.unwrap_or(1).clamp(1, MAX_COUNT);

    let backend = match params.backend.as_deref().map(str::parse::<BackendId>) {
        None => BackendId::OsPool,
        Some(Ok(id)) => id,
        Some(Err(e)) => return failure(StatusCode::BAD_REQUEST, None, min, max, e.to_string()),
    };

    let worker = Arc::clone(&state);
    let drawn = tokio::task::spawn_blocking(move || {
        worker.generator.generate_many(backend, min, max, count)
    })
    .await;

    match drawn {
        Ok(Ok(values)) => (
            StatusCode::OK,
            Json(RandomResponse {
                backend: Some(backend),
                min,
                max,
                values,
                success: true,
                error: None,
            }),
        ),
        Ok(Err(e)) => {
            log::warn!("{backend} draw failed: {e}");
            failure(status_for(&e), Some(backend), min, max, e.to_string())
        }
        Err(join) => {
            log::error!("generation task aborted: {join}");
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                Some(backend),
                min,
                max,
                "generation task aborted".to_string(),
            )
        }
    }
}

async fn handle_backends(State(state): State<Arc<AppState>>) -> Json<BackendsResponse> {
    let backends: Vec<BackendEntry> = state
        .generator
        .sources()
        .map(|s| {
            let info = s.info();
            BackendEntry {
                name: info.id,
                label: info.label,
                description: info.description,
                platform: info.platform,
                requirements: info.requirements,
                supported: s.is_available(),
            }
        })
        .collect();
    let total = backends.len();
    Json(BackendsResponse { backends, total })
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let supported = state.generator.supported().len();
    Json(HealthResponse {
        status: if supported > 0 {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        backends_supported: supported,
        backends_total: state.generator.sources().count(),
    })
}

async fn handle_index(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let names: Vec<String> = state
        .generator
        .supported()
        .iter()
        .map(|b| b.to_string())
        .collect();

    Json(serde_json::json!({
        "name": "rangerng server",
        "version": rangerng_core::VERSION,
        "supported_backends": names,
        "endpoints": {
            "/": "This API index",
            "/api/v1/random": {
                "method": "GET",
                "description": "Uniform integers in [min, max]",
                "params": {
                    "backend": "os_pool (default), crypto_api, hardware",
                    "min": "Inclusive lower bound (default: 1)",
                    "max": "Inclusive upper bound (default: 100)",
                    "count": format!("Number of values (1-{MAX_COUNT}, default: 1)"),
                }
            },
            "/backends": "List all backends with support status",
            "/health": "Health check",
        },
        "examples": {
            "die": "/api/v1/random?min=1&max=6",
            "hardware": "/api/v1/random?backend=hardware&min=0&max=255&count=16",
        }
    }))
}

/// Build the axum router.
pub fn build_router(generator: Generator) -> Router {
    let state = Arc::new(AppState { generator });

    Router::new()
        .route("/", get(handle_index))
        .route("/api/v1/random", get(handle_random))
        .route("/health", get(handle_health))
        .route("/backends", get(handle_backends))
        .with_state(state)
}

/// Run the HTTP server until the listener fails.
pub async fn run_server(generator: Generator, host: &str, port: u16) -> std::io::Result<()> {
    let app = build_router(generator);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("listening on http://{addr}");
    axum::serve(listener, app).await
}
