use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde_json::Value;
use server_api::{bandwidth, get_snapshot, list_snapshots, ApiContext};
use shared::{
    domain::SnapshotSummary,
    error::{ApiError, ErrorCode},
    protocol::BandwidthResponse,
};
use storage::SnapshotStore;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

mod app_state;
mod config;

use app_state::AppState;
use config::load_settings;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let store = SnapshotStore::open(&settings.output_dir);
    if let Err(error) = store.health_check().await {
        warn!(
            output_dir = %settings.output_dir.display(),
            %error,
            "output directory unavailable; snapshot listing will fail until it exists"
        );
    }

    let state = AppState {
        api: ApiContext { store },
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, output_dir = %settings.output_dir.display(), "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/snapshots", get(http_list_snapshots))
        .route("/api/snapshots/:name", get(http_get_snapshot))
        .route("/api/bandwidth", get(http_bandwidth))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> (StatusCode, &'static str) {
    match state.api.store.health_check().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "output directory unavailable"),
    }
}

async fn http_list_snapshots(State(state): State<Arc<AppState>>) -> ApiResult<Vec<SnapshotSummary>> {
    list_snapshots(&state.api).await.map(Json).map_err(reject)
}

async fn http_get_snapshot(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Value> {
    get_snapshot(&state.api, &name).await.map(Json).map_err(reject)
}

async fn http_bandwidth(State(state): State<Arc<AppState>>) -> ApiResult<BandwidthResponse> {
    bandwidth(&state.api, Utc::now())
        .await
        .map(Json)
        .map_err(reject)
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
