// --- File: crates/services/roster_backend/src/app.rs ---
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use roster_common::logging::log_result;
use roster_common::{Member, RecordFields, RosterError, Video};
use roster_config::{AppConfig, RecordsConfig};
use roster_db::{DbClient, MemoryRecordStore, RecordStore, SqlRecordStore};
use roster_records::{routes, RecordService};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app_state::AppState;

pub const WELCOME: &str = "Welcome to Roster API!";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

async fn welcome_handler() -> &'static str {
    WELCOME
}

/// `GET /health`: 200 while the database answers, 503 otherwise.
async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let Some(db_client) = &state.db_client else {
        return (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                database: "memory",
            }),
        );
    };

    if db_client.is_healthy().await {
        (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                database: "up",
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "unavailable",
                database: "down",
            }),
        )
    }
}

/// Build the routes of one record kind over the configured storage.
async fn record_routes<F: RecordFields>(
    db_client: Option<&DbClient>,
    records: &RecordsConfig,
) -> Result<Router, RosterError> {
    let Some(db_client) = db_client else {
        let service = RecordService::<F, _>::new(MemoryRecordStore::new(), records);
        return Ok(routes(Arc::new(service)));
    };

    let store = SqlRecordStore::<F>::new(db_client.clone());
    store.init_schema().await?;
    Ok(routes(Arc::new(RecordService::<F, _>::new(store, records))))
}

/// Assemble the application router from the configuration.
///
/// Opens the database (unless `database.url` is `"memory"`), creates the
/// `members` and `videos` tables, and mounts their routes next to `/` and
/// `/health`.
pub async fn build_app(config: &AppConfig) -> Result<(Router, AppState), RosterError> {
    let db_client = if config.database.is_memory() {
        info!("Keeping records in memory");
        None
    } else {
        let client = log_result(
            DbClient::from_config(&config.database).await,
            "Connected to the database",
            "Failed to connect to the database",
        )?;
        Some(client)
    };

    let members = record_routes::<Member>(db_client.as_ref(), &config.records).await?;
    let videos = record_routes::<Video>(db_client.as_ref(), &config.records).await?;

    let state = AppState::new(db_client);

    let app = Router::new()
        .route("/", get(welcome_handler))
        .route("/health", get(health_handler))
        .with_state(state.clone())
        .merge(members)
        .merge(videos)
        .layer(TraceLayer::new_for_http());

    Ok((app, state))
}
