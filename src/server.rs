/*
 * Botdesk - Admin Console for a Discord Bot
 * File Path: src/server.rs
 * Responsibility: REST API over the parameter store and the command registry
 */

use crate::commands;
use crate::config::Config;
use crate::parameters::{ParameterInput, ParameterStore, StoreError};
use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::Utc;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ParameterStore>,
    pub commands_path: PathBuf,
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "success": false, "error": message.into() }))).into_response()
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = match &self {
            StoreError::NotFound => StatusCode::NOT_FOUND,
            StoreError::DuplicateName => StatusCode::CONFLICT,
            StoreError::Invalid(_) => StatusCode::BAD_REQUEST,
            StoreError::Io(e) => {
                tracing::error!("parameter store failure: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        failure(status, self.to_string())
    }
}

/// Ids that are not integers cannot exist, so they are reported as not found.
fn parse_id(raw: &str) -> Result<i64, StoreError> {
    raw.parse().map_err(|_| StoreError::NotFound)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/parameters", get(list_parameters).post(create_parameter))
        .route(
            "/api/parameters/:id",
            get(get_parameter).put(update_parameter).delete(delete_parameter),
        )
        .route("/api/commands", get(list_commands))
        .route("/health", get(health))
        .fallback(not_found)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn list_parameters(State(state): State<AppState>) -> Response {
    let parameters = state.store.list().await;
    Json(json!({ "success": true, "data": parameters })).into_response()
}

async fn get_parameter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, StoreError> {
    let parameter = state.store.get(parse_id(&id)?).await?;
    Ok(Json(json!({ "success": true, "data": parameter })).into_response())
}

async fn create_parameter(
    State(state): State<AppState>,
    Json(input): Json<ParameterInput>,
) -> Result<Response, StoreError> {
    let parameter = state.store.create(&input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "data": parameter }))).into_response())
}

async fn update_parameter(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ParameterInput>,
) -> Result<Response, StoreError> {
    let parameter = state.store.update(parse_id(&id)?, &input).await?;
    Ok(Json(json!({ "success": true, "data": parameter })).into_response())
}

async fn delete_parameter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, StoreError> {
    state.store.delete(parse_id(&id)?).await?;
    Ok(Json(json!({ "success": true, "message": "Parameter deleted successfully" })).into_response())
}

async fn list_commands(State(state): State<AppState>) -> Response {
    match commands::load_commands(&state.commands_path) {
        Ok(records) => Json(records).into_response(),
        Err(e) => {
            tracing::error!("command extraction failed: {:?}", e);
            failure(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "timestamp": Utc::now().to_rfc3339() }))
}

async fn not_found() -> Response {
    failure(StatusCode::NOT_FOUND, "Endpoint not found")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

/// Bind the configured address and serve until ctrl-c.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let store = Arc::new(ParameterStore::open(&config.parameters.path)?);
    let app = router(AppState {
        store,
        commands_path: config.commands.path.clone(),
    });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("backend listening on http://{}", addr);
    tracing::info!("commands source: {}", config.commands.path.display());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server exited abnormally")?;
    Ok(())
}
