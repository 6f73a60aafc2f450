//! HTTP server implementation using Axum.

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use duenote_core::DueNoteConfig;
use duenote_core::config::{GatewayConfig, NotesConfig};
use duenote_scheduler::NoteRegistry;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

/// Shared state for the gateway server.
pub struct AppState {
    pub gateway_config: GatewayConfig,
    pub notes_config: NotesConfig,
    pub start_time: std::time::Instant,
    /// Active notes and their pending expiries.
    pub registry: NoteRegistry,
}

impl AppState {
    pub fn new(config: &DueNoteConfig) -> Self {
        Self {
            gateway_config: config.gateway.clone(),
            notes_config: config.notes.clone(),
            start_time: std::time::Instant::now(),
            registry: NoteRegistry::new(),
        }
    }
}

/// Turn a handler panic into an opaque 500 instead of a dropped connection.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("❌ Handler panicked: {detail}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"ok": false, "error": "unexpected server error"})),
    )
        .into_response()
}

/// Body cap, panic recovery, and request tracing.
pub(crate) fn with_layers(
    router: Router<Arc<AppState>>,
    max_body_bytes: usize,
) -> Router<Arc<AppState>> {
    router
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    build_router_from_arc(Arc::new(state))
}

pub fn build_router_from_arc(shared: Arc<AppState>) -> Router {
    let notes = Router::new()
        .route(
            "/notes",
            get(super::routes::list_notes)
                .post(super::routes::create_note)
                .put(super::routes::update_note),
        )
        .route(
            "/notes/{id}",
            get(super::routes::get_note).delete(super::routes::delete_note),
        )
        .route("/health", get(super::routes::health_check));

    with_layers(notes, shared.gateway_config.max_body_bytes).with_state(shared)
}

/// Start the HTTP server and run until Ctrl-C.
pub async fn start(config: &DueNoteConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState::new(config));
    let app = build_router_from_arc(state.clone());

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("🌐 DueNote listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.registry.shutdown().await;
    tracing::info!("👋 DueNote stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("🛑 Shutdown requested, draining requests"),
        Err(e) => tracing::error!("❌ Failed to listen for Ctrl-C: {e}"),
    }
}
