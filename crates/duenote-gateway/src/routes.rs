//! API route handlers for the gateway.
//!
//! Handlers parse the request, hand it to the note registry, and translate the
//! outcome into a status code and a JSON body. No note logic lives here.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Local;
use duenote_core::NoteError;
use duenote_scheduler::{NoteId, NoteSnapshot, Upsert, parse_note_id, validate};
use serde_json::Value;
use std::sync::Arc;

use super::server::AppState;

/// A failed request, rendered as `{"ok": false, "error": "..."}`.
#[derive(Debug)]
pub struct ApiError(NoteError);

impl From<NoteError> for ApiError {
    fn from(err: NoteError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            NoteError::NotFound(_) => StatusCode::NOT_FOUND,
            NoteError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.is_client_error() {
            tracing::warn!("⚠️ Request rejected ({}): {}", status.as_u16(), self.0);
        } else {
            tracing::error!("❌ Request failed: {}", self.0);
        }
        let body = serde_json::json!({"ok": false, "error": self.0.to_string()});
        (status, Json(body)).into_response()
    }
}

/// Decode a request body. An empty body reads as JSON `null`; anything else
/// must be declared as `application/json`.
fn parse_body(headers: &HeaderMap, body: &Bytes) -> Result<Value, NoteError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    if !is_json_content(headers) {
        return Err(NoteError::InvalidFormat("expected application/json".into()));
    }
    serde_json::from_slice(body)
        .map_err(|e| NoteError::InvalidFormat(format!("malformed JSON: {e}")))
}

/// `application/json`, optionally with parameters such as `charset`.
fn is_json_content(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "duenote",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.start_time.elapsed().as_secs(),
        "notes": state.registry.count().await,
    }))
}

/// Create a note.
pub async fn create_note(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let payload = parse_body(&headers, &body)?;
    let req = validate(&payload, state.notes_config.max_payload_chars)?;
    let deadline = req.deadline(Local::now())?;

    state.registry.create(req.id, deadline, req.text).await?;
    tracing::info!(
        "📝 Note {} created, due {}",
        req.id,
        deadline.format("%Y-%m-%d %H:%M:%S")
    );

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "ok": true,
            "id": req.id,
            "deadline": deadline.to_rfc3339(),
        })),
    ))
}

/// Replace a note, or create it if absent.
pub async fn update_note(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let payload = parse_body(&headers, &body)?;
    let req = validate(&payload, state.notes_config.max_payload_chars)?;
    let deadline = req.deadline(Local::now())?;

    let outcome = state.registry.update(req.id, deadline, req.text).await?;
    let verb = match outcome {
        Upsert::Inserted => "created",
        Upsert::Replaced => "updated",
    };
    tracing::info!(
        "✏️ Note {} {}, due {}",
        req.id,
        verb,
        deadline.format("%Y-%m-%d %H:%M:%S")
    );

    Ok(Json(serde_json::json!({
        "ok": true,
        "id": req.id,
        "deadline": deadline.to_rfc3339(),
        "created": outcome == Upsert::Inserted,
    })))
}

/// Delete a note before its deadline.
pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_note_id(&raw_id)?;
    let removed = state.registry.delete(id).await?;
    tracing::info!("🗑️ Note {} deleted", removed.id);
    Ok(Json(serde_json::json!({"ok": true, "id": removed.id})))
}

/// Ids of all active notes.
pub async fn list_notes(State(state): State<Arc<AppState>>) -> Json<Vec<NoteId>> {
    Json(state.registry.list_ids().await)
}

/// A single note.
pub async fn get_note(
    State(state): State<Arc<AppState>>,
    Path(raw_id): Path<String>,
) -> Result<Json<NoteSnapshot>, ApiError> {
    let id = parse_note_id(&raw_id)?;
    Ok(Json(state.registry.get(id).await?))
}
