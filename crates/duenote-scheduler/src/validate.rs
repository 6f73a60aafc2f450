//! Request validation — turns an untyped JSON payload into a [`NoteRequest`].

use chrono::{DateTime, Local};
use duenote_core::NoteError;
use serde_json::{Map, Value};

use crate::deadline::next_occurrence;
use crate::note::NoteId;

/// A validated create/update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRequest {
    pub id: NoteId,
    pub hours: i64,
    pub minutes: i64,
    pub text: String,
}

impl NoteRequest {
    /// Deadline this request asks for: the next `hours:minutes` after `now`.
    pub fn deadline(&self, now: DateTime<Local>) -> Result<DateTime<Local>, NoteError> {
        next_occurrence(self.hours, self.minutes, now)
    }
}

/// Validate a create/update payload.
///
/// The size check counts characters of the compact JSON rendering, not bytes
/// of the raw request body.
pub fn validate(payload: &Value, max_payload_chars: usize) -> Result<NoteRequest, NoteError> {
    if is_empty(payload) {
        return Err(NoteError::EmptyPayload);
    }

    let len = payload.to_string().chars().count();
    if len > max_payload_chars {
        return Err(NoteError::TooLarge {
            len,
            max: max_payload_chars,
        });
    }

    let Value::Object(fields) = payload else {
        return Err(NoteError::InvalidFormat("payload must be a JSON object".into()));
    };

    Ok(NoteRequest {
        id: int_field(fields, "id")?,
        hours: int_field(fields, "hours")?,
        minutes: int_field(fields, "minutes")?,
        text: text_field(fields)?,
    })
}

/// Parse a note id taken from a URL path. Ids are non-negative integers.
pub fn parse_note_id(raw: &str) -> Result<NoteId, NoteError> {
    match raw.parse::<NoteId>() {
        Ok(id) if id >= 0 => Ok(id),
        _ => Err(NoteError::InvalidId(raw.to_string())),
    }
}

fn is_empty(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Integers may arrive as JSON numbers or as numeric strings.
fn int_field(fields: &Map<String, Value>, name: &str) -> Result<i64, NoteError> {
    let invalid = || NoteError::InvalidFormat(format!("field '{name}' must be an integer"));
    match fields.get(name) {
        None | Some(Value::Null) => Err(NoteError::InvalidFormat(format!(
            "missing field '{name}'"
        ))),
        Some(Value::Number(n)) => n.as_i64().ok_or_else(invalid),
        Some(Value::String(s)) => s.trim().parse().map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

fn text_field(fields: &Map<String, Value>) -> Result<String, NoteError> {
    match fields.get("text") {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(NoteError::InvalidFormat("field 'text' must be a string".into())),
    }
}
