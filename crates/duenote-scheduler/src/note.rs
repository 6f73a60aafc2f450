//! Note definitions — the data model for pending deadline notes.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::deadline::ScheduledTask;

/// Externally supplied note identifier. Unique among active notes only.
pub type NoteId = i64;

/// A pending note, owned by the registry.
#[derive(Debug)]
pub struct Note {
    pub id: NoteId,
    /// When the note expires.
    pub deadline: DateTime<Local>,
    pub text: String,
    /// Armed expiry; `None` when the deadline had already passed at arm time.
    pub(crate) task: Option<ScheduledTask>,
}

impl Note {
    /// Whether an expiry is still pending for this note.
    pub fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn snapshot(&self) -> NoteSnapshot {
        NoteSnapshot {
            id: self.id,
            deadline: self.deadline,
            text: self.text.clone(),
            armed: self.is_armed(),
        }
    }
}

/// Read-only copy of a note handed out by the registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteSnapshot {
    pub id: NoteId,
    pub deadline: DateTime<Local>,
    pub text: String,
    pub armed: bool,
}
