//! Note registry — the map of active notes and the expiry armed for each.
//!
//! One tokio mutex guards the notes and their scheduled tasks together: every
//! operation, including expiry, holds it for its whole critical section.
//! Duplicate-deadline checks scan all notes, so lock hold time grows linearly
//! with the number of active notes.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use chrono::{DateTime, Local};
use duenote_core::NoteError;
use tokio::sync::Mutex;

use crate::deadline::{DeadlineScheduler, ScheduledTask, TaskId};
use crate::note::{Note, NoteId, NoteSnapshot};

type NoteMap = HashMap<NoteId, Note>;

/// What an update did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
}

/// Concurrency-safe registry of active notes. Cheap to clone; clones share state.
#[derive(Clone, Default)]
pub struct NoteRegistry {
    notes: Arc<Mutex<NoteMap>>,
    scheduler: Arc<DeadlineScheduler>,
}

impl NoteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new note and arm its expiry.
    pub async fn create(
        &self,
        id: NoteId,
        deadline: DateTime<Local>,
        text: String,
    ) -> Result<(), NoteError> {
        let mut notes = self.notes.lock().await;
        if notes.contains_key(&id) {
            return Err(NoteError::DuplicateId(id));
        }
        if notes.values().any(|n| n.deadline == deadline) {
            return Err(NoteError::DuplicateDeadline(deadline));
        }

        let task = self.arm(id, deadline);
        notes.insert(
            id,
            Note {
                id,
                deadline,
                text,
                task,
            },
        );
        Ok(())
    }

    /// Insert or replace the note with `id`, re-arming its expiry.
    ///
    /// Only other notes are checked for a deadline collision; the note's own
    /// previous deadline may be reused.
    pub async fn update(
        &self,
        id: NoteId,
        deadline: DateTime<Local>,
        text: String,
    ) -> Result<Upsert, NoteError> {
        let mut notes = self.notes.lock().await;
        if notes.values().any(|n| n.id != id && n.deadline == deadline) {
            return Err(NoteError::DuplicateDeadline(deadline));
        }

        let previous = notes.remove(&id);
        if let Some(task) = previous.as_ref().and_then(|n| n.task.as_ref()) {
            self.scheduler.cancel(task);
        }

        let task = self.arm(id, deadline);
        notes.insert(
            id,
            Note {
                id,
                deadline,
                text,
                task,
            },
        );
        Ok(if previous.is_some() {
            Upsert::Replaced
        } else {
            Upsert::Inserted
        })
    }

    /// Remove the note with `id` and cancel its expiry.
    pub async fn delete(&self, id: NoteId) -> Result<NoteSnapshot, NoteError> {
        if id < 0 {
            return Err(NoteError::InvalidId(id.to_string()));
        }
        let mut notes = self.notes.lock().await;
        let note = notes.remove(&id).ok_or(NoteError::NotFound(id))?;
        if let Some(task) = &note.task {
            self.scheduler.cancel(task);
        }
        Ok(note.snapshot())
    }

    /// Look up a single note.
    pub async fn get(&self, id: NoteId) -> Result<NoteSnapshot, NoteError> {
        if id < 0 {
            return Err(NoteError::InvalidId(id.to_string()));
        }
        let notes = self.notes.lock().await;
        notes
            .get(&id)
            .map(Note::snapshot)
            .ok_or(NoteError::NotFound(id))
    }

    /// Ids of all active notes, ascending.
    pub async fn list_ids(&self) -> Vec<NoteId> {
        let notes = self.notes.lock().await;
        let mut ids: Vec<NoteId> = notes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Number of active notes.
    pub async fn count(&self) -> usize {
        self.notes.lock().await.len()
    }

    /// Cancel every pending expiry and drop all notes.
    pub async fn shutdown(&self) {
        let mut notes = self.notes.lock().await;
        for task in notes.values().filter_map(|n| n.task.as_ref()) {
            self.scheduler.cancel(task);
        }
        let dropped = notes.len();
        notes.clear();
        tracing::info!("🧹 Registry shut down, {} note(s) discarded", dropped);
    }

    /// Arm the expiry for note `id`. Must be called with the lock held so the
    /// returned task lands in the map before it can fire.
    fn arm(&self, id: NoteId, deadline: DateTime<Local>) -> Option<ScheduledTask> {
        let notes = Arc::downgrade(&self.notes);
        self.scheduler
            .arm(deadline, move |task_id| expire(notes, id, task_id))
    }
}

/// Expiry callback: remove note `id` if it still carries the task that fired.
/// A note that was deleted or re-armed in the meantime is left alone.
async fn expire(notes: Weak<Mutex<NoteMap>>, id: NoteId, task_id: TaskId) {
    let Some(shared) = notes.upgrade() else {
        return;
    };
    let mut notes = shared.lock().await;

    let current = notes
        .get(&id)
        .and_then(|n| n.task.as_ref())
        .map(ScheduledTask::id);
    if current != Some(task_id) {
        tracing::debug!("Stale expiry {:?} for note {} ignored", task_id, id);
        return;
    }

    if let Some(note) = notes.remove(&id) {
        tracing::info!(
            "🔔 Note {} due at {} expired: {}",
            note.id,
            note.deadline.format("%Y-%m-%d %H:%M:%S"),
            note.text
        );
    }
}
