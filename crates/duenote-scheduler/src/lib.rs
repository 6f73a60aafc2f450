//! # DueNote Scheduler
//!
//! In-memory note registry with deadline-triggered expiry.
//!
//! ## Architecture
//! ```text
//! payload ─▶ validate ─▶ NoteRequest ─▶ NoteRegistry (one lock)
//!                                          ├── create / update / delete / list
//!                                          └── DeadlineScheduler
//!                                                └── tokio task per note
//!                                                      └── on deadline → expire(id)
//! ```

pub mod deadline;
pub mod note;
pub mod registry;
pub mod validate;

pub use deadline::{DeadlineScheduler, ScheduledTask, TaskId, next_occurrence};
pub use note::{Note, NoteId, NoteSnapshot};
pub use registry::{NoteRegistry, Upsert};
pub use validate::{NoteRequest, parse_note_id, validate};
