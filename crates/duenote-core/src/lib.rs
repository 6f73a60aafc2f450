//! # DueNote Core
//!
//! Shared configuration and error types used by every DueNote crate.

pub mod config;
pub mod error;

pub use config::DueNoteConfig;
pub use error::{DueNoteError, NoteError, Result};
