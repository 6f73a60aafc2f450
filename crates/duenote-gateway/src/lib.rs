//! # DueNote Gateway
//!
//! HTTP API over the note registry.
//!
//! | Method | Path | Success |
//! |---|---|---|
//! | `POST` | `/notes` | 201 |
//! | `PUT` | `/notes` | 200 |
//! | `GET` | `/notes` | 200, array of ids |
//! | `GET` | `/notes/{id}` | 200 |
//! | `DELETE` | `/notes/{id}` | 200 |
//! | `GET` | `/health` | 200 |

pub mod routes;
pub mod server;

pub use server::{AppState, build_router, start};
