//! todo-api - A small HTTP service for todo items
//!
//! - CRUD over a single `todos` table in PostgreSQL
//! - Idempotent schema bootstrap at startup
//! - Liveness (`/health`) and database (`/db`) probes
//! - Static hosting for a pre-built front-end

pub mod api;
pub mod config;
pub mod error;
pub mod storage;
pub mod types;

pub use error::{Error, Result};
