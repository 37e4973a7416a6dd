//! Storage abstraction layer
//!
//! Provides a unified repository interface over PostgreSQL and an
//! in-process store

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::types::{NewTodo, TodoId, TodoItem, TodoPatch};
use crate::Result;

pub mod memory;
pub mod postgres;

/// Repository of todo items
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Create the backing table if it does not exist yet
    async fn ensure_schema(&self) -> Result<()>;

    /// All items, ascending by id
    async fn list(&self) -> Result<Vec<TodoItem>>;

    /// Insert a new item. Fails with `Error::Validation` when the title is absent.
    async fn create(&self, new: NewTodo) -> Result<TodoItem>;

    /// Apply a partial update and return the resulting row.
    ///
    /// An empty patch changes nothing and returns the current row.
    /// Fails with `Error::NotFound` if no row has this id.
    async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<TodoItem>;

    /// Remove an item, returning the number of rows removed (0 or 1)
    async fn delete(&self, id: TodoId) -> Result<u64>;

    /// Current time as reported by the store
    async fn db_time(&self) -> Result<DateTime<Utc>>;
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Postgres(postgres::PgSettings),
    Memory,
}

/// Create storage backend from config
pub async fn create_store(config: StoreConfig) -> Result<Box<dyn TodoStore>> {
    match config {
        StoreConfig::Postgres(settings) => {
            let backend = postgres::PgStore::connect(&settings).await?;
            Ok(Box::new(backend))
        }
        StoreConfig::Memory => Ok(Box::new(memory::MemoryStore::new())),
    }
}

pub(crate) fn require_title(new: NewTodo) -> Result<String> {
    new.title
        .ok_or_else(|| crate::Error::validation("title is required"))
}
