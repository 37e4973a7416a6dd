//! In-process storage backend

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::types::{NewTodo, TodoId, TodoItem, TodoPatch};
use crate::{Error, Result};

use super::{require_title, TodoStore};

#[derive(Default)]
struct Table {
    rows: BTreeMap<TodoId, TodoItem>,
    last_id: TodoId,
}

/// Volatile todo store with the same semantics as the PostgreSQL backend.
/// Ids keep increasing after deletes, like a serial column.
#[derive(Default)]
pub struct MemoryStore {
    table: RwLock<Table>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn list(&self) -> Result<Vec<TodoItem>> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn create(&self, new: NewTodo) -> Result<TodoItem> {
        let title = require_title(new)?;
        let mut table = self.table.write().await;
        table.last_id += 1;

        let item = TodoItem {
            id: table.last_id,
            title,
            done: false,
            created_at: Utc::now(),
        };
        table.rows.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<TodoItem> {
        let mut table = self.table.write().await;
        let item = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| Error::not_found("Todo not found"))?;

        if let Some(title) = patch.title {
            item.title = title;
        }
        if let Some(done) = patch.done {
            item.done = done;
        }
        Ok(item.clone())
    }

    async fn delete(&self, id: TodoId) -> Result<u64> {
        let mut table = self.table.write().await;
        Ok(u64::from(table.rows.remove(&id).is_some()))
    }

    async fn db_time(&self) -> Result<DateTime<Utc>> {
        Ok(Utc::now())
    }
}
