//! PostgreSQL storage backend

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{PgPool, Postgres};

use crate::types::{NewTodo, TodoId, TodoItem, TodoPatch};
use crate::{Error, Result};

use super::{require_title, TodoStore};

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS todos (
    id BIGSERIAL PRIMARY KEY,
    title TEXT NOT NULL,
    done BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

const COLUMNS: &str = "id, title, done, created_at";

/// Connection settings for the pool
#[derive(Debug, Clone)]
pub struct PgSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl PgSettings {
    fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

/// Todo repository over a bounded `PgPool`
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Open the pool. Fails with `Error::Connection` if the server is unreachable.
    pub async fn connect(settings: &PgSettings) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
            .connect_with(settings.connect_options())
            .await
            .map_err(|e| Error::connection(e.to_string()))?;

        tracing::info!(
            host = %settings.host,
            port = settings.port,
            database = %settings.database,
            max_connections = settings.max_connections,
            "Connected to PostgreSQL",
        );

        Ok(Self { pool })
    }

    async fn find(&self, id: TodoId) -> Result<Option<TodoItem>> {
        let row = sqlx::query_as::<_, TodoItem>(&format!(
            "SELECT {COLUMNS} FROM todos WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}

#[async_trait]
impl TodoStore for PgStore {
    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        tracing::info!("Schema ready");
        Ok(())
    }

    async fn list(&self) -> Result<Vec<TodoItem>> {
        let rows = sqlx::query_as::<_, TodoItem>(&format!(
            "SELECT {COLUMNS} FROM todos ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create(&self, new: NewTodo) -> Result<TodoItem> {
        let title = require_title(new)?;
        let row = sqlx::query_as::<_, TodoItem>(&format!(
            "INSERT INTO todos (title) VALUES ($1) RETURNING {COLUMNS}"
        ))
        .bind(title)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update(&self, id: TodoId, patch: TodoPatch) -> Result<TodoItem> {
        let row = match UpdateStatement::build(id, patch) {
            Some(stmt) => {
                let mut query = sqlx::query_as::<Postgres, TodoItem>(&stmt.sql);
                for param in stmt.params {
                    query = match param {
                        Param::Text(value) => query.bind(value),
                        Param::Bool(value) => query.bind(value),
                        Param::Id(value) => query.bind(value),
                    };
                }
                query.fetch_optional(&self.pool).await?
            }
            None => self.find(id).await?,
        };

        row.ok_or_else(|| Error::not_found("Todo not found"))
    }

    async fn delete(&self, id: TodoId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn db_time(&self) -> Result<DateTime<Utc>> {
        let now: DateTime<Utc> = sqlx::query_scalar("SELECT NOW()")
            .fetch_one(&self.pool)
            .await?;
        Ok(now)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Param {
    Text(String),
    Bool(bool),
    Id(TodoId),
}

/// Parameterized `UPDATE` touching only the columns present in a patch.
///
/// The statement shape depends only on which fields are present. Columns
/// are emitted title before done and the row id is always the last parameter.
#[derive(Debug, Clone, PartialEq)]
struct UpdateStatement {
    sql: String,
    params: Vec<Param>,
}

impl UpdateStatement {
    /// Returns `None` for an empty patch.
    fn build(id: TodoId, patch: TodoPatch) -> Option<Self> {
        let mut assignments = Vec::new();
        let mut params = Vec::new();

        if let Some(title) = patch.title {
            params.push(Param::Text(title));
            assignments.push(format!("title = ${}", params.len()));
        }
        if let Some(done) = patch.done {
            params.push(Param::Bool(done));
            assignments.push(format!("done = ${}", params.len()));
        }

        if assignments.is_empty() {
            return None;
        }

        params.push(Param::Id(id));
        let sql = format!(
            "UPDATE todos SET {} WHERE id = ${} RETURNING {COLUMNS}",
            assignments.join(", "),
            params.len()
        );

        Some(Self { sql, params })
    }
}
