// src/store_db.rs

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::models::task::{Assignee, Priority, Status, Task, TaskPatch};
use crate::store::{StoreError, TaskStore};

/// Relational task backend. One connection for the whole process; the
/// single-writer workload does not need a pool.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

/// Raw `tasks` row, converted to the domain model after the query.
struct TaskRow {
    id: String,
    title: String,
    description: Option<String>,
    assignee: String,
    status: String,
    priority: String,
    created_at: String,
    updated_at: String,
}

impl TaskRow {
    fn into_task(self) -> Result<Task, StoreError> {
        Ok(Task {
            id: self.id,
            title: self.title,
            description: self.description,
            assignee: Assignee::parse(&self.assignee).ok_or(StoreError::Corrupt("assignee"))?,
            status: Status::parse(&self.status).ok_or(StoreError::Corrupt("status"))?,
            priority: Priority::parse(&self.priority).ok_or(StoreError::Corrupt("priority"))?,
            created_at: parse_ts("created_at", &self.created_at)?,
            updated_at: parse_ts("updated_at", &self.updated_at)?,
        })
    }
}

fn task_row(row: &Row<'_>) -> rusqlite::Result<TaskRow> {
    Ok(TaskRow {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        assignee: row.get(3)?,
        status: row.get(4)?,
        priority: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

// Fixed-width RFC 3339 UTC, so lexicographic order in the column matches
// chronological order.
fn ts(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_ts(column: &'static str, raw: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| StoreError::Corrupt(column))
}

const SELECT_TASK: &str = "SELECT id, title, description, assignee, status, priority, created_at, updated_at
     FROM tasks";

impl SqliteStore {
    /// Open the database named by the connection string and ensure the
    /// schema. Runs once per process, before first access; the schema
    /// statements are idempotent.
    pub fn open(database_url: &str) -> Result<Self, StoreError> {
        if database_url.is_empty() {
            return Err(StoreError::NotConfigured);
        }
        if let Some(dir) = std::path::Path::new(database_url).parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let conn = Connection::open(database_url)?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;

            CREATE TABLE IF NOT EXISTS tasks (
              id TEXT PRIMARY KEY,
              title TEXT NOT NULL,
              description TEXT,
              assignee TEXT NOT NULL,
              status TEXT NOT NULL,
              priority TEXT NOT NULL,
              created_at TEXT NOT NULL,
              updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS tasks_status_idx ON tasks(status);
            CREATE INDEX IF NOT EXISTS tasks_updated_at_idx ON tasks(updated_at DESC);
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl TaskStore for SqliteStore {
    fn read_all(&self) -> Result<Vec<Task>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("{SELECT_TASK} ORDER BY updated_at DESC"))?;
        let rows = stmt.query_map([], task_row)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?.into_task()?);
        }
        Ok(tasks)
    }

    fn upsert(&self, patch: &TaskPatch) -> Result<Task, StoreError> {
        let conn = self.conn.lock();
        let now = Utc::now();

        // Read-modify-write with no row lock: last write wins.
        let existing = conn
            .query_row(
                &format!("{SELECT_TASK} WHERE id = ?1"),
                params![patch.id],
                task_row,
            )
            .optional()?;

        match existing {
            None => {
                let task = Task::create_from(patch, now);
                conn.execute(
                    r#"
                    INSERT INTO tasks (id, title, description, assignee, status, priority, created_at, updated_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    "#,
                    params![
                        task.id,
                        task.title,
                        task.description,
                        task.assignee.as_str(),
                        task.status.as_str(),
                        task.priority.as_str(),
                        ts(task.created_at),
                        ts(task.updated_at),
                    ],
                )?;
                Ok(task)
            }
            Some(row) => {
                let current = row.into_task()?;
                let next = current.merged(patch, now);
                conn.execute(
                    r#"
                    UPDATE tasks
                    SET title = ?2, description = ?3, assignee = ?4, status = ?5, priority = ?6, updated_at = ?7
                    WHERE id = ?1
                    "#,
                    params![
                        next.id,
                        next.title,
                        next.description,
                        next.assignee.as_str(),
                        next.status.as_str(),
                        next.priority.as_str(),
                        ts(next.updated_at),
                    ],
                )?;
                Ok(next)
            }
        }
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        // deleting an absent id is a no-op success
        conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        Ok(())
    }
}
