// src/store.rs

use thiserror::Error;

use crate::config::Config;
use crate::models::task::{Board, Task, TaskPatch};
use crate::store_db::SqliteStore;
use crate::store_json::JsonStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("document: {0}")]
    Document(#[from] serde_json::Error),
    #[error("corrupt {0} value in stored task")]
    Corrupt(&'static str),
    #[error("relational backend invoked without a connection string")]
    NotConfigured,
}

/// Uniform contract over the two persistence backends.
pub trait TaskStore: Send + Sync {
    fn read_all(&self) -> Result<Vec<Task>, StoreError>;
    fn upsert(&self, patch: &TaskPatch) -> Result<Task, StoreError>;
    fn delete(&self, id: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Db,
    Json,
}

impl StorageMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageMode::Db => "db",
            StorageMode::Json => "json",
        }
    }
}

/// Facade over whichever backend the configuration selects. Built once at
/// startup and shared for the life of the process; no backend-specific logic
/// lives here.
pub struct BoardService {
    mode: StorageMode,
    store: Box<dyn TaskStore>,
}

impl BoardService {
    /// A configured `DATABASE_URL` selects the relational backend; otherwise
    /// the board lives in a JSON document under the data directory.
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        match config.database_url.as_deref() {
            Some(url) => Ok(Self {
                mode: StorageMode::Db,
                store: Box::new(SqliteStore::open(url)?),
            }),
            None => Ok(Self {
                mode: StorageMode::Json,
                store: Box::new(JsonStore::open(&config.data_dir)?),
            }),
        }
    }

    pub fn read_board(&self) -> Result<Board, StoreError> {
        Ok(Board {
            tasks: self.store.read_all()?,
        })
    }

    pub fn upsert_task(&self, patch: &TaskPatch) -> Result<Task, StoreError> {
        self.store.upsert(patch)
    }

    pub fn delete_task(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete(id)
    }

    /// Introspection only; callers never branch on this.
    pub fn storage_mode(&self) -> StorageMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{Priority, Status};
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    fn temp_dir(test_name: &str) -> PathBuf {
        let base = std::env::temp_dir();
        let pid = std::process::id();
        let nonce = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let dir = base.join(format!("taskboard_{test_name}_{pid}_{nonce}"));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn service(config: &Config) -> BoardService {
        BoardService::from_config(config).expect("open board service")
    }

    fn run_sequence(board: &BoardService) {
        board
            .upsert_task(&TaskPatch {
                id: "t_a".to_string(),
                title: Some("First".to_string()),
                ..TaskPatch::default()
            })
            .expect("create t_a");
        board
            .upsert_task(&TaskPatch {
                id: "t_b".to_string(),
                title: Some("Second".to_string()),
                priority: Some(Priority::High),
                ..TaskPatch::default()
            })
            .expect("create t_b");
        board
            .upsert_task(&TaskPatch {
                id: "t_a".to_string(),
                status: Some(Status::Done),
                ..TaskPatch::default()
            })
            .expect("patch t_a");
        board.delete_task("t_b").expect("delete t_b");
        board.delete_task("t_missing").expect("delete absent id");
    }

    fn snapshot(board: &BoardService) -> BTreeMap<String, (String, Status, Priority)> {
        board
            .read_board()
            .expect("read board")
            .tasks
            .into_iter()
            .map(|t| (t.id, (t.title, t.status, t.priority)))
            .collect()
    }

    #[test]
    fn selector_prefers_relational_when_url_present() {
        let dir = temp_dir("selector_db");
        let config = Config {
            database_url: Some(dir.join("board.db").to_string_lossy().into_owned()),
            edit_password: None,
            data_dir: dir.to_string_lossy().into_owned(),
            frontend_origin: "http://localhost:3000".to_string(),
        };
        assert_eq!(service(&config).storage_mode(), StorageMode::Db);
    }

    #[test]
    fn selector_falls_back_to_document_store() {
        let dir = temp_dir("selector_json");
        let config = Config {
            database_url: None,
            edit_password: None,
            data_dir: dir.to_string_lossy().into_owned(),
            frontend_origin: "http://localhost:3000".to_string(),
        };
        assert_eq!(service(&config).storage_mode(), StorageMode::Json);
    }

    #[test]
    fn backends_agree_on_the_same_operation_sequence() {
        let dir = temp_dir("equivalence");
        let json_config = Config {
            database_url: None,
            edit_password: None,
            data_dir: dir.join("json").to_string_lossy().into_owned(),
            frontend_origin: "http://localhost:3000".to_string(),
        };
        let db_config = Config {
            database_url: Some(dir.join("board.db").to_string_lossy().into_owned()),
            edit_password: None,
            data_dir: dir.join("unused").to_string_lossy().into_owned(),
            frontend_origin: "http://localhost:3000".to_string(),
        };

        let json_board = service(&json_config);
        let db_board = service(&db_config);
        run_sequence(&json_board);
        run_sequence(&db_board);

        let expected: BTreeMap<_, _> = [(
            "t_a".to_string(),
            ("First".to_string(), Status::Done, Priority::Med),
        )]
        .into_iter()
        .collect();
        assert_eq!(snapshot(&json_board), expected);
        assert_eq!(snapshot(&db_board), expected);
    }
}
