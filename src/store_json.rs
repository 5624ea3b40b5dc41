// src/store_json.rs

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::models::task::{Board, Task, TaskPatch};
use crate::store::{StoreError, TaskStore};

/// Document task backend: the whole board is one JSON file on local disk.
/// Every mutation rewrites the complete document, so no partial state is
/// ever observable. Concurrent processes would race; single-process use is
/// assumed.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Ensure the data directory and the board document exist, seeding an
    /// empty collection if absent.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        let path = dir.join("board.json");
        if !path.exists() {
            write_document(&path, &Board { tasks: Vec::new() })?;
        }
        Ok(Self { path })
    }

    fn read_document(&self) -> Result<Board, StoreError> {
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_document(&self, board: &Board) -> Result<(), StoreError> {
        write_document(&self.path, board)
    }
}

fn write_document(path: &Path, board: &Board) -> Result<(), StoreError> {
    let mut body = serde_json::to_string_pretty(board)?;
    body.push('\n');
    fs::write(path, body)?;
    Ok(())
}

impl TaskStore for JsonStore {
    fn read_all(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.read_document()?.tasks)
    }

    fn upsert(&self, patch: &TaskPatch) -> Result<Task, StoreError> {
        let mut board = self.read_document()?;
        let now = Utc::now();

        match board.tasks.iter().position(|t| t.id == patch.id) {
            None => {
                let created = Task::create_from(patch, now);
                // newest first; display order is the consumer's concern
                board.tasks.insert(0, created.clone());
                self.write_document(&board)?;
                Ok(created)
            }
            Some(idx) => {
                let next = board.tasks[idx].merged(patch, now);
                board.tasks[idx] = next.clone();
                self.write_document(&board)?;
                Ok(next)
            }
        }
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let mut board = self.read_document()?;
        board.tasks.retain(|t| t.id != id);
        self.write_document(&board)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::{Assignee, Priority, Status};
    use std::thread::sleep;
    use std::time::Duration;

    fn temp_dir(test_name: &str) -> PathBuf {
        let base = std::env::temp_dir();
        let pid = std::process::id();
        let nonce = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let dir = base.join(format!("taskboard_json_{test_name}_{pid}_{nonce}"));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn patch(id: &str, title: Option<&str>) -> TaskPatch {
        TaskPatch {
            id: id.to_string(),
            title: title.map(str::to_string),
            ..TaskPatch::default()
        }
    }

    #[test]
    fn open_seeds_an_empty_document() {
        let dir = temp_dir("seed");
        let store = JsonStore::open(&dir).expect("open store");
        assert!(dir.join("board.json").exists());
        assert!(store.read_all().expect("read all").is_empty());

        let raw = fs::read_to_string(dir.join("board.json")).expect("read file");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("parse file");
        assert_eq!(value["tasks"], serde_json::json!([]));
    }

    #[test]
    fn create_sets_defaults_and_equal_timestamps() {
        let store = JsonStore::open(temp_dir("create")).expect("open store");
        let task = store.upsert(&patch("t_1", None)).expect("create task");
        assert_eq!(task.title, "Untitled");
        assert_eq!(task.status, Status::Backlog);
        assert_eq!(task.priority, Priority::Med);
        assert_eq!(task.assignee, Assignee::Unassigned);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn upsert_merges_and_keeps_created_at() {
        let store = JsonStore::open(temp_dir("merge")).expect("open store");
        let created = store
            .upsert(&patch("t_1", Some("Ship")))
            .expect("create task");
        sleep(Duration::from_millis(5));

        let mut update = patch("t_1", None);
        update.status = Some(Status::Done);
        let next = store.upsert(&update).expect("patch task");

        assert_eq!(next.title, "Ship");
        assert_eq!(next.status, Status::Done);
        assert_eq!(next.created_at, created.created_at);
        assert!(next.updated_at > created.updated_at);
    }

    #[test]
    fn new_tasks_are_inserted_at_the_front() {
        let store = JsonStore::open(temp_dir("front")).expect("open store");
        store.upsert(&patch("t_1", Some("One"))).expect("create");
        store.upsert(&patch("t_2", Some("Two"))).expect("create");

        let ids: Vec<String> = store
            .read_all()
            .expect("read all")
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec!["t_2".to_string(), "t_1".to_string()]);
    }

    #[test]
    fn delete_is_idempotent_and_precise() {
        let store = JsonStore::open(temp_dir("delete")).expect("open store");
        store.upsert(&patch("t_1", Some("Keep"))).expect("create");
        store.upsert(&patch("t_2", Some("Drop"))).expect("create");

        store.delete("t_2").expect("delete present id");
        store.delete("t_2").expect("delete again");
        store.delete("t_never").expect("delete absent id");

        let all = store.read_all().expect("read all");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, "t_1");
    }

    #[test]
    fn document_survives_reopen() {
        let dir = temp_dir("reopen");
        {
            let store = JsonStore::open(&dir).expect("first open");
            store.upsert(&patch("t_1", Some("Persist"))).expect("create");
        }
        let store = JsonStore::open(&dir).expect("second open");
        let all = store.read_all().expect("read all");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Persist");
    }
}
