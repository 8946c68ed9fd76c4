use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::error::{BoardError, Result};
use crate::task::Task;

/// Fixed key of the persisted slot.
pub const STORAGE_KEY: &str = "kanban-tasks";

/// A single named storage location holding one serialized blob.
pub trait Slot {
    fn read(&self) -> io::Result<Option<String>>;
    fn write(&mut self, blob: &str) -> io::Result<()>;
    fn location(&self) -> PathBuf;
}

#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// `<dir>/kanban-tasks.json`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{STORAGE_KEY}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Slot for FileSlot {
    fn read(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn write(&mut self, blob: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // write-then-rename so a crash never leaves half a file behind
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, blob)?;
        fs::rename(&tmp, &self.path)
    }

    fn location(&self) -> PathBuf {
        self.path.clone()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    blob: Option<String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self { blob: Some(blob.into()) }
    }

    pub fn blob(&self) -> Option<&str> {
        self.blob.as_deref()
    }
}

impl Slot for MemorySlot {
    fn read(&self) -> io::Result<Option<String>> {
        Ok(self.blob.clone())
    }

    fn write(&mut self, blob: &str) -> io::Result<()> {
        self.blob = Some(blob.to_string());
        Ok(())
    }

    fn location(&self) -> PathBuf {
        PathBuf::from("<memory>")
    }
}

/// Result of reading the persisted slot.
#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(Vec<Task>),
    Empty,
    Corrupt(serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct TaskStore<S> {
    slot: S,
}

impl<S: Slot> TaskStore<S> {
    pub fn new(slot: S) -> Self {
        Self { slot }
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    pub fn load(&self) -> Result<LoadOutcome> {
        let data = self.slot.read().map_err(|source| BoardError::Io {
            path: self.slot.location(),
            source,
        })?;
        let Some(data) = data else {
            return Ok(LoadOutcome::Empty);
        };
        if data.trim().is_empty() {
            return Ok(LoadOutcome::Empty);
        }
        match serde_json::from_str::<Vec<Task>>(&data) {
            Ok(tasks) => Ok(LoadOutcome::Loaded(tasks)),
            Err(err) => Ok(LoadOutcome::Corrupt(err)),
        }
    }

    /// Overwrites the slot with the whole collection.
    pub fn save(&mut self, tasks: &[Task]) -> Result<()> {
        let json = serde_json::to_string_pretty(tasks).map_err(|source| BoardError::Io {
            path: self.slot.location(),
            source: io::Error::other(source),
        })?;
        self.slot.write(&json).map_err(|source| BoardError::Io {
            path: self.slot.location(),
            source,
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Reads as empty, refuses every write.
    #[derive(Debug, Clone, Copy)]
    pub struct FailingSlot;

    impl Slot for FailingSlot {
        fn read(&self) -> io::Result<Option<String>> {
            Ok(None)
        }

        fn write(&mut self, _blob: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }

        fn location(&self) -> PathBuf {
            PathBuf::from("<read-only>")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Priority, TaskDraft};

    fn sample() -> Vec<Task> {
        vec![
            Task::from_draft(TaskDraft {
                title: "Write spec".to_string(),
                priority: Priority::High,
                status: "todo".to_string(),
                ..TaskDraft::default()
            }),
            Task::from_draft(TaskDraft {
                title: "Ship it".to_string(),
                description: "after review".to_string(),
                due_date: Some("2026-10-30".to_string()),
                status: "done".to_string(),
                ..TaskDraft::default()
            }),
        ]
    }

    #[test]
    fn absent_and_blank_slots_are_empty() {
        let store = TaskStore::new(MemorySlot::new());
        assert!(matches!(store.load().unwrap(), LoadOutcome::Empty));
        let store = TaskStore::new(MemorySlot::with_blob("  \n"));
        assert!(matches!(store.load().unwrap(), LoadOutcome::Empty));
    }

    #[test]
    fn garbage_is_reported_as_corrupt() {
        let store = TaskStore::new(MemorySlot::with_blob("{not json"));
        assert!(matches!(store.load().unwrap(), LoadOutcome::Corrupt(_)));
        let store = TaskStore::new(MemorySlot::with_blob(r#"{"id":"x"}"#));
        assert!(matches!(store.load().unwrap(), LoadOutcome::Corrupt(_)));
    }

    #[test]
    fn save_then_load_reproduces_collection() {
        let tasks = sample();
        let mut store = TaskStore::new(MemorySlot::new());
        store.save(&tasks).unwrap();
        match store.load().unwrap() {
            LoadOutcome::Loaded(loaded) => assert_eq!(loaded, tasks),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_array_loads_as_empty_collection() {
        let store = TaskStore::new(MemorySlot::with_blob("[]"));
        match store.load().unwrap() {
            LoadOutcome::Loaded(loaded) => assert!(loaded.is_empty()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn file_slot_uses_fixed_key_and_reads_missing_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSlot::in_dir(&dir.path().join("nested"));
        assert!(slot.path().ends_with("nested/kanban-tasks.json"));
        assert_eq!(slot.read().unwrap(), None);
    }

    #[test]
    fn file_slot_write_creates_parent_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let mut slot = FileSlot::in_dir(&dir.path().join("data"));
        slot.write("[1]").unwrap();
        slot.write("[]").unwrap();
        assert_eq!(slot.read().unwrap().as_deref(), Some("[]"));
        assert!(!slot.path().with_extension("json.tmp").exists());
    }
}
