use tracing::{debug, info, warn};

use crate::error::{BoardError, Result};
use crate::kanban_board::{KanbanBoard, Operation};
use crate::layout::{self, Column, ColumnView};
use crate::store::{LoadOutcome, Slot, TaskStore};
use crate::task::{Task, TaskDraft};

/// Owns the task sequence, its persisted mirror and the derived layout.
/// Every mutation applies, saves, then re-renders before returning.
pub struct App<S: Slot> {
    board: KanbanBoard,
    store: TaskStore<S>,
    columns: Vec<Column>,
    view: Vec<ColumnView>,
}

impl<S: Slot> App<S> {
    /// Loads the persisted collection. A corrupt blob is an error, not an
    /// empty board.
    pub fn open(store: TaskStore<S>, columns: Vec<Column>) -> Result<Self> {
        let board = match store.load()? {
            LoadOutcome::Loaded(tasks) => {
                info!(count = tasks.len(), "loaded tasks");
                KanbanBoard::from_tasks(tasks)
            }
            LoadOutcome::Empty => {
                info!("no stored tasks, starting empty");
                KanbanBoard::new()
            }
            LoadOutcome::Corrupt(err) => {
                warn!(error = %err, "stored tasks are corrupt");
                return Err(BoardError::CorruptStore(err));
            }
        };
        let mut app = App {
            board,
            store,
            columns,
            view: Vec::new(),
        };
        app.render();
        Ok(app)
    }

    pub fn tasks(&self) -> &[Task] {
        self.board.tasks()
    }

    pub fn board(&self) -> &KanbanBoard {
        &self.board
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn view(&self) -> &[ColumnView] {
        &self.view
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn render(&mut self) {
        self.view = layout::render(&self.columns, self.board.tasks());
    }

    pub fn save(&mut self) -> Result<()> {
        self.store.save(self.board.tasks())?;
        debug!(count = self.board.len(), "saved tasks");
        Ok(())
    }

    /// Applies to a copy first; memory and view only change once the
    /// copy is persisted.
    fn commit(&mut self, op: Operation) -> Result<bool> {
        let mut next = self.board.clone();
        let matched = next.apply(op);
        self.store.save(next.tasks())?;
        debug!(count = next.len(), "saved tasks");
        self.board = next;
        self.render();
        Ok(matched)
    }

    /// Returns the id of the new task.
    pub fn create(&mut self, draft: TaskDraft) -> Result<String> {
        let task = Task::from_draft(draft);
        let id = task.id.clone();
        info!(%id, status = %task.status, "create task");
        self.commit(Operation::Create(task))?;
        Ok(id)
    }

    pub fn update(&mut self, id: &str, draft: TaskDraft) -> Result<bool> {
        let matched = self.commit(Operation::Update {
            id: id.to_string(),
            draft,
        })?;
        info!(%id, matched, "update task");
        Ok(matched)
    }

    pub fn set_status(&mut self, id: &str, status: &str) -> Result<bool> {
        let matched = self.commit(Operation::SetStatus {
            id: id.to_string(),
            status: status.to_string(),
        })?;
        info!(%id, %status, matched, "move task");
        Ok(matched)
    }

    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let matched = self.commit(Operation::Delete { id: id.to_string() })?;
        info!(%id, matched, "delete task");
        Ok(matched)
    }
}
