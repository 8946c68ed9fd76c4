use crate::task::{Task, TaskDraft};

/// One state transition on the task sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Create(Task),
    Update { id: String, draft: TaskDraft },
    SetStatus { id: String, status: String },
    Delete { id: String },
}

/// Pure transition: old collection in, new collection out. Misses are no-ops.
pub fn apply(mut tasks: Vec<Task>, op: Operation) -> Vec<Task> {
    match op {
        Operation::Create(task) => tasks.push(task),
        Operation::Update { id, draft } => {
            if let Some(task) = tasks.iter_mut().find(|t| t.id == id) {
                task.apply_draft(draft);
            }
        }
        Operation::SetStatus { id, status } => {
            if let Some(task) = tasks.iter_mut().find(|t| t.id == id) {
                task.status = status;
            }
        }
        Operation::Delete { id } => tasks.retain(|t| t.id != id),
    }
    tasks
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct KanbanBoard {
    tasks: Vec<Task>,
}

impl KanbanBoard {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Applies `op` in place. Returns whether any task matched its id
    /// (always true for `Create`).
    pub fn apply(&mut self, op: Operation) -> bool {
        let matched = match &op {
            Operation::Create(_) => true,
            Operation::Update { id, .. }
            | Operation::SetStatus { id, .. }
            | Operation::Delete { id } => self.get(id).is_some(),
        };
        self.tasks = apply(std::mem::take(&mut self.tasks), op);
        matched
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn get_tasks_by_status(&self, status: &str) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.status == status).collect()
    }

    /// Task count per status, in first-seen order.
    pub fn counts_by_status(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for task in &self.tasks {
            match counts.iter_mut().find(|(s, _)| *s == task.status) {
                Some((_, n)) => *n += 1,
                None => counts.push((task.status.clone(), 1)),
            }
        }
        counts
    }
}
