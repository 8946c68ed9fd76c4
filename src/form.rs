use crate::error::{BoardError, Result};
use crate::layout::Column;
use crate::task::{Priority, Task, TaskDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Description,
    DueDate,
    Priority,
    Status,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Title,
        Field::Description,
        Field::DueDate,
        Field::Priority,
        Field::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Description => "Description",
            Field::DueDate => "Due date (YYYY-MM-DD)",
            Field::Priority => "Priority",
            Field::Status => "Status",
        }
    }

    fn is_text(self) -> bool {
        matches!(self, Field::Title | Field::Description | Field::DueDate)
    }
}

/// Add/edit form. `editing` holds the id of the task being edited.
#[derive(Debug, Clone)]
pub struct TaskForm {
    pub editing: Option<String>,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub priority: Priority,
    pub status_index: usize,
    pub focus: usize,
    pub error: Option<String>,
}

impl TaskForm {
    pub fn new_task(status_index: usize) -> Self {
        Self {
            editing: None,
            title: String::new(),
            description: String::new(),
            due_date: String::new(),
            priority: Priority::default(),
            status_index,
            focus: 0,
            error: None,
        }
    }

    pub fn edit(task: &Task, columns: &[Column]) -> Self {
        Self {
            editing: Some(task.id.clone()),
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.clone().unwrap_or_default(),
            priority: task.priority,
            status_index: columns.iter().position(|c| c.id == task.status).unwrap_or(0),
            focus: 0,
            error: None,
        }
    }

    pub fn focused(&self) -> Field {
        Field::ALL[self.focus]
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % Field::ALL.len();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + Field::ALL.len() - 1) % Field::ALL.len();
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.focused() {
            Field::Title => Some(&mut self.title),
            Field::Description => Some(&mut self.description),
            Field::DueDate => Some(&mut self.due_date),
            _ => None,
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(text) = self.text_mut() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.text_mut() {
            text.pop();
        }
    }

    /// Left/Right on a choice field.
    pub fn cycle(&mut self, forward: bool, column_count: usize) {
        if self.focused().is_text() {
            return;
        }
        match self.focused() {
            Field::Priority => {
                let i = Priority::ALL.iter().position(|p| *p == self.priority).unwrap_or(1);
                let n = Priority::ALL.len();
                let i = if forward { (i + 1) % n } else { (i + n - 1) % n };
                self.priority = Priority::ALL[i];
            }
            Field::Status if column_count > 0 => {
                let n = column_count;
                self.status_index = if forward {
                    (self.status_index + 1) % n
                } else {
                    (self.status_index + n - 1) % n
                };
            }
            _ => {}
        }
    }

    pub fn value(&self, field: Field, columns: &[Column]) -> String {
        match field {
            Field::Title => self.title.clone(),
            Field::Description => self.description.clone(),
            Field::DueDate => self.due_date.clone(),
            Field::Priority => self.priority.to_string(),
            Field::Status => columns
                .get(self.status_index)
                .map(|c| c.title.clone())
                .unwrap_or_default(),
        }
    }

    /// The only check is a non-empty title.
    pub fn to_draft(&self, columns: &[Column]) -> Result<TaskDraft> {
        if self.title.trim().is_empty() {
            return Err(BoardError::EmptyTitle);
        }
        let status = columns
            .get(self.status_index)
            .map(|c| c.id.clone())
            .unwrap_or_default();
        Ok(TaskDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: Some(self.due_date.clone()).filter(|d| !d.trim().is_empty()),
            priority: self.priority,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_title_is_rejected() {
        let mut form = TaskForm::new_task(0);
        form.title = "   ".to_string();
        assert!(matches!(form.to_draft(&Column::defaults()), Err(BoardError::EmptyTitle)));
    }

    #[test]
    fn typing_goes_to_focused_text_field() {
        let mut form = TaskForm::new_task(1);
        for c in "Fix".chars() {
            form.push_char(c);
        }
        form.next_field();
        form.push_char('x');
        form.backspace();
        form.next_field();
        for c in "2026-01-02".chars() {
            form.push_char(c);
        }
        let draft = form.to_draft(&Column::defaults()).unwrap();
        assert_eq!(draft.title, "Fix");
        assert_eq!(draft.description, "");
        assert_eq!(draft.due_date.as_deref(), Some("2026-01-02"));
        assert_eq!(draft.status, "in-progress");
    }

    #[test]
    fn choice_fields_cycle_and_ignore_typing() {
        let mut form = TaskForm::new_task(0);
        form.focus = 3;
        form.push_char('z');
        form.cycle(true, 3);
        assert_eq!(form.priority, Priority::High);
        form.cycle(true, 3);
        assert_eq!(form.priority, Priority::Low);
        form.next_field();
        form.cycle(false, 3);
        assert_eq!(form.status_index, 2);
        form.prev_field();
        form.prev_field();
        form.prev_field();
        form.prev_field();
        form.prev_field();
        assert_eq!(form.focused(), Field::Status);
    }

    #[test]
    fn edit_prefills_from_task() {
        let task = Task::from_draft(TaskDraft {
            title: "Review".to_string(),
            status: "done".to_string(),
            priority: Priority::Low,
            ..TaskDraft::default()
        });
        let form = TaskForm::edit(&task, &Column::defaults());
        assert_eq!(form.editing.as_deref(), Some(task.id.as_str()));
        assert_eq!(form.status_index, 2);
        assert_eq!(form.to_draft(&Column::defaults()).unwrap(), task.to_draft());
    }
}
