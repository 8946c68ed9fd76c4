use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::task::Task;

/// A board column; `id` is the status value its tasks carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
}

impl Column {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
        }
    }

    pub fn defaults() -> Vec<Column> {
        vec![
            Column::new("todo", "To Do"),
            Column::new("in-progress", "In Progress"),
            Column::new("done", "Done"),
        ]
    }
}

/// What a task looks like on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: String,
    pub due: String,
}

impl Card {
    pub fn from_task(task: &Task) -> Self {
        let description = if task.description.is_empty() {
            "No description".to_string()
        } else {
            task.description.clone()
        };
        Card {
            id: task.id.clone(),
            title: task.title.clone(),
            description,
            priority: task.priority.to_string(),
            due: due_text(task.due_date.as_deref()),
        }
    }
}

fn due_text(due: Option<&str>) -> String {
    match due {
        None => "No due date".to_string(),
        Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => date.format("%b %-d, %Y").to_string(),
            Err(_) => raw.to_string(),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView {
    pub column: Column,
    pub cards: Vec<Card>,
}

/// Rebuilds every column from scratch. Tasks whose status names no column
/// are not shown anywhere.
pub fn render(columns: &[Column], tasks: &[Task]) -> Vec<ColumnView> {
    columns
        .iter()
        .map(|column| ColumnView {
            column: column.clone(),
            cards: tasks
                .iter()
                .filter(|t| t.status == column.id)
                .map(Card::from_task)
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Priority, TaskDraft};

    fn task(title: &str, status: &str) -> Task {
        Task::from_draft(TaskDraft {
            title: title.to_string(),
            status: status.to_string(),
            ..TaskDraft::default()
        })
    }

    #[test]
    fn each_task_lands_once_in_its_column() {
        let tasks = vec![task("a", "todo"), task("b", "done"), task("c", "todo")];
        let views = render(&Column::defaults(), &tasks);
        assert_eq!(views.len(), 3);
        for t in &tasks {
            let hits: Vec<_> = views
                .iter()
                .flat_map(|v| v.cards.iter().map(move |c| (v.column.id.as_str(), c)))
                .filter(|(_, c)| c.id == t.id)
                .collect();
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].0, t.status);
        }
        let todo: Vec<_> = views[0].cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(todo, ["a", "c"]);
        assert!(views[1].cards.is_empty());
    }

    #[test]
    fn unknown_status_is_dropped() {
        let views = render(&Column::defaults(), &[task("lost", "archived")]);
        assert!(views.iter().all(|v| v.cards.is_empty()));
    }

    #[test]
    fn card_placeholders_and_dates() {
        let mut t = task("a", "todo");
        t.priority = Priority::High;
        let card = Card::from_task(&t);
        assert_eq!(card.description, "No description");
        assert_eq!(card.due, "No due date");
        assert_eq!(card.priority, "high");

        t.due_date = Some("2026-03-05".to_string());
        assert_eq!(Card::from_task(&t).due, "Mar 5, 2026");
        t.due_date = Some("next week".to_string());
        assert_eq!(Card::from_task(&t).due, "next week");
    }
}
