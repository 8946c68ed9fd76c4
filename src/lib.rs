pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod kanban_board;
pub mod layout;
pub mod logging;
pub mod store;
pub mod task;
pub mod ui;

pub use app::App;
pub use error::BoardError;
pub use kanban_board::{KanbanBoard, Operation};
pub use store::{FileSlot, LoadOutcome, MemorySlot, Slot, TaskStore};
pub use task::{Priority, Task, TaskDraft};
