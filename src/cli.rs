use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use crate::app::App;
use crate::config::Config;
use crate::error::BoardError;
use crate::layout::Card;
use crate::logging;
use crate::store::{FileSlot, Slot, TaskStore};
use crate::task::{Priority, TaskDraft};
use crate::ui;

#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about = "Terminal kanban board with local storage")]
pub struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Directory holding kanban-tasks.json and the log
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Interactive board (default)
    Tui,
    /// Add a new task
    Add(AddArgs),
    /// Replace fields of a task; omitted fields are kept
    Edit(EditArgs),
    /// Move a task to another column
    #[command(name = "move")]
    Move { id: String, status: String },
    /// Delete a task
    #[command(alias = "rm")]
    Delete { id: String },
    /// List all tasks
    List,
    /// Show the board grouped by column
    Show,
    /// Task count per column
    Stats,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub title: String,
    #[arg(short, long, default_value = "")]
    pub description: String,
    #[arg(long)]
    pub due: Option<String>,
    #[arg(short, long, default_value_t = Priority::Medium)]
    pub priority: Priority,
    /// Column id (default: board.default_status)
    #[arg(short, long)]
    pub status: Option<String>,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    pub id: String,
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub description: Option<String>,
    /// Empty string clears the due date
    #[arg(long)]
    pub due: Option<String>,
    #[arg(short, long)]
    pub priority: Option<Priority>,
    #[arg(short, long)]
    pub status: Option<String>,
}

pub fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = Config::load(cli.config.as_deref()).context("failed to load config")?;
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = Some(dir);
    }
    let data_dir = config.data_dir();
    logging::init(&data_dir, &config.log.level)?;

    let store = TaskStore::new(FileSlot::in_dir(&data_dir));
    let mut app = App::open(store, config.board.columns.clone())
        .with_context(|| format!("failed to open board in {}", data_dir.display()))?;

    match cli.cmd.unwrap_or(Commands::Tui) {
        Commands::Tui => ui::run(&mut app)?,
        Commands::Add(args) => {
            let id = cmd_add(&mut app, &config, args)?;
            println!("{id}");
        }
        Commands::Edit(args) => {
            let id = args.id.clone();
            if !cmd_edit(&mut app, &config, args)? {
                eprintln!("no task with id '{id}'");
                return Ok(ExitCode::from(1));
            }
        }
        Commands::Move { id, status } => {
            config.check_status(&status)?;
            if !app.set_status(&id, &status)? {
                eprintln!("no task with id '{id}'");
                return Ok(ExitCode::from(1));
            }
        }
        Commands::Delete { id } => {
            if !app.delete(&id)? {
                eprintln!("no task with id '{id}'");
                return Ok(ExitCode::from(1));
            }
        }
        Commands::List => print!("{}", list_text(&app)),
        Commands::Show => print!("{}", show_text(&app)),
        Commands::Stats => print!("{}", stats_text(&app)),
    }
    Ok(ExitCode::SUCCESS)
}

pub fn cmd_add<S: Slot>(app: &mut App<S>, config: &Config, args: AddArgs) -> anyhow::Result<String> {
    let status = args
        .status
        .unwrap_or_else(|| config.board.default_status.clone());
    config.check_status(&status)?;
    if args.title.trim().is_empty() {
        return Err(BoardError::EmptyTitle.into());
    }
    let id = app.create(TaskDraft {
        title: args.title,
        description: args.description,
        due_date: args.due,
        priority: args.priority,
        status,
    })?;
    Ok(id)
}

/// Returns false when no task has the id.
pub fn cmd_edit<S: Slot>(app: &mut App<S>, config: &Config, args: EditArgs) -> anyhow::Result<bool> {
    let Some(task) = app.board().get(&args.id) else {
        return Ok(false);
    };
    let mut draft = task.to_draft();
    if let Some(title) = args.title {
        if title.trim().is_empty() {
            return Err(BoardError::EmptyTitle.into());
        }
        draft.title = title;
    }
    if let Some(description) = args.description {
        draft.description = description;
    }
    if let Some(due) = args.due {
        draft.due_date = Some(due);
    }
    if let Some(priority) = args.priority {
        draft.priority = priority;
    }
    if let Some(status) = args.status {
        config.check_status(&status)?;
        draft.status = status;
    }
    app.update(&args.id, draft)?;
    Ok(true)
}

pub fn list_text<S: Slot>(app: &App<S>) -> String {
    let mut out = String::new();
    for task in app.tasks() {
        let card = Card::from_task(task);
        out.push_str(&format!(
            "{}  [{}] {} ({}, {})\n",
            card.id, task.status, card.title, card.priority, card.due
        ));
    }
    out
}

pub fn show_text<S: Slot>(app: &App<S>) -> String {
    let mut out = String::new();
    for view in app.view() {
        out.push_str(&format!("{}:\n", view.column.title));
        for card in &view.cards {
            out.push_str(&format!(
                "- [{}] {} ({}, {})\n",
                card.id, card.title, card.priority, card.due
            ));
        }
    }
    out
}

pub fn stats_text<S: Slot>(app: &App<S>) -> String {
    let mut out = String::new();
    for view in app.view() {
        out.push_str(&format!("{}: {}\n", view.column.title, view.cards.len()));
    }
    let hidden = app
        .tasks()
        .iter()
        .filter(|t| !app.columns().iter().any(|c| c.id == t.status))
        .count();
    if hidden > 0 {
        out.push_str(&format!("(not in any column): {hidden}\n"));
    }
    out
}
