use crate::app::App;
use crate::form::{Field, TaskForm};
use crate::store::Slot;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;
use tracing::error;

#[derive(Debug, Clone)]
pub enum Mode {
    Board,
    Form(TaskForm),
    ConfirmDelete(String),
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub selected_status: usize,
    pub selected_task: usize,
    pub mode: Mode,
    pub message: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            selected_status: 0,
            selected_task: 0,
            mode: Mode::Board,
            message: None,
        }
    }
}

impl UiState {
    fn selected_id<S: Slot>(&self, app: &App<S>) -> Option<String> {
        app.view()
            .get(self.selected_status)
            .and_then(|v| v.cards.get(self.selected_task))
            .map(|c| c.id.clone())
    }

    fn clamp<S: Slot>(&mut self, app: &App<S>) {
        let columns = app.view().len();
        if self.selected_status >= columns {
            self.selected_status = columns.saturating_sub(1);
        }
        let cards = app
            .view()
            .get(self.selected_status)
            .map_or(0, |v| v.cards.len());
        if self.selected_task >= cards {
            self.selected_task = cards.saturating_sub(1);
        }
    }

    /// Points the selection at `id` wherever it is rendered now.
    fn follow<S: Slot>(&mut self, app: &App<S>, id: &str) {
        for (ci, view) in app.view().iter().enumerate() {
            if let Some(ti) = view.cards.iter().position(|c| c.id == id) {
                self.selected_status = ci;
                self.selected_task = ti;
                return;
            }
        }
        self.clamp(app);
    }
}

/// Sets up the terminal, runs the board until the user quits and restores
/// the terminal even when the loop fails.
pub fn run<S: Slot>(app: &mut App<S>) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

pub fn run_app<B: Backend, S: Slot>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> anyhow::Result<()> {
    let mut state = UiState::default();
    loop {
        terminal.draw(|f| draw(f, app, &state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !handle_key(&mut state, app, key) {
                return Ok(());
            }
        }
    }
}

/// Returns false when the user asked to quit. Storage failures are shown
/// in the status line.
pub fn handle_key<S: Slot>(state: &mut UiState, app: &mut App<S>, key: KeyEvent) -> bool {
    let mode = std::mem::replace(&mut state.mode, Mode::Board);
    let outcome = match mode {
        Mode::Board => board_key(state, app, key),
        Mode::Form(form) => form_key(state, app, form, key),
        Mode::ConfirmDelete(id) => confirm_key(state, app, id, key),
    };
    match outcome {
        Ok(keep_running) => keep_running,
        Err(err) => {
            error!(error = %err, "board operation failed");
            state.message = Some(err.to_string());
            true
        }
    }
}

fn board_key<S: Slot>(state: &mut UiState, app: &mut App<S>, key: KeyEvent) -> anyhow::Result<bool> {
    state.message = None;
    let columns = app.view().len();
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Ok(false),
        KeyCode::Char('a') => {
            state.mode = Mode::Form(TaskForm::new_task(state.selected_status));
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(task) = state.selected_id(app).and_then(|id| app.board().get(&id)) {
                state.mode = Mode::Form(TaskForm::edit(task, app.columns()));
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(id) = state.selected_id(app) {
                state.mode = Mode::ConfirmDelete(id);
            }
        }
        KeyCode::Char('<') | KeyCode::Char('H') => move_selected(state, app, false)?,
        KeyCode::Left if key.modifiers.contains(KeyModifiers::SHIFT) => {
            move_selected(state, app, false)?
        }
        KeyCode::Char('>') | KeyCode::Char('L') => move_selected(state, app, true)?,
        KeyCode::Right if key.modifiers.contains(KeyModifiers::SHIFT) => {
            move_selected(state, app, true)?
        }
        KeyCode::Left | KeyCode::Char('h') => {
            if state.selected_status > 0 {
                state.selected_status -= 1;
                state.selected_task = 0;
            }
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if state.selected_status + 1 < columns {
                state.selected_status += 1;
                state.selected_task = 0;
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if state.selected_task > 0 {
                state.selected_task -= 1;
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            state.selected_task += 1;
        }
        _ => {}
    }
    state.clamp(app);
    Ok(true)
}

/// Keyboard stand-in for dragging a card onto the neighbouring column.
fn move_selected<S: Slot>(state: &mut UiState, app: &mut App<S>, forward: bool) -> anyhow::Result<()> {
    let Some(id) = state.selected_id(app) else {
        return Ok(());
    };
    let target = if forward {
        state.selected_status + 1
    } else {
        match state.selected_status.checked_sub(1) {
            Some(i) => i,
            None => return Ok(()),
        }
    };
    let Some(status) = app.columns().get(target).map(|c| c.id.clone()) else {
        return Ok(());
    };
    app.set_status(&id, &status)?;
    state.follow(app, &id);
    Ok(())
}

fn form_key<S: Slot>(
    state: &mut UiState,
    app: &mut App<S>,
    mut form: TaskForm,
    key: KeyEvent,
) -> anyhow::Result<bool> {
    let column_count = app.columns().len();
    match key.code {
        KeyCode::Esc => return Ok(true),
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Left => form.cycle(false, column_count),
        KeyCode::Right => form.cycle(true, column_count),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Char(c) => form.push_char(c),
        KeyCode::Enter => match form.to_draft(app.columns()) {
            Ok(draft) => {
                let saved = match &form.editing {
                    Some(id) => app.update(id, draft).map(|_| id.clone()),
                    None => app.create(draft),
                };
                match saved {
                    Ok(id) => {
                        state.follow(app, &id);
                        return Ok(true);
                    }
                    Err(err) => {
                        error!(error = %err, "saving task failed");
                        form.error = Some(err.to_string());
                    }
                }
            }
            Err(err) => form.error = Some(err.to_string()),
        },
        _ => {}
    }
    state.mode = Mode::Form(form);
    Ok(true)
}

fn confirm_key<S: Slot>(
    state: &mut UiState,
    app: &mut App<S>,
    id: String,
    key: KeyEvent,
) -> anyhow::Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.delete(&id)?;
            state.clamp(app);
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {}
        _ => state.mode = Mode::ConfirmDelete(id),
    }
    Ok(true)
}

fn priority_color(priority: &str) -> Color {
    match priority {
        "high" => Color::Red,
        "medium" => Color::Yellow,
        _ => Color::Green,
    }
}

pub fn draw<S: Slot>(f: &mut Frame, app: &App<S>, state: &UiState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let n = app.view().len().max(1) as u32;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(app.view().iter().map(|_| Constraint::Ratio(1, n)))
        .split(rows[0]);

    for (i, view) in app.view().iter().enumerate() {
        let items: Vec<ListItem> = view
            .cards
            .iter()
            .map(|c| {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        c.title.clone(),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::raw(c.description.clone())),
                    Line::from(vec![
                        Span::styled(
                            format!("[{}] ", c.priority),
                            Style::default().fg(priority_color(&c.priority)),
                        ),
                        Span::raw(c.due.clone()),
                    ]),
                    Line::from(""),
                ])
            })
            .collect();

        let selected = state.selected_status == i;
        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!("{} ({})", view.column.title, view.cards.len()))
                    .borders(Borders::ALL)
                    .border_style(if selected {
                        Style::default().fg(Color::Cyan)
                    } else {
                        Style::default()
                    }),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut list_state = ListState::default();
        if selected && !view.cards.is_empty() {
            list_state.select(Some(state.selected_task));
        }
        f.render_stateful_widget(list, chunks[i], &mut list_state);
    }

    let status = match &state.message {
        Some(msg) => Line::from(Span::styled(msg.clone(), Style::default().fg(Color::Red))),
        None => Line::from(
            "a add  e edit  d delete  < > move  arrows select  q quit",
        ),
    };
    f.render_widget(Paragraph::new(status), rows[1]);

    match &state.mode {
        Mode::Board => {}
        Mode::Form(form) => draw_form(f, app, form),
        Mode::ConfirmDelete(id) => {
            let title = app.board().get(id).map_or("", |t| t.title.as_str());
            let area = centered(f.area(), 50, 5);
            f.render_widget(Clear, area);
            f.render_widget(
                Paragraph::new(vec![
                    Line::from(format!("Delete \"{title}\"?")),
                    Line::from("y / n"),
                ])
                .block(Block::default().title("Delete task").borders(Borders::ALL)),
                area,
            );
        }
    }
}

fn draw_form<S: Slot>(f: &mut Frame, app: &App<S>, form: &TaskForm) {
    let area = centered(f.area(), 60, Field::ALL.len() as u16 + 5);
    let mut lines: Vec<Line> = Field::ALL
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = form.focus == i;
            let style = if focused {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut value = form.value(*field, app.columns());
            if focused && matches!(field, Field::Priority | Field::Status) {
                value = format!("< {value} >");
            } else if focused {
                value.push('_');
            }
            Line::from(vec![
                Span::styled(format!("{:<22}", field.label()), style),
                Span::raw(value),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(match &form.error {
        Some(err) => Line::from(Span::styled(err.clone(), Style::default().fg(Color::Red))),
        None => Line::from("Enter save  Tab next  Esc cancel"),
    });
    let title = if form.editing.is_some() {
        "Edit Task"
    } else {
        "Add New Task"
    };
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL)),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Column;
    use crate::store::{test_support::FailingSlot, MemorySlot, TaskStore};
    use crate::task::TaskDraft;
    use ratatui::backend::TestBackend;

    fn app() -> App<MemorySlot> {
        let mut app = App::open(TaskStore::new(MemorySlot::new()), Column::defaults()).unwrap();
        for (title, status) in [("Write spec", "todo"), ("Review", "todo"), ("Ship", "done")] {
            app.create(TaskDraft {
                title: title.to_string(),
                status: status.to_string(),
                ..TaskDraft::default()
            })
            .unwrap();
        }
        app
    }

    fn press(state: &mut UiState, app: &mut App<MemorySlot>, code: KeyCode) -> bool {
        handle_key(state, app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(state: &mut UiState, app: &mut App<MemorySlot>, text: &str) {
        for c in text.chars() {
            press(state, app, KeyCode::Char(c));
        }
    }

    #[test]
    fn quit_keys() {
        let mut app = app();
        let mut state = UiState::default();
        assert!(!press(&mut state, &mut app, KeyCode::Char('q')));
    }

    #[test]
    fn add_through_form() {
        let mut app = app();
        let mut state = UiState::default();
        press(&mut state, &mut app, KeyCode::Right);
        press(&mut state, &mut app, KeyCode::Char('a'));
        type_text(&mut state, &mut app, "New one");
        press(&mut state, &mut app, KeyCode::Enter);
        assert!(matches!(state.mode, Mode::Board));
        assert_eq!(app.tasks().len(), 4);
        let created = app.tasks().last().unwrap();
        assert_eq!(created.title, "New one");
        assert_eq!(created.status, "in-progress");
        assert_eq!(state.selected_status, 1);
    }

    #[test]
    fn empty_title_keeps_form_open() {
        let mut app = app();
        let mut state = UiState::default();
        press(&mut state, &mut app, KeyCode::Char('a'));
        press(&mut state, &mut app, KeyCode::Enter);
        match &state.mode {
            Mode::Form(form) => assert!(form.error.is_some()),
            other => panic!("form closed: {other:?}"),
        }
        assert_eq!(app.tasks().len(), 3);
    }

    #[test]
    fn failed_save_keeps_form_and_input() {
        let mut app = App::open(TaskStore::new(FailingSlot), Column::defaults()).unwrap();
        let mut state = UiState::default();
        handle_key(&mut state, &mut app, KeyEvent::new(KeyCode::Char('a'), KeyModifiers::NONE));
        for c in "Half typed".chars() {
            handle_key(&mut state, &mut app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
        handle_key(&mut state, &mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        match &state.mode {
            Mode::Form(form) => {
                assert_eq!(form.title, "Half typed");
                assert!(form.error.as_deref().is_some_and(|e| e.contains("read-only")));
            }
            other => panic!("form closed: {other:?}"),
        }
        assert!(app.tasks().is_empty());
    }

    #[test]
    fn edit_replaces_title() {
        let mut app = app();
        let mut state = UiState::default();
        press(&mut state, &mut app, KeyCode::Down);
        press(&mut state, &mut app, KeyCode::Char('e'));
        for _ in 0.."Review".len() {
            press(&mut state, &mut app, KeyCode::Backspace);
        }
        type_text(&mut state, &mut app, "Reviewed");
        press(&mut state, &mut app, KeyCode::Enter);
        assert_eq!(app.tasks()[1].title, "Reviewed");
        assert_eq!(app.tasks().len(), 3);
    }

    #[test]
    fn move_follows_the_card() {
        let mut app = app();
        let mut state = UiState::default();
        let id = app.tasks()[0].id.clone();
        press(&mut state, &mut app, KeyCode::Char('>'));
        assert_eq!(app.board().get(&id).unwrap().status, "in-progress");
        assert_eq!((state.selected_status, state.selected_task), (1, 0));
        press(&mut state, &mut app, KeyCode::Char('<'));
        press(&mut state, &mut app, KeyCode::Char('<'));
        assert_eq!(app.board().get(&id).unwrap().status, "todo");
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut app = app();
        let mut state = UiState::default();
        press(&mut state, &mut app, KeyCode::Char('d'));
        press(&mut state, &mut app, KeyCode::Char('n'));
        assert_eq!(app.tasks().len(), 3);
        press(&mut state, &mut app, KeyCode::Char('d'));
        press(&mut state, &mut app, KeyCode::Char('y'));
        assert_eq!(app.tasks().len(), 2);
        assert!(app.tasks().iter().all(|t| t.title != "Write spec"));
    }

    #[test]
    fn draws_columns_and_cards() {
        let app = app();
        let state = UiState::default();
        let mut terminal = Terminal::new(TestBackend::new(90, 20)).unwrap();
        terminal.draw(|f| draw(f, &app, &state)).unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(screen.contains("To Do (2)"));
        assert!(screen.contains("Done (1)"));
        assert!(screen.contains("Write spec"));
        assert!(screen.contains("No due date"));
    }
}
