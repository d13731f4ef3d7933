use crate::storage::Storage;
use crate::task::Filter;
use crate::task_list::{EditOutcome, TaskList};
use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Normal,
    Insert,
    Edit { id: i64 },
    Confirm(ConfirmAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmAction {
    ClearCompleted,
    ClearAll,
}

impl ConfirmAction {
    fn message(&self) -> &'static str {
        match self {
            ConfirmAction::ClearCompleted => "Delete all completed tasks?",
            ConfirmAction::ClearAll => "Delete all tasks? This cannot be undone.",
        }
    }
}

pub struct App {
    tasks: TaskList,
    storage: Storage,
    mode: Mode,
    input: String,
    selected: usize,
    status: Option<String>,
}

impl App {
    pub fn new(storage: Storage) -> Self {
        let tasks = TaskList::new(storage.load());
        Self {
            tasks,
            storage,
            mode: Mode::Normal,
            input: String::new(),
            selected: 0,
            status: None,
        }
    }

    pub fn persist(&self) -> Result<(), crate::storage::StorageError> {
        self.storage.save(self.tasks.tasks())
    }

    fn save(&mut self) {
        if let Err(err) = self.persist() {
            self.status = Some(format!("Failed to save tasks: {err}"));
        }
    }

    fn selected_id(&self) -> Option<i64> {
        self.tasks.filtered().get(self.selected).map(|t| t.id)
    }

    fn clamp_selection(&mut self) {
        let len = self.tasks.filtered().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    // Returns true when the app should quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.status = None;
        match self.mode.clone() {
            Mode::Normal => return self.handle_normal_key(key.code),
            Mode::Insert => self.handle_insert_key(key.code),
            Mode::Edit { id } => self.handle_edit_key(key.code, id),
            Mode::Confirm(action) => self.handle_confirm_key(key.code, action),
        }
        false
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true, // Quit
            KeyCode::Char('a') | KeyCode::Char('i') => {
                self.input.clear();
                self.mode = Mode::Insert;
            }
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_id() {
                    let text = self
                        .tasks
                        .tasks()
                        .iter()
                        .find(|t| t.id == id)
                        .map(|t| t.text.clone())
                        .unwrap_or_default();
                    self.input = text;
                    self.mode = Mode::Edit { id };
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    if self.tasks.toggle(id) {
                        self.save();
                    }
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_id() {
                    if self.tasks.remove(id) {
                        self.save();
                        self.clamp_selection();
                    }
                }
            }
            KeyCode::Char('c') => {
                if self.tasks.has_completed() {
                    self.mode = Mode::Confirm(ConfirmAction::ClearCompleted);
                } else {
                    self.status = Some("No completed tasks to clear".to_string());
                }
            }
            KeyCode::Char('C') => {
                if self.tasks.stats().total > 0 {
                    self.mode = Mode::Confirm(ConfirmAction::ClearAll);
                } else {
                    self.status = Some("No tasks to clear".to_string());
                }
            }
            KeyCode::Char('1') => self.apply_filter(Filter::All),
            KeyCode::Char('2') => self.apply_filter(Filter::Active),
            KeyCode::Char('3') => self.apply_filter(Filter::Completed),
            KeyCode::Tab => self.apply_filter(self.tasks.filter().next()),
            KeyCode::Up | KeyCode::Char('k') => {
                if self.selected > 0 {
                    self.selected -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.tasks.filtered().len() {
                    self.selected += 1;
                }
            }
            _ => {}
        }
        false
    }

    fn apply_filter(&mut self, filter: Filter) {
        self.tasks.set_filter(filter);
        self.selected = 0;
    }

    fn handle_insert_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => self.input.push(c),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => {
                if self.tasks.add(&self.input).is_some() {
                    self.input.clear();
                    self.selected = 0;
                    self.save();
                    // stay in insert mode for rapid entry
                } else {
                    self.status = Some("Please enter a task!".to_string());
                }
            }
            KeyCode::Esc => {
                self.input.clear();
                self.mode = Mode::Normal;
            }
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, code: KeyCode, id: i64) {
        match code {
            KeyCode::Char(c) => self.input.push(c),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => {
                match self.tasks.edit(id, &self.input) {
                    EditOutcome::Updated => self.save(),
                    EditOutcome::Unchanged => {}
                    EditOutcome::EmptyText => {
                        self.status =
                            Some("Task cannot be empty, keeping original text".to_string());
                    }
                }
                self.input.clear();
                self.mode = Mode::Normal;
            }
            KeyCode::Esc => {
                self.input.clear();
                self.mode = Mode::Normal;
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, code: KeyCode, action: ConfirmAction) {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                match action {
                    ConfirmAction::ClearCompleted => {
                        self.tasks.clear_completed();
                    }
                    ConfirmAction::ClearAll => {
                        self.tasks.clear_all();
                    }
                }
                self.save();
                self.clamp_selection();
                self.mode = Mode::Normal;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.mode = Mode::Normal;
            }
            _ => {}
        }
    }
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(f.area());

    draw_header(f, chunks[0]);
    draw_input(f, app, chunks[1]);
    draw_filter_tabs(f, app, chunks[2]);
    draw_task_list(f, app, chunks[3]);
    draw_footer(f, app, chunks[4]);

    if let Mode::Confirm(action) = &app.mode {
        draw_confirm_popup(f, *action);
    }
}

fn draw_header(f: &mut Frame, area: Rect) {
    let date = Local::now().format("%A, %B %e, %Y").to_string();
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "Tasks",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(date, Style::default().fg(Color::DarkGray)),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let (title, active) = match app.mode {
        Mode::Insert => ("New task", true),
        Mode::Edit { .. } => ("Edit task", true),
        _ => ("New task (press 'a')", false),
    };
    let input = Paragraph::new(app.input.as_str()).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(if active {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            }),
    );
    f.render_widget(input, area);

    if active {
        let cursor_x = area.x + 1 + app.input.chars().count() as u16;
        f.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn draw_filter_tabs(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, filter) in [Filter::All, Filter::Active, Filter::Completed]
        .iter()
        .enumerate()
    {
        let style = if app.tasks.filter() == *filter {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("[{}] {}", i + 1, filter.label()), style));
        spans.push(Span::raw("  "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_task_list(f: &mut Frame, app: &App, area: Rect) {
    let filtered = app.tasks.filtered();
    let block = Block::default().borders(Borders::ALL);

    if filtered.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from("No tasks to show"),
            Line::from(Span::styled(
                "Press 'a' to add one",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = filtered
        .iter()
        .map(|t| {
            let checkbox = if t.completed { "[x] " } else { "[ ] " };
            let text_style = if t.completed {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(vec![
                Span::raw(checkbox),
                // raw span: task text is never interpreted as markup
                Span::styled(t.text.clone(), text_style),
                Span::styled(
                    format!("  ({})", t.created_at),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let stats = app.tasks.stats();
    let stats_line = Line::from(vec![
        Span::raw(format!(" Total: {}", stats.total)),
        Span::styled(
            format!("  Completed: {}", stats.completed),
            Style::default().fg(Color::Green),
        ),
        Span::styled(
            format!("  Remaining: {}", stats.remaining),
            Style::default().fg(Color::Yellow),
        ),
    ]);
    f.render_widget(Paragraph::new(stats_line), chunks[0]);

    let bottom = if let Some(status) = &app.status {
        Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(Span::styled(
            " a: add  e: edit  space: toggle  d: delete  1/2/3: filter  c/C: clear  q: quit",
            Style::default().fg(Color::DarkGray),
        ))
    };
    f.render_widget(Paragraph::new(bottom), chunks[1]);
}

fn draw_confirm_popup(f: &mut Frame, action: ConfirmAction) {
    let area = centered_rect(50, 20, f.area());
    let popup = Paragraph::new(vec![
        Line::from(""),
        Line::from(action.message()),
        Line::from(Span::styled(
            "y: confirm   n: cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .title("Confirm")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red)),
    );
    f.render_widget(Clear, area);
    f.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
