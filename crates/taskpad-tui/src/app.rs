use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use taskpad_core::task::{CreateTask, Priority, SortKey, Task, TaskFilter, UpdateTask};
use taskpad_service::BlockingHttpService;

use crate::components::task_list::TaskList;

/// What the app is currently doing
#[derive(Debug, Clone)]
pub enum Mode {
    /// Normal list navigation
    Normal,
    /// Typing a new task title
    NewTask { input: String },
    /// Editing a task's title
    EditTitle { task_id: String, input: String },
    /// Confirm delete task
    ConfirmDelete { task: Task },
}

pub struct App {
    service: BlockingHttpService,
    list: TaskList,
    /// Completion filter: None shows everything.
    filter: Option<bool>,
    sort: SortKey,
    mode: Mode,
    status_message: Option<String>,
    /// Persistent banner shown while the last list fetch failed.
    fetch_error: Option<String>,
}

impl App {
    pub fn new(service: BlockingHttpService) -> Self {
        let mut app = Self {
            service,
            list: TaskList::new(Vec::new()),
            filter: None,
            sort: SortKey::default(),
            mode: Mode::Normal,
            status_message: None,
            fetch_error: None,
        };
        app.refresh();
        app
    }

    /// Re-fetch the full list with the current filter and sort. Every
    /// mutation goes through here afterwards; there is no local cache.
    fn refresh(&mut self) {
        let filter = TaskFilter {
            completed: self.filter,
            sort: self.sort,
        };
        match self.service.list_tasks(&filter) {
            Ok(tasks) => {
                self.list.set_tasks(tasks);
                self.fetch_error = None;
            }
            Err(e) => self.fetch_error = Some(format!("Failed to load tasks: {e}")),
        }
    }

    pub fn is_input_mode(&self) -> bool {
        matches!(self.mode, Mode::NewTask { .. } | Mode::EditTitle { .. })
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status_message = None;

        match self.mode.clone() {
            Mode::Normal => self.handle_normal_key(key),
            Mode::NewTask { mut input } => match key.code {
                KeyCode::Esc => self.mode = Mode::Normal,
                KeyCode::Enter => {
                    self.mode = Mode::Normal;
                    self.create_task(input.trim());
                }
                KeyCode::Backspace => {
                    input.pop();
                    self.mode = Mode::NewTask { input };
                }
                KeyCode::Char(c) => {
                    input.push(c);
                    self.mode = Mode::NewTask { input };
                }
                _ => {}
            },
            Mode::EditTitle { task_id, mut input } => match key.code {
                KeyCode::Esc => self.mode = Mode::Normal,
                KeyCode::Enter => {
                    self.mode = Mode::Normal;
                    let update = UpdateTask {
                        title: Some(input.trim().to_string()),
                        ..Default::default()
                    };
                    self.apply_update(&task_id, &update, "Title updated");
                }
                KeyCode::Backspace => {
                    input.pop();
                    self.mode = Mode::EditTitle { task_id, input };
                }
                KeyCode::Char(c) => {
                    input.push(c);
                    self.mode = Mode::EditTitle { task_id, input };
                }
                _ => {}
            },
            Mode::ConfirmDelete { task } => match key.code {
                KeyCode::Char('y') => {
                    self.mode = Mode::Normal;
                    match self.service.delete_task(&task.id) {
                        Ok(()) => {
                            self.refresh();
                            self.status_message = Some(format!("Deleted: {}", task.title));
                        }
                        Err(e) => self.status_message = Some(format!("Error: {e}")),
                    }
                }
                KeyCode::Char('n') | KeyCode::Esc => self.mode = Mode::Normal,
                _ => {}
            },
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('f') => {
                self.filter = match self.filter {
                    None => Some(false),
                    Some(false) => Some(true),
                    Some(true) => None,
                };
                self.refresh();
            }
            KeyCode::Char('s') => {
                self.sort = match self.sort {
                    SortKey::CreatedAt => SortKey::Priority,
                    SortKey::Priority => SortKey::DueDate,
                    SortKey::DueDate => SortKey::CreatedAt,
                };
                self.refresh();
            }
            KeyCode::Char('n') => {
                self.mode = Mode::NewTask {
                    input: String::new(),
                };
            }
            KeyCode::Char('e') => {
                if let Some(task) = self.list.selected_task() {
                    self.mode = Mode::EditTitle {
                        task_id: task.id.clone(),
                        input: task.title.clone(),
                    };
                }
            }
            KeyCode::Char('p') => {
                if let Some(task) = self.list.selected_task() {
                    let next = match task.priority {
                        Priority::Low => Priority::Medium,
                        Priority::Medium => Priority::High,
                        Priority::High => Priority::Low,
                    };
                    let id = task.id.clone();
                    let update = UpdateTask {
                        priority: Some(next),
                        ..Default::default()
                    };
                    self.apply_update(&id, &update, &format!("Priority: {next}"));
                }
            }
            KeyCode::Char(' ') => {
                if let Some(task) = self.list.selected_task() {
                    let id = task.id.clone();
                    let update = UpdateTask {
                        completed: Some(!task.completed),
                        ..Default::default()
                    };
                    self.apply_update(&id, &update, "");
                }
            }
            KeyCode::Char('d') => {
                if let Some(task) = self.list.selected_task() {
                    self.mode = Mode::ConfirmDelete { task: task.clone() };
                }
            }
            KeyCode::Char('r') => self.refresh(),
            _ => self.list.handle_key(key),
        }
    }

    fn create_task(&mut self, title: &str) {
        if title.is_empty() {
            return;
        }
        let input = CreateTask {
            title: title.to_string(),
            description: None,
            priority: Priority::default(),
            due_date: None,
        };
        match self.service.create_task(&input) {
            Ok(_) => {
                self.refresh();
                self.status_message = Some("Task created".into());
            }
            Err(e) => self.status_message = Some(format!("Error: {e}")),
        }
    }

    fn apply_update(&mut self, id: &str, update: &UpdateTask, message: &str) {
        match self.service.update_task(id, update) {
            Ok(_) => {
                self.refresh();
                if !message.is_empty() {
                    self.status_message = Some(message.to_string());
                }
            }
            Err(e) => self.status_message = Some(format!("Error: {e}")),
        }
    }

    fn filter_label(&self) -> &'static str {
        match self.filter {
            None => "All",
            Some(false) => "Pending",
            Some(true) => "Completed",
        }
    }

    fn sort_label(&self) -> &'static str {
        match self.sort {
            SortKey::CreatedAt => "newest",
            SortKey::Priority => "priority",
            SortKey::DueDate => "due date",
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let header = Line::from(vec![
            Span::styled("taskpad", Style::default().bold()),
            Span::raw(format!(
                "  filter: {}  sort: {}",
                self.filter_label(),
                self.sort_label()
            )),
        ]);
        frame.render_widget(Paragraph::new(header), chunks[0]);

        self.list.render(frame, chunks[1], self.filter_label());

        self.render_bottom_line(frame, chunks[2]);

        match &self.mode {
            Mode::NewTask { input } => self.render_input(frame, "New task", input),
            Mode::EditTitle { input, .. } => self.render_input(frame, "Edit title", input),
            Mode::ConfirmDelete { task } => {
                let text = format!("Delete \"{}\"? (y/n)", task.title);
                self.render_popup(frame, "Confirm", &text);
            }
            Mode::Normal => {}
        }
    }

    fn render_bottom_line(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(ref err) = self.fetch_error {
            Line::styled(err.as_str(), Style::default().fg(Color::Red).bold())
        } else if let Some(ref msg) = self.status_message {
            Line::styled(msg.as_str(), Style::default().fg(Color::Yellow))
        } else {
            Line::styled(
                "n new  e edit  p priority  space done  d delete  f filter  s sort  q quit",
                Style::default().fg(Color::DarkGray),
            )
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_input(&self, frame: &mut Frame, title: &str, input: &str) {
        self.render_popup(frame, title, &format!("{input}_"));
    }

    fn render_popup(&self, frame: &mut Frame, title: &str, text: &str) {
        let area = centered_rect(frame.area(), 60, 3);
        let block = Block::default()
            .title(format!(" {title} "))
            .borders(Borders::ALL);
        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(text).block(block), area);
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
