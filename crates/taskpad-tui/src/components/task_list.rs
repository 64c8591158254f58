use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use taskpad_core::task::{Priority, Task};

pub struct TaskList {
    tasks: Vec<Task>,
    list_state: ListState,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        let mut list_state = ListState::default();
        if !tasks.is_empty() {
            list_state.select(Some(0));
        }
        Self { tasks, list_state }
    }

    /// Replace the contents after a re-fetch, keeping the cursor on the
    /// same task where possible and clamping it otherwise.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        let selected_id = self.selected_task().map(|t| t.id.clone());
        self.tasks = tasks;

        if self.tasks.is_empty() {
            self.list_state.select(None);
            return;
        }

        let idx = selected_id
            .and_then(|id| self.tasks.iter().position(|t| t.id == id))
            .or_else(|| self.list_state.selected())
            .unwrap_or(0)
            .min(self.tasks.len() - 1);
        self.list_state.select(Some(idx));
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let idx = self.list_state.selected()?;
        self.tasks.get(idx)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                let current = self.list_state.selected().unwrap_or(0);
                if current + 1 < self.tasks.len() {
                    self.list_state.select(Some(current + 1));
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                let current = self.list_state.selected().unwrap_or(0);
                if current > 0 {
                    self.list_state.select(Some(current - 1));
                }
            }
            KeyCode::Char('g') => {
                if !self.tasks.is_empty() {
                    self.list_state.select(Some(0));
                }
            }
            KeyCode::Char('G') => {
                if !self.tasks.is_empty() {
                    self.list_state.select(Some(self.tasks.len() - 1));
                }
            }
            _ => {}
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, title: &str) {
        let block = Block::default()
            .title(format!(" {title} ({}) ", self.tasks.len()))
            .borders(Borders::ALL);

        let items: Vec<ListItem> = self.tasks.iter().map(task_line).collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan).bold())
            .highlight_symbol("> ");

        let mut state = self.list_state.clone();
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn task_line(task: &Task) -> ListItem<'_> {
    let checkbox = if task.completed { "[x] " } else { "[ ] " };
    let checkbox_span = Span::styled(
        checkbox,
        if task.completed {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        },
    );
    let priority_span = Span::styled(
        format!("{:<3}", task.priority.symbol()),
        priority_color(task.priority),
    );
    let title_span = if task.completed {
        Span::styled(&task.title, Style::default().crossed_out())
    } else {
        Span::raw(&task.title)
    };

    let mut spans = vec![checkbox_span, priority_span, title_span];
    if let Some(due) = task.due_date {
        spans.push(Span::styled(
            format!("  due {}", due.format("%Y-%m-%d")),
            Style::default().fg(Color::Magenta),
        ));
    }

    ListItem::new(Line::from(spans))
}

fn priority_color(priority: Priority) -> Style {
    match priority {
        Priority::High => Style::default().fg(Color::LightRed),
        Priority::Medium => Style::default().fg(Color::Yellow),
        Priority::Low => Style::default().fg(Color::Blue),
    }
}
