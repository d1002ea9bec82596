//! Student detail screen: read-only view of one student.

use chrono::{DateTime, Utc};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;

use roster_core::{DetailState, DetailViewModel, Route, Student, StudentApi, StudentId};

use crate::action::{Action, Payload};
use crate::component::Component;
use crate::theme;
use crate::widgets;

use super::Requests;

pub struct DetailScreen<A> {
    vm: DetailViewModel<A>,
    requests: Requests,
    throbber: ThrobberState,
}

impl<A: StudentApi + Clone + 'static> DetailScreen<A> {
    pub fn new(api: A, id: StudentId, generation: u64) -> Self {
        Self {
            vm: DetailViewModel::new(api, id),
            requests: Requests::new(generation),
            throbber: ThrobberState::default(),
        }
    }

    fn load(&mut self) {
        let id = self.vm.begin_load();
        let api = self.vm.api().clone();
        self.requests.spawn(async move {
            let result = api.get(&id).await;
            Payload::Detail(id, result)
        });
    }

    fn field(label: &str, value: Span<'static>) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("  {label:<14}"), theme::key_hint()),
            value,
        ])
    }

    fn timestamp(ts: Option<&DateTime<Utc>>) -> String {
        ts.map_or_else(
            || "─".into(),
            |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        )
    }

    fn student_lines(student: &Student) -> Vec<Line<'static>> {
        let plain = |s: String| Span::styled(s, Style::default().fg(theme::DIM_WHITE));
        vec![
            Line::from(""),
            Self::field("Student Code", plain(student.student_code.clone())),
            Self::field("Name", plain(student.name.clone())),
            Self::field(
                "Status",
                Span::styled(student.status_label(), theme::status(student.is_active)),
            ),
            Line::from(""),
            Self::field("Created", plain(Self::timestamp(student.created_at.as_ref()))),
            Self::field("Updated", plain(Self::timestamp(student.updated_at.as_ref()))),
            Self::field("ID", Span::styled(student.id.to_string(), theme::key_hint())),
        ]
    }
}

impl<A: StudentApi + Clone + 'static> Component for DetailScreen<A> {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.requests.attach(action_tx);
        self.load();
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        Ok(match key.code {
            KeyCode::Char('e') => Some(Action::Navigate(Route::Edit(self.vm.id().clone()))),
            KeyCode::Char('b') | KeyCode::Esc | KeyCode::Backspace => {
                Some(Action::Navigate(Route::List))
            }
            KeyCode::Char('r') if !self.vm.is_loading() => {
                self.load();
                None
            }
            _ => None,
        })
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => {
                if self.vm.is_loading() {
                    self.throbber.calc_next();
                }
            }
            Action::Loaded {
                payload: Payload::Detail(id, result),
                ..
            } => self.vm.complete_load(id, result.clone()),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Student Details ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        match self.vm.render_state() {
            DetailState::Loading => {
                widgets::throbber(frame, layout[0], "Loading student...", &self.throbber);
            }
            DetailState::Error(message) => {
                frame.render_widget(Paragraph::new(widgets::banners(Some(message), None)), layout[0]);
            }
            DetailState::NotFound => {
                frame.render_widget(
                    Paragraph::new(Span::styled("  Student not found", theme::key_hint())),
                    layout[0],
                );
            }
            DetailState::Present(student) => {
                frame.render_widget(Paragraph::new(Self::student_lines(student)), layout[0]);
            }
        }

        frame.render_widget(
            Paragraph::new(widgets::key_hints(&[
                ("e", "edit"),
                ("r", "reload"),
                ("Esc", "back to list"),
            ])),
            layout[1],
        );
    }

    fn title(&self) -> &str {
        "Student"
    }
}
