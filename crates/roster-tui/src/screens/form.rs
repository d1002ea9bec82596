//! Add / edit form screen.
//!
//! In edit mode the student code is shown but never editable, and the
//! draft is prefilled from the service before input is accepted. After a
//! successful save the screen returns to the list once the notice expires.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;
use tui_input::Input;

use roster_core::{FormMode, FormViewModel, Route, StudentApi};

use crate::action::{Action, Payload};
use crate::component::Component;
use crate::theme;
use crate::widgets::{self, text_field};

use super::Requests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Code,
    Name,
    Active,
}

pub struct FormScreen<A> {
    vm: FormViewModel<A>,
    requests: Requests,
    code: Input,
    name: Input,
    focus: Field,
    throbber: ThrobberState,
}

impl<A: StudentApi + Clone + 'static> FormScreen<A> {
    pub fn new(api: A, mode: FormMode, generation: u64) -> Self {
        let focus = if mode.is_add() { Field::Code } else { Field::Name };
        Self {
            vm: FormViewModel::new(api, mode),
            requests: Requests::new(generation),
            code: Input::default(),
            name: Input::default(),
            focus,
            throbber: ThrobberState::default(),
        }
    }

    /// Focusable fields in tab order. The code is read-only when editing.
    fn fields(&self) -> &'static [Field] {
        if self.vm.mode().is_add() {
            &[Field::Code, Field::Name, Field::Active]
        } else {
            &[Field::Name, Field::Active]
        }
    }

    fn cycle_focus(&mut self, forward: bool) {
        let fields = self.fields();
        let idx = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (idx + 1) % fields.len()
        } else {
            (idx + fields.len() - 1) % fields.len()
        };
        self.focus = fields[next];
    }

    fn sync_inputs(&mut self) {
        let draft = self.vm.draft();
        self.code = Input::new(draft.student_code.clone());
        self.name = Input::new(draft.name.clone());
    }

    // ── Requests ─────────────────────────────────────────────────────

    fn prefill(&mut self) {
        let Some(id) = self.vm.begin_prefill() else {
            return;
        };
        let api = self.vm.api().clone();
        self.requests.spawn(async move {
            let result = api.get(&id).await;
            Payload::Prefill(id, result)
        });
    }

    fn submit(&mut self) {
        if self.vm.is_fetching() || !self.vm.submit_enabled() {
            return;
        }
        // Validation failures are already on screen.
        let Ok(submission) = self.vm.prepare_submit() else {
            return;
        };
        let api = self.vm.api().clone();
        self.requests
            .spawn(async move { Payload::Submitted(submission.send(&api).await) });
    }

    fn edit_focused(&mut self, key: KeyEvent) {
        match self.focus {
            Field::Code => {
                if text_field::edit(&mut self.code, key) {
                    self.vm.set_student_code(self.code.value());
                }
            }
            Field::Name => {
                if text_field::edit(&mut self.name, key) {
                    self.vm.set_name(self.name.value());
                }
            }
            Field::Active => {}
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn submit_label(&self) -> &'static str {
        if self.vm.mode().is_add() {
            "Create Student"
        } else {
            "Update Student"
        }
    }

    fn render_fields(&self, frame: &mut Frame, rows: &[Rect]) {
        let editing = !self.vm.mode().is_add();

        if editing {
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(format!(" {:<14}", "Student Code"), theme::key_hint()),
                    Span::styled(
                        self.vm.draft().student_code.clone(),
                        Style::default().fg(theme::DIM_WHITE),
                    ),
                    Span::styled("  (cannot be changed)", theme::key_hint()),
                ])),
                rows[0],
            );
        } else {
            text_field::render(
                frame,
                rows[0],
                "Student Code",
                &self.code,
                self.focus == Field::Code,
                "Enter student code",
            );
        }

        text_field::render(
            frame,
            rows[1],
            "Name",
            &self.name,
            self.focus == Field::Name,
            "Enter student name",
        );

        let active = self.vm.draft().is_active;
        let label_style = if self.focus == Field::Active {
            theme::title_style()
        } else {
            theme::key_hint()
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!(" {:<14}", "Active Status"), label_style),
                Span::styled(
                    if active { "[x] " } else { "[ ] " },
                    theme::status(active),
                ),
                Span::styled(
                    if active { "Active" } else { "Inactive" },
                    theme::status(active),
                ),
            ])),
            rows[2],
        );
    }
}

impl<A: StudentApi + Clone + 'static> Component for FormScreen<A> {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.requests.attach(action_tx);
        self.prefill();
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Esc => return Ok(Some(Action::Navigate(Route::List))),
            KeyCode::Tab | KeyCode::Down => self.cycle_focus(true),
            KeyCode::BackTab | KeyCode::Up => self.cycle_focus(false),
            KeyCode::Enter => self.submit(),
            _ if self.vm.is_fetching() || self.vm.redirect_pending() => {}
            KeyCode::Char(' ') if self.focus == Field::Active => self.vm.toggle_active(),
            _ => self.edit_focused(key),
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => {
                self.vm.tick();
                if self.vm.is_loading() {
                    self.throbber.calc_next();
                }
                if let Some(route) = self.vm.due_redirect() {
                    return Ok(Some(Action::Navigate(route)));
                }
            }
            Action::Loaded { payload, .. } => match payload {
                Payload::Prefill(id, result) => {
                    self.vm.complete_prefill(id, result.clone());
                    self.sync_inputs();
                }
                Payload::Submitted(result) => self.vm.complete_submit(result),
                _ => {}
            },
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" {} ", self.vm.mode().title()))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Length(1), // spacer
            Constraint::Length(1), // code
            Constraint::Length(1), // name
            Constraint::Length(1), // active
            Constraint::Length(1), // spacer
            Constraint::Length(1), // submit
            Constraint::Length(2), // notices
            Constraint::Min(0),
            Constraint::Length(1), // hints
        ])
        .split(inner);

        self.render_fields(frame, &layout[1..4]);

        if self.vm.is_fetching() {
            widgets::throbber(frame, layout[5], "Loading student...", &self.throbber);
        } else if self.vm.is_loading() {
            widgets::throbber(frame, layout[5], "Saving...", &self.throbber);
        } else {
            let style = if self.vm.submit_enabled() {
                theme::key_hint_key()
            } else {
                theme::key_hint()
            };
            frame.render_widget(
                Paragraph::new(Span::styled(format!(" [ {} ]", self.submit_label()), style)),
                layout[5],
            );
        }

        frame.render_widget(
            Paragraph::new(widgets::banners(self.vm.error(), self.vm.success())),
            layout[6],
        );

        frame.render_widget(
            Paragraph::new(widgets::key_hints(&[
                ("Tab", "next field"),
                ("Space", "toggle active"),
                ("Enter", "save"),
                ("Esc", "cancel"),
            ])),
            layout[8],
        );
    }

    fn captures_input(&self) -> bool {
        true
    }

    fn title(&self) -> &str {
        self.vm.mode().title()
    }
}
