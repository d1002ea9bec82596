//! Student list screen: searchable, sortable table with inline status
//! toggle and confirmed delete.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};
use throbber_widgets_tui::ThrobberState;
use tokio::sync::mpsc::UnboundedSender;
use tui_input::Input;

use roster_core::{
    DELETE_CONFIRMATION, ListViewModel, Route, SortDirection, SortField, Student, StudentApi,
    StudentId, StudentPatch,
};

use crate::action::{Action, Payload};
use crate::component::Component;
use crate::theme;
use crate::widgets::{self, text_field};

use super::Requests;

pub struct ListScreen<A> {
    vm: ListViewModel<A>,
    requests: Requests,
    table_state: TableState,
    search: Input,
    searching: bool,
    pending_delete: Option<StudentId>,
    /// A delete or status flip has been sent and its result not yet seen.
    mutating: bool,
    throbber: ThrobberState,
}

impl<A: StudentApi + Clone + 'static> ListScreen<A> {
    pub fn new(api: A, generation: u64) -> Self {
        Self {
            vm: ListViewModel::new(api),
            requests: Requests::new(generation),
            table_state: TableState::default().with_selected(Some(0)),
            search: Input::default(),
            searching: false,
            pending_delete: None,
            mutating: false,
            throbber: ThrobberState::default(),
        }
    }

    // ── Requests ─────────────────────────────────────────────────────

    /// At most one request from this screen is outstanding at a time.
    fn busy(&self) -> bool {
        self.vm.is_loading() || self.mutating
    }

    fn refresh(&mut self) {
        if self.busy() {
            return;
        }
        self.vm.begin_refresh();
        let api = self.vm.api().clone();
        self.requests
            .spawn(async move { Payload::List(api.list().await) });
    }

    fn delete(&mut self, id: StudentId) {
        if self.busy() {
            return;
        }
        self.mutating = true;
        let api = self.vm.api().clone();
        self.requests
            .spawn(async move { Payload::Deleted(api.remove(&id).await) });
    }

    fn toggle(&mut self) {
        if self.busy() {
            return;
        }
        let Some(student) = self.selected() else {
            return;
        };
        let id = student.id.clone();
        let patch = StudentPatch::toggled(student);
        let api = self.vm.api().clone();
        self.mutating = true;
        self.requests.spawn(async move {
            let result = api.update(&id, &patch).await;
            Payload::Toggled {
                now_active: patch.is_active,
                result,
            }
        });
    }

    // ── Selection ────────────────────────────────────────────────────

    fn selected(&self) -> Option<&Student> {
        let idx = self.table_state.selected().unwrap_or(0);
        self.vm.derived_rows().get(idx).copied()
    }

    fn selected_id(&self) -> Option<StudentId> {
        self.selected().map(|s| s.id.clone())
    }

    fn clamp_selection(&mut self) {
        let len = self.vm.derived_rows().len();
        let idx = self.table_state.selected().unwrap_or(0);
        self.table_state
            .select(Some(idx.min(len.saturating_sub(1))));
    }

    fn move_selection(&mut self, down: bool) {
        let len = self.vm.derived_rows().len();
        if len == 0 {
            return;
        }
        let idx = self.table_state.selected().unwrap_or(0);
        let next = if down {
            (idx + 1).min(len - 1)
        } else {
            idx.saturating_sub(1)
        };
        self.table_state.select(Some(next));
    }

    fn set_search(&mut self, term: String) {
        self.vm.set_search_term(term);
        self.table_state.select(Some(0));
    }

    // ── Keys ─────────────────────────────────────────────────────────

    fn handle_confirm_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('y' | 'Y') => {
                if let Some(id) = self.pending_delete.take() {
                    self.delete(id);
                }
            }
            KeyCode::Char('n' | 'N') | KeyCode::Esc => self.pending_delete = None,
            _ => {}
        }
        None
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.search.reset();
                self.searching = false;
                self.set_search(String::new());
            }
            KeyCode::Enter => self.searching = false,
            KeyCode::Down => self.move_selection(true),
            KeyCode::Up => self.move_selection(false),
            _ => {
                if text_field::edit(&mut self.search, key) {
                    self.set_search(self.search.value().to_owned());
                }
            }
        }
        None
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn header_label(&self, field: SortField, label: &str) -> String {
        if self.vm.sort_field() != field {
            return label.to_owned();
        }
        let arrow = match self.vm.sort_direction() {
            SortDirection::Asc => '↑',
            SortDirection::Desc => '↓',
        };
        format!("{label} {arrow}")
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        let rows = self.vm.derived_rows();

        if rows.is_empty() {
            if self.vm.is_loading() {
                widgets::throbber(frame, area, "Loading students...", &self.throbber);
            } else {
                frame.render_widget(
                    Paragraph::new(Span::styled("  No students available", theme::key_hint())),
                    area,
                );
            }
            return;
        }

        let header = Row::new(vec![
            Cell::from(self.header_label(SortField::StudentCode, "Student Code")),
            Cell::from(self.header_label(SortField::Name, "Name")),
            Cell::from("Status"),
        ])
        .style(theme::table_header());

        let body: Vec<Row> = rows
            .iter()
            .map(|s| {
                Row::new(vec![
                    Cell::from(s.student_code.clone()),
                    Cell::from(s.name.clone()),
                    Cell::from(Span::styled(s.status_label(), theme::status(s.is_active))),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            body,
            [
                Constraint::Length(16),
                Constraint::Min(20),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected())
        .highlight_symbol("▸ ");

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }
}

impl<A: StudentApi + Clone + 'static> Component for ListScreen<A> {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.requests.attach(action_tx);
        self.refresh();
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.pending_delete.is_some() {
            return Ok(self.handle_confirm_key(key));
        }
        if self.searching {
            return Ok(self.handle_search_key(key));
        }

        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(true);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(false);
                None
            }
            KeyCode::Char('/') => {
                self.searching = true;
                None
            }
            KeyCode::Char('c') => {
                self.vm.toggle_sort(SortField::StudentCode);
                None
            }
            KeyCode::Char('n') => {
                self.vm.toggle_sort(SortField::Name);
                None
            }
            KeyCode::Char(' ') => {
                self.toggle();
                None
            }
            KeyCode::Char('d') => {
                if !self.busy() {
                    self.pending_delete = self.selected_id();
                }
                None
            }
            KeyCode::Char('r') => {
                self.refresh();
                None
            }
            KeyCode::Char('a') => Some(Action::Navigate(Route::Add)),
            KeyCode::Char('e') => self.selected_id().map(|id| Action::Navigate(Route::Edit(id))),
            KeyCode::Enter => self
                .selected_id()
                .map(|id| Action::Navigate(Route::Detail(id))),
            KeyCode::Esc if !self.vm.search_term().is_empty() => {
                self.search.reset();
                self.set_search(String::new());
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => {
                self.vm.tick();
                if self.vm.is_loading() {
                    self.throbber.calc_next();
                }
            }
            Action::Loaded { payload, .. } => match payload {
                Payload::List(result) => {
                    self.vm.complete_refresh(result.clone());
                    self.clamp_selection();
                }
                Payload::Deleted(result) => {
                    self.mutating = false;
                    if self.vm.complete_delete(result.clone()) {
                        self.refresh();
                    }
                }
                Payload::Toggled { now_active, result } => {
                    self.mutating = false;
                    if self.vm.complete_toggle(*now_active, result.clone()) {
                        self.refresh();
                    }
                }
                _ => {}
            },
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let total = self.vm.students().len();
        let shown = self.vm.derived_rows().len();
        let title = if shown == total {
            format!(" Student Management ({total}) ")
        } else {
            format!(" Student Management ({shown}/{total}) ")
        };

        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let banners = widgets::banners(self.vm.error(), self.vm.success());
        #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
        let banner_height = banners.len() as u16;

        let layout = Layout::vertical([
            Constraint::Length(1),             // search
            Constraint::Length(banner_height), // notices
            Constraint::Min(1),                // table
            Constraint::Length(1),             // hints
        ])
        .split(inner);

        text_field::render(
            frame,
            layout[0],
            "Search",
            &self.search,
            self.searching,
            "Search by name or student code...",
        );
        frame.render_widget(Paragraph::new(banners), layout[1]);
        self.render_table(frame, layout[2]);

        let hints = if self.searching {
            widgets::key_hints(&[("Enter", "done"), ("Esc", "clear")])
        } else {
            widgets::key_hints(&[
                ("/", "search"),
                ("c/n", "sort"),
                ("Enter", "view"),
                ("a", "add"),
                ("e", "edit"),
                ("Space", "status"),
                ("d", "delete"),
                ("r", "refresh"),
            ])
        };
        frame.render_widget(Paragraph::new(hints), layout[3]);

        if self.pending_delete.is_some() {
            widgets::confirm_dialog(frame, area, DELETE_CONFIRMATION);
        }
    }

    fn captures_input(&self) -> bool {
        self.searching || self.pending_delete.is_some()
    }

    fn title(&self) -> &str {
        "Students"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    use roster_core::CoreError;

    use super::super::stub::{StubApi, student};
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded(payload: Payload) -> Action {
        Action::Loaded {
            generation: 1,
            payload,
        }
    }

    fn screen_with_rows() -> ListScreen<StubApi> {
        let mut screen = ListScreen::new(StubApi::default(), 1);
        screen
            .update(&loaded(Payload::List(Ok(vec![
                student("1", "A1", "Bob", true),
                student("2", "A2", "Amy", false),
            ]))))
            .unwrap();
        screen
    }

    fn names(screen: &ListScreen<StubApi>) -> Vec<String> {
        screen
            .vm
            .derived_rows()
            .iter()
            .map(|s| s.name.clone())
            .collect()
    }

    #[test]
    fn loaded_rows_render_sorted_by_name() {
        let screen = screen_with_rows();
        assert_eq!(names(&screen), ["Amy", "Bob"]);
        assert!(!screen.vm.is_loading());
    }

    #[test]
    fn enter_opens_detail_of_selected_row() {
        let mut screen = screen_with_rows();
        screen.handle_key_event(key(KeyCode::Down)).unwrap();

        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();

        assert!(matches!(
            action,
            Some(Action::Navigate(Route::Detail(id))) if id.as_str() == "1"
        ));
    }

    #[test]
    fn sort_keys_toggle_direction() {
        let mut screen = screen_with_rows();
        screen.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        assert_eq!(names(&screen), ["Bob", "Amy"]);

        screen.handle_key_event(key(KeyCode::Char('c'))).unwrap();
        assert_eq!(screen.vm.sort_field(), SortField::StudentCode);
        assert_eq!(names(&screen), ["Bob", "Amy"]);
    }

    #[test]
    fn search_filters_as_you_type() {
        let mut screen = screen_with_rows();
        screen.handle_key_event(key(KeyCode::Char('/'))).unwrap();
        assert!(screen.captures_input());

        for c in "a2".chars() {
            screen.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
        assert_eq!(names(&screen), ["Amy"]);

        screen.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert!(!screen.captures_input());
        assert_eq!(names(&screen).len(), 2);
    }

    #[test]
    fn delete_waits_for_confirmation() {
        let mut screen = screen_with_rows();
        screen.handle_key_event(key(KeyCode::Char('d'))).unwrap();
        assert_eq!(screen.pending_delete.as_ref().unwrap().as_str(), "2");
        assert!(screen.captures_input());

        screen.handle_key_event(key(KeyCode::Char('n'))).unwrap();
        assert!(screen.pending_delete.is_none());
    }

    #[test]
    fn failed_delete_shows_error_without_refresh() {
        let mut screen = screen_with_rows();
        screen
            .update(&loaded(Payload::Deleted(Err(CoreError::Network {
                message: "refused".into(),
            }))))
            .unwrap();

        assert_eq!(screen.vm.error(), Some("Error deleting student"));
        assert!(!screen.vm.is_loading());
    }

    #[test]
    fn toggle_success_shows_notice_and_refreshes() {
        let mut screen = screen_with_rows();
        screen
            .update(&loaded(Payload::Toggled {
                now_active: false,
                result: Ok(None),
            }))
            .unwrap();

        assert_eq!(
            screen.vm.success(),
            Some("Student status updated to Inactive!")
        );
        assert!(screen.vm.is_loading());
    }

    async fn next_loaded(rx: &mut tokio::sync::mpsc::UnboundedReceiver<Action>) -> Action {
        let action = rx.recv().await.unwrap();
        for _ in 0..5 {
            tokio::task::yield_now().await;
        }
        action
    }

    fn bob_and_amy() -> StubApi {
        StubApi::with_students(vec![
            student("1", "A1", "Bob", true),
            student("2", "A2", "Amy", false),
        ])
    }

    #[tokio::test]
    async fn refresh_waits_for_outstanding_fetch() {
        let api = bob_and_amy();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut screen = ListScreen::new(api.clone(), 1);
        screen.init(tx).unwrap();

        screen.handle_key_event(key(KeyCode::Char('r'))).unwrap();
        let first = next_loaded(&mut rx).await;

        assert_eq!(api.calls(), ["list"]);
        assert!(rx.try_recv().is_err());

        screen.update(&first).unwrap();
        screen.handle_key_event(key(KeyCode::Char('r'))).unwrap();
        next_loaded(&mut rx).await;

        assert_eq!(api.calls(), ["list", "list"]);
    }

    #[tokio::test]
    async fn status_toggle_is_sent_once_until_its_result_arrives() {
        let api = bob_and_amy();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut screen = ListScreen::new(api.clone(), 1);
        screen.init(tx).unwrap();
        let listed = next_loaded(&mut rx).await;
        screen.update(&listed).unwrap();

        screen.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        screen.handle_key_event(key(KeyCode::Char(' '))).unwrap();
        screen.handle_key_event(key(KeyCode::Char('d'))).unwrap();
        assert!(screen.pending_delete.is_none());

        let toggled = next_loaded(&mut rx).await;
        assert_eq!(api.calls(), ["list", "update 2"]);

        screen.update(&toggled).unwrap();
        let refreshed = next_loaded(&mut rx).await;
        assert!(matches!(
            refreshed,
            Action::Loaded {
                payload: Payload::List(_),
                ..
            }
        ));
        assert_eq!(api.calls(), ["list", "update 2", "list"]);
    }
}
