//! Application core: event loop, route mounting, action dispatch.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use roster_core::{Route, StudentApi};

use crate::action::Action;
use crate::component::Component;
use crate::event::{Cadence, Event, EventReader};
use crate::screens;
use crate::theme;
use crate::tui::Tui;
use crate::widgets;

/// Top-level application state and event loop.
pub struct App<A> {
    api: A,
    /// Label of the service shown in the status bar.
    service: String,
    route: Route,
    screen: Box<dyn Component>,
    /// Bumped on every navigation. Results carrying an older generation
    /// belong to an unmounted screen and are dropped.
    generation: u64,
    running: bool,
    help_visible: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl<A: StudentApi + Clone + 'static> App<A> {
    pub fn new(api: A, service: String, route: Route) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let generation = 1;
        let screen = screens::mount(&route, api.clone(), generation);
        Self {
            api,
            service,
            route,
            screen,
            generation,
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.screen.init(self.action_tx.clone())?;

        let mut events = EventReader::spawn(Cadence::default());

        info!(route = %self.route, "TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        drop(events);
        info!("TUI event loop ended");
        Ok(())
    }

    /// Unmount the current screen and mount a fresh one for `route`.
    fn navigate(&mut self, route: Route) -> Result<()> {
        self.generation += 1;
        debug!(from = %self.route, to = %route, generation = self.generation, "navigating");
        let mut screen = screens::mount(&route, self.api.clone(), self.generation);
        screen.init(self.action_tx.clone())?;
        self.screen = screen;
        self.route = route;
        self.help_visible = false;
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here unless
    /// the screen is taking text input.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        if !self.screen.captures_input() {
            match key.code {
                KeyCode::Char('q') => return Ok(Some(Action::Quit)),
                KeyCode::Char('?') => return Ok(Some(Action::ToggleHelp)),
                _ => {}
            }
        }

        self.screen.handle_key_event(key)
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        let forward = match action {
            Action::Quit => {
                self.running = false;
                false
            }
            Action::Resize(w, h) => {
                debug!(width = w, height = h, "terminal resized");
                false
            }
            Action::Navigate(route) => {
                self.navigate(route.clone())?;
                false
            }
            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
                false
            }
            Action::Render => false,
            Action::Loaded { generation, .. } if *generation != self.generation => {
                debug!(%action, current = self.generation, "dropping stale result");
                false
            }
            Action::Tick | Action::Loaded { .. } => true,
        };

        if forward {
            if let Some(follow_up) = self.screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

        self.screen.render(frame, layout[0]);
        self.render_status_bar(frame, layout[1]);

        if self.help_visible {
            Self::render_help_overlay(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(" ● ", Style::default().fg(theme::SUCCESS_GREEN)),
            Span::styled(self.service.clone(), theme::key_hint()),
            Span::styled(" │ ", theme::key_hint()),
            Span::styled(self.screen.title().to_owned(), theme::title_style()),
        ];
        if self.screen.captures_input() {
            spans.push(Span::styled(" │ Ctrl+C quit", theme::key_hint()));
        } else {
            spans.push(Span::styled(" │ ? help  q quit", theme::key_hint()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_help_overlay(frame: &mut Frame, area: Rect) {
        let help_area = widgets::centered(area, 52, 20);
        frame.render_widget(Clear, help_area);
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let section = |title: &'static str| {
            Line::from(Span::styled(
                format!("  {title}"),
                Style::default().fg(theme::NEON_CYAN),
            ))
        };
        let entry = |key: &'static str, what: &'static str| {
            Line::from(vec![
                Span::styled(format!("    {key:<10}"), theme::key_hint_key()),
                Span::styled(what, theme::key_hint()),
            ])
        };

        let text = vec![
            Line::from(""),
            section("List"),
            entry("j/k", "move selection"),
            entry("/", "search by name or code"),
            entry("c / n", "sort by code / name"),
            entry("Space", "toggle active status"),
            entry("Enter", "view details"),
            entry("a / e / d", "add / edit / delete"),
            entry("r", "refresh"),
            Line::from(""),
            section("Form"),
            entry("Tab", "next field"),
            entry("Enter", "save"),
            entry("Esc", "back to list"),
            Line::from(""),
            section("Global"),
            entry("?", "toggle this help"),
            entry("q", "quit"),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }
}
