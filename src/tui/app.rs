use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::core::sync::SyncEvent;

use super::events::{Action, AppEvent, Focus, Notification, NotificationLevel};
use super::services::Services;
use super::theme;
use super::views::detail::{DetailInput, DetailViewState};
use super::views::search::{SearchInput, SearchViewState};

const MAX_NOTIFICATIONS: usize = 3;

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// Currently focused view.
    pub focus: Focus,
    pub search: SearchViewState,
    pub detail: DetailViewState,
    /// Toasts, oldest first.
    pub notifications: Vec<Notification>,
    /// Whether the help modal is open.
    pub show_help: bool,
    /// A sync is running.
    pub syncing: bool,
    /// Receiver for backend events.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Backend services handle.
    services: Services,
}

impl AppState {
    pub fn new(event_rx: mpsc::UnboundedReceiver<AppEvent>, services: Services) -> Self {
        Self {
            running: true,
            focus: Focus::Search,
            search: SearchViewState::new(),
            detail: DetailViewState::new(),
            notifications: Vec::new(),
            show_help: false,
            syncing: false,
            event_rx,
            services,
        }
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        // Empty query: show the compendium
        self.search.submit(&self.services, false);

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        self.services.search.cancel();
        Ok(())
    }

    // ── Event handling ──────────────────────────────────────────────────

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(input) => {
                if self.show_help {
                    if let Some(action) = map_help_input(&input) {
                        self.handle_action(action);
                    }
                    return;
                }

                // Global keys first: the search view consumes every printable key.
                if let Some(action) = map_global_input(&input) {
                    self.handle_action(action);
                    return;
                }

                match self.focus {
                    Focus::Search => match self.search.handle_input(&input, &self.services) {
                        SearchInput::Open(index) => self.handle_action(Action::OpenDetail(index)),
                        SearchInput::Consumed | SearchInput::Ignored => {}
                    },
                    Focus::Detail => match self.detail.handle_input(&input) {
                        DetailInput::Close => self.handle_action(Action::CloseDetail),
                        DetailInput::ToggleFolderPreview => {
                            if let Some(monster) = self.detail.current() {
                                let action = Action::ToggleFolderPreview {
                                    index: monster.index.clone(),
                                    name: monster.name.clone(),
                                };
                                self.handle_action(action);
                            }
                        }
                        DetailInput::Consumed | DetailInput::Ignored => {}
                    },
                }
            }
            AppEvent::Search(update) => {
                let is_current = self.services.search.is_current(update.request_id);
                self.search.on_search_update(update, is_current);
            }
            AppEvent::CompendiumLoaded(result) => self.search.on_compendium(result),
            AppEvent::DetailLoaded(result) => {
                if let Err(ref e) = result {
                    self.push_notification(e.clone(), NotificationLevel::Error);
                }
                self.detail.on_loaded(result);
            }
            AppEvent::Sync(event) => self.on_sync_event(event),
            AppEvent::Notification(notification) => {
                self.push_notification(notification.message, notification.level);
            }
        }
    }

    fn on_sync_event(&mut self, event: SyncEvent) {
        match event {
            SyncEvent::Started => {
                self.syncing = true;
                self.push_notification("Downloading content…".into(), NotificationLevel::Info);
            }
            SyncEvent::Finished(report) => {
                self.syncing = false;
                let preserved = report.monsters_preserved + report.spells_preserved;
                let mut message = format!(
                    "Synced {} monsters and {} spells ({})",
                    report.monsters_saved, report.spells_saved, report.language
                );
                if preserved > 0 {
                    message.push_str(&format!(", kept {preserved} local changes"));
                }
                self.push_notification(message, NotificationLevel::Success);
                // The cache was invalidated; refresh what is on screen.
                self.search.submit(&self.services, false);
            }
            SyncEvent::Failed(error) => {
                self.syncing = false;
                self.push_notification(format!("Sync failed: {error}"), NotificationLevel::Error);
            }
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
            Action::Sync => {
                if self.syncing {
                    self.push_notification("A sync is already running".into(), NotificationLevel::Warning);
                } else {
                    self.services.spawn_sync();
                }
            }
            Action::Reload => {
                self.search.submit(&self.services, true);
                self.push_notification("Reloading monsters".into(), NotificationLevel::Info);
            }
            Action::OpenDetail(index) => {
                self.focus = Focus::Detail;
                self.detail.load(&self.services, index);
            }
            Action::CloseDetail => self.focus = Focus::Search,
            Action::ToggleFolderPreview { index, name } => {
                self.services.toggle_folder_preview(index, name);
            }
        }
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Show a toast. Repeating a visible message restarts its timer.
    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if let Some(existing) = self.notifications.iter_mut().find(|n| n.message == message) {
            existing.level = level;
            existing.ttl_ticks = level.lifetime();
            return;
        }

        self.notifications.push(Notification::new(message, level));
        let overflow = self.notifications.len().saturating_sub(MAX_NOTIFICATIONS);
        self.notifications.drain(..overflow);
    }

    fn on_tick(&mut self) {
        self.notifications.retain_mut(|n| {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
            n.ttl_ticks > 0
        });
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let rows = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

        match self.focus {
            Focus::Search => self.search.render(frame, rows[0]),
            Focus::Detail => self.detail.render(frame, rows[0]),
        }
        self.render_status_bar(frame, rows[1]);
        self.render_notifications(frame, area);

        if self.show_help {
            self.render_help_modal(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled(" HUNTER ", theme::brand_badge()),
            Span::raw(" "),
            Span::styled(self.focus.label(), theme::muted()),
            Span::raw(" │ "),
        ];
        if self.syncing {
            spans.push(Span::styled(" SYNC ", theme::sync_badge()));
            spans.push(Span::raw(" "));
        }
        let hints: &[(&str, &str)] = match self.focus {
            Focus::Search => &[("↑↓", ":select "), ("Enter", ":open "), ("Esc", ":clear ")],
            Focus::Detail => &[("←→", ":prev/next "), ("j/k", ":scroll "), ("a", ":folder "), ("Esc", ":back ")],
        };
        for (key, desc) in hints.iter().chain(&[("F5", ":sync "), ("Ctrl+R", ":reload "), ("F1", ":help "), ("Ctrl+C", ":quit")]) {
            spans.push(Span::styled(*key, theme::dim()));
            spans.push(Span::raw(*desc));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let width = area.width.saturating_sub(2).min(50);
        let toast_area = Rect::new(
            area.width.saturating_sub(width + 1),
            1,
            width,
            self.notifications.len() as u16,
        );

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let color = match n.level {
                    NotificationLevel::Info => theme::INFO,
                    NotificationLevel::Success => theme::SUCCESS,
                    NotificationLevel::Warning => theme::WARNING,
                    NotificationLevel::Error => theme::ERROR,
                };
                Line::from(vec![
                    Span::styled(
                        format!(" {} ", n.level.glyph()),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(n.message.as_str()),
                ])
            })
            .collect();

        frame.render_widget(Clear, toast_area);
        frame.render_widget(Paragraph::new(lines), toast_area);
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 80, area);
        let key_style = Style::default().fg(theme::PRIMARY_LIGHT).add_modifier(Modifier::BOLD);

        let mut lines = Vec::new();
        for (section, bindings) in HELP_SECTIONS {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(format!("  {section}"), theme::title())));
            for (key, desc) in *bindings {
                lines.push(Line::from(vec![
                    Span::styled(format!("    {key:<24}"), key_style),
                    Span::raw(*desc),
                ]));
            }
        }

        let block = Block::default()
            .title(" Keybindings ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}

type HelpSection = (&'static str, &'static [(&'static str, &'static str)]);

const HELP_SECTIONS: &[HelpSection] = &[
    (
        "Global",
        &[
            ("F1", "Toggle this help"),
            ("F5", "Download content"),
            ("Ctrl+R", "Reload monsters (drops the search cache)"),
            ("Ctrl+C / Ctrl+Q", "Quit"),
        ],
    ),
    (
        "Search",
        &[
            ("type", "Edit the query; results update live"),
            ("↑/↓, Ctrl+P/N", "Select result"),
            ("PageDown", "Next letter (empty query)"),
            ("Enter", "Open monster"),
            ("Ctrl+W / Ctrl+U", "Delete word / line"),
            ("Esc", "Clear query"),
        ],
    ),
    (
        "Query syntax",
        &[
            ("goblin", "Name contains"),
            ("type=dragon", "Creature type"),
            ("cr>10, cr<1, cr=0.25", "Challenge rating"),
            ("spell=fireball", "Casts a spell"),
            ("source=monster manual", "Source book"),
            ("legendary", "Has legendary actions"),
            ("edited, cloned, imported", "Local status"),
            ("a & b", "Combine clauses"),
        ],
    ),
    (
        "Monster",
        &[
            ("←/→, h/l", "Previous / next monster"),
            ("j/k", "Scroll"),
            ("a", "Add to / remove from the folder preview"),
            ("Esc", "Back to search"),
        ],
    ),
];

// ── Input mapping ───────────────────────────────────────────────────────

fn map_help_input(event: &Event) -> Option<Action> {
    let Event::Key(KeyEvent {
        code,
        kind: KeyEventKind::Press,
        ..
    }) = event
    else {
        return None;
    };
    match code {
        KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') => Some(Action::CloseHelp),
        _ => None,
    }
}

fn map_global_input(event: &Event) -> Option<Action> {
    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        ..
    }) = event
    else {
        return None;
    };

    match (*modifiers, *code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) | (KeyModifiers::CONTROL, KeyCode::Char('q')) => {
            Some(Action::Quit)
        }
        (KeyModifiers::CONTROL, KeyCode::Char('r')) => Some(Action::Reload),
        (_, KeyCode::F(1)) => Some(Action::ShowHelp),
        (_, KeyCode::F(5)) => Some(Action::Sync),
        _ => None,
    }
}

/// Rect of the given percentage size, centered in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [band] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(band);
    rect
}
