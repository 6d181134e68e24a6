//! Search view: query line plus live results.
//!
//! Every edit submits the query; results from superseded requests are
//! dropped. An empty query shows the whole compendium instead.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::core::compendium::MonsterCompendium;
use crate::core::models::SearchMonsterResult;
use crate::core::search::SearchUpdate;

use super::super::services::Services;
use super::super::theme;

/// Single-line query editor. The cursor is a char offset.
#[derive(Debug, Default)]
pub struct QueryInput {
    chars: Vec<char>,
    cursor: usize,
}

impl QueryInput {
    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.chars.iter().all(|c| c.is_whitespace())
    }

    pub fn insert(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    /// Returns false when nothing was removed.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.chars.remove(self.cursor);
        true
    }

    /// Ctrl+W: remove the word before the cursor.
    pub fn delete_word(&mut self) -> bool {
        let before = &self.chars[..self.cursor];
        let start = match before.iter().rposition(|c| !c.is_whitespace()) {
            Some(last) => before[..last]
                .iter()
                .rposition(|c| c.is_whitespace())
                .map_or(0, |i| i + 1),
            None => 0,
        };
        if start == self.cursor {
            return false;
        }
        self.chars.drain(start..self.cursor);
        self.cursor = start;
        true
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.chars.len();
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.chars.is_empty();
        self.chars.clear();
        self.cursor = 0;
        changed
    }
}

/// Outcome of a key press in the search view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchInput {
    Consumed,
    Open(String),
    Ignored,
}

pub struct SearchViewState {
    input: QueryInput,
    rows: Vec<SearchMonsterResult>,
    /// Row offsets where a compendium section starts, with its initial.
    sections: Vec<(usize, char)>,
    selected: usize,
    /// Request whose results the view is waiting for.
    pending: Option<u64>,
    error: Option<String>,
}

impl SearchViewState {
    pub fn new() -> Self {
        Self {
            input: QueryInput::default(),
            rows: Vec::new(),
            sections: Vec::new(),
            selected: 0,
            pending: None,
            error: None,
        }
    }

    pub fn query(&self) -> String {
        self.input.text()
    }

    pub fn rows(&self) -> &[SearchMonsterResult] {
        &self.rows
    }

    pub fn selected(&self) -> Option<&SearchMonsterResult> {
        self.rows.get(self.selected)
    }

    pub fn is_searching(&self) -> bool {
        self.pending.is_some()
    }

    /// Run the current query. A blank query lists the compendium.
    pub fn submit(&mut self, services: &Services, clear_cache: bool) {
        self.error = None;
        if self.input.is_blank() {
            services.search.cancel();
            self.pending = None;
            services.load_compendium();
        } else {
            self.pending = Some(services.search.submit(self.input.text(), clear_cache));
        }
    }

    /// Apply a finished search. `is_current` is false when a newer request
    /// has been submitted since.
    pub fn on_search_update(&mut self, update: SearchUpdate, is_current: bool) {
        if !is_current || self.pending != Some(update.request_id) {
            tracing::debug!(request_id = update.request_id, "Dropping stale search result");
            return;
        }
        self.pending = None;
        self.sections.clear();
        match update.result {
            Ok(results) => {
                self.rows = results;
                self.error = None;
            }
            Err(e) => {
                self.rows.clear();
                self.error = Some(e.to_string());
            }
        }
        self.clamp_selection();
    }

    pub fn on_compendium(&mut self, result: Result<MonsterCompendium, String>) {
        if !self.input.is_blank() {
            return;
        }
        match result {
            Ok(compendium) => {
                self.rows.clear();
                self.sections.clear();
                for section in &compendium.sections {
                    self.sections.push((self.rows.len(), section.initial));
                    self.rows
                        .extend(section.monsters.iter().map(SearchMonsterResult::from));
                }
                self.error = None;
            }
            Err(e) => self.error = Some(e),
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.rows.len().saturating_sub(1));
    }

    fn select_next(&mut self) {
        if !self.rows.is_empty() {
            self.selected = (self.selected + 1) % self.rows.len();
        }
    }

    fn select_prev(&mut self) {
        if !self.rows.is_empty() {
            self.selected = (self.selected + self.rows.len() - 1) % self.rows.len();
        }
    }

    /// Jump to the next compendium section.
    fn next_section(&mut self) {
        if let Some(&(start, _)) = self.sections.iter().find(|(start, _)| *start > self.selected) {
            self.selected = start;
        }
    }

    pub fn handle_input(&mut self, event: &Event, services: &Services) -> SearchInput {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return SearchInput::Ignored;
        };

        let edited = match (*modifiers, *code) {
            (KeyModifiers::CONTROL, KeyCode::Char('w')) => self.input.delete_word(),
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => self.input.clear(),
            (KeyModifiers::CONTROL, KeyCode::Char('n')) | (_, KeyCode::Down) => {
                self.select_next();
                return SearchInput::Consumed;
            }
            (KeyModifiers::CONTROL, KeyCode::Char('p')) | (_, KeyCode::Up) => {
                self.select_prev();
                return SearchInput::Consumed;
            }
            (_, KeyCode::PageDown) => {
                self.next_section();
                return SearchInput::Consumed;
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.input.insert(c);
                true
            }
            (_, KeyCode::Backspace) => self.input.backspace(),
            (_, KeyCode::Delete) => self.input.delete(),
            (_, KeyCode::Left) => {
                self.input.left();
                return SearchInput::Consumed;
            }
            (_, KeyCode::Right) => {
                self.input.right();
                return SearchInput::Consumed;
            }
            (_, KeyCode::Home) => {
                self.input.home();
                return SearchInput::Consumed;
            }
            (_, KeyCode::End) => {
                self.input.end();
                return SearchInput::Consumed;
            }
            (_, KeyCode::Enter) => {
                return match self.selected() {
                    Some(row) => SearchInput::Open(row.index.clone()),
                    None => SearchInput::Consumed,
                };
            }
            (_, KeyCode::Esc) if !self.input.is_blank() => self.input.clear(),
            _ => return SearchInput::Ignored,
        };

        if edited {
            self.selected = 0;
            self.submit(services, false);
        }
        SearchInput::Consumed
    }

    // ── Rendering ───────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).split(area);
        self.render_query(frame, chunks[0]);
        self.render_results(frame, chunks[1]);
    }

    fn render_query(&self, frame: &mut Frame, area: Rect) {
        let title = if self.is_searching() { "Search …" } else { "Search" };
        let block = theme::block_focused(title);
        let inner = block.inner(area);

        let text = if self.input.text().is_empty() {
            Line::from(Span::styled("name, type=dragon & cr>10, spell=fireball, legendary", theme::dim()))
        } else {
            Line::raw(self.input.text())
        };
        frame.render_widget(Paragraph::new(text).block(block), area);

        let x = inner.x + (self.input.cursor() as u16).min(inner.width.saturating_sub(1));
        frame.set_cursor_position(Position::new(x, inner.y));
    }

    fn render_results(&self, frame: &mut Frame, area: Rect) {
        let title = match (&self.error, self.input.is_blank()) {
            (Some(_), _) => "Error".to_string(),
            (None, true) => format!("Compendium ({})", self.rows.len()),
            (None, false) => format!("Results ({})", self.rows.len()),
        };
        let block = theme::block_default(&title);

        if let Some(ref error) = self.error {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                error.as_str(),
                Style::default().fg(theme::ERROR),
            )))
            .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        if self.rows.is_empty() {
            let message = if self.input.is_blank() {
                "No monsters yet. Press F5 to download content."
            } else {
                "No monsters match this query."
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(message, theme::muted()))).block(block),
                area,
            );
            return;
        }

        let items: Vec<ListItem> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let initial = self
                    .sections
                    .iter()
                    .find(|(start, _)| *start == i)
                    .map(|(_, c)| *c)
                    .unwrap_or(' ');
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{initial} "), theme::heading()),
                    Span::styled(format!("{:<32}", row.name), Style::default().fg(theme::TEXT)),
                    Span::styled(format!("{:<14}", row.monster_type.as_str()), theme::muted()),
                    Span::styled(
                        format!("CR {}", row.challenge_rating),
                        theme::challenge_rating(&row.challenge_rating),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(theme::highlight().add_modifier(Modifier::REVERSED));
        let mut state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

impl Default for SearchViewState {
    fn default() -> Self {
        Self::new()
    }
}
