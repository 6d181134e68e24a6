//! Monster detail view: one stat block at a time, paging through the
//! compendium in display order.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::core::models::{AbilityDescription, Monster, MonsterStatus, SpellcastingType};

use super::super::services::Services;
use super::super::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailInput {
    Consumed,
    Close,
    /// Add the current monster to the folder preview, or take it out.
    ToggleFolderPreview,
    Ignored,
}

pub struct DetailViewState {
    monsters: Vec<Monster>,
    position: usize,
    scroll: u16,
    loading: bool,
    error: Option<String>,
}

impl DetailViewState {
    pub fn new() -> Self {
        Self {
            monsters: Vec::new(),
            position: 0,
            scroll: 0,
            loading: false,
            error: None,
        }
    }

    pub fn load(&mut self, services: &Services, index: String) {
        self.loading = true;
        self.error = None;
        self.scroll = 0;
        services.load_detail(index);
    }

    pub fn on_loaded(&mut self, result: Result<(usize, Vec<Monster>), String>) {
        self.loading = false;
        match result {
            Ok((position, monsters)) => {
                self.position = position;
                self.monsters = monsters;
                self.error = None;
            }
            Err(e) => {
                self.monsters.clear();
                self.error = Some(e);
            }
        }
    }

    pub fn current(&self) -> Option<&Monster> {
        self.monsters.get(self.position)
    }

    fn next(&mut self) {
        if self.position + 1 < self.monsters.len() {
            self.position += 1;
            self.scroll = 0;
        }
    }

    fn prev(&mut self) {
        if self.position > 0 {
            self.position -= 1;
            self.scroll = 0;
        }
    }

    pub fn handle_input(&mut self, event: &Event) -> DetailInput {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return DetailInput::Ignored;
        };

        match code {
            KeyCode::Esc | KeyCode::Backspace => return DetailInput::Close,
            KeyCode::Char('j') | KeyCode::Down => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Char('g') | KeyCode::Home => self.scroll = 0,
            KeyCode::Char('l') | KeyCode::Right => self.next(),
            KeyCode::Char('h') | KeyCode::Left => self.prev(),
            KeyCode::Char('a') if self.current().is_some() => return DetailInput::ToggleFolderPreview,
            _ => return DetailInput::Ignored,
        }
        DetailInput::Consumed
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let title = match self.current() {
            Some(m) => format!("{} ({}/{})", m.name, self.position + 1, self.monsters.len()),
            None => "Monster".to_string(),
        };
        let block = theme::block_focused(&title);

        let lines = if self.loading {
            vec![Line::from(Span::styled("Loading…", theme::muted()))]
        } else if let Some(ref error) = self.error {
            vec![Line::from(Span::styled(error.clone(), Style::default().fg(theme::ERROR)))]
        } else if let Some(monster) = self.current() {
            stat_block_lines(monster)
        } else {
            vec![Line::from(Span::styled("No monster selected.", theme::muted()))]
        };

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0));
        frame.render_widget(paragraph, area);
    }
}

impl Default for DetailViewState {
    fn default() -> Self {
        Self::new()
    }
}

fn section(lines: &mut Vec<Line<'static>>, title: &str, entries: &[AbilityDescription]) {
    if entries.is_empty() {
        return;
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(title.to_string(), theme::heading())));
    for entry in entries {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{}. ", entry.name),
                Style::default().add_modifier(Modifier::BOLD | Modifier::ITALIC),
            ),
            Span::raw(entry.description.clone()),
        ]));
    }
}

/// Render a monster as a stat block.
pub fn stat_block_lines(monster: &Monster) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let mut header = vec![Span::styled(monster.name.clone(), theme::title())];
    match monster.status {
        MonsterStatus::Edited => header.push(Span::styled("  [edited]", Style::default().fg(theme::WARNING))),
        MonsterStatus::Clone => header.push(Span::styled("  [clone]", Style::default().fg(theme::INFO))),
        MonsterStatus::Imported => {}
    }
    lines.push(Line::from(header));

    let subtitle = if monster.subtitle.is_empty() {
        let mut parts = vec![monster.size.clone(), monster.monster_type.as_str().to_string()];
        if let Some(ref subtype) = monster.subtype {
            parts.push(format!("({subtype})"));
        }
        let mut text = parts.into_iter().filter(|p| !p.is_empty()).collect::<Vec<_>>().join(" ");
        if !monster.alignment.is_empty() {
            text.push_str(", ");
            text.push_str(&monster.alignment);
        }
        text
    } else {
        monster.subtitle.clone()
    };
    lines.push(Line::from(Span::styled(subtitle, theme::muted())));
    lines.push(Line::raw(""));

    let stats = &monster.stats;
    lines.push(Line::from(vec![
        Span::styled("Armor Class ", theme::heading()),
        Span::raw(stats.armor_class.to_string()),
    ]));
    let hit_dice = if stats.hit_dice.is_empty() {
        String::new()
    } else {
        format!(" ({})", stats.hit_dice)
    };
    lines.push(Line::from(vec![
        Span::styled("Hit Points ", theme::heading()),
        Span::raw(format!("{}{}", stats.hit_points, hit_dice)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Challenge ", theme::heading()),
        {
            let rating = monster.challenge_rating_formatted();
            let style = theme::challenge_rating(&rating);
            Span::styled(rating, style)
        },
    ]));

    if !monster.ability_scores.is_empty() {
        lines.push(Line::raw(""));
        let scores: Vec<Span> = monster
            .ability_scores
            .iter()
            .map(|score| {
                let label: String = score.ability.chars().take(3).collect::<String>().to_uppercase();
                Span::raw(format!("{label} {} ({:+})  ", score.value, score.modifier))
            })
            .collect();
        lines.push(Line::from(scores));
    }

    section(&mut lines, "Traits", &monster.special_abilities);

    for spellcasting in &monster.spellcastings {
        let title = match spellcasting.spellcasting_type {
            SpellcastingType::Spellcaster => "Spellcasting",
            SpellcastingType::Innate => "Innate Spellcasting",
        };
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(title, theme::heading())));
        if !spellcasting.description.is_empty() {
            lines.push(Line::raw(spellcasting.description.clone()));
        }
        for usage in &spellcasting.usages {
            let names = usage
                .spells
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(Line::from(vec![
                Span::styled(format!("  {}: ", usage.group), Style::default().add_modifier(Modifier::ITALIC)),
                Span::raw(names),
            ]));
        }
    }

    section(&mut lines, "Actions", &monster.actions);
    section(&mut lines, "Reactions", &monster.reactions);
    section(&mut lines, "Legendary Actions", &monster.legendary_actions);

    if !monster.source_name.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(format!("Source: {}", monster.source_name), theme::dim())));
    }

    lines
}
