use crate::core::compendium::MonsterCompendium;
use crate::core::models::Monster;
use crate::core::search::SearchUpdate;
use crate::core::sync::SyncEvent;

/// Events flowing through the Elm-architecture event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// A submitted search finished.
    Search(SearchUpdate),
    /// The alphabetical listing shown for an empty query.
    CompendiumLoaded(Result<MonsterCompendium, String>),
    /// Detail list loaded: position of the requested monster and the list.
    DetailLoaded(Result<(usize, Vec<Monster>), String>),
    /// Progress of a content sync.
    Sync(SyncEvent),
    /// Notification to display to the user.
    Notification(Notification),
}

/// High-level actions dispatched by the input mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ShowHelp,
    CloseHelp,
    /// Download content now.
    Sync,
    /// Re-run the current query after dropping the search cache.
    Reload,
    OpenDetail(String),
    CloseDetail,
    ToggleFolderPreview { index: String, name: String },
}

/// Which top-level view has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Search,
    Detail,
}

impl Focus {
    pub fn label(self) -> &'static str {
        match self {
            Focus::Search => "Search",
            Focus::Detail => "Monster",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    /// Ticks a toast of this level stays on screen. Failures linger.
    pub fn lifetime(self) -> u32 {
        match self {
            NotificationLevel::Info | NotificationLevel::Success => 60,
            NotificationLevel::Warning => 100,
            NotificationLevel::Error => 200,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            NotificationLevel::Info => "ℹ",
            NotificationLevel::Success => "✓",
            NotificationLevel::Warning => "⚠",
            NotificationLevel::Error => "✗",
        }
    }
}

/// A toast in the top-right corner, dismissed when `ttl_ticks` runs out.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub ttl_ticks: u32,
}

impl Notification {
    pub fn new(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            message: message.into(),
            level,
            ttl_ticks: level.lifetime(),
        }
    }
}
