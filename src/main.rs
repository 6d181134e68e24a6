use std::io;
use std::time::Duration;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;

use hunter::config::AppConfig;
use hunter::tui::app::AppState;
use hunter::tui::services::{device_language_from_locale, Services};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load();

    // File-only logging: the TUI owns the terminal
    let _log_guard = hunter::core::logging::init_tui(&config.log_dir());
    tracing::info!(version = hunter::VERSION, "Hunter starting");

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let services = Services::init(&config, event_tx).await?;

    if config.sync.sync_on_startup {
        let device_language = std::env::var("LANG")
            .ok()
            .and_then(|locale| device_language_from_locale(&locale));
        services.spawn_startup_sync(device_language);
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if config.tui.mouse_enabled {
        execute!(stdout, EnableMouseCapture)?;
    }
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut app = AppState::new(event_rx, services);
    let result = app
        .run(&mut terminal, Duration::from_millis(config.tui.tick_rate_ms))
        .await;

    // Restore terminal
    disable_raw_mode()?;
    if config.tui.mouse_enabled {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        tracing::error!(error = %e, "TUI exited with error");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    tracing::info!("Hunter stopped");
    Ok(())
}
