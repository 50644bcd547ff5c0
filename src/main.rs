mod app;
mod config;
mod export;
mod logging;
mod store;
mod style;
mod ui;

use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::handler;
use crate::app::state::AppState;
use crate::config::{AppConfig, SettingsStore};
use crate::store::{ApiStyleStore, LocalStyleStore, StoreClient, StyleStore};
use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::prelude::*;
use std::io;
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    let cfg = config::load_config()?;

    match logging::init_logging(&cfg.logging) {
        Ok(Some(path)) => info!("stylesmith {} logging to {}", env!("CARGO_PKG_VERSION"), path.display()),
        Ok(None) => {}
        Err(e) => eprintln!("Logging disabled: {:#}", e),
    }

    let settings = SettingsStore::open(SettingsStore::default_path())?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, cfg, settings).await;

    restore_terminal()?;

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

/// The store tried first. Falls back to local storage when the API is
/// disabled or its client cannot be built.
fn preferred_store(cfg: &config::model::StoreConfig) -> Box<dyn StyleStore> {
    if cfg.prefer_api {
        match ApiStyleStore::new(cfg.api_url.as_str(), cfg.request_timeout()) {
            Ok(store) => return Box::new(store),
            Err(e) => warn!("Style server client unavailable: {}", e),
        }
    }
    Box::new(LocalStyleStore::new(cfg.styles_dir()))
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: AppConfig,
    settings: SettingsStore,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    let mut state = AppState::new(settings, &cfg.ui);
    let export_dir = cfg.export.dir();

    let fallback = LocalStyleStore::new(cfg.store.styles_dir());
    info!("Local style storage at {}", fallback.styles_dir().display());
    let store = store::spawn_store_worker(
        preferred_store(&cfg.store),
        Box::new(fallback),
        cfg.store.options(),
        event_tx.clone(),
    );

    // Spawn terminal input task
    let term_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        while let Some(Ok(event)) = reader.next().await {
            if term_tx.send(AppEvent::Terminal(event)).is_err() {
                break;
            }
        }
    });

    // Spawn tick task (20 FPS = 50ms)
    let tick_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_millis(50));
        loop {
            interval.tick().await;
            if tick_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });
    drop(event_tx);

    terminal.draw(|f| ui::render(f, &state))?;

    while let Some(event) = event_rx.recv().await {
        let actions = handler::handle_event(&mut state, event);
        for action in actions {
            execute_action(&mut state, action, &store, &export_dir);
        }

        if state.should_quit {
            info!("Quitting");
            break;
        }

        // Conditional render (only if dirty)
        if state.dirty {
            terminal.draw(|f| ui::render(f, &state))?;
            state.dirty = false;
        }
    }

    Ok(())
}

fn execute_action(state: &mut AppState, action: Action, store: &StoreClient, export_dir: &Path) {
    match action {
        Action::SaveStyle {
            style,
            adopt,
            revision,
        } => {
            if let Err(e) = store.save(style, adopt, revision) {
                state.notify_error(format!("Save failed: {}", e));
            }
        }
        Action::ResetStore => {
            if let Err(e) = store.reset() {
                state.notify_error(format!("Reset failed: {}", e));
            }
        }
        Action::ExportStyle { style } => match export::write_style_file(export_dir, &style) {
            Ok(path) => state.notify_info(format!("Downloaded {}", path.display())),
            Err(e) => {
                warn!("Download failed: {}", e);
                state.notify_error(format!("Download failed: {}", e));
            }
        },
    }
}
