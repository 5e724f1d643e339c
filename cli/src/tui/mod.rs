pub mod app;
pub mod map;
pub mod ui;

use std::io;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use mapty_core::{FileStorage, LatLng, TrackerConfig};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::info;

use crate::tui::app::{App, AppAction};

pub fn run(storage: FileStorage, config: TrackerConfig, position: Option<LatLng>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // A reset ends the session; the next one starts from what is on disk.
    let res = loop {
        let mut app = App::new(storage.clone(), config.clone(), position);
        match run_app(&mut terminal, &mut app) {
            Ok(AppAction::Restart) => {
                info!("session restarted");
                continue;
            }
            other => break other,
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<AppAction> {
    loop {
        app.tick();
        terminal.draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if event::poll(std::time::Duration::from_millis(50))? {
            let action = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => {
                    app.handle_mouse(mouse);
                    AppAction::Continue
                }
                _ => AppAction::Continue,
            };
            if action != AppAction::Continue {
                return Ok(action);
            }
        }
    }
}
