use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use prcopilot_client::BlockingHttpService;
use ratatui::prelude::*;

use prcopilot_tui::app::App;
use prcopilot_tui::config::DashboardConfig;

/// Drain cadence while decision commands are in flight.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

fn main() -> Result<()> {
    let config = DashboardConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let service = BlockingHttpService::with_timeout(&config.api_base_url, config.timeout());
    run_tui(service)
}

fn run_tui(service: BlockingHttpService) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, service);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e}");
    }

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    service: BlockingHttpService,
) -> Result<()> {
    let mut app = App::new(service);

    loop {
        app.drain_outcomes();
        terminal.draw(|frame| app.render(frame))?;

        // Poll with a timeout while commands are in flight so their
        // outcomes get drained; block on input otherwise.
        if app.has_in_flight() {
            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if should_quit(key, &app) {
                        break;
                    }
                    app.handle_key(key);
                }
            }
        } else if let Event::Key(key) = event::read()? {
            if should_quit(key, &app) {
                break;
            }
            app.handle_key(key);
        }
    }

    Ok(())
}

fn should_quit(key: crossterm::event::KeyEvent, app: &App) -> bool {
    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }
    // q quits from the feed; inside an overlay it means "back"
    key.code == KeyCode::Char('q') && !app.in_overlay()
}
