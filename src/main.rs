use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use anyhow::Result;
use tracing::{info, warn, Level};

use lailpuriya::{handler, tui, ui, App, Config};
use lailpuriya::tui::EventHandler;

#[tokio::main]
async fn main() -> Result<()> {
    let loaded = Config::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();

    // Logging is best effort; the storefront still runs without a log file
    if let Err(e) = init_logging(&config) {
        eprintln!("lailpuriya: logging disabled: {}", e);
    }
    if let Err(e) = &loaded {
        warn!(error = %e, "config unreadable, using defaults");
    }
    info!(version = env!("CARGO_PKG_VERSION"), "lailpuriya starting");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let mut app = App::new(config);
    let result = run(&mut terminal, &mut app).await;

    tui::restore()?;
    info!(cart_count = app.cart.cart_count(), "lailpuriya exiting");
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    let mut events = EventHandler::new();
    let tx = events.sender();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event, &tx),
            None => break,
        }
    }

    Ok(())
}

/// Route tracing output to a file; the terminal belongs to the UI.
fn init_logging(config: &Config) -> Result<()> {
    let level: Level = config.log_level().parse().unwrap_or(Level::INFO);

    let dir = Config::config_dir()?;
    fs::create_dir_all(&dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("lailpuriya.log"))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
