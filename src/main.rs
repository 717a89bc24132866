mod api;
mod app;
mod catalog;
mod config;
mod error;
mod media;
mod modal;
mod notify;
mod session;
mod ui;
mod verify;

use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::app::App;
use crate::config::Config;
use crate::error::Result;
use crate::session::Session;

fn setup_logging() -> Result<()> {
    let data_dir = config::data_dir()?;
    std::fs::create_dir_all(&data_dir)?;

    let file_appender = tracing_appender::rolling::daily(&data_dir, "mita.log");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("mita=info".parse().unwrap()))
        .with(fmt::layer().with_writer(file_appender).with_ansi(false))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Set up file-based logging (we own the terminal for TUI)
    if let Err(e) = setup_logging() {
        eprintln!("Warning: Could not set up logging: {}", e);
    }

    info!("Starting mita");

    // Load configuration
    let config = Config::load()?;
    info!(server = %config.server.base_url, "Loaded config");

    // Restore the stored session, if any
    let session = Session::load(config::session_path()?);

    // Initialize terminal
    let mut terminal = app::init_terminal()?;

    // Play splash animation
    let accent = ui::widgets::parse_accent_color(&config.ui.accent_color);
    let _ = app::play_splash(&mut terminal, accent);

    // Run the app (async)
    let mut app = App::new(config, session);
    let result = app.run(&mut terminal).await;

    // Restore terminal on exit
    app::restore_terminal()?;

    result
}
