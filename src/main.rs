use anyhow::Result;
use clap::{Arg, Command};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;

use sympli_dash::api::{ApiClient, DEFAULT_API_URL};
use sympli_dash::app::App;
use sympli_dash::ui::run_app;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("Symplibackup Dashboard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Interactive terminal dashboard for a Symplibackup client fleet")
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .value_name("URL")
                .help("Base URL of the backup-management service")
                .default_value(DEFAULT_API_URL),
        )
        .get_matches();

    let api_url = matches
        .get_one::<String>("api-url")
        .cloned()
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    run_tui_app(&api_url).await
}

async fn run_tui_app(api_url: &str) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new(Arc::new(ApiClient::new(api_url)));
    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}
