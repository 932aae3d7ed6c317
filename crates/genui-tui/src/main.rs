//! Interactive prompt form in the terminal.
//!
//! ```sh
//! genui-tui
//! genui-tui --endpoint http://localhost:8080/api/generate --timeout-secs 60
//! ```

use std::process;
use std::time::Duration;

use clap::Parser;
use genui_rs::prelude::*;
use genui_tui::{TuiConfig, run_tui};
use tokio::runtime::Handle;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Type a prompt, press Enter, see the generated UI.
#[derive(Parser)]
#[command(name = "genui-tui")]
struct Cli {
    /// Generation endpoint URL (overrides GENUI_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// Transport timeout in seconds (none by default)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    // Stdout belongs to the TUI; logs go to the log pane.
    let (tracing_layer, log_buffer) = UiTracingLayer::new();
    tracing_subscriber::registry().with(tracing_layer).init();

    let mut config = ClientConfig::from_env().with_endpoint_override(cli.endpoint);
    if let Some(secs) = cli.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let controller = PromptController::new(HttpTransport::new(&config)?);
    let tui = TuiConfig::new(Handle::current())
        .with_endpoint(config.endpoint.clone())
        .with_log_buffer(log_buffer);

    tokio::task::spawn_blocking(move || run_tui(&controller, &tui))
        .await
        .map_err(|e| format!("TUI thread panicked: {e}"))?
        .map_err(|e| format!("terminal error: {e}"))
}
