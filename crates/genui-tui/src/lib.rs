//! Terminal prompt form for genui.
//!
//! A ratatui + crossterm frontend over a [`PromptController`]: type a
//! prompt, press Enter, and the generated tree is drawn through a
//! [`Registry`]. The render loop runs on a dedicated OS thread and hands
//! each submission to a tokio runtime, so the form keeps redrawing (and the
//! spinner keeps turning) while the request is in flight.
//!
//! # Quick start
//!
//! ```ignore
//! use genui_rs::prelude::*;
//! use genui_tui::{TuiConfig, spawn_tui};
//!
//! let config = ClientConfig::from_env();
//! let controller = PromptController::new(HttpTransport::new(&config)?);
//! let tui = TuiConfig::new(tokio::runtime::Handle::current())
//!     .with_endpoint(config.endpoint);
//! spawn_tui(controller, tui).join().unwrap();
//! ```

use std::io;
use std::thread::JoinHandle;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use crossterm::{cursor, execute};
use genui_rs::controller::PromptController;
use genui_rs::render::Registry;
use genui_rs::ui::tracing::LogBuffer;
use ratatui::prelude::*;
use tokio::runtime::Handle;

mod app;
mod input;
mod render;

pub use render::{log_level_style, node_style, spinner_frame, truncate_str};

use app::App;
use input::handle_key_event;
use render::render;

/// How long the loop waits for a key before redrawing.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Configuration for the TUI.
pub struct TuiConfig {
    /// Endpoint shown in the header.
    pub endpoint: String,
    /// Component types the result panel can draw.
    pub registry: Registry,
    /// Optional log buffer from the tracing layer, drained once per frame
    /// into the log pane.
    pub log_buffer: Option<LogBuffer>,
    /// Runtime that resolves submissions.
    pub runtime: Handle,
}

impl TuiConfig {
    /// Builtin registry, no log buffer, default endpoint label.
    pub fn new(runtime: Handle) -> Self {
        Self {
            endpoint: genui_rs::DEFAULT_ENDPOINT.to_string(),
            registry: Registry::builtin(),
            log_buffer: None,
            runtime,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_log_buffer(mut self, buffer: LogBuffer) -> Self {
        self.log_buffer = Some(buffer);
        self
    }
}

/// Spawn the TUI on a dedicated OS thread.
///
/// The thread owns the controller; an in-flight submission whose response
/// arrives after the user quits is discarded.
pub fn spawn_tui(controller: PromptController, config: TuiConfig) -> JoinHandle<()> {
    std::thread::spawn(move || {
        if let Err(e) = run_tui(&controller, &config) {
            eprintln!("TUI error: {e}");
        }
    })
}

/// Run the TUI event loop (blocking). Call this from a dedicated OS thread,
/// never from inside an async task.
///
/// Returns when the user presses Esc or Ctrl+C.
pub fn run_tui(controller: &PromptController, config: &TuiConfig) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, cursor::Hide)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let mut app = App::new();

    let outcome = event_loop(&mut terminal, &mut app, controller, config);

    // Restore the terminal even when the loop failed.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, cursor::Show)?;
    terminal.show_cursor()?;
    outcome
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    controller: &PromptController,
    config: &TuiConfig,
) -> io::Result<()> {
    while !app.should_quit {
        if let Some(ref log_buf) = config.log_buffer {
            log_buf.flush_into(&mut app.logs);
        }

        // Clone the form state once; the lock is not held while drawing.
        let snap = controller.snapshot();
        terminal.draw(|frame| {
            render(frame, &snap, app, &config.endpoint, &config.registry);
        })?;
        app.tick = app.tick.wrapping_add(1);

        if event::poll(POLL_INTERVAL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            handle_key_event(key, app, controller, &config.runtime);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tui_config_defaults() {
        let config = TuiConfig::new(Handle::current());
        assert_eq!(config.endpoint, genui_rs::DEFAULT_ENDPOINT);
        assert!(config.registry.contains("form"));
        assert!(config.log_buffer.is_none());
    }

    #[tokio::test]
    async fn tui_config_builders() {
        let (_layer, buffer) = genui_rs::ui::tracing::UiTracingLayer::new();
        let config = TuiConfig::new(Handle::current())
            .with_endpoint("http://localhost:8080/api/generate")
            .with_registry(Registry::new())
            .with_log_buffer(buffer);
        assert_eq!(config.endpoint, "http://localhost:8080/api/generate");
        assert!(config.registry.is_empty());
        assert!(config.log_buffer.is_some());
    }

    #[test]
    fn app_defaults() {
        let app = App::new();
        assert!(!app.should_quit);
        assert!(!app.show_logs);
        assert!(app.status_message.is_none());
        assert_eq!(app.output_scroll, 0);
        assert_eq!(app.log_scroll, 0);
        assert!(app.logs.is_empty());
    }
}
