//! TUI-local state (not shared with the controller).

use genui_rs::ui::LogLine;

/// Which pane currently receives scroll input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ActivePane {
    Output,
    Log,
}

pub(crate) struct App {
    /// Which pane is focused for scrolling (toggled with Tab).
    pub(crate) active_pane: ActivePane,
    /// Whether the log pane is visible (toggled with F2).
    pub(crate) show_logs: bool,
    /// Lines scrolled down from the top of the result panel.
    pub(crate) output_scroll: usize,
    /// Offset from the bottom of the log (0 = follow tail).
    pub(crate) log_scroll: usize,
    /// Shown in the footer instead of the key hints.
    pub(crate) status_message: Option<String>,
    pub(crate) should_quit: bool,
    /// Log lines drained from the tracing layer.
    pub(crate) logs: Vec<LogLine>,
    /// Frame counter driving the spinner.
    pub(crate) tick: usize,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            active_pane: ActivePane::Output,
            show_logs: false,
            output_scroll: 0,
            log_scroll: 0,
            status_message: None,
            should_quit: false,
            logs: Vec::new(),
            tick: 0,
        }
    }

    pub(crate) fn toggle_logs(&mut self) {
        self.show_logs = !self.show_logs;
        self.active_pane = if self.show_logs {
            ActivePane::Log
        } else {
            ActivePane::Output
        };
    }

    /// Scroll offset of the focused pane.
    pub(crate) fn active_scroll_mut(&mut self) -> &mut usize {
        match self.active_pane {
            ActivePane::Log => &mut self.log_scroll,
            ActivePane::Output => &mut self.output_scroll,
        }
    }
}
