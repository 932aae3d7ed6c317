//! Key handling for the prompt form.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use genui_rs::controller::PromptController;
use tokio::runtime::Handle;

use crate::app::{ActivePane, App};

const LINE_STEP: usize = 1;
const PAGE_STEP: usize = 10;

pub(crate) fn handle_key_event(
    key: KeyEvent,
    app: &mut App,
    controller: &PromptController,
    runtime: &Handle,
) {
    // Ctrl+C always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::F(2) => app.toggle_logs(),
        KeyCode::Tab | KeyCode::BackTab => {
            if app.show_logs {
                app.active_pane = match app.active_pane {
                    ActivePane::Log => ActivePane::Output,
                    ActivePane::Output => ActivePane::Log,
                };
            }
        }
        KeyCode::Up => scroll(app, LINE_STEP, true),
        KeyCode::Down => scroll(app, LINE_STEP, false),
        KeyCode::PageUp => scroll(app, PAGE_STEP, true),
        KeyCode::PageDown => scroll(app, PAGE_STEP, false),
        KeyCode::Enter => {
            submit(app, controller, runtime);
        }
        KeyCode::Backspace => {
            if !controller.input_disabled() {
                let mut prompt = controller.prompt();
                prompt.pop();
                controller.update_prompt(prompt);
            }
        }
        KeyCode::Char(c) => {
            // Chords like Ctrl+U or Alt+B are not text.
            let chord = key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
            if !chord && !controller.input_disabled() {
                let mut prompt = controller.prompt();
                prompt.push(c);
                controller.update_prompt(prompt);
                app.status_message = None;
            }
        }
        _ => {}
    }
}

/// Move the focused pane. The result panel counts from the top, the log
/// pane from its tail.
fn scroll(app: &mut App, step: usize, up: bool) {
    let towards_top = up == (app.active_pane == ActivePane::Output);
    let offset = app.active_scroll_mut();
    *offset = if towards_top {
        offset.saturating_sub(step)
    } else {
        offset.saturating_add(step)
    };
}

/// Start a submission and hand its network half to the runtime.
///
/// Returns `false` when the submit control is disabled: the prompt is blank
/// or a request is already loading.
pub(crate) fn submit(app: &mut App, controller: &PromptController, runtime: &Handle) -> bool {
    if !controller.can_submit() {
        if !controller.input_disabled() {
            app.status_message = Some("Describe the UI you want first.".into());
        }
        return false;
    }
    let Some(pending) = controller.begin_submit() else {
        return false;
    };
    app.output_scroll = 0;
    app.status_message = None;
    runtime.spawn(pending.resolve());
    true
}
