//! Drawing functions for the TUI
//!
//! - `console` - tabs, summary, filter bar, table, status line
//! - `popup` - overlays drawn on top (action menu, details, prompts)

mod console;
mod popup;

use ratatui::Frame;

use crate::app::{App, Overlay};

use console::draw_console;
use popup::{draw_detail, draw_menu, draw_prompt};

/// Main draw function
pub fn draw(f: &mut Frame, app: &mut App) {
    let theme = app.config().resolve_theme();
    draw_console(f, app, &theme);

    match app.overlay() {
        Overlay::None => {}
        Overlay::Menu { actions, selected } => draw_menu(f, actions, *selected, &theme),
        Overlay::Detail { title, fields } => draw_detail(f, title, fields, &theme),
        Overlay::Prompt { kind, input, error } => {
            draw_prompt(f, &kind.title(), input, error.as_deref(), &theme)
        }
    }
}
