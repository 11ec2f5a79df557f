//! Keyboard and mouse handling.
//!
//! Input is routed by what currently has focus: an open overlay first,
//! then the filter bar while it is being edited, then the table.

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;

use crate::app::{App, Overlay};
use crate::table::widget::{header_hit, row_hit};
use crate::table::RowAction;

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit();
        return;
    }

    match app.overlay() {
        Overlay::None => {}
        Overlay::Menu { .. } => return handle_menu_key(app, key),
        Overlay::Detail { .. } => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
                app.close_overlay();
            }
            return;
        }
        Overlay::Prompt { .. } => return handle_prompt_key(app, key),
    }

    if app.is_filtering() {
        match key.code {
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Enter | KeyCode::Down | KeyCode::Up => app.finish_filter(),
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Char(c) => app.push_filter_char(c),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Esc => {
            if !app.pane().filter().query().is_empty() {
                app.clear_filter();
            }
        }
        KeyCode::Tab | KeyCode::Right => app.next_view(),
        KeyCode::BackTab | KeyCode::Left => app.previous_view(),
        KeyCode::Up | KeyCode::Char('k') => app.pane().select_previous(),
        KeyCode::Down | KeyCode::Char('j') => app.pane().select_next(),
        KeyCode::Home | KeyCode::Char('g') => app.pane().select_first(),
        KeyCode::End | KeyCode::Char('G') => app.pane().select_last(),
        KeyCode::Char('/') => app.start_filter(),
        KeyCode::Char('0') => app.clear_sort(),
        KeyCode::Char(c @ '1'..='9') => {
            let n = c.to_digit(10).unwrap_or(0) as usize;
            if !app.toggle_sort_nth(n) {
                tracing::debug!("No sortable column {n}");
            }
        }
        KeyCode::Enter => app.dispatch(RowAction::RowClick),
        KeyCode::Char('m') | KeyCode::Char(' ') => app.open_menu(),
        KeyCode::Char('v') => app.dispatch(RowAction::View),
        KeyCode::Char('e') => app.dispatch(RowAction::Edit),
        KeyCode::Char('d') => app.dispatch(RowAction::Delete),
        KeyCode::Char('n') | KeyCode::Char('r') => app.open_prompt(),
        _ => {}
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    let Overlay::Menu { actions, selected } = app.overlay_mut() else {
        return;
    };
    let chosen = match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.close_overlay();
            return;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            *selected = selected.saturating_sub(1);
            return;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if *selected + 1 < actions.len() {
                *selected += 1;
            }
            return;
        }
        KeyCode::Enter => actions.get(*selected).copied(),
        KeyCode::Char(c) => actions.iter().copied().find(|a| a.shortcut() == c),
        _ => None,
    };

    if let Some(action) = chosen {
        // Close first: the action may open its own overlay
        app.close_overlay();
        app.dispatch(action);
    }
}

fn handle_prompt_key(app: &mut App, key: KeyEvent) {
    let Overlay::Prompt { input, .. } = app.overlay_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc => app.close_overlay(),
        KeyCode::Backspace => {
            input.pop();
        }
        KeyCode::Char(c) => input.push(c),
        KeyCode::Enter => {
            // Rejected input stays in the prompt with its error
            let _ = app.submit_prompt();
        }
        _ => {}
    }
}

pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let pos = Position::new(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollDown => app.pane().select_next(),
        MouseEventKind::ScrollUp => app.pane().select_previous(),
        MouseEventKind::Down(button) => {
            if !matches!(app.overlay(), Overlay::None) {
                if matches!(app.overlay(), Overlay::Detail { .. }) {
                    app.close_overlay();
                }
                return;
            }

            let area = app.table_area();
            let pane = app.pane();
            let rendered = pane.rendered();

            if let Some(key) = header_hit(&rendered, area, pos) {
                if button == MouseButton::Left {
                    pane.toggle_sort(key);
                }
                return;
            }

            let Some(index) = row_hit(&rendered, area, pane.offset(), pos) else {
                return;
            };
            pane.select(index);
            match button {
                MouseButton::Left => app.dispatch(RowAction::RowClick),
                MouseButton::Right => app.open_menu(),
                MouseButton::Middle => {}
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::table::widget::column_areas;
    use crate::table::{SortDirection, SortState};
    use crate::views::View;
    use crossterm::event::{KeyEventKind, KeyEventState};
    use ratatui::layout::Rect;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn click(button: MouseButton, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(button),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn app() -> App {
        let mut app = App::new(Config::default());
        app.set_table_area(Rect::new(0, 0, 120, 20));
        app
    }

    #[test]
    fn test_number_keys_toggle_sort() {
        let mut app = app();
        handle_key(&mut app, key(KeyCode::Char('5')));
        assert_eq!(app.pane().sort_state().direction_for("value"), Some(SortDirection::Ascending));
        handle_key(&mut app, key(KeyCode::Char('5')));
        assert_eq!(app.pane().sort_state().direction_for("value"), Some(SortDirection::Descending));
        handle_key(&mut app, key(KeyCode::Char('0')));
        assert!(app.pane().sort_state().active().is_none());
    }

    #[test]
    fn test_filter_typing_does_not_trigger_shortcuts() {
        let mut app = app();
        handle_key(&mut app, key(KeyCode::Char('/')));
        handle_key(&mut app, key(KeyCode::Char('q')));
        handle_key(&mut app, key(KeyCode::Char('d')));
        assert!(!app.should_quit());
        assert_eq!(app.leads().len(), 10);
        assert_eq!(app.pane().filter().query(), "qd");

        handle_key(&mut app, key(KeyCode::Esc));
        assert!(!app.is_filtering());
        assert_eq!(app.pane().filter().query(), "");
    }

    #[test]
    fn test_menu_navigation_dispatches_choice() {
        let mut app = app();
        handle_key(&mut app, key(KeyCode::Char('m')));
        handle_key(&mut app, key(KeyCode::Down));
        handle_key(&mut app, key(KeyCode::Down));
        handle_key(&mut app, key(KeyCode::Enter));

        // Third entry is Delete
        assert_eq!(app.leads().len(), 9);
        assert_eq!(app.overlay(), &Overlay::None);
    }

    #[test]
    fn test_menu_shortcut() {
        let mut app = app();
        handle_key(&mut app, key(KeyCode::Char('m')));
        handle_key(&mut app, key(KeyCode::Char('v')));
        assert!(matches!(app.overlay(), Overlay::Detail { .. }));
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.overlay(), &Overlay::None);
    }

    #[test]
    fn test_prompt_captures_keys() {
        let mut app = app();
        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.view(), View::Orders);
        handle_key(&mut app, key(KeyCode::Char('n')));
        for c in "Acme, 5".chars() {
            handle_key(&mut app, key(KeyCode::Char(c)));
        }
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.orders().last().map(|o| o.customer.as_str()), Some("Acme"));
    }

    #[test]
    fn test_header_click_sorts_and_row_click_selects() {
        let mut app = app();
        // "#" header sits in the first column
        handle_mouse(&mut app, click(MouseButton::Left, 0, 0));
        assert_eq!(app.pane().sort_state().direction_for("id"), Some(SortDirection::Ascending));

        handle_mouse(&mut app, click(MouseButton::Left, 1, 3));
        assert_eq!(app.pane().selected(), 2);
        assert_eq!(app.last_activity(), Some("Opened lead #103"));
    }

    #[test]
    fn test_click_on_unsortable_header_is_ignored() {
        let mut app = app();
        let area = app.table_area();
        let rendered = app.pane().rendered();
        let email = rendered.headers.iter().position(|h| h.key == "email").unwrap();
        let x = column_areas(&rendered, area)[email].x;

        handle_mouse(&mut app, click(MouseButton::Left, x, area.y));

        assert_eq!(app.pane().sort_state(), &SortState::unsorted());
        assert_eq!(app.pane().selected(), 0);
        assert_eq!(app.last_activity(), None);
    }

    #[test]
    fn test_right_click_opens_menu() {
        let mut app = app();
        handle_mouse(&mut app, click(MouseButton::Right, 1, 1));
        assert!(matches!(app.overlay(), Overlay::Menu { .. }));
    }

    #[test]
    fn test_ctrl_c_quits_from_anywhere() {
        let mut app = app();
        handle_key(&mut app, key(KeyCode::Char('m')));
        handle_key(
            &mut app,
            KeyEvent {
                modifiers: KeyModifiers::CONTROL,
                ..key(KeyCode::Char('c'))
            },
        );
        assert!(app.should_quit());
    }
}
