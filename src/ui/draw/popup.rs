//! Overlays drawn on top of the console

use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::table::RowAction;
use crate::ui::theme::Theme;

/// Rect of `width` x `height` centered in `area`, clipped to it
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

fn popup_block<'a>(title: String, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .title(format!(" {title} "))
        .style(Style::default().fg(theme.foreground).bg(theme.background))
}

pub(crate) fn draw_menu(f: &mut Frame, actions: &[RowAction], selected: usize, theme: &Theme) {
    let area = centered(f.area(), 24, actions.len() as u16 + 2);
    let lines: Vec<Line> = actions
        .iter()
        .enumerate()
        .map(|(i, action)| {
            let style = if i == selected {
                Style::default()
                    .fg(theme.selection_fg)
                    .bg(theme.selection_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(format!(" {} ", action.shortcut()), Style::default().fg(theme.dimmed)),
                Span::styled(action.label(), style),
            ])
        })
        .collect();

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(popup_block("Actions".to_string(), theme)), area);
}

pub(crate) fn draw_detail(f: &mut Frame, title: &str, fields: &[(String, String)], theme: &Theme) {
    let label_width = fields.iter().map(|(label, _)| label.width()).max().unwrap_or(0);
    let mut lines = Vec::with_capacity(fields.len() + 2);
    for (label, value) in fields {
        if label.is_empty() {
            // Free text such as a message body
            lines.push(Line::default());
            lines.push(Line::raw(value.clone()));
        } else {
            lines.push(Line::from(vec![
                Span::styled(format!("{label:>label_width$}  "), Style::default().fg(theme.header)),
                Span::raw(value.clone()),
            ]));
        }
    }

    let area = f.area();
    let popup = centered(area, area.width * 3 / 5, lines.len() as u16 + 4);
    let block = popup_block(title.to_string(), theme)
        .title_bottom(Line::from(" Esc: close ").right_aligned());
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

pub(crate) fn draw_prompt(
    f: &mut Frame,
    title: &str,
    input: &str,
    error: Option<&str>,
    theme: &Theme,
) {
    let area = f.area();
    let popup = centered(area, area.width * 3 / 5, 4);

    let mut lines = vec![Line::from(vec![
        Span::styled("❯ ", Style::default().fg(theme.accent)),
        Span::raw(input.to_string()),
    ])];
    lines.push(match error {
        Some(error) => Line::styled(error.to_string(), Style::default().fg(theme.negative)),
        None => Line::styled("Enter: save | Esc: cancel", Style::default().fg(theme.dimmed)),
    });

    f.render_widget(Clear, popup);
    f.render_widget(Paragraph::new(lines).block(popup_block(title.to_string(), theme)), popup);

    // +1 for the border, +2 for the marker
    let cursor_x = popup.x + 1 + 2 + input.width() as u16;
    if cursor_x < popup.right() {
        f.set_cursor_position((cursor_x, popup.y + 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_clips_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        let rect = centered(area, 10, 4);
        assert_eq!(rect, Rect::new(5, 3, 10, 4));
        assert_eq!(centered(area, 50, 50), area);
    }
}
