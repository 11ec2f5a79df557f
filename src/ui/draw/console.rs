//! Main console screen: view tabs, summary, filter bar, table and status line

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::report;
use crate::table::widget::body_height;
use crate::table::{format_money, TableWidget};
use crate::ui::theme::Theme;
use crate::views::View;

pub(crate) fn draw_console(f: &mut Frame, app: &mut App, theme: &Theme) {
    let area = f.area();
    let bg_block = Block::default().style(Style::default().bg(theme.background));
    f.render_widget(bg_block, area);

    let summary_height = if app.config().behavior.show_summary { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),              // Tabs
            Constraint::Length(summary_height), // Summary
            Constraint::Length(3),              // Filter bar
            Constraint::Min(3),                 // Table
            Constraint::Length(1),              // Status bar
        ])
        .split(area);

    draw_tabs(f, app.view(), chunks[0], theme);
    if summary_height > 0 {
        draw_summary(f, app, chunks[1], theme);
    }
    draw_filter_bar(f, app, chunks[2], theme);
    draw_table(f, app, chunks[3], theme);
    draw_status_bar(f, app, chunks[4], theme);
}

fn draw_tabs(f: &mut Frame, view: View, area: Rect, theme: &Theme) {
    let selected = View::ALL.iter().position(|v| *v == view).unwrap_or(0);
    let titles = View::ALL.iter().map(|v| v.title());
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(theme.dimmed).bg(theme.background))
        .highlight_style(
            Style::default()
                .fg(theme.header)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

/// Headline figures for the active view
fn summary_spans<'a>(app: &App, theme: &Theme) -> Vec<Span<'a>> {
    let label = Style::default().fg(theme.dimmed);
    let value = Style::default().fg(theme.foreground);
    let sep = || Span::styled("  ·  ", label);

    match app.view() {
        View::Leads => {
            let leads = app.leads();
            let mut spans = vec![
                Span::styled(" Open pipeline ", label),
                Span::styled(format_money(report::open_pipeline_value(leads)), value),
            ];
            if let Some(rate) = report::win_rate(leads) {
                spans.push(sep());
                spans.push(Span::styled("Win rate ", label));
                let rate_style = Style::default().fg(theme.positive);
                spans.push(Span::styled(format!("{rate:.0}%"), rate_style));
            }
            for stage in report::pipeline(leads).into_iter().filter(|s| s.count > 0) {
                spans.push(sep());
                spans.push(Span::styled(format!("{} {}", stage.stage, stage.count), value));
            }
            spans
        }
        View::Orders => {
            let orders = app.orders();
            let mut spans = vec![
                Span::styled(" Revenue ", label),
                Span::styled(
                    format_money(report::revenue(orders)),
                    Style::default().fg(theme.positive),
                ),
            ];
            let by_status = report::orders_by_status(orders);
            for (status, count, _) in by_status.into_iter().filter(|s| s.1 > 0) {
                spans.push(sep());
                spans.push(Span::styled(format!("{status} {count}"), value));
            }
            spans
        }
        View::Inbox => {
            let messages = app.messages();
            let unread = report::unread_count(messages);
            let style = if unread > 0 {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                value
            };
            vec![
                Span::styled(format!(" {unread} unread"), style),
                Span::styled(format!(" of {} messages", messages.len()), label),
            ]
        }
    }
}

fn draw_summary(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let summary = Paragraph::new(Line::from(summary_spans(app, theme)))
        .style(Style::default().bg(theme.background));
    f.render_widget(summary, area);
}

fn draw_filter_bar(f: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let prompt = app.config().appearance.prompt.clone();
    let view = app.view();
    let editing = app.is_filtering();
    let query = app.pane().filter().query().to_string();

    let text = if editing || !query.is_empty() {
        format!("{prompt}{query}")
    } else {
        format!("{prompt}/ to filter {}s", view.noun())
    };
    let style = if editing {
        Style::default().fg(theme.foreground).bg(theme.background)
    } else {
        Style::default().fg(theme.dimmed).bg(theme.background)
    };

    let bar = Paragraph::new(text).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .title(" crm ")
            .style(Style::default().bg(theme.background)),
    );
    f.render_widget(bar, area);

    if editing {
        // +1 for the left border
        let cursor_x = area.x + 1 + prompt.width() as u16 + query.width() as u16;
        f.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn draw_table(f: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let appearance = &app.config().appearance;
    let style = theme.table_style(
        &appearance.ascending_indicator,
        &appearance.descending_indicator,
    );
    let view = app.view();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.dimmed))
        .title(format!(" {} ", view.title()))
        .style(Style::default().bg(theme.background));
    let inner = block.inner(area);
    f.render_widget(block, area);
    app.set_table_area(inner);

    let pane = app.pane();
    pane.scroll_into_view(body_height(inner));
    let rendered = pane.rendered();
    let selected = (!rendered.rows.is_empty()).then(|| pane.selected());
    let widget = TableWidget::new(&rendered, &style)
        .selected(selected)
        .offset(pane.offset());
    f.render_widget(widget, inner);

    if rendered.rows.is_empty() && inner.height > 1 {
        let empty = Paragraph::new(format!("No {}s", view.noun()))
            .style(Style::default().fg(theme.dimmed));
        f.render_widget(empty, Rect { y: inner.y + 1, height: 1, ..inner });
    }
}

fn draw_status_bar(f: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let editing = app.is_filtering();
    let pane = app.pane();
    let total = pane.visible_len();
    let position = if total == 0 { 0 } else { pane.selected() + 1 };
    let sort = pane
        .sort_state()
        .active()
        .map(|s| format!(" | sort: {} {}", s.key, s.direction))
        .unwrap_or_default();

    let left = if editing {
        format!(" {total} matches | Enter: keep | Esc: clear")
    } else {
        format!(
            " {position}/{total}{sort} | 1-9: sort | 0: unsort | /: filter | m: actions \
             | n: new | Tab: view | q: quit"
        )
    };

    let mut spans = vec![Span::raw(left)];
    if let Some(activity) = app.last_activity() {
        spans.push(Span::styled(" | ", Style::default().fg(theme.dimmed)));
        spans.push(Span::styled(activity.to_string(), Style::default().fg(theme.accent)));
    }

    let status_bar = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(theme.dimmed).bg(theme.background));
    f.render_widget(status_bar, area);
}
