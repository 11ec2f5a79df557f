//! Terminal renderer for [`RenderedTable`] plus mouse hit-testing.
//!
//! Drawing and hit-testing share [`column_areas`], so a click always lands
//! on the column that was drawn under the cursor.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    widgets::Widget,
};
use std::rc::Rc;
use unicode_width::UnicodeWidthStr;

use super::{RenderedTable, SortDirection};

/// Gap between columns
const COLUMN_GAP: u16 = 1;

/// Styles and markers used when drawing a table
#[derive(Debug, Clone)]
pub struct TableStyle {
    pub header: Style,
    /// Header style for sortable columns
    pub header_sortable: Style,
    pub row: Style,
    pub selected: Style,
    pub actions: Style,
    pub ascending: String,
    pub descending: String,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            header: Style::default().add_modifier(Modifier::BOLD),
            header_sortable: Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            row: Style::default(),
            selected: Style::default().add_modifier(Modifier::REVERSED),
            actions: Style::default().add_modifier(Modifier::DIM),
            ascending: "▲".to_string(),
            descending: "▼".to_string(),
        }
    }
}

/// Width constraints for every drawn column, actions column included
fn constraints(table: &RenderedTable) -> Vec<Constraint> {
    let mut widths = Vec::with_capacity(table.column_count());
    widths.extend(table.headers.iter().map(|h| h.width));
    if table.has_actions {
        let longest = table
            .rows
            .iter()
            .filter_map(|r| r.actions.as_ref())
            .map(|a| actions_text(a).width())
            .max()
            .unwrap_or(0)
            .max("Actions".len());
        widths.push(Constraint::Length(longest as u16));
    }
    widths
}

/// Horizontal slices for each column within `area` (only x/width matter)
pub fn column_areas(table: &RenderedTable, area: Rect) -> Rc<[Rect]> {
    Layout::horizontal(constraints(table))
        .spacing(COLUMN_GAP)
        .split(Rect { height: 1, ..area })
}

/// Number of body rows that fit below the header
pub fn body_height(area: Rect) -> usize {
    area.height.saturating_sub(1) as usize
}

/// Key of the column whose header is under `pos`
pub fn header_hit<'t>(table: &'t RenderedTable, area: Rect, pos: Position) -> Option<&'t str> {
    if pos.y != area.y || !area.contains(pos) {
        return None;
    }
    column_areas(table, area)
        .iter()
        .zip(&table.headers)
        .find(|(col, _)| pos.x >= col.x && pos.x < col.x + col.width)
        .map(|(_, header)| header.key.as_str())
}

/// Display index of the body row under `pos`
pub fn row_hit(table: &RenderedTable, area: Rect, offset: usize, pos: Position) -> Option<usize> {
    if !area.contains(pos) || pos.y == area.y {
        return None;
    }
    let index = offset + (pos.y - area.y - 1) as usize;
    (index < table.rows.len()).then_some(index)
}

fn actions_text(actions: &[super::RowAction]) -> String {
    actions
        .iter()
        .map(|a| a.shortcut().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Draws a [`RenderedTable`]: one header line, then body rows from `offset`
pub struct TableWidget<'a> {
    table: &'a RenderedTable,
    style: &'a TableStyle,
    selected: Option<usize>,
    offset: usize,
}

impl<'a> TableWidget<'a> {
    pub fn new(table: &'a RenderedTable, style: &'a TableStyle) -> Self {
        Self {
            table,
            style,
            selected: None,
            offset: 0,
        }
    }

    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    fn header_text(&self, label: &str, sorted: Option<SortDirection>) -> String {
        match sorted {
            Some(SortDirection::Ascending) => format!("{label} {}", self.style.ascending),
            Some(SortDirection::Descending) => format!("{label} {}", self.style.descending),
            None => label.to_string(),
        }
    }
}

impl Widget for TableWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let columns = column_areas(self.table, area);

        // Header
        for (col, header) in columns.iter().zip(&self.table.headers) {
            let style = if header.sortable {
                self.style.header_sortable
            } else {
                self.style.header
            };
            let text = self.header_text(&header.label, header.sorted);
            buf.set_stringn(col.x, area.y, text, col.width as usize, style);
        }
        if self.table.has_actions {
            if let Some(col) = columns.last() {
                buf.set_stringn(col.x, area.y, "Actions", col.width as usize, self.style.header);
            }
        }

        // Body
        let visible = body_height(area);
        let rows = self.table.rows.iter().enumerate().skip(self.offset).take(visible);
        for (line, (index, row)) in rows.enumerate() {
            let y = area.y + 1 + line as u16;
            let is_selected = self.selected == Some(index);
            let row_style = if is_selected { self.style.selected } else { self.style.row };

            if is_selected {
                buf.set_style(Rect { x: area.x, y, width: area.width, height: 1 }, row_style);
            }

            for (col, text) in columns.iter().zip(&row.cells) {
                buf.set_stringn(col.x, y, text, col.width as usize, row_style);
            }
            if let (Some(actions), Some(col)) = (&row.actions, columns.last()) {
                let style = if is_selected { row_style } else { self.style.actions };
                buf.set_stringn(col.x, y, actions_text(actions), col.width as usize, style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, Record, RowActions, Table};

    fn rendered(with_actions: bool) -> RenderedTable {
        let rows = vec![
            Record::new().with("name", "Acme").with("v", 2i64),
            Record::new().with("name", "Bolt").with("v", 1i64),
        ];
        let mut table = Table::new(vec![
            Column::new("name", "Name").sortable().width(Constraint::Length(6)),
            Column::new("v", "V").width(Constraint::Length(4)),
        ]);
        if with_actions {
            table = table.with_actions(RowActions::new().on_view(|_| {}).on_delete(|_| {}));
        }
        table.toggle_sort("name");
        table.render(&rows)
    }

    fn line(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect::<String>()
    }

    #[test]
    fn test_draws_header_with_indicator_and_rows() {
        let table = rendered(false);
        let style = TableStyle::default();
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        TableWidget::new(&table, &style).render(area, &mut buf);

        assert!(line(&buf, 0).starts_with("Name ▲ V"));
        assert!(line(&buf, 1).starts_with("Acme   2"));
        assert!(line(&buf, 2).starts_with("Bolt   1"));
    }

    #[test]
    fn test_actions_column_drawn() {
        let table = rendered(true);
        let style = TableStyle::default();
        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);
        TableWidget::new(&table, &style).render(area, &mut buf);

        assert!(line(&buf, 0).contains("Actions"));
        assert!(line(&buf, 1).contains("v d"));
    }

    #[test]
    fn test_header_hit() {
        let table = rendered(false);
        let area = Rect::new(0, 5, 20, 4);
        assert_eq!(header_hit(&table, area, Position::new(2, 5)), Some("name"));
        assert_eq!(header_hit(&table, area, Position::new(7, 5)), Some("v"));
        // Gap between columns
        assert_eq!(header_hit(&table, area, Position::new(6, 5)), None);
        // Body line is not a header
        assert_eq!(header_hit(&table, area, Position::new(2, 6)), None);
    }

    #[test]
    fn test_row_hit_respects_offset() {
        let table = rendered(false);
        let area = Rect::new(0, 0, 20, 4);
        assert_eq!(row_hit(&table, area, 0, Position::new(1, 1)), Some(0));
        assert_eq!(row_hit(&table, area, 1, Position::new(1, 1)), Some(1));
        assert_eq!(row_hit(&table, area, 0, Position::new(1, 3)), None);
        assert_eq!(row_hit(&table, area, 0, Position::new(1, 0)), None);
    }
}
