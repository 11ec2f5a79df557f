//! Headless output for `crm print`.

use anyhow::{bail, Result};
use clap::ValueEnum;
use serde_json::{Map, Value};
use unicode_width::UnicodeWidthStr;

use crate::data::{self, Searchable};
use crate::filter::Filter;
use crate::table::{RenderedTable, SortDirection, SortSpec};
use crate::views::{self, Pane, View, ViewPane};

/// Gap between text columns
const GAP: &str = "  ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Json,
}

pub fn export(table: &RenderedTable, format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(to_text(table)),
        Format::Json => to_json(table),
    }
}

/// Render one view of the sample data without a terminal.
///
/// No row actions are attached, so the output has no actions column.
pub fn render_view(
    view: View,
    sort: Option<&SortSpec>,
    query: Option<&str>,
) -> Result<RenderedTable> {
    match view {
        View::Leads => {
            let pane = views::leads_pane(data::sample_leads(), None);
            render_pane(pane, view, sort, query)
        }
        View::Orders => {
            let pane = views::orders_pane(data::sample_orders(), None);
            render_pane(pane, view, sort, query)
        }
        View::Inbox => {
            let pane = views::inbox_pane(data::sample_messages(), None);
            render_pane(pane, view, sort, query)
        }
    }
}

fn render_pane<R: Searchable>(
    mut pane: Pane<R>,
    view: View,
    sort: Option<&SortSpec>,
    query: Option<&str>,
) -> Result<RenderedTable> {
    if let Some(spec) = sort {
        if !pane.table.set_sort(&spec.key, spec.direction) {
            bail!("Column {:?} is not sortable in {view}", spec.key);
        }
    }
    match query {
        Some(query) => {
            pane.filter = Filter::with_query(query);
            Ok(pane.rendered())
        }
        None => Ok(pane.table.render(&pane.rows)),
    }
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

/// Aligned plain-text table; the sorted column's header carries `^` or `v`
pub fn to_text(table: &RenderedTable) -> String {
    let headers: Vec<String> = table
        .headers
        .iter()
        .map(|h| match h.sorted {
            Some(SortDirection::Ascending) => format!("{} ^", h.label),
            Some(SortDirection::Descending) => format!("{} v", h.label),
            None => h.label.clone(),
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            table
                .rows
                .iter()
                .filter_map(|r| r.cells.get(i))
                .map(|c| c.width())
                .chain(std::iter::once(header.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |cells: &[String]| {
        let padded: Vec<String> = cells.iter().zip(&widths).map(|(c, w)| pad(c, *w)).collect();
        padded.join(GAP).trim_end().to_string()
    };

    let mut out = line(&headers);
    out.push('\n');
    for row in &table.rows {
        out.push_str(&line(&row.cells));
        out.push('\n');
    }
    out
}

/// Array of `{column key: rendered cell}` objects in display order
pub fn to_json(table: &RenderedTable) -> Result<String> {
    let rows: Vec<Value> = table
        .rows
        .iter()
        .map(|row| {
            let object: Map<String, Value> = table
                .headers
                .iter()
                .zip(&row.cells)
                .map(|(h, cell)| (h.key.clone(), Value::String(cell.clone())))
                .collect();
            Value::Object(object)
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Column, Record, Table};

    fn rendered() -> RenderedTable {
        let rows = vec![
            Record::new().with("name", "Bolt").with("v", 12i64),
            Record::new().with("name", "Acme Widgets").with("v", 3i64),
        ];
        let mut table = Table::new(vec![
            Column::new("name", "Name").sortable(),
            Column::new("v", "V").sortable(),
        ]);
        table.toggle_sort("name");
        table.render(&rows)
    }

    #[test]
    fn test_text_is_aligned() {
        let text = to_text(&rendered());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Name ^        V", "Acme Widgets  3", "Bolt          12"]);
    }

    #[test]
    fn test_json_keeps_display_order() {
        let json = to_json(&rendered()).unwrap();
        let parsed: Vec<Map<String, Value>> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["name"], "Acme Widgets");
        assert_eq!(parsed[1]["v"], "12");
    }

    #[test]
    fn test_render_view_sorted_and_filtered() {
        let spec: SortSpec = "value:desc".parse().unwrap();
        let table = render_view(View::Leads, Some(&spec), Some("Jordan")).unwrap();
        assert!(!table.has_actions);
        let ids: Vec<&str> = table.rows.iter().map(|r| r.cells[0].as_str()).collect();
        assert_eq!(ids, vec!["109", "101", "104"]);
    }

    #[test]
    fn test_render_view_without_filter_keeps_every_row() {
        let spec: SortSpec = "placed".parse().unwrap();
        let table = render_view(View::Orders, Some(&spec), None).unwrap();
        let ids: Vec<&str> = table.rows.iter().map(|r| r.cells[0].as_str()).collect();
        assert_eq!(ids, vec!["5001", "5006", "5005", "5002", "5004", "5003", "5007"]);
    }

    #[test]
    fn test_render_view_rejects_unsortable_column() {
        let spec: SortSpec = "email".parse().unwrap();
        assert!(render_view(View::Leads, Some(&spec), None).is_err());
        let spec: SortSpec = "nope".parse().unwrap();
        assert!(render_view(View::Orders, Some(&spec), None).is_err());
    }

    #[test]
    fn test_empty_table_prints_header_only() {
        let table = Table::<Record>::new(vec![Column::new("name", "Name")]).render(&[]);
        assert_eq!(to_text(&table), "Name\n");
        assert_eq!(to_json(&table).unwrap(), "[]");
    }
}
