//! The three console views and their column models.
//!
//! Each view is a [`Pane`]: its own rows, table state and filter. Row
//! action callbacks never touch application state directly; they send an
//! [`Intent`] over a channel that the app drains after each dispatch.

use clap::ValueEnum;
use ratatui::layout::Constraint;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc::UnboundedSender;

use crate::data::{Direction, Entity, Lead, Message, Order, Searchable};
use crate::filter::Filter;
use crate::table::{Column, RenderedTable, RowAction, RowActions, SortState, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Leads,
    Orders,
    Inbox,
}

impl View {
    pub const ALL: [View; 3] = [View::Leads, View::Orders, View::Inbox];

    pub fn title(self) -> &'static str {
        match self {
            View::Leads => "Leads",
            View::Orders => "Orders",
            View::Inbox => "Inbox",
        }
    }

    /// Singular name of a row in this view
    pub fn noun(self) -> &'static str {
        match self {
            View::Leads => "lead",
            View::Orders => "order",
            View::Inbox => "message",
        }
    }

    pub fn next(self) -> Self {
        match self {
            View::Leads => View::Orders,
            View::Orders => View::Inbox,
            View::Inbox => View::Leads,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            View::Leads => View::Inbox,
            View::Orders => View::Leads,
            View::Inbox => View::Orders,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title().to_lowercase())
    }
}

/// A row action raised by a table callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Intent {
    pub view: View,
    pub action: RowAction,
    pub id: u32,
}

/// One view's data plus its table and filter state
pub struct Pane<R> {
    pub rows: Vec<R>,
    pub table: Table<R>,
    pub filter: Filter,
}

impl<R: Searchable> Pane<R> {
    pub fn new(rows: Vec<R>, table: Table<R>) -> Self {
        Self {
            rows,
            table,
            filter: Filter::new(),
        }
    }

    /// Indices into `rows`, filtered then sorted
    pub fn visible(&mut self) -> Vec<usize> {
        if self.filter.query().trim().is_empty() {
            return self.table.display_order(&self.rows);
        }
        let candidates = self.filter.matching(&self.rows);
        self.table.display_order_of(&self.rows, candidates)
    }

    pub fn selected_row(&mut self) -> Option<&R> {
        let source = *self.visible().get(self.table.selected())?;
        self.rows.get(source)
    }

    /// Apply a sort change, then move the selection to wherever the
    /// previously selected row ended up
    fn resort(&mut self, change: impl FnOnce(&mut Table<R>) -> bool) -> bool {
        let source = self.visible().get(self.table.selected()).copied();
        if !change(&mut self.table) {
            return false;
        }
        if let Some(source) = source {
            let order = self.visible();
            let index = order.iter().position(|&i| i == source).unwrap_or(0);
            self.table.select(index, order.len());
        }
        true
    }
}

/// Object-safe view of a [`Pane`], so the app can drive whichever view is active
pub trait ViewPane {
    fn rendered(&mut self) -> RenderedTable;
    fn visible_len(&mut self) -> usize;
    fn filter(&self) -> &Filter;
    fn filter_mut(&mut self) -> &mut Filter;
    fn sort_state(&self) -> &SortState;
    fn toggle_sort(&mut self, key: &str) -> bool;
    fn clear_sort(&mut self);
    fn sortable_keys(&self) -> Vec<String>;
    fn menu(&self) -> Vec<RowAction>;
    fn selected(&self) -> usize;
    fn offset(&self) -> usize;
    fn select(&mut self, index: usize);
    fn select_next(&mut self);
    fn select_previous(&mut self);
    fn select_first(&mut self);
    fn select_last(&mut self);
    fn scroll_into_view(&mut self, height: usize);
    /// Re-clamp selection after rows or filter changed
    fn refresh(&mut self);
    /// Run `action` on the selected row; false if nothing handled it
    fn dispatch_selected(&mut self, action: RowAction) -> bool;
}

impl<R: Searchable> ViewPane for Pane<R> {
    fn rendered(&mut self) -> RenderedTable {
        let candidates = self.filter.matching(&self.rows);
        self.table.render_subset(&self.rows, candidates)
    }

    fn visible_len(&mut self) -> usize {
        self.filter.matching(&self.rows).len()
    }

    fn filter(&self) -> &Filter {
        &self.filter
    }

    fn filter_mut(&mut self) -> &mut Filter {
        &mut self.filter
    }

    fn sort_state(&self) -> &SortState {
        self.table.sort_state()
    }

    fn toggle_sort(&mut self, key: &str) -> bool {
        self.resort(|table| table.toggle_sort(key))
    }

    fn clear_sort(&mut self) {
        self.resort(|table| {
            table.clear_sort();
            true
        });
    }

    fn sortable_keys(&self) -> Vec<String> {
        self.table
            .columns()
            .iter()
            .filter(|c| c.sortable)
            .map(|c| c.key.clone())
            .collect()
    }

    fn menu(&self) -> Vec<RowAction> {
        self.table.actions().menu()
    }

    fn selected(&self) -> usize {
        self.table.selected()
    }

    fn offset(&self) -> usize {
        self.table.offset()
    }

    fn select(&mut self, index: usize) {
        let len = self.visible_len();
        self.table.select(index, len);
    }

    fn select_next(&mut self) {
        let len = self.visible_len();
        self.table.select_next(len);
    }

    fn select_previous(&mut self) {
        self.table.select_previous();
    }

    fn select_first(&mut self) {
        self.table.select_first();
    }

    fn select_last(&mut self) {
        let len = self.visible_len();
        self.table.select_last(len);
    }

    fn scroll_into_view(&mut self, height: usize) {
        self.table.scroll_into_view(height);
    }

    fn refresh(&mut self) {
        let len = self.visible_len();
        self.table.clamp_selection(len);
    }

    fn dispatch_selected(&mut self, action: RowAction) -> bool {
        let Some(&source) = self.visible().get(self.table.selected()) else {
            return false;
        };
        self.table.dispatch(action, &self.rows, source)
    }
}

/// Callback that forwards `action` on a row as an [`Intent`]
fn forward<R: Entity + 'static>(
    tx: &UnboundedSender<Intent>,
    view: View,
    action: RowAction,
) -> impl FnMut(&R) + 'static {
    let tx = tx.clone();
    move |row: &R| {
        let intent = Intent {
            view,
            action,
            id: row.id(),
        };
        if tx.send(intent).is_err() {
            tracing::warn!("Dropped {:?}: intent channel closed", intent);
        }
    }
}

fn actions<R: Entity + 'static>(
    tx: Option<&UnboundedSender<Intent>>,
    view: View,
    menu: &[RowAction],
) -> RowActions<R> {
    let Some(tx) = tx else {
        return RowActions::new();
    };
    let mut actions = RowActions::new().on_row_click(forward(tx, view, RowAction::RowClick));
    for action in menu {
        actions = match action {
            RowAction::View => actions.on_view(forward(tx, view, RowAction::View)),
            RowAction::Edit => actions.on_edit(forward(tx, view, RowAction::Edit)),
            RowAction::Delete => actions.on_delete(forward(tx, view, RowAction::Delete)),
            RowAction::RowClick => actions,
        };
    }
    actions
}

pub fn lead_columns() -> Vec<Column<Lead>> {
    vec![
        Column::new("id", "#").sortable().width(Constraint::Length(4)),
        Column::new("name", "Name").sortable().width(Constraint::Min(14)),
        Column::new("company", "Company").sortable().width(Constraint::Min(18)),
        Column::new("stage", "Stage")
            .sortable()
            .width(Constraint::Length(10))
            .render(|_, lead: &Lead| lead.stage.label().to_string()),
        Column::new("value", "Value").sortable().width(Constraint::Length(14)),
        Column::new("owner", "Owner").sortable().width(Constraint::Length(8)),
        Column::new("created", "Created").sortable().width(Constraint::Length(10)),
        Column::new("email", "Email").width(Constraint::Fill(1)),
    ]
}

pub fn order_columns() -> Vec<Column<Order>> {
    vec![
        Column::new("id", "Order").sortable().width(Constraint::Length(6)),
        Column::new("customer", "Customer").sortable().width(Constraint::Min(18)),
        Column::new("status", "Status").sortable().width(Constraint::Length(10)),
        Column::new("items", "Items").sortable().width(Constraint::Length(5)),
        Column::new("total", "Total").sortable().width(Constraint::Length(14)),
        Column::new("placed", "Placed").sortable().width(Constraint::Length(10)),
    ]
}

pub fn message_columns() -> Vec<Column<Message>> {
    vec![
        Column::new("read", "")
            .sortable()
            .width(Constraint::Length(2))
            .render(|_, m: &Message| match (m.direction, m.read) {
                (Direction::Outgoing, _) => "→".to_string(),
                (Direction::Incoming, false) => "●".to_string(),
                (Direction::Incoming, true) => String::new(),
            }),
        Column::new("contact", "Contact").sortable().width(Constraint::Length(16)),
        Column::new("subject", "Subject").sortable().width(Constraint::Fill(1)),
        Column::new("received", "Date").sortable().width(Constraint::Length(10)),
    ]
}

pub fn leads_pane(rows: Vec<Lead>, tx: Option<&UnboundedSender<Intent>>) -> Pane<Lead> {
    let menu = [RowAction::View, RowAction::Edit, RowAction::Delete];
    let table = Table::new(lead_columns()).with_actions(actions(tx, View::Leads, &menu));
    Pane::new(rows, table)
}

pub fn orders_pane(rows: Vec<Order>, tx: Option<&UnboundedSender<Intent>>) -> Pane<Order> {
    let menu = [RowAction::View, RowAction::Edit, RowAction::Delete];
    let table = Table::new(order_columns()).with_actions(actions(tx, View::Orders, &menu));
    Pane::new(rows, table)
}

pub fn inbox_pane(rows: Vec<Message>, tx: Option<&UnboundedSender<Intent>>) -> Pane<Message> {
    // Messages are not editable; replies go through the prompt
    let menu = [RowAction::View, RowAction::Delete];
    let table = Table::new(message_columns()).with_actions(actions(tx, View::Inbox, &menu));
    Pane::new(rows, table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{sample_leads, sample_messages, Stage};
    use crate::table::SortDirection;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn test_stage_column_renders_label_sorts_by_pipeline() {
        let mut pane = leads_pane(sample_leads(), None);
        assert!(pane.toggle_sort("stage"));
        let out = pane.rendered();
        let stage_col = out.headers.iter().position(|h| h.key == "stage").unwrap();
        assert_eq!(out.rows.first().unwrap().cells[stage_col], "New");
        assert_eq!(out.rows.last().unwrap().cells[stage_col], "Lost");
    }

    #[test]
    fn test_headless_pane_has_no_actions_column() {
        let mut pane = leads_pane(sample_leads(), None);
        let out = pane.rendered();
        assert!(!out.has_actions);
        assert_eq!(out.column_count(), lead_columns().len());
    }

    #[test]
    fn test_email_is_not_sortable() {
        let mut pane = leads_pane(sample_leads(), None);
        assert!(!pane.toggle_sort("email"));
        assert_eq!(pane.sort_state(), &SortState::unsorted());
        assert!(!pane.sortable_keys().contains(&"email".to_string()));
    }

    #[test]
    fn test_filter_then_sort() {
        let mut pane = leads_pane(sample_leads(), None);
        pane.filter_mut().push('J');
        pane.filter_mut().push('o');
        pane.filter_mut().push('r');
        pane.table.set_sort("value", SortDirection::Descending);
        let ids: Vec<u32> = pane.visible().iter().map(|&i| pane.rows[i].id).collect();
        // Jordan's leads by value, highest first
        assert_eq!(ids, vec![109, 101, 104]);
    }

    #[test]
    fn test_dispatch_selected_sends_intent() {
        let (tx, mut rx) = unbounded_channel();
        let mut pane = leads_pane(sample_leads(), Some(&tx));
        pane.table.set_sort("value", SortDirection::Ascending);
        pane.select(0);
        assert!(pane.dispatch_selected(RowAction::Edit));

        let intent = rx.try_recv().unwrap();
        assert_eq!(intent, Intent { view: View::Leads, action: RowAction::Edit, id: 107 });
        // Callback only reports; the row itself is unchanged
        assert_eq!(pane.rows.iter().find(|l| l.id == 107).unwrap().stage, Stage::New);
    }

    #[test]
    fn test_inbox_menu_has_no_edit() {
        let (tx, _rx) = unbounded_channel();
        let pane = inbox_pane(sample_messages(), Some(&tx));
        assert_eq!(pane.menu(), vec![RowAction::View, RowAction::Delete]);
    }

    #[test]
    fn test_selected_row_follows_display_order() {
        let mut pane = leads_pane(sample_leads(), None);
        pane.table.set_sort("id", SortDirection::Descending);
        pane.select(0);
        assert_eq!(pane.selected_row().map(|l| l.id), Some(110));
    }

    #[test]
    fn test_sort_change_keeps_selected_row() {
        let mut pane = leads_pane(sample_leads(), None);
        pane.select(2);
        assert_eq!(pane.selected_row().map(|l| l.id), Some(103));

        assert!(pane.toggle_sort("value"));
        assert_eq!(pane.selected(), 8);
        assert_eq!(pane.selected_row().map(|l| l.id), Some(103));

        assert!(pane.toggle_sort("value"));
        assert_eq!(pane.selected(), 1);

        pane.clear_sort();
        assert_eq!(pane.selected(), 2);
        assert_eq!(pane.selected_row().map(|l| l.id), Some(103));
    }

    #[test]
    fn test_rejected_sort_leaves_selection() {
        let mut pane = leads_pane(sample_leads(), None);
        pane.select(4);
        assert!(!pane.toggle_sort("email"));
        assert_eq!(pane.selected(), 4);
    }

    #[test]
    fn test_view_cycle() {
        for view in View::ALL {
            assert_eq!(view.next().previous(), view);
        }
        assert_eq!(View::Inbox.to_string(), "inbox");
    }
}
