//! Generic sortable/actionable table.
//!
//! Structure:
//! - `value.rs` - Cell values and typed ordering
//! - `column.rs` - Column descriptors and the `Row` contract
//! - `sort.rs` - Sort state and the sort engine
//! - `actions.rs` - Row action callbacks
//! - `widget.rs` - Terminal renderer and hit-testing
//!
//! The table never owns rows. Callers pass the current row slice on every
//! render; the table only keeps transient view state (sort, selection,
//! scroll offset) and derives the display order from scratch each time.

pub mod actions;
pub mod column;
pub mod sort;
pub mod value;
pub mod widget;

use ratatui::layout::Constraint;

pub use actions::{RowAction, RowActions};
pub use column::{Column, Record, Row};
pub use sort::{SortDirection, SortSpec, SortState};
pub use value::{format_money, CellValue};
pub use widget::TableWidget;

/// Header cell as it should be drawn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    pub label: String,
    pub sortable: bool,
    pub width: Constraint,
    /// Set on the active sort column
    pub sorted: Option<SortDirection>,
}

/// One body row in display order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRow {
    /// Position of the row in the caller's slice
    pub source: usize,
    pub cells: Vec<String>,
    /// Menu actions for this row, present when the table has an actions column
    pub actions: Option<Vec<RowAction>>,
}

/// Output of [`Table::render`]: everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTable {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<RenderedRow>,
    pub has_actions: bool,
}

impl RenderedTable {
    /// Columns per row, counting the actions column
    pub fn column_count(&self) -> usize {
        self.headers.len() + usize::from(self.has_actions)
    }
}

/// Column model, row actions and transient view state
pub struct Table<R> {
    columns: Vec<Column<R>>,
    actions: RowActions<R>,
    sort: SortState,
    selected: usize,
    offset: usize,
}

impl<R> Table<R> {
    pub fn new(columns: Vec<Column<R>>) -> Self {
        Self {
            columns,
            actions: RowActions::default(),
            sort: SortState::unsorted(),
            selected: 0,
            offset: 0,
        }
    }

    pub fn with_actions(mut self, actions: RowActions<R>) -> Self {
        self.actions = actions;
        self
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn column(&self, key: &str) -> Option<&Column<R>> {
        self.columns.iter().find(|c| c.key == key)
    }

    pub fn actions(&self) -> &RowActions<R> {
        &self.actions
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// Toggle sort on `key`.
    ///
    /// Returns false (and leaves the state alone) for unknown or
    /// non-sortable columns.
    pub fn toggle_sort(&mut self, key: &str) -> bool {
        if !self.column(key).is_some_and(|c| c.sortable) {
            tracing::debug!("Ignoring sort toggle on non-sortable column {key:?}");
            return false;
        }
        self.sort.toggle(key);
        tracing::debug!("Sort state now {:?}", self.sort.active());
        true
    }

    /// Set sort explicitly; same rules as [`Table::toggle_sort`]
    pub fn set_sort(&mut self, key: &str, direction: SortDirection) -> bool {
        if !self.column(key).is_some_and(|c| c.sortable) {
            return false;
        }
        self.sort = SortState::by(key, direction);
        true
    }

    pub fn clear_sort(&mut self) {
        self.sort.clear();
    }

    /// Display order of all `rows` as indices into the slice
    pub fn display_order(&self, rows: &[R]) -> Vec<usize> {
        self.display_order_of(rows, (0..rows.len()).collect())
    }

    /// Display order restricted to `candidates`
    pub fn display_order_of(&self, rows: &[R], mut candidates: Vec<usize>) -> Vec<usize> {
        candidates.retain(|&i| i < rows.len());
        sort::sort_indices(rows, &self.columns, &self.sort, &mut candidates);
        candidates
    }

    pub fn render(&self, rows: &[R]) -> RenderedTable {
        self.render_subset(rows, (0..rows.len()).collect())
    }

    pub fn render_subset(&self, rows: &[R], candidates: Vec<usize>) -> RenderedTable {
        let headers = self
            .columns
            .iter()
            .map(|c| HeaderCell {
                key: c.key.clone(),
                label: c.label.clone(),
                sortable: c.sortable,
                width: c.width,
                sorted: self.sort.direction_for(&c.key),
            })
            .collect();

        let has_actions = self.actions.has_menu();
        let menu = self.actions.menu();

        let body = self
            .display_order_of(rows, candidates)
            .into_iter()
            .map(|i| RenderedRow {
                source: i,
                cells: self.columns.iter().map(|c| c.cell_text(&rows[i])).collect(),
                actions: has_actions.then(|| menu.clone()),
            })
            .collect();

        RenderedTable {
            headers,
            rows: body,
            has_actions,
        }
    }

    /// Invoke `action` for the row at `source` (an index into `rows`).
    ///
    /// Returns false when the index is out of range or no callback is set.
    pub fn dispatch(&mut self, action: RowAction, rows: &[R], source: usize) -> bool {
        let Some(row) = rows.get(source) else {
            return false;
        };
        let handled = self.actions.invoke(action, row);
        if handled {
            tracing::debug!("Dispatched {:?} for row {}", action, source);
        }
        handled
    }

    // Selection is kept in display coordinates

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn select(&mut self, index: usize, len: usize) {
        self.selected = index.min(len.saturating_sub(1));
    }

    pub fn select_next(&mut self, len: usize) {
        if self.selected < len.saturating_sub(1) {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self, len: usize) {
        self.selected = len.saturating_sub(1);
    }

    /// Reset selection if the visible row count shrank below it
    pub fn clamp_selection(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    /// Scroll so the selection stays inside a viewport of `height` rows
    pub fn scroll_into_view(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected + 1 - height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sample() -> Vec<Record> {
        vec![
            Record::new().with("name", "Cobalt").with("v", 3i64),
            Record::new().with("name", "amber").with("v", 1i64),
            Record::new().with("name", "Birch").with("v", 2i64),
        ]
    }

    fn columns() -> Vec<Column<Record>> {
        vec![
            Column::new("name", "Name").sortable(),
            Column::new("v", "V").sortable(),
            Column::new("note", "Note"),
        ]
    }

    fn column_texts(t: &RenderedTable, col: usize) -> Vec<String> {
        t.rows.iter().map(|r| r.cells[col].clone()).collect()
    }

    #[test]
    fn test_render_shape_without_actions() {
        let table = Table::new(columns());
        let out = table.render(&sample());
        assert_eq!(out.rows.len(), 3);
        assert_eq!(out.column_count(), 3);
        assert!(out.rows.iter().all(|r| r.cells.len() == 3 && r.actions.is_none()));
    }

    #[test]
    fn test_render_shape_with_actions() {
        let table = Table::new(columns()).with_actions(RowActions::new().on_view(|_| {}));
        let out = table.render(&sample());
        assert_eq!(out.column_count(), 4);
        assert_eq!(out.rows[0].actions, Some(vec![RowAction::View]));
    }

    #[test]
    fn test_empty_rows() {
        let table = Table::new(columns());
        let out = table.render(&[]);
        assert!(out.rows.is_empty());
        assert_eq!(out.headers.len(), 3);
    }

    #[test]
    fn test_toggle_sort_orders_rows() {
        let rows = sample();
        let mut table = Table::new(columns());
        assert_eq!(column_texts(&table.render(&rows), 1), ["3", "1", "2"]);

        assert!(table.toggle_sort("v"));
        assert_eq!(column_texts(&table.render(&rows), 1), ["1", "2", "3"]);
        assert!(table.toggle_sort("v"));
        assert_eq!(column_texts(&table.render(&rows), 1), ["3", "2", "1"]);
        assert!(table.toggle_sort("v"));
        assert_eq!(column_texts(&table.render(&rows), 1), ["1", "2", "3"]);
    }

    #[test]
    fn test_text_sort_ignores_case() {
        let rows = sample();
        let mut table = Table::new(columns());
        table.toggle_sort("name");
        assert_eq!(column_texts(&table.render(&rows), 0), ["amber", "Birch", "Cobalt"]);
    }

    #[test]
    fn test_non_sortable_column_never_changes_state() {
        let mut table = Table::new(columns());
        assert!(!table.toggle_sort("note"));
        assert_eq!(table.sort_state(), &SortState::unsorted());

        table.toggle_sort("v");
        let before = table.sort_state().clone();
        assert!(!table.toggle_sort("note"));
        assert!(!table.toggle_sort("nope"));
        assert_eq!(table.sort_state(), &before);
    }

    #[test]
    fn test_header_marks_active_sort() {
        let mut table = Table::new(columns());
        table.set_sort("v", SortDirection::Descending);
        let out = table.render(&sample());
        assert_eq!(out.headers[1].sorted, Some(SortDirection::Descending));
        assert_eq!(out.headers[0].sorted, None);
        assert!(!out.headers[2].sortable);
    }

    #[test]
    fn test_custom_renderer_used_for_cells() {
        let cols = vec![Column::new("v", "V")
            .render(|v, row: &Record| format!("{v}:{}", row.value("name")))];
        let table = Table::new(cols);
        let out = table.render(&sample());
        assert_eq!(column_texts(&out, 0), ["3:Cobalt", "1:amber", "2:Birch"]);
    }

    #[test]
    fn test_display_order_is_recomputed_from_input() {
        let mut rows = sample();
        let mut table = Table::new(columns());
        table.toggle_sort("v");
        assert_eq!(table.display_order(&rows), [1, 2, 0]);

        rows.push(Record::new().with("name", "Dune").with("v", 0i64));
        assert_eq!(table.display_order(&rows), [3, 1, 2, 0]);

        table.clear_sort();
        assert_eq!(table.display_order(&rows), [0, 1, 2, 3]);
    }

    #[test]
    fn test_render_subset_keeps_only_candidates() {
        let rows = sample();
        let mut table = Table::new(columns());
        table.toggle_sort("v");
        let out = table.render_subset(&rows, vec![0, 2, 99]);
        assert_eq!(out.rows.iter().map(|r| r.source).collect::<Vec<_>>(), [2, 0]);
    }

    #[test]
    fn test_delete_receives_row_without_mutation() {
        let rows = sample();
        let snapshot = rows.clone();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut table = Table::new(columns())
            .with_actions(
                RowActions::new().on_delete(move |r: &Record| sink.borrow_mut().push(r.clone())),
            );

        assert!(table.dispatch(RowAction::Delete, &rows, 1));
        assert!(!table.dispatch(RowAction::Delete, &rows, 10));
        assert!(!table.dispatch(RowAction::Edit, &rows, 0));

        assert_eq!(*seen.borrow(), vec![snapshot[1].clone()]);
        assert_eq!(rows, snapshot);
    }

    #[test]
    fn test_selection_and_scrolling() {
        let mut table: Table<Record> = Table::new(columns());
        table.select_next(3);
        table.select_next(3);
        table.select_next(3);
        assert_eq!(table.selected(), 2);

        table.scroll_into_view(2);
        assert_eq!(table.offset(), 1);

        table.clamp_selection(1);
        assert_eq!(table.selected(), 0);
        table.scroll_into_view(2);
        assert_eq!(table.offset(), 0);
    }
}
