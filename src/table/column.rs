//! Column descriptors and the row contract.

use ratatui::layout::Constraint;
use std::collections::BTreeMap;
use std::fmt;

use super::value::CellValue;

/// Something the table can read values out of by column key.
///
/// Unknown keys must yield [`CellValue::Empty`]; the table never panics on
/// a missing field.
pub trait Row {
    fn value(&self, key: &str) -> CellValue;
}

/// Schema-less row: string key to value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record(BTreeMap<String, CellValue>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }
}

impl Row for Record {
    fn value(&self, key: &str) -> CellValue {
        self.0.get(key).cloned().unwrap_or_default()
    }
}

type Accessor<R> = Box<dyn Fn(&R) -> CellValue>;
type Renderer<R> = Box<dyn Fn(&CellValue, &R) -> String>;

/// Declarative description of one table column.
///
/// ```ignore
/// let columns = vec![
///     Column::new("name", "Name").sortable(),
///     Column::new("value", "Value")
///         .sortable()
///         .render(|v, _| format!("~{v}")),
/// ];
/// ```
pub struct Column<R> {
    /// Field identifier, also the sort key
    pub key: String,
    /// Header text
    pub label: String,
    /// Whether activating the header toggles sort on this column
    pub sortable: bool,
    /// Layout width used by the terminal renderer
    pub width: Constraint,
    accessor: Accessor<R>,
    renderer: Option<Renderer<R>>,
}

impl<R: Row + 'static> Column<R> {
    /// Column reading `key` through the row's [`Row`] implementation
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        let key = key.into();
        let field = key.clone();
        Self::with_accessor(key, label, move |row: &R| row.value(&field))
    }
}

impl<R> Column<R> {
    /// Column with an explicit accessor, for row types without a [`Row`] impl
    pub fn with_accessor(
        key: impl Into<String>,
        label: impl Into<String>,
        accessor: impl Fn(&R) -> CellValue + 'static,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: false,
            width: Constraint::Fill(1),
            accessor: Box::new(accessor),
            renderer: None,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn width(mut self, width: Constraint) -> Self {
        self.width = width;
        self
    }

    /// Custom cell renderer; receives the raw value and the whole row
    pub fn render(mut self, renderer: impl Fn(&CellValue, &R) -> String + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    /// Raw value for `row`
    pub fn value_of(&self, row: &R) -> CellValue {
        (self.accessor)(row)
    }

    /// Display text for `row`
    pub fn cell_text(&self, row: &R) -> String {
        let value = self.value_of(row);
        match &self.renderer {
            Some(render) => render(&value, row),
            None => value.to_string(),
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("width", &self.width)
            .field("custom_render", &self.renderer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_renders_empty() {
        let col: Column<Record> = Column::new("missing", "Missing");
        let row = Record::new().with("name", "Acme");
        assert_eq!(col.value_of(&row), CellValue::Empty);
        assert_eq!(col.cell_text(&row), "");
    }

    #[test]
    fn test_renderer_receives_value_and_row() {
        let col: Column<Record> = Column::new("v", "V")
            .render(|v, row: &Record| format!("{v}/{}", row.value("unit")));
        let row = Record::new().with("v", 3i64).with("unit", "kg");
        assert_eq!(col.cell_text(&row), "3/kg");
    }

    #[test]
    fn test_explicit_accessor() {
        struct Pair {
            second: &'static str,
        }
        let col = Column::with_accessor("second", "Second", |p: &Pair| p.second.into());
        assert_eq!(col.cell_text(&Pair { second: "two" }), "two");
        assert!(!col.sortable);
    }
}
