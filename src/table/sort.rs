//! Single-key sort state and the sort engine.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::column::Column;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => f.write_str("asc"),
            SortDirection::Descending => f.write_str("desc"),
        }
    }
}

/// The active sort column and its direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub key: String,
    pub direction: SortDirection,
}

/// Current sort selection; `None` keeps input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState(Option<SortKey>);

impl SortState {
    pub fn unsorted() -> Self {
        Self(None)
    }

    pub fn by(key: impl Into<String>, direction: SortDirection) -> Self {
        Self(Some(SortKey {
            key: key.into(),
            direction,
        }))
    }

    pub fn active(&self) -> Option<&SortKey> {
        self.0.as_ref()
    }

    /// Direction if `key` is the active sort column
    pub fn direction_for(&self, key: &str) -> Option<SortDirection> {
        self.0
            .as_ref()
            .filter(|s| s.key == key)
            .map(|s| s.direction)
    }

    /// Same key flips direction, a new key starts ascending
    pub fn toggle(&mut self, key: &str) {
        self.0 = Some(match self.0.take() {
            Some(current) if current.key == key => SortKey {
                direction: current.direction.flipped(),
                ..current
            },
            _ => SortKey {
                key: key.to_string(),
                direction: SortDirection::Ascending,
            },
        });
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

/// Orders `indices` (positions into `rows`) according to `state`.
///
/// Uses a stable sort; descending reverses the comparator so rows with
/// equal keys keep their input order in both directions. An active key that
/// names no column leaves the order untouched.
pub fn sort_indices<R>(
    rows: &[R],
    columns: &[Column<R>],
    state: &SortState,
    indices: &mut [usize],
) {
    let Some(active) = state.active() else {
        return;
    };
    let Some(column) = columns.iter().find(|c| c.key == active.key) else {
        return;
    };

    // Read each value once rather than per comparison
    let mut keyed: Vec<_> = indices
        .iter()
        .map(|&i| (i, column.value_of(&rows[i])))
        .collect();
    keyed.sort_by(|a, b| active.direction.apply(a.1.compare(&b.1)));

    for (slot, (i, _)) in indices.iter_mut().zip(keyed) {
        *slot = i;
    }
}

/// Error parsing a `key[:asc|desc]` sort spec
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortSpecError {
    #[error("empty sort key")]
    EmptyKey,
    #[error("unknown sort direction '{0}' (expected asc or desc)")]
    BadDirection(String),
}

/// Parsed `key[:asc|desc]` from the command line or config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub key: String,
    pub direction: SortDirection,
}

impl FromStr for SortSpec {
    type Err = SortSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, dir) = match s.split_once(':') {
            Some((key, dir)) => (key.trim(), Some(dir.trim())),
            None => (s.trim(), None),
        };
        if key.is_empty() {
            return Err(SortSpecError::EmptyKey);
        }
        let direction = match dir.map(str::to_lowercase).as_deref() {
            None | Some("asc") | Some("ascending") => SortDirection::Ascending,
            Some("desc") | Some("descending") => SortDirection::Descending,
            Some(other) => return Err(SortSpecError::BadDirection(other.to_string())),
        };
        Ok(Self {
            key: key.to_string(),
            direction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::column::Record;

    fn rows(values: &[i64]) -> Vec<Record> {
        values.iter().map(|v| Record::new().with("v", *v)).collect()
    }

    fn ordered(rows: &[Record], state: &SortState) -> Vec<String> {
        let columns = vec![Column::new("v", "V").sortable()];
        let mut idx: Vec<usize> = (0..rows.len()).collect();
        sort_indices(rows, &columns, state, &mut idx);
        idx.iter().map(|&i| columns[0].cell_text(&rows[i])).collect()
    }

    #[test]
    fn test_ascending_and_descending() {
        let data = rows(&[3, 1, 2]);
        assert_eq!(ordered(&data, &SortState::by("v", SortDirection::Ascending)), ["1", "2", "3"]);
        assert_eq!(ordered(&data, &SortState::by("v", SortDirection::Descending)), ["3", "2", "1"]);
    }

    #[test]
    fn test_unsorted_keeps_input_order() {
        let data = rows(&[3, 1, 2]);
        assert_eq!(ordered(&data, &SortState::unsorted()), ["3", "1", "2"]);
    }

    #[test]
    fn test_toggle_cycles_two_states() {
        let mut state = SortState::unsorted();
        state.toggle("v");
        assert_eq!(state.direction_for("v"), Some(SortDirection::Ascending));
        state.toggle("v");
        assert_eq!(state.direction_for("v"), Some(SortDirection::Descending));
        state.toggle("v");
        assert_eq!(state.direction_for("v"), Some(SortDirection::Ascending));
    }

    #[test]
    fn test_new_key_resets_to_ascending() {
        let mut state = SortState::by("a", SortDirection::Descending);
        state.toggle("b");
        assert_eq!(state.direction_for("b"), Some(SortDirection::Ascending));
        assert_eq!(state.direction_for("a"), None);
    }

    #[test]
    fn test_equal_keys_stay_stable_both_ways() {
        let data: Vec<Record> = ["x", "y", "z"]
            .iter()
            .map(|id| Record::new().with("v", 1i64).with("id", *id))
            .collect();
        let columns = vec![Column::new("v", "V").sortable()];
        for dir in [SortDirection::Ascending, SortDirection::Descending] {
            let mut idx = vec![0, 1, 2];
            sort_indices(&data, &columns, &SortState::by("v", dir), &mut idx);
            assert_eq!(idx, [0, 1, 2]);
        }
    }

    #[test]
    fn test_empty_values_sort_last_ascending() {
        let data = vec![
            Record::new(),
            Record::new().with("v", 2i64),
            Record::new().with("v", 1i64),
        ];
        assert_eq!(ordered(&data, &SortState::by("v", SortDirection::Ascending)), ["1", "2", ""]);
        assert_eq!(ordered(&data, &SortState::by("v", SortDirection::Descending)), ["", "2", "1"]);
    }

    #[test]
    fn test_parse_sort_spec() {
        assert_eq!(
            "value:desc".parse::<SortSpec>(),
            Ok(SortSpec { key: "value".into(), direction: SortDirection::Descending })
        );
        assert_eq!("name".parse::<SortSpec>().map(|s| s.direction), Ok(SortDirection::Ascending));
        assert_eq!(":asc".parse::<SortSpec>(), Err(SortSpecError::EmptyKey));
        assert!(matches!("v:sideways".parse::<SortSpec>(), Err(SortSpecError::BadDirection(_))));
    }
}
