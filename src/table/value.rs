//! Cell values and their ordering.
//!
//! Rows hand the table a [`CellValue`] per column key. Ordering is typed:
//! numbers compare numerically, money by cents, dates chronologically and
//! text case-insensitively. Values of different kinds fall back to a fixed
//! kind rank so a mixed column still sorts deterministically.

use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fmt;

/// A single value read out of a row for one column
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// Missing field - renders as an empty cell
    #[default]
    Empty,
    Text(String),
    Number(f64),
    /// Amount in cents
    Money(i64),
    Date(NaiveDate),
    Flag(bool),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// Rank used when two values of different kinds meet in one column
    fn kind_rank(&self) -> u8 {
        match self {
            CellValue::Flag(_) => 0,
            CellValue::Number(_) => 1,
            CellValue::Money(_) => 2,
            CellValue::Date(_) => 3,
            CellValue::Text(_) => 4,
            CellValue::Empty => 5,
        }
    }

    /// Ascending ordering used by the sort engine.
    ///
    /// `Empty` orders after everything else.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Empty, CellValue::Empty) => Ordering::Equal,
            (CellValue::Number(a), CellValue::Number(b)) => a.total_cmp(b),
            (CellValue::Money(a), CellValue::Money(b)) => a.cmp(b),
            (CellValue::Date(a), CellValue::Date(b)) => a.cmp(b),
            (CellValue::Flag(a), CellValue::Flag(b)) => a.cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => compare_text(a, b),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

/// Case-insensitive comparison, falling back to byte order on ties
fn compare_text(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}

/// Format cents as `$1,234.50` (negative amounts as `-$12.00`)
pub fn format_money(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let dollars = (abs / 100).to_string();
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, c) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{sign}${grouped}.{:02}", abs % 100)
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Money(cents) => f.write_str(&format_money(*cents)),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::Flag(true) => f.write_str("yes"),
            CellValue::Flag(false) => f.write_str("no"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<u32> for CellValue {
    fn from(n: u32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Flag(b)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_compare_numerically() {
        let a = CellValue::Number(9.0);
        let b = CellValue::Number(10.0);
        assert_eq!(a.compare(&b), Ordering::Less);
    }

    #[test]
    fn test_text_is_case_insensitive() {
        let a = CellValue::text("apple");
        let b = CellValue::text("Banana");
        assert_eq!(a.compare(&b), Ordering::Less);
        // Tie broken by byte order so the comparison stays total
        assert_eq!(CellValue::text("A").compare(&CellValue::text("a")), Ordering::Less);
    }

    #[test]
    fn test_empty_orders_last() {
        let empty = CellValue::Empty;
        assert_eq!(empty.compare(&CellValue::text("z")), Ordering::Greater);
        assert_eq!(CellValue::Number(-1.0).compare(&empty), Ordering::Less);
    }

    #[test]
    fn test_mixed_kinds_use_rank() {
        // Numbers before text regardless of content
        assert_eq!(CellValue::Number(500.0).compare(&CellValue::text("1")), Ordering::Less);
    }

    #[test]
    fn test_money_format() {
        assert_eq!(format_money(0), "$0.00");
        assert_eq!(format_money(123_450), "$1,234.50");
        assert_eq!(format_money(100_000_000), "$1,000,000.00");
        assert_eq!(format_money(-1200), "-$12.00");
    }

    #[test]
    fn test_dates_compare_chronologically() {
        let leap = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let march = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(CellValue::from(leap).compare(&march.into()), Ordering::Less);
        // Dates rank after money and before text
        assert_eq!(CellValue::from(march).compare(&CellValue::Money(1)), Ordering::Greater);
        assert_eq!(CellValue::from(march).compare(&"2020".into()), Ordering::Less);
    }

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Number(3.0).to_string(), "3");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(CellValue::Date(date).to_string(), "2024-03-07");
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::from(None::<&str>), CellValue::Empty);
    }
}
