use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// A raw or payload row: an ordered sequence of string cells.
pub type Row = Vec<String>;

// ---------------------------------------------------------------------------
// Keys and origins
// ---------------------------------------------------------------------------

/// Composite key: the two identifier cells at positions 1 and 2 of a raw row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Key(pub String, pub String);

impl Key {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self(a.into(), b.into())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}

/// Which of the two sources a tagged entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Primary,
    Secondary,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}

/// Origin-qualified key. Orders origin-major, so primary entries group first.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct TaggedKey {
    pub origin: Origin,
    pub key: Key,
}

// ---------------------------------------------------------------------------
// Datasets
// ---------------------------------------------------------------------------

/// One source's rows grouped by key. Values are payload remainders
/// (cells[3..]); insertion order within a key is preserved and repeated
/// rows are kept as separate entries.
pub type Dataset = BTreeMap<Key, Vec<Row>>;

// ---------------------------------------------------------------------------
// Classification output
// ---------------------------------------------------------------------------

/// One origin-tagged collection entry: every payload row filed under a key
/// for a single source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedBlock {
    pub origin: Origin,
    pub key: Key,
    pub rows: Vec<Row>,
}

/// A pair of rows under a shared key that agree on the identity field.
/// Rows are stored length-equalized; `diff_columns` lists every index
/// where the two disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairedRow {
    pub key: Key,
    pub primary: Row,
    pub secondary: Row,
    pub diff_columns: Vec<usize>,
}

/// The four disjoint result collections of a reconciliation run, in
/// deterministic (origin, key) order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Classified {
    pub outliers: Vec<TaggedBlock>,
    pub invalids: Vec<TaggedBlock>,
    pub mismatches: Vec<TaggedBlock>,
    pub matches: Vec<PairedRow>,
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// Rectangular sheet region, 1-based inclusive on both axes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Range {
    pub first_col: u32,
    pub first_row: u32,
    pub second_col: u32,
    pub second_row: u32,
}

impl Range {
    /// Full-width range covering `values` starting at `first_row`.
    /// Width is the widest row (minimum 1 so empty rows still address a cell).
    pub fn from_values(values: &[Row], first_row: u32) -> Self {
        let width = values.iter().map(Row::len).max().unwrap_or(0).max(1) as u32;
        let height = values.len().max(1) as u32;
        Self {
            first_col: 1,
            first_row,
            second_col: width,
            second_row: first_row + height - 1,
        }
    }

    /// Shift the range down by `n` rows.
    pub fn add_rows(&mut self, n: u32) {
        self.first_row += n;
        self.second_row += n;
    }

    pub fn height(&self) -> u32 {
        self.second_row - self.first_row + 1
    }
}

/// Presentation colors used to paint result ranges. `White` entries are
/// skipped when formatting instructions are built for a sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundColor {
    Red,
    LightRed,
    Yellow,
    Orange,
    Purple,
    LightGreen,
    White,
}

impl BackgroundColor {
    pub fn rgb(&self) -> (f64, f64, f64) {
        match self {
            Self::Red => (1.0, 0.0, 0.0),
            Self::LightRed => (0.9, 0.7, 0.7),
            Self::Yellow => (1.0, 1.0, 0.0),
            Self::Orange => (1.0, 0.7, 0.0),
            Self::Purple => (0.7, 0.7, 1.0),
            Self::LightGreen => (0.7, 0.9, 0.7),
            Self::White => (1.0, 1.0, 1.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary + Result
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconSummary {
    pub mismatch_groups: usize,
    pub outlier_groups: usize,
    pub invalid_groups: usize,
    pub matches: usize,
    pub dropped_primary: usize,
    pub dropped_secondary: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub classified: Classified,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ordering_is_lexicographic_by_field() {
        let a = Key::new("10", "5");
        let b = Key::new("5", "10");
        // string ordering, not numeric
        assert!(a < b);
    }

    #[test]
    fn tagged_key_orders_origin_first() {
        let p = TaggedKey { origin: Origin::Primary, key: Key::new("9", "9") };
        let s = TaggedKey { origin: Origin::Secondary, key: Key::new("1", "1") };
        assert!(p < s);
    }

    #[test]
    fn range_from_values_uses_widest_row() {
        let values = vec![
            vec!["a".into(), "b".into()],
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
        ];
        let r = Range::from_values(&values, 3);
        assert_eq!(r, Range { first_col: 1, first_row: 3, second_col: 4, second_row: 4 });
        assert_eq!(r.height(), 2);
    }

    #[test]
    fn range_add_rows_shifts_both_edges() {
        let mut r = Range { first_col: 1, first_row: 1, second_col: 3, second_row: 2 };
        r.add_rows(4);
        assert_eq!(r.first_row, 5);
        assert_eq!(r.second_row, 6);
    }
}
