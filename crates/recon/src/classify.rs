use tracing::error;

use crate::error::ReconError;
use crate::model::Row;

/// Outcome of key validation for one raw row.
///
/// `Dropped` rows are logged and excluded from all further processing;
/// `Invalid` rows are retained and tagged, never discarded silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Valid,
    Invalid,
    Dropped,
}

/// Default key rule: both identifier fields empty is a dropped row;
/// both parsing as integers is valid; anything else is invalid.
/// (A single empty field does not parse, so it lands in Invalid.)
pub fn integer_key_rule(a: &str, b: &str) -> Classification {
    if a.is_empty() && b.is_empty() {
        return Classification::Dropped;
    }
    if a.parse::<i64>().is_ok() && b.parse::<i64>().is_ok() {
        Classification::Valid
    } else {
        Classification::Invalid
    }
}

/// Rows of one source split by key validity. Dropped rows are counted,
/// not kept.
#[derive(Debug, Default)]
pub struct Partition {
    pub valid: Vec<Row>,
    pub invalid: Vec<Row>,
    pub dropped: usize,
}

/// Partition rows with the default integer key rule.
pub fn partition_rows(rows: Vec<Row>) -> Result<Partition, ReconError> {
    partition_rows_with(rows, integer_key_rule)
}

/// Partition rows with a caller-supplied key rule. A row shorter than
/// 3 cells is a structural error and aborts the run; key-level problems
/// never escape as errors. Every dropped row emits exactly one log line.
pub fn partition_rows_with(
    rows: Vec<Row>,
    rule: impl Fn(&str, &str) -> Classification,
) -> Result<Partition, ReconError> {
    let mut partition = Partition::default();

    for (index, row) in rows.into_iter().enumerate() {
        if row.len() < 3 {
            return Err(ReconError::RowTooShort { index, len: row.len() });
        }
        match rule(&row[1], &row[2]) {
            Classification::Valid => partition.valid.push(row),
            Classification::Invalid => partition.invalid.push(row),
            Classification::Dropped => {
                error!(
                    index,
                    field_a = %row[1],
                    field_b = %row[2],
                    "dropping row: unusable key fields"
                );
                partition.dropped += 1;
            }
        }
    }

    Ok(partition)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn integer_key_rule_truth_table() {
        assert_eq!(integer_key_rule("", ""), Classification::Dropped);
        assert_eq!(integer_key_rule("5", "10"), Classification::Valid);
        assert_eq!(integer_key_rule("-3", "0"), Classification::Valid);
        assert_eq!(integer_key_rule("abc", "5"), Classification::Invalid);
        assert_eq!(integer_key_rule("5", "abc"), Classification::Invalid);
        assert_eq!(integer_key_rule("", "5"), Classification::Invalid);
        assert_eq!(integer_key_rule("5", ""), Classification::Invalid);
    }

    #[test]
    fn partition_is_complete() {
        let rows = vec![
            row(&["x", "5", "10", "p"]),
            row(&["x", "abc", "10", "p"]),
            row(&["x", "", "", "p"]),
            row(&["x", "7", "8", "p"]),
        ];
        let p = partition_rows(rows).unwrap();
        assert_eq!(p.valid.len(), 2);
        assert_eq!(p.invalid.len(), 1);
        assert_eq!(p.dropped, 1);
        assert_eq!(p.valid.len() + p.invalid.len() + p.dropped, 4);
    }

    #[test]
    fn short_row_is_a_structural_error() {
        let rows = vec![row(&["x", "5", "10"]), row(&["x", "5"])];
        let err = partition_rows(rows).unwrap_err();
        assert!(err.to_string().contains("row 1"));
        assert!(err.to_string().contains("got 2"));
    }

    #[test]
    fn custom_rule_is_honored() {
        let rows = vec![row(&["x", "A", "B", "p"]), row(&["x", "drop", "me", "p"])];
        let p = partition_rows_with(rows, |a, _| {
            if a == "drop" { Classification::Dropped } else { Classification::Valid }
        })
        .unwrap();
        assert_eq!(p.valid.len(), 1);
        assert_eq!(p.dropped, 1);
    }

    #[test]
    fn exactly_three_cells_is_allowed() {
        let p = partition_rows(vec![row(&["x", "1", "2"])]).unwrap();
        assert_eq!(p.valid.len(), 1);
        assert!(p.valid[0].len() == 3);
    }
}
