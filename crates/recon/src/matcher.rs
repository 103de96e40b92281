use std::collections::BTreeMap;

use crate::model::{Key, Origin, PairedRow, Row, TaggedKey};

/// Right-pad the shorter row with empty cells so index-wise comparison is
/// always defined. Returns two new rows; caller data is never mutated.
pub fn fit_rows(a: &[String], b: &[String]) -> (Row, Row) {
    let len = a.len().max(b.len());
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.resize(len, String::new());
    b.resize(len, String::new());
    (a, b)
}

/// Column indices where two equal-length rows disagree.
pub fn diff_columns(a: &[String], b: &[String]) -> Vec<usize> {
    a.iter()
        .zip(b.iter())
        .enumerate()
        .filter(|(_, (x, y))| x != y)
        .map(|(i, _)| i)
        .collect()
}

#[derive(Debug, Default)]
pub struct KeyMatchOutput {
    /// Unpaired rows per side. Empty sides are omitted entirely.
    pub mismatches: BTreeMap<TaggedKey, Vec<Row>>,
    pub matches: Vec<PairedRow>,
}

/// Pair the rows of one shared key by identity field (payload cell 0).
///
/// The secondary rows act as a consumable pool: each primary row takes the
/// first pool row with an equal identity cell. Identity equality, not full
/// row equality, decides pairing, so differing payloads still surface as a
/// match with diffs. Rows with empty payloads have no identity cell and
/// pair with each other.
pub fn match_within_key(key: &Key, primary_rows: &[Row], secondary_rows: &[Row]) -> KeyMatchOutput {
    let mut pool: Vec<Row> = secondary_rows.to_vec();
    let mut matches = Vec::new();
    let mut primary_misses: Vec<Row> = Vec::new();

    for row in primary_rows {
        match pool.iter().position(|candidate| candidate.first() == row.first()) {
            Some(pos) => {
                let candidate = pool.remove(pos);
                let (primary, secondary) = fit_rows(row, &candidate);
                let diff = diff_columns(&primary, &secondary);
                matches.push(PairedRow {
                    key: key.clone(),
                    primary,
                    secondary,
                    diff_columns: diff,
                });
            }
            None => primary_misses.push(row.clone()),
        }
    }

    let mut mismatches = BTreeMap::new();
    if !primary_misses.is_empty() {
        mismatches.insert(
            TaggedKey { origin: Origin::Primary, key: key.clone() },
            primary_misses,
        );
    }
    if !pool.is_empty() {
        mismatches.insert(
            TaggedKey { origin: Origin::Secondary, key: key.clone() },
            pool,
        );
    }

    KeyMatchOutput { mismatches, matches }
}
