use crate::model::{BackgroundColor, Key, Origin, PairedRow, Range, Row, TaggedBlock};

/// Sentinel row written after every serialized block so a later pass can
/// find the next free row on the same target.
pub const SEPARATOR: &str = "~~~";

/// One flattened output row: an optional origin tag, the key, and the
/// payload cells. Explicit fields instead of positional tuples keep the
/// sort and the cell layout independent.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub origin: Option<Origin>,
    pub key: Key,
    pub payload: Row,
}

impl OutputRow {
    /// Cell layout: `[origin?, key_a, key_b, payload...]`.
    pub fn into_cells(self) -> Row {
        let mut cells = Vec::with_capacity(3 + self.payload.len());
        if let Some(origin) = self.origin {
            cells.push(origin.to_string());
        }
        cells.push(self.key.0);
        cells.push(self.key.1);
        cells.extend(self.payload);
        cells
    }
}

/// Flatten origin-tagged blocks into one output row per payload row.
/// An entry with no rows still yields a single bare tag row.
pub fn flatten_blocks(blocks: &[TaggedBlock]) -> Vec<OutputRow> {
    let mut out = Vec::new();
    for block in blocks {
        if block.rows.is_empty() {
            out.push(OutputRow {
                origin: Some(block.origin),
                key: block.key.clone(),
                payload: Row::new(),
            });
            continue;
        }
        for row in &block.rows {
            out.push(OutputRow {
                origin: Some(block.origin),
                key: block.key.clone(),
                payload: row.clone(),
            });
        }
    }
    out
}

/// Flatten paired rows into origin-tagged output rows, primary side first
/// within each pair.
pub fn flatten_matches(matches: &[PairedRow]) -> Vec<OutputRow> {
    let mut out = Vec::with_capacity(matches.len() * 2);
    for pair in matches {
        out.push(OutputRow {
            origin: Some(Origin::Primary),
            key: pair.key.clone(),
            payload: pair.primary.clone(),
        });
        out.push(OutputRow {
            origin: Some(Origin::Secondary),
            key: pair.key.clone(),
            payload: pair.secondary.clone(),
        });
    }
    out
}

/// A serialized category: cell rows plus the color ranges that tile them.
#[derive(Debug, Clone, PartialEq)]
pub struct SerializedBlock {
    pub values: Vec<Row>,
    pub formats: Vec<(Range, BackgroundColor)>,
}

/// Serialize one category: sort the flattened rows by key (stable), emit
/// cells, and run-length encode contiguous same-key runs into color ranges
/// alternating between the two given colors.
pub fn serialize_blocks(
    mut rows: Vec<OutputRow>,
    colors: (BackgroundColor, BackgroundColor),
) -> SerializedBlock {
    rows.sort_by(|a, b| a.key.cmp(&b.key));

    let keys: Vec<Key> = rows.iter().map(|r| r.key.clone()).collect();
    let values: Vec<Row> = rows.into_iter().map(OutputRow::into_cells).collect();
    let formats = color_ranges(&keys, &values, colors);

    SerializedBlock { values, formats }
}

/// Ranges exactly and disjointly tile rows `1..=values.len()`, one range
/// per contiguous same-key run, colors alternating from `colors.0`.
fn color_ranges(
    keys: &[Key],
    values: &[Row],
    colors: (BackgroundColor, BackgroundColor),
) -> Vec<(Range, BackgroundColor)> {
    if values.is_empty() {
        return Vec::new();
    }

    let width = values.iter().map(Row::len).max().unwrap_or(0).max(1) as u32;
    let mut out = Vec::new();
    let mut color = colors.0;
    let mut run_start: u32 = 1;

    for i in 1..keys.len() {
        if keys[i] != keys[i - 1] {
            out.push((
                Range { first_col: 1, first_row: run_start, second_col: width, second_row: i as u32 },
                color,
            ));
            color = if color == colors.0 { colors.1 } else { colors.0 };
            run_start = i as u32 + 1;
        }
    }
    out.push((
        Range {
            first_col: 1,
            first_row: run_start,
            second_col: width,
            second_row: keys.len() as u32,
        },
        color,
    ));

    out
}

/// Append the sentinel separator row after a serialized block.
pub fn append_separator(values: &mut Vec<Row>) {
    values.push(vec![SEPARATOR.to_string()]);
}
