use std::collections::BTreeMap;
use std::fmt;

use crosscheck_recon::model::{BackgroundColor, Range, Row};
use crosscheck_recon::serialize::SEPARATOR;

use crate::a1::a1;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum SinkError {
    WorksheetNotFound(String),
    Io(String),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WorksheetNotFound(title) => write!(f, "worksheet not found: {title}"),
            Self::Io(msg) => write!(f, "sink i/o error: {msg}"),
        }
    }
}

impl std::error::Error for SinkError {}

// ---------------------------------------------------------------------------
// Sink trait
// ---------------------------------------------------------------------------

/// Destination for serialized report blocks. Worksheets are addressed by
/// title; ranges are 1-based inclusive.
pub trait SheetSink {
    fn worksheet_exists(&self, title: &str) -> bool;

    fn create_worksheet(&mut self, title: &str, rows: u32, cols: u32) -> Result<(), SinkError>;

    /// Current cell contents of a worksheet, used to locate the next free
    /// row between writes.
    fn read_rows(&self, title: &str) -> Result<Vec<Row>, SinkError>;

    /// Write `values` with its top-left cell at the range's first corner.
    fn update(&mut self, title: &str, range: &Range, values: &[Row]) -> Result<(), SinkError>;

    /// Apply background colors to the given ranges.
    fn format(
        &mut self,
        title: &str,
        formats: &[(Range, BackgroundColor)],
    ) -> Result<(), SinkError>;
}

/// First row after the last separator sentinel, or row 1 on a sheet that
/// has never been written.
pub fn next_free_row<S: SheetSink + ?Sized>(sink: &S, title: &str) -> Result<u32, SinkError> {
    let rows = sink.read_rows(title)?;
    let last = rows
        .iter()
        .rposition(|row| row.first().map(String::as_str) == Some(SEPARATOR));
    Ok(match last {
        Some(index) => index as u32 + 2,
        None => 1,
    })
}

// ---------------------------------------------------------------------------
// In-memory sink
// ---------------------------------------------------------------------------

/// Sink backed by in-memory grids. Serves as the test double and as the
/// CLI's offline report target.
#[derive(Debug, Default)]
pub struct MemorySink {
    grids: BTreeMap<String, Vec<Row>>,
    /// Every format instruction applied, in order.
    pub formats: Vec<(String, Range, BackgroundColor)>,
    /// A1-rendered log of update calls, e.g. `Report results!A1:C5`.
    pub updates: Vec<String>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a worksheet as CSV, trimming trailing blank rows and the
    /// blank tail of each row.
    pub fn to_csv(&self, title: &str) -> Result<String, SinkError> {
        let grid = self.grid(title)?;
        let used = grid
            .iter()
            .rposition(|row| row.iter().any(|cell| !cell.is_empty()))
            .map_or(0, |i| i + 1);

        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        for row in &grid[..used] {
            let width = row
                .iter()
                .rposition(|cell| !cell.is_empty())
                .map_or(0, |i| i + 1);
            if width == 0 {
                writer.write_record([""]).map_err(|e| SinkError::Io(e.to_string()))?;
            } else {
                writer
                    .write_record(&row[..width])
                    .map_err(|e| SinkError::Io(e.to_string()))?;
            }
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| SinkError::Io(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| SinkError::Io(e.to_string()))
    }

    fn grid(&self, title: &str) -> Result<&Vec<Row>, SinkError> {
        self.grids
            .get(title)
            .ok_or_else(|| SinkError::WorksheetNotFound(title.to_string()))
    }

    fn grid_mut(&mut self, title: &str) -> Result<&mut Vec<Row>, SinkError> {
        self.grids
            .get_mut(title)
            .ok_or_else(|| SinkError::WorksheetNotFound(title.to_string()))
    }
}

impl SheetSink for MemorySink {
    fn worksheet_exists(&self, title: &str) -> bool {
        self.grids.contains_key(title)
    }

    fn create_worksheet(&mut self, title: &str, rows: u32, cols: u32) -> Result<(), SinkError> {
        self.grids
            .entry(title.to_string())
            .or_insert_with(|| vec![vec![String::new(); cols as usize]; rows as usize]);
        Ok(())
    }

    fn read_rows(&self, title: &str) -> Result<Vec<Row>, SinkError> {
        Ok(self.grid(title)?.clone())
    }

    fn update(&mut self, title: &str, range: &Range, values: &[Row]) -> Result<(), SinkError> {
        let log = format!("{title}!{}", a1(range));
        let grid = self.grid_mut(title)?;
        for (r, row) in values.iter().enumerate() {
            let target_row = range.first_row as usize - 1 + r;
            while grid.len() <= target_row {
                grid.push(Vec::new());
            }
            for (c, cell) in row.iter().enumerate() {
                let target_col = range.first_col as usize - 1 + c;
                let slot = &mut grid[target_row];
                while slot.len() <= target_col {
                    slot.push(String::new());
                }
                slot[target_col] = cell.clone();
            }
        }
        self.updates.push(log);
        Ok(())
    }

    fn format(
        &mut self,
        title: &str,
        formats: &[(Range, BackgroundColor)],
    ) -> Result<(), SinkError> {
        if !self.worksheet_exists(title) {
            return Err(SinkError::WorksheetNotFound(title.to_string()));
        }
        for (range, color) in formats {
            self.formats.push((title.to_string(), range.clone(), *color));
        }
        Ok(())
    }
}
