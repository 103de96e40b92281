use crosscheck_recon::config::ReconConfig;
use crosscheck_recon::model::{BackgroundColor, PairedRow, Range, ReconResult, Row, TaggedBlock};
use crosscheck_recon::serialize::{
    append_separator, flatten_blocks, flatten_matches, serialize_blocks, SerializedBlock,
};

use crate::sink::{next_free_row, SheetSink, SinkError};
use crate::throttle::WriteThrottle;

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

pub const LEGEND: &[(&str, BackgroundColor)] = &[
    ("Found Match", BackgroundColor::LightGreen),
    ("Diffs in matched rows", BackgroundColor::Yellow),
    ("In One but not the Other", BackgroundColor::Purple),
    ("Invalids", BackgroundColor::Orange),
    ("No match", BackgroundColor::Red),
];

pub const MISMATCH_COLORS: (BackgroundColor, BackgroundColor) =
    (BackgroundColor::Red, BackgroundColor::LightRed);
pub const OUTLIER_COLORS: (BackgroundColor, BackgroundColor) =
    (BackgroundColor::Purple, BackgroundColor::White);
pub const INVALID_COLORS: (BackgroundColor, BackgroundColor) =
    (BackgroundColor::Orange, BackgroundColor::White);
pub const MATCH_COLORS: (BackgroundColor, BackgroundColor) =
    (BackgroundColor::LightGreen, BackgroundColor::White);

const SHEET_COLS: u32 = 26;

/// Payload column index to 1-based sheet column: cells are laid out as
/// `[origin, key_a, key_b, payload...]`.
const PAYLOAD_COL_OFFSET: u32 = 4;

// ---------------------------------------------------------------------------
// Report writer
// ---------------------------------------------------------------------------

/// Writes one reconciliation result to a single worksheet, block by block,
/// each write passing through the throttle first.
pub struct ReportWriter<'a, S: SheetSink> {
    sink: &'a mut S,
    throttle: &'a WriteThrottle,
    title: String,
}

impl<'a, S: SheetSink> ReportWriter<'a, S> {
    pub fn new(sink: &'a mut S, throttle: &'a WriteThrottle, config: &ReconConfig) -> Self {
        Self {
            sink,
            throttle,
            title: config.report.sheet_title.clone(),
        }
    }

    /// Write the full report: legend, then mismatches, outliers, invalids,
    /// and (when configured) matched pairs, each block ending in a
    /// separator row.
    pub fn write_report(
        &mut self,
        config: &ReconConfig,
        result: &ReconResult,
    ) -> Result<(), SinkError> {
        self.ensure_worksheet(config, result)?;
        self.write_legend()?;

        self.write_category("mismatches", &result.classified.mismatches, MISMATCH_COLORS)?;
        self.write_category("outliers", &result.classified.outliers, OUTLIER_COLORS)?;
        self.write_category("invalids", &result.classified.invalids, INVALID_COLORS)?;
        if config.report.show_matches {
            self.write_matches(&result.classified.matches)?;
        }

        tracing::info!(sheet = %self.title, "report written");
        Ok(())
    }

    /// Create the report worksheet if it does not exist, sized to hold every
    /// output row plus the configured slack.
    fn ensure_worksheet(
        &mut self,
        config: &ReconConfig,
        result: &ReconResult,
    ) -> Result<(), SinkError> {
        if self.sink.worksheet_exists(&self.title) {
            return Ok(());
        }
        let classified = &result.classified;
        let data_rows = block_rows(&classified.mismatches)
            + block_rows(&classified.outliers)
            + block_rows(&classified.invalids)
            + classified.matches.len() * 2;
        // legend + one separator per block
        let rows = data_rows as u32 + 6 + config.report.extra_rows;
        tracing::debug!(sheet = %self.title, rows, "creating report worksheet");
        self.throttle.reserve(1);
        self.sink.create_worksheet(&self.title, rows, SHEET_COLS)
    }

    fn write_legend(&mut self) -> Result<(), SinkError> {
        let anchor = next_free_row(self.sink, &self.title)?;
        let labels: Row = LEGEND.iter().map(|(label, _)| label.to_string()).collect();
        let mut values = vec![labels];
        append_separator(&mut values);

        let range = Range::from_values(&values, anchor);
        self.throttle.reserve(1);
        self.sink.update(&self.title, &range, &values)?;

        let formats: Vec<(Range, BackgroundColor)> = LEGEND
            .iter()
            .enumerate()
            .map(|(i, (_, color))| {
                let col = i as u32 + 1;
                (
                    Range { first_col: col, first_row: anchor, second_col: col, second_row: anchor },
                    *color,
                )
            })
            .collect();
        self.throttle.reserve(1);
        self.sink.format(&self.title, &formats)
    }

    fn write_category(
        &mut self,
        name: &str,
        blocks: &[TaggedBlock],
        colors: (BackgroundColor, BackgroundColor),
    ) -> Result<(), SinkError> {
        let block = serialize_blocks(flatten_blocks(blocks), colors);
        if block.values.is_empty() {
            tracing::debug!(category = name, "nothing to write");
            return Ok(());
        }
        let rows = block.values.len();
        let anchor = self.write_block(block)?;
        tracing::debug!(category = name, anchor, rows, "block written");
        Ok(())
    }

    /// Matched pairs are pre-sorted by key so each pair stays adjacent in
    /// the serialized output, letting diff columns be painted per pair.
    fn write_matches(&mut self, matches: &[PairedRow]) -> Result<(), SinkError> {
        if matches.is_empty() {
            return Ok(());
        }
        let mut sorted = matches.to_vec();
        sorted.sort_by(|a, b| a.key.cmp(&b.key));

        let block = serialize_blocks(flatten_matches(&sorted), MATCH_COLORS);
        let anchor = self.write_block(block)?;

        let mut diffs: Vec<(Range, BackgroundColor)> = Vec::new();
        for (i, pair) in sorted.iter().enumerate() {
            let first_row = anchor + 2 * i as u32;
            for &col in &pair.diff_columns {
                let col = col as u32 + PAYLOAD_COL_OFFSET;
                diffs.push((
                    Range {
                        first_col: col,
                        first_row,
                        second_col: col,
                        second_row: first_row + 1,
                    },
                    BackgroundColor::Yellow,
                ));
            }
        }
        if !diffs.is_empty() {
            self.throttle.reserve(1);
            self.sink.format(&self.title, &diffs)?;
        }
        Ok(())
    }

    /// Write one serialized block at the next free row, separator included,
    /// and apply its non-white color ranges shifted to the anchor. Returns
    /// the anchor row.
    fn write_block(&mut self, block: SerializedBlock) -> Result<u32, SinkError> {
        let SerializedBlock { mut values, formats } = block;
        append_separator(&mut values);

        let anchor = next_free_row(self.sink, &self.title)?;
        let range = Range::from_values(&values, anchor);
        self.throttle.reserve(1);
        self.sink.update(&self.title, &range, &values)?;

        let shifted: Vec<(Range, BackgroundColor)> = formats
            .into_iter()
            .filter(|(_, color)| *color != BackgroundColor::White)
            .map(|(mut range, color)| {
                range.add_rows(anchor - 1);
                (range, color)
            })
            .collect();
        if !shifted.is_empty() {
            self.throttle.reserve(1);
            self.sink.format(&self.title, &shifted)?;
        }
        Ok(anchor)
    }
}

fn block_rows(blocks: &[TaggedBlock]) -> usize {
    blocks.iter().map(|b| b.rows.len().max(1)).sum()
}
