use crate::config::TrimConfig;
use crate::error::ReconError;
use crate::model::Row;

/// Decode headerless, variable-width CSV into raw rows, then strip the
/// configured header and footer rows. A source shorter than the trim
/// margins yields no rows.
pub fn load_csv_rows(data: &str, trim: &TrimConfig) -> Result<Vec<Row>, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data.as_bytes());

    let mut rows: Vec<Row> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Io(e.to_string()))?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }

    if rows.len() <= trim.header_rows + trim.footer_rows {
        return Ok(Vec::new());
    }
    let keep = rows.len() - trim.footer_rows;
    Ok(rows.drain(trim.header_rows..keep).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn trims_header_and_footer() {
        let csv = "\
id,house,zip,name
r1,5,10,alice
r2,7,20,bob
total,,,
generated,,,
";
        let trim = TrimConfig { header_rows: 1, footer_rows: 2 };
        let rows = load_csv_rows(csv, &trim).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], row(&["r1", "5", "10", "alice"]));
        assert_eq!(rows[1], row(&["r2", "7", "20", "bob"]));
    }

    #[test]
    fn variable_width_rows_are_accepted() {
        let csv = "r1,5,10\nr2,7,20,extra,cells\n";
        let trim = TrimConfig { header_rows: 0, footer_rows: 0 };
        let rows = load_csv_rows(csv, &trim).unwrap();
        assert_eq!(rows[0].len(), 3);
        assert_eq!(rows[1].len(), 5);
    }

    #[test]
    fn source_shorter_than_margins_is_empty() {
        let csv = "header,x,y\nfooter,x,y\n";
        let trim = TrimConfig { header_rows: 1, footer_rows: 2 };
        assert!(load_csv_rows(csv, &trim).unwrap().is_empty());
    }
}
