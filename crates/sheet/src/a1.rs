use crosscheck_recon::model::Range;

/// Spreadsheet column letters for a 1-based column index: 1 -> "A",
/// 26 -> "Z", 27 -> "AA".
pub fn column_letters(mut col: u32) -> String {
    debug_assert!(col >= 1);
    let mut letters = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        letters.push(b'A' + rem as u8);
        col = (col - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Render a range in A1 notation, e.g. "A1:C5".
pub fn a1(range: &Range) -> String {
    format!(
        "{}{}:{}{}",
        column_letters(range.first_col),
        range.first_row,
        column_letters(range.second_col),
        range.second_row
    )
}
