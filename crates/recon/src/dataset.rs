use crate::model::{Dataset, Key, Row};

/// Group pre-validated raw rows into a dataset: key from cells 1 and 2,
/// payload from cells 3 onward (cell 0 is a source-side artifact and is
/// discarded here). Insertion order within a key is preserved and repeated
/// identical rows stay as separate entries.
pub fn build_dataset(rows: &[Row]) -> Dataset {
    let mut dataset = Dataset::new();
    for row in rows {
        let key = Key::new(row[1].clone(), row[2].clone());
        dataset.entry(key).or_default().push(row[3..].to_vec());
    }
    dataset
}
