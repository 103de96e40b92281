//! End-to-end engine tests: CSV in, classified + serialized results out.

use crosscheck_recon::config::TrimConfig;
use crosscheck_recon::model::{BackgroundColor, Key, Origin};
use crosscheck_recon::serialize::{flatten_blocks, serialize_blocks};
use crosscheck_recon::source::load_csv_rows;
use crosscheck_recon::{run, ReconConfig};

const CONFIG: &str = r#"
name = "integration"

[sources.primary]
file = "primary.csv"

[sources.secondary]
file = "secondary.csv"

[trim]
header_rows = 1
footer_rows = 2
"#;

// Cell layout per row: reserved, key_a, key_b, identity, payload...
const PRIMARY_CSV: &str = "\
id,house,zip,resident,street,note
1,5,10,p1,A,X
2,7,20,q1,B,
3,abc,5,bad,C,
4,,,empty,D,
5,9,90,solo,E,
total,,,,,
generated,,,,,
";

const SECONDARY_CSV: &str = "\
id,house,zip,resident,street,note
1,5,10,p1,A,Y
2,5,10,p2,B,Z
3,7,20,q1,B,
4,8,80,other,F,
total,,,,,
generated,,,,,
";

#[test]
fn full_run_classifies_all_categories() {
    let config = ReconConfig::from_toml(CONFIG).unwrap();
    let primary = load_csv_rows(PRIMARY_CSV, &config.trim).unwrap();
    let secondary = load_csv_rows(SECONDARY_CSV, &config.trim).unwrap();
    assert_eq!(primary.len(), 5);
    assert_eq!(secondary.len(), 4);

    let result = run(&config, primary, secondary).unwrap();
    let classified = &result.classified;

    // key (5,10): p1 pairs with a diff at the note column; p2 is a
    // secondary-side mismatch. key (7,20): clean pair.
    assert_eq!(classified.matches.len(), 2);
    let p1 = classified
        .matches
        .iter()
        .find(|m| m.primary[0] == "p1")
        .expect("p1 should be matched");
    assert_eq!(p1.key, Key::new("5", "10"));
    assert_eq!(p1.diff_columns, vec![2]);
    let q1 = classified.matches.iter().find(|m| m.primary[0] == "q1").unwrap();
    assert!(q1.diff_columns.is_empty());

    assert_eq!(classified.mismatches.len(), 1);
    assert_eq!(classified.mismatches[0].origin, Origin::Secondary);
    assert_eq!(classified.mismatches[0].key, Key::new("5", "10"));
    assert_eq!(classified.mismatches[0].rows[0][0], "p2");

    // (9,90) only in primary, (8,80) only in secondary
    assert_eq!(classified.outliers.len(), 2);
    assert_eq!(classified.outliers[0].origin, Origin::Primary);
    assert_eq!(classified.outliers[0].key, Key::new("9", "90"));
    assert_eq!(classified.outliers[1].origin, Origin::Secondary);
    assert_eq!(classified.outliers[1].key, Key::new("8", "80"));

    // ("abc","5") fails integer parse: retained, tagged, never compared
    assert_eq!(classified.invalids.len(), 1);
    assert_eq!(classified.invalids[0].origin, Origin::Primary);
    assert_eq!(classified.invalids[0].key, Key::new("abc", "5"));

    // row 4 of the primary source had both key fields empty
    assert_eq!(result.summary.dropped_primary, 1);
    assert_eq!(result.summary.dropped_secondary, 0);
    assert_eq!(result.summary.matches, 2);
    assert_eq!(result.summary.mismatch_groups, 1);
    assert_eq!(result.summary.outlier_groups, 2);
    assert_eq!(result.summary.invalid_groups, 1);
}

#[test]
fn dropped_rows_reach_no_output_collection() {
    let config = ReconConfig::from_toml(CONFIG).unwrap();
    let trim = TrimConfig { header_rows: 0, footer_rows: 0 };
    let primary = load_csv_rows("0,,,x,y\n", &trim).unwrap();
    let secondary = load_csv_rows("", &trim).unwrap();

    let result = run(&config, primary, secondary).unwrap();
    assert_eq!(result.summary.dropped_primary, 1);
    assert!(result.classified.matches.is_empty());
    assert!(result.classified.mismatches.is_empty());
    assert!(result.classified.outliers.is_empty());
    assert!(result.classified.invalids.is_empty());
}

#[test]
fn serialized_outliers_are_key_sorted_and_fully_tiled() {
    let config = ReconConfig::from_toml(CONFIG).unwrap();
    let primary = load_csv_rows(PRIMARY_CSV, &config.trim).unwrap();
    let secondary = load_csv_rows(SECONDARY_CSV, &config.trim).unwrap();
    let result = run(&config, primary, secondary).unwrap();

    let rows = flatten_blocks(&result.classified.outliers);
    let block = serialize_blocks(rows, (BackgroundColor::Purple, BackgroundColor::White));

    // sorted by key regardless of origin: (8,80) before (9,90)
    assert_eq!(block.values[0][..3], ["secondary".to_string(), "8".into(), "80".into()]);
    assert_eq!(block.values[1][..3], ["primary".to_string(), "9".into(), "90".into()]);

    let mut next = 1;
    for (range, _) in &block.formats {
        assert_eq!(range.first_row, next);
        next = range.second_row + 1;
    }
    assert_eq!(next as usize, block.values.len() + 1);
}

#[test]
fn result_serializes_to_json() {
    let config = ReconConfig::from_toml(CONFIG).unwrap();
    let primary = load_csv_rows(PRIMARY_CSV, &config.trim).unwrap();
    let secondary = load_csv_rows(SECONDARY_CSV, &config.trim).unwrap();
    let result = run(&config, primary, secondary).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["meta"]["config_name"], "integration");
    assert_eq!(json["summary"]["matches"], 2);
    assert_eq!(json["classified"]["invalids"][0]["origin"], "primary");
    assert_eq!(json["classified"]["invalids"][0]["key"][0], "abc");
}

#[test]
fn malformed_row_aborts_the_run() {
    let config = ReconConfig::from_toml(CONFIG).unwrap();
    let trim = TrimConfig { header_rows: 0, footer_rows: 0 };
    let primary = load_csv_rows("1,5\n", &trim).unwrap();

    let err = run(&config, primary, Vec::new()).unwrap_err();
    assert!(err.to_string().contains("at least 3 cells"));
}
