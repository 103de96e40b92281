use std::collections::BTreeMap;

use crate::classify::partition_rows;
use crate::config::ReconConfig;
use crate::dataset::build_dataset;
use crate::error::ReconError;
use crate::matcher::match_within_key;
use crate::model::{
    Classified, Dataset, Origin, PairedRow, ReconMeta, ReconResult, Row, TaggedBlock, TaggedKey,
};
use crate::summary::compute_summary;

/// Classify two built datasets against each other.
///
/// Outliers are keys present in exactly one dataset; invalids are passed
/// through origin-tagged; intersecting keys go to the intra-key matcher.
/// Iteration order here is incidental — final presentation order is imposed
/// by the serializer.
pub fn reconcile(
    primary: &Dataset,
    secondary: &Dataset,
    primary_invalid: &Dataset,
    secondary_invalid: &Dataset,
) -> Classified {
    let mut invalids: BTreeMap<TaggedKey, Vec<Row>> = BTreeMap::new();
    for (key, rows) in primary_invalid {
        invalids.insert(tagged(Origin::Primary, key), rows.clone());
    }
    for (key, rows) in secondary_invalid {
        invalids.insert(tagged(Origin::Secondary, key), rows.clone());
    }

    let mut outliers: BTreeMap<TaggedKey, Vec<Row>> = BTreeMap::new();
    for (key, rows) in primary {
        if !secondary.contains_key(key) {
            outliers.insert(tagged(Origin::Primary, key), rows.clone());
        }
    }
    for (key, rows) in secondary {
        if !primary.contains_key(key) {
            outliers.insert(tagged(Origin::Secondary, key), rows.clone());
        }
    }

    let mut mismatches: BTreeMap<TaggedKey, Vec<Row>> = BTreeMap::new();
    let mut matches: Vec<PairedRow> = Vec::new();
    for (key, primary_rows) in primary {
        if let Some(secondary_rows) = secondary.get(key) {
            let out = match_within_key(key, primary_rows, secondary_rows);
            mismatches.extend(out.mismatches);
            matches.extend(out.matches);
        }
    }

    Classified {
        outliers: into_blocks(outliers),
        invalids: into_blocks(invalids),
        mismatches: into_blocks(mismatches),
        matches,
    }
}

/// Run a full reconciliation: classify both sources with the default key
/// rule, build datasets, reconcile, and stamp result metadata.
pub fn run(
    config: &ReconConfig,
    primary_rows: Vec<Row>,
    secondary_rows: Vec<Row>,
) -> Result<ReconResult, ReconError> {
    let primary_part = partition_rows(primary_rows)?;
    let secondary_part = partition_rows(secondary_rows)?;

    let primary = build_dataset(&primary_part.valid);
    let secondary = build_dataset(&secondary_part.valid);
    let primary_invalid = build_dataset(&primary_part.invalid);
    let secondary_invalid = build_dataset(&secondary_part.invalid);

    let classified = reconcile(&primary, &secondary, &primary_invalid, &secondary_invalid);
    let summary = compute_summary(&classified, primary_part.dropped, secondary_part.dropped);

    Ok(ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        classified,
    })
}

fn tagged(origin: Origin, key: &crate::model::Key) -> TaggedKey {
    TaggedKey { origin, key: key.clone() }
}

fn into_blocks(map: BTreeMap<TaggedKey, Vec<Row>>) -> Vec<TaggedBlock> {
    map.into_iter()
        .map(|(tk, rows)| TaggedBlock { origin: tk.origin, key: tk.key, rows })
        .collect()
}
