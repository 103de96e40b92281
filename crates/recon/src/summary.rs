use crate::model::{Classified, ReconSummary};

/// Count the classified groups per category plus the rows dropped during
/// classification.
pub fn compute_summary(
    classified: &Classified,
    dropped_primary: usize,
    dropped_secondary: usize,
) -> ReconSummary {
    ReconSummary {
        mismatch_groups: classified.mismatches.len(),
        outlier_groups: classified.outliers.len(),
        invalid_groups: classified.invalids.len(),
        matches: classified.matches.len(),
        dropped_primary,
        dropped_secondary,
    }
}
