//! Completeness-filtered composite reduction.

use audit_common::{decode_reference_mean, AuditError, AuditResult};

/// One archive's full per-cell time series: stored means and the paired
/// per-interval observation counts, as read from the file.
#[derive(Debug, Clone)]
pub struct CompositeCellSeries {
    pub means: Vec<f64>,
    pub counts: Vec<f64>,
}

/// Clean one archive's series: entry `i` survives only when its interval
/// was built from exactly `required_count` contributing daily passes and
/// the stored mean itself is present. Partial intervals are deliberately
/// excluded rather than partially trusted.
pub fn reduce_composite(
    series: &CompositeCellSeries,
    required_count: u32,
) -> AuditResult<Vec<Option<f64>>> {
    if series.means.len() != series.counts.len() {
        return Err(AuditError::ShapeMismatch(format!(
            "composite mean series has {} entries but count series has {}",
            series.means.len(),
            series.counts.len()
        )));
    }

    Ok(series
        .means
        .iter()
        .zip(series.counts.iter())
        .map(|(&mean, &count)| {
            if count == required_count as f64 {
                decode_reference_mean(mean)
            } else {
                None
            }
        })
        .collect())
}

/// Clean and concatenate several archives' series in file-list order.
pub fn concat_cleaned(
    series_list: &[CompositeCellSeries],
    required_count: u32,
) -> AuditResult<Vec<Option<f64>>> {
    let mut cleaned = Vec::new();
    for series in series_list {
        cleaned.extend(reduce_composite(series, required_count)?);
    }
    Ok(cleaned)
}
