//! Sentinel-aware windowed aggregation.

use audit_common::{AuditResult, GridCell, TimeWindow};

/// Access to one scalar variable of the daily swath files.
///
/// `cell_value` returns `Ok(None)` for a fill-coded observation, the scaled
/// physical value otherwise. A date whose file cannot be opened surfaces as
/// a transient [`audit_common::AuditError::ArchiveUnavailable`], which
/// abandons the whole window.
pub trait SwathSource {
    fn cell_value(&self, date: &str, cell: GridCell) -> AuditResult<Option<f64>>;
}

/// Recomputed mean and valid-observation count for one cell and window.
///
/// `mean` is `None` exactly when `count == 0`; a zero-observation candidate
/// is its own state and must never be compared as if it were numeric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aggregate {
    pub mean: Option<f64>,
    pub count: u32,
}

/// Average the valid observations for `cell` across the window's dates.
///
/// Fill-coded values are skipped entirely, contributing to neither sum nor
/// count. Summation follows window order; windows are at most 8 days so no
/// parallelism is warranted.
pub fn aggregate(
    source: &dyn SwathSource,
    cell: GridCell,
    window: &TimeWindow,
) -> AuditResult<Aggregate> {
    let mut sum = 0.0;
    let mut count = 0u32;

    for date in &window.dates {
        if let Some(value) = source.cell_value(date, cell)? {
            sum += value;
            count += 1;
        }
    }

    let mean = if count > 0 {
        Some(sum / count as f64)
    } else {
        None
    };

    Ok(Aggregate { mean, count })
}
