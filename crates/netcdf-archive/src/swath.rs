//! Daily swath file access.

use audit_common::{decode_raw, AuditError, AuditResult, GridCell, DEFAULT_FILL_VALUE, DEFAULT_SCALE_FACTOR};
use audit_engine::SwathSource;
use tracing::debug;

use crate::layout::DatasetLayout;
use crate::{get_f64_attr, get_i32_attr};

/// Reads one sentinel-coded variable from the daily swath files.
///
/// Each read opens the file for its date and drops the handle when done,
/// so descriptor usage stays bounded across an unbounded iteration count.
#[derive(Debug)]
pub struct DailySwaths {
    layout: DatasetLayout,
    variable: String,
}

impl DailySwaths {
    pub fn new(layout: DatasetLayout, variable: impl Into<String>) -> Self {
        Self {
            layout,
            variable: variable.into(),
        }
    }
}

impl SwathSource for DailySwaths {
    fn cell_value(&self, date: &str, cell: GridCell) -> AuditResult<Option<f64>> {
        let path = self.layout.daily_path(date);

        // A missing daily file only abandons this window.
        let file = netcdf::open(&path).map_err(|e| {
            debug!(path = %path.display(), error = %e, "daily swath not openable");
            AuditError::ArchiveUnavailable(format!("{}: {}", path.display(), e))
        })?;

        // Past this point the file opened; anything wrong with it is a
        // configuration problem, not a gap in the data.
        let var = file
            .variable(&self.variable)
            .ok_or_else(|| AuditError::MissingVariable(format!("{} in {}", self.variable, path.display())))?;

        let raw: i32 = var
            .get_value([0, cell.row, cell.column])
            .map_err(|e| AuditError::DataRead(format!("{}[0][{}][{}] in {}: {}", self.variable, cell.row, cell.column, path.display(), e)))?;

        let fill_value = get_i32_attr(&var, "_FillValue").unwrap_or(DEFAULT_FILL_VALUE);
        let scale_factor = get_f64_attr(&var, "scale_factor").unwrap_or(DEFAULT_SCALE_FACTOR);

        Ok(decode_raw(raw, fill_value, scale_factor))
    }
}
