//! Mean/composite reference archive access.

use std::path::{Path, PathBuf};

use audit_common::{decode_reference_mean, AuditError, AuditResult, GridCell, GridIndex, VariablePair};
use audit_engine::{CompositeCellSeries, ReferenceValue};

/// A reference archive holding `[time][latitude][longitude]` value and
/// count fields, kept open for the lifetime of a run.
///
/// These archives are a fixed, small set named by configuration, so a file
/// that cannot be opened or lacks the expected fields is a configuration
/// error, never a skippable gap.
pub struct MeanArchive {
    file: netcdf::File,
    path: PathBuf,
}

impl MeanArchive {
    pub fn open(path: impl AsRef<Path>) -> AuditResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = netcdf::open(&path).map_err(|e| {
            AuditError::Config(format!("cannot open reference archive {}: {}", path.display(), e))
        })?;
        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Grid index built from the archive's coordinate variables.
    pub fn coordinates(&self) -> AuditResult<GridIndex> {
        let latitudes = self.read_coordinate("latitude")?;
        let longitudes = self.read_coordinate("longitude")?;
        GridIndex::from_coordinates(latitudes, longitudes)
    }

    /// Length of the archive's time axis.
    pub fn time_len(&self) -> AuditResult<usize> {
        self.file
            .dimension("time")
            .map(|d| d.len())
            .ok_or_else(|| AuditError::MissingDimension(format!("time in {}", self.path.display())))
    }

    /// The stored (mean, count) pair at one time index and cell. A `-999.9`
    /// mean decodes to `None`.
    pub fn reference_value(
        &self,
        vars: &VariablePair,
        time_index: usize,
        cell: GridCell,
    ) -> AuditResult<ReferenceValue> {
        let mean = self.read_scalar(&vars.value, time_index, cell)?;
        let count = self.read_scalar(&vars.count, time_index, cell)?;
        Ok(ReferenceValue {
            mean: decode_reference_mean(mean),
            count,
        })
    }

    /// One cell's full stored time series for a value/count variable pair,
    /// undecoded (the completeness reducer owns the cleaning rule).
    pub fn cell_series(&self, vars: &VariablePair, cell: GridCell) -> AuditResult<CompositeCellSeries> {
        let means = self.read_series(&vars.value, cell)?;
        let counts = self.read_series(&vars.count, cell)?;
        Ok(CompositeCellSeries { means, counts })
    }

    fn variable(&self, name: &str) -> AuditResult<netcdf::Variable<'_>> {
        self.file
            .variable(name)
            .ok_or_else(|| AuditError::MissingVariable(format!("{} in {}", name, self.path.display())))
    }

    fn read_coordinate(&self, name: &str) -> AuditResult<Vec<f64>> {
        self.variable(name)?
            .get_values(..)
            .map_err(|e| AuditError::DataRead(format!("{} in {}: {}", name, self.path.display(), e)))
    }

    fn read_scalar(&self, name: &str, time_index: usize, cell: GridCell) -> AuditResult<f64> {
        self.variable(name)?
            .get_value([time_index, cell.row, cell.column])
            .map_err(|e| {
                AuditError::DataRead(format!(
                    "{}[{}][{}][{}] in {}: {}",
                    name,
                    time_index,
                    cell.row,
                    cell.column,
                    self.path.display(),
                    e
                ))
            })
    }

    fn read_series(&self, name: &str, cell: GridCell) -> AuditResult<Vec<f64>> {
        self.variable(name)?
            .get_values((.., cell.row, cell.column))
            .map_err(|e| {
                AuditError::DataRead(format!(
                    "{}[..][{}][{}] in {}: {}",
                    name,
                    cell.row,
                    cell.column,
                    self.path.display(),
                    e
                ))
            })
    }
}
