//! Grid cell addressing for regularly gridded ocean products.

use serde::{Deserialize, Serialize};

use crate::error::{AuditError, AuditResult};

/// A single grid location addressed by (row, column).
///
/// Row indexes the latitude axis, column the longitude axis. For the
/// standard 0.25 degree global product the grid is 720 rows by 1440 columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub row: usize,
    pub column: usize,
}

impl GridCell {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Coordinate arrays loaded from an archive, mapping grid indices to
/// physical latitude/longitude.
#[derive(Debug, Clone)]
pub struct GridIndex {
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
}

impl GridIndex {
    /// Build an index from an archive's coordinate variables.
    pub fn from_coordinates(latitudes: Vec<f64>, longitudes: Vec<f64>) -> AuditResult<Self> {
        if latitudes.is_empty() || longitudes.is_empty() {
            return Err(AuditError::GridMismatch(
                "empty coordinate arrays".to_string(),
            ));
        }
        Ok(Self {
            latitudes,
            longitudes,
        })
    }

    /// Number of rows (latitude axis length).
    pub fn rows(&self) -> usize {
        self.latitudes.len()
    }

    /// Number of columns (longitude axis length).
    pub fn columns(&self) -> usize {
        self.longitudes.len()
    }

    /// Physical coordinates of a cell, longitude as stored in the archive.
    ///
    /// An out-of-range cell means the coordinate arrays and the requested
    /// row/column disagree, which is a configuration error.
    pub fn lat_lon(&self, cell: GridCell) -> AuditResult<(f64, f64)> {
        let lat = self.latitudes.get(cell.row).ok_or_else(|| {
            AuditError::GridMismatch(format!(
                "row {} out of range (grid has {} rows)",
                cell.row,
                self.latitudes.len()
            ))
        })?;
        let lon = self.longitudes.get(cell.column).ok_or_else(|| {
            AuditError::GridMismatch(format!(
                "column {} out of range (grid has {} columns)",
                cell.column,
                self.longitudes.len()
            ))
        })?;
        Ok((*lat, *lon))
    }

    /// Physical coordinates with the longitude normalized to (-180, 180].
    pub fn normalized_lat_lon(&self, cell: GridCell) -> AuditResult<(f64, f64)> {
        let (lat, lon) = self.lat_lon(cell)?;
        Ok((lat, normalize_longitude(lon)))
    }

    /// The reference-store lookup key for a cell: `"<lon>_<lat>"` built from
    /// normalized coordinates.
    ///
    /// Must match the rule used when the store was populated; quarter-degree
    /// coordinates are exactly representable so shortest round-trip
    /// formatting reproduces the stored keys.
    pub fn cell_key(&self, cell: GridCell) -> AuditResult<String> {
        let (lat, lon) = self.normalized_lat_lon(cell)?;
        Ok(format!("{}_{}", lon, lat))
    }
}

/// Map a longitude on [0, 360] to (-180, 180], as required by the
/// reference-store indexing.
pub fn normalize_longitude(longitude: f64) -> f64 {
    if longitude <= 180.0 {
        longitude
    } else {
        longitude - 360.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quarter_degree_index() -> GridIndex {
        let latitudes: Vec<f64> = (0..720).map(|i| -89.875 + 0.25 * i as f64).collect();
        let longitudes: Vec<f64> = (0..1440).map(|i| 0.125 + 0.25 * i as f64).collect();
        GridIndex::from_coordinates(latitudes, longitudes).unwrap()
    }

    #[test]
    fn test_normalize_longitude_boundaries() {
        assert_eq!(normalize_longitude(0.0), 0.0);
        assert_eq!(normalize_longitude(180.0), 180.0);
        assert!((normalize_longitude(180.0001) - (-179.9999)).abs() < 1e-9);
        assert_eq!(normalize_longitude(360.0), 0.0);
    }

    #[test]
    fn test_normalize_longitude_idempotent() {
        let mut x = 0.0;
        while x <= 360.0 {
            let once = normalize_longitude(x);
            assert_eq!(normalize_longitude(once), once, "not idempotent at {}", x);
            x += 0.125;
        }
    }

    #[test]
    fn test_lat_lon_lookup() {
        let index = quarter_degree_index();
        let (lat, lon) = index.lat_lon(GridCell::new(0, 0)).unwrap();
        assert_eq!(lat, -89.875);
        assert_eq!(lon, 0.125);
    }

    #[test]
    fn test_out_of_range_cell_is_structural() {
        let index = quarter_degree_index();
        let err = index.lat_lon(GridCell::new(720, 0)).unwrap_err();
        assert!(!err.is_transient());
    }

    #[test]
    fn test_cell_key_formatting() {
        let index = quarter_degree_index();
        // lon 314.875 normalizes to -45.125; lat 12.375 at row 409
        let cell = GridCell::new(409, 1259);
        let (lat, lon) = index.lat_lon(cell).unwrap();
        assert_eq!(lat, 12.375);
        assert_eq!(lon, 314.875);
        assert_eq!(index.cell_key(cell).unwrap(), "-45.125_12.375");
    }

    #[test]
    fn test_empty_coordinates_rejected() {
        assert!(GridIndex::from_coordinates(vec![], vec![0.125]).is_err());
    }
}
