//! Ocean-basin annotation from a 1 degree basin mask.

use std::path::Path;

use audit_common::{AuditError, AuditResult};

/// Origin of the mask's 1 degree cell-center grid.
const LON_ORIGIN: f64 = -179.5;
const LAT_ORIGIN: f64 = -77.5;

/// A basin mask loaded fully into memory, indexed `[latitude][longitude]`
/// with cell centers on half-degree coordinates.
pub struct BasinGrid {
    values: Vec<i64>,
    n_lat: usize,
    n_lon: usize,
}

impl BasinGrid {
    /// Load the named mask variable from a NetCDF file. The mask is part of
    /// the configured archive set, so failure here is structural.
    pub fn open(path: impl AsRef<Path>, variable: &str) -> AuditResult<Self> {
        let path = path.as_ref();
        let file = netcdf::open(path).map_err(|e| {
            AuditError::Config(format!("cannot open basin mask {}: {}", path.display(), e))
        })?;
        let var = file
            .variable(variable)
            .ok_or_else(|| AuditError::MissingVariable(format!("{} in {}", variable, path.display())))?;

        let dims = var.dimensions();
        if dims.len() != 2 {
            return Err(AuditError::GridMismatch(format!(
                "basin mask {} is {}-dimensional, expected [latitude][longitude]",
                variable,
                dims.len()
            )));
        }
        let n_lat = dims[0].len();
        let n_lon = dims[1].len();

        let values: Vec<i64> = var
            .get_values(..)
            .map_err(|e| AuditError::DataRead(format!("{} in {}: {}", variable, path.display(), e)))?;

        Self::from_values(values, n_lat, n_lon)
    }

    pub fn from_values(values: Vec<i64>, n_lat: usize, n_lon: usize) -> AuditResult<Self> {
        if values.len() != n_lat * n_lon {
            return Err(AuditError::GridMismatch(format!(
                "basin mask has {} values for a {}x{} grid",
                values.len(),
                n_lat,
                n_lon
            )));
        }
        Ok(Self {
            values,
            n_lat,
            n_lon,
        })
    }

    /// Basin tag at the mask cell center nearest to a (normalized
    /// longitude, latitude) point, or `None` when the point falls outside
    /// the mask's latitude band.
    pub fn basin_at(&self, longitude: f64, latitude: f64) -> Option<i64> {
        let lon_plus = (longitude - 0.5).ceil() + 0.5;
        let lon_minus = (longitude - 0.5).floor() + 0.5;
        let lat_plus = (latitude - 0.5).ceil() + 0.5;
        let lat_minus = (latitude - 0.5).floor() + 0.5;

        // bottom left corner, clockwise
        let corners = [
            (lat_minus, lon_minus),
            (lat_plus, lon_minus),
            (lat_plus, lon_plus),
            (lat_minus, lon_plus),
        ];

        let mut nearest = corners[0];
        let mut nearest_dist = f64::INFINITY;
        for (lat, lon) in corners {
            let dist = ((longitude - lon).powi(2) + (latitude - lat).powi(2)).sqrt();
            if dist < nearest_dist {
                nearest = (lat, lon);
                nearest_dist = dist;
            }
        }

        self.lookup(nearest.0, nearest.1)
    }

    fn lookup(&self, lat: f64, lon: f64) -> Option<i64> {
        let lat_idx = lat - LAT_ORIGIN;
        let lon_idx = lon - LON_ORIGIN;
        if lat_idx < 0.0 || lon_idx < 0.0 {
            return None;
        }
        let (lat_idx, lon_idx) = (lat_idx as usize, lon_idx as usize);
        if lat_idx >= self.n_lat || lon_idx >= self.n_lon {
            return None;
        }
        Some(self.values[lat_idx * self.n_lon + lon_idx])
    }
}
