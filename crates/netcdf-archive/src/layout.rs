//! Filesystem layout of the data directory.

use std::path::{Path, PathBuf};

/// Default daily swath filename template of the DT2021 two-satellite
/// product.
pub const DEFAULT_DAILY_TEMPLATE: &str = "dt_global_twosat_phy_l4_{date}_vDT2021.nc";

/// Where the archives live and how daily files are named.
#[derive(Debug, Clone)]
pub struct DatasetLayout {
    root: PathBuf,
    daily_template: String,
}

impl DatasetLayout {
    pub fn new(root: impl Into<PathBuf>, daily_template: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            daily_template: daily_template.into(),
        }
    }

    /// Path of the daily swath file for a compact `YYYYMMDD` identifier.
    pub fn daily_path(&self, date: &str) -> PathBuf {
        self.root.join(self.daily_template.replace("{date}", date))
    }

    /// Path of a named archive (mean file, basin mask) under the data root.
    pub fn archive_path(&self, name: impl AsRef<Path>) -> PathBuf {
        self.root.join(name)
    }
}
