//! Configuration loading and management.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use audit_common::{VariablePair, WindowPolicy};

/// Main configuration loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofreaderConfig {
    /// Directory holding the daily swath files and reference archives.
    pub data_dir: PathBuf,
    /// Daily swath filename template with a `{date}` placeholder.
    #[serde(default = "default_daily_template")]
    pub daily_template: String,
    /// Reference store connection; the DATABASE_URL environment variable
    /// takes precedence when set.
    #[serde(default)]
    pub database_url: Option<String>,
    /// Optional basin mask used to annotate mismatch reports.
    #[serde(default)]
    pub basin_mask: Option<BasinMaskConfig>,
    pub profiles: Vec<ProfileConfig>,
}

fn default_daily_template() -> String {
    netcdf_archive::layout::DEFAULT_DAILY_TEMPLATE.to_string()
}

/// Basin mask file and variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasinMaskConfig {
    pub path: String,
    #[serde(default = "default_basin_variable")]
    pub variable: String,
}

fn default_basin_variable() -> String {
    "basin".to_string()
}

/// One named audit profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub name: String,
    #[serde(flatten)]
    pub kind: ProfileKind,
}

/// What a profile checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProfileKind {
    /// Recompute a windowed mean from daily swaths and compare it to a
    /// reference archive at the window's time index.
    Window {
        policy: WindowPolicy,
        variables: VariablePair,
        reference_archive: String,
    },
    /// Clean the fixed composite archives with the completeness filter and
    /// compare the concatenated series to the cell's store document.
    Composite {
        archives: Vec<String>,
        variables: VariablePair,
        #[serde(default = "default_required_count")]
        required_count: u32,
        #[serde(default)]
        batch_index: usize,
    },
}

fn default_required_count() -> u32 {
    7
}

impl ProfileKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ProfileKind::Window { .. } => "window",
            ProfileKind::Composite { .. } => "composite",
        }
    }
}

impl ProofreaderConfig {
    /// Load configuration from YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ProofreaderConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.profiles.is_empty() {
            anyhow::bail!("at least one profile must be specified");
        }
        for profile in &self.profiles {
            match &profile.kind {
                ProfileKind::Window { policy, .. } => {
                    if policy.window_count() == 0 {
                        anyhow::bail!("profile '{}' has an empty window lattice", profile.name);
                    }
                }
                ProfileKind::Composite {
                    archives,
                    required_count,
                    ..
                } => {
                    if archives.is_empty() {
                        anyhow::bail!("profile '{}' lists no archives", profile.name);
                    }
                    if *required_count == 0 {
                        anyhow::bail!("profile '{}' has required_count 0", profile.name);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn profile(&self, name: &str) -> Option<&ProfileConfig> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Resolve the store connection URL: environment first, then config.
    pub fn database_url(&self) -> anyhow::Result<String> {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            return Ok(url);
        }
        self.database_url
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no database_url configured and DATABASE_URL not set"))
    }
}
