//! Mismatch records and run summaries.

use serde::Serialize;

use audit_engine::{MismatchKind, SeriesMismatch, WindowMismatch};

/// Everything needed to locate one discrepancy after the run.
#[derive(Debug, Clone, Serialize)]
pub struct MismatchRecord {
    pub timestamp: String,
    pub profile: String,
    pub variable: String,
    pub cell_key: String,
    pub row: usize,
    pub column: usize,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basin: Option<i64>,
    /// Window label for window profiles, archive list for composites.
    pub window: String,
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    pub candidate_mean: Option<f64>,
    pub reference_mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_count: Option<f64>,
}

/// Location context shared by every record of one iteration.
#[derive(Debug, Clone)]
pub struct CellContext {
    pub cell_key: String,
    pub row: usize,
    pub column: usize,
    pub latitude: f64,
    pub longitude: f64,
    pub basin: Option<i64>,
}

impl MismatchRecord {
    pub fn from_window(
        profile: &str,
        variable: &str,
        window_label: &str,
        ctx: &CellContext,
        mismatch: &WindowMismatch,
    ) -> Self {
        let kind = match mismatch.kind {
            MismatchKind::NoObservations => "no_observations",
            MismatchKind::Mean => "mean",
            MismatchKind::Count => "count",
        };
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            profile: profile.to_string(),
            variable: variable.to_string(),
            cell_key: ctx.cell_key.clone(),
            row: ctx.row,
            column: ctx.column,
            latitude: ctx.latitude,
            longitude: ctx.longitude,
            basin: ctx.basin,
            window: window_label.to_string(),
            kind: kind.to_string(),
            offset: None,
            candidate_mean: mismatch.candidate_mean,
            reference_mean: mismatch.reference_mean,
            candidate_count: Some(mismatch.candidate_count),
            reference_count: Some(mismatch.reference_count),
        }
    }

    pub fn from_series(
        profile: &str,
        variable: &str,
        archives: &str,
        ctx: &CellContext,
        mismatch: &SeriesMismatch,
    ) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            profile: profile.to_string(),
            variable: variable.to_string(),
            cell_key: ctx.cell_key.clone(),
            row: ctx.row,
            column: ctx.column,
            latitude: ctx.latitude,
            longitude: ctx.longitude,
            basin: ctx.basin,
            window: archives.to_string(),
            kind: "series".to_string(),
            offset: Some(mismatch.offset),
            candidate_mean: mismatch.candidate,
            reference_mean: Some(mismatch.reference),
            candidate_count: None,
            reference_count: None,
        }
    }
}

/// Final counters for one audit run.
#[derive(Debug, Clone, Serialize)]
pub struct AuditSummary {
    pub profile: String,
    pub seed: u64,
    pub iterations: u64,
    /// Iterations that produced a candidate/reference comparison.
    pub compared: u64,
    pub mismatches: u64,
    /// Cells whose reference was the missing sentinel, never checked.
    pub reference_missing: u64,
    /// Iterations abandoned because a daily file was unavailable.
    pub skipped_unavailable: u64,
    /// Composite iterations with no store document for the cell.
    pub skipped_no_document: u64,
    pub elapsed_secs: f64,
}

impl AuditSummary {
    /// Plain aligned-text summary; the list is short and fixed.
    pub fn format_table(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Audit results: {}\n", self.profile));
        out.push_str(&format!("  Seed:               {}\n", self.seed));
        out.push_str(&format!("  Iterations:         {}\n", self.iterations));
        out.push_str(&format!("  Compared:           {}\n", self.compared));
        out.push_str(&format!("  Mismatches:         {}\n", self.mismatches));
        out.push_str(&format!("  Reference missing:  {}\n", self.reference_missing));
        out.push_str(&format!("  Skipped (no file):  {}\n", self.skipped_unavailable));
        out.push_str(&format!("  Skipped (no doc):   {}\n", self.skipped_no_document));
        out.push_str(&format!("  Elapsed:            {:.1}s\n", self.elapsed_secs));
        out
    }

    /// Format the summary as JSON.
    pub fn format_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
