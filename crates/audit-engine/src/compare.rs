//! Tolerance comparison of recomputed values against stored references.

use is_close::is_close;
use serde::Serialize;

use audit_common::{AuditError, AuditResult};

use crate::aggregate::Aggregate;

/// Absolute tolerance for window mean/count agreement, boundary-inclusive.
pub const ABS_TOLERANCE: f64 = 1e-5;

/// Slack added to the tolerance so a difference of exactly `ABS_TOLERANCE`
/// in ideal arithmetic still passes after f64 rounding (0.12345 - 0.12344
/// rounds to just above 1e-5).
const TOLERANCE_SLACK: f64 = 1e-12;

fn within_abs_tolerance(a: f64, b: f64) -> bool {
    is_close!(a, b, abs_tol = ABS_TOLERANCE + TOLERANCE_SLACK, rel_tol = 0.0)
}

/// The stored (mean, count) pair for a cell at one time index. A `None`
/// mean is the archive's `-999.9` sentinel, already decoded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceValue {
    pub mean: Option<f64>,
    pub count: f64,
}

/// Which part of a window comparison disagreed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchKind {
    /// The candidate window had zero valid observations against a present
    /// reference; there is nothing numeric to compare.
    NoObservations,
    Mean,
    Count,
}

/// A window-level disagreement, carrying both sides for the report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowMismatch {
    pub kind: MismatchKind,
    pub candidate_mean: Option<f64>,
    pub candidate_count: u32,
    pub reference_mean: Option<f64>,
    pub reference_count: f64,
}

/// Outcome of one window comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    Match,
    /// The reference itself is missing; such cells are never checked, not
    /// even for count agreement, and produce no report.
    ReferenceMissing,
    Mismatch(WindowMismatch),
}

/// Judge a recomputed window aggregate against the stored reference.
pub fn compare_window(candidate: Aggregate, reference: &ReferenceValue) -> Verdict {
    let reference_mean = match reference.mean {
        Some(mean) => mean,
        None => return Verdict::ReferenceMissing,
    };

    let mismatch = |kind| {
        Verdict::Mismatch(WindowMismatch {
            kind,
            candidate_mean: candidate.mean,
            candidate_count: candidate.count,
            reference_mean: reference.mean,
            reference_count: reference.count,
        })
    };

    let candidate_mean = match candidate.mean {
        Some(mean) => mean,
        None => return mismatch(MismatchKind::NoObservations),
    };

    if !within_abs_tolerance(candidate_mean, reference_mean) {
        return mismatch(MismatchKind::Mean);
    }
    if !within_abs_tolerance(candidate.count as f64, reference.count) {
        return mismatch(MismatchKind::Count);
    }

    Verdict::Match
}

/// One disagreement in a composite-series comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesMismatch {
    pub offset: usize,
    pub candidate: Option<f64>,
    pub reference: f64,
}

/// Compare a cleaned composite series against the stored reference series.
///
/// A present candidate entry must equal the reference after both are
/// rounded to 4 decimal digits; a missing candidate entry requires the
/// reference to carry the not-a-number marker. A reference series shorter
/// than the candidate means the store and the archive list are out of
/// sync, which is structural.
pub fn compare_series(
    candidate: &[Option<f64>],
    reference: &[f64],
) -> AuditResult<Vec<SeriesMismatch>> {
    if reference.len() < candidate.len() {
        return Err(AuditError::ShapeMismatch(format!(
            "reference series has {} entries but candidate has {}",
            reference.len(),
            candidate.len()
        )));
    }

    let mut mismatches = Vec::new();
    for (offset, (&entry, &stored)) in candidate.iter().zip(reference.iter()).enumerate() {
        let agrees = match entry {
            Some(value) => round4(value) == round4(stored),
            None => stored.is_nan(),
        };
        if !agrees {
            mismatches.push(SeriesMismatch {
                offset,
                candidate: entry,
                reference: stored,
            });
        }
    }
    Ok(mismatches)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
