//! Aggregation and cross-validation engine for recomputed composite
//! statistics.
//!
//! The engine recomputes per-cell means from raw daily swath values, cleans
//! fixed-composite series with a completeness filter, and judges agreement
//! against reference values under the product's tolerance rules. It performs
//! no I/O itself: swath access sits behind the [`SwathSource`] seam and
//! reference values are handed in by the caller, so every function here is
//! pure and deterministic.

pub mod aggregate;
pub mod compare;
pub mod composite;

pub use aggregate::{aggregate, Aggregate, SwathSource};
pub use compare::{
    compare_series, compare_window, MismatchKind, ReferenceValue, SeriesMismatch, Verdict,
    WindowMismatch, ABS_TOLERANCE,
};
pub use composite::{concat_cleaned, reduce_composite, CompositeCellSeries};
