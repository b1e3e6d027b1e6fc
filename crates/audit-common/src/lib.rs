//! Common types and utilities shared across the ssh-audit crates.

pub mod error;
pub mod grid;
pub mod missing;
pub mod window;

pub use error::{AuditError, AuditResult};
pub use grid::{normalize_longitude, GridCell, GridIndex};
pub use missing::{decode_raw, decode_reference_mean, DEFAULT_FILL_VALUE, DEFAULT_SCALE_FACTOR, REFERENCE_MISSING};
pub use window::{TimeWindow, VariablePair, WindowPolicy};
