//! Missing-value conventions of the altimetry product family.
//!
//! Raw daily swath files store scaled integers with a fill sentinel;
//! reference archives store floats with `-999.9` marking cells that had no
//! valid observations. Both are decoded to `Option<f64>` at the archive
//! boundary so no sentinel arithmetic happens downstream.

/// Fill sentinel of the raw scaled-integer swath encoding.
pub const DEFAULT_FILL_VALUE: i32 = -2147483647;

/// Scale factor applied to raw swath integers.
pub const DEFAULT_SCALE_FACTOR: f64 = 1.0e-4;

/// "No valid observations" sentinel of the reference archives.
pub const REFERENCE_MISSING: f64 = -999.9;

/// Decode a raw swath integer: fill becomes `None`, anything else is scaled.
pub fn decode_raw(raw: i32, fill_value: i32, scale_factor: f64) -> Option<f64> {
    if raw == fill_value {
        None
    } else {
        Some(raw as f64 * scale_factor)
    }
}

/// Decode a reference-archive mean: the `-999.9` sentinel becomes `None`.
pub fn decode_reference_mean(value: f64) -> Option<f64> {
    if value == REFERENCE_MISSING {
        None
    } else {
        Some(value)
    }
}
