//! NetCDF access for the audit: daily swath files, mean/composite
//! reference archives, and the optional basin mask.
//!
//! All decoding of the product's missing-value conventions happens here, at
//! the archive boundary; callers only ever see `Option<f64>`.

use std::sync::Once;

pub mod basin;
pub mod layout;
pub mod mean;
pub mod swath;

pub use basin::BasinGrid;
pub use layout::DatasetLayout;
pub use mean::MeanArchive;
pub use swath::DailySwaths;

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose diagnostics to stderr even when errors
/// are handled gracefully on the Rust side, e.g. when probing for optional
/// attributes. Call once early in startup, before any NetCDF operation.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and null handlers are the
        // documented way to disable automatic error reporting.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Helper to get an f64 attribute.
fn get_f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f64::try_from(attr_value).ok()
}

/// Helper to get an i32 attribute.
fn get_i32_attr(var: &netcdf::Variable, name: &str) -> Option<i32> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    i32::try_from(attr_value).ok()
}
