//! Integration tests over real NetCDF files.
//!
//! Builds small daily swath and reference archive files in a temp
//! directory and runs the real archive access paths against them.

use std::path::Path;

use audit_common::{GridCell, TimeWindow, VariablePair};
use audit_engine::{aggregate, compare_window, reduce_composite, SwathSource, Verdict};
use netcdf_archive::{DailySwaths, DatasetLayout, MeanArchive};

const FILL: i32 = -2147483647;

fn vars() -> VariablePair {
    VariablePair {
        value: "sla".to_string(),
        count: "nobs".to_string(),
    }
}

/// Write a 1x2x2 daily swath file with the product's integer encoding.
fn write_daily(dir: &Path, date: &str, values: [i32; 4]) {
    let path = dir.join(format!("dt_global_twosat_phy_l4_{}_vDT2021.nc", date));
    let mut file = netcdf::create(&path).unwrap();
    file.add_dimension("time", 1).unwrap();
    file.add_dimension("latitude", 2).unwrap();
    file.add_dimension("longitude", 2).unwrap();

    let mut sla = file
        .add_variable::<i32>("sla", &["time", "latitude", "longitude"])
        .unwrap();
    sla.set_fill_value(FILL).unwrap();
    sla.put_attribute("scale_factor", 1.0e-4f64).unwrap();
    sla.put_values(&values, (0, .., ..)).unwrap();

    let mut lat = file.add_variable::<f64>("latitude", &["latitude"]).unwrap();
    lat.put_values(&[-0.125, 0.125], ..).unwrap();
    let mut lon = file.add_variable::<f64>("longitude", &["longitude"]).unwrap();
    lon.put_values(&[0.125, 200.375], ..).unwrap();
}

/// Write a reference archive with two time steps over the same 2x2 grid.
fn write_mean_archive(path: &Path, sla: [f64; 8], nobs: [f64; 8]) {
    let mut file = netcdf::create(path).unwrap();
    file.add_dimension("time", 2).unwrap();
    file.add_dimension("latitude", 2).unwrap();
    file.add_dimension("longitude", 2).unwrap();

    let mut sla_var = file
        .add_variable::<f64>("sla", &["time", "latitude", "longitude"])
        .unwrap();
    sla_var.put_values(&sla, (.., .., ..)).unwrap();

    let mut nobs_var = file
        .add_variable::<f64>("nobs", &["time", "latitude", "longitude"])
        .unwrap();
    nobs_var.put_values(&nobs, (.., .., ..)).unwrap();

    let mut lat = file.add_variable::<f64>("latitude", &["latitude"]).unwrap();
    lat.put_values(&[-0.125, 0.125], ..).unwrap();
    let mut lon = file.add_variable::<f64>("longitude", &["longitude"]).unwrap();
    lon.put_values(&[0.125, 200.375], ..).unwrap();
}

#[test]
fn test_daily_swath_decodes_fill_and_scale() {
    netcdf_archive::silence_hdf5_errors();
    let dir = tempfile::tempdir().unwrap();
    write_daily(dir.path(), "19930114", [1234, FILL, -500, 0]);

    let layout = DatasetLayout::new(dir.path(), netcdf_archive::layout::DEFAULT_DAILY_TEMPLATE);
    let swaths = DailySwaths::new(layout, "sla");

    // 1234 * 1e-4 is not the 0.1234 double, so compare with an epsilon
    let scaled = swaths
        .cell_value("19930114", GridCell::new(0, 0))
        .unwrap()
        .unwrap();
    assert!((scaled - 0.1234).abs() < 1e-12);
    assert_eq!(
        swaths.cell_value("19930114", GridCell::new(0, 1)).unwrap(),
        None
    );
    // -500 * 1e-4 rounds to the -0.05 double exactly
    assert_eq!(
        swaths.cell_value("19930114", GridCell::new(1, 0)).unwrap(),
        Some(-0.05)
    );
}

#[test]
fn test_missing_daily_file_is_transient() {
    netcdf_archive::silence_hdf5_errors();
    let dir = tempfile::tempdir().unwrap();
    let layout = DatasetLayout::new(dir.path(), netcdf_archive::layout::DEFAULT_DAILY_TEMPLATE);
    let swaths = DailySwaths::new(layout, "sla");

    let err = swaths
        .cell_value("19930114", GridCell::new(0, 0))
        .unwrap_err();
    assert!(err.is_transient());
}

#[test]
fn test_mean_archive_reference_value() {
    netcdf_archive::silence_hdf5_errors();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ssh_mean_1993.nc");
    write_mean_archive(
        &path,
        [0.1, -999.9, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8],
        [7.0, 0.0, 7.0, 3.0, 7.0, 7.0, 2.0, 7.0],
    );

    let archive = MeanArchive::open(&path).unwrap();
    assert_eq!(archive.time_len().unwrap(), 2);

    let present = archive
        .reference_value(&vars(), 0, GridCell::new(0, 0))
        .unwrap();
    assert_eq!(present.mean, Some(0.1));
    assert_eq!(present.count, 7.0);

    let missing = archive
        .reference_value(&vars(), 0, GridCell::new(0, 1))
        .unwrap();
    assert_eq!(missing.mean, None);
}

#[test]
fn test_mean_archive_coordinates_and_keys() {
    netcdf_archive::silence_hdf5_errors();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ssh_mean_1993.nc");
    write_mean_archive(&path, [0.0; 8], [0.0; 8]);

    let index = MeanArchive::open(&path).unwrap().coordinates().unwrap();
    assert_eq!(index.rows(), 2);
    assert_eq!(index.columns(), 2);
    // 200.375 normalizes below 180 for the store key
    assert_eq!(index.cell_key(GridCell::new(1, 1)).unwrap(), "-159.625_0.125");
}

#[test]
fn test_missing_variable_is_structural() {
    netcdf_archive::silence_hdf5_errors();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ssh_mean_1993.nc");
    write_mean_archive(&path, [0.0; 8], [0.0; 8]);

    let archive = MeanArchive::open(&path).unwrap();
    let bad = VariablePair {
        value: "adt".to_string(),
        count: "nobs".to_string(),
    };
    let err = archive
        .reference_value(&bad, 0, GridCell::new(0, 0))
        .unwrap_err();
    assert!(!err.is_transient());
}

#[test]
fn test_full_window_pass_against_reference() {
    netcdf_archive::silence_hdf5_errors();
    let dir = tempfile::tempdir().unwrap();

    // three daily files; cell (0,0) carries 0.1, 0.2 and a fill
    write_daily(dir.path(), "19930114", [1000, FILL, FILL, FILL]);
    write_daily(dir.path(), "19930115", [2000, FILL, FILL, FILL]);
    write_daily(dir.path(), "19930116", [FILL, FILL, FILL, FILL]);

    // reference at time 1 agrees with the recomputed (0.15, 2)
    let mean_path = dir.path().join("ssh_mean_1993.nc");
    write_mean_archive(
        &mean_path,
        [0.0, -999.9, -999.9, -999.9, 0.15, -999.9, -999.9, -999.9],
        [0.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0],
    );

    let layout = DatasetLayout::new(dir.path(), netcdf_archive::layout::DEFAULT_DAILY_TEMPLATE);
    let swaths = DailySwaths::new(layout, "sla");
    let window = TimeWindow {
        dates: vec!["19930114".into(), "19930115".into(), "19930116".into()],
        reference_index: 1,
        label: "1993-01-15T00:00:00+00:00".into(),
    };

    let cell = GridCell::new(0, 0);
    let candidate = aggregate(&swaths, cell, &window).unwrap();
    assert_eq!(candidate.count, 2);

    let archive = MeanArchive::open(&mean_path).unwrap();
    let reference = archive
        .reference_value(&vars(), window.reference_index, cell)
        .unwrap();
    assert_eq!(compare_window(candidate, &reference), Verdict::Match);

    // the all-fill neighbour cell has a missing reference and stays silent
    let silent_cell = GridCell::new(0, 1);
    let silent = aggregate(&swaths, silent_cell, &window).unwrap();
    let silent_ref = archive
        .reference_value(&vars(), window.reference_index, silent_cell)
        .unwrap();
    assert_eq!(compare_window(silent, &silent_ref), Verdict::ReferenceMissing);
}

#[test]
fn test_composite_series_reduction_from_archive() {
    netcdf_archive::silence_hdf5_errors();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ssh_mean_1993.nc");
    // cell (0,0): time 0 complete, time 1 short one pass
    write_mean_archive(
        &path,
        [0.1, 0.0, 0.0, 0.0, 0.2, 0.0, 0.0, 0.0],
        [7.0, 0.0, 0.0, 0.0, 6.0, 0.0, 0.0, 0.0],
    );

    let archive = MeanArchive::open(&path).unwrap();
    let series = archive.cell_series(&vars(), GridCell::new(0, 0)).unwrap();
    assert_eq!(series.means, vec![0.1, 0.2]);
    assert_eq!(series.counts, vec![7.0, 6.0]);

    let cleaned = reduce_composite(&series, 7).unwrap();
    assert_eq!(cleaned, vec![Some(0.1), None]);
}
