//! Audit execution: the bounded sampling loop around the engine.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use audit_common::{AuditResult, GridCell, GridIndex, VariablePair, WindowPolicy};
use audit_engine::{aggregate, compare_series, compare_window, concat_cleaned, Verdict};
use netcdf_archive::{BasinGrid, DailySwaths, DatasetLayout, MeanArchive};
use reference_store::SeriesStore;

use crate::config::{ProfileConfig, ProfileKind, ProofreaderConfig};
use crate::report::{AuditSummary, CellContext, MismatchRecord};
use crate::sampler::CellSampler;

/// Runs one profile for a bounded, seeded number of iterations.
///
/// Archives and the grid index load once up front so structural problems
/// fail fast; daily swath handles are scoped to a single read inside the
/// iteration. Transient conditions only skip the iteration; everything
/// else aborts the run.
pub struct AuditRunner {
    config: ProofreaderConfig,
    profile: ProfileConfig,
}

impl AuditRunner {
    pub fn new(config: ProofreaderConfig, profile_name: &str) -> anyhow::Result<Self> {
        let profile = config
            .profile(profile_name)
            .with_context(|| format!("no profile named '{}' in configuration", profile_name))?
            .clone();
        Ok(Self { config, profile })
    }

    pub fn profile(&self) -> &ProfileConfig {
        &self.profile
    }

    pub async fn run(
        &self,
        iterations: u64,
        seed: Option<u64>,
        report_path: Option<&Path>,
    ) -> anyhow::Result<AuditSummary> {
        netcdf_archive::silence_hdf5_errors();

        let layout = DatasetLayout::new(&self.config.data_dir, &self.config.daily_template);

        let basin = match &self.config.basin_mask {
            Some(mask) => Some(BasinGrid::open(
                layout.archive_path(&mask.path),
                &mask.variable,
            )?),
            None => None,
        };

        let mut reporter = Reporter::open(report_path)?;

        match &self.profile.kind {
            ProfileKind::Window {
                policy,
                variables,
                reference_archive,
            } => {
                self.run_window(
                    &layout,
                    policy,
                    variables,
                    reference_archive,
                    basin.as_ref(),
                    iterations,
                    seed,
                    &mut reporter,
                )
            }
            ProfileKind::Composite {
                archives,
                variables,
                required_count,
                batch_index,
            } => {
                self.run_composite(
                    &layout,
                    archives,
                    variables,
                    *required_count,
                    *batch_index,
                    basin.as_ref(),
                    iterations,
                    seed,
                    &mut reporter,
                )
                .await
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn run_window(
        &self,
        layout: &DatasetLayout,
        policy: &WindowPolicy,
        variables: &VariablePair,
        reference_archive: &str,
        basin: Option<&BasinGrid>,
        iterations: u64,
        seed: Option<u64>,
        reporter: &mut Reporter,
    ) -> anyhow::Result<AuditSummary> {
        let archive = MeanArchive::open(layout.archive_path(reference_archive))?;
        let index = archive.coordinates()?;

        // Every window's reference index must exist on the archive's time
        // axis; checking now beats finding out mid-run.
        let time_len = archive.time_len()?;
        let max_reference_index = (0..policy.window_count())
            .filter_map(|k| policy.window_at(k))
            .map(|w| w.reference_index)
            .max()
            .unwrap_or(0);
        if max_reference_index >= time_len {
            anyhow::bail!(
                "profile '{}' needs time index {} but {} has only {} steps",
                self.profile.name,
                max_reference_index,
                reference_archive,
                time_len
            );
        }

        let swaths = DailySwaths::new(layout.clone(), &variables.value);
        let mut sampler = CellSampler::new(index.rows(), index.columns(), seed);
        info!(
            profile = %self.profile.name,
            seed = sampler.seed(),
            iterations,
            "starting window audit"
        );

        let mut summary = AuditSummary::empty(&self.profile.name, sampler.seed(), iterations);
        let pb = progress_bar(iterations);
        let start = Instant::now();

        for _ in 0..iterations {
            pb.inc(1);
            let cell = sampler.next_cell();
            let window_index = sampler.next_window_index(policy);
            let window = policy
                .window_at(window_index)
                .expect("sampled window index in range");

            let candidate = match aggregate(&swaths, cell, &window) {
                Ok(candidate) => candidate,
                Err(e) if e.is_transient() => {
                    debug!(window = %window.label, error = %e, "window skipped");
                    summary.skipped_unavailable += 1;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let reference = archive.reference_value(variables, window.reference_index, cell)?;

            match compare_window(candidate, &reference) {
                Verdict::Match => summary.compared += 1,
                Verdict::ReferenceMissing => summary.reference_missing += 1,
                Verdict::Mismatch(mismatch) => {
                    summary.compared += 1;
                    summary.mismatches += 1;
                    let ctx = cell_context(&index, basin, cell)?;
                    reporter.emit(&MismatchRecord::from_window(
                        &self.profile.name,
                        &variables.value,
                        &window.label,
                        &ctx,
                        &mismatch,
                    ))?;
                }
            }
        }

        pb.finish_and_clear();
        summary.elapsed_secs = start.elapsed().as_secs_f64();
        reporter.flush()?;
        Ok(summary)
    }

    #[allow(clippy::too_many_arguments)]
    async fn run_composite(
        &self,
        layout: &DatasetLayout,
        archive_names: &[String],
        variables: &VariablePair,
        required_count: u32,
        batch_index: usize,
        basin: Option<&BasinGrid>,
        iterations: u64,
        seed: Option<u64>,
        reporter: &mut Reporter,
    ) -> anyhow::Result<AuditSummary> {
        let archives = archive_names
            .iter()
            .map(|name| MeanArchive::open(layout.archive_path(name)))
            .collect::<AuditResult<Vec<_>>>()?;
        let index = archives[0].coordinates()?;

        let store = SeriesStore::connect(&self.config.database_url()?).await?;

        let mut sampler = CellSampler::new(index.rows(), index.columns(), seed);
        info!(
            profile = %self.profile.name,
            seed = sampler.seed(),
            iterations,
            "starting composite audit"
        );

        let archive_label = archive_names.join(",");
        let mut summary = AuditSummary::empty(&self.profile.name, sampler.seed(), iterations);
        let pb = progress_bar(iterations);
        let start = Instant::now();

        for _ in 0..iterations {
            pb.inc(1);
            let cell = sampler.next_cell();
            let cell_key = index.cell_key(cell)?;

            // Sparse reference coverage (land cells) is expected.
            let document = match store.fetch(&cell_key).await? {
                Some(document) => document,
                None => {
                    debug!(cell_key = %cell_key, "no store document");
                    summary.skipped_no_document += 1;
                    continue;
                }
            };

            let series = archives
                .iter()
                .map(|archive| archive.cell_series(variables, cell))
                .collect::<AuditResult<Vec<_>>>()?;
            let cleaned = concat_cleaned(&series, required_count)?;
            let reference = document.reference_series(batch_index)?;

            summary.compared += 1;
            for mismatch in compare_series(&cleaned, &reference)? {
                summary.mismatches += 1;
                let ctx = cell_context(&index, basin, cell)?;
                reporter.emit(&MismatchRecord::from_series(
                    &self.profile.name,
                    &variables.value,
                    &archive_label,
                    &ctx,
                    &mismatch,
                ))?;
            }
        }

        pb.finish_and_clear();
        summary.elapsed_secs = start.elapsed().as_secs_f64();
        reporter.flush()?;
        Ok(summary)
    }
}

fn cell_context(
    index: &GridIndex,
    basin: Option<&BasinGrid>,
    cell: GridCell,
) -> AuditResult<CellContext> {
    let (latitude, longitude) = index.normalized_lat_lon(cell)?;
    Ok(CellContext {
        cell_key: index.cell_key(cell)?,
        row: cell.row,
        column: cell.column,
        latitude,
        longitude,
        basin: basin.and_then(|b| b.basin_at(longitude, latitude)),
    })
}

fn progress_bar(iterations: u64) -> ProgressBar {
    let pb = ProgressBar::new(iterations);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .expect("Invalid progress bar template")
            .progress_chars("##-"),
    );
    pb
}

/// Emits mismatch records: always via the log, optionally as JSONL.
struct Reporter {
    writer: Option<BufWriter<File>>,
}

impl Reporter {
    fn open(path: Option<&Path>) -> anyhow::Result<Self> {
        let writer = match path {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("cannot create report file {}", path.display()))?;
                Some(BufWriter::new(file))
            }
            None => None,
        };
        Ok(Self { writer })
    }

    fn emit(&mut self, record: &MismatchRecord) -> anyhow::Result<()> {
        warn!(
            profile = %record.profile,
            cell_key = %record.cell_key,
            kind = %record.kind,
            candidate = ?record.candidate_mean,
            reference = ?record.reference_mean,
            "mismatch"
        );
        if let Some(writer) = &mut self.writer {
            serde_json::to_writer(&mut *writer, record)?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    }

    fn flush(&mut self) -> anyhow::Result<()> {
        if let Some(writer) = &mut self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl AuditSummary {
    fn empty(profile: &str, seed: u64, iterations: u64) -> Self {
        Self {
            profile: profile.to_string(),
            seed,
            iterations,
            compared: 0,
            mismatches: 0,
            reference_missing: 0,
            skipped_unavailable: 0,
            skipped_no_document: 0,
            elapsed_secs: 0.0,
        }
    }
}
