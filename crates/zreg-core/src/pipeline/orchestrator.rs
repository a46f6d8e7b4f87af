use std::ops::Range;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::denoise::Denoiser;
use crate::depth::{propagate, PropagationPlan};
use crate::error::{Result, ZregError};
use crate::io::{discover_inputs, write_stack};
use crate::table::ResultTable;

use super::config::PipelineConfig;
use super::intra::{process_file, FileOutput};
use super::types::{FileFailure, NoOpReporter, PipelineStage, ProgressReporter, RegistrationReport};

/// Registered and depth-aligned slices of a run, before anything is written.
#[derive(Debug)]
pub struct AlignedDepths {
    pub table: ResultTable,
    /// `outputs` is empty until [`write_outputs`] runs.
    pub report: RegistrationReport,
}

/// Discover the input files, register each one and align the depths.
///
/// A file that fails is recorded in the report and leaves its depth empty.
/// Registration of the anchor depth failing is fatal.
pub fn align_depths(
    config: &PipelineConfig,
    reporter: &dyn ProgressReporter,
    denoiser: Option<&dyn Denoiser>,
) -> Result<AlignedDepths> {
    config.validate()?;

    reporter.begin_stage(PipelineStage::Discovery, None);
    let files = discover_inputs(&config.target_dir, &config.file_stem, &config.output_names())?;
    info!(
        files = files.len(),
        dir = %config.target_dir.display(),
        "Found depth files"
    );
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Registration, Some(files.len()));
    let done = AtomicUsize::new(0);
    let run_one = |(depth, path): (usize, &PathBuf)| -> Result<FileOutput> {
        let result = process_file(depth, path, config, denoiser);
        reporter.advance(done.fetch_add(1, Ordering::Relaxed) + 1);
        result
    };
    let results: Vec<Result<FileOutput>> = if config.parallel_files {
        files.par_iter().enumerate().map(run_one).collect()
    } else {
        files.iter().enumerate().map(run_one).collect()
    };
    reporter.finish_stage();

    let mut table = ResultTable::new(files.len(), config.channels);
    let mut records = Vec::new();
    let mut failures = Vec::new();
    for (depth, result) in results.into_iter().enumerate() {
        table.set_source(depth, &files[depth])?;
        match result {
            Ok(output) => {
                table.insert_depth(depth, output.slices)?;
                records.push(output.record);
            }
            Err(error) => {
                warn!(depth, file = %files[depth].display(), %error, "Depth file failed");
                failures.push(FileFailure {
                    depth,
                    file: files[depth].clone(),
                    error,
                });
            }
        }
    }

    let anchor = PropagationPlan::new(files.len())?.anchor;
    if let Some(failure) = failures.iter().find(|f| f.depth == anchor) {
        return Err(ZregError::PropagationHalt {
            depth: anchor,
            reason: format!("{}: {}", failure.file.display(), failure.error),
        });
    }

    reporter.begin_stage(PipelineStage::DepthPropagation, Some(files.len()));
    let propagation = propagate(&mut table, config.reference_channel, &config.alignment)?;
    reporter.finish_stage();

    let aligned = propagation.aligned_range();
    info!(
        anchor = propagation.anchor,
        first = aligned.start,
        last = aligned.end.saturating_sub(1),
        "Depth alignment complete"
    );

    Ok(AlignedDepths {
        table,
        report: RegistrationReport {
            files,
            records,
            failures,
            propagation,
            outputs: Vec::new(),
        },
    })
}

/// Write one volume per channel holding the given depths, in depth order.
pub fn write_outputs(
    config: &PipelineConfig,
    table: &ResultTable,
    depths: Range<usize>,
    reporter: &dyn ProgressReporter,
) -> Result<Vec<PathBuf>> {
    reporter.begin_stage(PipelineStage::Writing, Some(table.channel_count()));
    let mut outputs = Vec::with_capacity(table.channel_count());
    for channel in 0..table.channel_count() {
        let pages = table
            .channel_views(channel, depths.clone())
            .ok_or_else(|| ZregError::PropagationHalt {
                depth: depths.start,
                reason: format!("channel {channel} has an empty depth in {depths:?}"),
            })?;
        let path = config.output_path(channel);
        write_stack(&path, &pages)?;
        info!(channel, pages = pages.len(), path = %path.display(), "Wrote channel volume");
        outputs.push(path);
        reporter.advance(channel + 1);
    }
    reporter.finish_stage();
    Ok(outputs)
}

/// Run the full registration pipeline with a thread-safe progress reporter
/// and an optional denoiser.
pub fn run_pipeline_with(
    config: &PipelineConfig,
    reporter: Arc<dyn ProgressReporter>,
    denoiser: Option<Arc<dyn Denoiser>>,
) -> Result<RegistrationReport> {
    let AlignedDepths { table, mut report } =
        align_depths(config, reporter.as_ref(), denoiser.as_deref())?;
    report.outputs = write_outputs(config, &table, report.aligned_depths(), reporter.as_ref())?;
    Ok(report)
}

/// Run the full registration pipeline with a thread-safe progress reporter.
pub fn run_pipeline_reported(
    config: &PipelineConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<RegistrationReport> {
    run_pipeline_with(config, reporter, None)
}

/// Run the full registration pipeline.
pub fn run_pipeline(config: &PipelineConfig) -> Result<RegistrationReport> {
    run_pipeline_reported(config, Arc::new(NoOpReporter))
}
