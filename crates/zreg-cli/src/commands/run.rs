use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use zreg_core::pipeline::config::{CorrelationNormalization, PipelineConfig, ResampleMethod};
use zreg_core::pipeline::run_pipeline_reported;

use crate::progress::BarReporter;
use crate::summary::{print_report, print_run_summary};

#[derive(Clone, Copy, ValueEnum)]
pub enum ResampleArg {
    Bilinear,
    Fourier,
}

#[derive(Args)]
pub struct RunArgs {
    /// Directory holding one stack file per depth
    pub dir: PathBuf,

    /// Substring shared by every depth file name
    #[arg(long)]
    pub stem: Option<String>,

    /// Pipeline config file (TOML); flags given here override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of interleaved channels
    #[arg(long)]
    pub channels: Option<usize>,

    /// Channel the registration is measured on
    #[arg(long)]
    pub reference_channel: Option<usize>,

    /// Number of interleaved fast-z slices per file
    #[arg(long)]
    pub fast_z_slices: Option<usize>,

    /// Fast-z bucket to extract
    #[arg(long)]
    pub fast_z_slice: Option<usize>,

    /// Fast-z step in microns (recorded only)
    #[arg(long)]
    pub fast_z_step: Option<f64>,

    /// Prefix for output file names
    #[arg(long)]
    pub prefix: Option<String>,

    /// Seed for line-pair sampling
    #[arg(long)]
    pub seed: Option<u64>,

    /// Maximum odd/even row pairs for line-offset estimation
    #[arg(long)]
    pub line_pairs: Option<usize>,

    /// Fraction of leading frames averaged into the anchor image (0-1]
    #[arg(long)]
    pub anchor_fraction: Option<f64>,

    /// Sub-pixel upsampling factor for phase correlation
    #[arg(long)]
    pub upsample: Option<usize>,

    /// Resampling method for applying shifts
    #[arg(long, value_enum)]
    pub resample: Option<ResampleArg>,

    /// Apply a Hann window before correlating
    #[arg(long)]
    pub hann: bool,

    /// Use plain cross-correlation instead of phase correlation
    #[arg(long)]
    pub no_normalize: bool,

    /// Register depth files concurrently
    #[arg(long)]
    pub parallel_files: bool,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = build_config(args)?;
    print_run_summary(&config);

    let reporter = Arc::new(BarReporter::new()?);
    let report = run_pipeline_reported(&config, reporter.clone())?;
    reporter.finish();

    print_report(&report);
    Ok(())
}

fn build_config(args: &RunArgs) -> Result<PipelineConfig> {
    let mut config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid pipeline config")?
    } else {
        PipelineConfig::default()
    };

    config.target_dir = args.dir.clone();
    if let Some(ref stem) = args.stem {
        config.file_stem = stem.clone();
    }
    if let Some(v) = args.channels {
        config.channels = v;
    }
    if let Some(v) = args.reference_channel {
        config.reference_channel = v;
    }
    if let Some(v) = args.fast_z_slices {
        config.fast_z_slices = v;
    }
    if let Some(v) = args.fast_z_slice {
        config.fast_z_slice = v;
    }
    if let Some(v) = args.fast_z_step {
        config.fast_z_step = v;
    }
    if let Some(ref prefix) = args.prefix {
        config.output_prefix = prefix.clone();
    }
    if let Some(v) = args.seed {
        config.seed = v;
    }
    if let Some(v) = args.line_pairs {
        config.line_pairs = v;
    }
    if let Some(v) = args.anchor_fraction {
        config.anchor_fraction = v;
    }
    if let Some(v) = args.upsample {
        config.alignment.upsample_factor = v;
    }
    if let Some(method) = args.resample {
        config.alignment.resample = match method {
            ResampleArg::Bilinear => ResampleMethod::Bilinear,
            ResampleArg::Fourier => ResampleMethod::Fourier,
        };
    }
    if args.hann {
        config.alignment.hann_window = true;
    }
    if args.no_normalize {
        config.alignment.normalization = CorrelationNormalization::None;
    }
    if args.parallel_files {
        config.parallel_files = true;
    }

    config.validate()?;
    Ok(config)
}
