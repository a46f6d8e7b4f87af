use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ANCHOR_FRACTION, DEFAULT_LINE_PAIRS, DEFAULT_UPSAMPLE_FACTOR};
use crate::error::{Result, ZregError};
use crate::io::{output_file_name, AcquisitionLayout};

/// Everything one registration run needs, accepted as a single aggregate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Substring shared by the file names of every depth plane.
    pub file_stem: String,
    /// Directory holding the input files; outputs are written here too.
    pub target_dir: PathBuf,
    /// Channel the registration is measured on (0-based).
    #[serde(default)]
    pub reference_channel: usize,
    /// Number of channels interleaved in every page cycle.
    #[serde(default = "default_one")]
    pub channels: usize,
    /// Number of fast-z slices interleaved in every file.
    #[serde(default = "default_one")]
    pub fast_z_slices: usize,
    /// Fast-z bucket to extract (0-based).
    #[serde(default)]
    pub fast_z_slice: usize,
    /// Step between fast-z slices in microns. Recorded, never used in the math.
    #[serde(default)]
    pub fast_z_step: f64,
    /// Prepended to output file names.
    #[serde(default)]
    pub output_prefix: String,
    /// Seed for line-pair sampling.
    #[serde(default)]
    pub seed: u64,
    /// Maximum number of odd/even row pairs used for the line offset.
    #[serde(default = "default_line_pairs")]
    pub line_pairs: usize,
    /// Fraction of leading frames averaged into the anchor image.
    #[serde(default = "default_anchor_fraction")]
    pub anchor_fraction: f64,
    /// Register files concurrently on the rayon pool.
    #[serde(default)]
    pub parallel_files: bool,
    #[serde(default)]
    pub alignment: AlignmentConfig,
}

fn default_one() -> usize {
    1
}

fn default_line_pairs() -> usize {
    DEFAULT_LINE_PAIRS
}

fn default_anchor_fraction() -> f64 {
    DEFAULT_ANCHOR_FRACTION
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            file_stem: String::new(),
            target_dir: PathBuf::from("."),
            reference_channel: 0,
            channels: 1,
            fast_z_slices: 1,
            fast_z_slice: 0,
            fast_z_step: 0.0,
            output_prefix: String::new(),
            seed: 0,
            line_pairs: DEFAULT_LINE_PAIRS,
            anchor_fraction: DEFAULT_ANCHOR_FRACTION,
            parallel_files: false,
            alignment: AlignmentConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn new(target_dir: impl Into<PathBuf>, file_stem: impl Into<String>) -> Self {
        Self {
            target_dir: target_dir.into(),
            file_stem: file_stem.into(),
            ..Default::default()
        }
    }

    pub fn layout(&self) -> AcquisitionLayout {
        AcquisitionLayout {
            channels: self.channels,
            fast_z_slices: self.fast_z_slices,
            fast_z_slice: self.fast_z_slice,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.layout().validate()?;
        if self.file_stem.is_empty() {
            return Err(ZregError::InvalidConfig("file_stem must not be empty".into()));
        }
        if self.reference_channel >= self.channels {
            return Err(ZregError::InvalidConfig(format!(
                "reference_channel {} is outside 0..{}",
                self.reference_channel, self.channels
            )));
        }
        if !(self.anchor_fraction > 0.0 && self.anchor_fraction <= 1.0) {
            return Err(ZregError::InvalidConfig(format!(
                "anchor_fraction {} must be in (0, 1]",
                self.anchor_fraction
            )));
        }
        if self.line_pairs == 0 {
            return Err(ZregError::InvalidConfig("line_pairs must be at least 1".into()));
        }
        Ok(())
    }

    pub fn output_name(&self, channel: usize) -> String {
        output_file_name(&self.output_prefix, &self.file_stem, channel)
    }

    pub fn output_path(&self, channel: usize) -> PathBuf {
        self.target_dir.join(self.output_name(channel))
    }

    /// Output names of every channel, excluded from input discovery.
    pub fn output_names(&self) -> Vec<String> {
        (0..self.channels).map(|c| self.output_name(c)).collect()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Sub-pixel resolution is `1 / upsample_factor`; 1 gives integer shifts.
    pub upsample_factor: usize,
    pub normalization: CorrelationNormalization,
    /// Apply a Hann window before the FFT.
    pub hann_window: bool,
    pub resample: ResampleMethod,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            upsample_factor: DEFAULT_UPSAMPLE_FACTOR,
            normalization: CorrelationNormalization::default(),
            hann_window: false,
            resample: ResampleMethod::default(),
        }
    }
}

/// Weighting of the cross-power spectrum before the inverse transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationNormalization {
    /// Unit magnitude: pure phase correlation.
    #[default]
    Phase,
    /// Plain cross-correlation.
    None,
}

impl std::fmt::Display for CorrelationNormalization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Phase => write!(f, "Phase"),
            Self::None => write!(f, "None"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResampleMethod {
    /// Bilinear interpolation, zero outside the image.
    #[default]
    Bilinear,
    /// Circular shift through the Fourier shift theorem.
    Fourier,
}

impl std::fmt::Display for ResampleMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bilinear => write!(f, "Bilinear"),
            Self::Fourier => write!(f, "Fourier"),
        }
    }
}
