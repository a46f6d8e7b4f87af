use std::ops::Range;
use std::path::PathBuf;

use crate::depth::PropagationOutcome;
use crate::error::ZregError;
use crate::frame::ShiftVector;
use crate::lineoffset::LineOffset;

/// Stage names shown by progress reporters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Discovery,
    Registration,
    DepthPropagation,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Discovery => write!(f, "Finding files"),
            Self::Registration => write!(f, "Registering files"),
            Self::DepthPropagation => write!(f, "Aligning depths"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// Receives stage and item progress from a pipeline run.
///
/// May be called from rayon workers when files are registered in parallel.
/// Every method defaults to doing nothing.
pub trait ProgressReporter: Send + Sync {
    /// `total_items` is the work-item count of the stage (files, channels)
    /// when known up front.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// `items_done` items of the current stage have finished.
    fn advance(&self, _items_done: usize) {}

    fn finish_stage(&self) {}
}

/// Reporter used when the caller supplies none.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}

/// A numeric edge case resolved locally with a fallback value.
#[derive(Clone, Debug, PartialEq)]
pub enum QualityWarning {
    /// The channel bucket held one frame, so the warm-up frame was used.
    WarmupFrameRetained { depth: usize, channel: usize },
    /// The anchor fraction selected no frames; the first frame was used alone.
    AnchorFrameFloor { depth: usize, available: usize },
    /// No odd/even row pairs; the line offset fell back to 0.
    DegenerateLineOffset { depth: usize },
}

impl std::fmt::Display for QualityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WarmupFrameRetained { depth, channel } => write!(
                f,
                "depth {depth}, channel {channel}: single frame, warm-up frame kept"
            ),
            Self::AnchorFrameFloor { depth, available } => write!(
                f,
                "depth {depth}: anchor built from 1 of {available} frames"
            ),
            Self::DegenerateLineOffset { depth } => {
                write!(f, "depth {depth}: no row pairs, line offset set to 0")
            }
        }
    }
}

/// Step 1 outcome for one file.
#[derive(Clone, Debug)]
pub struct DepthRecord {
    pub depth: usize,
    pub file: PathBuf,
    pub line_offset: LineOffset,
    /// Frames averaged into the anchor image.
    pub anchor_frames: usize,
    /// Shift applied to each reference-channel frame, in frame order.
    pub frame_shifts: Vec<ShiftVector>,
    pub warnings: Vec<QualityWarning>,
}

/// A file whose Step 1 processing failed.
#[derive(Debug)]
pub struct FileFailure {
    pub depth: usize,
    pub file: PathBuf,
    pub error: ZregError,
}

/// Summary of a whole registration run.
#[derive(Debug)]
pub struct RegistrationReport {
    /// Input files in depth order.
    pub files: Vec<PathBuf>,
    /// Successfully processed depths, in depth order.
    pub records: Vec<DepthRecord>,
    pub failures: Vec<FileFailure>,
    pub propagation: PropagationOutcome,
    /// Written channel volumes, in channel order.
    pub outputs: Vec<PathBuf>,
}

impl RegistrationReport {
    /// Depths written to the output volumes.
    pub fn aligned_depths(&self) -> Range<usize> {
        self.propagation.aligned_range()
    }

    pub fn record(&self, depth: usize) -> Option<&DepthRecord> {
        self.records.iter().find(|r| r.depth == depth)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &QualityWarning> {
        self.records.iter().flat_map(|r| r.warnings.iter())
    }
}
