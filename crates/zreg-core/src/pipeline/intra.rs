use std::path::Path;

use ndarray::{Array2, Array3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::align::{build_anchor, register_stack};
use crate::denoise::{denoise_batch, Denoiser};
use crate::error::{Result, ZregError};
use crate::io::load_volume;
use crate::lineoffset::{correct_line_offset, estimate_line_offset};

use super::config::PipelineConfig;
use super::types::{DepthRecord, QualityWarning};

/// One corrected slice per channel for a single depth, plus what it took.
#[derive(Clone, Debug)]
pub struct FileOutput {
    /// Indexed by channel.
    pub slices: Vec<Array2<f32>>,
    pub record: DepthRecord,
}

/// Register, average and line-correct every channel of one acquisition file.
///
/// The reference channel yields the anchor image and the line offset; every
/// other channel is registered onto that anchor and corrected with that offset.
pub fn process_file(
    depth: usize,
    path: &Path,
    config: &PipelineConfig,
    denoiser: Option<&dyn Denoiser>,
) -> Result<FileOutput> {
    let volume = load_volume(path)?;
    let layout = config.layout();
    let page_count = volume.frame_count();
    info!(
        depth,
        file = %path.display(),
        pages = page_count,
        rows = volume.rows(),
        cols = volume.cols(),
        "Loaded depth file"
    );

    let mut warnings = Vec::new();
    let mut stacks: Vec<Array3<f32>> = Vec::with_capacity(config.channels);
    for channel in 0..config.channels {
        let frames = layout.usable_frames(channel, page_count);
        if frames.is_empty() {
            return Err(ZregError::InsufficientFrames {
                file: path.to_path_buf(),
                channel,
            });
        }
        if frames.warmup_retained {
            warnings.push(QualityWarning::WarmupFrameRetained { depth, channel });
        }
        stacks.push(volume.select_frames(&frames.pages));
    }
    drop(volume);

    if let Some(denoiser) = denoiser {
        info!(depth, denoiser = denoiser.name(), "Denoising channel stacks");
        stacks = denoise_batch(denoiser, stacks)?;
    }

    let rc = config.reference_channel;
    let scope = |channel: usize| format!("{}, depth {depth}, channel {channel}", path.display());

    let reference = stacks[rc].view();
    let anchor = build_anchor(reference, config.anchor_fraction, &config.alignment)
        .map_err(|e| e.with_context(&scope(rc)))?;
    if anchor.floored {
        warnings.push(QualityWarning::AnchorFrameFloor {
            depth,
            available: reference.dim().2,
        });
    }

    let registered = register_stack(reference, anchor.image.view(), &config.alignment)
        .map_err(|e| e.with_context(&scope(rc)))?;
    let reference_mean = registered.mean()?;

    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(depth as u64));
    let line_offset = estimate_line_offset(reference_mean.view(), config.line_pairs, &mut rng);
    if line_offset.is_degenerate() {
        warnings.push(QualityWarning::DegenerateLineOffset { depth });
    }

    let mut slices = Vec::with_capacity(config.channels);
    for (channel, stack) in stacks.iter().enumerate() {
        let mean = if channel == rc {
            reference_mean.clone()
        } else {
            register_stack(stack.view(), anchor.image.view(), &config.alignment)
                .map_err(|e| e.with_context(&scope(channel)))?
                .mean()?
        };
        slices.push(correct_line_offset(mean.view(), line_offset.value));
    }

    for warning in &warnings {
        warn!(%warning, "Quality warning");
    }
    info!(
        depth,
        line_offset = line_offset.value,
        anchor_frames = anchor.frames_used,
        "Registered depth"
    );

    Ok(FileOutput {
        slices,
        record: DepthRecord {
            depth,
            file: path.to_path_buf(),
            line_offset,
            anchor_frames: anchor.frames_used,
            frame_shifts: registered.shifts,
            warnings,
        },
    })
}
