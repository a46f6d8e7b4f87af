use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::{s, Array2, Array3, ArrayView2, ArrayView3, Axis};
use rayon::prelude::*;
use tracing::debug;

use crate::consts::PARALLEL_FRAME_THRESHOLD;
use crate::error::{Result, ZregError};
use crate::frame::ShiftVector;
use crate::pipeline::config::AlignmentConfig;
use crate::stack::mean::mean_frames;

use super::phase_correlation::estimate_shift;
use super::shift::shift_image;

/// Frames resampled onto a common reference, with the shift applied to each.
#[derive(Clone, Debug)]
pub struct RegisteredStack {
    /// (row, column, frame), same shape as the input stack.
    pub frames: Array3<f32>,
    /// One entry per frame, in frame order.
    pub shifts: Vec<ShiftVector>,
}

impl RegisteredStack {
    pub fn frame_count(&self) -> usize {
        self.shifts.len()
    }

    pub fn mean(&self) -> Result<Array2<f32>> {
        mean_frames(self.frames.view())
    }
}

/// Low-noise reference built from the leading frames of a stack.
#[derive(Clone, Debug)]
pub struct Anchor {
    pub image: Array2<f32>,
    pub frames_used: usize,
    /// The requested fraction selected no frames and one was used instead.
    pub floored: bool,
}

/// Register every frame of `stack` onto `reference`.
pub fn register_stack(
    stack: ArrayView3<'_, f32>,
    reference: ArrayView2<'_, f32>,
    config: &AlignmentConfig,
) -> Result<RegisteredStack> {
    register_stack_with_progress(stack, reference, config, |_| {})
}

/// Register every frame of `stack` onto `reference`, calling `on_frame_done`
/// with the running count of finished frames.
///
/// Frames are independent; at [`PARALLEL_FRAME_THRESHOLD`] frames or more they
/// are processed on the rayon pool and merged back by frame index.
pub fn register_stack_with_progress<F>(
    stack: ArrayView3<'_, f32>,
    reference: ArrayView2<'_, f32>,
    config: &AlignmentConfig,
    on_frame_done: F,
) -> Result<RegisteredStack>
where
    F: Fn(usize) + Send + Sync,
{
    let (h, w, n) = stack.dim();
    if n == 0 {
        return Err(ZregError::EmptySequence);
    }
    if reference.dim() != (h, w) {
        return Err(ZregError::shape_mismatch(
            "frame stack vs reference",
            reference.dim(),
            (h, w),
        ));
    }

    let counter = AtomicUsize::new(0);
    let register_one = |i: usize| -> Result<(ShiftVector, Array2<f32>)> {
        let frame = stack.index_axis(Axis(2), i);
        let shift = estimate_shift(reference, frame, config)?;
        debug!(frame = i, dy = shift.dy, dx = shift.dx, "Frame shift");
        let shifted = shift_image(frame, shift, config.resample);
        let done = counter.fetch_add(1, Ordering::Relaxed) + 1;
        on_frame_done(done);
        Ok((shift, shifted))
    };

    let results: Vec<Result<(ShiftVector, Array2<f32>)>> = if n >= PARALLEL_FRAME_THRESHOLD {
        (0..n).into_par_iter().map(&register_one).collect()
    } else {
        (0..n).map(&register_one).collect()
    };

    let mut frames = Array3::<f32>::zeros((h, w, n));
    let mut shifts = Vec::with_capacity(n);
    for (i, result) in results.into_iter().enumerate() {
        let (shift, shifted) = result?;
        frames.index_axis_mut(Axis(2), i).assign(&shifted);
        shifts.push(shift);
    }

    Ok(RegisteredStack { frames, shifts })
}

/// Average the leading `fraction` of `stack` after registering it to its own
/// first frame. At least one frame is always used.
pub fn build_anchor(
    stack: ArrayView3<'_, f32>,
    fraction: f64,
    config: &AlignmentConfig,
) -> Result<Anchor> {
    let n = stack.len_of(Axis(2));
    if n == 0 {
        return Err(ZregError::EmptySequence);
    }

    let wanted = ((fraction * n as f64) as usize).min(n);
    let frames_used = wanted.max(1);
    let lead = stack.slice(s![.., .., ..frames_used]);
    let registered = register_stack(lead, lead.index_axis(Axis(2), 0), config)?;

    Ok(Anchor {
        image: registered.mean()?,
        frames_used,
        floored: wanted == 0,
    })
}
