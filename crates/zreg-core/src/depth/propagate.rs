use std::ops::Range;

use tracing::{info, warn};

use crate::align::{estimate_shift, shift_image};
use crate::error::{Result, ZregError};
use crate::frame::ShiftVector;
use crate::pipeline::config::AlignmentConfig;
use crate::table::{DepthRow, ResultTable};

use super::plan::{PropagationPlan, PropagationStep};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthState {
    Unvisited,
    Aligned,
    /// The chain stopped at or before this depth.
    Halted,
}

/// Where a chain stopped and why.
#[derive(Clone, Debug, PartialEq)]
pub struct DepthHalt {
    pub depth: usize,
    pub reason: String,
}

#[derive(Clone, Debug)]
pub struct PropagationOutcome {
    pub anchor: usize,
    pub states: Vec<DepthState>,
    /// Shift applied at each depth, measured against its predecessor after
    /// that predecessor was aligned. `None` for depths never aligned.
    pub shifts: Vec<Option<ShiftVector>>,
    /// At most one entry per direction.
    pub halts: Vec<DepthHalt>,
}

impl PropagationOutcome {
    pub fn is_aligned(&self, depth: usize) -> bool {
        self.states.get(depth) == Some(&DepthState::Aligned)
    }

    /// The contiguous run of aligned depths around the anchor.
    pub fn aligned_range(&self) -> Range<usize> {
        let start = self
            .states
            .iter()
            .position(|s| *s == DepthState::Aligned)
            .unwrap_or(self.anchor);
        let end = self
            .states
            .iter()
            .rposition(|s| *s == DepthState::Aligned)
            .map_or(start, |i| i + 1);
        start..end
    }
}

#[derive(Default)]
struct ChainOutcome {
    shifts: Vec<(usize, ShiftVector)>,
    halt: Option<DepthHalt>,
}

/// Depth rows on one side of the anchor, addressed by absolute depth.
struct Side<'a> {
    rows: &'a mut [DepthRow],
    first_depth: usize,
}

impl Side<'_> {
    /// The predecessor of `step` (the anchor row when it lies outside this
    /// side) together with the row being aligned.
    fn pair<'s>(
        &'s mut self,
        step: &PropagationStep,
        anchor_row: &'s DepthRow,
    ) -> (&'s DepthRow, &'s mut DepthRow) {
        let local = step.depth - self.first_depth;
        let end = self.first_depth + self.rows.len();
        if step.predecessor < self.first_depth || step.predecessor >= end {
            return (anchor_row, &mut self.rows[local]);
        }

        let pred = step.predecessor - self.first_depth;
        if pred < local {
            let (done, todo) = self.rows.split_at_mut(local);
            (&done[pred], &mut todo[0])
        } else {
            let (todo, done) = self.rows.split_at_mut(pred);
            (&done[0], &mut todo[local])
        }
    }
}

/// Align every depth of `table` to the middle depth, sweeping outward.
///
/// The shift measured for depth `i` is applied to all of its channels before
/// depth `i`'s reference slice serves as the predecessor of the next step.
/// The forward and backward chains run concurrently.
///
/// An incomplete anchor depth is fatal. A failing non-anchor depth halts only
/// its own chain; it and every depth further out are left unaligned.
pub fn propagate(
    table: &mut ResultTable,
    reference_channel: usize,
    config: &AlignmentConfig,
) -> Result<PropagationOutcome> {
    let plan = PropagationPlan::new(table.depth_count())?;
    let anchor = plan.anchor;
    if reference_channel >= table.channel_count() {
        return Err(ZregError::InvalidConfig(format!(
            "reference_channel {} is outside 0..{}",
            reference_channel,
            table.channel_count()
        )));
    }
    if !table.is_depth_complete(anchor) {
        return Err(ZregError::PropagationHalt {
            depth: anchor,
            reason: "anchor depth has no registered slices".into(),
        });
    }

    let rows = table.rows_mut();
    let (below, rest) = rows.split_at_mut(anchor);
    let (anchor_row, above) = rest.split_first_mut().ok_or(ZregError::EmptySequence)?;
    let anchor_row: &DepthRow = anchor_row;

    let (forward, backward) = rayon::join(
        || {
            let side = Side {
                rows: above,
                first_depth: anchor + 1,
            };
            run_chain(&plan.forward, anchor_row, side, reference_channel, config)
        },
        || {
            let side = Side {
                rows: below,
                first_depth: 0,
            };
            run_chain(&plan.backward, anchor_row, side, reference_channel, config)
        },
    );

    let mut outcome = PropagationOutcome {
        anchor,
        states: vec![DepthState::Unvisited; plan.depth_count],
        shifts: vec![None; plan.depth_count],
        halts: Vec::new(),
    };
    outcome.states[anchor] = DepthState::Aligned;
    outcome.shifts[anchor] = Some(ShiftVector::ZERO);

    for (steps, chain) in [(&plan.forward, forward), (&plan.backward, backward)] {
        for (depth, shift) in chain.shifts {
            outcome.states[depth] = DepthState::Aligned;
            outcome.shifts[depth] = Some(shift);
        }
        if let Some(halt) = chain.halt {
            for step in steps.iter().skip_while(|s| s.depth != halt.depth) {
                outcome.states[step.depth] = DepthState::Halted;
            }
            outcome.halts.push(halt);
        }
    }

    Ok(outcome)
}

fn run_chain(
    steps: &[PropagationStep],
    anchor_row: &DepthRow,
    mut side: Side<'_>,
    reference_channel: usize,
    config: &AlignmentConfig,
) -> ChainOutcome {
    let mut outcome = ChainOutcome::default();
    for step in steps {
        match align_step(step, anchor_row, &mut side, reference_channel, config) {
            Ok(shift) => {
                info!(
                    depth = step.depth,
                    predecessor = step.predecessor,
                    dy = shift.dy,
                    dx = shift.dx,
                    "Aligned depth"
                );
                outcome.shifts.push((step.depth, shift));
            }
            Err(reason) => {
                warn!(depth = step.depth, %reason, "Depth chain halted");
                outcome.halt = Some(DepthHalt {
                    depth: step.depth,
                    reason,
                });
                break;
            }
        }
    }
    outcome
}

fn align_step(
    step: &PropagationStep,
    anchor_row: &DepthRow,
    side: &mut Side<'_>,
    reference_channel: usize,
    config: &AlignmentConfig,
) -> std::result::Result<ShiftVector, String> {
    let (predecessor, row) = side.pair(step, anchor_row);
    let scope = format!(
        "{}, channel {}, depth {} vs depth {}",
        row.describe(step.depth),
        reference_channel,
        step.depth,
        step.predecessor
    );
    if !row.is_complete() {
        return Err(format!("{scope}: no registered slices at this depth"));
    }
    let (reference, moving) = match (predecessor.slice(reference_channel), row.slice(reference_channel)) {
        (Some(r), Some(m)) => (r, m),
        _ => return Err(format!("{scope}: missing reference-channel slice")),
    };

    let shift = estimate_shift(reference.data.view(), moving.data.view(), config)
        .map_err(|e| e.with_context(&scope).to_string())?;

    for slice in row.slices_mut() {
        slice.data = shift_image(slice.data.view(), shift, config.resample);
    }
    Ok(shift)
}
