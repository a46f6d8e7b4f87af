//! Mid-out depth-to-depth alignment.
//!
//! The middle depth is the anchor. Every other depth is registered to its
//! already-aligned neighbour on the anchor side, so depth `i` depends on depth
//! `i - 1` (forward) or `i + 1` (backward). Error therefore accumulates with
//! distance from the anchor; each step only guarantees local continuity.

mod plan;
mod propagate;

pub use plan::{PropagationPlan, PropagationStep};
pub use propagate::{propagate, DepthHalt, DepthState, PropagationOutcome};
