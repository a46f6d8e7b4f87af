use crate::error::{Result, ZregError};

/// Align `depth` against the already-aligned `predecessor`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropagationStep {
    pub depth: usize,
    pub predecessor: usize,
}

/// The two dependency chains leading away from the anchor depth.
///
/// Steps within a chain must run in order; the chains are independent of
/// each other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropagationPlan {
    pub depth_count: usize,
    pub anchor: usize,
    /// `anchor + 1 ..= depth_count - 1`.
    pub forward: Vec<PropagationStep>,
    /// `anchor - 1 ..= 0`.
    pub backward: Vec<PropagationStep>,
}

impl PropagationPlan {
    pub fn new(depth_count: usize) -> Result<Self> {
        if depth_count == 0 {
            return Err(ZregError::EmptySequence);
        }
        let anchor = depth_count / 2;
        let forward = (anchor + 1..depth_count)
            .map(|depth| PropagationStep {
                depth,
                predecessor: depth - 1,
            })
            .collect();
        let backward = (0..anchor)
            .rev()
            .map(|depth| PropagationStep {
                depth,
                predecessor: depth + 1,
            })
            .collect();

        Ok(Self {
            depth_count,
            anchor,
            forward,
            backward,
        })
    }
}
