//! Bidirectional-scan line interleave: estimate the odd/even row offset from a
//! reference image and cancel it on any image of the same depth.

mod correct;
mod estimate;

pub use correct::correct_line_offset;
pub use estimate::{estimate_line_offset, LineOffset, LineOffsetSource};
