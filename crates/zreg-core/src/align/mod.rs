pub mod phase_correlation;
mod register;
pub mod shift;

pub use phase_correlation::estimate_shift;
pub use register::{build_anchor, register_stack, register_stack_with_progress, Anchor, RegisteredStack};
pub use shift::{bilinear_sample, fourier_shift, shift_image, shift_row};
