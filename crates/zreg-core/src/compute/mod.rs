pub mod correlate;
pub mod fft;

pub use correlate::LinearCorrelator;
pub use fft::{apply_hann, fft2d_forward, fft_frequency, ifft2d_complex, ifft2d_inverse};
