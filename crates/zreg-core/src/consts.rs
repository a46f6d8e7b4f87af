/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Minimum frame count to use frame-level Rayon parallelism.
pub const PARALLEL_FRAME_THRESHOLD: usize = 4;

/// Default upsampling factor for sub-pixel phase correlation (Guizar-Sicairos).
/// 20 gives ~0.05 px accuracy; 100 gives ~0.01 px accuracy.
pub const DEFAULT_UPSAMPLE_FACTOR: usize = 20;

/// Width (in pixels) of the window around the coarse peak that the
/// upsampled DFT refinement searches.
pub const UPSAMPLE_SEARCH_WINDOW: f64 = 1.5;

/// Cross-power magnitudes below this are zeroed during phase normalisation.
pub const CROSS_POWER_EPSILON: f64 = 1e-12;

/// Default number of odd/even row pairs sampled for line-offset estimation.
pub const DEFAULT_LINE_PAIRS: usize = 200;

/// Default fraction of leading frames averaged into the anchor image.
pub const DEFAULT_ANCHOR_FRACTION: f64 = 0.2;

/// Largest value representable in the 16-bit output volumes.
pub const OUTPUT_MAX: f32 = 65_535.0;

/// File extension of written channel volumes.
pub const OUTPUT_EXTENSION: &str = "tif";
