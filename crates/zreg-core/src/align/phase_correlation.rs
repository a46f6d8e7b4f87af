//! Translation estimation by phase correlation.
//!
//! Two stages, after Guizar-Sicairos, Thurman & Fienup, "Efficient subpixel
//! image registration algorithms", Optics Letters 33(2), 2008:
//! 1. **Coarse**: integer peak of the inverse FFT of the cross-power spectrum.
//! 2. **Fine**: the cross-correlation is evaluated by matrix-multiply DFT on a
//!    `1/upsample_factor` grid in a small window around the coarse peak.

use ndarray::{Array2, ArrayView2};
use num_complex::Complex;
use std::f64::consts::TAU;

use crate::compute::{apply_hann, fft2d_forward, fft_frequency, ifft2d_complex};
use crate::consts::{CROSS_POWER_EPSILON, UPSAMPLE_SEARCH_WINDOW};
use crate::error::{Result, ZregError};
use crate::frame::ShiftVector;
use crate::pipeline::config::{AlignmentConfig, CorrelationNormalization};

/// Estimate the shift that registers `moving` onto `reference`.
///
/// Applying the returned vector to `moving` (see [`super::shift_image`])
/// moves its content onto the reference.
pub fn estimate_shift(
    reference: ArrayView2<'_, f32>,
    moving: ArrayView2<'_, f32>,
    config: &AlignmentConfig,
) -> Result<ShiftVector> {
    let (h, w) = reference.dim();
    if moving.dim() != (h, w) {
        return Err(ZregError::shape_mismatch(
            "phase correlation",
            (h, w),
            moving.dim(),
        ));
    }
    if h == 0 || w == 0 {
        return Err(ZregError::EmptySequence);
    }

    let (ref_fft, mov_fft) = if config.hann_window {
        (
            fft2d_forward(apply_hann(reference).view()),
            fft2d_forward(apply_hann(moving).view()),
        )
    } else {
        (fft2d_forward(reference), fft2d_forward(moving))
    };

    let product = cross_power(&ref_fft, &mov_fft, config.normalization);
    let correlation = ifft2d_complex(&product);
    let (peak_row, peak_col) = find_peak(&correlation);

    let coarse = ShiftVector::new(wrap_offset(peak_row, h), wrap_offset(peak_col, w));
    if config.upsample_factor <= 1 {
        return Ok(coarse);
    }

    let upsample = config.upsample_factor as f64;
    let region = (UPSAMPLE_SEARCH_WINDOW * upsample).ceil() as usize;
    let dftshift = (region / 2) as f64;

    let rows: Vec<f64> = (0..region)
        .map(|i| coarse.dy + (i as f64 - dftshift) / upsample)
        .collect();
    let cols: Vec<f64> = (0..region)
        .map(|i| coarse.dx + (i as f64 - dftshift) / upsample)
        .collect();
    let upsampled = upsampled_correlation(&product, &rows, &cols);
    let (fine_row, fine_col) = find_peak(&upsampled);

    Ok(ShiftVector::new(rows[fine_row], cols[fine_col]))
}

/// `ref * conj(mov)`, optionally normalised to unit magnitude.
fn cross_power(
    ref_fft: &Array2<Complex<f64>>,
    mov_fft: &Array2<Complex<f64>>,
    normalization: CorrelationNormalization,
) -> Array2<Complex<f64>> {
    let mut product = ref_fft * &mov_fft.mapv(|v| v.conj());
    if normalization == CorrelationNormalization::Phase {
        product.mapv_inplace(|v| {
            let mag = v.norm();
            if mag > CROSS_POWER_EPSILON {
                v / mag
            } else {
                Complex::new(0.0, 0.0)
            }
        });
    }
    product
}

/// Evaluate the inverse DFT of `spectrum` (unnormalised) at every
/// `(rows[a], cols[b])` position, which need not be integral.
fn upsampled_correlation(
    spectrum: &Array2<Complex<f64>>,
    rows: &[f64],
    cols: &[f64],
) -> Array2<Complex<f64>> {
    let (h, w) = spectrum.dim();
    let row_kernel = Array2::from_shape_fn((rows.len(), h), |(a, k)| {
        let phase = TAU * fft_frequency(k, h) * rows[a];
        Complex::new(phase.cos(), phase.sin())
    });
    let col_kernel = Array2::from_shape_fn((w, cols.len()), |(k, b)| {
        let phase = TAU * fft_frequency(k, w) * cols[b];
        Complex::new(phase.cos(), phase.sin())
    });
    row_kernel.dot(spectrum).dot(&col_kernel)
}

/// Map a peak index on an `n`-periodic axis to a signed offset.
fn wrap_offset(peak: usize, n: usize) -> f64 {
    if peak > n / 2 {
        peak as f64 - n as f64
    } else {
        peak as f64
    }
}

fn find_peak(data: &Array2<Complex<f64>>) -> (usize, usize) {
    let mut best = (0, 0);
    let mut best_val = f64::NEG_INFINITY;
    for ((row, col), v) in data.indexed_iter() {
        let mag = v.norm();
        if mag > best_val {
            best_val = mag;
            best = (row, col);
        }
    }
    best
}
