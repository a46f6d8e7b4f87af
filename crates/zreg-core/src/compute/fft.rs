use std::sync::Arc;

use ndarray::{Array2, ArrayView2, ArrayViewMut1, Axis, Zip};
use num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

/// 2D forward FFT of a real image, with parallel lane processing for large
/// images.
pub fn fft2d_forward(data: ArrayView2<'_, f32>) -> Array2<Complex<f64>> {
    let (h, w) = data.dim();
    let mut planner = FftPlanner::new();
    let fft_row = planner.plan_fft_forward(w);
    let fft_col = planner.plan_fft_forward(h);

    let mut result = data.mapv(|v| Complex::new(v as f64, 0.0));
    let parallel = h * w >= PARALLEL_PIXEL_THRESHOLD;
    transform_lanes(&mut result, &fft_row, Axis(1), parallel);
    transform_lanes(&mut result, &fft_col, Axis(0), parallel);
    result
}

/// 2D inverse FFT normalised by `1/(h*w)`, keeping the complex result.
pub fn ifft2d_complex(data: &Array2<Complex<f64>>) -> Array2<Complex<f64>> {
    let (h, w) = data.dim();
    let mut planner = FftPlanner::new();
    let ifft_row = planner.plan_fft_inverse(w);
    let ifft_col = planner.plan_fft_inverse(h);

    let mut work = data.clone();
    let parallel = h * w >= PARALLEL_PIXEL_THRESHOLD;
    transform_lanes(&mut work, &ifft_col, Axis(0), parallel);
    transform_lanes(&mut work, &ifft_row, Axis(1), parallel);

    let scale = 1.0 / (h * w) as f64;
    work.mapv_inplace(|v| v * scale);
    work
}

/// 2D inverse FFT, returning the real part normalised by `1/(h*w)`.
pub fn ifft2d_inverse(data: &Array2<Complex<f64>>) -> Array2<f64> {
    ifft2d_complex(data).mapv(|v| v.re)
}

/// Run `fft` over every lane along `axis` (`Axis(1)` = rows, `Axis(0)` = columns).
fn transform_lanes(
    data: &mut Array2<Complex<f64>>,
    fft: &Arc<dyn Fft<f64>>,
    axis: Axis,
    parallel: bool,
) {
    let run = |mut lane: ArrayViewMut1<'_, Complex<f64>>| {
        let mut buf: Vec<Complex<f64>> = lane.to_vec();
        fft.process(&mut buf);
        for (dst, src) in lane.iter_mut().zip(buf) {
            *dst = src;
        }
    };

    let zip = Zip::from(data.lanes_mut(axis));
    if parallel {
        zip.par_for_each(run);
    } else {
        zip.for_each(run);
    }
}

/// Multiply by a separable Hann window to reduce spectral leakage.
pub fn apply_hann(data: ArrayView2<'_, f32>) -> Array2<f32> {
    let (h, w) = data.dim();
    let wy: Vec<f64> = (0..h).map(|r| hann(r, h)).collect();
    let wx: Vec<f64> = (0..w).map(|c| hann(c, w)).collect();

    let mut result = data.to_owned();
    for ((row, col), v) in result.indexed_iter_mut() {
        *v *= (wy[row] * wx[col]) as f32;
    }
    result
}

/// Frequency of DFT bin `k` of an `n`-point transform in cycles per sample,
/// in numpy `fftfreq` order.
pub fn fft_frequency(k: usize, n: usize) -> f64 {
    if k < n.div_ceil(2) {
        k as f64 / n as f64
    } else {
        (k as f64 - n as f64) / n as f64
    }
}

fn hann(i: usize, n: usize) -> f64 {
    0.5 * (1.0 - (std::f64::consts::TAU * i as f64 / n as f64).cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_then_inverse_restores_image() {
        let data = Array2::from_shape_fn((6, 10), |(r, c)| (r * 10 + c) as f32 * 0.1);
        let spectrum = fft2d_forward(data.view());
        let back = ifft2d_inverse(&spectrum);
        for ((r, c), &v) in back.indexed_iter() {
            assert!((v - data[[r, c]] as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn dc_term_is_sum() {
        let data = Array2::from_elem((4, 4), 2.0f32);
        let spectrum = fft2d_forward(data.view());
        assert!((spectrum[[0, 0]].re - 32.0).abs() < 1e-9);
        assert!(spectrum[[1, 2]].norm() < 1e-9);
    }

    #[test]
    fn frequencies_follow_fftfreq_order() {
        let even: Vec<f64> = (0..4).map(|k| fft_frequency(k, 4) * 4.0).collect();
        assert_eq!(even, vec![0.0, 1.0, -2.0, -1.0]);
        let odd: Vec<f64> = (0..5).map(|k| fft_frequency(k, 5) * 5.0).collect();
        assert_eq!(odd, vec![0.0, 1.0, 2.0, -2.0, -1.0]);
    }

    #[test]
    fn hann_zeroes_first_row_and_column() {
        let data = Array2::from_elem((8, 8), 1.0f32);
        let windowed = apply_hann(data.view());
        assert_eq!(windowed[[0, 3]], 0.0);
        assert_eq!(windowed[[3, 0]], 0.0);
        assert!((windowed[[4, 4]] - 1.0).abs() < 1e-6);
    }
}
