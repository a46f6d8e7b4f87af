use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};
use num_complex::Complex;
use std::f64::consts::TAU;

use crate::compute::{fft2d_forward, fft_frequency, ifft2d_inverse};
use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::frame::ShiftVector;
use crate::pipeline::config::ResampleMethod;

/// Translate an image's content by `shift`, keeping its shape.
pub fn shift_image(
    image: ArrayView2<'_, f32>,
    shift: ShiftVector,
    method: ResampleMethod,
) -> Array2<f32> {
    match method {
        ResampleMethod::Bilinear => shift_bilinear(image, shift),
        ResampleMethod::Fourier => fourier_shift(image, shift),
    }
}

/// Shift by bilinear interpolation; samples falling outside the image are 0.
pub fn shift_bilinear(image: ArrayView2<'_, f32>, shift: ShiftVector) -> Array2<f32> {
    let (h, w) = image.dim();
    let mut result = Array2::<f32>::zeros((h, w));
    let sample = |(row, col): (usize, usize), out: &mut f32| {
        *out = bilinear_sample(image, row as f64 - shift.dy, col as f64 - shift.dx);
    };

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        Zip::indexed(&mut result).par_for_each(sample);
    } else {
        Zip::indexed(&mut result).for_each(sample);
    }
    result
}

/// Exact circular sub-pixel shift through the Fourier shift theorem.
pub fn fourier_shift(image: ArrayView2<'_, f32>, shift: ShiftVector) -> Array2<f32> {
    let (h, w) = image.dim();
    let mut spectrum = fft2d_forward(image);
    for ((row, col), v) in spectrum.indexed_iter_mut() {
        let fy = fft_frequency(row, h);
        let fx = fft_frequency(col, w);
        let phase = -TAU * (fy * shift.dy + fx * shift.dx);
        *v *= Complex::new(phase.cos(), phase.sin());
    }
    ifft2d_inverse(&spectrum).mapv(|v| v as f32)
}

/// Bilinear interpolation at `(y, x)`; neighbours outside the image count as 0.
pub fn bilinear_sample(data: ArrayView2<'_, f32>, y: f64, x: f64) -> f32 {
    let (h, w) = (data.nrows() as i64, data.ncols() as i64);
    let at = |r: i64, c: i64| -> f32 {
        if (0..h).contains(&r) && (0..w).contains(&c) {
            data[[r as usize, c as usize]]
        } else {
            0.0
        }
    };

    let (r0, c0) = (y.floor() as i64, x.floor() as i64);
    let ty = (y - r0 as f64) as f32;
    let tx = (x - c0 as f64) as f32;
    let top = lerp(at(r0, c0), at(r0, c0 + 1), tx);
    let bottom = lerp(at(r0 + 1, c0), at(r0 + 1, c0 + 1), tx);
    lerp(top, bottom, ty)
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Translate a 1D signal by `offset` samples using linear interpolation,
/// filling with 0 outside the signal.
pub fn shift_row(row: ArrayView1<'_, f32>, offset: f64) -> Array1<f32> {
    let n = row.len() as i64;
    let sample = |i: i64| -> f32 {
        if i >= 0 && i < n {
            row[i as usize]
        } else {
            0.0
        }
    };

    Array1::from_shape_fn(row.len(), |i| {
        let x = i as f64 - offset;
        let x0 = x.floor() as i64;
        lerp(sample(x0), sample(x0 + 1), (x - x0 as f64) as f32)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn bilinear_exact_and_halfway() {
        let mut data = Array2::<f32>::zeros((4, 4));
        data[[1, 1]] = 1.0;
        assert!((bilinear_sample(data.view(), 1.0, 1.0) - 1.0).abs() < 1e-6);
        assert!((bilinear_sample(data.view(), 1.0, 1.5) - 0.5).abs() < 1e-6);
        assert_eq!(bilinear_sample(data.view(), -3.0, 1.0), 0.0);
    }

    #[test]
    fn integer_bilinear_shift_moves_content() {
        let mut data = Array2::<f32>::zeros((8, 8));
        data[[2, 3]] = 5.0;
        let shifted = shift_bilinear(data.view(), ShiftVector::new(2.0, -1.0));
        assert_eq!(shifted[[4, 2]], 5.0);
        assert_eq!(shifted.sum(), 5.0);
    }

    #[test]
    fn fourier_shift_is_circular() {
        let mut data = Array2::<f32>::zeros((8, 8));
        data[[0, 7]] = 1.0;
        let shifted = fourier_shift(data.view(), ShiftVector::new(1.0, 1.0));
        assert!((shifted[[1, 0]] - 1.0).abs() < 1e-5);
        assert!(shifted[[0, 7]].abs() < 1e-5);
    }

    #[test]
    fn shift_row_interpolates_and_zero_fills() {
        let row = array![1.0f32, 2.0, 3.0, 4.0];
        assert_eq!(shift_row(row.view(), 1.0), array![0.0f32, 1.0, 2.0, 3.0]);
        assert_eq!(shift_row(row.view(), -0.5), array![1.5f32, 2.5, 3.5, 2.0]);
        assert_eq!(shift_row(row.view(), 0.0), row);
    }
}
