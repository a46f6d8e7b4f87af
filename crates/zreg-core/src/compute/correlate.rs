use std::sync::Arc;

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};

/// Full linear cross-correlation of two length-`n` signals through one
/// zero-padded FFT pair, planned once and reused across calls.
pub struct LinearCorrelator {
    n: usize,
    padded: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl LinearCorrelator {
    pub fn new(n: usize) -> Self {
        let padded = (2 * n.max(1) - 1).next_power_of_two();
        let mut planner = FftPlanner::new();
        Self {
            n,
            padded,
            forward: planner.plan_fft_forward(padded),
            inverse: planner.plan_fft_inverse(padded),
        }
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// `c[L] = sum_l a[l] * b[l - L]` for `L` in `-(n-1) ..= n-1`.
    ///
    /// Index `k` of the result holds lag `k - (n - 1)`. Both inputs must have
    /// length `n`.
    pub fn correlate(&self, a: &[f64], b: &[f64]) -> Vec<f64> {
        let n = self.n;
        if n == 0 {
            return Vec::new();
        }
        let mut fa = self.padded_buffer(a);
        let mut fb = self.padded_buffer(b);
        self.forward.process(&mut fa);
        self.forward.process(&mut fb);
        for (x, y) in fa.iter_mut().zip(&fb) {
            *x *= y.conj();
        }
        self.inverse.process(&mut fa);

        let scale = 1.0 / self.padded as f64;
        let m = self.padded as i64;
        (-(n as i64 - 1)..n as i64)
            .map(|lag| fa[lag.rem_euclid(m) as usize].re * scale)
            .collect()
    }

    fn padded_buffer(&self, values: &[f64]) -> Vec<Complex<f64>> {
        let mut buf = vec![Complex::new(0.0, 0.0); self.padded];
        for (dst, &v) in buf.iter_mut().zip(values.iter().take(self.n)) {
            dst.re = v;
        }
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direct(a: &[f64], b: &[f64]) -> Vec<f64> {
        let n = a.len() as i64;
        (-(n - 1)..n)
            .map(|lag| {
                (lag.max(0)..(n + lag).min(n))
                    .map(|l| a[l as usize] * b[(l - lag) as usize])
                    .sum()
            })
            .collect()
    }

    #[test]
    fn matches_direct_sum() {
        let a: Vec<f64> = (0..13).map(|i| ((i * 7 % 5) as f64) - 2.0).collect();
        let b: Vec<f64> = (0..13).map(|i| ((i * 3 % 4) as f64) * 0.5).collect();
        let fast = LinearCorrelator::new(13).correlate(&a, &b);
        let slow = direct(&a, &b);
        assert_eq!(fast.len(), 25);
        for (k, (f, s)) in fast.iter().zip(&slow).enumerate() {
            assert!((f - s).abs() < 1e-9, "lag {}: {f} vs {s}", k as i64 - 12);
        }
    }

    #[test]
    fn single_sample() {
        let c = LinearCorrelator::new(1).correlate(&[3.0], &[2.0]);
        assert_eq!(c.len(), 1);
        assert!((c[0] - 6.0).abs() < 1e-12);
    }
}
