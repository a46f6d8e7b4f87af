use ndarray::{ArrayView1, ArrayView2};
use rand::Rng;

use crate::compute::LinearCorrelator;

/// Correlation values within this fraction of `|odd| * |even|` of the maximum
/// count as tied.
const LAG_TIE_TOLERANCE: f64 = 1e-9;

/// How a [`LineOffset`] value was obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineOffsetSource {
    /// Median of per-pair correlation lags.
    Estimated,
    /// The image had no odd/even row pair; the value is the 0 fallback.
    Degenerate,
}

/// Row shift to apply to odd rows so they line up with their even neighbours.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineOffset {
    pub value: f64,
    pub pairs_used: usize,
    pub source: LineOffsetSource,
}

impl LineOffset {
    pub fn degenerate() -> Self {
        Self {
            value: 0.0,
            pairs_used: 0,
            source: LineOffsetSource::Degenerate,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.source == LineOffsetSource::Degenerate
    }
}

impl std::fmt::Display for LineOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.source {
            LineOffsetSource::Estimated => {
                write!(f, "{:+.2} px ({} pairs)", self.value, self.pairs_used)
            }
            LineOffsetSource::Degenerate => write!(f, "0 px (degenerate)"),
        }
    }
}

/// Estimate the odd-row offset of `image`.
///
/// Pairs are odd row `r` with row `r + 1`. When more than `max_pairs` exist a
/// uniform sample without replacement is drawn from `rng`. Each pair
/// contributes the lag of its full cross-correlation maximum; the result is
/// the negated median lag.
///
/// Lags are whole pixels, so the estimate is always a whole or half pixel
/// (half only when an even pair count splits the median). A fractional
/// interleave shift comes back rounded to within half a pixel.
pub fn estimate_line_offset<R: Rng + ?Sized>(
    image: ArrayView2<'_, f32>,
    max_pairs: usize,
    rng: &mut R,
) -> LineOffset {
    let (rows, cols) = image.dim();
    let valid: Vec<usize> = (1..rows).step_by(2).filter(|&r| r + 1 < rows).collect();
    if valid.is_empty() || cols == 0 || max_pairs == 0 {
        return LineOffset::degenerate();
    }

    let chosen: Vec<usize> = if valid.len() <= max_pairs {
        valid
    } else {
        rand::seq::index::sample(rng, valid.len(), max_pairs)
            .into_iter()
            .map(|i| valid[i])
            .collect()
    };

    let correlator = LinearCorrelator::new(cols);
    let mut lags: Vec<f64> = chosen
        .iter()
        .map(|&r| best_lag(&correlator, image.row(r), image.row(r + 1)) as f64)
        .collect();
    let median = median(&mut lags);

    LineOffset {
        value: if median == 0.0 { 0.0 } else { -median },
        pairs_used: chosen.len(),
        source: LineOffsetSource::Estimated,
    }
}

/// Lag `L` maximising `sum_l odd[l] * even[l - L]` over mean-centred rows.
/// Ties resolve to the most negative lag.
fn best_lag(
    correlator: &LinearCorrelator,
    odd: ArrayView1<'_, f32>,
    even: ArrayView1<'_, f32>,
) -> i64 {
    let a = centered(odd);
    let b = centered(even);
    let values = correlator.correlate(&a, &b);

    let energy = |v: &[f64]| v.iter().map(|x| x * x).sum::<f64>();
    let peak = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let tolerance = LAG_TIE_TOLERANCE * (energy(&a) * energy(&b)).sqrt();
    let first = values.iter().position(|&v| v >= peak - tolerance).unwrap_or(0);
    first as i64 - (correlator.len() as i64 - 1)
}

fn centered(row: ArrayView1<'_, f32>) -> Vec<f64> {
    let mean = row.iter().map(|&v| v as f64).sum::<f64>() / row.len().max(1) as f64;
    row.iter().map(|&v| v as f64 - mean).collect()
}

fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
