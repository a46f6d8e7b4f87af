use ndarray::{Array2, Array3, ArrayView2, Axis};

use crate::error::{Result, ZregError};

/// A multi-page acquisition decoded into one array.
///
/// Axis order is (row, column, frame); every frame has the same extent.
#[derive(Clone, Debug)]
pub struct Volume {
    pub data: Array3<f32>,
}

impl Volume {
    pub fn new(data: Array3<f32>) -> Self {
        Self { data }
    }

    /// Stack 2D pages along the frame axis, preserving page order.
    ///
    /// `context` names the source in the error when a page's shape differs
    /// from the first page.
    pub fn from_pages(pages: &[Array2<f32>], context: &str) -> Result<Self> {
        let first = pages.first().ok_or(ZregError::EmptySequence)?;
        let shape = first.dim();
        for (i, page) in pages.iter().enumerate() {
            if page.dim() != shape {
                return Err(ZregError::shape_mismatch(
                    format!("{context}, page {i}"),
                    shape,
                    page.dim(),
                ));
            }
        }
        let mut data = Array3::<f32>::zeros((shape.0, shape.1, pages.len()));
        for (i, page) in pages.iter().enumerate() {
            data.index_axis_mut(Axis(2), i).assign(page);
        }
        Ok(Self { data })
    }

    pub fn rows(&self) -> usize {
        self.data.dim().0
    }

    pub fn cols(&self) -> usize {
        self.data.dim().1
    }

    pub fn frame_count(&self) -> usize {
        self.data.dim().2
    }

    pub fn frame(&self, index: usize) -> ArrayView2<'_, f32> {
        self.data.index_axis(Axis(2), index)
    }

    /// Copy the listed frames, in the listed order, into a new stack.
    pub fn select_frames(&self, indices: &[usize]) -> Array3<f32> {
        self.data.select(Axis(2), indices)
    }
}

/// Translation in pixels to apply to a moving image so that it lands on its
/// reference.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShiftVector {
    pub dy: f64,
    pub dx: f64,
}

impl ShiftVector {
    pub const ZERO: Self = Self { dy: 0.0, dx: 0.0 };

    pub fn new(dy: f64, dx: f64) -> Self {
        Self { dy, dx }
    }

    pub fn magnitude(&self) -> f64 {
        self.dy.hypot(self.dx)
    }
}

impl std::fmt::Display for ShiftVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:+.2}, {:+.2})", self.dy, self.dx)
    }
}

/// Registered, line-corrected average for one (depth, channel) cell.
#[derive(Clone, Debug)]
pub struct ChannelSlice {
    pub depth: usize,
    pub channel: usize,
    pub data: Array2<f32>,
}

impl ChannelSlice {
    pub fn new(depth: usize, channel: usize, data: Array2<f32>) -> Self {
        Self {
            depth,
            channel,
            data,
        }
    }

    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }
}
