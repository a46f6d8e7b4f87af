use ndarray::{Array2, ArrayView3, Axis};

use crate::error::{Result, ZregError};

/// Average a (row, column, frame) stack along the frame axis.
pub fn mean_frames(stack: ArrayView3<'_, f32>) -> Result<Array2<f32>> {
    if stack.len_of(Axis(2)) == 0 {
        return Err(ZregError::EmptySequence);
    }
    stack.mean_axis(Axis(2)).ok_or(ZregError::EmptySequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn single_frame_mean_is_the_frame() {
        let stack = Array3::from_elem((4, 4, 1), 0.5f32);
        let mean = mean_frames(stack.view()).unwrap();
        assert!((mean[[0, 0]] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn mean_of_two() {
        let mut stack = Array3::<f32>::zeros((2, 3, 2));
        stack.index_axis_mut(Axis(2), 1).fill(1.0);
        let mean = mean_frames(stack.view()).unwrap();
        assert_eq!(mean.dim(), (2, 3));
        assert!((mean[[1, 2]] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn empty_stack_is_an_error() {
        let stack = Array3::<f32>::zeros((4, 4, 0));
        assert!(matches!(
            mean_frames(stack.view()),
            Err(ZregError::EmptySequence)
        ));
    }
}
