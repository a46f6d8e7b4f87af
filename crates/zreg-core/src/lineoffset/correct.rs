use ndarray::{Array2, ArrayView2};

use crate::align::shift_row;

/// Copy of `image` with every odd-indexed row translated by `offset` pixels
/// along the row. Even rows are untouched.
pub fn correct_line_offset(image: ArrayView2<'_, f32>, offset: f64) -> Array2<f32> {
    let mut output = image.to_owned();
    for r in (1..image.nrows()).step_by(2) {
        output.row_mut(r).assign(&shift_row(image.row(r), offset));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn only_odd_rows_move() {
        let image = array![
            [1.0f32, 2.0, 3.0],
            [1.0, 2.0, 3.0],
            [1.0, 2.0, 3.0],
            [1.0, 2.0, 3.0],
        ];
        let out = correct_line_offset(image.view(), 1.0);
        assert_eq!(out.row(0), image.row(0));
        assert_eq!(out.row(2), image.row(2));
        assert_eq!(out.row(1), array![0.0f32, 1.0, 2.0]);
        assert_eq!(out.row(3), array![0.0f32, 1.0, 2.0]);
    }

    #[test]
    fn zero_offset_is_identity() {
        let image = array![[1.0f32, 5.0], [2.0, 7.0], [3.0, 9.0]];
        assert_eq!(correct_line_offset(image.view(), 0.0), image);
    }
}
