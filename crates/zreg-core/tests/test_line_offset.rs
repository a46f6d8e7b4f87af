mod common;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;

use zreg_core::lineoffset::{correct_line_offset, estimate_line_offset, LineOffsetSource};

use common::bump_rows;

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

#[test]
fn test_recovers_negated_odd_row_shift() {
    for shift in [3.0, -2.0, 1.0] {
        let image = bump_rows(21, 64, 30.0, shift);
        let offset = estimate_line_offset(image.view(), 200, &mut rng());
        assert_eq!(offset.source, LineOffsetSource::Estimated);
        assert_eq!(offset.value, -shift, "odd rows moved by {shift}");
        assert_eq!(offset.pairs_used, 10);
    }
}

#[test]
fn test_fractional_shift_is_recovered_to_half_a_pixel() {
    for shift in [1.5, 0.4, -2.6, 1.2] {
        let image = bump_rows(41, 64, 30.0, shift);
        let offset = estimate_line_offset(image.view(), 200, &mut rng());
        assert_eq!(offset.source, LineOffsetSource::Estimated);
        assert!(
            (offset.value + shift).abs() <= 0.5 + 1e-9,
            "odd rows moved by {shift}, estimated {}",
            offset.value
        );
        assert_eq!((2.0 * offset.value).fract(), 0.0);
    }
}

#[test]
fn test_correction_lines_up_odd_rows() {
    let image = bump_rows(20, 64, 30.0, 3.0);
    let offset = estimate_line_offset(image.view(), 200, &mut rng());
    let corrected = correct_line_offset(image.view(), offset.value);

    let expected = bump_rows(20, 64, 30.0, 0.0);
    for r in 0..20 {
        for c in 5..59 {
            assert!(
                (corrected[[r, c]] - expected[[r, c]]).abs() < 1e-3,
                "row {r}, col {c}"
            );
        }
    }
}

#[test]
fn test_correcting_twice_leaves_zero_residual() {
    let image = bump_rows(40, 64, 28.0, -2.0);
    let first = estimate_line_offset(image.view(), 200, &mut rng());
    let corrected = correct_line_offset(image.view(), first.value);
    let residual = estimate_line_offset(corrected.view(), 200, &mut rng());
    assert_eq!(residual.value, 0.0);
    assert!(residual.value.is_sign_positive());
    assert_eq!(residual.source, LineOffsetSource::Estimated);
}

#[test]
fn test_pair_sampling_is_bounded_and_seeded() {
    let image = bump_rows(201, 48, 20.0, 2.0);
    let a = estimate_line_offset(image.view(), 10, &mut StdRng::seed_from_u64(5));
    let b = estimate_line_offset(image.view(), 10, &mut StdRng::seed_from_u64(5));
    assert_eq!(a.pairs_used, 10);
    assert_eq!(a, b);
    assert_eq!(a.value, -2.0);
}

#[test]
fn test_degenerate_image_falls_back_to_zero() {
    let image = Array2::<f32>::ones((2, 32));
    let offset = estimate_line_offset(image.view(), 200, &mut rng());
    assert!(offset.is_degenerate());
    assert_eq!(offset.value, 0.0);
    assert_eq!(offset.pairs_used, 0);
    assert_eq!(offset.to_string(), "0 px (degenerate)");
}

#[test]
fn test_offset_reuse_keeps_channels_consistent() {
    let reference = bump_rows(20, 64, 30.0, 2.0);
    let other = reference.mapv(|v| 0.5 * v + 10.0);
    let offset = estimate_line_offset(reference.view(), 200, &mut rng());

    let a = correct_line_offset(reference.view(), offset.value);
    let b = correct_line_offset(other.view(), offset.value);
    for r in (1..20).step_by(2) {
        for c in 5..59 {
            assert!((b[[r, c]] - (0.5 * a[[r, c]] + 10.0)).abs() < 1e-3);
        }
    }
}
