mod common;

use ndarray::{array, Array2};
use tempfile::tempdir;

use zreg_core::error::ZregError;
use zreg_core::io::{discover_inputs, load_volume, output_file_name, read_pages, write_stack};

use common::{write_f32_tiff, write_rgb_tiff, write_u8_tiff};

#[test]
fn test_integral_samples_round_trip_exactly() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stack.tif");
    let pages: Vec<Array2<f32>> = (0..3)
        .map(|p| Array2::from_shape_fn((5, 7), |(r, c)| (p * 20_000 + r * 7 + c) as f32))
        .collect();

    write_stack(&path, &pages).unwrap();
    let back = read_pages(&path).unwrap();
    assert_eq!(back, pages);
}

#[test]
fn test_out_of_range_samples_are_clipped() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("clip.tif");
    let page = array![[-10.0f32, 0.4, 65_535.9], [70_000.0, 12.7, f32::NAN]];

    write_stack(&path, &[page]).unwrap();
    let back = read_pages(&path).unwrap();
    assert_eq!(back[0], array![[0.0f32, 0.0, 65_535.0], [65_535.0, 12.0, 0.0]]);
}

#[test]
fn test_views_can_be_written() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("views.tif");
    let a = Array2::from_elem((4, 4), 3.0f32);
    let b = Array2::from_elem((4, 4), 9.0f32);

    write_stack(&path, &[a.view(), b.view()]).unwrap();
    let volume = load_volume(&path).unwrap();
    assert_eq!(volume.frame_count(), 2);
    assert_eq!(volume.frame(1)[[2, 2]], 9.0);
}

#[test]
fn test_writer_rejects_mixed_shapes_and_empty_lists() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.tif");
    let pages = vec![Array2::<f32>::zeros((4, 4)), Array2::zeros((4, 5))];
    assert!(matches!(
        write_stack(&path, &pages),
        Err(ZregError::ShapeMismatch { .. })
    ));

    let empty: Vec<Array2<f32>> = Vec::new();
    assert!(matches!(
        write_stack(&path, &empty),
        Err(ZregError::EmptySequence)
    ));
}

#[test]
fn test_loader_keeps_page_order_and_axes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("float.tif");
    let pages: Vec<Array2<f32>> = (0..4)
        .map(|p| Array2::from_shape_fn((3, 6), |(r, c)| p as f32 + 0.25 * (r * 6 + c) as f32))
        .collect();
    write_f32_tiff(&path, &pages);

    let volume = load_volume(&path).unwrap();
    assert_eq!(volume.data.dim(), (3, 6, 4));
    assert_eq!((volume.rows(), volume.cols()), (3, 6));
    for (i, page) in pages.iter().enumerate() {
        assert_eq!(volume.frame(i), page.view());
    }
}

#[test]
fn test_loader_widens_u8_pages() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bytes.tif");
    write_u8_tiff(&path, &[array![[0u8, 128], [255, 7]]]);

    let pages = read_pages(&path).unwrap();
    assert_eq!(pages[0], array![[0.0f32, 128.0], [255.0, 7.0]]);
}

#[test]
fn test_loader_rejects_colour_pages() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rgb.tif");
    write_rgb_tiff(&path, 4, 4);
    assert!(matches!(
        read_pages(&path),
        Err(ZregError::UnsupportedPixelFormat(_))
    ));
}

#[test]
fn test_discovery_sorts_and_skips_outputs() {
    let dir = tempdir().unwrap();
    for name in ["plane_b.tif", "plane_a.tif", "other.tif", "plane_c.tif"] {
        std::fs::write(dir.path().join(name), b"").unwrap();
    }
    std::fs::create_dir(dir.path().join("plane_dir")).unwrap();
    let output = output_file_name("reg_", "plane", 0);
    assert_eq!(output, "reg_plane_ch0.tif");
    std::fs::write(dir.path().join(&output), b"").unwrap();

    let files = discover_inputs(dir.path(), "plane", &[output]).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["plane_a.tif", "plane_b.tif", "plane_c.tif"]);
}

#[test]
fn test_discovery_without_matches_fails() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("other.tif"), b"").unwrap();
    assert!(matches!(
        discover_inputs(dir.path(), "plane", &[]),
        Err(ZregError::EmptyInputSet { .. })
    ));
}
