#![allow(dead_code)]

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use ndarray::Array2;
use tiff::encoder::{colortype, TiffEncoder};

use zreg_core::align::fourier_shift;
use zreg_core::frame::ShiftVector;

/// Deterministic pseudo-random value in `[0, 1)` for pixel `(r, c)`.
fn hash_noise(r: usize, c: usize, seed: u64) -> f32 {
    let mut x = (r as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
        ^ (c as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
        ^ seed.wrapping_mul(0x1656_67B1_9E37_79F9);
    x ^= x >> 33;
    x = x.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    x ^= x >> 33;
    (x >> 40) as f32 / (1u64 << 24) as f32
}

/// Broadband texture: hash noise smoothed by one circular 3x3 box pass,
/// scaled to `[base, base + amplitude)`.
pub fn texture(h: usize, w: usize, seed: u64, base: f32, amplitude: f32) -> Array2<f32> {
    let noise = Array2::from_shape_fn((h, w), |(r, c)| hash_noise(r, c, seed));
    Array2::from_shape_fn((h, w), |(r, c)| {
        let mut sum = 0.0;
        for dr in [h - 1, 0, 1] {
            for dc in [w - 1, 0, 1] {
                sum += noise[[(r + dr) % h, (c + dc) % w]];
            }
        }
        base + amplitude * sum / 9.0
    })
}

/// Circular sub-pixel translation of `image` by `(dy, dx)`.
pub fn translated(image: &Array2<f32>, dy: f64, dx: f64) -> Array2<f32> {
    fourier_shift(image.view(), ShiftVector::new(dy, dx))
}

/// Smooth bump centred at `center` along each row, same on every row.
pub fn bump_rows(rows: usize, cols: usize, center: f64, odd_shift: f64) -> Array2<f32> {
    Array2::from_shape_fn((rows, cols), |(r, c)| {
        let mu = if r % 2 == 1 { center + odd_shift } else { center };
        let d = c as f64 - mu;
        (100.0 * (-d * d / 8.0).exp()) as f32
    })
}

/// Write `pages` as a 32-bit float grayscale TIFF.
pub fn write_f32_tiff(path: &Path, pages: &[Array2<f32>]) {
    let mut writer = BufWriter::new(File::create(path).unwrap());
    let mut encoder = TiffEncoder::new(&mut writer).unwrap();
    for page in pages {
        let (h, w) = page.dim();
        let data: Vec<f32> = page.iter().copied().collect();
        encoder
            .write_image::<colortype::Gray32Float>(w as u32, h as u32, &data)
            .unwrap();
    }
}

/// Write `pages` as an 8-bit grayscale TIFF.
pub fn write_u8_tiff(path: &Path, pages: &[Array2<u8>]) {
    let mut writer = BufWriter::new(File::create(path).unwrap());
    let mut encoder = TiffEncoder::new(&mut writer).unwrap();
    for page in pages {
        let (h, w) = page.dim();
        let data: Vec<u8> = page.iter().copied().collect();
        encoder
            .write_image::<colortype::Gray8>(w as u32, h as u32, &data)
            .unwrap();
    }
}

/// Write one RGB8 page.
pub fn write_rgb_tiff(path: &Path, w: u32, h: u32) {
    let mut writer = BufWriter::new(File::create(path).unwrap());
    let mut encoder = TiffEncoder::new(&mut writer).unwrap();
    let data = vec![128u8; (w * h * 3) as usize];
    encoder
        .write_image::<colortype::RGB8>(w, h, &data)
        .unwrap();
}

/// Mean absolute difference over the interior, `margin` pixels in from
/// every edge.
pub fn interior_mean_abs_diff(a: &Array2<f32>, b: &Array2<f32>, margin: usize) -> f32 {
    let (h, w) = a.dim();
    let mut sum = 0.0;
    let mut n = 0usize;
    for r in margin..h - margin {
        for c in margin..w - margin {
            sum += (a[[r, c]] - b[[r, c]]).abs();
            n += 1;
        }
    }
    sum / n as f32
}

pub fn mean(image: &Array2<f32>) -> f32 {
    image.mean().unwrap_or(0.0)
}
