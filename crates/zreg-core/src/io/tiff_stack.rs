//! Multi-page TIFF volumes: every page is one 2D frame.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;

use ndarray::{Array2, ArrayBase, Data, Ix2};
use num_traits::AsPrimitive;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::{colortype, TiffEncoder};
use tiff::ColorType;

use crate::consts::OUTPUT_MAX;
use crate::error::{Result, ZregError};
use crate::frame::Volume;

/// Decode every page of a multi-page grayscale TIFF, in file order.
pub fn read_pages(path: &Path) -> Result<Vec<Array2<f32>>> {
    let reader = BufReader::new(File::open(path)?);
    let mut decoder = Decoder::new(reader)?;

    let mut pages = Vec::new();
    loop {
        pages.push(decode_page(&mut decoder, path, pages.len())?);
        if !decoder.more_images() {
            break;
        }
        decoder.next_image()?;
    }
    Ok(pages)
}

/// Load a multi-page TIFF as a (row, column, frame) volume.
pub fn load_volume(path: &Path) -> Result<Volume> {
    let pages = read_pages(path)?;
    Volume::from_pages(&pages, &path.display().to_string())
}

fn decode_page<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    path: &Path,
    page: usize,
) -> Result<Array2<f32>> {
    let color = decoder.colortype()?;
    if !matches!(color, ColorType::Gray(_)) {
        return Err(ZregError::UnsupportedPixelFormat(format!(
            "{:?} on page {} of {}",
            color,
            page,
            path.display()
        )));
    }

    let (width, height) = decoder.dimensions()?;
    let samples = match decoder.read_image()? {
        DecodingResult::U8(v) => to_f32(&v),
        DecodingResult::U16(v) => to_f32(&v),
        DecodingResult::U32(v) => to_f32(&v),
        DecodingResult::I8(v) => to_f32(&v),
        DecodingResult::I16(v) => to_f32(&v),
        DecodingResult::I32(v) => to_f32(&v),
        DecodingResult::F32(v) => v,
        DecodingResult::F64(v) => to_f32(&v),
        _ => {
            return Err(ZregError::UnsupportedPixelFormat(format!(
                "64-bit integer samples on page {} of {}",
                page,
                path.display()
            )))
        }
    };

    Array2::from_shape_vec((height as usize, width as usize), samples).map_err(|_| {
        ZregError::UnsupportedPixelFormat(format!(
            "page {} of {} is not a single-sample {}x{} image",
            page,
            path.display(),
            width,
            height
        ))
    })
}

fn to_f32<T: AsPrimitive<f32>>(samples: &[T]) -> Vec<f32> {
    samples.iter().map(|&v| v.as_()).collect()
}

/// Write images as consecutive 16-bit grayscale pages, in list order.
///
/// Samples are clipped to `[0, 65535]` and truncated to integers.
pub fn write_stack<S>(path: &Path, images: &[ArrayBase<S, Ix2>]) -> Result<()>
where
    S: Data<Elem = f32>,
{
    let first = images.first().ok_or(ZregError::EmptySequence)?;
    let (h, w) = first.dim();
    for (i, image) in images.iter().enumerate() {
        if image.dim() != (h, w) {
            return Err(ZregError::shape_mismatch(
                format!("{}, page {}", path.display(), i),
                (h, w),
                image.dim(),
            ));
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    {
        let mut encoder = TiffEncoder::new(&mut writer)?;
        for image in images {
            let pixels: Vec<u16> = image.iter().map(|&v| to_u16(v)).collect();
            encoder.write_image::<colortype::Gray16>(w as u32, h as u32, &pixels)?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn to_u16(v: f32) -> u16 {
    v.clamp(0.0, OUTPUT_MAX) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u16_conversion_clips_and_truncates() {
        assert_eq!(to_u16(-5.0), 0);
        assert_eq!(to_u16(70_000.0), 65_535);
        assert_eq!(to_u16(12.9), 12);
        assert_eq!(to_u16(f32::NAN), 0);
    }
}
