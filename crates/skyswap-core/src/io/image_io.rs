use std::path::Path;

use image::{GrayImage, ImageBuffer, ImageFormat, Luma, Rgb};
use ndarray::{Array2, Array3};

use crate::consts::COLOR_CHANNEL_COUNT;
use crate::error::{Result, SkyError};
use crate::frame::{clip_unit, Matte, RgbFrame};

/// Load an image file as RGB, normalized to [0, 1].
pub fn load_rgb(path: &Path) -> Result<RgbFrame> {
    let img = image::open(path)?.to_rgb32f();
    let (w, h) = img.dimensions();
    let data = Array3::from_shape_vec(
        (h as usize, w as usize, COLOR_CHANNEL_COUNT),
        img.into_raw(),
    )
    .map_err(|e| SkyError::InvalidInput(format!("{}: {e}", path.display())))?;
    RgbFrame::new(data.mapv(clip_unit))
}

/// Load a grayscale probability map, normalized to [0, 1].
pub fn load_mask(path: &Path) -> Result<Array2<f32>> {
    let img = image::open(path)?.to_luma32f();
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(SkyError::InvalidDimensions {
            width: w as usize,
            height: h as usize,
        });
    }
    Array2::from_shape_vec((h as usize, w as usize), img.into_raw())
        .map_err(|e| SkyError::InvalidInput(format!("{}: {e}", path.display())))
}

fn to_u16(v: f32) -> u16 {
    (clip_unit(v) * 65535.0) as u16
}

fn to_u8(v: f32) -> u8 {
    (clip_unit(v) * 255.0) as u8
}

/// Save an RGB frame as 16-bit TIFF.
pub fn save_rgb_tiff(frame: &RgbFrame, path: &Path) -> Result<()> {
    let (h, w) = frame.dim();
    let pixels: Vec<u16> = frame.data.iter().map(|&v| to_u16(v)).collect();
    let img = ImageBuffer::<Rgb<u16>, Vec<u16>>::from_raw(w as u32, h as u32, pixels)
        .ok_or(SkyError::InvalidDimensions { width: w, height: h })?;
    img.save_with_format(path, ImageFormat::Tiff)?;
    Ok(())
}

/// Save an RGB frame as 8-bit PNG.
pub fn save_rgb_png(frame: &RgbFrame, path: &Path) -> Result<()> {
    let (h, w) = frame.dim();
    let mut img = image::RgbImage::new(w as u32, h as u32);
    for row in 0..h {
        for col in 0..w {
            let r = to_u8(frame.data[[row, col, 0]]);
            let g = to_u8(frame.data[[row, col, 1]]);
            let b = to_u8(frame.data[[row, col, 2]]);
            img.put_pixel(col as u32, row as u32, Rgb([r, g, b]));
        }
    }
    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save an RGB frame, choosing format from file extension (PNG unless .tif/.tiff).
pub fn save_rgb(frame: &RgbFrame, path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("tiff" | "tif") => save_rgb_tiff(frame, path),
        _ => save_rgb_png(frame, path),
    }
}

/// Save a matte as grayscale: 16-bit for .tif/.tiff, 8-bit PNG otherwise.
pub fn save_matte(matte: &Matte, path: &Path) -> Result<()> {
    let (h, w) = matte.dim();
    match path.extension().and_then(|e| e.to_str()) {
        Some("tiff" | "tif") => {
            let pixels: Vec<u16> = matte.data.iter().map(|&v| to_u16(v)).collect();
            let img = ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(w as u32, h as u32, pixels)
                .ok_or(SkyError::InvalidDimensions { width: w, height: h })?;
            img.save_with_format(path, ImageFormat::Tiff)?;
        }
        _ => {
            let mut img = GrayImage::new(w as u32, h as u32);
            for ((row, col), &v) in matte.data.indexed_iter() {
                img.put_pixel(col as u32, row as u32, Luma([to_u8(v)]));
            }
            img.save_with_format(path, ImageFormat::Png)?;
        }
    }
    Ok(())
}
