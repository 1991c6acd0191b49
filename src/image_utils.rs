use std::io::Cursor;

use anyhow::{anyhow, Result};
use eframe::egui;
use fast_image_resize::images::Image;
use fast_image_resize::{PixelType, ResizeOptions, Resizer};
use image::DynamicImage;
use zune_jpeg::JpegDecoder;

use crate::dimensions::{Decoded, Dimensions};

pub const THUMBNAIL_MAX_WIDTH: u32 = 400;

pub fn to_color_image(img: &DynamicImage) -> egui::ColorImage {
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let pixels = rgba.into_raw();
    egui::ColorImage::from_rgba_unmultiplied(size, &pixels)
}

fn is_jpeg(bytes: &[u8]) -> bool {
    bytes.starts_with(&[0xFF, 0xD8, 0xFF])
}

/// Decodes with zune-jpeg when the bytes look like a JPEG, falling back to
/// the `image` crate for everything else or when zune fails.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    if is_jpeg(bytes) {
        let mut decoder = JpegDecoder::new(Cursor::new(bytes));
        if let Ok(pixels) = decoder.decode() {
            if let Some(info) = decoder.info() {
                if let Some(rgb) =
                    image::RgbImage::from_raw(info.width as u32, info.height as u32, pixels)
                {
                    return Ok(DynamicImage::ImageRgb8(rgb));
                }
            }
        }
    }
    Ok(image::load_from_memory(bytes)?)
}

/// Downscales to `max_width` keeping aspect; smaller images are only converted.
pub fn thumbnail(image: &DynamicImage, max_width: u32) -> Result<egui::ColorImage> {
    if image.width() <= max_width || image.width() == 0 {
        return Ok(to_color_image(image));
    }
    let new_w = max_width;
    let new_h = ((image.height() as u64 * max_width as u64) / image.width() as u64).max(1) as u32;

    let rgba = image.to_rgba8();
    let src_image = Image::from_vec_u8(rgba.width(), rgba.height(), rgba.into_raw(), PixelType::U8x4)
        .map_err(|e| anyhow!("Unable to wrap image buffer: {e:?}"))?;
    let mut dst_image = Image::new(new_w, new_h, PixelType::U8x4);
    Resizer::new()
        .resize(&src_image, &mut dst_image, &ResizeOptions::default())
        .map_err(|e| anyhow!("Unable to resize image: {e:?}"))?;

    let size = [new_w as usize, new_h as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, dst_image.buffer()))
}

pub fn decode_with_thumbnail(bytes: &[u8]) -> Result<Decoded> {
    let image = decode_image(bytes)?;
    let dimensions = Dimensions::new(image.width(), image.height());
    let thumbnail = thumbnail(&image, THUMBNAIL_MAX_WIDTH).ok();
    Ok(Decoded {
        dimensions,
        thumbnail,
    })
}
