//! Image file loading and saving for callers of the engine.
//!
//! JPEG output flattens alpha onto a white background before encoding;
//! PNG output preserves it.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageFormat, RgbImage, Rgba, RgbaImage, imageops};
use tracing::{debug, info};

use crate::Result;

/// Output format and its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg { quality: u8 },
    Png,
}

/// Decode an image from disk.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    debug!(path = %path.display(), "Loading image");
    Ok(image::open(path)?)
}

/// Encode an image to disk in the given format.
pub fn save_image(img: &DynamicImage, path: &Path, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Jpeg { quality } => {
            let rgb = flatten_to_rgb(img);
            let writer = BufWriter::new(File::create(path)?);
            let mut encoder = JpegEncoder::new_with_quality(writer, quality);
            encoder.encode(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                ExtendedColorType::Rgb8,
            )?;
        }
        OutputFormat::Png => {
            img.save_with_format(path, ImageFormat::Png)?;
        }
    }
    info!(path = %path.display(), ?format, "Image saved");
    Ok(())
}

/// Composite any alpha onto a white background and drop the channel.
fn flatten_to_rgb(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }
    let mut background =
        RgbaImage::from_pixel(img.width(), img.height(), Rgba([255, 255, 255, 255]));
    imageops::overlay(&mut background, &img.to_rgba8(), 0, 0);
    DynamicImage::ImageRgba8(background).to_rgb8()
}

/// Shrink an image to fit within `max_w` x `max_h`, preserving aspect
/// ratio with Lanczos3. Images already inside the bounds are returned
/// unchanged.
pub fn resize_to_fit(img: &DynamicImage, max_w: u32, max_h: u32) -> DynamicImage {
    let (w, h) = (img.width(), img.height());
    if w <= max_w && h <= max_h {
        return img.clone();
    }
    let ratio = (f64::from(max_w) / f64::from(w)).min(f64::from(max_h) / f64::from(h));
    let new_w = ((f64::from(w) * ratio) as u32).max(1);
    let new_h = ((f64::from(h) * ratio) as u32).max(1);
    debug!(w, h, new_w, new_h, "Resizing image to fit bounds");
    img.resize_exact(new_w, new_h, FilterType::Lanczos3)
}
