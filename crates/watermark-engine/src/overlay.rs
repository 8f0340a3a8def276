//! Image watermark overlay preparation.

use image::imageops::FilterType;
use image::{RgbaImage, imageops};
use tracing::debug;

use crate::OverlayError;
use crate::params::ImageWatermark;
use crate::rotate;
use crate::text::effective_alpha;

/// Scale, fade and rotate a watermark image into a ready-to-paste
/// transparent overlay.
pub fn prepare_image_overlay(spec: &ImageWatermark) -> Result<RgbaImage, OverlayError> {
    if !spec.scale.is_finite() || spec.scale <= 0.0 {
        return Err(OverlayError::InvalidScale(spec.scale));
    }

    let mut overlay = spec.image.to_rgba8();
    let (w, h) = overlay.dimensions();
    if w == 0 || h == 0 {
        return Err(OverlayError::EmptyOverlay {
            width: w,
            height: h,
        });
    }

    if (spec.scale - 1.0).abs() > f32::EPSILON {
        let new_w = ((w as f32 * spec.scale).round() as u32).max(1);
        let new_h = ((h as f32 * spec.scale).round() as u32).max(1);
        debug!(w, h, new_w, new_h, scale = spec.scale, "Scaling watermark image");
        overlay = imageops::resize(&overlay, new_w, new_h, FilterType::Lanczos3);
    }

    if spec.transparency > 0 {
        for pixel in overlay.pixels_mut() {
            pixel[3] = effective_alpha(Some(pixel[3]), spec.transparency);
        }
    }

    if spec.rotation != 0.0 {
        overlay = rotate::rotate_expanded(&overlay, spec.rotation);
    }

    Ok(overlay)
}
