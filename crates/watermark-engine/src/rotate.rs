//! Arbitrary-angle overlay rotation and shear with canvas expansion.
//!
//! Both transforms are built on imageproc's projective warp with a
//! transparent fill, so nothing is clipped and exposed regions stay
//! fully transparent.

use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::debug;

use crate::OverlayError;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Rotate an overlay by `degrees` counter-clockwise, expanding the output
/// canvas to the rotated bounding box.
pub fn rotate_expanded(overlay: &RgbaImage, degrees: f32) -> RgbaImage {
    let (w, h) = overlay.dimensions();
    if w == 0 || h == 0 || degrees % 360.0 == 0.0 {
        return overlay.clone();
    }

    let theta = degrees.to_radians();
    let (sin, cos) = theta.sin_cos();
    let (wf, hf) = (w as f32, h as f32);
    let new_w = (wf * cos.abs() + hf * sin.abs()).ceil().max(1.0) as u32;
    let new_h = (wf * sin.abs() + hf * cos.abs()).ceil().max(1.0) as u32;
    debug!(w, h, new_w, new_h, degrees, "Rotating overlay");

    // Screen coordinates point y-down, so the negated angle turns positive
    // degrees into a counter-clockwise rotation.
    let projection = Projection::translate(new_w as f32 / 2.0, new_h as f32 / 2.0)
        * Projection::rotate(-theta)
        * Projection::translate(-wf / 2.0, -hf / 2.0);

    let mut out = RgbaImage::new(new_w, new_h);
    warp_into(
        overlay,
        &projection,
        Interpolation::Bilinear,
        TRANSPARENT,
        &mut out,
    );
    out
}

/// Shear an overlay horizontally: `(x, y) -> (x + factor * y, y)`, into a
/// canvas widened to hold the slanted content. Used for italic synthesis.
pub(crate) fn shear_horizontal(
    overlay: &RgbaImage,
    factor: f32,
) -> Result<RgbaImage, OverlayError> {
    let (w, h) = overlay.dimensions();
    if w == 0 || h == 0 {
        return Ok(overlay.clone());
    }

    let new_w = w + (factor.abs() * h as f32).ceil() as u32;
    debug!(w, h, new_w, factor, "Shearing overlay");

    let matrix = [1.0, factor, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
    let projection =
        Projection::from_matrix(matrix).ok_or(OverlayError::DegenerateTransform)?;

    let mut out = RgbaImage::new(new_w, h);
    warp_into(
        overlay,
        &projection,
        Interpolation::Nearest,
        TRANSPARENT,
        &mut out,
    );
    Ok(out)
}
