//! Text watermark rasterization.
//!
//! Renders a text spec into a standalone transparent overlay, with
//! synthesized bold/italic (a matching true variant may not exist on the
//! host), optional outline and drop shadow, and final rotation.

use ab_glyph::{FontArc, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use tracing::debug;

use crate::OverlayError;
use crate::params::TextWatermark;
use crate::rotate;

/// Outline draws cover a 9x9 neighborhood around the glyph origin.
const OUTLINE_RADIUS: i32 = 4;

/// Drop shadow offset in both axes.
const SHADOW_OFFSET: i32 = 8;

/// Bold synthesis smears the glyph by up to this many pixels per axis.
const BOLD_SMEAR: i32 = 2;

/// Shear factor for italic synthesis.
const ITALIC_SHEAR: f32 = 0.2;

/// Per-character width estimate (in font sizes) when measurement fails.
const ESTIMATED_ADVANCE: f32 = 0.7;

const OPAQUE_BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Map a relative size in [0, 100] to an absolute pixel size.
///
/// The range is bounded by the canvas's shorter dimension:
/// `[short/50, short/10]`, interpolated linearly and rounded to nearest.
pub fn font_px_size(canvas: (u32, u32), size_percent: u8) -> u32 {
    let short = canvas.0.min(canvas.1);
    let min = short / 50;
    let max = short / 10;
    let t = f32::from(size_percent.min(100)) / 100.0;
    (min as f32 + (max - min) as f32 * t).round() as u32
}

/// Alpha under the inverted transparency convention: 0 keeps the base
/// alpha (255 when absent), 100 yields full transparency.
pub fn effective_alpha(base: Option<u8>, transparency: u8) -> u8 {
    let base = f32::from(base.unwrap_or(255));
    let t = f32::from(transparency.min(100));
    (base * (100.0 - t) / 100.0).round() as u8
}

/// Render a text watermark into a transparent overlay sized to its
/// content plus margin.
pub fn render_text_overlay(
    spec: &TextWatermark,
    canvas: (u32, u32),
    font: &FontArc,
) -> Result<RgbaImage, OverlayError> {
    let px = font_px_size(canvas, spec.size_percent).max(1);
    let scale = PxScale::from(px as f32);

    let (mut text_w, mut text_h) = text_size(scale, font, &spec.text);
    if text_w < px {
        // Degenerate measurement (e.g. a fallback face missing the
        // glyphs): estimate from character count instead.
        text_w = (spec.text.chars().count() as f32 * px as f32 * ESTIMATED_ADVANCE).round() as u32;
        text_h = px;
        debug!(text_w, text_h, "Degenerate text measurement, using estimate");
    }

    let margin = 30u32.max(text_w / 4).max(text_h / 4);
    let mut overlay = RgbaImage::new(text_w + 2 * margin, text_h + 2 * margin);
    debug!(
        width = overlay.width(),
        height = overlay.height(),
        px,
        "Rasterizing text overlay"
    );

    let alpha = effective_alpha(spec.color_alpha, spec.transparency);
    let color = Rgba([spec.color[0], spec.color[1], spec.color[2], alpha]);
    let (ox, oy) = (margin as i32, margin as i32);

    if spec.outline {
        for dx in -OUTLINE_RADIUS..=OUTLINE_RADIUS {
            for dy in -OUTLINE_RADIUS..=OUTLINE_RADIUS {
                if dx != 0 || dy != 0 {
                    draw_text_mut(&mut overlay, OPAQUE_BLACK, ox + dx, oy + dy, scale, font, &spec.text);
                }
            }
        }
    }

    if spec.shadow {
        draw_text_mut(
            &mut overlay,
            OPAQUE_BLACK,
            ox + SHADOW_OFFSET,
            oy + SHADOW_OFFSET,
            scale,
            font,
            &spec.text,
        );
    }

    if spec.font.bold {
        for dx in -BOLD_SMEAR..=BOLD_SMEAR {
            draw_text_mut(&mut overlay, color, ox + dx, oy, scale, font, &spec.text);
        }
        for dy in -BOLD_SMEAR..=BOLD_SMEAR {
            draw_text_mut(&mut overlay, color, ox, oy + dy, scale, font, &spec.text);
        }
    } else {
        draw_text_mut(&mut overlay, color, ox, oy, scale, font, &spec.text);
    }

    if spec.font.italic {
        overlay = rotate::shear_horizontal(&overlay, ITALIC_SHEAR)?;
    }

    if spec.rotation != 0.0 {
        overlay = rotate::rotate_expanded(&overlay, spec.rotation);
    }

    Ok(overlay)
}
