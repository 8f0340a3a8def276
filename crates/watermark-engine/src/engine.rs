//! Top-level compositing: renders overlays and pastes them onto a base
//! image.

use font_locator::FontStack;
use image::{DynamicImage, RgbaImage, imageops};
use tracing::{debug, info};

use crate::params::{ImageWatermark, TextWatermark};
use crate::position::{self, Position};
use crate::{OverlayError, Result, WatermarkError, WatermarkKind, overlay, text};

/// Applies text and image watermarks to images.
///
/// Owns the font resolution chain; everything else is passed per call.
/// Calls are independent and never mutate their inputs, so batch callers
/// may fan invocations out across threads freely.
pub struct CompositingEngine {
    fonts: FontStack,
}

impl CompositingEngine {
    pub fn new() -> Self {
        Self {
            fonts: FontStack::default(),
        }
    }

    /// Build an engine with a custom font lookup chain.
    pub fn with_fonts(fonts: FontStack) -> Self {
        Self { fonts }
    }

    /// Apply the given watermarks to `base` and return a new image.
    ///
    /// The text watermark is applied first, then the image watermark on
    /// top of it. Whitespace-only text and an absent image watermark both
    /// count as "not provided"; with neither present this is
    /// [`WatermarkError::NothingToApply`]. The output keeps the input's
    /// color mode when the input had no alpha channel.
    pub fn apply_watermarks(
        &self,
        base: &DynamicImage,
        text_mark: Option<&TextWatermark>,
        image_mark: Option<&ImageWatermark>,
        position: &Position,
    ) -> Result<DynamicImage> {
        let text_mark = text_mark.filter(|spec| !spec.is_blank());
        if text_mark.is_none() && image_mark.is_none() {
            return Err(WatermarkError::NothingToApply);
        }

        let mut canvas = base.to_rgba8();

        if let Some(spec) = text_mark {
            let rendered = self
                .render_text(spec, canvas.dimensions())
                .map_err(|source| WatermarkError::Application {
                    kind: WatermarkKind::Text,
                    source,
                })?;
            paste(&mut canvas, &rendered, position);
        }

        if let Some(spec) = image_mark {
            let prepared = overlay::prepare_image_overlay(spec).map_err(|source| {
                WatermarkError::Application {
                    kind: WatermarkKind::Image,
                    source,
                }
            })?;
            paste(&mut canvas, &prepared, position);
        }

        info!(
            width = canvas.width(),
            height = canvas.height(),
            text = text_mark.is_some(),
            image = image_mark.is_some(),
            "Watermarks applied"
        );
        Ok(restore_color_mode(base, canvas))
    }

    fn render_text(
        &self,
        spec: &TextWatermark,
        canvas: (u32, u32),
    ) -> std::result::Result<RgbaImage, OverlayError> {
        let font = self.fonts.resolve(&spec.font);
        text::render_text_overlay(spec, canvas, &font)
    }
}

impl Default for CompositingEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn paste(canvas: &mut RgbaImage, overlay_img: &RgbaImage, position: &Position) {
    let (x, y) = position::resolve(
        position,
        canvas.dimensions(),
        overlay_img.dimensions(),
        None,
    );
    debug!(
        x,
        y,
        overlay_w = overlay_img.width(),
        overlay_h = overlay_img.height(),
        "Pasting overlay"
    );
    imageops::overlay(canvas, overlay_img, x, y);
}

/// Convert the composited RGBA canvas back to the input's color family,
/// so alpha-less files are not silently widened on save.
fn restore_color_mode(original: &DynamicImage, canvas: RgbaImage) -> DynamicImage {
    if original.color().has_alpha() {
        return DynamicImage::ImageRgba8(canvas);
    }
    match original {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageLuma16(_) => {
            DynamicImage::ImageLuma8(imageops::grayscale(&canvas))
        }
        _ => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Anchor;
    use image::{Rgb, RgbImage, Rgba};

    fn base_rgb(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb(color)))
    }

    fn opaque_text(text: &str) -> TextWatermark {
        TextWatermark {
            color: [255, 0, 0],
            color_alpha: None,
            transparency: 0,
            ..TextWatermark::new(text)
        }
    }

    fn opaque_image(width: u32, height: u32, color: [u8; 4]) -> ImageWatermark {
        let img = RgbaImage::from_pixel(width, height, Rgba(color));
        ImageWatermark {
            transparency: 0,
            ..ImageWatermark::new(DynamicImage::ImageRgba8(img))
        }
    }

    #[test]
    fn nothing_to_apply_is_an_error() {
        let engine = CompositingEngine::new();
        let base = base_rgb(100, 100, [0, 0, 0]);
        let blank = TextWatermark::new("   ");
        let result = engine.apply_watermarks(&base, Some(&blank), None, &Position::default());
        assert!(matches!(result, Err(WatermarkError::NothingToApply)));
    }

    #[test]
    fn rgb_input_yields_rgb_output() {
        let engine = CompositingEngine::new();
        let base = base_rgb(400, 300, [0, 0, 0]);
        let out = engine
            .apply_watermarks(&base, Some(&opaque_text("hi")), None, &Position::default())
            .unwrap();
        assert!(matches!(out, DynamicImage::ImageRgb8(_)));
        assert_eq!(out.width(), 400);
        assert_eq!(out.height(), 300);
    }

    #[test]
    fn rgba_input_stays_rgba() {
        let engine = CompositingEngine::new();
        let base = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            200,
            200,
            Rgba([10, 20, 30, 200]),
        ));
        let out = engine
            .apply_watermarks(&base, Some(&opaque_text("hi")), None, &Position::default())
            .unwrap();
        assert!(matches!(out, DynamicImage::ImageRgba8(_)));
    }

    #[test]
    fn grayscale_input_stays_grayscale() {
        let engine = CompositingEngine::new();
        let base = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(
            150,
            150,
            image::Luma([0]),
        ));
        let out = engine
            .apply_watermarks(&base, Some(&opaque_text("hi")), None, &Position::default())
            .unwrap();
        assert!(matches!(out, DynamicImage::ImageLuma8(_)));
    }

    #[test]
    fn input_image_is_not_mutated() {
        let engine = CompositingEngine::new();
        let base = base_rgb(120, 120, [7, 7, 7]);
        let before = base.clone();
        let _ = engine
            .apply_watermarks(&base, Some(&opaque_text("mark")), None, &Position::default())
            .unwrap();
        assert_eq!(base.as_bytes(), before.as_bytes());
    }

    #[test]
    fn fully_transparent_text_round_trips_the_base() {
        let engine = CompositingEngine::new();
        let base = base_rgb(200, 160, [255, 0, 0]);
        let spec = TextWatermark {
            transparency: 100,
            ..opaque_text("ghost")
        };
        let out = engine
            .apply_watermarks(&base, Some(&spec), None, &Position::default())
            .unwrap();
        assert_eq!(out.as_bytes(), base.as_bytes());
    }

    #[test]
    fn image_watermark_lands_on_top_of_text() {
        let engine = CompositingEngine::new();
        let base = base_rgb(300, 300, [0, 0, 0]);
        let text = opaque_text("XXXXX");
        let mark = opaque_image(60, 60, [0, 0, 255, 255]);
        let out = engine
            .apply_watermarks(
                &base,
                Some(&text),
                Some(&mark),
                &Position::Anchor(Anchor::Center),
            )
            .unwrap();
        // The image watermark is applied second, so the center pixel is
        // its pure blue regardless of the text beneath.
        let rgb = out.to_rgb8();
        assert_eq!(rgb.get_pixel(150, 150), &Rgb([0, 0, 255]));
    }

    #[test]
    fn invalid_image_scale_is_wrapped_with_kind() {
        let engine = CompositingEngine::new();
        let base = base_rgb(100, 100, [0, 0, 0]);
        let mark = ImageWatermark {
            scale: -2.0,
            ..opaque_image(10, 10, [255, 255, 255, 255])
        };
        let err = engine
            .apply_watermarks(&base, None, Some(&mark), &Position::default())
            .unwrap_err();
        match err {
            WatermarkError::Application { kind, source } => {
                assert_eq!(kind, WatermarkKind::Image);
                assert!(matches!(source, OverlayError::InvalidScale(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn oversized_watermark_does_not_fail() {
        let engine = CompositingEngine::new();
        let base = base_rgb(50, 50, [0, 0, 0]);
        let mark = opaque_image(200, 200, [255, 255, 255, 255]);
        let out = engine
            .apply_watermarks(&base, None, Some(&mark), &Position::default())
            .unwrap();
        // Pasted partially outside, clipped by the paste itself.
        assert_eq!(out.width(), 50);
        assert_eq!(out.height(), 50);
    }
}
