//! Watermark parameter types supplied by the caller.
//!
//! A spec is constructed fresh per compositing call, usually merged by the
//! caller from a persisted template and live UI overrides. The engine never
//! reaches into shared config state.

use font_locator::FontQuery;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Text watermark parameters.
///
/// `transparency` keeps the historical inverted convention: 0 is fully
/// opaque, 100 fully transparent. Persisted templates depend on the
/// numeric contract, so it is preserved exactly; only the field name makes
/// the direction explicit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextWatermark {
    pub text: String,
    pub font: FontQuery,
    /// Relative size in [0, 100], mapped against the canvas's shorter side.
    pub size_percent: u8,
    pub color: [u8; 3],
    /// Alpha the color itself carries; scaled by `transparency`. 255 when absent.
    pub color_alpha: Option<u8>,
    /// 0 = opaque, 100 = invisible.
    pub transparency: u8,
    /// Degrees, counter-clockwise.
    pub rotation: f32,
    pub outline: bool,
    pub shadow: bool,
}

impl TextWatermark {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Empty or whitespace-only text counts as "no text watermark".
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl Default for TextWatermark {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: FontQuery::default(),
            size_percent: 50,
            color: [255, 255, 255],
            color_alpha: Some(128),
            transparency: 50,
            rotation: 0.0,
            outline: false,
            shadow: false,
        }
    }
}

/// Image watermark parameters.
#[derive(Debug, Clone)]
pub struct ImageWatermark {
    /// Caller-decoded watermark image.
    pub image: DynamicImage,
    /// Multiplier on the source size, typically 0.1–5.0. Must be positive.
    pub scale: f32,
    /// Same inverted convention as [`TextWatermark::transparency`].
    pub transparency: u8,
    /// Degrees, counter-clockwise.
    pub rotation: f32,
}

impl ImageWatermark {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image,
            scale: 1.0,
            transparency: 50,
            rotation: 0.0,
        }
    }
}
