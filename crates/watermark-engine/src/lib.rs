//! Watermark compositing engine.
//!
//! Pure image-transformation core for a batch watermarking tool: takes a
//! decoded base image plus fully-resolved text/image watermark parameters
//! and produces a composited copy. No UI, no persistence; callers load
//! and save images (see [`io`]) and supply parameter values themselves.

pub mod engine;
pub mod io;
pub mod overlay;
pub mod params;
pub mod position;
pub mod rotate;
pub mod text;

// Re-exports for convenience
pub use engine::CompositingEngine;
pub use params::{ImageWatermark, TextWatermark};
pub use position::{ANCHOR_MARGIN, Anchor, Position, UnknownAnchor};

use std::fmt;

/// Which watermark layer a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatermarkKind {
    Text,
    Image,
}

impl fmt::Display for WatermarkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WatermarkKind::Text => write!(f, "text"),
            WatermarkKind::Image => write!(f, "image"),
        }
    }
}

/// Errors surfaced to callers of the engine and its I/O helpers.
///
/// Font resolution and text measurement problems are handled internally
/// and never appear here.
#[derive(Debug, thiserror::Error)]
pub enum WatermarkError {
    #[error("nothing to apply: text is empty and no watermark image was given")]
    NothingToApply,

    #[error("{kind} watermark application failed")]
    Application {
        kind: WatermarkKind,
        #[source]
        source: OverlayError,
    },

    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Causes of an overlay-preparation failure, carried inside
/// [`WatermarkError::Application`].
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("watermark scale must be positive and finite, got {0}")]
    InvalidScale(f32),

    #[error("watermark source image is empty ({width}x{height})")]
    EmptyOverlay { width: u32, height: u32 },

    #[error("affine transform is not invertible")]
    DegenerateTransform,
}

/// Result type alias for watermark operations.
pub type Result<T> = std::result::Result<T, WatermarkError>;
