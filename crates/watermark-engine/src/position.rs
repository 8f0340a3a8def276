//! Anchor and coordinate resolution for overlay placement.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Distance in pixels an anchored overlay keeps from the canvas edge.
pub const ANCHOR_MARGIN: i64 = 20;

/// Named relative placement, resolved against canvas and overlay sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    Center,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// Strict-parse failure for anchor names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized anchor name: {0:?}")]
pub struct UnknownAnchor(pub String);

impl FromStr for Anchor {
    type Err = UnknownAnchor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top-left" => Ok(Self::TopLeft),
            "top-center" => Ok(Self::TopCenter),
            "top-right" => Ok(Self::TopRight),
            "middle-left" => Ok(Self::MiddleLeft),
            "center" => Ok(Self::Center),
            "middle-right" => Ok(Self::MiddleRight),
            "bottom-left" => Ok(Self::BottomLeft),
            "bottom-center" => Ok(Self::BottomCenter),
            "bottom-right" => Ok(Self::BottomRight),
            _ => Err(UnknownAnchor(s.to_string())),
        }
    }
}

impl Anchor {
    /// Parse an anchor name, defaulting to top-left for unknown input.
    ///
    /// This keeps the historical permissive contract: an unrecognized name
    /// resolves to (20, 20) instead of erroring. Callers wanting strict
    /// validation use [`FromStr`].
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_else(|_| {
            debug!(name = s, "Unknown anchor name, defaulting to top-left");
            Self::TopLeft
        })
    }
}

/// Where a watermark goes: a named anchor or an explicit pixel offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    Anchor(Anchor),
    Explicit { x: i64, y: i64 },
}

impl Default for Position {
    fn default() -> Self {
        Position::Anchor(Anchor::default())
    }
}

impl From<Anchor> for Position {
    fn from(anchor: Anchor) -> Self {
        Position::Anchor(anchor)
    }
}

/// Resolve a position to absolute pixel offsets.
///
/// An explicit `override_xy` (e.g. from a drag-to-position UI) wins
/// unconditionally. Results may be negative when the overlay is larger
/// than the canvas; the paste clips, resolution does not.
pub fn resolve(
    position: &Position,
    canvas: (u32, u32),
    overlay: (u32, u32),
    override_xy: Option<(i64, i64)>,
) -> (i64, i64) {
    if let Some(xy) = override_xy {
        return xy;
    }
    match *position {
        Position::Explicit { x, y } => (x, y),
        Position::Anchor(anchor) => resolve_anchor(anchor, canvas, overlay),
    }
}

fn resolve_anchor(anchor: Anchor, canvas: (u32, u32), overlay: (u32, u32)) -> (i64, i64) {
    let (cw, ch) = (i64::from(canvas.0), i64::from(canvas.1));
    let (ow, oh) = (i64::from(overlay.0), i64::from(overlay.1));

    let left = ANCHOR_MARGIN;
    let right = cw - ow - ANCHOR_MARGIN;
    let center_x = (cw - ow).div_euclid(2);
    let top = ANCHOR_MARGIN;
    let bottom = ch - oh - ANCHOR_MARGIN;
    let center_y = (ch - oh).div_euclid(2);

    match anchor {
        Anchor::TopLeft => (left, top),
        Anchor::TopCenter => (center_x, top),
        Anchor::TopRight => (right, top),
        Anchor::MiddleLeft => (left, center_y),
        Anchor::Center => (center_x, center_y),
        Anchor::MiddleRight => (right, center_y),
        Anchor::BottomLeft => (left, bottom),
        Anchor::BottomCenter => (center_x, bottom),
        Anchor::BottomRight => (right, bottom),
    }
}
