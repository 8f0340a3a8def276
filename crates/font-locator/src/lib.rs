//! Font resolution for watermark text rendering.
//!
//! Resolves a [`FontQuery`] to a usable font face through an ordered list
//! of lookup strategies. The chain ends with an embedded fallback face,
//! so resolution never fails outright: a missing or broken font degrades
//! instead of aborting a render.

mod system;

use std::path::PathBuf;
use std::sync::OnceLock;

use ab_glyph::FontArc;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use system::{KnownFiles, SystemFamily};

/// A caller's description of the font it wants.
///
/// This is the shape a persisted watermark template carries: either an
/// explicit font file or a family name, plus style flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FontQuery {
    /// Explicit font file path; wins over family lookup when it exists.
    pub file: Option<PathBuf>,
    /// Family name for a system font search (e.g. "DejaVu Sans").
    pub family: Option<String>,
    pub bold: bool,
    pub italic: bool,
}

/// One font lookup strategy. Returning `None` hands over to the next one.
pub trait FontLocator: Send + Sync {
    fn locate(&self, query: &FontQuery) -> Option<FontArc>;
}

/// Loads the query's explicit font file, if one is set and parses.
pub struct ExplicitFile;

impl FontLocator for ExplicitFile {
    fn locate(&self, query: &FontQuery) -> Option<FontArc> {
        let path = query.file.as_ref()?;
        let data = std::fs::read(path).ok()?;
        let font = FontArc::try_from_vec(data).ok();
        if font.is_some() {
            debug!(path = %path.display(), "Using explicit font file");
        }
        font
    }
}

/// Ordered font lookup chain with a guaranteed result.
pub struct FontStack {
    strategies: Vec<Box<dyn FontLocator>>,
}

impl FontStack {
    pub fn new(strategies: Vec<Box<dyn FontLocator>>) -> Self {
        Self { strategies }
    }

    /// Resolve a query to a font face.
    ///
    /// Never fails: every strategy may decline, after which the embedded
    /// fallback face is returned.
    pub fn resolve(&self, query: &FontQuery) -> FontArc {
        for strategy in &self.strategies {
            if let Some(font) = strategy.locate(query) {
                return font;
            }
        }
        debug!("No system font matched query, using embedded fallback");
        embedded_fallback()
    }
}

impl Default for FontStack {
    fn default() -> Self {
        Self::new(vec![
            Box::new(ExplicitFile),
            Box::new(SystemFamily::default()),
            Box::new(KnownFiles),
        ])
    }
}

const EMBEDDED_FONT: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

static EMBEDDED: OnceLock<FontArc> = OnceLock::new();

/// The built-in fallback face (DejaVu Sans), always available.
pub fn embedded_fallback() -> FontArc {
    EMBEDDED
        .get_or_init(|| {
            // Compile-time asset, known good.
            FontArc::try_from_slice(EMBEDDED_FONT).expect("embedded fallback font is a valid TTF")
        })
        .clone()
}
