//! System font discovery: directory scans and known-file candidates.

use std::path::{Path, PathBuf};

use ab_glyph::FontArc;
use tracing::{debug, info};

use crate::{FontLocator, FontQuery};

/// How deep to recurse into font directories.
const MAX_SCAN_DEPTH: usize = 3;

const FONT_EXTENSIONS: &[&str] = &["ttf", "otf", "ttc", "otc"];

/// Scans OS font directories for a file whose name matches the queried
/// family, preferring filenames whose style markers match the bold/italic
/// flags ("DejaVuSans-BoldOblique" beats "DejaVuSans" for bold+italic).
pub struct SystemFamily {
    dirs: Vec<PathBuf>,
}

impl SystemFamily {
    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }
}

impl Default for SystemFamily {
    fn default() -> Self {
        Self::with_dirs(font_dirs())
    }
}

impl FontLocator for SystemFamily {
    fn locate(&self, query: &FontQuery) -> Option<FontArc> {
        let family = query.family.as_deref()?.trim();
        if family.is_empty() {
            return None;
        }
        let needle = normalize(family);

        let mut best: Option<(u32, PathBuf)> = None;
        for dir in &self.dirs {
            collect_matches(dir, &needle, query, 0, &mut best);
        }

        let (score, path) = best?;
        let data = std::fs::read(&path).ok()?;
        let font = FontArc::try_from_vec(data).ok()?;
        info!(path = %path.display(), score, family, "Using system font for family lookup");
        Some(font)
    }
}

fn collect_matches(
    dir: &Path,
    needle: &str,
    query: &FontQuery,
    depth: usize,
    best: &mut Option<(u32, PathBuf)>,
) {
    if depth > MAX_SCAN_DEPTH {
        return;
    }
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_matches(&path, needle, query, depth + 1, best);
            continue;
        }
        if !is_font_file(&path) {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let stem = normalize(stem);
        if !stem.contains(needle) {
            continue;
        }
        let score = style_score(&stem, query.bold, query.italic);
        if best.as_ref().is_none_or(|(s, _)| score > *s) {
            debug!(path = %path.display(), score, "Font candidate");
            *best = Some((score, path));
        }
    }
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_lowercase();
            FONT_EXTENSIONS.contains(&ext.as_str())
        })
}

/// Rank a filename stem against the requested style.
fn style_score(stem: &str, bold: bool, italic: bool) -> u32 {
    let has_bold = stem.contains("bold");
    let has_italic = stem.contains("italic") || stem.contains("oblique");
    let mut score = 1;
    if has_bold == bold {
        score += 2;
    }
    if has_italic == italic {
        score += 2;
    }
    score
}

/// Lowercase and strip separators so "DejaVu Sans" matches "DejaVuSans-Bold".
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .collect::<String>()
        .to_lowercase()
}

/// Tries an ordered hardcoded list of common CJK/Latin font files.
pub struct KnownFiles;

impl FontLocator for KnownFiles {
    fn locate(&self, _query: &FontQuery) -> Option<FontArc> {
        for path in known_font_candidates() {
            let Ok(data) = std::fs::read(path) else {
                continue;
            };
            if let Ok(font) = FontArc::try_from_vec(data) {
                info!(path, "Using known system font");
                return Some(font);
            }
        }
        None
    }
}

fn font_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();

    #[cfg(target_os = "macos")]
    {
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        dirs.push(PathBuf::from("/Library/Fonts"));
    }
    #[cfg(target_os = "windows")]
    {
        dirs.push(PathBuf::from("C:\\Windows\\Fonts"));
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        dirs.push(PathBuf::from("/usr/share/fonts"));
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        dirs.push(PathBuf::from(&home).join(".fonts"));
        dirs.push(PathBuf::from(&home).join(".local/share/fonts"));
    }

    dirs
}

fn known_font_candidates() -> &'static [&'static str] {
    #[cfg(target_os = "macos")]
    {
        &[
            "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/System/Library/Fonts/Helvetica.ttc",
            "/System/Library/Fonts/PingFang.ttc",
            "/System/Library/Fonts/Hiragino Sans GB.ttc",
        ]
    }
    #[cfg(target_os = "windows")]
    {
        &[
            "C:\\Windows\\Fonts\\msyh.ttc",
            "C:\\Windows\\Fonts\\simhei.ttf",
            "C:\\Windows\\Fonts\\simsun.ttc",
            "C:\\Windows\\Fonts\\arial.ttf",
        ]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        &[
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_separators_and_case() {
        assert_eq!(normalize("DejaVu Sans"), "dejavusans");
        assert_eq!(normalize("Noto_Sans-CJK"), "notosanscjk");
    }

    #[test]
    fn style_score_prefers_exact_style_match() {
        // Requesting bold italic: a bold-oblique file must outrank both
        // the plain file and a bold-only file.
        let plain = style_score(&normalize("DejaVuSans"), true, true);
        let bold = style_score(&normalize("DejaVuSans-Bold"), true, true);
        let bold_oblique = style_score(&normalize("DejaVuSans-BoldOblique"), true, true);
        assert!(bold_oblique > bold);
        assert!(bold > plain);
    }

    #[test]
    fn style_score_penalizes_unwanted_styles() {
        // Requesting regular: the plain file must outrank the bold one.
        let plain = style_score(&normalize("DejaVuSans"), false, false);
        let bold = style_score(&normalize("DejaVuSans-Bold"), false, false);
        assert!(plain > bold);
    }

    #[test]
    fn is_font_file_accepts_common_extensions() {
        assert!(is_font_file(Path::new("/x/a.ttf")));
        assert!(is_font_file(Path::new("/x/a.TTC")));
        assert!(!is_font_file(Path::new("/x/a.txt")));
        assert!(!is_font_file(Path::new("/x/noext")));
    }

    #[test]
    fn family_lookup_declines_without_family() {
        let locator = SystemFamily::with_dirs(vec![]);
        assert!(locator.locate(&FontQuery::default()).is_none());
    }
}
