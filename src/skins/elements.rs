use crate::game::judgment;
use crate::game::mods::Mods;
use crate::ui::font::NUMERIC_GLYPHS;
use rustc_hash::FxHashSet;
use std::sync::LazyLock;

/// Suffix marking a sprite authored at twice the reference resolution.
pub const HIDPI_SUFFIX: &str = "@2x";

/// Grade letters with a `ranking-<grade>` badge.
pub const GRADES: [&str; 8] = ["XH", "X", "SH", "S", "A", "B", "C", "D"];

pub const RANKING_ELEMENTS: [&str; 6] = [
    "ranking-panel",
    "ranking-graph",
    "ranking-title",
    "ranking-perfect",
    "ranking-accuracy",
    "ranking-maxcombo",
];

static KNOWN_ELEMENTS: LazyLock<FxHashSet<String>> = LazyLock::new(|| {
    let mut set = FxHashSet::default();
    set.extend(RANKING_ELEMENTS.iter().map(|e| e.to_string()));
    set.extend(GRADES.iter().map(|g| format!("ranking-{g}")));
    set.extend(NUMERIC_GLYPHS.iter().map(|(_, key)| format!("score-{key}")));
    set.extend(Mods::all().icon_names());
    set.extend(judgement_element_names());
    set
});

fn judgement_element_names() -> impl Iterator<Item = String> {
    judgment::judgement_elements().map(str::to_string)
}

#[inline(always)]
pub fn is_known_element(name: &str) -> bool {
    KNOWN_ELEMENTS.contains(name)
}

/// On-disk name for an archive file that holds a skin element, or `None`.
///
/// Only PNGs count, with the extension in any case. The result is always
/// `<element>.png` or `<element>@2x.png`, the two names a resolver opens.
pub fn skin_file_name(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if !ext.eq_ignore_ascii_case("png") {
        return None;
    }
    let (element, suffix) = match stem.strip_suffix(HIDPI_SUFFIX) {
        Some(element) => (element, HIDPI_SUFFIX),
        None => (stem, ""),
    };
    is_known_element(element).then(|| format!("{element}{suffix}.png"))
}

/// Basename of an archive-internal path, with `/` and `\` both treated as
/// separators. `None` for names that cannot be a plain file in one directory.
pub fn flatten_entry_name(raw: &str) -> Option<&str> {
    let base = raw.rsplit(['/', '\\']).next()?;
    match base {
        "" | "." | ".." => None,
        b if b.contains('\0') || b.contains(':') => None,
        b => Some(b),
    }
}
