//! Sprite numeral font: each supported character is its own skin element
//! (`score-<key>`), drawn by plain left-to-right concatenation. No metrics,
//! no kerning, no fallback glyph.

use image::RgbaImage;
use log::trace;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::assets::SkinResolver;
use crate::error::GlyphError;
use crate::ui::draw;

/// Every drawable character and the element key it is stored under.
pub const NUMERIC_GLYPHS: [(char, &str); 14] = [
    ('0', "0"),
    ('1', "1"),
    ('2', "2"),
    ('3', "3"),
    ('4', "4"),
    ('5', "5"),
    ('6', "6"),
    ('7', "7"),
    ('8', "8"),
    ('9', "9"),
    ('x', "x"),
    ('.', "dot"),
    (',', "comma"),
    ('%', "percent"),
];

#[inline(always)]
pub fn glyph_element(key: &str) -> String {
    format!("score-{key}")
}

/// One pre-scaled set of numeral sprites plus a fixed inter-glyph gap.
#[derive(Debug, Clone)]
pub struct Charset {
    glyphs: FxHashMap<char, RgbaImage>,
    spacing: u32,
}

impl Charset {
    pub fn new(glyphs: FxHashMap<char, RgbaImage>, spacing: u32) -> Self {
        Self { glyphs, spacing }
    }

    /// Resolves all numeral sprites for `identity` and scales them once.
    pub fn from_skin(resolver: &SkinResolver, identity: &str, scale: f32, spacing: u32) -> Self {
        let glyphs = NUMERIC_GLYPHS
            .iter()
            .map(|&(ch, key)| {
                let sprite = resolver.resolve(identity, &glyph_element(key));
                (ch, draw::scale_image(&sprite, scale))
            })
            .collect();
        trace!("Built charset for '{identity}' at scale {scale:.4}, spacing {spacing}");
        Self::new(glyphs, spacing)
    }

    pub fn glyph(&self, ch: char) -> Result<&RgbaImage, GlyphError> {
        self.glyphs.get(&ch).ok_or(GlyphError::UnsupportedGlyph(ch))
    }

    // Card strings are at most a handful of characters.
    fn glyphs_for(&self, text: &str) -> Result<SmallVec<[&RgbaImage; 8]>, GlyphError> {
        text.chars().map(|ch| self.glyph(ch)).collect()
    }

    /// Sum of glyph widths plus one gap between each adjacent pair.
    pub fn text_width(&self, text: &str) -> Result<u32, GlyphError> {
        let glyphs = self.glyphs_for(text)?;
        let gaps = glyphs.len().saturating_sub(1) as u32;
        Ok(glyphs.iter().map(|g| g.width()).sum::<u32>() + gaps * self.spacing)
    }

    /// Draws `text` with its top-left at `(x, y)`. Every character is checked
    /// before anything touches the canvas. Returns the pen position after the
    /// last glyph.
    pub fn draw_text(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        x: i64,
        y: i64,
    ) -> Result<i64, GlyphError> {
        let glyphs = self.glyphs_for(text)?;
        let mut pen = x;
        for (i, glyph) in glyphs.into_iter().enumerate() {
            if i > 0 {
                pen += i64::from(self.spacing);
            }
            draw::paste(canvas, glyph, pen, y);
            pen += i64::from(glyph.width());
        }
        Ok(pen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// Glyph widths differ per digit so a wrong sum would show.
    fn test_charset(spacing: u32) -> Charset {
        let glyphs = NUMERIC_GLYPHS
            .iter()
            .enumerate()
            .map(|(i, &(ch, _))| (ch, RgbaImage::from_pixel(3 + i as u32, 5, Rgba([255, 255, 255, 255]))))
            .collect();
        Charset::new(glyphs, spacing)
    }

    #[test]
    fn score_width_is_glyph_sum_plus_gaps() {
        let charset = test_charset(6);
        let text = "0700000";
        let glyph_sum: u32 = text.chars().map(|c| charset.glyph(c).unwrap().width()).sum();
        assert_eq!(charset.text_width(text).unwrap(), glyph_sum + 6 * 6);
    }

    #[test]
    fn hit_set_has_no_gaps() {
        let charset = test_charset(0);
        // '9' is 12 px wide, 'x' is 13 px wide.
        assert_eq!(charset.text_width("9x").unwrap(), 25);
        assert_eq!(charset.text_width("").unwrap(), 0);
    }

    #[test]
    fn unsupported_glyph_fails_before_drawing() {
        let charset = test_charset(6);
        let mut canvas = RgbaImage::new(200, 10);
        let err = charset.draw_text(&mut canvas, "12-3", 0, 0).unwrap_err();
        assert_eq!(err, GlyphError::UnsupportedGlyph('-'));
        assert!(canvas.pixels().all(|p| p.0[3] == 0), "nothing may be drawn on failure");
        assert!(charset.text_width("98.5 %").is_err());
    }

    #[test]
    fn draw_advances_pen_by_measured_width() {
        let charset = test_charset(2);
        let mut canvas = RgbaImage::new(100, 10);
        let end = charset.draw_text(&mut canvas, "10%", 4, 1).unwrap();
        assert_eq!(end, 4 + i64::from(charset.text_width("10%").unwrap()));
        // '1' covers x = 4..8, gap at 8..10, '0' starts at 10.
        assert_eq!(canvas.get_pixel(4, 1).0[3], 255);
        assert_eq!(canvas.get_pixel(8, 1).0[3], 0);
        assert_eq!(canvas.get_pixel(10, 1).0[3], 255);
    }

    #[test]
    fn every_key_maps_to_a_score_element() {
        assert_eq!(glyph_element("percent"), "score-percent");
        let keys: Vec<_> = NUMERIC_GLYPHS.iter().map(|(_, k)| *k).collect();
        assert!(keys.contains(&"dot") && keys.contains(&"comma"));
    }
}
