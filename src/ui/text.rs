use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use log::{debug, warn};
use std::path::Path;

use crate::ui::draw;

/// TrueType face used for the three header lines.
pub struct HeaderFont {
    font: FontVec,
}

impl std::fmt::Debug for HeaderFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderFont")
            .field("glyphs", &self.font.glyph_count())
            .finish()
    }
}

impl HeaderFont {
    pub fn from_bytes(data: Vec<u8>) -> Option<Self> {
        match FontVec::try_from_vec(data) {
            Ok(font) => Some(Self { font }),
            Err(e) => {
                warn!("Header font rejected: {e}");
                None
            }
        }
    }

    /// `None` (with a warning) when the file is missing or not a font.
    pub fn load(path: &Path) -> Option<Self> {
        match std::fs::read(path) {
            Ok(data) => {
                let font = Self::from_bytes(data);
                if font.is_some() {
                    debug!("Loaded header font '{}'", path.display());
                }
                font
            }
            Err(e) => {
                warn!("Header font '{}' unavailable: {e}", path.display());
                None
            }
        }
    }

    /// Draws one line with its ascender line at `top`, blending `color` by coverage.
    pub fn draw_line(&self, canvas: &mut RgbaImage, text: &str, x: f32, top: f32, px: f32, color: Rgba<u8>) {
        let scale = PxScale::from(px);
        let scaled = self.font.as_scaled(scale);
        let baseline = top + scaled.ascent();
        let (cw, ch) = (canvas.width() as i32, canvas.height() as i32);

        let mut cursor = x;
        let mut prev = None;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(p) = prev {
                cursor += scaled.kern(p, id);
            }
            let glyph = id.with_scale_and_position(scale, ab_glyph::point(cursor, baseline));
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                let (gx, gy) = (bounds.min.x as i32, bounds.min.y as i32);
                outlined.draw(|dx, dy, coverage| {
                    let (px_x, px_y) = (gx + dx as i32, gy + dy as i32);
                    if px_x < 0 || px_y < 0 || px_x >= cw || px_y >= ch {
                        return;
                    }
                    let alpha = (coverage.clamp(0.0, 1.0) * f32::from(color.0[3])) as u8;
                    if alpha == 0 {
                        return;
                    }
                    let mut ink = color;
                    ink.0[3] = alpha;
                    draw::blend_over(canvas.get_pixel_mut(px_x as u32, px_y as u32), ink);
                });
            }
            cursor += scaled.h_advance(id);
            prev = Some(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(HeaderFont::load(&dir.path().join("Aller_Lt.ttf")).is_none());
    }

    #[test]
    fn non_font_bytes_are_rejected() {
        assert!(HeaderFont::from_bytes(b"definitely not truetype".to_vec()).is_none());
        assert!(HeaderFont::from_bytes(Vec::new()).is_none());
    }
}
