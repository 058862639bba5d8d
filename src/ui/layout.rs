//! Reference-resolution layout of the score card.
//!
//! Every anchor below is in 1920x1080 pixels. Every scale is stored as a
//! divisor `d`, so a sprite in the 2x frame is drawn at `height / d`.
//! [`Layout`] multiplies positions by `height / 1080`.

pub const REFERENCE_WIDTH: u32 = 1920;
pub const REFERENCE_HEIGHT: u32 = 1080;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// `(x, y)` is the sprite's top-left corner.
    TopLeft,
    /// The sprite's bounding box is centred on `(x, y)`.
    Center,
    /// `x` is the sprite's right edge, `y` its top.
    TopRight,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementLayout {
    pub element: &'static str,
    pub x: i32,
    pub y: i32,
    pub anchor: Anchor,
    pub scale_divisor: f32,
}

const fn at(element: &'static str, x: i32, y: i32, anchor: Anchor, scale_divisor: f32) -> ElementLayout {
    ElementLayout {
        element,
        x,
        y,
        anchor,
        scale_divisor,
    }
}

/* ======================= Header ======================= */

/// Last row covered by the header band (inclusive); the top eighth less one.
pub const HEADER_BOTTOM: i32 = 134;
pub const HEADER_TEXT_X: i32 = 8;
pub const HEADER_LINE_GAP: i32 = 3;
/// Header font sizes as `height / d`.
pub const TITLE_FONT_DIVISOR: f32 = 26.0;
pub const SMALL_FONT_DIVISOR: f32 = 36.0;

/* ======================= Sprites ======================= */

pub const PANEL: ElementLayout = at("ranking-panel", 0, 144, Anchor::TopLeft, 1536.0);
pub const GRAPH: ElementLayout = at("ranking-graph", 360, 855, Anchor::TopLeft, 1532.0);
pub const PERFECT: ElementLayout = at("ranking-perfect", 585, 967, Anchor::Center, 1532.0);
pub const TITLE: ElementLayout = at("ranking-title", 1875, 0, Anchor::TopRight, 1532.0);
pub const ACCURACY: ElementLayout = at("ranking-accuracy", 409, 675, Anchor::TopLeft, 1532.0);
pub const MAX_COMBO: ElementLayout = at("ranking-maxcombo", 11, 675, Anchor::TopLeft, 1532.0);

/// Grade badge; the element is `ranking-<grade>`, chosen per score.
pub const GRADE_X: i32 = 1650;
pub const GRADE_Y: i32 = 450;
pub const GRADE_SCALE_DIVISOR: f32 = 1536.0;

/* ======================= Judgements ======================= */

pub const JUDGE_COLS: [i32; 2] = [90, 540];
pub const JUDGE_ROWS: [i32; 3] = [360, 495, 630];
pub const JUDGE_SCALE_DIVISOR: f32 = 3072.0;
/// Count text position relative to the judgement icon's centre.
pub const HIT_TEXT_OFFSET: (i32, i32) = (90, -35);

/* ======================= Numerals ======================= */

pub const SCORE_CHARSET_DIVISOR: f32 = 1175.0;
pub const HIT_CHARSET_DIVISOR: f32 = 1375.0;
pub const SCORE_SPACING: i32 = 6;
pub const HIT_SPACING: i32 = 0;

/// Score text starts here; `y` is the vertical centre of a `0` glyph.
pub const SCORE_X: i32 = 278;
pub const SCORE_Y: i32 = 210;

/// Stat text position relative to its icon's top-left.
pub const STAT_TEXT_OFFSET: (i32, i32) = (21, 67);

/* ======================= Mods strip ======================= */

/// First icon is centred here; each following icon moves left by `MODS_SPACING`.
pub const MODS_X: i32 = 1830;
pub const MODS_Y: i32 = 588;
pub const MODS_SPACING: i32 = 45;
pub const MODS_SCALE_DIVISOR: f32 = 1532.0;

/// Top-left paste position for a sprite of `size` anchored at an output-space point.
pub fn anchor_origin(point: (i64, i64), anchor: Anchor, size: (u32, u32)) -> (i64, i64) {
    let (ax, ay) = point;
    let (w, h) = (i64::from(size.0), i64::from(size.1));
    match anchor {
        Anchor::TopLeft => (ax, ay),
        Anchor::Center => (ax - w / 2, ay - h / 2),
        Anchor::TopRight => (ax - w, ay),
    }
}

/// Reference layout scaled to a concrete output height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    height: u32,
    ratio: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self::for_height(REFERENCE_HEIGHT)
    }
}

impl Layout {
    pub fn for_height(height: u32) -> Self {
        let height = height.max(1);
        Self {
            height,
            ratio: f64::from(height) / f64::from(REFERENCE_HEIGHT),
        }
    }

    #[inline(always)]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Output width at the reference 16:9 aspect.
    pub fn width(&self) -> u32 {
        ((u64::from(self.height) * u64::from(REFERENCE_WIDTH)) / u64::from(REFERENCE_HEIGHT)) as u32
    }

    /// Scales one reference length.
    #[inline(always)]
    pub fn px(&self, reference: i32) -> i64 {
        (f64::from(reference) * self.ratio).round() as i64
    }

    #[inline(always)]
    pub fn point(&self, x: i32, y: i32) -> (i64, i64) {
        (self.px(x), self.px(y))
    }

    /// Sprite scale for a reference divisor at this height.
    #[inline(always)]
    pub fn scale(&self, divisor: f32) -> f32 {
        self.height as f32 / divisor
    }

    /// Centre of judgement grid cell `(col, row)`.
    pub fn judge_cell(&self, col: usize, row: usize) -> (i64, i64) {
        self.point(JUDGE_COLS[col], JUDGE_ROWS[row])
    }

    /// Centre of the `index`-th icon in the mods strip.
    pub fn mods_slot(&self, index: usize) -> (i64, i64) {
        let x = self.px(MODS_X) - self.px(MODS_SPACING) * index as i64;
        (x, self.px(MODS_Y))
    }

    /// Last header row, inclusive.
    pub fn header_bottom(&self) -> u32 {
        self.px(HEADER_BOTTOM).max(0) as u32
    }

    pub fn title_font_px(&self) -> f32 {
        self.height as f32 / TITLE_FONT_DIVISOR
    }

    pub fn small_font_px(&self) -> f32 {
        self.height as f32 / SMALL_FONT_DIVISOR
    }

    /// Top of each of the three header lines.
    pub fn header_line_tops(&self) -> [f32; 3] {
        let gap = self.px(HEADER_LINE_GAP) as f32;
        let title = self.title_font_px();
        let small = self.small_font_px();
        [0.0, title + gap, title + small + gap * 2.0]
    }

    pub fn spacing(&self, reference: i32) -> u32 {
        self.px(reference).max(0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_height_is_identity() {
        let layout = Layout::default();
        assert_eq!(layout.width(), 1920);
        assert_eq!(layout.point(SCORE_X, SCORE_Y), (278, 210));
        assert_eq!(layout.header_bottom(), 134);
        assert_eq!(layout.spacing(SCORE_SPACING), 6);
        assert!((layout.scale(PANEL.scale_divisor) - 1080.0 / 1536.0).abs() < 1e-6);
    }

    #[test]
    fn positions_scale_linearly_with_height() {
        let half = Layout::for_height(540);
        assert_eq!(half.width(), 960);
        assert_eq!(half.point(GRADE_X, GRADE_Y), (825, 225));
        assert_eq!(half.judge_cell(1, 2), (270, 315));
        assert!((half.scale(JUDGE_SCALE_DIVISOR) - 540.0 / 3072.0).abs() < 1e-6);
    }

    #[test]
    fn anchors_place_sprite_bounds() {
        let layout = Layout::default();
        assert_eq!(anchor_origin((100, 100), Anchor::TopLeft, (40, 20)), (100, 100));
        assert_eq!(anchor_origin((100, 100), Anchor::Center, (40, 20)), (80, 90));
        assert_eq!(anchor_origin(layout.point(TITLE.x, TITLE.y), TITLE.anchor, (300, 50)), (1575, 0));
    }

    #[test]
    fn mods_strip_walks_left() {
        let layout = Layout::default();
        assert_eq!(layout.mods_slot(0), (1830, 588));
        assert_eq!(layout.mods_slot(1), (1785, 588));
        assert_eq!(layout.mods_slot(3), (1695, 588));
    }

    #[test]
    fn header_lines_stack_inside_band() {
        let layout = Layout::default();
        let [a, b, c] = layout.header_line_tops();
        assert_eq!(a, 0.0);
        assert!(b > a && c > b);
        assert!(c + layout.small_font_px() <= layout.header_bottom() as f32 + 1.0);
    }
}
