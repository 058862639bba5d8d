use crate::assets::{self, SkinResolver};
use crate::config::Config;
use crate::core::network::{BackgroundSource, ThumbnailMirrors};
use crate::error::RenderError;
use crate::game::judgment::{grid_cell, judge_slots};
use crate::game::scores::{BeatmapRecord, ScoreRecord};
use crate::ui::color;
use crate::ui::draw;
use crate::ui::font::Charset;
use crate::ui::layout::{self, Anchor, ElementLayout, Layout};
use crate::ui::text::HeaderFont;
use image::{DynamicImage, ImageFormat, RgbaImage};
use log::{debug, info, warn};
use std::io::Cursor;
use std::path::PathBuf;

/* ======================= RENDER RECORD ======================= */

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layer {
    /// A skin element sprite, by element name.
    Sprite(String),
    /// A numeral string drawn with a sprite charset.
    Text(String),
}

/// Where one layer landed on the finished card, in output pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub layer: Layer,
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    #[inline(always)]
    pub fn center(&self) -> (i64, i64) {
        (
            self.x + i64::from(self.width / 2),
            self.y + i64::from(self.height / 2),
        )
    }

    pub fn is_sprite(&self, element: &str) -> bool {
        matches!(&self.layer, Layer::Sprite(e) if e == element)
    }
}

/// A finished card plus the ordered list of layers drawn onto it.
#[derive(Debug, Clone)]
pub struct ScoreCard {
    pub image: RgbaImage,
    pub placements: Vec<Placement>,
}

impl ScoreCard {
    pub fn sprites(&self) -> impl Iterator<Item = &str> {
        self.placements.iter().filter_map(|p| match &p.layer {
            Layer::Sprite(e) => Some(e.as_str()),
            Layer::Text(_) => None,
        })
    }
}

/* ======================= COMPOSITOR ======================= */

/// Turns a score and beatmap into a card image.
///
/// Holds no per-render state, so one renderer can serve concurrent renders.
pub struct ScoreCardRenderer {
    resolver: SkinResolver,
    layout: Layout,
    default_background: PathBuf,
    max_dimension: u32,
    font: Option<HeaderFont>,
    background: Box<dyn BackgroundSource>,
}

impl std::fmt::Debug for ScoreCardRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreCardRenderer")
            .field("resolver", &self.resolver)
            .field("layout", &self.layout)
            .field("default_background", &self.default_background)
            .field("font", &self.font)
            .finish_non_exhaustive()
    }
}

struct Frame<'a> {
    canvas: RgbaImage,
    placements: Vec<Placement>,
    identity: &'a str,
}

impl ScoreCardRenderer {
    pub fn new(config: &Config, background: Box<dyn BackgroundSource>) -> Self {
        Self {
            resolver: SkinResolver::new(config),
            layout: Layout::default(),
            default_background: config.default_background.clone(),
            max_dimension: config.max_sprite_dimension,
            font: HeaderFont::load(&config.header_font),
            background,
        }
    }

    /// Renderer using the configured thumbnail mirrors.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config, Box::new(ThumbnailMirrors::from_config(config)))
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_font(mut self, font: Option<HeaderFont>) -> Self {
        self.font = font;
        self
    }

    #[inline(always)]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    #[inline(always)]
    pub const fn resolver(&self) -> &SkinResolver {
        &self.resolver
    }

    fn acquire_background(&self, beatmap: &BeatmapRecord) -> Result<DynamicImage, RenderError> {
        if let Some(bytes) = self.background.fetch(beatmap) {
            match assets::decode_image_limited(&bytes, self.max_dimension) {
                Ok(img) => return Ok(img),
                Err(e) => warn!("Background for set {} did not decode: {e}", beatmap.set_id),
            }
        }

        info!(
            "Using bundled background '{}' for set {}",
            self.default_background.display(),
            beatmap.set_id
        );
        assets::open_image_limited(&self.default_background, self.max_dimension).map_err(|e| {
            RenderError::RenderFailed(format!(
                "default background '{}': {e}",
                self.default_background.display()
            ))
        })
    }

    /// Renders the card. Only fails when no background at all can be
    /// decoded, or on a character the numeral sprites cannot draw.
    pub fn render(
        &self,
        score: &ScoreRecord,
        beatmap: &BeatmapRecord,
        display_name: &str,
        identity: &str,
    ) -> Result<RgbaImage, RenderError> {
        self.compose(score, beatmap, display_name, identity)
            .map(|card| card.image)
    }

    /// Like [`render`](Self::render), also returning where each layer was drawn.
    pub fn compose(
        &self,
        score: &ScoreRecord,
        beatmap: &BeatmapRecord,
        display_name: &str,
        identity: &str,
    ) -> Result<ScoreCard, RenderError> {
        let l = self.layout;
        let (width, height) = (l.width(), l.height());

        let background = self.acquire_background(beatmap)?;
        let mut frame = Frame {
            canvas: draw::cover_crop(&background, width, height),
            placements: Vec::with_capacity(32),
            identity,
        };
        drop(background);

        draw::fill_rect(&mut frame.canvas, 0, 0, width, height, color::BACKGROUND_DIM);
        draw::fill_rect(
            &mut frame.canvas,
            0,
            0,
            width,
            l.header_bottom() + 1,
            color::HEADER_BAND,
        );
        self.draw_header(&mut frame.canvas, score, beatmap, display_name);

        let score_chars = Charset::from_skin(
            &self.resolver,
            identity,
            l.scale(layout::SCORE_CHARSET_DIVISOR),
            l.spacing(layout::SCORE_SPACING),
        );
        let hit_chars = Charset::from_skin(
            &self.resolver,
            identity,
            l.scale(layout::HIT_CHARSET_DIVISOR),
            l.spacing(layout::HIT_SPACING),
        );

        let score_text = score.score_text();
        let acc_text = score.accuracy_text();
        let combo_text = score.max_combo_text();
        for text in [&score_text, &acc_text, &combo_text] {
            score_chars.text_width(text)?;
        }

        self.place_element(&mut frame, &layout::PANEL);

        for (index, slot) in judge_slots(score.game_mode()).iter().enumerate() {
            let Some(slot) = slot else {
                continue;
            };
            let (col, row) = grid_cell(index);
            let (cx, cy) = l.judge_cell(col, row);
            self.place_sprite(
                &mut frame,
                slot.element,
                (cx, cy),
                Anchor::Center,
                layout::JUDGE_SCALE_DIVISOR,
            );
            let (ox, oy) = layout::HIT_TEXT_OFFSET;
            let count = format!("{}x", slot.stat.count(score));
            place_text(&mut frame, &hit_chars, &count, cx + l.px(ox), cy + l.px(oy))?;
        }

        self.place_sprite(
            &mut frame,
            &format!("ranking-{}", score.grade),
            l.point(layout::GRADE_X, layout::GRADE_Y),
            Anchor::Center,
            layout::GRADE_SCALE_DIVISOR,
        );
        self.place_element(&mut frame, &layout::GRAPH);
        if score.perfect {
            self.place_element(&mut frame, &layout::PERFECT);
        }
        self.place_element(&mut frame, &layout::TITLE);

        let zero_height = i64::from(score_chars.glyph('0')?.height());
        place_text(
            &mut frame,
            &score_chars,
            &score_text,
            l.px(layout::SCORE_X),
            l.px(layout::SCORE_Y) - zero_height / 2,
        )?;

        let (sx, sy) = layout::STAT_TEXT_OFFSET;
        for (icon, text) in [(&layout::ACCURACY, &acc_text), (&layout::MAX_COMBO, &combo_text)] {
            self.place_element(&mut frame, icon);
            let (tx, ty) = l.point(icon.x + sx, icon.y + sy);
            place_text(&mut frame, &hit_chars, text, tx, ty)?;
        }

        for (index, flag) in score.mod_set().flags().enumerate() {
            match flag.icon_name() {
                Ok(element) => self.place_sprite(
                    &mut frame,
                    &element,
                    l.mods_slot(index),
                    Anchor::Center,
                    layout::MODS_SCALE_DIVISOR,
                ),
                Err(e) => warn!("Skipping mod icon: {e}"),
            }
        }

        debug!(
            "Composed card for '{display_name}' with skin '{identity}': {} layers",
            frame.placements.len()
        );
        Ok(ScoreCard {
            image: frame.canvas,
            placements: frame.placements,
        })
    }

    fn draw_header(&self, canvas: &mut RgbaImage, score: &ScoreRecord, beatmap: &BeatmapRecord, display_name: &str) {
        let Some(font) = &self.font else {
            warn!("No header font loaded; card header left without text");
            return;
        };
        let l = &self.layout;
        let x = l.px(layout::HEADER_TEXT_X) as f32;
        let [top1, top2, top3] = l.header_line_tops();
        let lines = [
            (beatmap.full_title(), top1, l.title_font_px()),
            (format!("Beatmap by {}", beatmap.creator), top2, l.small_font_px()),
            (
                format!("Played by {display_name} on {}.", score.played_at_text()),
                top3,
                l.small_font_px(),
            ),
        ];
        for (text, top, size) in &lines {
            font.draw_line(canvas, text, x, *top, *size, color::HEADER_TEXT);
        }
    }

    fn place_element(&self, frame: &mut Frame<'_>, el: &ElementLayout) {
        let point = self.layout.point(el.x, el.y);
        self.place_sprite(frame, el.element, point, el.anchor, el.scale_divisor);
    }

    fn place_sprite(
        &self,
        frame: &mut Frame<'_>,
        element: &str,
        point: (i64, i64),
        anchor: Anchor,
        scale_divisor: f32,
    ) {
        let sprite = self.resolver.resolve(frame.identity, element);
        let sprite = draw::scale_image(&sprite, self.layout.scale(scale_divisor));
        let (x, y) = layout::anchor_origin(point, anchor, sprite.dimensions());
        draw::paste(&mut frame.canvas, &sprite, x, y);
        frame.placements.push(Placement {
            layer: Layer::Sprite(element.to_string()),
            x,
            y,
            width: sprite.width(),
            height: sprite.height(),
        });
    }
}

fn place_text(frame: &mut Frame<'_>, charset: &Charset, text: &str, x: i64, y: i64) -> Result<(), RenderError> {
    let end = charset.draw_text(&mut frame.canvas, text, x, y)?;
    let height = charset.glyph('0').map(|g| g.height()).unwrap_or(0);
    frame.placements.push(Placement {
        layer: Layer::Text(text.to_string()),
        x,
        y,
        width: (end - x).max(0) as u32,
        height,
    });
    Ok(())
}

/// Opaque RGB PNG of a finished card.
pub fn encode_png(card: &RgbaImage) -> Result<Vec<u8>, RenderError> {
    let rgb = DynamicImage::ImageRgba8(card.clone()).into_rgb8();
    let mut out = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .map_err(|e| RenderError::RenderFailed(format!("png encode: {e}")))?;
    Ok(out)
}
