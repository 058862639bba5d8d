use image::{DynamicImage, Rgba, RgbaImage, imageops};

/// Resizes by `scale`, never below 1x1.
pub fn scale_image(img: &RgbaImage, scale: f32) -> RgbaImage {
    let w = ((img.width() as f32 * scale) as u32).max(1);
    let h = ((img.height() as f32 * scale) as u32).max(1);
    if (w, h) == img.dimensions() {
        return img.clone();
    }
    imageops::resize(img, w, h, imageops::FilterType::Triangle)
}

/// Source-over of one pixel in integer math. An opaque destination stays
/// exactly opaque.
#[inline(always)]
pub fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = u32::from(src.0[3]);
    if sa == 0 {
        return;
    }
    if sa == 255 {
        *dst = src;
        return;
    }
    let inv = 255 - sa;
    let da = u32::from(dst.0[3]);
    let dst_weight = (da * inv + 127) / 255;
    let out_a = sa + dst_weight;
    for i in 0..3 {
        let num = u32::from(src.0[i]) * sa + u32::from(dst.0[i]) * dst_weight;
        dst.0[i] = ((num + out_a / 2) / out_a) as u8;
    }
    dst.0[3] = out_a as u8;
}

/// Alpha-composites `sprite` with its top-left at `(x, y)`; off-canvas parts are clipped.
pub fn paste(canvas: &mut RgbaImage, sprite: &RgbaImage, x: i64, y: i64) {
    let (cw, ch) = (i64::from(canvas.width()), i64::from(canvas.height()));
    let (sw, sh) = (i64::from(sprite.width()), i64::from(sprite.height()));
    let (x0, y0) = (x.max(0), y.max(0));
    let (x1, y1) = ((x + sw).min(cw), (y + sh).min(ch));
    for py in y0..y1 {
        for px in x0..x1 {
            let src = *sprite.get_pixel((px - x) as u32, (py - y) as u32);
            blend_over(canvas.get_pixel_mut(px as u32, py as u32), src);
        }
    }
}

/// Blends `color` over the rectangle, clipped to the canvas.
pub fn fill_rect(canvas: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    let x_end = x.saturating_add(w).min(canvas.width());
    let y_end = y.saturating_add(h).min(canvas.height());
    for py in y.min(y_end)..y_end {
        for px in x.min(x_end)..x_end {
            blend_over(canvas.get_pixel_mut(px, py), color);
        }
    }
}

/// Symmetric centre crop to `target_w:target_h`, then resize to exactly that size.
/// The result is opaque: translucent sources are flattened onto black.
pub fn cover_crop(src: &DynamicImage, target_w: u32, target_h: u32) -> RgbaImage {
    let (w, h) = (src.width().max(1), src.height().max(1));
    let src_aspect = f64::from(w) / f64::from(h);
    let target_aspect = f64::from(target_w) / f64::from(target_h);

    let (left, top, crop_w, crop_h) = if src_aspect > target_aspect {
        let new_w = ((f64::from(h) * target_aspect).round() as u32).clamp(1, w);
        ((w - new_w) / 2, 0, new_w, h)
    } else {
        let new_h = ((f64::from(w) / target_aspect).round() as u32).clamp(1, h);
        (0, (h - new_h) / 2, w, new_h)
    };

    let cropped = src.crop_imm(left, top, crop_w, crop_h).to_rgba8();
    let mut out = if cropped.dimensions() == (target_w, target_h) {
        cropped
    } else {
        imageops::resize(
            &cropped,
            target_w,
            target_h,
            imageops::FilterType::Triangle,
        )
    };
    flatten_onto_black(&mut out);
    out
}

fn flatten_onto_black(img: &mut RgbaImage) {
    for px in img.pixels_mut() {
        let [r, g, b, a] = px.0;
        if a == 255 {
            continue;
        }
        let mul = |c: u8| ((u16::from(c) * u16::from(a) + 127) / 255) as u8;
        px.0 = [mul(r), mul(g), mul(b), 255];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_never_collapses_to_zero() {
        let img = RgbaImage::new(3, 2);
        assert_eq!(scale_image(&img, 0.01).dimensions(), (1, 1));
        assert_eq!(scale_image(&img, 2.0).dimensions(), (6, 4));
        assert_eq!(scale_image(&RgbaImage::new(1536, 10), 1080.0 / 1536.0).width(), 1080);
    }

    #[test]
    fn stacked_overlays_keep_canvas_opaque() {
        let mut canvas = RgbaImage::from_pixel(2, 2, Rgba([40, 80, 160, 255]));
        fill_rect(&mut canvas, 0, 0, 2, 2, Rgba([0, 0, 0, 102]));
        fill_rect(&mut canvas, 0, 0, 2, 1, Rgba([0, 0, 0, 204]));
        assert_eq!(canvas.get_pixel(0, 1).0, [24, 48, 96, 255]);
        let [r, g, b, a] = canvas.get_pixel(0, 0).0;
        assert_eq!(a, 255);
        assert!(r.abs_diff(5) <= 1 && g.abs_diff(10) <= 1 && b.abs_diff(19) <= 1, "got {r},{g},{b}");

        let half = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 77]));
        paste(&mut canvas, &half, 0, 0);
        assert!(canvas.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn translucent_paste_onto_empty_canvas_keeps_source() {
        let mut canvas = RgbaImage::new(1, 1);
        paste(&mut canvas, &RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 128])), 0, 0);
        assert_eq!(canvas.get_pixel(0, 0).0, [200, 100, 50, 128]);
    }

    #[test]
    fn paste_clips_negative_offsets() {
        let mut canvas = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let sprite = RgbaImage::from_pixel(3, 3, Rgba([0, 255, 0, 255]));
        paste(&mut canvas, &sprite, -2, -2);
        assert_eq!(canvas.get_pixel(0, 0).0, [0, 255, 0, 255]);
        assert_eq!(canvas.get_pixel(1, 1).0, [0, 0, 0, 255]);
    }

    #[test]
    fn fill_rect_blends_and_clips() {
        let mut canvas = RgbaImage::from_pixel(4, 4, Rgba([200, 200, 200, 255]));
        fill_rect(&mut canvas, 2, 2, 10, 10, Rgba([0, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(3, 3).0, [0, 0, 0, 255]);
        assert_eq!(canvas.get_pixel(1, 1).0, [200, 200, 200, 255]);

        let mut dim = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 50, 255]));
        fill_rect(&mut dim, 0, 0, 1, 1, Rgba([0, 0, 0, 102]));
        let [r, g, b, a] = dim.get_pixel(0, 0).0;
        assert_eq!(a, 255);
        assert!((118..=122).contains(&r), "40% black should leave ~60% of 200, got {r}");
        assert!((58..=62).contains(&g));
        assert!((28..=32).contains(&b));
    }

    fn striped(w: u32, h: u32) -> DynamicImage {
        let mut img = RgbaImage::from_pixel(w, h, Rgba([0, 0, 255, 255]));
        for y in 0..h {
            for x in 0..w {
                if x < w / 4 || x >= w - w / 4 || y < h / 4 || y >= h - h / 4 {
                    img.put_pixel(x, y, Rgba([255, 0, 0, 255]));
                }
            }
        }
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn wide_source_is_cropped_left_and_right() {
        // 32x9 -> crop to 16x9 from x=8, which keeps only the top/bottom stripes red.
        let out = cover_crop(&striped(32, 9), 16, 9);
        assert_eq!(out.dimensions(), (16, 9));
        assert_eq!(out.get_pixel(0, 4).0, [0, 0, 255, 255]);
        assert_eq!(out.get_pixel(15, 4).0, [0, 0, 255, 255]);
    }

    #[test]
    fn tall_source_is_cropped_top_and_bottom() {
        // 16x36 -> crop to 16x9 from y=13, inside the blue centre band rows.
        let out = cover_crop(&striped(16, 36), 16, 9);
        assert_eq!(out.dimensions(), (16, 9));
        assert_eq!(out.get_pixel(8, 0).0, [0, 0, 255, 255]);
        assert_eq!(out.get_pixel(8, 8).0, [0, 0, 255, 255]);
        assert_eq!(out.get_pixel(0, 4).0, [255, 0, 0, 255]);
    }

    #[test]
    fn cover_crop_output_is_opaque() {
        let src = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 4, Rgba([255, 255, 255, 0])));
        let out = cover_crop(&src, 16, 9);
        assert_eq!(out.dimensions(), (16, 9));
        assert!(out.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    }
}
