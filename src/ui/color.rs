use image::Rgba;

/// Whole-card dim: black at 40%.
pub const BACKGROUND_DIM: Rgba<u8> = Rgba([0, 0, 0, 102]);

/// Header band: black at 80%.
pub const HEADER_BAND: Rgba<u8> = Rgba([0, 0, 0, 204]);

pub const HEADER_TEXT: Rgba<u8> = Rgba([255, 255, 255, 255]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_alphas_match_card_design() {
        assert_eq!((f32::from(BACKGROUND_DIM.0[3]) / 255.0 * 100.0).round(), 40.0);
        assert_eq!((f32::from(HEADER_BAND.0[3]) / 255.0 * 100.0).round(), 80.0);
    }
}
