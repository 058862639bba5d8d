use crate::config::Config;
use crate::skins::elements::HIDPI_SUFFIX;
use image::{DynamicImage, ImageFormat, ImageReader, Limits, RgbaImage, imageops};
use log::{trace, warn};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Longest accepted identity, in characters.
pub const MAX_IDENTITY_CHARS: usize = 64;

/// Identities become directory names, so they must be one plain path
/// component. Anything else a player name can hold is accepted.
pub fn is_valid_identity(identity: &str) -> bool {
    !identity.is_empty()
        && identity.chars().count() <= MAX_IDENTITY_CHARS
        && identity != "."
        && identity != ".."
        && !identity
            .chars()
            .any(|c| matches!(c, '/' | '\\') || c.is_control())
}

/// Element names are fixed ASCII keys like `ranking-S` or `score-dot`.
fn is_valid_element(element: &str) -> bool {
    !element.is_empty()
        && element.len() <= 64
        && !element.starts_with('.')
        && element
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'-'))
}

fn decode_limits(max_dimension: u32) -> Limits {
    let mut limits = Limits::default();
    limits.max_image_width = Some(max_dimension);
    limits.max_image_height = Some(max_dimension);
    limits
}

/// Opens an image, trusting the extension first and sniffing the content
/// if that fails.
pub(crate) fn open_image_limited(
    path: &Path,
    max_dimension: u32,
) -> image::ImageResult<DynamicImage> {
    if let Ok(fmt) = ImageFormat::from_path(path) {
        let mut reader = ImageReader::open(path).map_err(image::ImageError::IoError)?;
        reader.set_format(fmt);
        reader.limits(decode_limits(max_dimension));
        if let Ok(img) = reader.decode() {
            return Ok(img);
        }
    }

    let mut guessed = ImageReader::open(path)
        .map_err(image::ImageError::IoError)?
        .with_guessed_format()?;
    guessed.limits(decode_limits(max_dimension));
    guessed.decode()
}

/// Decodes an in-memory image of sniffed format under the same limits.
pub(crate) fn decode_image_limited(bytes: &[u8], max_dimension: u32) -> image::ImageResult<DynamicImage> {
    let mut reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    reader.limits(decode_limits(max_dimension));
    reader.decode()
}

/// Resolves skin element sprites for an identity, falling back to the
/// default skin and finally to a transparent pixel.
///
/// Every sprite returned is in the 2x frame: `@2x` files at native size,
/// plain files doubled.
#[derive(Debug, Clone)]
pub struct SkinResolver {
    skins_root: PathBuf,
    default_identity: String,
    max_dimension: u32,
}

impl SkinResolver {
    pub fn new(config: &Config) -> Self {
        Self {
            skins_root: config.skins_root.clone(),
            default_identity: config.default_skin_identity.clone(),
            max_dimension: config.max_sprite_dimension,
        }
    }

    pub fn identity_dir(&self, identity: &str) -> Option<PathBuf> {
        is_valid_identity(identity).then(|| self.skins_root.join(identity))
    }

    fn load_from_dir(&self, dir: &Path, element: &str) -> Option<RgbaImage> {
        let hidpi = dir.join(format!("{element}{HIDPI_SUFFIX}.png"));
        match open_image_limited(&hidpi, self.max_dimension) {
            Ok(img) => return Some(img.to_rgba8()),
            Err(e) => trace!("Skin tier miss '{}': {e}", hidpi.display()),
        }

        let plain = dir.join(format!("{element}.png"));
        match open_image_limited(&plain, self.max_dimension) {
            Ok(img) => Some(double_size(&img.to_rgba8())),
            Err(e) => {
                trace!("Skin tier miss '{}': {e}", plain.display());
                None
            }
        }
    }

    /// Never fails; missing elements come back as a 1x1 transparent pixel.
    pub fn resolve(&self, identity: &str, element: &str) -> RgbaImage {
        if !is_valid_element(element) {
            warn!("Refusing to resolve malformed element name '{element}'");
            return blank_sprite();
        }

        if identity != self.default_identity {
            match self.identity_dir(identity) {
                Some(dir) => {
                    if let Some(img) = self.load_from_dir(&dir, element) {
                        return img;
                    }
                }
                None => warn!("Ignoring invalid skin identity '{identity}'"),
            }
        }

        let default_dir = self.skins_root.join(&self.default_identity);
        if let Some(img) = self.load_from_dir(&default_dir, element) {
            return img;
        }

        trace!("Skin element '{element}' missing everywhere; using blank");
        blank_sprite()
    }
}

#[inline(always)]
pub fn blank_sprite() -> RgbaImage {
    RgbaImage::new(1, 1)
}

/// Exact pixel doubling of a 1x sprite into the 2x frame.
pub fn double_size(img: &RgbaImage) -> RgbaImage {
    imageops::resize(
        img,
        img.width() * 2,
        img.height() * 2,
        imageops::FilterType::Nearest,
    )
}
