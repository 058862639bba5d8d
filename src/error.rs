use thiserror::Error;

/// Failure of a single skin archive ingestion.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("corrupt skin archive: {0}")]
    CorruptArchive(String),

    #[error("skin archive exceeds {limit} uncompressed bytes of skin elements")]
    ArchiveTooLarge { limit: u64 },

    #[error("skin archive contains no recognised skin elements")]
    NoValidElements,

    #[error("invalid skin identity '{0}'")]
    InvalidIdentity(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for IngestError {
    fn from(e: zip::result::ZipError) -> Self {
        match e {
            zip::result::ZipError::Io(io) => IngestError::CorruptArchive(io.to_string()),
            other => IngestError::CorruptArchive(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlyphError {
    #[error("no glyph for character {0:?}")]
    UnsupportedGlyph(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModsError {
    #[error("icon names exist only for single mods (got bits {0:#x})")]
    NotSingleFlag(u32),
}

/// Terminal failure of a score card render.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no glyph for character {0:?}")]
    UnsupportedGlyph(char),

    #[error("render failed: {0}")]
    RenderFailed(String),
}

impl From<GlyphError> for RenderError {
    fn from(e: GlyphError) -> Self {
        match e {
            GlyphError::UnsupportedGlyph(c) => RenderError::UnsupportedGlyph(c),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(String),
}

impl From<ini::Error> for ConfigError {
    fn from(e: ini::Error) -> Self {
        match e {
            ini::Error::Io(io) => ConfigError::Io(io),
            ini::Error::Parse(p) => ConfigError::Parse(p.to_string()),
        }
    }
}
