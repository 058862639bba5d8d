use crate::error::ConfigError;
use ini::Ini;
use log::{LevelFilter, info, warn};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const CONFIG_PATH: &str = "scorecard.ini";

/// Thumbnail mirror used when no `ThumbnailUrls` key is configured.
pub const DEFAULT_THUMBNAIL_URL: &str = "https://b.ppy.sh/thumb/{set_id}l.jpg";

/// 256 MiB of uncompressed, recognised skin elements per archive.
pub const DEFAULT_MAX_ARCHIVE_BYTES: u64 = 256 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Error => "Error",
            Self::Warn => "Warn",
            Self::Info => "Info",
            Self::Debug => "Debug",
            Self::Trace => "Trace",
        }
    }

    pub const fn as_level_filter(&self) -> LevelFilter {
        match self {
            Self::Off => LevelFilter::Off,
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// One flat directory per identity lives under here, default skin included.
    pub skins_root: PathBuf,
    pub default_skin_identity: String,
    /// Bundled background used whenever no thumbnail source answers.
    pub default_background: PathBuf,
    pub header_font: PathBuf,
    /// URL templates; `{set_id}` is replaced with the beatmap set id.
    pub thumbnail_urls: Vec<String>,
    pub request_timeout: Duration,
    pub max_archive_bytes: u64,
    /// Sprites wider or taller than this are treated as missing.
    pub max_sprite_dimension: u32,
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        let data_root = default_data_root();
        Self {
            skins_root: data_root.join("skins"),
            default_skin_identity: "default".to_string(),
            default_background: data_root.join("bg.jpg"),
            header_font: data_root.join("font").join("Aller_Lt.ttf"),
            thumbnail_urls: vec![DEFAULT_THUMBNAIL_URL.to_string()],
            request_timeout: Duration::from_secs(10),
            max_archive_bytes: DEFAULT_MAX_ARCHIVE_BYTES,
            max_sprite_dimension: 8192,
            log_level: LogLevel::Warn,
        }
    }
}

impl Config {
    /// Directory of the fallback skin every lookup ends at.
    pub fn default_skin_dir(&self) -> PathBuf {
        self.skins_root.join(&self.default_skin_identity)
    }
}

fn default_data_root() -> PathBuf {
    directories::ProjectDirs::from("", "", "scorecard")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("assets"))
}

fn write_default_config_file(path: &Path) -> Result<(), ConfigError> {
    info!("'{}' not found, creating with default values.", path.display());
    let default = Config::default();
    let mut conf = Ini::new();
    conf.with_section(Some("Paths"))
        .set("DefaultBackground", default.default_background.to_string_lossy())
        .set("DefaultSkinIdentity", default.default_skin_identity.as_str())
        .set("HeaderFont", default.header_font.to_string_lossy())
        .set("SkinsRoot", default.skins_root.to_string_lossy());
    conf.with_section(Some("Network"))
        .set(
            "RequestTimeoutSeconds",
            default.request_timeout.as_secs().to_string(),
        )
        .set("ThumbnailUrls", default.thumbnail_urls.join(","));
    conf.with_section(Some("Limits"))
        .set("MaxArchiveBytes", default.max_archive_bytes.to_string())
        .set("MaxSpriteDimension", default.max_sprite_dimension.to_string());
    conf.with_section(Some("Options"))
        .set("LogLevel", default.log_level.as_str());
    conf.write_to_file(path)?;
    Ok(())
}

fn parse_path(conf: &Ini, section: &str, key: &str) -> Option<PathBuf> {
    conf.get_from(Some(section), key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn parse_num<T: FromStr>(conf: &Ini, section: &str, key: &str) -> Option<T> {
    conf.get_from(Some(section), key)
        .and_then(|v| v.trim().parse::<T>().ok())
}

/// Builds a config from already-parsed INI content, falling back key by key.
pub fn from_ini(conf: &Ini) -> Config {
    let default = Config::default();
    let thumbnail_urls = conf
        .get_from(Some("Network"), "ThumbnailUrls")
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|u| !u.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .unwrap_or(default.thumbnail_urls);

    Config {
        skins_root: parse_path(conf, "Paths", "SkinsRoot").unwrap_or(default.skins_root),
        default_skin_identity: conf
            .get_from(Some("Paths"), "DefaultSkinIdentity")
            .map(str::trim)
            .filter(|v| crate::assets::is_valid_identity(v))
            .map_or(default.default_skin_identity, str::to_string),
        default_background: parse_path(conf, "Paths", "DefaultBackground")
            .unwrap_or(default.default_background),
        header_font: parse_path(conf, "Paths", "HeaderFont").unwrap_or(default.header_font),
        thumbnail_urls,
        request_timeout: parse_num::<u64>(conf, "Network", "RequestTimeoutSeconds")
            .filter(|&secs| secs > 0)
            .map_or(default.request_timeout, Duration::from_secs),
        max_archive_bytes: parse_num(conf, "Limits", "MaxArchiveBytes")
            .unwrap_or(default.max_archive_bytes),
        max_sprite_dimension: parse_num::<u32>(conf, "Limits", "MaxSpriteDimension")
            .filter(|&d| d > 0)
            .unwrap_or(default.max_sprite_dimension),
        log_level: conf
            .get_from(Some("Options"), "LogLevel")
            .and_then(|v| LogLevel::from_str(v).ok())
            .unwrap_or(default.log_level),
    }
}

/// Loads `path`, writing a default file first if it does not exist.
/// Unreadable files yield the defaults with a warning.
pub fn load(path: &Path) -> Config {
    if !path.exists()
        && let Err(e) = write_default_config_file(path)
    {
        warn!("Failed to create default config file: {e}");
    }

    match Ini::load_from_file(path) {
        Ok(conf) => from_ini(&conf),
        Err(e) => {
            warn!(
                "Failed to load '{}': {}. Using defaults.",
                path.display(),
                ConfigError::from(e)
            );
            Config::default()
        }
    }
}
