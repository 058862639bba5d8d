//! Score card rendering from user-uploadable skins.

pub mod assets;
pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod skins;
pub mod ui;

pub use assets::SkinResolver;
pub use config::Config;
pub use error::{IngestError, RenderError};
pub use game::mods::Mods;
pub use game::scores::{BeatmapRecord, ScoreRecord};
pub use skins::archive::{IngestReport, SkinStore};
pub use ui::compose::{ScoreCard, ScoreCardRenderer, encode_png};
