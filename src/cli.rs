use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "scorecard")]
#[command(about = "Render rhythm-game score cards and manage skins", version)]
pub struct Args {
    /// Config file (created with defaults if missing)
    #[arg(long, value_name = "FILE", env = "SCORECARD_CONFIG", default_value = scorecard::config::CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render a score card to a PNG file
    Render {
        /// Score record (JSON)
        #[arg(long, value_name = "FILE")]
        score: PathBuf,
        /// Beatmap record (JSON)
        #[arg(long, value_name = "FILE")]
        beatmap: PathBuf,
        /// Name shown in the header
        #[arg(long)]
        player: String,
        /// Skin identity to prefer (defaults to the default skin)
        #[arg(long)]
        skin: Option<String>,
        /// Output PNG path
        #[arg(short, long, default_value = "card.png")]
        out: PathBuf,
    },
    /// Replace an identity's skin with the elements of a ZIP/OSK archive
    Ingest {
        /// Identity whose skin is replaced
        #[arg(long)]
        identity: String,
        /// Archive file
        archive: PathBuf,
    },
}
