mod cli;

use clap::Parser;
use cli::{Args, Command};
use scorecard::core::tasks;
use scorecard::{BeatmapRecord, Config, ScoreCardRenderer, ScoreRecord, SkinStore, config, encode_png};
use std::path::Path;
use std::sync::Arc;

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let data = std::fs::read(path).map_err(|e| format!("reading '{}': {e}", path.display()))?;
    Ok(serde_json::from_slice(&data).map_err(|e| format!("parsing '{}': {e}", path.display()))?)
}

fn run(args: Args, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread().build()?;

    match args.command {
        Command::Render {
            score,
            beatmap,
            player,
            skin,
            out,
        } => {
            let score: ScoreRecord = read_json(&score)?;
            let beatmap: BeatmapRecord = read_json(&beatmap)?;
            let identity = skin.unwrap_or_else(|| config.default_skin_identity.clone());
            let renderer = Arc::new(ScoreCardRenderer::from_config(&config));

            let card = runtime.block_on(tasks::render_in_background(
                renderer, score, beatmap, player, identity,
            ))?;
            std::fs::write(&out, encode_png(&card)?)?;
            log::info!("Wrote '{}'", out.display());
        }
        Command::Ingest { identity, archive } => {
            let bytes = std::fs::read(&archive)?;
            let store = Arc::new(SkinStore::new(&config));
            let report = runtime.block_on(tasks::ingest_in_background(store, identity.clone(), bytes))?;
            println!(
                "Installed {} skin elements for '{identity}' ({} entries skipped)",
                report.extracted, report.skipped
            );
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install logger immediately, then set runtime max level from config after loading it.
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .try_init();
    // Startup default when config is missing or malformed.
    log::set_max_level(log::LevelFilter::Warn);

    let args = Args::parse();
    let config = config::load(&args.config);
    log::set_max_level(config.log_level.as_level_filter());
    run(args, config)
}
