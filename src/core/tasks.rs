//! Moves CPU- and disk-bound work off the caller's async loop.

use crate::error::{IngestError, RenderError};
use crate::game::scores::{BeatmapRecord, ScoreRecord};
use crate::skins::archive::{IngestReport, SkinStore};
use crate::ui::compose::ScoreCardRenderer;
use image::RgbaImage;
use log::warn;
use std::sync::Arc;

/// Renders on tokio's blocking pool. A panicking render becomes `RenderFailed`.
pub async fn render_in_background(
    renderer: Arc<ScoreCardRenderer>,
    score: ScoreRecord,
    beatmap: BeatmapRecord,
    display_name: String,
    identity: String,
) -> Result<RgbaImage, RenderError> {
    tokio::task::spawn_blocking(move || renderer.render(&score, &beatmap, &display_name, &identity))
        .await
        .unwrap_or_else(|e| {
            warn!("Render task did not complete: {e}");
            Err(RenderError::RenderFailed(format!("render task: {e}")))
        })
}

/// Ingests on tokio's blocking pool. Same-identity uploads still serialise
/// inside the store.
pub async fn ingest_in_background(
    store: Arc<SkinStore>,
    identity: String,
    archive: Vec<u8>,
) -> Result<IngestReport, IngestError> {
    tokio::task::spawn_blocking(move || store.ingest(&identity, &archive))
        .await
        .unwrap_or_else(|e| {
            warn!("Ingest task did not complete: {e}");
            Err(IngestError::Io(std::io::Error::other(format!("ingest task: {e}"))))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::network::Offline;
    use crate::game::mods::Mods;
    use crate::game::scores::fixtures;
    use crate::ui::compose::tests::default_skin_config;
    use std::io::{Cursor, Write};

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
    }

    #[test]
    fn renders_off_thread() {
        let root = tempfile::tempdir().unwrap();
        let config = default_skin_config(root.path());
        let renderer = Arc::new(ScoreCardRenderer::new(&config, Box::new(Offline)));

        let card = runtime()
            .block_on(render_in_background(
                renderer,
                fixtures::score(2, Mods::EASY),
                fixtures::beatmap(),
                "p".to_string(),
                "nobody".to_string(),
            ))
            .unwrap();
        assert_eq!(card.dimensions(), (1920, 1080));
    }

    #[test]
    fn concurrent_renders_share_one_renderer() {
        let root = tempfile::tempdir().unwrap();
        let config = default_skin_config(root.path());
        let renderer = Arc::new(ScoreCardRenderer::new(&config, Box::new(Offline)));

        let results = runtime().block_on(async {
            let a = render_in_background(
                Arc::clone(&renderer),
                fixtures::score(0, Mods::empty()),
                fixtures::beatmap(),
                "a".to_string(),
                "nobody".to_string(),
            );
            let b = render_in_background(
                Arc::clone(&renderer),
                fixtures::score(3, Mods::NIGHTCORE | Mods::DOUBLETIME),
                fixtures::beatmap(),
                "b".to_string(),
                "nobody".to_string(),
            );
            (a.await, b.await)
        });
        assert!(results.0.is_ok() && results.1.is_ok());
    }

    #[test]
    fn ingests_off_thread() {
        let root = tempfile::tempdir().unwrap();
        let config = crate::config::Config {
            skins_root: root.path().to_path_buf(),
            ..crate::config::Config::default()
        };
        let store = Arc::new(SkinStore::new(&config));

        let mut w = zip::ZipWriter::new(Cursor::new(Vec::new()));
        w.start_file("ranking-XH@2x.png", zip::write::SimpleFileOptions::default())
            .unwrap();
        w.write_all(b"badge").unwrap();
        let archive = w.finish().unwrap().into_inner();

        let report = runtime()
            .block_on(ingest_in_background(store, "alice".to_string(), archive))
            .unwrap();
        assert_eq!(report.extracted, 1);
        assert!(root.path().join("alice/ranking-XH@2x.png").exists());
    }
}
