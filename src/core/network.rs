use crate::config::Config;
use crate::game::scores::BeatmapRecord;
use log::{debug, warn};
use std::time::Duration;

/// Thumbnails larger than this are treated as a failed source.
const MAX_THUMBNAIL_BYTES: u64 = 32 * 1024 * 1024;

/// Builds the ureq Agent used for every outgoing request; nothing blocks
/// longer than `timeout`.
pub fn get_agent(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build()
        .into()
}

/// Somewhere a card background can come from, keyed by the beatmap.
pub trait BackgroundSource: Send + Sync {
    /// Raw encoded image bytes, or `None` if this source has nothing.
    fn fetch(&self, beatmap: &BeatmapRecord) -> Option<Vec<u8>>;
}

/// No remote sources; every render uses the bundled background.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl BackgroundSource for Offline {
    fn fetch(&self, _beatmap: &BeatmapRecord) -> Option<Vec<u8>> {
        None
    }
}

#[inline(always)]
pub fn thumbnail_url(template: &str, set_id: u64) -> String {
    template.replace("{set_id}", &set_id.to_string())
}

/// Beatmap thumbnail mirrors tried in order; the first 200 wins.
#[derive(Debug, Clone)]
pub struct ThumbnailMirrors {
    templates: Vec<String>,
    agent: ureq::Agent,
}

impl ThumbnailMirrors {
    pub fn new(templates: Vec<String>, timeout: Duration) -> Self {
        Self {
            templates,
            agent: get_agent(timeout),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.thumbnail_urls.clone(), config.request_timeout)
    }

    fn fetch_one(&self, url: &str) -> Option<Vec<u8>> {
        match self.agent.get(url).call() {
            Ok(resp) if resp.status() == 200 => {
                match resp
                    .into_body()
                    .with_config()
                    .limit(MAX_THUMBNAIL_BYTES)
                    .read_to_vec()
                {
                    Ok(bytes) => Some(bytes),
                    Err(e) => {
                        warn!("Failed to read thumbnail body from {url}: {e}");
                        None
                    }
                }
            }
            Ok(resp) => {
                warn!("Thumbnail source {url} answered {}", resp.status());
                None
            }
            Err(e) => {
                warn!("HTTP error fetching thumbnail {url}: {e}");
                None
            }
        }
    }
}

impl BackgroundSource for ThumbnailMirrors {
    fn fetch(&self, beatmap: &BeatmapRecord) -> Option<Vec<u8>> {
        self.templates.iter().find_map(|template| {
            let url = thumbnail_url(template, beatmap.set_id);
            debug!("Requesting background {url}");
            self.fetch_one(&url)
        })
    }
}
