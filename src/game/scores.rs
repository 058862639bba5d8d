use crate::game::judgment::GameMode;
use crate::game::mods::Mods;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Timestamp layout used by the score API.
pub const API_STRFTIME: &str = "%Y-%m-%dT%H:%M:%S";

/// Timestamp layout printed on the card header.
pub const HEADER_STRFTIME: &str = "%d/%m/%Y %H:%M:%S";

mod api_time {
    use super::API_STRFTIME;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(t: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&t.format(API_STRFTIME))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, API_STRFTIME).map_err(D::Error::custom)
    }
}

/// One play, as already parsed by the caller. Read-only to this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: u64,
    /// Percent, 0.0..=100.0.
    pub acc: f64,
    pub max_combo: u32,
    /// Letter grade as used in `ranking-<grade>` (e.g. "S", "XH").
    pub grade: String,
    pub perfect: bool,
    pub mode: u32,
    pub mods: u32,
    #[serde(default)]
    pub n300: u32,
    #[serde(default)]
    pub ngeki: u32,
    #[serde(default)]
    pub n100: u32,
    #[serde(default)]
    pub nkatu: u32,
    #[serde(default)]
    pub n50: u32,
    #[serde(default)]
    pub nmiss: u32,
    #[serde(with = "api_time")]
    pub play_time: NaiveDateTime,
}

impl ScoreRecord {
    #[inline(always)]
    pub fn game_mode(&self) -> GameMode {
        GameMode::from_mode(self.mode)
    }

    #[inline(always)]
    pub fn mod_set(&self) -> Mods {
        Mods::from_mask(self.mods)
    }

    /// Seven-digit zero-padded score as drawn on the card.
    pub fn score_text(&self) -> String {
        format!("{:07}", self.score)
    }

    pub fn accuracy_text(&self) -> String {
        format!("{:.2}%", self.acc)
    }

    pub fn max_combo_text(&self) -> String {
        format!("{}x", self.max_combo)
    }

    pub fn played_at_text(&self) -> String {
        self.play_time.format(HEADER_STRFTIME).to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeatmapRecord {
    #[serde(default)]
    pub id: u64,
    pub set_id: u64,
    pub title: String,
    pub artist: String,
    pub version: String,
    pub creator: String,
    pub bpm: f64,
    pub total_length: u32,
    pub max_combo: u32,
}

impl BeatmapRecord {
    /// `<artist> - <title> [<version>]`
    pub fn full_title(&self) -> String {
        format!("{} - {} [{}]", self.artist, self.title, self.version)
    }

    pub fn adjusted_bpm(&self, mods: Mods) -> f64 {
        self.bpm * mods.speed()
    }

    /// Length in whole seconds at the speed implied by `mods`.
    pub fn adjusted_length(&self, mods: Mods) -> u32 {
        (f64::from(self.total_length) / mods.speed()) as u32
    }

    /// `m:ss` at the speed implied by `mods`.
    pub fn duration_text(&self, mods: Mods) -> String {
        let secs = self.adjusted_length(mods);
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModAcronym {
    pub acronym: &'static str,
}

/// Request body for the external difficulty-rating service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DifficultyQuery {
    pub beatmap_id: u64,
    pub ruleset_id: u32,
    pub mods: Vec<ModAcronym>,
}

impl DifficultyQuery {
    pub fn new(score: &ScoreRecord, beatmap: &BeatmapRecord) -> Self {
        Self {
            beatmap_id: beatmap.id,
            ruleset_id: score.game_mode().ruleset_id(),
            mods: score
                .mod_set()
                .acronyms()
                .into_iter()
                .map(|acronym| ModAcronym { acronym })
                .collect(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::NaiveDate;

    pub fn score(mode: u32, mods: Mods) -> ScoreRecord {
        ScoreRecord {
            score: 700_000,
            acc: 98.5,
            max_combo: 412,
            grade: "S".to_string(),
            perfect: true,
            mode,
            mods: mods.bits(),
            n300: 380,
            ngeki: 70,
            n100: 12,
            nkatu: 9,
            n50: 1,
            nmiss: 0,
            play_time: NaiveDate::from_ymd_opt(2024, 3, 9)
                .and_then(|d| d.and_hms_opt(21, 4, 5))
                .expect("valid fixture time"),
        }
    }

    pub fn beatmap() -> BeatmapRecord {
        BeatmapRecord {
            id: 75,
            set_id: 1,
            title: "DISCO PRINCE".to_string(),
            artist: "Kenji Ninuma".to_string(),
            version: "Normal".to_string(),
            creator: "peppy".to_string(),
            bpm: 120.0,
            total_length: 142,
            max_combo: 314,
        }
    }
}
