pub mod judgment;
pub mod mods;
pub mod scores;
