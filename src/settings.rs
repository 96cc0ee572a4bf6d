//! Gameplay tunables
//!
//! Persisted as JSON next to the save data. Every field has a default, so
//! partial or older configs load cleanly.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::persistence::{self, KeyValueStore, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Match ===
    /// Match length in wall-clock milliseconds
    pub match_duration_ms: u64,
    /// Countdown recompute cadence
    pub countdown_refresh_ms: u64,
    /// Wait between sessions
    pub cooldown_ms: u64,

    // === Spawning ===
    pub spawn_interval_ms: f64,
    pub spawn_warmup_ms: f64,
    pub item_size_min: f32,
    pub item_size_max: f32,
    pub item_speed_min: f32,
    pub item_speed_max: f32,
    /// Distance below the play area before an item is dropped
    pub despawn_margin: f32,

    // === Paddle / layout ===
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_edge_pad: f32,
    pub play_area_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            match_duration_ms: MATCH_DURATION_MS,
            countdown_refresh_ms: COUNTDOWN_REFRESH_MS,
            cooldown_ms: COOLDOWN_MS,

            spawn_interval_ms: SPAWN_INTERVAL_MS,
            spawn_warmup_ms: SPAWN_WARMUP_MS,
            item_size_min: ITEM_SIZE_MIN,
            item_size_max: ITEM_SIZE_MAX,
            item_speed_min: ITEM_SPEED_MIN,
            item_speed_max: ITEM_SPEED_MAX,
            despawn_margin: DESPAWN_MARGIN,

            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_edge_pad: PADDLE_EDGE_PAD,
            play_area_height: PLAY_AREA_HEIGHT,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "catch:settings";

    /// Repair values a hand-edited config could break: inverted ranges,
    /// non-positive intervals and sizes.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if self.match_duration_ms == 0 {
            self.match_duration_ms = defaults.match_duration_ms;
        }
        if self.countdown_refresh_ms == 0 {
            self.countdown_refresh_ms = defaults.countdown_refresh_ms;
        }
        if !(self.spawn_interval_ms > 0.0) {
            self.spawn_interval_ms = defaults.spawn_interval_ms;
        }
        if !(self.spawn_warmup_ms >= 0.0) {
            self.spawn_warmup_ms = defaults.spawn_warmup_ms;
        }
        if !(self.item_size_min > 0.0) {
            self.item_size_min = defaults.item_size_min;
        }
        if !(self.item_speed_min > 0.0) {
            self.item_speed_min = defaults.item_speed_min;
        }
        if self.item_size_max < self.item_size_min {
            std::mem::swap(&mut self.item_size_min, &mut self.item_size_max);
        }
        if self.item_speed_max < self.item_speed_min {
            std::mem::swap(&mut self.item_speed_min, &mut self.item_speed_max);
        }
        if !(self.despawn_margin >= 0.0) {
            self.despawn_margin = defaults.despawn_margin;
        }
        if !(self.paddle_width > 0.0) {
            self.paddle_width = defaults.paddle_width;
        }
        if !(self.paddle_height > 0.0) {
            self.paddle_height = defaults.paddle_height;
        }
        if !(self.play_area_height > 0.0) {
            self.play_area_height = defaults.play_area_height;
        }
        self
    }

    /// Load settings, falling back to defaults when absent or malformed
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match persistence::load_json::<Settings, _>(store, Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings.sanitized()
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        persistence::save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
