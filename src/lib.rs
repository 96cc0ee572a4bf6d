//! Catch the Stars - falling-object mini-game engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, collisions)
//! - `session`: Session lifecycle, match countdown and reward payout
//! - `cooldown`: Persisted reward currency and replay cooldown
//! - `persistence`: Key-value store adapters (memory, JSON file, LocalStorage)
//! - `settings`: Data-driven gameplay tunables
//! - `characters`, `jokes`, `favorites`, `turn_timer`: joke-browsing collaborators

pub mod characters;
pub mod cooldown;
pub mod favorites;
pub mod jokes;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod turn_timer;

pub use characters::Character;
pub use cooldown::{CooldownRecord, CooldownStore};
pub use session::{SessionController, SessionOutcome, SessionStatus, StartError};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless driver (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Match length (wall clock)
    pub const MATCH_DURATION_MS: u64 = 20_000;
    /// How often the match countdown is recomputed
    pub const COUNTDOWN_REFRESH_MS: u64 = 1_000;
    /// Mandatory wait between the end of one session and the next start
    pub const COOLDOWN_MS: u64 = 10 * 60 * 1000;

    /// Steady-state spawn interval
    pub const SPAWN_INTERVAL_MS: f64 = 550.0;
    /// Delay before the first spawn of a session
    pub const SPAWN_WARMUP_MS: f64 = 200.0;

    /// Falling item diameter range
    pub const ITEM_SIZE_MIN: f32 = 28.0;
    pub const ITEM_SIZE_MAX: f32 = 56.0;
    /// Falling item speed range (units/sec)
    pub const ITEM_SPEED_MIN: f32 = 160.0;
    pub const ITEM_SPEED_MAX: f32 = 300.0;
    /// Items are removed once their top edge is this far below the play area
    pub const DESPAWN_MARGIN: f32 = 40.0;

    /// Paddle box
    pub const PADDLE_WIDTH: f32 = 96.0;
    pub const PADDLE_HEIGHT: f32 = 96.0;
    /// Gap between the paddle and the bottom of the play area
    pub const PADDLE_EDGE_PAD: f32 = 8.0;

    /// Play area layout
    pub const PLAY_AREA_HEIGHT: f32 = 380.0;
    pub const PLAY_AREA_MIN_WIDTH: f32 = 260.0;
    pub const PLAY_AREA_SIDE_INSET: f32 = 32.0;
}

/// Round milliseconds up to whole seconds (for countdown labels)
#[inline]
pub fn ceil_secs(ms: u64) -> u64 {
    ms.div_ceil(1000)
}

/// Format seconds as `MM:SS`
pub fn format_mmss(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Route `log` output to the browser console (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn init_web_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
}
