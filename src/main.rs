//! Catch the Stars entry point
//!
//! Native builds run one headless session against a JSON save file, with a
//! simulated clock and a scripted pointer, then log the result.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use catch_stars::consts::SIM_DT;
    use catch_stars::persistence::{JsonFileStore, SharedStore};
    use catch_stars::platform::now_ms;
    use catch_stars::sim::PlayArea;
    use catch_stars::{Character, SessionController, Settings, StartError, format_mmss};

    env_logger::init();
    log::info!("Catch the Stars (headless) starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(now_ms);
    let save_path =
        std::env::var("CATCH_STARS_SAVE").unwrap_or_else(|_| "catch_stars_save.json".to_string());

    let store = match JsonFileStore::open(&save_path) {
        Ok(store) => SharedStore::new(store),
        Err(e) => {
            log::error!("Cannot open save file {}: {}", save_path, e);
            std::process::exit(1);
        }
    };
    let settings = Settings::load(&store);
    let area = PlayArea::for_screen_width(390.0, settings.play_area_height);
    let mut controller = SessionController::new(store, settings, seed);

    let start = now_ms();
    match controller.request_start(start) {
        Ok(()) => {}
        Err(StartError::CooldownActive { remaining_ms }) => {
            log::info!(
                "Next game in {}",
                format_mmss(catch_stars::ceil_secs(remaining_ms))
            );
            return;
        }
        Err(e) => {
            log::error!("{}", e);
            return;
        }
    }

    let character = Character::ALL[(seed % Character::ALL.len() as u64) as usize];
    if let Err(e) = controller.select_character(character, area, start) {
        log::error!("{}", e);
        return;
    }

    let step_ms = (SIM_DT * 1000.0).round() as u64;
    let mut now = start;
    let outcome = loop {
        now += step_ms;

        // Chase whichever item is closest to the ground
        let target = controller.world().and_then(|w| {
            w.entities
                .items()
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map(|item| item.pos.x)
        });
        if let Some(x) = target {
            controller.push_pointer(x, 0.0);
        }

        if let Some(outcome) = controller.step(now, SIM_DT).outcome {
            break outcome;
        }
    };

    log::info!(
        "{} caught {} stars, reward {} (total {})",
        outcome.character,
        outcome.score,
        outcome.reward,
        outcome
            .total_reward
            .map(|t| t.to_string())
            .unwrap_or_else(|| "unsaved".to_string())
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive the library directly; see `catch_stars::init_web_logging`
}
