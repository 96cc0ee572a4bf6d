//! Per-step simulation
//!
//! Fixed order inside a step: input → spawn → motion → collisions. Items
//! are eligible to be caught in the same step they spawn.

use super::collision::collect_catches;
use super::motion::integrate;
use super::spawner::spawn_check;
use super::state::World;
use crate::settings::Settings;

/// One pointer/touch sample in page coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub page_x: f32,
    pub page_y: f32,
}

impl PointerSample {
    pub fn new(page_x: f32, page_y: f32) -> Self {
        Self { page_x, page_y }
    }
}

/// Inputs collected for a single step
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Samples in arrival order; only the last one is applied
    pub pointer: Vec<PointerSample>,
}

impl TickInput {
    pub fn latest_pointer(&self) -> Option<PointerSample> {
        self.pointer.last().copied()
    }
}

/// Things that happened during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Spawned { id: u32 },
    /// Fell out of the play area uncaught
    Escaped { id: u32 },
    Caught { id: u32, value: u32 },
}

/// Advance the world by `dt` seconds and report what happened
pub fn tick(world: &mut World, input: &TickInput, dt: f32, settings: &Settings) -> Vec<GameEvent> {
    let mut events = Vec::new();

    world.time_ticks += 1;
    world.time_ms += dt as f64 * 1000.0;

    if let Some(sample) = input.latest_pointer() {
        let area = world.area;
        if let Some(paddle) = world.entities.paddle_mut() {
            paddle.follow_pointer(sample.page_x, &area);
        }
    }

    let now = world.time_ms;
    if let Some(id) = spawn_check(world, now, settings) {
        events.push(GameEvent::Spawned { id });
    }

    for id in integrate(world, dt, settings.despawn_margin) {
        events.push(GameEvent::Escaped { id });
    }

    for id in collect_catches(&mut world.entities) {
        events.push(GameEvent::Caught { id, value: 1 });
    }

    events
}
