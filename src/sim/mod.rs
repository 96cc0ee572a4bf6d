//! Deterministic simulation module
//!
//! All falling-item gameplay lives here. This module must be pure and
//! deterministic:
//! - Time only advances through the `dt` handed to `tick`
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No storage, rendering or platform dependencies

pub mod collision;
pub mod motion;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Aabb, collect_catches};
pub use motion::integrate;
pub use spawner::spawn_check;
pub use state::{
    EntityCategory, EntityKey, EntityStore, FallingItem, Paddle, PlayArea, SpawnState, World,
};
pub use tick::{GameEvent, PointerSample, TickInput, tick};
