//! Straight-line falling motion
//!
//! Constant vertical velocity, no horizontal drift, no acceleration.

use super::state::World;

/// Advance every item by `vel_y * dt` and drop the ones whose top edge has
/// passed `area.bottom() + margin`. Returns the removed ids.
pub fn integrate(world: &mut World, dt: f32, margin: f32) -> Vec<u32> {
    let limit = world.area.bottom() + margin;
    let mut escaped = Vec::new();

    for item in world.entities.items_mut() {
        item.pos.y += item.vel_y * dt;
        if item.top() > limit {
            escaped.push(item.id);
        }
    }

    for &id in &escaped {
        world.entities.remove_item(id);
        log::debug!("despawn star_{} (left play area)", id);
    }
    escaped
}
