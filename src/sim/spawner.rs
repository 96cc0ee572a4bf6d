//! Falling item spawner
//!
//! One check per tick. The first check only arms the warm-up timer; after
//! that an item is emitted whenever the wait has elapsed. Missed intervals
//! are not caught up.

use glam::Vec2;
use rand::Rng;

use super::state::{FallingItem, World};
use crate::settings::Settings;

/// Run one spawn check at simulation time `now_ms`. Returns the id of the
/// new item, if one was spawned.
pub fn spawn_check(world: &mut World, now_ms: f64, settings: &Settings) -> Option<u32> {
    let Some(last) = world.spawner.last_spawn_ms else {
        world.spawner.last_spawn_ms = Some(now_ms);
        world.spawner.next_spawn_in_ms = settings.spawn_warmup_ms;
        return None;
    };

    if now_ms - last < world.spawner.next_spawn_in_ms {
        return None;
    }

    let id = world.entities.next_entity_id();
    let item = random_item(world, id, settings);
    log::debug!(
        "spawn star_{} x={:.1} size={} vy={:.1}",
        id,
        item.pos.x,
        item.size,
        item.vel_y
    );
    world.entities.insert_item(item);

    world.spawner.last_spawn_ms = Some(now_ms);
    world.spawner.next_spawn_in_ms = settings.spawn_interval_ms;
    Some(id)
}

/// Roll size, speed and column for a new item. The item starts one
/// diameter above the top of the play area, fully inside it horizontally.
fn random_item(world: &mut World, id: u32, settings: &Settings) -> FallingItem {
    let area = world.area;
    let rng = &mut world.rng;

    let size = rng
        .random_range(settings.item_size_min..=settings.item_size_max)
        .round();
    let half = size / 2.0;
    let x = if area.width - half > half {
        area.x + rng.random_range(half..=area.width - half)
    } else {
        area.x + area.width / 2.0
    };
    let vel_y = rng.random_range(settings.item_speed_min..=settings.item_speed_max);

    FallingItem {
        id,
        pos: Vec2::new(x, area.y - size),
        size,
        vel_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::Character;
    use crate::sim::state::PlayArea;

    fn world(seed: u64) -> World {
        World::new(
            seed,
            PlayArea::new(0.0, 0.0, 360.0, 380.0),
            Character::Wolf,
            &Settings::default(),
        )
    }

    #[test]
    fn test_first_check_arms_warmup() {
        let settings = Settings::default();
        let mut w = world(1);

        assert_eq!(spawn_check(&mut w, 1000.0, &settings), None);
        assert_eq!(w.spawner.last_spawn_ms, Some(1000.0));
        assert_eq!(w.spawner.next_spawn_in_ms, 200.0);

        assert_eq!(spawn_check(&mut w, 1199.0, &settings), None);
        assert!(spawn_check(&mut w, 1200.0, &settings).is_some());
        assert_eq!(w.spawner.next_spawn_in_ms, 550.0);

        assert_eq!(spawn_check(&mut w, 1749.0, &settings), None);
        assert!(spawn_check(&mut w, 1750.0, &settings).is_some());
        assert_eq!(w.entities.item_count(), 2);
    }

    #[test]
    fn test_no_catch_up_after_long_gap() {
        let settings = Settings::default();
        let mut w = world(2);

        spawn_check(&mut w, 0.0, &settings);
        // Ten intervals skipped: still only one item
        assert!(spawn_check(&mut w, 5_500.0, &settings).is_some());
        assert_eq!(w.entities.item_count(), 1);
        assert_eq!(spawn_check(&mut w, 5_501.0, &settings), None);
    }

    #[test]
    fn test_spawned_items_within_ranges() {
        let settings = Settings::default();
        let mut w = world(3);
        spawn_check(&mut w, 0.0, &settings);

        let mut t = 0.0;
        for _ in 0..200 {
            t += 600.0;
            spawn_check(&mut w, t, &settings);
        }

        assert_eq!(w.entities.item_count(), 200);
        for item in w.entities.items() {
            assert!((28.0..=56.0).contains(&item.size));
            assert_eq!(item.size, item.size.round());
            assert!((160.0..=300.0).contains(&item.vel_y));
            assert!(item.pos.x - item.size / 2.0 >= 0.0);
            assert!(item.pos.x + item.size / 2.0 <= 360.0);
            assert!(item.pos.y < 0.0);
        }
    }

    #[test]
    fn test_same_seed_same_items() {
        let settings = Settings::default();
        let mut a = world(42);
        let mut b = world(42);
        for t in [0.0, 200.0, 750.0, 1300.0] {
            spawn_check(&mut a, t, &settings);
            spawn_check(&mut b, t, &settings);
        }
        let ia: Vec<_> = a.entities.items().cloned().collect();
        let ib: Vec<_> = b.entities.items().cloned().collect();
        assert_eq!(ia, ib);
    }
}
