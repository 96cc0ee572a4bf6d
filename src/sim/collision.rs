//! Collision detection
//!
//! Paddle vs. falling item, both treated as axis-aligned boxes. Boxes that
//! only share an edge do not overlap.

use glam::Vec2;

use super::state::{EntityStore, FallingItem, Paddle};

/// Axis-aligned bounding box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Strict intersection test: a zero-width contact is a miss
    ///
    /// The web game compared edges inclusively, so an item merely touching
    /// the paddle used to count as caught. Here it needs at least some
    /// positive overlap on both axes.
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.max.x <= other.min.x
            || self.min.x >= other.max.x
            || self.max.y <= other.min.y
            || self.min.y >= other.max.y)
    }
}

impl Paddle {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::new(self.width, self.height))
    }
}

impl FallingItem {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(self.size))
    }
}

/// Remove every item overlapping the paddle and return their ids in id
/// order. Each item is reported at most once.
pub fn collect_catches(entities: &mut EntityStore) -> Vec<u32> {
    let Some(paddle_box) = entities.paddle().map(Paddle::aabb) else {
        return Vec::new();
    };

    let caught: Vec<u32> = entities
        .items()
        .filter(|item| item.aabb().overlaps(&paddle_box))
        .map(|item| item.id)
        .collect();

    for &id in &caught {
        entities.remove_item(id);
    }
    caught
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::characters::Character;
    use crate::settings::Settings;
    use crate::sim::state::PlayArea;
    use proptest::prelude::*;

    fn unit_box(x: f32, y: f32) -> Aabb {
        Aabb::new(Vec2::new(x, y), Vec2::new(x + 10.0, y + 10.0))
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = unit_box(0.0, 0.0);
        assert!(!a.overlaps(&unit_box(10.0, 0.0)));
        assert!(!a.overlaps(&unit_box(0.0, 10.0)));
        assert!(!a.overlaps(&unit_box(-10.0, 0.0)));
        assert!(!a.overlaps(&unit_box(10.0, 10.0)));
    }

    #[test]
    fn test_near_miss_and_one_pixel_overlap() {
        let a = unit_box(0.0, 0.0);
        assert!(!a.overlaps(&unit_box(11.0, 0.0)));
        assert!(a.overlaps(&unit_box(9.0, 0.0)));
        assert!(a.overlaps(&unit_box(0.0, -9.0)));
        assert!(a.overlaps(&unit_box(2.0, 2.0)));
    }

    #[test]
    fn test_collect_catches_removes_hits_only() {
        let settings = Settings::default();
        let area = PlayArea::new(0.0, 0.0, 400.0, 380.0);
        let mut store = EntityStore::new();
        let paddle = Paddle::new(&area, Character::Wolf, &settings);
        let paddle_pos = paddle.pos;
        store.set_paddle(paddle);

        // Two on the paddle, one far above, one touching the paddle's top edge
        for (dx, y, size) in [
            (0.0, paddle_pos.y, 30.0),
            (20.0, paddle_pos.y - 50.0, 30.0),
            (0.0, 10.0, 30.0),
            (0.0, paddle_pos.y - 48.0 - 15.0, 30.0),
        ] {
            let id = store.next_entity_id();
            store.insert_item(FallingItem {
                id,
                pos: Vec2::new(paddle_pos.x + dx, y),
                size,
                vel_y: 200.0,
            });
        }

        assert_eq!(collect_catches(&mut store), vec![1, 2]);
        assert_eq!(store.item_count(), 2);
        // Second pass finds nothing new
        assert!(collect_catches(&mut store).is_empty());
    }

    #[test]
    fn test_no_paddle_no_catches() {
        let mut store = EntityStore::new();
        let id = store.next_entity_id();
        store.insert_item(FallingItem {
            id,
            pos: Vec2::ZERO,
            size: 30.0,
            vel_y: 1.0,
        });
        assert!(collect_catches(&mut store).is_empty());
        assert_eq!(store.item_count(), 1);
    }

    proptest! {
        #[test]
        fn prop_overlap_matches_interval_intersection(
            ax in -500i32..500, ay in -500i32..500, aw in 1i32..100, ah in 1i32..100,
            bx in -500i32..500, by in -500i32..500, bw in 1i32..100, bh in 1i32..100,
        ) {
            let a = Aabb::new(
                Vec2::new(ax as f32, ay as f32),
                Vec2::new((ax + aw) as f32, (ay + ah) as f32),
            );
            let b = Aabb::new(
                Vec2::new(bx as f32, by as f32),
                Vec2::new((bx + bw) as f32, (by + bh) as f32),
            );
            let x_shared = (ax + aw).min(bx + bw) - ax.max(bx);
            let y_shared = (ay + ah).min(by + bh) - ay.max(by);

            prop_assert_eq!(a.overlaps(&b), x_shared > 0 && y_shared > 0);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }
    }
}
