//! World state and core simulation types
//!
//! Everything a running session mutates lives in `World`. Nothing here
//! reads the wall clock.

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::characters::Character;
use crate::consts::*;
use crate::settings::Settings;

/// Simulation bounds, fixed for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PlayArea {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Layout used by the mobile host: inset from the screen edges, centered,
    /// never narrower than `PLAY_AREA_MIN_WIDTH`.
    pub fn for_screen_width(screen_width: f32, height: f32) -> Self {
        let width = (screen_width - PLAY_AREA_SIDE_INSET)
            .round()
            .max(PLAY_AREA_MIN_WIDTH);
        Self::new((screen_width - width) / 2.0, 0.0, width, height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Zero, negative or non-finite extents cannot host a session
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// The player's paddle (center position + box size)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub character: Character,
}

impl Paddle {
    /// Place the paddle horizontally centered, resting `paddle_edge_pad`
    /// above the bottom of the play area.
    pub fn new(area: &PlayArea, character: Character, settings: &Settings) -> Self {
        let width = settings.paddle_width;
        let height = settings.paddle_height;
        Self {
            pos: Vec2::new(
                area.x + area.width / 2.0,
                area.bottom() - settings.paddle_edge_pad - height / 2.0,
            ),
            width,
            height,
            character,
        }
    }

    /// Valid range for the paddle center: `[x + w/2, x + width - w/2]`.
    /// A paddle wider than the area is pinned to the area center.
    pub fn center_range(&self, area: &PlayArea) -> (f32, f32) {
        let lo = area.x + self.width / 2.0;
        let hi = area.right() - self.width / 2.0;
        if lo > hi {
            let mid = area.x + area.width / 2.0;
            (mid, mid)
        } else {
            (lo, hi)
        }
    }

    /// Snap the paddle under a pointer given in page coordinates.
    /// No smoothing: the paddle follows instantly.
    pub fn follow_pointer(&mut self, page_x: f32, area: &PlayArea) {
        let local_x = (page_x - area.x).clamp(0.0, area.width);
        let (lo, hi) = self.center_range(area);
        self.pos.x = (area.x + local_x).clamp(lo, hi);
    }
}

/// A collectible falling straight down at constant speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallingItem {
    pub id: u32,
    /// Center
    pub pos: Vec2,
    /// Diameter
    pub size: f32,
    /// Units per second, positive is down
    pub vel_y: f32,
}

impl FallingItem {
    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y - self.size / 2.0
    }
}

/// Entity categories, mirrored in key prefixes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityCategory {
    Paddle,
    Item,
}

/// Identity of an entity in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKey {
    Paddle,
    Item(u32),
}

impl EntityKey {
    pub fn category(&self) -> EntityCategory {
        match self {
            EntityKey::Paddle => EntityCategory::Paddle,
            EntityKey::Item(_) => EntityCategory::Item,
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Paddle => f.write_str("player"),
            EntityKey::Item(id) => write!(f, "star_{}", id),
        }
    }
}

/// Mutable entity collection for one session: at most one paddle plus any
/// number of falling items, iterated in id order.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    paddle: Option<Paddle>,
    items: BTreeMap<u32, FallingItem>,
    next_id: u32,
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            paddle: None,
            items: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID (unique per session)
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn set_paddle(&mut self, paddle: Paddle) {
        self.paddle = Some(paddle);
    }

    pub fn paddle(&self) -> Option<&Paddle> {
        self.paddle.as_ref()
    }

    pub fn paddle_mut(&mut self) -> Option<&mut Paddle> {
        self.paddle.as_mut()
    }

    pub fn insert_item(&mut self, item: FallingItem) {
        self.items.insert(item.id, item);
    }

    pub fn remove_item(&mut self, id: u32) -> Option<FallingItem> {
        self.items.remove(&id)
    }

    pub fn item(&self, id: u32) -> Option<&FallingItem> {
        self.items.get(&id)
    }

    pub fn items(&self) -> impl Iterator<Item = &FallingItem> {
        self.items.values()
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut FallingItem> {
        self.items.values_mut()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Keys of every entity in a category, in id order
    pub fn keys(&self, category: EntityCategory) -> Vec<EntityKey> {
        match category {
            EntityCategory::Paddle => self.paddle.iter().map(|_| EntityKey::Paddle).collect(),
            EntityCategory::Item => self.items.keys().map(|&id| EntityKey::Item(id)).collect(),
        }
    }

    pub fn contains(&self, key: EntityKey) -> bool {
        match key {
            EntityKey::Paddle => self.paddle.is_some(),
            EntityKey::Item(id) => self.items.contains_key(&id),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paddle.is_none() && self.items.is_empty()
    }

    /// Drop every entity. IDs keep counting so stale references never alias.
    pub fn clear(&mut self) {
        self.paddle = None;
        self.items.clear();
    }
}

/// Spawner bookkeeping (simulation milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpawnState {
    /// `None` until the first spawn check of the session
    pub last_spawn_ms: Option<f64>,
    /// Wait before the next spawn (warm-up first, then the steady interval)
    pub next_spawn_in_ms: f64,
}

/// Complete simulation state for one running session
#[derive(Debug, Clone)]
pub struct World {
    /// Seed for reproducibility
    pub seed: u64,
    pub area: PlayArea,
    pub entities: EntityStore,
    pub spawner: SpawnState,
    /// Accumulated simulation time
    pub time_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
}

impl World {
    /// Create a world with a paddle for `character` and no items
    pub fn new(seed: u64, area: PlayArea, character: Character, settings: &Settings) -> Self {
        let mut entities = EntityStore::new();
        entities.set_paddle(Paddle::new(&area, character, settings));
        Self {
            seed,
            area,
            entities,
            spawner: SpawnState {
                last_spawn_ms: None,
                next_spawn_in_ms: settings.spawn_interval_ms,
            },
            time_ms: 0.0,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn paddle(&self) -> Option<&Paddle> {
        self.entities.paddle()
    }

    /// Release every entity
    pub fn teardown(&mut self) {
        self.entities.clear();
        self.spawner = SpawnState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area() -> PlayArea {
        PlayArea::new(16.0, 0.0, 358.0, 380.0)
    }

    #[test]
    fn test_play_area_layout() {
        let a = PlayArea::for_screen_width(390.0, 380.0);
        assert_eq!(a.width, 358.0);
        assert_eq!(a.x, 16.0);

        // Narrow screens keep the minimum width
        let a = PlayArea::for_screen_width(200.0, 380.0);
        assert_eq!(a.width, PLAY_AREA_MIN_WIDTH);
        assert_eq!(a.x, -30.0);
    }

    #[test]
    fn test_paddle_rests_on_bottom() {
        let p = Paddle::new(&area(), Character::Wolf, &Settings::default());
        assert_eq!(p.pos.x, 16.0 + 179.0);
        assert_eq!(p.pos.y, 380.0 - 8.0 - 48.0);
    }

    #[test]
    fn test_follow_pointer_clamps() {
        let a = area();
        let mut p = Paddle::new(&a, Character::Wolf, &Settings::default());

        p.follow_pointer(-500.0, &a);
        assert_eq!(p.pos.x, a.x + 48.0);

        p.follow_pointer(10_000.0, &a);
        assert_eq!(p.pos.x, a.right() - 48.0);

        p.follow_pointer(200.0, &a);
        assert_eq!(p.pos.x, 200.0);
    }

    #[test]
    fn test_store_keys_by_category() {
        let mut store = EntityStore::new();
        assert!(store.is_empty());

        store.set_paddle(Paddle::new(&area(), Character::PigA, &Settings::default()));
        for _ in 0..3 {
            let id = store.next_entity_id();
            store.insert_item(FallingItem {
                id,
                pos: Vec2::ZERO,
                size: 30.0,
                vel_y: 200.0,
            });
        }

        assert_eq!(store.keys(EntityCategory::Paddle), vec![EntityKey::Paddle]);
        assert_eq!(
            store.keys(EntityCategory::Item),
            vec![EntityKey::Item(1), EntityKey::Item(2), EntityKey::Item(3)]
        );
        assert_eq!(EntityKey::Item(2).to_string(), "star_2");

        assert!(store.remove_item(2).is_some());
        assert!(!store.contains(EntityKey::Item(2)));
        assert!(store.remove_item(2).is_none());

        store.clear();
        assert!(store.is_empty());
        // IDs are never reused within a store
        assert_eq!(store.next_entity_id(), 4);
    }
}
