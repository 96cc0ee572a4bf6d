//! Saved jokes and star ratings
//!
//! Persisted as JSON in the shared key-value store. Read problems load as
//! empty; write problems are logged and reported as `false`, while the
//! in-memory list keeps the change.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::characters::Character;
use crate::persistence::{self, KeyValueStore};

/// A joke the player saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedJoke {
    pub id: String,
    #[serde(rename = "char")]
    pub character: Character,
    #[serde(default)]
    pub index: usize,
    pub text: String,
    /// Unix timestamp (ms) when saved
    pub ts: u64,
}

pub struct Favorites<S> {
    store: S,
    saved: Vec<SavedJoke>,
}

impl<S: KeyValueStore> Favorites<S> {
    const STORAGE_KEY: &'static str = "jokes:saved";

    /// Load saved jokes from the store
    pub fn load(store: S) -> Self {
        let saved: Vec<SavedJoke> =
            persistence::load_json(&store, Self::STORAGE_KEY).unwrap_or_default();
        log::info!("Loaded {} saved jokes", saved.len());
        Self { store, saved }
    }

    /// All saved jokes, most prioritized first
    pub fn all(&self) -> &[SavedJoke] {
        &self.saved
    }

    /// Saved jokes for one character, or all when `None`
    pub fn by_character(&self, character: Option<Character>) -> Vec<&SavedJoke> {
        self.saved
            .iter()
            .filter(|j| character.is_none_or(|c| j.character == c))
            .collect()
    }

    pub fn is_saved(&self, character: Character, index: usize) -> bool {
        self.saved
            .iter()
            .any(|j| j.character == character && j.index == index)
    }

    /// Append a joke. Returns whether the change was persisted.
    pub fn save_joke(&mut self, character: Character, index: usize, text: &str, now_ms: u64) -> bool {
        self.saved.push(SavedJoke {
            id: format!("{}-{}-{}", character.key(), index, now_ms),
            character,
            index,
            text: text.to_string(),
            ts: now_ms,
        });
        self.persist()
    }

    /// Remove by id. Returns false if nothing was removed or the write failed.
    pub fn remove_joke(&mut self, id: &str) -> bool {
        let before = self.saved.len();
        self.saved.retain(|j| j.id != id);
        if self.saved.len() == before {
            return false;
        }
        self.persist()
    }

    /// Save if absent, remove if present. Returns the new saved state.
    pub fn toggle(&mut self, character: Character, index: usize, text: &str, now_ms: u64) -> bool {
        let existing = self
            .saved
            .iter()
            .find(|j| j.character == character && j.index == index)
            .map(|j| j.id.clone());

        match existing {
            Some(id) => {
                self.remove_joke(&id);
                false
            }
            None => {
                self.save_joke(character, index, text, now_ms);
                true
            }
        }
    }

    /// Move a joke to the front of the list
    pub fn prioritize(&mut self, id: &str) -> bool {
        let Some(pos) = self.saved.iter().position(|j| j.id == id) else {
            return false;
        };
        let joke = self.saved.remove(pos);
        self.saved.insert(0, joke);
        self.persist()
    }

    fn persist(&mut self) -> bool {
        match persistence::save_json(&mut self.store, Self::STORAGE_KEY, &self.saved) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Error saving jokes: {}", e);
                false
            }
        }
    }
}

/// Star ratings (1-5) keyed by saved joke id
pub struct Ratings<S> {
    store: S,
    ratings: BTreeMap<String, u8>,
}

impl<S: KeyValueStore> Ratings<S> {
    const STORAGE_KEY: &'static str = "joke_ratings";
    pub const MAX_STARS: u8 = 5;

    pub fn load(store: S) -> Self {
        let ratings = persistence::load_json(&store, Self::STORAGE_KEY).unwrap_or_default();
        Self { store, ratings }
    }

    pub fn rating(&self, joke_id: &str) -> Option<u8> {
        self.ratings.get(joke_id).copied()
    }

    pub fn has_rating(&self, joke_id: &str) -> bool {
        self.rating(joke_id).is_some_and(|r| r > 0)
    }

    /// Store a rating. Zero is ignored; anything above five is clamped.
    pub fn rate(&mut self, joke_id: &str, stars: u8) -> bool {
        if stars == 0 {
            return false;
        }
        self.ratings
            .insert(joke_id.to_string(), stars.min(Self::MAX_STARS));
        match persistence::save_json(&mut self.store, Self::STORAGE_KEY, &self.ratings) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Error saving rating: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, SharedStore};

    #[test]
    fn test_toggle_and_query() {
        let store = SharedStore::new(MemoryStore::new());
        let mut fav = Favorites::load(store.clone());

        assert!(fav.toggle(Character::Wolf, 2, "joke two", 100));
        assert!(fav.is_saved(Character::Wolf, 2));
        assert!(!fav.is_saved(Character::Wolf, 3));

        assert!(!fav.toggle(Character::Wolf, 2, "joke two", 200));
        assert!(!fav.is_saved(Character::Wolf, 2));
        assert!(fav.all().is_empty());
    }

    #[test]
    fn test_persists_across_loads() {
        let store = SharedStore::new(MemoryStore::new());
        let mut fav = Favorites::load(store.clone());
        assert!(fav.save_joke(Character::PigA, 0, "oink", 1));
        assert!(fav.save_joke(Character::Wolf, 1, "howl", 2));
        assert!(fav.save_joke(Character::PigA, 4, "oink oink", 3));

        let reloaded = Favorites::load(store.clone());
        assert_eq!(reloaded.all().len(), 3);
        assert_eq!(reloaded.by_character(Some(Character::PigA)).len(), 2);
        assert_eq!(reloaded.by_character(None).len(), 3);
        assert_eq!(reloaded.all()[1].id, "wolf-1-2");
    }

    #[test]
    fn test_prioritize_moves_to_front() {
        let mut fav = Favorites::load(MemoryStore::new());
        fav.save_joke(Character::Wolf, 0, "a", 1);
        fav.save_joke(Character::Wolf, 1, "b", 2);
        fav.save_joke(Character::Wolf, 2, "c", 3);

        assert!(fav.prioritize("wolf-2-3"));
        let texts: Vec<_> = fav.all().iter().map(|j| j.text.as_str()).collect();
        assert_eq!(texts, ["c", "a", "b"]);
        assert!(!fav.prioritize("missing"));
    }

    #[test]
    fn test_malformed_saved_list_loads_empty() {
        let mut store = MemoryStore::new();
        store.set("jokes:saved", "{\"oops\":").unwrap();
        let fav = Favorites::load(store);
        assert!(fav.all().is_empty());
    }

    #[test]
    fn test_reads_legacy_records() {
        let mut store = MemoryStore::new();
        store
            .set(
                "jokes:saved",
                r#"[{"id":"pigB-3-9","char":"pigB","index":3,"text":"t","ts":9}]"#,
            )
            .unwrap();
        let fav = Favorites::load(store);
        assert!(fav.is_saved(Character::PigB, 3));
    }

    #[test]
    fn test_ratings() {
        let store = SharedStore::new(MemoryStore::new());
        let mut ratings = Ratings::load(store.clone());

        assert!(!ratings.rate("a", 0));
        assert!(!ratings.has_rating("a"));

        assert!(ratings.rate("a", 4));
        assert!(ratings.rate("b", 9));
        assert_eq!(ratings.rating("b"), Some(5));

        let reloaded = Ratings::load(store);
        assert_eq!(reloaded.rating("a"), Some(4));
        assert!(reloaded.has_rating("b"));
    }
}
