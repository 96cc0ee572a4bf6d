//! Joke content provider
//!
//! Jokes are keyed by character and browsed as a cycle: stepping past the
//! last joke wraps to the first.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::characters::Character;

/// Shown when a character has no jokes
pub const FALLBACK_JOKE: &str = "Funny time!";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JokeCatalog {
    by_character: BTreeMap<Character, Vec<String>>,
}

impl JokeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `{ "wolf": ["..."], "pigA": [...] }`
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn insert(&mut self, character: Character, jokes: Vec<String>) {
        self.by_character.insert(character, jokes);
    }

    pub fn jokes(&self, character: Character) -> &[String] {
        self.by_character
            .get(&character)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self, character: Character) -> usize {
        self.jokes(character).len()
    }

    /// Joke at `index`, wrapping modulo the list length
    pub fn joke_at(&self, character: Character, index: usize) -> &str {
        let jokes = self.jokes(character);
        if jokes.is_empty() {
            return FALLBACK_JOKE;
        }
        &jokes[index % jokes.len()]
    }
}

/// Per-character browsing position
#[derive(Debug, Clone, Default)]
pub struct JokeCursor {
    active: Character,
    index_by_character: BTreeMap<Character, usize>,
}

impl JokeCursor {
    pub fn new(active: Character) -> Self {
        Self {
            active,
            index_by_character: BTreeMap::new(),
        }
    }

    pub fn active(&self) -> Character {
        self.active
    }

    /// Switch character; each character remembers its own position
    pub fn select(&mut self, character: Character) {
        self.active = character;
    }

    pub fn index(&self) -> usize {
        self.index_by_character
            .get(&self.active)
            .copied()
            .unwrap_or(0)
    }

    pub fn current<'a>(&self, catalog: &'a JokeCatalog) -> &'a str {
        catalog.joke_at(self.active, self.index())
    }

    /// Advance to the next joke for the active character, wrapping
    pub fn next_joke<'a>(&mut self, catalog: &'a JokeCatalog) -> &'a str {
        let len = catalog.len(self.active).max(1);
        let next = (self.index() + 1) % len;
        self.index_by_character.insert(self.active, next);
        self.current(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> JokeCatalog {
        JokeCatalog::from_json(r#"{"wolf": ["a", "b", "c"], "pigA": ["x"]}"#).unwrap()
    }

    #[test]
    fn test_joke_at_wraps() {
        let c = catalog();
        assert_eq!(c.joke_at(Character::Wolf, 0), "a");
        assert_eq!(c.joke_at(Character::Wolf, 4), "b");
        assert_eq!(c.joke_at(Character::PigB, 3), FALLBACK_JOKE);
    }

    #[test]
    fn test_cursor_cycles_per_character() {
        let c = catalog();
        let mut cursor = JokeCursor::new(Character::Wolf);
        assert_eq!(cursor.current(&c), "a");
        assert_eq!(cursor.next_joke(&c), "b");
        assert_eq!(cursor.next_joke(&c), "c");
        assert_eq!(cursor.next_joke(&c), "a");
        cursor.next_joke(&c);

        cursor.select(Character::PigA);
        assert_eq!(cursor.next_joke(&c), "x");
        assert_eq!(cursor.index(), 0);

        cursor.select(Character::Wolf);
        assert_eq!(cursor.current(&c), "b");
    }

    #[test]
    fn test_cursor_on_empty_list() {
        let c = JokeCatalog::new();
        let mut cursor = JokeCursor::new(Character::PigC);
        assert_eq!(cursor.next_joke(&c), FALLBACK_JOKE);
        assert_eq!(cursor.index(), 0);
    }
}
