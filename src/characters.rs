//! Playable characters
//!
//! The engine only needs the identifier to tag the paddle; display assets
//! are resolved by the host from `key()`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Character {
    #[default]
    #[serde(rename = "wolf")]
    Wolf,
    #[serde(rename = "pigA")]
    PigA,
    #[serde(rename = "pigB")]
    PigB,
    #[serde(rename = "pigC")]
    PigC,
}

impl Character {
    /// Catalog order (selection grids, carousels)
    pub const ALL: [Character; 4] = [
        Character::Wolf,
        Character::PigA,
        Character::PigB,
        Character::PigC,
    ];

    /// Stable storage/asset key
    pub fn key(&self) -> &'static str {
        match self {
            Character::Wolf => "wolf",
            Character::PigA => "pigA",
            Character::PigB => "pigB",
            Character::PigC => "pigC",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Character::Wolf => "Wolf",
            Character::PigA => "Hrumko",
            Character::PigB => "Rokhasik",
            Character::PigC => "Piskorokh",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl std::fmt::Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip() {
        for c in Character::ALL {
            assert_eq!(Character::from_key(c.key()), Some(c));
        }
        assert_eq!(Character::from_key("pigD"), None);
    }

    #[test]
    fn test_serde_uses_keys() {
        let json = serde_json::to_string(&Character::PigB).unwrap();
        assert_eq!(json, "\"pigB\"");
        let back: Character = serde_json::from_str("\"wolf\"").unwrap();
        assert_eq!(back, Character::Wolf);
    }
}
