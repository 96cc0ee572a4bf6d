//! Two-player "tell a joke" turn timer
//!
//! Players alternate; each turn gets a fixed number of seconds. The host
//! calls `tick_second` from a one-second timer. Leaving the screen pauses
//! the timer, and coming back restarts the current turn from full time.

use thiserror::Error;

use crate::characters::Character;
use crate::jokes::JokeCatalog;

/// Seconds per turn
pub const TURN_SECONDS: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    #[error("player {0} needs a name")]
    BlankName(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub name: String,
    pub character: Character,
}

impl Player {
    pub fn new(name: impl Into<String>, character: Character) -> Self {
        Self {
            name: name.into(),
            character,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnEvent {
    /// The active player's time ran out (fires once per turn)
    TimeUp,
}

#[derive(Debug, Clone)]
pub struct TurnTimer {
    players: [Player; 2],
    turn: usize,
    remaining_secs: u32,
    joke_index: usize,
    active: bool,
    time_up_sent: bool,
}

impl TurnTimer {
    /// Both names must be non-blank after trimming
    pub fn new(p1: Player, p2: Player) -> Result<Self, SetupError> {
        for (i, p) in [&p1, &p2].into_iter().enumerate() {
            if p.name.trim().is_empty() {
                return Err(SetupError::BlankName(i + 1));
            }
        }
        Ok(Self {
            players: [p1, p2],
            turn: 0,
            remaining_secs: TURN_SECONDS,
            joke_index: 0,
            active: true,
            time_up_sent: false,
        })
    }

    pub fn current_player(&self) -> &Player {
        &self.players[self.turn]
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// One second of wall time passed
    pub fn tick_second(&mut self) -> Option<TurnEvent> {
        if !self.active {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 && !self.time_up_sent {
            self.time_up_sent = true;
            return Some(TurnEvent::TimeUp);
        }
        None
    }

    /// Hand over to the other player with a fresh timer and joke list
    pub fn next_turn(&mut self) {
        self.turn = 1 - self.turn;
        self.joke_index = 0;
        self.reset_clock();
    }

    /// Screen lost focus
    pub fn on_blur(&mut self) {
        self.active = false;
    }

    /// Screen regained focus: resume with a full timer
    pub fn on_focus(&mut self) {
        self.active = true;
        self.reset_clock();
    }

    pub fn current_joke<'a>(&self, catalog: &'a JokeCatalog) -> &'a str {
        catalog.joke_at(self.current_player().character, self.joke_index)
    }

    pub fn next_joke<'a>(&mut self, catalog: &'a JokeCatalog) -> &'a str {
        self.joke_index += 1;
        self.current_joke(catalog)
    }

    fn reset_clock(&mut self) {
        self.remaining_secs = TURN_SECONDS;
        self.time_up_sent = false;
    }
}
