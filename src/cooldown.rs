//! Reward currency and replay cooldown
//!
//! Two counters survive the process: when the last session ended and how
//! much reward currency has been earned. Both are written together at
//! session end and only read at session boundaries (plus display polling).

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, StoreError};

/// Persisted cooldown/reward state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CooldownRecord {
    /// Unix timestamp (ms) of the last session end, `None` if never played
    pub last_session_end_ms: Option<u64>,
    /// Total reward currency earned; never decreases
    pub accumulated_reward: u64,
}

impl CooldownRecord {
    /// Time left before another session may start. Never played means no wait.
    pub fn remaining_ms(&self, now_ms: u64, cooldown_ms: u64) -> u64 {
        match self.last_session_end_ms {
            Some(last) => cooldown_ms.saturating_sub(now_ms.saturating_sub(last)),
            None => 0,
        }
    }

    pub fn can_start(&self, now_ms: u64, cooldown_ms: u64) -> bool {
        self.remaining_ms(now_ms, cooldown_ms) == 0
    }
}

/// Reward for a finished session: half the score, at least 1
pub fn reward_for_score(score: u32) -> u64 {
    (u64::from(score) / 2).max(1)
}

/// Cooldown gate backed by a key-value store
#[derive(Debug, Clone)]
pub struct CooldownStore<S> {
    store: S,
    cooldown_ms: u64,
}

impl<S: KeyValueStore> CooldownStore<S> {
    /// Storage keys
    pub const LAST_PLAY_KEY: &'static str = "lastPlayTimestamp";
    pub const REWARD_KEY: &'static str = "accumulatedRewardCurrency";

    pub fn new(store: S, cooldown_ms: u64) -> Self {
        Self { store, cooldown_ms }
    }

    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current record. Unreadable or malformed values count as absent.
    pub fn load(&self) -> CooldownRecord {
        CooldownRecord {
            last_session_end_ms: self.read_counter_lenient(Self::LAST_PLAY_KEY),
            accumulated_reward: self
                .read_counter_lenient(Self::REWARD_KEY)
                .unwrap_or(0),
        }
    }

    /// Pull-based countdown; safe to poll at any cadence
    pub fn remaining(&self, now_ms: u64) -> u64 {
        self.load().remaining_ms(now_ms, self.cooldown_ms)
    }

    pub fn can_start(&self, now_ms: u64) -> bool {
        self.remaining(now_ms) == 0
    }

    /// Stamp the session end and add `reward` to the running total.
    ///
    /// A failed read of the current total aborts before anything is written,
    /// so an outage can never overwrite a larger stored total. The timestamp
    /// is written first: if the batch breaks halfway the cooldown holds and
    /// the reward is the part that goes missing.
    pub fn record_session_end(
        &mut self,
        now_ms: u64,
        reward: u64,
    ) -> Result<CooldownRecord, StoreError> {
        let previous = self.read_counter(Self::REWARD_KEY)?.unwrap_or(0);
        let record = CooldownRecord {
            last_session_end_ms: Some(now_ms),
            accumulated_reward: previous.saturating_add(reward),
        };

        self.store.set_many(&[
            (Self::LAST_PLAY_KEY, now_ms.to_string()),
            (Self::REWARD_KEY, record.accumulated_reward.to_string()),
        ])?;

        log::info!(
            "Reward saved: +{} (total {})",
            reward,
            record.accumulated_reward
        );
        Ok(record)
    }

    /// Read a counter; malformed values are `Ok(None)`, storage errors pass through
    fn read_counter(&self, key: &str) -> Result<Option<u64>, StoreError> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        match raw.trim().parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                log::warn!("Ignoring malformed '{}' value: {:?}", key, raw);
                Ok(None)
            }
        }
    }

    fn read_counter_lenient(&self, key: &str) -> Option<u64> {
        self.read_counter(key).unwrap_or_else(|e| {
            log::warn!("Could not read '{}': {}", key, e);
            None
        })
    }
}
