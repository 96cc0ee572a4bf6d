//! Session lifecycle
//!
//! `Idle → Selecting → Running → Ended → Idle`. The controller owns the
//! simulation world while a session runs, feeds it host input through a
//! single event queue drained once per step, keeps score, runs the
//! wall-clock match countdown and pays out the reward at the end.
//!
//! All time values are passed in by the host (`now_ms`, epoch ms), so the
//! countdown and cooldown follow real time even when steps are paused or
//! dropped.

use std::collections::VecDeque;

use serde::Serialize;
use thiserror::Error;

use crate::ceil_secs;
use crate::characters::Character;
use crate::cooldown::{CooldownStore, reward_for_score};
use crate::persistence::KeyValueStore;
use crate::settings::Settings;
use crate::sim::{GameEvent, PlayArea, PointerSample, TickInput, World, tick};

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SessionStatus {
    #[default]
    Idle,
    /// Waiting for a character pick
    Selecting,
    Running,
    /// Transient: reward being persisted
    Ended,
}

/// Why a start request was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("cooldown active, {remaining_ms} ms left")]
    CooldownActive { remaining_ms: u64 },
    #[error("cannot start while {status:?}")]
    NotIdle { status: SessionStatus },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no character selection in progress (status {status:?})")]
    NotSelecting { status: SessionStatus },
    #[error("play area must have a positive, finite size")]
    InvalidPlayArea,
}

/// Inbound host events, consumed at the start of the next step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Pointer(PointerSample),
    /// Explicit finish (win button, navigating away)
    End,
}

/// Visible session state
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    pub status: SessionStatus,
    pub score: u32,
    pub remaining_ms: u64,
    pub character: Option<Character>,
}

/// Result of a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionOutcome {
    pub character: Character,
    pub score: u32,
    pub reward: u64,
    /// Running total after this session; `None` if the write failed
    pub total_reward: Option<u64>,
    pub ended_at_ms: u64,
}

impl SessionOutcome {
    pub fn persisted(&self) -> bool {
        self.total_reward.is_some()
    }
}

/// What a single step produced
#[derive(Debug, Clone, Default)]
pub struct StepReport {
    pub events: Vec<GameEvent>,
    /// Set when the session ended during this step
    pub outcome: Option<SessionOutcome>,
}

/// Owns the session state machine and the cooldown store
pub struct SessionController<S> {
    settings: Settings,
    cooldown: CooldownStore<S>,
    session: Session,
    world: Option<World>,
    started_at_ms: u64,
    last_refresh_ms: u64,
    queue: VecDeque<HostEvent>,
    next_seed: u64,
    last_outcome: Option<SessionOutcome>,
}

impl<S: KeyValueStore> SessionController<S> {
    pub fn new(store: S, settings: Settings, seed: u64) -> Self {
        let settings = settings.sanitized();
        Self {
            cooldown: CooldownStore::new(store, settings.cooldown_ms),
            settings,
            session: Session::default(),
            world: None,
            started_at_ms: 0,
            last_refresh_ms: 0,
            queue: VecDeque::new(),
            next_seed: seed,
            last_outcome: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status
    }

    /// Simulation state; `None` unless running
    pub fn world(&self) -> Option<&World> {
        self.world.as_ref()
    }

    pub fn cooldown(&self) -> &CooldownStore<S> {
        &self.cooldown
    }

    pub fn last_outcome(&self) -> Option<&SessionOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn can_start(&self, now_ms: u64) -> bool {
        self.cooldown.can_start(now_ms)
    }

    pub fn cooldown_remaining_ms(&self, now_ms: u64) -> u64 {
        self.cooldown.remaining(now_ms)
    }

    /// Whole seconds left in the match (for the HUD)
    pub fn remaining_secs(&self) -> u64 {
        ceil_secs(self.session.remaining_ms)
    }

    /// `Idle → Selecting`, gated by the cooldown
    pub fn request_start(&mut self, now_ms: u64) -> Result<(), StartError> {
        if self.session.status != SessionStatus::Idle {
            return Err(StartError::NotIdle {
                status: self.session.status,
            });
        }

        let remaining_ms = self.cooldown.remaining(now_ms);
        if remaining_ms > 0 {
            log::info!("Start rejected, cooldown {} ms left", remaining_ms);
            return Err(StartError::CooldownActive { remaining_ms });
        }

        self.set_status(SessionStatus::Selecting);
        Ok(())
    }

    /// `Selecting → Idle` with no side effects. Returns false if there was
    /// nothing to cancel.
    pub fn cancel_selection(&mut self) -> bool {
        if self.session.status != SessionStatus::Selecting {
            return false;
        }
        self.set_status(SessionStatus::Idle);
        true
    }

    /// `Selecting → Running`: build the world and start the countdown
    pub fn select_character(
        &mut self,
        character: Character,
        area: PlayArea,
        now_ms: u64,
    ) -> Result<(), SessionError> {
        if self.session.status != SessionStatus::Selecting {
            return Err(SessionError::NotSelecting {
                status: self.session.status,
            });
        }
        if !area.is_valid() {
            return Err(SessionError::InvalidPlayArea);
        }

        let seed = self.next_seed;
        self.next_seed = self.next_seed.wrapping_add(0x9E37_79B9_7F4A_7C15);

        self.world = Some(World::new(seed, area, character, &self.settings));
        self.queue.clear();
        self.started_at_ms = now_ms;
        self.last_refresh_ms = now_ms;
        self.session = Session {
            status: SessionStatus::Selecting,
            score: 0,
            remaining_ms: self.settings.match_duration_ms,
            character: Some(character),
        };
        self.set_status(SessionStatus::Running);
        log::info!("Session started as {} (seed {})", character, seed);
        Ok(())
    }

    /// Queue a host event for the next step. Ignored unless running.
    pub fn push_event(&mut self, event: HostEvent) {
        if self.session.status == SessionStatus::Running {
            self.queue.push_back(event);
        }
    }

    pub fn push_pointer(&mut self, page_x: f32, page_y: f32) {
        self.push_event(HostEvent::Pointer(PointerSample::new(page_x, page_y)));
    }

    /// Advance one step of `dt` seconds at wall time `now_ms`
    pub fn step(&mut self, now_ms: u64, dt: f32) -> StepReport {
        let mut report = StepReport::default();
        if self.session.status != SessionStatus::Running {
            return report;
        }

        let mut input = TickInput::default();
        let mut end_requested = false;
        while let Some(event) = self.queue.pop_front() {
            match event {
                HostEvent::Pointer(sample) => input.pointer.push(sample),
                HostEvent::End => end_requested = true,
            }
        }

        if end_requested {
            report.outcome = self.end_session(now_ms);
            return report;
        }

        // Past the deadline nothing more is simulated or scored
        if now_ms.saturating_sub(self.started_at_ms) >= self.settings.match_duration_ms {
            report.outcome = self.poll_countdown(now_ms);
            return report;
        }

        if let Some(world) = self.world.as_mut() {
            report.events = tick(world, &input, dt, &self.settings);
        }
        for event in &report.events {
            if let GameEvent::Caught { value, .. } = event {
                self.session.score = self.session.score.saturating_add(*value);
            }
        }

        report.outcome = self.poll_countdown(now_ms);
        report
    }

    /// Refresh the countdown from wall time and end the match once it runs
    /// out. The host may call this from its own timer as well as from
    /// `step`, so a paused render loop cannot stall the match.
    pub fn poll_countdown(&mut self, now_ms: u64) -> Option<SessionOutcome> {
        if self.session.status != SessionStatus::Running {
            return None;
        }

        let elapsed = now_ms.saturating_sub(self.started_at_ms);
        let expired = elapsed >= self.settings.match_duration_ms;
        let refresh_due =
            now_ms.saturating_sub(self.last_refresh_ms) >= self.settings.countdown_refresh_ms;

        if refresh_due || expired {
            self.last_refresh_ms = now_ms;
            self.session.remaining_ms = self.settings.match_duration_ms.saturating_sub(elapsed);
        }

        if self.session.remaining_ms == 0 {
            return self.end_session(now_ms);
        }
        None
    }

    /// `Running → Ended → Idle`: pay out, persist, tear down.
    ///
    /// Returns `None` when no session is running, so a second end (timeout
    /// racing a manual finish) neither writes nor pays twice.
    pub fn end_session(&mut self, now_ms: u64) -> Option<SessionOutcome> {
        if self.session.status != SessionStatus::Running {
            return None;
        }
        self.set_status(SessionStatus::Ended);

        let score = self.session.score;
        let reward = reward_for_score(score);
        let total_reward = match self.cooldown.record_session_end(now_ms, reward) {
            Ok(record) => Some(record.accumulated_reward),
            Err(e) => {
                log::error!("Failed to save reward ({}); keeping result in memory", e);
                None
            }
        };

        if let Some(mut world) = self.world.take() {
            world.teardown();
        }
        self.queue.clear();
        self.session.remaining_ms = 0;

        let outcome = SessionOutcome {
            character: self.session.character.unwrap_or_default(),
            score,
            reward,
            total_reward,
            ended_at_ms: now_ms,
        };
        log::info!("Session over: score {} → reward {}", score, reward);
        self.last_outcome = Some(outcome);

        self.set_status(SessionStatus::Idle);
        Some(outcome)
    }

    /// Host screen went away: cancel a pending pick or finish a running match
    pub fn leave(&mut self, now_ms: u64) -> Option<SessionOutcome> {
        match self.session.status {
            SessionStatus::Selecting => {
                self.cancel_selection();
                None
            }
            SessionStatus::Running => self.end_session(now_ms),
            SessionStatus::Idle | SessionStatus::Ended => None,
        }
    }

    fn set_status(&mut self, status: SessionStatus) {
        log::info!("Session {:?} -> {:?}", self.session.status, status);
        self.session.status = status;
    }
}
