//! Session driver: frame clock and persistence boundary
//!
//! `GameSession` wraps a `GameState` with the fixed-timestep accumulator
//! (variable frame times in, whole ticks out, remainder carried over) and
//! routes `Persist` events to a `ProgressStore`. Rendering embedders call
//! `advance` once per frame with the elapsed wall-clock time.

use log::warn;

use super::state::{GameEvent, GameState};
use super::tick::{tick, TickInput};
use crate::consts::{MAX_SUBSTEPS, TICK_MS};
use crate::persistence::{Progress, ProgressStore};

pub struct GameSession<S: ProgressStore> {
    pub state: GameState,
    pub progress: Progress,
    store: S,
    accumulator_ms: f64,
}

impl<S: ProgressStore> GameSession<S> {
    pub fn new(seed: u64, mut store: S) -> Self {
        let progress = store.load();
        Self {
            state: GameState::new(seed),
            progress,
            store,
            accumulator_ms: 0.0,
        }
    }

    /// Start a session at `level` if the player has unlocked it
    pub fn start(&mut self, level: u32) -> bool {
        if !self.progress.is_unlocked(level) {
            return false;
        }
        self.state.start(level);
        true
    }

    /// Feed `elapsed_ms` of wall-clock time; runs as many whole ticks as
    /// fit (bounded by the substep cap) and carries the remainder. Returns
    /// the events produced this frame.
    pub fn advance(&mut self, elapsed_ms: f64, input: &TickInput) -> Vec<GameEvent> {
        self.accumulator_ms += elapsed_ms.max(0.0);

        let mut steps = 0;
        while self.accumulator_ms >= TICK_MS && steps < MAX_SUBSTEPS {
            tick(&mut self.state, input);
            self.accumulator_ms -= TICK_MS;
            steps += 1;
        }
        // After a long stall, drop the backlog instead of death-spiraling
        if steps == MAX_SUBSTEPS && self.accumulator_ms > TICK_MS {
            self.accumulator_ms = TICK_MS;
        }

        let events = self.state.drain_events();
        for event in &events {
            if let GameEvent::Persist {
                level,
                score,
                unlock_next,
            } = *event
            {
                self.progress.record(level, score, unlock_next);
                if let Err(err) = self.store.save(&self.progress) {
                    warn!("progress save failed: {err}");
                }
            }
        }
        events
    }
}
