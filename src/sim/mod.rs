//! Deterministic game simulation
//!
//! A fixed-timestep core with no rendering, audio, or IO inside it. The
//! embedder builds a `GameState` (or a `GameSession` for a ready-made
//! frame clock), feeds `TickInput`s, reads the state back between ticks,
//! and drains `GameEvent`s for sound/HUD/persistence side effects.
//!
//! All randomness flows through the state's seeded RNG, so a given seed
//! and input sequence always replays the same run.

pub mod collision;
pub mod entity;
pub mod player;
pub mod session;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use entity::{Bubble, BubbleKind, Bullet, DropItem, DropKind, Laser, Particle, Wall};
pub use player::{Harpoon, Player};
pub use session::GameSession;
pub use state::{
    BonusKind, GameEvent, GamePhase, GameState, PendingAction, SoundKind, StatusKey,
};
pub use tick::{tick, TickInput};
