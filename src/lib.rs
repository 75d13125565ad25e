//! Bubble Byte - simulation core for a bubble-popping arcade platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, physics, collisions, the
//!   level/session state machine, and the fixed-timestep driver)
//! - `levels`: Pure level data provider (campaign layouts)
//! - `persistence`: Progress save/load with graceful degradation
//! - `settings`: Player preferences

pub mod levels;
pub mod persistence;
pub mod settings;
pub mod sim;

pub use persistence::{Progress, ProgressStore};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second (one tick = one fixed step)
    pub const TICK_RATE: u32 = 60;
    /// Fixed step duration in milliseconds
    pub const TICK_MS: f64 = 1000.0 / TICK_RATE as f64;
    /// Maximum catch-up steps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions (pixels)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 700.0;
    /// Bottom edge of the HUD strip; bubbles bounce here when spikes are off
    pub const HUD_HEIGHT: f32 = 50.0;
    /// Spiked ceiling line (hazard boundary when spikes are enabled)
    pub const CEILING_Y: f32 = 70.0;

    /// Player defaults - velocities are pixels per tick
    pub const PLAYER_WIDTH: f32 = 26.0;
    pub const PLAYER_HEIGHT: f32 = 40.0;
    pub const PLAYER_SPEED: f32 = 4.2;
    pub const PLAYER_ACCEL: f32 = 0.45;
    pub const PLAYER_FRICTION: f32 = 0.82;
    pub const PLAYER_GRAVITY: f32 = 0.55;
    pub const PLAYER_MAX_FALL_SPEED: f32 = 10.0;
    pub const PLAYER_CLIMB_SPEED: f32 = 3.0;
    pub const PLAYER_INVULNERABLE_TICKS: u32 = 120;

    /// Projectiles
    pub const HARPOON_SPEED: f32 = 9.0;
    pub const HARPOON_HALF_WIDTH: f32 = 3.0;
    pub const BULLET_SPEED: f32 = 10.0;
    pub const BULLET_RADIUS: f32 = 4.0;

    /// Power-wire beam (full-height, timed)
    pub const POWER_WIRE_DURATION: u32 = 480;
    pub const POWER_WIRE_HALF_WIDTH: f32 = 5.0;

    /// Bubble bounce speed grows with registered hits, capped per bubble
    pub const BOUNCE_GROWTH_PER_HIT: f32 = 1.2;
    /// Horizontal speed floors (spawn / steady-state)
    pub const BUBBLE_MIN_SPAWN_SPEED_X: f32 = 0.6;
    pub const BUBBLE_MIN_SPEED_X: f32 = 0.4;

    /// Level timer (seconds)
    pub const BASE_TIME_SECS: u32 = 60;
    pub const TIME_BONUS_PER_5_LEVELS: u32 = 10;

    /// Scoring
    pub const SCORE_PER_BUBBLE_SIZE: u64 = 25;
    pub const TIME_BONUS_PER_SEC: u64 = 10;
    pub const CEILING_SPIKE_BONUS: u64 = 75;
    pub const COMBO_HIT_THRESHOLD: u32 = 5;
    pub const COMBO_BONUS: u64 = 250;

    /// Power-up timers (ticks)
    pub const TIME_FREEZE_TICKS: u32 = 300;
    pub const SLOW_MO_TICKS: u32 = 360;
    pub const SLOW_MO_FACTOR: f32 = 0.45;
    pub const AUTO_GUN_TICKS: u32 = 420;
    pub const AUTO_GUN_FIRE_INTERVAL: u32 = 18;

    /// Drop items
    pub const DROP_LIFETIME_TICKS: i32 = 600;
    pub const DROP_FALL_SPEED: f32 = 3.0;
    pub const DROP_FLOOR_MARGIN: f32 = 25.0;
    pub const DROP_SIZE: f32 = 20.0;
    pub const AUTO_GUN_DROP_CHANCE: f64 = 0.05;
    pub const POWERUP_DROP_CHANCE: f64 = 0.08;
    pub const POWER_WIRE_DROP_CHANCE: f64 = 0.3;
    pub const POWER_WIRE_MAX_DROPS_PER_LEVEL: u32 = 2;
    pub const POWER_WIRE_DROP_COOLDOWN: u32 = 240;

    /// Closing-wall hazard
    pub const CLOSING_WALL_WIDTH: f32 = 24.0;
    pub const CLOSING_WALL_LERP: f32 = 0.16;

    /// Session
    pub const STARTING_LIVES: u32 = 3;
    pub const MAX_LIVES: u32 = 5;

    /// Timed transition delays (ticks)
    pub const LEVEL_INTRO_TICKS: u32 = 120;
    pub const RESPAWN_DELAY_TICKS: u32 = 90;
    pub const LEVEL_CLEAR_DELAY_TICKS: u32 = 120;
    pub const CAMPAIGN_COMPLETE_TICKS: u32 = 180;

    /// Maximum explosion particles kept alive
    pub const MAX_PARTICLES: usize = 256;
}
