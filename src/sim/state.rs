//! Game state, lifecycle phases, and the outbound event queue
//!
//! `GameState` owns everything the simulation touches: entities, the
//! player, score/lives/timer, power-up timers, and a queue of pending
//! timed transitions. Lifecycle commands (`start`, `toggle_pause`,
//! `return_to_menu`, ...) mutate the phase directly; timed follow-ups are
//! queued as `PendingAction`s with a due tick and fired from inside the
//! next `tick()`, so a cancelled transition can never land late.
//!
//! Side effects toward the embedder (sounds, music, HUD status, saves) are
//! push-only `GameEvent`s accumulated on the state and drained between
//! ticks; the core never reads anything back.

use log::{error, info};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::entity::{Bubble, Bullet, DropItem, DropKind, Laser, Particle, Wall};
use super::player::{Harpoon, Player};
use crate::consts::*;
use crate::levels::{self, LevelConfig};

/// Lifecycle phase of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No session running (menu)
    #[default]
    Idle,
    /// Level intro screen, gameplay not yet live
    Starting,
    Playing,
    Paused,
    /// Death freeze before respawn
    LifeLost,
    /// Victory freeze before the next level (or campaign end)
    LevelClear,
    /// Terminal; only `return_to_menu`/`restart` leave it
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundKind {
    Menu,
    Shoot,
    Pop,
    Powerup,
    Die,
    LevelUp,
    DoorOpen,
}

/// HUD status line keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusKey {
    #[default]
    Ready,
    Freeze,
    SlowMo,
    AutoGun,
    Hit,
    Crushed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BonusKind {
    Time,
    Combo,
    CeilingSpike,
}

/// One-way notifications to the embedder, drained via `drain_events`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundKind),
    MusicStarted,
    MusicStopped,
    VictoryJingle,
    Status(StatusKey),
    Bonus { kind: BonusKind, amount: u64 },
    LevelStarted(u32),
    GameOver { score: u64, level: u32 },
    /// Request to persist progress; `GameSession` routes this to the store
    Persist { level: u32, score: u64, unlock_next: bool },
}

/// Deferred lifecycle step, fired when `tick_count` reaches `due_tick`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingAction {
    /// Spawn the current level's entities and go live
    BeginPlay,
    /// Re-init the current level after a lost life
    Respawn,
    /// Campaign complete: back to the menu
    ReturnToMenu,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PendingTransition {
    pub due_tick: u64,
    pub action: PendingAction,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete simulation state; an owned value with no process-wide pieces,
/// so multiple sessions can coexist
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub tick_count: u64,
    pub level: u32,
    pub score: u64,
    pub lives: u32,
    /// Seconds left on the level clock
    pub time_remaining: u32,
    pub level_time_limit: u32,
    /// Ticks accumulated toward the next countdown second
    pub countdown_ticks: u32,

    pub player: Player,
    pub harpoon: Harpoon,
    pub bubbles: Vec<Bubble>,
    pub walls: Vec<Wall>,
    pub platforms: Vec<Rect>,
    pub ladders: Vec<Rect>,
    pub lasers: Vec<Laser>,
    pub bullets: Vec<Bullet>,
    pub drop_items: Vec<DropItem>,
    pub particles: Vec<Particle>,

    pub ceiling_spikes: bool,
    pub closing_wall_enabled: bool,
    pub closing_wall_x: f32,
    pub laser_frame_tick: u64,

    pub time_freeze_timer: u32,
    pub slow_mo_timer: u32,
    pub auto_gun_timer: u32,
    pub auto_gun_cooldown: u32,
    pub power_wire_drops_this_level: u32,
    pub power_wire_drop_cooldown: u32,
    pub combo_hits: u32,
    pub status: StatusKey,

    pub pending: Vec<PendingTransition>,
    pub events: Vec<GameEvent>,

    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self {
            phase: GamePhase::Idle,
            tick_count: 0,
            level: 1,
            score: 0,
            lives: STARTING_LIVES,
            time_remaining: BASE_TIME_SECS,
            level_time_limit: BASE_TIME_SECS,
            countdown_ticks: 0,
            player: Player::default(),
            harpoon: Harpoon::default(),
            bubbles: Vec::new(),
            walls: Vec::new(),
            platforms: Vec::new(),
            ladders: Vec::new(),
            lasers: Vec::new(),
            bullets: Vec::new(),
            drop_items: Vec::new(),
            particles: Vec::new(),
            ceiling_spikes: true,
            closing_wall_enabled: false,
            closing_wall_x: -CLOSING_WALL_WIDTH,
            laser_frame_tick: 0,
            time_freeze_timer: 0,
            slow_mo_timer: 0,
            auto_gun_timer: 0,
            auto_gun_cooldown: 0,
            power_wire_drops_this_level: 0,
            power_wire_drop_cooldown: 0,
            combo_hits: 0,
            status: StatusKey::Ready,
            pending: Vec::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Hand accumulated events to the embedder
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub(crate) fn set_status(&mut self, status: StatusKey) {
        if self.status != status {
            self.status = status;
            self.events.push(GameEvent::Status(status));
        }
    }

    // ---- timed transitions ----

    pub(crate) fn schedule(&mut self, action: PendingAction, delay_ticks: u32) {
        self.pending.push(PendingTransition {
            due_tick: self.tick_count + delay_ticks as u64,
            action,
        });
    }

    /// Drop every queued transition atomically
    pub fn cancel_transitions(&mut self) {
        self.pending.clear();
    }

    /// Fire every due transition in scheduling order. Called at the top of
    /// each tick so cancelled actions can never run.
    pub(crate) fn process_due_transitions(&mut self) {
        let mut index = 0;
        while index < self.pending.len() {
            if self.pending[index].due_tick <= self.tick_count {
                let action = self.pending.remove(index).action;
                self.apply_transition(action);
            } else {
                index += 1;
            }
        }
    }

    fn apply_transition(&mut self, action: PendingAction) {
        match action {
            PendingAction::BeginPlay => {
                if !self.init_level(self.level) {
                    self.return_to_menu();
                    return;
                }
                self.player.activate_invulnerability();
                self.phase = GamePhase::Playing;
                self.push_event(GameEvent::LevelStarted(self.level));
                self.push_event(GameEvent::MusicStarted);
            }
            PendingAction::Respawn => {
                self.player.reset();
                self.player.activate_invulnerability();
                self.harpoon.reset();
                if !self.init_level(self.level) {
                    self.return_to_menu();
                    return;
                }
                self.phase = GamePhase::Playing;
                self.push_event(GameEvent::MusicStarted);
            }
            PendingAction::ReturnToMenu => self.return_to_menu(),
        }
    }

    // ---- lifecycle commands ----

    /// Begin a fresh session at `start_level`. Resets score and lives and
    /// queues the level intro.
    pub fn start(&mut self, start_level: u32) {
        self.cancel_transitions();
        self.level = start_level;
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.combo_hits = 0;
        self.clear_level_entities();
        self.player.reset();
        self.harpoon.reset();

        if levels::level_config(start_level).is_none() {
            error!("invalid start level {start_level}");
            self.phase = GamePhase::Idle;
            return;
        }

        info!("session started at level {start_level}");
        self.phase = GamePhase::Starting;
        self.push_event(GameEvent::MusicStopped);
        self.push_event(GameEvent::Sound(SoundKind::Menu));
        self.schedule(PendingAction::BeginPlay, LEVEL_INTRO_TICKS);
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Playing => {
                self.phase = GamePhase::Paused;
                self.push_event(GameEvent::MusicStopped);
            }
            GamePhase::Paused => {
                self.phase = GamePhase::Playing;
                self.push_event(GameEvent::MusicStarted);
            }
            _ => {}
        }
    }

    /// Restart the current level from the pause screen
    pub fn restart_level(&mut self) {
        if self.phase != GamePhase::Paused {
            return;
        }
        self.player.reset();
        self.harpoon.reset();
        if self.init_level(self.level) {
            self.phase = GamePhase::Playing;
            self.push_event(GameEvent::MusicStarted);
        } else {
            self.return_to_menu();
        }
    }

    /// Abandon the session and cancel anything queued
    pub fn return_to_menu(&mut self) {
        self.cancel_transitions();
        self.phase = GamePhase::Idle;
        self.push_event(GameEvent::MusicStopped);
    }

    pub(crate) fn lose_life(&mut self, status: StatusKey) {
        self.lives = self.lives.saturating_sub(1);
        self.reset_combo();
        self.set_status(status);
        self.push_event(GameEvent::MusicStopped);
        self.push_event(GameEvent::Sound(SoundKind::Die));
        info!("life lost on level {}, {} remaining", self.level, self.lives);

        if self.lives == 0 {
            self.end_game();
        } else {
            self.phase = GamePhase::LifeLost;
            self.schedule(PendingAction::Respawn, RESPAWN_DELAY_TICKS);
        }
    }

    /// Last bubble popped: award the time bonus, bank progress, and queue
    /// either the next level or the campaign-complete exit
    pub(crate) fn level_cleared(&mut self) {
        let time_bonus = self.time_remaining as u64 * TIME_BONUS_PER_SEC;
        if time_bonus > 0 {
            self.score += time_bonus;
            self.push_event(GameEvent::Bonus {
                kind: BonusKind::Time,
                amount: time_bonus,
            });
        }

        if self.level >= levels::TOTAL_LEVELS {
            info!("campaign complete, final score {}", self.score);
            self.push_event(GameEvent::Persist {
                level: self.level,
                score: self.score,
                unlock_next: false,
            });
            self.phase = GamePhase::LevelClear;
            self.push_event(GameEvent::MusicStopped);
            self.push_event(GameEvent::VictoryJingle);
            self.schedule(PendingAction::ReturnToMenu, CAMPAIGN_COMPLETE_TICKS);
            return;
        }

        self.push_event(GameEvent::Persist {
            level: self.level,
            score: self.score,
            unlock_next: true,
        });
        self.level += 1;
        self.lives = (self.lives + 1).min(MAX_LIVES);
        self.phase = GamePhase::LevelClear;
        self.player.reset();
        self.harpoon.reset();
        self.push_event(GameEvent::MusicStopped);
        self.push_event(GameEvent::VictoryJingle);
        self.push_event(GameEvent::Sound(SoundKind::LevelUp));
        self.schedule(PendingAction::BeginPlay, LEVEL_CLEAR_DELAY_TICKS);
    }

    pub(crate) fn end_game(&mut self) {
        self.cancel_transitions();
        self.phase = GamePhase::GameOver;
        self.push_event(GameEvent::MusicStopped);
        self.push_event(GameEvent::Persist {
            level: self.level,
            score: self.score,
            unlock_next: false,
        });
        self.push_event(GameEvent::GameOver {
            score: self.score,
            level: self.level,
        });
    }

    // ---- level setup ----

    fn clear_level_entities(&mut self) {
        self.bubbles.clear();
        self.walls.clear();
        self.platforms.clear();
        self.ladders.clear();
        self.lasers.clear();
        self.bullets.clear();
        self.drop_items.clear();
        self.particles.clear();
        self.laser_frame_tick = 0;
        self.power_wire_drops_this_level = 0;
        self.power_wire_drop_cooldown = 0;
        self.time_freeze_timer = 0;
        self.slow_mo_timer = 0;
        self.auto_gun_timer = 0;
        self.auto_gun_cooldown = 0;
        self.combo_hits = 0;
        self.closing_wall_enabled = false;
        self.closing_wall_x = -CLOSING_WALL_WIDTH;
    }

    /// Instantiate level entities from the campaign data. False (with an
    /// `error!`) when the level does not exist.
    pub(crate) fn init_level(&mut self, level: u32) -> bool {
        self.clear_level_entities();
        self.set_status(StatusKey::Ready);

        let Some(config) = levels::level_config(level) else {
            error!("invalid level {level}");
            return false;
        };
        self.load_level_config(&config);
        self.level_time_limit = levels::time_limit_secs(level);
        self.time_remaining = self.level_time_limit;
        self.countdown_ticks = 0;
        true
    }

    fn load_level_config(&mut self, config: &LevelConfig) {
        for spawn in &config.bubbles {
            self.bubbles.push(Bubble::spawn(
                spawn.x,
                spawn.y,
                spawn.size,
                spawn.kind,
                0,
                &mut self.rng,
            ));
        }
        self.walls = config.walls.iter().map(Wall::new).collect();
        self.platforms = config.platforms.clone();
        self.ladders = config.ladders.clone();
        self.lasers = config.lasers.iter().map(Laser::new).collect();
        self.ceiling_spikes = config.ceiling_spikes;
        self.closing_wall_enabled = config.closing_wall;
        self.closing_wall_x = -CLOSING_WALL_WIDTH;
    }

    // ---- scoring ----

    pub(crate) fn register_combo_hit(&mut self) {
        self.combo_hits += 1;
        if self.combo_hits % COMBO_HIT_THRESHOLD == 0 {
            self.score += COMBO_BONUS;
            self.push_event(GameEvent::Bonus {
                kind: BonusKind::Combo,
                amount: COMBO_BONUS,
            });
        }
    }

    pub(crate) fn reset_combo(&mut self) {
        self.combo_hits = 0;
    }

    /// Size-proportional pop score; ceiling pops are not combo-eligible
    pub(crate) fn add_bubble_score(&mut self, size: u8, combo_eligible: bool) {
        self.score += size as u64 * SCORE_PER_BUBBLE_SIZE;
        if combo_eligible {
            self.register_combo_hit();
        }
    }

    // ---- power-ups and drops ----

    pub(crate) fn activate_time_freeze(&mut self) {
        self.time_freeze_timer = TIME_FREEZE_TICKS;
        self.set_status(StatusKey::Freeze);
    }

    pub(crate) fn activate_slow_mo(&mut self) {
        self.slow_mo_timer = SLOW_MO_TICKS;
        self.set_status(StatusKey::SlowMo);
    }

    pub(crate) fn activate_auto_gun(&mut self) {
        self.auto_gun_timer = AUTO_GUN_TICKS;
        self.auto_gun_cooldown = 0;
        self.set_status(StatusKey::AutoGun);
    }

    /// Bubble update speed factor for the current tick
    pub(crate) fn bubble_speed_scale(&self) -> f32 {
        if self.slow_mo_timer > 0 { SLOW_MO_FACTOR } else { 1.0 }
    }

    pub(crate) fn spawn_explosion(&mut self, x: f32, y: f32) {
        for _ in 0..15 {
            if self.particles.len() >= MAX_PARTICLES {
                break;
            }
            self.particles.push(Particle::burst(x, y, &mut self.rng));
        }
    }

    /// Roll a drop at a popped bubble's position. At most one drop item
    /// exists at a time; power wires have a per-level cap, a cooldown, and
    /// never respawn while one is active.
    pub(crate) fn maybe_spawn_drop(&mut self, x: f32, y: f32) {
        if !self.drop_items.is_empty() {
            return;
        }
        if self.rng.random_bool(AUTO_GUN_DROP_CHANCE) {
            self.drop_items.push(DropItem::new(x, y, DropKind::AutoGun));
            return;
        }
        if self.rng.random_bool(POWERUP_DROP_CHANCE) {
            let kind = if self.rng.random_bool(0.5) {
                DropKind::TimeFreeze
            } else {
                DropKind::SlowMo
            };
            self.drop_items.push(DropItem::new(x, y, kind));
            return;
        }

        if self.harpoon.power_wire_active {
            return;
        }
        if self.power_wire_drops_this_level >= POWER_WIRE_MAX_DROPS_PER_LEVEL
            || self.power_wire_drop_cooldown > 0
        {
            return;
        }
        if self.rng.random_bool(POWER_WIRE_DROP_CHANCE) {
            self.drop_items.push(DropItem::new(x, y, DropKind::PowerWire));
            self.power_wire_drops_this_level += 1;
            self.power_wire_drop_cooldown = POWER_WIRE_DROP_COOLDOWN;
        }
    }
}
