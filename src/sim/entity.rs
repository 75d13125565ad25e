//! Game entities: bubbles, projectiles, drop items, particles, gates, lasers
//!
//! Each movable entity exposes an `update` that advances it one fixed tick.
//! Bubbles carry all variant behavior; variants are a tagged enum with a
//! per-variant constants profile instead of branching on type strings.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;

/// Behavior/appearance profile applied to a bubble at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BubbleKind {
    #[default]
    Standard,
    /// Much faster horizontal drift, slightly springier
    Fast,
    /// High gravity, low bounce
    Heavy,
    /// Low gravity, very springy
    Rubber,
    /// Jitters horizontally at random
    Ghost,
    /// Flips horizontal direction on a countdown
    Zigzag,
    /// Floaty, slow
    Drifter,
    /// Periodically unhittable
    PhaseShift,
    /// Requires two hits before splitting
    Armored,
    /// Speed pulses on a sinusoid
    Rhythm,
    /// Relocates to a random x on a countdown
    Teleport,
    /// Splits into three children instead of two
    Volatile,
}

/// Per-variant motion constants, resolved once at spawn
#[derive(Debug, Clone, Copy)]
pub struct KindProfile {
    pub gravity: f32,
    pub speed_x_mul: f32,
    pub bounce_mul: f32,
    pub armor_hits: u32,
}

impl BubbleKind {
    pub fn profile(self) -> KindProfile {
        use BubbleKind::*;
        let (gravity, speed_x_mul, bounce_mul, armor_hits) = match self {
            Standard => (0.3, 1.0, 1.0, 0),
            Fast => (0.3, 2.5, 1.1, 0),
            Heavy => (0.5, 1.0, 0.85, 0),
            Rubber => (0.22, 1.3, 1.25, 0),
            Ghost => (0.3, 1.2, 1.0, 0),
            Zigzag => (0.3, 1.7, 1.0, 0),
            Drifter => (0.18, 0.7, 1.0, 0),
            PhaseShift => (0.3, 1.2, 1.0, 0),
            Armored => (0.35, 1.1, 1.0, 2),
            Rhythm => (0.3, 1.3, 1.0, 0),
            Teleport => (0.3, 1.25, 1.0, 0),
            Volatile => (0.26, 1.45, 1.15, 0),
        };
        KindProfile {
            gravity,
            speed_x_mul,
            bounce_mul,
            armor_hits,
        }
    }
}

/// (radius, base bounce speed) per size tier 1..=4
const SIZE_TIERS: [(f32, f32); 4] = [(10.0, 7.0), (20.0, 8.5), (32.0, 10.0), (48.0, 11.0)];

/// Fraction of the tier bounce speed used as the floor-bounce minimum
const BASE_BOUNCE_SCALE: f32 = 0.85;

/// A splitting bubble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bubble {
    pub pos: Vec2,
    /// Previous tick position, kept for swept platform collision
    pub prev: Vec2,
    pub vel: Vec2,
    /// Size tier 1..=4; splitting decrements, tier 1 despawns
    pub size: u8,
    pub kind: BubbleKind,
    pub radius: f32,
    pub gravity: f32,
    pub min_bounce_speed: f32,
    pub max_bounce_speed: f32,
    pub hit_count: u32,
    pub armor_hits_required: u32,
    pub armor_flash_timer: f32,
    pub marked_for_removal: bool,
    pub hit_ceiling: bool,
    zigzag_timer: f32,
    pub phase_shift_active: bool,
    phase_shift_timer: f32,
    rhythm_phase: f32,
    teleport_timer: f32,
}

impl Bubble {
    pub fn spawn(x: f32, y: f32, size: u8, kind: BubbleKind, hit_count: u32, rng: &mut Pcg32) -> Self {
        let size = size.clamp(1, 4);
        let (radius, tier_bounce) = SIZE_TIERS[(size - 1) as usize];
        let profile = kind.profile();

        let mut bubble = Self {
            pos: Vec2::new(x, y),
            prev: Vec2::new(x, y),
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * 1.5 * profile.speed_x_mul,
                0.0,
            ),
            size,
            kind,
            radius,
            gravity: profile.gravity,
            min_bounce_speed: tier_bounce * BASE_BOUNCE_SCALE * profile.bounce_mul,
            max_bounce_speed: 0.0,
            hit_count,
            armor_hits_required: profile.armor_hits,
            armor_flash_timer: 0.0,
            marked_for_removal: false,
            hit_ceiling: false,
            zigzag_timer: 0.0,
            phase_shift_active: false,
            phase_shift_timer: 0.0,
            rhythm_phase: 0.0,
            teleport_timer: 0.0,
        };

        // Keep the spawn point inside the arena
        if bubble.pos.x - radius < 0.0 {
            bubble.pos.x = radius + 1.0;
        }
        if bubble.pos.x + radius > ARENA_WIDTH {
            bubble.pos.x = ARENA_WIDTH - radius - 1.0;
        }

        match kind {
            BubbleKind::Zigzag => bubble.zigzag_timer = rng.random_range(30.0..70.0),
            BubbleKind::PhaseShift => bubble.phase_shift_timer = rng.random_range(80.0..160.0),
            BubbleKind::Teleport => bubble.teleport_timer = rng.random_range(80.0..170.0),
            BubbleKind::Rhythm => bubble.rhythm_phase = rng.random_range(0.0..std::f32::consts::TAU),
            _ => {}
        }

        // Cap the bounce so the apex stays a little below the hazard line
        let bounce_margin = 10.0;
        let max_rise = ARENA_HEIGHT - radius - (CEILING_Y + radius + bounce_margin);
        let clamped_rise = max_rise.max(radius * 2.0);
        bubble.max_bounce_speed = (clamped_rise * 2.0 * bubble.gravity).sqrt();

        if bubble.vel.x.abs() < BUBBLE_MIN_SPAWN_SPEED_X {
            let sign = if rng.random::<f32>() < 0.5 { -1.0 } else { 1.0 };
            bubble.vel.x = BUBBLE_MIN_SPAWN_SPEED_X * sign;
        }

        bubble
    }

    /// Floor-bounce speed: grows with registered hits, capped per bubble
    pub fn bounce_speed(&self) -> f32 {
        (self.min_bounce_speed + self.hit_count as f32 * BOUNCE_GROWTH_PER_HIT)
            .min(self.max_bounce_speed)
    }

    /// Advance one tick. Variant timers scale with `speed_scale` (slow-mo)
    pub fn update(&mut self, speed_scale: f32, ceiling_spikes: bool, rng: &mut Pcg32) {
        let mut effective_scale = speed_scale;
        if self.kind == BubbleKind::Rhythm {
            self.rhythm_phase += 0.08 * speed_scale;
            let pulse = 0.7 + 0.6 * (0.5 + 0.5 * self.rhythm_phase.sin());
            effective_scale *= pulse;
        }

        self.prev = self.pos;
        self.pos += self.vel * effective_scale;

        if self.kind == BubbleKind::Ghost && rng.random::<f32>() < 0.02 {
            self.vel.x += (rng.random::<f32>() - 0.5) * 0.5;
        }

        // Never let a bubble stall horizontally
        if self.vel.x.abs() < BUBBLE_MIN_SPEED_X {
            self.vel.x = BUBBLE_MIN_SPEED_X * if self.vel.x < 0.0 { -1.0 } else { 1.0 };
        }

        if self.kind == BubbleKind::Zigzag {
            self.zigzag_timer -= speed_scale;
            if self.zigzag_timer <= 0.0 {
                self.vel.x = -self.vel.x;
                self.zigzag_timer = rng.random_range(25.0..55.0);
            }
        }

        if self.kind == BubbleKind::PhaseShift {
            self.phase_shift_timer -= speed_scale;
            if self.phase_shift_timer <= 0.0 {
                self.phase_shift_active = !self.phase_shift_active;
                self.phase_shift_timer = if self.phase_shift_active { 60.0 } else { 120.0 };
            }
        }

        if self.kind == BubbleKind::Teleport {
            self.teleport_timer -= speed_scale;
            if self.teleport_timer <= 0.0 {
                let margin = self.radius + 24.0;
                let span = (ARENA_WIDTH - margin * 2.0).max(1.0);
                self.pos.x = margin + rng.random::<f32>() * span;
                self.vel.x = -self.vel.x;
                self.teleport_timer = rng.random_range(70.0..150.0);
            }
        }

        if self.armor_flash_timer > 0.0 {
            self.armor_flash_timer -= speed_scale;
        }

        // Floor bounce or gravity
        if self.pos.y + self.radius >= ARENA_HEIGHT {
            self.pos.y = ARENA_HEIGHT - self.radius;
            self.vel.y = -self.bounce_speed();
        } else {
            self.vel.y += self.gravity * effective_scale;
        }

        // Ceiling: spikes flag the bubble for the combat pass to pop,
        // otherwise it bounces off the HUD line
        let ceiling_limit = if ceiling_spikes { CEILING_Y } else { HUD_HEIGHT };
        if self.pos.y - self.radius <= ceiling_limit {
            if ceiling_spikes {
                self.hit_ceiling = true;
            } else {
                self.pos.y = ceiling_limit + self.radius;
                self.vel.y = self.vel.y.abs();
            }
        }

        // Side walls reflect
        if self.pos.x - self.radius <= 0.0 {
            self.pos.x = self.radius;
            self.vel.x = self.vel.x.abs();
        }
        if self.pos.x + self.radius >= ARENA_WIDTH {
            self.pos.x = ARENA_WIDTH - self.radius;
            self.vel.x = -self.vel.x.abs();
        }
    }

    /// Phase-shifted bubbles are temporarily immune while shifted
    pub fn is_hittable(&self) -> bool {
        !(self.kind == BubbleKind::PhaseShift && self.phase_shift_active)
    }

    /// Register a weapon hit. Returns true when the bubble yields (splits)
    pub fn register_hit(&mut self) -> bool {
        self.hit_count += 1;
        if self.kind == BubbleKind::Armored {
            self.armor_flash_timer = 16.0;
            return self.hit_count >= self.armor_hits_required;
        }
        true
    }

    /// Split into children one tier smaller. Tier 1 yields nothing.
    ///
    /// Armored parents reset their children's hit count so armor is not
    /// inherited pre-damaged.
    pub fn split(&self, rng: &mut Pcg32) -> Vec<Bubble> {
        if self.size <= 1 {
            return Vec::new();
        }
        let child_hits = if self.kind == BubbleKind::Armored {
            0
        } else {
            self.hit_count
        };
        let kick = if self.kind == BubbleKind::Fast { 1.8 * 1.5 } else { 1.8 };

        let mut left = Bubble::spawn(
            self.pos.x - 24.0,
            self.pos.y - 16.0,
            self.size - 1,
            self.kind,
            child_hits,
            rng,
        );
        let mut right = Bubble::spawn(
            self.pos.x + 24.0,
            self.pos.y - 16.0,
            self.size - 1,
            self.kind,
            child_hits,
            rng,
        );
        left.vel = Vec2::new(-kick, -left.bounce_speed());
        right.vel = Vec2::new(kick, -right.bounce_speed());

        if self.kind == BubbleKind::Volatile {
            let mut mid = Bubble::spawn(
                self.pos.x,
                self.pos.y - 22.0,
                self.size - 1,
                self.kind,
                child_hits,
                rng,
            );
            mid.vel = Vec2::new((rng.random::<f32>() - 0.5) * 2.4, -mid.bounce_speed());
            return vec![left, right, mid];
        }
        vec![left, right]
    }
}

/// A vertical gate wall with a door that opens once its unlock region is
/// clear of bubbles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub x: f32,
    pub width: f32,
    pub door_y: f32,
    pub door_height: f32,
    pub door_clearance: f32,
    /// Bubbles overlapping [x_min, x_max] keep the gate locked
    pub unlock_region: (f32, f32),
    pub unlocked: bool,
    /// 0 = closed, 1 = fully open; interpolates after unlocking
    pub open_progress: f32,
    open_speed: f32,
}

impl Wall {
    pub fn new(config: &crate::levels::WallConfig) -> Self {
        let door_height = config.door_height.unwrap_or(PLAYER_HEIGHT + 28.0);
        Self {
            x: config.x,
            width: config.width.unwrap_or(18.0),
            door_y: config.door_y.unwrap_or(ARENA_HEIGHT - door_height),
            door_height,
            door_clearance: config.door_clearance.unwrap_or(6.0),
            unlock_region: config.unlock_region.unwrap_or((0.0, ARENA_WIDTH)),
            unlocked: false,
            open_progress: 0.0,
            open_speed: 0.05,
        }
    }

    /// Evaluate the unlock condition and advance the door. Returns true on
    /// the tick the door starts opening (for the door-open sound).
    pub fn update(&mut self, bubbles: &[Bubble]) -> bool {
        if !self.unlocked {
            if bubbles.is_empty() {
                self.unlocked = true;
                self.open_progress = 1.0;
            } else {
                let (x_min, x_max) = self.unlock_region;
                let blocked = bubbles.iter().any(|b| {
                    b.pos.x + b.radius > x_min && b.pos.x - b.radius < x_max
                });
                if !blocked {
                    self.unlocked = true;
                }
            }
        }

        if self.unlocked && self.open_progress < 1.0 {
            let opening_started = self.open_progress == 0.0;
            self.open_progress = (self.open_progress + self.open_speed).min(1.0);
            return opening_started;
        }
        false
    }

    /// Blocking rectangles derived from door geometry and open progress:
    /// top segment, bottom segment, and the shrinking door segment (0-3)
    pub fn blocking_rects(&self) -> Vec<Rect> {
        let mut rects = Vec::with_capacity(3);
        let top_height = (self.door_y - CEILING_Y - self.door_clearance).max(0.0);
        if top_height > 0.0 {
            rects.push(Rect::new(self.x, CEILING_Y, self.width, top_height));
        }

        let bottom_start = self.door_y + self.door_height + self.door_clearance;
        let bottom_height = (ARENA_HEIGHT - bottom_start).max(0.0);
        if bottom_height > 0.0 {
            rects.push(Rect::new(self.x, bottom_start, self.width, bottom_height));
        }

        if !self.unlocked || self.open_progress < 1.0 {
            let open_offset = self.door_height * self.open_progress / 2.0;
            let block_height = self.door_height * (1.0 - self.open_progress);
            rects.push(Rect::new(
                self.x,
                self.door_y + open_offset,
                self.width,
                block_height,
            ));
        }
        rects
    }
}

/// Auto-gun projectile, travels straight up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub radius: f32,
    pub active: bool,
}

impl Bullet {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            radius: BULLET_RADIUS,
            active: true,
        }
    }

    pub fn update(&mut self, speed_scale: f32) {
        self.pos.y -= BULLET_SPEED * speed_scale;
        if self.pos.y + self.radius < CEILING_Y {
            self.active = false;
        }
    }
}

/// Power-up kinds dropped by popped bubbles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DropKind {
    PowerWire,
    TimeFreeze,
    SlowMo,
    AutoGun,
}

/// A falling power-up pickup with a grounded lifetime budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropItem {
    pub pos: Vec2,
    pub kind: DropKind,
    pub size: f32,
    pub life_ticks: i32,
}

impl DropItem {
    pub fn new(x: f32, y: f32, kind: DropKind) -> Self {
        Self {
            pos: Vec2::new(x, y),
            kind,
            size: DROP_SIZE,
            life_ticks: DROP_LIFETIME_TICKS,
        }
    }

    /// Fall toward the floor line; once resting the lifetime ticks down.
    /// Returns false when expired.
    pub fn update(&mut self) -> bool {
        let floor = ARENA_HEIGHT - DROP_FLOOR_MARGIN;
        if self.pos.y < floor {
            self.pos.y += DROP_FALL_SPEED;
        } else {
            self.pos.y = floor;
            self.life_ticks -= 1;
        }
        self.life_ticks > 0
    }

    /// Pickup test against the player's body center
    pub fn touches_player(&self, player_center: Vec2) -> bool {
        self.pos.distance(player_center) < self.size + 16.0
    }
}

/// Cosmetic explosion fragment; never affects gameplay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub life: f32,
    pub decay: f32,
}

impl Particle {
    pub fn burst(x: f32, y: f32, rng: &mut Pcg32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * 8.0,
                (rng.random::<f32>() - 0.5) * 8.0,
            ),
            radius: rng.random::<f32>() * 3.0 + 1.0,
            life: 1.0,
            decay: rng.random::<f32>() * 0.02 + 0.02,
        }
    }

    pub fn update(&mut self, speed_scale: f32) -> bool {
        self.pos += self.vel * speed_scale;
        self.life -= self.decay;
        self.life > 0.0
    }
}

/// A timed laser beam; toggles on a modular frame-count cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    pub rect: Rect,
    pub interval: u32,
    pub active_frames: u32,
    pub phase: u32,
    pub active: bool,
}

impl Laser {
    pub fn new(config: &crate::levels::LaserConfig) -> Self {
        let y = config.y.unwrap_or(HUD_HEIGHT);
        Self {
            rect: Rect::new(
                config.x,
                y,
                config.width.unwrap_or(10.0),
                config.height.unwrap_or(ARENA_HEIGHT - y),
            ),
            interval: config.interval.unwrap_or(180).max(30),
            active_frames: config.active_frames.unwrap_or(80).max(10),
            phase: config.phase.unwrap_or(0),
            active: false,
        }
    }

    /// `active` at tick t is `(t + phase) % interval < active_frames`
    pub fn update(&mut self, tick: u64) {
        let cycle = self.interval.max(1) as u64;
        self.active = (tick + self.phase as u64) % cycle < self.active_frames as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    #[test]
    fn test_split_yields_smaller_children() {
        let mut rng = rng();
        let parent = Bubble::spawn(400.0, 160.0, 4, BubbleKind::Standard, 0, &mut rng);
        let children = parent.split(&mut rng);
        assert_eq!(children.len(), 2);
        for child in &children {
            assert_eq!(child.size, 3);
            assert!(child.radius < parent.radius);
            assert!(child.vel.y <= 0.0);
            assert!(-child.vel.y <= parent.max_bounce_speed);
        }
        // Children launch in opposing horizontal directions
        assert!(children[0].vel.x < 0.0 && children[1].vel.x > 0.0);
    }

    #[test]
    fn test_size_one_never_splits() {
        let mut rng = rng();
        let bubble = Bubble::spawn(100.0, 300.0, 1, BubbleKind::Rubber, 3, &mut rng);
        assert!(bubble.split(&mut rng).is_empty());
    }

    #[test]
    fn test_volatile_splits_into_three() {
        let mut rng = rng();
        let parent = Bubble::spawn(400.0, 300.0, 3, BubbleKind::Volatile, 0, &mut rng);
        assert_eq!(parent.split(&mut rng).len(), 3);
    }

    #[test]
    fn test_armored_two_hit_gate() {
        let mut rng = rng();
        let mut bubble = Bubble::spawn(400.0, 300.0, 3, BubbleKind::Armored, 0, &mut rng);
        assert!(!bubble.register_hit());
        assert!(bubble.armor_flash_timer > 0.0);
        assert!(bubble.register_hit());
        for child in bubble.split(&mut rng) {
            assert_eq!(child.hit_count, 0);
        }
    }

    #[test]
    fn test_floor_bounce_capped() {
        let mut rng = rng();
        let mut bubble = Bubble::spawn(400.0, ARENA_HEIGHT - 5.0, 2, BubbleKind::Standard, 50, &mut rng);
        bubble.vel.y = 5.0;
        bubble.update(1.0, true, &mut rng);
        assert!((-bubble.vel.y - bubble.max_bounce_speed).abs() < 1e-4);
    }

    #[test]
    fn test_ceiling_spikes_flag_bubble() {
        let mut rng = rng();
        let mut bubble = Bubble::spawn(400.0, CEILING_Y + 30.0, 2, BubbleKind::Standard, 0, &mut rng);
        bubble.vel.y = -40.0;
        bubble.update(1.0, true, &mut rng);
        assert!(bubble.hit_ceiling);
        // Scoring and removal belong to the combat pass, not motion
        assert!(!bubble.marked_for_removal);
    }

    #[test]
    fn test_ceiling_bounce_when_spikes_disabled() {
        let mut rng = rng();
        let mut bubble = Bubble::spawn(400.0, HUD_HEIGHT + 25.0, 2, BubbleKind::Standard, 0, &mut rng);
        bubble.vel.y = -40.0;
        bubble.update(1.0, false, &mut rng);
        assert!(!bubble.marked_for_removal);
        assert!(bubble.vel.y > 0.0);
        assert!(bubble.pos.y - bubble.radius >= HUD_HEIGHT - 1e-3);
    }

    #[test]
    fn test_phase_shift_immunity() {
        let mut rng = rng();
        let mut bubble = Bubble::spawn(400.0, 300.0, 2, BubbleKind::PhaseShift, 0, &mut rng);
        assert!(bubble.is_hittable());
        bubble.phase_shift_active = true;
        assert!(!bubble.is_hittable());
    }

    #[test]
    fn test_wall_unlocks_when_region_clear() {
        let mut rng = rng();
        let config = crate::levels::WallConfig {
            x: 520.0,
            unlock_region: Some((0.0, 520.0)),
            ..Default::default()
        };
        let mut wall = Wall::new(&config);
        let blocker = Bubble::spawn(300.0, 300.0, 2, BubbleKind::Standard, 0, &mut rng);
        let outside = Bubble::spawn(700.0, 300.0, 2, BubbleKind::Standard, 0, &mut rng);

        wall.update(&[blocker]);
        assert!(!wall.unlocked);

        let opened = wall.update(std::slice::from_ref(&outside));
        assert!(wall.unlocked);
        assert!(opened);

        // Progress is monotone and unlock never reverts
        let mut last = wall.open_progress;
        for _ in 0..40 {
            wall.update(std::slice::from_ref(&outside));
            assert!(wall.unlocked);
            assert!(wall.open_progress >= last);
            last = wall.open_progress;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn test_wall_blocking_rects_shrink_with_door() {
        // Door at floor level: top segment + closed door, no bottom segment
        let floor_door = Wall::new(&crate::levels::WallConfig {
            x: 400.0,
            ..Default::default()
        });
        assert_eq!(floor_door.blocking_rects().len(), 2);

        // Raised door: all three segments while closed
        let mut raised = Wall::new(&crate::levels::WallConfig {
            x: 400.0,
            door_y: Some(400.0),
            ..Default::default()
        });
        assert_eq!(raised.blocking_rects().len(), 3);

        raised.unlocked = true;
        raised.open_progress = 1.0;
        // Fully open: door segment gone
        assert_eq!(raised.blocking_rects().len(), 2);
    }

    #[test]
    fn test_bullet_dies_past_hazard_line() {
        let mut bullet = Bullet::new(400.0, CEILING_Y + 5.0);
        bullet.update(1.0);
        assert!(!bullet.active);
    }

    #[test]
    fn test_drop_item_rests_then_expires() {
        let mut item = DropItem::new(400.0, ARENA_HEIGHT - DROP_FLOOR_MARGIN - 1.0, DropKind::SlowMo);
        // One step overshoots the floor line, the next clamps to it
        assert!(item.update());
        assert!(item.update());
        assert_eq!(item.pos.y, ARENA_HEIGHT - DROP_FLOOR_MARGIN);
        item.life_ticks = 1;
        assert!(!item.update());
    }

    #[test]
    fn test_laser_cycle() {
        let config = crate::levels::LaserConfig {
            x: 100.0,
            interval: Some(100),
            active_frames: Some(30),
            phase: Some(10),
            ..Default::default()
        };
        let mut laser = Laser::new(&config);
        for t in 0..300u64 {
            laser.update(t);
            assert_eq!(laser.active, (t + 10) % 100 < 30);
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn any_kind() -> impl Strategy<Value = BubbleKind> {
            use BubbleKind::*;
            prop_oneof![
                Just(Standard),
                Just(Fast),
                Just(Heavy),
                Just(Rubber),
                Just(Ghost),
                Just(Zigzag),
                Just(Drifter),
                Just(PhaseShift),
                Just(Armored),
                Just(Rhythm),
                Just(Teleport),
                Just(Volatile),
            ]
        }

        proptest! {
            #[test]
            fn split_children_are_one_tier_smaller(
                seed in 0u64..1000,
                size in 2u8..=4,
                kind in any_kind(),
                x in 60f32..740.0,
                y in 120f32..600.0,
            ) {
                let mut rng = Pcg32::seed_from_u64(seed);
                let parent = Bubble::spawn(x, y, size, kind, 0, &mut rng);
                let children = parent.split(&mut rng);
                let expected = if kind == BubbleKind::Volatile { 3 } else { 2 };
                prop_assert_eq!(children.len(), expected);
                for child in &children {
                    prop_assert_eq!(child.size, size - 1);
                    prop_assert!(child.vel.y <= 0.0);
                    prop_assert!(-child.vel.y <= child.max_bounce_speed + 1e-3);
                }
            }

            #[test]
            fn bounce_speed_grows_with_hits_and_caps(
                seed in 0u64..1000,
                size in 1u8..=4,
                kind in any_kind(),
            ) {
                let mut rng = Pcg32::seed_from_u64(seed);
                let mut bubble = Bubble::spawn(400.0, 300.0, size, kind, 0, &mut rng);
                let mut last = bubble.bounce_speed();
                for hits in 1..40u32 {
                    bubble.hit_count = hits;
                    let speed = bubble.bounce_speed();
                    prop_assert!(speed >= last);
                    prop_assert!(speed <= bubble.max_bounce_speed + 1e-3);
                    last = speed;
                }
            }

            #[test]
            fn laser_cycle_is_deterministic(
                interval in 30u32..400,
                active_frames in 10u32..200,
                phase in 0u32..400,
                tick in 0u64..100_000,
            ) {
                let config = crate::levels::LaserConfig {
                    x: 100.0,
                    interval: Some(interval),
                    active_frames: Some(active_frames),
                    phase: Some(phase),
                    ..Default::default()
                };
                let mut a = Laser::new(&config);
                let mut b = Laser::new(&config);
                a.update(tick);
                b.update(tick);
                prop_assert_eq!(a.active, b.active);
                prop_assert_eq!(
                    a.active,
                    (tick + phase as u64) % (interval as u64) < active_frames as u64
                );
            }
        }
    }
}
