//! Player kinematics and the harpoon weapon
//!
//! The player is a rectangle addressed by center-x / top-y. Horizontal
//! motion is acceleration toward a target speed with friction when idle;
//! vertical motion is gravity with a fall cap, or fixed-rate climbing while
//! latched to a ladder. The harpoon is a vertical cable that rises from the
//! player until it hits something or reaches the hazard line; the power
//! wire is its timed full-height upgrade.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::entity::Bubble;
use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Horizontal center
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Top edge on the previous tick, kept for swept platform landing
    pub prev_y: f32,
    pub width: f32,
    pub height: f32,
    pub vel: Vec2,
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    pub on_ladder: bool,
    pub on_ground: bool,
    pub invulnerable_timer: u32,
    /// Facing sign for the embedder's renderer, 1 = right
    pub facing: i8,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: ARENA_WIDTH / 2.0,
            y: ARENA_HEIGHT - PLAYER_HEIGHT,
            prev_y: ARENA_HEIGHT - PLAYER_HEIGHT,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            vel: Vec2::ZERO,
            move_left: false,
            move_right: false,
            move_up: false,
            move_down: false,
            on_ladder: false,
            on_ground: false,
            invulnerable_timer: 0,
            facing: 1,
        }
    }
}

impl Player {
    /// Back to the spawn point with all motion and timers cleared
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x - self.width / 2.0, self.y, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x, self.y + self.height / 2.0)
    }

    /// Actively moving along a ladder (blocks shooting and pickups)
    pub fn is_climbing(&self) -> bool {
        self.on_ladder && (self.move_up || self.move_down)
    }

    pub fn activate_invulnerability(&mut self) {
        self.invulnerable_timer = PLAYER_INVULNERABLE_TICKS;
    }

    pub fn update(&mut self, ceiling_spikes: bool) {
        if self.invulnerable_timer > 0 {
            self.invulnerable_timer -= 1;
        }
        self.prev_y = self.y;

        let mut target_speed = 0.0;
        if self.move_left {
            target_speed -= PLAYER_SPEED;
        }
        if self.move_right {
            target_speed += PLAYER_SPEED;
        }
        if target_speed != 0.0 {
            self.vel.x += (target_speed - self.vel.x) * PLAYER_ACCEL;
        } else {
            self.vel.x *= PLAYER_FRICTION;
        }
        self.x += self.vel.x;

        if self.on_ladder {
            self.vel.y = 0.0;
            if self.move_up {
                self.y -= PLAYER_CLIMB_SPEED;
            }
            if self.move_down {
                self.y += PLAYER_CLIMB_SPEED;
            }
        } else {
            self.vel.y = (self.vel.y + PLAYER_GRAVITY).min(PLAYER_MAX_FALL_SPEED);
            self.y += self.vel.y;
        }

        // Head stop under the hazard line (or the HUD when spikes are off)
        let min_y = if ceiling_spikes { CEILING_Y } else { HUD_HEIGHT } + 4.0;
        if self.y < min_y {
            self.y = min_y;
            self.vel.y = 0.0;
        }

        let min_x = self.width / 2.0;
        let max_x = ARENA_WIDTH - self.width / 2.0;
        if self.x < min_x {
            self.x = min_x;
            self.vel.x = 0.0;
        }
        if self.x > max_x {
            self.x = max_x;
            self.vel.x = 0.0;
        }

        if self.vel.x.abs() > 0.25 {
            self.facing = if self.vel.x > 0.0 { 1 } else { -1 };
        }
    }

    /// Lethal bubble contact, center-to-center with a fixed body allowance.
    /// Always false while invulnerable.
    pub fn touches_any_bubble(&self, bubbles: &[Bubble]) -> bool {
        if self.invulnerable_timer > 0 {
            return false;
        }
        let center = self.center();
        bubbles
            .iter()
            .any(|b| center.distance(b.pos) < b.radius + 12.0)
    }
}

/// The harpoon cable plus the timed power-wire upgrade state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Harpoon {
    pub x: f32,
    /// Tip height while active
    pub y: f32,
    pub active: bool,
    /// True once the current shot has popped at least one bubble; a shot
    /// that ends false breaks the combo
    pub hit_this_shot: bool,
    pub power_wire_active: bool,
    pub power_wire_timer: u32,
}

impl Harpoon {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fire from the player if allowed. Climbing players and an active
    /// power wire both suppress the shot; so does a cable already in flight.
    pub fn shoot(&mut self, player: &Player) -> bool {
        if player.is_climbing() || self.power_wire_active || self.active {
            return false;
        }
        self.active = true;
        self.hit_this_shot = false;
        self.x = player.x;
        self.y = player.y;
        true
    }

    /// Advance the cable and the power-wire countdown. Returns true on the
    /// tick the power wire expires.
    pub fn update(&mut self) -> bool {
        if self.active {
            self.y -= HARPOON_SPEED;
            if self.y < CEILING_Y {
                self.active = false;
            }
        }
        if self.power_wire_active {
            self.power_wire_timer = self.power_wire_timer.saturating_sub(1);
            if self.power_wire_timer == 0 {
                self.power_wire_active = false;
                return true;
            }
        }
        false
    }

    /// Raise the power wire where the pickup was collected; it stays up
    /// for its full timed duration
    pub fn activate_power_wire(&mut self, x: f32) {
        self.power_wire_active = true;
        self.power_wire_timer = POWER_WIRE_DURATION;
        self.x = x;
        self.active = false;
    }

    /// Cable hitbox from the tip down to the player's top edge
    pub fn cable_rect(&self, player_top: f32) -> Rect {
        Rect::new(
            self.x - HARPOON_HALF_WIDTH,
            self.y,
            HARPOON_HALF_WIDTH * 2.0,
            (player_top - self.y).max(0.0),
        )
    }

    /// Full-height power-wire hitbox
    pub fn wire_rect(&self, ceiling_spikes: bool) -> Rect {
        let top = if ceiling_spikes { CEILING_Y } else { HUD_HEIGHT };
        Rect::new(
            self.x - POWER_WIRE_HALF_WIDTH,
            top,
            POWER_WIRE_HALF_WIDTH * 2.0,
            ARENA_HEIGHT - top,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_player_accelerates_and_coasts() {
        let mut player = Player::default();
        player.move_right = true;
        for _ in 0..60 {
            player.update(true);
        }
        assert!((player.vel.x - PLAYER_SPEED).abs() < 0.1);

        player.move_right = false;
        let before = player.vel.x;
        player.update(true);
        assert!(player.vel.x < before);
    }

    #[test]
    fn test_player_clamped_to_arena() {
        let mut player = Player::default();
        player.x = 5.0;
        player.vel.x = -20.0;
        player.update(true);
        assert_eq!(player.x, player.width / 2.0);
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_fall_speed_capped() {
        let mut player = Player::default();
        player.y = 100.0;
        for _ in 0..120 {
            player.update(true);
        }
        assert!(player.vel.y <= PLAYER_MAX_FALL_SPEED);
    }

    #[test]
    fn test_climbing_overrides_gravity() {
        let mut player = Player::default();
        player.y = 400.0;
        player.on_ladder = true;
        player.move_up = true;
        player.update(true);
        assert_eq!(player.vel.y, 0.0);
        assert_eq!(player.y, 400.0 - PLAYER_CLIMB_SPEED);
    }

    #[test]
    fn test_invulnerability_blocks_bubble_contact() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut player = Player::default();
        let bubble = Bubble::spawn(player.x, player.y + player.height / 2.0, 3, Default::default(), 0, &mut rng);
        assert!(player.touches_any_bubble(std::slice::from_ref(&bubble)));
        player.activate_invulnerability();
        assert!(!player.touches_any_bubble(std::slice::from_ref(&bubble)));
    }

    #[test]
    fn test_harpoon_single_shot() {
        let player = Player::default();
        let mut harpoon = Harpoon::default();
        assert!(harpoon.shoot(&player));
        assert!(!harpoon.shoot(&player));
        assert_eq!(harpoon.x, player.x);
    }

    #[test]
    fn test_harpoon_suppressed_while_climbing() {
        let mut player = Player::default();
        player.on_ladder = true;
        player.move_up = true;
        let mut harpoon = Harpoon::default();
        assert!(!harpoon.shoot(&player));
    }

    #[test]
    fn test_harpoon_retires_at_hazard_line() {
        let player = Player::default();
        let mut harpoon = Harpoon::default();
        harpoon.shoot(&player);
        harpoon.y = CEILING_Y + 1.0;
        harpoon.update();
        assert!(!harpoon.active);
    }

    #[test]
    fn test_power_wire_activation_and_expiry() {
        let player = Player::default();
        let mut harpoon = Harpoon::default();
        harpoon.shoot(&player);
        harpoon.activate_power_wire(250.0);
        assert!(harpoon.power_wire_active);
        assert_eq!(harpoon.x, 250.0);
        // The wire replaces the cable and suppresses new shots
        assert!(!harpoon.active);
        assert!(!harpoon.shoot(&player));

        harpoon.power_wire_timer = 1;
        assert!(harpoon.update());
        assert!(!harpoon.power_wire_active);
    }
}
