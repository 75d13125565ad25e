//! The fixed-timestep simulation step
//!
//! `tick` advances the world by exactly one step. The pass order is load
//! bearing: due transitions fire first so cancelled ones can never land,
//! the player is constrained against walls and platforms before weapons
//! update, entity motion precedes the collision passes, and combat runs
//! before the death and level-clear checks so a pop and a touch on the
//! same tick favors the pop.
//!
//! Entity removal is mark-and-compact per tick; nothing is spliced out of
//! a collection mid-iteration.

use serde::{Deserialize, Serialize};

use super::collision::{circle_rect_overlap, circles_overlap, rects_overlap, Rect};
use super::entity::{Bubble, Bullet, DropKind};
use super::state::{GameEvent, GamePhase, GameState, SoundKind, StatusKey};
use crate::consts::*;

/// Player intent for one tick, sampled by the embedder
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    /// Fire request for this tick (edge, not level)
    pub shoot: bool,
}

/// Advance the simulation by one fixed step
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.tick_count += 1;
    state.process_due_transitions();

    if state.phase != GamePhase::Playing {
        return;
    }

    state.player.move_left = input.move_left;
    state.player.move_right = input.move_right;
    state.player.move_up = input.move_up;
    state.player.move_down = input.move_down;
    if input.shoot && state.harpoon.shoot(&state.player) {
        state.push_event(GameEvent::Sound(SoundKind::Shoot));
    }

    update_ladder_state(state);
    state.player.update(state.ceiling_spikes);
    apply_wall_constraints_to_player(state);
    resolve_closing_wall_player(state);
    apply_platform_constraints_to_player(state);

    let harpoon_was_active = state.harpoon.active;
    state.harpoon.update();
    if harpoon_was_active && !state.harpoon.active {
        // Cable retired at the hazard line with nothing to show for it
        if !state.harpoon.hit_this_shot {
            state.reset_combo();
        }
        state.harpoon.hit_this_shot = false;
    }

    update_powerups(state);
    update_drop_items(state);
    update_auto_gun(state);
    update_closing_wall_progress(state);
    update_lasers(state);

    let scale = state.bubble_speed_scale();
    let frozen = state.time_freeze_timer > 0;
    if !frozen {
        let ceiling_spikes = state.ceiling_spikes;
        for bubble in &mut state.bubbles {
            bubble.update(scale, ceiling_spikes, &mut state.rng);
        }
        state.particles.retain_mut(|p| p.update(scale));
        for bullet in &mut state.bullets {
            bullet.update(scale);
        }
    }
    state.bullets.retain(|b| b.active);

    update_walls(state);
    resolve_bubble_platform_collisions(state);
    resolve_bubble_wall_collisions(state);
    resolve_closing_wall_bubbles(state);
    resolve_laser_bubble_collisions(state);
    resolve_bullet_obstacle_collisions(state);
    resolve_harpoon_obstacle_collisions(state);

    process_bullet_combat(state);
    process_bubble_combat(state);

    if player_hit_by_laser(state) || state.player.touches_any_bubble(&state.bubbles) {
        state.lose_life(StatusKey::Hit);
        return;
    }

    if state.bubbles.is_empty() {
        state.level_cleared();
        return;
    }

    if !frozen {
        state.countdown_ticks += 1;
        if state.countdown_ticks >= TICK_RATE {
            state.countdown_ticks = 0;
            state.time_remaining = state.time_remaining.saturating_sub(1);
            if state.time_remaining == 0 {
                let reason = if state.closing_wall_enabled && !state.bubbles.is_empty() {
                    StatusKey::Crushed
                } else {
                    StatusKey::Hit
                };
                state.lose_life(reason);
            }
        }
    }
}

// ---- player environment ----

fn update_ladder_state(state: &mut GameState) {
    let player = &mut state.player;
    player.on_ladder = false;
    if state.ladders.is_empty() {
        return;
    }

    let padding = 4.0;
    let top_snap = 6.0;
    let seek_range = 24.0;
    let player_rect = player.bounds();

    for ladder in &state.ladders {
        let grab_zone = ladder.padded(padding, top_snap);
        if !rects_overlap(&player_rect, &grab_zone) {
            continue;
        }
        player.on_ladder = true;
        if player.move_up || player.move_down {
            player.x = ladder.center_x();
        }
        // Never slide out the bottom, and cap climb at the ladder top
        player.y = player.y.min(ladder.bottom() - player.height);
        if player.move_up && player.y < ladder.y - player.height {
            player.y = ladder.y - player.height;
        }
        return;
    }

    // Standing on a platform above a ladder: moving down grabs the
    // nearest ladder top within reach
    if player.move_down {
        let player_bottom = player.y + player.height;
        let mut best: Option<(&Rect, f32)> = None;
        for ladder in &state.ladders {
            if player_bottom < ladder.y - top_snap || player_bottom > ladder.bottom() {
                continue;
            }
            let within_x = player.x + player.width / 2.0 > ladder.x - padding
                && player.x - player.width / 2.0 < ladder.right() + padding;
            if !within_x {
                continue;
            }
            let distance = (player_bottom - ladder.y).abs();
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((ladder, distance));
            }
        }
        if let Some((ladder, distance)) = best {
            if distance <= seek_range {
                player.on_ladder = true;
                player.x = ladder.center_x();
                player.y = player.y.min(ladder.bottom() - player.height);
            }
        }
    }
}

fn apply_wall_constraints_to_player(state: &mut GameState) {
    let player = &mut state.player;
    for wall in &state.walls {
        for rect in wall.blocking_rects() {
            let player_rect = player.bounds();
            if !rects_overlap(&player_rect, &rect) {
                continue;
            }
            if player.x < rect.center_x() {
                player.x = rect.x - player.width / 2.0;
            } else {
                player.x = rect.right() + player.width / 2.0;
            }
            player.vel.x = 0.0;
        }
    }
}

fn resolve_closing_wall_player(state: &mut GameState) {
    if !state.closing_wall_enabled {
        return;
    }
    let front = state.closing_wall_x + CLOSING_WALL_WIDTH;
    let min_center = front + state.player.width / 2.0;
    if state.player.x < min_center {
        state.player.x = min_center;
        state.player.vel.x = state.player.vel.x.max(0.0);
    }
}

fn apply_platform_constraints_to_player(state: &mut GameState) {
    let player = &mut state.player;
    player.on_ground = false;
    let ground_y = ARENA_HEIGHT - player.height;
    if !player.on_ladder && player.y >= ground_y {
        player.y = ground_y;
        player.vel.y = 0.0;
        player.on_ground = true;
    }
    if player.on_ladder || player.vel.y < 0.0 {
        return;
    }

    // Swept landing check so fast falls cannot tunnel through a platform
    let bottom = player.y + player.height;
    let prev_bottom = player.prev_y + player.height;
    for platform in &state.platforms {
        let within_x = player.x + player.width / 2.0 > platform.x
            && player.x - player.width / 2.0 < platform.right();
        if within_x && prev_bottom <= platform.y && bottom >= platform.y {
            player.y = platform.y - player.height;
            player.vel.y = 0.0;
            player.on_ground = true;
        }
    }
}

// ---- timers, power-ups, hazards ----

fn update_powerups(state: &mut GameState) {
    state.time_freeze_timer = state.time_freeze_timer.saturating_sub(1);
    state.slow_mo_timer = state.slow_mo_timer.saturating_sub(1);
    state.auto_gun_timer = state.auto_gun_timer.saturating_sub(1);
    state.auto_gun_cooldown = state.auto_gun_cooldown.saturating_sub(1);

    let status = if state.time_freeze_timer > 0 {
        StatusKey::Freeze
    } else if state.slow_mo_timer > 0 {
        StatusKey::SlowMo
    } else if state.auto_gun_timer > 0 {
        StatusKey::AutoGun
    } else {
        StatusKey::Ready
    };
    state.set_status(status);
}

fn update_drop_items(state: &mut GameState) {
    state.power_wire_drop_cooldown = state.power_wire_drop_cooldown.saturating_sub(1);
    if state.drop_items.is_empty() {
        return;
    }

    let climbing = state.player.is_climbing();
    let player_center = state.player.center();

    let mut collected: Option<(DropKind, f32)> = None;
    state.drop_items.retain_mut(|item| {
        if collected.is_some() {
            return true;
        }
        let mut alive = item.update();

        // Rest on platform tops instead of falling through
        let radius = item.size / 2.0;
        for platform in &state.platforms {
            let within_x =
                item.pos.x + radius > platform.x && item.pos.x - radius < platform.right();
            if within_x && item.pos.y + radius >= platform.y && item.pos.y < platform.y {
                item.pos.y = platform.y - radius;
                item.life_ticks = (item.life_ticks - 1).max(0);
                alive = item.life_ticks > 0;
                break;
            }
        }

        if !climbing && item.touches_player(player_center) {
            collected = Some((item.kind, item.pos.x));
            return false;
        }
        alive
    });

    if let Some((kind, x)) = collected {
        match kind {
            DropKind::PowerWire => state.harpoon.activate_power_wire(x),
            DropKind::TimeFreeze => state.activate_time_freeze(),
            DropKind::SlowMo => state.activate_slow_mo(),
            DropKind::AutoGun => state.activate_auto_gun(),
        }
        state.push_event(GameEvent::Sound(SoundKind::Powerup));
    }
}

fn update_auto_gun(state: &mut GameState) {
    if state.auto_gun_timer == 0 || state.player.is_climbing() || state.auto_gun_cooldown > 0 {
        return;
    }
    state
        .bullets
        .push(Bullet::new(state.player.x, state.player.y - 6.0));
    state.auto_gun_cooldown = AUTO_GUN_FIRE_INTERVAL;
}

fn update_closing_wall_progress(state: &mut GameState) {
    if !state.closing_wall_enabled {
        state.closing_wall_x = -CLOSING_WALL_WIDTH;
        return;
    }
    let limit = state.level_time_limit.max(1) as f32;
    let clamped = (state.time_remaining.min(state.level_time_limit)) as f32;
    let progress = 1.0 - clamped / limit;
    let max_travel = ARENA_WIDTH + CLOSING_WALL_WIDTH;
    let target = -CLOSING_WALL_WIDTH + max_travel * progress;
    state.closing_wall_x += (target - state.closing_wall_x) * CLOSING_WALL_LERP;
}

fn update_lasers(state: &mut GameState) {
    if state.lasers.is_empty() {
        state.laser_frame_tick = 0;
        return;
    }
    state.laser_frame_tick += 1;
    let t = state.laser_frame_tick;
    for laser in &mut state.lasers {
        laser.update(t);
    }
}

fn update_walls(state: &mut GameState) {
    let mut opened = false;
    for wall in &mut state.walls {
        opened |= wall.update(&state.bubbles);
    }
    if opened {
        state.push_event(GameEvent::Sound(SoundKind::DoorOpen));
    }
}

// ---- obstacle collision passes ----

fn resolve_bubble_platform_collisions(state: &mut GameState) {
    for bubble in &mut state.bubbles {
        for platform in &state.platforms {
            let min_x = bubble.prev.x.min(bubble.pos.x) - bubble.radius;
            let max_x = bubble.prev.x.max(bubble.pos.x) + bubble.radius;
            let within_x = max_x > platform.x && min_x < platform.right();

            let prev_bottom = bubble.prev.y + bubble.radius;
            let prev_top = bubble.prev.y - bubble.radius;
            let bottom = bubble.pos.y + bubble.radius;
            let top = bubble.pos.y - bubble.radius;
            let hit_from_above =
                bubble.vel.y >= 0.0 && prev_bottom <= platform.y && bottom >= platform.y;
            let hit_from_below =
                bubble.vel.y < 0.0 && prev_top >= platform.bottom() && top <= platform.bottom();

            if !(within_x && (hit_from_above || hit_from_below))
                && !circle_rect_overlap(bubble.pos, bubble.radius, platform)
            {
                continue;
            }
            if hit_from_above {
                bubble.pos.y = platform.y - bubble.radius;
                bubble.vel.y = -bubble.bounce_speed();
            } else if hit_from_below {
                bubble.pos.y = platform.bottom() + bubble.radius;
                bubble.vel.y = bubble.vel.y.abs();
            }
        }
    }
}

fn resolve_bubble_wall_collisions(state: &mut GameState) {
    for bubble in &mut state.bubbles {
        for wall in &state.walls {
            for rect in wall.blocking_rects() {
                if !circle_rect_overlap(bubble.pos, bubble.radius, &rect) {
                    continue;
                }
                if bubble.pos.x < rect.center_x() {
                    bubble.pos.x = rect.x - bubble.radius;
                    bubble.vel.x = -bubble.vel.x.abs();
                } else {
                    bubble.pos.x = rect.right() + bubble.radius;
                    bubble.vel.x = bubble.vel.x.abs();
                }
            }
        }
    }
}

fn resolve_closing_wall_bubbles(state: &mut GameState) {
    if !state.closing_wall_enabled {
        return;
    }
    let front = state.closing_wall_x + CLOSING_WALL_WIDTH;
    for bubble in &mut state.bubbles {
        if bubble.pos.x - bubble.radius < front {
            bubble.pos.x = front + bubble.radius;
            bubble.vel.x = bubble.vel.x.abs();
        }
    }
}

fn resolve_laser_bubble_collisions(state: &mut GameState) {
    for laser in &state.lasers {
        if !laser.active {
            continue;
        }
        for bubble in &mut state.bubbles {
            if !circle_rect_overlap(bubble.pos, bubble.radius, &laser.rect) {
                continue;
            }
            if bubble.pos.x < laser.rect.center_x() {
                bubble.pos.x = laser.rect.x - bubble.radius;
                bubble.vel.x = -bubble.vel.x.abs();
            } else {
                bubble.pos.x = laser.rect.right() + bubble.radius;
                bubble.vel.x = bubble.vel.x.abs();
            }
        }
    }
}

fn resolve_bullet_obstacle_collisions(state: &mut GameState) {
    for bullet in &mut state.bullets {
        if !bullet.active {
            continue;
        }
        let blocked = state
            .walls
            .iter()
            .flat_map(|w| w.blocking_rects())
            .any(|rect| circle_rect_overlap(bullet.pos, bullet.radius, &rect))
            || state
                .platforms
                .iter()
                .any(|p| circle_rect_overlap(bullet.pos, bullet.radius, p));
        if blocked {
            bullet.active = false;
        }
    }
}

fn resolve_harpoon_obstacle_collisions(state: &mut GameState) {
    if !state.harpoon.active {
        return;
    }
    let cable = state.harpoon.cable_rect(state.player.y);
    for wall in &state.walls {
        if wall
            .blocking_rects()
            .iter()
            .any(|rect| rects_overlap(&cable, rect))
        {
            state.harpoon.active = false;
            return;
        }
    }
    // The cable stops under a platform it is rising beneath
    for platform in &state.platforms {
        let within_x = state.harpoon.x >= platform.x && state.harpoon.x <= platform.right();
        if within_x && state.harpoon.y <= platform.bottom() && state.player.y >= platform.bottom() {
            state.harpoon.active = false;
            state.harpoon.y = platform.bottom();
            return;
        }
    }
}

// ---- combat ----

/// Pop bubble `i`: score, particles, children. Weapon pops also roll a
/// drop item; ceiling pops never do. Returns the spawned children; the
/// caller marks the parent.
fn pop_bubble(state: &mut GameState, i: usize, combo_eligible: bool) -> Vec<Bubble> {
    let (x, y, size) = {
        let b = &state.bubbles[i];
        (b.pos.x, b.pos.y, b.size)
    };
    state.add_bubble_score(size, combo_eligible);
    state.spawn_explosion(x, y);
    if combo_eligible {
        state.maybe_spawn_drop(x, y);
    }
    state.push_event(GameEvent::Sound(SoundKind::Pop));
    state.bubbles[i].split(&mut state.rng)
}

fn process_bullet_combat(state: &mut GameState) {
    if state.bullets.is_empty() {
        return;
    }
    let mut children = Vec::new();
    for b in 0..state.bullets.len() {
        if !state.bullets[b].active {
            continue;
        }
        let (bullet_pos, bullet_radius) = (state.bullets[b].pos, state.bullets[b].radius);
        for i in 0..state.bubbles.len() {
            let bubble = &state.bubbles[i];
            if bubble.marked_for_removal
                || !circles_overlap(bullet_pos, bullet_radius, bubble.pos, bubble.radius)
            {
                continue;
            }
            if !bubble.is_hittable() {
                continue;
            }
            state.bullets[b].active = false;
            if state.bubbles[i].register_hit() {
                children.extend(pop_bubble(state, i, true));
                state.bubbles[i].marked_for_removal = true;
            }
            break;
        }
    }
    state.bullets.retain(|b| b.active);
    state.bubbles.retain(|b| !b.marked_for_removal);
    state.bubbles.append(&mut children);
}

fn process_bubble_combat(state: &mut GameState) {
    let mut children = Vec::new();

    // Harpoon cable: a single hit per shot, then the cable retracts
    if state.harpoon.active {
        let cable = state.harpoon.cable_rect(state.player.y);
        for i in 0..state.bubbles.len() {
            let bubble = &state.bubbles[i];
            if bubble.marked_for_removal
                || !circle_rect_overlap(bubble.pos, bubble.radius, &cable)
            {
                continue;
            }
            if !bubble.is_hittable() {
                continue;
            }
            state.harpoon.active = false;
            let yielded = state.bubbles[i].register_hit();
            state.harpoon.hit_this_shot = yielded;
            if yielded {
                children.extend(pop_bubble(state, i, true));
                state.bubbles[i].marked_for_removal = true;
            }
            break;
        }
    }

    // Power wire: stays up for its full duration and can take out every
    // bubble crossing it, one hit per bubble per tick
    if state.harpoon.power_wire_active {
        let wire = state.harpoon.wire_rect(state.ceiling_spikes);
        for i in 0..state.bubbles.len() {
            let bubble = &state.bubbles[i];
            if bubble.marked_for_removal
                || !circle_rect_overlap(bubble.pos, bubble.radius, &wire)
            {
                continue;
            }
            if !bubble.is_hittable() {
                continue;
            }
            if state.bubbles[i].register_hit() {
                children.extend(pop_bubble(state, i, true));
                state.bubbles[i].marked_for_removal = true;
            }
        }
    }

    // Ceiling-spike pops: scored without combo credit, plus a flat bonus
    for i in 0..state.bubbles.len() {
        if state.bubbles[i].hit_ceiling && !state.bubbles[i].marked_for_removal {
            children.extend(pop_bubble(state, i, false));
            state.score += CEILING_SPIKE_BONUS;
            state.push_event(GameEvent::Bonus {
                kind: super::state::BonusKind::CeilingSpike,
                amount: CEILING_SPIKE_BONUS,
            });
            state.bubbles[i].marked_for_removal = true;
        }
    }

    state.bubbles.retain(|b| !b.marked_for_removal);
    state.bubbles.append(&mut children);
}

fn player_hit_by_laser(state: &GameState) -> bool {
    if state.player.invulnerable_timer > 0 {
        return false;
    }
    let player_rect = state.player.bounds();
    state
        .lasers
        .iter()
        .any(|l| l.active && rects_overlap(&player_rect, &l.rect))
}
