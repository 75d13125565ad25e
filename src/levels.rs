//! Campaign level data
//!
//! A pure provider: `level_config(n)` returns the layout for level `n`
//! (1-based) or `None` past the end of the campaign. The simulation never
//! mutates level data; it instantiates entities from it on level start.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::collision::Rect;
use crate::sim::entity::BubbleKind;

/// Number of levels in the built-in campaign
pub const TOTAL_LEVELS: u32 = 12;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BubbleSpawn {
    pub x: f32,
    pub y: f32,
    pub size: u8,
    pub kind: BubbleKind,
}

/// Gate wall layout; unset fields take geometry defaults at spawn
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WallConfig {
    pub x: f32,
    pub width: Option<f32>,
    pub door_y: Option<f32>,
    pub door_height: Option<f32>,
    pub door_clearance: Option<f32>,
    pub unlock_region: Option<(f32, f32)>,
}

/// Timed laser layout; unset fields take cycle/geometry defaults at spawn
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaserConfig {
    pub x: f32,
    pub y: Option<f32>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub interval: Option<u32>,
    pub active_frames: Option<u32>,
    pub phase: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelConfig {
    pub bubbles: Vec<BubbleSpawn>,
    pub platforms: Vec<Rect>,
    pub ladders: Vec<Rect>,
    pub walls: Vec<WallConfig>,
    pub lasers: Vec<LaserConfig>,
    /// When false the ceiling is a plain bounce surface at the HUD line
    pub ceiling_spikes: bool,
    pub closing_wall: bool,
}

fn spawn(x: f32, y: f32, size: u8, kind: BubbleKind) -> BubbleSpawn {
    BubbleSpawn { x, y, size, kind }
}

/// Level time limit in seconds; grows every five levels, then trimmed to
/// keep later levels under pressure
pub fn time_limit_secs(level: u32) -> u32 {
    let base = BASE_TIME_SECS + ((level.saturating_sub(1)) / 5) * TIME_BONUS_PER_5_LEVELS;
    ((base as f32 * 0.8).ceil() as u32).max(1)
}

/// Layout for 1-based level `n`, or `None` past the campaign's end
pub fn level_config(level: u32) -> Option<LevelConfig> {
    use BubbleKind::*;
    let base = LevelConfig {
        ceiling_spikes: true,
        ..Default::default()
    };
    let config = match level {
        // Single standard bubble to learn the basics
        1 => LevelConfig {
            bubbles: vec![spawn(400.0, 160.0, 4, Standard)],
            ..base
        },
        // Pacing mix: fast and zigzag movers
        2 => LevelConfig {
            bubbles: vec![
                spawn(400.0, 150.0, 4, Standard),
                spawn(260.0, 230.0, 2, Fast),
                spawn(540.0, 230.0, 2, Zigzag),
            ],
            ..base
        },
        // Two floors with a ladder; soft ceiling
        3 => LevelConfig {
            bubbles: vec![
                spawn(260.0, 170.0, 2, Drifter),
                spawn(540.0, 170.0, 3, Heavy),
                spawn(300.0, 520.0, 2, Rubber),
                spawn(580.0, 520.0, 2, Heavy),
            ],
            platforms: vec![Rect::new(0.0, 360.0, 800.0, 22.0)],
            ladders: vec![Rect::new(80.0, 360.0, 28.0, 340.0)],
            ceiling_spikes: false,
            ..base
        },
        // Ghosts and drifters for delayed threat reads
        4 => LevelConfig {
            bubbles: vec![
                spawn(220.0, 150.0, 3, Ghost),
                spawn(440.0, 160.0, 3, Drifter),
                spawn(660.0, 150.0, 3, Ghost),
                spawn(400.0, 230.0, 2, Rubber),
            ],
            ..base
        },
        // First gate: clear the left side to open the door
        5 => LevelConfig {
            bubbles: vec![
                spawn(360.0, 140.0, 4, Heavy),
                spawn(200.0, 210.0, 3, Fast),
                spawn(600.0, 210.0, 3, Standard),
                spawn(320.0, 250.0, 2, Drifter),
            ],
            walls: vec![WallConfig {
                x: 520.0,
                width: Some(18.0),
                door_height: Some(PLAYER_HEIGHT + 28.0),
                unlock_region: Some((0.0, 520.0)),
                ..Default::default()
            }],
            ..base
        },
        // Phase-shift and rhythm movers
        6 => LevelConfig {
            bubbles: vec![
                spawn(220.0, 150.0, 3, PhaseShift),
                spawn(440.0, 150.0, 3, Rhythm),
                spawn(660.0, 150.0, 3, PhaseShift),
            ],
            ..base
        },
        // Laser lanes force timed crossings
        7 => LevelConfig {
            bubbles: vec![
                spawn(200.0, 150.0, 3, Standard),
                spawn(400.0, 150.0, 3, Fast),
                spawn(600.0, 150.0, 3, Zigzag),
            ],
            lasers: vec![
                LaserConfig {
                    x: 260.0,
                    interval: Some(200),
                    active_frames: Some(70),
                    ..Default::default()
                },
                LaserConfig {
                    x: 530.0,
                    interval: Some(200),
                    active_frames: Some(70),
                    phase: Some(100),
                    ..Default::default()
                },
            ],
            ..base
        },
        // Armored core with escorts
        8 => LevelConfig {
            bubbles: vec![
                spawn(220.0, 150.0, 4, Armored),
                spawn(540.0, 150.0, 3, Rhythm),
                spawn(400.0, 230.0, 2, Ghost),
            ],
            ..base
        },
        // Teleporters behind a gate with a guard laser
        9 => LevelConfig {
            bubbles: vec![
                spawn(240.0, 150.0, 3, Teleport),
                spawn(560.0, 150.0, 3, Teleport),
                spawn(400.0, 220.0, 2, PhaseShift),
            ],
            walls: vec![WallConfig {
                x: 400.0,
                unlock_region: Some((400.0, ARENA_WIDTH)),
                ..Default::default()
            }],
            lasers: vec![LaserConfig {
                x: 120.0,
                interval: Some(240),
                active_frames: Some(90),
                ..Default::default()
            }],
            ..base
        },
        // Closing wall debut with a volatile splitter
        10 => LevelConfig {
            bubbles: vec![
                spawn(400.0, 150.0, 4, Volatile),
                spawn(620.0, 210.0, 2, Rhythm),
            ],
            closing_wall: true,
            ..base
        },
        // Dense mixed field across two floors
        11 => LevelConfig {
            bubbles: vec![
                spawn(200.0, 170.0, 3, Fast),
                spawn(400.0, 170.0, 3, Armored),
                spawn(600.0, 170.0, 3, Zigzag),
                spawn(280.0, 510.0, 2, Heavy),
                spawn(520.0, 510.0, 2, Teleport),
            ],
            platforms: vec![Rect::new(0.0, 350.0, 800.0, 22.0)],
            ladders: vec![Rect::new(700.0, 350.0, 28.0, 350.0)],
            ceiling_spikes: false,
            ..base
        },
        // Finale: crush wall, armored volatiles, laser pair
        12 => LevelConfig {
            bubbles: vec![
                spawn(260.0, 150.0, 4, Armored),
                spawn(540.0, 150.0, 4, Volatile),
                spawn(400.0, 220.0, 2, PhaseShift),
            ],
            lasers: vec![
                LaserConfig {
                    x: 180.0,
                    interval: Some(220),
                    active_frames: Some(80),
                    ..Default::default()
                },
                LaserConfig {
                    x: 600.0,
                    interval: Some(220),
                    active_frames: Some(80),
                    phase: Some(110),
                    ..Default::default()
                },
            ],
            closing_wall: true,
            ..base
        },
        _ => return None,
    };
    Some(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_level_resolves() {
        for level in 1..=TOTAL_LEVELS {
            let config = level_config(level).unwrap();
            assert!(!config.bubbles.is_empty(), "level {level} has no bubbles");
            for b in &config.bubbles {
                assert!((1..=4).contains(&b.size));
                assert!(b.x > 0.0 && b.x < ARENA_WIDTH);
                assert!(b.y > HUD_HEIGHT && b.y < ARENA_HEIGHT);
            }
        }
    }

    #[test]
    fn test_past_campaign_is_none() {
        assert!(level_config(TOTAL_LEVELS + 1).is_none());
        assert!(level_config(0).is_none());
    }

    #[test]
    fn test_time_limit_steps_every_five_levels() {
        assert_eq!(time_limit_secs(1), time_limit_secs(5));
        assert!(time_limit_secs(6) > time_limit_secs(5));
        assert_eq!(time_limit_secs(6), time_limit_secs(10));
        assert!(time_limit_secs(11) > time_limit_secs(10));
    }
}
