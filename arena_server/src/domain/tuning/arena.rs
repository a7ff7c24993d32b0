use crate::domain::state::Team;
use crate::domain::tuning::TowerTuning;
use glam::Vec2;

#[derive(Debug, Clone, Copy)]
pub struct TowerPlacement {
    pub team: Team,
    pub position: Vec2,
}

/// Match-wide gameplay constants.
#[derive(Debug, Clone)]
pub struct ArenaTuning {
    /// Playable area is `[0, world_width] x [0, world_height]`.
    pub world_width: f32,
    pub world_height: f32,

    pub blue_spawn: Vec2,
    pub red_spawn: Vec2,

    /// Seconds a dead hero waits before reviving at its spawn point.
    pub respawn_seconds: f32,

    /// Floor applied to attack speed before computing the cooldown (1 / speed).
    pub min_attack_speed: f32,

    /// Collision radius shared by every projectile.
    pub projectile_radius: f32,

    pub heroes_per_team: usize,

    pub towers: Vec<TowerPlacement>,
    pub tower: TowerTuning,
}

impl Default for ArenaTuning {
    fn default() -> Self {
        Self {
            world_width: 3200.0,
            world_height: 720.0,
            blue_spawn: Vec2::new(320.0, 360.0),
            red_spawn: Vec2::new(2880.0, 360.0),
            respawn_seconds: 5.0,
            min_attack_speed: 0.01,
            projectile_radius: 8.0,
            heroes_per_team: 2,
            towers: vec![
                TowerPlacement {
                    team: Team::Blue,
                    position: Vec2::new(720.0, 360.0),
                },
                TowerPlacement {
                    team: Team::Red,
                    position: Vec2::new(2480.0, 360.0),
                },
            ],
            tower: TowerTuning::default(),
        }
    }
}
