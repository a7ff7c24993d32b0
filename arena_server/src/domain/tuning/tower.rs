// Gameplay tuning for team towers. Towers are always ranged.

#[derive(Debug, Clone, Copy)]
pub struct TowerTuning {
    pub max_hp: f32,

    pub attack_damage: f32,

    /// Reach measured edge to edge (after subtracting both radii).
    pub attack_range: f32,

    /// Shots per second.
    pub attack_speed: f32,

    /// World-space collision radius in pixels.
    pub radius: f32,

    /// Shot speed in pixels per second.
    pub projectile_speed: f32,
}

impl Default for TowerTuning {
    fn default() -> Self {
        Self {
            max_hp: 2000.0,
            attack_damage: 90.0,
            attack_range: 300.0,
            attack_speed: 0.75,
            radius: 40.0,
            projectile_speed: 700.0,
        }
    }
}
