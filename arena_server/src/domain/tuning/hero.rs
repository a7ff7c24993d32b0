use crate::domain::state::HeroClass;

/// Gameplay tuning for player-controlled heroes, one stat block per class.
#[derive(Debug, Clone, Copy)]
pub struct HeroTuning {
    /// Hit points on spawn and after every respawn.
    pub max_hp: f32,

    /// Movement speed in pixels per second.
    pub speed: f32,

    /// Damage dealt per successful attack.
    pub attack_damage: f32,

    /// Reach measured edge to edge (after subtracting both radii).
    pub attack_range: f32,

    /// Attacks per second.
    pub attack_speed: f32,

    /// World-space collision radius in pixels.
    pub radius: f32,

    /// Projectile speed in pixels per second; zero for melee classes.
    pub projectile_speed: f32,
}

impl HeroTuning {
    pub fn for_class(class: HeroClass) -> Self {
        match class {
            HeroClass::Warrior => Self {
                max_hp: 650.0,
                speed: 200.0,
                attack_damage: 60.0,
                attack_range: 60.0,
                attack_speed: 0.8,
                radius: 22.0,
                projectile_speed: 0.0,
            },
            HeroClass::Ranger => Self {
                max_hp: 480.0,
                speed: 210.0,
                attack_damage: 45.0,
                attack_range: 320.0,
                attack_speed: 1.0,
                radius: 22.0,
                projectile_speed: 600.0,
            },
        }
    }
}
