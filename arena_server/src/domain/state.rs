// Domain-level simulation entities and input/snapshot types.

use crate::domain::tuning::{HeroTuning, TowerTuning};
use glam::Vec2;
use std::collections::VecDeque;
use std::fmt;

/// Identifier shared by heroes, towers and projectiles within one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Team {
    Blue,
    Red,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::Blue => Team::Red,
            Team::Red => Team::Blue,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeroClass {
    #[default]
    Warrior,
    Ranger,
}

/// Latest intent received from a player. Also the unit buffered by client prediction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeroInput {
    pub seq: u64,
    /// Requested direction; any magnitude, normalized by the movement system.
    pub move_dir: Vec2,
    pub attack_target_id: Option<EntityId>,
    pub facing: f32,
}

/// Read-only view of anything that can be attacked.
pub trait Targetable {
    fn id(&self) -> EntityId;
    fn team(&self) -> Team;
    fn position(&self) -> Vec2;
    fn radius(&self) -> f32;
    fn hp(&self) -> f32;
    fn max_hp(&self) -> f32;
    fn is_dead(&self) -> bool;

    /// Sets hp, keeping it inside `0..=max_hp`.
    fn set_hp(&mut self, hp: f32);

    /// Only the latched death flag counts. An entity brought to zero hp earlier in
    /// the tick can still be hit until the death system runs.
    fn is_targetable(&self) -> bool {
        !self.is_dead()
    }
}

#[derive(Debug, Clone)]
pub struct Hero {
    pub id: EntityId,
    pub player_id: u64,
    pub class: HeroClass,
    pub team: Team,
    pub position: Vec2,
    pub facing: f32,

    // Combat stats.
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    pub attack_damage: f32,
    pub attack_range: f32,
    pub attack_speed: f32,
    pub radius: f32,
    /// Zero means the hero attacks in melee.
    pub projectile_speed: f32,

    // Combat state.
    pub attack_cooldown: f32,
    pub attack_target_id: Option<EntityId>,
    pub dead: bool,
    pub respawn_timer: f32,

    // Input state (do not serialize to clients, except the sequence).
    /// Accepted inputs waiting for the next tick, oldest first.
    pub pending_inputs: VecDeque<HeroInput>,
    /// Most recently simulated input; its attack target stays requested until replaced.
    pub last_input: HeroInput,
    pub last_processed_input_seq: u64,
}

impl Hero {
    pub fn new(
        id: EntityId,
        player_id: u64,
        team: Team,
        class: HeroClass,
        position: Vec2,
        tuning: &HeroTuning,
    ) -> Self {
        Self {
            id,
            player_id,
            class,
            team,
            position,
            facing: 0.0,
            hp: tuning.max_hp,
            max_hp: tuning.max_hp,
            speed: tuning.speed,
            attack_damage: tuning.attack_damage,
            attack_range: tuning.attack_range,
            attack_speed: tuning.attack_speed,
            radius: tuning.radius,
            projectile_speed: tuning.projectile_speed,
            attack_cooldown: 0.0,
            attack_target_id: None,
            dead: false,
            respawn_timer: 0.0,
            pending_inputs: VecDeque::new(),
            last_input: HeroInput::default(),
            last_processed_input_seq: 0,
        }
    }

    pub fn is_ranged(&self) -> bool {
        self.projectile_speed > 0.0
    }

    pub(crate) fn clear_attack_state(&mut self) {
        self.attack_target_id = None;
        self.attack_cooldown = 0.0;
    }
}

#[derive(Debug, Clone)]
pub struct Tower {
    pub id: EntityId,
    pub team: Team,
    pub position: Vec2,

    pub hp: f32,
    pub max_hp: f32,
    pub attack_damage: f32,
    pub attack_range: f32,
    pub attack_speed: f32,
    pub radius: f32,
    pub projectile_speed: f32,

    pub attack_cooldown: f32,
    pub attack_target_id: Option<EntityId>,
    /// Latched once hp reaches zero; towers never come back.
    pub dead: bool,
}

impl Tower {
    pub fn new(id: EntityId, team: Team, position: Vec2, tuning: &TowerTuning) -> Self {
        Self {
            id,
            team,
            position,
            hp: tuning.max_hp,
            max_hp: tuning.max_hp,
            attack_damage: tuning.attack_damage,
            attack_range: tuning.attack_range,
            attack_speed: tuning.attack_speed,
            radius: tuning.radius,
            projectile_speed: tuning.projectile_speed,
            attack_cooldown: 0.0,
            attack_target_id: None,
            dead: false,
        }
    }

    pub(crate) fn clear_attack_state(&mut self) {
        self.attack_target_id = None;
        self.attack_cooldown = 0.0;
    }
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: EntityId,
    pub owner_id: EntityId,
    pub team: Team,
    pub position: Vec2,
    /// Target point captured when the projectile was fired.
    pub target: Vec2,
    pub speed: f32,
    pub damage: f32,
}

impl Targetable for Hero {
    fn id(&self) -> EntityId {
        self.id
    }

    fn team(&self) -> Team {
        self.team
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f32 {
        self.radius
    }

    fn hp(&self) -> f32 {
        self.hp
    }

    fn max_hp(&self) -> f32 {
        self.max_hp
    }

    fn is_dead(&self) -> bool {
        self.dead
    }

    fn set_hp(&mut self, hp: f32) {
        self.hp = hp.clamp(0.0, self.max_hp);
    }
}

impl Targetable for Tower {
    fn id(&self) -> EntityId {
        self.id
    }

    fn team(&self) -> Team {
        self.team
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn radius(&self) -> f32 {
        self.radius
    }

    fn hp(&self) -> f32 {
        self.hp
    }

    fn max_hp(&self) -> f32 {
        self.max_hp
    }

    fn is_dead(&self) -> bool {
        self.dead
    }

    fn set_hp(&mut self, hp: f32) {
        self.hp = hp.clamp(0.0, self.max_hp);
    }
}

#[derive(Debug, Clone)]
pub struct HeroSnapshot {
    pub id: EntityId,
    pub player_id: u64,
    pub class: HeroClass,
    pub team: Team,
    pub x: f32,
    pub y: f32,
    pub facing: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    pub attack_damage: f32,
    pub attack_range: f32,
    pub attack_speed: f32,
    pub radius: f32,
    pub attack_cooldown: f32,
    pub attack_target_id: Option<EntityId>,
    pub dead: bool,
    pub respawn_timer: f32,
    pub last_processed_input_seq: u64,
}

#[derive(Debug, Clone)]
pub struct TowerSnapshot {
    pub id: EntityId,
    pub team: Team,
    pub x: f32,
    pub y: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub attack_damage: f32,
    pub attack_range: f32,
    pub attack_speed: f32,
    pub radius: f32,
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    pub attack_cooldown: f32,
    pub attack_target_id: Option<EntityId>,
    pub dead: bool,
}

#[derive(Debug, Clone)]
pub struct ProjectileSnapshot {
    pub id: EntityId,
    pub owner_id: EntityId,
    pub team: Team,
    pub x: f32,
    pub y: f32,
    pub target_x: f32,
    pub target_y: f32,
    pub speed: f32,
    pub damage: f32,
}

#[derive(Debug, Clone)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub heroes: Vec<HeroSnapshot>,
    pub towers: Vec<TowerSnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
}

impl From<&Hero> for HeroSnapshot {
    fn from(h: &Hero) -> Self {
        Self {
            id: h.id,
            player_id: h.player_id,
            class: h.class,
            team: h.team,
            x: h.position.x,
            y: h.position.y,
            facing: h.facing,
            hp: h.hp,
            max_hp: h.max_hp,
            speed: h.speed,
            attack_damage: h.attack_damage,
            attack_range: h.attack_range,
            attack_speed: h.attack_speed,
            radius: h.radius,
            attack_cooldown: h.attack_cooldown,
            attack_target_id: h.attack_target_id,
            dead: h.dead,
            respawn_timer: h.respawn_timer,
            last_processed_input_seq: h.last_processed_input_seq,
        }
    }
}

impl TowerSnapshot {
    /// Tower shots collide with the arena-wide projectile radius.
    pub fn new(t: &Tower, projectile_radius: f32) -> Self {
        Self {
            id: t.id,
            team: t.team,
            x: t.position.x,
            y: t.position.y,
            hp: t.hp,
            max_hp: t.max_hp,
            attack_damage: t.attack_damage,
            attack_range: t.attack_range,
            attack_speed: t.attack_speed,
            radius: t.radius,
            projectile_speed: t.projectile_speed,
            projectile_radius,
            attack_cooldown: t.attack_cooldown,
            attack_target_id: t.attack_target_id,
            dead: t.dead,
        }
    }
}

impl From<&Projectile> for ProjectileSnapshot {
    fn from(p: &Projectile) -> Self {
        Self {
            id: p.id,
            owner_id: p.owner_id,
            team: p.team,
            x: p.position.x,
            y: p.position.y,
            target_x: p.target.x,
            target_y: p.target.y,
            speed: p.speed,
            damage: p.damage,
        }
    }
}
