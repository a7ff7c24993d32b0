// Domain layer: core simulation types and rules.

pub mod arena;
pub mod prediction;
pub mod state;
pub mod systems;
pub mod tuning;

pub use arena::{Arena, IdGenerator};
pub use state::{
    EntityId, Hero, HeroClass, HeroInput, HeroSnapshot, Projectile, ProjectileSnapshot, Targetable,
    Team, Tower, TowerSnapshot, WorldSnapshot,
};
