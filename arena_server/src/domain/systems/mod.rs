// Per-tick simulation systems. `Arena::step` runs them in this order:
// movement, hero combat, tower combat, projectiles, death/respawn.

pub mod damage;
pub mod hero_combat;
pub mod movement;
pub mod projectiles;
pub mod respawn;
pub mod tower_combat;
