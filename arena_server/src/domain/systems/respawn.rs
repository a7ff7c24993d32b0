use crate::domain::state::{Hero, HeroInput, Team, Tower};
use glam::Vec2;
use tracing::info;

#[derive(Debug, Clone, Copy)]
pub struct RespawnConfig {
    pub respawn_seconds: f32,
    pub blue_spawn: Vec2,
    pub red_spawn: Vec2,
}

impl RespawnConfig {
    pub fn spawn_point(&self, team: Team) -> Vec2 {
        match team {
            Team::Blue => self.blue_spawn,
            Team::Red => self.red_spawn,
        }
    }
}

/// Latches deaths and drives the respawn countdown. Runs after every damage source.
pub fn tick_heroes(heroes: &mut [Hero], dt: f32, cfg: RespawnConfig) {
    for hero in heroes.iter_mut() {
        if hero.dead {
            hero.respawn_timer = (hero.respawn_timer - dt).max(0.0);
            if hero.respawn_timer <= 0.0 {
                revive(hero, cfg);
                info!(hero_id = %hero.id, player_id = hero.player_id, "hero respawned");
            }
            continue;
        }

        if hero.hp <= 0.0 {
            hero.dead = true;
            hero.hp = 0.0;
            hero.respawn_timer = cfg.respawn_seconds;
            hero.clear_attack_state();
            info!(hero_id = %hero.id, player_id = hero.player_id, "hero died");
        }
    }
}

/// Towers are destroyed for good once their hp runs out.
pub fn tick_towers(towers: &mut [Tower]) {
    for tower in towers.iter_mut() {
        if !tower.dead && tower.hp <= 0.0 {
            tower.dead = true;
            tower.hp = 0.0;
            tower.clear_attack_state();
            info!(tower_id = %tower.id, team = ?tower.team, "tower destroyed");
        }
    }
}

fn revive(hero: &mut Hero, cfg: RespawnConfig) {
    hero.hp = hero.max_hp;
    hero.position = cfg.spawn_point(hero.team);
    hero.clear_attack_state();
    hero.dead = false;
    hero.respawn_timer = 0.0;
    // Held intent from before death is dropped; the sequence keeps counting.
    hero.last_input = HeroInput {
        seq: hero.last_input.seq,
        ..HeroInput::default()
    };
}
