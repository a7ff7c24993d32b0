use crate::domain::arena::IdGenerator;
use crate::domain::state::{Hero, Projectile, Tower};
use crate::domain::systems::damage::{AttackerView, attack_cooldown};
use crate::domain::systems::hero_combat::CombatConfig;
use tracing::debug;

/// Towers retarget every tick to the closest enemy hero in range and always shoot projectiles.
pub fn tick_towers(
    towers: &mut [Tower],
    heroes: &[Hero],
    projectiles: &mut Vec<Projectile>,
    ids: &mut IdGenerator,
    dt: f32,
    cfg: CombatConfig,
) {
    for tower in towers.iter_mut() {
        if tower.dead {
            tower.clear_attack_state();
            continue;
        }

        tower.attack_cooldown = (tower.attack_cooldown - dt).max(0.0);

        let attacker = AttackerView::from(&*tower);
        let target = nearest_enemy(heroes, &attacker);
        tower.attack_target_id = target.map(|h| h.id);

        let Some(target) = target else {
            continue;
        };
        if tower.attack_cooldown > 0.0 {
            continue;
        }

        tower.attack_cooldown = attack_cooldown(tower.attack_speed, cfg.min_attack_speed);
        let projectile_id = ids.next_id();
        projectiles.push(Projectile {
            id: projectile_id,
            owner_id: tower.id,
            team: tower.team,
            position: tower.position,
            target: target.position,
            speed: tower.projectile_speed,
            damage: tower.attack_damage,
        });
        debug!(
            tower_id = %tower.id,
            target_id = %target.id,
            projectile_id = %projectile_id,
            "tower fired"
        );
    }
}

// First hero found wins ties; only a strictly closer center replaces it.
fn nearest_enemy<'a>(heroes: &'a [Hero], attacker: &AttackerView) -> Option<&'a Hero> {
    let mut best: Option<(&Hero, f32)> = None;
    for hero in heroes {
        if !attacker.can_attack(hero) {
            continue;
        }
        let d = attacker.position.distance(hero.position);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((hero, d));
        }
    }
    best.map(|(hero, _)| hero)
}
