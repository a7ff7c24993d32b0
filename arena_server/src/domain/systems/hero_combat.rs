use crate::domain::arena::IdGenerator;
use crate::domain::state::{EntityId, Hero, Projectile, Tower};
use crate::domain::systems::damage::{AttackerView, apply_damage, attack_cooldown, find_target};
use glam::Vec2;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct CombatConfig {
    /// Attack speed floor used when computing cooldowns.
    pub min_attack_speed: f32,
}

/// Runs hero auto-attacks for one tick.
///
/// Targets are resolved for every hero first, then attacks fire. Each firing hero
/// re-checks its target before firing. A target that reached zero hp earlier in the
/// pass is still valid: death is latched later in the tick.
pub fn tick_heroes(
    heroes: &mut [Hero],
    towers: &mut [Tower],
    projectiles: &mut Vec<Projectile>,
    ids: &mut IdGenerator,
    dt: f32,
    cfg: CombatConfig,
) {
    for i in 0..heroes.len() {
        if heroes[i].dead {
            heroes[i].clear_attack_state();
            continue;
        }

        heroes[i].attack_cooldown = (heroes[i].attack_cooldown - dt).max(0.0);

        // Invalid requests are dropped for this tick; nothing sticks.
        let attacker = AttackerView::from(&heroes[i]);
        let requested = heroes[i].last_input.attack_target_id;
        let target = match requested {
            Some(id) if target_position(heroes, towers, &attacker, id).is_some() => Some(id),
            _ => None,
        };
        heroes[i].attack_target_id = target;
    }

    for i in 0..heroes.len() {
        let Some(target_id) = heroes[i].attack_target_id else {
            continue;
        };
        if heroes[i].attack_cooldown > 0.0 {
            continue;
        }

        let attacker = AttackerView::from(&heroes[i]);
        let Some(aim) = target_position(heroes, towers, &attacker, target_id) else {
            heroes[i].attack_target_id = None;
            continue;
        };

        let hero = &mut heroes[i];
        hero.attack_cooldown = attack_cooldown(hero.attack_speed, cfg.min_attack_speed);
        let attacker_id = hero.id;
        let damage = hero.attack_damage;

        if hero.is_ranged() {
            let projectile_id = ids.next_id();
            projectiles.push(Projectile {
                id: projectile_id,
                owner_id: attacker_id,
                team: hero.team,
                position: hero.position,
                target: aim,
                speed: hero.projectile_speed,
                damage,
            });
            debug!(
                attacker_id = %attacker_id,
                target_id = %target_id,
                projectile_id = %projectile_id,
                "hero fired projectile"
            );
        } else if let Some(target_hp) = apply_damage(heroes, towers, target_id, damage) {
            debug!(
                attacker_id = %attacker_id,
                target_id = %target_id,
                target_hp,
                "melee hit"
            );
        }
    }
}

fn target_position(
    heroes: &[Hero],
    towers: &[Tower],
    attacker: &AttackerView,
    id: EntityId,
) -> Option<Vec2> {
    find_target(heroes, towers, id)
        .filter(|t| attacker.can_attack(*t))
        .map(|t| t.position())
}
