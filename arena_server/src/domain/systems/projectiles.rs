use crate::domain::state::{EntityId, Hero, Projectile, Targetable, Tower};
use crate::domain::systems::damage::apply_damage;
use glam::Vec2;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct ProjectileConfig {
    /// Collision radius shared by all projectiles.
    pub radius: f32,
}

/// Moves projectiles toward their captured target points and resolves hits.
///
/// A projectile can hit any living enemy it passes over, not only the unit it was
/// fired at. It is removed on its first hit, or once it reaches its target point.
pub fn tick_projectiles(
    projectiles: &mut Vec<Projectile>,
    heroes: &mut [Hero],
    towers: &mut [Tower],
    dt: f32,
    cfg: ProjectileConfig,
) {
    projectiles.retain_mut(|p| {
        let Some((position, arrived)) = advance_toward(p.position, p.target, p.speed, dt) else {
            // Already sitting on its target point: a clean miss.
            return false;
        };
        p.position = position;

        if let Some(victim_id) = first_hit(heroes, towers, p, cfg.radius) {
            let victim_hp = apply_damage(heroes, towers, victim_id, p.damage);
            debug!(
                victim_id = %victim_id,
                shooter_id = %p.owner_id,
                projectile_id = %p.id,
                victim_hp,
                "projectile hit"
            );
            return false;
        }

        !arrived
    });
}

/// Steps `speed * dt` toward `target` without overshooting.
///
/// Returns the new position and whether it reached the target, or `None` when
/// `position` already equals `target`.
pub fn advance_toward(position: Vec2, target: Vec2, speed: f32, dt: f32) -> Option<(Vec2, bool)> {
    let to_target = target - position;
    let dist = to_target.length();
    if dist <= 0.0 {
        return None;
    }

    let step = speed * dt;
    if step >= dist {
        Some((target, true))
    } else {
        Some((position + to_target / dist * step, false))
    }
}

fn first_hit(heroes: &[Hero], towers: &[Tower], p: &Projectile, radius: f32) -> Option<EntityId> {
    heroes
        .iter()
        .map(|h| h as &dyn Targetable)
        .chain(towers.iter().map(|t| t as &dyn Targetable))
        .find(|t| {
            t.is_targetable()
                && t.team() != p.team
                && p.position.distance(t.position()) <= t.radius() + radius
        })
        .map(|t| t.id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::{HeroClass, Team};
    use crate::domain::tuning::{HeroTuning, TowerTuning};

    const CFG: ProjectileConfig = ProjectileConfig { radius: 8.0 };

    fn hero(id: u64, team: Team, x: f32, y: f32) -> Hero {
        let mut h = Hero::new(
            EntityId(id),
            id,
            team,
            HeroClass::Warrior,
            Vec2::new(x, y),
            &HeroTuning::for_class(HeroClass::Warrior),
        );
        h.radius = 22.0;
        h
    }

    fn projectile(x: f32, target_x: f32, speed: f32) -> Projectile {
        Projectile {
            id: EntityId(50),
            owner_id: EntityId(1),
            team: Team::Blue,
            position: Vec2::new(x, 100.0),
            target: Vec2::new(target_x, 100.0),
            speed,
            damage: 45.0,
        }
    }

    #[test]
    fn hit_at_exact_radius_sum_counts() {
        let mut heroes = vec![hero(2, Team::Red, 110.0, 100.0)];
        let hp0 = heroes[0].hp;
        // Lands on x = 80, exactly 22 + 8 away from the hero.
        let mut projectiles = vec![projectile(70.0, 1000.0, 10.0)];

        tick_projectiles(&mut projectiles, &mut heroes, &mut [], 1.0, CFG);

        assert!(projectiles.is_empty());
        assert_eq!(heroes[0].hp, hp0 - 45.0);
    }

    #[test]
    fn just_outside_radius_sum_misses() {
        let mut heroes = vec![hero(2, Team::Red, 110.5, 100.0)];
        let hp0 = heroes[0].hp;
        let mut projectiles = vec![projectile(70.0, 1000.0, 10.0)];

        tick_projectiles(&mut projectiles, &mut heroes, &mut [], 1.0, CFG);

        assert_eq!(projectiles.len(), 1);
        assert_eq!(projectiles[0].position, Vec2::new(80.0, 100.0));
        assert_eq!(heroes[0].hp, hp0);
    }

    #[test]
    fn does_not_overshoot_and_is_removed_on_arrival() {
        let mut projectiles = vec![projectile(0.0, 50.0, 600.0)];

        tick_projectiles(&mut projectiles, &mut [], &mut [], 1.0, CFG);

        assert!(projectiles.is_empty());
    }

    #[test]
    fn projectile_already_at_target_is_removed_without_hit() {
        let mut heroes = vec![hero(2, Team::Red, 50.0, 100.0)];
        let hp0 = heroes[0].hp;
        let mut projectiles = vec![projectile(50.0, 50.0, 600.0)];

        tick_projectiles(&mut projectiles, &mut heroes, &mut [], 1.0 / 60.0, CFG);

        assert!(projectiles.is_empty());
        assert_eq!(heroes[0].hp, hp0);
    }

    #[test]
    fn hits_any_enemy_in_path_but_never_allies_or_the_dead() {
        let ally = hero(3, Team::Blue, 80.0, 100.0);
        let mut dead_enemy = hero(4, Team::Red, 80.0, 100.0);
        dead_enemy.dead = true;
        let bystander = hero(5, Team::Red, 85.0, 100.0);
        let mut heroes = vec![ally, dead_enemy, bystander];
        let ally_hp = heroes[0].hp;
        let bystander_hp = heroes[2].hp;
        let mut projectiles = vec![projectile(70.0, 1000.0, 10.0)];

        tick_projectiles(&mut projectiles, &mut heroes, &mut [], 1.0, CFG);

        assert!(projectiles.is_empty());
        assert_eq!(heroes[0].hp, ally_hp);
        assert_eq!(heroes[2].hp, bystander_hp - 45.0);
    }

    #[test]
    fn zero_hp_enemy_still_blocks_shots_until_its_death_is_latched() {
        let mut downed = hero(4, Team::Red, 80.0, 100.0);
        downed.hp = 0.0;
        let behind = hero(5, Team::Red, 90.0, 100.0);
        let mut heroes = vec![downed, behind];
        let behind_hp = heroes[1].hp;
        let mut projectiles = vec![projectile(70.0, 1000.0, 10.0)];

        tick_projectiles(&mut projectiles, &mut heroes, &mut [], 1.0, CFG);

        assert!(projectiles.is_empty());
        assert_eq!(heroes[0].hp, 0.0);
        assert_eq!(heroes[1].hp, behind_hp);
    }

    #[test]
    fn towers_are_valid_victims() {
        let mut towers = vec![Tower::new(
            EntityId(9),
            Team::Red,
            Vec2::new(100.0, 100.0),
            &TowerTuning::default(),
        )];
        let hp0 = towers[0].hp;
        let mut projectiles = vec![projectile(70.0, 1000.0, 10.0)];

        tick_projectiles(&mut projectiles, &mut [], &mut towers, 1.0, CFG);

        assert!(projectiles.is_empty());
        assert_eq!(towers[0].hp, hp0 - 45.0);
    }
}
