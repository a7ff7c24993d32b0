use crate::domain::state::Hero;
use glam::Vec2;

#[derive(Debug, Clone, Copy)]
pub struct MovementConfig {
    pub world_width: f32,  // px
    pub world_height: f32, // px
}

/// Simulates each queued input once, oldest first, over `input_dt`.
///
/// Inputs are acknowledged even while the hero is dead; they just do not move it.
/// The last one stays held so combat can read its attack target.
pub fn tick_hero(hero: &mut Hero, input_dt: f32, cfg: MovementConfig) {
    while let Some(input) = hero.pending_inputs.pop_front() {
        if !hero.dead {
            if let Some(position) = step(hero.position, input.move_dir, hero.speed, input_dt, cfg) {
                hero.position = position;
                // Facing comes straight from the input, not from the travel direction.
                hero.facing = input.facing;
            }
        }
        hero.last_processed_input_seq = input.seq;
        hero.last_input = input;
    }
}

/// Shared movement math used by the authoritative loop and by client prediction.
///
/// Returns `None` when no movement was requested (zero or non-finite direction).
pub fn step(position: Vec2, move_dir: Vec2, speed: f32, dt: f32, cfg: MovementConfig) -> Option<Vec2> {
    let len = move_dir.length();
    if !len.is_finite() || len <= 0.0 {
        return None;
    }

    let dir = move_dir / len;
    let moved = position + dir * (speed * dt);
    Some(clamp_to_world(moved, cfg))
}

/// Movement for local bots/offline play: facing follows the travel direction.
pub fn step_with_derived_facing(
    position: Vec2,
    move_dir: Vec2,
    speed: f32,
    dt: f32,
    cfg: MovementConfig,
) -> Option<(Vec2, f32)> {
    let position = step(position, move_dir, speed, dt, cfg)?;
    Some((position, move_dir.y.atan2(move_dir.x)))
}

fn clamp_to_world(p: Vec2, cfg: MovementConfig) -> Vec2 {
    Vec2::new(
        p.x.clamp(0.0, cfg.world_width),
        p.y.clamp(0.0, cfg.world_height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::state::{EntityId, HeroClass, HeroInput, Team};
    use crate::domain::tuning::HeroTuning;

    const CFG: MovementConfig = MovementConfig {
        world_width: 3200.0,
        world_height: 720.0,
    };

    fn hero_at(x: f32, y: f32) -> Hero {
        let mut tuning = HeroTuning::for_class(HeroClass::Warrior);
        tuning.speed = 200.0;
        Hero::new(
            EntityId(1),
            7,
            Team::Blue,
            HeroClass::Warrior,
            Vec2::new(x, y),
            &tuning,
        )
    }

    #[test]
    fn diagonal_input_is_normalized_before_scaling() {
        let next = step(Vec2::new(1000.0, 300.0), Vec2::new(1.0, 1.0), 200.0, 1.0, CFG)
            .expect("movement requested");

        let delta = next - Vec2::new(1000.0, 300.0);
        let expected = 200.0 / 2.0_f32.sqrt();
        assert!((delta.length() - 200.0).abs() < 1e-3);
        assert!((delta.x - expected).abs() < 1e-3);
        assert!((delta.y - expected).abs() < 1e-3);
    }

    #[test]
    fn zero_or_non_finite_direction_means_no_movement() {
        assert!(step(Vec2::new(5.0, 5.0), Vec2::ZERO, 200.0, 1.0, CFG).is_none());
        assert!(step(Vec2::new(5.0, 5.0), Vec2::new(f32::NAN, 1.0), 200.0, 1.0, CFG).is_none());
    }

    #[test]
    fn position_is_clamped_per_axis() {
        let next = step(Vec2::new(3190.0, 10.0), Vec2::new(1.0, -1.0), 200.0, 1.0, CFG)
            .expect("movement requested");
        assert_eq!(next, Vec2::new(3200.0, 0.0));
    }

    fn queue(hero: &mut Hero, seq: u64, move_dir: Vec2, facing: f32) {
        hero.pending_inputs.push_back(HeroInput {
            seq,
            move_dir,
            attack_target_id: None,
            facing,
        });
    }

    #[test]
    fn hero_facing_comes_from_input_only_when_moving() {
        let mut hero = hero_at(100.0, 100.0);
        hero.facing = 0.25;
        queue(&mut hero, 1, Vec2::ZERO, 1.5);

        tick_hero(&mut hero, 1.0 / 60.0, CFG);
        assert_eq!(hero.position, Vec2::new(100.0, 100.0));
        assert_eq!(hero.facing, 0.25);

        queue(&mut hero, 2, Vec2::new(0.0, 3.0), 1.5);
        tick_hero(&mut hero, 0.5, CFG);
        assert!((hero.position.y - 200.0).abs() < 1e-3);
        assert_eq!(hero.facing, 1.5);
    }

    #[test]
    fn each_queued_input_moves_once_and_is_acknowledged() {
        let mut hero = hero_at(100.0, 100.0);
        queue(&mut hero, 4, Vec2::new(1.0, 0.0), 0.0);
        queue(&mut hero, 5, Vec2::new(1.0, 0.0), 0.0);

        tick_hero(&mut hero, 0.1, CFG);
        assert!((hero.position.x - 140.0).abs() < 1e-3);
        assert_eq!(hero.last_processed_input_seq, 5);
        assert!(hero.pending_inputs.is_empty());

        // An empty queue holds position.
        tick_hero(&mut hero, 0.1, CFG);
        assert!((hero.position.x - 140.0).abs() < 1e-3);
    }

    #[test]
    fn dead_hero_does_not_move_but_consumes_inputs() {
        let mut hero = hero_at(100.0, 100.0);
        hero.dead = true;
        queue(&mut hero, 1, Vec2::new(1.0, 0.0), 0.0);

        tick_hero(&mut hero, 1.0, CFG);
        assert_eq!(hero.position, Vec2::new(100.0, 100.0));
        assert_eq!(hero.last_processed_input_seq, 1);
    }

    #[test]
    fn derived_facing_follows_direction() {
        let (_, facing) =
            step_with_derived_facing(Vec2::new(50.0, 50.0), Vec2::new(0.0, 2.0), 100.0, 0.1, CFG)
                .expect("movement requested");
        assert!((facing - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
