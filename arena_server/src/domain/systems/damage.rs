// Cross-collection target lookup and the single damage routine shared by all attack paths.

use crate::domain::state::{EntityId, Hero, Targetable, Team, Tower};
use glam::Vec2;

pub fn find_target<'a>(
    heroes: &'a [Hero],
    towers: &'a [Tower],
    id: EntityId,
) -> Option<&'a dyn Targetable> {
    if let Some(h) = heroes.iter().find(|h| h.id == id) {
        return Some(h);
    }
    towers.iter().find(|t| t.id == id).map(|t| t as &dyn Targetable)
}

pub fn find_target_mut<'a>(
    heroes: &'a mut [Hero],
    towers: &'a mut [Tower],
    id: EntityId,
) -> Option<&'a mut dyn Targetable> {
    if let Some(h) = heroes.iter_mut().find(|h| h.id == id) {
        return Some(h);
    }
    towers
        .iter_mut()
        .find(|t| t.id == id)
        .map(|t| t as &mut dyn Targetable)
}

/// Subtracts `amount` from the target's hp, floored at zero.
///
/// Returns the remaining hp, or `None` when no entity has that id.
pub fn apply_damage(
    heroes: &mut [Hero],
    towers: &mut [Tower],
    target_id: EntityId,
    amount: f32,
) -> Option<f32> {
    let target = find_target_mut(heroes, towers, target_id)?;
    let hp = (target.hp() - amount.max(0.0)).max(0.0);
    target.set_hp(hp);
    Some(target.hp())
}

/// Center distance minus both radii.
pub fn effective_distance(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> f32 {
    a.distance(b) - a_radius - b_radius
}

/// Attacker-side data needed to validate a target.
#[derive(Debug, Clone, Copy)]
pub struct AttackerView {
    pub team: Team,
    pub position: Vec2,
    pub radius: f32,
    pub attack_range: f32,
}

impl AttackerView {
    pub fn can_attack(&self, target: &dyn Targetable) -> bool {
        target.is_targetable()
            && target.team() != self.team
            && effective_distance(self.position, self.radius, target.position(), target.radius())
                <= self.attack_range
    }
}

impl From<&Hero> for AttackerView {
    fn from(h: &Hero) -> Self {
        Self {
            team: h.team,
            position: h.position,
            radius: h.radius,
            attack_range: h.attack_range,
        }
    }
}

impl From<&Tower> for AttackerView {
    fn from(t: &Tower) -> Self {
        Self {
            team: t.team,
            position: t.position,
            radius: t.radius,
            attack_range: t.attack_range,
        }
    }
}

/// Seconds until the next attack; `min_attack_speed` keeps a zero speed from dividing by zero.
pub fn attack_cooldown(attack_speed: f32, min_attack_speed: f32) -> f32 {
    1.0 / attack_speed.max(min_attack_speed)
}
