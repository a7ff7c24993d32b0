//! Client-side input buffering, movement prediction and server reconciliation.
//!
//! Clients apply their own inputs immediately, keep them until the server reports
//! them processed, and replay whatever is still unacknowledged on top of every
//! authoritative snapshot. Replays go through the same movement math as the
//! authoritative loop so both sides agree on where a hero ends up.

use crate::domain::state::{EntityId, HeroInput, HeroSnapshot};
use crate::domain::systems::movement::{self, MovementConfig};
use crate::domain::systems::projectiles::advance_toward;
use glam::Vec2;
use std::collections::VecDeque;

/// Sequence-numbered inputs that the server has not acknowledged yet.
#[derive(Debug)]
pub struct InputBuffer {
    next_seq: u64,
    pending: VecDeque<HeroInput>,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self {
            next_seq: 1,
            pending: VecDeque::new(),
        }
    }

    /// Stamps the next sequence number on a new input and queues it.
    ///
    /// The returned copy is what gets sent to the server.
    pub fn record(
        &mut self,
        move_dir: Vec2,
        attack_target_id: Option<EntityId>,
        facing: f32,
    ) -> HeroInput {
        let input = HeroInput {
            seq: self.next_seq,
            move_dir,
            attack_target_id,
            facing,
        };
        self.next_seq += 1;
        self.pending.push_back(input.clone());
        input
    }

    /// Drops every input with `seq <= acked_seq`. Older acknowledgements are no-ops.
    pub fn acknowledge(&mut self, acked_seq: u64) {
        while self
            .pending
            .front()
            .is_some_and(|input| input.seq <= acked_seq)
        {
            self.pending.pop_front();
        }
    }

    pub fn pending(&self) -> impl Iterator<Item = &HeroInput> {
        self.pending.iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// The parts of a hero snapshot reconciliation needs.
#[derive(Debug, Clone, Copy)]
pub struct AuthoritativeHero {
    pub position: Vec2,
    pub facing: f32,
    pub dead: bool,
    pub last_processed_input_seq: u64,
}

impl From<&HeroSnapshot> for AuthoritativeHero {
    fn from(s: &HeroSnapshot) -> Self {
        Self {
            position: Vec2::new(s.x, s.y),
            facing: s.facing,
            dead: s.dead,
            last_processed_input_seq: s.last_processed_input_seq,
        }
    }
}

/// Locally predicted position of the player's own hero.
#[derive(Debug, Clone)]
pub struct MovementPredictor {
    position: Vec2,
    facing: f32,
    dead: bool,
    speed: f32,
    /// Fixed delta applied per input, matching the server tick.
    input_dt: f32,
    cfg: MovementConfig,
}

impl MovementPredictor {
    pub fn new(position: Vec2, speed: f32, input_dt: f32, cfg: MovementConfig) -> Self {
        Self {
            position,
            facing: 0.0,
            dead: false,
            speed,
            input_dt,
            cfg,
        }
    }

    pub fn from_snapshot(hero: &HeroSnapshot, input_dt: f32, cfg: MovementConfig) -> Self {
        let mut predictor = Self::new(Vec2::new(hero.x, hero.y), hero.speed, input_dt, cfg);
        predictor.facing = hero.facing;
        predictor.dead = hero.dead;
        predictor
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    /// Applies one input locally without waiting for the server.
    pub fn apply_input(&mut self, input: &HeroInput) {
        if self.dead {
            return;
        }
        if let Some(position) = movement::step(
            self.position,
            input.move_dir,
            self.speed,
            self.input_dt,
            self.cfg,
        ) {
            self.position = position;
            self.facing = input.facing;
        }
    }

    /// Resets to the server's view and replays inputs it has not processed yet, in order.
    pub fn reconcile(&mut self, server: &AuthoritativeHero, buffer: &mut InputBuffer) {
        buffer.acknowledge(server.last_processed_input_seq);

        self.position = server.position;
        self.facing = server.facing;
        self.dead = server.dead;

        for input in buffer.pending() {
            self.apply_input(input);
        }
    }
}

/// Advances a replicated projectile between snapshots.
///
/// Uses the same fixed target point as the server rather than homing on the live
/// target. Returns `None` once the server would have removed it on arrival.
pub fn predict_projectile(position: Vec2, target: Vec2, speed: f32, dt: f32) -> Option<Vec2> {
    match advance_toward(position, target, speed, dt)? {
        (_, true) => None,
        (next, false) => Some(next),
    }
}
