// Per-match simulation container and the fixed system pipeline.

use crate::domain::state::{
    EntityId, Hero, HeroClass, HeroInput, HeroSnapshot, Projectile, ProjectileSnapshot, Team,
    Tower, TowerSnapshot, WorldSnapshot,
};
use crate::domain::systems::hero_combat::CombatConfig;
use crate::domain::systems::movement::MovementConfig;
use crate::domain::systems::projectiles::ProjectileConfig;
use crate::domain::systems::respawn::RespawnConfig;
use crate::domain::systems::{hero_combat, movement, projectiles, respawn, tower_combat};
use crate::domain::tuning::{ArenaTuning, HeroTuning};

// Roughly one second of inputs at 60 Hz; anything beyond is a flood.
const MAX_QUEUED_INPUTS: usize = 64;

/// Entity id source owned by a single match, so concurrent matches never share counters.
#[derive(Debug)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Arena {
    pub heroes: Vec<Hero>,
    pub towers: Vec<Tower>,
    pub projectiles: Vec<Projectile>,
    tick: u64,
    ids: IdGenerator,
    tuning: ArenaTuning,
}

impl Arena {
    /// Creates an empty match with towers placed from tuning.
    pub fn new(tuning: ArenaTuning) -> Self {
        let mut ids = IdGenerator::new();
        let towers = tuning
            .towers
            .iter()
            .map(|placement| {
                Tower::new(
                    ids.next_id(),
                    placement.team,
                    placement.position,
                    &tuning.tower,
                )
            })
            .collect();

        Self {
            heroes: Vec::new(),
            towers,
            projectiles: Vec::new(),
            tick: 0,
            ids,
            tuning,
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn movement_config(&self) -> MovementConfig {
        MovementConfig {
            world_width: self.tuning.world_width,
            world_height: self.tuning.world_height,
        }
    }

    pub fn respawn_config(&self) -> RespawnConfig {
        RespawnConfig {
            respawn_seconds: self.tuning.respawn_seconds,
            blue_spawn: self.tuning.blue_spawn,
            red_spawn: self.tuning.red_spawn,
        }
    }

    /// Picks the team with the fewest heroes that still has a free slot (Blue on ties).
    pub fn assign_team(&self) -> Option<Team> {
        let blue = self.team_size(Team::Blue);
        let red = self.team_size(Team::Red);
        let cap = self.tuning.heroes_per_team;

        if blue <= red && blue < cap {
            Some(Team::Blue)
        } else if red < cap {
            Some(Team::Red)
        } else {
            None
        }
    }

    pub fn team_size(&self, team: Team) -> usize {
        self.heroes.iter().filter(|h| h.team == team).count()
    }

    /// Creates a hero at its team spawn. A player that already owns a hero gets it back.
    pub fn spawn_hero(&mut self, player_id: u64, team: Team, class: HeroClass) -> EntityId {
        if let Some(existing) = self.hero_by_player(player_id) {
            return existing.id;
        }

        let id = self.ids.next_id();
        let position = self.respawn_config().spawn_point(team);
        self.heroes.push(Hero::new(
            id,
            player_id,
            team,
            class,
            position,
            &HeroTuning::for_class(class),
        ));
        id
    }

    pub fn hero_by_player(&self, player_id: u64) -> Option<&Hero> {
        self.heroes.iter().find(|h| h.player_id == player_id)
    }

    /// Queues an input for the next tick. Every queued input is simulated once, so
    /// the server replays exactly what the client predicted.
    ///
    /// Returns false when the player has no hero, the queue is full, or the sequence
    /// number is not newer than everything already processed or queued (duplicates
    /// and reordered packets).
    pub fn apply_input(&mut self, player_id: u64, input: HeroInput) -> bool {
        let Some(hero) = self.heroes.iter_mut().find(|h| h.player_id == player_id) else {
            return false;
        };
        let newest = hero
            .pending_inputs
            .back()
            .map_or(hero.last_processed_input_seq, |queued| queued.seq);
        if input.seq <= newest || hero.pending_inputs.len() >= MAX_QUEUED_INPUTS {
            return false;
        }

        hero.pending_inputs.push_back(input);
        true
    }

    /// Drops held intent for a disconnected player; the hero stays in the match.
    pub fn release_input(&mut self, player_id: u64) {
        if let Some(hero) = self.heroes.iter_mut().find(|h| h.player_id == player_id) {
            hero.pending_inputs.clear();
            hero.last_input = HeroInput {
                seq: hero.last_input.seq,
                ..HeroInput::default()
            };
        }
    }

    /// A reconnecting client starts a fresh input sequence; forget the old one.
    pub fn restart_input_sequence(&mut self, player_id: u64) {
        if let Some(hero) = self.heroes.iter_mut().find(|h| h.player_id == player_id) {
            hero.pending_inputs.clear();
            hero.last_processed_input_seq = 0;
            hero.last_input = HeroInput::default();
        }
    }

    /// Advances the simulation by one tick of `dt` seconds. Queued inputs are each
    /// simulated over `dt` as well, matching a client that sends one input per tick.
    pub fn step(&mut self, dt: f32) {
        let movement_cfg = self.movement_config();
        let respawn_cfg = self.respawn_config();
        let combat_cfg = CombatConfig {
            min_attack_speed: self.tuning.min_attack_speed,
        };
        let projectile_cfg = ProjectileConfig {
            radius: self.tuning.projectile_radius,
        };

        for hero in &mut self.heroes {
            movement::tick_hero(hero, dt, movement_cfg);
        }

        hero_combat::tick_heroes(
            &mut self.heroes,
            &mut self.towers,
            &mut self.projectiles,
            &mut self.ids,
            dt,
            combat_cfg,
        );

        tower_combat::tick_towers(
            &mut self.towers,
            &self.heroes,
            &mut self.projectiles,
            &mut self.ids,
            dt,
            combat_cfg,
        );

        projectiles::tick_projectiles(
            &mut self.projectiles,
            &mut self.heroes,
            &mut self.towers,
            dt,
            projectile_cfg,
        );

        respawn::tick_heroes(&mut self.heroes, dt, respawn_cfg);
        respawn::tick_towers(&mut self.towers);

        self.tick += 1;
    }

    fn towers_destroyed(&self, team: Team) -> bool {
        let mut towers = self.towers.iter().filter(|t| t.team == team).peekable();
        towers.peek().is_some() && towers.all(|t| t.dead)
    }

    /// True once either team has lost all of its towers.
    pub fn is_over(&self) -> bool {
        self.towers_destroyed(Team::Blue) || self.towers_destroyed(Team::Red)
    }

    /// The team still holding a tower after the other side lost all of theirs.
    pub fn winner(&self) -> Option<Team> {
        match (
            self.towers_destroyed(Team::Blue),
            self.towers_destroyed(Team::Red),
        ) {
            (false, true) => Some(Team::Blue),
            (true, false) => Some(Team::Red),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            heroes: self.heroes.iter().map(HeroSnapshot::from).collect(),
            towers: self
                .towers
                .iter()
                .map(|t| TowerSnapshot::new(t, self.tuning.projectile_radius))
                .collect(),
            projectiles: self
                .projectiles
                .iter()
                .map(ProjectileSnapshot::from)
                .collect(),
        }
    }
}
