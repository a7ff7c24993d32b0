// Use-case level inputs/outputs for the match loop.

use crate::domain::{
    HeroClass, HeroInput, HeroSnapshot, ProjectileSnapshot, Team, TowerSnapshot, WorldSnapshot,
};

#[derive(Debug, Clone)]
pub enum GameEvent {
    /// `team` is fixed by the match roster; `None` lets the arena balance teams.
    Join {
        player_id: u64,
        team: Option<Team>,
        hero_class: HeroClass,
    },
    Leave {
        player_id: u64,
    },
    Input {
        player_id: u64,
        input: HeroInput,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServerState {
    Lobby,
    MatchStarting { in_seconds: u32 },
    MatchRunning,
    /// `winner` is `None` for a draw (time limit reached with towers on both sides).
    MatchEnded { winner: Option<Team> },
}

#[derive(Debug, Clone)]
pub struct WorldUpdate {
    pub tick: u64,
    pub heroes: Vec<HeroSnapshot>,
    pub towers: Vec<TowerSnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
}

impl From<WorldSnapshot> for WorldUpdate {
    fn from(snapshot: WorldSnapshot) -> Self {
        Self {
            tick: snapshot.tick,
            heroes: snapshot.heroes,
            towers: snapshot.towers,
            projectiles: snapshot.projectiles,
        }
    }
}
