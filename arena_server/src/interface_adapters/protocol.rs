// Wire protocol DTOs and conversions for public arena server messages.
// The simulation never sees these types; everything is translated at this boundary.

use crate::domain::{
    EntityId, HeroClass, HeroInput, HeroSnapshot, ProjectileSnapshot, Team, TowerSnapshot,
};
use crate::use_cases::{ServerState, WorldUpdate};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Messages the server sends to connected clients over the WebSocket.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    // Assigned identity for the connection after Join is accepted.
    Identity { player_id: String, match_id: String },
    // Snapshot of the world for a given tick.
    WorldUpdate(WorldUpdateDto),
    // Match phase transitions (lobby, start, end).
    GameState(ServerStateDto),
}

/// Messages the client sends to the server over the WebSocket.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientMessage {
    // Initial handshake message with identity metadata.
    Join(JoinPayload),
    // Input messages sent after a successful Join.
    Input(InputMessage),
}

/// Payload for the Join handshake.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinPayload {
    /// Stable id for reconnects and rostered matches; a fresh one is issued when absent.
    #[serde(default)]
    pub player_id: Option<String>,
    #[serde(default)]
    pub display_name: String,
    /// Class for open matches; rostered matches ignore it.
    #[serde(default)]
    pub hero_class: Option<HeroClassDto>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamDto {
    Blue,
    Red,
}

impl From<Team> for TeamDto {
    fn from(team: Team) -> Self {
        match team {
            Team::Blue => TeamDto::Blue,
            Team::Red => TeamDto::Red,
        }
    }
}

impl From<TeamDto> for Team {
    fn from(team: TeamDto) -> Self {
        match team {
            TeamDto::Blue => Team::Blue,
            TeamDto::Red => Team::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeroClassDto {
    Warrior,
    Ranger,
}

impl From<HeroClass> for HeroClassDto {
    fn from(class: HeroClass) -> Self {
        match class {
            HeroClass::Warrior => HeroClassDto::Warrior,
            HeroClass::Ranger => HeroClassDto::Ranger,
        }
    }
}

impl From<HeroClassDto> for HeroClass {
    fn from(class: HeroClassDto) -> Self {
        match class {
            HeroClassDto::Warrior => HeroClass::Warrior,
            HeroClassDto::Ranger => HeroClass::Ranger,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Vec2Dto {
    pub x: f32,
    pub y: f32,
}

/// Per-input payload sent by the client after joining.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputMessage {
    pub seq: u64,
    #[serde(default)]
    pub move_dir: Vec2Dto,
    #[serde(default)]
    pub attack_target_id: Option<String>,
    #[serde(default)]
    pub facing: f32,
}

/// The attack target id was not a valid entity id.
#[derive(Debug, PartialEq)]
pub struct InvalidTargetId(pub String);

impl TryFrom<InputMessage> for HeroInput {
    type Error = InvalidTargetId;

    fn try_from(msg: InputMessage) -> Result<Self, Self::Error> {
        let attack_target_id = match msg.attack_target_id {
            Some(raw) => match raw.parse::<u64>() {
                Ok(id) => Some(EntityId(id)),
                Err(_) => return Err(InvalidTargetId(raw)),
            },
            None => None,
        };

        Ok(Self {
            seq: msg.seq,
            move_dir: Vec2::new(msg.move_dir.x, msg.move_dir.y),
            attack_target_id,
            facing: msg.facing,
        })
    }
}

/// Snapshot of the world sent to clients on each tick.
#[derive(Debug, Clone, Serialize)]
pub struct WorldUpdateDto {
    pub tick: u64,
    pub heroes: Vec<HeroStateDto>,
    pub towers: Vec<TowerStateDto>,
    pub projectiles: Vec<ProjectileStateDto>,
}

impl From<WorldUpdate> for WorldUpdateDto {
    fn from(update: WorldUpdate) -> Self {
        Self {
            tick: update.tick,
            heroes: update.heroes.iter().map(HeroStateDto::from).collect(),
            towers: update.towers.iter().map(TowerStateDto::from).collect(),
            projectiles: update
                .projectiles
                .iter()
                .map(ProjectileStateDto::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroStateDto {
    pub id: String,
    pub player_id: String,
    pub hero_class: HeroClassDto,
    pub team: TeamDto,
    pub x: f32,
    pub y: f32,
    pub facing: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    pub attack_damage: f32,
    pub attack_range: f32,
    pub attack_speed: f32,
    pub radius: f32,
    pub attack_cooldown: f32,
    pub attack_target_id: Option<String>,
    pub dead: bool,
    pub respawn_timer: f32,
    pub last_processed_input_seq: u64,
}

impl From<&HeroSnapshot> for HeroStateDto {
    fn from(hero: &HeroSnapshot) -> Self {
        Self {
            id: hero.id.to_string(),
            player_id: hero.player_id.to_string(),
            hero_class: hero.class.into(),
            team: hero.team.into(),
            x: hero.x,
            y: hero.y,
            facing: hero.facing,
            hp: hero.hp,
            max_hp: hero.max_hp,
            speed: hero.speed,
            attack_damage: hero.attack_damage,
            attack_range: hero.attack_range,
            attack_speed: hero.attack_speed,
            radius: hero.radius,
            attack_cooldown: hero.attack_cooldown,
            attack_target_id: hero.attack_target_id.map(|id| id.to_string()),
            dead: hero.dead,
            respawn_timer: hero.respawn_timer,
            last_processed_input_seq: hero.last_processed_input_seq,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TowerStateDto {
    pub id: String,
    pub team: TeamDto,
    pub x: f32,
    pub y: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub attack_damage: f32,
    pub attack_range: f32,
    pub attack_speed: f32,
    pub radius: f32,
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    pub attack_cooldown: f32,
    pub attack_target_id: Option<String>,
    pub dead: bool,
}

impl From<&TowerSnapshot> for TowerStateDto {
    fn from(tower: &TowerSnapshot) -> Self {
        Self {
            id: tower.id.to_string(),
            team: tower.team.into(),
            x: tower.x,
            y: tower.y,
            hp: tower.hp,
            max_hp: tower.max_hp,
            attack_damage: tower.attack_damage,
            attack_range: tower.attack_range,
            attack_speed: tower.attack_speed,
            radius: tower.radius,
            projectile_speed: tower.projectile_speed,
            projectile_radius: tower.projectile_radius,
            attack_cooldown: tower.attack_cooldown,
            attack_target_id: tower.attack_target_id.map(|id| id.to_string()),
            dead: tower.dead,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectileStateDto {
    pub id: String,
    pub owner_id: String,
    pub team: TeamDto,
    pub x: f32,
    pub y: f32,
    pub target_x: f32,
    pub target_y: f32,
    pub speed: f32,
    pub damage: f32,
}

impl From<&ProjectileSnapshot> for ProjectileStateDto {
    fn from(projectile: &ProjectileSnapshot) -> Self {
        Self {
            id: projectile.id.to_string(),
            owner_id: projectile.owner_id.to_string(),
            team: projectile.team.into(),
            x: projectile.x,
            y: projectile.y,
            target_x: projectile.target_x,
            target_y: projectile.target_y,
            speed: projectile.speed,
            damage: projectile.damage,
        }
    }
}

/// Match phase sent to clients for UI flow.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all_fields = "camelCase")]
pub enum ServerStateDto {
    Lobby,
    MatchStarting { in_seconds: u32 },
    MatchRunning,
    MatchEnded { winner: Option<TeamDto> },
}

impl From<ServerState> for ServerStateDto {
    fn from(state: ServerState) -> Self {
        match state {
            ServerState::Lobby => ServerStateDto::Lobby,
            ServerState::MatchStarting { in_seconds } => {
                ServerStateDto::MatchStarting { in_seconds }
            }
            ServerState::MatchRunning => ServerStateDto::MatchRunning,
            ServerState::MatchEnded { winner } => ServerStateDto::MatchEnded {
                winner: winner.map(TeamDto::from),
            },
        }
    }
}
