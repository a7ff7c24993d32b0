// Match orchestration for spawning and managing arena world tasks.

use crate::domain::tuning::ArenaTuning;
use crate::domain::{HeroClass, Team};
use crate::use_cases::game::world_task;
use crate::use_cases::{GameEvent, ServerState, WorldUpdate};
use axum::extract::ws::Utf8Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify, RwLock, broadcast, mpsc, watch};
use tracing::{info, warn};

/// Shared configuration for spawning match worlds.
#[derive(Debug, Clone)]
pub struct MatchSettings {
    /// Capacity for inbound player events.
    pub input_channel_capacity: usize,
    /// Capacity for broadcast world updates.
    pub world_broadcast_capacity: usize,
    /// Fixed tick interval for the game loop.
    pub tick_interval: Duration,
    /// Countdown between match creation and the first tick.
    pub start_delay: Duration,
    /// Time limit for created matches (zero disables it).
    pub default_match_time_limit: Duration,
    /// How long a finished match stays reachable before it is torn down.
    pub end_linger: Duration,
    pub tuning: ArenaTuning,
}

/// Errors returned by match registry operations.
#[derive(Debug, PartialEq)]
pub enum MatchError {
    /// Match already exists and cannot be re-created.
    AlreadyExists,
    /// Roster puts more players on a team than the arena seats.
    TeamFull(Team),
    /// Roster lists the same player twice.
    DuplicatePlayer(u64),
}

/// A pre-assigned seat in a rostered match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RosterEntry {
    pub player_id: u64,
    pub team: Team,
    pub hero_class: HeroClass,
}

/// How a connecting player takes part in a match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Admission {
    /// Open match: any player joins and the arena balances teams.
    Open,
    /// Rostered match: team and class come from the roster.
    Seated(RosterEntry),
    /// Not on the roster; receives updates but controls nothing.
    Spectator,
}

/// Tracks which socket currently owns each player id.
#[derive(Debug, Default)]
pub struct PlayerConnections {
    slots: Mutex<HashMap<u64, (u64, Arc<Notify>)>>,
}

impl PlayerConnections {
    /// Claims the slot for `player_id`, telling any older connection to close.
    pub async fn register_or_replace(&self, player_id: u64, token: u64) -> Arc<Notify> {
        let shutdown = Arc::new(Notify::new());
        let mut slots = self.slots.lock().await;
        if let Some((_, previous)) = slots.insert(player_id, (token, shutdown.clone())) {
            previous.notify_one();
        }
        shutdown
    }

    /// Frees the slot if `token` still owns it. Returns whether it did.
    pub async fn unregister_if_owner(&self, player_id: u64, token: u64) -> bool {
        let mut slots = self.slots.lock().await;
        match slots.get(&player_id) {
            Some((owner, _)) if *owner == token => {
                slots.remove(&player_id);
                true
            }
            _ => false,
        }
    }
}

/// Per-match channels and access rules.
#[derive(Clone, Debug)]
pub struct MatchHandle {
    /// Identifier clients use to target this match.
    pub match_id: Arc<str>,
    /// Sender for game events into the match world task.
    pub input_tx: mpsc::Sender<GameEvent>,
    /// Broadcast sender for raw world updates.
    pub world_tx: broadcast::Sender<WorldUpdate>,
    /// Broadcast sender for serialized world updates.
    pub world_bytes_tx: broadcast::Sender<Utf8Bytes>,
    /// Watch sender for match phase changes.
    pub server_state_tx: watch::Sender<ServerState>,
    pub connections: Arc<PlayerConnections>,
    roster: Arc<HashMap<u64, RosterEntry>>,
    shutdown: Arc<Notify>,
    pinned: bool,
}

impl MatchHandle {
    pub fn admission(&self, player_id: u64) -> Admission {
        if self.roster.is_empty() {
            return Admission::Open;
        }
        match self.roster.get(&player_id) {
            Some(entry) => Admission::Seated(*entry),
            None => Admission::Spectator,
        }
    }
}

/// Thread-safe registry for active matches.
#[derive(Debug)]
pub struct MatchRegistry {
    /// Global settings applied to newly created matches.
    settings: MatchSettings,
    /// Map of match id to active handle.
    matches: RwLock<HashMap<String, MatchHandle>>,
}

impl MatchRegistry {
    pub fn new(settings: MatchSettings) -> Self {
        Self {
            settings,
            matches: RwLock::new(HashMap::new()),
        }
    }

    pub fn default_match_time_limit(&self) -> Duration {
        self.settings.default_match_time_limit
    }

    /// Creates a new match and spawns its world task.
    ///
    /// An empty roster makes an open match. Pinned matches are never removed.
    pub async fn create_match(
        &self,
        match_id: String,
        roster: Vec<RosterEntry>,
        pinned: bool,
        match_time_limit: Duration,
    ) -> Result<MatchHandle, MatchError> {
        let roster = validate_roster(roster, self.settings.tuning.heroes_per_team)?;

        let mut matches = self.matches.write().await;
        if matches.contains_key(&match_id) {
            return Err(MatchError::AlreadyExists);
        }

        // Channel wiring for the match world loop.
        let (input_tx, input_rx) =
            mpsc::channel::<GameEvent>(self.settings.input_channel_capacity);
        let (world_tx, _world_rx) =
            broadcast::channel::<WorldUpdate>(self.settings.world_broadcast_capacity);
        let (world_bytes_tx, _world_bytes_rx) =
            broadcast::channel::<Utf8Bytes>(self.settings.world_broadcast_capacity);
        let (server_state_tx, _server_state_rx) =
            watch::channel::<ServerState>(ServerState::Lobby);
        let shutdown = Arc::new(Notify::new());

        // Spawn the authoritative world loop for this match.
        tokio::spawn(world_task(
            input_rx,
            world_tx.clone(),
            server_state_tx.clone(),
            self.settings.tick_interval,
            self.settings.start_delay,
            shutdown.clone(),
            match_time_limit,
            self.settings.tuning.clone(),
        ));

        let handle = MatchHandle {
            match_id: Arc::from(match_id.as_str()),
            input_tx,
            world_tx,
            world_bytes_tx,
            server_state_tx,
            connections: Arc::new(PlayerConnections::default()),
            roster: Arc::new(roster),
            shutdown,
            pinned,
        };

        info!(match_id = %match_id, pinned, seats = handle.roster.len(), "match created");
        matches.insert(match_id, handle.clone());
        Ok(handle)
    }

    /// Returns a match handle for the provided id, if it exists.
    pub async fn get_match(&self, match_id: &str) -> Option<MatchHandle> {
        let matches = self.matches.read().await;
        matches.get(match_id).cloned()
    }

    /// Removes an unpinned match and stops its world task.
    pub async fn remove_match(&self, match_id: &str) -> bool {
        let mut matches = self.matches.write().await;
        let Some(handle) = matches.get(match_id) else {
            return false;
        };
        if handle.pinned {
            return false;
        }
        if let Some(handle) = matches.remove(match_id) {
            handle.shutdown.notify_one();
        }
        info!(match_id, "match removed");
        true
    }

    /// Watches a match's phase and tears it down some time after it ends.
    pub fn spawn_match_end_watcher(
        self: Arc<Self>,
        match_id: Arc<str>,
        mut server_state_rx: watch::Receiver<ServerState>,
    ) {
        let linger = self.settings.end_linger;
        tokio::spawn(async move {
            let ended = server_state_rx
                .wait_for(|state| matches!(state, ServerState::MatchEnded { .. }))
                .await
                .is_ok();
            if !ended {
                warn!(match_id = %match_id, "server state channel closed; watcher exiting");
                return;
            }

            tokio::time::sleep(linger).await;
            self.remove_match(&match_id).await;
        });
    }
}

fn validate_roster(
    roster: Vec<RosterEntry>,
    heroes_per_team: usize,
) -> Result<HashMap<u64, RosterEntry>, MatchError> {
    let mut seats = HashMap::with_capacity(roster.len());
    for entry in roster {
        if seats.insert(entry.player_id, entry).is_some() {
            return Err(MatchError::DuplicatePlayer(entry.player_id));
        }
    }
    for team in [Team::Blue, Team::Red] {
        if seats.values().filter(|e| e.team == team).count() > heroes_per_team {
            return Err(MatchError::TeamFull(team));
        }
    }
    Ok(seats)
}
