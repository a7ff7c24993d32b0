// Use cases layer: application workflows for the arena server.

pub mod game;
pub mod matches;
pub mod types;

pub use matches::{
    Admission, MatchError, MatchHandle, MatchRegistry, MatchSettings, PlayerConnections,
    RosterEntry,
};
pub use types::{GameEvent, ServerState, WorldUpdate};
