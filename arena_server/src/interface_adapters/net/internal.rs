use crate::domain::Team;
use crate::interface_adapters::http::error_response;
use crate::interface_adapters::net::client::spawn_match_serializer;
use crate::interface_adapters::protocol::{HeroClassDto, TeamDto};
use crate::interface_adapters::state::AppState;
use crate::use_cases::{MatchError, RosterEntry};

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

#[derive(Debug, serde::Deserialize)]
pub struct MatchInitRequest {
    // Match id chosen by the caller (matchmaking).
    match_id: String,
    // Pre-assigned seats; empty creates an open match.
    #[serde(default)]
    roster: Vec<RosterSeatDto>,
}

#[derive(Debug, serde::Deserialize)]
struct RosterSeatDto {
    player_id: u64,
    team: TeamDto,
    #[serde(default)]
    hero_class: Option<HeroClassDto>,
}

impl From<RosterSeatDto> for RosterEntry {
    fn from(seat: RosterSeatDto) -> Self {
        Self {
            player_id: seat.player_id,
            team: seat.team.into(),
            hero_class: seat.hero_class.map(Into::into).unwrap_or_default(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct MatchInitResponse {
    match_id: String,
}

pub async fn create_match_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MatchInitRequest>,
) -> impl IntoResponse {
    let match_id = payload.match_id.trim().to_string();
    if match_id.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "match_id is required");
    }

    let roster = payload.roster.into_iter().map(RosterEntry::from).collect();

    // Created matches are not pinned and are removed after they end.
    let result = state
        .match_registry
        .create_match(
            match_id.clone(),
            roster,
            false,
            state.match_registry.default_match_time_limit(),
        )
        .await;

    match result {
        Ok(handle) => {
            // Create the serializer so clients can subscribe immediately.
            spawn_match_serializer(&handle);
            state
                .match_registry
                .clone()
                .spawn_match_end_watcher(handle.match_id.clone(), handle.server_state_tx.subscribe());
            (StatusCode::CREATED, Json(MatchInitResponse { match_id })).into_response()
        }
        Err(MatchError::AlreadyExists) => {
            error_response(StatusCode::CONFLICT, "match already exists")
        }
        Err(MatchError::TeamFull(team)) => error_response(
            StatusCode::BAD_REQUEST,
            format!("too many players on team {}", team_name(team)),
        ),
        Err(MatchError::DuplicatePlayer(player_id)) => error_response(
            StatusCode::BAD_REQUEST,
            format!("player {player_id} is listed more than once"),
        ),
    }
}

fn team_name(team: Team) -> &'static str {
    match TeamDto::from(team) {
        TeamDto::Blue => "blue",
        TeamDto::Red => "red",
    }
}
