use super::types::{GameEvent, ServerState, WorldUpdate};
use crate::domain::Arena;
use crate::domain::tuning::ArenaTuning;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, broadcast, mpsc, watch};
use tracing::{debug, info};

/// Authoritative loop for one match.
///
/// Queued events are applied before every tick, then the arena steps once and a
/// snapshot is broadcast. After the match ends the arena is frozen but snapshots
/// keep flowing so late subscribers still see the final state.
#[allow(clippy::too_many_arguments)]
pub async fn world_task(
    mut input_rx: mpsc::Receiver<GameEvent>,
    world_tx: broadcast::Sender<WorldUpdate>,
    server_state_tx: watch::Sender<ServerState>,
    tick_interval: Duration,
    start_delay: Duration,
    shutdown: Arc<Notify>,
    match_time_limit: Duration,
    tuning: ArenaTuning,
) {
    let mut arena = Arena::new(tuning);

    if !start_delay.is_zero() {
        let in_seconds = start_delay.as_secs_f32().ceil() as u32;
        info!(in_seconds, "match starting");
        let _ = server_state_tx.send(ServerState::MatchStarting { in_seconds });
        tokio::select! {
            _ = shutdown.notified() => return,
            _ = tokio::time::sleep(start_delay) => {}
        }
    }
    let _ = server_state_tx.send(ServerState::MatchRunning);
    info!("match running");

    // Drive the fixed-step game loop at the configured tick rate.
    let mut interval = tokio::time::interval(tick_interval);
    let dt = tick_interval.as_secs_f32();

    let mut match_elapsed = Duration::ZERO;
    let mut match_ended = false;

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                // Exit cleanly when the match is removed.
                break;
            }
            _ = interval.tick() => {}
        }

        while let Ok(ev) = input_rx.try_recv() {
            apply_event(&mut arena, ev);
        }

        if !match_ended {
            arena.step(dt);
            match_elapsed += tick_interval;

            // 0 disables the time limit.
            let out_of_time = !match_time_limit.is_zero() && match_elapsed >= match_time_limit;
            if arena.is_over() || out_of_time {
                let winner = arena.winner();
                info!(?winner, tick = arena.tick(), "match ended");
                let _ = server_state_tx.send(ServerState::MatchEnded { winner });
                match_ended = true;
            }
        }

        let _ = world_tx.send(WorldUpdate::from(arena.snapshot()));
    }

    debug!(tick = arena.tick(), "world task stopped");
}

fn apply_event(arena: &mut Arena, event: GameEvent) {
    match event {
        GameEvent::Join {
            player_id,
            team,
            hero_class,
        } => {
            if let Some(hero) = arena.hero_by_player(player_id) {
                let hero_id = hero.id;
                arena.restart_input_sequence(player_id);
                info!(player_id, %hero_id, "player rejoined");
                return;
            }

            let Some(team) = team.or_else(|| arena.assign_team()) else {
                info!(player_id, "teams are full; player is spectating");
                return;
            };
            let hero_id = arena.spawn_hero(player_id, team, hero_class);
            info!(player_id, %hero_id, ?team, ?hero_class, "player joined");
        }
        GameEvent::Leave { player_id } => {
            info!(player_id, "player left");
            arena.release_input(player_id);
        }
        GameEvent::Input { player_id, input } => {
            // Stale or duplicate sequence numbers are dropped by the arena.
            arena.apply_input(player_id, input);
        }
    }
}
