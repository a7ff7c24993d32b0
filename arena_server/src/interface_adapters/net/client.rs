// Player sessions over WebSocket: join handshake, seat admission, input forwarding
// and per-match world update fan-out.

use crate::domain::{HeroClass, HeroInput};
use crate::interface_adapters::http::error_response;
use crate::interface_adapters::protocol::{
    ClientMessage, InputMessage, JoinPayload, ServerMessage, WorldUpdateDto,
};
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::utils::rng::{connection_id, guest_player_id};
use crate::use_cases::{
    Admission, GameEvent, MatchHandle, PlayerConnections, ServerState, WorldUpdate,
};

use axum::{
    extract::{
        Query, State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::SinkExt;
use std::{sync::Arc, time::Duration};
use tokio::sync::{Notify, broadcast, mpsc, watch};
use tokio::time::timeout;
use tracing::{Instrument, Span, debug, error, info, info_span, warn};

const JOIN_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_REJECTED_MESSAGES: u32 = 10;
const MAX_DISPLAY_NAME_LEN: usize = 32;

#[derive(Debug, serde::Deserialize)]
pub struct MatchQuery {
    // Defaults to the server's open match.
    #[serde(default)]
    match_id: Option<String>,
}

/// Why a session ended. Everything except a client-side close becomes a close frame.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Close {
    ClientGone,
    Policy(&'static str),
    BinaryFrame,
    MatchClosed,
    Replaced,
}

impl Close {
    fn frame(self) -> Option<CloseFrame> {
        let (code, reason) = match self {
            Close::ClientGone => return None,
            Close::Policy(reason) => (close_code::POLICY, reason),
            Close::BinaryFrame => (close_code::UNSUPPORTED, "binary messages not supported"),
            Close::MatchClosed => (close_code::NORMAL, "match closed"),
            Close::Replaced => (close_code::POLICY, "connection replaced"),
        };
        Some(CloseFrame {
            code,
            reason: reason.into(),
        })
    }
}

/// Serializes each world update once per match and shares the bytes with every socket.
pub async fn world_update_serializer(
    mut world_rx: broadcast::Receiver<WorldUpdate>,
    world_bytes_tx: broadcast::Sender<Utf8Bytes>,
) {
    loop {
        match world_rx.recv().await {
            Ok(update) => {
                let msg = ServerMessage::WorldUpdate(WorldUpdateDto::from(update));
                match serde_json::to_string(&msg) {
                    Ok(txt) => {
                        let _ = world_bytes_tx.send(Utf8Bytes::from(txt));
                    }
                    Err(e) => error!(error = %e, "failed to serialize world update"),
                }
            }
            // Updates are full snapshots, so skipping ahead loses nothing.
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                warn!(missed, "world serializer fell behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

pub fn spawn_match_serializer(handle: &MatchHandle) {
    tokio::spawn(world_update_serializer(
        handle.world_tx.subscribe(),
        handle.world_bytes_tx.clone(),
    ));
}

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<MatchQuery>,
) -> impl IntoResponse {
    let match_id = query
        .match_id
        .unwrap_or_else(|| state.default_match_id.to_string());

    let Some(handle) = state.match_registry.get_match(&match_id).await else {
        return error_response(StatusCode::NOT_FOUND, "match not found");
    };

    ws.on_upgrade(move |socket| {
        let span = info_span!(
            "conn",
            conn_id = connection_id(),
            match_id = %handle.match_id,
            player_id = tracing::field::Empty
        );
        run_session(socket, handle).instrument(span)
    })
}

async fn run_session(mut socket: WebSocket, handle: MatchHandle) {
    // Subscribe before the handshake so the first snapshot after the join is not missed.
    let world_rx = handle.world_bytes_tx.subscribe();
    let state_rx = handle.server_state_tx.subscribe();

    let join = match timeout(JOIN_TIMEOUT, read_join(&mut socket)).await {
        Ok(Ok(join)) => join,
        Ok(Err(close)) => {
            debug!(?close, "join rejected");
            close_socket(&mut socket, close).await;
            return;
        }
        Err(_) => {
            close_socket(&mut socket, Close::Policy("join timeout")).await;
            return;
        }
    };
    Span::current().record("player_id", join.player_id);

    let mut session = match Session::admit(&mut socket, &handle, join, world_rx, state_rx).await {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "failed to admit player");
            return;
        }
    };
    // The match may be torn down while this socket is open; keep only the session's pieces.
    drop(handle);

    let close = session.run(&mut socket).await;
    close_socket(&mut socket, close).await;
    session.release().await;
}

#[derive(Debug)]
struct Join {
    player_id: u64,
    display_name: String,
    hero_class: HeroClass,
}

impl TryFrom<JoinPayload> for Join {
    type Error = Close;

    fn try_from(payload: JoinPayload) -> Result<Self, Self::Error> {
        let player_id = match payload.player_id.as_deref().map(str::trim) {
            None | Some("") => guest_player_id(),
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| Close::Policy("invalid player id"))?,
        };

        Ok(Self {
            player_id,
            display_name: payload
                .display_name
                .trim()
                .chars()
                .take(MAX_DISPLAY_NAME_LEN)
                .collect(),
            hero_class: payload.hero_class.map(Into::into).unwrap_or_default(),
        })
    }
}

async fn read_join(socket: &mut WebSocket) -> Result<Join, Close> {
    loop {
        let msg = match socket.recv().await {
            Some(Ok(msg)) => msg,
            Some(Err(_)) | None => return Err(Close::ClientGone),
        };

        match msg {
            Message::Text(text) => {
                return match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Join(payload)) => Join::try_from(payload),
                    Ok(ClientMessage::Input(_)) => Err(Close::Policy("join required")),
                    Err(_) => Err(Close::Policy("invalid join payload")),
                };
            }
            Message::Binary(_) => return Err(Close::BinaryFrame),
            Message::Ping(_) | Message::Pong(_) => {}
            Message::Close(_) => return Err(Close::ClientGone),
        }
    }
}

async fn send_message(socket: &mut WebSocket, msg: &ServerMessage) -> Result<(), axum::Error> {
    let txt = serde_json::to_string(msg).map_err(axum::Error::new)?;
    socket.send(Message::Text(txt.into())).await
}

async fn close_socket(socket: &mut WebSocket, close: Close) {
    if let Some(frame) = close.frame() {
        let _ = socket.send(Message::Close(Some(frame))).await;
    }
    if let Err(e) = socket.close().await {
        debug!(error = %e, "socket close");
    }
}

/// A joined player's link to one match.
struct Session {
    player_id: u64,
    /// Spectators get updates but their inputs are ignored.
    plays: bool,
    connections: Arc<PlayerConnections>,
    token: u64,
    /// Fires when a newer socket claims the same player id.
    replaced: Arc<Notify>,
    input_tx: mpsc::Sender<GameEvent>,
    world_rx: broadcast::Receiver<Utf8Bytes>,
    state_rx: watch::Receiver<ServerState>,
    rejected: u32,
}

impl Session {
    async fn admit(
        socket: &mut WebSocket,
        handle: &MatchHandle,
        join: Join,
        world_rx: broadcast::Receiver<Utf8Bytes>,
        state_rx: watch::Receiver<ServerState>,
    ) -> Result<Self, axum::Error> {
        let player_id = join.player_id;
        let token = connection_id();
        let replaced = handle
            .connections
            .register_or_replace(player_id, token)
            .await;

        let join_event = match handle.admission(player_id) {
            Admission::Open => Some(GameEvent::Join {
                player_id,
                team: None,
                hero_class: join.hero_class,
            }),
            Admission::Seated(seat) => Some(GameEvent::Join {
                player_id,
                team: Some(seat.team),
                hero_class: seat.hero_class,
            }),
            Admission::Spectator => None,
        };

        let mut session = Self {
            player_id,
            plays: join_event.is_some(),
            connections: handle.connections.clone(),
            token,
            replaced,
            input_tx: handle.input_tx.clone(),
            world_rx,
            state_rx,
            rejected: 0,
        };

        let identity = ServerMessage::Identity {
            player_id: player_id.to_string(),
            match_id: handle.match_id.to_string(),
        };
        if let Err(e) = send_message(socket, &identity).await {
            session.plays = false;
            session.release().await;
            return Err(e);
        }

        // The join is queued before the first state message, so the next snapshot has the hero.
        if let Some(event) = join_event {
            if session.input_tx.send(event).await.is_err() {
                session.plays = false;
            }
        }

        let state = session.state_rx.borrow_and_update().clone();
        if let Err(e) = send_message(socket, &ServerMessage::GameState(state.into())).await {
            session.release().await;
            return Err(e);
        }

        info!(
            player_id,
            display_name = %join.display_name,
            plays = session.plays,
            "player joined match"
        );
        Ok(session)
    }

    async fn run(&mut self, socket: &mut WebSocket) -> Close {
        loop {
            let step = tokio::select! {
                incoming = socket.recv() => self.on_client_message(incoming),
                update = self.world_rx.recv() => match update {
                    Ok(bytes) => send_or_gone(socket.send(Message::Text(bytes)).await),
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        // The next update is a full snapshot anyway.
                        debug!(missed, "slow socket skipped world updates");
                        Ok(())
                    }
                    Err(broadcast::error::RecvError::Closed) => Err(Close::MatchClosed),
                },
                changed = self.state_rx.changed() => match changed {
                    Ok(()) => {
                        let state = self.state_rx.borrow_and_update().clone();
                        send_or_gone(send_message(socket, &ServerMessage::GameState(state.into())).await)
                    }
                    Err(_) => Err(Close::MatchClosed),
                },
                _ = self.replaced.notified() => Err(Close::Replaced),
            };

            if let Err(close) = step {
                info!(player_id = self.player_id, ?close, "session ending");
                return close;
            }
        }
    }

    fn on_client_message(
        &mut self,
        incoming: Option<Result<Message, axum::Error>>,
    ) -> Result<(), Close> {
        let text = match incoming {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => return Ok(()),
            Some(Ok(Message::Binary(_))) => return Err(Close::BinaryFrame),
            Some(Ok(Message::Close(_))) | None => return Err(Close::ClientGone),
            Some(Err(e)) => {
                debug!(error = %e, "websocket recv error");
                return Err(Close::ClientGone);
            }
        };

        match serde_json::from_str::<ClientMessage>(&text) {
            Ok(ClientMessage::Join(_)) => {
                debug!(player_id = self.player_id, "repeated join ignored");
                Ok(())
            }
            Ok(ClientMessage::Input(_)) if !self.plays => Ok(()),
            Ok(ClientMessage::Input(msg)) => match hero_input(msg) {
                Some(input) => self.forward_input(input),
                None => self.reject("invalid input values"),
            },
            Err(_) => self.reject("unparseable message"),
        }
    }

    fn forward_input(&self, input: HeroInput) -> Result<(), Close> {
        let event = GameEvent::Input {
            player_id: self.player_id,
            input,
        };
        match self.input_tx.try_send(event) {
            Ok(()) => Ok(()),
            // The client keeps the input buffered and replays it after the next snapshot.
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!(player_id = self.player_id, "match input queue full; input dropped");
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(Close::MatchClosed),
        }
    }

    fn reject(&mut self, what: &'static str) -> Result<(), Close> {
        self.rejected += 1;
        warn!(player_id = self.player_id, rejected = self.rejected, "{what}");
        if self.rejected > MAX_REJECTED_MESSAGES {
            return Err(Close::Policy("too many invalid messages"));
        }
        Ok(())
    }

    /// Frees the player's slot. A replaced session leaves the hero to its successor.
    async fn release(self) {
        let owned = self
            .connections
            .unregister_if_owner(self.player_id, self.token)
            .await;
        if owned
            && self.plays
            && self
                .input_tx
                .send(GameEvent::Leave {
                    player_id: self.player_id,
                })
                .await
                .is_err()
        {
            debug!(player_id = self.player_id, "match already gone; leave dropped");
        }
        info!(player_id = self.player_id, "client disconnected");
    }
}

fn send_or_gone(result: Result<(), axum::Error>) -> Result<(), Close> {
    result.map_err(|e| {
        debug!(error = %e, "websocket send failed");
        Close::ClientGone
    })
}

/// Converts a wire input, rejecting unknown target ids and non-finite numbers.
fn hero_input(msg: InputMessage) -> Option<HeroInput> {
    let input = HeroInput::try_from(msg).ok()?;
    (input.move_dir.is_finite() && input.facing.is_finite()).then_some(input)
}
