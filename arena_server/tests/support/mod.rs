// Shared helpers for booting one arena server per test binary and talking to it.
#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use std::{
    sync::{Arc, OnceLock},
    time::Duration,
};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, tungstenite::Message};

pub type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

static SERVER_URL: OnceLock<String> = OnceLock::new();
static SERVER_READY: OnceLock<()> = OnceLock::new();

/// Starts the server on first use and returns its base URL.
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // Own OS thread and runtime so the server outlives each `#[tokio::test]` runtime.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{}", addr));

                // No countdown so tests see a running match right away.
                let mut settings = arena_server::frameworks::config::match_settings();
                settings.start_delay = Duration::ZERO;
                settings.end_linger = Duration::from_millis(100);
                arena_server::run_with(listener, settings)
                    .await
                    .expect("server failed");
            });
        });
        wait_for_server_url_and_readiness(published_url);
    });

    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };
    let _ = SERVER_URL.set(base_url.clone());

    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }

    panic!("server did not become ready in time");
}

/// Player id unique to this test run, kept below the guest id range.
pub fn unique_player_id() -> u64 {
    uuid::Uuid::new_v4().as_u64_pair().0 >> 1
}

pub fn unique_match_id() -> String {
    format!("test-{}", uuid::Uuid::new_v4())
}

pub async fn create_match(base_url: &str, match_id: &str, roster: Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{base_url}/matches"))
        .json(&json!({ "match_id": match_id, "roster": roster }))
        .send()
        .await
        .expect("request should succeed")
}

pub async fn connect(base_url: &str, match_id: &str) -> Ws {
    let ws_base = base_url.replacen("http://", "ws://", 1);
    let (ws, _) = tokio_tungstenite::connect_async(format!("{ws_base}/ws?match_id={match_id}"))
        .await
        .expect("websocket upgrade");
    ws
}

pub async fn send_json(ws: &mut Ws, value: Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .expect("send message");
}

/// Next text frame as JSON; `None` once the server closes the socket.
pub async fn next_json(ws: &mut Ws) -> Option<Value> {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("message within timeout")?;
        match msg.ok()? {
            Message::Text(text) => {
                return Some(serde_json::from_str(text.as_str()).expect("server sends JSON"));
            }
            Message::Close(_) => return None,
            _ => {}
        }
    }
}

/// Sends Join and returns the Identity payload.
pub async fn join(ws: &mut Ws, player_id: u64, hero_class: &str) -> Value {
    send_json(
        ws,
        json!({
            "type": "Join",
            "data": { "playerId": player_id.to_string(), "displayName": "tester", "heroClass": hero_class }
        }),
    )
    .await;

    let identity = next_json(ws).await.expect("identity message");
    assert_eq!(identity["type"], "Identity");
    identity["data"].clone()
}

/// Reads world updates until this player's hero satisfies `accept`.
pub async fn wait_for_hero(
    ws: &mut Ws,
    player_id: u64,
    accept: impl Fn(&Value) -> bool,
) -> Value {
    let player_id = player_id.to_string();
    for _ in 0..600 {
        let msg = next_json(ws).await.expect("socket stays open");
        if msg["type"] != "WorldUpdate" {
            continue;
        }
        let hero = msg["data"]["heroes"]
            .as_array()
            .into_iter()
            .flatten()
            .find(|h| h["playerId"] == player_id.as_str());
        if let Some(hero) = hero
            && accept(hero)
        {
            return hero.clone();
        }
    }
    panic!("hero for player {player_id} never matched");
}
