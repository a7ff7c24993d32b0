mod support;

use serde_json::{Value, json};

#[tokio::test]
async fn open_match_is_created() {
    let base_url = support::ensure_server();
    let match_id = support::unique_match_id();

    let res = support::create_match(base_url, &match_id, json!([])).await;

    assert_eq!(res.status(), reqwest::StatusCode::CREATED);
    let body: Value = res.json().await.expect("json body");
    assert_eq!(body["match_id"], match_id.as_str());
}

#[tokio::test]
async fn duplicate_match_id_conflicts() {
    let base_url = support::ensure_server();
    let match_id = support::unique_match_id();

    let first = support::create_match(base_url, &match_id, json!([])).await;
    assert_eq!(first.status(), reqwest::StatusCode::CREATED);

    let second = support::create_match(base_url, &match_id, json!([])).await;
    assert_eq!(second.status(), reqwest::StatusCode::CONFLICT);
    let body: Value = second.json().await.expect("json body");
    assert_eq!(body["error"], "match already exists");
}

#[tokio::test]
async fn overfull_roster_is_rejected() {
    let base_url = support::ensure_server();
    let roster = json!([
        { "player_id": 1, "team": "red" },
        { "player_id": 2, "team": "red" },
        { "player_id": 3, "team": "red", "hero_class": "ranger" }
    ]);

    let res = support::create_match(base_url, &support::unique_match_id(), roster).await;

    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.expect("json body");
    assert_eq!(body["error"], "too many players on team red");
}

#[tokio::test]
async fn unknown_team_never_reaches_the_simulation() {
    let base_url = support::ensure_server();
    let roster = json!([{ "player_id": 1, "team": "green" }]);

    let res = support::create_match(base_url, &support::unique_match_id(), roster).await;

    assert!(res.status().is_client_error());
}

#[tokio::test]
async fn blank_match_id_is_rejected() {
    let base_url = support::ensure_server();

    let res = support::create_match(base_url, "   ", json!([])).await;

    assert_eq!(res.status(), reqwest::StatusCode::BAD_REQUEST);
}
