mod support;

use serde_json::json;

#[tokio::test]
async fn joined_player_sees_their_inputs_acknowledged() {
    let base_url = support::ensure_server();
    let match_id = support::unique_match_id();
    support::create_match(base_url, &match_id, json!([])).await;

    let player_id = support::unique_player_id();
    let mut ws = support::connect(base_url, &match_id).await;
    let identity = support::join(&mut ws, player_id, "ranger").await;
    assert_eq!(identity["playerId"], player_id.to_string().as_str());
    assert_eq!(identity["matchId"], match_id.as_str());

    support::send_json(
        &mut ws,
        json!({
            "type": "Input",
            "data": { "seq": 1, "moveDir": { "x": 5.0, "y": 0.0 }, "attackTargetId": null, "facing": 0.0 }
        }),
    )
    .await;

    let hero = support::wait_for_hero(&mut ws, player_id, |h| {
        h["lastProcessedInputSeq"] == 1 && h["x"].as_f64().unwrap_or(0.0) > 320.0
    })
    .await;

    assert_eq!(hero["heroClass"], "ranger");
    assert_eq!(hero["team"], "blue");
    assert_eq!(hero["dead"], false);
}

#[tokio::test]
async fn stale_sequence_numbers_are_ignored() {
    let base_url = support::ensure_server();
    let match_id = support::unique_match_id();
    support::create_match(base_url, &match_id, json!([])).await;

    let player_id = support::unique_player_id();
    let mut ws = support::connect(base_url, &match_id).await;
    support::join(&mut ws, player_id, "warrior").await;

    for seq in [4, 2, 3] {
        support::send_json(
            &mut ws,
            json!({ "type": "Input", "data": { "seq": seq, "moveDir": { "x": 0.0, "y": 1.0 } } }),
        )
        .await;
    }

    support::wait_for_hero(&mut ws, player_id, |h| h["lastProcessedInputSeq"] == 4).await;
    // 2 and 3 arrived after 4 and were refused; the counter never moves back.
    for _ in 0..10 {
        let hero = support::wait_for_hero(&mut ws, player_id, |_| true).await;
        assert_eq!(hero["lastProcessedInputSeq"], 4);
    }
}

#[tokio::test]
async fn roster_seat_decides_team_and_class() {
    let base_url = support::ensure_server();
    let match_id = support::unique_match_id();
    let player_id = support::unique_player_id();
    let res = support::create_match(
        base_url,
        &match_id,
        json!([{ "player_id": player_id, "team": "red", "hero_class": "ranger" }]),
    )
    .await;
    assert_eq!(res.status(), reqwest::StatusCode::CREATED);

    let mut ws = support::connect(base_url, &match_id).await;
    // The roster wins over the class requested at join.
    support::join(&mut ws, player_id, "warrior").await;

    let hero = support::wait_for_hero(&mut ws, player_id, |_| true).await;
    assert_eq!(hero["team"], "red");
    assert_eq!(hero["heroClass"], "ranger");
    assert_eq!(hero["x"], 2880.0);
}

#[tokio::test]
async fn input_before_join_closes_the_socket() {
    let base_url = support::ensure_server();
    let mut ws = support::connect(base_url, "arena").await;

    support::send_json(
        &mut ws,
        json!({ "type": "Input", "data": { "seq": 1, "moveDir": { "x": 1.0, "y": 0.0 } } }),
    )
    .await;

    assert!(support::next_json(&mut ws).await.is_none());
}

#[tokio::test]
async fn unknown_match_is_not_upgraded() {
    let base_url = support::ensure_server();
    let ws_base = base_url.replacen("http://", "ws://", 1);

    let result = tokio_tungstenite::connect_async(format!("{ws_base}/ws?match_id=missing")).await;

    assert!(result.is_err());
}
