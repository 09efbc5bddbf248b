//! End-to-end tests: real WebSocket clients against a server on a random
//! port.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use gridclash::prelude::*;
use serde_json::{Value, json};
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Starts a server on a random port and returns its address and room.
async fn start_server_with(config: RoomConfig) -> (String, RoomHandle) {
    let server = GridclashServerBuilder::new()
        .bind("127.0.0.1:0")
        .room_config(config)
        .build()
        .await
        .expect("server should build");

    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();
    let room = server.room();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    (addr, room)
}

async fn start_server() -> (String, RoomHandle) {
    start_server_with(RoomConfig::default()).await
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

/// Connects and consumes the seat announcement.
async fn connect_as(addr: &str, side: &str) -> ClientWs {
    let mut ws = connect(addr).await;
    let init = recv(&mut ws).await;
    assert_eq!(init, json!({"type": "init", "player": side}));
    ws
}

async fn send(ws: &mut ClientWs, value: Value) {
    ws.send(Message::Text(value.to_string().into()))
        .await
        .expect("send");
}

/// Receives the next text frame as JSON, failing after a second.
async fn recv(ws: &mut ClientWs) -> Value {
    let msg = tokio::time::timeout(Duration::from_secs(1), ws.next())
        .await
        .expect("timed out waiting for a message")
        .expect("stream ended")
        .expect("recv failed");
    let text = msg.to_text().expect("expected a text frame");
    serde_json::from_str(text).expect("valid JSON")
}

/// Receives the next message and checks its `type`.
async fn recv_type(ws: &mut ClientWs, kind: &str) -> Value {
    let value = recv(ws).await;
    assert_eq!(value["type"], kind, "unexpected message: {value}");
    value
}

async fn assert_silent(ws: &mut ClientWs) {
    let next = tokio::time::timeout(Duration::from_millis(100), ws.next()).await;
    assert!(next.is_err(), "expected no message, got {next:?}");
}

fn mv(char_name: &str, direction: &str) -> Value {
    json!({"type": "move", "charName": char_name, "move": direction})
}

/// Waits until the room reports `state`.
async fn wait_for_state(room: &RoomHandle, state: RoomState) {
    for _ in 0..50 {
        if room.info().await.expect("room info").state == state {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("room never reached {state}");
}

// =========================================================================
// Seating
// =========================================================================

#[tokio::test]
async fn test_connections_are_seated_a_then_b() {
    let (addr, room) = start_server().await;
    let _a = connect_as(&addr, "A").await;
    let _b = connect_as(&addr, "B").await;

    assert_eq!(room.info().await.unwrap().state, RoomState::Full);
}

#[tokio::test]
async fn test_third_connection_gets_error_and_is_closed() {
    let (addr, _room) = start_server().await;
    let _a = connect_as(&addr, "A").await;
    let _b = connect_as(&addr, "B").await;

    let mut c = connect(&addr).await;
    let error = recv(&mut c).await;
    assert_eq!(
        error,
        json!({"type": "error", "message": "Game room is full. Please try again later."})
    );

    let next = tokio::time::timeout(Duration::from_secs(1), c.next())
        .await
        .expect("server should close the socket");
    assert!(
        matches!(next, None | Some(Ok(Message::Close(_))) | Some(Err(_))),
        "expected close, got {next:?}"
    );
}

#[tokio::test]
async fn test_closed_seat_is_reassigned() {
    let (addr, room) = start_server().await;
    let mut a = connect_as(&addr, "A").await;
    let _b = connect_as(&addr, "B").await;

    a.close(None).await.expect("close");
    wait_for_state(&room, RoomState::Occupying).await;

    let _a2 = connect_as(&addr, "A").await;
}

#[tokio::test]
async fn test_join_replies_with_snapshot_to_sender() {
    let (addr, room) = start_server().await;
    let mut a = connect_as(&addr, "A").await;
    let mut b = connect_as(&addr, "B").await;

    send(&mut a, json!({"type": "join", "playerName": "ada"})).await;
    let init = recv_type(&mut a, "init").await;
    let grid = init["state"]["grid"].as_array().expect("grid");
    assert_eq!(grid.len(), 5);
    assert!(grid.iter().all(|row| row.as_array().unwrap().iter().all(Value::is_null)));
    assert_eq!(init["state"]["turn"], "A");
    assert_silent(&mut b).await;

    let info = room.info().await.unwrap();
    assert_eq!(info.occupants[0], (Side::A, Some("ada".into())));
}

// =========================================================================
// Match flow
// =========================================================================

#[tokio::test]
async fn test_full_game_ends_with_game_over() {
    let (addr, _room) = start_server().await;
    let mut a = connect_as(&addr, "A").await;
    let mut b = connect_as(&addr, "B").await;

    send(
        &mut a,
        json!({"type": "start", "playerACharacters": ["P1"], "playerBCharacters": ["P1"]}),
    )
    .await;
    for ws in [&mut a, &mut b] {
        let update = recv_type(ws, "update").await;
        assert_eq!(update["state"]["grid"][0][0], "A-P1");
        assert_eq!(update["state"]["grid"][4][0], "B-P1");
    }

    // A walks down column 0 while B steps aside and back.
    let script = [
        ("A", "B"),
        ("B", "R"),
        ("A", "B"),
        ("B", "L"),
        ("A", "B"),
        ("B", "R"),
        ("A", "R"),
        ("B", "L"),
    ];
    for (side, dir) in script {
        let mover = if side == "A" { &mut a } else { &mut b };
        send(mover, mv("P1", dir)).await;
        for ws in [&mut a, &mut b] {
            recv_type(ws, "update").await;
            let history = recv_type(ws, "move").await;
            assert_eq!(
                history,
                json!({"type": "move", "player": side, "charName": "P1", "move": dir})
            );
        }
    }

    send(&mut a, mv("P1", "BL")).await;
    for ws in [&mut a, &mut b] {
        let update = recv_type(ws, "update").await;
        assert_eq!(update["state"]["grid"][4][0], "A-P1");
        recv_type(ws, "move").await;
        let over = recv(ws).await;
        assert_eq!(over, json!({"type": "gameOver", "winner": "A"}));
    }
}

#[tokio::test]
async fn test_rule_error_goes_to_sender_only() {
    let (addr, _room) = start_server().await;
    let mut a = connect_as(&addr, "A").await;
    let mut b = connect_as(&addr, "B").await;

    send(&mut a, json!({"type": "start"})).await;
    recv_type(&mut a, "update").await;
    recv_type(&mut b, "update").await;

    send(&mut b, mv("P1", "F")).await;
    let error = recv(&mut b).await;
    assert_eq!(error, json!({"type": "error", "message": "It is not your turn."}));

    send(&mut a, mv("P1", "F")).await;
    let error = recv(&mut a).await;
    assert_eq!(error["message"], "Move out of bounds.");

    send(&mut a, mv("P1", "R")).await;
    let error = recv(&mut a).await;
    assert_eq!(
        error["message"],
        "Cannot move to a cell occupied by a friendly character."
    );

    // The next thing A sees after a valid move is the update, so no
    // stray errors were queued for A.
    send(&mut a, mv("P1", "B")).await;
    let update = recv_type(&mut a, "update").await;
    assert_eq!(update["state"]["turn"], "B");
    recv_type(&mut b, "update").await;
}

#[tokio::test]
async fn test_move_claiming_other_side_is_rejected() {
    let (addr, room) = start_server().await;
    let mut a = connect_as(&addr, "A").await;
    let mut b = connect_as(&addr, "B").await;

    send(&mut a, json!({"type": "start"})).await;
    recv_type(&mut a, "update").await;
    recv_type(&mut b, "update").await;

    send(
        &mut b,
        json!({"type": "move", "player": "A", "charName": "P1", "move": "B"}),
    )
    .await;
    recv_type(&mut b, "error").await;
    assert_silent(&mut a).await;

    let info = room.info().await.unwrap();
    assert_eq!(info.game.grid[0][0].as_deref(), Some("A-P1"));
    assert_eq!(info.game.turn, Side::A);
}

#[tokio::test]
async fn test_new_game_and_start_game_reset_the_board() {
    let (addr, _room) = start_server().await;
    let mut a = connect_as(&addr, "A").await;
    let mut b = connect_as(&addr, "B").await;

    send(&mut a, json!({"type": "start", "playerACharacters": ["X"]})).await;
    recv_type(&mut a, "update").await;
    recv_type(&mut b, "update").await;
    send(&mut a, mv("X", "B")).await;
    for ws in [&mut a, &mut b] {
        recv_type(ws, "update").await;
        recv_type(ws, "move").await;
    }

    for kind in ["newGame", "startGame"] {
        send(&mut b, json!({"type": kind})).await;
        for ws in [&mut a, &mut b] {
            let update = recv_type(ws, "update").await;
            assert_eq!(update["state"]["turn"], "A");
            assert_eq!(update["state"]["grid"][0][0], "A-P1");
            assert_eq!(update["state"]["grid"][0][4], "A-H3");
            assert_eq!(update["state"]["grid"][1][0], Value::Null);
        }
    }
}

#[tokio::test]
async fn test_malformed_frames_get_generic_error() {
    let (addr, _room) = start_server().await;
    let mut a = connect_as(&addr, "A").await;

    a.send(Message::Text("not json".to_string().into())).await.unwrap();
    assert_eq!(
        recv(&mut a).await,
        json!({"type": "error", "message": "Invalid message."})
    );

    send(&mut a, json!({"type": "teleport"})).await;
    recv_type(&mut a, "error").await;

    // The connection is still usable.
    send(&mut a, json!({"type": "join", "playerName": "ada"})).await;
    recv_type(&mut a, "init").await;
}

#[tokio::test]
async fn test_decode_error_arrives_after_earlier_replies() {
    let (addr, _room) = start_server().await;
    let mut a = connect_as(&addr, "A").await;

    send(&mut a, json!({"type": "join", "playerName": "ada"})).await;
    a.send(Message::Text("{".to_string().into())).await.unwrap();

    recv_type(&mut a, "init").await;
    assert_eq!(
        recv(&mut a).await,
        json!({"type": "error", "message": "Invalid message."})
    );
}

#[tokio::test]
async fn test_board_narrower_than_default_roster() {
    for width in [3, 4] {
        let (addr, _room) = start_server_with(RoomConfig::with_board_size(width)).await;
        let mut a = connect_as(&addr, "A").await;

        send(&mut a, json!({"type": "newGame"})).await;
        let update = recv_type(&mut a, "update").await;
        let grid = update["state"]["grid"].as_array().unwrap();
        assert_eq!(grid.len(), width);
        let back_row = grid[width - 1].as_array().unwrap();
        assert!(back_row.iter().all(|cell| cell.as_str().is_some_and(|c| c.starts_with("B-"))));
    }
}

#[tokio::test]
async fn test_build_rejects_oversized_board() {
    let result = GridclashServerBuilder::new()
        .bind("127.0.0.1:0")
        .room_config(RoomConfig::with_board_size(MAX_BOARD_SIZE + 1))
        .build()
        .await;
    assert!(matches!(
        result,
        Err(GridclashError::Room(RoomError::InvalidConfig(_)))
    ));
}

#[tokio::test]
async fn test_custom_board_size() {
    let (addr, _room) = start_server_with(RoomConfig {
        board_size: 7,
        ..RoomConfig::default()
    })
    .await;
    let mut a = connect_as(&addr, "A").await;

    send(&mut a, json!({"type": "newGame"})).await;
    let update = recv_type(&mut a, "update").await;
    let grid = update["state"]["grid"].as_array().unwrap();
    assert_eq!(grid.len(), 7);
    assert_eq!(grid[6][0], "B-P1");
}

// =========================================================================
// Lifecycle
// =========================================================================

#[tokio::test]
async fn test_emptied_room_starts_fresh() {
    let (addr, room) = start_server().await;
    let mut a = connect_as(&addr, "A").await;

    send(&mut a, json!({"type": "start"})).await;
    recv_type(&mut a, "update").await;
    a.close(None).await.unwrap();
    wait_for_state(&room, RoomState::Empty).await;

    let mut a2 = connect_as(&addr, "A").await;
    send(&mut a2, json!({"type": "join", "playerName": "bo"})).await;
    let init = recv_type(&mut a2, "init").await;
    assert_eq!(init["state"]["grid"][0][0], Value::Null);
}

#[tokio::test]
async fn test_run_until_stops_on_shutdown_signal() {
    let server = GridclashServerBuilder::new()
        .bind("127.0.0.1:0")
        .build()
        .await
        .unwrap();
    let room = server.room();
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

    let task = tokio::spawn(server.run_until(async {
        let _ = stop_rx.await;
    }));
    stop_tx.send(()).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .expect("server should stop")
        .expect("task should not panic");
    assert!(result.is_ok());

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(matches!(room.info().await, Err(RoomError::Unavailable)));
}

#[tokio::test]
async fn test_build_rejects_invalid_room_config() {
    let result = GridclashServerBuilder::new()
        .bind("127.0.0.1:0")
        .room_config(RoomConfig {
            board_size: 2,
            ..RoomConfig::default()
        })
        .build()
        .await;
    assert!(matches!(
        result,
        Err(GridclashError::Room(RoomError::InvalidConfig(_)))
    ));
}
