mod common;

use std::time::Duration;

use pong_live::input::{DeviceClass, Role, TouchZone};
use pong_live::render::Viewport;
use pong_live::ws::protocol::{Direction, Side};
use pong_live::ws::{CloseReason, Connection, Transport};
use pong_live::{Launcher, Surface};
use serde_json::{json, Value};
use tokio::time::sleep;
use tokio_test::{assert_pending, assert_ready_ok, task};

use common::{config, snapshot, SharedCanvas};

fn sent_json(frames: Vec<String>) -> Vec<Value> {
    frames
        .iter()
        .map(|f| serde_json::from_str(f).unwrap())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn right_role_only_drives_the_right_paddle() {
    let (surface, control) = Surface::new(None, Vec::new(), Viewport::default());
    let (transport, mut peer) = Transport::loopback();
    let handle = Launcher::new()
        .launch_with(
            config("11", Role::Right, DeviceClass::Pointer),
            surface,
            Connection::with_transport("11", transport),
        )
        .await
        .unwrap();

    // Not open yet: dropped, not queued
    control.key_down("ArrowUp");
    sleep(Duration::from_millis(20)).await;
    assert!(peer.sent().is_empty());

    peer.open();
    sleep(Duration::from_millis(20)).await;

    control.key_up("ArrowUp");
    control.key_down("w");
    control.key_down("ArrowDown");
    control.key_repeat("ArrowDown");
    control.key_up("w");
    control.key_up("ArrowDown");
    sleep(Duration::from_millis(20)).await;

    assert_eq!(
        sent_json(peer.sent()),
        vec![
            json!({"action": "start_move", "player": "right", "direction": "down"}),
            json!({"action": "stop_move", "player": "right"}),
        ]
    );

    peer.close();
    let outcome = handle.finished().await.unwrap();
    assert_eq!(outcome.reason, CloseReason::TransportClosed);
}

#[tokio::test(start_paused = true)]
async fn touch_controls_for_both_paddles() {
    let zones = vec![
        TouchZone::new(Side::Left, Direction::Up),
        TouchZone::new(Side::Right, Direction::Down),
    ];
    let (surface, control) = Surface::new(None, zones, Viewport::new(390.0, 844.0));
    let (transport, mut peer) = Transport::loopback();
    let handle = Launcher::new()
        .launch_with(
            config("12", Role::Both, DeviceClass::Touch),
            surface,
            Connection::with_transport("12", transport),
        )
        .await
        .unwrap();

    peer.open();
    sleep(Duration::from_millis(20)).await;

    control.touch_start(TouchZone::new(Side::Right, Direction::Down));
    // Not mounted: ignored
    control.touch_start(TouchZone::new(Side::Left, Direction::Down));
    control.touch_end(TouchZone::new(Side::Right, Direction::Down));
    sleep(Duration::from_millis(20)).await;

    assert_eq!(
        sent_json(peer.sent()),
        vec![
            json!({"action": "start_move", "player": "right", "direction": "down"}),
            json!({"action": "stop_move", "player": "right"}),
        ]
    );

    peer.close();
    handle.finished().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn game_over_then_close_resolves_once_with_last_score() {
    let (surface, _control) = Surface::new(None, Vec::new(), Viewport::default());
    let (transport, mut peer) = Transport::loopback();
    let handle = Launcher::new()
        .launch_with(
            config("13", Role::Left, DeviceClass::Pointer),
            surface,
            Connection::with_transport("13", transport),
        )
        .await
        .unwrap();

    peer.open();
    peer.push(snapshot(5, 3));
    peer.push(r#"{"type":"game_over","winner":"left"}"#);
    peer.close();

    let outcome = handle.finished().await.unwrap();
    assert_eq!(
        outcome.reason,
        CloseReason::GameOver {
            winner: Some("left".into())
        }
    );
    assert_eq!((outcome.score.left, outcome.score.right), (5, 3));

    // Connection dropped during teardown: the outbound side is closed
    assert!(peer.outbound.recv().await.is_none());

    let record = serde_json::to_value(&outcome).unwrap();
    assert_eq!(record["reason"], "game_over");
    assert_eq!(record["match_id"], "13");
}

#[tokio::test(start_paused = true)]
async fn badges_survive_snapshots_until_their_timer() {
    let canvas = SharedCanvas::default();
    let (surface, _control) = Surface::new(
        Some(Box::new(canvas.clone())),
        Vec::new(),
        Viewport::default(),
    );
    let (transport, peer) = Transport::loopback();
    let handle = Launcher::new()
        .launch_with(
            config("14", Role::Both, DeviceClass::Pointer),
            surface,
            Connection::with_transport("14", transport),
        )
        .await
        .unwrap();

    peer.open();
    peer.push(r#"{"type":"powerup_applied","player":"left","effect":"shrink","duration":2}"#);
    peer.push(snapshot(1, 0));
    peer.push(snapshot(2, 0));
    sleep(Duration::from_millis(100)).await;

    let texts = canvas.texts();
    assert!(texts.contains(&"SHRINK".to_string()), "{texts:?}");
    assert!(texts.contains(&"2".to_string()));

    peer.push(snapshot(3, 0));
    sleep(Duration::from_millis(500)).await;
    assert!(canvas.texts().contains(&"SHRINK".to_string()));

    sleep(Duration::from_secs(2)).await;
    let texts = canvas.texts();
    assert!(!texts.contains(&"SHRINK".to_string()), "{texts:?}");
    assert!(texts.contains(&"3".to_string()));
    assert!(canvas.frames() > 10);

    peer.close();
    handle.finished().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn second_launch_waits_for_teardown() {
    let launcher = Launcher::new();

    let (surface, _c1) = Surface::new(None, Vec::new(), Viewport::default());
    let (transport, first_peer) = Transport::loopback();
    let first = launcher
        .launch_with(
            config("21", Role::Both, DeviceClass::Pointer),
            surface,
            Connection::with_transport("21", transport),
        )
        .await
        .unwrap();

    let (surface, _c2) = Surface::new(None, Vec::new(), Viewport::default());
    let (transport, second_peer) = Transport::loopback();
    let mut second = task::spawn(launcher.launch_with(
        config("22", Role::Both, DeviceClass::Pointer),
        surface,
        Connection::with_transport("22", transport),
    ));
    assert_pending!(second.poll());

    first_peer.close();
    let outcome = first.finished().await.unwrap();
    assert_eq!(outcome.match_id, "21");

    assert!(second.is_woken());
    let second = assert_ready_ok!(second.poll());
    assert_eq!(second.match_id(), "22");

    second_peer.close();
    assert_eq!(second.finished().await.unwrap().reason, CloseReason::TransportClosed);
}

#[tokio::test(start_paused = true)]
async fn frame_loop_stops_after_completion() {
    let canvas = SharedCanvas::default();
    let (surface, control) = Surface::new(
        Some(Box::new(canvas.clone())),
        Vec::new(),
        Viewport::default(),
    );
    let (transport, peer) = Transport::loopback();
    let handle = Launcher::new()
        .launch_with(
            config("15", Role::Both, DeviceClass::Pointer),
            surface,
            Connection::with_transport("15", transport),
        )
        .await
        .unwrap();

    peer.open();
    sleep(Duration::from_millis(200)).await;
    assert!(canvas.frames() > 5);

    peer.push(r#"{"type":"game_over","winner":"left"}"#);
    handle.finished().await.unwrap();
    let frames = canvas.frames();

    sleep(Duration::from_secs(2)).await;
    assert_eq!(canvas.frames(), frames);
    // Session and its channels are gone
    assert!(!control.key_down("w"));
    assert!(!control.resize(100.0, 100.0));
}

#[tokio::test(start_paused = true)]
async fn resize_relayouts_the_next_frame() {
    let canvas = SharedCanvas::default();
    let (surface, control) = Surface::new(
        Some(Box::new(canvas.clone())),
        TouchZone::all().to_vec(),
        Viewport::new(800.0, 400.0),
    );
    let (transport, peer) = Transport::loopback();
    let mut config = config("16", Role::Both, DeviceClass::Touch);
    config.min_scale = 0.25;
    let handle = Launcher::new()
        .launch_with(config, surface, Connection::with_transport("16", transport))
        .await
        .unwrap();

    peer.open();
    sleep(Duration::from_millis(50)).await;
    // Portrait field: 400x800 fitted into 800x400
    assert_eq!(canvas.frame_layout(), Some((0.5, true)));

    assert!(control.resize(800.0, 1600.0));
    sleep(Duration::from_millis(50)).await;
    assert_eq!(canvas.frame_layout(), Some((2.0, true)));

    // Tiny viewport clamps to the floor
    assert!(control.resize(40.0, 60.0));
    sleep(Duration::from_millis(50)).await;
    assert_eq!(canvas.frame_layout(), Some((0.25, true)));

    peer.close();
    handle.finished().await.unwrap();
}
