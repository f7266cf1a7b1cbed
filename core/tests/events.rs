//! Events observed by diffing state before and after each operation.

use shiptycoon_core::{engine::SimEngine, voyage::VoyagePhase, GameEvent, PlayerCommand};

/// A first purchase reports the purchase and the automatic selection.
#[test]
fn purchase_reports_purchase_and_selection() {
    let mut engine = SimEngine::build_test();

    let events = engine
        .apply(&PlayerCommand::BuyShip { ship_id: "feeder".into() })
        .unwrap();

    assert_eq!(
        events,
        vec![
            GameEvent::ShipPurchased {
                ship_id: "feeder".into(),
                price:   80_000,
                balance: 20_000,
            },
            GameEvent::ShipSelected { ship_id: "feeder".into() },
        ]
    );
}

/// The docking tick reports VoyageCompleted with the profit paid.
#[test]
fn docking_reports_completion_with_profit() {
    let mut engine = SimEngine::build_test();
    engine.apply(&PlayerCommand::BuyShip { ship_id: "feeder".into() }).unwrap();

    let started = engine
        .apply(&PlayerCommand::StartVoyage {
            origin:      "rotterdam".into(),
            destination: "hamburg".into(),
        })
        .unwrap();
    assert_eq!(started.len(), 1);
    assert_eq!(started[0].kind(), "voyage_started");

    let quiet = engine.run_ticks(99).unwrap();
    assert!(quiet.is_empty(), "progress ticks should be silent: {quiet:?}");

    let docked = engine.tick().unwrap();
    assert_eq!(
        docked,
        vec![GameEvent::VoyageCompleted {
            ship_id:     "feeder".into(),
            origin:      "rotterdam".into(),
            destination: "hamburg".into(),
            profit:      1031,
            balance:     21_031,
        }]
    );
}

/// Clearing a voyage reports the phase it was cleared from.
#[test]
fn cancel_reports_cleared_phase() {
    let mut engine = SimEngine::build_test();
    engine.apply(&PlayerCommand::BuyShip { ship_id: "feeder".into() }).unwrap();
    engine
        .apply(&PlayerCommand::StartVoyage {
            origin:      "rotterdam".into(),
            destination: "lisbon".into(),
        })
        .unwrap();
    engine.run_ticks(25).unwrap();

    let events = engine.apply(&PlayerCommand::CancelVoyage).unwrap();

    assert_eq!(
        events,
        vec![GameEvent::VoyageCleared { phase: VoyagePhase::Active, progress: 25 }]
    );
}

/// Events serialize with a snake_case type tag for IPC clients.
#[test]
fn events_serialize_with_type_tag() {
    let event = GameEvent::ShipSelected { ship_id: "feeder".into() };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "ship_selected");
    assert_eq!(json["ship_id"], "feeder");

    let command: PlayerCommand =
        serde_json::from_str(r#"{"cmd":"start_voyage","origin":"a","destination":"b"}"#).unwrap();
    assert_eq!(
        command,
        PlayerCommand::StartVoyage { origin: "a".into(), destination: "b".into() }
    );
}
