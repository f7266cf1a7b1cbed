//! Ship purchase and selection.

use shiptycoon_core::{engine::SimEngine, state::Purchase, PlayerCommand, SimError};

// ── Test helpers ────────────────────────────────────────────────────────────

fn buy(engine: &mut SimEngine, ship_id: &str) -> Result<(), SimError> {
    engine
        .apply(&PlayerCommand::BuyShip { ship_id: ship_id.into() })
        .map(drop)
}

fn select(engine: &mut SimEngine, ship_id: &str) -> Result<(), SimError> {
    engine
        .apply(&PlayerCommand::SelectShip { ship_id: ship_id.into() })
        .map(drop)
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// Buying the 80 000 feeder from a 100 000 balance leaves 20 000,
/// marks it owned, and selects it because nothing was selected.
#[test]
fn first_purchase_deducts_price_and_selects() {
    let mut engine = SimEngine::build_test();
    assert_eq!(engine.state().balance, 100_000);

    buy(&mut engine, "feeder").unwrap();

    let state = engine.state();
    assert_eq!(state.balance, 20_000);
    assert!(state.ship("feeder").unwrap().owned);
    assert_eq!(state.selected.as_deref(), Some("feeder"));
}

/// With 20 000 left, the 180 000 panamax is rejected and nothing moves.
#[test]
fn purchase_over_balance_is_rejected() {
    let mut engine = SimEngine::build_test();
    buy(&mut engine, "feeder").unwrap();
    let before = engine.state().clone();

    let err = buy(&mut engine, "panamax").unwrap_err();

    assert!(
        matches!(err, SimError::InsufficientFunds { price: 180_000, balance: 20_000 }),
        "unexpected error: {err:?}"
    );
    assert_eq!(engine.state(), &before, "rejected purchase must not change state");
    assert!(!engine.state().ship("panamax").unwrap().owned);
}

/// A second purchase keeps the existing selection.
#[test]
fn later_purchase_does_not_steal_selection() {
    let mut engine = SimEngine::build_test();
    buy(&mut engine, "feeder").unwrap();
    buy(&mut engine, "island_ferry").unwrap();

    let state = engine.state();
    assert_eq!(state.balance, 5_000);
    assert!(state.ship("island_ferry").unwrap().owned);
    assert_eq!(state.selected.as_deref(), Some("feeder"));
}

/// Buying an owned ship is a no-op, not an error.
#[test]
fn purchase_of_owned_ship_is_noop() {
    let mut engine = SimEngine::build_test();
    buy(&mut engine, "feeder").unwrap();
    let before = engine.state().clone();

    let events = engine
        .apply(&PlayerCommand::BuyShip { ship_id: "feeder".into() })
        .unwrap();

    assert!(events.is_empty(), "no-op purchase reported {events:?}");
    assert_eq!(engine.state(), &before);

    let mut state = before.clone();
    assert_eq!(state.purchase_ship("feeder").unwrap(), Purchase::AlreadyOwned);
}

/// Unknown ship ids are NotFound for both buy and select.
#[test]
fn unknown_ship_is_not_found() {
    let mut engine = SimEngine::build_test();

    let err = buy(&mut engine, "titanic").unwrap_err();
    assert!(matches!(err, SimError::NotFound { .. }), "got {err:?}");

    let err = select(&mut engine, "titanic").unwrap_err();
    assert!(matches!(err, SimError::NotFound { .. }), "got {err:?}");
    assert_eq!(engine.state().balance, 100_000);
}

/// Selecting a ship that has not been bought fails with NotOwned and
/// leaves the current selection alone.
#[test]
fn select_unowned_ship_is_rejected() {
    let mut engine = SimEngine::build_test();
    buy(&mut engine, "feeder").unwrap();

    let err = select(&mut engine, "panamax").unwrap_err();

    assert!(matches!(err, SimError::NotOwned { .. }), "got {err:?}");
    assert_eq!(err.kind(), "not_owned");
    assert!(err.is_rejection());
    assert!(!SimError::DriverStopped.is_rejection());
    assert_eq!(engine.state().selected.as_deref(), Some("feeder"));
}

/// Selecting between owned ships never touches the balance.
#[test]
fn select_owned_ship_switches_selection() {
    let mut engine = SimEngine::build_test();
    buy(&mut engine, "feeder").unwrap();
    buy(&mut engine, "island_ferry").unwrap();

    select(&mut engine, "island_ferry").unwrap();

    assert_eq!(engine.state().selected.as_deref(), Some("island_ferry"));
    assert_eq!(engine.state().balance, 5_000);
}
