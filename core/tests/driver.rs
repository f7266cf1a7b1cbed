//! Timer-driven voyage driver. Runs on tokio's paused clock so the
//! 80 ms timer advances virtually.

use shiptycoon_core::{
    engine::SimEngine, voyage::VoyagePhase, DriverHandle, GameEvent, PlayerCommand, SimError,
    VoyageDriver,
};
use std::time::Duration;

// ── Test helpers ────────────────────────────────────────────────────────────

async fn sailing_driver() -> DriverHandle {
    let _ = env_logger::builder().is_test(true).try_init();
    let driver = VoyageDriver::spawn(SimEngine::build_test());
    driver
        .send(PlayerCommand::BuyShip { ship_id: "feeder".into() })
        .await
        .unwrap();
    driver
        .send(PlayerCommand::StartVoyage {
            origin:      "rotterdam".into(),
            destination: "hamburg".into(),
        })
        .await
        .unwrap();
    driver
}

async fn wait_for_progress(driver: &DriverHandle, progress: u8) {
    let mut rx = driver.subscribe();
    rx.wait_for(|s| s.voyage.as_ref().is_some_and(|v| v.progress >= progress))
        .await
        .expect("driver stopped");
}

// ── Tests ────────────────────────────────────────────────────────────────────

/// The timer alone carries the voyage to port and pays once; after
/// docking the timer is gone and the clock stops.
#[tokio::test(start_paused = true)]
async fn timer_completes_voyage_then_stops() {
    let driver = sailing_driver().await;

    let mut rx = driver.subscribe();
    let docked = rx
        .wait_for(|s| s.phase() == VoyagePhase::Completed)
        .await
        .expect("driver stopped")
        .clone();

    assert_eq!(docked.state.balance, 21_031);
    assert_eq!(docked.clock.current_tick, 100);

    tokio::time::sleep(Duration::from_secs(60)).await;
    let later = driver.current();
    assert_eq!(later.clock.current_tick, 100, "timer kept firing after docking");
    assert_eq!(later.state.balance, 21_031);

    let engine = driver.shutdown().await.unwrap();
    assert_eq!(engine.state().balance, 21_031);
}

/// Cancelling mid-voyage cancels the timer: no further ticks, no profit.
#[tokio::test(start_paused = true)]
async fn cancel_stops_the_timer() {
    let driver = sailing_driver().await;
    wait_for_progress(&driver, 10).await;

    let events = driver.send(PlayerCommand::CancelVoyage).await.unwrap();
    assert_eq!(events.len(), 1);

    tokio::time::sleep(Duration::from_millis(100)).await;
    let tick = driver.current().clock.current_tick;
    tokio::time::sleep(Duration::from_secs(30)).await;

    let snapshot = driver.current();
    assert_eq!(snapshot.clock.current_tick, tick);
    assert!(snapshot.voyage.is_none());
    assert_eq!(snapshot.state.balance, 20_000);
}

/// Pause disarms the timer; resume re-arms it and the voyage finishes.
#[tokio::test(start_paused = true)]
async fn pause_and_resume() {
    let driver = sailing_driver().await;
    wait_for_progress(&driver, 5).await;

    driver.send(PlayerCommand::Pause).await.unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    let held = driver.current().voyage.unwrap().progress;
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(driver.current().voyage.unwrap().progress, held);

    driver.send(PlayerCommand::Resume).await.unwrap();
    let mut rx = driver.subscribe();
    rx.wait_for(|s| s.phase() == VoyagePhase::Completed)
        .await
        .expect("driver stopped");
    assert_eq!(driver.current().state.balance, 21_031);
}

/// Rejections come back through the handle and change nothing.
#[tokio::test(start_paused = true)]
async fn rejected_command_round_trips() {
    let driver = sailing_driver().await;

    let err = driver
        .send(PlayerCommand::StartVoyage {
            origin:      "hamburg".into(),
            destination: "lisbon".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, SimError::VoyageInProgress), "got {err:?}");

    let voyage = driver.current().voyage.unwrap();
    assert_eq!(voyage.origin, "rotterdam");
}

/// No timer runs before a voyage starts.
#[tokio::test(start_paused = true)]
async fn idle_driver_does_not_tick() {
    let driver = VoyageDriver::spawn(SimEngine::build_test());
    driver
        .send(PlayerCommand::BuyShip { ship_id: "feeder".into() })
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(driver.current().clock.current_tick, 0);

    let engine = driver.shutdown().await.unwrap();
    assert_eq!(engine.clock.current_tick, 0);
}

/// By the time send() returns, the published snapshot already shows the
/// command's effect. Runs on worker threads so the driver task and the
/// caller really race.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn reply_follows_published_snapshot() {
    for _ in 0..200 {
        let driver = VoyageDriver::spawn(SimEngine::build_test());
        let events = driver
            .send(PlayerCommand::BuyShip { ship_id: "feeder".into() })
            .await
            .unwrap();
        assert_eq!(events.len(), 2);

        let snapshot = driver.current();
        assert_eq!(snapshot.state.balance, 20_000);
        assert_eq!(snapshot.state.selected.as_deref(), Some("feeder"));
        driver.shutdown().await.unwrap();
    }
}

/// Timer dockings are broadcast to subscribers even when a new voyage
/// starts before anyone reads the snapshot.
#[tokio::test(start_paused = true)]
async fn docking_is_broadcast_to_subscribers() {
    let driver = sailing_driver().await;
    let mut events = driver.tick_events();

    let docked = loop {
        match events.recv().await.expect("driver stopped") {
            event @ GameEvent::VoyageCompleted { .. } => break event,
            _ => {}
        }
    };
    driver
        .send(PlayerCommand::StartVoyage {
            origin:      "hamburg".into(),
            destination: "rotterdam".into(),
        })
        .await
        .unwrap();

    assert_eq!(
        docked,
        GameEvent::VoyageCompleted {
            ship_id:     "feeder".into(),
            origin:      "rotterdam".into(),
            destination: "hamburg".into(),
            profit:      1031,
            balance:     21_031,
        }
    );
    assert_eq!(driver.current().phase(), VoyagePhase::Active);
}
