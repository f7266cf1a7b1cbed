//! Timer-driven voyage driver.
//!
//! The driver task is the one actor that owns the SimEngine. Commands
//! arrive over a channel and are applied in order; a periodic timer
//! calls tick() while a voyage is underway. After every command and
//! every firing the current GameSnapshot is republished on a watch
//! channel for readers. Events produced by timer firings are also
//! broadcast, so a docking is reported even if the next command lands
//! before a reader looks at the snapshot.
//!
//! RULE: A command's reply is sent only after the snapshot reflecting
//! it has been published.
//!
//! RULE: The interval timer exists only while engine.wants_ticks() is
//! true. It is armed when a voyage becomes active (or the clock
//! resumes) and dropped as soon as the voyage docks, is cancelled,
//! or the clock is paused. No timer outlives its voyage.

use crate::{
    command::PlayerCommand,
    engine::SimEngine,
    error::{SimError, SimResult},
    event::GameEvent,
    snapshot::GameSnapshot,
};
use std::time::Duration;
use tokio::{
    sync::{broadcast, mpsc, oneshot, watch},
    task::JoinHandle,
    time::{self, Instant, Interval, MissedTickBehavior},
};

const COMMAND_BUFFER: usize = 32;

/// Timer events buffered per subscriber before it starts lagging.
const EVENT_BUFFER: usize = 64;

enum DriverMessage {
    Command {
        command: PlayerCommand,
        reply:   oneshot::Sender<SimResult<Vec<GameEvent>>>,
    },
    Shutdown,
}

pub struct VoyageDriver;

impl VoyageDriver {
    /// Spawn the driver with the engine's configured tick interval.
    pub fn spawn(engine: SimEngine) -> DriverHandle {
        let period = engine.tick_interval();
        Self::spawn_with_interval(engine, period)
    }

    pub fn spawn_with_interval(engine: SimEngine, period: Duration) -> DriverHandle {
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());
        let (events_tx, _) = broadcast::channel(EVENT_BUFFER);
        log::debug!("voyage driver starting, period={period:?}");
        let task = tokio::spawn(run(engine, period, commands_rx, snapshot_tx, events_tx.clone()));
        DriverHandle {
            commands:  commands_tx,
            snapshots: snapshot_rx,
            events:    events_tx,
            task,
        }
    }
}

/// Client side of a running driver.
pub struct DriverHandle {
    commands:  mpsc::Sender<DriverMessage>,
    snapshots: watch::Receiver<GameSnapshot>,
    events:    broadcast::Sender<GameEvent>,
    task:      JoinHandle<SimEngine>,
}

impl DriverHandle {
    /// Apply a command on the driver task and wait for its result.
    pub async fn send(&self, command: PlayerCommand) -> SimResult<Vec<GameEvent>> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(DriverMessage::Command { command, reply })
            .await
            .map_err(|_| SimError::DriverStopped)?;
        response.await.map_err(|_| SimError::DriverStopped)?
    }

    /// A receiver that sees every republished snapshot.
    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.snapshots.clone()
    }

    /// A receiver for events produced by timer firings from now on.
    pub fn tick_events(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    /// The most recently published snapshot.
    pub fn current(&self) -> GameSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Stop the driver and hand back the engine in its final state.
    pub async fn shutdown(self) -> SimResult<SimEngine> {
        // A closed channel means the task already stopped; join it anyway.
        let _ = self.commands.send(DriverMessage::Shutdown).await;
        self.task
            .await
            .map_err(|e| SimError::Other(anyhow::anyhow!("voyage driver task failed: {e}")))
    }
}

async fn run(
    mut engine: SimEngine,
    period: Duration,
    mut commands: mpsc::Receiver<DriverMessage>,
    snapshots: watch::Sender<GameSnapshot>,
    events: broadcast::Sender<GameEvent>,
) -> SimEngine {
    let mut ticker: Option<Interval> = None;

    loop {
        let mut pending = None;

        tokio::select! {
            message = commands.recv() => match message {
                Some(DriverMessage::Command { command, reply }) => {
                    let result = engine.apply(&command);
                    if let Err(e) = &result {
                        if e.is_rejection() {
                            log::warn!("{} rejected: {e}", command.name());
                        } else {
                            log::error!("{} failed: {e}", command.name());
                        }
                    }
                    pending = Some((reply, result));
                }
                Some(DriverMessage::Shutdown) | None => break,
            },
            () = next_firing(&mut ticker) => match engine.tick() {
                Ok(fired) => {
                    for event in fired {
                        log::info!("tick={} {}", engine.clock.current_tick, event.kind());
                        // No subscribers is fine.
                        let _ = events.send(event);
                    }
                }
                Err(e) => log::error!("tick={} failed: {e}", engine.clock.current_tick),
            },
        }

        sync_timer(&engine, &mut ticker, period);
        snapshots.send_replace(engine.snapshot());

        if let Some((reply, result)) = pending {
            // The caller may have stopped waiting; the command still applied.
            let _ = reply.send(result);
        }
    }

    log::debug!("voyage driver stopped at tick {}", engine.clock.current_tick);
    engine
}

/// Resolves on the next timer firing; never resolves while disarmed.
async fn next_firing(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

fn sync_timer(engine: &SimEngine, ticker: &mut Option<Interval>, period: Duration) {
    match (engine.wants_ticks(), ticker.is_some()) {
        (true, false) => {
            // First firing one full period after arming.
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            *ticker = Some(interval);
            log::debug!("voyage timer armed");
        }
        (false, true) => {
            *ticker = None;
            log::debug!("voyage timer cancelled");
        }
        _ => {}
    }
}
