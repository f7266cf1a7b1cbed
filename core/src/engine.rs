//! The simulation engine: the single point through which game state
//! is mutated.
//!
//! RULES:
//!   - The engine exclusively owns GameState; callers read it through
//!     state() or snapshot() and change it only through apply() and tick().
//!   - tick() is the only time-driven mutation and does nothing unless
//!     a voyage is active and the clock is running.
//!   - Every call reports what changed as GameEvents diffed from the
//!     state before and after.

use crate::{
    clock::SimClock,
    command::PlayerCommand,
    config::SimConfig,
    error::SimResult,
    event::GameEvent,
    snapshot::GameSnapshot,
    state::{GameState, TickOutcome},
    types::{Money, Tick},
};
use std::time::Duration;

pub struct SimEngine {
    pub clock: SimClock,
    state:     GameState,
    config:    SimConfig,
}

impl SimEngine {
    /// Fresh game from `config`: starting balance, empty fleet, no voyage.
    pub fn new(config: SimConfig) -> Self {
        Self {
            clock: SimClock::new(),
            state: GameState::new(&config),
            config,
        }
    }

    /// Load the catalog from `data_dir` and build an engine on it.
    pub fn build(data_dir: &str) -> anyhow::Result<Self> {
        let config = SimConfig::load(data_dir)?;
        log::info!(
            "loaded {} ships and {} harbors from {data_dir}",
            config.ships.len(),
            config.harbors.len()
        );
        Ok(Self::new(config))
    }

    /// Engine over SimConfig::default_test(). Used by tests.
    pub fn build_test() -> Self {
        Self::new(SimConfig::default_test())
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(&self.clock, &self.state)
    }

    /// Real-time period between timer firings.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.config.tick_interval_ms)
    }

    /// True exactly while a timer should be driving tick().
    pub fn wants_ticks(&self) -> bool {
        !self.clock.paused && self.state.voyage_active()
    }

    /// Apply one player command. On rejection the state is unchanged.
    pub fn apply(&mut self, command: &PlayerCommand) -> SimResult<Vec<GameEvent>> {
        let before = self.state.clone();

        let result = match command {
            PlayerCommand::BuyShip { ship_id } => self.state.purchase_ship(ship_id).map(drop),
            PlayerCommand::SelectShip { ship_id } => self.state.select_ship(ship_id),
            PlayerCommand::StartVoyage { origin, destination } => {
                self.state.start_voyage(origin, destination)
            }
            PlayerCommand::CancelVoyage => {
                self.state.cancel_voyage();
                Ok(())
            }
            PlayerCommand::Pause => {
                self.clock.pause();
                Ok(())
            }
            PlayerCommand::Resume => {
                self.clock.resume();
                Ok(())
            }
            PlayerCommand::SetSpeed { speed } => {
                self.clock.set_speed(*speed);
                Ok(())
            }
        };

        if let Err(e) = &result {
            log::debug!("command {} rejected: {e}", command.name());
        }
        result?;

        Ok(GameEvent::diff(&before, &self.state))
    }

    /// Advance one timer step: `ticks_per_step()` voyage ticks at the
    /// current speed, stopping early when the ship docks.
    pub fn tick(&mut self) -> SimResult<Vec<GameEvent>> {
        if !self.wants_ticks() {
            return Ok(vec![]);
        }

        let before = self.state.clone();
        for _ in 0..self.clock.ticks_per_step() {
            let tick = self.clock.advance();
            match self.state.tick()? {
                TickOutcome::Advanced { progress } => {
                    log::debug!("tick={tick} progress={progress}");
                }
                TickOutcome::Completed { profit } => {
                    log::debug!("tick={tick} docked profit={profit}");
                    break;
                }
                TickOutcome::Idle => break,
            }
        }

        Ok(GameEvent::diff(&before, &self.state))
    }

    /// Run n timer steps in a loop. Used for testing and fast-forward.
    pub fn run_ticks(&mut self, n: u64) -> SimResult<Vec<GameEvent>> {
        let mut events = Vec::new();
        for _ in 0..n {
            events.extend(self.tick()?);
        }
        Ok(events)
    }

    /// Tick until the current voyage docks, at most `limit` steps.
    /// Returns the profit paid, or None if nothing docked.
    pub fn run_until_docked(&mut self, limit: Tick) -> SimResult<Option<Money>> {
        for _ in 0..limit {
            if !self.wants_ticks() {
                break;
            }
            for event in self.tick()? {
                if let GameEvent::VoyageCompleted { profit, .. } = event {
                    return Ok(Some(profit));
                }
            }
        }
        Ok(None)
    }
}
