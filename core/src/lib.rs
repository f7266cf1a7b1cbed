//! Core simulation for Ship Tycoon.
//!
//! Buy ships, sail them between harbors, collect profit on arrival.
//! All game state lives in one GameState owned by a SimEngine; a
//! VoyageDriver runs the engine on a periodic timer.

pub mod clock;
pub mod command;
pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod event;
pub mod snapshot;
pub mod state;
pub mod types;
pub mod voyage;

pub use command::PlayerCommand;
pub use config::SimConfig;
pub use driver::{DriverHandle, VoyageDriver};
pub use engine::SimEngine;
pub use error::{SimError, SimResult};
pub use event::GameEvent;
pub use snapshot::GameSnapshot;
pub use state::GameState;
