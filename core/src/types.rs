//! Shared primitive types used across the entire simulation.

/// A simulation tick. One tick = one percent of voyage progress.
pub type Tick = u64;

/// Stable catalog identifier of a ship.
pub type ShipId = String;

/// Stable identifier of a harbor on the map.
pub type HarborId = String;

/// Whole currency units. Never negative.
pub type Money = u64;

/// Voyage progress in integer percent, 0..=100.
pub type Progress = u8;
