//! Voyage record and route geometry.
//!
//! A voyage moves through three phases:
//!   Absent    → no record
//!   Active    → progress advancing, one step per tick
//!   Completed → progress pinned at 100, profit already paid
//!
//! The record is retained after completion until it is cancelled or
//! replaced by a new voyage.

use crate::types::{HarborId, Money, Progress, ShipId};
use serde::{Deserialize, Serialize};

/// Progress added by a single tick.
pub const PROGRESS_STEP: Progress = 1;

/// Progress at which a voyage docks.
pub const PROGRESS_COMPLETE: Progress = 100;

/// Map-percentage units to nautical miles.
pub const DISTANCE_SCALE: f64 = 10.0;

/// Nominal trip length for break-even estimates when no route is in view.
pub const REFERENCE_TRIP_NM: f64 = 50.0;

/// A point in map-percentage space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MapPoint {
    pub x: f64,
    pub y: f64,
}

impl MapPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance in map units.
    pub fn distance_to(&self, other: &MapPoint) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation; `t` is clamped to [0, 1].
    pub fn lerp(&self, other: &MapPoint, t: f64) -> MapPoint {
        let t = t.clamp(0.0, 1.0);
        MapPoint {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

/// Sailing distance in nautical miles between two map points.
pub fn route_distance_nm(from: &MapPoint, to: &MapPoint) -> f64 {
    from.distance_to(to) * DISTANCE_SCALE
}

/// Profit paid for one completed voyage of `distance_nm`.
pub fn voyage_profit(distance_nm: f64, profit_per_nm: f64) -> Money {
    let profit = (distance_nm * profit_per_nm).round();
    if profit.is_finite() && profit > 0.0 {
        profit as Money
    } else {
        0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Voyage {
    pub origin:      HarborId,
    pub destination: HarborId,
    /// Ship selected when the voyage started. Not used for pricing.
    pub ship_id:     ShipId,
    pub progress:    Progress,
    pub active:      bool,
}

impl Voyage {
    pub fn new(origin: HarborId, destination: HarborId, ship_id: ShipId) -> Self {
        Self {
            origin,
            destination,
            ship_id,
            progress: 0,
            active: true,
        }
    }

    pub fn phase(&self) -> VoyagePhase {
        if self.active {
            VoyagePhase::Active
        } else {
            VoyagePhase::Completed
        }
    }

    /// Progress after one more step, and whether that step docks the ship.
    pub fn next_progress(&self) -> (Progress, bool) {
        let next = self.progress.saturating_add(PROGRESS_STEP);
        if next >= PROGRESS_COMPLETE {
            (PROGRESS_COMPLETE, true)
        } else {
            (next, false)
        }
    }

    /// Fraction of the route covered, 0.0..=1.0.
    pub fn fraction(&self) -> f64 {
        f64::from(self.progress.min(PROGRESS_COMPLETE)) / f64::from(PROGRESS_COMPLETE)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VoyagePhase {
    Absent,
    Active,
    Completed,
}

impl VoyagePhase {
    pub fn of(voyage: Option<&Voyage>) -> Self {
        voyage.map_or(VoyagePhase::Absent, Voyage::phase)
    }
}
