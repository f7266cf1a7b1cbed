//! Read-only rendering view of the simulation.
//!
//! A snapshot carries the full GameState plus the values a
//! presentation layer would otherwise recompute: per-ship shop
//! flags, voyage distance and payout, and the ship's map position.

use crate::{
    clock::SimClock,
    config::ShipCategory,
    state::GameState,
    types::{HarborId, Money, Progress, ShipId},
    voyage::{MapPoint, VoyagePhase, REFERENCE_TRIP_NM},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameSnapshot {
    pub clock:  SimClock,
    pub state:  GameState,
    pub fleet:  Vec<ShipView>,
    pub voyage: Option<VoyageView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShipView {
    pub ship_id:          ShipId,
    pub name:             String,
    pub category:         ShipCategory,
    pub owned:            bool,
    pub selected:         bool,
    /// Not owned and the balance covers the price.
    pub affordable:       bool,
    pub break_even_trips: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoyageView {
    pub phase:           VoyagePhase,
    pub ship_id:         ShipId,
    pub origin:          HarborId,
    pub destination:     HarborId,
    pub progress:        Progress,
    pub distance_nm:     f64,
    pub expected_profit: Money,
    pub position:        Option<MapPoint>,
}

impl GameSnapshot {
    pub fn capture(clock: &SimClock, state: &GameState) -> Self {
        let voyage = state.voyage.as_ref().map(|v| {
            let distance_nm = state.route_distance(&v.origin, &v.destination).unwrap_or(0.0);
            let expected_profit = state.voyage_profit(v).unwrap_or(0);
            VoyageView {
                phase:           v.phase(),
                ship_id:         v.ship_id.clone(),
                origin:          v.origin.clone(),
                destination:     v.destination.clone(),
                progress:        v.progress,
                distance_nm,
                expected_profit,
                position:        state.ship_position(),
            }
        });

        // Break-even is quoted for the route in view, else a nominal trip.
        let trip_nm = voyage
            .as_ref()
            .map(|v| v.distance_nm)
            .filter(|d| *d > 0.0)
            .unwrap_or(REFERENCE_TRIP_NM);

        let fleet = state
            .ships
            .values()
            .map(|ship| ShipView {
                ship_id:          ship.id.clone(),
                name:             ship.name.clone(),
                category:         ship.category,
                owned:            ship.owned,
                selected:         state.selected.as_deref() == Some(ship.id.as_str()),
                affordable:       !ship.owned && state.balance >= ship.price,
                break_even_trips: ship.break_even_trips(trip_nm),
            })
            .collect();

        Self {
            clock: clock.clone(),
            state: state.clone(),
            fleet,
            voyage,
        }
    }

    pub fn phase(&self) -> VoyagePhase {
        self.voyage.as_ref().map_or(VoyagePhase::Absent, |v| v.phase)
    }
}
