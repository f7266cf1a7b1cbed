//! Game state and its state transitions.
//!
//! RULE: Every operation is all-or-nothing. Validation runs to
//! completion before the first field is written, so a rejected
//! operation returns its error with the state untouched.

use crate::{
    config::{HarborConfig, ShipCategory, ShipConfig, SimConfig},
    error::{SimError, SimResult},
    types::{HarborId, Money, Progress, ShipId},
    voyage::{self, MapPoint, Voyage, VoyagePhase},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ship {
    pub id:            ShipId,
    pub name:          String,
    pub category:      ShipCategory,
    pub capacity:      u32,
    pub price:         Money,
    pub speed:         u32,
    pub profit_per_nm: f64,
    pub owned:         bool,
}

impl Ship {
    pub fn from_config(config: &ShipConfig) -> Self {
        Self {
            id:            config.id.clone(),
            name:          config.name.clone(),
            category:      config.category,
            capacity:      config.capacity,
            price:         config.price,
            speed:         config.speed,
            profit_per_nm: config.profit_per_nm,
            owned:         false,
        }
    }

    /// Voyages of `distance_nm` needed to earn back the purchase price,
    /// rounded to the nearest trip. None when the route pays nothing.
    pub fn break_even_trips(&self, distance_nm: f64) -> Option<u64> {
        let per_trip = distance_nm * self.profit_per_nm;
        if per_trip <= 0.0 {
            return None;
        }
        Some((self.price as f64 / per_trip).round() as u64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Harbor {
    pub id:       HarborId,
    pub name:     String,
    pub position: MapPoint,
}

impl Harbor {
    pub fn from_config(config: &HarborConfig) -> Self {
        Self {
            id:       config.id.clone(),
            name:     config.name.clone(),
            position: MapPoint::new(config.x, config.y),
        }
    }
}

/// Result of a purchase that was not rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purchase {
    Bought { price: Money },
    AlreadyOwned,
}

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No active voyage.
    Idle,
    Advanced { progress: Progress },
    Completed { profit: Money },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameState {
    pub balance:  Money,
    pub ships:    BTreeMap<ShipId, Ship>,
    pub selected: Option<ShipId>,
    pub harbors:  Vec<Harbor>,
    pub voyage:   Option<Voyage>,
}

impl GameState {
    /// Fresh game: starting balance, nothing owned, no voyage.
    pub fn new(config: &SimConfig) -> Self {
        Self {
            balance:  config.starting_balance,
            ships:    config
                .ships
                .iter()
                .map(|s| (s.id.clone(), Ship::from_config(s)))
                .collect(),
            selected: None,
            harbors:  config.harbors.iter().map(Harbor::from_config).collect(),
            voyage:   None,
        }
    }

    // ── Lookups ────────────────────────────────────────────────

    pub fn ship(&self, id: &str) -> Option<&Ship> {
        self.ships.get(id)
    }

    pub fn harbor(&self, id: &str) -> Option<&Harbor> {
        self.harbors.iter().find(|h| h.id == id)
    }

    pub fn selected_ship(&self) -> Option<&Ship> {
        self.selected.as_deref().and_then(|id| self.ships.get(id))
    }

    pub fn owned_ships(&self) -> impl Iterator<Item = &Ship> {
        self.ships.values().filter(|s| s.owned)
    }

    /// Roster grouped by category, each group in id order.
    pub fn ships_by_category(&self) -> BTreeMap<ShipCategory, Vec<&Ship>> {
        let mut groups: BTreeMap<ShipCategory, Vec<&Ship>> = BTreeMap::new();
        for ship in self.ships.values() {
            groups.entry(ship.category).or_default().push(ship);
        }
        groups
    }

    pub fn voyage_phase(&self) -> VoyagePhase {
        VoyagePhase::of(self.voyage.as_ref())
    }

    pub fn voyage_active(&self) -> bool {
        self.voyage_phase() == VoyagePhase::Active
    }

    // ── Operations ─────────────────────────────────────────────

    pub fn purchase_ship(&mut self, ship_id: &str) -> SimResult<Purchase> {
        let ship = self.ships.get(ship_id).ok_or_else(|| SimError::NotFound {
            ship_id: ship_id.to_string(),
        })?;
        if ship.owned {
            return Ok(Purchase::AlreadyOwned);
        }
        let price = ship.price;
        let balance = self
            .balance
            .checked_sub(price)
            .ok_or(SimError::InsufficientFunds { price, balance: self.balance })?;

        self.balance = balance;
        if let Some(ship) = self.ships.get_mut(ship_id) {
            ship.owned = true;
        }
        if self.selected.is_none() {
            self.selected = Some(ship_id.to_string());
        }
        log::info!("purchased ship={ship_id} price={price} balance={balance}");
        Ok(Purchase::Bought { price })
    }

    pub fn select_ship(&mut self, ship_id: &str) -> SimResult<()> {
        let ship = self.ships.get(ship_id).ok_or_else(|| SimError::NotFound {
            ship_id: ship_id.to_string(),
        })?;
        if !ship.owned {
            return Err(SimError::NotOwned { ship_id: ship_id.to_string() });
        }
        self.selected = Some(ship_id.to_string());
        log::debug!("selected ship={ship_id}");
        Ok(())
    }

    pub fn start_voyage(&mut self, origin: &str, destination: &str) -> SimResult<()> {
        let ship_id = self.selected.clone().ok_or(SimError::NoShipSelected)?;
        if self.voyage_active() {
            return Err(SimError::VoyageInProgress);
        }
        self.route_distance(origin, destination)?;

        log::info!("voyage started ship={ship_id} {origin} -> {destination}");
        self.voyage = Some(Voyage::new(origin.to_string(), destination.to_string(), ship_id));
        Ok(())
    }

    pub fn cancel_voyage(&mut self) {
        if let Some(v) = self.voyage.take() {
            log::info!(
                "voyage cleared {} -> {} at {}% ({:?})",
                v.origin,
                v.destination,
                v.progress,
                v.phase()
            );
        }
    }

    /// Advance the active voyage by one step.
    /// On docking, pays the voyage's profit exactly once at the rate of
    /// the ship selected at that moment.
    pub fn tick(&mut self) -> SimResult<TickOutcome> {
        let Some(voyage) = self.voyage.as_ref().filter(|v| v.active) else {
            return Ok(TickOutcome::Idle);
        };

        let (progress, docked) = voyage.next_progress();
        if !docked {
            if let Some(v) = self.voyage.as_mut() {
                v.progress = progress;
            }
            return Ok(TickOutcome::Advanced { progress });
        }

        let profit = self.voyage_profit(voyage)?;
        self.balance = self.balance.saturating_add(profit);
        let paid_by = self.selected.clone().unwrap_or_default();
        if let Some(v) = self.voyage.as_mut() {
            v.progress = progress;
            v.active = false;
            log::info!(
                "voyage completed ship={paid_by} {} -> {} profit={profit} balance={}",
                v.origin,
                v.destination,
                self.balance
            );
        }
        Ok(TickOutcome::Completed { profit })
    }

    // ── Derived queries ────────────────────────────────────────

    /// Sailing distance between two distinct harbors.
    pub fn route_distance(&self, origin: &str, destination: &str) -> SimResult<f64> {
        let from = self.harbor(origin).ok_or_else(|| SimError::InvalidHarbor {
            harbor_id: origin.to_string(),
            reason:    "unknown harbor",
        })?;
        let to = self.harbor(destination).ok_or_else(|| SimError::InvalidHarbor {
            harbor_id: destination.to_string(),
            reason:    "unknown harbor",
        })?;
        if from.id == to.id {
            return Err(SimError::InvalidHarbor {
                harbor_id: destination.to_string(),
                reason:    "origin and destination are the same",
            });
        }
        Ok(voyage::route_distance_nm(&from.position, &to.position))
    }

    /// What a completed voyage of `ship_id` on this route would pay.
    pub fn estimated_profit(
        &self,
        ship_id: &str,
        origin: &str,
        destination: &str,
    ) -> SimResult<Money> {
        let ship = self.ships.get(ship_id).ok_or_else(|| SimError::NotFound {
            ship_id: ship_id.to_string(),
        })?;
        let distance = self.route_distance(origin, destination)?;
        Ok(voyage::voyage_profit(distance, ship.profit_per_nm))
    }

    /// Map position of the ship on the current voyage record.
    pub fn ship_position(&self) -> Option<MapPoint> {
        let v = self.voyage.as_ref()?;
        let from = self.harbor(&v.origin)?;
        let to = self.harbor(&v.destination)?;
        Some(from.position.lerp(&to.position, v.fraction()))
    }

    /// What `v` pays on docking: its route at the currently selected
    /// ship's rate.
    pub fn voyage_profit(&self, v: &Voyage) -> SimResult<Money> {
        let ship_id = self.selected.as_deref().ok_or(SimError::NoShipSelected)?;
        self.estimated_profit(ship_id, &v.origin, &v.destination)
    }
}
