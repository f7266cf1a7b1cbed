//! Observed game events.
//!
//! RULE: The simulator never emits events. Events are derived by
//! diffing two GameState values, the same way a presentation layer
//! notices "trip completed" by watching the voyage-active flag flip.

use crate::{
    state::GameState,
    types::{HarborId, Money, Progress, ShipId},
    voyage::VoyagePhase,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    // ── Fleet ──────────────────────────────────────
    ShipPurchased {
        ship_id: ShipId,
        price:   Money,
        balance: Money,
    },
    ShipSelected {
        ship_id: ShipId,
    },

    // ── Voyage ─────────────────────────────────────
    VoyageStarted {
        ship_id:     ShipId,
        origin:      HarborId,
        destination: HarborId,
    },
    VoyageCompleted {
        ship_id:     ShipId,
        origin:      HarborId,
        destination: HarborId,
        profit:      Money,
        balance:     Money,
    },
    VoyageCleared {
        phase:    VoyagePhase,
        progress: Progress,
    },
}

impl GameEvent {
    /// Everything that changed between `before` and `after`, in
    /// fleet-then-voyage order.
    pub fn diff(before: &GameState, after: &GameState) -> Vec<GameEvent> {
        let mut events = Vec::new();

        for (id, ship) in &after.ships {
            let was_owned = before.ships.get(id).is_some_and(|s| s.owned);
            if ship.owned && !was_owned {
                events.push(GameEvent::ShipPurchased {
                    ship_id: id.clone(),
                    price:   ship.price,
                    balance: after.balance,
                });
            }
        }

        if after.selected != before.selected {
            if let Some(id) = &after.selected {
                events.push(GameEvent::ShipSelected { ship_id: id.clone() });
            }
        }

        let was_active = before.voyage_active();
        match (&before.voyage, &after.voyage) {
            (Some(old), None) => events.push(GameEvent::VoyageCleared {
                phase:    old.phase(),
                progress: old.progress,
            }),
            (_, Some(v)) if v.active && !was_active => {
                events.push(GameEvent::VoyageStarted {
                    ship_id:     v.ship_id.clone(),
                    origin:      v.origin.clone(),
                    destination: v.destination.clone(),
                });
            }
            (_, Some(v)) if !v.active && was_active => {
                events.push(GameEvent::VoyageCompleted {
                    ship_id:     after.selected.clone().unwrap_or_else(|| v.ship_id.clone()),
                    origin:      v.origin.clone(),
                    destination: v.destination.clone(),
                    profit:      after.balance.saturating_sub(before.balance),
                    balance:     after.balance,
                });
            }
            _ => {}
        }

        events
    }

    /// Stable string name for the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            GameEvent::ShipPurchased { .. }   => "ship_purchased",
            GameEvent::ShipSelected { .. }    => "ship_selected",
            GameEvent::VoyageStarted { .. }   => "voyage_started",
            GameEvent::VoyageCompleted { .. } => "voyage_completed",
            GameEvent::VoyageCleared { .. }   => "voyage_cleared",
        }
    }
}
