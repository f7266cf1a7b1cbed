use serde::{Deserialize, Serialize};
use crate::types::{HarborId, ShipId};

/// All player-issued commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    // ── Fleet ─────────────────────────────────────
    BuyShip { ship_id: ShipId },
    SelectShip { ship_id: ShipId },

    // ── Voyage ────────────────────────────────────
    StartVoyage {
        origin:      HarborId,
        destination: HarborId,
    },
    CancelVoyage,

    // ── Clock control ─────────────────────────────
    Pause,
    Resume,
    SetSpeed { speed: crate::clock::SimSpeed },
}

impl PlayerCommand {
    /// Stable name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            PlayerCommand::BuyShip { .. }     => "buy_ship",
            PlayerCommand::SelectShip { .. }  => "select_ship",
            PlayerCommand::StartVoyage { .. } => "start_voyage",
            PlayerCommand::CancelVoyage       => "cancel_voyage",
            PlayerCommand::Pause              => "pause",
            PlayerCommand::Resume             => "resume",
            PlayerCommand::SetSpeed { .. }    => "set_speed",
        }
    }
}
