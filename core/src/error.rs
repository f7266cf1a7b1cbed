use thiserror::Error;

use crate::types::{HarborId, Money, ShipId};

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Ship '{ship_id}' not found")]
    NotFound { ship_id: ShipId },

    #[error("Insufficient funds: price {price}, balance {balance}")]
    InsufficientFunds { price: Money, balance: Money },

    #[error("Ship '{ship_id}' is not owned")]
    NotOwned { ship_id: ShipId },

    #[error("A voyage is already in progress")]
    VoyageInProgress,

    #[error("Invalid harbor '{harbor_id}': {reason}")]
    InvalidHarbor { harbor_id: HarborId, reason: &'static str },

    #[error("No ship selected")]
    NoShipSelected,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Voyage driver is no longer running")]
    DriverStopped,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimError {
    /// Stable snake_case code for the error kind.
    /// Used in IPC replies so clients can match without parsing messages.
    pub fn kind(&self) -> &'static str {
        match self {
            SimError::NotFound { .. }          => "not_found",
            SimError::InsufficientFunds { .. } => "insufficient_funds",
            SimError::NotOwned { .. }          => "not_owned",
            SimError::VoyageInProgress         => "voyage_in_progress",
            SimError::InvalidHarbor { .. }     => "invalid_harbor",
            SimError::NoShipSelected           => "no_ship_selected",
            SimError::Serialization(_)         => "serialization",
            SimError::DriverStopped            => "driver_stopped",
            SimError::Other(_)                 => "other",
        }
    }

    /// True for the validation outcomes a player can cause.
    /// These are never fatal and leave state unchanged.
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            SimError::Serialization(_) | SimError::DriverStopped | SimError::Other(_)
        )
    }
}

pub type SimResult<T> = Result<T, SimError>;
