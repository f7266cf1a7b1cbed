use crate::types::{HarborId, Money, ShipId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Fallback timer period when game.json omits it. One tick per 80 ms
/// makes a full voyage take about eight seconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 80;

/// Map coordinates are percentages of the map extent.
pub const MAP_MIN: f64 = 0.0;
pub const MAP_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ShipCategory {
    Container,
    OilTanker,
    GasCarrier,
    Ferry,
    CruiseShip,
}

impl ShipCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ShipCategory::Container  => "Container",
            ShipCategory::OilTanker  => "Oil Tanker",
            ShipCategory::GasCarrier => "Gas Carrier",
            ShipCategory::Ferry      => "Ferry",
            ShipCategory::CruiseShip => "Cruise Ship",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShipConfig {
    pub id:            ShipId,
    pub name:          String,
    pub category:      ShipCategory,
    /// Cargo capacity in tons.
    pub capacity:      u32,
    pub price:         Money,
    /// Service speed in knots.
    pub speed:         u32,
    /// Currency earned per nautical mile sailed.
    pub profit_per_nm: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HarborConfig {
    pub id:   HarborId,
    pub name: String,
    pub x:    f64,
    pub y:    f64,
}

#[derive(Debug, Clone, Deserialize)]
struct GameSettingsFile {
    starting_balance: Money,
    #[serde(default = "default_tick_interval_ms")]
    tick_interval_ms: u64,
}

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

#[derive(Debug, Clone, Deserialize)]
struct ShipCatalogFile {
    ships: Vec<ShipConfig>,
}

#[derive(Debug, Clone, Deserialize)]
struct HarborMapFile {
    harbors: Vec<HarborConfig>,
}

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub starting_balance: Money,
    pub tick_interval_ms: u64,
    /// Catalog order is preserved for display.
    pub ships:            Vec<ShipConfig>,
    pub harbors:          Vec<HarborConfig>,
}

impl SimConfig {
    /// Load from the data/ directory.
    /// In tests, use SimConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let game_path = format!("{data_dir}/game.json");
        let game_content = std::fs::read_to_string(&game_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {game_path}: {e}"))?;

        let ships_path = format!("{data_dir}/ships.json");
        let ships_content = std::fs::read_to_string(&ships_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {ships_path}: {e}"))?;

        let harbors_path = format!("{data_dir}/harbors.json");
        let harbors_content = std::fs::read_to_string(&harbors_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {harbors_path}: {e}"))?;

        Self::from_json(&game_content, &ships_content, &harbors_content)
    }

    /// The bundled catalog and map, compiled into the binary.
    pub fn standard() -> anyhow::Result<Self> {
        Self::from_json(
            include_str!("../../data/game.json"),
            include_str!("../../data/ships.json"),
            include_str!("../../data/harbors.json"),
        )
    }

    fn from_json(game: &str, ships: &str, harbors: &str) -> anyhow::Result<Self> {
        let settings: GameSettingsFile = serde_json::from_str(game)
            .map_err(|e| anyhow::anyhow!("Invalid game settings: {e}"))?;
        let catalog: ShipCatalogFile = serde_json::from_str(ships)
            .map_err(|e| anyhow::anyhow!("Invalid ship catalog: {e}"))?;
        let map: HarborMapFile = serde_json::from_str(harbors)
            .map_err(|e| anyhow::anyhow!("Invalid harbor map: {e}"))?;

        let config = Self {
            starting_balance: settings.starting_balance,
            tick_interval_ms: settings.tick_interval_ms,
            ships:            catalog.ships,
            harbors:          map.harbors,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject catalogs the simulator cannot run on.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.tick_interval_ms == 0 {
            anyhow::bail!("tick_interval_ms must be positive");
        }

        let mut ship_ids = HashSet::new();
        for ship in &self.ships {
            if !ship_ids.insert(ship.id.as_str()) {
                anyhow::bail!("Duplicate ship id '{}'", ship.id);
            }
            if !ship.profit_per_nm.is_finite() || ship.profit_per_nm < 0.0 {
                anyhow::bail!(
                    "Ship '{}' has invalid profit_per_nm {}",
                    ship.id,
                    ship.profit_per_nm
                );
            }
        }

        if self.harbors.len() < 2 {
            anyhow::bail!("At least two harbors are required, got {}", self.harbors.len());
        }
        let mut harbor_ids = HashSet::new();
        for harbor in &self.harbors {
            if !harbor_ids.insert(harbor.id.as_str()) {
                anyhow::bail!("Duplicate harbor id '{}'", harbor.id);
            }
            let in_range = |v: f64| (MAP_MIN..=MAP_MAX).contains(&v);
            if !in_range(harbor.x) || !in_range(harbor.y) {
                anyhow::bail!(
                    "Harbor '{}' at ({}, {}) is outside the map [{MAP_MIN}, {MAP_MAX}]",
                    harbor.id,
                    harbor.x,
                    harbor.y
                );
            }
        }
        Ok(())
    }

    pub fn ship(&self, id: &str) -> Option<&ShipConfig> {
        self.ships.iter().find(|s| s.id == id)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            starting_balance: 100_000,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            ships: vec![
                ShipConfig {
                    id:            "feeder".into(),
                    name:          "Coastal Feeder".into(),
                    category:      ShipCategory::Container,
                    capacity:      100,
                    price:         80_000,
                    speed:         20,
                    profit_per_nm: 5.0,
                },
                ShipConfig {
                    id:            "panamax".into(),
                    name:          "Panamax Freighter".into(),
                    category:      ShipCategory::Container,
                    capacity:      500,
                    price:         180_000,
                    speed:         18,
                    profit_per_nm: 12.0,
                },
                ShipConfig {
                    id:            "island_ferry".into(),
                    name:          "Island Ferry".into(),
                    category:      ShipCategory::Ferry,
                    capacity:      150,
                    price:         15_000,
                    speed:         22,
                    profit_per_nm: 4.0,
                },
            ],
            harbors: vec![
                HarborConfig { id: "rotterdam".into(), name: "Rotterdam".into(), x: 25.0, y: 30.0 },
                HarborConfig { id: "hamburg".into(),   name: "Hamburg".into(),   x: 45.0, y: 25.0 },
                HarborConfig { id: "lisbon".into(),    name: "Lisbon".into(),    x: 10.0, y: 70.0 },
            ],
        }
    }
}
