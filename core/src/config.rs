//! Tunable constants the simulation depends on.
//!
//! Every section implements [`Default`] with the stock balance and is marked
//! `#[serde(default)]`, so a configuration file only needs to name the values
//! it overrides.

use serde::{Deserialize, Serialize};

use crate::CellCoord;

const DEFAULT_PATH_CORNERS: [(u32, u32); 8] = [
    (0, 7),
    (5, 7),
    (5, 2),
    (10, 2),
    (10, 12),
    (15, 12),
    (15, 7),
    (19, 7),
];

/// Complete configuration handed to the world at construction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Placement grid dimensions.
    pub grid: GridConfig,
    /// Ordered cells enemies walk from entry to exit.
    pub path: Vec<CellCoord>,
    /// Prices, starting balance and scoring.
    pub economy: EconomyConfig,
    /// Tower stats and per-level deltas.
    pub tower: TowerConfig,
    /// Base enemy stats before wave scaling.
    pub enemy: EnemyConfig,
    /// Wave composition, cadence and scaling.
    pub waves: WaveConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            path: path_from_corners(&DEFAULT_PATH_CORNERS),
            economy: EconomyConfig::default(),
            tower: TowerConfig::default(),
            enemy: EnemyConfig::default(),
            waves: WaveConfig::default(),
        }
    }
}

/// Placement grid dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of cell columns.
    pub columns: u32,
    /// Number of cell rows.
    pub rows: u32,
    /// Side length of a square cell in pixels.
    pub cell_size: f32,
}

impl GridConfig {
    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 15,
            cell_size: 40.0,
        }
    }
}

/// Prices, starting balance and scoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Money available when a session starts.
    pub starting_money: u32,
    /// Lives available when a session starts.
    pub starting_lives: u32,
    /// Price of a level one tower. Selling refunds half of it per level.
    pub tower_cost: u32,
    /// Price of a single tower upgrade.
    pub upgrade_cost: u32,
    /// Score granted per unit of money rewarded for a kill.
    pub score_per_reward: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_money: 200,
            starting_lives: 20,
            tower_cost: 50,
            upgrade_cost: 75,
            score_per_reward: 10,
        }
    }
}

/// Tower stats at level one and the deltas applied per upgrade.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerConfig {
    /// Targeting radius in pixels at level one.
    pub range: f32,
    /// Projectile damage at level one.
    pub damage: f32,
    /// Ticks between shots at level one.
    pub fire_rate: u32,
    /// Range gained per upgrade.
    pub range_step: f32,
    /// Damage gained per upgrade.
    pub damage_step: f32,
    /// Ticks removed from the fire rate per upgrade.
    pub fire_rate_step: u32,
    /// Lower bound of the fire rate.
    pub min_fire_rate: u32,
    /// Highest level a tower can reach.
    pub max_level: u32,
    /// Projectile speed in pixels per tick.
    pub projectile_speed: f32,
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            range: 100.0,
            damage: 20.0,
            fire_rate: 60,
            range_step: 25.0,
            damage_step: 10.0,
            fire_rate_step: 10,
            min_fire_rate: 20,
            max_level: 3,
            projectile_speed: 5.0,
        }
    }
}

/// Enemy stats before wave scaling is applied.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Pixels travelled per tick during wave one.
    pub speed: f32,
    /// Health during wave one.
    pub health: f32,
    /// Money granted for a kill during wave one.
    pub reward: u32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            health: 100.0,
            reward: 10,
        }
    }
}

/// Wave composition, cadence and scaling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Enemies spawned by wave one.
    pub initial_enemy_count: u32,
    /// Additional enemies spawned by every following wave.
    pub enemy_count_step: u32,
    /// Ticks between two spawns of the same wave.
    pub spawn_interval: u32,
    /// Speed multiplier gained per wave.
    pub speed_step: f32,
    /// Health multiplier gained per wave.
    pub health_step: f32,
    /// Ticks of grace before the first wave starts spawning.
    pub pregame_ticks: u32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            initial_enemy_count: 5,
            enemy_count_step: 2,
            spawn_interval: 60,
            speed_step: 0.1,
            health_step: 0.2,
            pregame_ticks: 180,
        }
    }
}

/// Expands straight-line segments between corners into every traversed cell.
fn path_from_corners(corners: &[(u32, u32)]) -> Vec<CellCoord> {
    let mut cells = Vec::new();
    let Some(&(first_column, first_row)) = corners.first() else {
        return cells;
    };

    cells.push(CellCoord::new(first_column, first_row));
    let (mut column, mut row) = (first_column, first_row);
    for &(next_column, next_row) in &corners[1..] {
        while (column, row) != (next_column, next_row) {
            if column != next_column {
                column = if next_column > column { column + 1 } else { column - 1 };
            } else {
                row = if next_row > row { row + 1 } else { row - 1 };
            }
            cells.push(CellCoord::new(column, row));
        }
    }
    cells
}
