//! Error taxonomy for rejected commands and invalid configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CellCoord;

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// The requested cell lies outside the configured grid.
    #[error("cell is outside the grid")]
    OutOfBounds,
    /// The requested cell belongs to the enemy path.
    #[error("cell is part of the enemy path")]
    OnPath,
    /// Another tower already stands on the requested cell.
    #[error("cell already hosts a tower")]
    Occupied,
}

/// Reasons a command may be rejected without mutating state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum CommandError {
    /// The player cannot afford the requested purchase.
    #[error("insufficient funds: {required} required, {available} available")]
    InsufficientFunds {
        /// Price of the rejected purchase.
        required: u32,
        /// Money held when the purchase was attempted.
        available: u32,
    },
    /// The tower cannot be placed on the requested cell.
    #[error("invalid placement: {0}")]
    InvalidPlacement(#[from] PlacementError),
    /// The selected tower already reached the maximum level.
    #[error("tower is already at the maximum level")]
    MaxLevelReached,
    /// The command needs a selected tower but none is selected.
    #[error("no tower is selected")]
    NoSelection,
    /// The command is disabled while time is frozen.
    #[error("the simulation is paused")]
    Paused,
    /// The command is disabled once the game ended.
    #[error("the game is over")]
    GameOver,
}

/// Problems detected while validating a [`crate::Config`].
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// The grid has no columns or no rows.
    #[error("grid must have at least one column and one row")]
    ZeroGrid,
    /// The cell size is zero, negative or not a number.
    #[error("cell size must be positive, got {0}")]
    NonPositiveCellSize(f32),
    /// The enemy path contains no cells.
    #[error("path must contain at least one cell")]
    EmptyPath,
    /// A path cell lies outside the grid.
    #[error("path cell ({}, {}) is outside the grid", .0.column(), .0.row())]
    PathOutOfBounds(CellCoord),
    /// Two consecutive path cells are not grid-adjacent.
    #[error(
        "path cells ({}, {}) and ({}, {}) are not adjacent",
        .from.column(), .from.row(), .to.column(), .to.row()
    )]
    DisconnectedPath {
        /// Earlier cell of the broken pair.
        from: CellCoord,
        /// Later cell of the broken pair.
        to: CellCoord,
    },
    /// Towers would be unable to exist at any level.
    #[error("tower max level must be at least one")]
    ZeroMaxLevel,
    /// Enemies would never move.
    #[error("enemy base speed must be positive, got {0}")]
    NonPositiveEnemySpeed(f32),
    /// Enemies would spawn dead and pay out without being hit.
    #[error("enemy base health must be positive, got {0}")]
    NonPositiveEnemyHealth(f32),
    /// Projectiles would never reach their targets.
    #[error("projectile speed must be positive, got {0}")]
    NonPositiveProjectileSpeed(f32),
}
