//! Immutable enemy route through the placement grid.

use tower_defense_core::{CellCoord, ConfigError, GridConfig, PixelPoint};

/// Validated path together with the pixel-space waypoint of every cell.
#[derive(Clone, Debug)]
pub(crate) struct Path {
    cells: Vec<CellCoord>,
    waypoints: Vec<PixelPoint>,
}

impl Path {
    /// Validates the configured cells and precomputes their centers.
    pub(crate) fn new(cells: &[CellCoord], grid: &GridConfig) -> Result<Self, ConfigError> {
        if cells.is_empty() {
            return Err(ConfigError::EmptyPath);
        }

        if let Some(outside) = cells.iter().find(|cell| !grid.contains(**cell)) {
            return Err(ConfigError::PathOutOfBounds(*outside));
        }

        if let Some(pair) = cells
            .windows(2)
            .find(|pair| pair[0].manhattan_distance(pair[1]) != 1)
        {
            return Err(ConfigError::DisconnectedPath {
                from: pair[0],
                to: pair[1],
            });
        }

        Ok(Self {
            cells: cells.to_vec(),
            waypoints: cells
                .iter()
                .map(|cell| cell.center(grid.cell_size))
                .collect(),
        })
    }

    pub(crate) fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }

    /// Index of the exit waypoint.
    pub(crate) fn final_index(&self) -> usize {
        self.waypoints.len() - 1
    }

    pub(crate) fn waypoint(&self, index: usize) -> Option<PixelPoint> {
        self.waypoints.get(index).copied()
    }

    /// Center of the entry cell, where enemies spawn.
    pub(crate) fn start(&self) -> PixelPoint {
        self.waypoints[0]
    }
}
