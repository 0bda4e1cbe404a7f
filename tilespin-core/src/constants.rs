//! Game-wide constants.
//! Sizes are in pixels and times in seconds unless noted otherwise.
use crate::rotation::Rotation;

/// Tiles per side of the square grid.
pub const TILE_COUNT: u32 = 4;
/// Number of cells in the grid, row-major.
pub const CELL_COUNT: usize = (TILE_COUNT * TILE_COUNT) as usize;
/// The fixed rotation cycle a click steps through.
pub const ROTATIONS: [Rotation; 4] = [
    Rotation::Deg0,
    Rotation::Deg90,
    Rotation::Deg180,
    Rotation::Deg270,
];
pub const DEFAULT_TOTAL_TIME_SECS: u32 = 60;
/// Countdown tick interval (ms).
pub const TICK_INTERVAL_MS: u32 = 1000;
/// Gap between tiles in the board snapshot.
pub const BOARD_GAP_PX: u32 = 3;
