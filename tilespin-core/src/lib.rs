//! Rotation tile puzzle core: square-crop an uploaded image, cut it into a
//! 4x4 grid of randomly turned tiles and track the player's quarter turns
//! against a countdown. No browser types live here.

pub mod board;
pub mod config;
pub mod constants;
pub mod countdown;
pub mod error;
pub mod events;
pub mod image_prep;
pub mod rotation;
pub mod session;
pub mod tile_render;

pub use board::{board_png, render_board};
pub use config::GameConfig;
pub use countdown::Countdown;
pub use error::PuzzleError;
pub use events::{Notice, PuzzleState, SessionEvent, TickOutcome};
pub use image_prep::{SquareImage, decode, encode_png, prepare};
pub use rotation::Rotation;
pub use session::{GameSession, PuzzleSession, RunId, SessionStatus, TileState};
pub use tile_render::{cell_of, render_tile, tile_size_for};
