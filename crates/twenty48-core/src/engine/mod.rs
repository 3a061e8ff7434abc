//! Engine module: immutable 4x4 2048 board, move resolution, spawning and
//! terminal detection. Public API stays small and ergonomic.
//!
//! - `Board` is the 4x4 snapshot with useful methods.
//! - Free functions mirror the methods when convenient (e.g., `move_left`).
//! - The line algorithm and its geometric adaptations live in `ops`.

mod error;
mod ops;
pub mod state;

pub use error::EngineError;
pub use state::{Board, Move, MoveResult, Score, Tile, TilesIter};

pub use ops::{
    apply_move, count_empty, get_highest_tile_val, insert_random_tile, is_terminal, move_down,
    move_left, move_right, move_up, new_board, spawn_tile,
};
