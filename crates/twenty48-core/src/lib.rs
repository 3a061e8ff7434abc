//! twenty48-core: the rule engine of the 2048 sliding-tile puzzle.
//!
//! This crate provides:
//! - An immutable 4x4 `Board` value with ergonomic methods (`shift`, `with_random_tile`, ...)
//! - The four directional moves, all built on one compress-and-merge line routine
//! - Terminal-state detection
//! - `GameSession`, which sequences move, spawn and score updates for a front-end
//!
//! Quick start:
//! ```
//! use twenty48_core::engine::{self as GameEngine, Board, Move};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let b0 = GameEngine::new_board(&mut rng);
//! let res = GameEngine::apply_move(Move::Left, b0);
//! // merging keeps the tile sum; the score counts the merged tiles
//! assert_eq!(res.board.tile_sum(), b0.tile_sum());
//!
//! let merged = GameEngine::move_left(Board::from_rows([[2, 2, 4, 4], [0; 4], [0; 4], [0; 4]]));
//! assert_eq!(merged.board.rows()[0], [4, 8, 0, 0]);
//! assert_eq!(merged.score, 12);
//! ```
//!
//! Full loop with a session:
//! ```
//! use twenty48_core::{GameSession, Move};
//!
//! let mut session = GameSession::seeded(7);
//! let mut turns = 0;
//! while !session.is_terminal() && turns < 8 {
//!     let _ = session.play(Move::ALL[turns % 4]);
//!     turns += 1;
//! }
//! assert!(session.board().count_empty() < 16);
//! ```

pub mod engine;
pub mod session;

pub use engine::{Board, EngineError, Move, MoveResult};
pub use session::{GameSession, SessionSummary, Turn};
