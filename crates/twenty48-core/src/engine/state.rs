use rand::Rng;
use std::fmt;
use std::str::FromStr;

use super::error::EngineError;
use super::ops;
use serde::{Deserialize, Serialize};

/// Side length of the board. Fixed for the lifetime of the engine.
pub const SIZE: usize = 4;

/// A single cell value: 0 for empty, otherwise a power of two >= 2.
pub type Tile = u32;
/// Points accrued from merges.
pub type Score = u64;

pub(crate) type Line = [Tile; SIZE];
pub(crate) type Grid = [Line; SIZE];

/// A direction to move/merge tiles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All four directions, in the order front-ends list them.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Move::Up => "up",
            Move::Down => "down",
            Move::Left => "left",
            Move::Right => "right",
        };
        f.write_str(name)
    }
}

impl FromStr for Move {
    type Err = EngineError;

    /// Accepts full names, initials, and WASD keys (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "u" | "w" => Ok(Move::Up),
            "down" | "s" => Ok(Move::Down),
            "left" | "l" | "a" => Ok(Move::Left),
            "right" | "r" | "d" => Ok(Move::Right),
            other => Err(EngineError::UnknownMove(other.to_string())),
        }
    }
}

/// Outcome of sliding a board in one direction: the new snapshot and the
/// sum of every tile created by a merge during that slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResult {
    pub board: Board,
    pub score: Score,
}

/// Immutable 4x4 2048 board, stored row-major as actual tile values.
///
/// Every transformation returns a fresh `Board`; the receiver is never
/// touched, so earlier snapshots stay valid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board(pub(crate) Grid);

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board([[0; SIZE]; SIZE]);

    /// Construct a `Board` from its rows, top to bottom.
    #[inline]
    pub const fn from_rows(rows: [[Tile; SIZE]; SIZE]) -> Self {
        Board(rows)
    }

    /// Build a board from an arbitrary grid, rejecting anything that is not 4x4.
    ///
    /// ```
    /// use twenty48_core::{Board, EngineError};
    /// let ok = Board::try_from_grid(&[vec![2u32, 0, 0, 0], vec![0; 4], vec![0; 4], vec![0; 4]]);
    /// assert!(ok.is_ok());
    /// let bad = Board::try_from_grid(&[vec![2u32, 0, 0], vec![0; 4]]);
    /// assert!(matches!(bad, Err(EngineError::InvalidBoardShape { rows: 2, .. })));
    /// ```
    pub fn try_from_grid<R: AsRef<[Tile]>>(grid: &[R]) -> Result<Self, EngineError> {
        let shape_ok = grid.len() == SIZE && grid.iter().all(|row| row.as_ref().len() == SIZE);
        if !shape_ok {
            return Err(EngineError::InvalidBoardShape {
                rows: grid.len(),
                cols: grid.iter().map(|row| row.as_ref().len()).collect(),
            });
        }
        let mut cells = [[0; SIZE]; SIZE];
        for (dst, src) in cells.iter_mut().zip(grid) {
            dst.copy_from_slice(src.as_ref());
        }
        Ok(Board(cells))
    }

    /// Copy of the rows, top to bottom.
    #[inline]
    pub fn rows(self) -> [[Tile; SIZE]; SIZE] {
        self.0
    }

    /// Value at (`row`, `col`), 0 if empty. Panics when out of range.
    #[inline]
    pub fn get(self, row: usize, col: usize) -> Tile {
        self.0[row][col]
    }

    /// Slide/merge tiles in `dir` (no random insert).
    ///
    /// ```
    /// use twenty48_core::{Board, Move};
    /// let b = Board::from_rows([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
    /// let res = b.shift(Move::Left);
    /// assert_eq!(res.board.rows()[0], [4, 0, 0, 0]);
    /// assert_eq!(res.score, 4);
    /// ```
    #[inline]
    pub fn shift(self, dir: Move) -> MoveResult {
        ops::apply_move(dir, self)
    }

    /// Insert a 2 (90%) or 4 (10%) tile into a random empty cell, using the provided RNG.
    /// A full board comes back unchanged.
    ///
    /// Deterministic example using a seeded RNG:
    /// ```
    /// use twenty48_core::Board;
    /// use rand::{SeedableRng, rngs::StdRng};
    /// let mut rng = StdRng::seed_from_u64(123);
    /// let b = Board::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng);
    /// assert_eq!(b.count_empty(), 14);
    /// ```
    #[inline]
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        ops::spawn_tile(self, rng)
    }

    /// Convenience: like `with_random_tile` but uses thread-local RNG.
    #[inline]
    pub fn with_random_tile_thread(self) -> Self {
        let mut rng = rand::thread_rng();
        self.with_random_tile(&mut rng)
    }

    /// Perform a move then insert a random tile if the move changed the board.
    ///
    /// The change check is a full cell-wise comparison; when nothing moved the
    /// same board comes back with a zero score and no tile is spawned.
    #[inline]
    pub fn make_move<R: Rng + ?Sized>(self, direction: Move, rng: &mut R) -> MoveResult {
        let moved = self.shift(direction);
        if moved.board != self {
            MoveResult {
                board: moved.board.with_random_tile(rng),
                score: moved.score,
            }
        } else {
            MoveResult {
                board: self,
                score: 0,
            }
        }
    }

    /// Return true if no legal moves remain.
    ///
    /// ```
    /// use twenty48_core::Board;
    /// let b = Board::from_rows([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
    /// assert!(b.is_terminal());
    /// assert!(!Board::EMPTY.is_terminal());
    /// ```
    #[inline]
    pub fn is_terminal(self) -> bool {
        ops::is_terminal(self)
    }

    /// Directions whose shift changes the board, in `Move::ALL` order.
    pub fn legal_moves(self) -> Vec<Move> {
        Move::ALL
            .into_iter()
            .filter(|&dir| self.shift(dir).board != self)
            .collect()
    }

    /// Return the highest tile value (e.g., 2048) present on the board, 0 if empty.
    #[inline]
    pub fn highest_tile(self) -> Tile {
        ops::get_highest_tile_val(self)
    }

    /// Count the number of empty cells on the board.
    #[inline]
    pub fn count_empty(self) -> usize {
        ops::count_empty(self)
    }

    /// Sum of all tile values.
    #[inline]
    pub fn tile_sum(self) -> Score {
        self.tiles().map(Score::from).sum()
    }

    /// Iterate over tile values in row-major order.
    #[inline]
    pub fn tiles(self) -> TilesIter {
        TilesIter {
            board: self,
            idx: 0,
        }
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Board").field(&self.0).finish()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f, "-------------------------------")?;
            }
            let cells: Vec<String> = row.iter().map(ops::format_val).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<Vec<Tile>>> for Board {
    type Error = EngineError;

    fn try_from(grid: Vec<Vec<Tile>>) -> Result<Self, Self::Error> {
        Board::try_from_grid(&grid)
    }
}

/// Iterator over board tiles in row-major order.
pub struct TilesIter {
    board: Board,
    idx: usize,
}

impl Iterator for TilesIter {
    type Item = Tile;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.idx >= SIZE * SIZE {
            return None;
        }
        let tile = self.board.0[self.idx / SIZE][self.idx % SIZE];
        self.idx += 1;
        Some(tile)
    }
}
