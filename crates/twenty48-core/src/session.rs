//! Turn sequencing for a single game.
//!
//! `GameSession` owns the current board, the running score and the random
//! source, and applies the move -> compare -> spawn -> score sequence in one
//! place. A session must be driven one turn at a time.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::engine::{self as GameEngine, Board, Move, Score, Tile};

/// What a call to `GameSession::play` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    /// The slide changed the board (and therefore a tile was spawned).
    pub moved: bool,
    /// Points added to the session score by this turn.
    pub delta: Score,
    /// The board after this turn admits no further moves.
    pub terminal: bool,
}

/// Snapshot of a session suitable for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub seed: Option<u64>,
    pub moves: u64,
    pub score: Score,
    pub highest_tile: Tile,
    pub board: Board,
}

pub struct GameSession<R = StdRng> {
    board: Board,
    score: Score,
    moves: u64,
    seed: Option<u64>,
    rng: R,
}

impl GameSession<StdRng> {
    /// Session whose whole tile sequence is reproducible from `seed`.
    pub fn seeded(seed: u64) -> Self {
        let mut session = Self::new(StdRng::seed_from_u64(seed));
        session.seed = Some(seed);
        session
    }

    /// Session seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> GameSession<R> {
    /// Start a game with a freshly seeded board and a zero score.
    pub fn new(mut rng: R) -> Self {
        let board = GameEngine::new_board(&mut rng);
        Self {
            board,
            score: 0,
            moves: 0,
            seed: None,
            rng,
        }
    }

    /// Slide in `direction`; spawn and score only if the board changed.
    ///
    /// ```
    /// use twenty48_core::{GameSession, Move};
    /// let mut s = GameSession::seeded(3);
    /// let before = s.board();
    /// let turn = s.play(Move::Left);
    /// assert_eq!(turn.moved, s.board() != before);
    /// ```
    pub fn play(&mut self, direction: Move) -> Turn {
        let result = GameEngine::apply_move(direction, self.board);
        if result.board == self.board {
            return Turn {
                moved: false,
                delta: 0,
                terminal: self.board.is_terminal(),
            };
        }

        self.board = GameEngine::spawn_tile(result.board, &mut self.rng);
        self.score += result.score;
        self.moves += 1;

        let terminal = self.board.is_terminal();
        if terminal {
            debug!(
                "game over after {} moves, score {}, highest tile {}",
                self.moves,
                self.score,
                self.board.highest_tile()
            );
        }
        Turn {
            moved: true,
            delta: result.score,
            terminal,
        }
    }

    /// Throw the current game away and start over on a new board.
    /// The random source keeps running; it is not re-seeded.
    pub fn restart(&mut self) {
        debug!("restarting session at score {} after {} moves", self.score, self.moves);
        self.board = GameEngine::new_board(&mut self.rng);
        self.score = 0;
        self.moves = 0;
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// Number of accepted (board-changing) moves since the last restart.
    pub fn moves(&self) -> u64 {
        self.moves
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn is_terminal(&self) -> bool {
        self.board.is_terminal()
    }

    /// Directions that would change the current board.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.board.legal_moves()
    }

    /// Mutable access to the random source, e.g. for move selection that
    /// should stay reproducible with the session seed.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            seed: self.seed,
            moves: self.moves,
            score: self.score,
            highest_tile: self.board.highest_tile(),
            board: self.board,
        }
    }
}
