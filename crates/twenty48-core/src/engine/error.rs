use thiserror::Error;

/// Conditions the engine reports instead of panicking.
///
/// Board transitions themselves are total; only data coming from outside
/// the engine (a grid of the wrong shape, a direction typed by a user) can
/// be rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid board shape: expected 4x4, got {rows} rows with lengths {cols:?}")]
    InvalidBoardShape { rows: usize, cols: Vec<usize> },

    #[error("unknown move {0:?}; expected one of up/down/left/right")]
    UnknownMove(String),
}
