use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};
use rand::seq::SliceRandom;
use rayon::prelude::*;
use twenty48_core::{GameSession, Move, SessionSummary};

use crate::config::{AutoPlay, PolicyKind};

const PRIORITY_ORDER: [Move; 4] = [Move::Up, Move::Left, Move::Right, Move::Down];

/// Aggregate over a batch of finished games.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchStats {
    pub games: usize,
    pub mean_score: f64,
    pub best_score: u64,
    pub best_tile: u32,
}

impl BatchStats {
    pub fn from_summaries(summaries: &[SessionSummary]) -> Self {
        let games = summaries.len();
        let total: u64 = summaries.iter().map(|s| s.score).sum();
        Self {
            games,
            mean_score: if games == 0 { 0.0 } else { total as f64 / games as f64 },
            best_score: summaries.iter().map(|s| s.score).max().unwrap_or(0),
            best_tile: summaries.iter().map(|s| s.highest_tile).max().unwrap_or(0),
        }
    }
}

/// Pick the next move for the session's current board, or `None` when stuck.
fn select_move(session: &mut GameSession, policy: PolicyKind) -> Option<Move> {
    let legal = session.legal_moves();
    match policy {
        PolicyKind::Priority => PRIORITY_ORDER.into_iter().find(|m| legal.contains(m)),
        PolicyKind::Random => legal.choose(session.rng_mut()).copied(),
    }
}

/// Drive one seeded game until it is terminal or `max_moves` accepted moves
/// have been played.
pub fn play_game(seed: u64, policy: PolicyKind, max_moves: u64) -> SessionSummary {
    let mut session = GameSession::seeded(seed);
    while session.moves() < max_moves {
        let Some(mv) = select_move(&mut session, policy) else {
            break;
        };
        let turn = session.play(mv);
        if turn.terminal {
            break;
        }
    }
    let summary = session.summary();
    if !session.is_terminal() {
        warn!("game seed={seed} stopped at move cap {max_moves} before game over");
    }
    summary
}

/// Play `settings.games` independent games in parallel, seeds `base_seed + i`.
pub fn run_batch(settings: &AutoPlay, base_seed: u64) -> Result<Vec<SessionSummary>> {
    let play_all = || -> Vec<SessionSummary> {
        (0..settings.games)
            .into_par_iter()
            .map(|i| {
                let seed = base_seed.wrapping_add(u64::from(i));
                let summary = play_game(seed, settings.policy, settings.max_moves);
                info!(
                    "game {i} (seed {seed}): score {} in {} moves, highest tile {}",
                    summary.score, summary.moves, summary.highest_tile
                );
                summary
            })
            .collect()
    };

    let summaries = match settings.workers {
        Some(n) if n > 0 => rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build()
            .context("building autoplay thread pool")?
            .install(play_all),
        _ => play_all(),
    };
    Ok(summaries)
}

/// Write one JSON object per line.
pub fn write_results(path: &Path, summaries: &[SessionSummary]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("creating results file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for summary in summaries {
        serde_json::to_writer(&mut out, summary)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
