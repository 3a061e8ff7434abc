mod autoplay;
mod config;
mod interactive;

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::info;
use rand::Rng;
use twenty48_core::GameSession;

use config::{Config, PolicyKind};

#[derive(Parser, Debug)]
#[command(author, version, about = "Play 2048 in the terminal, or let a policy play it")]
struct Args {
    /// Path to configuration file
    #[arg(long, value_name = "FILE", value_parser = clap::value_parser!(PathBuf))]
    config: Option<PathBuf>,

    /// Seed for the random tile sequence (overrides the config)
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Let a policy play instead of reading moves from stdin
    #[arg(long)]
    autoplay: bool,

    /// Number of autoplay games
    #[arg(long, value_name = "N")]
    games: Option<u32>,

    /// Cap on accepted moves per autoplay game
    #[arg(long, value_name = "N")]
    max_moves: Option<u64>,

    /// Autoplay move selection
    #[arg(long, value_enum)]
    policy: Option<PolicyKind>,

    /// JSON-lines file for autoplay summaries
    #[arg(long, value_name = "FILE")]
    results: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset, e.g. "info", "debug"
    #[arg(long)]
    log: Option<String>,
}

impl Args {
    fn merge_into(self, mut cfg: Config) -> Config {
        if let Some(seed) = self.seed {
            cfg.seed = Some(seed);
        }
        if let Some(games) = self.games {
            cfg.autoplay.games = games;
        }
        if let Some(max_moves) = self.max_moves {
            cfg.autoplay.max_moves = max_moves;
        }
        if let Some(policy) = self.policy {
            cfg.autoplay.policy = policy;
        }
        if let Some(results) = self.results {
            cfg.report.results_file = Some(results);
        }
        if let Some(log) = self.log {
            cfg.log = log;
        }
        cfg
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let base = match &args.config {
        Some(path) => Config::from_toml(path)?,
        None => Config::default(),
    };
    let autoplay = args.autoplay;
    let cfg = args.merge_into(base);
    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log.as_str())).init();

    if autoplay {
        let seed = cfg.seed.unwrap_or_else(|| rand::thread_rng().gen());
        info!("autoplay base seed {seed}");
        let summaries = autoplay::run_batch(&cfg.autoplay, seed)?;
        let stats = autoplay::BatchStats::from_summaries(&summaries);
        info!(
            "Completed {} game(s): mean score {:.1}, best score {}, best tile {}",
            stats.games, stats.mean_score, stats.best_score, stats.best_tile
        );
        if let Some(path) = &cfg.report.results_file {
            autoplay::write_results(path, &summaries)?;
            info!("wrote results to {}", path.display());
        }
        return Ok(());
    }

    let mut session = match cfg.seed {
        Some(seed) => {
            info!("using seed {seed}");
            GameSession::seeded(seed)
        }
        None => GameSession::from_entropy(),
    };
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    interactive::run(&mut session, stdin.lock(), &mut stdout)
}
