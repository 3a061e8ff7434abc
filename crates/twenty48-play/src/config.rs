use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// How autoplay picks among the legal moves of a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Deserialize, clap::ValueEnum)]
pub enum PolicyKind {
    /// First legal move in the order Up, Left, Right, Down
    Priority,
    /// Uniform among legal moves, drawn from the game's own RNG
    Random,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Config {
    /// Base seed; autoplay game `i` uses `seed + i`. Random when omitted.
    #[serde(default)]
    pub seed: Option<u64>,

    /// env_logger filter used when RUST_LOG is unset.
    #[serde(default = "defaults::log")]
    pub log: String,

    #[serde(default)]
    pub autoplay: AutoPlay,
    #[serde(default)]
    pub report: Report,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct AutoPlay {
    #[serde(default = "defaults::games")]
    pub games: u32,
    #[serde(default = "defaults::max_moves")]
    pub max_moves: u64,
    #[serde(default = "defaults::policy")]
    pub policy: PolicyKind,
    /// Size of the rayon pool; the global pool is used when omitted.
    #[serde(default)]
    pub workers: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize, Default)]
pub struct Report {
    /// JSON-lines file receiving one summary per finished game.
    #[serde(default)]
    pub results_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            log: defaults::log(),
            autoplay: AutoPlay::default(),
            report: Report::default(),
        }
    }
}

impl Default for AutoPlay {
    fn default() -> Self {
        Self {
            games: defaults::games(),
            max_moves: defaults::max_moves(),
            policy: defaults::policy(),
            workers: None,
        }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: Self = toml::from_str(&contents)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(cfg)
    }
}

mod defaults {
    use super::PolicyKind;

    pub fn log() -> String {
        "info".to_string()
    }
    pub fn games() -> u32 {
        1
    }
    pub fn max_moves() -> u64 {
        100_000
    }
    pub fn policy() -> PolicyKind {
        PolicyKind::Random
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.autoplay.games, 1);
        assert_eq!(cfg.autoplay.policy, PolicyKind::Random);
    }

    #[test]
    fn nested_sections_parse() {
        let cfg: Config = toml::from_str(
            r#"
            seed = 42
            log = "debug"

            [autoplay]
            games = 8
            policy = "Priority"
            workers = 2

            [report]
            results_file = "runs.jsonl"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.log, "debug");
        assert_eq!(cfg.autoplay.games, 8);
        assert_eq!(cfg.autoplay.max_moves, 100_000);
        assert_eq!(cfg.autoplay.policy, PolicyKind::Priority);
        assert_eq!(cfg.autoplay.workers, Some(2));
        assert_eq!(cfg.report.results_file, Some(PathBuf::from("runs.jsonl")));
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let res: Result<Config, _> = toml::from_str("[autoplay]\npolicy = \"Greedy\"\n");
        assert!(res.is_err());
    }
}
