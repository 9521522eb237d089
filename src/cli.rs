use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Live efficiency dashboard for the restaurant floor
#[derive(Parser, Debug)]
#[command(name = "floorwatch")]
#[command(version)]
pub struct Cli {
    /// TOML file overriding the scoring and alert policy
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// Where server metrics come from
    #[arg(long, value_enum, default_value_t = FeedKind::Fixture)]
    pub feed: FeedKind,

    /// Seed for the random feed
    #[arg(long, default_value_t = 7)]
    pub seed: u64,

    /// Refresh interval in milliseconds
    #[arg(long, default_value_t = 2000)]
    pub interval_ms: u64,

    /// Service minutes the random feed advances per refresh
    #[arg(long, default_value_t = 1)]
    pub step_minutes: u32,

    /// Readings kept per server for the score history
    #[arg(long, default_value_t = 16)]
    pub history: usize,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Print one report and exit instead of starting the dashboard
    #[arg(long)]
    pub once: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FeedKind {
    Fixture,
    Random,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["floorwatch"]);
        assert_eq!(FeedKind::Fixture, cli.feed);
        assert_eq!(7, cli.seed);
        assert_eq!(2000, cli.interval_ms);
        assert_eq!(16, cli.history);
        assert!(cli.policy.is_none());
        assert!(!cli.once);
    }

    #[test]
    fn test_random_feed_flags() {
        let cli = Cli::parse_from([
            "floorwatch",
            "--feed",
            "random",
            "--seed",
            "42",
            "--step-minutes",
            "5",
            "--once",
        ]);
        assert_eq!(FeedKind::Random, cli.feed);
        assert_eq!(42, cli.seed);
        assert_eq!(5, cli.step_minutes);
        assert!(cli.once);
    }
}
