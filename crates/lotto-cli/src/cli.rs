//! Command-line interface definitions.

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// lotto-cover - guaranteed grid coverage for a pool of numbers.
#[derive(Parser, Debug)]
#[command(name = "lotto-cover")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute a grid set with one strategy
    Optimize(OptimizeArgs),

    /// Run several strategies and rank them
    Compare(CompareArgs),

    /// Estimate the work without running anything
    Estimate(PoolArgs),

    /// List registered strategies
    Strategies,
}

/// Pool and constraint arguments shared by every command.
#[derive(Args, Debug)]
pub struct PoolArgs {
    /// Main numbers (5 to 20 values in 1..=49)
    #[arg(short, long, value_delimiter = ',', required = true)]
    pub main: Vec<u8>,

    /// Complementary numbers (up to 5 values in 1..=10)
    #[arg(short = 'x', long, value_delimiter = ',')]
    pub complementary: Vec<u8>,

    /// Matches to guarantee (3, 4 or 5)
    #[arg(short, long, default_value_t = 3)]
    pub rank: u8,

    /// Maximum total cost
    #[arg(long)]
    pub max_budget: Option<Decimal>,

    /// Maximum number of grids
    #[arg(long)]
    pub max_grids: Option<usize>,

    /// Assign complementary numbers to grids
    #[arg(long)]
    pub include_complementary: bool,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Stop after this many milliseconds and return the partial result
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Seed for randomized strategies
    #[arg(long)]
    pub seed: Option<u64>,

    /// Score candidates on a single thread
    #[arg(long)]
    pub sequential: bool,
}

#[derive(Args, Debug)]
pub struct OptimizeArgs {
    #[command(flatten)]
    pub pool: PoolArgs,

    #[command(flatten)]
    pub run: RunArgs,

    /// Strategy name
    #[arg(short, long, default_value = lotto_core::GREEDY)]
    pub strategy: String,

    /// Maximum failed cases to print
    #[arg(long, default_value_t = 10)]
    pub show_failures: usize,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    #[command(flatten)]
    pub pool: PoolArgs,

    #[command(flatten)]
    pub run: RunArgs,

    /// Strategies to compare (defaults to every registered strategy)
    #[arg(short, long, value_delimiter = ',')]
    pub strategies: Vec<String>,
}
