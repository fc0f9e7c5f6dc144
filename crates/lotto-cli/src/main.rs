mod cli;
mod config;
mod report;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands, PoolArgs, RunArgs};
use config::Config;
use lotto_core::{estimate_complexity, AlgorithmConfig, CandidatePool, Constraints, Optimizer};
use serde::Serialize;
use tracing::debug;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    config.logging.init();
    debug!(?config, "configuration loaded");

    let optimizer = Optimizer::default();

    match cli.command {
        Commands::Optimize(args) => {
            let (pool, constraints) = pool_and_constraints(&args.pool);
            let run = run_config(&config.algorithm, &args.run);
            let result = optimizer.optimize(&pool, &constraints, &args.strategy, &run)?;
            if cli.json {
                print_json(&result)?;
            } else {
                report::print_result(&result, args.show_failures);
            }
        }
        Commands::Compare(args) => {
            let (pool, constraints) = pool_and_constraints(&args.pool);
            let run = run_config(&config.algorithm, &args.run);
            let names: Vec<&str> = if args.strategies.is_empty() {
                optimizer.registry().names()
            } else {
                args.strategies.iter().map(String::as_str).collect()
            };
            let ranking = optimizer.compare_strategies(&pool, &constraints, &names, &run)?;
            if cli.json {
                print_json(&ranking)?;
            } else {
                report::print_ranking(&ranking);
            }
        }
        Commands::Estimate(args) => {
            let (pool, constraints) = pool_and_constraints(&args);
            lotto_core::validate_pool(&pool)?;
            let estimate = estimate_complexity(&pool, &constraints)?;
            if cli.json {
                print_json(&estimate)?;
            } else {
                report::print_estimate(&estimate);
            }
        }
        Commands::Strategies => {
            for name in optimizer.registry().names() {
                println!("{}", name);
            }
        }
    }

    Ok(())
}

fn pool_and_constraints(args: &PoolArgs) -> (CandidatePool, Constraints) {
    let pool = CandidatePool::new(args.main.clone(), args.complementary.clone());
    let constraints = Constraints {
        target_rank: args.rank,
        max_budget: args.max_budget,
        max_grid_count: args.max_grids,
        include_complementary: args.include_complementary,
    };
    (pool, constraints)
}

/// File settings, overridden by command-line flags.
fn run_config(base: &AlgorithmConfig, args: &RunArgs) -> AlgorithmConfig {
    let mut config = base.clone();
    if args.timeout_ms.is_some() {
        config.timeout_ms = args.timeout_ms;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.sequential {
        config.parallel = false;
    }
    config
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
