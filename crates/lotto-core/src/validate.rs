//! Structural checks on caller input and produced grids.
//!
//! Pure functions; each failure names the offending value.

use rust_decimal::Decimal;

use crate::error::{OptimizerError, Result};
use crate::types::{
    AlgorithmConfig, CandidatePool, Constraints, Grid, TargetRank, COMPLEMENTARY_MAX,
    COMPLEMENTARY_MIN, COMPLEMENTARY_POOL_MAX, GRID_SIZE, MAIN_MAX, MAIN_MIN, POOL_MAX, POOL_MIN,
};

pub fn validate_pool(pool: &CandidatePool) -> Result<()> {
    let invalid = |reason: String| Err(OptimizerError::InvalidPool(reason));

    if pool.main.len() < POOL_MIN {
        return invalid(format!(
            "at least {POOL_MIN} main numbers required, got {}",
            pool.main.len()
        ));
    }
    if pool.main.len() > POOL_MAX {
        return invalid(format!(
            "at most {POOL_MAX} main numbers allowed, got {}",
            pool.main.len()
        ));
    }
    if let Some(n) = out_of_range(&pool.main, MAIN_MIN, MAIN_MAX) {
        return invalid(format!("main number {n} outside {MAIN_MIN}..={MAIN_MAX}"));
    }
    if let Some(n) = first_duplicate(&pool.main) {
        return invalid(format!("duplicate main number {n}"));
    }

    if pool.complementary.len() > COMPLEMENTARY_POOL_MAX {
        return invalid(format!(
            "at most {COMPLEMENTARY_POOL_MAX} complementary numbers allowed, got {}",
            pool.complementary.len()
        ));
    }
    if let Some(n) = out_of_range(&pool.complementary, COMPLEMENTARY_MIN, COMPLEMENTARY_MAX) {
        return invalid(format!(
            "complementary number {n} outside {COMPLEMENTARY_MIN}..={COMPLEMENTARY_MAX}"
        ));
    }
    if let Some(n) = first_duplicate(&pool.complementary) {
        return invalid(format!("duplicate complementary number {n}"));
    }
    Ok(())
}

pub fn validate_constraints(constraints: &Constraints) -> Result<TargetRank> {
    let rank = constraints.rank()?;
    if let Some(budget) = constraints.max_budget {
        if budget <= Decimal::ZERO {
            return Err(OptimizerError::InvalidConstraints(format!(
                "max budget must be positive, got {budget}"
            )));
        }
    }
    if constraints.max_grid_count == Some(0) {
        return Err(OptimizerError::InvalidConstraints(
            "max grid count must be positive, got 0".into(),
        ));
    }
    Ok(rank)
}

/// Rejects a grid price that would make every grid free or negative and
/// leave the budget cap unenforceable. Reported as a constraint error since
/// price and budget are checked together.
pub fn validate_config(config: &AlgorithmConfig) -> Result<()> {
    if config.unit_price <= Decimal::ZERO {
        return Err(OptimizerError::InvalidConstraints(format!(
            "unit price must be positive, got {}",
            config.unit_price
        )));
    }
    Ok(())
}

pub fn validate_grid(grid: &Grid) -> Result<()> {
    let invalid = |reason: String| Err(OptimizerError::InvalidGrid(reason));

    if grid.numbers.len() != GRID_SIZE {
        return invalid(format!(
            "grid must hold {GRID_SIZE} main numbers, got {}",
            grid.numbers.len()
        ));
    }
    if let Some(n) = out_of_range(&grid.numbers, MAIN_MIN, MAIN_MAX) {
        return invalid(format!("main number {n} outside {MAIN_MIN}..={MAIN_MAX}"));
    }
    if let Some(n) = first_duplicate(&grid.numbers) {
        return invalid(format!("duplicate main number {n}"));
    }
    if let Some(c) = grid.complementary {
        if !(COMPLEMENTARY_MIN..=COMPLEMENTARY_MAX).contains(&c) {
            return invalid(format!(
                "complementary number {c} outside {COMPLEMENTARY_MIN}..={COMPLEMENTARY_MAX}"
            ));
        }
    }
    if grid.cost <= Decimal::ZERO {
        return invalid(format!("cost must be positive, got {}", grid.cost));
    }
    Ok(())
}

fn out_of_range(values: &[u8], min: u8, max: u8) -> Option<u8> {
    values
        .iter()
        .copied()
        .find(|v| !(min..=max).contains(v))
}

fn first_duplicate(values: &[u8]) -> Option<u8> {
    let mut seen = 0u64;
    for &v in values {
        let bit = 1u64 << (v % 64);
        if seen & bit != 0 {
            return Some(v);
        }
        seen |= bit;
    }
    None
}
