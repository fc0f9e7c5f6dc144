//! Exhaustive guarantee validator.
//!
//! Re-enumerates every 5-number draw of the pool, crossed with every
//! complementary number (or a single empty placeholder), and checks it
//! against the grid set. It knows nothing about how the grids were chosen,
//! so every strategy is measured by the same yardstick. Pool and grids are
//! checked first, so caller-built grids cannot reach the bitmask code with
//! out-of-range numbers.

use std::time::Instant;

use tracing::debug;

use crate::combinatorics::{k_combinations, overlap, to_mask};
use crate::error::Result;
use crate::types::{CandidatePool, FailedCase, Grid, TargetRank, ValidationResult, GRID_SIZE};
use crate::validate::{validate_grid, validate_pool};

pub fn validate_guarantee(
    grids: &[Grid],
    pool: &CandidatePool,
    rank: TargetRank,
) -> Result<ValidationResult> {
    validate_pool(pool)?;
    for grid in grids {
        validate_grid(grid)?;
    }

    let started = Instant::now();
    let required = rank.matches();
    let masks: Vec<u64> = grids.iter().map(Grid::mask).collect();

    let complementary: Vec<Option<u8>> = if pool.complementary.is_empty() {
        vec![None]
    } else {
        pool.sorted_complementary().into_iter().map(Some).collect()
    };

    let mut tested = 0u64;
    let mut successful = 0u64;
    let mut covered_draws = 0u64;
    let mut failed_cases = Vec::new();

    for draw in k_combinations(&pool.sorted_main(), GRID_SIZE) {
        let (best_index, matched) = best_match(&masks, to_mask(&draw));
        let hit = matched >= required;
        if hit {
            covered_draws += 1;
        }
        for &comp in &complementary {
            tested += 1;
            if hit {
                successful += 1;
            } else {
                failed_cases.push(FailedCase {
                    draw: draw.clone(),
                    complementary: comp,
                    best_grid_index: best_index,
                    matched,
                    required,
                });
            }
        }
    }

    let success_rate = if tested == 0 {
        0.0
    } else {
        successful as f64 / tested as f64 * 100.0
    };
    let execution_time_ms = started.elapsed().as_secs_f64() * 1000.0;
    debug!(
        tested,
        successful,
        failed = failed_cases.len(),
        execution_time_ms,
        "guarantee checked"
    );

    Ok(ValidationResult {
        exhaustive: true,
        tested_cases: tested,
        successful_cases: successful,
        success_rate,
        failed_cases,
        covered_draws,
        execution_time_ms,
    })
}

/// Grid with the most shared main numbers, first index on ties.
fn best_match(grids: &[u64], draw: u64) -> (Option<usize>, u8) {
    let mut best: Option<(usize, u32)> = None;
    for (i, &grid) in grids.iter().enumerate() {
        let shared = overlap(grid, draw);
        if best.map_or(true, |(_, b)| shared > b) {
            best = Some((i, shared));
            if shared as usize == GRID_SIZE {
                break;
            }
        }
    }
    match best {
        Some((i, shared)) => (Some(i), shared as u8),
        None => (None, 0),
    }
}
