//! Full wheel: play every 5-number combination of the pool.
//!
//! Guarantees rank 5 by construction and serves as the baseline the other
//! strategies are compared against.

use tracing::warn;

use super::coverage::{CoverageState, GridSelection};
use super::{AlgorithmRun, CoverAlgorithm};
use crate::combinatorics::draw_masks;
use crate::error::Result;
use crate::monitor::PerformanceMonitor;
use crate::types::{AlgorithmConfig, CandidatePool, Constraints, Termination};
use crate::validate::{validate_config, validate_constraints, validate_pool};

pub const NAME: &str = "wheel";

#[derive(Debug, Default, Clone, Copy)]
pub struct FullWheel;

impl CoverAlgorithm for FullWheel {
    fn name(&self) -> &'static str {
        NAME
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn complexity(&self) -> &'static str {
        "O(C(n,5))"
    }

    fn run(
        &self,
        pool: &CandidatePool,
        constraints: &Constraints,
        config: &AlgorithmConfig,
        monitor: &PerformanceMonitor,
    ) -> Result<AlgorithmRun> {
        validate_pool(pool)?;
        let rank = validate_constraints(constraints)?;
        validate_config(config)?;
        let candidates = draw_masks(&pool.sorted_main());
        let mut coverage = CoverageState::new(candidates.clone(), rank);
        let mut selection = GridSelection::new(pool, constraints, config);

        let mut termination = Termination::Covered;
        for &candidate in &candidates {
            if monitor.is_timed_out() {
                termination = Termination::TimedOut;
                break;
            }
            if let Some(cap) = selection.blocked() {
                termination = cap;
                break;
            }
            coverage.mark(candidate);
            selection.push(candidate);
        }
        if !coverage.is_complete() {
            warn!(reason = %termination, grids = selection.len(), "wheel truncated");
        }

        Ok(AlgorithmRun {
            covered_draws: coverage.covered_count() as u64,
            total_draws: coverage.total() as u64,
            rounds: selection.len(),
            grids: selection.into_grids(),
            termination,
        })
    }
}
