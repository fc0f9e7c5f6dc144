//! Randomized cover: visit candidate grids in shuffled order and keep each
//! one that still covers an uncovered draw.

use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use super::coverage::{CoverageState, GridSelection};
use super::{AlgorithmRun, CoverAlgorithm};
use crate::combinatorics::draw_masks;
use crate::error::Result;
use crate::monitor::PerformanceMonitor;
use crate::types::{AlgorithmConfig, CandidatePool, Constraints, Termination};
use crate::validate::{validate_config, validate_constraints, validate_pool};

pub const NAME: &str = "random";

#[derive(Debug, Default, Clone, Copy)]
pub struct RandomCover;

impl CoverAlgorithm for RandomCover {
    fn name(&self) -> &'static str {
        NAME
    }

    fn version(&self) -> &'static str {
        "1.0.0"
    }

    fn complexity(&self) -> &'static str {
        "O(C(n,5)^2)"
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

        let mut rng = config.seed.map_or_else(SplitMix::from_entropy, SplitMix::seeded);
        let mut order: Vec<usize> = (0..candidates.len()).collect();
        rng.shuffle(&mut order);

        let mut rounds = 0;
        let mut termination = Termination::Stalled;
        for idx in order {
            if coverage.is_complete() {
                termination = Termination::Covered;
                break;
            }
            if monitor.is_timed_out() {
                termination = Termination::TimedOut;
                break;
            }
            if let Some(cap) = selection.blocked() {
                termination = cap;
                break;
            }
            rounds += 1;
            if coverage.gain(candidates[idx]) == 0 {
                continue;
            }
            coverage.mark(candidates[idx]);
            selection.push(candidates[idx]);
            debug!(candidate = idx, covered = coverage.covered_count(), "kept grid");
        }
        if coverage.is_complete() {
            termination = Termination::Covered;
        } else {
            warn!(reason = %termination, grids = selection.len(), "random cover incomplete");
        }

        Ok(AlgorithmRun {
            covered_draws: coverage.covered_count() as u64,
            total_draws: coverage.total() as u64,
            grids: selection.into_grids(),
            termination,
            rounds,
        })
    }
}

/// SplitMix64 stream. Fixed seeds replay the same shuffle.
struct SplitMix {
    state: u64,
}

impl SplitMix {
    const GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

    fn seeded(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Seed from OS entropy, or from the clock if that is unavailable.
    fn from_entropy() -> Self {
        let mut bytes = [0u8; 8];
        let seed = match getrandom::getrandom(&mut bytes) {
            Ok(()) => u64::from_le_bytes(bytes),
            Err(err) => {
                debug!(%err, "entropy unavailable, seeding from clock");
                SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_nanos() as u64)
                    .unwrap_or(Self::GAMMA)
            }
        };
        Self::seeded(seed)
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(Self::GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in `0..bound` by multiply-high.
    fn below(&mut self, bound: usize) -> usize {
        ((u128::from(self.next_u64()) * bound as u128) >> 64) as usize
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            items.swap(i, self.below(i + 1));
        }
    }
}
