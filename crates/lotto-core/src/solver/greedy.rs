//! Greedy set cover.
//!
//! Every 5-number draw from the pool is a universe element and every
//! 5-number grid is a candidate set. Each round picks the candidate covering
//! the most uncovered draws, which keeps the grid count within a factor of
//! `ln(|universe|)` of the optimum.
//!
//! Gains are kept in a table instead of being rescored every round: the
//! initial pass scores each candidate against the whole universe, and after a
//! selection only the newly covered draws are subtracted. Scoring reads a
//! snapshot and may run on the rayon pool; the table is written by a single
//! step between rounds.

use rayon::prelude::*;
use tracing::{debug, warn};

use super::coverage::{CoverageState, GridSelection};
use super::{AlgorithmRun, CoverAlgorithm};
use crate::combinatorics::{draw_masks, overlap};
use crate::error::Result;
use crate::monitor::PerformanceMonitor;
use crate::types::{AlgorithmConfig, CandidatePool, Constraints, Termination};
use crate::validate::{validate_config, validate_constraints, validate_pool};

pub const NAME: &str = "greedy";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Init,
    GeneratingUniverse,
    GeneratingCandidates,
    SelectingLoop,
    Done(Termination),
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Init => write!(f, "init"),
            Phase::GeneratingUniverse => write!(f, "generating universe"),
            Phase::GeneratingCandidates => write!(f, "generating candidates"),
            Phase::SelectingLoop => write!(f, "selecting"),
            Phase::Done(reason) => write!(f, "done ({reason})"),
        }
    }
}

fn enter(from: &mut Phase, to: Phase) {
    debug!(from = %from, to = %to, "greedy phase");
    *from = to;
}

/// Greedy cover with lowest-index tie-break.
///
/// When several candidates cover the same number of uncovered draws, the one
/// enumerated first (lexicographically smallest grid) wins. The choice is
/// arbitrary but deterministic.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyCover;

impl CoverAlgorithm for GreedyCover {
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
        let mut phase = Phase::Init;
        let main = pool.sorted_main();

        enter(&mut phase, Phase::GeneratingUniverse);
        let mut coverage = CoverageState::new(draw_masks(&main), rank);

        enter(&mut phase, Phase::GeneratingCandidates);
        let candidates = draw_masks(&main);
        let mut selection = GridSelection::new(pool, constraints, config);

        enter(&mut phase, Phase::SelectingLoop);
        let mut rounds = 0;
        let termination = match initial_gains(&candidates, &coverage, config, monitor) {
            None => Termination::TimedOut,
            Some(mut gains) => loop {
                if coverage.is_complete() {
                    break Termination::Covered;
                }
                if monitor.is_timed_out() {
                    break Termination::TimedOut;
                }
                if let Some(cap) = selection.blocked() {
                    break cap;
                }
                let (best, gain) = best_candidate(&gains);
                if gain == 0 {
                    break Termination::Stalled;
                }

                let newly = coverage.mark(candidates[best]);
                selection.push(candidates[best]);
                rounds += 1;
                debug!(
                    round = rounds,
                    candidate = best,
                    gain,
                    covered = coverage.covered_count(),
                    total = coverage.total(),
                    spent = %selection.spent(),
                    "selected grid"
                );
                let rank = coverage.rank();
                subtract_gains(&mut gains, &candidates, &newly, rank, config.parallel);
            },
        };
        enter(&mut phase, Phase::Done(termination));

        match termination {
            Termination::Covered => {}
            Termination::Stalled => warn!(
                uncovered = coverage.total() - coverage.covered_count(),
                "greedy stalled, no candidate improves coverage"
            ),
            other => warn!(
                reason = %other,
                grids = selection.len(),
                covered = coverage.covered_count(),
                total = coverage.total(),
                "greedy stopped before full coverage"
            ),
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

/// Score every candidate against the uncovered draws. Returns `None` when
/// the timeout fires between chunks.
fn initial_gains(
    candidates: &[u64],
    coverage: &CoverageState,
    config: &AlgorithmConfig,
    monitor: &PerformanceMonitor,
) -> Option<Vec<u32>> {
    let draws = coverage.uncovered_draws();
    let rank = coverage.rank();
    let mut gains = Vec::with_capacity(candidates.len());
    for chunk in candidates.chunks(config.chunk_size.max(1)) {
        if monitor.is_timed_out() {
            return None;
        }
        gains.extend(score(chunk, &draws, rank, config.parallel));
    }
    Some(gains)
}

fn score(candidates: &[u64], draws: &[u64], rank: u32, parallel: bool) -> Vec<u32> {
    let count = |candidate: u64| -> u32 {
        draws
            .iter()
            .filter(|&&draw| overlap(candidate, draw) >= rank)
            .count() as u32
    };
    if parallel {
        candidates.par_iter().map(|&c| count(c)).collect()
    } else {
        candidates.iter().map(|&c| count(c)).collect()
    }
}

fn subtract_gains(
    gains: &mut [u32],
    candidates: &[u64],
    newly: &[u64],
    rank: u32,
    parallel: bool,
) {
    let lost = score(candidates, newly, rank, parallel);
    for (gain, lost) in gains.iter_mut().zip(lost) {
        *gain -= lost;
    }
}

/// Highest gain, first index on ties.
fn best_candidate(gains: &[u32]) -> (usize, u32) {
    gains
        .iter()
        .enumerate()
        .fold((0, 0), |best, (i, &g)| if g > best.1 { (i, g) } else { best })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinatorics::binomial;
    use crate::types::TargetRank;

    fn run(main: Vec<u8>, constraints: Constraints) -> AlgorithmRun {
        GreedyCover
            .run(
                &CandidatePool::main_only(main),
                &constraints,
                &AlgorithmConfig::default(),
                &PerformanceMonitor::unbounded(),
            )
            .unwrap()
    }

    #[test]
    fn test_five_numbers_single_grid() {
        for &rank in TargetRank::all() {
            let result = run(vec![9, 3, 41, 17, 22], Constraints::new(rank.matches()));
            assert_eq!(result.grids.len(), 1);
            assert_eq!(result.grids[0].numbers, vec![3, 9, 17, 22, 41]);
            assert_eq!(result.termination, Termination::Covered);
        }
    }

    #[test]
    fn test_tie_break_picks_first_grid() {
        // Every grid covers all 21 draws at rank 3 on seven numbers.
        let result = run((1..=7).collect(), Constraints::new(3));
        assert_eq!(result.grids.len(), 1);
        assert_eq!(result.grids[0].numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_rank_five_needs_every_draw() {
        let result = run((1..=7).collect(), Constraints::new(5));
        assert_eq!(result.grids.len() as u64, binomial(7, 5));
        assert_eq!(result.covered_draws, result.total_draws);
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let pool = CandidatePool::main_only((1..=11).collect());
        let constraints = Constraints::new(4);
        let monitor = PerformanceMonitor::unbounded();
        let parallel = GreedyCover
            .run(&pool, &constraints, &AlgorithmConfig::default(), &monitor)
            .unwrap();
        let sequential = GreedyCover
            .run(&pool, &constraints, &AlgorithmConfig::default().sequential(), &monitor)
            .unwrap();
        assert_eq!(parallel.grids, sequential.grids);
    }

    #[test]
    fn test_grid_cap_stops_early() {
        let result = run((1..=10).collect(), Constraints::new(4).with_max_grid_count(3));
        assert_eq!(result.grids.len(), 3);
        assert_eq!(result.termination, Termination::GridCountReached);
        assert!(result.covered_draws < result.total_draws);
    }

    #[test]
    fn test_expired_timeout_returns_partial() {
        let result = GreedyCover
            .run(
                &CandidatePool::main_only((1..=12).collect()),
                &Constraints::new(3),
                &AlgorithmConfig::default(),
                &PerformanceMonitor::start(Some(0)),
            )
            .unwrap();
        assert_eq!(result.termination, Termination::TimedOut);
        assert!(result.grids.is_empty());
        assert_eq!(result.covered_draws, 0);
    }

    #[test]
    fn test_best_candidate() {
        assert_eq!(best_candidate(&[1, 4, 2, 4]), (1, 4));
        assert_eq!(best_candidate(&[0, 0]), (0, 0));
        assert_eq!(best_candidate(&[]), (0, 0));
    }

    #[test]
    fn test_invalid_input_rejected() {
        let err = GreedyCover.run(
            &CandidatePool::main_only(vec![1, 2, 3]),
            &Constraints::new(3),
            &AlgorithmConfig::default(),
            &PerformanceMonitor::unbounded(),
        );
        assert!(err.is_err());
    }
}
