//! Cover strategies.
//!
//! Each strategy turns a validated pool and constraints into a grid set.
//! None of them is trusted for the guarantee itself: the orchestrator hands
//! every result to the exhaustive validator in [`crate::verify`].

pub(crate) mod coverage;
mod greedy;
mod random;
mod wheel;

use crate::error::Result;
use crate::monitor::PerformanceMonitor;
use crate::types::{AlgorithmConfig, CandidatePool, Constraints, Grid, Termination};

pub use greedy::{GreedyCover, NAME as GREEDY};
pub use random::{RandomCover, NAME as RANDOM};
pub use wheel::{FullWheel, NAME as WHEEL};

/// Raw output of a strategy, before validation and packaging.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmRun {
    pub grids: Vec<Grid>,
    /// Draws the strategy believes it covered.
    pub covered_draws: u64,
    pub total_draws: u64,
    pub termination: Termination,
    /// Selection rounds (or candidates visited) before stopping.
    pub rounds: usize,
}

/// A grid-selection strategy.
///
/// Implementations must respect `max_grid_count`, `max_budget` and the
/// monitor's timeout themselves, returning a partial run instead of failing.
pub trait CoverAlgorithm: Send + Sync {
    fn name(&self) -> &'static str;

    fn version(&self) -> &'static str;

    /// Asymptotic cost, for result metadata.
    fn complexity(&self) -> &'static str;

    fn run(
        &self,
        pool: &CandidatePool,
        constraints: &Constraints,
        config: &AlgorithmConfig,
        monitor: &PerformanceMonitor,
    ) -> Result<AlgorithmRun>;
}
