//! Optimizer orchestrator.
//!
//! Validates input, estimates the work, runs the requested strategy, hands
//! its grids to the exhaustive validator and packages the result. Strategies
//! come from a [`StrategyRegistry`] built once and owned by the [`Optimizer`].

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::combinatorics::{binomial, estimate_minimum_grids, total_cost};
use crate::error::{OptimizerError, Result};
use crate::monitor::{estimate_memory_bytes, resident_memory_bytes, PerformanceMonitor};
use crate::solver::{CoverAlgorithm, FullWheel, GreedyCover, RandomCover};
use crate::types::{
    AlgorithmConfig, CandidatePool, ComplexityEstimate, ComplexityTier, Constraints,
    GuaranteeProof, MathematicalProof, Metadata, OptimizationResult, TargetRank,
    ValidationResult, GRID_SIZE,
};
use crate::validate::{validate_config, validate_constraints, validate_pool};
use crate::verify::validate_guarantee;

/// Coverage differences at or below this many percentage points rank as
/// equal, leaving cost to decide.
pub const COVERAGE_EPSILON: f64 = 0.1;

/// Pairwise grid/draw checks per millisecond assumed by the time estimate.
const CHECKS_PER_MS: u64 = 200_000;

const REFERENCES: &[&str] = &[
    "Chvátal, V. (1979). A greedy heuristic for the set-covering problem. Mathematics of Operations Research 4(3), 233-235",
    "Schönheim, J. (1964). On coverings. Pacific Journal of Mathematics 14(4), 1405-1411",
];

/// Registry of available strategies, looked up by name.
///
/// Use [`StrategyRegistry::with_defaults`] or [`StrategyRegistry::builder`].
#[derive(Default)]
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn CoverAlgorithm>>,
}

impl StrategyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Greedy, full wheel and random cover.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::builder().greedy().wheel().random().build()
    }

    #[must_use]
    pub fn builder() -> StrategyRegistryBuilder {
        StrategyRegistryBuilder::default()
    }

    /// Register a strategy, replacing any strategy with the same name.
    pub fn register(&mut self, strategy: Box<dyn CoverAlgorithm>) {
        self.strategies.retain(|s| s.name() != strategy.name());
        self.strategies.push(strategy);
    }

    pub fn get(&self, name: &str) -> Result<&dyn CoverAlgorithm> {
        self.strategies
            .iter()
            .find(|s| s.name() == name)
            .map(|s| &**s)
            .ok_or_else(|| OptimizerError::UnknownStrategy(name.to_string()))
    }

    /// Strategy names in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

/// Builder for a [`StrategyRegistry`].
///
/// ```
/// use lotto_core::StrategyRegistry;
///
/// let registry = StrategyRegistry::builder().greedy().wheel().build();
/// assert_eq!(registry.names(), vec!["greedy", "wheel"]);
/// ```
#[derive(Default)]
pub struct StrategyRegistryBuilder {
    registry: StrategyRegistry,
}

impl StrategyRegistryBuilder {
    #[must_use]
    pub fn greedy(self) -> Self {
        self.strategy(Box::new(GreedyCover))
    }

    #[must_use]
    pub fn wheel(self) -> Self {
        self.strategy(Box::new(FullWheel))
    }

    #[must_use]
    pub fn random(self) -> Self {
        self.strategy(Box::new(RandomCover))
    }

    #[must_use]
    pub fn strategy(mut self, strategy: Box<dyn CoverAlgorithm>) -> Self {
        self.registry.register(strategy);
        self
    }

    #[must_use]
    pub fn build(self) -> StrategyRegistry {
        self.registry
    }
}

/// One entry of a strategy comparison, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyComparison {
    /// 1-based position in the ranking
    pub rank: usize,
    pub strategy: String,
    pub result: OptimizationResult,
}

/// Estimate the work an optimization over `pool` will do.
pub fn estimate_complexity(
    pool: &CandidatePool,
    constraints: &Constraints,
) -> Result<ComplexityEstimate> {
    let rank = constraints.rank()?;
    let n = pool.main.len() as u64;
    let draws = binomial(n, GRID_SIZE as u64);
    let candidates = draws;
    let pairwise = draws.saturating_mul(candidates);
    let tier = match pairwise {
        0..=10_000 => ComplexityTier::Trivial,
        10_001..=1_000_000 => ComplexityTier::Low,
        1_000_001..=10_000_000 => ComplexityTier::Moderate,
        10_000_001..=100_000_000 => ComplexityTier::High,
        _ => ComplexityTier::Extreme,
    };
    Ok(ComplexityEstimate {
        draw_count: draws,
        candidate_count: candidates,
        pairwise_checks: pairwise,
        tier,
        // Initial scoring pass plus the incremental updates, which sum to
        // about one more pass.
        estimated_time_ms: pairwise.saturating_mul(2).div_ceil(CHECKS_PER_MS),
        estimated_memory_bytes: estimate_memory_bytes(draws, candidates),
        minimum_grids: estimate_minimum_grids(n, rank),
    })
}

/// Runs strategies and certifies their output.
pub struct Optimizer {
    registry: StrategyRegistry,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::new(StrategyRegistry::with_defaults())
    }
}

impl Optimizer {
    pub fn new(registry: StrategyRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Run `strategy` and return its grids with an exhaustive proof.
    ///
    /// An incomplete run (timeout, caps, stall) is not an error: the result
    /// carries `coverage_percent < 100` and the failing cases.
    pub fn optimize(
        &self,
        pool: &CandidatePool,
        constraints: &Constraints,
        strategy: &str,
        config: &AlgorithmConfig,
    ) -> Result<OptimizationResult> {
        validate_pool(pool)?;
        let rank = validate_constraints(constraints)?;
        validate_config(config)?;
        let algorithm = self.registry.get(strategy)?;

        let estimate = estimate_complexity(pool, constraints)?;
        info!(
            strategy,
            pool_size = pool.main.len(),
            rank = rank.matches(),
            draws = estimate.draw_count,
            pairwise_checks = estimate.pairwise_checks,
            tier = %estimate.tier,
            estimated_time_ms = estimate.estimated_time_ms,
            "starting optimization"
        );
        if let Some(limit_mb) = config.max_memory_mb {
            let limit = limit_mb.saturating_mul(1024 * 1024);
            if estimate.estimated_memory_bytes > limit {
                warn!(
                    estimated = estimate.estimated_memory_bytes,
                    limit, "estimated memory above configured limit"
                );
            }
        }

        let resident_before = resident_memory_bytes();
        let monitor = PerformanceMonitor::start(config.timeout_ms);
        let run = algorithm.run(pool, constraints, config, &monitor)?;
        let computation_time_ms = monitor.elapsed_ms();
        let peak_memory_bytes = resident_before.max(resident_memory_bytes());

        let total = total_cost(&run.grids);
        if let Some(max) = constraints.max_budget {
            if total > max {
                return Err(OptimizerError::BudgetExceeded { total, max });
            }
        }
        if let Some(max) = constraints.max_grid_count {
            if run.grids.len() > max {
                return Err(OptimizerError::GridCountExceeded {
                    count: run.grids.len(),
                    max,
                });
            }
        }

        let validation = validate_guarantee(&run.grids, pool, rank)?;
        if validation.covered_draws != run.covered_draws {
            warn!(
                strategy,
                reported = run.covered_draws,
                verified = validation.covered_draws,
                "strategy coverage disagrees with validator"
            );
        }

        let proof = build_proof(
            pool.main.len() as u64,
            rank,
            run.grids.len(),
            &estimate,
            validation,
        );
        if proof.is_guaranteed() && (run.grids.len() as u64) < estimate.minimum_grids {
            warn!(
                grids = run.grids.len(),
                lower_bound = estimate.minimum_grids,
                "full coverage below theoretical lower bound"
            );
        }
        info!(
            strategy,
            grids = run.grids.len(),
            total_cost = %total,
            coverage = proof.coverage_percent,
            termination = %run.termination,
            computation_time_ms,
            "optimization finished"
        );

        Ok(OptimizationResult {
            total_cost: total,
            metadata: Metadata {
                algorithm: algorithm.name().to_string(),
                version: algorithm.version().to_string(),
                computation_time_ms,
                complexity: algorithm.complexity().to_string(),
                estimate,
                peak_memory_bytes,
                termination: run.termination,
                timestamp: Utc::now(),
            },
            grids: run.grids,
            proof,
        })
    }

    /// Run each strategy and rank the results: higher coverage first, then
    /// lower cost among results within [`COVERAGE_EPSILON`] of each other.
    pub fn compare_strategies(
        &self,
        pool: &CandidatePool,
        constraints: &Constraints,
        strategies: &[&str],
        config: &AlgorithmConfig,
    ) -> Result<Vec<StrategyComparison>> {
        let mut results = Vec::with_capacity(strategies.len());
        for &name in strategies {
            let result = self.optimize(pool, constraints, name, config)?;
            results.push((name.to_string(), result));
        }
        Ok(rank_results(results))
    }
}

fn build_proof(
    pool_size: u64,
    rank: TargetRank,
    grid_count: usize,
    estimate: &ComplexityEstimate,
    validation: ValidationResult,
) -> GuaranteeProof {
    let total = estimate.draw_count;
    let covered = validation.covered_draws;
    let coverage_percent = if total == 0 {
        0.0
    } else {
        covered as f64 / total as f64 * 100.0
    };
    let r = rank.matches();
    let formula = format!(
        "C({pool_size},5) = {total} draws; {covered} covered with >= {r} matches by {grid_count} grids; \
         lower bound ceil(C({pool_size},5) / sum(j>={r}) C(5,j)*C({pool_size}-5,5-j)) = {}",
        estimate.minimum_grids
    );
    GuaranteeProof {
        guaranteed_rank: r,
        coverage_percent,
        mathematical_proof: MathematicalProof {
            total_combinations: total,
            covered_combinations: covered,
            uncovered_combinations: total - covered,
            formula,
            references: REFERENCES.iter().map(|r| r.to_string()).collect(),
        },
        validation,
    }
}

/// Sort by coverage (descending), then within runs of results whose
/// coverage stays within epsilon of the run's leader, by cost (ascending).
fn rank_results(mut results: Vec<(String, OptimizationResult)>) -> Vec<StrategyComparison> {
    results.sort_by(|a, b| b.1.coverage_percent().total_cmp(&a.1.coverage_percent()));

    let mut ranked = Vec::with_capacity(results.len());
    let mut group: Vec<(String, OptimizationResult)> = Vec::new();
    let mut flush = |group: &mut Vec<(String, OptimizationResult)>| {
        group.sort_by(|a, b| a.1.total_cost.cmp(&b.1.total_cost));
        ranked.append(group);
    };
    for entry in results {
        let joins = group.first().is_some_and(|leader| {
            leader.1.coverage_percent() - entry.1.coverage_percent() <= COVERAGE_EPSILON
        });
        if !joins {
            flush(&mut group);
        }
        group.push(entry);
    }
    flush(&mut group);

    ranked
        .into_iter()
        .enumerate()
        .map(|(i, (strategy, result))| StrategyComparison {
            rank: i + 1,
            strategy,
            result,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::{GREEDY, WHEEL};
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::Arc;

    #[test]
    fn test_registry_lookup() {
        let registry = StrategyRegistry::with_defaults();
        assert_eq!(registry.names(), vec!["greedy", "wheel", "random"]);
        assert!(registry.get(GREEDY).is_ok());
        assert!(matches!(
            registry.get("genetic"),
            Err(OptimizerError::UnknownStrategy(name)) if name == "genetic"
        ));
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut registry = StrategyRegistry::builder().greedy().build();
        registry.register(Box::new(GreedyCover));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unknown_strategy_rejected_by_optimizer() {
        let optimizer = Optimizer::new(StrategyRegistry::builder().wheel().build());
        let err = optimizer
            .optimize(
                &CandidatePool::main_only(vec![1, 2, 3, 4, 5]),
                &Constraints::new(3),
                GREEDY,
                &AlgorithmConfig::default(),
            )
            .unwrap_err();
        assert_eq!(err, OptimizerError::UnknownStrategy("greedy".into()));
    }

    #[test]
    fn test_input_errors_precede_lookup() {
        let optimizer = Optimizer::default();
        let err = optimizer
            .optimize(
                &CandidatePool::main_only(vec![1, 2, 3, 4]),
                &Constraints::new(3),
                "nope",
                &AlgorithmConfig::default(),
            )
            .unwrap_err();
        assert!(matches!(err, OptimizerError::InvalidPool(_)));
    }

    #[test]
    fn test_complexity_tiers() {
        let rank = Constraints::new(3);
        let small =
            estimate_complexity(&CandidatePool::main_only(vec![1, 2, 3, 4, 5]), &rank).unwrap();
        assert_eq!(small.draw_count, 1);
        assert_eq!(small.tier, ComplexityTier::Trivial);
        assert_eq!(small.minimum_grids, 1);

        let large =
            estimate_complexity(&CandidatePool::main_only((1..=20).collect()), &rank).unwrap();
        assert_eq!(large.draw_count, 15_504);
        assert_eq!(large.pairwise_checks, 15_504 * 15_504);
        assert_eq!(large.tier, ComplexityTier::Extreme);
    }

    /// Ignores the caps it is given, to exercise the post-hoc checks.
    struct Overspender;

    impl CoverAlgorithm for Overspender {
        fn name(&self) -> &'static str {
            "overspender"
        }
        fn version(&self) -> &'static str {
            "0.0.0"
        }
        fn complexity(&self) -> &'static str {
            "O(1)"
        }
        fn run(
            &self,
            pool: &CandidatePool,
            _constraints: &Constraints,
            config: &AlgorithmConfig,
            monitor: &PerformanceMonitor,
        ) -> Result<crate::solver::AlgorithmRun> {
            FullWheel.run(pool, &Constraints::new(5), config, monitor)
        }
    }

    #[test]
    fn test_post_hoc_caps() {
        let optimizer =
            Optimizer::new(StrategyRegistry::builder().strategy(Box::new(Overspender)).build());
        let pool = CandidatePool::main_only((1..=7).collect());
        let config = AlgorithmConfig::default();

        let err = optimizer
            .optimize(&pool, &Constraints::new(3).with_max_grid_count(2), "overspender", &config)
            .unwrap_err();
        assert_eq!(err, OptimizerError::GridCountExceeded { count: 21, max: 2 });

        let err = optimizer
            .optimize(
                &pool,
                &Constraints::new(3).with_max_budget(Decimal::TEN),
                "overspender",
                &config,
            )
            .unwrap_err();
        assert!(matches!(err, OptimizerError::BudgetExceeded { .. }));
    }

    /// Greedy cover that counts its invocations.
    struct Counting(Arc<AtomicUsize>);

    impl CoverAlgorithm for Counting {
        fn name(&self) -> &'static str {
            "counting"
        }
        fn version(&self) -> &'static str {
            "0.0.0"
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
        ) -> Result<crate::solver::AlgorithmRun> {
            self.0.fetch_add(1, AtomicOrdering::SeqCst);
            GreedyCover.run(pool, constraints, config, monitor)
        }
    }

    #[test]
    fn test_bad_unit_price_rejected_before_running() {
        let calls = Arc::new(AtomicUsize::new(0));
        let optimizer = Optimizer::new(
            StrategyRegistry::builder()
                .strategy(Box::new(Counting(Arc::clone(&calls))))
                .build(),
        );
        let pool = CandidatePool::main_only((1..=10).collect());
        let constraints = Constraints::new(5).with_max_budget(Decimal::new(5, 0));

        for price in [Decimal::ZERO, Decimal::NEGATIVE_ONE] {
            let config = AlgorithmConfig {
                unit_price: price,
                ..AlgorithmConfig::default()
            };
            let err = optimizer
                .optimize(&pool, &constraints, "counting", &config)
                .unwrap_err();
            assert!(matches!(err, OptimizerError::InvalidConstraints(_)));
        }
        assert_eq!(calls.load(AtomicOrdering::SeqCst), 0);

        optimizer
            .optimize(&pool, &constraints, "counting", &AlgorithmConfig::default())
            .unwrap();
        assert_eq!(calls.load(AtomicOrdering::SeqCst), 1);
    }

    /// Full wheel that under-reports its own coverage.
    struct Misreporter;

    impl CoverAlgorithm for Misreporter {
        fn name(&self) -> &'static str {
            "misreporter"
        }
        fn version(&self) -> &'static str {
            "0.0.0"
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
        ) -> Result<crate::solver::AlgorithmRun> {
            let mut run = FullWheel.run(pool, constraints, config, monitor)?;
            run.covered_draws = 0;
            Ok(run)
        }
    }

    #[test]
    fn test_validator_count_wins_over_strategy_report() {
        let optimizer =
            Optimizer::new(StrategyRegistry::builder().strategy(Box::new(Misreporter)).build());
        let result = optimizer
            .optimize(
                &CandidatePool::main_only((1..=7).collect()),
                &Constraints::new(5),
                "misreporter",
                &AlgorithmConfig::default(),
            )
            .unwrap();
        assert_eq!(result.proof.mathematical_proof.covered_combinations, 21);
        assert_eq!(result.coverage_percent(), 100.0);
        assert!(result.is_guaranteed());
    }

    #[test]
    fn test_compare_ranks_cheaper_first_at_equal_coverage() {
        let optimizer = Optimizer::default();
        let ranking = optimizer
            .compare_strategies(
                &CandidatePool::main_only((1..=8).collect()),
                &Constraints::new(3),
                &[WHEEL, GREEDY],
                &AlgorithmConfig::default(),
            )
            .unwrap();
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].rank, 1);
        assert_eq!(ranking[0].strategy, GREEDY);
        assert_eq!(ranking[1].strategy, WHEEL);
        assert!(ranking[0].result.total_cost < ranking[1].result.total_cost);
    }

    #[test]
    fn test_compare_prefers_coverage_over_cost() {
        let optimizer = Optimizer::default();
        // The capped wheel is cheaper but covers 2 of 21 draws.
        let capped = optimizer
            .optimize(
                &CandidatePool::main_only((1..=7).collect()),
                &Constraints::new(5).with_max_grid_count(2),
                WHEEL,
                &AlgorithmConfig::default(),
            )
            .unwrap();
        let full = optimizer
            .optimize(
                &CandidatePool::main_only((1..=7).collect()),
                &Constraints::new(5),
                WHEEL,
                &AlgorithmConfig::default(),
            )
            .unwrap();
        let ranking = rank_results(vec![("capped".into(), capped), ("full".into(), full)]);
        assert_eq!(ranking[0].strategy, "full");
        assert_eq!(ranking[1].strategy, "capped");
    }
}
