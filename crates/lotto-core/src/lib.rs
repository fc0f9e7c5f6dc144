//! Grid coverage optimizer.
//!
//! Given a pool of candidate numbers, choose 5-number grids so that every
//! possible 5-number draw from the pool shares at least a target count of
//! numbers with one of them, then prove it by checking every draw.
//!
//! ```
//! use lotto_core::{AlgorithmConfig, CandidatePool, Constraints, Optimizer, GREEDY};
//!
//! let optimizer = Optimizer::default();
//! let pool = CandidatePool::main_only(vec![3, 8, 15, 21, 30, 42]);
//! let result = optimizer
//!     .optimize(&pool, &Constraints::new(4), GREEDY, &AlgorithmConfig::default())
//!     .unwrap();
//! assert!(result.is_guaranteed());
//! ```

pub mod combinatorics;
pub mod error;
pub mod monitor;
pub mod optimizer;
pub mod solver;
pub mod types;
pub mod validate;
pub mod verify;

pub use combinatorics::{binomial, estimate_minimum_grids, k_combinations, total_cost};
pub use error::{OptimizerError, Result};
pub use monitor::PerformanceMonitor;
pub use optimizer::{
    estimate_complexity, Optimizer, StrategyComparison, StrategyRegistry,
    StrategyRegistryBuilder, COVERAGE_EPSILON,
};
pub use solver::{
    AlgorithmRun, CoverAlgorithm, FullWheel, GreedyCover, RandomCover, GREEDY, RANDOM, WHEEL,
};
pub use types::{
    AlgorithmConfig, CandidatePool, ComplexityEstimate, ComplexityTier, Constraints, FailedCase,
    Grid, GridKind, GuaranteeProof, MathematicalProof, Metadata, OptimizationResult, TargetRank,
    Termination, ValidationResult, DEFAULT_UNIT_PRICE,
};
pub use validate::{validate_config, validate_constraints, validate_grid, validate_pool};
pub use verify::validate_guarantee;
