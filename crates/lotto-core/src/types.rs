use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::combinatorics::to_mask;
use crate::error::{OptimizerError, Result};

/// Main numbers are drawn from 1..=49.
pub const MAIN_MIN: u8 = 1;
pub const MAIN_MAX: u8 = 49;
/// Complementary numbers are drawn from 1..=10.
pub const COMPLEMENTARY_MIN: u8 = 1;
pub const COMPLEMENTARY_MAX: u8 = 10;
/// Numbers per grid and per draw.
pub const GRID_SIZE: usize = 5;
pub const POOL_MIN: usize = 5;
pub const POOL_MAX: usize = 20;
pub const COMPLEMENTARY_POOL_MAX: usize = 5;

/// Price of one simple grid (2.20).
pub const DEFAULT_UNIT_PRICE: Decimal = Decimal::from_parts(220, 0, 0, false, 2);

/// Caller-selected candidate numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatePool {
    pub main: Vec<u8>,
    #[serde(default)]
    pub complementary: Vec<u8>,
}

impl CandidatePool {
    pub fn new(main: Vec<u8>, complementary: Vec<u8>) -> Self {
        Self { main, complementary }
    }

    /// Pool with main numbers only.
    pub fn main_only(main: Vec<u8>) -> Self {
        Self::new(main, Vec::new())
    }

    /// Main numbers in ascending order. Enumeration order of draws and
    /// candidate grids is derived from this.
    pub fn sorted_main(&self) -> Vec<u8> {
        let mut main = self.main.clone();
        main.sort_unstable();
        main
    }

    pub fn sorted_complementary(&self) -> Vec<u8> {
        let mut comp = self.complementary.clone();
        comp.sort_unstable();
        comp
    }
}

/// Minimum number of matching main numbers to guarantee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TargetRank {
    Three,
    Four,
    Five,
}

impl TargetRank {
    pub fn matches(self) -> u8 {
        match self {
            TargetRank::Three => 3,
            TargetRank::Four => 4,
            TargetRank::Five => 5,
        }
    }

    pub fn all() -> &'static [TargetRank] {
        &[TargetRank::Three, TargetRank::Four, TargetRank::Five]
    }
}

impl TryFrom<u8> for TargetRank {
    type Error = OptimizerError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            3 => Ok(TargetRank::Three),
            4 => Ok(TargetRank::Four),
            5 => Ok(TargetRank::Five),
            other => Err(OptimizerError::InvalidConstraints(format!(
                "target rank must be 3, 4 or 5, got {other}"
            ))),
        }
    }
}

impl From<TargetRank> for u8 {
    fn from(rank: TargetRank) -> Self {
        rank.matches()
    }
}

impl std::fmt::Display for TargetRank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/5", self.matches())
    }
}

/// Per-call optimization constraints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraints {
    /// Kept as a raw number so malformed input can be reported by
    /// `validate_constraints` instead of failing at deserialization.
    pub target_rank: u8,
    #[serde(default)]
    pub max_budget: Option<Decimal>,
    #[serde(default)]
    pub max_grid_count: Option<usize>,
    #[serde(default)]
    pub include_complementary: bool,
}

impl Constraints {
    pub fn new(target_rank: u8) -> Self {
        Self {
            target_rank,
            max_budget: None,
            max_grid_count: None,
            include_complementary: false,
        }
    }

    pub fn with_max_budget(mut self, budget: Decimal) -> Self {
        self.max_budget = Some(budget);
        self
    }

    pub fn with_max_grid_count(mut self, count: usize) -> Self {
        self.max_grid_count = Some(count);
        self
    }

    pub fn with_complementary(mut self, include: bool) -> Self {
        self.include_complementary = include;
        self
    }

    pub fn rank(&self) -> Result<TargetRank> {
        TargetRank::try_from(self.target_rank)
    }
}

/// Pricing variant of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GridKind {
    #[default]
    Simple,
    /// More than five numbers at a higher price. Not produced by any
    /// strategy yet; coverage logic only understands simple grids.
    Multiple,
}

/// A played selection of five main numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub numbers: Vec<u8>,
    pub complementary: Option<u8>,
    pub cost: Decimal,
    pub kind: GridKind,
}

impl Grid {
    /// Create a simple grid. Numbers are stored in ascending order.
    pub fn simple(numbers: [u8; GRID_SIZE], complementary: Option<u8>, cost: Decimal) -> Self {
        let mut numbers = numbers.to_vec();
        numbers.sort_unstable();
        Self {
            numbers,
            complementary,
            cost,
            kind: GridKind::Simple,
        }
    }

    /// Bitmask of the main numbers (bit `n` set for number `n`).
    pub fn mask(&self) -> u64 {
        to_mask(&self.numbers)
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, n) in self.numbers.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{:02}", n)?;
        }
        if let Some(c) = self.complementary {
            write!(f, " + {:02}", c)?;
        }
        Ok(())
    }
}

/// A (draw, complementary) pair not covered at the target rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedCase {
    pub draw: Vec<u8>,
    pub complementary: Option<u8>,
    /// Grid with the most matching main numbers (None when no grid exists).
    pub best_grid_index: Option<usize>,
    pub matched: u8,
    pub required: u8,
}

/// Outcome of the exhaustive guarantee check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub exhaustive: bool,
    pub tested_cases: u64,
    pub successful_cases: u64,
    /// Percentage in [0, 100].
    pub success_rate: f64,
    pub failed_cases: Vec<FailedCase>,
    /// Distinct main-number draws covered, independent of complementary.
    pub covered_draws: u64,
    pub execution_time_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathematicalProof {
    pub total_combinations: u64,
    pub covered_combinations: u64,
    pub uncovered_combinations: u64,
    pub formula: String,
    pub references: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuaranteeProof {
    pub guaranteed_rank: u8,
    pub coverage_percent: f64,
    pub mathematical_proof: MathematicalProof,
    pub validation: ValidationResult,
}

impl GuaranteeProof {
    /// True only when every draw is covered and no case failed.
    pub fn is_guaranteed(&self) -> bool {
        self.coverage_percent >= 100.0 && self.validation.failed_cases.is_empty()
    }
}

/// Why a strategy stopped selecting grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Termination {
    /// Every draw is covered.
    Covered,
    /// No remaining candidate covers an uncovered draw.
    Stalled,
    TimedOut,
    BudgetReached,
    GridCountReached,
}

impl Termination {
    pub fn is_complete(self) -> bool {
        matches!(self, Termination::Covered)
    }
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::Covered => write!(f, "covered"),
            Termination::Stalled => write!(f, "stalled"),
            Termination::TimedOut => write!(f, "timed out"),
            Termination::BudgetReached => write!(f, "budget reached"),
            Termination::GridCountReached => write!(f, "grid count reached"),
        }
    }
}

/// Qualitative size of an optimization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ComplexityTier {
    Trivial,
    Low,
    Moderate,
    High,
    Extreme,
}

impl std::fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComplexityTier::Trivial => write!(f, "trivial"),
            ComplexityTier::Low => write!(f, "low"),
            ComplexityTier::Moderate => write!(f, "moderate"),
            ComplexityTier::High => write!(f, "high"),
            ComplexityTier::Extreme => write!(f, "extreme"),
        }
    }
}

/// Pre-run estimate of the work an optimization will do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityEstimate {
    pub draw_count: u64,
    pub candidate_count: u64,
    pub pairwise_checks: u64,
    pub tier: ComplexityTier,
    pub estimated_time_ms: u64,
    pub estimated_memory_bytes: u64,
    pub minimum_grids: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub algorithm: String,
    pub version: String,
    pub computation_time_ms: u64,
    /// Asymptotic description, e.g. "O(C(n,5)^2)".
    pub complexity: String,
    pub estimate: ComplexityEstimate,
    /// Highest resident size sampled before and after the run.
    pub peak_memory_bytes: Option<u64>,
    pub termination: Termination,
    pub timestamp: DateTime<Utc>,
}

/// Everything one optimization call produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub grids: Vec<Grid>,
    pub total_cost: Decimal,
    pub proof: GuaranteeProof,
    pub metadata: Metadata,
}

impl OptimizationResult {
    pub fn coverage_percent(&self) -> f64 {
        self.proof.coverage_percent
    }

    pub fn is_guaranteed(&self) -> bool {
        self.proof.is_guaranteed()
    }
}

/// Tuning knobs for a single run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgorithmConfig {
    /// Cooperative timeout; the best partial solution is returned on expiry.
    pub timeout_ms: Option<u64>,
    /// Soft limit, only compared against the pre-run estimate.
    pub max_memory_mb: Option<u64>,
    pub unit_price: Decimal,
    /// Score candidate grids on the rayon pool.
    pub parallel: bool,
    /// Candidates scored between two timeout polls.
    pub chunk_size: usize,
    /// Seed for randomized strategies; drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            max_memory_mb: None,
            unit_price: DEFAULT_UNIT_PRICE,
            parallel: true,
            chunk_size: 1024,
            seed: None,
        }
    }
}

impl AlgorithmConfig {
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_rank_conversion() {
        assert_eq!(TargetRank::try_from(3), Ok(TargetRank::Three));
        assert_eq!(TargetRank::try_from(5), Ok(TargetRank::Five));
        assert!(matches!(
            TargetRank::try_from(2),
            Err(OptimizerError::InvalidConstraints(_))
        ));
        assert_eq!(u8::from(TargetRank::Four), 4);
    }

    #[test]
    fn test_grid_sorted_and_displayed() {
        let grid = Grid::simple([12, 3, 45, 7, 1], Some(4), DEFAULT_UNIT_PRICE);
        assert_eq!(grid.numbers, vec![1, 3, 7, 12, 45]);
        assert_eq!(grid.to_string(), "01 03 07 12 45 + 04");
        assert_eq!(grid.mask().count_ones(), 5);
    }

    #[test]
    fn test_default_unit_price() {
        assert_eq!(DEFAULT_UNIT_PRICE.to_string(), "2.20");
        assert_eq!(AlgorithmConfig::default().unit_price, DEFAULT_UNIT_PRICE);
    }
}
