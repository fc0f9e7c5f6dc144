//! Uncovered-draw bookkeeping and grid admission shared by all strategies.

use rust_decimal::Decimal;

use crate::combinatorics::{mask_numbers, overlap};
use crate::types::{
    AlgorithmConfig, CandidatePool, Constraints, Grid, TargetRank, Termination, GRID_SIZE,
};

/// The universe of draws to cover and which of them are already covered.
pub struct CoverageState {
    /// Draw masks in enumeration order
    draws: Vec<u64>,
    covered: Vec<bool>,
    covered_count: usize,
    rank: u32,
}

impl CoverageState {
    pub fn new(draws: Vec<u64>, rank: TargetRank) -> Self {
        let covered = vec![false; draws.len()];
        Self {
            draws,
            covered,
            covered_count: 0,
            rank: u32::from(rank.matches()),
        }
    }

    #[inline]
    pub fn covers(&self, grid: u64, draw: u64) -> bool {
        overlap(grid, draw) >= self.rank
    }

    pub fn rank(&self) -> u32 {
        self.rank
    }

    /// Number of still-uncovered draws `grid` would cover.
    pub fn gain(&self, grid: u64) -> usize {
        self.draws
            .iter()
            .zip(&self.covered)
            .filter(|&(&draw, &done)| !done && self.covers(grid, draw))
            .count()
    }

    /// Uncovered draw masks, in enumeration order.
    pub fn uncovered_draws(&self) -> Vec<u64> {
        self.draws
            .iter()
            .zip(&self.covered)
            .filter(|&(_, &done)| !done)
            .map(|(&draw, _)| draw)
            .collect()
    }

    /// Mark every draw `grid` covers; returns the masks that were newly covered.
    pub fn mark(&mut self, grid: u64) -> Vec<u64> {
        let mut newly = Vec::new();
        for (draw, done) in self.draws.iter().zip(self.covered.iter_mut()) {
            if !*done && overlap(grid, *draw) >= self.rank {
                *done = true;
                newly.push(*draw);
            }
        }
        self.covered_count += newly.len();
        newly
    }

    pub fn is_complete(&self) -> bool {
        self.covered_count == self.draws.len()
    }

    pub fn covered_count(&self) -> usize {
        self.covered_count
    }

    pub fn total(&self) -> usize {
        self.draws.len()
    }
}

/// Grids selected so far, with the grid-count and budget caps applied
/// before each admission.
pub struct GridSelection {
    grids: Vec<Grid>,
    spent: Decimal,
    unit_price: Decimal,
    max_grid_count: Option<usize>,
    max_budget: Option<Decimal>,
    complementary: Vec<u8>,
}

impl GridSelection {
    pub fn new(pool: &CandidatePool, constraints: &Constraints, config: &AlgorithmConfig) -> Self {
        let complementary = if constraints.include_complementary {
            pool.sorted_complementary()
        } else {
            Vec::new()
        };
        Self {
            grids: Vec::new(),
            spent: Decimal::ZERO,
            unit_price: config.unit_price,
            max_grid_count: constraints.max_grid_count,
            max_budget: constraints.max_budget,
            complementary,
        }
    }

    /// The cap that forbids one more grid, if any.
    pub fn blocked(&self) -> Option<Termination> {
        if let Some(max) = self.max_grid_count {
            if self.grids.len() >= max {
                return Some(Termination::GridCountReached);
            }
        }
        if let Some(max) = self.max_budget {
            if self.spent + self.unit_price > max {
                return Some(Termination::BudgetReached);
            }
        }
        None
    }

    /// Append a grid. Complementary numbers rotate in selection order.
    pub fn push(&mut self, mask: u64) {
        let numbers = mask_numbers(mask);
        let mut main = [0u8; GRID_SIZE];
        main.copy_from_slice(&numbers[..GRID_SIZE]);
        let complementary = if self.complementary.is_empty() {
            None
        } else {
            Some(self.complementary[self.grids.len() % self.complementary.len()])
        };
        self.spent += self.unit_price;
        self.grids.push(Grid::simple(main, complementary, self.unit_price));
    }

    pub fn len(&self) -> usize {
        self.grids.len()
    }

    pub fn spent(&self) -> Decimal {
        self.spent
    }

    pub fn into_grids(self) -> Vec<Grid> {
        self.grids
    }
}
