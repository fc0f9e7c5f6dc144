//! Basic example of using the coverage optimizer

use lotto_core::{
    estimate_complexity, AlgorithmConfig, CandidatePool, Constraints, Optimizer, GREEDY, RANDOM,
    WHEEL,
};

fn main() {
    let optimizer = Optimizer::default();
    let pool = CandidatePool::new(vec![3, 7, 12, 18, 24, 31, 36, 42, 45], vec![2, 6]);
    let constraints = Constraints::new(3).with_complementary(true);
    let config = AlgorithmConfig::default();

    // Show what we are about to do
    match estimate_complexity(&pool, &constraints) {
        Ok(estimate) => {
            println!("Draws to cover: {}", estimate.draw_count);
            println!("Complexity tier: {}", estimate.tier);
            println!("Lower bound: {} grids\n", estimate.minimum_grids);
        }
        Err(e) => {
            println!("Cannot estimate: {}", e);
            return;
        }
    }

    // Optimize with the greedy strategy
    println!("Running greedy cover...\n");
    match optimizer.optimize(&pool, &constraints, GREEDY, &config) {
        Ok(result) => {
            for (i, grid) in result.grids.iter().enumerate() {
                println!("  {:2}. {}", i + 1, grid);
            }
            println!("\nTotal cost: {}", result.total_cost);
            println!("Coverage: {:.2}%", result.coverage_percent());
            println!("Guaranteed: {}", result.is_guaranteed());
            println!("Proof: {}", result.proof.mathematical_proof.formula);
        }
        Err(e) => println!("Optimization failed: {}", e),
    }

    // Compare every strategy on the same pool
    println!("\n--- Strategy comparison ---\n");
    match optimizer.compare_strategies(&pool, &constraints, &[GREEDY, RANDOM, WHEEL], &config) {
        Ok(ranking) => {
            for entry in ranking {
                println!(
                    "{}. {:<7} {:>3} grids  {:>7}  {:.2}%",
                    entry.rank,
                    entry.strategy,
                    entry.result.grids.len(),
                    entry.result.total_cost.to_string(),
                    entry.result.coverage_percent()
                );
            }
        }
        Err(e) => println!("Comparison failed: {}", e),
    }
}
