//! Human-readable output.

use lotto_core::{ComplexityEstimate, OptimizationResult, StrategyComparison};

pub fn print_estimate(estimate: &ComplexityEstimate) {
    println!("Draws to cover:     {}", estimate.draw_count);
    println!("Candidate grids:    {}", estimate.candidate_count);
    println!("Pairwise checks:    {}", estimate.pairwise_checks);
    println!("Complexity tier:    {}", estimate.tier);
    println!("Estimated time:     ~{} ms", estimate.estimated_time_ms);
    println!("Estimated memory:   ~{} bytes", estimate.estimated_memory_bytes);
    println!("Lower bound:        {} grids", estimate.minimum_grids);
}

pub fn print_result(result: &OptimizationResult, show_failures: usize) {
    for (i, grid) in result.grids.iter().enumerate() {
        println!("{:4}. {}", i + 1, grid);
    }
    println!();

    let proof = &result.proof;
    let math = &proof.mathematical_proof;
    println!(
        "Strategy:     {} {}",
        result.metadata.algorithm, result.metadata.version
    );
    println!("Grids:        {}", result.grids.len());
    println!("Total cost:   {}", result.total_cost);
    println!(
        "Coverage:     {:.2}% ({} of {} draws, rank {})",
        proof.coverage_percent,
        math.covered_combinations,
        math.total_combinations,
        proof.guaranteed_rank
    );
    println!("Stopped:      {}", result.metadata.termination);
    println!("Time:         {} ms", result.metadata.computation_time_ms);
    println!("Proof:        {}", math.formula);

    if proof.is_guaranteed() {
        println!(
            "\nGuarantee holds for all {} tested cases.",
            proof.validation.tested_cases
        );
        return;
    }

    let failed = &proof.validation.failed_cases;
    println!(
        "\nGuarantee NOT met: {} of {} cases fail.",
        failed.len(),
        proof.validation.tested_cases
    );
    for case in failed.iter().take(show_failures) {
        let draw: Vec<String> = case.draw.iter().map(|n| format!("{:02}", n)).collect();
        let comp = case
            .complementary
            .map(|c| format!(" + {:02}", c))
            .unwrap_or_default();
        println!(
            "  {}{}: best match {}/{}",
            draw.join(" "),
            comp,
            case.matched,
            case.required
        );
    }
    if failed.len() > show_failures {
        println!("  ... {} more", failed.len() - show_failures);
    }
}

pub fn print_ranking(ranking: &[StrategyComparison]) {
    println!(
        "{:<4} {:<10} {:>6} {:>10} {:>9}",
        "Rank", "Strategy", "Grids", "Cost", "Coverage"
    );
    for entry in ranking {
        println!(
            "{:<4} {:<10} {:>6} {:>10} {:>8.2}%",
            entry.rank,
            entry.strategy,
            entry.result.grids.len(),
            entry.result.total_cost.to_string(),
            entry.result.coverage_percent()
        );
    }
}
