//! Combinatorial primitives shared by every strategy and the validator.
//!
//! Draws and grids are handled as `u64` bitmasks: bit `n` is set when number
//! `n` is present, so the number of shared main numbers between a grid and a
//! draw is a single popcount.

use rust_decimal::Decimal;

use crate::types::{Grid, TargetRank, GRID_SIZE};

/// Exact binomial coefficient C(n, k). Returns 0 when `k > n`.
pub fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    if k == 0 || k == n {
        return 1;
    }
    let k = k.min(n - k);
    // Each partial product is C(n - k + i + 1, i + 1), so the division is exact.
    let mut acc: u128 = 1;
    for i in 0..k {
        acc = acc * u128::from(n - i) / u128::from(i + 1);
    }
    u64::try_from(acc).unwrap_or(u64::MAX)
}

/// Every subset of size `k`, in lexicographic order of index.
pub fn k_combinations<T: Copy>(elements: &[T], k: usize) -> Vec<Vec<T>> {
    let mut out = Vec::with_capacity(binomial(elements.len() as u64, k as u64) as usize);
    if k > elements.len() {
        return out;
    }
    let mut current = Vec::with_capacity(k);
    collect_combinations(elements, k, 0, &mut current, &mut out);
    out
}

fn collect_combinations<T: Copy>(
    elements: &[T],
    k: usize,
    start: usize,
    current: &mut Vec<T>,
    out: &mut Vec<Vec<T>>,
) {
    if current.len() == k {
        out.push(current.clone());
        return;
    }
    let remaining = k - current.len();
    for i in start..=elements.len() - remaining {
        current.push(elements[i]);
        collect_combinations(elements, k, i + 1, current, out);
        current.pop();
    }
}

/// All 5-number combinations of `numbers` as bitmasks, in the same order
/// as `k_combinations` over the same slice.
pub fn draw_masks(numbers: &[u8]) -> Vec<u64> {
    k_combinations(numbers, GRID_SIZE)
        .iter()
        .map(|combo| to_mask(combo))
        .collect()
}

#[inline]
pub fn to_mask(numbers: &[u8]) -> u64 {
    numbers.iter().fold(0u64, |mask, &n| mask | (1u64 << n))
}

/// Numbers present in a mask, ascending.
pub fn mask_numbers(mask: u64) -> Vec<u8> {
    (0..64u8).filter(|&n| mask & (1u64 << n) != 0).collect()
}

/// Count of shared numbers between two masks.
#[inline]
pub fn overlap(a: u64, b: u64) -> u32 {
    (a & b).count_ones()
}

/// Number of draws a single grid covers at `rank` or better, for a pool of
/// `pool_size` numbers.
pub fn covered_per_grid(pool_size: u64, rank: TargetRank) -> u64 {
    let g = GRID_SIZE as u64;
    let outside = pool_size.saturating_sub(g);
    (u64::from(rank.matches())..=g)
        .map(|j| binomial(g, j) * binomial(outside, g - j))
        .sum()
}

/// Lower bound on the grid count needed to cover every draw at `rank`.
///
/// Sphere-covering bound: total draws divided by the draws one grid can
/// cover. Only used for sanity warnings, never as a cap.
///
/// The divisor counts draws matching in `rank` *or more* numbers,
/// `sum(j >= r) C(5,j)*C(n-5,5-j)`, not just the exactly-`rank` term
/// `C(5,r)*C(n-5,5-r)`. Both agree at rank 5; below that this bound is
/// smaller (n=10, rank 3 gives 2 rather than 3) and stays defined when
/// `n - 5 < 5 - r`.
pub fn estimate_minimum_grids(pool_size: u64, rank: TargetRank) -> u64 {
    let total = binomial(pool_size, GRID_SIZE as u64);
    let per_grid = covered_per_grid(pool_size, rank);
    if total == 0 || per_grid == 0 {
        return 0;
    }
    total.div_ceil(per_grid)
}

pub fn total_cost(grids: &[Grid]) -> Decimal {
    grids.iter().map(|g| g.cost).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DEFAULT_UNIT_PRICE;

    #[test]
    fn test_binomial_known_values() {
        assert_eq!(binomial(49, 5), 1_906_884);
        assert_eq!(binomial(20, 5), 15_504);
        assert_eq!(binomial(10, 5), 252);
        assert_eq!(binomial(6, 5), 6);
        assert_eq!(binomial(5, 5), 1);
    }

    #[test]
    fn test_binomial_edges_and_symmetry() {
        for n in 0..=30u64 {
            assert_eq!(binomial(n, 0), 1);
            assert_eq!(binomial(n, n + 1), 0);
            for k in 0..=n {
                assert_eq!(binomial(n, k), binomial(n, n - k), "C({n},{k})");
            }
        }
    }

    #[test]
    fn test_k_combinations_order() {
        let combos = k_combinations(&[1, 2, 3, 4], 2);
        assert_eq!(
            combos,
            vec![
                vec![1, 2],
                vec![1, 3],
                vec![1, 4],
                vec![2, 3],
                vec![2, 4],
                vec![3, 4]
            ]
        );
        assert!(k_combinations(&[1, 2], 3).is_empty());
        assert_eq!(k_combinations(&[1, 2, 3], 0), vec![Vec::<i32>::new()]);
    }

    #[test]
    fn test_k_combinations_largest_pool() {
        let pool: Vec<u8> = (1..=20).collect();
        let masks = draw_masks(&pool);
        assert_eq!(masks.len(), 15_504);
        assert!(masks.iter().all(|m| m.count_ones() == 5));
    }

    #[test]
    fn test_mask_helpers() {
        let a = to_mask(&[1, 2, 3, 4, 5]);
        let b = to_mask(&[4, 5, 6, 7, 8]);
        assert_eq!(overlap(a, b), 2);
        assert_eq!(mask_numbers(b), vec![4, 5, 6, 7, 8]);
        assert_eq!(to_mask(&[49]), 1u64 << 49);
    }

    #[test]
    fn test_minimum_grids() {
        // Five numbers: the pool itself is the only draw.
        for &rank in TargetRank::all() {
            assert_eq!(estimate_minimum_grids(5, rank), 1);
        }
        // Rank 5 needs every draw played.
        assert_eq!(estimate_minimum_grids(10, TargetRank::Five), 252);
        // Seven numbers: any two 5-subsets share at least 3.
        assert_eq!(estimate_minimum_grids(7, TargetRank::Three), 1);
        // 252 / (10*10 + 5*5 + 1) rounded up.
        assert_eq!(estimate_minimum_grids(10, TargetRank::Three), 2);
    }

    #[test]
    fn test_total_cost() {
        let grids = vec![
            Grid::simple([1, 2, 3, 4, 5], None, DEFAULT_UNIT_PRICE),
            Grid::simple([2, 3, 4, 5, 6], None, DEFAULT_UNIT_PRICE),
            Grid::simple([3, 4, 5, 6, 7], None, DEFAULT_UNIT_PRICE),
        ];
        assert_eq!(total_cost(&grids).to_string(), "6.60");
        assert_eq!(total_cost(&[]), Decimal::ZERO);
    }
}
