//! Mid-rank assignment for rank-based tests
//!
//! Equal values share the average of the ranks they would occupy (the
//! mid-rank convention). The sizes of the tie groups are kept so that tests
//! can apply their tie corrections.
//!
//! # Examples
//!
//! ```
//! use hypotest_stats::rank::Ranking;
//!
//! let ranking = Ranking::new(&[10.0, 20.0, 20.0, 30.0]);
//! assert_eq!(ranking.ranks(), &[1.0, 2.5, 2.5, 4.0]);
//! assert_eq!(ranking.tie_sizes(), &[2]);
//! assert_eq!(ranking.tie_term(), 6.0);
//! ```

/// Ranks of a sequence of values, in the original order of the values.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    ranks: Vec<f64>,
    tie_sizes: Vec<usize>,
}

impl Ranking {
    /// Ranks `values` from 1 (smallest) to `n` (largest) using mid-ranks for ties.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(values: &[f64]) -> Self {
        let n = values.len();
        let mut order = (0..n).collect::<Vec<_>>();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

        let mut ranks = vec![0.0; n];
        let mut tie_sizes = vec![];
        let mut i = 0;
        while i < n {
            let mut j = i + 1;
            while j < n && values[order[j]] == values[order[i]] {
                j += 1;
            }
            // Positions i..j occupy ranks i+1..=j
            let rank = (i + 1 + j) as f64 / 2.0;
            for &idx in &order[i..j] {
                ranks[idx] = rank;
            }
            if j - i > 1 {
                tie_sizes.push(j - i);
            }
            i = j;
        }

        Self { ranks, tie_sizes }
    }

    /// Ranks in the order of the input values.
    #[must_use]
    pub fn ranks(&self) -> &[f64] {
        &self.ranks
    }

    /// Consumes the ranking, returning the ranks.
    #[must_use]
    pub fn into_ranks(self) -> Vec<f64> {
        self.ranks
    }

    /// Sizes of every group of two or more equal values.
    #[must_use]
    pub fn tie_sizes(&self) -> &[usize] {
        &self.tie_sizes
    }

    #[must_use]
    pub fn has_ties(&self) -> bool {
        !self.tie_sizes.is_empty()
    }

    /// Sum of `t³ - t` over all tie groups.
    ///
    /// This is the quantity every tie correction of the signed-rank,
    /// rank-sum and Kruskal-Wallis statistics is built from.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn tie_term(&self) -> f64 {
        self.tie_sizes
            .iter()
            .map(|&t| {
                let t = t as f64;
                t * t * t - t
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        let ranking = Ranking::new(&[]);
        assert!(ranking.ranks().is_empty());
        assert!(!ranking.has_ties());
    }

    #[test]
    fn test_ranks_follow_input_order() {
        let ranking = Ranking::new(&[3.0, 1.0, 2.0]);
        assert_eq!(ranking.ranks(), &[3.0, 1.0, 2.0]);
        assert_eq!(ranking.tie_term(), 0.0);
    }

    #[test]
    fn test_all_equal_values_share_middle_rank() {
        let ranking = Ranking::new(&[5.0; 4]);
        assert_eq!(ranking.ranks(), &[2.5; 4]);
        assert_eq!(ranking.tie_sizes(), &[4]);
        assert_eq!(ranking.tie_term(), 60.0);
    }

    #[test]
    fn test_multiple_tie_groups() {
        let ranking = Ranking::new(&[1.0, 2.0, 2.0, 3.0, 3.0, 3.0]);
        assert_eq!(ranking.ranks(), &[1.0, 2.5, 2.5, 5.0, 5.0, 5.0]);
        assert_eq!(ranking.tie_sizes(), &[2, 3]);
        // (8 - 2) + (27 - 3)
        assert_eq!(ranking.tie_term(), 30.0);
    }

    #[test]
    fn test_rank_sum_is_triangular_number() {
        let values = [4.0, 4.0, 1.0, 9.0, 2.0, 2.0, 2.0];
        let sum: f64 = Ranking::new(&values).ranks().iter().sum();
        assert_eq!(sum, 28.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn small_values(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
        // Few distinct values so that ties are common
        proptest::collection::vec((0_i32..8).prop_map(f64::from), 1..=max_len)
    }

    proptest! {
        #[test]
        fn rank_sum_is_triangular(values in small_values(40)) {
            let n = values.len();
            let sum: f64 = Ranking::new(&values).ranks().iter().sum();
            #[expect(clippy::cast_precision_loss)]
            let expected = (n * (n + 1) / 2) as f64;
            prop_assert!((sum - expected).abs() < 1e-9);
        }

        #[test]
        fn reversal_keeps_rank_per_value(values in small_values(40)) {
            let ranking = Ranking::new(&values);
            let reversed = values.iter().rev().copied().collect::<Vec<_>>();
            let reversed_ranking = Ranking::new(&reversed);
            let back = reversed_ranking.ranks().iter().rev().copied().collect::<Vec<_>>();
            prop_assert_eq!(ranking.ranks(), back.as_slice());
            prop_assert_eq!(ranking.tie_term(), reversed_ranking.tie_term());
        }
    }
}
