//! Exact null distributions of rank statistics
//!
//! Small samples without ties can use the exact permutation distribution of
//! the signed-rank statistic `W+` and the rank-sum statistic `U` instead of
//! the normal approximation. Frequencies are counted by dynamic programming
//! and kept as `f64`, since they grow like `2^n` and `C(n1 + n2, n1)`.
//!
//! # Examples
//!
//! ```
//! use hypotest_stats::exact::{rank_sum_two_sided, signed_rank_two_sided};
//!
//! // The most extreme outcome for n = 5 signed ranks: 2 * (1 / 32)
//! assert_eq!(signed_rank_two_sided(5, 0.0), 0.0625);
//!
//! // Complete separation of two groups of three: 2 * (1 / 20)
//! assert!((rank_sum_two_sided(3, 3, 0.0) - 0.1).abs() < 1e-12);
//! ```

/// Frequencies of every value of the signed-rank statistic `W+` for `n`
/// non-zero, untied differences.
///
/// Index `w` holds the number of sign assignments with `W+ = w`, for
/// `w` in `0..=n(n+1)/2`. The frequencies sum to `2^n`.
#[must_use]
pub fn signed_rank_frequencies(n: usize) -> Vec<f64> {
    let max = n * (n + 1) / 2;
    let mut counts = vec![0.0; max + 1];
    counts[0] = 1.0;
    for rank in 1..=n {
        for w in (rank..=max).rev() {
            counts[w] += counts[w - rank];
        }
    }
    counts
}

/// Frequencies of every value of the Mann-Whitney statistic `U` for
/// samples of sizes `n1` and `n2` without ties.
///
/// Index `u` holds the number of orderings with `U = u`, for `u` in
/// `0..=n1*n2`. Built column by column from the recurrence
/// `f(i, j, u) = f(i - 1, j, u - j) + f(i, j - 1, u)` obtained by asking
/// which sample holds the largest observation.
#[must_use]
pub fn rank_sum_frequencies(n1: usize, n2: usize) -> Vec<f64> {
    // column[i] holds f(i, j, ·) for the current j
    let mut column = vec![vec![1.0]; n1 + 1];
    for j in 1..=n2 {
        let mut next: Vec<Vec<f64>> = Vec::with_capacity(n1 + 1);
        next.push(vec![1.0]);
        for i in 1..=n1 {
            let mut counts = vec![0.0; i * j + 1];
            for (u, count) in next[i - 1].iter().enumerate() {
                counts[u + j] += count;
            }
            for (u, count) in column[i].iter().enumerate() {
                counts[u] += count;
            }
            next.push(counts);
        }
        column = next;
    }
    column.pop().unwrap_or_else(|| vec![1.0])
}

/// Two-sided exact p-value of a signed-rank statistic.
///
/// `statistic` is any of `W+`, `W-` or `min(W+, W-)`; the distribution is
/// symmetric, so the smaller tail is doubled.
#[must_use]
pub fn signed_rank_two_sided(n: usize, statistic: f64) -> f64 {
    two_sided(&signed_rank_frequencies(n), statistic)
}

/// Two-sided exact p-value of a Mann-Whitney `U` statistic.
#[must_use]
pub fn rank_sum_two_sided(n1: usize, n2: usize, statistic: f64) -> f64 {
    two_sided(&rank_sum_frequencies(n1, n2), statistic)
}

#[expect(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn two_sided(frequencies: &[f64], statistic: f64) -> f64 {
    let total = frequencies.iter().sum::<f64>();
    let max = frequencies.len().saturating_sub(1);
    let value = (statistic.round().max(0.0) as usize).min(max);
    let lower = frequencies[..=value].iter().sum::<f64>() / total;
    let upper = frequencies[value..].iter().sum::<f64>() / total;
    (2.0 * lower.min(upper)).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_rank_frequencies_small() {
        // n = 3: subsets of {1, 2, 3} by sum
        assert_eq!(
            signed_rank_frequencies(3),
            vec![1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0]
        );
    }

    #[test]
    fn test_signed_rank_frequencies_total() {
        let total: f64 = signed_rank_frequencies(12).iter().sum();
        assert_eq!(total, 4096.0);
    }

    #[test]
    fn test_rank_sum_frequencies_small() {
        // n1 = n2 = 2: C(4, 2) = 6 orderings
        assert_eq!(rank_sum_frequencies(2, 2), vec![1.0, 1.0, 2.0, 1.0, 1.0]);
    }

    #[test]
    fn test_rank_sum_frequencies_total() {
        let total: f64 = rank_sum_frequencies(5, 7).iter().sum();
        assert_eq!(total, 792.0);
        assert_eq!(rank_sum_frequencies(0, 4), vec![1.0]);
    }

    #[test]
    fn test_rank_sum_frequencies_symmetric_in_sizes() {
        assert_eq!(rank_sum_frequencies(3, 6), rank_sum_frequencies(6, 3));
    }

    #[test]
    fn test_center_of_distribution_has_p_value_one() {
        // n = 4: max W+ = 10, center 5
        assert_eq!(signed_rank_two_sided(4, 5.0), 1.0);
        assert_eq!(rank_sum_two_sided(4, 4, 8.0), 1.0);
    }

    #[test]
    fn test_signed_rank_reference_value() {
        // n = 10, T = 8: P(W+ <= 8) = 25 / 1024
        let p = signed_rank_two_sided(10, 8.0);
        assert!((p - 50.0 / 1024.0).abs() < 1e-12);
    }
}
