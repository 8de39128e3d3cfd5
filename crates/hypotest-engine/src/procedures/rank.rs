//! Rank-based tests: Wilcoxon signed-rank, Mann-Whitney U and
//! Kruskal-Wallis H.
//!
//! All of them rank with mid-ranks and correct their variance for ties.
//! The two-sample procedures can switch to exact permutation p-values for
//! small samples without ties.

use hypotest_stats::{
    descriptive::{is_constant, median},
    exact,
    rank::Ranking,
};

use crate::{
    catalogue::{TestKind, TestSpec},
    distribution::{chi_squared_sf, normal_two_tailed},
    error::DegenerateInput,
    result::TestResult,
};

/// Largest sample for which exact p-values are computed.
pub(crate) const EXACT_MAX_N: usize = 50;

/// Differences the signed-rank test ranks: `x - m₀` for one sample,
/// `b - a` for a pair of samples.
///
/// Returns `None` when the samples do not fit the test.
pub(crate) fn signed_differences(spec: &TestSpec, samples: &[&[f64]]) -> Option<Vec<f64>> {
    match (spec.kind, samples) {
        (TestKind::WilcoxonOneSample, [x]) => {
            let m0 = spec.hypothesized_value();
            Some(x.iter().map(|v| v - m0).collect())
        }
        (TestKind::WilcoxonPaired, [a, b]) if a.len() == b.len() => {
            Some(a.iter().zip(*b).map(|(a, b)| b - a).collect())
        }
        _ => None,
    }
}

/// Wilcoxon signed-rank test on precomputed differences.
///
/// Zero differences are dropped before ranking. The statistic is
/// `T = min(W+, W-)`.
#[expect(clippy::cast_precision_loss)]
pub fn wilcoxon(spec: &TestSpec, differences: &[f64]) -> Result<TestResult, DegenerateInput> {
    let nonzero = differences
        .iter()
        .copied()
        .filter(|d| *d != 0.0)
        .collect::<Vec<_>>();
    if nonzero.is_empty() {
        return Err(DegenerateInput::new(
            "all differences are zero, the signed-rank statistic is undefined",
        ));
    }
    let zeros = differences.len() - nonzero.len();
    let magnitudes = nonzero.iter().map(|d| d.abs()).collect::<Vec<_>>();
    let ranking = Ranking::new(&magnitudes);
    let (w_plus, w_minus) = nonzero.iter().zip(ranking.ranks()).fold(
        (0.0, 0.0),
        |(plus, minus), (d, rank)| {
            if *d > 0.0 {
                (plus + rank, minus)
            } else {
                (plus, minus + rank)
            }
        },
    );
    let statistic = f64::min(w_plus, w_minus);

    let n = nonzero.len();
    let nf = n as f64;
    let mean = nf * (nf + 1.0) / 4.0;
    let variance = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0 - ranking.tie_term() / 48.0;
    let z = if variance > 0.0 {
        (statistic - mean) / variance.sqrt()
    } else {
        0.0
    };

    let use_exact = spec.config.exact_p_value && !ranking.has_ties() && n <= EXACT_MAX_N;
    let (p, method) = if use_exact {
        (exact::signed_rank_two_sided(n, statistic), "exact")
    } else {
        (normal_two_tailed(z)?, "normal approximation")
    };

    let mut builder = TestResult::builder(spec.kind, statistic, p)
        .method(method)
        .extras([
            ("w_plus", w_plus),
            ("w_minus", w_minus),
            ("n_nonzero", nf),
            ("zero_differences", zeros as f64),
            ("z", z),
        ]);
    if n > 10 {
        builder = builder.extra("effect_size_r", z.abs() / nf.sqrt());
    }
    Ok(builder.build(spec.config.alpha))
}

/// Mann-Whitney U test of two independent samples.
///
/// The statistic is `U₁ = R₁ - n₁(n₁ + 1)/2`, so swapping the samples
/// yields the complement `n₁n₂ - U₁`. When every observation has the same
/// value the statistic sits at the center `n₁n₂/2` with p-value 1.
#[expect(clippy::cast_precision_loss)]
pub fn mann_whitney(spec: &TestSpec, a: &[f64], b: &[f64]) -> Result<TestResult, DegenerateInput> {
    let (n1, n2) = (a.len(), b.len());
    if n1 == 0 || n2 == 0 {
        return Err(DegenerateInput::new("both samples need observations"));
    }
    let combined = a.iter().chain(b).copied().collect::<Vec<_>>();
    let ranking = Ranking::new(&combined);
    let (rank_sum_1, rank_sum_2) = {
        let (first, second) = ranking.ranks().split_at(n1);
        (first.iter().sum::<f64>(), second.iter().sum::<f64>())
    };

    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let total = n1f + n2f;
    let product = n1f * n2f;
    let u1 = rank_sum_1 - n1f * (n1f + 1.0) / 2.0;
    let u2 = product - u1;
    let mean = product / 2.0;

    let (p, z, method) = if is_constant(&combined) {
        (1.0, 0.0, "all values tied")
    } else if spec.config.exact_p_value
        && !ranking.has_ties()
        && n1 <= EXACT_MAX_N
        && n2 <= EXACT_MAX_N
    {
        let z = (u1 - mean) / (product * (total + 1.0) / 12.0).sqrt();
        (exact::rank_sum_two_sided(n1, n2, u1), z, "exact")
    } else {
        let variance =
            product / 12.0 * ((total + 1.0) - ranking.tie_term() / (total * (total - 1.0)));
        let distance = ((u1 - mean).abs() - 0.5).max(0.0);
        let z = (distance / variance.sqrt()).copysign(u1 - mean);
        (normal_two_tailed(z)?, z, "normal approximation")
    };

    Ok(TestResult::builder(TestKind::MannWhitney, u1, p)
        .method(method)
        .extras([
            ("u1", u1),
            ("u2", u2),
            ("rank_sum_1", rank_sum_1),
            ("rank_sum_2", rank_sum_2),
            ("z", z),
            ("effect_size_r", z.abs() / total.sqrt()),
            ("probability_of_superiority", u1 / product),
            ("median_1", median(a).unwrap_or(f64::NAN)),
            ("median_2", median(b).unwrap_or(f64::NAN)),
        ])
        .build(spec.config.alpha))
}

/// Kruskal-Wallis H test of two or more independent groups.
#[expect(clippy::cast_precision_loss)]
pub fn kruskal_wallis(spec: &TestSpec, groups: &[&[f64]]) -> Result<TestResult, DegenerateInput> {
    let combined = groups
        .iter()
        .flat_map(|g| g.iter().copied())
        .collect::<Vec<_>>();
    if combined.is_empty() || is_constant(&combined) {
        return Err(DegenerateInput::new(
            "all values are identical, the H statistic is undefined",
        ));
    }
    if groups.iter().any(|g| g.is_empty()) {
        return Err(DegenerateInput::new("every group needs observations"));
    }
    let ranking = Ranking::new(&combined);
    let mut ranks = ranking.ranks();
    let mut weighted = 0.0;
    for group in groups {
        let (group_ranks, rest) = ranks.split_at(group.len());
        weighted += group_ranks.iter().sum::<f64>().powi(2) / group.len() as f64;
        ranks = rest;
    }

    let n = combined.len() as f64;
    let k = groups.len() as f64;
    let uncorrected = 12.0 / (n * (n + 1.0)) * weighted - 3.0 * (n + 1.0);
    let correction = 1.0 - ranking.tie_term() / (n.powi(3) - n);
    let h = (uncorrected / correction).max(0.0);
    let df = k - 1.0;
    let p = chi_squared_sf(h, df)?;

    let mut builder = TestResult::builder(TestKind::KruskalWallis, h, p)
        .df(df)
        .method("chi-square approximation")
        .extra("tie_correction", correction);
    if n > k {
        builder = builder.extra("eta_squared", ((h - k + 1.0) / (n - k)).max(0.0));
    }
    Ok(builder.build(spec.config.alpha))
}
