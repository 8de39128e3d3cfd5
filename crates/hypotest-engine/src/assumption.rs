//! Advisory assumption checks
//!
//! Every check here only annotates a run; none of them stops the
//! computation. The same equal-variance decision is used to pick between
//! the pooled and Welch two-sample t-tests when the caller leaves the
//! choice open.

use std::fmt;

use hypotest_stats::{
    anova::OneWay,
    descriptive::{self, sample_variance},
    fit::LineFit,
    rank::Ranking,
};
use serde::Serialize;

use crate::{
    catalogue::{TestKind, TestSpec},
    distribution,
    procedures::{
        chi_square,
        rank::{self, EXACT_MAX_N},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Assumption {
    Normality,
    EqualVariance,
    SampleSize,
    Independence,
    ExpectedFrequency,
    Ties,
    ZeroDifferences,
}

impl fmt::Display for Assumption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Normality => "normality",
            Self::EqualVariance => "equal variance",
            Self::SampleSize => "sample size",
            Self::Independence => "independence",
            Self::ExpectedFrequency => "expected frequency",
            Self::Ties => "ties",
            Self::ZeroDifferences => "zero differences",
        };
        f.write_str(s)
    }
}

/// How strongly the data speak against an assumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    Violated,
    Questionable,
    /// Cannot be judged from the values at all.
    Unverifiable,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Violated => "violated",
            Self::Questionable => "questionable",
            Self::Unverifiable => "unverifiable",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssumptionWarning {
    pub assumption: Assumption,
    pub verdict: Verdict,
    pub explanation: String,
}

impl fmt::Display for AssumptionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.assumption, self.verdict, self.explanation
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssumptionReport {
    pub warnings: Vec<AssumptionWarning>,
}

impl AssumptionReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Warnings about one assumption.
    pub fn about(&self, assumption: Assumption) -> impl Iterator<Item = &AssumptionWarning> {
        self.warnings
            .iter()
            .filter(move |w| w.assumption == assumption)
    }

    fn push(&mut self, assumption: Assumption, verdict: Verdict, explanation: impl Into<String>) {
        self.warnings.push(AssumptionWarning {
            assumption,
            verdict,
            explanation: explanation.into(),
        });
    }
}

const SKEWNESS_LIMIT: f64 = 1.0;
const KURTOSIS_LIMIT: f64 = 2.0;
const OUTLIER_SD: f64 = 3.0;
const OUTLIER_FRACTION: f64 = 0.05;
const CLT_SAMPLE_SIZE: usize = 30;
const VARIANCE_RATIO_LIMIT: f64 = 4.0;
const LEVENE_ALPHA: f64 = 0.05;
const PARAMETRIC_MIN_N: usize = 5;
const RANK_APPROXIMATION_MIN_N: usize = 10;
const MIN_EXPECTED: f64 = 5.0;
const MIN_TABLE_TOTAL: f64 = 30.0;
const TIED_FRACTION: f64 = 0.1;

/// Outcome of the equal-variance check on two or more groups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EqualVarianceCheck {
    /// Largest over smallest sample variance.
    pub ratio: f64,
    /// Brown-Forsythe Levene p-value, `None` when the test is undefined.
    pub levene_p: Option<f64>,
    pub equal: bool,
}

/// Compares the spread of `groups` by variance ratio and the
/// Brown-Forsythe (median-centered) Levene test.
///
/// ```
/// # use hypotest_engine::assumption::equal_variance;
/// let check = equal_variance(&[&[1.0, 2.0, 3.0, 4.0], &[10.0, 30.0, 50.0, 70.0]]);
/// assert!(!check.equal);
/// assert!(check.ratio > 4.0);
/// ```
#[must_use]
pub fn equal_variance(groups: &[&[f64]]) -> EqualVarianceCheck {
    let variances = groups
        .iter()
        .map(|g| sample_variance(g).unwrap_or(0.0))
        .collect::<Vec<_>>();
    let max = variances.iter().copied().fold(0.0, f64::max);
    let min = variances.iter().copied().fold(f64::INFINITY, f64::min);
    let ratio = if max == 0.0 {
        1.0
    } else if min == 0.0 {
        f64::INFINITY
    } else {
        max / min
    };

    let levene_p = brown_forsythe(groups);
    let equal = ratio <= VARIANCE_RATIO_LIMIT && levene_p.is_none_or(|p| p >= LEVENE_ALPHA);
    EqualVarianceCheck {
        ratio,
        levene_p,
        equal,
    }
}

#[expect(clippy::cast_precision_loss)]
fn brown_forsythe(groups: &[&[f64]]) -> Option<f64> {
    let deviations = groups
        .iter()
        .map(|g| {
            let median = descriptive::median(g)?;
            Some(g.iter().map(|v| (v - median).abs()).collect::<Vec<_>>())
        })
        .collect::<Option<Vec<_>>>()?;
    let deviations = deviations.iter().map(Vec::as_slice).collect::<Vec<_>>();
    let layout = OneWay::new(&deviations)?;
    let f = layout.f_ratio()?;
    distribution::f_sf(f, layout.df_between as f64, layout.df_within as f64).ok()
}

/// Evaluates the assumptions of `spec` on validated `samples`.
#[must_use]
pub fn check(spec: &TestSpec, samples: &[&[f64]]) -> AssumptionReport {
    let mut report = AssumptionReport::default();
    let kind = spec.kind;

    match (kind, samples) {
        (TestKind::TOneSample, [x]) => check_normality(&mut report, "the sample", x),
        (TestKind::TPaired, [a, b]) => {
            let differences = a.iter().zip(*b).map(|(a, b)| a - b).collect::<Vec<_>>();
            check_normality(&mut report, "the paired differences", &differences);
        }
        (TestKind::TTwoSample | TestKind::FTest | TestKind::Anova, groups) => {
            for (idx, group) in groups.iter().enumerate() {
                check_normality(&mut report, &format!("group {}", idx + 1), group);
            }
        }
        (TestKind::LinearRegression, [x, y]) => {
            if let Some(fit) = LineFit::new(x, y) {
                check_normality(&mut report, "the residuals", &fit.residuals(x, y));
            }
        }
        _ => {}
    }

    if matches!(kind, TestKind::TTwoSample | TestKind::Anova) {
        check_equal_variance(&mut report, kind, samples);
    }

    check_sample_size(&mut report, spec, samples);

    if kind.has_independent_samples() {
        report.push(
            Assumption::Independence,
            Verdict::Unverifiable,
            "observations must be independent within and between groups; \
             this cannot be checked from the values alone",
        );
    }

    if let (TestKind::Spearman, [x, y]) = (kind, samples) {
        for (label, values) in [("x", x), ("y", y)] {
            let fraction = tied_fraction(values);
            if fraction > TIED_FRACTION {
                report.push(
                    Assumption::Ties,
                    Verdict::Questionable,
                    format!(
                        "{:.0}% of {label} values are tied; rank correlation is less reliable",
                        fraction * 100.0
                    ),
                );
            }
        }
    }

    if matches!(kind, TestKind::WilcoxonOneSample | TestKind::WilcoxonPaired)
        && let Some(differences) = rank::signed_differences(spec, samples)
    {
        let zeros = differences.iter().filter(|d| **d == 0.0).count();
        if zeros > 0 {
            report.push(
                Assumption::ZeroDifferences,
                Verdict::Questionable,
                format!("{zeros} zero difference(s) dropped before ranking"),
            );
        }
    }

    report
}

#[expect(clippy::cast_precision_loss)]
fn check_normality(report: &mut AssumptionReport, label: &str, values: &[f64]) {
    let n = values.len();
    let skewness = descriptive::skewness(values);
    let kurtosis = descriptive::excess_kurtosis(values);
    let skewed = skewness.is_some_and(|g1| g1.abs() > SKEWNESS_LIMIT);
    let heavy = kurtosis.is_some_and(|g2| g2.abs() > KURTOSIS_LIMIT);
    if skewed || heavy {
        let mut parts = vec![];
        if let Some(g1) = skewness.filter(|_| skewed) {
            parts.push(format!("skewness {g1:.2}"));
        }
        if let Some(g2) = kurtosis.filter(|_| heavy) {
            parts.push(format!("excess kurtosis {g2:.2}"));
        }
        report.push(
            Assumption::Normality,
            Verdict::Violated,
            format!(
                "{label} does not look normal ({}); consider a rank-based alternative",
                parts.join(", ")
            ),
        );
        return;
    }

    if let (Some(mean), Some(variance)) = (descriptive::mean(values), sample_variance(values))
        && variance > 0.0
    {
        let limit = OUTLIER_SD * variance.sqrt();
        let outliers = values.iter().filter(|v| (*v - mean).abs() > limit).count();
        if outliers as f64 > OUTLIER_FRACTION * n as f64 {
            report.push(
                Assumption::Normality,
                Verdict::Questionable,
                format!("{label} has {outliers} value(s) beyond 3 standard deviations"),
            );
            return;
        }
    }

    if n < CLT_SAMPLE_SIZE {
        report.push(
            Assumption::Normality,
            Verdict::Questionable,
            format!(
                "{label} has only {n} values; normality cannot be relied on through \
                 the central limit theorem"
            ),
        );
    }
}

fn check_equal_variance(report: &mut AssumptionReport, kind: TestKind, groups: &[&[f64]]) {
    let check = equal_variance(groups);
    if check.equal {
        return;
    }
    let alternative = if kind == TestKind::Anova {
        "Kruskal-Wallis H test"
    } else {
        "Mann-Whitney U test"
    };
    let levene = check
        .levene_p
        .map(|p| format!(", Levene p = {p:.4}"))
        .unwrap_or_default();
    report.push(
        Assumption::EqualVariance,
        Verdict::Violated,
        format!(
            "variance ratio {:.2}{levene}; consider the {alternative}",
            check.ratio
        ),
    );
}

fn check_sample_size(report: &mut AssumptionReport, spec: &TestSpec, samples: &[&[f64]]) {
    let kind = spec.kind;
    let exact = spec.config.exact_p_value;

    if kind.is_parametric() {
        let smallest = samples.iter().map(|s| s.len()).min().unwrap_or(0);
        if smallest < PARAMETRIC_MIN_N {
            report.push(
                Assumption::SampleSize,
                Verdict::Questionable,
                format!(
                    "smallest sample has {smallest} values; at least {PARAMETRIC_MIN_N} \
                     are recommended"
                ),
            );
        }
        return;
    }

    match (kind, samples) {
        (TestKind::WilcoxonOneSample | TestKind::WilcoxonPaired, _) => {
            let Some(differences) = rank::signed_differences(spec, samples) else {
                return;
            };
            let nonzero = differences
                .iter()
                .filter(|d| **d != 0.0)
                .map(|d| d.abs())
                .collect::<Vec<_>>();
            let ties = Ranking::new(&nonzero).has_ties();
            check_rank_sample_size(report, exact, ties, &[nonzero.len()]);
        }
        (TestKind::MannWhitney, [a, b]) => {
            let combined = a.iter().chain(*b).copied().collect::<Vec<_>>();
            let ties = Ranking::new(&combined).has_ties();
            check_rank_sample_size(report, exact, ties, &[a.len(), b.len()]);
        }
        (TestKind::KruskalWallis | TestKind::Spearman, _) => {
            let smallest = samples.iter().map(|s| s.len()).min().unwrap_or(0);
            if smallest < RANK_APPROXIMATION_MIN_N {
                report.push(
                    Assumption::SampleSize,
                    Verdict::Questionable,
                    format!(
                        "smallest sample has {smallest} values; the large-sample \
                         approximation of the p-value may be inaccurate"
                    ),
                );
            }
        }
        (TestKind::ChiSquareGoodnessOfFit, [observed]) => {
            let expected =
                chi_square::goodness_of_fit_expected(observed, spec.params.expected.as_deref());
            check_expected_counts(report, observed.iter().sum(), expected.iter().copied());
        }
        (TestKind::ChiSquareAssociation, rows) => {
            let total = rows.iter().flat_map(|r| r.iter()).sum();
            let expected = chi_square::contingency_expected(rows);
            check_expected_counts(report, total, expected.iter().flatten().copied());
        }
        _ => {}
    }
}

fn check_rank_sample_size(
    report: &mut AssumptionReport,
    exact: bool,
    ties: bool,
    sizes: &[usize],
) {
    let smallest = sizes.iter().copied().min().unwrap_or(0);
    let largest = sizes.iter().copied().max().unwrap_or(0);
    if exact {
        if ties {
            report.push(
                Assumption::SampleSize,
                Verdict::Questionable,
                "exact p-value unavailable with tied values; normal approximation used",
            );
        } else if largest > EXACT_MAX_N {
            report.push(
                Assumption::SampleSize,
                Verdict::Questionable,
                format!(
                    "exact p-value unavailable above {EXACT_MAX_N} observations; \
                     normal approximation used"
                ),
            );
        }
    } else if smallest < RANK_APPROXIMATION_MIN_N {
        report.push(
            Assumption::SampleSize,
            Verdict::Questionable,
            format!(
                "only {smallest} usable observations; the normal approximation may be \
                 inaccurate, consider requesting an exact p-value"
            ),
        );
    }
}

fn check_expected_counts<I>(report: &mut AssumptionReport, total: f64, expected: I)
where
    I: IntoIterator<Item = f64>,
{
    let small = expected.into_iter().filter(|e| *e < MIN_EXPECTED).count();
    if small > 0 {
        report.push(
            Assumption::ExpectedFrequency,
            Verdict::Questionable,
            format!(
                "{small} cell(s) have an expected frequency below {MIN_EXPECTED}; \
                 the chi-square approximation may be inaccurate"
            ),
        );
    }
    if total < MIN_TABLE_TOTAL {
        report.push(
            Assumption::SampleSize,
            Verdict::Questionable,
            format!("total count {total} is below {MIN_TABLE_TOTAL}"),
        );
    }
}

#[expect(clippy::cast_precision_loss)]
fn tied_fraction(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let tied = Ranking::new(values).tie_sizes().iter().sum::<usize>();
    tied as f64 / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{TestConfig, TestParams};

    fn verdicts(report: &AssumptionReport, assumption: Assumption) -> Vec<Verdict> {
        report.about(assumption).map(|w| w.verdict).collect()
    }

    fn spread(n: usize) -> Vec<f64> {
        (0..n).map(|i| f64::from(u32::try_from(i).unwrap())).collect()
    }

    #[test]
    fn test_skewed_sample_violates_normality() {
        let values = [1.0, 1.0, 1.0, 2.0, 2.0, 3.0, 40.0];
        let report = check(&TestSpec::new(TestKind::TOneSample), &[&values]);
        assert_eq!(verdicts(&report, Assumption::Normality), vec![Verdict::Violated]);
    }

    #[test]
    fn test_small_symmetric_sample_is_questionable() {
        let values = spread(10);
        let report = check(&TestSpec::new(TestKind::TOneSample), &[&values]);
        assert_eq!(verdicts(&report, Assumption::Normality), vec![Verdict::Questionable]);
        assert!(verdicts(&report, Assumption::SampleSize).is_empty());
    }

    #[test]
    fn test_large_uniform_sample_passes_normality() {
        let values = spread(40);
        let report = check(&TestSpec::new(TestKind::TOneSample), &[&values]);
        assert!(report.is_clean(), "{report:?}");
    }

    #[test]
    fn test_unequal_variances() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [10.0, 30.0, 50.0, 70.0, 90.0];
        let report = check(&TestSpec::new(TestKind::TTwoSample), &[&a, &b]);
        let warning = report.about(Assumption::EqualVariance).next().unwrap();
        assert_eq!(warning.verdict, Verdict::Violated);
        assert!(warning.explanation.contains("Mann-Whitney"));

        let report = check(&TestSpec::new(TestKind::Anova), &[&a, &b, &a]);
        let warning = report.about(Assumption::EqualVariance).next().unwrap();
        assert!(warning.explanation.contains("Kruskal-Wallis"));
    }

    #[test]
    fn test_equal_variance_check() {
        let check = equal_variance(&[&[1.0, 2.0, 3.0, 4.0], &[2.0, 3.0, 4.0, 5.0]]);
        assert_eq!(check.ratio, 1.0);
        assert!(check.equal);

        let check = equal_variance(&[&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]]);
        assert!(check.ratio.is_infinite());
        assert!(!check.equal);
    }

    #[test]
    fn test_independence_is_always_unverifiable() {
        for kind in [
            TestKind::TTwoSample,
            TestKind::MannWhitney,
            TestKind::FTest,
            TestKind::Anova,
            TestKind::KruskalWallis,
        ] {
            let report = check(&TestSpec::new(kind), &[&spread(12), &spread(12)]);
            assert_eq!(
                verdicts(&report, Assumption::Independence),
                vec![Verdict::Unverifiable],
                "{kind:?}"
            );
        }
        let report = check(&TestSpec::new(TestKind::TPaired), &[&spread(12), &spread(12)]);
        assert!(verdicts(&report, Assumption::Independence).is_empty());
    }

    #[test]
    fn test_rank_sample_size() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        let report = check(&TestSpec::new(TestKind::MannWhitney), &[&a, &b]);
        assert_eq!(verdicts(&report, Assumption::SampleSize), vec![Verdict::Questionable]);

        let exact = TestSpec::new(TestKind::MannWhitney).with_config(TestConfig {
            exact_p_value: true,
            ..TestConfig::default()
        });
        assert!(verdicts(&check(&exact, &[&a, &b]), Assumption::SampleSize).is_empty());

        let tied = [1.0, 4.0, 3.0];
        let report = check(&exact, &[&tied, &b]);
        let warning = report.about(Assumption::SampleSize).next().unwrap();
        assert!(warning.explanation.contains("tied"));
    }

    #[test]
    fn test_wilcoxon_zero_differences() {
        let spec = TestSpec::new(TestKind::WilcoxonOneSample).with_params(TestParams {
            hypothesized_value: Some(3.0),
            ..TestParams::default()
        });
        let report = check(&spec, &[&[1.0, 3.0, 3.0, 5.0, 6.0]]);
        let warning = report.about(Assumption::ZeroDifferences).next().unwrap();
        assert!(warning.explanation.starts_with("2 zero"));
    }

    #[test]
    fn test_expected_frequencies() {
        let report = check(
            &TestSpec::new(TestKind::ChiSquareAssociation),
            &[&[2.0, 3.0], &[4.0, 1.0]],
        );
        assert_eq!(
            verdicts(&report, Assumption::ExpectedFrequency),
            vec![Verdict::Questionable]
        );
        assert_eq!(verdicts(&report, Assumption::SampleSize), vec![Verdict::Questionable]);
    }

    #[test]
    fn test_spearman_ties() {
        let x = [1.0, 1.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let y = spread(10);
        let report = check(&TestSpec::new(TestKind::Spearman), &[&x, &y]);
        assert_eq!(verdicts(&report, Assumption::Ties), vec![Verdict::Questionable]);
    }

    #[test]
    fn test_regression_checks_residuals() {
        let x = spread(40);
        let y = x.iter().map(|v| 2.0 * v + 1.0).collect::<Vec<_>>();
        let report = check(&TestSpec::new(TestKind::LinearRegression), &[&x, &y]);
        // Constant residuals of a perfect fit carry no shape information
        assert!(verdicts(&report, Assumption::Normality).is_empty());
    }
}
