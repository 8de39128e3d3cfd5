//! The fixed catalogue of tests and their per-invocation options

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Shape of the data a test consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Arity {
    /// A single sample.
    OneSample,
    /// Two unrelated samples of any lengths.
    TwoSampleIndependent,
    /// Two samples of equal length whose positions are paired.
    TwoSamplePaired,
    /// Two or more groups (or contingency table rows).
    KSample,
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::OneSample => "one sample",
            Self::TwoSampleIndependent => "two independent samples",
            Self::TwoSamplePaired => "two paired samples",
            Self::KSample => "two or more groups",
        };
        f.write_str(s)
    }
}

/// The thirteen procedures offered by the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestKind {
    WilcoxonOneSample,
    WilcoxonPaired,
    TOneSample,
    TTwoSample,
    TPaired,
    MannWhitney,
    ChiSquareGoodnessOfFit,
    ChiSquareAssociation,
    FTest,
    Anova,
    KruskalWallis,
    Spearman,
    LinearRegression,
}

impl TestKind {
    pub const ALL: [Self; 13] = [
        Self::WilcoxonOneSample,
        Self::WilcoxonPaired,
        Self::TOneSample,
        Self::TTwoSample,
        Self::TPaired,
        Self::MannWhitney,
        Self::ChiSquareGoodnessOfFit,
        Self::ChiSquareAssociation,
        Self::FTest,
        Self::Anova,
        Self::KruskalWallis,
        Self::Spearman,
        Self::LinearRegression,
    ];

    /// Stable identifier used on the command line.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::WilcoxonOneSample => "wilcoxon-one-sample",
            Self::WilcoxonPaired => "wilcoxon-paired",
            Self::TOneSample => "t-one-sample",
            Self::TTwoSample => "t-two-sample",
            Self::TPaired => "t-paired",
            Self::MannWhitney => "mann-whitney",
            Self::ChiSquareGoodnessOfFit => "chi-square-goodness-of-fit",
            Self::ChiSquareAssociation => "chi-square-association",
            Self::FTest => "f-test",
            Self::Anova => "anova",
            Self::KruskalWallis => "kruskal-wallis",
            Self::Spearman => "spearman",
            Self::LinearRegression => "linear-regression",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::WilcoxonOneSample => "One-Sample Wilcoxon Signed-Rank Test",
            Self::WilcoxonPaired => "Paired-Sample Wilcoxon Signed-Rank Test",
            Self::TOneSample => "One-Sample Student's t-test",
            Self::TTwoSample => "Independent Samples t-test",
            Self::TPaired => "Paired Samples t-test",
            Self::MannWhitney => "Mann-Whitney U Test",
            Self::ChiSquareGoodnessOfFit => "Chi-Square Goodness of Fit Test",
            Self::ChiSquareAssociation => "Chi-Square Test of Association",
            Self::FTest => "F-test for Equality of Variances",
            Self::Anova => "One-Way ANOVA",
            Self::KruskalWallis => "Kruskal-Wallis H Test",
            Self::Spearman => "Spearman's Rank Correlation",
            Self::LinearRegression => "Linear Regression Analysis",
        }
    }

    #[must_use]
    pub const fn arity(self) -> Arity {
        match self {
            Self::WilcoxonOneSample | Self::TOneSample | Self::ChiSquareGoodnessOfFit => {
                Arity::OneSample
            }
            Self::TTwoSample | Self::MannWhitney | Self::FTest => Arity::TwoSampleIndependent,
            Self::WilcoxonPaired | Self::TPaired | Self::Spearman | Self::LinearRegression => {
                Arity::TwoSamplePaired
            }
            Self::ChiSquareAssociation | Self::Anova | Self::KruskalWallis => Arity::KSample,
        }
    }

    /// Label of the main statistic in reports.
    #[must_use]
    pub const fn statistic_label(self) -> &'static str {
        match self {
            Self::WilcoxonOneSample | Self::WilcoxonPaired => "W",
            Self::TOneSample | Self::TTwoSample | Self::TPaired | Self::LinearRegression => "t",
            Self::MannWhitney => "U",
            Self::ChiSquareGoodnessOfFit | Self::ChiSquareAssociation => "Chi-square",
            Self::FTest | Self::Anova => "F",
            Self::KruskalWallis => "H",
            Self::Spearman => "rho",
        }
    }

    /// Whether the procedure assumes normally distributed data.
    #[must_use]
    pub const fn is_parametric(self) -> bool {
        matches!(
            self,
            Self::TOneSample
                | Self::TTwoSample
                | Self::TPaired
                | Self::FTest
                | Self::Anova
                | Self::LinearRegression
        )
    }

    #[must_use]
    pub const fn is_rank_based(self) -> bool {
        matches!(
            self,
            Self::WilcoxonOneSample
                | Self::WilcoxonPaired
                | Self::MannWhitney
                | Self::KruskalWallis
                | Self::Spearman
        )
    }

    /// Whether the procedure compares independently drawn samples.
    #[must_use]
    pub const fn has_independent_samples(self) -> bool {
        matches!(
            self,
            Self::TTwoSample
                | Self::MannWhitney
                | Self::FTest
                | Self::Anova
                | Self::KruskalWallis
                | Self::ChiSquareAssociation
        )
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown test '{id}'")]
pub struct UnknownTestError {
    pub id: String,
}

impl FromStr for TestKind {
    type Err = UnknownTestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == id)
            .ok_or_else(|| UnknownTestError { id: s.to_owned() })
    }
}

/// Test-specific parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestParams {
    /// Hypothesized mean (one-sample t-test) or median (one-sample
    /// Wilcoxon). Defaults to zero.
    pub hypothesized_value: Option<f64>,
    /// Expected frequencies for the goodness-of-fit test. Defaults to an
    /// even split of the observed total.
    pub expected: Option<Vec<f64>>,
}

pub const DEFAULT_ALPHA: f64 = 0.05;

/// Options recognized by every invocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    /// Significance level.
    pub alpha: f64,
    /// Use exact permutation p-values for small rank-test samples without ties.
    pub exact_p_value: bool,
    /// Force pooled (`true`) or Welch (`false`) two-sample t-test; inferred
    /// from the equal-variance check when `None`.
    pub equal_variance_assumed: Option<bool>,
    /// Yates continuity correction for 2x2 association tables.
    pub yates_correction: bool,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            exact_p_value: false,
            equal_variance_assumed: None,
            yates_correction: false,
        }
    }
}

/// A catalogue entry together with the options of one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSpec {
    pub kind: TestKind,
    pub params: TestParams,
    pub config: TestConfig,
}

impl TestSpec {
    #[must_use]
    pub fn new(kind: TestKind) -> Self {
        Self {
            kind,
            params: TestParams::default(),
            config: TestConfig::default(),
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: TestParams) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: TestConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.config.alpha = alpha;
        self
    }

    #[must_use]
    pub fn arity(&self) -> Arity {
        self.kind.arity()
    }

    #[must_use]
    pub fn hypothesized_value(&self) -> f64 {
        self.params.hypothesized_value.unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_has_thirteen_unique_ids() {
        let mut ids = TestKind::ALL.map(TestKind::id).to_vec();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 13);
    }

    #[test]
    fn test_parse_round_trips_through_id() {
        for kind in TestKind::ALL {
            assert_eq!(kind.id().parse::<TestKind>(), Ok(kind));
        }
        assert_eq!("T_Paired".parse::<TestKind>(), Ok(TestKind::TPaired));
        assert!("z-test".parse::<TestKind>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = TestConfig::default();
        assert_eq!(config.alpha, 0.05);
        assert!(!config.exact_p_value);
        assert_eq!(config.equal_variance_assumed, None);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: TestConfig = serde_json::from_str(r#"{"alpha": 0.01}"#).unwrap();
        assert_eq!(config.alpha, 0.01);
        assert!(!config.yates_correction);
    }

    #[test]
    fn test_arity_of_regression_is_paired() {
        assert_eq!(TestKind::LinearRegression.arity(), Arity::TwoSamplePaired);
        assert_eq!(TestKind::ChiSquareAssociation.arity(), Arity::KSample);
    }
}
