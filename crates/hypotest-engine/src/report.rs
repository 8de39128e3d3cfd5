//! Presentation of test results
//!
//! Turns a [`TestResult`] and its [`AssumptionReport`] into fixed-precision
//! strings. Nothing is recomputed here; every number comes from the result.
//!
//! # Examples
//!
//! ```
//! use hypotest_engine::{
//!     assumption::AssumptionReport,
//!     catalogue::TestKind,
//!     report,
//!     result::TestResult,
//! };
//!
//! let result = TestResult::builder(TestKind::TOneSample, 2.828_427, 0.047_42)
//!     .df(4.0)
//!     .build(0.05);
//! let report = report::format(&result, &AssumptionReport::default());
//! assert_eq!(report.statistic, "2.8284");
//! assert_eq!(report.degrees_of_freedom.as_deref(), Some("4"));
//! assert_eq!(report.p_value, "0.047");
//! assert_eq!(report.significance, "*");
//! assert_eq!(report.verdict, "Significant at α = 0.05 (reject H0)");
//! ```

use serde::Serialize;

use crate::{
    assumption::AssumptionReport,
    catalogue::TestKind,
    procedures::correlation::correlation_strength,
    result::{Extra, TestResult},
};

pub const SIGNIFICANCE_LEGEND: &str =
    "Significance levels: *** p<0.001, ** p<0.01, * p<0.05, . p<0.1";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detail {
    pub label: String,
    pub value: String,
}

/// A test result ready to be shown to a person.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub title: String,
    pub method: String,
    pub statistic_label: &'static str,
    pub statistic: String,
    pub degrees_of_freedom: Option<String>,
    pub p_value: String,
    pub significance: &'static str,
    pub verdict: String,
    pub details: Vec<Detail>,
    pub caveats: Vec<String>,
}

#[must_use]
pub fn format(result: &TestResult, assumptions: &AssumptionReport) -> Report {
    Report {
        title: result.kind.name().to_owned(),
        method: result.method.clone(),
        statistic_label: result.kind.statistic_label(),
        statistic: format_number(result.statistic),
        degrees_of_freedom: result.degrees_of_freedom.as_ref().map(ToString::to_string),
        p_value: format_p_value(result.p_value),
        significance: significance_stars(result.p_value),
        verdict: verdict(result.reject_null, result.alpha),
        details: details(result),
        caveats: assumptions.warnings.iter().map(ToString::to_string).collect(),
    }
}

/// Four decimal places.
#[must_use]
pub fn format_number(value: f64) -> String {
    format!("{value:.4}")
}

/// `< 0.001`, four decimals below 0.01, three decimals otherwise.
///
/// ```
/// # use hypotest_engine::report::format_p_value;
/// assert_eq!(format_p_value(0.000_2), "< 0.001");
/// assert_eq!(format_p_value(0.004_321), "0.0043");
/// assert_eq!(format_p_value(0.5), "0.500");
/// ```
#[must_use]
pub fn format_p_value(p: f64) -> String {
    if p < 0.001 {
        "< 0.001".to_owned()
    } else if p < 0.01 {
        format!("{p:.4}")
    } else {
        format!("{p:.3}")
    }
}

#[must_use]
pub fn significance_stars(p: f64) -> &'static str {
    match p {
        p if p < 0.001 => "***",
        p if p < 0.01 => "**",
        p if p < 0.05 => "*",
        p if p < 0.1 => ".",
        _ => "",
    }
}

#[must_use]
pub fn verdict(reject_null: bool, alpha: f64) -> String {
    if reject_null {
        format!("Significant at α = {alpha} (reject H0)")
    } else {
        format!("Not significant at α = {alpha} (fail to reject H0)")
    }
}

fn details(result: &TestResult) -> Vec<Detail> {
    let mut details = vec![];
    if result.kind == TestKind::LinearRegression
        && let (Some(slope), Some(intercept)) = (result.extra("slope"), result.extra("intercept"))
    {
        let sign = if intercept < 0.0 { '-' } else { '+' };
        details.push(Detail {
            label: "Regression equation".to_owned(),
            value: format!(
                "y = {}x {sign} {}",
                format_number(slope),
                format_number(intercept.abs())
            ),
        });
    }

    if result.kind == TestKind::Spearman {
        details.push(Detail {
            label: "Correlation strength".to_owned(),
            value: correlation_strength(result.statistic).to_owned(),
        });
    }

    for extra in &result.extra {
        if let Some(prefix) = extra.name.strip_suffix("ci_upper")
            && result.extra(&format!("{prefix}ci_lower")).is_some()
        {
            continue;
        }
        if let Some(prefix) = extra.name.strip_suffix("ci_lower")
            && let Some(upper) = result.extra(&format!("{prefix}ci_upper"))
        {
            details.push(interval(prefix, extra.value, upper, result.alpha));
            continue;
        }
        details.push(Detail {
            label: label(extra.name),
            value: format_value(extra),
        });
    }
    details
}

fn interval(prefix: &str, lower: f64, upper: f64, alpha: f64) -> Detail {
    let level = (1000.0 * (1.0 - alpha)).round() / 10.0;
    let level = if level.fract() == 0.0 {
        format!("{level:.0}")
    } else {
        format!("{level:.1}")
    };
    let subject = prefix.trim_end_matches('_').replace('_', " ");
    let label = if subject.is_empty() {
        format!("{level}% CI")
    } else {
        format!("{level}% CI ({subject})")
    };
    Detail {
        label,
        value: format!("[{}, {}]", format_number(lower), format_number(upper)),
    }
}

const COUNTS: [&str; 5] = [
    "n_nonzero",
    "zero_differences",
    "total",
    "df_regression",
    "df_residual",
];

fn format_value(extra: &Extra) -> String {
    if extra.name.ends_with("p_value") {
        format_p_value(extra.value)
    } else if COUNTS.contains(&extra.name) && extra.value.fract() == 0.0 {
        format!("{:.0}", extra.value)
    } else {
        format_number(extra.value)
    }
}

fn label(name: &str) -> String {
    let known = match name {
        "mean" => "Mean",
        "hypothesized_mean" => "Hypothesized mean",
        "std_dev" => "Standard deviation",
        "std_error" => "Standard error",
        "cohens_d" => "Cohen's d",
        "mean_1" => "Mean (sample 1)",
        "mean_2" => "Mean (sample 2)",
        "median_1" => "Median (sample 1)",
        "median_2" => "Median (sample 2)",
        "variance_1" => "Variance (sample 1)",
        "variance_2" => "Variance (sample 2)",
        "std_dev_difference" => "Standard deviation of differences",
        "ss_between" => "Sum of squares (between)",
        "ss_within" => "Sum of squares (within)",
        "ms_between" => "Mean square (between)",
        "ms_within" => "Mean square (within)",
        "w_plus" => "W+",
        "w_minus" => "W-",
        "n_nonzero" => "Non-zero differences",
        "zero_differences" => "Zero differences dropped",
        "effect_size_r" => "Effect size r",
        "u1" => "U (sample 1)",
        "u2" => "U (sample 2)",
        "rank_sum_1" => "Rank sum (sample 1)",
        "rank_sum_2" => "Rank sum (sample 2)",
        "tie_correction" => "Tie correction factor",
        "total" => "Total count",
        "min_expected" => "Smallest expected count",
        "cohens_w" => "Cohen's w",
        "cramers_v" => "Cramér's V",
        "rho" => "Spearman's rho",
        "r_squared" => "R-squared",
        "adjusted_r_squared" => "Adjusted R-squared",
        "r" => "Pearson r",
        "f_statistic" => "F statistic",
        "f_p_value" => "F p-value",
        "rmse" => "Residual standard error",
        "durbin_watson" => "Durbin-Watson",
        "variance_explained" => "Variance explained (%)",
        "ss_regression" => "Sum of squares (regression)",
        "ss_residual" => "Sum of squares (residual)",
        "ss_total" => "Sum of squares (total)",
        "df_regression" => "Degrees of freedom (regression)",
        "df_residual" => "Degrees of freedom (residual)",
        "ms_regression" => "Mean square (regression)",
        "ms_residual" => "Mean square (residual)",
        "z" | "t" => name,
        _ => {
            let spaced = name.replace('_', " ");
            let mut chars = spaced.chars();
            return chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect())
                .unwrap_or_default();
        }
    };
    known.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumption::{Assumption, AssumptionWarning, Verdict};

    #[test]
    fn test_p_value_thresholds() {
        assert_eq!(format_p_value(0.0), "< 0.001");
        assert_eq!(format_p_value(0.001), "0.0010");
        assert_eq!(format_p_value(0.01), "0.010");
        assert_eq!(format_p_value(1.0), "1.000");
    }

    #[test]
    fn test_significance_stars() {
        assert_eq!(significance_stars(0.0005), "***");
        assert_eq!(significance_stars(0.005), "**");
        assert_eq!(significance_stars(0.03), "*");
        assert_eq!(significance_stars(0.07), ".");
        assert_eq!(significance_stars(0.5), "");
    }

    #[test]
    fn test_verdict_follows_decision() {
        let result = TestResult::builder(TestKind::Anova, 1.2, 0.3).build(0.1);
        let report = format(&result, &AssumptionReport::default());
        assert_eq!(report.verdict, "Not significant at α = 0.1 (fail to reject H0)");
        assert_eq!(report.statistic_label, "F");
        assert_eq!(report.degrees_of_freedom, None);
    }

    #[test]
    fn test_confidence_intervals_are_merged() {
        let result = TestResult::builder(TestKind::LinearRegression, 3.0, 0.02)
            .extras([
                ("slope", 1.5),
                ("intercept", -0.25),
                ("slope_ci_lower", 0.5),
                ("slope_ci_upper", 2.5),
            ])
            .build(0.01);
        let report = format(&result, &AssumptionReport::default());
        let labels = report
            .details
            .iter()
            .map(|d| d.label.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            labels,
            vec!["Regression equation", "Slope", "Intercept", "99% CI (slope)"]
        );
        assert_eq!(report.details[0].value, "y = 1.5000x - 0.2500");
        assert_eq!(report.details[3].value, "[0.5000, 2.5000]");
    }

    #[test]
    fn test_counts_and_p_values_in_details() {
        let result = TestResult::builder(TestKind::WilcoxonPaired, 4.0, 0.2)
            .extras([("zero_differences", 2.0), ("f_p_value", 0.000_01)])
            .build(0.05);
        let report = format(&result, &AssumptionReport::default());
        assert_eq!(report.details[0].value, "2");
        assert_eq!(report.details[1].value, "< 0.001");
    }

    #[test]
    fn test_spearman_strength_detail() {
        let result = TestResult::builder(TestKind::Spearman, -0.42, 0.03)
            .extras([("rho", -0.42), ("ci_lower", -0.7), ("ci_upper", -0.05)])
            .build(0.05);
        let report = format(&result, &AssumptionReport::default());
        assert_eq!(report.details[0].label, "Correlation strength");
        assert_eq!(report.details[0].value, "moderate");
        assert_eq!(report.details[1].label, "Spearman's rho");
        assert_eq!(report.details[2].label, "95% CI");
    }

    #[test]
    fn test_regression_anova_details() {
        let result = TestResult::builder(TestKind::LinearRegression, 2.12, 0.12)
            .extras([
                ("variance_explained", 60.0),
                ("ss_regression", 3.6),
                ("df_residual", 3.0),
            ])
            .build(0.05);
        let report = format(&result, &AssumptionReport::default());
        let details = report
            .details
            .iter()
            .map(|d| (d.label.as_str(), d.value.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            details,
            vec![
                ("Variance explained (%)", "60.0000"),
                ("Sum of squares (regression)", "3.6000"),
                ("Degrees of freedom (residual)", "3"),
            ]
        );
    }

    #[test]
    fn test_caveats_come_from_warnings() {
        let assumptions = AssumptionReport {
            warnings: vec![AssumptionWarning {
                assumption: Assumption::Independence,
                verdict: Verdict::Unverifiable,
                explanation: "cannot be checked".to_owned(),
            }],
        };
        let result = TestResult::builder(TestKind::MannWhitney, 3.0, 0.5).build(0.05);
        let report = format(&result, &assumptions);
        assert_eq!(
            report.caveats,
            vec!["independence (unverifiable): cannot be checked"]
        );
    }
}
