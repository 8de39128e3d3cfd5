//! The thirteen test procedures
//!
//! Every procedure is a pure function of validated samples and the test
//! options. Statistics that are mathematically undefined for the data are
//! reported as [`DegenerateInput`](crate::error::DegenerateInput).

pub mod chi_square;
pub mod correlation;
pub mod parametric;
pub mod rank;

use crate::{
    catalogue::{TestKind, TestSpec},
    error::{EngineError, InputError},
    result::TestResult,
};

/// Runs the procedure selected by `spec` on `samples`.
///
/// `samples` are expected to have passed validation. A sample count that
/// does not fit the test is still refused as an input error, and samples of
/// the wrong shape (ragged tables, unequal pairs) as degenerate input.
///
/// ```
/// # use hypotest_engine::{catalogue::{TestKind, TestSpec}, procedures::compute};
/// let result = compute(&TestSpec::new(TestKind::TOneSample), &[&[1.0, 2.0, 3.0]]).unwrap();
/// assert_eq!(result.degrees_of_freedom.unwrap().to_string(), "2");
/// assert!(result.reject_null == (result.p_value < 0.05));
/// ```
pub fn compute(spec: &TestSpec, samples: &[&[f64]]) -> Result<TestResult, EngineError> {
    let result = match (spec.kind, samples) {
        (TestKind::WilcoxonOneSample | TestKind::WilcoxonPaired, _) => {
            let differences = rank::signed_differences(spec, samples)
                .ok_or_else(|| arity_error(spec, samples))?;
            rank::wilcoxon(spec, &differences)?
        }
        (TestKind::TOneSample, [x]) => parametric::one_sample_t(spec, x)?,
        (TestKind::TTwoSample, [a, b]) => parametric::two_sample_t(spec, a, b)?,
        (TestKind::TPaired, [a, b]) => parametric::paired_t(spec, a, b)?,
        (TestKind::FTest, [a, b]) => parametric::f_test(spec, a, b)?,
        (TestKind::Anova, groups) if groups.len() >= 2 => parametric::anova(spec, groups)?,
        (TestKind::MannWhitney, [a, b]) => rank::mann_whitney(spec, a, b)?,
        (TestKind::KruskalWallis, groups) if groups.len() >= 2 => {
            rank::kruskal_wallis(spec, groups)?
        }
        (TestKind::ChiSquareGoodnessOfFit, [observed]) => {
            chi_square::goodness_of_fit(spec, observed)?
        }
        (TestKind::ChiSquareAssociation, rows) if rows.len() >= 2 => {
            chi_square::association(spec, rows)?
        }
        (TestKind::Spearman, [x, y]) => correlation::spearman(spec, x, y)?,
        (TestKind::LinearRegression, [x, y]) => correlation::linear_regression(spec, x, y)?,
        _ => return Err(arity_error(spec, samples).into()),
    };
    Ok(result)
}

fn arity_error(spec: &TestSpec, samples: &[&[f64]]) -> InputError {
    InputError {
        reasons: vec![format!(
            "{} expects {}, got {} sample(s)",
            spec.kind,
            spec.arity(),
            samples.len()
        )],
    }
}

/// Two-sided critical quantile probability `1 - alpha / 2`.
pub(crate) fn upper_quantile(spec: &TestSpec) -> f64 {
    1.0 - spec.config.alpha / 2.0
}
