//! Input validation run before any assumption check or computation
//!
//! Checks are applied in a fixed order: non-empty sequences, arity, the
//! minimums of the selected test, then finiteness of values and options.
//! Every problem found is reported; inputs are never modified.

use crate::{
    catalogue::{Arity, TestKind, TestSpec},
    error::InputError,
};

/// Reasons an input was refused, empty when it can be computed on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub errors: Vec<String>,
}

impl ValidationResult {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_result(self) -> Result<(), InputError> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(InputError {
                reasons: self.errors,
            })
        }
    }

    fn push(&mut self, reason: impl Into<String>) {
        self.errors.push(reason.into());
    }
}

/// Relative tolerance for comparing observed and expected totals.
const TOTAL_TOLERANCE: f64 = 1e-8;

/// Validates `samples` for the test described by `spec`.
///
/// For the association test each sample is one row of the contingency
/// table; for the goodness-of-fit test the single sample holds the observed
/// counts and the expected counts come from the test parameters.
///
/// ```
/// # use hypotest_engine::{catalogue::{TestKind, TestSpec}, validate::validate};
/// let spec = TestSpec::new(TestKind::TPaired);
/// assert!(validate(&spec, &[&[1.0, 2.0], &[3.0, 4.0]]).is_ok());
///
/// let result = validate(&spec, &[&[1.0, 2.0], &[3.0]]);
/// assert_eq!(result.errors, vec!["paired samples must have the same length (2 and 1)"]);
/// ```
#[must_use]
pub fn validate(spec: &TestSpec, samples: &[&[f64]]) -> ValidationResult {
    let mut result = ValidationResult::default();

    for (idx, sample) in samples.iter().enumerate() {
        if sample.is_empty() {
            result.push(format!("sample {} is empty", idx + 1));
        }
    }

    check_arity(spec, samples, &mut result);
    if result.is_ok() {
        check_minimums(spec, samples, &mut result);
    }

    if samples.iter().any(|s| s.iter().any(|v| !v.is_finite())) {
        result.push("all values must be finite numbers");
    }
    if let Some(expected) = &spec.params.expected
        && expected.iter().any(|v| !v.is_finite())
    {
        result.push("all expected frequencies must be finite numbers");
    }
    let alpha = spec.config.alpha;
    if alpha.is_nan() || alpha <= 0.0 || alpha >= 1.0 {
        result.push(format!("alpha must lie strictly between 0 and 1, got {alpha}"));
    }
    if !spec.hypothesized_value().is_finite() {
        result.push("hypothesized value must be a finite number");
    }

    result
}

fn check_arity(spec: &TestSpec, samples: &[&[f64]], result: &mut ValidationResult) {
    let count = samples.len();
    match spec.arity() {
        Arity::OneSample if count != 1 => {
            result.push(format!("{} requires exactly one sample, got {count}", spec.kind));
        }
        Arity::TwoSampleIndependent | Arity::TwoSamplePaired if count != 2 => {
            result.push(format!("{} requires exactly two samples, got {count}", spec.kind));
        }
        Arity::TwoSamplePaired if samples[0].len() != samples[1].len() => {
            result.push(format!(
                "paired samples must have the same length ({} and {})",
                samples[0].len(),
                samples[1].len()
            ));
        }
        Arity::KSample if count < 2 => {
            let what = if spec.kind == TestKind::ChiSquareAssociation {
                "table rows"
            } else {
                "groups"
            };
            result.push(format!(
                "{} requires at least two {what}, got {count}",
                spec.kind
            ));
        }
        _ => {}
    }

    if spec.kind == TestKind::ChiSquareGoodnessOfFit
        && let (Some(expected), [observed]) = (&spec.params.expected, samples)
        && expected.len() != observed.len()
    {
        result.push(format!(
            "expected frequencies must match the number of categories ({} and {})",
            expected.len(),
            observed.len()
        ));
    }
}

fn check_minimums(spec: &TestSpec, samples: &[&[f64]], result: &mut ValidationResult) {
    match spec.kind {
        TestKind::WilcoxonOneSample | TestKind::WilcoxonPaired | TestKind::MannWhitney => {}
        TestKind::TOneSample | TestKind::TPaired => {
            require_each(samples, 2, "observations", result);
        }
        TestKind::TTwoSample | TestKind::FTest | TestKind::Anova | TestKind::KruskalWallis => {
            require_each(samples, 2, "observations per group", result);
        }
        TestKind::Spearman | TestKind::LinearRegression => {
            require_each(samples, 3, "pairs", result);
        }
        TestKind::ChiSquareGoodnessOfFit => check_goodness_of_fit(spec, samples[0], result),
        TestKind::ChiSquareAssociation => check_contingency_table(samples, result),
    }
}

fn require_each(samples: &[&[f64]], min: usize, what: &str, result: &mut ValidationResult) {
    if let Some(sample) = samples.iter().find(|s| s.len() < min) {
        result.push(format!("at least {min} {what} required, got {}", sample.len()));
    }
}

fn check_goodness_of_fit(spec: &TestSpec, observed: &[f64], result: &mut ValidationResult) {
    if observed.len() < 2 {
        result.push("at least 2 categories required");
    }
    if observed.iter().any(|&v| v < 0.0) {
        result.push("observed frequencies must not be negative");
    }
    let Some(expected) = &spec.params.expected else {
        return;
    };
    if expected.iter().any(|&v| v < 0.0) {
        result.push("expected frequencies must not be negative");
    }
    let observed_total = observed.iter().sum::<f64>();
    let expected_total = expected.iter().sum::<f64>();
    let scale = observed_total.abs().max(expected_total.abs()).max(1.0);
    if (observed_total - expected_total).abs() > TOTAL_TOLERANCE * scale {
        result.push(format!(
            "observed total ({observed_total}) and expected total ({expected_total}) must agree"
        ));
    }
}

fn check_contingency_table(rows: &[&[f64]], result: &mut ValidationResult) {
    let columns = rows[0].len();
    if rows.iter().any(|row| row.len() != columns) {
        result.push("all rows of the contingency table must have the same length");
    } else if columns < 2 {
        result.push("contingency table needs at least 2 columns");
    }
    if rows.iter().any(|row| row.iter().any(|&v| v < 0.0)) {
        result.push("contingency table counts must not be negative");
    }
}
