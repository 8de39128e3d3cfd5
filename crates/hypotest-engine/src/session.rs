//! One interactive session: a dataset store plus the test pipeline
//!
//! Every run goes through the same stages: validation, assumption checks,
//! the test procedure and finally formatting. A failure at any stage ends
//! that run only; the session and its datasets are untouched.

use serde::{Deserialize, Serialize};

use crate::{
    assumption::{self, AssumptionReport},
    catalogue::{TestConfig, TestKind, TestParams, TestSpec},
    dataset::DatasetStore,
    error::EngineError,
    procedures,
    report::{self, Report},
    result::TestResult,
    validate::validate,
};

/// A test to run over datasets held by the session, in the given order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRequest {
    pub kind: TestKind,
    pub datasets: Vec<String>,
    #[serde(default)]
    pub params: TestParams,
    #[serde(default)]
    pub config: TestConfig,
}

impl TestRequest {
    #[must_use]
    pub fn new<I, S>(kind: TestKind, datasets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind,
            datasets: datasets.into_iter().map(Into::into).collect(),
            params: TestParams::default(),
            config: TestConfig::default(),
        }
    }

    #[must_use]
    pub fn spec(&self) -> TestSpec {
        TestSpec::new(self.kind)
            .with_params(self.params.clone())
            .with_config(self.config)
    }
}

/// Everything produced by a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub result: TestResult,
    pub assumptions: AssumptionReport,
    pub report: Report,
}

/// Owns the datasets of one user session.
///
/// # Examples
///
/// ```
/// use hypotest_engine::{
///     catalogue::TestKind,
///     session::{Session, TestRequest},
/// };
///
/// let mut session = Session::new();
/// session.store_mut().add("x", vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// session.store_mut().add("y", vec![2.0, 4.0, 5.0, 4.0, 5.0]).unwrap();
///
/// let outcome = session
///     .run(&TestRequest::new(TestKind::LinearRegression, ["x", "y"]))
///     .unwrap();
/// assert_eq!(outcome.report.title, "Linear Regression Analysis");
/// assert!(!outcome.result.reject_null);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    store: DatasetStore,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut DatasetStore {
        &mut self.store
    }

    /// Runs a test over named datasets of this session.
    pub fn run(&self, request: &TestRequest) -> Result<Outcome, EngineError> {
        let samples = request
            .datasets
            .iter()
            .map(|name| self.store.get(name).map(|dataset| dataset.values()))
            .collect::<Result<Vec<_>, _>>()?;
        run_values(&request.spec(), &samples)
    }
}

/// Runs a test over raw samples, without a session.
pub fn run_values(spec: &TestSpec, samples: &[&[f64]]) -> Result<Outcome, EngineError> {
    validate(spec, samples).into_result()?;
    let assumptions = assumption::check(spec, samples);
    let result = procedures::compute(spec, samples)?;
    let report = report::format(&result, &assumptions);
    Ok(Outcome {
        result,
        assumptions,
        report,
    })
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use super::*;
    use crate::catalogue::Arity;

    fn counts(len: usize) -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec((0_i32..20).prop_map(f64::from), len)
    }

    fn paired_counts() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
        (3_usize..12).prop_flat_map(|len| (counts(len), counts(len)))
    }

    fn measurements() -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec(-1e3_f64..1e3, 3..15)
    }

    fn samples_for<'a>(kind: TestKind, a: &'a [f64], b: &'a [f64]) -> Vec<&'a [f64]> {
        match kind.arity() {
            Arity::OneSample => vec![a],
            _ => vec![a, b],
        }
    }

    fn reversed(values: &[f64]) -> Vec<f64> {
        values.iter().rev().copied().collect()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn p_value_is_a_probability(
            (a, b) in paired_counts(),
            alpha in 0.001_f64..0.5,
        ) {
            for kind in TestKind::ALL {
                let spec = TestSpec::new(kind).with_alpha(alpha);
                if let Ok(outcome) = run_values(&spec, &samples_for(kind, &a, &b)) {
                    let result = outcome.result;
                    prop_assert!((0.0..=1.0).contains(&result.p_value), "{kind}: {}", result.p_value);
                    prop_assert_eq!(result.reject_null, result.p_value < alpha);
                }
            }
        }

        #[test]
        fn reordering_observations_changes_nothing((a, b) in paired_counts()) {
            let (a_rev, b_rev) = (reversed(&a), reversed(&b));
            for kind in TestKind::ALL {
                let spec = TestSpec::new(kind);
                let forward = run_values(&spec, &samples_for(kind, &a, &b));
                let backward = run_values(&spec, &samples_for(kind, &a_rev, &b_rev));
                match (forward, backward) {
                    (Ok(forward), Ok(backward)) => {
                        let (f, r) = (forward.result, backward.result);
                        prop_assert!((f.p_value - r.p_value).abs() < 1e-9, "{kind}");
                        prop_assert!(
                            f.statistic == r.statistic
                                || (f.statistic - r.statistic).abs()
                                    <= 1e-9 * f.statistic.abs().max(1.0),
                            "{kind}"
                        );
                    }
                    (Err(_), Err(_)) => {}
                    (forward, backward) => {
                        prop_assert!(false, "{kind}: {forward:?} vs {backward:?}");
                    }
                }
            }
        }

        #[test]
        fn two_sample_t_is_antisymmetric(a in measurements(), b in measurements()) {
            let spec = TestSpec::new(TestKind::TTwoSample);
            let forward = run_values(&spec, &[&a, &b]);
            let swapped = run_values(&spec, &[&b, &a]);
            if let (Ok(forward), Ok(swapped)) = (forward, swapped) {
                let (f, s) = (forward.result, swapped.result);
                prop_assert!((f.statistic + s.statistic).abs() <= 1e-9 * f.statistic.abs().max(1.0));
                prop_assert!((f.p_value - s.p_value).abs() < 1e-9);
                prop_assert_eq!(f.method, s.method);
            }
        }

        #[test]
        fn mann_whitney_swaps_u((a, b) in paired_counts()) {
            let spec = TestSpec::new(TestKind::MannWhitney);
            let forward = run_values(&spec, &[&a, &b]);
            let swapped = run_values(&spec, &[&b, &a]);
            if let (Ok(forward), Ok(swapped)) = (forward, swapped) {
                let (f, s) = (forward.result, swapped.result);
                prop_assert_eq!(f.extra("u1"), s.extra("u2"));
                prop_assert!((f.p_value - s.p_value).abs() < 1e-9);
            }
        }
    }
}
