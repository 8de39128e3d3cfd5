use std::fmt;

use serde::Serialize;

use crate::catalogue::TestKind;

/// Degrees of freedom of the reference distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Dof {
    Single(f64),
    /// Numerator and denominator degrees of freedom of an F distribution.
    Pair(f64, f64),
}

impl fmt::Display for Dof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(df) => write_df(f, *df),
            Self::Pair(df1, df2) => {
                write_df(f, *df1)?;
                f.write_str(", ")?;
                write_df(f, *df2)
            }
        }
    }
}

// Integral degrees of freedom print without decimals, Welch's with two.
fn write_df(f: &mut fmt::Formatter<'_>, df: f64) -> fmt::Result {
    if df.fract() == 0.0 {
        write!(f, "{df:.0}")
    } else {
        write!(f, "{df:.2}")
    }
}

/// A named auxiliary value of a result (effect size, interval bound, ...).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extra {
    pub name: &'static str,
    pub value: f64,
}

/// Outcome of one test procedure.
///
/// `p_value` always lies in `[0, 1]` and `reject_null` is exactly
/// `p_value < alpha`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    pub kind: TestKind,
    pub statistic: f64,
    pub degrees_of_freedom: Option<Dof>,
    pub p_value: f64,
    pub alpha: f64,
    pub reject_null: bool,
    /// Variant actually computed, e.g. "Welch" or "exact".
    pub method: String,
    pub extra: Vec<Extra>,
}

impl TestResult {
    #[must_use]
    pub fn builder(kind: TestKind, statistic: f64, p_value: f64) -> TestResultBuilder {
        TestResultBuilder {
            kind,
            statistic,
            p_value,
            degrees_of_freedom: None,
            method: String::new(),
            extra: vec![],
        }
    }

    /// Looks up an auxiliary value by name.
    #[must_use]
    pub fn extra(&self, name: &str) -> Option<f64> {
        self.extra.iter().find(|e| e.name == name).map(|e| e.value)
    }
}

#[derive(Debug, Clone)]
pub struct TestResultBuilder {
    kind: TestKind,
    statistic: f64,
    p_value: f64,
    degrees_of_freedom: Option<Dof>,
    method: String,
    extra: Vec<Extra>,
}

impl TestResultBuilder {
    #[must_use]
    pub fn df(mut self, df: f64) -> Self {
        self.degrees_of_freedom = Some(Dof::Single(df));
        self
    }

    #[must_use]
    pub fn df_pair(mut self, df1: f64, df2: f64) -> Self {
        self.degrees_of_freedom = Some(Dof::Pair(df1, df2));
        self
    }

    #[must_use]
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    #[must_use]
    pub fn extra(mut self, name: &'static str, value: f64) -> Self {
        self.extra.push(Extra { name, value });
        self
    }

    #[must_use]
    pub fn extras<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, f64)>,
    {
        self.extra
            .extend(values.into_iter().map(|(name, value)| Extra { name, value }));
        self
    }

    /// Finishes the result, clamping the p-value and deciding on the null
    /// hypothesis at `alpha`.
    #[must_use]
    pub fn build(self, alpha: f64) -> TestResult {
        let p_value = if self.p_value.is_nan() {
            1.0
        } else {
            self.p_value.clamp(0.0, 1.0)
        };
        TestResult {
            kind: self.kind,
            statistic: self.statistic,
            degrees_of_freedom: self.degrees_of_freedom,
            p_value,
            alpha,
            reject_null: p_value < alpha,
            method: self.method,
            extra: self.extra,
        }
    }
}
