//! Reference distributions used to turn statistics into p-values
//!
//! Thin wrappers over `statrs` that reject invalid degrees of freedom as
//! [`DegenerateInput`] instead of panicking or yielding `NaN`.

use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, Normal, StudentsT};

use crate::error::DegenerateInput;

fn student_t(df: f64) -> Result<StudentsT, DegenerateInput> {
    StudentsT::new(0.0, 1.0, df)
        .map_err(|e| DegenerateInput::new(format!("invalid t distribution (df = {df}): {e}")))
}

fn fisher_snedecor(df1: f64, df2: f64) -> Result<FisherSnedecor, DegenerateInput> {
    FisherSnedecor::new(df1, df2).map_err(|e| {
        DegenerateInput::new(format!("invalid F distribution (df = {df1}, {df2}): {e}"))
    })
}

fn standard_normal() -> Result<Normal, DegenerateInput> {
    Normal::new(0.0, 1.0).map_err(|e| DegenerateInput::new(e.to_string()))
}

/// Two-tailed p-value `2 * P(T > |t|)`.
///
/// Infinite `t` yields `0`.
pub fn student_t_two_tailed(t: f64, df: f64) -> Result<f64, DegenerateInput> {
    let dist = student_t(df)?;
    if t.is_infinite() {
        return Ok(0.0);
    }
    Ok((2.0 * dist.sf(t.abs())).min(1.0))
}

/// Quantile of the t distribution, used for confidence intervals.
pub fn student_t_quantile(probability: f64, df: f64) -> Result<f64, DegenerateInput> {
    Ok(student_t(df)?.inverse_cdf(probability))
}

/// Upper tail `P(F > f)`.
pub fn f_sf(f: f64, df1: f64, df2: f64) -> Result<f64, DegenerateInput> {
    let dist = fisher_snedecor(df1, df2)?;
    if f.is_infinite() {
        return Ok(0.0);
    }
    Ok(dist.sf(f))
}

pub fn f_quantile(probability: f64, df1: f64, df2: f64) -> Result<f64, DegenerateInput> {
    Ok(fisher_snedecor(df1, df2)?.inverse_cdf(probability))
}

/// Upper tail `P(X > x)` of a chi-square variable with `df` degrees of freedom.
pub fn chi_squared_sf(x: f64, df: f64) -> Result<f64, DegenerateInput> {
    let dist = ChiSquared::new(df).map_err(|e| {
        DegenerateInput::new(format!("invalid chi-square distribution (df = {df}): {e}"))
    })?;
    Ok(dist.sf(x.max(0.0)))
}

/// Two-tailed p-value of a standard normal score.
pub fn normal_two_tailed(z: f64) -> Result<f64, DegenerateInput> {
    Ok((2.0 * standard_normal()?.sf(z.abs())).min(1.0))
}

pub fn normal_quantile(probability: f64) -> Result<f64, DegenerateInput> {
    Ok(standard_normal()?.inverse_cdf(probability))
}
