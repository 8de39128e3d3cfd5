//! Association between two paired variables: Spearman's rank correlation
//! and simple linear regression.

use hypotest_stats::{
    descriptive::{is_constant, pearson},
    fit::LineFit,
    rank::Ranking,
};

use crate::{
    catalogue::{TestKind, TestSpec},
    distribution::{normal_quantile, student_t_quantile, student_t_two_tailed},
    error::DegenerateInput,
    procedures::upper_quantile,
    result::TestResult,
};

/// Verbal strength of a correlation coefficient, judged on `|r|`.
///
/// ```
/// # use hypotest_engine::procedures::correlation::correlation_strength;
/// assert_eq!(correlation_strength(-0.05), "negligible");
/// assert_eq!(correlation_strength(0.45), "moderate");
/// assert_eq!(correlation_strength(-0.9), "very strong");
/// ```
#[must_use]
pub fn correlation_strength(r: f64) -> &'static str {
    match r.abs() {
        a if a < 0.1 => "negligible",
        a if a < 0.3 => "weak",
        a if a < 0.5 => "moderate",
        a if a < 0.7 => "strong",
        _ => "very strong",
    }
}

/// Spearman's rank correlation with a t-approximation for its p-value.
///
/// A perfect monotone relation (`|ρ| = 1`) has p-value 0.
#[expect(clippy::cast_precision_loss)]
pub fn spearman(spec: &TestSpec, x: &[f64], y: &[f64]) -> Result<TestResult, DegenerateInput> {
    if is_constant(x) || is_constant(y) {
        return Err(DegenerateInput::new(
            "a constant variable has no rank correlation",
        ));
    }
    let n = x.len();
    if n < 3 || y.len() != n {
        return Err(DegenerateInput::new("at least 3 complete pairs are required"));
    }
    let x_ranks = Ranking::new(x).into_ranks();
    let y_ranks = Ranking::new(y).into_ranks();
    let rho = pearson(&x_ranks, &y_ranks)
        .ok_or_else(|| DegenerateInput::new("rank correlation is undefined"))?;

    let nf = n as f64;
    let df = nf - 2.0;
    let (t, p) = if rho.abs() >= 1.0 {
        (f64::INFINITY.copysign(rho), 0.0)
    } else {
        let t = rho * (df / (1.0 - rho * rho)).sqrt();
        (t, student_t_two_tailed(t, df)?)
    };

    let mut builder = TestResult::builder(TestKind::Spearman, rho, p)
        .df(df)
        .method("t approximation")
        .extras([("rho", rho), ("t", t)]);
    if n > 3 && rho.abs() < 1.0 {
        // Fisher z-transform interval
        let z = rho.atanh();
        let margin = normal_quantile(upper_quantile(spec))? / (nf - 3.0).sqrt();
        builder = builder.extras([
            ("ci_lower", (z - margin).tanh()),
            ("ci_upper", (z + margin).tanh()),
        ]);
    }
    Ok(builder.build(spec.config.alpha))
}

/// Least-squares regression of `y` on `x` with a t-test on the slope.
///
/// Beyond the coefficients, the result carries the regression ANOVA table
/// and, for more than 10 points, a Fisher z interval for R².
#[expect(clippy::cast_precision_loss)]
pub fn linear_regression(
    spec: &TestSpec,
    x: &[f64],
    y: &[f64],
) -> Result<TestResult, DegenerateInput> {
    if is_constant(x) {
        return Err(DegenerateInput::new(
            "x is constant, the regression is singular",
        ));
    }
    if is_constant(y) {
        return Err(DegenerateInput::new(
            "y is constant, the coefficient of determination is undefined",
        ));
    }
    let fit = LineFit::new(x, y)
        .ok_or_else(|| DegenerateInput::new("x and y must be paired observations"))?;
    if fit.n < 3 {
        return Err(DegenerateInput::new("at least 3 points are required"));
    }
    let r_squared = fit
        .r_squared()
        .ok_or_else(|| DegenerateInput::new("y has no variation"))?;

    let n = fit.n as f64;
    let df = n - 2.0;
    let mse = fit.ss_residual / df;
    let slope_se = (mse / fit.sxx).sqrt();
    let intercept_se = (mse * (1.0 / n + fit.mean_x.powi(2) / fit.sxx)).sqrt();
    let (t, p) = if slope_se > 0.0 {
        let t = fit.slope / slope_se;
        (t, student_t_two_tailed(t, df)?)
    } else {
        // Zero residual: every point lies on the line
        (f64::INFINITY.copysign(fit.slope), 0.0)
    };
    let margin = student_t_quantile(upper_quantile(spec), df)? * slope_se;
    let r = (fit.sxy / (fit.sxx * fit.syy).sqrt()).clamp(-1.0, 1.0);
    let ss_regression = fit.syy - fit.ss_residual;

    let mut builder = TestResult::builder(TestKind::LinearRegression, t, p)
        .df(df)
        .method("ordinary least squares")
        .extras([
            ("slope", fit.slope),
            ("intercept", fit.intercept),
            ("r_squared", r_squared),
            ("adjusted_r_squared", 1.0 - (1.0 - r_squared) * (n - 1.0) / df),
            ("r", r),
            ("variance_explained", 100.0 * r_squared),
            ("slope_std_error", slope_se),
            ("intercept_std_error", intercept_se),
            ("f_statistic", t * t),
            ("f_p_value", p),
            ("rmse", mse.sqrt()),
            ("slope_ci_lower", fit.slope - margin),
            ("slope_ci_upper", fit.slope + margin),
            ("ss_regression", ss_regression),
            ("ss_residual", fit.ss_residual),
            ("ss_total", fit.syy),
            ("df_regression", 1.0),
            ("df_residual", df),
            ("ms_regression", ss_regression),
            ("ms_residual", mse),
        ]);
    if fit.n > 10 && r_squared > 0.0 && r.abs() < 1.0 {
        // Interval on |r| through Fisher's z, squared; a lower bound below
        // zero is clamped since R² cannot be negative
        let z = r.abs().atanh();
        let margin = normal_quantile(upper_quantile(spec))? / (n - 3.0).sqrt();
        builder = builder.extras([
            ("r_squared_ci_lower", (z - margin).tanh().max(0.0).powi(2)),
            ("r_squared_ci_upper", (z + margin).tanh().powi(2)),
        ]);
    }
    if fit.ss_residual > 0.0 {
        let residuals = fit.residuals(x, y);
        let successive = residuals
            .windows(2)
            .map(|w| (w[1] - w[0]).powi(2))
            .sum::<f64>();
        builder = builder.extra("durbin_watson", successive / fit.ss_residual);
    }
    Ok(builder.build(spec.config.alpha))
}
