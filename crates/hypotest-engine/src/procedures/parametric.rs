//! Tests built on normal-theory sampling distributions: the t-tests, the
//! F-test for two variances and one-way ANOVA.

use hypotest_stats::{
    anova::OneWay,
    descriptive::{DescriptiveStats, is_constant},
};

use crate::{
    assumption,
    catalogue::{TestKind, TestSpec},
    distribution::{f_quantile, f_sf, student_t_quantile, student_t_two_tailed},
    error::DegenerateInput,
    procedures::upper_quantile,
    result::TestResult,
};

fn describe(values: &[f64]) -> Result<DescriptiveStats, DegenerateInput> {
    DescriptiveStats::new(values.iter().copied())
        .ok_or_else(|| DegenerateInput::new("sample is empty"))
}

/// Student's t-test of `mean(x) = μ₀`.
#[expect(clippy::cast_precision_loss)]
pub fn one_sample_t(spec: &TestSpec, x: &[f64]) -> Result<TestResult, DegenerateInput> {
    if is_constant(x) {
        return Err(DegenerateInput::new(
            "sample has zero variance, the t statistic is undefined",
        ));
    }
    let stats = describe(x)?;
    let mu0 = spec.hypothesized_value();
    let n = stats.count as f64;
    let df = n - 1.0;
    let std_error = stats.std_dev / n.sqrt();
    let t = (stats.mean - mu0) / std_error;
    let p = student_t_two_tailed(t, df)?;
    let margin = student_t_quantile(upper_quantile(spec), df)? * std_error;

    Ok(TestResult::builder(TestKind::TOneSample, t, p)
        .df(df)
        .method("Student")
        .extras([
            ("mean", stats.mean),
            ("hypothesized_mean", mu0),
            ("std_dev", stats.std_dev),
            ("std_error", std_error),
            ("cohens_d", (stats.mean - mu0) / stats.std_dev),
            ("ci_lower", stats.mean - margin),
            ("ci_upper", stats.mean + margin),
        ])
        .build(spec.config.alpha))
}

/// Two-sample t-test of `mean(a) = mean(b)`.
///
/// Uses the pooled variance when equal variances are assumed and Welch's
/// unequal-variance statistic otherwise. Without an explicit choice the
/// equal-variance check decides.
#[expect(clippy::cast_precision_loss)]
pub fn two_sample_t(spec: &TestSpec, a: &[f64], b: &[f64]) -> Result<TestResult, DegenerateInput> {
    if is_constant(a) && is_constant(b) {
        return Err(DegenerateInput::new(
            "both samples have zero variance, the t statistic is undefined",
        ));
    }
    let pooled = spec
        .config
        .equal_variance_assumed
        .unwrap_or_else(|| assumption::equal_variance(&[a, b]).equal);

    let sa = describe(a)?;
    let sb = describe(b)?;
    let (n1, n2) = (sa.count as f64, sb.count as f64);
    let difference = sa.mean - sb.mean;
    let pooled_variance =
        ((n1 - 1.0) * sa.variance + (n2 - 1.0) * sb.variance) / (n1 + n2 - 2.0);

    let (std_error, df, method) = if pooled {
        let std_error = (pooled_variance * (1.0 / n1 + 1.0 / n2)).sqrt();
        (std_error, n1 + n2 - 2.0, "pooled variance")
    } else {
        let va = sa.variance / n1;
        let vb = sb.variance / n2;
        let df = (va + vb).powi(2) / (va.powi(2) / (n1 - 1.0) + vb.powi(2) / (n2 - 1.0));
        ((va + vb).sqrt(), df, "Welch")
    };
    let t = difference / std_error;
    let p = student_t_two_tailed(t, df)?;
    let margin = student_t_quantile(upper_quantile(spec), df)? * std_error;

    Ok(TestResult::builder(TestKind::TTwoSample, t, p)
        .df(df)
        .method(method)
        .extras([
            ("mean_1", sa.mean),
            ("mean_2", sb.mean),
            ("mean_difference", difference),
            ("std_error", std_error),
            ("cohens_d", difference / pooled_variance.sqrt()),
            ("ci_lower", difference - margin),
            ("ci_upper", difference + margin),
        ])
        .build(spec.config.alpha))
}

/// Paired t-test on the differences `a - b`.
///
/// Identical sequences, or any pair of sequences whose differences are all
/// equal, are refused as degenerate.
#[expect(clippy::cast_precision_loss)]
pub fn paired_t(spec: &TestSpec, a: &[f64], b: &[f64]) -> Result<TestResult, DegenerateInput> {
    if a.len() != b.len() {
        return Err(DegenerateInput::new(format!(
            "paired samples differ in length ({} and {})",
            a.len(),
            b.len()
        )));
    }
    let differences = a.iter().zip(b).map(|(a, b)| a - b).collect::<Vec<_>>();
    if is_constant(&differences) {
        return Err(DegenerateInput::new(
            "paired differences have zero variance, the t statistic is undefined",
        ));
    }
    let stats = describe(&differences)?;
    let n = stats.count as f64;
    let df = n - 1.0;
    let std_error = stats.std_dev / n.sqrt();
    let t = stats.mean / std_error;
    let p = student_t_two_tailed(t, df)?;
    let margin = student_t_quantile(upper_quantile(spec), df)? * std_error;

    Ok(TestResult::builder(TestKind::TPaired, t, p)
        .df(df)
        .method("paired differences")
        .extras([
            ("mean_difference", stats.mean),
            ("std_dev_difference", stats.std_dev),
            ("std_error", std_error),
            ("cohens_d", stats.mean / stats.std_dev),
            ("ci_lower", stats.mean - margin),
            ("ci_upper", stats.mean + margin),
        ])
        .build(spec.config.alpha))
}

/// F-test of equal variances, larger sample variance over smaller.
#[expect(clippy::cast_precision_loss)]
pub fn f_test(spec: &TestSpec, a: &[f64], b: &[f64]) -> Result<TestResult, DegenerateInput> {
    let sa = describe(a)?;
    let sb = describe(b)?;
    let ((larger, n_larger), (smaller, n_smaller, smaller_values)) = if sa.variance >= sb.variance
    {
        ((sa.variance, sa.count), (sb.variance, sb.count, b))
    } else {
        ((sb.variance, sb.count), (sa.variance, sa.count, a))
    };
    if is_constant(smaller_values) {
        return Err(DegenerateInput::new(
            "the smaller variance is zero, the variance ratio is undefined",
        ));
    }
    let df1 = (n_larger - 1) as f64;
    let df2 = (n_smaller - 1) as f64;
    let f = larger / smaller;
    let p = (2.0 * f_sf(f, df1, df2)?).min(1.0);
    let alpha = spec.config.alpha;
    let ci_lower = f / f_quantile(1.0 - alpha / 2.0, df1, df2)?;
    let ci_upper = f / f_quantile(alpha / 2.0, df1, df2)?;

    Ok(TestResult::builder(TestKind::FTest, f, p)
        .df_pair(df1, df2)
        .method("larger over smaller variance")
        .extras([
            ("variance_1", sa.variance),
            ("variance_2", sb.variance),
            ("ratio_ci_lower", ci_lower),
            ("ratio_ci_upper", ci_upper),
        ])
        .build(alpha))
}

/// One-way analysis of variance across two or more groups.
#[expect(clippy::cast_precision_loss)]
pub fn anova(spec: &TestSpec, groups: &[&[f64]]) -> Result<TestResult, DegenerateInput> {
    let layout = OneWay::new(groups)
        .ok_or_else(|| DegenerateInput::new("no within-group degrees of freedom"))?;
    let f = layout.f_ratio().ok_or_else(|| {
        DegenerateInput::new("no variation within groups, the F statistic is undefined")
    })?;
    let df1 = layout.df_between as f64;
    let df2 = layout.df_within as f64;
    let p = f_sf(f, df1, df2)?;
    let ss_total = layout.ss_total();
    let ms_within = layout.ms_within();

    Ok(TestResult::builder(TestKind::Anova, f, p)
        .df_pair(df1, df2)
        .method("one-way")
        .extras([
            ("ss_between", layout.ss_between),
            ("ss_within", layout.ss_within),
            ("ms_between", layout.ms_between()),
            ("ms_within", ms_within),
            ("eta_squared", layout.ss_between / ss_total),
            (
                "omega_squared",
                (layout.ss_between - df1 * ms_within) / (ss_total + ms_within),
            ),
        ])
        .build(spec.config.alpha))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{TestConfig, TestParams};

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() < tol,
            "expected {expected}, got {actual}"
        );
    }

    fn spec(kind: TestKind) -> TestSpec {
        TestSpec::new(kind)
    }

    #[test]
    fn test_one_sample_t_reference() {
        // mean 3, sd 1.5811, t = (3 - 1) / (1.5811 / √5) = 2.8284
        let spec = spec(TestKind::TOneSample).with_params(TestParams {
            hypothesized_value: Some(1.0),
            ..TestParams::default()
        });
        let result = one_sample_t(&spec, &[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_close(result.statistic, 2.828_427, 1e-6);
        assert_close(result.p_value, 0.047_421, 1e-5);
        assert!(result.reject_null);
        assert_close(result.extra("cohens_d").unwrap(), 1.264_911, 1e-6);
    }

    #[test]
    fn test_one_sample_t_constant_is_degenerate() {
        assert!(one_sample_t(&spec(TestKind::TOneSample), &[2.0, 2.0, 2.0]).is_err());
    }

    #[test]
    fn test_two_sample_pooled_reference() {
        let spec = spec(TestKind::TTwoSample).with_config(TestConfig {
            equal_variance_assumed: Some(true),
            ..TestConfig::default()
        });
        // Means 3 and 5, pooled variance 2.5, se = 1, t = -2
        let result = two_sample_t(&spec, &[1.0, 2.0, 3.0, 4.0, 5.0], &[3.0, 4.0, 5.0, 6.0, 7.0])
            .unwrap();
        assert_close(result.statistic, -2.0, 1e-12);
        assert_eq!(result.degrees_of_freedom.unwrap().to_string(), "8");
        assert_close(result.p_value, 0.080_516, 1e-5);
        assert_eq!(result.method, "pooled variance");
    }

    #[test]
    fn test_two_sample_welch_degrees_of_freedom() {
        let spec = spec(TestKind::TTwoSample).with_config(TestConfig {
            equal_variance_assumed: Some(false),
            ..TestConfig::default()
        });
        // Equal variances and sizes reduce Welch to n1 + n2 - 2
        let result = two_sample_t(&spec, &[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
        assert_close(result.statistic, -3.674_235, 1e-6);
        assert_close(
            match result.degrees_of_freedom {
                Some(crate::result::Dof::Single(df)) => df,
                _ => f64::NAN,
            },
            4.0,
            1e-12,
        );
        assert_eq!(result.method, "Welch");
    }

    #[test]
    fn test_two_sample_infers_welch_for_unequal_variances() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [10.0, 30.0, 50.0, 70.0, 90.0];
        let result = two_sample_t(&spec(TestKind::TTwoSample), &a, &b).unwrap();
        assert_eq!(result.method, "Welch");
    }

    #[test]
    fn test_two_sample_constant_samples_are_degenerate() {
        let error = two_sample_t(&spec(TestKind::TTwoSample), &[4.0, 4.0, 4.0], &[4.0, 4.0])
            .unwrap_err();
        assert!(error.reason.contains("zero variance"));
    }

    #[test]
    fn test_two_sample_one_constant_sample_is_computable() {
        let result =
            two_sample_t(&spec(TestKind::TTwoSample), &[4.0, 4.0, 4.0], &[1.0, 2.0, 3.0]).unwrap();
        assert!(result.statistic.is_finite());
    }

    #[test]
    fn test_paired_t_reference() {
        // Differences 1, 1, 2, 0 -> mean 1, sd 0.8165, t = 2.4495
        let result =
            paired_t(&spec(TestKind::TPaired), &[3.0, 4.0, 6.0, 5.0], &[2.0, 3.0, 4.0, 5.0])
                .unwrap();
        assert_close(result.statistic, 2.449_490, 1e-6);
        assert_close(result.p_value, 0.091_721, 1e-5);
    }

    #[test]
    fn test_paired_t_identical_sequences_are_degenerate() {
        let error = paired_t(&spec(TestKind::TPaired), &[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0])
            .unwrap_err();
        assert!(error.reason.contains("zero variance"));
        // A constant shift is just as undefined
        assert!(paired_t(&spec(TestKind::TPaired), &[2.0, 3.0, 4.0], &[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn test_paired_t_unequal_lengths_are_refused() {
        let error = paired_t(&spec(TestKind::TPaired), &[1.0, 2.0, 4.0], &[0.0, 0.5]).unwrap_err();
        assert_eq!(error.reason, "paired samples differ in length (3 and 2)");
    }

    #[test]
    fn test_f_test_orders_by_variance() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 4.0, 6.0, 8.0, 10.0, 12.0];
        let result = f_test(&spec(TestKind::FTest), &a, &b).unwrap();
        // var(a) = 2.5, var(b) = 14
        assert_close(result.statistic, 5.6, 1e-12);
        assert_eq!(result.degrees_of_freedom.unwrap().to_string(), "5, 4");
        assert!(result.p_value > 0.0 && result.p_value < 1.0);
        let swapped = f_test(&spec(TestKind::FTest), &b, &a).unwrap();
        assert_eq!(result.statistic, swapped.statistic);
        assert_eq!(result.p_value, swapped.p_value);
    }

    #[test]
    fn test_f_test_zero_smaller_variance_is_degenerate() {
        assert!(f_test(&spec(TestKind::FTest), &[1.0, 1.0, 1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_anova_identical_groups() {
        let group = [4.0, 5.0, 6.0, 7.0];
        let result = anova(&spec(TestKind::Anova), &[&group, &group, &group]).unwrap();
        assert_close(result.statistic, 0.0, 1e-12);
        assert_close(result.p_value, 1.0, 1e-12);
        assert_eq!(result.degrees_of_freedom.unwrap().to_string(), "2, 9");
    }

    #[test]
    fn test_anova_reference() {
        let result = anova(
            &spec(TestKind::Anova),
            &[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]],
        )
        .unwrap();
        // MSB = 27, MSW = 1
        assert_close(result.statistic, 27.0, 1e-9);
        assert_close(result.extra("eta_squared").unwrap(), 0.9, 1e-12);
        assert_close(result.p_value, 0.001, 1e-8);
    }

    #[test]
    fn test_anova_without_within_variation_is_degenerate() {
        assert!(anova(&spec(TestKind::Anova), &[&[1.0, 1.0], &[2.0, 2.0]]).is_err());
    }
}
