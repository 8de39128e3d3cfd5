/// Descriptive statistics summarizing a dataset.
///
/// This structure contains the measures of central tendency and dispersion
/// shown next to a dataset before a test is run.
#[derive(Debug, Clone, PartialEq)]
pub struct DescriptiveStats {
    /// The number of observations.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// The arithmetic mean of the dataset.
    pub mean: f64,
    /// The median of the dataset (average of the two middle values for even counts).
    pub median: f64,
    /// The sample variance (`n - 1` denominator), `0.0` for a single observation.
    pub variance: f64,
    /// The sample standard deviation.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// This method will sort the values internally before computing statistics.
    ///
    /// # Arguments
    ///
    /// * `values` - An iterator over `f64` values.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use hypotest_stats::descriptive::DescriptiveStats;
    /// let values = [5.0, 2.0, 4.0, 1.0, 3.0];
    /// let stats = DescriptiveStats::new(values).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// assert_eq!(stats.variance, 2.5);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// # use hypotest_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::from_sorted(&[1.0, 2.0, 3.0, 4.0]).unwrap();
    /// assert_eq!(stats.median, 2.5);
    /// ```
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let mean = mean(sorted_values)?;
        let median = median_of_sorted(sorted_values)?;
        let variance = sample_variance(sorted_values).unwrap_or(0.0);

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            variance,
            std_dev: variance.sqrt(),
        })
    }
}

/// Arithmetic mean, `None` for an empty slice.
///
/// ```
/// # use hypotest_stats::descriptive::mean;
/// assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
/// assert_eq!(mean(&[]), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance with Bessel's correction, `None` for fewer than two values.
///
/// ```
/// # use hypotest_stats::descriptive::sample_variance;
/// assert_eq!(sample_variance(&[2.0, 4.0, 6.0]), Some(4.0));
/// assert_eq!(sample_variance(&[1.0]), None);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    Some(sum_sq / (values.len() - 1) as f64)
}

/// Sum of squared deviations from the mean.
#[must_use]
pub fn sum_of_squares(values: &[f64]) -> f64 {
    let Some(mean) = mean(values) else {
        return 0.0;
    };
    values.iter().map(|v| (v - mean).powi(2)).sum()
}

/// Median of unsorted values, `None` for an empty slice.
///
/// ```
/// # use hypotest_stats::descriptive::median;
/// assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
/// ```
#[must_use]
pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    median_of_sorted(&sorted)
}

fn median_of_sorted(sorted_values: &[f64]) -> Option<f64> {
    let n = sorted_values.len();
    if n == 0 {
        return None;
    }
    if n % 2 == 1 {
        Some(sorted_values[n / 2])
    } else {
        Some(f64::midpoint(sorted_values[n / 2 - 1], sorted_values[n / 2]))
    }
}

/// Returns `true` when every value equals the first one.
///
/// Used instead of comparing a computed variance against zero, which can be
/// off by rounding for constant data.
#[must_use]
pub fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Bias-corrected sample skewness (G1).
///
/// Returns `None` for fewer than three values or zero variance.
///
/// ```
/// # use hypotest_stats::descriptive::skewness;
/// assert!(skewness(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap().abs() < 1e-12);
/// assert!(skewness(&[1.0, 2.0, 3.0, 4.0, 50.0]).unwrap() > 0.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 || is_constant(values) {
        return None;
    }
    let nf = n as f64;
    let mean = mean(values)?;
    let (m2, m3) = values.iter().fold((0.0, 0.0), |(m2, m3), v| {
        let d = v - mean;
        (m2 + d * d, m3 + d * d * d)
    });
    let m2 = m2 / nf;
    let m3 = m3 / nf;
    let g1 = m3 / m2.powf(1.5);
    Some(g1 * (nf * (nf - 1.0)).sqrt() / (nf - 2.0))
}

/// Bias-corrected excess kurtosis (G2), zero for a normal distribution.
///
/// Returns `None` for fewer than four values or zero variance.
///
/// ```
/// # use hypotest_stats::descriptive::excess_kurtosis;
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// assert!(excess_kurtosis(&values).unwrap() < 0.0);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn excess_kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 4 || is_constant(values) {
        return None;
    }
    let nf = n as f64;
    let mean = mean(values)?;
    let (sum2, sum4) = values.iter().fold((0.0, 0.0), |(s2, s4), v| {
        let d2 = (v - mean).powi(2);
        (s2 + d2, s4 + d2 * d2)
    });
    let s2 = sum2 / (nf - 1.0);
    let sum_z4 = sum4 / (s2 * s2);
    let a = nf * (nf + 1.0) / ((nf - 1.0) * (nf - 2.0) * (nf - 3.0));
    let b = 3.0 * (nf - 1.0).powi(2) / ((nf - 2.0) * (nf - 3.0));
    Some(a * sum_z4 - b)
}

/// Pearson product-moment correlation.
///
/// Returns `None` when lengths differ, fewer than two pairs are given, or
/// either variable is constant.
///
/// ```
/// # use hypotest_stats::descriptive::pearson;
/// let r = pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
/// assert!((r - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 || is_constant(x) || is_constant(y) {
        return None;
    }
    let mean_x = mean(x)?;
    let mean_y = mean(y)?;
    let (sxy, sxx, syy) = x
        .iter()
        .zip(y)
        .fold((0.0, 0.0, 0.0), |(sxy, sxx, syy), (xi, yi)| {
            let dx = xi - mean_x;
            let dy = yi - mean_y;
            (sxy + dx * dy, sxx + dx * dx, syy + dy * dy)
        });
    Some((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values() {
        assert!(DescriptiveStats::new([]).is_none());
        assert!(mean(&[]).is_none());
        assert!(median(&[]).is_none());
    }

    #[test]
    fn test_single_value() {
        let stats = DescriptiveStats::new([42.0]).unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.min, 42.0);
        assert_eq!(stats.max, 42.0);
        assert_eq!(stats.median, 42.0);
        assert_eq!(stats.variance, 0.0);
    }

    #[test]
    fn test_sample_variance_uses_bessel_correction() {
        let stats = DescriptiveStats::new([2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((stats.mean - 5.0).abs() < 1e-12);
        assert!((stats.variance - 32.0 / 7.0).abs() < 1e-12);
        assert!((stats.std_dev - (32.0_f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_is_constant() {
        assert!(is_constant(&[]));
        assert!(is_constant(&[3.0]));
        assert!(is_constant(&[0.1, 0.1, 0.1]));
        assert!(!is_constant(&[0.1, 0.1, 0.2]));
    }

    #[test]
    fn test_shape_statistics_undefined_for_constant_data() {
        assert!(skewness(&[2.0, 2.0, 2.0, 2.0]).is_none());
        assert!(excess_kurtosis(&[2.0, 2.0, 2.0, 2.0]).is_none());
        assert!(skewness(&[1.0, 2.0]).is_none());
    }

    #[test]
    fn test_pearson_negative_and_constant() {
        let r = pearson(&[1.0, 2.0, 3.0, 4.0], &[8.0, 6.0, 4.0, 2.0]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
        assert!(pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]).is_none());
        assert!(pearson(&[1.0, 2.0], &[1.0]).is_none());
    }
}
