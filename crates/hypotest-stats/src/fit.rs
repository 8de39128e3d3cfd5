use crate::descriptive::{is_constant, mean};

/// Ordinary least-squares fit of a straight line `y = slope * x + intercept`.
///
/// # Examples
///
/// ```
/// use hypotest_stats::fit::LineFit;
///
/// let fit = LineFit::new(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap();
/// assert_eq!(fit.slope, 2.0);
/// assert_eq!(fit.intercept, 0.0);
/// assert_eq!(fit.ss_residual, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LineFit {
    /// Number of `(x, y)` pairs.
    pub n: usize,
    pub slope: f64,
    pub intercept: f64,
    pub mean_x: f64,
    pub mean_y: f64,
    /// `Σ(x - x̄)²`
    pub sxx: f64,
    /// `Σ(y - ȳ)²`, the total sum of squares.
    pub syy: f64,
    /// `Σ(x - x̄)(y - ȳ)`
    pub sxy: f64,
    /// Sum of squared residuals, computed from the residuals themselves.
    pub ss_residual: f64,
}

impl LineFit {
    /// Fits a line through the pairs `(x[i], y[i])`.
    ///
    /// # Returns
    ///
    /// * `None` - if the lengths differ, fewer than two pairs are given, or
    ///   `x` is constant (the normal equations are singular)
    #[must_use]
    pub fn new(x: &[f64], y: &[f64]) -> Option<Self> {
        if x.len() != y.len() || x.len() < 2 || is_constant(x) {
            return None;
        }
        let mean_x = mean(x)?;
        let mean_y = mean(y)?;
        let (sxx, syy, sxy) = x
            .iter()
            .zip(y)
            .fold((0.0, 0.0, 0.0), |(sxx, syy, sxy), (xi, yi)| {
                let dx = xi - mean_x;
                let dy = yi - mean_y;
                (sxx + dx * dx, syy + dy * dy, sxy + dx * dy)
            });
        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        let ss_residual = x
            .iter()
            .zip(y)
            .map(|(xi, yi)| (yi - (slope * xi + intercept)).powi(2))
            .sum();

        Some(Self {
            n: x.len(),
            slope,
            intercept,
            mean_x,
            mean_y,
            sxx,
            syy,
            sxy,
            ss_residual,
        })
    }

    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Residuals `y - ŷ` in input order.
    #[must_use]
    pub fn residuals(&self, x: &[f64], y: &[f64]) -> Vec<f64> {
        x.iter().zip(y).map(|(xi, yi)| yi - self.predict(*xi)).collect()
    }

    /// Coefficient of determination, `None` when `y` has no variation.
    #[must_use]
    pub fn r_squared(&self) -> Option<f64> {
        if self.syy <= 0.0 {
            return None;
        }
        Some((1.0 - self.ss_residual / self.syy).clamp(0.0, 1.0))
    }
}
