//! Sums of squares of a one-way layout
//!
//! Shared by the one-way analysis of variance and the Brown-Forsythe
//! variant of Levene's test, which runs the same decomposition on absolute
//! deviations from group medians.

use crate::descriptive::mean;

/// Between/within decomposition of `k` groups with `N` observations in total.
#[derive(Debug, Clone, PartialEq)]
pub struct OneWay {
    pub grand_mean: f64,
    /// `Σ n_i (x̄_i - x̄)²`
    pub ss_between: f64,
    /// `Σ Σ (x_ij - x̄_i)²`
    pub ss_within: f64,
    /// `k - 1`
    pub df_between: usize,
    /// `N - k`
    pub df_within: usize,
}

impl OneWay {
    /// Decomposes the variation of `groups`.
    ///
    /// Returns `None` for fewer than two groups, an empty group, or no
    /// within-group degrees of freedom.
    ///
    /// ```
    /// # use hypotest_stats::anova::OneWay;
    /// let layout = OneWay::new(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]).unwrap();
    /// assert_eq!(layout.ss_between, 13.5);
    /// assert_eq!(layout.ss_within, 4.0);
    /// assert_eq!((layout.df_between, layout.df_within), (1, 4));
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(groups: &[&[f64]]) -> Option<Self> {
        let k = groups.len();
        let total = groups.iter().map(|g| g.len()).sum::<usize>();
        if k < 2 || groups.iter().any(|g| g.is_empty()) || total <= k {
            return None;
        }
        let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / total as f64;
        let mut ss_between = 0.0;
        let mut ss_within = 0.0;
        for group in groups {
            let group_mean = mean(group)?;
            ss_between += group.len() as f64 * (group_mean - grand_mean).powi(2);
            ss_within += group.iter().map(|v| (v - group_mean).powi(2)).sum::<f64>();
        }
        Some(Self {
            grand_mean,
            ss_between,
            ss_within,
            df_between: k - 1,
            df_within: total - k,
        })
    }

    #[must_use]
    pub fn ss_total(&self) -> f64 {
        self.ss_between + self.ss_within
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn ms_between(&self) -> f64 {
        self.ss_between / self.df_between as f64
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn ms_within(&self) -> f64 {
        self.ss_within / self.df_within as f64
    }

    /// `MS_between / MS_within`, `None` when there is no within-group variation.
    #[must_use]
    pub fn f_ratio(&self) -> Option<f64> {
        let ms_within = self.ms_within();
        (ms_within > 0.0).then(|| self.ms_between() / ms_within)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unusable_layouts() {
        assert!(OneWay::new(&[&[1.0, 2.0]]).is_none());
        assert!(OneWay::new(&[&[1.0, 2.0], &[]]).is_none());
        assert!(OneWay::new(&[&[1.0], &[2.0]]).is_none());
    }

    #[test]
    fn test_equal_group_means() {
        let layout = OneWay::new(&[&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0], &[2.0, 1.0, 3.0]]).unwrap();
        assert_eq!(layout.ss_between, 0.0);
        assert_eq!(layout.f_ratio(), Some(0.0));
        assert_eq!(layout.grand_mean, 2.0);
    }

    #[test]
    fn test_no_within_variation() {
        let layout = OneWay::new(&[&[1.0, 1.0], &[2.0, 2.0]]).unwrap();
        assert_eq!(layout.ss_within, 0.0);
        assert_eq!(layout.f_ratio(), None);
        assert_eq!(layout.ss_total(), 1.0);
    }

    #[test]
    fn test_reference_f_ratio() {
        // Groups (1, 2, 3), (4, 5, 6): MSB = 13.5, MSW = 1
        let layout = OneWay::new(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(layout.f_ratio(), Some(13.5));
    }
}
