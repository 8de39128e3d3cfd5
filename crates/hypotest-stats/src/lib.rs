//! Numeric building blocks for the hypothesis tests of `hypotest`.
//!
//! This crate provides the pure, dependency-free computations the test
//! engine is assembled from:
//!
//! - **Descriptive statistics**: mean, median, sample variance, skewness, kurtosis, correlation
//! - **Ranking**: mid-ranks with tie bookkeeping for rank-based tests
//! - **Line fitting**: ordinary least squares for simple linear regression
//! - **Exact distributions**: permutation distributions of signed-rank and rank-sum statistics
//! - **One-way layouts**: between/within sums of squares of grouped data
//!
//! # Modules
//!
//! - [`anova`]: Sums of squares of a one-way layout
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`rank`]: Mid-rank assignment and tie correction terms
//! - [`fit`]: Least-squares line fitting
//! - [`exact`]: Exact null distributions for small rank-test samples
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use hypotest_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```
//!
//! ## Ranking with ties
//!
//! ```
//! use hypotest_stats::rank::Ranking;
//!
//! let ranking = Ranking::new(&[7.0, 3.0, 7.0]);
//! assert_eq!(ranking.ranks(), &[2.5, 1.0, 2.5]);
//! ```
//!
//! ## Fitting a line
//!
//! ```
//! use hypotest_stats::fit::LineFit;
//!
//! let fit = LineFit::new(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0]).unwrap();
//! assert_eq!(fit.slope, 2.0);
//! assert_eq!(fit.intercept, 1.0);
//! ```

pub mod anova;
pub mod descriptive;
pub mod exact;
pub mod fit;
pub mod rank;
