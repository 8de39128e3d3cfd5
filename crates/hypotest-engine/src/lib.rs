//! Statistical hypothesis testing over named datasets
//!
//! This crate holds everything behind the `hypotest` binary: the datasets of
//! a session, the catalogue of thirteen tests, input validation, assumption
//! checks, the test procedures and presentation of their results.
//!
//! # Overview
//!
//! A test run is a fixed pipeline:
//!
//! 1. **Resolve datasets** ([`dataset::DatasetStore`]): look up the named samples
//! 2. **Validate** ([`validate::validate`]): refuse malformed or insufficient input
//! 3. **Check assumptions** ([`assumption::check`]): warn, never block
//! 4. **Compute** ([`procedures::compute`]): run the selected procedure
//! 5. **Format** ([`report::format`]): render fixed-precision strings
//!
//! [`session::Session`] drives the whole pipeline; [`session::run_values`]
//! does the same for samples that are not stored in a session.
//!
//! # Modules
//!
//! - [`catalogue`]: Test kinds, parameters and per-run options
//! - [`dataset`]: Named datasets and comma-separated number parsing
//! - [`validate`]: Input validation
//! - [`assumption`]: Normality, equal variance and sample size checks
//! - [`procedures`]: The test procedures
//! - [`distribution`]: Tail probabilities and quantiles of reference distributions
//! - [`result`]: Structured test results
//! - [`report`]: Presentation of results
//! - [`session`]: The test pipeline
//! - [`error`]: Error types
//!
//! # Examples
//!
//! ```
//! use hypotest_engine::{
//!     catalogue::{TestKind, TestSpec},
//!     session::run_values,
//! };
//!
//! let before = [72.0, 75.0, 71.0, 78.0, 74.0, 77.0];
//! let after = [70.0, 72.0, 70.0, 74.0, 73.0, 73.0];
//! let outcome = run_values(&TestSpec::new(TestKind::TPaired), &[&before, &after]).unwrap();
//!
//! assert!(outcome.result.reject_null);
//! assert_eq!(outcome.report.degrees_of_freedom.as_deref(), Some("5"));
//! ```

pub use self::{
    catalogue::{TestConfig, TestKind, TestParams, TestSpec},
    error::{DegenerateInput, EngineError, InputError},
    session::{Outcome, Session, TestRequest},
};

pub mod assumption;
pub mod catalogue;
pub mod dataset;
pub mod distribution;
pub mod error;
pub mod procedures;
pub mod report;
pub mod result;
pub mod session;
pub mod validate;
