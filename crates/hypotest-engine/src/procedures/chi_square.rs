//! Pearson chi-square tests on counts

use crate::{
    catalogue::{TestKind, TestSpec},
    distribution::chi_squared_sf,
    error::DegenerateInput,
    result::TestResult,
};

/// Expected counts of a goodness-of-fit test.
///
/// Explicit expectations are used as given; otherwise the observed total
/// is split evenly over the categories.
#[expect(clippy::cast_precision_loss)]
pub(crate) fn goodness_of_fit_expected(observed: &[f64], expected: Option<&[f64]>) -> Vec<f64> {
    match expected {
        Some(expected) => expected.to_vec(),
        None => {
            let share = observed.iter().sum::<f64>() / observed.len() as f64;
            vec![share; observed.len()]
        }
    }
}

/// Expected cell counts `row_total * column_total / total` of a
/// contingency table, all zero for an empty table.
pub(crate) fn contingency_expected(rows: &[&[f64]]) -> Vec<Vec<f64>> {
    let (row_totals, column_totals, total) = margins(rows);
    row_totals
        .iter()
        .map(|row_total| {
            column_totals
                .iter()
                .map(|column_total| {
                    if total > 0.0 {
                        row_total * column_total / total
                    } else {
                        0.0
                    }
                })
                .collect()
        })
        .collect()
}

fn margins(rows: &[&[f64]]) -> (Vec<f64>, Vec<f64>, f64) {
    let columns = rows.first().map_or(0, |row| row.len());
    let row_totals = rows.iter().map(|row| row.iter().sum()).collect::<Vec<f64>>();
    let mut column_totals = vec![0.0; columns];
    for row in rows {
        for (total, value) in column_totals.iter_mut().zip(*row) {
            *total += value;
        }
    }
    let total = row_totals.iter().sum();
    (row_totals, column_totals, total)
}

/// Goodness of fit of observed counts to expected counts.
#[expect(clippy::cast_precision_loss)]
pub fn goodness_of_fit(spec: &TestSpec, observed: &[f64]) -> Result<TestResult, DegenerateInput> {
    if observed.len() < 2 {
        return Err(DegenerateInput::new("at least 2 categories are required"));
    }
    let expected = goodness_of_fit_expected(observed, spec.params.expected.as_deref());
    if expected.len() != observed.len() {
        return Err(DegenerateInput::new(
            "observed and expected frequencies differ in length",
        ));
    }
    if let Some(idx) = expected.iter().position(|e| *e <= 0.0) {
        return Err(DegenerateInput::new(format!(
            "expected frequency of category {} is zero",
            idx + 1
        )));
    }
    let statistic = observed
        .iter()
        .zip(&expected)
        .map(|(o, e)| (o - e).powi(2) / e)
        .sum::<f64>();
    let df = (observed.len() - 1) as f64;
    let p = chi_squared_sf(statistic, df)?;
    let total = observed.iter().sum::<f64>();

    let mut builder = TestResult::builder(TestKind::ChiSquareGoodnessOfFit, statistic, p)
        .df(df)
        .method("Pearson")
        .extras([
            ("total", total),
            ("min_expected", expected.iter().copied().fold(f64::INFINITY, f64::min)),
        ]);
    if total > 0.0 {
        builder = builder.extra("cohens_w", (statistic / total).sqrt());
    }
    Ok(builder.build(spec.config.alpha))
}

/// Test of association between the row and column classifications of a
/// contingency table given as rows of counts.
///
/// Yates' continuity correction applies to 2x2 tables when requested.
#[expect(clippy::cast_precision_loss)]
pub fn association(spec: &TestSpec, rows: &[&[f64]]) -> Result<TestResult, DegenerateInput> {
    let columns = rows.first().map_or(0, |row| row.len());
    if let Some(idx) = rows.iter().position(|row| row.len() != columns) {
        return Err(DegenerateInput::new(format!(
            "row {} has {} cells, expected {columns}",
            idx + 1,
            rows[idx].len()
        )));
    }
    let (row_totals, column_totals, total) = margins(rows);
    if let Some(idx) = row_totals.iter().position(|t| *t <= 0.0) {
        return Err(DegenerateInput::new(format!("row {} sums to zero", idx + 1)));
    }
    if let Some(idx) = column_totals.iter().position(|t| *t <= 0.0) {
        return Err(DegenerateInput::new(format!("column {} sums to zero", idx + 1)));
    }
    let r = rows.len();
    let c = column_totals.len();
    if r < 2 || c < 2 {
        return Err(DegenerateInput::new("table needs at least two rows and two columns"));
    }
    let yates = spec.config.yates_correction && r == 2 && c == 2;

    let expected = contingency_expected(rows);
    let statistic = rows
        .iter()
        .zip(&expected)
        .flat_map(|(observed, expected)| observed.iter().zip(expected))
        .map(|(o, e)| {
            let deviation = (o - e).abs();
            let deviation = if yates {
                (deviation - 0.5).max(0.0)
            } else {
                deviation
            };
            deviation.powi(2) / e
        })
        .sum::<f64>();
    let df = ((r - 1) * (c - 1)) as f64;
    let p = chi_squared_sf(statistic, df)?;
    let min_expected = expected
        .iter()
        .flatten()
        .copied()
        .fold(f64::INFINITY, f64::min);
    let smaller_dimension = r.min(c) as f64;

    let mut builder = TestResult::builder(TestKind::ChiSquareAssociation, statistic, p)
        .df(df)
        .method(if yates {
            "Yates continuity correction"
        } else {
            "Pearson"
        })
        .extras([
            ("total", total),
            ("min_expected", min_expected),
            (
                "cramers_v",
                (statistic / (total * (smaller_dimension - 1.0))).sqrt(),
            ),
            (
                "contingency_coefficient",
                (statistic / (statistic + total)).sqrt(),
            ),
        ]);
    if r == 2 && c == 2 {
        builder = builder.extra("phi", (statistic / total).sqrt());
    }
    Ok(builder.build(spec.config.alpha))
}
