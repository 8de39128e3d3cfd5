//! Session-scoped dataset storage
//!
//! Datasets are entered by the user as comma-separated numbers and kept
//! under a unique name for the lifetime of a session. Nothing is persisted.
//!
//! # Examples
//!
//! ```
//! use hypotest_engine::dataset::{DatasetStore, parse_values};
//!
//! let mut store = DatasetStore::new();
//! store.add("before", parse_values("12.1, 11.8, 13.0").unwrap()).unwrap();
//! store.add("after", parse_values("11.2,11.0,12.4").unwrap()).unwrap();
//!
//! assert_eq!(store.list(), vec!["before", "after"]);
//! assert_eq!(store.get("after").unwrap().values(), &[11.2, 11.0, 12.4]);
//! ```

use hypotest_stats::descriptive::DescriptiveStats;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum StoreError {
    #[display("dataset '{name}' not found")]
    NotFound { name: String },
    #[display("dataset '{name}' already exists")]
    DuplicateName { name: String },
    #[display("dataset '{name}' has no values")]
    EmptyInput { name: String },
    #[display("dataset name must not be empty")]
    EmptyName,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseError {
    #[display("no numbers found")]
    Empty,
    #[display("invalid number '{token}'")]
    InvalidNumber { token: String },
    #[display("number '{token}' is not finite")]
    NonFinite { token: String },
    #[display("table row {row} has {actual} values, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

/// A named sequence of observations.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    name: String,
    values: Vec<f64>,
}

impl Dataset {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Datasets of one session, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    datasets: Vec<Dataset>,
}

impl DatasetStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new dataset.
    ///
    /// The name is trimmed; a blank name, an existing name or an empty value
    /// sequence is refused.
    pub fn add(&mut self, name: &str, values: Vec<f64>) -> Result<&Dataset, StoreError> {
        let name = checked_name(name)?;
        if self.position(&name).is_some() {
            return Err(StoreError::DuplicateName { name });
        }
        if values.is_empty() {
            return Err(StoreError::EmptyInput { name });
        }
        self.datasets.push(Dataset { name, values });
        Ok(&self.datasets[self.datasets.len() - 1])
    }

    pub fn get(&self, name: &str) -> Result<&Dataset, StoreError> {
        self.position(name)
            .map(|idx| &self.datasets[idx])
            .ok_or_else(|| not_found(name))
    }

    /// Dataset names in insertion order.
    #[must_use]
    pub fn list(&self) -> Vec<&str> {
        self.datasets.iter().map(Dataset::name).collect()
    }

    pub fn remove(&mut self, name: &str) -> Result<Dataset, StoreError> {
        let idx = self.position(name).ok_or_else(|| not_found(name))?;
        Ok(self.datasets.remove(idx))
    }

    /// Renames a dataset, keeping its position in the listing.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), StoreError> {
        let idx = self.position(old).ok_or_else(|| not_found(old))?;
        let new = checked_name(new)?;
        if self.position(&new).is_some_and(|other| other != idx) {
            return Err(StoreError::DuplicateName { name: new });
        }
        self.datasets[idx].name = new;
        Ok(())
    }

    /// Overwrites the values of an existing dataset.
    pub fn replace(&mut self, name: &str, values: Vec<f64>) -> Result<&Dataset, StoreError> {
        let idx = self.position(name).ok_or_else(|| not_found(name))?;
        if values.is_empty() {
            return Err(StoreError::EmptyInput {
                name: name.trim().to_owned(),
            });
        }
        self.datasets[idx].values = values;
        Ok(&self.datasets[idx])
    }

    /// Count, mean, median, standard deviation and range of a dataset.
    pub fn summary(&self, name: &str) -> Result<DescriptiveStats, StoreError> {
        let dataset = self.get(name)?;
        DescriptiveStats::new(dataset.values.iter().copied())
            .ok_or_else(|| StoreError::EmptyInput {
                name: dataset.name.clone(),
            })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.datasets.iter().position(|d| d.name == name)
    }
}

fn checked_name(name: &str) -> Result<String, StoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(StoreError::EmptyName);
    }
    Ok(name.to_owned())
}

fn not_found(name: &str) -> StoreError {
    StoreError::NotFound {
        name: name.trim().to_owned(),
    }
}

/// Parses comma-separated numbers.
///
/// Whitespace is ignored and empty fields are skipped, so `"1, 2,,3 "`
/// reads as `[1.0, 2.0, 3.0]`. `NaN` and infinities are refused.
///
/// ```
/// # use hypotest_engine::dataset::{parse_values, ParseError};
/// assert_eq!(parse_values(" 1, 2.5,,-3e1 ").unwrap(), vec![1.0, 2.5, -30.0]);
/// assert_eq!(parse_values(" , "), Err(ParseError::Empty));
/// assert!(parse_values("1, two").is_err());
/// ```
pub fn parse_values(text: &str) -> Result<Vec<f64>, ParseError> {
    let values = text
        .split(',')
        .map(|part| part.split_whitespace().collect::<String>())
        .filter(|token| !token.is_empty())
        .map(|token| {
            let value = token
                .parse::<f64>()
                .map_err(|_| ParseError::InvalidNumber {
                    token: token.clone(),
                })?;
            if value.is_finite() {
                Ok(value)
            } else {
                Err(ParseError::NonFinite { token })
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    if values.is_empty() {
        return Err(ParseError::Empty);
    }
    Ok(values)
}

/// Parses a contingency table: rows separated by `;`, cells by `,`.
///
/// ```
/// # use hypotest_engine::dataset::parse_table;
/// let table = parse_table("10,15,20; 25,30,35").unwrap();
/// assert_eq!(table, vec![vec![10.0, 15.0, 20.0], vec![25.0, 30.0, 35.0]]);
/// assert!(parse_table("1,2;3").is_err());
/// ```
pub fn parse_table(text: &str) -> Result<Vec<Vec<f64>>, ParseError> {
    let rows = text
        .split(';')
        .filter(|row| !row.trim().is_empty())
        .map(parse_values)
        .collect::<Result<Vec<_>, _>>()?;
    let Some(expected) = rows.first().map(Vec::len) else {
        return Err(ParseError::Empty);
    };
    if let Some((row, values)) = rows
        .iter()
        .enumerate()
        .find(|(_, values)| values.len() != expected)
    {
        return Err(ParseError::RaggedRow {
            row: row + 1,
            expected,
            actual: values.len(),
        });
    }
    Ok(rows)
}
