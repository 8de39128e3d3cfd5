use std::str::FromStr;

use anyhow::Context as _;
use hypotest_engine::{
    Session,
    dataset::{ParseError, parse_table, parse_values},
};

/// `NAME=v1,v2,...` as given to `--data`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NamedValues {
    pub(crate) name: String,
    pub(crate) values: Vec<f64>,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub(crate) enum DataArgError {
    #[display("expected NAME=v1,v2,..., got '{arg}'")]
    MissingName { arg: String },
    #[display("dataset '{name}': {source}")]
    Values { name: String, source: ParseError },
}

impl FromStr for NamedValues {
    type Err = DataArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((name, values)) = s.split_once('=') else {
            return Err(DataArgError::MissingName { arg: s.to_owned() });
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(DataArgError::MissingName { arg: s.to_owned() });
        }
        let values = parse_values(values).map_err(|source| DataArgError::Values {
            name: name.to_owned(),
            source,
        })?;
        Ok(Self {
            name: name.to_owned(),
            values,
        })
    }
}

/// Contingency table rows as given to `--table`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Table(Vec<Vec<f64>>);

impl FromStr for Table {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_table(s).map(Self)
    }
}

/// Comma-separated numbers without a name.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Values(pub(crate) Vec<f64>);

impl FromStr for Values {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_values(s).map(Self)
    }
}

/// Loads named datasets into `session`, returning their names in order.
pub(crate) fn load(session: &mut Session, data: &[NamedValues]) -> anyhow::Result<Vec<String>> {
    data.iter()
        .map(|NamedValues { name, values }| {
            let dataset = session
                .store_mut()
                .add(name, values.clone())
                .with_context(|| format!("Failed to load dataset '{name}'"))?;
            eprintln!("Loaded dataset '{}' ({} values)", dataset.name(), dataset.len());
            Ok(dataset.name().to_owned())
        })
        .collect()
}

/// Loads table rows as datasets `row1`, `row2`, ...
pub(crate) fn load_table(session: &mut Session, Table(rows): &Table) -> anyhow::Result<Vec<String>> {
    let rows = rows
        .iter()
        .enumerate()
        .map(|(idx, values)| NamedValues {
            name: format!("row{}", idx + 1),
            values: values.clone(),
        })
        .collect::<Vec<_>>();
    load(session, &rows)
}
