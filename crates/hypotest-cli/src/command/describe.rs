use hypotest_engine::{Session, report::format_number};
use hypotest_stats::descriptive::{excess_kurtosis, skewness};
use serde::Serialize;

use super::data::{self, NamedValues};
use crate::util::{Format, Output, aligned};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct DescribeArg {
    /// Dataset as NAME=v1,v2,... (repeatable)
    #[arg(long = "data", required = true)]
    data: Vec<NamedValues>,
    /// Output format (text or json)
    #[arg(long, default_value = "text")]
    format: Format,
}

#[derive(Debug, Serialize)]
struct Summary {
    name: String,
    count: usize,
    mean: f64,
    median: f64,
    std_dev: f64,
    min: f64,
    max: f64,
    skewness: Option<f64>,
    excess_kurtosis: Option<f64>,
}

pub(crate) fn run(arg: &DescribeArg) -> anyhow::Result<()> {
    let mut session = Session::new();
    let names = data::load(&mut session, &arg.data)?;
    let store = session.store();

    let summaries = names
        .into_iter()
        .map(|name| -> anyhow::Result<Summary> {
            let stats = store.summary(&name)?;
            let values = store.get(&name)?.values();
            Ok(Summary {
                count: stats.count,
                mean: stats.mean,
                median: stats.median,
                std_dev: stats.std_dev,
                min: stats.min,
                max: stats.max,
                skewness: skewness(values),
                excess_kurtosis: excess_kurtosis(values),
                name,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut output = Output::new(None)?;
    match arg.format {
        Format::Json => output.write_json(&summaries),
        Format::Text => output.write_lines(summaries.iter().flat_map(render)),
    }
}

fn render(summary: &Summary) -> Vec<String> {
    let optional = |value: Option<f64>| value.map_or_else(|| "n/a".to_owned(), format_number);
    let rows = [
        ("Count", summary.count.to_string()),
        ("Mean", format_number(summary.mean)),
        ("Median", format_number(summary.median)),
        ("Std. deviation", format_number(summary.std_dev)),
        ("Minimum", format_number(summary.min)),
        ("Maximum", format_number(summary.max)),
        ("Skewness", optional(summary.skewness)),
        ("Excess kurtosis", optional(summary.excess_kurtosis)),
    ];
    let mut lines = vec![summary.name.clone()];
    lines.extend(aligned(
        rows.iter().map(|(label, value)| (*label, value.as_str())),
        2,
    ));
    lines.push(String::new());
    lines
}
