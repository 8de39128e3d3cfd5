use std::path::PathBuf;

use anyhow::{Context as _, bail};
use hypotest_engine::{
    Session, TestConfig, TestKind, TestParams, TestRequest,
    catalogue::DEFAULT_ALPHA,
    report::{Report, SIGNIFICANCE_LEGEND},
};

use super::data::{self, NamedValues, Table, Values};
use crate::util::{Format, Output, aligned};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct RunArg {
    /// Test id, see `hypotest tests`
    test: TestKind,
    /// Dataset as NAME=v1,v2,... (repeatable, used in the given order)
    #[arg(long = "data")]
    data: Vec<NamedValues>,
    /// Contingency table, rows separated by ';' and cells by ','
    #[arg(long)]
    table: Option<Table>,
    /// Hypothesized mean or median of one-sample tests
    #[arg(long, allow_negative_numbers = true)]
    hypothesized: Option<f64>,
    /// Expected frequencies of the goodness-of-fit test
    #[arg(long)]
    expected: Option<Values>,
    /// Significance level
    #[arg(long, default_value_t = DEFAULT_ALPHA)]
    alpha: f64,
    /// Exact p-values for small rank-test samples without ties
    #[arg(long)]
    exact: bool,
    /// Force the pooled (true) or Welch (false) two-sample t-test
    #[arg(long, value_name = "BOOL")]
    equal_variance: Option<bool>,
    /// Yates continuity correction for 2x2 tables
    #[arg(long)]
    yates: bool,
    /// Output format (text or json)
    #[arg(long, default_value = "text")]
    format: Format,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

impl RunArg {
    fn request(&self, datasets: Vec<String>) -> TestRequest {
        TestRequest {
            kind: self.test,
            datasets,
            params: TestParams {
                hypothesized_value: self.hypothesized,
                expected: self.expected.clone().map(|Values(values)| values),
            },
            config: TestConfig {
                alpha: self.alpha,
                exact_p_value: self.exact,
                equal_variance_assumed: self.equal_variance,
                yates_correction: self.yates,
            },
        }
    }
}

pub(crate) fn run(arg: &RunArg) -> anyhow::Result<()> {
    let mut session = Session::new();
    let mut names = data::load(&mut session, &arg.data)?;
    if let Some(table) = &arg.table {
        names.extend(data::load_table(&mut session, table)?);
    }
    if names.is_empty() {
        bail!("No datasets given, use --data or --table");
    }

    let request = arg.request(names);
    eprintln!(
        "Running {} on {}",
        request.kind.name(),
        request.datasets.join(", ")
    );
    let outcome = session
        .run(&request)
        .with_context(|| format!("{} could not be computed", request.kind.name()))?;

    let mut output = Output::new(arg.output.as_deref())?;
    match arg.format {
        Format::Json => output.write_json(&outcome),
        Format::Text => output.write_lines(render(&outcome.report)),
    }
}

fn render(report: &Report) -> Vec<String> {
    let mut lines = vec![if report.method.is_empty() {
        report.title.clone()
    } else {
        format!("{} ({})", report.title, report.method)
    }];

    let p_value = if report.significance.is_empty() {
        report.p_value.clone()
    } else {
        format!("{} {}", report.p_value, report.significance)
    };
    let mut summary = vec![(report.statistic_label, report.statistic.as_str())];
    if let Some(df) = &report.degrees_of_freedom {
        summary.push(("df", df.as_str()));
    }
    summary.push(("p-value", p_value.as_str()));
    lines.extend(aligned(summary, 2));
    lines.push(format!("  {}", report.verdict));

    if !report.details.is_empty() {
        lines.push(String::new());
        lines.push("Details".to_owned());
        lines.extend(aligned(
            report
                .details
                .iter()
                .map(|detail| (detail.label.as_str(), detail.value.as_str())),
            2,
        ));
    }
    if !report.caveats.is_empty() {
        lines.push(String::new());
        lines.push("Assumptions".to_owned());
        lines.extend(report.caveats.iter().map(|caveat| format!("  - {caveat}")));
    }
    lines.push(String::new());
    lines.push(SIGNIFICANCE_LEGEND.to_owned());
    lines
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use hypotest_engine::report::Detail;

    use super::*;

    #[derive(Debug, Parser)]
    struct Cli {
        #[clap(flatten)]
        arg: RunArg,
    }

    #[test]
    fn test_parse_run_arguments() {
        let cli = Cli::try_parse_from([
            "hypotest",
            "t-two-sample",
            "--data",
            "a=1,2,3",
            "--data",
            "b=4,5,6",
            "--alpha",
            "0.01",
            "--equal-variance",
            "false",
        ])
        .unwrap();
        let request = cli.arg.request(vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(request.kind, TestKind::TTwoSample);
        assert_eq!(request.config.alpha, 0.01);
        assert_eq!(request.config.equal_variance_assumed, Some(false));
        assert!(!request.config.exact_p_value);
    }

    #[test]
    fn test_negative_hypothesized_value() {
        let cli = Cli::try_parse_from([
            "hypotest",
            "t-one-sample",
            "--data",
            "a=-7,-4,-6",
            "--hypothesized",
            "-5",
        ])
        .unwrap();
        let request = cli.arg.request(vec!["a".to_owned()]);
        assert_eq!(request.params.hypothesized_value, Some(-5.0));
    }

    #[test]
    fn test_unknown_test_is_rejected() {
        assert!(Cli::try_parse_from(["hypotest", "z-test", "--data", "a=1,2"]).is_err());
    }

    #[test]
    fn test_render_report() {
        let report = Report {
            title: "Mann-Whitney U Test".to_owned(),
            method: "exact".to_owned(),
            statistic_label: "U",
            statistic: "1.0000".to_owned(),
            degrees_of_freedom: None,
            p_value: "0.029".to_owned(),
            significance: "*",
            verdict: "Significant at α = 0.05 (reject H0)".to_owned(),
            details: vec![Detail {
                label: "z".to_owned(),
                value: "-2.1909".to_owned(),
            }],
            caveats: vec![],
        };
        let lines = render(&report);
        assert_eq!(lines[0], "Mann-Whitney U Test (exact)");
        assert_eq!(lines[1], "  U        1.0000");
        assert_eq!(lines[2], "  p-value  0.029 *");
        assert_eq!(lines[3], "  Significant at α = 0.05 (reject H0)");
        assert_eq!(lines.last().map(String::as_str), Some(SIGNIFICANCE_LEGEND));
        assert!(!lines.contains(&"Assumptions".to_owned()));
    }
}
