use hypotest_engine::TestKind;
use serde::Serialize;

use crate::util::{Format, Output, aligned};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct CatalogueArg {
    /// Output format (text or json)
    #[arg(long, default_value = "text")]
    format: Format,
}

#[derive(Debug, Serialize)]
struct CatalogueEntry {
    id: &'static str,
    name: &'static str,
    arity: String,
    statistic: &'static str,
    parametric: bool,
    rank_based: bool,
}

impl From<TestKind> for CatalogueEntry {
    fn from(kind: TestKind) -> Self {
        Self {
            id: kind.id(),
            name: kind.name(),
            arity: kind.arity().to_string(),
            statistic: kind.statistic_label(),
            parametric: kind.is_parametric(),
            rank_based: kind.is_rank_based(),
        }
    }
}

pub(crate) fn run(arg: &CatalogueArg) -> anyhow::Result<()> {
    let entries = TestKind::ALL.map(CatalogueEntry::from);
    let mut output = Output::new(None)?;
    match arg.format {
        Format::Json => output.write_json(&entries),
        Format::Text => {
            let rows = entries
                .iter()
                .map(|entry| (entry.id, format!("{} ({})", entry.name, entry.arity)))
                .collect::<Vec<_>>();
            output.write_lines(aligned(
                rows.iter().map(|(id, text)| (*id, text.as_str())),
                0,
            ))
        }
    }
}
