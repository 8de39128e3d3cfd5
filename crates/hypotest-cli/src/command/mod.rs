use clap::{Parser, Subcommand};

use self::{catalogue::CatalogueArg, describe::DescribeArg, run::RunArg};

mod catalogue;
mod data;
mod describe;
mod run;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// List the available tests
    Tests(#[clap(flatten)] CatalogueArg),
    /// Summarize datasets
    Describe(#[clap(flatten)] DescribeArg),
    /// Run a test over datasets
    Run(#[clap(flatten)] RunArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Tests(arg) => catalogue::run(&arg)?,
        Mode::Describe(arg) => describe::run(&arg)?,
        Mode::Run(arg) => run::run(&arg)?,
    }
    Ok(())
}
