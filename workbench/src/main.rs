use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use workflow::config::WorksheetConfig;
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Runs vector and matrix worksheets against linalgcore")]
struct Args {
    /// Load a worksheet from YAML instead of running the built-in demo
    #[arg(long)]
    worksheet: Option<PathBuf>,
    /// Print the step outcomes as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let worksheet = if let Some(path) = args.worksheet {
        WorksheetConfig::load(path)?
    } else {
        WorksheetConfig::demo()
    };

    let runner = Runner::new(worksheet);
    let result = runner.execute()?;

    if args.json {
        let report =
            serde_json::to_string_pretty(&result).context("serializing worksheet outcomes")?;
        println!("{}", report);
    } else {
        for outcome in result.inputs.iter().chain(&result.outcomes) {
            println!("{} = {}", outcome.name, outcome.rendered);
        }
    }

    Ok(())
}
