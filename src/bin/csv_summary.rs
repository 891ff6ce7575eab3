//! Summarize every article listed in a CSV file's `url` column.

use clap::Parser;
use std::path::PathBuf;
use wikiscout::cli::{self, CommonArgs};

#[derive(Parser, Debug)]
#[command(name = "csv-summary", about = "Summarize the articles listed in a CSV file")]
struct Cli {
    /// CSV file with a `url` column
    #[arg(long)]
    csv: PathBuf,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> wikiscout::Result<()> {
    let args = Cli::parse();
    cli::init_logging(args.common.verbose);

    let settings = cli::load_settings(&args.common)?;
    let runner = cli::build_runner(&settings, &args.common)?;

    let result = wikiscout::summarize_csv(&runner, &args.csv).await?;
    cli::print_result(result.as_deref());
    Ok(())
}
