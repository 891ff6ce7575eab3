//! Two-stage orchestrator: `urls` collects article URLs into a CSV file,
//! `summary` summarizes the articles of the latest CSV file.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use wikiscout::cli::{self, CommonArgs, RetryArgs};
use wikiscout::{LatestBy, Pipeline, QueryType, StageReport};

#[derive(Parser, Debug)]
#[command(
    name = "wiki-articles-master",
    about = "Collect Wikipedia article URLs or summarize previously collected ones"
)]
struct Cli {
    /// Comma-separated topics (ignored by the summary stage)
    topics: String,

    /// Stage to run
    #[arg(value_enum)]
    query_type: QueryType,

    /// Where CSV files are written and read (defaults to WIKISCOUT_OUTPUT_DIR or ./output)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// How the summary stage picks the latest CSV file
    #[arg(long, value_enum, default_value_t = LatestBy::Name)]
    latest_by: LatestBy,

    #[command(flatten)]
    retry: RetryArgs,

    #[command(flatten)]
    common: CommonArgs,
}

async fn run(args: Cli) -> wikiscout::Result<StageReport> {
    let settings = cli::load_settings(&args.common)?;
    let runner = cli::build_runner(&settings, &args.common)?;
    let output_dir = args.output_dir.unwrap_or_else(|| settings.output_dir.clone());

    let pipeline = Pipeline::new(Arc::new(runner), output_dir)
        .latest_by(args.latest_by)
        .retry(args.retry.policy(&settings));

    pipeline.process(&args.topics, args.query_type).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    cli::init_logging(args.common.verbose);

    match run(args).await {
        Ok(StageReport::Urls { path }) => {
            println!("{}", path.display());
            ExitCode::SUCCESS
        }
        Ok(StageReport::Summaries { written, failed, .. }) => {
            for path in &written {
                println!("{}", path.display());
            }
            for url in &failed {
                eprintln!("No summary for {}", url);
            }
            ExitCode::SUCCESS
        }
        Ok(StageReport::NoInput) => {
            eprintln!("No CSV files found in the output directory");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error processing Wikipedia articles: {}", e);
            ExitCode::FAILURE
        }
    }
}
