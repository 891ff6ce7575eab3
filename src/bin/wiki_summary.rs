//! Summarize a single article, retrying on failure.

use clap::Parser;
use wikiscout::cli::{self, CommonArgs, RetryArgs};

#[derive(Parser, Debug)]
#[command(name = "wiki-summary", about = "Summarize one Wikipedia article")]
struct Cli {
    /// Article URL
    #[arg(long)]
    url: String,

    #[command(flatten)]
    retry: RetryArgs,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> wikiscout::Result<()> {
    let args = Cli::parse();
    cli::init_logging(args.common.verbose);
    cli::require_non_empty("url", &args.url)?;

    let settings = cli::load_settings(&args.common)?;
    let runner = cli::build_runner(&settings, &args.common)?;
    let policy = args.retry.policy(&settings);

    let result = wikiscout::summarize_url(&runner, &policy, &args.url).await;
    cli::print_result(result.as_deref());
    Ok(())
}
