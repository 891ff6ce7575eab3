//! Ask an agent for Reddit URLs for a comma-separated list of topics.

use clap::Parser;
use wikiscout::cli::{self, CommonArgs};

#[derive(Parser, Debug)]
#[command(name = "topic-urls", about = "Find Reddit URLs for a list of topics")]
struct Cli {
    /// Comma-separated topics, e.g. "Pericles, Plato"
    topics: String,

    #[command(flatten)]
    common: CommonArgs,
}

#[tokio::main]
async fn main() -> wikiscout::Result<()> {
    let args = Cli::parse();
    cli::init_logging(args.common.verbose);

    let settings = cli::load_settings(&args.common)?;
    let runner = cli::build_runner(&settings, &args.common)?;

    let result = wikiscout::find_topic_urls(&runner, &args.topics).await?;
    cli::print_result(result.as_deref());
    Ok(())
}
