//! Two agents sharing one session: the first opens a Wikipedia tab per
//! topic, the second reports what is open.

use clap::Parser;
use wikiscout::cli::{self, CommonArgs};

#[derive(Parser, Debug)]
#[command(name = "chain-of-agents", about = "Open Wikipedia articles, then list them")]
struct Cli {
    /// Comma-separated topics
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

    let result = wikiscout::chain_of_agents(&runner, &args.topics).await?;
    cli::print_result(result.as_deref());
    Ok(())
}
