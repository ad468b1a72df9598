//! TID CLI - Command line tool for Finnish tourism statistics and road sensor data.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "tid-cli",
    version,
    about = "Tourism insights for Finland: visitor statistics, economic impact and road conditions"
)]
struct Cli {
    #[command(flatten)]
    global: tid_cmd::GlobalArgs,

    #[command(subcommand)]
    command: tid_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    tid_cmd::run(cli.global, cli.command).await
}
