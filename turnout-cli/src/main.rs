//! turnout-cli - Command line tool for comparing election turnout across years.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "turnout-cli",
    version,
    about = "Early voting and election day turnout comparisons"
)]
struct Cli {
    #[command(subcommand)]
    command: turnout_cmd::Command,
}

// The store is single-threaded, so every command runs on one thread.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("turnout-cli {}", env!("CARGO_PKG_VERSION"));
    turnout_cmd::run(cli.command).await
}
