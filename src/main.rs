use clap::Parser;

use btautopin::cli::{Cli, run_command};
use btautopin::telemetry::init_tracing;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);
    run_command(cli.command).await
}
