use clap::Parser;
use colored::Colorize;

use logsync_cli::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logsync_cli::dispatch(cli).await {
        tracing::error!(error = %e, "exiting");
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(e.exit_code());
    }
}
