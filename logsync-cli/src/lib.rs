//! logsync command-line front end.
//!
//! The binary in `main.rs` only parses arguments and maps errors to exit codes;
//! everything else lives here so integration tests can drive it.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod metrics_recorder;
pub mod output;

use std::path::Path;

use tracing::{debug, info};

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

/// Run the parsed command line.
pub async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let writer = OutputWriter::new(cli.output);
    match cli.command {
        Commands::Run(args) => {
            let (path, config) = commands::load_config(args.config.as_deref()).await?;
            logging::init_logging(
                &config.log,
                cli.log_level.as_deref(),
                config.logfile.as_deref().map(Path::new),
            )?;
            let recorder = metrics_recorder::install_recorder();
            info!(config = %path.display(), dry_run = args.dry_run, "configuration loaded");
            let result = commands::run::execute(&args, &config, &writer).await;
            if let Some(handle) = recorder {
                debug!(metrics = %handle.render(), "run metrics");
            }
            result
        }
        // no subscriber: check output must stay clean for --output json
        Commands::Check(args) => {
            let (path, config) = commands::load_config(args.config.as_deref()).await?;
            commands::check::execute(&path, &config, &writer)
        }
    }
}
