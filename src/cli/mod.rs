//! Command-line interface.

pub mod check;
pub mod command;
pub mod estimate;
pub mod output;
pub mod paths;
pub mod pipeline;
pub mod session;
pub mod summary;

use command::{CheckCommand, Cli, Commands, HuntCommand};
use output::OutputConfig;

use crate::error::Result;

/// Configure output from the global flags and run the chosen command.
pub async fn run(cli: Cli) -> Result<()> {
    output::configure(OutputConfig::new(cli.json, cli.quiet, cli.verbose));
    let config = cli.config.as_deref();

    match &cli.command {
        Commands::Select(args) => pipeline::select(config, args).await,
        Commands::CrossCheck(args) => pipeline::cross_check(config, args).await,
        Commands::Scan(args) => pipeline::scan(config, args).await,
        Commands::Research(args) => pipeline::research(config, args).await,
        Commands::Hunt(HuntCommand::Export(args)) => pipeline::hunt_export(config, args).await,
        Commands::Hunt(HuntCommand::Keywords(args)) => pipeline::hunt_keywords(config, args).await,
        Commands::Gap(args) => pipeline::gap(config, args).await,
        Commands::Estimate(args) => estimate::execute(config, args),
        Commands::Check(CheckCommand::Config) => check::execute_config(config),
    }
}
