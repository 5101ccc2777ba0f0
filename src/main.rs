use anyhow::Context;
use clap::Parser;
use portsweep::{output, Cli, CliError};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level());

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            // Rejected port flags are reported but do not fail the run.
            let fatal = e.downcast_ref::<CliError>().map_or(true, CliError::is_fatal);
            if fatal {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = cli.settings().context("failed to load settings")?;
    cli.scan.execute(&settings, cli.verbose, cli.quiet).await?;
    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
