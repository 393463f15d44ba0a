mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use switchboard_config::YamlInventory;
use switchboard_core::DeviceService;

use crate::cli::Cli;
use crate::commands::CliError;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:?}", miette::Report::new(err));
            std::process::exit(2);
        }
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<i32, CliError> {
    let mut config = switchboard_config::load_config(cli.config.as_ref())?;
    if let Some(inventory) = &cli.inventory {
        config.inventory.clone_from(inventory);
    }

    let backend = YamlInventory::load(&config.inventory)?;
    let registry = switchboard_drivers::registry();

    // Resolution failures surface as envelopes, same as any other
    // request outcome.
    let envelope = match DeviceService::open(&backend, &registry, &cli.device) {
        Ok(service) => commands::dispatch(cli, &service, config.debug)?,
        Err(err) => switchboard_core::Envelope::failure(&err, config.debug),
    };

    match serde_json::to_string_pretty(&envelope) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => {
            tracing::error!(%err, "failed to render response envelope");
            return Ok(1);
        }
    }
    Ok(i32::from(envelope.status >= 400))
}
