use std::io::Read;

use queue_sim::cli::{self, Command, ConfigArgs};
use queue_sim::config;
use queue_sim::engine;
use queue_sim::error::{Error, Result};
use queue_sim::models::{OutputFormat, SimConfig};
use queue_sim::output::{config_summary, formatter_for};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::parse_args()?;

    match cli.command {
        Command::Run(args) => {
            let config = resolve_config(&args.config)?;
            let format: OutputFormat = args.format.into();
            let result = match format {
                OutputFormat::Summary => engine::run_simulation_summary(&config)?,
                _ => engine::run_simulation(&config)?,
            };
            let output = formatter_for(format).write(&result)?;
            print!("{}", output);
        }
        Command::ShowConfig(args) => {
            let config = resolve_config(&args)?;
            print!("{}", config_summary(&config));
        }
    }

    Ok(())
}

fn resolve_config(args: &ConfigArgs) -> Result<SimConfig> {
    let stdin_input = if args.stdin {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .map_err(|err| Error::ConfigIo(format!("failed to read stdin: {}", err)))?;
        Some(input)
    } else {
        None
    };
    let config = cli::build_config(args, stdin_input.as_deref())?;
    config::validate(&config)?;
    Ok(config)
}
