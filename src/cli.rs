use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::{load_config, parse_params};
use crate::error::{Error, Result};
use crate::models::{OutputFormat, SimConfig};

#[derive(Parser, Debug)]
#[command(name = "queue-sim", about = "Discrete-event simulation of a multi-server queue")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a simulation and print the event log and summary
    Run(RunArgs),
    /// Print the resolved configuration without running
    ShowConfig(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub config: ConfigArgs,
    #[arg(long, value_enum, default_value_t = FormatArg::Human)]
    pub format: FormatArg,
}

/// Configuration sources. Explicit flags override values from a config file
/// or the stdin parameter line.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    #[arg(long, conflicts_with = "stdin")]
    pub config: Option<PathBuf>,
    /// Read the ten-value parameter line from stdin: seed, resting servers,
    /// plain servers, max queue, customers, arrival rate, service rate,
    /// resting rate, resting probability, greedy probability
    #[arg(long)]
    pub stdin: bool,
    #[arg(long)]
    pub seed: Option<u64>,
    #[arg(long)]
    pub resting_servers: Option<usize>,
    #[arg(long)]
    pub plain_servers: Option<usize>,
    #[arg(long)]
    pub max_queue: Option<usize>,
    #[arg(long)]
    pub customers: Option<usize>,
    #[arg(long)]
    pub arrival_rate: Option<f64>,
    #[arg(long)]
    pub service_rate: Option<f64>,
    #[arg(long)]
    pub resting_rate: Option<f64>,
    #[arg(long)]
    pub resting_probability: Option<f64>,
    #[arg(long)]
    pub greedy_probability: Option<f64>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum FormatArg {
    Human,
    Summary,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Human => OutputFormat::Human,
            FormatArg::Summary => OutputFormat::Summary,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

pub fn parse_args() -> Result<Cli> {
    Cli::try_parse().map_err(|e| Error::Cli(e.to_string()))
}

/// Resolves a config from a file, the stdin line (`stdin_input`) or flags.
pub fn build_config(args: &ConfigArgs, stdin_input: Option<&str>) -> Result<SimConfig> {
    let base = if let Some(path) = &args.config {
        Some(load_config(path)?)
    } else if args.stdin {
        let input = stdin_input.ok_or(Error::MissingParameter("stdin"))?;
        Some(parse_params(input)?)
    } else {
        None
    };

    let config = match base {
        Some(config) => SimConfig {
            seed: args.seed.unwrap_or(config.seed),
            resting_servers: args.resting_servers.unwrap_or(config.resting_servers),
            plain_servers: args.plain_servers.unwrap_or(config.plain_servers),
            max_queue_length: args.max_queue.unwrap_or(config.max_queue_length),
            customers: args.customers.unwrap_or(config.customers),
            arrival_rate: args.arrival_rate.unwrap_or(config.arrival_rate),
            service_rate: args.service_rate.unwrap_or(config.service_rate),
            resting_rate: args.resting_rate.unwrap_or(config.resting_rate),
            resting_probability: args
                .resting_probability
                .unwrap_or(config.resting_probability),
            greedy_probability: args.greedy_probability.unwrap_or(config.greedy_probability),
        },
        None => SimConfig {
            seed: args.seed.unwrap_or(0),
            resting_servers: args.resting_servers.unwrap_or(0),
            plain_servers: args.plain_servers.unwrap_or(0),
            max_queue_length: args.max_queue.ok_or(Error::MissingParameter("max-queue"))?,
            customers: args.customers.ok_or(Error::MissingParameter("customers"))?,
            arrival_rate: args
                .arrival_rate
                .ok_or(Error::MissingParameter("arrival-rate"))?,
            service_rate: args
                .service_rate
                .ok_or(Error::MissingParameter("service-rate"))?,
            resting_rate: args.resting_rate.unwrap_or(0.0),
            resting_probability: args.resting_probability.unwrap_or(0.0),
            greedy_probability: args.greedy_probability.unwrap_or(0.0),
        },
    };

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags() -> ConfigArgs {
        ConfigArgs {
            plain_servers: Some(2),
            max_queue: Some(1),
            customers: Some(5),
            arrival_rate: Some(1.0),
            service_rate: Some(2.0),
            ..ConfigArgs::default()
        }
    }

    #[test]
    fn flags_build_config_with_defaults() {
        let config = build_config(&flags(), None).unwrap();
        assert_eq!(config.seed, 0);
        assert_eq!(config.resting_servers, 0);
        assert_eq!(config.plain_servers, 2);
        assert_eq!(config.max_queue_length, 1);
        assert_eq!(config.customers, 5);
        assert_eq!(config.service_rate, 2.0);
        assert_eq!(config.greedy_probability, 0.0);
    }

    #[test]
    fn missing_required_flag_is_reported() {
        let args = ConfigArgs {
            customers: None,
            ..flags()
        };
        let err = build_config(&args, None).unwrap_err();
        assert_eq!(err.to_string(), "missing parameter 'customers'");
    }

    #[test]
    fn flags_override_stdin_values() {
        let args = ConfigArgs {
            stdin: true,
            customers: Some(3),
            ..ConfigArgs::default()
        };
        let config = build_config(&args, Some("7 1 2 3 20 1.0 1.5 0.5 0.1 0.3")).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.resting_servers, 1);
        assert_eq!(config.customers, 3);
        assert_eq!(config.greedy_probability, 0.3);
    }

    #[test]
    fn cli_parses_run_subcommand() {
        let cli = Cli::try_parse_from([
            "queue-sim",
            "run",
            "--plain-servers",
            "1",
            "--max-queue",
            "2",
            "--customers",
            "4",
            "--arrival-rate",
            "1.0",
            "--service-rate",
            "1.0",
            "--format",
            "summary",
        ])
        .unwrap();
        match cli.command {
            Command::Run(args) => {
                assert!(matches!(args.format, FormatArg::Summary));
                assert_eq!(args.config.customers, Some(4));
            }
            Command::ShowConfig(_) => panic!("expected run"),
        }
    }

    #[test]
    fn config_file_conflicts_with_stdin() {
        let result = Cli::try_parse_from([
            "queue-sim",
            "run",
            "--config",
            "sim.toml",
            "--stdin",
        ]);
        assert!(result.is_err());
    }
}
