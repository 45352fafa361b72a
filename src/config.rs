use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::SimConfig;

pub fn load_config(path: &Path) -> Result<SimConfig> {
    let contents = fs::read_to_string(path).map_err(|err| {
        Error::ConfigIo(format!(
            "failed to read config '{}': {}",
            path.display(),
            err
        ))
    })?;
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .unwrap_or("");

    match ext {
        "toml" => toml::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse TOML: {}", err))),
        "json" => serde_json::from_str(&contents)
            .map_err(|err| Error::ConfigParse(format!("failed to parse JSON: {}", err))),
        "" => Err(Error::UnsupportedConfigFormat("unknown".to_string())),
        _ => Err(Error::UnsupportedConfigFormat(ext.to_string())),
    }
}

/// Parses the whitespace-separated parameter line:
/// `seed resting plain max_queue customers arrival service resting_rate p_rest p_greedy`.
pub fn parse_params(input: &str) -> Result<SimConfig> {
    let mut tokens = input.split_whitespace();

    let config = SimConfig {
        seed: next_value(&mut tokens, "seed")?,
        resting_servers: next_value(&mut tokens, "resting_servers")?,
        plain_servers: next_value(&mut tokens, "plain_servers")?,
        max_queue_length: next_value(&mut tokens, "max_queue_length")?,
        customers: next_value(&mut tokens, "customers")?,
        arrival_rate: next_value(&mut tokens, "arrival_rate")?,
        service_rate: next_value(&mut tokens, "service_rate")?,
        resting_rate: next_value(&mut tokens, "resting_rate")?,
        resting_probability: next_value(&mut tokens, "resting_probability")?,
        greedy_probability: next_value(&mut tokens, "greedy_probability")?,
    };

    if let Some(extra) = tokens.next() {
        return Err(Error::TrailingInput(extra.to_string()));
    }

    Ok(config)
}

fn next_value<'a, T: FromStr>(
    tokens: &mut impl Iterator<Item = &'a str>,
    name: &'static str,
) -> Result<T> {
    let token = tokens.next().ok_or(Error::MissingParameter(name))?;
    token.parse().map_err(|_| Error::InvalidParameter {
        name,
        value: token.to_string(),
    })
}

pub fn validate(config: &SimConfig) -> Result<()> {
    if config.server_count() == 0 {
        return Err(Error::NoServers);
    }
    if config.customers == 0 {
        return Err(Error::CustomersZero);
    }
    if config.arrival_rate <= 0.0 || !config.arrival_rate.is_finite() {
        return Err(Error::InvalidArrivalRate(config.arrival_rate));
    }
    if config.service_rate <= 0.0 || !config.service_rate.is_finite() {
        return Err(Error::InvalidServiceRate(config.service_rate));
    }
    check_probability("resting_probability", config.resting_probability)?;
    check_probability("greedy_probability", config.greedy_probability)?;

    let can_rest = config.resting_servers > 0 && config.resting_probability > 0.0;
    if can_rest && (config.resting_rate <= 0.0 || !config.resting_rate.is_finite()) {
        return Err(Error::InvalidRestingRate(config.resting_rate));
    }

    Ok(())
}

fn check_probability(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidProbability { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SimConfig {
        SimConfig {
            seed: 1,
            resting_servers: 1,
            plain_servers: 1,
            max_queue_length: 2,
            customers: 10,
            arrival_rate: 1.0,
            service_rate: 1.0,
            resting_rate: 0.1,
            resting_probability: 0.5,
            greedy_probability: 0.2,
        }
    }

    #[test]
    fn parse_params_reads_ten_values() {
        let config = parse_params("1 1 1 2 10\n1.0 1.0 0.1 0.5 0.2\n").unwrap();
        assert_eq!(config, sample());
    }

    #[test]
    fn parse_params_reports_missing_value() {
        let err = parse_params("1 2 0 2 10 1.0 1.0 0.1 0.5").unwrap_err();
        assert_eq!(err.to_string(), "missing parameter 'greedy_probability'");
    }

    #[test]
    fn parse_params_reports_invalid_value() {
        let err = parse_params("1 two 0 2 10 1.0 1.0 0.1 0.5 0.2").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for 'resting_servers': 'two'"
        );
    }

    #[test]
    fn parse_params_rejects_trailing_input() {
        let err = parse_params("1 1 1 2 10 1.0 1.0 0.1 0.5 0.2 9").unwrap_err();
        assert_eq!(err.to_string(), "unexpected trailing input '9'");
    }

    #[test]
    fn validate_accepts_sample() {
        assert!(validate(&sample()).is_ok());
    }

    #[test]
    fn validate_rejects_missing_servers() {
        let config = SimConfig {
            resting_servers: 0,
            plain_servers: 0,
            ..sample()
        };
        assert_eq!(
            validate(&config).unwrap_err().to_string(),
            "at least one server is required"
        );
    }

    #[test]
    fn validate_rejects_zero_customers() {
        let config = SimConfig {
            customers: 0,
            ..sample()
        };
        assert!(matches!(validate(&config), Err(Error::CustomersZero)));
    }

    #[test]
    fn validate_rejects_bad_rates() {
        let config = SimConfig {
            service_rate: 0.0,
            ..sample()
        };
        assert!(matches!(
            validate(&config),
            Err(Error::InvalidServiceRate(_))
        ));

        let config = SimConfig {
            resting_rate: 0.0,
            ..sample()
        };
        assert!(matches!(
            validate(&config),
            Err(Error::InvalidRestingRate(_))
        ));
    }

    #[test]
    fn resting_rate_is_unused_without_rest() {
        let config = SimConfig {
            resting_rate: 0.0,
            resting_probability: 0.0,
            ..sample()
        };
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_probability() {
        let config = SimConfig {
            greedy_probability: 1.5,
            ..sample()
        };
        assert_eq!(
            validate(&config).unwrap_err().to_string(),
            "greedy_probability must be within [0, 1] (got 1.5)"
        );
    }

    #[test]
    fn load_config_reports_missing_file() {
        let err = load_config(Path::new("does-not-exist.toml")).unwrap_err();
        assert!(matches!(err, Error::ConfigIo(_)));
    }
}
