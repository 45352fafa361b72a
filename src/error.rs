use thiserror::Error;

use crate::events::EventState;

#[derive(Error, Debug)]
pub enum Error {
    #[error("at least one server is required")]
    NoServers,
    #[error("customers must be greater than 0")]
    CustomersZero,
    #[error("arrival rate must be > 0 (got {0})")]
    InvalidArrivalRate(f64),
    #[error("service rate must be > 0 (got {0})")]
    InvalidServiceRate(f64),
    #[error("resting rate must be > 0 when servers can rest (got {0})")]
    InvalidRestingRate(f64),
    #[error("{name} must be within [0, 1] (got {value})")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("missing parameter '{0}'")]
    MissingParameter(&'static str),
    #[error("invalid value for '{name}': '{value}'")]
    InvalidParameter { name: &'static str, value: String },
    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),
    #[error("server {server_id} cannot handle '{state}' events")]
    InvalidTransition { server_id: usize, state: EventState },
    #[error("unassigned event for customer {customer_id} is in state '{state}'")]
    UnassignedEvent {
        customer_id: usize,
        state: EventState,
    },
    #[error("event references unknown server {0}")]
    UnknownServer(usize),
    #[error("event references unknown customer {0}")]
    UnknownCustomer(usize),
    #[error("{0}")]
    ConfigIo(String),
    #[error("{0}")]
    ConfigParse(String),
    #[error("unsupported config format '{0}'")]
    UnsupportedConfigFormat(String),
    #[error("{0}")]
    Cli(String),
    #[error("failed to serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
