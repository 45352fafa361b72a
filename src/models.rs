use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SimConfig {
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub resting_servers: usize,
    #[serde(default)]
    pub plain_servers: usize,
    pub max_queue_length: usize,
    pub customers: usize,
    pub arrival_rate: f64,
    pub service_rate: f64,
    #[serde(default)]
    pub resting_rate: f64,
    #[serde(default)]
    pub resting_probability: f64,
    #[serde(default)]
    pub greedy_probability: f64,
}

impl SimConfig {
    pub fn server_count(&self) -> usize {
        self.resting_servers + self.plain_servers
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Human,
    Summary,
    Json,
}
