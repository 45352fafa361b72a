use crate::error::Result;
use crate::events::EventState;
use crate::models::{OutputFormat, SimConfig};
use crate::server::ServerKind;
use crate::state::{CustomerKind, EventRecord, RunSummary, SimulationResult};

pub trait Formatter {
    fn write(&self, result: &SimulationResult) -> Result<String>;
}

/// Event log, one line per dispatched event, followed by the summary line.
pub struct HumanFormatter;

/// Only the summary line.
pub struct SummaryFormatter;

pub struct JsonFormatter;

pub fn formatter_for(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Human => Box::new(HumanFormatter),
        OutputFormat::Summary => Box::new(SummaryFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

impl Formatter for HumanFormatter {
    fn write(&self, result: &SimulationResult) -> Result<String> {
        let mut output = String::new();
        for record in &result.events {
            output.push_str(&event_line(record));
            output.push('\n');
        }
        output.push_str(&summary_line(&result.summary));
        output.push('\n');
        Ok(output)
    }
}

impl Formatter for SummaryFormatter {
    fn write(&self, result: &SimulationResult) -> Result<String> {
        Ok(format!("{}\n", summary_line(&result.summary)))
    }
}

impl Formatter for JsonFormatter {
    fn write(&self, result: &SimulationResult) -> Result<String> {
        let mut output = serde_json::to_string_pretty(result)?;
        output.push('\n');
        Ok(output)
    }
}

pub fn event_line(record: &EventRecord) -> String {
    let server_id = record.server_id.unwrap_or_default();
    match record.state {
        EventState::Rests => return format!("{:.3} server {} rest", record.time, server_id),
        EventState::Back => return format!("{:.3} server {} back", record.time, server_id),
        _ => {}
    }

    let greedy = if record.customer_kind == Some(CustomerKind::Greedy) {
        "(greedy)"
    } else {
        ""
    };
    let base = format!(
        "{:.3} {}{} {}",
        record.time,
        record.customer_id.unwrap_or_default(),
        greedy,
        record.state
    );

    let server = match record.server_kind {
        Some(ServerKind::Resting) => format!("server {}", server_id),
        Some(ServerKind::Plain) => format!("self-check {}", server_id),
        None => return base,
    };

    match record.state {
        EventState::Served => format!("{} by {}", base, server),
        EventState::Waits => format!("{} to be served by {}", base, server),
        EventState::Done => format!("{} serving by {}", base, server),
        _ => base,
    }
}

pub fn summary_line(summary: &RunSummary) -> String {
    format!(
        "[{:.3} {} {}]",
        summary.average_waiting_time, summary.served, summary.lost
    )
}

pub fn config_summary(config: &SimConfig) -> String {
    [
        format!("Seed: {}", config.seed),
        format!(
            "Servers: {} resting, {} plain",
            config.resting_servers, config.plain_servers
        ),
        format!("Max queue length: {}", config.max_queue_length),
        format!("Customers: {}", config.customers),
        format!("Arrival rate: {}", config.arrival_rate),
        format!("Service rate: {}", config.service_rate),
        format!("Resting rate: {}", config.resting_rate),
        format!("Resting probability: {}", config.resting_probability),
        format!("Greedy probability: {}", config.greedy_probability),
    ]
    .iter()
    .map(|line| format!("{line}\n"))
    .collect()
}
