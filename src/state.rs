use serde::Serialize;

use crate::algorithms::{FirstAvailableStrategy, SelectionStrategy, ShortestQueueStrategy};
use crate::events::{Event, EventState};
use crate::server::ServerKind;

static FIRST_AVAILABLE: FirstAvailableStrategy = FirstAvailableStrategy;
static SHORTEST_QUEUE: ShortestQueueStrategy = ShortestQueueStrategy;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CustomerKind {
    Plain,
    Greedy,
}

impl CustomerKind {
    /// Queue policy used when no server is idle.
    pub fn strategy(self) -> &'static dyn SelectionStrategy {
        match self {
            CustomerKind::Plain => &FIRST_AVAILABLE,
            CustomerKind::Greedy => &SHORTEST_QUEUE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Customer {
    pub id: usize,
    pub arrival_time: f64,
    pub kind: CustomerKind,
}

impl Customer {
    pub fn is_greedy(&self) -> bool {
        self.kind == CustomerKind::Greedy
    }
}

/// Run-wide tallies updated by server handlers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Counters {
    pub customers: usize,
    pub served: usize,
    pub total_waiting_time: f64,
}

impl Counters {
    pub fn lost(&self) -> usize {
        self.customers - self.served
    }

    pub fn average_waiting_time(&self) -> f64 {
        if self.served == 0 {
            0.0
        } else {
            self.total_waiting_time / self.served as f64
        }
    }
}

/// One dispatched event, with enough context to render a log line.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EventRecord {
    pub time: f64,
    pub state: EventState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_kind: Option<CustomerKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_id: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_kind: Option<ServerKind>,
}

impl EventRecord {
    pub fn new(
        event: &Event,
        customer: Option<&Customer>,
        server_kind: Option<ServerKind>,
    ) -> Self {
        Self {
            time: event.time(),
            state: event.state(),
            customer_id: customer.map(|customer| customer.id),
            customer_kind: customer.map(|customer| customer.kind),
            server_id: event.server_id(),
            server_kind,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunSummary {
    pub customers: usize,
    pub served: usize,
    pub lost: usize,
    pub total_waiting_time: f64,
    pub average_waiting_time: f64,
}

impl From<&Counters> for RunSummary {
    fn from(counters: &Counters) -> Self {
        Self {
            customers: counters.customers,
            served: counters.served,
            lost: counters.lost(),
            total_waiting_time: counters.total_waiting_time,
            average_waiting_time: counters.average_waiting_time(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunMetadata {
    pub seed: u64,
    pub resting_servers: usize,
    pub plain_servers: usize,
    pub max_queue_length: usize,
    pub dispatched_events: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationResult {
    pub metadata: RunMetadata,
    pub events: Vec<EventRecord>,
    pub summary: RunSummary,
}
