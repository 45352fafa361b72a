use tracing::{debug, info};

use crate::algorithms::SelectionContext;
use crate::config::validate;
use crate::error::{Error, Result};
use crate::events::{Event, EventState};
use crate::models::SimConfig;
use crate::random::{RandomSource, SeededRandom};
use crate::server::{DispatchContext, Server, ServerKind};
use crate::state::{
    Counters, Customer, CustomerKind, EventRecord, RunMetadata, RunSummary, SimulationResult,
};
use crate::timeline::{EventId, Timeline};

pub struct SimulationEngine {
    pub config: SimConfig,
    pub servers: Vec<Server>,
    pub customers: Vec<Customer>,
    pub timeline: Timeline,
    pub counters: Counters,
    pub random: Box<dyn RandomSource>,
    records: Vec<EventRecord>,
    record_events: bool,
    dispatched: usize,
}

impl SimulationEngine {
    pub fn new(config: SimConfig, random: Box<dyn RandomSource>) -> Self {
        Self {
            config,
            servers: Vec::new(),
            customers: Vec::new(),
            timeline: Timeline::new(),
            counters: Counters::default(),
            random,
            records: Vec::new(),
            record_events: false,
            dispatched: 0,
        }
    }

    pub fn run(&mut self, record_events: bool) -> Result<SimulationResult> {
        self.prepare(record_events)?;
        while self.step()? {}

        info!(
            dispatched = self.dispatched,
            served = self.counters.served,
            lost = self.counters.lost(),
            total_waiting_time = self.counters.total_waiting_time,
            "simulation finished"
        );

        Ok(SimulationResult {
            metadata: RunMetadata {
                seed: self.config.seed,
                resting_servers: self.config.resting_servers,
                plain_servers: self.config.plain_servers,
                max_queue_length: self.config.max_queue_length,
                dispatched_events: self.dispatched,
            },
            events: std::mem::take(&mut self.records),
            summary: RunSummary::from(&self.counters),
        })
    }

    /// Validates the config, builds servers and customers, and schedules
    /// one unassigned arrival per customer.
    pub fn prepare(&mut self, record_events: bool) -> Result<()> {
        validate(&self.config)?;

        self.servers = init_servers(&self.config);
        self.customers = build_customers(&self.config, self.random.as_mut());
        self.counters = Counters {
            customers: self.customers.len(),
            ..Counters::default()
        };
        self.dispatched = 0;
        self.record_events = record_events;
        self.records = if record_events {
            Vec::with_capacity(self.customers.len() * 4)
        } else {
            Vec::new()
        };

        self.timeline = Timeline::with_capacity(self.customers.len() * 2);
        for customer in &self.customers {
            self.timeline
                .schedule(Event::arrival(customer.id, customer.arrival_time));
        }

        info!(
            customers = self.customers.len(),
            servers = self.servers.len(),
            seed = self.config.seed,
            "starting simulation"
        );
        Ok(())
    }

    /// Dispatches the earliest pending event. Returns `false` once the
    /// timeline has drained.
    pub fn step(&mut self) -> Result<bool> {
        let Some(id) = self.timeline.pop() else {
            return Ok(false);
        };
        self.dispatched += 1;
        let event = *self.timeline.event(id);
        debug!(
            time = event.time(),
            customer_id = event.customer_id(),
            server_id = ?event.server_id(),
            state = %event.state(),
            pending = self.timeline.len(),
            "dispatching"
        );
        match event.server_id() {
            None => self.assign_server(&event)?,
            Some(server_id) => self.dispatch_to_server(id, server_id, &event)?,
        }
        Ok(true)
    }

    /// Routes an unassigned arrival: idle server first, then the customer's
    /// queue policy, otherwise the customer is lost.
    fn assign_server(&mut self, event: &Event) -> Result<()> {
        if event.state() != EventState::Arrives {
            return Err(Error::UnassignedEvent {
                customer_id: event.customer_id(),
                state: event.state(),
            });
        }
        let customer = *self.customer(event.customer_id())?;

        if let Some(server) = self.servers.iter().find(|server| !server.is_serving()) {
            self.timeline.schedule(event.assigned(server.id()));
            return Ok(());
        }

        let ctx = SelectionContext {
            servers: &self.servers,
            max_queue_length: self.config.max_queue_length,
        };
        let selection = customer.kind.strategy().select(&ctx);
        match selection.server_id {
            Some(server_id) => {
                debug!(
                    customer_id = customer.id,
                    server_id,
                    queue_length = ?selection.queue_length,
                    "joining queue"
                );
                self.timeline.schedule(event.assigned(server_id));
            }
            None => {
                debug!(customer_id = customer.id, "no queue available, customer lost");
                let mut leaving = *event;
                leaving.transition_to(EventState::Leaves);
                self.record(event, Some(customer), None);
                self.record(&leaving, Some(customer), None);
            }
        }
        Ok(())
    }

    fn dispatch_to_server(&mut self, id: EventId, server_id: usize, event: &Event) -> Result<()> {
        let customer = match event.customer_id() {
            0 => None,
            customer_id => Some(*self.customer(customer_id)?),
        };
        let server = server_id
            .checked_sub(1)
            .and_then(|idx| self.servers.get_mut(idx))
            .ok_or(Error::UnknownServer(server_id))?;
        let server_kind = server.kind();

        let mut ctx = DispatchContext {
            timeline: &mut self.timeline,
            counters: &mut self.counters,
            random: self.random.as_mut(),
            resting_probability: self.config.resting_probability,
        };
        let dispatch = server.dispatch(id, &mut ctx)?;

        self.record(event, customer, Some(server_kind));

        debug_assert!(!(dispatch.requeue && event.state().is_terminal()));
        if dispatch.requeue {
            self.timeline.requeue(id);
        }
        if let Some(follow_up) = dispatch.follow_up {
            self.timeline.schedule(follow_up);
        }
        if dispatch.rebuild {
            self.timeline.rebuild();
            debug!(server_id, pending = self.timeline.len(), "timeline rebuilt");
        }
        Ok(())
    }

    fn record(
        &mut self,
        event: &Event,
        customer: Option<Customer>,
        server_kind: Option<ServerKind>,
    ) {
        if self.record_events {
            self.records
                .push(EventRecord::new(event, customer.as_ref(), server_kind));
        }
    }

    fn customer(&self, customer_id: usize) -> Result<&Customer> {
        customer_id
            .checked_sub(1)
            .and_then(|idx| self.customers.get(idx))
            .ok_or(Error::UnknownCustomer(customer_id))
    }
}

pub fn run_simulation(config: &SimConfig) -> Result<SimulationResult> {
    run_simulation_with_options(config, true)
}

pub fn run_simulation_summary(config: &SimConfig) -> Result<SimulationResult> {
    run_simulation_with_options(config, false)
}

pub fn run_simulation_with_options(
    config: &SimConfig,
    record_events: bool,
) -> Result<SimulationResult> {
    let random = SeededRandom::new(
        config.seed,
        config.arrival_rate,
        config.service_rate,
        config.resting_rate,
    );
    let mut engine = SimulationEngine::new(config.clone(), Box::new(random));
    engine.run(record_events)
}

/// Resting-capable servers take the lowest ids, plain servers follow.
fn init_servers(config: &SimConfig) -> Vec<Server> {
    let resting = (0..config.resting_servers).map(|_| ServerKind::Resting);
    let plain = (0..config.plain_servers).map(|_| ServerKind::Plain);
    resting
        .chain(plain)
        .enumerate()
        .map(|(idx, kind)| Server::new(idx + 1, kind, config.max_queue_length))
        .collect()
}

fn build_customers(config: &SimConfig, random: &mut dyn RandomSource) -> Vec<Customer> {
    let mut arrival_time = 0.0;
    (1..=config.customers)
        .map(|id| {
            let gap = random.inter_arrival_time();
            let kind = if random.customer_type() < config.greedy_probability {
                CustomerKind::Greedy
            } else {
                CustomerKind::Plain
            };
            let customer = Customer {
                id,
                arrival_time,
                kind,
            };
            arrival_time += gap;
            customer
        })
        .collect()
}
