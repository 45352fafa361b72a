use serde::Serialize;
use std::collections::VecDeque;
use tracing::debug;

use crate::error::{Error, Result};
use crate::events::{Event, EventState};
use crate::random::RandomSource;
use crate::state::Counters;
use crate::timeline::{EventId, Timeline};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServerKind {
    /// May take a break after finishing a customer.
    Resting,
    Plain,
}

/// Simulation state a server borrows for the length of one dispatch.
pub struct DispatchContext<'a> {
    pub timeline: &'a mut Timeline,
    pub counters: &'a mut Counters,
    pub random: &'a mut dyn RandomSource,
    pub resting_probability: f64,
}

/// What the engine should do once a handler returns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dispatch {
    /// Put the dispatched event back on the timeline.
    pub requeue: bool,
    pub follow_up: Option<Event>,
    /// Queued timestamps moved; the timeline must be rebuilt.
    pub rebuild: bool,
}

impl Dispatch {
    fn requeue() -> Self {
        Self {
            requeue: true,
            follow_up: None,
            rebuild: false,
        }
    }

    fn requeue_and_rebuild() -> Self {
        Self {
            rebuild: true,
            ..Self::requeue()
        }
    }

    fn retire() -> Self {
        Self {
            requeue: false,
            follow_up: None,
            rebuild: false,
        }
    }

    fn emit(event: Event, rebuild: bool) -> Self {
        Self {
            requeue: false,
            follow_up: Some(event),
            rebuild,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Server {
    id: usize,
    kind: ServerKind,
    next_available: f64,
    serving: bool,
    max_queue_length: usize,
    queue: VecDeque<EventId>,
    #[cfg(test)]
    pub(crate) enqueued: Vec<EventId>,
    #[cfg(test)]
    pub(crate) released: Vec<EventId>,
}

impl Server {
    pub fn new(id: usize, kind: ServerKind, max_queue_length: usize) -> Self {
        Self {
            id,
            kind,
            next_available: 0.0,
            serving: false,
            max_queue_length,
            queue: VecDeque::with_capacity(max_queue_length),
            #[cfg(test)]
            enqueued: Vec::new(),
            #[cfg(test)]
            released: Vec::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn kind(&self) -> ServerKind {
        self.kind
    }

    pub fn next_available(&self) -> f64 {
        self.next_available
    }

    pub fn is_serving(&self) -> bool {
        self.serving
    }

    pub fn queue_length(&self) -> usize {
        self.queue.len()
    }

    pub fn has_full_queue(&self) -> bool {
        self.queue.len() >= self.max_queue_length
    }

    /// Runs the handler for the event's current state.
    pub fn dispatch(&mut self, id: EventId, ctx: &mut DispatchContext) -> Result<Dispatch> {
        let event = *ctx.timeline.event(id);
        match event.state() {
            EventState::Arrives => Ok(self.on_arrives(ctx.timeline.event_mut(id))),
            EventState::Waits => Ok(self.on_waits(id, ctx)),
            EventState::Served => Ok(self.on_served(id, ctx)),
            EventState::Done => Ok(self.on_done(&event, ctx)),
            EventState::Rests => self.on_rests(&event, ctx),
            EventState::Back => self.on_back(),
            EventState::Leaves => Ok(Dispatch::retire()),
        }
    }

    fn on_arrives(&self, event: &mut Event) -> Dispatch {
        if event.time() < self.next_available {
            if self.has_full_queue() {
                debug!(
                    server_id = self.id,
                    customer_id = event.customer_id(),
                    "queue full, customer leaves"
                );
                event.transition_to(EventState::Leaves);
            } else {
                event.transition_to(EventState::Waits);
            }
        } else {
            event.transition_to(EventState::Served);
        }
        Dispatch::requeue()
    }

    fn on_waits(&mut self, id: EventId, ctx: &mut DispatchContext) -> Dispatch {
        let event = ctx.timeline.event_mut(id);
        event.transition_to(EventState::Served);
        ctx.counters.total_waiting_time += event.snap_to(self.next_available);
        debug_assert!(!self.queue.contains(&id), "event queued twice");
        self.queue.push_back(id);
        debug_assert!(
            self.queue.len() <= self.max_queue_length,
            "server {} queue over capacity",
            self.id
        );
        #[cfg(test)]
        self.enqueued.push(id);
        Dispatch::requeue()
    }

    fn on_served(&mut self, id: EventId, ctx: &mut DispatchContext) -> Dispatch {
        let service_time = ctx.random.service_time();
        let event = ctx.timeline.event_mut(id);
        event.advance(service_time);
        event.transition_to(EventState::Done);
        let completes_at = event.time();

        self.set_next_available(completes_at, Some(id), ctx);
        self.serving = true;
        ctx.counters.served += 1;
        Dispatch::requeue_and_rebuild()
    }

    fn on_done(&mut self, event: &Event, ctx: &mut DispatchContext) -> Dispatch {
        if self.kind == ServerKind::Resting
            && ctx.random.rest_trial() < ctx.resting_probability
        {
            return Dispatch::emit(
                Event::for_server(self.id, event.time(), EventState::Rests),
                false,
            );
        }
        self.release_next();
        Dispatch::retire()
    }

    fn on_rests(&mut self, event: &Event, ctx: &mut DispatchContext) -> Result<Dispatch> {
        self.require_resting(EventState::Rests)?;
        let rest_period = ctx.random.rest_period();
        let back_at = self.next_available + rest_period;
        self.set_next_available(back_at, None, ctx);
        debug!(
            server_id = self.id,
            from = event.time(),
            until = back_at,
            "server resting"
        );
        Ok(Dispatch::emit(
            Event::for_server(self.id, back_at, EventState::Back),
            true,
        ))
    }

    fn on_back(&mut self) -> Result<Dispatch> {
        self.require_resting(EventState::Back)?;
        self.release_next();
        Ok(Dispatch::retire())
    }

    fn require_resting(&self, state: EventState) -> Result<()> {
        match self.kind {
            ServerKind::Resting => Ok(()),
            ServerKind::Plain => Err(Error::InvalidTransition {
                server_id: self.id,
                state,
            }),
        }
    }

    /// Lets the head of the queue through, or goes idle when nobody waits.
    fn release_next(&mut self) {
        match self.queue.pop_front() {
            #[cfg(test)]
            Some(id) => self.released.push(id),
            #[cfg(not(test))]
            Some(_) => {}
            None => self.serving = false,
        }
    }

    /// Moves the clock and shifts every queued event (except `skip`) by the
    /// same amount, charging the shift as waiting time.
    fn set_next_available(
        &mut self,
        new_time: f64,
        skip: Option<EventId>,
        ctx: &mut DispatchContext,
    ) {
        let delta = new_time - self.next_available;
        self.next_available = new_time;
        for &queued in self.queue.iter().filter(|&&queued| Some(queued) != skip) {
            ctx.timeline.event_mut(queued).advance(delta);
            ctx.counters.total_waiting_time += delta;
        }
    }

    #[cfg(test)]
    pub(crate) fn test_with_queue(
        id: usize,
        kind: ServerKind,
        max_queue_length: usize,
        queue_length: usize,
    ) -> Self {
        let mut timeline = Timeline::new();
        let mut server = Self::new(id, kind, max_queue_length);
        server.serving = true;
        for customer_id in 0..queue_length {
            let handle = timeline.schedule(Event::new(
                customer_id + 1,
                Some(id),
                0.0,
                EventState::Served,
            ));
            server.queue.push_back(handle);
        }
        server
    }
}
