use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

use crate::timeline::EventId;

/// Lifecycle stage carried by an [`Event`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventState {
    Arrives,
    Waits,
    Served,
    Done,
    Leaves,
    Rests,
    Back,
}

impl EventState {
    /// Terminal events are dropped once dispatched and never requeued.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            EventState::Done | EventState::Leaves | EventState::Rests | EventState::Back
        )
    }

    /// Server-only events that start or end a rest period.
    pub fn is_server_resume(self) -> bool {
        matches!(self, EventState::Rests | EventState::Back)
    }

    pub fn label(self) -> &'static str {
        match self {
            EventState::Arrives => "arrives",
            EventState::Waits => "waits",
            EventState::Served => "served",
            EventState::Done => "done",
            EventState::Leaves => "leaves",
            EventState::Rests => "rests",
            EventState::Back => "back",
        }
    }
}

impl fmt::Display for EventState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One point on the timeline. Server-only events use customer id 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Event {
    customer_id: usize,
    server_id: Option<usize>,
    time: f64,
    state: EventState,
}

impl Event {
    pub fn new(
        customer_id: usize,
        server_id: Option<usize>,
        time: f64,
        state: EventState,
    ) -> Self {
        Self {
            customer_id,
            server_id,
            time,
            state,
        }
    }

    /// Unassigned arrival for a freshly created customer.
    pub fn arrival(customer_id: usize, time: f64) -> Self {
        Self::new(customer_id, None, time, EventState::Arrives)
    }

    pub fn for_server(server_id: usize, time: f64, state: EventState) -> Self {
        Self::new(0, Some(server_id), time, state)
    }

    /// Same customer and instant, handed to `server_id`.
    pub fn assigned(&self, server_id: usize) -> Self {
        Self::new(self.customer_id, Some(server_id), self.time, EventState::Arrives)
    }

    pub fn customer_id(&self) -> usize {
        self.customer_id
    }

    pub fn server_id(&self) -> Option<usize> {
        self.server_id
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn state(&self) -> EventState {
        self.state
    }

    pub fn advance(&mut self, delta: f64) {
        self.time += delta;
    }

    /// Moves the event to `new_time` and returns how far it moved.
    pub fn snap_to(&mut self, new_time: f64) -> f64 {
        let difference = new_time - self.time;
        self.time = new_time;
        difference
    }

    pub fn transition_to(&mut self, state: EventState) {
        self.state = state;
    }
}

/// Dispatch order between two pending events.
///
/// Earlier time wins. At equal times only `b` is checked for being a
/// rest/back event, in which case `a` yields to it; otherwise the smaller
/// customer id goes first. Rest and back events carry customer id 0, so at a
/// shared instant they run before any customer event whichever side they are
/// on. Two rest/back events at the same instant both compare as `Greater`.
pub fn compare_events(a: &Event, b: &Event) -> Ordering {
    match a.time.total_cmp(&b.time) {
        Ordering::Equal if b.state.is_server_resume() => Ordering::Greater,
        Ordering::Equal => a.customer_id.cmp(&b.customer_id),
        ordering => ordering,
    }
}

/// Heap entry: a snapshot of an event's ordering key plus its arena handle.
#[derive(Clone, Copy, Debug)]
pub struct ScheduledEvent {
    pub event: Event,
    pub id: EventId,
}

impl ScheduledEvent {
    pub fn new(event: Event, id: EventId) -> Self {
        Self { event, id }
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_events(&self.event, &other.event)
    }
}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledEvent {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earlier_time_orders_first() {
        let early = Event::arrival(5, 1.0);
        let late = Event::arrival(1, 2.0);
        assert_eq!(compare_events(&early, &late), Ordering::Less);
        assert_eq!(compare_events(&late, &early), Ordering::Greater);
    }

    #[test]
    fn equal_times_fall_back_to_customer_id() {
        let first = Event::new(1, Some(1), 3.0, EventState::Done);
        let second = Event::new(2, Some(1), 3.0, EventState::Served);
        assert_eq!(compare_events(&first, &second), Ordering::Less);
        assert_eq!(compare_events(&second, &first), Ordering::Greater);
        assert_eq!(compare_events(&first, &first), Ordering::Equal);
    }

    #[test]
    fn rest_events_win_ties_from_either_side() {
        let rest = Event::for_server(1, 2.0, EventState::Rests);
        let customer = Event::new(3, Some(1), 2.0, EventState::Served);
        assert_eq!(compare_events(&customer, &rest), Ordering::Greater);
        assert_eq!(compare_events(&rest, &customer), Ordering::Less);
    }

    #[test]
    fn tie_between_resume_events_only_checks_second_operand() {
        let rest = Event::for_server(1, 2.0, EventState::Rests);
        let back = Event::for_server(2, 2.0, EventState::Back);
        assert_eq!(compare_events(&rest, &back), Ordering::Greater);
        assert_eq!(compare_events(&back, &rest), Ordering::Greater);
    }

    #[test]
    fn snap_to_returns_signed_difference() {
        let mut event = Event::new(1, Some(1), 0.5, EventState::Waits);
        assert_eq!(event.snap_to(1.25), 0.75);
        assert_eq!(event.time(), 1.25);
        event.advance(0.25);
        assert_eq!(event.time(), 1.5);
    }

    #[test]
    fn assigned_keeps_customer_and_time() {
        let event = Event::arrival(4, 2.5).assigned(3);
        assert_eq!(event.customer_id(), 4);
        assert_eq!(event.server_id(), Some(3));
        assert_eq!(event.time(), 2.5);
        assert_eq!(event.state(), EventState::Arrives);
    }

    #[test]
    fn terminal_states_are_tagged() {
        assert!(EventState::Done.is_terminal());
        assert!(EventState::Leaves.is_terminal());
        assert!(!EventState::Waits.is_terminal());
        assert!(!EventState::Served.is_terminal());
        assert_eq!(EventState::Waits.to_string(), "waits");
    }
}
