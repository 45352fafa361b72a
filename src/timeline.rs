use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::trace;

use crate::events::{Event, ScheduledEvent};

/// Stable handle to an event stored in a [`Timeline`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct EventId(usize);

/// Event arena plus a min-heap of pending handles.
///
/// The heap holds snapshots of each event's ordering key. Handlers mutate
/// events through [`Timeline::event_mut`] while they are still pending, so
/// any such mutation must be followed by [`Timeline::rebuild`].
///
/// The arena is append-only: retired events keep their slot, so memory grows
/// with the number of events scheduled over one run.
#[derive(Debug, Default)]
pub struct Timeline {
    arena: Vec<Event>,
    heap: BinaryHeap<Reverse<ScheduledEvent>>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Vec::with_capacity(capacity),
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    /// Stores a new event and makes it pending.
    pub fn schedule(&mut self, event: Event) -> EventId {
        let id = EventId(self.arena.len());
        self.arena.push(event);
        trace!(
            customer_id = event.customer_id(),
            server_id = ?event.server_id(),
            time = event.time(),
            state = %event.state(),
            "scheduled"
        );
        self.requeue(id);
        id
    }

    /// Makes an already stored event pending again with its current key.
    pub fn requeue(&mut self, id: EventId) {
        let snapshot = ScheduledEvent::new(self.arena[id.0], id);
        self.heap.push(Reverse(snapshot));
    }

    /// Removes and returns the earliest pending event.
    pub fn pop(&mut self) -> Option<EventId> {
        self.heap.pop().map(|Reverse(scheduled)| scheduled.id)
    }

    pub fn peek(&self) -> Option<&Event> {
        self.heap
            .peek()
            .map(|Reverse(scheduled)| &self.arena[scheduled.id.0])
    }

    pub fn event(&self, id: EventId) -> &Event {
        &self.arena[id.0]
    }

    pub fn event_mut(&mut self, id: EventId) -> &mut Event {
        &mut self.arena[id.0]
    }

    /// Drains every pending handle and reinserts it with a fresh key.
    pub fn rebuild(&mut self) {
        let mut pending = Vec::with_capacity(self.heap.len());
        while let Some(Reverse(scheduled)) = self.heap.pop() {
            pending.push(scheduled.id);
        }
        for id in pending {
            self.requeue(id);
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
