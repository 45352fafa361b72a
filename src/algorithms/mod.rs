mod first_available;
mod shortest_queue;

use crate::server::Server;

pub use first_available::FirstAvailableStrategy;
pub use shortest_queue::ShortestQueueStrategy;

/// Picks a wait queue for a customer once no server is idle.
pub trait SelectionStrategy: Sync {
    fn select(&self, ctx: &SelectionContext) -> Selection;
}

pub struct SelectionContext<'a> {
    pub servers: &'a [Server],
    pub max_queue_length: usize,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Selection {
    /// `None` when every queue is full and the customer leaves.
    pub server_id: Option<usize>,
    pub queue_length: Option<usize>,
}

impl Selection {
    pub fn none() -> Self {
        Self {
            server_id: None,
            queue_length: None,
        }
    }

    pub fn server(server: &Server) -> Self {
        Self {
            server_id: Some(server.id()),
            queue_length: Some(server.queue_length()),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::server::{Server, ServerKind};

    /// Busy plain servers with the given queue lengths.
    pub fn busy_servers(queue_lengths: &[usize], capacity: usize) -> Vec<Server> {
        queue_lengths
            .iter()
            .enumerate()
            .map(|(idx, &len)| Server::test_with_queue(idx + 1, ServerKind::Plain, capacity, len))
            .collect()
    }
}
