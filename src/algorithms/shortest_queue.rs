use crate::algorithms::{Selection, SelectionContext, SelectionStrategy};

/// Shortest queue below capacity; ties keep the lowest id.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShortestQueueStrategy;

impl SelectionStrategy for ShortestQueueStrategy {
    fn select(&self, ctx: &SelectionContext) -> Selection {
        let mut shortest = ctx.max_queue_length;
        let mut selection = Selection::none();

        for server in ctx.servers {
            let length = server.queue_length();
            if length < shortest {
                shortest = length;
                selection = Selection::server(server);
            }
        }

        selection
    }
}
