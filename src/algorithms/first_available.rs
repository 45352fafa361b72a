use crate::algorithms::{Selection, SelectionContext, SelectionStrategy};

/// First server, in id order, whose queue still has room.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstAvailableStrategy;

impl SelectionStrategy for FirstAvailableStrategy {
    fn select(&self, ctx: &SelectionContext) -> Selection {
        ctx.servers
            .iter()
            .find(|server| !server.has_full_queue())
            .map(Selection::server)
            .unwrap_or_else(Selection::none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::test_support::busy_servers;

    #[test]
    fn first_available_skips_full_queues() {
        let servers = busy_servers(&[2, 2, 1, 0], 2);
        let ctx = SelectionContext {
            servers: &servers,
            max_queue_length: 2,
        };
        assert_eq!(FirstAvailableStrategy.select(&ctx).server_id, Some(3));
    }

    #[test]
    fn first_available_ignores_shorter_later_queues() {
        let servers = busy_servers(&[2, 0], 3);
        let ctx = SelectionContext {
            servers: &servers,
            max_queue_length: 3,
        };
        let selection = FirstAvailableStrategy.select(&ctx);
        assert_eq!(selection.server_id, Some(1));
        assert_eq!(selection.queue_length, Some(2));
    }

    #[test]
    fn first_available_returns_none_when_all_full() {
        let servers = busy_servers(&[1, 1], 1);
        let ctx = SelectionContext {
            servers: &servers,
            max_queue_length: 1,
        };
        assert_eq!(FirstAvailableStrategy.select(&ctx), Selection::none());
    }
}
