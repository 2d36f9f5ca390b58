//! Last-write-wins bookkeeping for renders that may finish out of order.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one requested render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RenderTicket(u64);

/// Issues monotonically increasing tickets; only the newest is current.
#[derive(Debug, Default)]
pub struct RenderGeneration {
    latest: AtomicU64,
}

impl RenderGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding every earlier ticket.
    pub fn issue(&self) -> RenderTicket {
        RenderTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether a finished render should still be presented.
    pub fn is_current(&self, ticket: RenderTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let generation = RenderGeneration::new();
        let first = generation.issue();
        assert!(generation.is_current(first));
        let second = generation.issue();
        assert!(second > first);
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn tickets_are_unique_across_threads() {
        use std::sync::Arc;

        let generation = Arc::new(RenderGeneration::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generation = Arc::clone(&generation);
                std::thread::spawn(move || (0..100).map(|_| generation.issue()).collect::<Vec<_>>())
            })
            .collect();
        let mut all: Vec<RenderTicket> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 400);
    }
}
