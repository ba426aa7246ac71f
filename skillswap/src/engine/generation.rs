//! Request generations for discarding superseded responses.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// Counter shared by every request issued from one view.
#[derive(Debug, Clone, Default)]
pub struct RequestGeneration {
    current: Arc<AtomicU64>,
}

/// Tag of one request.
#[derive(Debug, Clone)]
pub struct GenerationTicket {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request; every earlier ticket becomes stale.
    pub fn next(&self) -> GenerationTicket {
        let generation = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        GenerationTicket {
            generation,
            current: self.current.clone(),
        }
    }
}

impl GenerationTicket {
    /// Check whether no newer request has started.
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes() {
        let generations = RequestGeneration::new();
        let first = generations.next();
        assert!(first.is_current());

        let second = generations.next();
        assert!(!first.is_current());
        assert!(second.is_current());
        assert!(second.generation() > first.generation());
    }
}
