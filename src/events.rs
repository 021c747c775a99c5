//! Emitted events and the commit-ordered event log.

use serde::{Deserialize, Serialize};

use crate::domain::{Address, Amount};

/// An event emitted by a successful mutating operation.
///
/// Exactly one `PairCreated` is recorded per successful pair creation
/// and exactly one `Swap` per successful swap, in commit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeEvent {
    /// A new pool was registered for `(token_x, token_y)`.
    ///
    /// The tokens appear in the order they were supplied at creation,
    /// not in canonical key order.
    PairCreated {
        /// First asset as supplied by the creator.
        token_x: Address,
        /// Second asset as supplied by the creator.
        token_y: Address,
        /// Address of the newly created pool.
        pair: Address,
    },
    /// A swap executed against a pool.
    Swap {
        /// Asset sold by the caller.
        input: Address,
        /// Asset bought by the caller.
        output: Address,
        /// Amount of `input` moved into the pool.
        amount_in: Amount,
        /// Amount of `output` paid out of the pool.
        amount_out: Amount,
    },
}

/// Append-only log of emitted events, in commit order.
///
/// Each record is mirrored to a `tracing` event; the log itself exists
/// so callers and tests can observe emissions without a subscriber.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: Vec<ExchangeEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an event.
    pub fn record(&mut self, event: ExchangeEvent) {
        match &event {
            ExchangeEvent::PairCreated { token_x, token_y, pair } => {
                tracing::info!(%token_x, %token_y, %pair, "pair created");
            }
            ExchangeEvent::Swap { input, output, amount_in, amount_out } => {
                tracing::info!(%input, %output, %amount_in, %amount_out, "swap executed");
            }
        }
        self.entries.push(event);
    }

    /// Returns all recorded events in commit order.
    #[must_use]
    pub fn entries(&self) -> &[ExchangeEvent] {
        &self.entries
    }

    /// Returns the number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 32])
    }

    #[test]
    fn records_in_commit_order() {
        let mut log = EventLog::new();
        assert!(log.is_empty());

        let created = ExchangeEvent::PairCreated {
            token_x: addr(1),
            token_y: addr(2),
            pair: addr(3),
        };
        let swapped = ExchangeEvent::Swap {
            input: addr(1),
            output: addr(2),
            amount_in: Amount::new(10),
            amount_out: Amount::new(20),
        };
        log.record(created);
        log.record(swapped);

        assert_eq!(log.len(), 2);
        assert_eq!(log.entries(), &[created, swapped]);
    }
}
