//! Events emitted by the ledger for subscribers.

use mintcap_types::{Address, TokenAmount};

/// Ledger-level events that observers can subscribe to via the [`EventBus`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerEvent {
    /// Supply moved to `to`. Mints carry `from == Address::ZERO`.
    Transfer {
        from: Address,
        to: Address,
        amount: TokenAmount,
    },
    /// Ownership was assigned. Emitted once at genesis with
    /// `previous == Address::ZERO`.
    OwnershipTransferred {
        previous: Address,
        new_owner: Address,
    },
}

/// Synchronous fan-out event bus for ledger events.
///
/// Listeners are invoked inline on the emitting thread, after the ledger has
/// released its state lock; keep handlers fast to avoid stalling callers.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&LedgerEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&LedgerEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn emit(&self, event: &LedgerEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
