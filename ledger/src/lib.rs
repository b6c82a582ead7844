//! Capped-supply ledger.
//!
//! A single owner may mint new supply to any holder until the total reaches
//! an immutable ceiling. The ledger keeps `sum(balances) == total_supply` and
//! `total_supply <= max_supply` at every observable point.
//!
//! This crate handles:
//! - Balance bookkeeping and the issued total
//! - Owner-gated, cap-checked minting
//! - Genesis validation and the initial allocation
//! - Event fan-out and integrity-checked snapshots

pub mod error;
pub mod event;
pub mod genesis;
pub mod ledger;
pub mod snapshot;
pub mod state;

pub use error::{LedgerError, LedgerResult};
pub use event::{EventBus, LedgerEvent};
pub use genesis::GenesisConfig;
pub use ledger::CappedLedger;
pub use snapshot::{LedgerSnapshot, SNAPSHOT_VERSION};
pub use state::LedgerState;
