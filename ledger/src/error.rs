use mintcap_types::{Address, TokenAmount};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("unauthorized: {caller} is not the owner")]
    Unauthorized { caller: Address },

    #[error("max supply exceeded: max {max}, would have {would_have}")]
    SupplyCapExceeded {
        max: TokenAmount,
        would_have: TokenAmount,
    },

    #[error("invalid receiver: {0}")]
    InvalidReceiver(Address),

    #[error("arithmetic overflow in supply computation")]
    Overflow,

    #[error("ledger invariant violated: {0}")]
    InvariantViolated(String),

    #[error("invalid genesis: {0}")]
    InvalidGenesis(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
