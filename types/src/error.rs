//! Parse and validation errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("amount must not be negative: {0}")]
    NegativeAmount(String),

    #[error("amount out of range: {0}")]
    AmountOutOfRange(String),

    #[error("too many fractional digits: {given} given, token has {decimals} decimals")]
    TooManyDecimals { given: usize, decimals: u8 },
}
