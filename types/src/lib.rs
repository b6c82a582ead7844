//! Fundamental types for the mintcap ledger.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! holder addresses, token amounts, and display metadata.

pub mod address;
pub mod amount;
pub mod error;
pub mod metadata;

pub use address::Address;
pub use amount::TokenAmount;
pub use error::TypesError;
pub use metadata::TokenMetadata;
