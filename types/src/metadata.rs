//! Display metadata for the token.

use serde::{Deserialize, Serialize};

/// Token name, ticker symbol and decimal scaling.
///
/// Purely presentational: ledger arithmetic always works in base units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_symbol")]
    pub symbol: String,

    #[serde(default = "default_decimals")]
    pub decimals: u8,
}

fn default_name() -> String {
    "Token".to_string()
}

fn default_symbol() -> String {
    "TKN".to_string()
}

fn default_decimals() -> u8 {
    18
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self {
            name: default_name(),
            symbol: default_symbol(),
            decimals: default_decimals(),
        }
    }
}
