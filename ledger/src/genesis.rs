//! Genesis configuration: the construction-time parameters of a ledger.
//!
//! The owner, the supply ceiling and the initial allocation are consumed
//! once when the ledger is built and are immutable afterwards.

use crate::error::{LedgerError, LedgerResult};
use mintcap_types::{Address, TokenAmount, TokenMetadata};
use serde::{Deserialize, Serialize};

const WEI_PER_TOKEN: u128 = 1_000_000_000_000_000_000;

/// Default ceiling: 1000 whole tokens at 18 decimals.
pub const DEFAULT_MAX_SUPPLY: TokenAmount = TokenAmount::new(1_000 * WEI_PER_TOKEN);

/// Default initial allocation: 100 whole tokens at 18 decimals.
pub const DEFAULT_INITIAL_SUPPLY: TokenAmount = TokenAmount::new(100 * WEI_PER_TOKEN);

/// Construction-time configuration for a [`crate::CappedLedger`].
///
/// Deserialisable from a TOML table; amounts are decimal strings of base units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisConfig {
    /// The only identity allowed to mint.
    pub owner: Address,

    /// Immutable ceiling on the issued total.
    #[serde(default = "default_max_supply")]
    pub max_supply: TokenAmount,

    /// Receiver of the initial allocation. Defaults to the owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_recipient: Option<Address>,

    /// Size of the initial allocation.
    #[serde(default = "default_initial_supply")]
    pub initial_supply: TokenAmount,

    #[serde(default)]
    pub metadata: TokenMetadata,
}

fn default_max_supply() -> TokenAmount {
    DEFAULT_MAX_SUPPLY
}

fn default_initial_supply() -> TokenAmount {
    DEFAULT_INITIAL_SUPPLY
}

impl GenesisConfig {
    /// 1000-token cap with 100 tokens allocated to `owner`.
    pub fn standard(owner: Address) -> Self {
        Self {
            owner,
            max_supply: DEFAULT_MAX_SUPPLY,
            initial_recipient: None,
            initial_supply: DEFAULT_INITIAL_SUPPLY,
            metadata: TokenMetadata::default(),
        }
    }

    /// The address that receives the initial allocation.
    pub fn recipient(&self) -> Address {
        self.initial_recipient.unwrap_or(self.owner)
    }

    pub fn validate(&self) -> LedgerResult<()> {
        if self.owner.is_zero() {
            return Err(LedgerError::InvalidGenesis(
                "owner must not be the zero address".into(),
            ));
        }
        if !self.initial_supply.is_zero() && self.recipient().is_zero() {
            return Err(LedgerError::InvalidGenesis(
                "initial recipient must not be the zero address".into(),
            ));
        }
        if self.initial_supply > self.max_supply {
            return Err(LedgerError::InvalidGenesis(format!(
                "initial supply {} exceeds max supply {}",
                self.initial_supply, self.max_supply
            )));
        }
        Ok(())
    }
}
