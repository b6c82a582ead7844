//! The capped ledger: owner-gated minting over a lock-protected state.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use mintcap_types::{Address, TokenAmount, TokenMetadata};

use crate::error::{LedgerError, LedgerResult};
use crate::event::{EventBus, LedgerEvent};
use crate::genesis::GenesisConfig;
use crate::state::LedgerState;

/// A fungible ledger with a single minter and a hard supply ceiling.
///
/// Reads take the shared lock, so each call observes one consistent state.
/// `mint` holds the exclusive lock across the whole check-then-credit
/// sequence, so concurrent mints can never jointly overshoot the cap.
#[derive(Debug)]
pub struct CappedLedger {
    owner: Address,
    max_supply: TokenAmount,
    metadata: TokenMetadata,
    state: RwLock<LedgerState>,
    events: EventBus,
}

impl CappedLedger {
    /// Build a ledger from its genesis configuration.
    pub fn new(genesis: GenesisConfig) -> LedgerResult<Self> {
        Self::with_event_bus(genesis, EventBus::new())
    }

    /// Build a ledger whose genesis events are delivered to `events`.
    pub fn with_event_bus(genesis: GenesisConfig, events: EventBus) -> LedgerResult<Self> {
        genesis.validate()?;

        let recipient = genesis.recipient();
        let mut state = LedgerState::new();
        if !genesis.initial_supply.is_zero() {
            state.credit(recipient, genesis.initial_supply)?;
        }

        let ledger = Self {
            owner: genesis.owner,
            max_supply: genesis.max_supply,
            metadata: genesis.metadata,
            state: RwLock::new(state),
            events,
        };

        tracing::info!(
            owner = %ledger.owner,
            max_supply = %ledger.max_supply,
            initial_supply = %genesis.initial_supply,
            "ledger created"
        );
        ledger.events.emit(&LedgerEvent::OwnershipTransferred {
            previous: Address::ZERO,
            new_owner: ledger.owner,
        });
        if !genesis.initial_supply.is_zero() {
            ledger.events.emit(&LedgerEvent::Transfer {
                from: Address::ZERO,
                to: recipient,
                amount: genesis.initial_supply,
            });
        }
        Ok(ledger)
    }

    /// Reassemble a ledger from already-validated parts.
    pub(crate) fn from_parts(
        owner: Address,
        max_supply: TokenAmount,
        metadata: TokenMetadata,
        state: LedgerState,
        events: EventBus,
    ) -> Self {
        Self {
            owner,
            max_supply,
            metadata,
            state: RwLock::new(state),
            events,
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn max_supply(&self) -> TokenAmount {
        self.max_supply
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    /// Current issued total.
    pub fn total_supply(&self) -> TokenAmount {
        self.read_state().total_supply()
    }

    /// Balance of `holder`, zero if never credited.
    pub fn balance_of(&self, holder: &Address) -> TokenAmount {
        self.read_state().balance_of(holder)
    }

    /// Number of holders that have ever been credited.
    pub fn holder_count(&self) -> usize {
        self.read_state().holder_count()
    }

    /// How much can still be minted before the cap is reached.
    pub fn remaining_mintable(&self) -> TokenAmount {
        self.max_supply.saturating_sub(self.total_supply())
    }

    /// Mint `amount` to `to` on behalf of `caller`.
    ///
    /// Checks, in order: caller is the owner, the new total stays within
    /// `max_supply` (inclusive), and `to` is not the zero address. Any
    /// failure leaves the ledger unchanged.
    pub fn mint(&self, caller: &Address, to: &Address, amount: TokenAmount) -> LedgerResult<()> {
        let result = self.mint_locked(caller, to, amount);
        match &result {
            Ok(total) => {
                tracing::info!(%caller, %to, %amount, total_supply = %total, "minted");
                self.events.emit(&LedgerEvent::Transfer {
                    from: Address::ZERO,
                    to: *to,
                    amount,
                });
            }
            Err(e) => {
                tracing::warn!(%caller, %to, %amount, error = %e, "mint rejected");
            }
        }
        result.map(|_| ())
    }

    /// The read-check-write sequence under the exclusive lock. Returns the
    /// new total supply.
    fn mint_locked(
        &self,
        caller: &Address,
        to: &Address,
        amount: TokenAmount,
    ) -> LedgerResult<TokenAmount> {
        if *caller != self.owner {
            return Err(LedgerError::Unauthorized { caller: *caller });
        }

        let mut state = self.write_state();
        let would_have = state
            .total_supply()
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        if would_have > self.max_supply {
            return Err(LedgerError::SupplyCapExceeded {
                max: self.max_supply,
                would_have,
            });
        }
        if to.is_zero() {
            return Err(LedgerError::InvalidReceiver(*to));
        }

        state.credit(*to, amount)?;
        Ok(state.total_supply())
    }

    /// Verify both supply invariants over the current state.
    pub fn check_invariants(&self) -> LedgerResult<()> {
        self.read_state().check_invariants(self.max_supply)
    }

    /// Run `f` against a consistent view of the state.
    pub fn with_state<R>(&self, f: impl FnOnce(&LedgerState) -> R) -> R {
        f(&self.read_state())
    }

    // Writes only happen after every fallible step, so a poisoned lock still
    // guards a consistent state.
    fn read_state(&self) -> RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
