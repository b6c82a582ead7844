//! Balance table and issued total.

use crate::error::{LedgerError, LedgerResult};
use mintcap_types::{Address, TokenAmount};
use std::collections::HashMap;

/// The mutable part of the ledger: per-holder balances plus the running total.
///
/// Entries are created lazily on first credit and never removed, so an
/// absent holder reads as zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LedgerState {
    balances: HashMap<Address, TokenAmount>,
    total_supply: TokenAmount,
}

impl LedgerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a state from stored balances. The caller is responsible for
    /// running [`LedgerState::check_invariants`] afterwards.
    pub(crate) fn from_parts(
        balances: HashMap<Address, TokenAmount>,
        total_supply: TokenAmount,
    ) -> Self {
        Self {
            balances,
            total_supply,
        }
    }

    pub fn total_supply(&self) -> TokenAmount {
        self.total_supply
    }

    pub fn balance_of(&self, holder: &Address) -> TokenAmount {
        self.balances.get(holder).copied().unwrap_or(TokenAmount::ZERO)
    }

    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &TokenAmount)> {
        self.balances.iter()
    }

    /// Add `amount` to both `to`'s balance and the total.
    ///
    /// Both new values are computed before either is written, so an overflow
    /// leaves the state untouched.
    pub(crate) fn credit(&mut self, to: Address, amount: TokenAmount) -> LedgerResult<()> {
        let new_total = self
            .total_supply
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        let new_balance = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.balances.insert(to, new_balance);
        self.total_supply = new_total;
        Ok(())
    }

    /// Verify `sum(balances) == total_supply` and `total_supply <= max_supply`.
    pub fn check_invariants(&self, max_supply: TokenAmount) -> LedgerResult<()> {
        let mut sum = TokenAmount::ZERO;
        for amount in self.balances.values() {
            sum = sum.checked_add(*amount).ok_or_else(|| {
                LedgerError::InvariantViolated("sum of balances overflows".into())
            })?;
        }
        if sum != self.total_supply {
            return Err(LedgerError::InvariantViolated(format!(
                "sum of balances {sum} != total supply {}",
                self.total_supply
            )));
        }
        if self.total_supply > max_supply {
            return Err(LedgerError::InvariantViolated(format!(
                "total supply {} exceeds max supply {max_supply}",
                self.total_supply
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::from_bytes([n; 20])
    }

    #[test]
    fn unknown_holder_reads_zero() {
        let state = LedgerState::new();
        assert_eq!(state.balance_of(&addr(1)), TokenAmount::ZERO);
        assert_eq!(state.total_supply(), TokenAmount::ZERO);
        assert_eq!(state.holder_count(), 0);
    }

    #[test]
    fn credit_updates_balance_and_total() {
        let mut state = LedgerState::new();
        state.credit(addr(1), TokenAmount::new(300)).unwrap();
        state.credit(addr(2), TokenAmount::new(50)).unwrap();
        state.credit(addr(1), TokenAmount::new(25)).unwrap();

        assert_eq!(state.balance_of(&addr(1)), TokenAmount::new(325));
        assert_eq!(state.balance_of(&addr(2)), TokenAmount::new(50));
        assert_eq!(state.total_supply(), TokenAmount::new(375));
        assert_eq!(state.holder_count(), 2);
        state.check_invariants(TokenAmount::new(375)).unwrap();
    }

    #[test]
    fn credit_overflow_leaves_state_untouched() {
        let mut state = LedgerState::new();
        state.credit(addr(1), TokenAmount::MAX).unwrap();
        let before = state.clone();

        let result = state.credit(addr(2), TokenAmount::new(1));
        assert_eq!(result, Err(LedgerError::Overflow));
        assert_eq!(state, before);
        assert_eq!(state.balance_of(&addr(2)), TokenAmount::ZERO);
    }

    #[test]
    fn invariants_detect_sum_mismatch() {
        let mut balances = HashMap::new();
        balances.insert(addr(1), TokenAmount::new(10));
        let state = LedgerState::from_parts(balances, TokenAmount::new(11));
        assert!(matches!(
            state.check_invariants(TokenAmount::new(100)),
            Err(LedgerError::InvariantViolated(_))
        ));
    }

    #[test]
    fn invariants_detect_cap_breach() {
        let mut state = LedgerState::new();
        state.credit(addr(1), TokenAmount::new(101)).unwrap();
        assert!(matches!(
            state.check_invariants(TokenAmount::new(100)),
            Err(LedgerError::InvariantViolated(_))
        ));
        state.check_invariants(TokenAmount::new(101)).unwrap();
    }
}
