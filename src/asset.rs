//! Fungible-asset ledgers: the external value-transfer collaborator.
//!
//! The exchange core treats tradable assets as standard balance
//! ledgers with `balance_of` / `transfer` / `approve` / `transfer_from`
//! semantics. [`FungibleAsset`] models one such ledger;
//! [`AssetBook`] owns every deployed ledger, keyed by address.
//!
//! Pools never cache reserves: a pool's reserve of asset X is, by
//! definition, `AssetBook::balance_of(x, pool_address)`. A direct
//! deposit into a pool therefore becomes usable reserve immediately.

use std::collections::HashMap;

use crate::domain::{Address, Amount};
use crate::error::{ExchangeError, Result};

/// Namespace tag for addresses allocated to asset ledgers.
const ASSET_ADDRESS_TAG: u8 = 0xA1;

/// A single fungible-asset ledger.
///
/// Tracks per-holder balances and `(owner, spender)` allowances.
/// Transfers fail with [`ExchangeError::InsufficientBalance`] or
/// [`ExchangeError::InsufficientAllowance`] and mutate nothing on
/// failure.
#[derive(Debug, Clone, Default)]
pub struct FungibleAsset {
    symbol: String,
    total_supply: Amount,
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
}

impl FungibleAsset {
    /// Creates an empty ledger with the given symbol.
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Self::default()
        }
    }

    /// Returns the asset's symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the total minted supply.
    #[must_use]
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Returns `holder`'s balance, zero for unknown holders.
    #[must_use]
    pub fn balance_of(&self, holder: Address) -> Amount {
        self.balances.get(&holder).copied().unwrap_or(Amount::ZERO)
    }

    /// Returns the remaining allowance granted by `owner` to `spender`.
    #[must_use]
    pub fn allowance(&self, owner: Address, spender: Address) -> Amount {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Credits `to` with newly minted units.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::Overflow`] if the balance or the total
    /// supply would overflow.
    pub fn mint(&mut self, to: Address, amount: Amount) -> Result<()> {
        let new_supply = self
            .total_supply
            .checked_add(&amount)
            .ok_or(ExchangeError::Overflow("total supply overflow"))?;
        let new_balance = self
            .balance_of(to)
            .checked_add(&amount)
            .ok_or(ExchangeError::Overflow("balance overflow"))?;
        self.total_supply = new_supply;
        self.balances.insert(to, new_balance);
        Ok(())
    }

    /// Moves `amount` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::InsufficientBalance`] if `from` holds
    /// less than `amount`.
    pub fn transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<()> {
        let from_balance = self
            .balance_of(from)
            .checked_sub(&amount)
            .ok_or(ExchangeError::InsufficientBalance)?;
        if from == to {
            return Ok(());
        }
        let to_balance = self
            .balance_of(to)
            .checked_add(&amount)
            .ok_or(ExchangeError::Overflow("balance overflow"))?;
        self.balances.insert(from, from_balance);
        self.balances.insert(to, to_balance);
        Ok(())
    }

    /// Sets the allowance granted by `owner` to `spender`, replacing
    /// any previous value.
    pub fn approve(&mut self, owner: Address, spender: Address, amount: Amount) {
        self.allowances.insert((owner, spender), amount);
    }

    /// Moves `amount` from `owner` to `to` on behalf of `spender`,
    /// consuming allowance.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::InsufficientAllowance`] if `spender`'s
    ///   allowance from `owner` is below `amount`.
    /// - [`ExchangeError::InsufficientBalance`] if `owner` holds less
    ///   than `amount`. The allowance is not consumed in that case.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()> {
        let remaining = self
            .allowance(owner, spender)
            .checked_sub(&amount)
            .ok_or(ExchangeError::InsufficientAllowance)?;
        self.transfer(owner, to, amount)?;
        self.allowances.insert((owner, spender), remaining);
        Ok(())
    }
}

/// Owns every deployed fungible-asset ledger.
///
/// Allocates fresh, collision-free addresses for new assets and
/// resolves addresses back to ledgers for transfers and balance reads.
#[derive(Debug, Clone, Default)]
pub struct AssetBook {
    assets: HashMap<Address, FungibleAsset>,
    next_seq: u64,
}

impl AssetBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploys a new empty asset ledger and returns its address.
    pub fn deploy(&mut self, symbol: impl Into<String>) -> Address {
        let address = Address::derived(ASSET_ADDRESS_TAG, self.next_seq);
        self.next_seq += 1;
        self.assets.insert(address, FungibleAsset::new(symbol));
        address
    }

    /// Resolves an asset address.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::UnknownAsset`] if no ledger is
    /// deployed at `asset`.
    pub fn get(&self, asset: Address) -> Result<&FungibleAsset> {
        self.assets.get(&asset).ok_or(ExchangeError::UnknownAsset)
    }

    /// Resolves an asset address mutably.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::UnknownAsset`] if no ledger is
    /// deployed at `asset`.
    pub fn get_mut(&mut self, asset: Address) -> Result<&mut FungibleAsset> {
        self.assets
            .get_mut(&asset)
            .ok_or(ExchangeError::UnknownAsset)
    }

    /// Returns `holder`'s balance of `asset`.
    ///
    /// Total function: unknown assets and unknown holders both read
    /// as zero, which is what reserve derivation wants.
    #[must_use]
    pub fn balance_of(&self, asset: Address, holder: Address) -> Amount {
        self.assets
            .get(&asset)
            .map_or(Amount::ZERO, |ledger| ledger.balance_of(holder))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 32])
    }

    // -- FungibleAsset ------------------------------------------------------

    #[test]
    fn mint_credits_balance_and_supply() {
        let mut asset = FungibleAsset::new("GOLD");
        let Ok(()) = asset.mint(addr(1), Amount::new(500)) else {
            panic!("expected Ok");
        };
        assert_eq!(asset.balance_of(addr(1)), Amount::new(500));
        assert_eq!(asset.total_supply(), Amount::new(500));
        assert_eq!(asset.symbol(), "GOLD");
    }

    #[test]
    fn unknown_holder_reads_zero() {
        let asset = FungibleAsset::new("GOLD");
        assert_eq!(asset.balance_of(addr(9)), Amount::ZERO);
        assert_eq!(asset.allowance(addr(9), addr(8)), Amount::ZERO);
    }

    #[test]
    fn transfer_moves_value() {
        let mut asset = FungibleAsset::new("GOLD");
        let Ok(()) = asset.mint(addr(1), Amount::new(100)) else {
            panic!("expected Ok");
        };
        let Ok(()) = asset.transfer(addr(1), addr(2), Amount::new(30)) else {
            panic!("expected Ok");
        };
        assert_eq!(asset.balance_of(addr(1)), Amount::new(70));
        assert_eq!(asset.balance_of(addr(2)), Amount::new(30));
    }

    #[test]
    fn transfer_insufficient_balance_rejected() {
        let mut asset = FungibleAsset::new("GOLD");
        let Ok(()) = asset.mint(addr(1), Amount::new(10)) else {
            panic!("expected Ok");
        };
        assert_eq!(
            asset.transfer(addr(1), addr(2), Amount::new(11)),
            Err(ExchangeError::InsufficientBalance)
        );
        // Nothing moved.
        assert_eq!(asset.balance_of(addr(1)), Amount::new(10));
        assert_eq!(asset.balance_of(addr(2)), Amount::ZERO);
    }

    #[test]
    fn self_transfer_is_a_no_op() {
        let mut asset = FungibleAsset::new("GOLD");
        let Ok(()) = asset.mint(addr(1), Amount::new(10)) else {
            panic!("expected Ok");
        };
        let Ok(()) = asset.transfer(addr(1), addr(1), Amount::new(7)) else {
            panic!("expected Ok");
        };
        assert_eq!(asset.balance_of(addr(1)), Amount::new(10));
    }

    #[test]
    fn transfer_from_consumes_allowance() {
        let mut asset = FungibleAsset::new("GOLD");
        let Ok(()) = asset.mint(addr(1), Amount::new(100)) else {
            panic!("expected Ok");
        };
        asset.approve(addr(1), addr(9), Amount::new(50));
        let Ok(()) = asset.transfer_from(addr(9), addr(1), addr(2), Amount::new(30)) else {
            panic!("expected Ok");
        };
        assert_eq!(asset.balance_of(addr(2)), Amount::new(30));
        assert_eq!(asset.allowance(addr(1), addr(9)), Amount::new(20));
    }

    #[test]
    fn transfer_from_without_allowance_rejected() {
        let mut asset = FungibleAsset::new("GOLD");
        let Ok(()) = asset.mint(addr(1), Amount::new(100)) else {
            panic!("expected Ok");
        };
        assert_eq!(
            asset.transfer_from(addr(9), addr(1), addr(2), Amount::new(1)),
            Err(ExchangeError::InsufficientAllowance)
        );
    }

    #[test]
    fn transfer_from_balance_failure_preserves_allowance() {
        let mut asset = FungibleAsset::new("GOLD");
        let Ok(()) = asset.mint(addr(1), Amount::new(10)) else {
            panic!("expected Ok");
        };
        asset.approve(addr(1), addr(9), Amount::new(100));
        assert_eq!(
            asset.transfer_from(addr(9), addr(1), addr(2), Amount::new(50)),
            Err(ExchangeError::InsufficientBalance)
        );
        assert_eq!(asset.allowance(addr(1), addr(9)), Amount::new(100));
    }

    #[test]
    fn approve_replaces_previous_value() {
        let mut asset = FungibleAsset::new("GOLD");
        asset.approve(addr(1), addr(9), Amount::new(100));
        asset.approve(addr(1), addr(9), Amount::new(5));
        assert_eq!(asset.allowance(addr(1), addr(9)), Amount::new(5));
    }

    // -- AssetBook ----------------------------------------------------------

    #[test]
    fn deploy_allocates_distinct_addresses() {
        let mut book = AssetBook::new();
        let a = book.deploy("AAA");
        let b = book.deploy("BBB");
        assert_ne!(a, b);
        assert!(!a.is_zero());
        let Ok(ledger) = book.get(b) else {
            panic!("expected Ok");
        };
        assert_eq!(ledger.symbol(), "BBB");
    }

    #[test]
    fn unknown_asset_lookup_rejected() {
        let book = AssetBook::new();
        assert!(matches!(book.get(addr(1)), Err(ExchangeError::UnknownAsset)));
    }

    #[test]
    fn balance_of_is_total() {
        let mut book = AssetBook::new();
        let a = book.deploy("AAA");
        assert_eq!(book.balance_of(a, addr(1)), Amount::ZERO);
        assert_eq!(book.balance_of(addr(42), addr(1)), Amount::ZERO);
    }
}
