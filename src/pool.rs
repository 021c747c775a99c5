//! A two-asset liquidity pool.
//!
//! A pool owns the reserves of exactly one asset pair and issues
//! proportional ownership shares against them. Reserves are never
//! cached: the reserve of an asset is the pool's live balance on that
//! asset's ledger, so value deposited directly into the pool becomes
//! usable reserve immediately.
//!
//! Mutation is gated by caller identity. Only the creating registry
//! may initialize the token order, exactly once; only the bound router
//! may mint shares, remove liquidity, or move pool holdings. Share
//! bookkeeping is finalized before any outbound transfer is issued, so
//! a reentrant transfer hook can never observe stale accounting.

use std::collections::HashMap;

use crate::asset::AssetBook;
use crate::domain::{Address, Amount, Rounding, Shares};
use crate::error::{ExchangeError, Result};
use crate::math::{geometric_mean, mul_div};

/// A pool holding two reserves and a share ledger.
///
/// Constructed by the registry at pair creation (see
/// [`Registry::create_pair`](crate::registry::Registry::create_pair))
/// and bound to its creating registry and authorized router for life.
#[derive(Debug, Clone)]
pub struct Pool {
    address: Address,
    factory: Address,
    router: Address,
    // Creation-order pair, set once by initialize_pair. Null until
    // then; the registry initializes immediately after construction.
    token_x: Address,
    token_y: Address,
    initialized: bool,
    share_supply: Shares,
    share_balances: HashMap<Address, Shares>,
    share_allowances: HashMap<(Address, Address), Shares>,
}

impl Pool {
    /// Creates an uninitialized pool bound to its registry and router.
    pub(crate) fn new(address: Address, factory: Address, router: Address) -> Self {
        Self {
            address,
            factory,
            router,
            token_x: Address::zero(),
            token_y: Address::zero(),
            initialized: false,
            share_supply: Shares::ZERO,
            share_balances: HashMap::new(),
            share_allowances: HashMap::new(),
        }
    }

    /// Returns the pool's own address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Returns the address of the creating registry.
    #[must_use]
    pub fn factory(&self) -> Address {
        self.factory
    }

    /// Returns the address of the bound router.
    #[must_use]
    pub fn router(&self) -> Address {
        self.router
    }

    /// Sets the token order, exactly once.
    ///
    /// The order is stored verbatim as supplied at creation and is
    /// fixed for the pool's lifetime. Callers of [`tokens`](Self::tokens)
    /// must not assume canonical ordering.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::NotFactory`] if the caller is not the
    /// creating registry or the pool is already initialized.
    pub fn initialize_pair(&mut self, caller: Address, token_x: Address, token_y: Address) -> Result<()> {
        if caller != self.factory || self.initialized {
            return Err(ExchangeError::NotFactory);
        }
        self.token_x = token_x;
        self.token_y = token_y;
        self.initialized = true;
        Ok(())
    }

    /// Returns the pair in creation order. Never fails.
    #[must_use]
    pub fn tokens(&self) -> (Address, Address) {
        (self.token_x, self.token_y)
    }

    /// Returns the live reserves `(reserve_x, reserve_y)` in token
    /// order. Never fails.
    #[must_use]
    pub fn token_amounts(&self, assets: &AssetBook) -> (Amount, Amount) {
        (
            assets.balance_of(self.token_x, self.address),
            assets.balance_of(self.token_y, self.address),
        )
    }

    /// Returns the total outstanding shares.
    #[must_use]
    pub fn share_supply(&self) -> Shares {
        self.share_supply
    }

    /// Returns `holder`'s share balance, zero for unknown holders.
    #[must_use]
    pub fn share_balance_of(&self, holder: Address) -> Shares {
        self.share_balances
            .get(&holder)
            .copied()
            .unwrap_or(Shares::ZERO)
    }

    /// Returns the share allowance granted by `owner` to `spender`.
    #[must_use]
    pub fn share_allowance(&self, owner: Address, spender: Address) -> Shares {
        self.share_allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(Shares::ZERO)
    }

    /// Grants `spender` the right to burn up to `amount` of `owner`'s
    /// shares through the router's removal flow, replacing any
    /// previous allowance.
    pub fn approve_shares(&mut self, owner: Address, spender: Address, amount: Shares) {
        self.share_allowances.insert((owner, spender), amount);
    }

    /// Computes the shares a deposit of `(amount_x, amount_y)` mints
    /// against the given pre-deposit reserves, without mutating state.
    ///
    /// First deposit (zero supply): the geometric mean of the two
    /// amounts. Later deposits: proportional to the smaller relative
    /// contribution, rounding down, so an imbalanced deposit never
    /// over-mints.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::Overflow`] on arithmetic overflow.
    /// - [`ExchangeError::DivisionByZero`] if supply is non-zero while
    ///   a pre-deposit reserve is zero.
    pub fn quote_mint(
        &self,
        amount_x: Amount,
        amount_y: Amount,
        reserve_x_before: Amount,
        reserve_y_before: Amount,
    ) -> Result<Shares> {
        if self.share_supply.is_zero() {
            return geometric_mean(amount_x, amount_y);
        }
        let supply = self.share_supply.get();
        let by_x = mul_div(amount_x.get(), supply, reserve_x_before.get(), Rounding::Down)?;
        let by_y = mul_div(amount_y.get(), supply, reserve_y_before.get(), Rounding::Down)?;
        Ok(Shares::new(by_x.min(by_y)))
    }

    /// Mints shares to `recipient` for a deposit of
    /// `(amount_x, amount_y)`, which must already sit in the pool's
    /// holdings: pre-deposit reserves are derived as live balance
    /// minus the deposited amount.
    ///
    /// Returns the minted shares.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::NotRouter`] if the caller is not the bound
    ///   router.
    /// - [`ExchangeError::Overflow`] if a deposited amount exceeds the
    ///   pool's live balance, or on share arithmetic overflow.
    /// - [`ExchangeError::DivisionByZero`] propagated from
    ///   [`quote_mint`](Self::quote_mint).
    pub fn mint_shares(
        &mut self,
        caller: Address,
        recipient: Address,
        amount_x: Amount,
        amount_y: Amount,
        assets: &AssetBook,
    ) -> Result<Shares> {
        if caller != self.router {
            return Err(ExchangeError::NotRouter);
        }
        let (live_x, live_y) = self.token_amounts(assets);
        let reserve_x_before = live_x
            .checked_sub(&amount_x)
            .ok_or(ExchangeError::Overflow("deposit exceeds held balance"))?;
        let reserve_y_before = live_y
            .checked_sub(&amount_y)
            .ok_or(ExchangeError::Overflow("deposit exceeds held balance"))?;

        let minted = self.quote_mint(amount_x, amount_y, reserve_x_before, reserve_y_before)?;

        let new_supply = self
            .share_supply
            .checked_add(&minted)
            .ok_or(ExchangeError::Overflow("share supply overflow"))?;
        let new_balance = self
            .share_balance_of(recipient)
            .checked_add(&minted)
            .ok_or(ExchangeError::Overflow("share balance overflow"))?;
        self.share_supply = new_supply;
        self.share_balances.insert(recipient, new_balance);

        tracing::debug!(
            pool = %self.address,
            %recipient,
            %amount_x,
            %amount_y,
            %minted,
            "shares minted"
        );
        Ok(minted)
    }

    /// Burns `share_amount` of `holder`'s shares and pays out the
    /// proportional part of both reserves.
    ///
    /// The holder must have authorized the bound router for at least
    /// `share_amount`; the allowance is consumed. Share bookkeeping is
    /// finalized before the outbound transfers are issued.
    ///
    /// Returns `(amount_x, amount_y)` in token order.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::NotRouter`] if the caller is not the bound
    ///   router.
    /// - [`ExchangeError::InsufficientShares`] if the holder owns
    ///   fewer shares than requested.
    /// - [`ExchangeError::InsufficientAllowance`] if the holder's
    ///   allowance to the router is below `share_amount`.
    /// - [`ExchangeError::DivisionByZero`] if the supply is zero.
    pub fn remove_liquidity(
        &mut self,
        caller: Address,
        holder: Address,
        share_amount: Shares,
        assets: &mut AssetBook,
    ) -> Result<(Amount, Amount)> {
        if caller != self.router {
            return Err(ExchangeError::NotRouter);
        }
        let remaining_balance = self
            .share_balance_of(holder)
            .checked_sub(&share_amount)
            .ok_or(ExchangeError::InsufficientShares)?;
        let remaining_allowance = self
            .share_allowance(holder, self.router)
            .checked_sub(&share_amount)
            .ok_or(ExchangeError::InsufficientAllowance)?;

        let (reserve_x, reserve_y) = self.token_amounts(assets);
        let supply = self.share_supply.get();
        let amount_x = Amount::new(mul_div(
            share_amount.get(),
            reserve_x.get(),
            supply,
            Rounding::Down,
        )?);
        let amount_y = Amount::new(mul_div(
            share_amount.get(),
            reserve_y.get(),
            supply,
            Rounding::Down,
        )?);

        // Burn before paying out: a transfer hook re-entering the pool
        // sees the reduced supply and balances.
        self.share_balances.insert(holder, remaining_balance);
        self.share_allowances
            .insert((holder, self.router), remaining_allowance);
        // share_amount <= holder balance <= supply, so this cannot underflow.
        self.share_supply = self
            .share_supply
            .checked_sub(&share_amount)
            .ok_or(ExchangeError::Overflow("share supply underflow"))?;

        assets
            .get_mut(self.token_x)?
            .transfer(self.address, holder, amount_x)?;
        assets
            .get_mut(self.token_y)?
            .transfer(self.address, holder, amount_y)?;

        tracing::debug!(
            pool = %self.address,
            %holder,
            burned = %share_amount,
            %amount_x,
            %amount_y,
            "liquidity removed"
        );
        Ok((amount_x, amount_y))
    }

    /// Moves `amount` of `asset` out of the pool's holdings to
    /// `recipient`, decreasing the corresponding reserve.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::NotRouter`] if the caller is not the bound
    ///   router.
    /// - [`ExchangeError::UnknownAsset`] /
    ///   [`ExchangeError::InsufficientBalance`] propagated from the
    ///   asset ledger.
    pub fn transfer_to(
        &mut self,
        caller: Address,
        recipient: Address,
        asset: Address,
        amount: Amount,
        assets: &mut AssetBook,
    ) -> Result<()> {
        if caller != self.router {
            return Err(ExchangeError::NotRouter);
        }
        assets.get_mut(asset)?.transfer(self.address, recipient, amount)?;
        tracing::debug!(pool = %self.address, %recipient, %asset, %amount, "pool transfer out");
        Ok(())
    }

    /// Returns, for each asset, the amount redeemable per one
    /// ownership share at current reserves, paired with the asset
    /// address.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::NoLiquidity`] if no shares are
    /// outstanding.
    pub fn rates_per_share(&self, assets: &AssetBook) -> Result<[(Address, Amount); 2]> {
        if self.share_supply.is_zero() {
            return Err(ExchangeError::NoLiquidity);
        }
        let (reserve_x, reserve_y) = self.token_amounts(assets);
        let supply = Amount::new(self.share_supply.get());
        let rate_x = reserve_x
            .checked_div(&supply, Rounding::Down)
            .ok_or(ExchangeError::DivisionByZero)?;
        let rate_y = reserve_y
            .checked_div(&supply, Rounding::Down)
            .ok_or(ExchangeError::DivisionByZero)?;
        Ok([(self.token_x, rate_x), (self.token_y, rate_y)])
    }
}
