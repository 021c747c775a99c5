//! Router: the single user-facing entry point for liquidity and swaps.
//!
//! The router holds no value of its own. It validates a request in
//! full, moves the caller's assets into the pool, and asks the pool to
//! update its share ledger. Every mutating operation is atomic: all
//! checks that could fail run before the first transfer, so a rejected
//! request leaves every ledger untouched.
//!
//! The router learns its registry once, after construction, through
//! [`Router::initialize_factory`]. Until then every liquidity and swap
//! operation is rejected.

use std::collections::HashMap;

use crate::asset::AssetBook;
use crate::domain::{Address, Amount, PairKey, Rounding, Shares};
use crate::error::{ExchangeError, Result};
use crate::events::{EventLog, ExchangeEvent};
use crate::math::{geometric_mean, mul_div};
use crate::pool::Pool;
use crate::registry::Registry;

/// Outcome of a successful liquidity deposit.
///
/// Amounts are reported in the caller's argument order, which may
/// differ from the pool's stored token order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityAdded {
    /// The pool that received the deposit.
    pub pool: Address,
    /// Amount of the first argument asset actually deposited.
    pub amount_x: Amount,
    /// Amount of the second argument asset actually deposited.
    pub amount_y: Amount,
    /// Ownership shares minted to the caller.
    pub minted: Shares,
}

/// The user-facing liquidity and swap coordinator.
#[derive(Debug, Clone)]
pub struct Router {
    address: Address,
    owner: Address,
    factory: Option<Address>,
}

impl Router {
    /// Creates a router with no registry bound yet.
    #[must_use]
    pub fn new(address: Address, owner: Address) -> Self {
        Self {
            address,
            owner,
            factory: None,
        }
    }

    /// Returns the router's own address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Returns the owner allowed to bind the registry.
    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Returns the bound registry address, if set.
    #[must_use]
    pub fn factory(&self) -> Option<Address> {
        self.factory
    }

    /// Binds the registry address, exactly once.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::NotOwner`] if the caller is not the owner.
    /// - [`ExchangeError::FactoryAlreadySet`] on any call after the
    ///   first successful one, owner or not.
    pub fn initialize_factory(&mut self, caller: Address, factory: Address) -> Result<()> {
        if caller != self.owner {
            return Err(ExchangeError::NotOwner);
        }
        if self.factory.is_some() {
            return Err(ExchangeError::FactoryAlreadySet);
        }
        self.factory = Some(factory);
        tracing::info!(router = %self.address, %factory, "factory bound");
        Ok(())
    }

    fn require_factory(&self) -> Result<Address> {
        self.factory.ok_or(ExchangeError::FactoryNotSet)
    }

    /// Deposits liquidity into the pool for `(token_x, token_y)`,
    /// creating the pool on first use.
    ///
    /// Against an empty pool the desired amounts are taken verbatim.
    /// Otherwise the deposit is trimmed to the current reserve ratio:
    /// whichever desired amount is relatively larger is reduced, never
    /// increased, so no more than the desired amounts ever moves.
    ///
    /// The caller must hold and have approved the router for the
    /// deposited amounts. All checks run before any state write, pair
    /// registration included: a rejected first deposit registers no
    /// pair and records no event.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::FactoryNotSet`] before the registry is bound.
    /// - [`ExchangeError::SameAsset`] / [`ExchangeError::ZeroAsset`]
    ///   for an invalid pair.
    /// - [`ExchangeError::InsufficientAllowance`] /
    ///   [`ExchangeError::InsufficientBalance`] /
    ///   [`ExchangeError::UnknownAsset`] from the asset pre-flight.
    /// - [`ExchangeError::Overflow`] /
    ///   [`ExchangeError::DivisionByZero`] from amount or share
    ///   arithmetic.
    #[allow(clippy::too_many_arguments)]
    pub fn add_liquidity(
        &self,
        caller: Address,
        token_x: Address,
        token_y: Address,
        desired_x: Amount,
        desired_y: Amount,
        registry: &mut Registry,
        pools: &mut HashMap<Address, Pool>,
        assets: &mut AssetBook,
        events: &mut EventLog,
    ) -> Result<LiquidityAdded> {
        self.require_factory()?;

        // Pre-flight: everything that could fail is checked before the
        // first state write, pair registration included, so a rejected
        // deposit leaves no trace anywhere.
        let existing = registry.pair_address(token_x, token_y);
        if existing.is_zero() {
            PairKey::new(token_x, token_y)?;
        }
        let (reserve_x, reserve_y) = if existing.is_zero() {
            (Amount::ZERO, Amount::ZERO)
        } else {
            (
                assets.balance_of(token_x, existing),
                assets.balance_of(token_y, existing),
            )
        };
        let (amount_x, amount_y) =
            optimal_amounts(desired_x, desired_y, reserve_x, reserve_y)?;

        check_pull(assets, token_x, caller, self.address, amount_x)?;
        check_pull(assets, token_y, caller, self.address, amount_y)?;

        let (pool_amount_x, pool_amount_y) = if existing.is_zero() {
            // First mint; only the product overflow can reject.
            let _ = geometric_mean(amount_x, amount_y)?;
            (amount_x, amount_y)
        } else {
            let pool = pools
                .get(&existing)
                .ok_or(ExchangeError::PairDoesNotExist)?;
            let (pool_x, _) = pool.tokens();
            let (pool_amount_x, pool_amount_y, pool_reserve_x, pool_reserve_y) =
                if pool_x == token_x {
                    (amount_x, amount_y, reserve_x, reserve_y)
                } else {
                    (amount_y, amount_x, reserve_y, reserve_x)
                };
            let minted =
                pool.quote_mint(pool_amount_x, pool_amount_y, pool_reserve_x, pool_reserve_y)?;
            pool.share_supply()
                .checked_add(&minted)
                .ok_or(ExchangeError::Overflow("share supply overflow"))?;
            (pool_amount_x, pool_amount_y)
        };

        // Nothing below can be rejected; commit.
        let pool_address = if existing.is_zero() {
            let pool = registry.create_pair(token_x, token_y, events)?;
            let address = pool.address();
            pools.insert(address, pool);
            address
        } else {
            existing
        };

        assets
            .get_mut(token_x)?
            .transfer_from(self.address, caller, pool_address, amount_x)?;
        assets
            .get_mut(token_y)?
            .transfer_from(self.address, caller, pool_address, amount_y)?;

        let pool = pools
            .get_mut(&pool_address)
            .ok_or(ExchangeError::PairDoesNotExist)?;
        let minted =
            pool.mint_shares(self.address, caller, pool_amount_x, pool_amount_y, assets)?;

        tracing::info!(
            %caller,
            pool = %pool_address,
            %amount_x,
            %amount_y,
            %minted,
            "liquidity added"
        );
        Ok(LiquidityAdded {
            pool: pool_address,
            amount_x,
            amount_y,
            minted,
        })
    }

    /// Redeems `share_amount` of the caller's pool shares for the
    /// proportional part of both reserves.
    ///
    /// The caller must have approved the router on the pool's share
    /// ledger for at least `share_amount`. Returns `(amount_x,
    /// amount_y)` in the caller's argument order.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::FactoryNotSet`] before the registry is bound.
    /// - [`ExchangeError::PairDoesNotExist`] if no pool exists for the
    ///   pair.
    /// - [`ExchangeError::InsufficientShares`] /
    ///   [`ExchangeError::InsufficientAllowance`] from the pool's
    ///   share checks.
    pub fn remove_liquidity(
        &self,
        caller: Address,
        token_x: Address,
        token_y: Address,
        share_amount: Shares,
        registry: &Registry,
        pools: &mut HashMap<Address, Pool>,
        assets: &mut AssetBook,
    ) -> Result<(Amount, Amount)> {
        self.require_factory()?;

        let pool_address = registry.pair_address(token_x, token_y);
        if pool_address.is_zero() {
            return Err(ExchangeError::PairDoesNotExist);
        }
        let pool = pools
            .get_mut(&pool_address)
            .ok_or(ExchangeError::PairDoesNotExist)?;

        let (out_x, out_y) = pool.remove_liquidity(self.address, caller, share_amount, assets)?;

        let (pool_x, _) = pool.tokens();
        let (amount_x, amount_y) = if pool_x == token_x {
            (out_x, out_y)
        } else {
            (out_y, out_x)
        };
        tracing::info!(
            %caller,
            pool = %pool_address,
            burned = %share_amount,
            %amount_x,
            %amount_y,
            "liquidity removed"
        );
        Ok((amount_x, amount_y))
    }

    /// Prices a swap of `amount_in` units of `input` for `output` at
    /// the current reserve ratio, without mutating anything.
    ///
    /// The quote is `amount_in * reserve_out / reserve_in`, rounding
    /// down. No fee and no slippage model: this is a pure
    /// constant-ratio price read.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::FactoryNotSet`] before the registry is bound.
    /// - [`ExchangeError::PairDoesNotExist`] if no pool exists for the
    ///   pair.
    /// - [`ExchangeError::NoLiquidity`] if either reserve is zero.
    /// - [`ExchangeError::LiquidityTooLow`] if the quoted amount would
    ///   drain the entire output reserve.
    /// - [`ExchangeError::Overflow`] on arithmetic overflow.
    pub fn get_quote(
        &self,
        input: Address,
        output: Address,
        amount_in: Amount,
        registry: &Registry,
        assets: &AssetBook,
    ) -> Result<Amount> {
        self.require_factory()?;

        let pool_address = registry.pair_address(input, output);
        if pool_address.is_zero() {
            return Err(ExchangeError::PairDoesNotExist);
        }
        let reserve_in = assets.balance_of(input, pool_address);
        let reserve_out = assets.balance_of(output, pool_address);
        if reserve_in.is_zero() || reserve_out.is_zero() {
            return Err(ExchangeError::NoLiquidity);
        }

        let quoted = Amount::new(mul_div(
            amount_in.get(),
            reserve_out.get(),
            reserve_in.get(),
            Rounding::Down,
        )?);
        if quoted >= reserve_out {
            return Err(ExchangeError::LiquidityTooLow);
        }
        Ok(quoted)
    }

    /// Swaps `amount_in` units of `input` for `output` at the quoted
    /// price, rejecting if the quote falls below `min_amount_out`.
    ///
    /// Records a [`ExchangeEvent::Swap`] and returns the amount paid
    /// out.
    ///
    /// # Errors
    ///
    /// - Everything [`get_quote`](Self::get_quote) can return.
    /// - [`ExchangeError::MinAmountTooLow`] if the quote is below
    ///   `min_amount_out`.
    /// - [`ExchangeError::InsufficientAllowance`] /
    ///   [`ExchangeError::InsufficientBalance`] /
    ///   [`ExchangeError::UnknownAsset`] from the asset pre-flight.
    #[allow(clippy::too_many_arguments)]
    pub fn swap_tokens(
        &self,
        caller: Address,
        input: Address,
        output: Address,
        amount_in: Amount,
        min_amount_out: Amount,
        registry: &Registry,
        pools: &mut HashMap<Address, Pool>,
        assets: &mut AssetBook,
        events: &mut EventLog,
    ) -> Result<Amount> {
        let amount_out = self.get_quote(input, output, amount_in, registry, assets)?;
        if amount_out < min_amount_out {
            return Err(ExchangeError::MinAmountTooLow);
        }

        let pool_address = registry.pair_address(input, output);
        check_pull(assets, input, caller, self.address, amount_in)?;

        assets
            .get_mut(input)?
            .transfer_from(self.address, caller, pool_address, amount_in)?;
        let pool = pools
            .get_mut(&pool_address)
            .ok_or(ExchangeError::PairDoesNotExist)?;
        pool.transfer_to(self.address, caller, output, amount_out, assets)?;

        events.record(ExchangeEvent::Swap {
            input,
            output,
            amount_in,
            amount_out,
        });
        Ok(amount_out)
    }
}

/// Trims a desired deposit to the current reserve ratio.
///
/// With empty reserves the desired amounts pass through unchanged.
/// Otherwise the counterpart of `desired_x` is computed at the reserve
/// ratio; if it fits within `desired_y` it is used, else the
/// counterpart of `desired_y` is used instead. Rounding down on both
/// paths keeps each result within its desired bound.
fn optimal_amounts(
    desired_x: Amount,
    desired_y: Amount,
    reserve_x: Amount,
    reserve_y: Amount,
) -> Result<(Amount, Amount)> {
    if reserve_x.is_zero() && reserve_y.is_zero() {
        return Ok((desired_x, desired_y));
    }
    let optimal_y = Amount::new(mul_div(
        desired_x.get(),
        reserve_y.get(),
        reserve_x.get(),
        Rounding::Down,
    )?);
    if optimal_y <= desired_y {
        return Ok((desired_x, optimal_y));
    }
    let optimal_x = Amount::new(mul_div(
        desired_y.get(),
        reserve_x.get(),
        reserve_y.get(),
        Rounding::Down,
    )?);
    Ok((optimal_x, desired_y))
}

/// Verifies that `spender` can pull `amount` of `asset` from `owner`.
fn check_pull(
    assets: &AssetBook,
    asset: Address,
    owner: Address,
    spender: Address,
    amount: Amount,
) -> Result<()> {
    let ledger = assets.get(asset)?;
    if ledger.allowance(owner, spender) < amount {
        return Err(ExchangeError::InsufficientAllowance);
    }
    if ledger.balance_of(owner) < amount {
        return Err(ExchangeError::InsufficientBalance);
    }
    Ok(())
}
