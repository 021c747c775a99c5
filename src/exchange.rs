//! The serial execution environment tying all components together.
//!
//! [`Exchange`] owns the asset book, the registry, the router, every
//! pool, and the event log, and executes one operation at a time.
//! Every entry point that acts on someone's behalf takes the acting
//! identity as an explicit `caller` argument; access control is plain
//! identity comparison against the addresses bound at construction.

use std::collections::HashMap;

use crate::asset::AssetBook;
use crate::domain::{Address, Amount, Shares};
use crate::error::{ExchangeError, Result};
use crate::events::{EventLog, ExchangeEvent};
use crate::pool::Pool;
use crate::registry::Registry;
use crate::router::{LiquidityAdded, Router};

/// Namespace tag for the router address.
const ROUTER_ADDRESS_TAG: u8 = 0xC3;
/// Namespace tag for the registry address.
const REGISTRY_ADDRESS_TAG: u8 = 0xD4;

/// A fully wired exchange: asset book, registry, router, pools, and
/// event log under one owner.
#[derive(Debug, Clone)]
pub struct Exchange {
    owner: Address,
    assets: AssetBook,
    registry: Registry,
    router: Router,
    pools: HashMap<Address, Pool>,
    events: EventLog,
}

impl Exchange {
    /// Creates an exchange owned by `owner` and binds the router to
    /// the registry.
    ///
    /// # Errors
    ///
    /// Propagates the router's binding errors; with a freshly
    /// constructed router this does not occur.
    pub fn new(owner: Address) -> Result<Self> {
        let router_address = Address::derived(ROUTER_ADDRESS_TAG, 0);
        let registry_address = Address::derived(REGISTRY_ADDRESS_TAG, 0);
        let mut router = Router::new(router_address, owner);
        let registry = Registry::new(registry_address, router_address);
        router.initialize_factory(owner, registry_address)?;
        Ok(Self {
            owner,
            assets: AssetBook::new(),
            registry,
            router,
            pools: HashMap::new(),
            events: EventLog::new(),
        })
    }

    // -- environment ---------------------------------------------------------

    /// Returns the owner bound at construction.
    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Returns the router's address.
    #[must_use]
    pub fn router_address(&self) -> Address {
        self.router.address()
    }

    /// Returns the registry's address.
    #[must_use]
    pub fn registry_address(&self) -> Address {
        self.registry.address()
    }

    /// Returns all events recorded so far, in commit order.
    #[must_use]
    pub fn events(&self) -> &[ExchangeEvent] {
        self.events.entries()
    }

    /// Re-runs the router's one-time registry binding.
    ///
    /// The binding already happened in [`new`](Self::new), so this
    /// exists to observe the gate itself.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::NotOwner`] if `caller` is not the owner.
    /// - [`ExchangeError::FactoryAlreadySet`] otherwise.
    pub fn initialize_factory(&mut self, caller: Address) -> Result<()> {
        let registry_address = self.registry.address();
        self.router.initialize_factory(caller, registry_address)
    }

    // -- assets --------------------------------------------------------------

    /// Deploys a new fungible asset and mints `initial_supply` to
    /// `holder`.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::Overflow`] if the initial mint
    /// overflows.
    pub fn deploy_asset(
        &mut self,
        symbol: impl Into<String>,
        holder: Address,
        initial_supply: Amount,
    ) -> Result<Address> {
        let address = self.assets.deploy(symbol);
        if !initial_supply.is_zero() {
            self.assets.get_mut(address)?.mint(holder, initial_supply)?;
        }
        tracing::info!(asset = %address, %holder, supply = %initial_supply, "asset deployed");
        Ok(address)
    }

    /// Returns `holder`'s balance of `asset`, zero when either is
    /// unknown.
    #[must_use]
    pub fn balance_of(&self, asset: Address, holder: Address) -> Amount {
        self.assets.balance_of(asset, holder)
    }

    /// Transfers `amount` of `asset` from the caller to `to`.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::UnknownAsset`] for an undeployed asset.
    /// - [`ExchangeError::InsufficientBalance`] if the caller holds
    ///   less than `amount`.
    pub fn transfer(
        &mut self,
        caller: Address,
        asset: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()> {
        self.assets.get_mut(asset)?.transfer(caller, to, amount)
    }

    /// Sets the caller's allowance of `asset` for `spender`.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::UnknownAsset`] for an undeployed asset.
    pub fn approve(
        &mut self,
        caller: Address,
        asset: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<()> {
        self.assets.get_mut(asset)?.approve(caller, spender, amount);
        Ok(())
    }

    // -- registry ------------------------------------------------------------

    /// Creates the pool for `(token_x, token_y)` and returns its
    /// address.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::SameAsset`] / [`ExchangeError::ZeroAsset`]
    ///   for an invalid pair.
    /// - [`ExchangeError::PairExists`] if the pool already exists, in
    ///   either order.
    pub fn create_pair(&mut self, token_x: Address, token_y: Address) -> Result<Address> {
        let pool = self
            .registry
            .create_pair(token_x, token_y, &mut self.events)?;
        let address = pool.address();
        self.pools.insert(address, pool);
        Ok(address)
    }

    /// Looks up the pool address for a pair, in either order. Returns
    /// the null address when absent or invalid.
    #[must_use]
    pub fn pair_address(&self, token_x: Address, token_y: Address) -> Address {
        self.registry.pair_address(token_x, token_y)
    }

    /// Returns the pool at `address`, if one exists.
    #[must_use]
    pub fn pool(&self, address: Address) -> Option<&Pool> {
        self.pools.get(&address)
    }

    /// Returns the per-share redemption rates of the pool at `pool`.
    /// See [`Pool::rates_per_share`].
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::PairDoesNotExist`] for an unknown pool.
    /// - [`ExchangeError::NoLiquidity`] if no shares are outstanding.
    pub fn rates_per_share(&self, pool: Address) -> Result<[(Address, Amount); 2]> {
        self.pools
            .get(&pool)
            .ok_or(ExchangeError::PairDoesNotExist)?
            .rates_per_share(&self.assets)
    }

    // -- router --------------------------------------------------------------

    /// Deposits liquidity for the caller, creating the pool on first
    /// use. See [`Router::add_liquidity`].
    ///
    /// # Errors
    ///
    /// See [`Router::add_liquidity`].
    pub fn add_liquidity(
        &mut self,
        caller: Address,
        token_x: Address,
        token_y: Address,
        desired_x: Amount,
        desired_y: Amount,
    ) -> Result<LiquidityAdded> {
        self.router.add_liquidity(
            caller,
            token_x,
            token_y,
            desired_x,
            desired_y,
            &mut self.registry,
            &mut self.pools,
            &mut self.assets,
            &mut self.events,
        )
    }

    /// Redeems the caller's pool shares for reserves. See
    /// [`Router::remove_liquidity`].
    ///
    /// # Errors
    ///
    /// See [`Router::remove_liquidity`].
    pub fn remove_liquidity(
        &mut self,
        caller: Address,
        token_x: Address,
        token_y: Address,
        share_amount: Shares,
    ) -> Result<(Amount, Amount)> {
        self.router.remove_liquidity(
            caller,
            token_x,
            token_y,
            share_amount,
            &self.registry,
            &mut self.pools,
            &mut self.assets,
        )
    }

    /// Prices a swap without mutating anything. See
    /// [`Router::get_quote`].
    ///
    /// # Errors
    ///
    /// See [`Router::get_quote`].
    pub fn get_quote(&self, input: Address, output: Address, amount_in: Amount) -> Result<Amount> {
        self.router
            .get_quote(input, output, amount_in, &self.registry, &self.assets)
    }

    /// Swaps at the quoted constant-ratio price. See
    /// [`Router::swap_tokens`].
    ///
    /// # Errors
    ///
    /// See [`Router::swap_tokens`].
    pub fn swap_tokens(
        &mut self,
        caller: Address,
        input: Address,
        output: Address,
        amount_in: Amount,
        min_amount_out: Amount,
    ) -> Result<Amount> {
        self.router.swap_tokens(
            caller,
            input,
            output,
            amount_in,
            min_amount_out,
            &self.registry,
            &mut self.pools,
            &mut self.assets,
            &mut self.events,
        )
    }

    // -- direct pool access --------------------------------------------------
    //
    // The pool's gated operations stay reachable with an arbitrary
    // caller so the identity checks themselves are observable, exactly
    // as they would be for a caller addressing a pool directly.

    /// Calls [`Pool::initialize_pair`] on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::PairDoesNotExist`] for an unknown pool.
    /// - [`ExchangeError::NotFactory`] unless `caller` is the registry
    ///   and the pool is uninitialized.
    pub fn pool_initialize(
        &mut self,
        caller: Address,
        pool: Address,
        token_x: Address,
        token_y: Address,
    ) -> Result<()> {
        self.pools
            .get_mut(&pool)
            .ok_or(ExchangeError::PairDoesNotExist)?
            .initialize_pair(caller, token_x, token_y)
    }

    /// Calls [`Pool::mint_shares`] on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::PairDoesNotExist`] for an unknown pool.
    /// - See [`Pool::mint_shares`].
    pub fn pool_mint_shares(
        &mut self,
        caller: Address,
        pool: Address,
        recipient: Address,
        amount_x: Amount,
        amount_y: Amount,
    ) -> Result<Shares> {
        self.pools
            .get_mut(&pool)
            .ok_or(ExchangeError::PairDoesNotExist)?
            .mint_shares(caller, recipient, amount_x, amount_y, &self.assets)
    }

    /// Calls [`Pool::remove_liquidity`] on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::PairDoesNotExist`] for an unknown pool.
    /// - See [`Pool::remove_liquidity`].
    pub fn pool_remove_liquidity(
        &mut self,
        caller: Address,
        pool: Address,
        holder: Address,
        share_amount: Shares,
    ) -> Result<(Amount, Amount)> {
        self.pools
            .get_mut(&pool)
            .ok_or(ExchangeError::PairDoesNotExist)?
            .remove_liquidity(caller, holder, share_amount, &mut self.assets)
    }

    /// Calls [`Pool::transfer_to`] on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::PairDoesNotExist`] for an unknown pool.
    /// - See [`Pool::transfer_to`].
    pub fn pool_transfer_to(
        &mut self,
        caller: Address,
        pool: Address,
        recipient: Address,
        asset: Address,
        amount: Amount,
    ) -> Result<()> {
        self.pools
            .get_mut(&pool)
            .ok_or(ExchangeError::PairDoesNotExist)?
            .transfer_to(caller, recipient, asset, amount, &mut self.assets)
    }

    /// Sets the caller's share allowance on `pool` for `spender`.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::PairDoesNotExist`] for an unknown pool.
    pub fn approve_shares(
        &mut self,
        caller: Address,
        pool: Address,
        spender: Address,
        amount: Shares,
    ) -> Result<()> {
        self.pools
            .get_mut(&pool)
            .ok_or(ExchangeError::PairDoesNotExist)?
            .approve_shares(caller, spender, amount);
        Ok(())
    }
}
