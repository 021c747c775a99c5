//! Pair registry: creates pools and resolves pairs to pool addresses.
//!
//! The registry is the only component allowed to construct and
//! initialize pools. It keys pools by [`PairKey`], so the two creation
//! orders of the same asset pair resolve to the same pool and a second
//! creation attempt is rejected regardless of argument order.

use std::collections::HashMap;

use crate::domain::{Address, PairKey};
use crate::error::{ExchangeError, Result};
use crate::events::{EventLog, ExchangeEvent};
use crate::pool::Pool;

/// Namespace tag for addresses allocated to pools.
const POOL_ADDRESS_TAG: u8 = 0xB2;

/// Registry of all created pools, bound to a single router.
///
/// Every pool the registry creates is wired to that router; the binding
/// is fixed at construction and never changes.
#[derive(Debug, Clone)]
pub struct Registry {
    address: Address,
    router: Address,
    pairs: HashMap<PairKey, Address>,
    next_pool_seq: u64,
}

impl Registry {
    /// Creates an empty registry bound to `router`.
    #[must_use]
    pub fn new(address: Address, router: Address) -> Self {
        Self {
            address,
            router,
            pairs: HashMap::new(),
            next_pool_seq: 0,
        }
    }

    /// Returns the registry's own address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Returns the router every created pool is bound to.
    #[must_use]
    pub fn router(&self) -> Address {
        self.router
    }

    /// Returns the number of registered pools.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.pairs.len()
    }

    /// Creates and initializes a pool for the pair `(token_x, token_y)`.
    ///
    /// The supplied token order is preserved in the pool; the registry
    /// index itself is order-insensitive. Records a
    /// [`ExchangeEvent::PairCreated`] on success and returns the pool
    /// for the caller to take ownership of.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::SameAsset`] if the two tokens are equal.
    /// - [`ExchangeError::ZeroAsset`] if either token is the null
    ///   identity.
    /// - [`ExchangeError::PairExists`] if a pool for this pair already
    ///   exists, in either order.
    pub fn create_pair(
        &mut self,
        token_x: Address,
        token_y: Address,
        events: &mut EventLog,
    ) -> Result<Pool> {
        let key = PairKey::new(token_x, token_y)?;
        if self.pairs.contains_key(&key) {
            return Err(ExchangeError::PairExists);
        }

        let pool_address = Address::derived(POOL_ADDRESS_TAG, self.next_pool_seq);
        self.next_pool_seq += 1;

        let mut pool = Pool::new(pool_address, self.address, self.router);
        pool.initialize_pair(self.address, token_x, token_y)?;
        self.pairs.insert(key, pool_address);

        events.record(ExchangeEvent::PairCreated {
            token_x,
            token_y,
            pair: pool_address,
        });
        Ok(pool)
    }

    /// Looks up the pool address for the pair `(token_x, token_y)`,
    /// in either order.
    ///
    /// Total function: returns the null address when no pool exists or
    /// the arguments do not form a valid pair.
    #[must_use]
    pub fn pair_address(&self, token_x: Address, token_y: Address) -> Address {
        PairKey::new(token_x, token_y)
            .ok()
            .and_then(|key| self.pairs.get(&key).copied())
            .unwrap_or_else(Address::zero)
    }
}
