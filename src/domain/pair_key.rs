//! Canonical unordered asset pair.

use serde::{Deserialize, Serialize};

use super::Address;
use crate::error::{ExchangeError, Result};

/// The unordered combination of two distinct asset identities,
/// canonicalized low-address-first.
///
/// `(X, Y)` and `(Y, X)` always construct equal keys, so a registry
/// keyed by `PairKey` can hold at most one pool per asset pair.
/// Construction is the single validation point: the two identities
/// must be distinct and neither may be the null address.
///
/// Note that the canonical order lives only in the key. The order in
/// which assets were supplied at pool creation is preserved separately
/// by the pool itself.
///
/// # Examples
///
/// ```
/// use ratioswap::domain::{Address, PairKey};
///
/// let x = Address::from_bytes([1u8; 32]);
/// let y = Address::from_bytes([2u8; 32]);
///
/// let k1 = PairKey::new(x, y).expect("distinct assets");
/// let k2 = PairKey::new(y, x).expect("distinct assets");
/// assert_eq!(k1, k2);
/// assert_eq!(k1.lower(), x);
/// assert_eq!(k1.higher(), y);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey {
    lower: Address,
    higher: Address,
}

impl PairKey {
    /// Creates the canonical key for the unordered pair `(a, b)`.
    ///
    /// # Errors
    ///
    /// - [`ExchangeError::SameAsset`] if `a == b`.
    /// - [`ExchangeError::ZeroAsset`] if either identity is null.
    pub fn new(a: Address, b: Address) -> Result<Self> {
        if a == b {
            return Err(ExchangeError::SameAsset);
        }
        if a.is_zero() || b.is_zero() {
            return Err(ExchangeError::ZeroAsset);
        }
        let (lower, higher) = if a < b { (a, b) } else { (b, a) };
        Ok(Self { lower, higher })
    }

    /// Returns the lower-ordered identity.
    #[must_use]
    pub const fn lower(&self) -> Address {
        self.lower
    }

    /// Returns the higher-ordered identity.
    #[must_use]
    pub const fn higher(&self) -> Address {
        self.higher
    }
}
