//! Liquidity-ownership units.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Outstanding liquidity-ownership units of a pool.
///
/// Distinct from [`Amount`](super::Amount): shares measure a
/// proportional claim on a pool's reserves, not a quantity of any
/// specific asset. All `u128` values are valid share counts.
///
/// # Examples
///
/// ```
/// use ratioswap::domain::Shares;
///
/// let a = Shares::new(100);
/// let b = Shares::new(200);
/// assert_eq!(a.checked_add(&b), Some(Shares::new(300)));
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
)]
#[must_use]
pub struct Shares(u128);

impl Shares {
    /// No shares.
    pub const ZERO: Self = Self(0);

    /// Creates a new `Shares` value from a raw `u128`.
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying `u128` value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the share count is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(&self, other: &Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(&self, other: &Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl fmt::Display for Shares {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_and_get() {
        assert_eq!(Shares::new(42).get(), 42);
    }

    #[test]
    fn zero_constant() {
        assert!(Shares::ZERO.is_zero());
        assert!(!Shares::new(1).is_zero());
        assert_eq!(Shares::default(), Shares::ZERO);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", Shares::new(1_000)), "1000");
    }

    #[test]
    fn add_normal_and_overflow() {
        assert_eq!(
            Shares::new(100).checked_add(&Shares::new(200)),
            Some(Shares::new(300))
        );
        assert_eq!(Shares::new(u128::MAX).checked_add(&Shares::new(1)), None);
    }

    #[test]
    fn sub_normal_and_underflow() {
        assert_eq!(
            Shares::new(300).checked_sub(&Shares::new(100)),
            Some(Shares::new(200))
        );
        assert_eq!(Shares::new(1).checked_sub(&Shares::new(2)), None);
    }

    #[test]
    fn ordering() {
        assert!(Shares::new(1) < Shares::new(2));
    }
}
