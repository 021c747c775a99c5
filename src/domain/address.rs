//! Opaque, totally-ordered identity handle.

use core::fmt;

use serde::{Deserialize, Serialize};

/// An opaque 32-byte identity.
///
/// Addresses identify every participant in the system uniformly:
/// fungible assets, user accounts, pools, the registry, and the router.
/// Two addresses are equal iff they refer to the same instance, and the
/// lexicographic byte order gives the total order used for pair
/// canonicalization.
///
/// The all-zero address is the null identity; it is never a valid
/// participant and is used as the "absent" sentinel by registry lookup.
///
/// # Examples
///
/// ```
/// use ratioswap::domain::Address;
///
/// let a = Address::from_bytes([1u8; 32]);
/// let b = Address::from_bytes([2u8; 32]);
/// assert!(a < b);
/// assert!(!a.is_zero());
/// assert!(Address::zero().is_zero());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Address([u8; 32]);

impl Address {
    /// Creates an `Address` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Returns the all-zero null identity.
    #[must_use]
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Returns `true` if this is the null identity.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// Derives a deterministic address from a namespace tag and a
    /// sequence number.
    ///
    /// Used by the asset book and the registry to allocate fresh,
    /// collision-free addresses: the tag occupies the first byte and
    /// the big-endian sequence the last eight. A non-zero tag
    /// guarantees the result is never the null identity.
    #[must_use]
    pub const fn derived(tag: u8, seq: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[0] = tag;
        let seq_bytes = seq.to_be_bytes();
        let mut i = 0;
        while i < 8 {
            bytes[24 + i] = seq_bytes[i];
            i += 1;
        }
        Self(bytes)
    }
}

impl fmt::Display for Address {
    /// Compact rendering: first four bytes as hex, `0x01020304…`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "\u{2026}")
    }
}
