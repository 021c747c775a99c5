//! Fundamental domain value types used throughout the exchange core.
//!
//! All types are newtypes with validated constructors: addresses are
//! opaque ordered identities, amounts and shares are `u128` quantities
//! with checked arithmetic, and [`PairKey`] is the canonical unordered
//! combination of two distinct assets.

mod address;
mod amount;
mod pair_key;
mod rounding;
mod shares;

pub use address::Address;
pub use amount::Amount;
pub use pair_key::PairKey;
pub use rounding::Rounding;
pub use shares::Shares;
