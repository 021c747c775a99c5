//! Convenience re-exports for the common surface.
//!
//! ```
//! use ratioswap::prelude::*;
//!
//! let owner = Address::from_bytes([0x01; 32]);
//! let exchange = Exchange::new(owner).expect("wiring succeeds");
//! assert_eq!(exchange.owner(), owner);
//! ```

pub use crate::asset::{AssetBook, FungibleAsset};
pub use crate::domain::{Address, Amount, PairKey, Rounding, Shares};
pub use crate::error::{ExchangeError, Result};
pub use crate::events::{EventLog, ExchangeEvent};
pub use crate::exchange::Exchange;
pub use crate::pool::Pool;
pub use crate::registry::Registry;
pub use crate::router::{LiquidityAdded, Router};
