//! # Ratioswap
//!
//! Accounting and pricing core for a two-asset automated exchange:
//! a registry that creates and looks up trading pools, pools that hold
//! two reserve balances and issue proportional ownership shares, and a
//! router that computes optimal liquidity amounts and constant-ratio
//! trade quotes.
//!
//! All arithmetic is integer arithmetic with explicit rounding; every
//! fallible operation returns [`ExchangeError`](error::ExchangeError)
//! and leaves state untouched on failure.
//!
//! # Quick Start
//!
//! ```rust
//! use ratioswap::domain::{Address, Amount};
//! use ratioswap::exchange::Exchange;
//!
//! let owner = Address::from_bytes([0xEE; 32]);
//! let alice = Address::from_bytes([0xAA; 32]);
//!
//! let mut exchange = Exchange::new(owner).expect("wiring succeeds");
//! let gold = exchange
//!     .deploy_asset("GOLD", alice, Amount::new(10_000))
//!     .expect("asset deployed");
//! let silver = exchange
//!     .deploy_asset("SLVR", alice, Amount::new(10_000))
//!     .expect("asset deployed");
//!
//! // Alice authorizes the router, provides liquidity, and trades.
//! let router = exchange.router_address();
//! exchange.approve(alice, gold, router, Amount::new(10_000)).expect("approve");
//! exchange.approve(alice, silver, router, Amount::new(10_000)).expect("approve");
//!
//! let added = exchange
//!     .add_liquidity(alice, gold, silver, Amount::new(1_000), Amount::new(2_000))
//!     .expect("liquidity added");
//! assert!(!added.minted.is_zero());
//!
//! let quote = exchange.get_quote(gold, silver, Amount::new(10)).expect("quote");
//! assert_eq!(quote, Amount::new(20)); // constant-ratio: 10 * 2000 / 1000
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │   Caller     │  explicit identity on every entry point
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │   Router     │  optimal amounts, quotes, swaps; sole pool mutator
//! └──────┬──────┘
//!        │ lookup / create
//!        ▼
//! ┌─────────────┐
//! │  Registry    │  one pool per canonical asset pair
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │    Pool      │  reserves = live holdings; proportional shares
//! └──────┬──────┘
//!        │ transfer / transfer_from
//!        ▼
//! ┌─────────────┐
//! │ FungibleAsset│  balance / allowance ledgers (external collaborator)
//! └─────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`]   | Newtype value types: [`Address`](domain::Address), [`Amount`](domain::Amount), [`Shares`](domain::Shares), [`PairKey`](domain::PairKey) |
//! | [`asset`]    | [`FungibleAsset`](asset::FungibleAsset) balance/allowance ledgers and the [`AssetBook`](asset::AssetBook) |
//! | [`registry`] | [`Registry`](registry::Registry): pair creation and canonical lookup |
//! | [`pool`]     | [`Pool`](pool::Pool): reserve accounting and the share ledger |
//! | [`router`]   | [`Router`](router::Router): liquidity flows, quotes, and swaps |
//! | [`exchange`] | [`Exchange`](exchange::Exchange): serial execution environment wiring everything together |
//! | [`events`]   | [`ExchangeEvent`](events::ExchangeEvent) and the commit-ordered [`EventLog`](events::EventLog) |
//! | [`math`]     | Integer square root and full-precision `mul_div` |
//! | [`error`]    | [`ExchangeError`](error::ExchangeError) unified error enum |
//! | [`prelude`]  | Convenience re-exports |

pub mod asset;
pub mod domain;
pub mod error;
pub mod events;
pub mod exchange;
pub mod math;
pub mod pool;
pub mod prelude;
pub mod registry;
pub mod router;

#[cfg(test)]
mod proptest_properties;
