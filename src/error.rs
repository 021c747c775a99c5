//! Unified error types for the exchange core.
//!
//! Every fallible operation across the crate returns [`ExchangeError`].
//! Failures are immediate, local rejections: nothing is retried
//! internally, and a failed operation leaves all state exactly as it
//! was before the call began.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, ExchangeError>;

/// All failure conditions raised by the registry, pools, the router,
/// and the fungible-asset ledgers.
///
/// The enum is `Copy` and `Eq` so tests can match rejected operations
/// exactly.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeError {
    // -- registry -----------------------------------------------------------
    /// The two supplied asset identities are equal.
    #[error("the two supplied asset identities are equal")]
    SameAsset,

    /// One of the supplied asset identities is the null address.
    #[error("an asset identity is the null address")]
    ZeroAsset,

    /// A pool is already registered for the canonical pair.
    #[error("a pool already exists for this asset pair")]
    PairExists,

    // -- pool ---------------------------------------------------------------
    /// `initialize_pair` invoked by a caller other than the creating
    /// registry, or invoked a second time.
    #[error("only the creating registry may initialize the pool, exactly once")]
    NotFactory,

    /// A pool mutation invoked by a caller other than the bound router.
    #[error("only the bound router may mutate the pool")]
    NotRouter,

    /// A share removal exceeds the holder's owned shares.
    #[error("removal exceeds the holder's owned shares")]
    InsufficientShares,

    // -- router -------------------------------------------------------------
    /// No pool is registered for the requested pair.
    #[error("no pool is registered for this asset pair")]
    PairDoesNotExist,

    /// A quote was requested against a pool with a zero reserve.
    #[error("pool has a zero reserve")]
    NoLiquidity,

    /// The requested output would meet or exceed the available reserve.
    #[error("requested output meets or exceeds the available reserve")]
    LiquidityTooLow,

    /// The computed quote is below the caller's declared minimum.
    #[error("computed quote is below the declared minimum")]
    MinAmountTooLow,

    /// A router configuration call from a caller other than the owner.
    #[error("only the deploying owner may configure the router")]
    NotOwner,

    /// The router's registry binding was already set.
    #[error("the registry binding is already set")]
    FactoryAlreadySet,

    /// A router operation was attempted before the registry binding
    /// was configured.
    #[error("the router has no registry configured")]
    FactoryNotSet,

    // -- fungible assets ----------------------------------------------------
    /// No asset ledger is deployed at the given address.
    #[error("no asset is deployed at this address")]
    UnknownAsset,

    /// A transfer exceeds the holder's balance.
    #[error("transfer exceeds the holder's balance")]
    InsufficientBalance,

    /// A delegated transfer exceeds the spender's allowance.
    #[error("transfer exceeds the spender's allowance")]
    InsufficientAllowance,

    // -- arithmetic ---------------------------------------------------------
    /// Integer arithmetic overflowed or underflowed.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,
}
