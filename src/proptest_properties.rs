//! Property-based tests using `proptest` for exchange invariants.
//!
//! Covers:
//!
//! 1. **Pair canonicalization** — both argument orders resolve to the
//!    same key and the same pool.
//! 2. **Quote determinism** — quoting is pure and repeatable, and
//!    matches the reserve-ratio formula exactly.
//! 3. **Swap conservation** — a swap moves value between caller and
//!    pool without creating or destroying any.
//! 4. **Mint proportionality** — a follow-up deposit never mints more
//!    than its smaller relative contribution.
//! 5. **Redemption bounds** — removing shares never pays out more than
//!    the reserves, and a full add/remove round trip never profits.

use proptest::prelude::*;

use crate::domain::{Address, Amount, PairKey, Shares};
use crate::exchange::Exchange;

const OWNER: Address = Address::from_bytes([0x01; 32]);
const ALICE: Address = Address::from_bytes([0xA0; 32]);
const BOB: Address = Address::from_bytes([0xB0; 32]);

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Exchange with two funded, router-approved accounts and an initial
/// (ra, rb) deposit from Alice.
fn seeded_exchange(ra: u128, rb: u128) -> Option<(Exchange, Address, Address)> {
    let mut ex = Exchange::new(OWNER).ok()?;
    let funding = Amount::new(u64::MAX as u128);
    let gold = ex.deploy_asset("GOLD", ALICE, funding).ok()?;
    let silver = ex.deploy_asset("SLVR", ALICE, funding).ok()?;
    let router = ex.router_address();
    for (asset, holder) in [(gold, ALICE), (silver, ALICE), (gold, BOB), (silver, BOB)] {
        if holder == BOB {
            ex.transfer(ALICE, asset, BOB, Amount::new(u32::MAX as u128))
                .ok()?;
        }
        ex.approve(holder, asset, router, Amount::MAX).ok()?;
    }
    ex.add_liquidity(ALICE, gold, silver, Amount::new(ra), Amount::new(rb))
        .ok()?;
    Some((ex, gold, silver))
}

// ---------------------------------------------------------------------------
// Custom strategies
// ---------------------------------------------------------------------------

/// Reserve values in [1_000, 1_000_000_000] to stay far from overflow.
fn reserve_strategy() -> impl Strategy<Value = u128> {
    1_000u128..=1_000_000_000u128
}

/// Non-zero address bytes; byte zero would build the null identity.
fn address_byte_strategy() -> impl Strategy<Value = u8> {
    1u8..=255u8
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // -- Property 1: pair canonicalization ----------------------------------

    #[test]
    fn prop_pair_key_is_order_insensitive(
        a in address_byte_strategy(),
        b in address_byte_strategy(),
    ) {
        prop_assume!(a != b);
        let x = Address::from_bytes([a; 32]);
        let y = Address::from_bytes([b; 32]);
        let (Ok(k1), Ok(k2)) = (PairKey::new(x, y), PairKey::new(y, x)) else {
            return Err(TestCaseError::fail("distinct non-null pair must build"));
        };
        prop_assert_eq!(k1, k2);
        prop_assert_eq!(k1.lower().min(k1.higher()), k1.lower());
    }

    #[test]
    fn prop_lookup_matches_in_both_orders(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
    ) {
        let Some((ex, gold, silver)) = seeded_exchange(ra, rb) else {
            return Ok(());
        };
        let forward = ex.pair_address(gold, silver);
        let backward = ex.pair_address(silver, gold);
        prop_assert!(!forward.is_zero());
        prop_assert_eq!(forward, backward);
    }

    // -- Property 2: quote determinism --------------------------------------

    #[test]
    fn prop_quote_is_pure_and_exact(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        amount_in in 1u128..=1_000u128,
    ) {
        let Some((ex, gold, silver)) = seeded_exchange(ra, rb) else {
            return Ok(());
        };
        let Ok(first) = ex.get_quote(gold, silver, Amount::new(amount_in)) else {
            // Quote can be rejected (e.g. it would drain the reserve);
            // rejection must still be deterministic.
            let second = ex.get_quote(gold, silver, Amount::new(amount_in));
            prop_assert!(second.is_err());
            return Ok(());
        };
        let Ok(second) = ex.get_quote(gold, silver, Amount::new(amount_in)) else {
            return Err(TestCaseError::fail("repeat quote must succeed"));
        };
        prop_assert_eq!(first, second);
        prop_assert_eq!(first.get(), amount_in * rb / ra);
    }

    // -- Property 3: swap conservation --------------------------------------

    #[test]
    fn prop_swap_conserves_both_assets(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        amount_in in 1u128..=1_000u128,
    ) {
        let Some((mut ex, gold, silver)) = seeded_exchange(ra, rb) else {
            return Ok(());
        };
        let pool = ex.pair_address(gold, silver);
        let bob_gold = ex.balance_of(gold, BOB);
        let bob_silver = ex.balance_of(silver, BOB);
        let pool_gold = ex.balance_of(gold, pool);
        let pool_silver = ex.balance_of(silver, pool);

        let Ok(out) = ex.swap_tokens(BOB, gold, silver, Amount::new(amount_in), Amount::ZERO)
        else {
            return Ok(());
        };

        let moved_in = Amount::new(amount_in);
        prop_assert_eq!(
            ex.balance_of(gold, BOB).get() + ex.balance_of(gold, pool).get(),
            bob_gold.get() + pool_gold.get()
        );
        prop_assert_eq!(
            ex.balance_of(silver, BOB).get() + ex.balance_of(silver, pool).get(),
            bob_silver.get() + pool_silver.get()
        );
        prop_assert_eq!(ex.balance_of(gold, pool).get(), pool_gold.get() + moved_in.get());
        prop_assert_eq!(ex.balance_of(silver, pool).get(), pool_silver.get() - out.get());
    }

    // -- Property 4: mint proportionality -----------------------------------

    #[test]
    fn prop_follow_up_mint_never_exceeds_proportional_claim(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        dx in 1u128..=100_000u128,
        dy in 1u128..=100_000u128,
    ) {
        let Some((mut ex, gold, silver)) = seeded_exchange(ra, rb) else {
            return Ok(());
        };
        let pool_address = ex.pair_address(gold, silver);
        let Some(pool) = ex.pool(pool_address) else {
            return Err(TestCaseError::fail("seeded pool must exist"));
        };
        let supply_before = pool.share_supply().get();

        let Ok(added) = ex.add_liquidity(
            BOB, gold, silver, Amount::new(dx), Amount::new(dy),
        ) else {
            return Ok(());
        };
        // The deposit was trimmed to the reserve ratio; the mint must
        // not exceed either side's proportional claim.
        prop_assert!(added.minted.get() <= added.amount_x.get() * supply_before / ra);
        prop_assert!(added.minted.get() <= added.amount_y.get() * supply_before / rb);
    }

    // -- Property 5: redemption bounds --------------------------------------

    #[test]
    fn prop_redemption_never_exceeds_reserves(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        fraction in 1u128..=100u128,
    ) {
        let Some((mut ex, gold, silver)) = seeded_exchange(ra, rb) else {
            return Ok(());
        };
        let pool_address = ex.pair_address(gold, silver);
        let Some(pool) = ex.pool(pool_address) else {
            return Err(TestCaseError::fail("seeded pool must exist"));
        };
        let owned = pool.share_balance_of(ALICE).get();
        let to_burn = Shares::new((owned * fraction / 100).max(1));
        let router = ex.router_address();
        let Ok(()) = ex.approve_shares(ALICE, pool_address, router, to_burn) else {
            return Err(TestCaseError::fail("share approval must succeed"));
        };

        let Ok((out_gold, out_silver)) = ex.remove_liquidity(ALICE, gold, silver, to_burn)
        else {
            return Ok(());
        };
        prop_assert!(out_gold.get() <= ra);
        prop_assert!(out_silver.get() <= rb);
    }

    #[test]
    fn prop_add_remove_round_trip_never_profits(
        ra in reserve_strategy(),
        rb in reserve_strategy(),
        dx in 100u128..=100_000u128,
    ) {
        let Some((mut ex, gold, silver)) = seeded_exchange(ra, rb) else {
            return Ok(());
        };
        let gold_before = ex.balance_of(gold, BOB);
        let silver_before = ex.balance_of(silver, BOB);

        let Ok(added) = ex.add_liquidity(
            BOB, gold, silver, Amount::new(dx), Amount::new(u32::MAX as u128),
        ) else {
            return Ok(());
        };
        let router = ex.router_address();
        let Ok(()) = ex.approve_shares(BOB, added.pool, router, added.minted) else {
            return Err(TestCaseError::fail("share approval must succeed"));
        };
        let Ok((back_gold, back_silver)) =
            ex.remove_liquidity(BOB, gold, silver, added.minted)
        else {
            return Ok(());
        };

        prop_assert!(back_gold.get() <= added.amount_x.get());
        prop_assert!(back_silver.get() <= added.amount_y.get());
        prop_assert!(ex.balance_of(gold, BOB) <= gold_before);
        prop_assert!(ex.balance_of(silver, BOB) <= silver_before);
    }
}
