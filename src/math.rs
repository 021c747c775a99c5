//! Integer math primitives shared by the pool and the router.
//!
//! Everything here is pure `u128` arithmetic: no floats, no silent
//! wrapping, rounding named at every division.

use crate::domain::{Amount, Rounding, Shares};
use crate::error::{ExchangeError, Result};

/// Integer square root via Newton's method.
///
/// Returns the largest `r` such that `r * r <= n`.
#[must_use]
pub fn isqrt(n: u128) -> u128 {
    if n == 0 {
        return 0;
    }
    let mut x = n;
    let mut y = x.div_ceil(2);
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}

/// Geometric mean of two amounts: `isqrt(a * b)`.
///
/// Used for the first share mint of a pool: it bounds the minted
/// shares by the contributed value and keeps an initial depositor from
/// setting an arbitrarily skewed price.
///
/// # Errors
///
/// Returns [`ExchangeError::Overflow`] if the product overflows.
pub fn geometric_mean(a: Amount, b: Amount) -> Result<Shares> {
    let product = a
        .checked_mul(&b)
        .ok_or(ExchangeError::Overflow("initial deposit product overflow"))?;
    Ok(Shares::new(isqrt(product.get())))
}

/// Computes `a * b / denominator` with the given rounding direction.
///
/// # Errors
///
/// - [`ExchangeError::Overflow`] if `a * b` overflows `u128`.
/// - [`ExchangeError::DivisionByZero`] if `denominator` is zero.
pub fn mul_div(a: u128, b: u128, denominator: u128, rounding: Rounding) -> Result<u128> {
    if denominator == 0 {
        return Err(ExchangeError::DivisionByZero);
    }
    let product = a
        .checked_mul(b)
        .ok_or(ExchangeError::Overflow("mul_div product overflow"))?;
    let q = product / denominator;
    match rounding {
        Rounding::Down => Ok(q),
        Rounding::Up => {
            if product % denominator != 0 {
                Ok(q + 1)
            } else {
                Ok(q)
            }
        }
    }
}
