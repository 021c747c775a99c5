//! Explicit rounding direction for integer division.

/// Rounding direction for division on domain quantities.
///
/// Every division in the exchange core names its rounding direction
/// explicitly so precision loss is a visible decision, not an accident.
/// Mint and redemption amounts round down to favor the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rounding {
    /// Round towards positive infinity (ceiling).
    Up,
    /// Round towards zero (floor).
    Down,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality() {
        assert_eq!(Rounding::Up, Rounding::Up);
        assert_ne!(Rounding::Up, Rounding::Down);
    }

    #[test]
    fn copy_semantics() {
        let r = Rounding::Down;
        let s = r;
        assert_eq!(r, s);
    }
}
