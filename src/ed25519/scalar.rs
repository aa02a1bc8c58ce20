//! Operations in the edwards25519 scalar ring `F_l`, `l` the group order.

use crate::bigint::{self, U256};

use super::constants::l;

/// Reduces a raw 256-bit big-endian value into `[0, l)`.
pub fn reduce(a: &U256) -> U256 {
    bigint::reduce(a, &l())
}

/// Reduces a 512-bit little-endian digest (a SHA-512 output read as an
/// integer) into `[0, l)`.
pub fn reduce_512(digest: &[u8; 64]) -> U256 {
    bigint::reduce_512(digest, &l())
}

pub fn add(a: &U256, b: &U256) -> U256 {
    bigint::add_mod(a, b, &l())
}

pub fn mul(a: &U256, b: &U256) -> U256 {
    bigint::mul_mod(a, b, &l())
}

/// `(a * b + c) mod l`.
pub fn mul_add(a: &U256, b: &U256, c: &U256) -> U256 {
    add(&mul(a, b), c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reduce_of_l_is_zero() {
        assert_eq!(reduce(&l()), U256::ZERO);
    }

    #[test]
    fn mul_add_matches_manual_computation() {
        let a = U256::from_u64(6);
        let b = U256::from_u64(7);
        let c = U256::from_u64(3);
        assert_eq!(mul_add(&a, &b, &c), add(&mul(&a, &b), &c));
    }
}
