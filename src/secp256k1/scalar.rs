//! Operations in the secp256k1 scalar field `F_n` (the group order ring).
//!
//! Mirrors `field.rs` but bound to the curve order `N` instead of the base
//! field prime `P`.

use crate::bigint::{self, U256};

use super::constants::n;

pub fn fn_reduce(a: &U256) -> U256 {
    bigint::reduce(a, &n())
}

pub fn fn_add(a: &U256, b: &U256) -> U256 {
    bigint::add_mod(a, b, &n())
}

pub fn fn_sub(a: &U256, b: &U256) -> U256 {
    bigint::sub_mod(a, b, &n())
}

pub fn fn_neg(a: &U256) -> U256 {
    bigint::neg_mod(a, &n())
}

pub fn fn_mul(a: &U256, b: &U256) -> U256 {
    bigint::mul_mod(a, b, &n())
}

pub fn fn_inv(a: &U256) -> U256 {
    bigint::inv_mod(a, &n())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fn_inv_is_multiplicative_inverse() {
        let a = U256::from_u64(7);
        let inv = fn_inv(&a);
        assert_eq!(fn_mul(&a, &inv), U256::ONE);
    }

    #[test]
    fn fn_neg_add_is_zero() {
        let a = U256::from_u64(123);
        assert_eq!(fn_add(&a, &fn_neg(&a)), U256::ZERO);
    }
}
