//! Operations in the secp256k1 base field `F_p`, `p = 2^256 - 2^32 - 977`.
//!
//! Thin wrappers over `crate::bigint`'s generic modular arithmetic, bound to
//! this crate's field modulus.

use crate::bigint::{self, U256};

use super::constants::p;

pub fn fp_add(a: &U256, b: &U256) -> U256 {
    bigint::add_mod(a, b, &p())
}

pub fn fp_sub(a: &U256, b: &U256) -> U256 {
    bigint::sub_mod(a, b, &p())
}

pub fn fp_neg(a: &U256) -> U256 {
    bigint::neg_mod(a, &p())
}

pub fn fp_mul(a: &U256, b: &U256) -> U256 {
    bigint::mul_mod(a, b, &p())
}

pub fn fp_square(a: &U256) -> U256 {
    bigint::mul_mod(a, a, &p())
}

/// Inverse of a nonzero field element via Fermat's little theorem.
pub fn fp_inv(a: &U256) -> U256 {
    bigint::inv_mod(a, &p())
}

/// Square root in `F_p` via exponentiation: `p ≡ 3 (mod 4)`, so
/// `sqrt(a) = a^((p+1)/4) mod p` whenever `a` is a quadratic residue.
/// Returns `None` if `a` has no square root.
pub fn fp_sqrt(a: &U256) -> Option<U256> {
    let modulus = p();
    let exponent = exponent_p_plus_1_div_4(&modulus);
    let candidate = bigint::pow_mod(a, &exponent, &modulus);
    if bigint::mul_mod(&candidate, &candidate, &modulus) == bigint::reduce(a, &modulus) {
        Some(candidate)
    } else {
        None
    }
}

/// Computes `(p + 1) / 4` via plain limb arithmetic (p ≡ 3 mod 4, so this is
/// exact integer division with no remainder).
fn exponent_p_plus_1_div_4(modulus: &U256) -> U256 {
    // p + 1
    let mut limbs = modulus.0;
    let mut carry = 1u128;
    for limb in limbs.iter_mut() {
        let sum = *limb as u128 + carry;
        *limb = sum as u64;
        carry = sum >> 64;
        if carry == 0 {
            break;
        }
    }
    // divide by 4: shift right by 2 across the limb array
    let mut out = [0u64; 4];
    let mut carry_bits = 0u64;
    for i in (0..4).rev() {
        let cur = limbs[i];
        out[i] = (cur >> 2) | (carry_bits << 62);
        carry_bits = cur & 0b11;
    }
    U256(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fp_add_sub_roundtrip() {
        let a = U256::from_u64(123456789);
        let b = U256::from_u64(987654321);
        let sum = fp_add(&a, &b);
        assert_eq!(fp_sub(&sum, &b), a);
    }

    #[test]
    fn fp_inv_is_multiplicative_inverse() {
        let a = U256::from_u64(42);
        let inv = fp_inv(&a);
        assert_eq!(fp_mul(&a, &inv), U256::ONE);
    }

    #[test]
    fn fp_sqrt_of_square_is_a_root() {
        let a = U256::from_u64(9);
        let a_sq = fp_square(&a);
        let root = fp_sqrt(&a_sq).expect("9^2 has a root");
        assert!(root == a || root == fp_neg(&a));
    }

    #[test]
    fn fp_sqrt_of_generator_y_squared_is_gy() {
        let gy = super::super::constants::gy();
        let gy_sq = fp_square(&gy);
        let root = fp_sqrt(&gy_sq).unwrap();
        assert!(root == gy || root == fp_neg(&gy));
    }
}
