//! Operations in the edwards25519 base field `F_p`, `p = 2^255 - 19`.

use crate::bigint::{self, U256};

use super::constants::{p, sqrt_m1};

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

pub fn fp_inv(a: &U256) -> U256 {
    bigint::inv_mod(a, &p())
}

/// Square root in `F_p` per RFC 8032 §5.1.3: try `a^((p+3)/8)`, then correct
/// by multiplying by `sqrt(-1)` if the first candidate's square doesn't
/// match. Returns `None` if `a` has no square root at all.
pub fn fp_sqrt(a: &U256) -> Option<U256> {
    let modulus = p();
    let exponent = exponent_p_plus_3_div_8(&modulus);
    let candidate = bigint::pow_mod(a, &exponent, &modulus);
    let a_reduced = bigint::reduce(a, &modulus);

    if bigint::mul_mod(&candidate, &candidate, &modulus) == a_reduced {
        return Some(candidate);
    }
    let corrected = bigint::mul_mod(&candidate, &sqrt_m1(), &modulus);
    if bigint::mul_mod(&corrected, &corrected, &modulus) == a_reduced {
        return Some(corrected);
    }
    None
}

/// `(p + 3) / 4 / 2 == (p + 3) / 8` via plain limb arithmetic (`p ≡ 5 mod 8`,
/// so `p + 3` is exactly divisible by 8).
fn exponent_p_plus_3_div_8(modulus: &U256) -> U256 {
    let mut limbs = modulus.0;
    let mut carry = 3u128;
    for limb in limbs.iter_mut() {
        let sum = *limb as u128 + carry;
        *limb = sum as u64;
        carry = sum >> 64;
        if carry == 0 {
            break;
        }
    }
    let mut out = [0u64; 4];
    let mut carry_bits = 0u64;
    for i in (0..4).rev() {
        let cur = limbs[i];
        out[i] = (cur >> 3) | (carry_bits << 61);
        carry_bits = cur & 0b111;
    }
    U256(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fp_inv_is_multiplicative_inverse() {
        let a = U256::from_u64(17);
        let inv = fp_inv(&a);
        assert_eq!(fp_mul(&a, &inv), U256::ONE);
    }

    #[test]
    fn fp_sqrt_of_square_is_a_root() {
        let a = U256::from_u64(25);
        let a_sq = fp_square(&a);
        let root = fp_sqrt(&a_sq).expect("25^2 has a root");
        assert!(root == a || root == fp_neg(&a));
    }

    #[test]
    fn sqrt_m1_squares_to_minus_one() {
        let m1 = fp_neg(&U256::ONE);
        assert_eq!(fp_square(&sqrt_m1()), m1);
    }
}
