//! Fixed-width 256-bit integer arithmetic shared by the secp256k1 field/scalar
//! rings and the Ed25519 field/scalar rings.
//!
//! Limbs are little-endian `u64` words (`limb[0]` is least significant).
//! All moduli this crate reduces against (secp256k1's `P` and `N`, Ed25519's
//! `P` and `L`) are prime, so modular inversion is done via Fermat's little
//! theorem (`a^(m-2) mod m`) rather than the extended Euclidean algorithm.

/// A 256-bit unsigned integer, little-endian limbs.
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct U256(pub [u64; 4]);

/// A 512-bit unsigned integer, little-endian limbs. Used only as scratch space
/// for widening multiplication and the bit-serial reduction below.
#[derive(Clone, Copy, PartialEq, Eq)]
struct U512([u64; 8]);

impl U256 {
    pub const ZERO: U256 = U256([0, 0, 0, 0]);
    pub const ONE: U256 = U256([1, 0, 0, 0]);

    pub fn from_be_bytes(bytes: &[u8; 32]) -> U256 {
        let mut limbs = [0u64; 4];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let start = 32 - (i + 1) * 8;
            *limb = u64::from_be_bytes(bytes[start..start + 8].try_into().unwrap());
        }
        U256(limbs)
    }

    pub fn to_be_bytes(self) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (i, limb) in self.0.iter().enumerate() {
            let start = 32 - (i + 1) * 8;
            out[start..start + 8].copy_from_slice(&limb.to_be_bytes());
        }
        out
    }

    pub fn from_u64(v: u64) -> U256 {
        U256([v, 0, 0, 0])
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0, 0, 0, 0]
    }

    pub fn bit(&self, i: u32) -> bool {
        (self.0[(i / 64) as usize] >> (i % 64)) & 1 == 1
    }

    /// Highest set bit index, or `None` if the value is zero.
    pub fn bit_length(&self) -> Option<u32> {
        for (i, limb) in self.0.iter().enumerate().rev() {
            if *limb != 0 {
                return Some((i as u32) * 64 + (63 - limb.leading_zeros()));
            }
        }
        None
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        for i in (0..4).rev() {
            let ord = self.0[i].cmp(&other.0[i]);
            if ord != core::cmp::Ordering::Equal {
                return ord;
            }
        }
        core::cmp::Ordering::Equal
    }
}

/// `a + b`, returning the 257th carry bit alongside the 256-bit result.
fn add_with_carry(a: &U256, b: &U256) -> (U256, u64) {
    let mut out = [0u64; 4];
    let mut carry = 0u128;
    for i in 0..4 {
        let sum = a.0[i] as u128 + b.0[i] as u128 + carry;
        out[i] = sum as u64;
        carry = sum >> 64;
    }
    (U256(out), carry as u64)
}

/// `a - b`, assuming `a >= b` (the only case this module ever calls it with).
fn sub_assuming_ge(a: &U256, b: &U256) -> U256 {
    let mut out = [0u64; 4];
    let mut borrow = 0i128;
    for i in 0..4 {
        let diff = a.0[i] as i128 - b.0[i] as i128 - borrow;
        if diff < 0 {
            out[i] = (diff + (1i128 << 64)) as u64;
            borrow = 1;
        } else {
            out[i] = diff as u64;
            borrow = 0;
        }
    }
    U256(out)
}

fn zero_extend(a: &U256) -> U512 {
    U512([a.0[0], a.0[1], a.0[2], a.0[3], 0, 0, 0, 0])
}

fn mul_to_wide(a: &U256, b: &U256) -> U512 {
    let mut out = [0u64; 8];
    for i in 0..4 {
        let mut carry = 0u128;
        for j in 0..4 {
            let product = a.0[i] as u128 * b.0[j] as u128 + out[i + j] as u128 + carry;
            out[i + j] = product as u64;
            carry = product >> 64;
        }
        out[i + 4] = (out[i + 4] as u128 + carry) as u64;
    }
    U512(out)
}

impl U512 {
    fn shl1(&mut self) -> u64 {
        let mut carry = 0u64;
        for limb in self.0.iter_mut() {
            let new_carry = *limb >> 63;
            *limb = (*limb << 1) | carry;
            carry = new_carry;
        }
        carry
    }

    fn ge(&self, other: &U512) -> bool {
        for i in (0..8).rev() {
            if self.0[i] != other.0[i] {
                return self.0[i] > other.0[i];
            }
        }
        true
    }

    fn sub_assign(&mut self, other: &U512) {
        let mut borrow = 0i128;
        for i in 0..8 {
            let diff = self.0[i] as i128 - other.0[i] as i128 - borrow;
            if diff < 0 {
                self.0[i] = (diff + (1i128 << 64)) as u64;
                borrow = 1;
            } else {
                self.0[i] = diff as u64;
                borrow = 0;
            }
        }
    }
}

/// Bit-serial long division: reduces an arbitrary 512-bit value modulo a
/// 256-bit modulus. The remainder invariant (`rem < modulus`) is maintained on
/// every iteration, so this is correct regardless of how `wide` compares to
/// `modulus` going in.
fn reduce_wide(wide: &U512, modulus: &U256) -> U256 {
    let modulus_wide = zero_extend(modulus);
    let mut rem = U512([0; 8]);
    for i in (0..512).rev() {
        rem.shl1();
        let bit = (wide.0[i / 64] >> (i % 64)) & 1;
        rem.0[0] |= bit;
        if rem.ge(&modulus_wide) {
            rem.sub_assign(&modulus_wide);
        }
    }
    U256([rem.0[0], rem.0[1], rem.0[2], rem.0[3]])
}

/// Reduces a raw 256-bit value into `[0, modulus)`. Used when decoding
/// caller-supplied big-endian scalars that may not already be canonical.
pub fn reduce(x: &U256, modulus: &U256) -> U256 {
    reduce_wide(&zero_extend(x), modulus)
}

/// Reduces a raw 512-bit little-endian value (e.g. a SHA-512 digest read as an
/// integer) into `[0, modulus)`.
pub fn reduce_512(x: &[u8; 64], modulus: &U256) -> U256 {
    let mut limbs = [0u64; 8];
    for (i, limb) in limbs.iter_mut().enumerate() {
        *limb = u64::from_le_bytes(x[i * 8..(i + 1) * 8].try_into().unwrap());
    }
    reduce_wide(&U512(limbs), modulus)
}

pub fn add_mod(a: &U256, b: &U256, modulus: &U256) -> U256 {
    let (sum, carry) = add_with_carry(a, b);
    let wide = U512([sum.0[0], sum.0[1], sum.0[2], sum.0[3], carry, 0, 0, 0]);
    reduce_wide(&wide, modulus)
}

pub fn neg_mod(a: &U256, modulus: &U256) -> U256 {
    if a.is_zero() {
        U256::ZERO
    } else {
        sub_assuming_ge(modulus, a)
    }
}

pub fn sub_mod(a: &U256, b: &U256, modulus: &U256) -> U256 {
    add_mod(a, &neg_mod(b, modulus), modulus)
}

pub fn mul_mod(a: &U256, b: &U256, modulus: &U256) -> U256 {
    reduce_wide(&mul_to_wide(a, b), modulus)
}

/// The raw (unreduced) integer sum `a + b`, as a 256-bit low part plus a flag
/// for whether the true sum overflowed 256 bits. Unlike `add_mod`, this does
/// not reduce modulo anything — secp256k1's recovery step needs the literal
/// integer `r + N` to compare against `P`, not a value already folded back
/// into some ring.
pub fn add_overflowing(a: &U256, b: &U256) -> (U256, bool) {
    let (sum, carry) = add_with_carry(a, b);
    (sum, carry != 0)
}

/// Fixed-width (2^256) two's-complement negation: `!a + 1`, wrapping. Used by
/// EIP-712's signed `intN` field encoding, which is a raw two's-complement bit
/// pattern rather than a reduction modulo a curve order.
pub fn wrapping_neg(a: &U256) -> U256 {
    let mut out = [0u64; 4];
    let mut carry = 1u128;
    for i in 0..4 {
        let sum = (!a.0[i]) as u128 + carry;
        out[i] = sum as u64;
        carry = sum >> 64;
    }
    U256(out)
}

/// `2^exp` for `exp` in `0..=256`, saturating to `U256::ZERO` at `exp == 256`
/// (the value doesn't fit and every caller only uses this as an exclusive
/// upper bound).
pub fn pow2(exp: u32) -> U256 {
    if exp >= 256 {
        return U256::ZERO;
    }
    let mut out = [0u64; 4];
    out[(exp / 64) as usize] = 1u64 << (exp % 64);
    U256(out)
}

/// `base^exp mod modulus` via left-to-right square-and-multiply.
pub fn pow_mod(base: &U256, exp: &U256, modulus: &U256) -> U256 {
    let Some(top) = exp.bit_length() else {
        return U256::ONE;
    };
    let mut acc = U256::ONE;
    for i in (0..=top).rev() {
        acc = mul_mod(&acc, &acc, modulus);
        if exp.bit(i) {
            acc = mul_mod(&acc, base, modulus);
        }
    }
    acc
}

/// Modular inverse of a nonzero element via Fermat's little theorem. Callers
/// must only invoke this with a prime `modulus` and a nonzero `a`.
pub fn inv_mod(a: &U256, modulus: &U256) -> U256 {
    debug_assert!(!a.is_zero(), "inverse of zero is undefined");
    let exp = sub_assuming_ge(modulus, &U256::from_u64(2));
    pow_mod(a, &exp, modulus)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(v: u64) -> U256 {
        U256::from_u64(v)
    }

    #[test]
    fn round_trips_be_bytes() {
        let bytes = [0x11u8; 32];
        assert_eq!(U256::from_be_bytes(&bytes).to_be_bytes(), bytes);
    }

    #[test]
    fn add_sub_mod_are_inverses() {
        let m = u(97);
        let a = u(53);
        let b = u(81);
        let sum = add_mod(&a, &b, &m);
        assert_eq!(sub_mod(&sum, &b, &m), a);
    }

    #[test]
    fn mul_mod_small_numbers() {
        let m = u(97);
        assert_eq!(mul_mod(&u(10), &u(10), &m), u(3)); // 100 mod 97 == 3
    }

    #[test]
    fn add_overflowing_reports_no_overflow_for_small_values() {
        let (sum, overflow) = add_overflowing(&u(40), &u(2));
        assert_eq!(sum, u(42));
        assert!(!overflow);
    }

    #[test]
    fn add_overflowing_reports_overflow_past_256_bits() {
        let max = U256([u64::MAX; 4]);
        let (_, overflow) = add_overflowing(&max, &u(2));
        assert!(overflow);
    }

    #[test]
    fn pow_mod_matches_fermat() {
        let m = u(97);
        // Fermat: a^96 == 1 (mod 97) for a coprime to 97
        assert_eq!(pow_mod(&u(5), &u(96), &m), U256::ONE);
    }

    #[test]
    fn wrapping_neg_round_trips() {
        let a = u(42);
        let neg = wrapping_neg(&a);
        assert_eq!(wrapping_neg(&neg), a);
        assert_eq!(add_with_carry(&a, &neg).0, U256::ZERO);
    }

    #[test]
    fn wrapping_neg_of_zero_is_zero() {
        assert_eq!(wrapping_neg(&U256::ZERO), U256::ZERO);
    }

    #[test]
    fn pow2_matches_bit_length() {
        assert_eq!(pow2(0), U256::ONE);
        assert_eq!(pow2(8), u(256));
        assert_eq!(pow2(256), U256::ZERO);
    }

    #[test]
    fn inv_mod_is_multiplicative_inverse() {
        let m = u(97);
        let a = u(44);
        let inv = inv_mod(&a, &m);
        assert_eq!(mul_mod(&a, &inv, &m), U256::ONE);
    }

    #[test]
    fn inv_mod_on_secp256k1_field() {
        // P = 2^256 - 2^32 - 977
        let p_bytes: [u8; 32] =
            hex("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f");
        let p = U256::from_be_bytes(&p_bytes);
        let a = U256::from_u64(123456789);
        let inv = inv_mod(&a, &p);
        assert_eq!(mul_mod(&a, &inv, &p), U256::ONE);
    }

    fn hex(s: &str) -> [u8; 32] {
        let mut out = [0u8; 32];
        for i in 0..32 {
            out[i] = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).unwrap();
        }
        out
    }
}
