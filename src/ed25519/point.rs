//! Extended twisted-Edwards point arithmetic on edwards25519.
//!
//! `(X, Y, Z, T)` with `x = X/Z`, `y = Y/Z`, `xy = T/Z` — the Hisil-Wong-
//! Carter-Dawson "unified" addition formulas handle both addition and
//! doubling without a branch, which is why `point_add` is used for both
//! below.

use crate::bigint::U256;
use crate::error::{Error, Result};

use super::constants::{base_x, base_y, d};
use super::field::{fp_add, fp_inv, fp_mul, fp_neg, fp_sqrt, fp_sub};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Point {
    pub x: U256,
    pub y: U256,
    pub z: U256,
    pub t: U256,
}

impl Point {
    pub fn identity() -> Point {
        Point {
            x: U256::ZERO,
            y: U256::ONE,
            z: U256::ONE,
            t: U256::ZERO,
        }
    }

    pub fn base() -> Point {
        affine_to_extended(&base_x(), &base_y())
    }

    /// Affine `(x, y)` by dividing out `z`.
    pub fn to_affine(&self) -> (U256, U256) {
        let zinv = fp_inv(&self.z);
        (fp_mul(&self.x, &zinv), fp_mul(&self.y, &zinv))
    }

    /// `out = (y | ((x & 1) << 255)).to_bytes(32, "little")`.
    pub fn compress(&self) -> [u8; 32] {
        let (x, y) = self.to_affine();
        let mut out = y.to_be_bytes();
        out.reverse(); // little-endian y
        if x.bit(0) {
            out[31] |= 0x80;
        }
        out
    }

    /// Decompresses a little-endian 32-byte encoding into a point, recovering
    /// `x` from `y` via `x^2 = (y^2 - 1) / (d*y^2 + 1)` and matching the sign
    /// bit in bit 255.
    pub fn decompress(bytes: &[u8; 32]) -> Result<Point> {
        let sign = (bytes[31] & 0x80) != 0;
        let mut y_bytes = *bytes;
        y_bytes[31] &= 0x7f;
        y_bytes.reverse(); // to big-endian for U256::from_be_bytes
        let y = U256::from_be_bytes(&y_bytes);
        if y >= super::constants::p() {
            return Err(Error::InputRange("ed25519 y coordinate >= p"));
        }

        let y_sq = fp_mul(&y, &y);
        let numerator = fp_sub(&y_sq, &U256::ONE);
        let denominator = fp_add(&fp_mul(&d(), &y_sq), &U256::ONE);
        let u = fp_mul(&numerator, &fp_inv(&denominator));
        let mut x = fp_sqrt(&u).ok_or(Error::NoSolution("no square root for ed25519 x"))?;

        if x.is_zero() && sign {
            return Err(Error::NoSolution("x=0 cannot carry a negative sign bit"));
        }
        if x.bit(0) != sign {
            x = fp_neg(&x);
        }

        Ok(affine_to_extended(&x, &y))
    }

    pub fn eq_affine(&self, other: &Point) -> bool {
        // Cross-multiply to compare projective coordinates without inverting:
        // X0*Z1 == X1*Z0 and Y0*Z1 == Y1*Z0.
        fp_mul(&self.x, &other.z) == fp_mul(&other.x, &self.z)
            && fp_mul(&self.y, &other.z) == fp_mul(&other.y, &self.z)
    }
}

fn affine_to_extended(x: &U256, y: &U256) -> Point {
    Point {
        x: *x,
        y: *y,
        z: U256::ONE,
        t: fp_mul(x, y),
    }
}

pub fn point_add(p: &Point, q: &Point) -> Point {
    let a = fp_mul(&fp_sub(&p.y, &p.x), &fp_sub(&q.y, &q.x));
    let b = fp_mul(&fp_add(&p.y, &p.x), &fp_add(&q.y, &q.x));
    let c = fp_mul(&fp_mul(&U256::from_u64(2), &fp_mul(&p.t, &q.t)), &d());
    let dd = fp_mul(&U256::from_u64(2), &fp_mul(&p.z, &q.z));
    let e = fp_sub(&b, &a);
    let f = fp_sub(&dd, &c);
    let g = fp_add(&dd, &c);
    let h = fp_add(&b, &a);

    Point {
        x: fp_mul(&e, &f),
        y: fp_mul(&g, &h),
        z: fp_mul(&f, &g),
        t: fp_mul(&e, &h),
    }
}

/// Right-to-left double-and-add scalar multiplication, `s` used as given
/// (callers reduce mod `L` first).
pub fn scalar_mul(s: &U256, p: &Point) -> Point {
    let mut result = Point::identity();
    let mut addend = *p;
    let Some(top) = s.bit_length() else {
        return result;
    };
    for i in 0..=top {
        if s.bit(i) {
            result = point_add(&result, &addend);
        }
        addend = point_add(&addend, &addend);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_point_round_trips_through_compress_decompress() {
        let b = Point::base();
        let compressed = b.compress();
        let decompressed = Point::decompress(&compressed).unwrap();
        assert!(b.eq_affine(&decompressed));
    }

    #[test]
    fn scalar_mul_by_one_is_identity_op() {
        let b = Point::base();
        let r = scalar_mul(&U256::ONE, &b);
        assert!(r.eq_affine(&b));
    }

    #[test]
    fn scalar_mul_by_zero_is_identity() {
        let b = Point::base();
        let r = scalar_mul(&U256::ZERO, &b);
        assert!(r.eq_affine(&Point::identity()));
    }

    #[test]
    fn doubling_via_add_matches_two_times_scalar_mul() {
        let b = Point::base();
        let doubled = point_add(&b, &b);
        let via_scalar = scalar_mul(&U256::from_u64(2), &b);
        assert!(doubled.eq_affine(&via_scalar));
    }

    #[test]
    fn decompress_rejects_y_out_of_range() {
        let mut bytes = [0xffu8; 32];
        bytes[31] &= 0x7f; // keep sign bit clear, y is still >= p
        assert!(Point::decompress(&bytes).is_err());
    }
}
