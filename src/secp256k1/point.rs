//! Affine point arithmetic on `y^2 = x^3 + 7` over `F_p`.
//!
//! Uses plain affine coordinates with field inversion rather than Jacobian
//! projective coordinates — simpler, and this crate has no need for the
//! speedup.

use crate::bigint::U256;

use super::constants::{b, gx, gy};
use super::field::{fp_add, fp_inv, fp_mul, fp_neg, fp_square, fp_sub};

/// An affine secp256k1 point. The identity (point at infinity) is
/// represented as `(0, 0)`, which is never a point on the curve (`0^3+7=7`
/// is not a square residue whose root is `0`) — the convention the
/// point-add algorithm's vertical case relies on.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Point {
    pub x: U256,
    pub y: U256,
}

impl Point {
    pub const IDENTITY: Point = Point {
        x: U256::ZERO,
        y: U256::ZERO,
    };

    pub fn generator() -> Point {
        Point { x: gx(), y: gy() }
    }

    pub fn is_identity(&self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }

    /// `y^2 == x^3 + 7 (mod p)`, assuming `self` is not the identity.
    pub fn is_on_curve(&self) -> bool {
        let lhs = fp_square(&self.y);
        let rhs = fp_add(&fp_mul(&fp_square(&self.x), &self.x), &b());
        lhs == rhs
    }
}

/// `p1 + p2`. Handles the doubling case (`p1 == p2`) and the vertical case
/// (`p1 == -p2`, returning the identity).
pub fn point_add(p1: &Point, p2: &Point) -> Point {
    if p1.is_identity() {
        return *p2;
    }
    if p2.is_identity() {
        return *p1;
    }
    if p1.x == p2.x {
        if p1.y == p2.y {
            return point_double(p1);
        }
        // p1 == -p2: vertical line, result is the point at infinity.
        return Point::IDENTITY;
    }

    let lambda = fp_mul(&fp_sub(&p2.y, &p1.y), &fp_inv(&fp_sub(&p2.x, &p1.x)));
    let x3 = fp_sub(&fp_sub(&fp_square(&lambda), &p1.x), &p2.x);
    let y3 = fp_sub(&fp_mul(&lambda, &fp_sub(&p1.x, &x3)), &p1.y);
    Point { x: x3, y: y3 }
}

/// `2*p` via the tangent-line slope `3x^2 / 2y`.
pub fn point_double(p: &Point) -> Point {
    if p.is_identity() || p.y.is_zero() {
        return Point::IDENTITY;
    }
    let three_x_sq = fp_mul(&U256::from_u64(3), &fp_square(&p.x));
    let two_y = fp_mul(&U256::from_u64(2), &p.y);
    let lambda = fp_mul(&three_x_sq, &fp_inv(&two_y));
    let x3 = fp_sub(&fp_square(&lambda), &fp_mul(&U256::from_u64(2), &p.x));
    let y3 = fp_sub(&fp_mul(&lambda, &fp_sub(&p.x, &x3)), &p.y);
    Point { x: x3, y: y3 }
}

pub fn point_neg(p: &Point) -> Point {
    if p.is_identity() {
        return *p;
    }
    Point {
        x: p.x,
        y: fp_neg(&p.y),
    }
}

/// Left-to-right double-and-add scalar multiplication. `k` is used exactly as
/// given — callers reduce it mod `N` first.
pub fn scalar_mul(k: &U256, p: &Point) -> Point {
    let mut acc = Point::IDENTITY;
    let Some(top) = k.bit_length() else {
        return acc;
    };
    for i in (0..=top).rev() {
        acc = point_double(&acc);
        if k.bit(i) {
            acc = point_add(&acc, p);
        }
    }
    acc
}

/// `k1*G + k2*p2`, the combination `recover_pubkey` needs.
pub fn double_scalar_mul_with_g(k1: &U256, k2: &U256, p2: &Point) -> Point {
    point_add(&scalar_mul(k1, &Point::generator()), &scalar_mul(k2, p2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_is_on_curve() {
        assert!(Point::generator().is_on_curve());
    }

    #[test]
    fn doubling_matches_add_to_self() {
        let g = Point::generator();
        assert_eq!(point_double(&g), point_add(&g, &g));
    }

    #[test]
    fn scalar_mul_by_one_is_identity_op() {
        let g = Point::generator();
        assert_eq!(scalar_mul(&U256::ONE, &g), g);
    }

    #[test]
    fn scalar_mul_by_two_matches_double() {
        let g = Point::generator();
        assert_eq!(scalar_mul(&U256::from_u64(2), &g), point_double(&g));
    }

    #[test]
    fn adding_point_and_its_negation_is_identity() {
        let g = Point::generator();
        assert_eq!(point_add(&g, &point_neg(&g)), Point::IDENTITY);
    }

    #[test]
    fn scalar_mul_by_zero_is_identity() {
        let g = Point::generator();
        assert_eq!(scalar_mul(&U256::ZERO, &g), Point::IDENTITY);
    }

    #[test]
    fn result_of_scalar_mul_is_on_curve() {
        let g = Point::generator();
        let p = scalar_mul(&U256::from_u64(12345), &g);
        assert!(p.is_on_curve());
    }
}
