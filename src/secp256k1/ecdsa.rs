//! Key derivation, recoverable ECDSA signing, and public-key recovery.

use crate::bigint::U256;
use crate::error::{Error, Result};
use crate::keccak::keccak256;

use super::constants::n;
use super::field::fp_sqrt;
use super::point::{double_scalar_mul_with_g, scalar_mul, Point};
use super::scalar::{fn_add, fn_inv, fn_mul, fn_neg, fn_reduce};

/// 65-byte uncompressed public key: `04 || X(32BE) || Y(32BE)`.
pub type UncompressedPubkey = [u8; 65];

/// A recoverable ECDSA signature: `r`, `s` (each reduced mod `N`, `s` already
/// low-`S` normalized) and `v = 27 + recid`, `recid ∈ {0,1,2,3}`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RecoverableSignature {
    pub r: U256,
    pub s: U256,
    pub v: u8,
}

impl RecoverableSignature {
    pub fn recid(&self) -> u8 {
        self.v - 27
    }

    /// `r(32BE) || s(32BE) || v(1)`, the same field order
    /// `k256::ecdsa::recoverable::Signature` uses for its own 65-byte wire
    /// form.
    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[0..32].copy_from_slice(&self.r.to_be_bytes());
        out[32..64].copy_from_slice(&self.s.to_be_bytes());
        out[64] = self.v;
        out
    }
}

impl TryFrom<&[u8]> for RecoverableSignature {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 65 {
            return Err(Error::InputShape("recoverable signature must be 65 bytes"));
        }
        let r = U256::from_be_bytes(bytes[0..32].try_into().unwrap());
        let s = U256::from_be_bytes(bytes[32..64].try_into().unwrap());
        let v = bytes[64];
        if !(27..=30).contains(&v) {
            return Err(Error::InputRange("v must be in 27..=30"));
        }
        Ok(RecoverableSignature { r, s, v })
    }
}

fn require_valid_scalar(d: &U256, what: &'static str) -> Result<()> {
    if d.is_zero() || *d >= n() {
        return Err(Error::InputRange(what));
    }
    Ok(())
}

fn point_to_uncompressed(p: &Point) -> UncompressedPubkey {
    let mut out = [0u8; 65];
    out[0] = 0x04;
    out[1..33].copy_from_slice(&p.x.to_be_bytes());
    out[33..65].copy_from_slice(&p.y.to_be_bytes());
    out
}

/// `d·G`, encoded as `04 || X || Y`. Requires `0 < d < N`.
pub fn privkey_to_pubkey(d32: &[u8; 32]) -> Result<UncompressedPubkey> {
    let d = U256::from_be_bytes(d32);
    require_valid_scalar(&d, "private key out of [1, N-1]")?;
    let q = scalar_mul(&d, &Point::generator());
    Ok(point_to_uncompressed(&q))
}

/// Last 20 bytes of `keccak256(X || Y)`, lowercase-hex `0x`-prefixed.
pub fn privkey_to_address(d32: &[u8; 32]) -> Result<String> {
    let pubkey = privkey_to_pubkey(d32)?;
    Ok(address_from_uncompressed(&pubkey))
}

/// Derives the Ethereum address string from an uncompressed (`04 || X || Y`)
/// public key: `keccak256(X || Y)`, last 20 bytes.
pub fn address_from_uncompressed(pubkey: &UncompressedPubkey) -> String {
    let digest = keccak256(&pubkey[1..]);
    let mut hex = String::with_capacity(42);
    hex.push_str("0x");
    for byte in &digest[12..32] {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}

/// Recovers the signer's 65-byte uncompressed public key from `msg_hash`,
/// `(r, s)`, and `recid ∈ 0..4`.
#[tracing::instrument(level = "trace", skip(msg_hash), fields(recid))]
pub fn recover_pubkey(msg_hash: &[u8; 32], r: &U256, s: &U256, recid: u8) -> Result<UncompressedPubkey> {
    if recid > 3 {
        return Err(Error::InputRange("recid must be in 0..=3"));
    }
    if r.is_zero() || *r >= n() {
        return Err(Error::InputRange("r out of [1, N-1]"));
    }
    if s.is_zero() || *s >= n() {
        return Err(Error::InputRange("s out of [1, N-1]"));
    }

    let p = super::constants::p();
    let x = if recid & 2 != 0 {
        // The literal integer sum r + N, not a reduction mod N (which would
        // just hand back r unchanged) — compared against P directly.
        let (candidate, overflowed) = crate::bigint::add_overflowing(r, &n());
        if overflowed || candidate >= p {
            return Err(Error::InputRange("r + N >= P"));
        }
        candidate
    } else {
        *r
    };

    let alpha = {
        use super::field::{fp_add, fp_mul, fp_square};
        fp_add(&fp_mul(&fp_square(&x), &x), &super::constants::b())
    };
    let beta = fp_sqrt(&alpha).ok_or(Error::NoSolution("no square root for recovered x"))?;
    let y = if (beta.0[0] & 1) == (recid & 1) as u64 {
        beta
    } else {
        super::field::fp_neg(&beta)
    };
    let r_point = Point { x, y };

    let z = fn_reduce(&U256::from_be_bytes(msg_hash));
    let r_inv = fn_inv(r);
    let u1 = fn_mul(&fn_neg(&z), &r_inv);
    let u2 = fn_mul(s, &r_inv);

    let q = double_scalar_mul_with_g(&u1, &u2, &r_point);
    if q.is_identity() {
        return Err(Error::NoSolution("recovered point is the identity"));
    }
    Ok(point_to_uncompressed(&q))
}

/// Recoverable ECDSA signing: a homebrew (non-RFC-6979) k-derivation,
/// low-S normalization, and a recid computed directly from `k·G`'s
/// coordinates (`ky mod 2`, `kx >= N`) — low-S normalization negates `s`,
/// which negates the recovering point `R`, so the parity bit is flipped
/// right along with it. The direct recid is confirmed against the signer's
/// own public key (not just "recovery succeeded at all"); on mismatch this
/// falls back to a brute-force 0..4 recid trial before moving on to the next
/// `k` candidate.
#[tracing::instrument(level = "trace", skip(d32, msg_hash))]
pub fn sign_recoverable(d32: &[u8; 32], msg_hash: &[u8; 32]) -> Result<RecoverableSignature> {
    let d = U256::from_be_bytes(d32);
    require_valid_scalar(&d, "private key out of [1, N-1]")?;
    let expected_pubkey = privkey_to_pubkey(d32)?;
    let z = fn_reduce(&U256::from_be_bytes(msg_hash));
    let order = n();
    let n_minus_2 = super::scalar::fn_sub(&order, &U256::from_u64(2));

    let k0 = {
        // z + d computed without reducing mod N first, then reduced mod N-2
        // and shifted into [1, N-2].
        let sum = crate::bigint::add_mod(&z, &d, &order);
        let reduced = crate::bigint::reduce(&sum, &n_minus_2);
        crate::bigint::add_mod(&reduced, &U256::ONE, &order)
    };

    for attempt in 0u64..256 {
        let k = crate::bigint::add_mod(&k0, &U256::from_u64(attempt), &order);
        if k.is_zero() {
            continue;
        }
        let r_point = scalar_mul(&k, &Point::generator());
        let r = fn_reduce(&r_point.x);
        if r.is_zero() {
            continue;
        }
        let k_inv = fn_inv(&k);
        let mut s = fn_mul(&k_inv, &fn_add(&z, &fn_mul(&r, &d)));
        if s.is_zero() {
            continue;
        }

        // recid's low bit is the parity of k.G's y-coordinate and its high
        // bit is whether k.G's x-coordinate already overflowed the scalar
        // field. Negating s (the low-S branch) negates R, which flips that
        // parity bit — so the flip has to happen in the same branch.
        let mut recid_base = (r_point.y.0[0] & 1) as u8;
        let half_n = half_order(&order);
        if s > half_n {
            s = super::scalar::fn_sub(&order, &s);
            recid_base ^= 1;
        }
        let recid_high = (r_point.x >= order) as u8;
        let direct_recid = recid_base | (recid_high << 1);

        let recovers_to_signer = |recid: u8| {
            recover_pubkey(msg_hash, &r, &s, recid)
                .map(|q| q == expected_pubkey)
                .unwrap_or(false)
        };

        if recovers_to_signer(direct_recid) {
            return Ok(RecoverableSignature {
                r,
                s,
                v: 27 + direct_recid,
            });
        }
        if let Some(recid) = (0u8..4).find(|&candidate| candidate != direct_recid && recovers_to_signer(candidate)) {
            return Ok(RecoverableSignature { r, s, v: 27 + recid });
        }
    }

    Err(Error::SignFailure(
        "could not produce a valid recoverable signature in 256 attempts",
    ))
}

fn half_order(order: &U256) -> U256 {
    let mut out = [0u64; 4];
    let mut carry_bits = 0u64;
    for i in (0..4).rev() {
        let cur = order.0[i];
        out[i] = (cur >> 1) | (carry_bits << 63);
        carry_bits = cur & 1;
    }
    U256(out)
}
