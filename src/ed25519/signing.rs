//! RFC 8032 key derivation, signing, and verification.

use sha2::{Digest, Sha512};

use crate::bigint::U256;
use crate::error::{Error, Result};

use super::point::{point_add, scalar_mul, Point};
use super::scalar;

/// Expands a 32-byte seed into the clamped secret scalar `a` and the nonce
/// prefix, per RFC 8032 §5.1.5.
fn expand_seed(seed: &[u8; 32]) -> (U256, [u8; 32]) {
    let digest = Sha512::digest(seed);
    let mut a_bytes: [u8; 32] = digest[0..32].try_into().unwrap();
    a_bytes[0] &= 248;
    a_bytes[31] &= 63;
    a_bytes[31] |= 64;
    a_bytes.reverse(); // clamped bytes are little-endian; U256 wants big-endian
    let a = U256::from_be_bytes(&a_bytes);

    let prefix: [u8; 32] = digest[32..64].try_into().unwrap();
    (a, prefix)
}

/// `a·B` compressed, where `a` is the clamped secret scalar from `seed`.
pub fn ed25519_public_key(seed: &[u8; 32]) -> [u8; 32] {
    let (a, _) = expand_seed(seed);
    scalar_mul(&a, &Point::base()).compress()
}

/// `R || s` per RFC 8032 §5.1.6: `r = H(prefix || msg) mod l`, `R = r·B`,
/// `h = H(R || A || msg) mod l`, `s = (r + h·a) mod l`.
#[tracing::instrument(level = "trace", skip(message, seed), fields(len = message.len()))]
pub fn ed25519_sign(message: &[u8], seed: &[u8; 32]) -> [u8; 64] {
    let (a, prefix) = expand_seed(seed);
    let a_compressed = scalar_mul(&a, &Point::base()).compress();

    let mut r_hasher = Sha512::new();
    r_hasher.update(prefix);
    r_hasher.update(message);
    let r_digest: [u8; 64] = r_hasher.finalize().into();
    let r_scalar = scalar::reduce_512(&r_digest);

    let r_point = scalar_mul(&r_scalar, &Point::base());
    let r_compressed = r_point.compress();

    let mut h_hasher = Sha512::new();
    h_hasher.update(r_compressed);
    h_hasher.update(a_compressed);
    h_hasher.update(message);
    let h_digest: [u8; 64] = h_hasher.finalize().into();
    let h = scalar::reduce_512(&h_digest);

    let s = scalar::mul_add(&h, &a, &r_scalar);

    let mut sig = [0u8; 64];
    sig[0..32].copy_from_slice(&r_compressed);
    let mut s_bytes = s.to_be_bytes();
    s_bytes.reverse();
    sig[32..64].copy_from_slice(&s_bytes);
    sig
}

fn verify_inner(message: &[u8], sig: &[u8; 64], pubkey: &[u8; 32]) -> Result<bool> {
    let a_point = Point::decompress(pubkey)?;
    let r_bytes: [u8; 32] = sig[0..32].try_into().unwrap();
    let r_point = Point::decompress(&r_bytes)?;

    let mut s_bytes: [u8; 32] = sig[32..64].try_into().unwrap();
    s_bytes.reverse(); // little-endian on the wire -> big-endian for U256
    let s = U256::from_be_bytes(&s_bytes);
    if s >= super::constants::l() {
        return Err(Error::InputRange("s >= l"));
    }

    let mut h_hasher = Sha512::new();
    h_hasher.update(r_bytes);
    h_hasher.update(pubkey);
    h_hasher.update(message);
    let h_digest: [u8; 64] = h_hasher.finalize().into();
    let h = scalar::reduce_512(&h_digest);

    let lhs = scalar_mul(&s, &Point::base());
    let rhs = point_add(&r_point, &scalar_mul(&h, &a_point));
    Ok(lhs.eq_affine(&rhs))
}

/// `s·B == R + h·A`. Never raises — any malformed input (wrong lengths,
/// undecodable points, `s >= l`) is folded into `false`.
pub fn ed25519_verify(message: &[u8], signature: &[u8; 64], pubkey: &[u8; 32]) -> bool {
    verify_inner(message, signature, pubkey).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex32(s: &str) -> [u8; 32] {
        let mut out = [0u8; 32];
        for i in 0..32 {
            out[i] = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).unwrap();
        }
        out
    }

    fn hex64(s: &str) -> [u8; 64] {
        let mut out = [0u8; 64];
        for i in 0..64 {
            out[i] = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16).unwrap();
        }
        out
    }

    // RFC 8032 §7.1 test 1.
    #[test]
    fn rfc8032_test_vector_1() {
        let seed = hex32("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60");
        let expected_pub =
            hex32("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a");
        let expected_sig = hex64(concat!(
            "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e065224901",
            "555fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b"
        ));

        let public_key = ed25519_public_key(&seed);
        assert_eq!(public_key, expected_pub);

        let sig = ed25519_sign(b"", &seed);
        assert_eq!(sig, expected_sig);

        assert!(ed25519_verify(b"", &sig, &public_key));
    }

    #[test]
    fn mutating_signature_byte_breaks_verification() {
        let seed = [0x11u8; 32];
        let public_key = ed25519_public_key(&seed);
        let mut sig = ed25519_sign(b"hello", &seed);
        sig[0] ^= 0x01;
        assert!(!ed25519_verify(b"hello", &sig, &public_key));
    }

    #[test]
    fn mutating_pubkey_byte_breaks_verification() {
        let seed = [0x22u8; 32];
        let mut public_key = ed25519_public_key(&seed);
        let sig = ed25519_sign(b"hello", &seed);
        public_key[0] ^= 0x01;
        assert!(!ed25519_verify(b"hello", &sig, &public_key));
    }

    #[test]
    fn sign_then_verify_nonempty_message() {
        let seed = [0x33u8; 32];
        let public_key = ed25519_public_key(&seed);
        let msg = b"the quick brown fox";
        let sig = ed25519_sign(msg, &seed);
        assert!(ed25519_verify(msg, &sig, &public_key));
    }
}
