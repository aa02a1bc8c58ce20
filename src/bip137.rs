//! BIP-137 signed-message encoding, built on top of [`crate::secp256k1`]'s
//! recoverable ECDSA.
//!
//! The message hash here is a single SHA-256 of the raw message, not the
//! Bitcoin-style `SHA256(SHA256("\x18Bitcoin Signed Message:\n<len>" || msg))`
//! double hash. This is a deliberate simplification, not strict BIP-137.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use sha2::{Digest, Sha256};

use crate::bigint::U256;
use crate::error::{Error, Result};
use crate::secp256k1::{self, RecoverableSignature, UncompressedPubkey};

/// A decoded BIP-137 signature: `header(1) || r(32BE) || s(32BE)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bip137Signature {
    pub header: u8,
    pub r: U256,
    pub s: U256,
}

impl Bip137Signature {
    /// `header & 3` is the recovery id; the `31`/`32` base folds in whether
    /// the signing key's public key was compressed, which this crate's
    /// keys never are (`privkey_to_pubkey` always emits the 65-byte
    /// uncompressed form) — so `header = 32 + recid` unless `recid == 3`
    /// (which collides with the compressed-key range and maps to `31`).
    pub fn recid(&self) -> u8 {
        self.header & 3
    }

    pub fn to_bytes(&self) -> [u8; 65] {
        let mut out = [0u8; 65];
        out[0] = self.header;
        out[1..33].copy_from_slice(&self.r.to_be_bytes());
        out[33..65].copy_from_slice(&self.s.to_be_bytes());
        out
    }
}

impl TryFrom<&[u8]> for Bip137Signature {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 65 {
            return Err(Error::InputShape("BIP-137 signature must decode to 65 bytes"));
        }
        Ok(Bip137Signature {
            header: bytes[0],
            r: U256::from_be_bytes(bytes[1..33].try_into().unwrap()),
            s: U256::from_be_bytes(bytes[33..65].try_into().unwrap()),
        })
    }
}

fn header_for_recid(recid: u8) -> u8 {
    if recid < 3 {
        32 + recid
    } else {
        31
    }
}

/// `SHA-256(msg)` — a single hash, not Bitcoin's double-SHA-256 varint-prefixed
/// scheme.
pub fn bip137_signed_message_hash(msg: &[u8]) -> [u8; 32] {
    Sha256::digest(msg).into()
}

/// Signs `msg` and Base64-encodes the 65-byte BIP-137 wire form.
#[tracing::instrument(level = "debug", skip(privkey, msg), fields(len = msg.len()))]
pub fn bip137_sign_message(privkey: &[u8; 32], msg: &[u8]) -> Result<Vec<u8>> {
    let hash = bip137_signed_message_hash(msg);
    let sig: RecoverableSignature = secp256k1::sign_recoverable(privkey, &hash)?;
    let recid = sig.recid();
    let wire = Bip137Signature {
        header: header_for_recid(recid),
        r: sig.r,
        s: sig.s,
    };
    Ok(BASE64.encode(wire.to_bytes()).into_bytes())
}

/// Base64-decodes `sig_b64`, recovers the signer's public key from
/// `(hash, r, s, recid)`, and compares it byte-for-byte against `pubkey`.
/// Never raises — any malformed input folds into `false`.
pub fn bip137_verify_message(msg: &[u8], sig_b64: &[u8], pubkey: &UncompressedPubkey) -> bool {
    verify_inner(msg, sig_b64, pubkey).unwrap_or(false)
}

fn verify_inner(msg: &[u8], sig_b64: &[u8], pubkey: &UncompressedPubkey) -> Result<bool> {
    let decoded = BASE64
        .decode(sig_b64)
        .map_err(|_| Error::NoSolution("BIP-137 signature is not valid base64"))?;
    let sig = Bip137Signature::try_from(decoded.as_slice())?;
    let hash = bip137_signed_message_hash(msg);
    let recovered = secp256k1::recover_pubkey(&hash, &sig.r, &sig.s, sig.recid())?;
    Ok(&recovered == pubkey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_round_trips() {
        let privkey = [0x07u8; 32];
        let pubkey = secp256k1::privkey_to_pubkey(&privkey).unwrap();
        let msg = b"hello world";

        let sig_b64 = bip137_sign_message(&privkey, msg).unwrap();
        assert!(bip137_verify_message(msg, &sig_b64, &pubkey));
    }

    #[test]
    fn verify_rejects_wrong_pubkey() {
        let privkey = [0x09u8; 32];
        let other_privkey = [0x0au8; 32];
        let other_pubkey = secp256k1::privkey_to_pubkey(&other_privkey).unwrap();
        let msg = b"some message";

        let sig_b64 = bip137_sign_message(&privkey, msg).unwrap();
        assert!(!bip137_verify_message(msg, &sig_b64, &other_pubkey));
    }

    #[test]
    fn verify_rejects_tampered_message() {
        let privkey = [0x0bu8; 32];
        let pubkey = secp256k1::privkey_to_pubkey(&privkey).unwrap();
        let sig_b64 = bip137_sign_message(&privkey, b"original").unwrap();
        assert!(!bip137_verify_message(b"tampered", &sig_b64, &pubkey));
    }

    #[test]
    fn verify_rejects_garbage_base64() {
        let pubkey = secp256k1::privkey_to_pubkey(&[0x0cu8; 32]).unwrap();
        assert!(!bip137_verify_message(b"x", b"not-valid-base64!!!", &pubkey));
    }

    #[test]
    fn header_encodes_recid_below_three_directly() {
        assert_eq!(header_for_recid(0), 32);
        assert_eq!(header_for_recid(1), 33);
        assert_eq!(header_for_recid(2), 34);
        assert_eq!(header_for_recid(3), 31);
    }

    #[test]
    fn signature_round_trips_through_bytes() {
        let sig = Bip137Signature {
            header: 32,
            r: U256::from_be_bytes(&[0x11; 32]),
            s: U256::from_be_bytes(&[0x22; 32]),
        };
        let bytes = sig.to_bytes();
        assert_eq!(Bip137Signature::try_from(&bytes[..]).unwrap(), sig);
    }

    #[test]
    fn signed_message_hash_is_single_sha256() {
        let expected: [u8; 32] = Sha256::digest(b"abc").into();
        assert_eq!(bip137_signed_message_hash(b"abc"), expected);
    }
}
