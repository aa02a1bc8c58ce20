//! secp256k1: field/scalar arithmetic, point operations, key derivation, and
//! recoverable ECDSA.

mod constants;
mod ecdsa;
mod field;
mod point;
mod scalar;

pub use constants::{gx, gy, n, p};
pub use ecdsa::{
    address_from_uncompressed, privkey_to_address, privkey_to_pubkey, recover_pubkey,
    sign_recoverable, RecoverableSignature, UncompressedPubkey,
};
pub use point::Point;
