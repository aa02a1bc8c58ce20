//! Ed25519: RFC 8032 key derivation, sign, and verify.

mod constants;
mod field;
mod point;
mod scalar;
mod signing;

pub use point::Point;
pub use signing::{ed25519_public_key, ed25519_sign, ed25519_verify};
