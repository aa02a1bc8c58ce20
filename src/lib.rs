//! `sigcore`: Keccak-256, secp256k1, Ed25519, EIP-712 and BIP-137 message
//! signing primitives.
//!
//! Every operation here is a pure function of its byte inputs — no shared
//! mutable state, no runtime-built tables, no I/O. See each module's own
//! documentation for the algorithm it implements.

pub mod bigint;
pub mod bip137;
pub mod ed25519;
pub mod eip712;
mod error;
pub mod keccak;
pub mod msgpack;
pub mod secp256k1;

pub use bip137::{bip137_sign_message, bip137_signed_message_hash, bip137_verify_message, Bip137Signature};
pub use ed25519::{ed25519_public_key, ed25519_sign, ed25519_verify};
pub use eip712::{eip712_hash_agent_message, eip712_hash_full_message, AgentDomain, TypeField, TypedData};
pub use error::{Error, Result};
pub use keccak::keccak256;
pub use msgpack::{pack, Value as MsgPackValue};
pub use secp256k1::{
    privkey_to_address, privkey_to_pubkey, recover_pubkey, sign_recoverable, RecoverableSignature,
    UncompressedPubkey,
};
