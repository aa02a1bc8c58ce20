/// The five failure kinds surfaced by this crate's operations.
///
/// `keccak256` and `pack` aside (the former is total, the latter only raises
/// `Unsupported`), every fallible operation in this crate returns one of
/// these. Verify-shaped operations (`ed25519_verify`, `bip137_verify_message`)
/// convert any of them into `false` internally rather than propagating them.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("input shape: {0}")]
    InputShape(&'static str),

    #[error("input range: {0}")]
    InputRange(&'static str),

    #[error("no solution: {0}")]
    NoSolution(&'static str),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("sign failure: {0}")]
    SignFailure(&'static str),
}

pub type Result<T> = core::result::Result<T, Error>;
