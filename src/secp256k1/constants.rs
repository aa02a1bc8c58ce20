use crate::bigint::U256;

fn be(hex: &str) -> U256 {
    debug_assert_eq!(hex.len(), 64);
    let mut bytes = [0u8; 32];
    for i in 0..32 {
        bytes[i] = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).unwrap();
    }
    U256::from_be_bytes(&bytes)
}

/// secp256k1 field prime: `2^256 - 2^32 - 977`.
pub fn p() -> U256 {
    be("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f")
}

/// secp256k1 group order (SEC2).
pub fn n() -> U256 {
    be("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141")
}

/// Generator x-coordinate (SEC2).
pub fn gx() -> U256 {
    be("79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
}

/// Generator y-coordinate (SEC2).
pub fn gy() -> U256 {
    be("483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8")
}

/// Curve coefficient `b` in `y^2 = x^3 + b`.
pub fn b() -> U256 {
    U256::from_u64(7)
}
