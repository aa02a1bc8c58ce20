use crate::bigint::U256;

fn be(hex: &str) -> U256 {
    debug_assert_eq!(hex.len(), 64);
    let mut bytes = [0u8; 32];
    for i in 0..32 {
        bytes[i] = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).unwrap();
    }
    U256::from_be_bytes(&bytes)
}

/// Edwards25519 field prime: `2^255 - 19`.
pub fn p() -> U256 {
    be("7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffed")
}

/// Edwards25519 group order `L = 2^252 + 27742317777372353535851937790883648493`.
pub fn l() -> U256 {
    be("1000000000000000000000000000000014def9dea2f79cd65812631a5cf5d3ed")
}

/// Twisted-Edwards curve parameter `d = -121665/121666 mod p`.
pub fn d() -> U256 {
    be("52036cee2b6ffe738cc740797779e89800700a4d4141d8ab75eb4dca135978a3")
}

/// Base point x-coordinate.
pub fn base_x() -> U256 {
    be("216936d3cd6e53fec0a4e231fdd6dc5c692cc7609525a7b2c9562d608f25d51a")
}

/// Base point y-coordinate.
pub fn base_y() -> U256 {
    be("6666666666666666666666666666666666666666666666666666666666666658")
}

/// `sqrt(-1) mod p`, used to correct the `(p+3)/8`-exponent square root
/// candidate when decompressing a point (RFC 8032 §5.1.3).
pub fn sqrt_m1() -> U256 {
    be("2b8324804fc1df0b2b4d00993dfbd7a72f431806ad2fe478c4ee1b274a0ea0b0")
}

