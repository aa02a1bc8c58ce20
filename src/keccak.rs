//! Keccak-256 (the FIPS-202-predecessor variant Ethereum uses — domain
//! separator `0x01`, not SHA-3's `0x06`).
//!
//! State layout, padding, and the permutation round functions are
//! implemented directly here rather than pulled in from a hashing crate,
//! since the permutation itself is the hard core of this crate.

const RATE_BYTES: usize = 136;
const ROUNDS: usize = 24;

const RC: [u64; ROUNDS] = [
    0x0000000000000001,
    0x0000000000008082,
    0x800000000000808a,
    0x8000000080008000,
    0x000000000000808b,
    0x0000000080000001,
    0x8000000080008081,
    0x8000000000008009,
    0x000000000000008a,
    0x0000000000000088,
    0x0000000080008009,
    0x000000008000000a,
    0x000000008000808b,
    0x800000000000008b,
    0x8000000000008089,
    0x8000000000008003,
    0x8000000000008002,
    0x8000000000000080,
    0x000000000000800a,
    0x800000008000000a,
    0x8000000080008081,
    0x8000000000008080,
    0x0000000080000001,
    0x8000000080008008,
];

/// `ROT[x][y]` gives the rotation offset applied to `A[x,y]` before the
/// rho/pi step.
const ROT: [[u32; 5]; 5] = [
    [0, 36, 3, 41, 18],
    [1, 44, 10, 45, 2],
    [62, 6, 43, 15, 61],
    [28, 55, 25, 21, 56],
    [27, 20, 39, 8, 14],
];

fn keccak_f1600(state: &mut [u64; 25]) {
    for rc in RC.iter() {
        // theta
        let mut c = [0u64; 5];
        for x in 0..5 {
            c[x] = state[x] ^ state[x + 5] ^ state[x + 10] ^ state[x + 15] ^ state[x + 20];
        }
        let mut d = [0u64; 5];
        for x in 0..5 {
            d[x] = c[(x + 1) % 5].rotate_left(1) ^ c[(x + 4) % 5];
        }
        for x in 0..5 {
            for y in 0..5 {
                state[x + 5 * y] ^= d[x];
            }
        }

        // rho + pi: B[y, (2x+3y) mod 5] = rotl(A[x,y], ROT[x,y])
        let mut b = [0u64; 25];
        for x in 0..5 {
            for y in 0..5 {
                let dest = y + 5 * ((2 * x + 3 * y) % 5);
                b[dest] = state[x + 5 * y].rotate_left(ROT[x][y]);
            }
        }

        // chi
        for x in 0..5 {
            for y in 0..5 {
                state[x + 5 * y] =
                    b[x + 5 * y] ^ ((!b[(x + 1) % 5 + 5 * y]) & b[(x + 2) % 5 + 5 * y]);
            }
        }

        // iota
        state[0] ^= rc;
    }
}

fn xor_block(state: &mut [u64; 25], block: &[u8]) {
    debug_assert_eq!(block.len(), RATE_BYTES);
    for i in 0..RATE_BYTES / 8 {
        let word = u64::from_le_bytes(block[i * 8..i * 8 + 8].try_into().unwrap());
        state[i] ^= word;
    }
}

/// Computes the Keccak-256 digest of `data`. Total — there is no failure mode.
#[tracing::instrument(level = "trace", skip(data), fields(len = data.len()))]
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut state = [0u64; 25];

    let mut offset = 0;
    while offset + RATE_BYTES <= data.len() {
        xor_block(&mut state, &data[offset..offset + RATE_BYTES]);
        keccak_f1600(&mut state);
        offset += RATE_BYTES;
    }

    // Multirate padding pad10*1: 0x01 at the message boundary, zeros, then
    // 0x80 ORed into the last byte of the block. When the boundary lands on
    // the last byte of the rate the two bytes collide into 0x81 — no extra
    // block is emitted.
    let mut last = [0u8; RATE_BYTES];
    let remaining = data.len() - offset;
    last[..remaining].copy_from_slice(&data[offset..]);
    last[remaining] ^= 0x01;
    last[RATE_BYTES - 1] |= 0x80;
    xor_block(&mut state, &last);
    keccak_f1600(&mut state);

    let mut out = [0u8; 32];
    for i in 0..4 {
        out[i * 8..i * 8 + 8].copy_from_slice(&state[i].to_le_bytes());
    }
    out
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

    #[test]
    fn empty_input() {
        assert_eq!(
            keccak256(b""),
            hex32("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470")
        );
    }

    #[test]
    fn abc() {
        assert_eq!(
            keccak256(b"abc"),
            hex32("4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45")
        );
    }

    #[test]
    fn rate_minus_one_byte_padding_collision() {
        // len == RATE_BYTES - 1: the 0x01 domain separator and the 0x80
        // terminator land on the same byte (0x81), and no extra block is
        // absorbed.
        let data = vec![0x61u8; RATE_BYTES - 1];
        assert_eq!(
            keccak256(&data),
            hex32("34367dc248bbd832f4e3e69dfaac2f92638bd0bbd18f2912ba4ef454919cf446")
        );
    }

    #[test]
    fn full_block_boundary() {
        // Exactly one rate-sized block plus the implicit padding block.
        let data = vec![0x61u8; RATE_BYTES];
        assert_eq!(
            keccak256(&data),
            hex32("a6c4d403279fe3e0af03729caada8374b5ca54d8065329a3ebcaeb4b60aa386e")
        );
    }

    #[test]
    fn one_million_a() {
        let data = vec![b'a'; 1_000_000];
        // Well-known Keccak (not SHA3) test vector for 1,000,000 repetitions of 'a'.
        assert_eq!(
            keccak256(&data),
            hex32("fadae6b49f129bbb812be8407b7b2894f34aecf6dbd1f9b0f0c7e9853098fc96")
        );
    }
}
