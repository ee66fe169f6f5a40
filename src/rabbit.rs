//! The Rabbit stream cipher (RFC 4503).
//!
//! Eight 32-bit state words and eight 32-bit counters. Each round steps the
//! counters as one 257-bit number, then mixes state and counters through a
//! squaring function. Every round yields 16 keystream bytes.

use crate::error::{EstreamError, Result};
use crate::stream::{Keystream, StreamCipher};
use std::fmt;

/// Key length in bytes.
pub const KEY_LEN: usize = 16;
/// IV length in bytes when one is supplied.
pub const IV_LEN: usize = 8;

const A: [u32; 8] = [
    0x4D34D34D, 0xD34D34D3, 0x34D34D34, 0x4D34D34D, 0xD34D34D3, 0x34D34D34, 0x4D34D34D,
    0xD34D34D3,
];

/// Rabbit keystream generator.
///
/// The IV is optional: an empty IV runs the cipher on the key-only state.
#[derive(Clone)]
pub struct Rabbit {
    state: State,
    keystream: Keystream<16>,
}

#[derive(Clone)]
struct State {
    x: [u32; 8],
    c: [u32; 8],
    carry: u32,
}

impl fmt::Debug for Rabbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rabbit")
            .field("pending", &self.keystream.pending())
            .finish_non_exhaustive()
    }
}

impl Rabbit {
    /// Set up the cipher from a 16-byte key and an 8-byte or empty IV.
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self> {
        let key: &[u8; KEY_LEN] = key.try_into().map_err(|_| EstreamError::InvalidKeyLength {
            algorithm: "rabbit",
            expected: KEY_LEN,
            actual: key.len(),
        })?;
        match iv.len() {
            0 => Ok(Self::from_key(key)),
            IV_LEN => {
                let mut iv_bytes = [0u8; IV_LEN];
                iv_bytes.copy_from_slice(iv);
                Ok(Self::from_key_iv(key, &iv_bytes))
            }
            actual => Err(EstreamError::InvalidIvLength {
                algorithm: "rabbit",
                actual,
            }),
        }
    }

    /// Key-only setup.
    pub fn from_key(key: &[u8; KEY_LEN]) -> Self {
        Self {
            state: State::from_key(key),
            keystream: Keystream::new(),
        }
    }

    /// Key setup followed by IV setup.
    pub fn from_key_iv(key: &[u8; KEY_LEN], iv: &[u8; IV_LEN]) -> Self {
        let mut state = State::from_key(key);
        state.apply_iv(iv);
        Self {
            state,
            keystream: Keystream::new(),
        }
    }
}

impl StreamCipher for Rabbit {
    fn apply_keystream(&mut self, buf: &mut [u8]) {
        let Self { state, keystream } = self;
        keystream.apply(buf, || state.extract());
    }
}

impl State {
    fn from_key(key: &[u8; KEY_LEN]) -> Self {
        let mut k = [0u32; 4];
        for (word, chunk) in k.iter_mut().zip(key.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        let [k0, k1, k2, k3] = k;

        let mut state = State {
            x: [
                k0,
                (k3 << 16) | (k2 >> 16),
                k1,
                (k0 << 16) | (k3 >> 16),
                k2,
                (k1 << 16) | (k0 >> 16),
                k3,
                (k2 << 16) | (k1 >> 16),
            ],
            c: [
                k2.rotate_left(16),
                (k0 & 0xffff0000) | (k1 & 0xffff),
                k3.rotate_left(16),
                (k1 & 0xffff0000) | (k2 & 0xffff),
                k0.rotate_left(16),
                (k2 & 0xffff0000) | (k3 & 0xffff),
                k1.rotate_left(16),
                (k3 & 0xffff0000) | (k0 & 0xffff),
            ],
            carry: 0,
        };

        for _ in 0..4 {
            state.next_state();
        }

        for i in 0..8 {
            state.c[i] ^= state.x[(i + 4) & 7];
        }

        state
    }

    fn apply_iv(&mut self, iv: &[u8; IV_LEN]) {
        let v: [u32; 4] = [
            u32::from(u16::from_le_bytes([iv[0], iv[1]])),
            u32::from(u16::from_le_bytes([iv[2], iv[3]])),
            u32::from(u16::from_le_bytes([iv[4], iv[5]])),
            u32::from(u16::from_le_bytes([iv[6], iv[7]])),
        ];
        let mix = [
            (v[1] << 16) | v[0],
            (v[3] << 16) | v[1],
            (v[3] << 16) | v[2],
            (v[2] << 16) | v[0],
        ];

        // Counters 4..8 take the same four values as 0..4
        for (i, c) in self.c.iter_mut().enumerate() {
            *c ^= mix[i & 3];
        }

        for _ in 0..4 {
            self.next_state();
        }
    }

    fn next_state(&mut self) {
        let mut carry = self.carry;
        for (c, a) in self.c.iter_mut().zip(A) {
            let sum = u64::from(*c) + u64::from(a) + u64::from(carry);
            *c = sum as u32;
            carry = (sum >> 32) as u32;
        }
        self.carry = carry;

        let mut g = [0u32; 8];
        for (i, out) in g.iter_mut().enumerate() {
            *out = g_func(self.x[i], self.c[i]);
        }

        let x = &mut self.x;
        x[0] = g[0].wrapping_add(g[7].rotate_left(16)).wrapping_add(g[6].rotate_left(16));
        x[1] = g[1].wrapping_add(g[0].rotate_left(8)).wrapping_add(g[7]);
        x[2] = g[2].wrapping_add(g[1].rotate_left(16)).wrapping_add(g[0].rotate_left(16));
        x[3] = g[3].wrapping_add(g[2].rotate_left(8)).wrapping_add(g[1]);
        x[4] = g[4].wrapping_add(g[3].rotate_left(16)).wrapping_add(g[2].rotate_left(16));
        x[5] = g[5].wrapping_add(g[4].rotate_left(8)).wrapping_add(g[3]);
        x[6] = g[6].wrapping_add(g[5].rotate_left(16)).wrapping_add(g[4].rotate_left(16));
        x[7] = g[7].wrapping_add(g[6].rotate_left(8)).wrapping_add(g[5]);
    }

    fn extract(&mut self) -> [u8; 16] {
        self.next_state();

        let x = &self.x;
        let words = [
            x[0] ^ (x[5] >> 16) ^ (x[3] << 16),
            x[2] ^ (x[7] >> 16) ^ (x[5] << 16),
            x[4] ^ (x[1] >> 16) ^ (x[7] << 16),
            x[6] ^ (x[3] >> 16) ^ (x[1] << 16),
        ];

        let mut block = [0u8; 16];
        for (chunk, word) in block.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        block
    }
}

/// Square the 32-bit sum in 64 bits and fold the halves together.
#[inline(always)]
fn g_func(u: u32, v: u32) -> u32 {
    let sum = u64::from(u.wrapping_add(v));
    let square = sum * sum;
    (square as u32) ^ ((square >> 32) as u32)
}
