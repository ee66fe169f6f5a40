//! The HC-256 stream cipher.
//!
//! Same shape as HC-128 at twice the width: 1024-word tables, a 256-bit key
//! and IV, and S-box lookups over all four bytes of a word. Setup runs 4096
//! steps whose output is thrown away.
//!
//! Reference: Hongjun Wu, "A New Stream Cipher HC-256", FSE 2004.

use crate::error::{EstreamError, Result};
use crate::stream::{Keystream, StreamCipher};
use std::fmt;

/// Key length in bytes.
pub const KEY_LEN: usize = 32;
/// IV length in bytes.
pub const IV_LEN: usize = 32;

const TABLE_LEN: usize = 1024;
const MASK: usize = TABLE_LEN - 1;
const EXPANDED_LEN: usize = 2560;
const WARMUP_STEPS: usize = 4096;

/// HC-256 keystream generator.
#[derive(Clone)]
pub struct Hc256 {
    core: Core,
    keystream: Keystream<4>,
}

#[derive(Clone)]
struct Core {
    p: [u32; TABLE_LEN],
    q: [u32; TABLE_LEN],
    counter: u64,
}

impl fmt::Debug for Hc256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hc256")
            .field("counter", &self.core.counter)
            .field("pending", &self.keystream.pending())
            .finish_non_exhaustive()
    }
}

impl Hc256 {
    /// Set up the cipher from a 32-byte key and a 32-byte IV.
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self> {
        let key: &[u8; KEY_LEN] = key.try_into().map_err(|_| EstreamError::InvalidKeyLength {
            algorithm: "hc256",
            expected: KEY_LEN,
            actual: key.len(),
        })?;
        let iv: &[u8; IV_LEN] = iv.try_into().map_err(|_| EstreamError::InvalidIvLength {
            algorithm: "hc256",
            actual: iv.len(),
        })?;
        Ok(Self::from_key_iv(key, iv))
    }

    /// Set up the cipher from arrays that already have the right lengths.
    pub fn from_key_iv(key: &[u8; KEY_LEN], iv: &[u8; IV_LEN]) -> Self {
        Self {
            core: Core::new(key, iv),
            keystream: Keystream::new(),
        }
    }

    /// Number of 32-bit keystream words generated since warm-up.
    pub fn words_generated(&self) -> u64 {
        self.core.counter
    }
}

impl StreamCipher for Hc256 {
    fn apply_keystream(&mut self, buf: &mut [u8]) {
        let Self { core, keystream } = self;
        keystream.apply(buf, || core.step().to_le_bytes());
    }
}

impl Core {
    fn new(key: &[u8; KEY_LEN], iv: &[u8; IV_LEN]) -> Self {
        let mut w = [0u32; EXPANDED_LEN];

        for (i, chunk) in key.chunks_exact(4).enumerate() {
            w[i] = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        for (i, chunk) in iv.chunks_exact(4).enumerate() {
            w[i + 8] = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }

        for i in 16..EXPANDED_LEN {
            w[i] = f2(w[i - 2])
                .wrapping_add(w[i - 7])
                .wrapping_add(f1(w[i - 15]))
                .wrapping_add(w[i - 16])
                .wrapping_add(i as u32);
        }

        let mut core = Core {
            p: [0u32; TABLE_LEN],
            q: [0u32; TABLE_LEN],
            counter: 0,
        };
        core.p.copy_from_slice(&w[512..1536]);
        core.q.copy_from_slice(&w[1536..EXPANDED_LEN]);

        for _ in 0..WARMUP_STEPS {
            core.step();
        }
        core.counter = 0;

        core
    }

    fn step(&mut self) -> u32 {
        let j = (self.counter as usize) & MASK;

        let word = if self.counter % (2 * TABLE_LEN as u64) < TABLE_LEN as u64 {
            let g = self.g1(self.p[back(j, 3)], self.p[back(j, 1023)]);
            self.p[j] = self.p[j].wrapping_add(self.p[back(j, 10)]).wrapping_add(g);
            self.h1(self.p[back(j, 12)]) ^ self.p[j]
        } else {
            let g = self.g2(self.q[back(j, 3)], self.q[back(j, 1023)]);
            self.q[j] = self.q[j].wrapping_add(self.q[back(j, 10)]).wrapping_add(g);
            self.h2(self.q[back(j, 12)]) ^ self.q[j]
        };

        self.counter = self.counter.wrapping_add(1);
        word
    }

    fn g1(&self, x: u32, y: u32) -> u32 {
        (x.rotate_right(10) ^ y.rotate_right(23)).wrapping_add(self.q[((x ^ y) as usize) & MASK])
    }

    fn g2(&self, x: u32, y: u32) -> u32 {
        (x.rotate_right(10) ^ y.rotate_right(23)).wrapping_add(self.p[((x ^ y) as usize) & MASK])
    }

    fn h1(&self, x: u32) -> u32 {
        sbox(&self.q, x)
    }

    fn h2(&self, x: u32) -> u32 {
        sbox(&self.p, x)
    }
}

/// Sum of four lookups, one per byte of `x`, each into its own quarter.
#[inline(always)]
fn sbox(table: &[u32; TABLE_LEN], x: u32) -> u32 {
    let [b0, b1, b2, b3] = x.to_le_bytes();
    table[b0 as usize]
        .wrapping_add(table[256 + b1 as usize])
        .wrapping_add(table[512 + b2 as usize])
        .wrapping_add(table[768 + b3 as usize])
}

#[inline(always)]
fn back(j: usize, n: usize) -> usize {
    j.wrapping_sub(n) & MASK
}

#[inline(always)]
fn f1(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

#[inline(always)]
fn f2(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_key_zero_iv() {
        let mut cipher = Hc256::new(&[0u8; 32], &[0u8; 32]).unwrap();
        let mut buf = [0u8; 16];
        cipher.apply_keystream(&mut buf);
        assert_eq!(hex::encode(buf), "5b078985d8f6f30d42c5c02fa6b67951");
    }

    #[test]
    fn test_warmup_resets_counter() {
        let cipher = Hc256::new(&[0u8; 32], &[0u8; 32]).unwrap();
        assert_eq!(cipher.words_generated(), 0);
    }

    #[test]
    fn test_sbox_reads_each_quarter() {
        let mut table = [0u32; TABLE_LEN];
        table[0x04] = 1;
        table[256 + 0x03] = 10;
        table[512 + 0x02] = 100;
        table[768 + 0x01] = 1000;
        assert_eq!(sbox(&table, 0x01020304), 1111);
    }

    #[test]
    fn test_rejects_bad_lengths() {
        assert!(matches!(
            Hc256::new(&[0u8; 16], &[0u8; 32]),
            Err(EstreamError::InvalidKeyLength { expected: 32, actual: 16, .. })
        ));
        assert!(matches!(
            Hc256::new(&[0u8; 32], &[0u8; 16]),
            Err(EstreamError::InvalidIvLength { actual: 16, .. })
        ));
    }
}
