//! The HC-128 stream cipher.
//!
//! Two 512-word tables, P and Q, are updated in turns of 512 steps. Each step
//! mutates one table entry and emits one 32-bit keystream word, using the
//! other table as an S-box.
//!
//! Reference: Hongjun Wu, "The Stream Cipher HC-128", eSTREAM finalists,
//! LNCS 4986, 2008.

use crate::error::{EstreamError, Result};
use crate::stream::{Keystream, StreamCipher};
use std::fmt;

/// Key length in bytes.
pub const KEY_LEN: usize = 16;
/// IV length in bytes.
pub const IV_LEN: usize = 16;

const TABLE_LEN: usize = 512;
const MASK: usize = TABLE_LEN - 1;
const EXPANDED_LEN: usize = 1280;

/// HC-128 keystream generator.
///
/// ```
/// use estream::{Hc128, StreamCipher};
///
/// let mut cipher = Hc128::new(&[0u8; 16], &[0u8; 16]).unwrap();
/// let mut buf = [0u8; 4];
/// cipher.apply_keystream(&mut buf);
/// assert_eq!(buf, [0x82, 0x00, 0x15, 0x73]);
/// ```
#[derive(Clone)]
pub struct Hc128 {
    core: Core,
    keystream: Keystream<4>,
}

#[derive(Clone)]
struct Core {
    p: [u32; TABLE_LEN],
    q: [u32; TABLE_LEN],
    counter: u64,
}

// Does not expose the tables
impl fmt::Debug for Hc128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hc128")
            .field("counter", &self.core.counter)
            .field("pending", &self.keystream.pending())
            .finish_non_exhaustive()
    }
}

impl Hc128 {
    /// Set up the cipher from a 16-byte key and a 16-byte IV.
    pub fn new(key: &[u8], iv: &[u8]) -> Result<Self> {
        let key: &[u8; KEY_LEN] = key.try_into().map_err(|_| EstreamError::InvalidKeyLength {
            algorithm: "hc128",
            expected: KEY_LEN,
            actual: key.len(),
        })?;
        let iv: &[u8; IV_LEN] = iv.try_into().map_err(|_| EstreamError::InvalidIvLength {
            algorithm: "hc128",
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

    /// Number of 32-bit keystream words generated so far.
    pub fn words_generated(&self) -> u64 {
        self.core.counter
    }
}

impl StreamCipher for Hc128 {
    fn apply_keystream(&mut self, buf: &mut [u8]) {
        let Self { core, keystream } = self;
        keystream.apply(buf, || core.step().to_le_bytes());
    }
}

impl Core {
    fn new(key: &[u8; KEY_LEN], iv: &[u8; IV_LEN]) -> Self {
        let mut w = [0u32; EXPANDED_LEN];

        // 128-bit key and IV are each read twice to fill eight words
        for i in 0..8 {
            w[i] = read_word(key, (i * 4) % KEY_LEN);
            w[i + 8] = read_word(iv, (i * 4) % IV_LEN);
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
        core.p.copy_from_slice(&w[256..768]);
        core.q.copy_from_slice(&w[768..EXPANDED_LEN]);

        // Each table is passed through its feedback function once, with the
        // output folded back in.
        for j in 0..TABLE_LEN {
            let h = core.h1(core.p[back(j, 12)]);
            let g = g1(core.p[back(j, 3)], core.p[back(j, 10)], core.p[back(j, 511)]);
            core.p[j] = core.p[j].wrapping_add(g) ^ h;
        }
        for j in 0..TABLE_LEN {
            let h = core.h2(core.q[back(j, 12)]);
            let g = g2(core.q[back(j, 3)], core.q[back(j, 10)], core.q[back(j, 511)]);
            core.q[j] = core.q[j].wrapping_add(g) ^ h;
        }

        core
    }

    /// Generate one keystream word.
    fn step(&mut self) -> u32 {
        let j = (self.counter as usize) & MASK;

        let word = if self.counter % (2 * TABLE_LEN as u64) < TABLE_LEN as u64 {
            let g = g1(self.p[back(j, 3)], self.p[back(j, 10)], self.p[back(j, 511)]);
            self.p[j] = self.p[j].wrapping_add(g);
            self.h1(self.p[back(j, 12)]) ^ self.p[j]
        } else {
            let g = g2(self.q[back(j, 3)], self.q[back(j, 10)], self.q[back(j, 511)]);
            self.q[j] = self.q[j].wrapping_add(g);
            self.h2(self.q[back(j, 12)]) ^ self.q[j]
        };

        self.counter = self.counter.wrapping_add(1);
        word
    }

    fn h1(&self, x: u32) -> u32 {
        self.q[(x & 0xff) as usize].wrapping_add(self.q[256 + ((x >> 16) & 0xff) as usize])
    }

    fn h2(&self, x: u32) -> u32 {
        self.p[(x & 0xff) as usize].wrapping_add(self.p[256 + ((x >> 16) & 0xff) as usize])
    }
}

/// Table index `n` positions behind `j`, modulo the table length.
#[inline(always)]
fn back(j: usize, n: usize) -> usize {
    j.wrapping_sub(n) & MASK
}

#[inline(always)]
fn read_word(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

#[inline(always)]
fn f1(x: u32) -> u32 {
    x.rotate_right(7) ^ x.rotate_right(18) ^ (x >> 3)
}

#[inline(always)]
fn f2(x: u32) -> u32 {
    x.rotate_right(17) ^ x.rotate_right(19) ^ (x >> 10)
}

// The xor of the outer two rotations is added to the middle one.
#[inline(always)]
fn g1(x: u32, y: u32, z: u32) -> u32 {
    (x.rotate_right(10) ^ z.rotate_right(23)).wrapping_add(y.rotate_right(8))
}

#[inline(always)]
fn g2(x: u32, y: u32, z: u32) -> u32 {
    (x.rotate_left(10) ^ z.rotate_left(23)).wrapping_add(y.rotate_left(8))
}
