//! The keystream contract shared by every engine.

/// A stateful keystream generator consumed by byte-wise XOR.
///
/// Every call continues from wherever the previous one stopped, so the output
/// depends only on the total number of bytes consumed and never on how the
/// input was split across calls. Instances carry no internal locking; callers
/// sharing one across threads must serialize access themselves.
pub trait StreamCipher {
    /// XOR the next `buf.len()` keystream bytes into `buf` in place.
    fn apply_keystream(&mut self, buf: &mut [u8]);

    /// Write `src ^ keystream` into `dst`.
    ///
    /// # Panics
    ///
    /// Panics if `dst` and `src` differ in length.
    fn xor_keystream(&mut self, dst: &mut [u8], src: &[u8]) {
        assert_eq!(
            dst.len(),
            src.len(),
            "xor_keystream: dst and src must have equal length"
        );
        dst.copy_from_slice(src);
        self.apply_keystream(dst);
    }
}

impl<C: StreamCipher + ?Sized> StreamCipher for Box<C> {
    fn apply_keystream(&mut self, buf: &mut [u8]) {
        (**self).apply_keystream(buf);
    }
}

/// Unconsumed bytes of the most recently generated keystream block.
///
/// Bytes are handed out front to back. A new block is requested from the
/// engine only when the current one is exhausted and another byte is needed.
#[derive(Clone)]
pub(crate) struct Keystream<const N: usize> {
    block: [u8; N],
    pos: usize,
}

impl<const N: usize> Keystream<N> {
    pub(crate) const fn new() -> Self {
        Self {
            block: [0u8; N],
            pos: N,
        }
    }

    /// Number of keystream bytes generated but not yet consumed.
    pub(crate) fn pending(&self) -> usize {
        N - self.pos
    }

    /// Drop any pending bytes.
    pub(crate) fn clear(&mut self) {
        self.block = [0u8; N];
        self.pos = N;
    }

    /// XOR keystream into `buf`, calling `refill` for each fresh block.
    pub(crate) fn apply(&mut self, buf: &mut [u8], mut refill: impl FnMut() -> [u8; N]) {
        for byte in buf.iter_mut() {
            if self.pos == N {
                self.block = refill();
                self.pos = 0;
            }
            *byte ^= self.block[self.pos];
            self.pos += 1;
        }
    }
}
