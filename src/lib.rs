//! estream - HC-128, HC-256 and Rabbit stream ciphers
//!
//! Three independent keystream generators behind one [`StreamCipher`] trait.
//! Each engine is built from a key and IV, rejects any other lengths at
//! construction, and then XORs its keystream into buffers of any length.
//!
//! | Engine | Key | IV |
//! |---|---|---|
//! | [`Hc128`] | 16 bytes | 16 bytes |
//! | [`Hc256`] | 32 bytes | 32 bytes |
//! | [`Rabbit`] | 16 bytes | 8 bytes or none |
//!
//! Output depends only on how many bytes have been consumed, never on how the
//! input was split across calls. These are bare stream ciphers: no
//! authentication, no nonce tracking, no constant-time guarantees.
//!
//! ## Example
//!
//! ```
//! use estream::{Rabbit, StreamCipher};
//!
//! let key = [0x2a; 16];
//! let iv = [0x07; 8];
//!
//! let mut message = *b"attack at dawn";
//! Rabbit::new(&key, &iv).unwrap().apply_keystream(&mut message);
//! assert_ne!(&message, b"attack at dawn");
//!
//! Rabbit::new(&key, &iv).unwrap().apply_keystream(&mut message);
//! assert_eq!(&message, b"attack at dawn");
//! ```
//!
//! Engine-agnostic callers go through [`Algorithm`]:
//!
//! ```
//! use estream::Algorithm;
//!
//! let algorithm: Algorithm = "hc256".parse().unwrap();
//! let mut cipher = algorithm.new_cipher(&[0u8; 32], &[0u8; 32]).unwrap();
//! let mut buf = [0u8; 4];
//! cipher.apply_keystream(&mut buf);
//! assert_eq!(buf, [0x5b, 0x07, 0x89, 0x85]);
//! ```

pub mod algorithm;
pub mod cli;
pub mod error;
pub mod hc128;
pub mod hc256;
pub mod rabbit;
pub mod stream;

pub use algorithm::Algorithm;
pub use error::{EstreamError, Result};
pub use hc128::Hc128;
pub use hc256::Hc256;
pub use rabbit::Rabbit;
pub use stream::StreamCipher;
