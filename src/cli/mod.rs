pub mod bench;
pub mod keygen;
pub mod keystream;
pub mod stats;
pub mod xor;

pub use bench::*;
pub use keygen::*;
pub use keystream::*;
pub use stats::*;
pub use xor::*;
