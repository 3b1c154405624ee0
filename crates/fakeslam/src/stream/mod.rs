//! Chunked artifact streaming.
//!
//! A map request hands the caller a fresh [`ChunkStream`]: a cursor over an
//! immutable artifact that the caller pulls at its own pace. See
//! [`ChunkStatus`] for the pull protocol.

mod cursor;
mod status;
#[cfg(test)]
mod tests;

pub use cursor::*;
pub use status::*;
