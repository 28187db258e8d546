//! Streaming SHA-1.
//!
//! A [`Sha1`] context accepts input in pieces of any size and produces a
//! [`Digest`] once the message is complete. Helpers in [`util::io`] drive a
//! context from blocking or async readers.

mod digest;
mod sha1;
pub mod util;

pub use digest::{Digest, DigestError, DIGEST_SIZE};
pub use sha1::{compress, Sha1, BLOCK_SIZE};
pub use util::io::{digest_file, digest_reader, HashError, DEFAULT_CHUNK_SIZE};
