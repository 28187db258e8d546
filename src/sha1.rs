mod compress;

use std::io;

use crate::digest::{Digest, DIGEST_SIZE};
use crate::util::be_bytes;

pub use compress::compress;

pub const BLOCK_SIZE: usize = 64;

// Offset of the 64 bit message length inside the final block.
const LENGTH_OFFSET: usize = BLOCK_SIZE - 8;

const H0: u32 = 0x67452301;
const H1: u32 = 0xEFCDAB89;
const H2: u32 = 0x98BADCFE;
const H3: u32 = 0x10325476;
const H4: u32 = 0xC3D2E1F0;

pub(crate) const IV: [u32; 5] = [H0, H1, H2, H3, H4];

/// State of a single in-flight SHA-1 computation.
///
/// Data is pushed with [`Sha1::update`] in chunks of any size and the digest
/// is produced by [`Sha1::finalize`], which consumes the context. Contexts
/// share nothing, so independent digests can be computed on as many threads
/// as needed, each with its own `Sha1`. Cloning forks the computation, which
/// is handy when several messages share a prefix.
///
/// ```
/// use sha1stream::Sha1;
///
/// let mut hasher = Sha1::new();
/// hasher.update(b"ab");
/// hasher.update(b"c");
/// assert_eq!(hasher.finalize().to_string(), "a9993e364706816aba3e25717850c26c9cd0d89d");
/// ```
#[derive(Debug, Clone)]
pub struct Sha1 {
    state: [u32; 5],
    pending: [u8; BLOCK_SIZE],
    pending_len: usize,
    // bits of every block already folded into `state`, modulo 2^64
    total_bits: u64,
    blocks: u64,
}

impl Default for Sha1 {
    fn default() -> Self {
        Self::new()
    }
}

impl Sha1 {
    pub fn new() -> Self {
        Sha1 {
            state: IV,
            pending: [0; BLOCK_SIZE],
            pending_len: 0,
            total_bits: 0,
            blocks: 0,
        }
    }

    pub fn digest<D: AsRef<[u8]>>(data: D) -> Digest {
        let mut hasher = Self::new();
        hasher.update(data);
        hasher.finalize()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn update<D: AsRef<[u8]>>(&mut self, data: D) {
        let mut data = data.as_ref();

        while !data.is_empty() {
            let take = (BLOCK_SIZE - self.pending_len).min(data.len());
            self.pending[self.pending_len..self.pending_len + take].copy_from_slice(&data[..take]);
            self.pending_len += take;
            data = &data[take..];

            if self.pending_len == BLOCK_SIZE {
                self.compress_pending();
                self.total_bits = self.total_bits.wrapping_add(BLOCK_SIZE as u64 * 8);
                self.pending_len = 0;
            }
        }
    }

    /// Pads the message, appends its bit length and returns the digest.
    pub fn finalize(mut self) -> Digest {
        self.finish()
    }

    pub fn bytes_processed(&self) -> u64 {
        self.total_bits / 8 + self.pending_len as u64
    }

    // compressions run so far, padding blocks included
    pub fn blocks_compressed(&self) -> u64 {
        self.blocks
    }

    fn compress_pending(&mut self) {
        self.state = compress(self.state, &self.pending);
        self.blocks += 1;
    }

    fn finish(&mut self) -> Digest {
        let buffered = self.pending_len;
        let mut i = buffered;

        self.pending[i] = 0x80;
        i += 1;

        if i <= LENGTH_OFFSET {
            self.pending[i..LENGTH_OFFSET].fill(0);
        } else {
            // no room left for the length, it goes into a block of its own
            self.pending[i..].fill(0);
            self.compress_pending();
            self.pending[..LENGTH_OFFSET].fill(0);
        }

        self.total_bits = self.total_bits.wrapping_add(buffered as u64 * 8);
        self.pending[LENGTH_OFFSET..].copy_from_slice(&self.total_bits.to_be_bytes());
        self.compress_pending();

        Digest::from(be_bytes::<5, DIGEST_SIZE>(self.state))
    }
}

impl io::Write for Sha1 {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
