use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::util;

/// Length in bytes of a SHA-1 digest.
pub const DIGEST_SIZE: usize = 20;

/// A finished 160 bit SHA-1 digest.
///
/// Displays as 40 lower-case hex digits and parses back from hex of either case.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; DIGEST_SIZE]);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DigestError {
    #[error("hex digest must be {expected} characters long but is {0}", expected = DIGEST_SIZE * 2)]
    InvalidLength(usize),
    #[error("byte {byte:#04x} at position {pos} is not a hex digit")]
    InvalidCharacter { pos: usize, byte: u8 },
}

impl Digest {
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    pub fn into_bytes(self) -> [u8; DIGEST_SIZE] {
        self.0
    }
}

impl From<[u8; DIGEST_SIZE]> for Digest {
    fn from(bytes: [u8; DIGEST_SIZE]) -> Self {
        Digest(bytes)
    }
}

impl From<Digest> for [u8; DIGEST_SIZE] {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn nibble(byte: u8, pos: usize) -> Result<u8, DigestError> {
    (byte as char)
        .to_digit(16)
        .map(|d| d as u8)
        .ok_or(DigestError::InvalidCharacter { pos, byte })
}

impl FromStr for Digest {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, DigestError> {
        let hex = s.as_bytes();
        if hex.len() != DIGEST_SIZE * 2 {
            return Err(DigestError::InvalidLength(hex.len()));
        }
        let mut bytes = [0u8; DIGEST_SIZE];
        for (i, pair) in hex.chunks_exact(2).enumerate() {
            bytes[i] = nibble(pair[0], i*2)? << 4 | nibble(pair[1], i*2 + 1)?;
        }
        Ok(Digest(bytes))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(&util::to_string(&self.0))
    }
}

impl fmt::LowerHex for Digest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::UpperHex for Digest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(&util::to_string(&self.0).to_uppercase())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Digest({})", self)
    }
}
