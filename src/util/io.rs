use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, instrument};

use crate::digest::Digest;
use crate::sha1::Sha1;

pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

type Result<T> = std::result::Result<T, HashError>;

fn buffer(chunk_size: usize) -> Vec<u8> {
    let size = if chunk_size == 0 { DEFAULT_CHUNK_SIZE } else { chunk_size };
    vec![0; size]
}

/// Returns the digest of everything left in `reader` and the number of bytes read.
pub fn digest_reader<R: Read>(mut reader: R, chunk_size: usize) -> io::Result<(Digest, u64)> {
    let mut buf = buffer(chunk_size);
    let mut hasher = Sha1::new();

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }

    let bytes = hasher.bytes_processed();
    debug!(bytes, "reader exhausted");
    Ok((hasher.finalize(), bytes))
}

#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn digest_file<P: AsRef<Path>>(path: P, chunk_size: usize) -> Result<(Digest, u64)> {
    let path = path.as_ref();
    let io_error = |source| HashError::Io { path: path.to_path_buf(), source };

    let file = File::open(path).map_err(io_error)?;
    let (digest, bytes) = digest_reader(file, chunk_size).map_err(io_error)?;
    debug!(%digest, bytes, "file hashed");
    Ok((digest, bytes))
}

pub async fn digest_async_reader<R, F>(mut reader: R, chunk_size: usize, mut on_chunk: F) -> io::Result<(Digest, u64)>
where
    R: AsyncRead + Unpin,
    F: FnMut(usize),
{
    let mut buf = buffer(chunk_size);
    let mut hasher = Sha1::new();

    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
        on_chunk(n);
    }

    let bytes = hasher.bytes_processed();
    debug!(bytes, "async reader exhausted");
    Ok((hasher.finalize(), bytes))
}

#[instrument(skip_all, fields(path = %path.display()))]
pub async fn digest_file_async<F: FnMut(usize)>(path: &Path, chunk_size: usize, on_chunk: F) -> Result<(Digest, u64)> {
    let io_error = |source| HashError::Io { path: path.to_path_buf(), source };

    let file = tokio::fs::File::open(path).await.map_err(io_error)?;
    let (digest, bytes) = digest_async_reader(file, chunk_size, on_chunk).await.map_err(io_error)?;
    debug!(%digest, bytes, "file hashed");
    Ok((digest, bytes))
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use tempfile::NamedTempFile;

    use super::*;

    fn message() -> Vec<u8> {
        (0..1000u32).map(|i| (i % 253) as u8).collect()
    }

    #[test]
    fn reader_matches_single_shot_for_any_chunk_size() {
        let data = message();
        let expected = Sha1::digest(&data);
        for chunk_size in [0, 1, 7, 63, 64, 65, 4096] {
            let (digest, bytes) = digest_reader(Cursor::new(&data), chunk_size).unwrap();
            assert_eq!(digest, expected, "chunk size {chunk_size}");
            assert_eq!(bytes, data.len() as u64);
        }
    }

    #[test]
    fn empty_reader() {
        let (digest, bytes) = digest_reader(io::empty(), 16).unwrap();
        assert_eq!(digest.to_string(), "da39a3ee5e6b4b0d3255bfef95601890afd80709");
        assert_eq!(bytes, 0);
    }

    #[test]
    fn file_is_hashed() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();
        file.flush().unwrap();

        let (digest, bytes) = digest_file(file.path(), 2).unwrap();
        assert_eq!(digest.to_string(), "a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(bytes, 3);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.bin");
        match digest_file(&path, 16) {
            Err(HashError::Io { path: reported, source }) => {
                assert_eq!(reported, path);
                assert_eq!(source.kind(), ErrorKind::NotFound);
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn async_reader_reports_chunks() {
        let data = message();
        let mut chunks = Vec::new();
        let (digest, bytes) = digest_async_reader(&data[..], 300, |n| chunks.push(n)).await.unwrap();
        assert_eq!(digest, Sha1::digest(&data));
        assert_eq!(bytes, 1000);
        assert_eq!(chunks.iter().sum::<usize>(), 1000);
        assert!(chunks.iter().all(|&n| n <= 300));
    }

    #[tokio::test]
    async fn async_file_matches_blocking() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&message()).unwrap();
        file.flush().unwrap();

        let blocking = digest_file(file.path(), 128).unwrap();
        let async_result = digest_file_async(file.path(), 128, |_| {}).await.unwrap();
        assert_eq!(blocking, async_result);
    }
}
