//! # Hasher Module
//!
//! Computes a stable content identity for a file.
//!
//! The identity is a SHA-256 digest over the full byte stream, read in
//! fixed-size chunks so memory stays bounded for large videos. Two files
//! with identical bytes always produce equal identities, regardless of the
//! buffer size used to read them.

use crate::error::HashError;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default read buffer, matching the configuration default (2 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 2048;

/// Opaque content identity derived from a file's full byte stream.
///
/// Equality of identities is the sole determinant of "is this file a
/// duplicate" - names and locations never enter into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentId([u8; 32]);

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Hash a file's entire content in `buffer_size`-byte reads.
///
/// Open and read failures carry the path; the caller treats them as fatal
/// for the run.
pub fn hash_file(path: &Path, buffer_size: usize) -> Result<ContentId, HashError> {
    debug_assert!(buffer_size > 0, "buffer size validated at configuration");

    let mut file = File::open(path).map_err(|e| HashError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; buffer_size];

    loop {
        let n = file.read(&mut buf).map_err(|e| HashError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(ContentId(hasher.finalize().into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    #[test]
    fn identical_content_yields_equal_identities() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.jpg", b"same bytes");
        let b = write_file(&dir, "b.jpg", b"same bytes");

        assert_eq!(
            hash_file(&a, DEFAULT_BUFFER_SIZE).unwrap(),
            hash_file(&b, DEFAULT_BUFFER_SIZE).unwrap()
        );
    }

    #[test]
    fn different_content_yields_different_identities() {
        let dir = TempDir::new().unwrap();
        let a = write_file(&dir, "a.jpg", b"one");
        let b = write_file(&dir, "b.jpg", b"two");

        assert_ne!(
            hash_file(&a, DEFAULT_BUFFER_SIZE).unwrap(),
            hash_file(&b, DEFAULT_BUFFER_SIZE).unwrap()
        );
    }

    #[test]
    fn identity_is_independent_of_buffer_size() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "big.mp4", &[0xAB; 10_000]);

        let tiny = hash_file(&path, 1).unwrap();
        let small = hash_file(&path, 7).unwrap();
        let large = hash_file(&path, 1 << 20).unwrap();

        assert_eq!(tiny, small);
        assert_eq!(small, large);
    }

    #[test]
    fn identity_matches_known_sha256_vector() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "abc.bin", b"abc");

        let id = hash_file(&path, DEFAULT_BUFFER_SIZE).unwrap();
        assert_eq!(
            id.to_string(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let result = hash_file(Path::new("/nonexistent/file.jpg"), DEFAULT_BUFFER_SIZE);
        assert!(matches!(result, Err(HashError::Open { .. })));
    }
}
