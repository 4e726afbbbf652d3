// src/hash.rs

//! SHA-256 helpers for package identities and recipe revisions
//!
//! All hashes are lowercase hex strings. [`Hasher`] is the streaming form
//! used when several labelled fields feed a single digest; the free
//! functions cover the one-shot cases.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Streaming SHA-256 hasher
pub struct Hasher {
    state: Sha256,
}

impl Hasher {
    /// Create an empty hasher
    pub fn new() -> Self {
        Self {
            state: Sha256::new(),
        }
    }

    /// Feed raw bytes
    pub fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    /// Feed a `label:value` line
    ///
    /// Labels keep adjacent fields from running together, so `("ab", "c")`
    /// and `("a", "bc")` never produce the same digest.
    pub fn field(&mut self, label: &str, value: &str) {
        self.state.update(label.as_bytes());
        self.state.update(b":");
        self.state.update(value.as_bytes());
        self.state.update(b"\n");
    }

    /// Finish and return the hex digest
    pub fn finalize(self) -> String {
        hex::encode(self.state.finalize())
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash a byte slice
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Hash everything readable from `reader`
pub fn hash_reader<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut hasher = Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hasher.finalize())
}

/// Hash a file's contents
pub fn hash_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    hash_reader(&mut file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_bytes_known_value() {
        assert_eq!(
            hash_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_field_separation() {
        let mut a = Hasher::new();
        a.field("ab", "c");
        let mut b = Hasher::new();
        b.field("a", "bc");
        assert_ne!(a.finalize(), b.finalize());
    }

    #[test]
    fn test_hash_reader_matches_bytes() {
        let data = vec![7u8; 20_000];
        let mut cursor = io::Cursor::new(data.clone());
        assert_eq!(hash_reader(&mut cursor).unwrap(), hash_bytes(&data));
    }

    #[test]
    fn test_hash_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.hpp");
        std::fs::write(&path, b"#pragma once\n").unwrap();
        assert_eq!(hash_file(&path).unwrap(), hash_bytes(b"#pragma once\n"));
    }
}
