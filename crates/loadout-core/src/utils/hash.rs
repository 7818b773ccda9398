//! Blake3 hashing utilities for snapshot fingerprints.
//!
//! Provides fast hashing so collaborators can tell whether a catalog changed
//! between two resolution calls.

/// Incremental hasher for structured content
///
/// Every field is length-prefixed, so `["ab", "c"]` and `["a", "bc"]` hash
/// differently.
pub struct ContentHasher {
    inner: blake3::Hasher,
}

impl ContentHasher {
    /// Create a new hasher
    pub fn new() -> Self {
        Self {
            inner: blake3::Hasher::new(),
        }
    }

    /// Feed one string field
    pub fn field(&mut self, value: &str) -> &mut Self {
        self.inner.update(&(value.len() as u64).to_le_bytes());
        self.inner.update(value.as_bytes());
        self
    }

    /// Feed a count, typically the length of the list that follows
    pub fn count(&mut self, n: usize) -> &mut Self {
        self.inner.update(&(n as u64).to_le_bytes());
        self
    }

    /// Finish and return the hex digest
    pub fn finish(&self) -> String {
        self.inner.finalize().to_hex().to_string()
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}
