use std::fmt;

use sha2::{Digest, Sha256};

/// Number of hex digits kept from the SHA-256 digest.
pub const SHORT_HASH_LEN: usize = 6;

/// A short content hash: a prefix of the lowercase hex SHA-256 digest of the
/// UTF-8 bytes of some text.
///
/// Used both for anchor windows and for whole-document hashes. Stored hashes
/// are opaque strings; comparisons recompute with the stored length so that
/// a hash written with a different prefix length still verifies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash(String);

impl ContentHash {
	/// Hashes `content` with the default prefix length.
	pub fn of(content: &str) -> Self {
		Self::with_len(content, SHORT_HASH_LEN)
	}

	/// Hashes `content`, keeping `len` hex digits (at most 64).
	pub fn with_len(content: &str, len: usize) -> Self {
		let mut hex = format!("{:x}", Sha256::digest(content.as_bytes()));
		hex.truncate(len);
		Self(hex)
	}

	/// Wraps a previously stored hash string without validation.
	pub fn from_stored(stored: impl Into<String>) -> Self {
		Self(stored.into())
	}

	/// Returns true if `content` hashes to this value at this value's length.
	pub fn matches(&self, content: &str) -> bool {
		!self.0.is_empty() && Self::with_len(content, self.0.len()) == *self
	}

	/// Returns the hash as a string slice.
	#[inline]
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns the number of hex digits.
	#[inline]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if the stored hash is empty.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Display for ContentHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ContentHash {
	fn from(stored: &str) -> Self {
		Self::from_stored(stored)
	}
}
