use std::borrow::Cow;
use std::ops::Range;

use memchr::memmem;
use ropey::{Rope, RopeSlice};

/// A position in flattened text, measured in characters (not bytes).
///
/// This is the canonical coordinate space for every endpoint.
pub type CharIdx = usize;

/// A length or count in flattened text, measured in characters (not bytes).
///
/// This is distinct from CharIdx to avoid accidentally passing an index
/// where a length is expected or vice versa.
pub type CharLen = usize;

/// Supplies the flattened, order-stable text content of a document.
///
/// Implemented by whatever owns the rendered document. The returned text is
/// a snapshot: anchoring operations never hold on to it across calls.
pub trait TextSource {
	/// Returns the full flattened text at the moment of the call.
	fn full_text(&self) -> Cow<'_, str>;
}

impl TextSource for str {
	fn full_text(&self) -> Cow<'_, str> {
		Cow::Borrowed(self)
	}
}

impl TextSource for String {
	fn full_text(&self) -> Cow<'_, str> {
		Cow::Borrowed(self.as_str())
	}
}

impl TextSource for Rope {
	fn full_text(&self) -> Cow<'_, str> {
		match self.slice(..).as_str() {
			Some(s) => Cow::Borrowed(s),
			None => Cow::Owned(self.to_string()),
		}
	}
}

impl TextSource for RopeSlice<'_> {
	fn full_text(&self) -> Cow<'_, str> {
		match self.as_str() {
			Some(s) => Cow::Borrowed(s),
			None => Cow::Owned(self.to_string()),
		}
	}
}

impl<T: TextSource + ?Sized> TextSource for &T {
	fn full_text(&self) -> Cow<'_, str> {
		(**self).full_text()
	}
}

/// A char-indexed view over flattened text.
///
/// Precomputes the byte offset of every char so that windows addressed in
/// char coordinates can be sliced in O(1).
#[derive(Debug, Clone)]
pub struct FlatText<'a> {
	text: &'a str,
	/// Byte offset of each char, followed by `text.len()`.
	offsets: Vec<usize>,
}

impl<'a> FlatText<'a> {
	/// Builds the view, indexing every char boundary of `text`.
	pub fn new(text: &'a str) -> Self {
		let mut offsets = Vec::with_capacity(text.len() + 1);
		offsets.extend(text.char_indices().map(|(byte, _)| byte));
		offsets.push(text.len());
		Self { text, offsets }
	}

	/// Returns the underlying text.
	#[inline]
	pub fn as_str(&self) -> &'a str {
		self.text
	}

	/// Returns the text length in characters.
	#[inline]
	pub fn len_chars(&self) -> CharLen {
		self.offsets.len() - 1
	}

	/// Returns true if the text contains no characters.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len_chars() == 0
	}

	/// Returns the character at `idx`, or `None` past the end.
	pub fn char_at(&self, idx: CharIdx) -> Option<char> {
		if idx >= self.len_chars() {
			return None;
		}
		self.text[self.offsets[idx]..].chars().next()
	}

	/// Returns `len` characters starting at `start`.
	///
	/// Both ends are clamped to the text, so an out-of-range request yields
	/// a shorter (possibly empty) slice rather than panicking.
	pub fn slice(&self, start: CharIdx, len: CharLen) -> &'a str {
		self.slice_range(start..start.saturating_add(len))
	}

	/// Returns the characters in `range`, clamped to the text.
	pub fn slice_range(&self, range: Range<CharIdx>) -> &'a str {
		let max = self.len_chars();
		let start = range.start.min(max);
		let end = range.end.clamp(start, max);
		&self.text[self.offsets[start]..self.offsets[end]]
	}

	/// Returns true if `needle` occurs exactly once in the text.
	///
	/// Overlapping occurrences count, and the empty string is never unique.
	pub fn is_unique(&self, needle: &str) -> bool {
		if needle.is_empty() {
			return false;
		}
		let haystack = self.text.as_bytes();
		match memmem::find(haystack, needle.as_bytes()) {
			Some(first) => memmem::rfind(haystack, needle.as_bytes()) == Some(first),
			None => false,
		}
	}

	/// Returns true if the window `[start, start + len)` is unique in the text.
	#[inline]
	pub fn is_window_unique(&self, start: CharIdx, len: CharLen) -> bool {
		self.is_unique(self.slice(start, len))
	}
}
