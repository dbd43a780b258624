//! Anchor window derivation.
//!
//! Most spans in prose are already unique once widened to the minimum window
//! length, so the common path is a single uniqueness probe. Repeated phrases
//! fall back to a binary search over extra context: first to the left, then,
//! if even the whole prefix is ambiguous, to the right.
//!
//! The search assumes that adding context never makes a unique window
//! ambiguous again. Adversarial repeated-pattern text can violate that, in
//! which case the returned window may not be unique.

use flink_primitives::{CharIdx, CharLen, ContentHash, Endpoint, FlatText, TextEndpoint};
use tracing::{debug, trace};

use crate::error::{AnchorError, Result};
use crate::options::AnchorOptions;


/// Anchor window bounds plus the data needed to re-find it later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
	/// Start of the anchor window.
	pub window_start: CharIdx,
	/// Length of the anchor window.
	pub window_len: CharLen,
	/// Short hash of the window content.
	pub hash: ContentHash,
	/// First character of the window.
	pub left_char: Option<char>,
	/// Last character of the window.
	pub right_char: Option<char>,
}

impl Fingerprint {
	/// Returns the exclusive end of the window.
	#[inline]
	pub fn window_end(&self) -> CharIdx {
		self.window_start + self.window_len
	}

	/// Writes the window fields into `endpoint`, keeping its span.
	pub fn apply_to(self, endpoint: &mut TextEndpoint) {
		endpoint.hash_index = self.window_start;
		endpoint.hash_length = self.window_len;
		endpoint.hash = Some(self.hash);
		endpoint.left_char = self.left_char;
		endpoint.right_char = self.right_char;
	}

	fn stamp(text: &FlatText<'_>, start: CharIdx, end: CharIdx, options: &AnchorOptions) -> Self {
		Self {
			window_start: start,
			window_len: end - start,
			hash: ContentHash::with_len(text.slice_range(start..end), options.hash_len),
			left_char: text.char_at(start),
			right_char: end.checked_sub(1).filter(|&last| last >= start).and_then(|last| text.char_at(last)),
		}
	}
}

/// Computes the anchor window for the span `[span_start, span_start + span_len)`.
///
/// The window contains the span and, except for adversarial inputs, occurs
/// exactly once in `text`.
pub fn fingerprint(
	text: &FlatText<'_>,
	span_start: CharIdx,
	span_len: CharLen,
	options: &AnchorOptions,
) -> Result<Fingerprint> {
	let text_len = text.len_chars();
	let span_end = span_start
		.checked_add(span_len)
		.filter(|&end| end <= text_len)
		.ok_or(AnchorError::SpanOutOfBounds {
			start: span_start,
			len: span_len,
			text_len,
		})?;

	if text.is_empty() {
		return Ok(Fingerprint::stamp(text, 0, 0, options));
	}

	let (start, end) = initial_window(span_start, span_end, text_len, options.min_window_len);
	if text.is_unique(text.slice_range(start..end)) {
		return Ok(Fingerprint::stamp(text, start, end, options));
	}

	let (grown_start, grown_end) = grow_window(text, start, end);
	debug!(
		span_start,
		span_len,
		window_start = grown_start,
		window_len = grown_end - grown_start,
		"anchor window grown for uniqueness"
	);
	Ok(Fingerprint::stamp(text, grown_start, grown_end, options))
}

/// Widens a short span to the minimum window length.
///
/// Context is taken from before the span first; when the text start is
/// reached the window is anchored at 0 and extends forward instead. The
/// window is never empty for non-empty text.
fn initial_window(span_start: CharIdx, span_end: CharIdx, text_len: CharLen, min_len: usize) -> (CharIdx, CharIdx) {
	let min_len = min_len.max(1).min(text_len);
	let span_len = span_end - span_start;
	if span_len >= min_len {
		return (span_start, span_end);
	}

	let missing = min_len - span_len;
	if missing <= span_start {
		(span_start - missing, span_end)
	} else {
		(0, min_len)
	}
}

/// Grows a non-unique, non-empty window `[start, end)` until it is unique.
fn grow_window(text: &FlatText<'_>, start: CharIdx, end: CharIdx) -> (CharIdx, CharIdx) {
	if start > 0 && text.is_unique(text.slice_range(0..end)) {
		// `low` is always a unique start, `high` never is.
		let (mut low, mut high) = (0, start);
		while high - low > 1 {
			let mid = low + (high - low) / 2;
			let unique = text.is_unique(text.slice_range(mid..end));
			trace!(mid, unique, "left context probe");
			if unique {
				low = mid;
			} else {
				high = mid;
			}
		}
		return (low, end);
	}

	// `low` is always an ambiguous last char, `high` is assumed unique.
	let (mut low, mut high) = (end - 1, text.len_chars() - 1);
	while high.saturating_sub(low) > 1 {
		let mid = low + (high - low) / 2;
		let unique = text.is_unique(text.slice_range(start..mid + 1));
		trace!(mid, unique, "right context probe");
		if unique {
			high = mid;
		} else {
			low = mid;
		}
	}
	(start, high + 1)
}

/// Creates a fingerprinted text endpoint for the span `[index, index + length)`.
pub fn anchor_text_endpoint(
	text: &FlatText<'_>,
	index: CharIdx,
	length: CharLen,
	options: &AnchorOptions,
) -> Result<TextEndpoint> {
	let mut endpoint = TextEndpoint::unanchored(index, length);
	fingerprint(text, index, length, options)?.apply_to(&mut endpoint);
	Ok(endpoint)
}

/// Fingerprints `endpoint` in place against `text`. Points are left as is.
pub fn stamp_endpoint(endpoint: &mut Endpoint, text: &FlatText<'_>, options: &AnchorOptions) -> Result<()> {
	if let Endpoint::Text(end) = endpoint {
		fingerprint(text, end.index, end.length, options)?.apply_to(end);
	}
	Ok(())
}
