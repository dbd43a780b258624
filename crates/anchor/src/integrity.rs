//! Endpoint integrity classification.

use flink_primitives::{Endpoint, FlatText, LinkFlags, Side, TextEndpoint};

/// Why a text endpoint no longer matches its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakKind {
	/// The stored anchor window does not contain the linked span.
	Structural,
	/// The anchor window content occurs zero or several times in the text.
	NotUnique,
	/// The anchor window content hashes differently (or no hash is stored).
	HashMismatch,
}

/// Result of checking an endpoint against the current document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointStatus {
	/// The fingerprint still matches.
	Intact,
	/// The fingerprint no longer matches.
	Broken(BreakKind),
	/// The linked span extends past the end of the text.
	OutOfBounds,
}

impl EndpointStatus {
	/// Returns true if the endpoint is broken.
	#[inline]
	pub fn is_broken(self) -> bool {
		matches!(self, Self::Broken(_))
	}

	/// Returns true if the endpoint is out of bounds.
	#[inline]
	pub fn is_out_of_bounds(self) -> bool {
		matches!(self, Self::OutOfBounds)
	}

	/// Returns true if the endpoint is intact.
	#[inline]
	pub fn is_intact(self) -> bool {
		matches!(self, Self::Intact)
	}

	/// Returns the link flags describing this status on `side`.
	pub fn flags(self, side: Side) -> LinkFlags {
		match self {
			Self::Intact => LinkFlags::empty(),
			Self::Broken(_) => LinkFlags::broken(side),
			Self::OutOfBounds => LinkFlags::out_of_bounds(side),
		}
	}
}

/// Classifies a text endpoint against `text`.
///
/// Out of bounds takes precedence: a span past the end of the text is never
/// also reported as broken.
pub fn check_text_endpoint(endpoint: &TextEndpoint, text: &FlatText<'_>) -> EndpointStatus {
	if endpoint.span_end() > text.len_chars() {
		return EndpointStatus::OutOfBounds;
	}
	if !endpoint.window_contains_span() {
		return EndpointStatus::Broken(BreakKind::Structural);
	}

	let window = text.slice(endpoint.hash_index, endpoint.hash_length);
	if !text.is_unique(window) {
		return EndpointStatus::Broken(BreakKind::NotUnique);
	}
	match &endpoint.hash {
		Some(hash) if hash.matches(window) => EndpointStatus::Intact,
		_ => EndpointStatus::Broken(BreakKind::HashMismatch),
	}
}

/// Classifies any endpoint against `text`. Points are always intact.
pub fn check_endpoint(endpoint: &Endpoint, text: &FlatText<'_>) -> EndpointStatus {
	match endpoint {
		Endpoint::Text(end) => check_text_endpoint(end, text),
		Endpoint::Point(_) => EndpointStatus::Intact,
	}
}
