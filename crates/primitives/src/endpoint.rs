use crate::hash::ContentHash;
use crate::text::{CharIdx, CharLen};

/// One terminus of a floating link.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
	/// A span of flattened document text, anchored by a content fingerprint.
	Text(TextEndpoint),
	/// A location in a 2D content space.
	Point(PointEndpoint),
}

impl Endpoint {
	/// Returns the text endpoint, if this is one.
	pub fn as_text(&self) -> Option<&TextEndpoint> {
		match self {
			Self::Text(text) => Some(text),
			Self::Point(_) => None,
		}
	}

	/// Returns the text endpoint mutably, if this is one.
	pub fn as_text_mut(&mut self) -> Option<&mut TextEndpoint> {
		match self {
			Self::Text(text) => Some(text),
			Self::Point(_) => None,
		}
	}

	/// Returns the point endpoint, if this is one.
	pub fn as_point(&self) -> Option<&PointEndpoint> {
		match self {
			Self::Point(point) => Some(point),
			Self::Text(_) => None,
		}
	}

	/// Returns true for text endpoints.
	#[inline]
	pub fn is_text(&self) -> bool {
		matches!(self, Self::Text(_))
	}

	/// Returns the anchor hash. Points never carry one.
	pub fn hash(&self) -> Option<&ContentHash> {
		self.as_text().and_then(|text| text.hash.as_ref())
	}

	/// Returns `(index, hash_index)` for text endpoints.
	///
	/// Two endpoints with the same hash and the same position pair are
	/// considered unmodified relative to each other.
	pub fn position(&self) -> Option<(CharIdx, CharIdx)> {
		self.as_text().map(|text| (text.index, text.hash_index))
	}
}

impl From<TextEndpoint> for Endpoint {
	fn from(text: TextEndpoint) -> Self {
		Self::Text(text)
	}
}

impl From<PointEndpoint> for Endpoint {
	fn from(point: PointEndpoint) -> Self {
		Self::Point(point)
	}
}

/// A linked text span plus the fingerprint of the anchor window around it.
///
/// The anchor window `[hash_index, hash_index + hash_length)` always contains
/// the linked span `[index, index + length)` when the endpoint is well formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEndpoint {
	/// Start of the linked span.
	pub index: CharIdx,
	/// Length of the linked span.
	pub length: CharLen,
	/// Start of the anchor window.
	pub hash_index: CharIdx,
	/// Length of the anchor window.
	pub hash_length: CharLen,
	/// Short hash of the anchor window content.
	pub hash: Option<ContentHash>,
	/// First character of the anchor window.
	pub left_char: Option<char>,
	/// Last character of the anchor window.
	pub right_char: Option<char>,
}

impl TextEndpoint {
	/// Creates an endpoint whose anchor window is the span itself and which
	/// carries no fingerprint yet.
	pub fn unanchored(index: CharIdx, length: CharLen) -> Self {
		Self {
			index,
			length,
			hash_index: index,
			hash_length: length,
			hash: None,
			left_char: None,
			right_char: None,
		}
	}

	/// Returns the exclusive end of the linked span.
	#[inline]
	pub fn span_end(&self) -> CharIdx {
		self.index.saturating_add(self.length)
	}

	/// Returns the exclusive end of the anchor window.
	#[inline]
	pub fn window_end(&self) -> CharIdx {
		self.hash_index.saturating_add(self.hash_length)
	}

	/// Returns true if the anchor window contains the linked span.
	pub fn window_contains_span(&self) -> bool {
		self.hash_index <= self.index && self.window_end() >= self.span_end()
	}

	/// Returns both boundary characters when both are known.
	pub fn boundary(&self) -> Option<(char, char)> {
		Some((self.left_char?, self.right_char?))
	}

	/// Returns true if a hash and both boundary characters are present.
	pub fn is_anchored(&self) -> bool {
		self.hash.is_some() && self.boundary().is_some()
	}
}

/// A circular location in a 2D content space.
///
/// Points have no anchoring semantics and are always considered valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointEndpoint {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate.
	pub y: f64,
	/// Radius of the picked area.
	pub radius: f64,
}

impl PointEndpoint {
	/// Creates a point endpoint.
	pub fn new(x: f64, y: f64, radius: f64) -> Self {
		Self { x, y, radius }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_unanchored_window_is_span() {
		let end = TextEndpoint::unanchored(4, 5);
		assert_eq!(end.hash_index, 4);
		assert_eq!(end.hash_length, 5);
		assert!(end.window_contains_span());
		assert!(!end.is_anchored());
	}

	#[test]
	fn test_window_containment() {
		let mut end = TextEndpoint::unanchored(10, 3);
		end.hash_index = 8;
		end.hash_length = 4;
		assert!(!end.window_contains_span());
		end.hash_length = 5;
		assert!(end.window_contains_span());
		end.hash_index = 11;
		assert!(!end.window_contains_span());
	}

	#[test]
	fn test_endpoint_accessors() {
		let text = Endpoint::from(TextEndpoint::unanchored(1, 2));
		let point = Endpoint::from(PointEndpoint::new(1.0, 2.0, 3.0));
		assert!(text.is_text());
		assert_eq!(text.position(), Some((1, 1)));
		assert_eq!(point.position(), None);
		assert_eq!(point.hash(), None);
		assert_eq!(point.as_point().map(|p| p.radius), Some(3.0));
	}
}
