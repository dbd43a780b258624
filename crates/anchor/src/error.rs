//! Error types for anchoring operations.

use flink_primitives::{CharIdx, CharLen};
use thiserror::Error;

/// Errors that can occur while fingerprinting a span.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnchorError {
	/// The span does not fit inside the text it should be anchored in.
	#[error("span {start}+{len} exceeds text length {text_len}")]
	SpanOutOfBounds {
		/// Requested span start.
		start: CharIdx,
		/// Requested span length.
		len: CharLen,
		/// Length of the text in chars.
		text_len: CharLen,
	},
}

/// Result type for anchoring operations.
pub type Result<T> = std::result::Result<T, AnchorError>;
