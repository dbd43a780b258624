//! Error types for link encodings.

use quick_xml::events::attributes::AttrError;
use thiserror::Error;

/// Errors decoding a single endpoint or link line.
///
/// List decoders never surface these; they drop the offending line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
	/// The line is empty or whitespace.
	#[error("empty line")]
	Empty,

	/// A required field is absent or empty.
	#[error("missing required field `{0}`")]
	MissingField(&'static str),

	/// A numeric field does not hold a valid number.
	#[error("invalid number in field `{key}`: {value:?}")]
	InvalidNumber {
		/// Field key.
		key: &'static str,
		/// Raw field value.
		value: String,
	},

	/// A field is not of the form `key:value`.
	#[error("malformed field {0:?}")]
	MalformedField(String),

	/// A link line does not have exactly one `_` separating two sides.
	#[error("link line must have exactly two sides")]
	MalformedLink,
}

/// Errors decoding or encoding a whole connection list.
#[derive(Debug, Error)]
pub enum CodecError {
	/// The `<connections>` block is not well-formed markup.
	#[error("connections block: {0}")]
	Xml(#[from] quick_xml::Error),

	/// A `<doc>` attribute could not be read.
	#[error("connections block attribute: {0}")]
	XmlAttr(#[from] AttrError),

	/// The JSON connection list could not be read or written.
	#[error("connections JSON: {0}")]
	Json(#[from] serde_json::Error),

	/// The input holds no connection record with a url.
	#[error("no connection record found")]
	NoRecord,
}

/// Result type for connection list operations.
pub type Result<T> = std::result::Result<T, CodecError>;
