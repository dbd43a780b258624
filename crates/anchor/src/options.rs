//! Tunables for fingerprinting and repair.

use flink_primitives::SHORT_HASH_LEN;
use serde::{Deserialize, Serialize};

/// Default minimum anchor window length in chars.
pub const DEFAULT_MIN_WINDOW_LEN: usize = 10;

/// Options controlling how anchor windows are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnchorOptions {
	/// Spans shorter than this are widened before the uniqueness test.
	///
	/// Clamped to the text length at fingerprint time.
	pub min_window_len: usize,
	/// Number of hex digits kept in newly computed hashes.
	pub hash_len: usize,
}

impl Default for AnchorOptions {
	fn default() -> Self {
		Self {
			min_window_len: DEFAULT_MIN_WINDOW_LEN,
			hash_len: SHORT_HASH_LEN,
		}
	}
}

/// What repair does with endpoints whose span runs past the end of the text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutOfBoundsPolicy {
	/// Search for the fingerprinted window like for any broken endpoint.
	#[default]
	Relocate,
	/// Leave the endpoint unresolved; the caller decides (e.g. jump to the
	/// end of the document).
	Skip,
}

/// Options controlling bulk repair.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepairOptions {
	/// Handling of out-of-bounds endpoints.
	pub out_of_bounds: OutOfBoundsPolicy,
}
