//! Relocation of endpoints whose anchor window moved.
//!
//! Candidates are positions where the stored boundary characters sit exactly
//! one window apart. The first candidate whose content hash matches is
//! accepted only if that content is unique in the text; a collision or a
//! duplicated passage leaves the endpoint unresolved.

use flink_primitives::{CharIdx, Endpoint, FlatText, TextEndpoint};
use tracing::{debug, trace};


/// New coordinates for a relocated text endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relocation {
	/// New start of the linked span.
	pub index: CharIdx,
	/// New start of the anchor window.
	pub hash_index: CharIdx,
}

impl Relocation {
	/// Moves `endpoint` to the relocated coordinates.
	pub fn apply(self, endpoint: &mut TextEndpoint) {
		endpoint.index = self.index;
		endpoint.hash_index = self.hash_index;
	}
}

/// Searches `text` for the anchor window of `endpoint`.
///
/// The span keeps its offset inside the window. Returns `None` when the
/// endpoint lacks a fingerprint, is structurally inconsistent, or no unique
/// matching window exists.
pub fn repair(endpoint: &TextEndpoint, text: &FlatText<'_>) -> Option<Relocation> {
	let hash = endpoint.hash.as_ref()?;
	let (left, right) = endpoint.boundary()?;
	if !endpoint.window_contains_span() {
		return None;
	}

	let window = endpoint.hash_length;
	let last_start = text.len_chars().checked_sub(window)?;
	if window == 0 {
		return None;
	}
	let offset = endpoint.index - endpoint.hash_index;

	for start in 0..=last_start {
		if text.char_at(start) != Some(left) || text.char_at(start + window - 1) != Some(right) {
			continue;
		}
		let candidate = text.slice(start, window);
		if !hash.matches(candidate) {
			trace!(start, "boundary match with different hash");
			continue;
		}
		if !text.is_unique(candidate) {
			debug!(start, hash = %hash, "matching window is not unique");
			return None;
		}

		debug!(
			from = endpoint.hash_index,
			to = start,
			hash = %hash,
			"anchor window relocated"
		);
		return Some(Relocation {
			index: start + offset,
			hash_index: start,
		});
	}

	debug!(hash = %hash, "no window matches stored fingerprint");
	None
}

/// Repairs `endpoint` in place. Points are never relocated.
pub fn repair_endpoint(endpoint: &mut Endpoint, text: &FlatText<'_>) -> Option<Relocation> {
	let end = endpoint.as_text_mut()?;
	let relocation = repair(end, text)?;
	relocation.apply(end);
	Some(relocation)
}
