use flink_primitives::{Endpoint, Link};
use tracing::warn;

use super::endpoint::{Omit, decode_endpoint, encode_with};
use crate::error::LineError;

const SIDE_SEPARATOR: char = '_';
const ALTERNATE_SEPARATOR: char = '^';

/// Encodes a link as `<left>_<right>`.
///
/// Returns `None` for inverted links: they are owned by the other
/// document's connection block and are not written from this side.
pub fn encode_link(link: &Link) -> Option<String> {
	if link.is_inverted() {
		return None;
	}
	Some(encode_link_sides(link.left(), link.right()))
}

/// Encodes two endpoints as a link line regardless of orientation.
///
/// The right endpoint drops its hash and boundary characters when they
/// equal the left endpoint's.
pub fn encode_link_sides(left: &Endpoint, right: &Endpoint) -> String {
	let omit = match (left.as_text(), right.as_text()) {
		(Some(left), Some(right)) => Omit {
			hash: left.hash.is_some() && left.hash == right.hash,
			boundary: left.boundary().is_some() && left.boundary() == right.boundary(),
		},
		_ => Omit::default(),
	};
	format!(
		"{}{SIDE_SEPARATOR}{}",
		encode_with(left, Omit::default()),
		encode_with(right, omit)
	)
}

/// Decodes a link line.
///
/// Only the first alternate of each side is read. A right text endpoint
/// without hash or boundary characters inherits them from a left text
/// endpoint.
pub fn decode_link(line: &str) -> Result<Link, LineError> {
	let line = line.trim();
	if line.is_empty() {
		return Err(LineError::Empty);
	}

	let mut sides = line.split(SIDE_SEPARATOR);
	let (Some(left), Some(right), None) = (sides.next(), sides.next(), sides.next()) else {
		return Err(LineError::MalformedLink);
	};
	let left = first_alternate(left);
	let right = first_alternate(right);

	let left = decode_endpoint(left)?;
	let mut right = decode_endpoint(right)?;

	if let (Endpoint::Text(left), Endpoint::Text(right)) = (&left, &mut right) {
		if right.hash.is_none() {
			right.hash = left.hash.clone();
		}
		if right.left_char.is_none() {
			right.left_char = left.left_char;
		}
		if right.right_char.is_none() {
			right.right_char = left.right_char;
		}
	}

	Ok(Link::new(left, right))
}

fn first_alternate(side: &str) -> &str {
	side.split(ALTERNATE_SEPARATOR).next().unwrap_or(side)
}

/// Decodes one link per line, dropping lines that fail to decode.
///
/// Blank lines are skipped silently; malformed lines are logged.
pub fn decode_links(text: &str) -> Vec<Link> {
	decode_link_lines(text.lines())
}

pub(crate) fn decode_link_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<Link> {
	lines
		.into_iter()
		.enumerate()
		.filter(|(_, line)| !line.trim().is_empty())
		.filter_map(|(number, line)| match decode_link(line) {
			Ok(link) => Some(link),
			Err(error) => {
				warn!(line = number + 1, %error, "dropping malformed link line");
				None
			}
		})
		.collect()
}
