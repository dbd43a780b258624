use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use flink_primitives::{ContentHash, Endpoint, PointEndpoint, TextEndpoint};

use crate::error::LineError;

const POINT_PREFIX: &str = "p|";
const TEXT_PREFIX: &str = "t|";

/// Fields of a text endpoint that may be left out because the paired left
/// endpoint already carries them.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Omit {
	pub hash: bool,
	pub boundary: bool,
}

/// Encodes an endpoint as a single line.
pub fn encode_endpoint(endpoint: &Endpoint) -> String {
	encode_with(endpoint, Omit::default())
}

pub(crate) fn encode_with(endpoint: &Endpoint, omit: Omit) -> String {
	match endpoint {
		Endpoint::Text(end) => encode_text(end, omit),
		Endpoint::Point(point) => encode_point(point),
	}
}

fn encode_text(end: &TextEndpoint, omit: Omit) -> String {
	let mut fields = vec![format!("i:{}", end.index)];
	if end.hash_index != end.index {
		fields.push(format!("hi:{}", end.hash_index));
	}
	fields.push(format!("l:{}", end.length));
	if end.hash_length != end.length {
		fields.push(format!("hl:{}", end.hash_length));
	}
	if let Some(hash) = end.hash.as_ref().filter(|hash| !hash.is_empty() && !omit.hash) {
		fields.push(format!("h:{hash}"));
	}
	if let Some((left, right)) = end.boundary().filter(|_| !omit.boundary) {
		let pair: String = [left, right].into_iter().collect();
		fields.push(format!("e:{}", STANDARD.encode(pair)));
	}
	fields.join(";")
}

fn encode_point(point: &PointEndpoint) -> String {
	format!(
		"{POINT_PREFIX}x:{};y:{};r:{}",
		round_coordinate(point.x),
		round_coordinate(point.y),
		round_coordinate(point.radius)
	)
}

/// Rounds to three decimals, half up, without producing `-0`.
fn round_coordinate(value: f64) -> f64 {
	let rounded = (value * 1000.0 + 0.5).floor() / 1000.0;
	if rounded == 0.0 { 0.0 } else { rounded }
}

/// Decodes a single endpoint line.
///
/// A `p|` prefix selects a point, `t|` or no prefix a text span.
pub fn decode_endpoint(line: &str) -> Result<Endpoint, LineError> {
	let line = line.trim();
	if line.is_empty() {
		return Err(LineError::Empty);
	}
	if let Some(fields) = line.strip_prefix(POINT_PREFIX) {
		return decode_point(fields).map(Endpoint::Point);
	}
	let fields = line.strip_prefix(TEXT_PREFIX).unwrap_or(line);
	decode_text(fields).map(Endpoint::Text)
}

/// Splits `a:1;b:2` into key/value pairs. Every field must hold exactly one `:`.
fn fields(line: &str) -> impl Iterator<Item = Result<(&str, &str), LineError>> {
	line.split(';').map(|field| match field.split_once(':') {
		Some((key, value)) if !value.contains(':') => Ok((key, value)),
		_ => Err(LineError::MalformedField(field.to_string())),
	})
}

fn required<'a>(value: Option<&'a str>, key: &'static str) -> Result<&'a str, LineError> {
	value.filter(|value| !value.is_empty()).ok_or(LineError::MissingField(key))
}

fn parse_index(value: &str, key: &'static str) -> Result<usize, LineError> {
	value.parse().map_err(|_| LineError::InvalidNumber {
		key,
		value: value.to_string(),
	})
}

fn parse_coordinate(value: &str, key: &'static str) -> Result<f64, LineError> {
	value
		.parse::<f64>()
		.ok()
		.filter(|value| value.is_finite())
		.ok_or_else(|| LineError::InvalidNumber {
			key,
			value: value.to_string(),
		})
}

/// Decodes the `e` field: base64 of exactly two UTF-8 characters.
fn decode_boundary(value: &str) -> Option<(char, char)> {
	let bytes = STANDARD.decode(value).ok()?;
	let pair = String::from_utf8(bytes).ok()?;
	let mut chars = pair.chars();
	match (chars.next(), chars.next(), chars.next()) {
		(Some(left), Some(right), None) => Some((left, right)),
		_ => None,
	}
}

fn decode_text(line: &str) -> Result<TextEndpoint, LineError> {
	let mut index = None;
	let mut length = None;
	let mut hash_index = None;
	let mut hash_length = None;
	let mut hash = None;
	let mut boundary = None;

	for field in fields(line) {
		match field? {
			("i", value) => index = Some(value),
			("l", value) => length = Some(value),
			("hi", value) => hash_index = Some(value),
			("hl", value) => hash_length = Some(value),
			("h", value) => hash = Some(value),
			("e", value) => boundary = decode_boundary(value).or(boundary),
			_ => {}
		}
	}

	let index = required(index, "i")?;
	let length = required(length, "l")?;
	let hash_index = hash_index.filter(|value| !value.is_empty()).unwrap_or(index);
	let hash_length = hash_length.filter(|value| !value.is_empty()).unwrap_or(length);

	Ok(TextEndpoint {
		index: parse_index(index, "i")?,
		length: parse_index(length, "l")?,
		hash_index: parse_index(hash_index, "hi")?,
		hash_length: parse_index(hash_length, "hl")?,
		hash: hash.filter(|value| !value.is_empty()).map(ContentHash::from_stored),
		left_char: boundary.map(|(left, _)| left),
		right_char: boundary.map(|(_, right)| right),
	})
}

fn decode_point(line: &str) -> Result<PointEndpoint, LineError> {
	let mut x = None;
	let mut y = None;
	let mut radius = None;

	for field in fields(line) {
		match field? {
			("x", value) => x = Some(value),
			("y", value) => y = Some(value),
			("r", value) => radius = Some(value),
			_ => {}
		}
	}

	Ok(PointEndpoint {
		x: parse_coordinate(required(x, "x")?, "x")?,
		y: parse_coordinate(required(y, "y")?, "y")?,
		radius: parse_coordinate(required(radius, "r")?, "r")?,
	})
}
