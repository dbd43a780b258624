//! Per-document connection lists.
//!
//! A host document persists one record per connected document. Two
//! equivalent layouts are supported:
//!
//! ```text
//! <connections>
//! <doc url="notes/b.md" title="B" hash="3fa9c1">
//! i:4;l:5;h:abcdef;e:cWs=_i:7;l:3
//! </doc>
//! </connections>
//! ```
//!
//! and `{"connections":[{"url":…,"title":…,"hash":…,"flinks":[line,…]}]}`.

use flink_primitives::{ContentHash, Link};
use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::line::{decode_link_lines, encode_link};

const DOC_TAG: &[u8] = b"doc";
const BLOCK_OPEN: &str = "<connections";
const BLOCK_CLOSE: &str = "</connections>";

/// Links to one connected document, as persisted in the host document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectionRecord {
	/// Location of the connected document.
	pub url: String,
	pub title: Option<String>,
	/// Content hash of the connected document when the record was written.
	pub hash: Option<ContentHash>,
	pub links: Vec<Link>,
}

impl ConnectionRecord {
	/// Creates a record with no links.
	pub fn new(url: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			..Self::default()
		}
	}

	/// Returns the encoded lines of every exportable link.
	pub fn link_lines(&self) -> impl Iterator<Item = String> + '_ {
		self.links.iter().filter_map(encode_link)
	}
}

/// Layout of a persisted connection list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionFormat {
	/// The tag-delimited `<connections>` block.
	#[default]
	Block,
	/// The structured JSON list.
	Json,
}

impl ConnectionFormat {
	/// Guesses the layout of `input`: JSON if it starts with `{`.
	pub fn detect(input: &str) -> Self {
		if input.trim_start().starts_with('{') {
			Self::Json
		} else {
			Self::Block
		}
	}

	/// Encodes `records` in this layout.
	pub fn encode(self, records: &[ConnectionRecord]) -> Result<String> {
		match self {
			Self::Block => Ok(encode_block(records)),
			Self::Json => encode_json(records),
		}
	}

	/// Decodes `input` in this layout.
	pub fn decode(self, input: &str) -> Result<Vec<ConnectionRecord>> {
		match self {
			Self::Block => decode_block(input),
			Self::Json => decode_json(input),
		}
	}
}

/// Decodes a connection list in either layout.
pub fn decode_connections(input: &str) -> Result<Vec<ConnectionRecord>> {
	ConnectionFormat::detect(input).decode(input)
}

/// Encodes records as a `<connections>` block.
///
/// Inverted links are left out. An empty record list encodes to an empty
/// string so hosts can drop the block entirely.
pub fn encode_block(records: &[ConnectionRecord]) -> String {
	if records.is_empty() {
		return String::new();
	}

	let mut out = String::from("<connections>\n");
	for record in records {
		out.push_str(&encode_record(record));
		out.push('\n');
	}
	out.push_str("</connections>");
	out
}

/// Encodes one record as a `<doc>` element, without the enclosing
/// `<connections>` tags.
pub fn encode_record(record: &ConnectionRecord) -> String {
	let mut out = String::from("<doc url=\"");
	out.push_str(&escape(&record.url));
	out.push('"');
	if let Some(title) = &record.title {
		out.push_str(" title=\"");
		out.push_str(&escape(title));
		out.push('"');
	}
	if let Some(hash) = &record.hash {
		out.push_str(" hash=\"");
		out.push_str(&escape(hash.as_str()));
		out.push('"');
	}
	out.push_str(">\n");
	for line in record.link_lines() {
		out.push_str(&line);
		out.push('\n');
	}
	out.push_str("</doc>");
	out
}

/// Decodes a `<connections>` block.
///
/// Only the first `<connections>` element is parsed, so the surrounding host
/// text need not be well-formed markup. Input without one is parsed whole,
/// which accepts bare `<doc>` elements. `<doc>` elements without a `url`
/// attribute are skipped. Malformed link lines are dropped individually.
pub fn decode_block(input: &str) -> Result<Vec<ConnectionRecord>> {
	let mut reader = Reader::from_str(isolate_block(input));
	reader.trim_text(true);

	let mut records = Vec::new();
	let mut current: Option<ConnectionRecord> = None;
	let mut body = String::new();

	loop {
		match reader.read_event()? {
			Event::Start(start) if start.name().as_ref() == DOC_TAG => {
				current = read_doc(&start)?;
				body.clear();
			}
			Event::Empty(start) if start.name().as_ref() == DOC_TAG => {
				records.extend(read_doc(&start)?);
			}
			Event::Text(text) if current.is_some() => {
				body.push_str(&text.unescape()?);
				body.push('\n');
			}
			Event::CData(data) if current.is_some() => {
				body.push_str(&String::from_utf8_lossy(&data));
				body.push('\n');
			}
			Event::End(end) if end.name().as_ref() == DOC_TAG => {
				if let Some(mut record) = current.take() {
					record.links = decode_link_lines(body.lines());
					records.push(record);
				}
				body.clear();
			}
			Event::Eof => break,
			_ => {}
		}
	}

	Ok(records)
}

/// Returns the first `<connections>` element of `input`, or all of `input`
/// if there is none.
fn isolate_block(input: &str) -> &str {
	let Some(start) = find_block_start(input) else {
		return input;
	};
	let rest = &input[start..];
	if let Some(end) = rest.find(BLOCK_CLOSE) {
		return &rest[..end + BLOCK_CLOSE.len()];
	}
	// `<connections/>` or an unterminated block.
	match rest.find('>') {
		Some(end) if rest[..end].ends_with('/') => &rest[..=end],
		_ => rest,
	}
}

fn find_block_start(input: &str) -> Option<usize> {
	let mut from = 0;
	while let Some(found) = input[from..].find(BLOCK_OPEN) {
		let at = from + found;
		let after = input[at + BLOCK_OPEN.len()..].chars().next();
		if matches!(after, Some('>' | '/' | ' ' | '\t' | '\n' | '\r')) {
			return Some(at);
		}
		from = at + BLOCK_OPEN.len();
	}
	None
}

fn read_doc(start: &BytesStart<'_>) -> Result<Option<ConnectionRecord>> {
	let mut url = None;
	let mut record = ConnectionRecord::default();

	for attr in start.attributes() {
		let attr = attr?;
		let value = attr.unescape_value()?;
		match attr.key.as_ref() {
			b"url" => url = Some(value.into_owned()),
			b"title" => record.title = Some(value.into_owned()),
			b"hash" if !value.is_empty() => record.hash = Some(ContentHash::from_stored(value)),
			_ => {}
		}
	}

	match url.filter(|url| !url.is_empty()) {
		Some(url) => {
			record.url = url;
			Ok(Some(record))
		}
		None => {
			debug!("skipping connection record without url");
			Ok(None)
		}
	}
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonConnections {
	#[serde(default)]
	connections: Vec<JsonRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonRecord {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	hash: Option<String>,
	#[serde(default)]
	flinks: Vec<String>,
}

/// Encodes records as a pretty-printed JSON list, indented by four spaces.
///
/// Inverted links are left out.
pub fn encode_json(records: &[ConnectionRecord]) -> Result<String> {
	let document = JsonConnections {
		connections: records
			.iter()
			.map(|record| JsonRecord {
				url: Some(record.url.clone()),
				title: record.title.clone(),
				hash: record.hash.as_ref().map(|hash| hash.as_str().to_string()),
				flinks: record.link_lines().collect(),
			})
			.collect(),
	};

	let mut out = Vec::new();
	let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
	let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
	document.serialize(&mut serializer)?;
	Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Decodes a JSON connection list.
///
/// Records without a `url` are skipped. Malformed link lines are dropped
/// individually.
pub fn decode_json(input: &str) -> Result<Vec<ConnectionRecord>> {
	let document: JsonConnections = serde_json::from_str(input)?;
	Ok(document
		.connections
		.into_iter()
		.filter_map(|record| {
			let Some(url) = record.url.filter(|url| !url.is_empty()) else {
				debug!("skipping connection record without url");
				return None;
			};
			Some(ConnectionRecord {
				url,
				title: record.title,
				hash: record.hash.filter(|hash| !hash.is_empty()).map(ContentHash::from_stored),
				links: decode_link_lines(record.flinks.iter().map(String::as_str)),
			})
		})
		.collect())
}
