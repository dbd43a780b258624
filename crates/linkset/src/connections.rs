//! All link sets of one host document.

use flink_codec::{ConnectionFormat, ConnectionRecord, decode_connections};
use flink_primitives::Link;

use crate::set::LinkSet;

/// Color tags handed out to link sets in order.
pub const DEFAULT_PALETTE: [&str; 8] = [
	"#FF0000", "#0000FF", "#FF8000", "#8000FF", "#119FFF", "#FF41A0", "#36B952", "#F3655C",
];

/// The ordered link sets of a host document, one per connected document.
#[derive(Debug, Clone)]
pub struct Connections {
	sets: Vec<LinkSet>,
	palette: Vec<String>,
	next_color: usize,
}

impl Default for Connections {
	fn default() -> Self {
		Self::new()
	}
}

impl Connections {
	/// Creates an empty list using [`DEFAULT_PALETTE`].
	pub fn new() -> Self {
		Self::with_palette(Vec::new())
	}

	/// Creates an empty list. An empty palette falls back to
	/// [`DEFAULT_PALETTE`].
	pub fn with_palette(palette: Vec<String>) -> Self {
		let palette = if palette.is_empty() {
			DEFAULT_PALETTE.iter().map(|color| color.to_string()).collect()
		} else {
			palette
		};
		Self {
			sets: Vec::new(),
			palette,
			next_color: 0,
		}
	}

	/// Builds the list from persisted records, assigning colors in order.
	pub fn from_records(records: impl IntoIterator<Item = ConnectionRecord>, palette: Vec<String>) -> Self {
		let mut connections = Self::with_palette(palette);
		for record in records {
			connections.insert_record(record);
		}
		connections
	}

	/// Decodes a `<connections>` block or JSON list.
	pub fn decode(input: &str, palette: Vec<String>) -> flink_codec::Result<Self> {
		Ok(Self::from_records(decode_connections(input)?, palette))
	}

	/// Encodes the original links of every set.
	pub fn encode(&self, format: ConnectionFormat) -> flink_codec::Result<String> {
		format.encode(&self.to_records())
	}

	pub fn to_records(&self) -> Vec<ConnectionRecord> {
		self.sets.iter().map(LinkSet::to_record).collect()
	}

	fn next_color(&mut self) -> String {
		let color = self.palette[self.next_color % self.palette.len()].clone();
		self.next_color += 1;
		color
	}

	/// Adds a set for a persisted record.
	///
	/// A record for a URL already present replaces that set and keeps its
	/// color.
	pub fn insert_record(&mut self, record: ConnectionRecord) -> &mut LinkSet {
		let index = match self.position(&record.url) {
			Some(index) => {
				let color = self.sets[index].color().to_string();
				self.sets[index] = LinkSet::from_record(record, color);
				index
			}
			None => {
				let color = self.next_color();
				self.sets.push(LinkSet::from_record(record, color));
				self.sets.len() - 1
			}
		};
		&mut self.sets[index]
	}

	/// Returns the set for `url`, creating an empty one if needed.
	pub fn get_or_insert(&mut self, url: &str) -> &mut LinkSet {
		let index = match self.position(url) {
			Some(index) => index,
			None => {
				let color = self.next_color();
				self.sets.push(LinkSet::new(url, color));
				self.sets.len() - 1
			}
		};
		&mut self.sets[index]
	}

	/// Adds links persisted by the document at `url` that point back at the
	/// host. They are shown but never written into the host's block.
	pub fn import_inverted(&mut self, url: &str, links: impl IntoIterator<Item = Link>) {
		self.get_or_insert(url).import_inverted(links);
	}

	fn position(&self, url: &str) -> Option<usize> {
		self.sets.iter().position(|set| set.url() == url)
	}

	pub fn get(&self, url: &str) -> Option<&LinkSet> {
		self.sets.iter().find(|set| set.url() == url)
	}

	pub fn get_mut(&mut self, url: &str) -> Option<&mut LinkSet> {
		self.sets.iter_mut().find(|set| set.url() == url)
	}

	/// Removes and returns the set for `url`.
	pub fn remove(&mut self, url: &str) -> Option<LinkSet> {
		let index = self.position(url)?;
		Some(self.sets.remove(index))
	}

	pub fn iter(&self) -> impl Iterator<Item = &LinkSet> {
		self.sets.iter()
	}

	pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut LinkSet> {
		self.sets.iter_mut()
	}

	pub fn len(&self) -> usize {
		self.sets.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sets.is_empty()
	}

	/// Returns true if any set has uncommitted changes.
	pub fn is_dirty(&self) -> bool {
		self.sets.iter().any(LinkSet::is_dirty)
	}
}

#[cfg(test)]
mod tests {
	use flink_primitives::{PointEndpoint, TextEndpoint};
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn colors_cycle_through_palette() {
		let mut connections = Connections::with_palette(vec!["red".into(), "blue".into()]);
		let colors: Vec<String> = ["a", "b", "c"]
			.into_iter()
			.map(|url| connections.get_or_insert(url).color().to_string())
			.collect();
		assert_eq!(colors, ["red", "blue", "red"]);
		assert_eq!(connections.get_or_insert("b").color(), "blue");
		assert_eq!(connections.len(), 3);
	}

	#[test]
	fn default_palette() {
		let mut connections = Connections::new();
		for url in ["a", "b", "c", "d", "e", "f", "g", "h", "i"] {
			connections.get_or_insert(url);
		}
		assert_eq!(connections.get("a").unwrap().color(), "#FF0000");
		assert_eq!(connections.get("h").unwrap().color(), "#F3655C");
		assert_eq!(connections.get("i").unwrap().color(), "#FF0000");
	}

	#[test]
	fn replacing_a_record_keeps_its_color() {
		let mut connections = Connections::new();
		connections.get_or_insert("a");
		connections.get_or_insert("b");
		let set = connections.insert_record(ConnectionRecord::new("a"));
		assert_eq!(set.color(), "#FF0000");
		assert_eq!(connections.len(), 2);
	}

	#[test]
	fn decode_and_encode_block() {
		let block = "<connections>\n<doc url=\"a\" title=\"A\">\ni:1;l:2_i:3;l:4\n</doc>\n<doc url=\"b\">\n</doc>\n</connections>";
		let connections = Connections::decode(block, Vec::new()).unwrap();
		assert_eq!(connections.len(), 2);
		assert_eq!(connections.get("a").unwrap().active_len(), 1);
		assert_eq!(connections.encode(ConnectionFormat::Block).unwrap(), block);
	}

	#[test]
	fn inverted_links_stay_out_of_host_block() {
		let mut connections = Connections::new();
		let theirs = Link::new(TextEndpoint::unanchored(0, 3), PointEndpoint::new(1.0, 1.0, 1.0));
		connections.import_inverted("other.md", [theirs]);

		let set = connections.get("other.md").unwrap();
		assert!(set.get(0).unwrap().left().as_point().is_some());
		assert!(!connections.is_dirty());
		assert_eq!(
			connections.encode(ConnectionFormat::Block).unwrap(),
			"<connections>\n<doc url=\"other.md\">\n</doc>\n</connections>"
		);
	}

	#[test]
	fn remove_set() {
		let mut connections = Connections::new();
		connections.get_or_insert("a").add_link(TextEndpoint::unanchored(0, 1), TextEndpoint::unanchored(2, 1));
		assert!(connections.is_dirty());
		assert!(connections.remove("a").is_some());
		assert!(connections.remove("a").is_none());
		assert!(connections.is_empty());
	}
}
