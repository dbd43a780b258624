//! The links between a host document and one connected document.

use flink_anchor::{OutOfBoundsPolicy, RepairOptions, check_endpoint, repair_endpoint};
use flink_codec::{CodecError, ConnectionRecord, decode_connections, decode_link, encode_link_sides, encode_record};
use flink_primitives::{ContentHash, Endpoint, FlatText, Link, LinkFlags, Side, TextSource};
use tracing::{debug, warn};


/// Integrity summary of one side of a link set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SideHealth {
	/// False if no text was supplied for this side.
	pub checked: bool,
	/// Endpoints whose anchor no longer verifies.
	pub broken: usize,
	/// Endpoints whose span ends past the end of the text.
	pub out_of_bounds: usize,
}

impl SideHealth {
	/// Returns true if no endpoint on this side is broken or out of bounds.
	pub fn is_healthy(&self) -> bool {
		self.broken == 0 && self.out_of_bounds == 0
	}
}

/// Integrity summary of both sides of a link set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Health {
	/// Host document side.
	pub left: SideHealth,
	/// Connected document side.
	pub right: SideHealth,
}

impl Health {
	/// Returns the summary for `side`.
	pub fn side(&self, side: Side) -> &SideHealth {
		match side {
			Side::Left => &self.left,
			Side::Right => &self.right,
		}
	}

	fn side_mut(&mut self, side: Side) -> &mut SideHealth {
		match side {
			Side::Left => &mut self.left,
			Side::Right => &mut self.right,
		}
	}

	/// Returns true if both sides are healthy.
	pub fn is_healthy(&self) -> bool {
		self.left.is_healthy() && self.right.is_healthy()
	}
}

/// Addresses one endpoint of an active link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EndpointRef {
	/// Position in the active list.
	pub link: usize,
	pub side: Side,
}

/// Outcome of [`LinkSet::repair_all`] and [`LinkSet::repair_link`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RepairReport {
	/// Endpoints moved to a new location.
	pub repaired: Vec<EndpointRef>,
	/// Endpoints that stay broken or out of bounds.
	pub unresolved: Vec<EndpointRef>,
}

impl RepairReport {
	/// Returns true if every endpoint that needed repair was repaired.
	pub fn is_complete(&self) -> bool {
		self.unresolved.is_empty()
	}
}

/// Links between the host document (left) and one connected document
/// (right).
///
/// `original` is the persisted list and is only replaced by [`commit`].
/// `active` is a decoupled working copy that absorbs repairs and deletions.
///
/// [`commit`]: LinkSet::commit
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSet {
	url: String,
	title: Option<String>,
	color: String,
	document_hash: Option<ContentHash>,
	original: Vec<Link>,
	active: Vec<Link>,
	left_modified: bool,
	right_modified: bool,
}

impl LinkSet {
	/// Creates an empty link set for the document at `url`.
	pub fn new(url: impl Into<String>, color: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			title: None,
			color: color.into(),
			document_hash: None,
			original: Vec::new(),
			active: Vec::new(),
			left_modified: false,
			right_modified: false,
		}
	}

	/// Creates a link set from a persisted record.
	pub fn from_record(record: ConnectionRecord, color: impl Into<String>) -> Self {
		let mut set = Self::new(record.url, color);
		set.title = record.title;
		set.document_hash = record.hash;
		set.original = record.links;
		set.clone_active_from_original();
		set
	}

	/// Returns the persisted form of this set: the original links plus
	/// document metadata. Inverted links are skipped by the encoders.
	pub fn to_record(&self) -> ConnectionRecord {
		ConnectionRecord {
			url: self.url.clone(),
			title: self.title.clone(),
			hash: self.document_hash.clone(),
			links: self.original.clone(),
		}
	}

	/// Encodes the persisted form as a `<doc>` element carrying the url,
	/// title and document hash, one line per exportable original link.
	pub fn serialize(&self) -> String {
		encode_record(&self.to_record())
	}

	/// Builds a link set from the first record in `input`, which is a
	/// `<doc>` element, a `<connections>` block or a JSON list.
	///
	/// Malformed link lines are dropped.
	pub fn deserialize(input: &str, color: impl Into<String>) -> flink_codec::Result<Self> {
		let record = decode_connections(input)?.into_iter().next().ok_or(CodecError::NoRecord)?;
		Ok(Self::from_record(record, color))
	}

	/// Returns the location of the connected document.
	pub fn url(&self) -> &str {
		&self.url
	}

	/// Returns the connected document's display title.
	pub fn title(&self) -> Option<&str> {
		self.title.as_deref()
	}

	/// Replaces the display title.
	pub fn set_title(&mut self, title: Option<String>) {
		self.title = title;
	}

	/// Returns the color tag used to render this set's links.
	pub fn color(&self) -> &str {
		&self.color
	}

	/// Returns the connected document's hash as of the last refresh or load.
	pub fn document_hash(&self) -> Option<&ContentHash> {
		self.document_hash.as_ref()
	}

	/// Records the hash of the connected document's current text.
	pub fn refresh_document_hash(&mut self, text: &dyn TextSource) {
		self.document_hash = Some(ContentHash::of(&text.full_text()));
	}

	/// Returns true if `text` no longer matches the stored document hash.
	///
	/// A set without a stored hash always reports a change.
	pub fn document_changed(&self, text: &dyn TextSource) -> bool {
		match &self.document_hash {
			Some(hash) => !hash.matches(&text.full_text()),
			None => true,
		}
	}

	/// Returns the persisted links.
	pub fn original(&self) -> &[Link] {
		&self.original
	}

	/// Iterates the working copy with its current runtime flags.
	pub fn active(&self) -> impl Iterator<Item = &Link> {
		self.active.iter()
	}

	/// Returns the number of active links.
	pub fn active_len(&self) -> usize {
		self.active.len()
	}

	/// Returns the active link at `index`.
	pub fn get(&self, index: usize) -> Option<&Link> {
		self.active.get(index)
	}

	/// Marks the active link at `index` as selected or not.
	///
	/// Returns false if there is no such link.
	pub fn set_selected(&mut self, index: usize, selected: bool) -> bool {
		match self.active.get_mut(index) {
			Some(link) => {
				link.set_selected(selected);
				true
			}
			None => false,
		}
	}

	/// Returns true if the active links differ from the original on `side`.
	pub fn is_modified(&self, side: Side) -> bool {
		match side {
			Side::Left => self.left_modified,
			Side::Right => self.right_modified,
		}
	}

	/// Returns true if either side is modified.
	pub fn is_dirty(&self) -> bool {
		self.left_modified || self.right_modified
	}

	/// Rebuilds the active list from the original.
	///
	/// Every link is re-encoded and decoded so the copies share no state
	/// with the originals; runtime flags start empty, inversion is kept.
	pub fn clone_active_from_original(&mut self) {
		self.active = self.original.iter().map(decouple).collect();
	}

	/// Recomputes both modified flags by comparing active to original links.
	///
	/// A side is modified if the lists differ in length, or if an active
	/// endpoint has no original counterpart with the same hash on that side,
	/// or that counterpart sits at a different index or window start.
	pub fn check_modified(&mut self) {
		if self.active.len() != self.original.len() {
			self.left_modified = true;
			self.right_modified = true;
			return;
		}
		self.left_modified = self.side_modified(Side::Left);
		self.right_modified = self.side_modified(Side::Right);
	}

	fn side_modified(&self, side: Side) -> bool {
		self.active.iter().any(|active| {
			let end = active.endpoint(side);
			let counterpart = self
				.original
				.iter()
				.map(|original| original.endpoint(side))
				.find(|original| original.hash() == end.hash());
			match counterpart {
				Some(original) => original.position() != end.position(),
				None => true,
			}
		})
	}

	/// Discards every change to the active list.
	pub fn revert(&mut self) {
		self.clone_active_from_original();
		self.left_modified = false;
		self.right_modified = false;
		debug!(url = %self.url, links = self.active.len(), "reverted link set");
	}

	/// Removes every active link matching `predicate` and returns how many
	/// were removed.
	pub fn delete_link(&mut self, mut predicate: impl FnMut(&Link) -> bool) -> usize {
		let before = self.active.len();
		self.active.retain(|link| !predicate(link));
		let removed = before - self.active.len();
		self.check_modified();
		removed
	}

	/// Removes every selected active link.
	pub fn delete_selected(&mut self) -> usize {
		self.delete_link(Link::is_selected)
	}

	/// Appends a newly created link to the active list.
	///
	/// Endpoints are expected to be stamped already.
	pub fn add_link(&mut self, left: impl Into<Endpoint>, right: impl Into<Endpoint>) {
		self.active.push(Link::new(left, right));
		self.check_modified();
	}

	/// Makes the active list the new original.
	pub fn commit(&mut self) {
		self.original = self.active.iter().map(decouple).collect();
		self.check_modified();
		debug!(url = %self.url, links = self.original.len(), "committed link set");
	}

	/// Appends links owned by the connected document.
	///
	/// `links` are in the connected document's orientation; they are
	/// swapped into host orientation and marked inverted.
	pub fn import_inverted(&mut self, links: impl IntoIterator<Item = Link>) {
		for link in links {
			let inverted = Link::new(link.right().clone(), link.left().clone()).with_inverted(true);
			self.active.push(decouple(&inverted));
			self.original.push(inverted);
		}
	}

	/// Recomputes integrity flags of every active link for each side whose
	/// text is supplied.
	pub fn check_integrity(&mut self, left: Option<&dyn TextSource>, right: Option<&dyn TextSource>) -> Health {
		let mut health = Health::default();
		for (side, source) in [(Side::Left, left), (Side::Right, right)] {
			if let Some(source) = source {
				*health.side_mut(side) = self.check_side(side, source);
			}
		}
		health
	}

	/// Recomputes integrity flags of every active link on `side`.
	pub fn check_side(&mut self, side: Side, source: &dyn TextSource) -> SideHealth {
		let full = source.full_text();
		let text = FlatText::new(&full);
		let mut health = SideHealth {
			checked: true,
			..SideHealth::default()
		};

		for link in &mut self.active {
			let status = check_endpoint(link.endpoint(side), &text);
			link.set_flags(LinkFlags::integrity(side), false);
			link.set_flags(status.flags(side), true);
			if status.is_broken() {
				health.broken += 1;
			} else if status.is_out_of_bounds() {
				health.out_of_bounds += 1;
			}
		}

		debug!(
			url = %self.url,
			?side,
			broken = health.broken,
			out_of_bounds = health.out_of_bounds,
			"checked link set"
		);
		health
	}

	/// Checks and repairs every active endpoint on each side whose text is
	/// supplied, then recomputes the modified flags.
	pub fn repair_all(
		&mut self,
		left: Option<&dyn TextSource>,
		right: Option<&dyn TextSource>,
		options: &RepairOptions,
	) -> RepairReport {
		let mut report = RepairReport::default();
		for (side, source) in [(Side::Left, left), (Side::Right, right)] {
			if let Some(source) = source {
				self.repair_side(side, source, options, &mut report);
			}
		}
		self.check_modified();
		report
	}

	/// Checks and repairs both endpoints of the active link at `index`, then
	/// recomputes the modified flags.
	///
	/// Other links keep their flags. An index past the end yields an empty
	/// report.
	pub fn repair_link(
		&mut self,
		index: usize,
		left: Option<&dyn TextSource>,
		right: Option<&dyn TextSource>,
		options: &RepairOptions,
	) -> RepairReport {
		let mut report = RepairReport::default();
		let Some(link) = self.active.get_mut(index) else {
			return report;
		};
		for (side, source) in [(Side::Left, left), (Side::Right, right)] {
			if let Some(source) = source {
				let full = source.full_text();
				repair_link_side(link, EndpointRef { link: index, side }, &FlatText::new(&full), options, &mut report);
			}
		}
		debug!(
			url = %self.url,
			index,
			repaired = report.repaired.len(),
			unresolved = report.unresolved.len(),
			"repaired link"
		);
		self.check_modified();
		report
	}

	fn repair_side(&mut self, side: Side, source: &dyn TextSource, options: &RepairOptions, report: &mut RepairReport) {
		let full = source.full_text();
		let text = FlatText::new(&full);

		for (index, link) in self.active.iter_mut().enumerate() {
			repair_link_side(link, EndpointRef { link: index, side }, &text, options, report);
		}

		debug!(
			url = %self.url,
			?side,
			repaired = report.repaired.iter().filter(|at| at.side == side).count(),
			unresolved = report.unresolved.iter().filter(|at| at.side == side).count(),
			"repaired link set"
		);
	}
}

/// Checks one endpoint and relocates it if it is broken, or out of bounds
/// under [`OutOfBoundsPolicy::Relocate`]. Unresolved endpoints keep their
/// integrity flags.
fn repair_link_side(link: &mut Link, at: EndpointRef, text: &FlatText<'_>, options: &RepairOptions, report: &mut RepairReport) {
	let side = at.side;
	let status = check_endpoint(link.endpoint(side), text);
	link.set_flags(LinkFlags::integrity(side), false);
	if status.is_intact() {
		return;
	}

	let attempt = status.is_broken() || options.out_of_bounds == OutOfBoundsPolicy::Relocate;
	if attempt && repair_endpoint(link.endpoint_mut(side), text).is_some() {
		report.repaired.push(at);
	} else {
		link.set_flags(status.flags(side), true);
		report.unresolved.push(at);
	}
}

/// Copies a link through the line codec.
fn decouple(link: &Link) -> Link {
	let line = encode_link_sides(link.left(), link.right());
	match decode_link(&line) {
		Ok(copy) => copy.with_inverted(link.is_inverted()),
		Err(error) => {
			warn!(%error, "link did not survive re-encoding; copying as is");
			let mut copy = link.clone();
			copy.set_flags(LinkFlags::all(), false);
			copy
		}
	}
}
