//! Subcommand implementations.
//!
//! Each command takes already-read inputs and returns its output, so that
//! `main` only deals with files and exit codes.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use flink_anchor::{AnchorOptions, OutOfBoundsPolicy, RepairOptions, anchor_text_endpoint};
use flink_codec::{ConnectionFormat, EndpointObject, encode_endpoint};
use flink_linkset::{Connections, LinkSet, SideHealth};
use flink_primitives::{Endpoint, FlatText, Side, TextSource};
use tracing::info;

/// Reads a UTF-8 file.
pub fn read(path: &Path) -> Result<String> {
	std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Texts of the two documents, when supplied.
#[derive(Debug, Default)]
pub struct Documents {
	pub left: Option<String>,
	pub right: Option<String>,
}

impl Documents {
	pub fn read(left: Option<&Path>, right: Option<&Path>) -> Result<Self> {
		Ok(Self {
			left: left.map(read).transpose()?,
			right: right.map(read).transpose()?,
		})
	}

	fn left(&self) -> Option<&dyn TextSource> {
		self.left.as_ref().map(|text| text as &dyn TextSource)
	}

	fn right(&self) -> Option<&dyn TextSource> {
		self.right.as_ref().map(|text| text as &dyn TextSource)
	}
}

/// Fingerprints a span and returns its endpoint line or JSON object.
pub fn fingerprint(text: &str, index: usize, length: usize, options: &AnchorOptions, json: bool) -> Result<String> {
	let endpoint = anchor_text_endpoint(&FlatText::new(text), index, length, options)?;
	let endpoint = Endpoint::from(endpoint);
	if json {
		Ok(serde_json::to_string(&EndpointObject::from(&endpoint))?)
	} else {
		Ok(encode_endpoint(&endpoint))
	}
}

fn selected<'a>(connections: &'a mut Connections, url: Option<&'a str>) -> impl Iterator<Item = &'a mut LinkSet> {
	connections
		.iter_mut()
		.filter(move |set| url.is_none_or(|url| set.url() == url))
}

fn describe_side(out: &mut String, side: Side, health: &SideHealth) {
	let name = side_name(side);
	if health.checked {
		let _ = writeln!(
			out,
			"  {name}: {} broken, {} out of bounds",
			health.broken, health.out_of_bounds
		);
	} else {
		let _ = writeln!(out, "  {name}: not checked");
	}
}

fn side_name(side: Side) -> &'static str {
	match side {
		Side::Left => "left",
		Side::Right => "right",
	}
}

/// Checks every selected link set and returns a report plus whether all
/// checked sides are healthy.
pub fn check(connections: &mut Connections, documents: &Documents, url: Option<&str>) -> (String, bool) {
	let mut out = String::new();
	let mut healthy = true;

	for set in selected(connections, url) {
		let health = set.check_integrity(documents.left(), documents.right());
		healthy &= health.is_healthy();

		let _ = writeln!(out, "{}", set.url());
		if let Some(right) = &documents.right {
			if set.document_changed(right) {
				let _ = writeln!(out, "  document changed since last save");
			}
		}
		describe_side(&mut out, Side::Left, &health.left);
		describe_side(&mut out, Side::Right, &health.right);

		for (index, link) in set.active().enumerate() {
			for side in Side::ALL {
				let state = if link.is_out_of_bounds(side) {
					"out of bounds"
				} else if link.is_broken(side) {
					"broken"
				} else {
					continue;
				};
				let _ = writeln!(out, "  link {index}: {} {state}", side_name(side));
			}
		}
	}

	(out, healthy)
}

/// Repairs every selected link set, commits the result and returns the
/// number of unresolved endpoints.
pub fn repair(connections: &mut Connections, documents: &Documents, url: Option<&str>, options: &RepairOptions) -> usize {
	let mut unresolved = 0;
	for set in selected(connections, url) {
		let report = set.repair_all(documents.left(), documents.right(), options);
		info!(
			url = set.url(),
			repaired = report.repaired.len(),
			unresolved = report.unresolved.len(),
			"repaired"
		);
		unresolved += report.unresolved.len();
		if let Some(right) = &documents.right {
			set.refresh_document_hash(right);
		}
		set.commit();
	}
	unresolved
}

/// Re-encodes a connection list in `format`.
pub fn convert(input: &str, format: ConnectionFormat) -> Result<String> {
	let connections = Connections::decode(input, Vec::new()).context("decoding connection list")?;
	Ok(connections.encode(format)?)
}

/// Returns repair options with the out-of-bounds policy overridden if asked.
pub fn repair_options(base: RepairOptions, skip_out_of_bounds: bool) -> RepairOptions {
	if skip_out_of_bounds {
		RepairOptions {
			out_of_bounds: OutOfBoundsPolicy::Skip,
		}
	} else {
		base
	}
}

#[cfg(test)]
mod tests {
	use flink_codec::ConnectionRecord;
	use flink_primitives::{ContentHash, Link};
	use pretty_assertions::assert_eq;

	use super::*;

	const HOST: &str = "Notes on anchoring: the window must stay unique.";
	const TARGET: &str = "Anchors survive edits outside their window.";

	fn connections() -> Connections {
		let opts = AnchorOptions::default();
		let left = anchor_text_endpoint(&FlatText::new(HOST), 9, 9, &opts).unwrap();
		let right = anchor_text_endpoint(&FlatText::new(TARGET), 0, 7, &opts).unwrap();
		let record = ConnectionRecord {
			url: "target.md".into(),
			title: None,
			hash: Some(ContentHash::of(TARGET)),
			links: vec![Link::new(left, right)],
		};
		Connections::from_records([record], Vec::new())
	}

	#[test]
	fn fingerprint_line_and_json() {
		let opts = AnchorOptions::default();
		let line = fingerprint("The quick brown fox", 4, 5, &opts, false).unwrap();
		assert!(line.starts_with("i:4;hi:0;l:5;hl:10;h:"));

		let json = fingerprint("The quick brown fox", 4, 5, &opts, true).unwrap();
		assert!(json.starts_with(r#"{"t":"t","i":4,"l":5,"hi":0,"hl":10,"h":"#));
		assert!(fingerprint("short", 4, 5, &opts, false).is_err());
	}

	#[test]
	fn check_reports_broken_side() {
		let mut connections = connections();
		let documents = Documents {
			left: Some(HOST.to_string()),
			right: Some(format!("Intro. {TARGET}")),
		};
		let (report, healthy) = check(&mut connections, &documents, None);
		assert!(!healthy);
		assert_eq!(
			report,
			"target.md\n  document changed since last save\n  left: 0 broken, 0 out of bounds\n  right: 1 broken, 0 out of bounds\n  link 0: right broken\n"
		);
	}

	#[test]
	fn check_skips_other_urls() {
		let mut connections = connections();
		let (report, healthy) = check(&mut connections, &Documents::default(), Some("other.md"));
		assert!(healthy);
		assert!(report.is_empty());
	}

	#[test]
	fn repair_commits_moved_endpoints() {
		let mut connections = connections();
		let target = format!("Intro. {TARGET}");
		let documents = Documents {
			left: None,
			right: Some(target.clone()),
		};
		let unresolved = repair(&mut connections, &documents, None, &RepairOptions::default());
		assert_eq!(unresolved, 0);

		let set = connections.get("target.md").unwrap();
		assert!(!set.is_dirty());
		assert!(!set.document_changed(&target));
		assert_eq!(set.original()[0].right().position(), Some((7, 7)));
	}

	#[test]
	fn convert_between_layouts() {
		let block = connections().encode(ConnectionFormat::Block).unwrap();
		let json = convert(&block, ConnectionFormat::Json).unwrap();
		assert!(json.starts_with("{\n    \"connections\": ["));
		assert_eq!(convert(&json, ConnectionFormat::Block).unwrap(), block);
	}

	#[test]
	fn skip_flag_overrides_policy() {
		let options = repair_options(RepairOptions::default(), true);
		assert_eq!(options.out_of_bounds, OutOfBoundsPolicy::Skip);
		assert_eq!(repair_options(RepairOptions::default(), false), RepairOptions::default());
	}
}
