//! Load, check, repair and persist the connections of a host document.

use std::time::{Duration, Instant};

use flink_anchor::{AnchorOptions, anchor_text_endpoint};
use flink_codec::{ConnectionFormat, ConnectionRecord};
use flink_linkset::{Connections, FlinkConfig};
use flink_primitives::{ContentHash, FlatText, Link, Side};
use pretty_assertions::assert_eq;

const HOST: &str = "Floating links anchor to content, not to offsets. Edits elsewhere must not break them.";
const TARGET: &str = "Offsets drift whenever a paragraph is inserted above the anchor.";

fn persisted() -> String {
	let opts = AnchorOptions::default();
	let left = anchor_text_endpoint(&FlatText::new(HOST), 15, 6, &opts).unwrap();
	let right = anchor_text_endpoint(&FlatText::new(TARGET), 0, 7, &opts).unwrap();
	let record = ConnectionRecord {
		url: "target.md".into(),
		title: Some("Target".into()),
		hash: Some(ContentHash::of(TARGET)),
		links: vec![Link::new(left, right)],
	};
	ConnectionFormat::Block.encode(&[record]).unwrap()
}

#[test]
fn edit_repair_commit() {
	let config = FlinkConfig::default();
	let mut connections = Connections::decode(&persisted(), config.palette.clone()).unwrap();
	let set = connections.get_mut("target.md").unwrap();
	assert_eq!(set.color(), "#FF0000");

	let target = format!("A new opening paragraph.\n\n{TARGET}");
	assert!(set.document_changed(&target));

	let health = set.check_integrity(Some(&HOST), Some(&target));
	assert!(health.left.is_healthy());
	assert_eq!(health.right.broken, 1);

	let report = set.repair_all(Some(&HOST), Some(&target), &config.repair);
	assert!(report.is_complete());
	assert!(set.is_modified(Side::Right));
	assert!(!set.is_modified(Side::Left));

	let right = set.get(0).unwrap().right().as_text().unwrap();
	assert_eq!(FlatText::new(&target).slice(right.index, right.length), "Offsets");

	set.refresh_document_hash(&target);
	set.commit();
	assert!(!connections.is_dirty());

	let json = connections.encode(ConnectionFormat::Json).unwrap();
	let reloaded = Connections::decode(&json, Vec::new()).unwrap();
	let set = reloaded.get("target.md").unwrap();
	assert!(!set.document_changed(&target));
	assert_eq!(set.original(), connections.get("target.md").unwrap().original());
}

#[test]
fn edits_coalesce_before_recompute() {
	let config = FlinkConfig::parse("[schedule]\ndebounce_ms = 20\n").unwrap();
	let mut scheduler = config.scheduler();
	let start = Instant::now();

	for step in 0..5 {
		scheduler.schedule("target.md", start + Duration::from_millis(step * 10));
	}
	assert!(scheduler.take_due(start + Duration::from_millis(50)).is_empty());
	assert_eq!(scheduler.take_due(start + Duration::from_millis(60)), vec!["target.md"]);
}
