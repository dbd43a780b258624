//! Fingerprinted links survive every persisted layout.

use flink_anchor::{AnchorOptions, anchor_text_endpoint, check_text_endpoint};
use flink_codec::{
	ConnectionFormat, ConnectionRecord, LinkObject, decode_connections, decode_link, encode_link,
};
use flink_primitives::{ContentHash, Endpoint, FlatText, Link, PointEndpoint};
use pretty_assertions::assert_eq;

const HOST: &str = "The quick brown fox jumps over the lazy dog";
const TARGET: &str = "the cat sat on the cat mat";

fn anchored_link() -> Link {
	let opts = AnchorOptions::default();
	let left = anchor_text_endpoint(&FlatText::new(HOST), 4, 5, &opts).unwrap();
	let right = anchor_text_endpoint(&FlatText::new(TARGET), 4, 3, &opts).unwrap();
	Link::new(left, right)
}

#[test]
fn anchored_line_stays_intact() {
	let line = encode_link(&anchored_link()).unwrap();
	let link = decode_link(&line).unwrap();

	let host = link.left().as_text().unwrap();
	let target = link.right().as_text().unwrap();
	assert!(check_text_endpoint(host, &FlatText::new(HOST)).is_intact());
	assert!(check_text_endpoint(target, &FlatText::new(TARGET)).is_intact());
	assert_eq!(link, anchored_link());
}

#[test]
fn both_layouts_carry_the_same_records() {
	let records = vec![
		ConnectionRecord {
			url: "target.md".into(),
			title: Some("Target".into()),
			hash: Some(ContentHash::of(TARGET)),
			links: vec![
				anchored_link(),
				Link::new(PointEndpoint::new(0.1234, 5.0, 2.5), anchored_link().right().clone()),
			],
		},
		ConnectionRecord::new("empty.md"),
	];

	for format in [ConnectionFormat::Block, ConnectionFormat::Json] {
		let encoded = format.encode(&records).unwrap();
		let mut decoded = decode_connections(&encoded).unwrap();
		// Coordinates are persisted at three decimals.
		assert_eq!(
			decoded[0].links[1].left(),
			&Endpoint::Point(PointEndpoint::new(0.123, 5.0, 2.5))
		);
		decoded[0].links[1] = records[0].links[1].clone();
		assert_eq!(decoded, records, "{format:?}");
	}
}

#[test]
fn object_form_matches_line_form() {
	let link = anchored_link();
	let object = LinkObject::from_link(&link);
	let json = serde_json::to_string(&object).unwrap();
	let back: LinkObject = serde_json::from_str(&json).unwrap();
	assert_eq!(back.into_link(false).unwrap(), link);
}
