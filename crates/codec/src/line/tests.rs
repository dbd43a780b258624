use flink_primitives::{ContentHash, Endpoint, Link, PointEndpoint, TextEndpoint};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use super::*;
use crate::error::LineError;

fn text_end(index: usize, length: usize, hash_index: usize, hash_length: usize) -> TextEndpoint {
	TextEndpoint {
		index,
		length,
		hash_index,
		hash_length,
		hash: Some(ContentHash::from_stored("abcdef")),
		left_char: Some('T'),
		right_char: Some(' '),
	}
}

#[test]
fn text_endpoint_field_order() {
	let end = TextEndpoint {
		index: 120,
		length: 5,
		hash_index: 114,
		hash_length: 11,
		hash: Some(ContentHash::from_stored("3fa9c1")),
		left_char: Some(' '),
		right_char: Some('r'),
	};
	assert_eq!(
		encode_endpoint(&end.into()),
		"i:120;hi:114;l:5;hl:11;h:3fa9c1;e:IHI="
	);
}

#[test]
fn text_endpoint_omits_default_window() {
	let mut end = text_end(4, 5, 4, 5);
	end.left_char = Some('q');
	end.right_char = Some('k');
	assert_eq!(encode_endpoint(&end.into()), "i:4;l:5;h:abcdef;e:cWs=");
	assert_eq!(encode_endpoint(&TextEndpoint::unanchored(3, 2).into()), "i:3;l:2");
}

#[test]
fn point_endpoint_rounds_coordinates() {
	let point = PointEndpoint::new(10.5, 220.0, 4.0);
	assert_eq!(encode_endpoint(&point.into()), "p|x:10.5;y:220;r:4");

	let point = PointEndpoint::new(1.23456, -0.0001, 7.9999);
	assert_eq!(encode_endpoint(&point.into()), "p|x:1.235;y:0;r:8");
}

#[test]
fn decode_fills_window_defaults() {
	let end = decode_endpoint("i:4;l:5").unwrap();
	assert_eq!(end, Endpoint::Text(TextEndpoint::unanchored(4, 5)));

	let end = decode_endpoint("t|i:4;hi:0;l:5;hl:10;h:abcdef;e:VCA=").unwrap();
	assert_eq!(end, Endpoint::Text(text_end(4, 5, 0, 10)));
}

#[test]
fn decode_point() {
	let end = decode_endpoint("p|x:10.5;y:-3;r:4").unwrap();
	assert_eq!(end, Endpoint::Point(PointEndpoint::new(10.5, -3.0, 4.0)));
}

#[rstest]
#[case("", LineError::Empty)]
#[case("i:4", LineError::MissingField("l"))]
#[case("l:4;h:abc", LineError::MissingField("i"))]
#[case("i:;l:4", LineError::MissingField("i"))]
#[case("i:x;l:3", LineError::InvalidNumber { key: "i", value: "x".into() })]
#[case("i:-1;l:3", LineError::InvalidNumber { key: "i", value: "-1".into() })]
#[case("i:1;l:2;", LineError::MalformedField(String::new()))]
#[case("i:1:2;l:3", LineError::MalformedField("i:1:2".into()))]
#[case("p|x:1;y:2", LineError::MissingField("r"))]
#[case("p|x:1;y:nan;r:2", LineError::InvalidNumber { key: "y", value: "nan".into() })]
fn malformed_endpoints(#[case] line: &str, #[case] expected: LineError) {
	assert_eq!(decode_endpoint(line), Err(expected));
}

#[test]
fn unknown_fields_are_ignored() {
	let end = decode_endpoint("i:1;zz:9;l:2").unwrap();
	assert_eq!(end.position(), Some((1, 1)));
}

#[test]
fn invalid_boundary_is_ignored() {
	// "abc" is three chars, "!!" is not base64
	for line in ["i:1;l:2;e:YWJj", "i:1;l:2;e:!!"] {
		let end = decode_endpoint(line).unwrap();
		assert_eq!(end.as_text().and_then(TextEndpoint::boundary), None);
	}
}

#[test]
fn right_endpoint_deduplicates_against_left() {
	let link = Link::new(text_end(4, 5, 0, 10), text_end(7, 3, 7, 3));
	let line = encode_link(&link).unwrap();
	assert_eq!(line, "i:4;hi:0;l:5;hl:10;h:abcdef;e:VCA=_i:7;l:3");

	let decoded = decode_link(&line).unwrap();
	assert_eq!(decoded, link);
}

#[test]
fn right_endpoint_keeps_distinct_fingerprint() {
	let mut right = text_end(7, 3, 7, 3);
	right.hash = Some(ContentHash::from_stored("123456"));
	right.right_char = Some('x');
	let link = Link::new(text_end(4, 5, 0, 10), right);
	let line = encode_link(&link).unwrap();
	assert_eq!(line, "i:4;hi:0;l:5;hl:10;h:abcdef;e:VCA=_i:7;l:3;h:123456;e:VHg=");
	assert_eq!(decode_link(&line).unwrap(), link);
}

#[test]
fn point_sides_do_not_backfill() {
	let line = "p|x:1;y:2;r:3_i:7;l:3";
	let link = decode_link(line).unwrap();
	assert_eq!(link.right(), &Endpoint::Text(TextEndpoint::unanchored(7, 3)));
	assert_eq!(encode_link(&link).unwrap(), line);
}

#[test]
fn only_first_alternate_is_read() {
	let link = decode_link("i:1;l:2^i:9;l:9_p|x:1;y:2;r:3^garbage").unwrap();
	assert_eq!(link.left().position(), Some((1, 1)));
	assert_eq!(link.right(), &Endpoint::Point(PointEndpoint::new(1.0, 2.0, 3.0)));
}

#[rstest]
#[case("i:1;l:2")]
#[case("i:1;l:2_i:3;l:4_i:5;l:6")]
fn link_needs_two_sides(#[case] line: &str) {
	assert_eq!(decode_link(line), Err(LineError::MalformedLink));
}

#[test]
fn inverted_links_are_not_encoded() {
	let link = Link::new(text_end(4, 5, 0, 10), text_end(7, 3, 7, 3)).with_inverted(true);
	assert_eq!(encode_link(&link), None);
	assert!(!encode_link_sides(link.left(), link.right()).is_empty());
}

#[test]
fn malformed_lines_are_isolated() {
	let list = "i:1;l:2_i:3;l:4\n\
	            i:5_i:6;l:7\n\
	            \n\
	            p|x:1;y:1;r:1_i:0;l:1\n";
	let links = decode_links(list);
	assert_eq!(links.len(), 2);
	assert_eq!(links[0].left().position(), Some((1, 1)));
	assert!(links[1].left().as_point().is_some());
}

fn arb_text_endpoint() -> impl Strategy<Value = TextEndpoint> {
	(
		0usize..10_000,
		0usize..500,
		0usize..50,
		0usize..50,
		proptest::option::of("[0-9a-f]{6}"),
		proptest::option::of((any::<char>(), any::<char>())),
	)
		.prop_map(|(index, length, before, after, hash, boundary)| TextEndpoint {
			index,
			length,
			hash_index: index.saturating_sub(before),
			hash_length: length + before.min(index) + after,
			hash: hash.map(ContentHash::from_stored),
			left_char: boundary.map(|(left, _)| left),
			right_char: boundary.map(|(_, right)| right),
		})
}

proptest! {
	/// Decoding an encoded text endpoint restores every field.
	#[test]
	fn prop_text_endpoint_roundtrip(end in arb_text_endpoint()) {
		let line = encode_endpoint(&Endpoint::Text(end.clone()));
		prop_assert_eq!(decode_endpoint(&line), Ok(Endpoint::Text(end)));
	}
}
