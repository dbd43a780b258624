//! Structured object form of endpoints and links.
//!
//! The same data as the line grammar, shaped for JSON-like hosts:
//! `{"t":"t","i":4,"l":5,"h":"…","ll":"q","rl":"k"}` for text spans and
//! `{"t":"p","x":1.5,"y":2,"r":4}` for points. Links hold a list of
//! alternates per side, of which only the first is interpreted.

use flink_primitives::{ContentHash, Endpoint, Link, PointEndpoint, TextEndpoint};
use serde::{Deserialize, Serialize};

/// One endpoint in object form, tagged by `t`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum EndpointObject {
	/// A text span. `hi`/`hl` default to `i`/`l` when absent.
	#[serde(rename = "t")]
	Text {
		i: usize,
		l: usize,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		hi: Option<usize>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		hl: Option<usize>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		h: Option<String>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		ll: Option<char>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		rl: Option<char>,
	},
	/// A point pick.
	#[serde(rename = "p")]
	Point { x: f64, y: f64, r: f64 },
}

impl From<&Endpoint> for EndpointObject {
	fn from(endpoint: &Endpoint) -> Self {
		match endpoint {
			Endpoint::Text(end) => Self::Text {
				i: end.index,
				l: end.length,
				hi: (end.hash_index != end.index).then_some(end.hash_index),
				hl: (end.hash_length != end.length).then_some(end.hash_length),
				h: end
					.hash
					.as_ref()
					.filter(|hash| !hash.is_empty())
					.map(|hash| hash.as_str().to_string()),
				ll: end.left_char,
				rl: end.right_char,
			},
			Endpoint::Point(point) => Self::Point {
				x: point.x,
				y: point.y,
				r: point.radius,
			},
		}
	}
}

impl From<EndpointObject> for Endpoint {
	fn from(object: EndpointObject) -> Self {
		match object {
			EndpointObject::Text { i, l, hi, hl, h, ll, rl } => Endpoint::Text(TextEndpoint {
				index: i,
				length: l,
				hash_index: hi.unwrap_or(i),
				// A zero window length reads as the span length.
				hash_length: hl.filter(|&hl| hl != 0).unwrap_or(l),
				hash: h.filter(|h| !h.is_empty()).map(ContentHash::from_stored),
				left_char: ll,
				right_char: rl,
			}),
			EndpointObject::Point { x, y, r } => Endpoint::Point(PointEndpoint::new(x, y, r)),
		}
	}
}

/// A link in object form: alternates for the left (`l`) and right (`r`) ends.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LinkObject {
	pub l: Vec<EndpointObject>,
	pub r: Vec<EndpointObject>,
}

impl LinkObject {
	/// Converts a link to object form in the orientation of the document that
	/// owns it, swapping the ends of an inverted link back.
	pub fn from_link(link: &Link) -> Self {
		let (left, right) = if link.is_inverted() {
			(link.right(), link.left())
		} else {
			(link.left(), link.right())
		};
		Self {
			l: vec![left.into()],
			r: vec![right.into()],
		}
	}

	/// Builds a link from the first alternate of each side.
	///
	/// With `inverted` set the object is read from the other document's
	/// point of view: ends are swapped into host orientation and the link is
	/// marked inverted. Returns `None` if either side has no alternates.
	pub fn into_link(self, inverted: bool) -> Option<Link> {
		let left: Endpoint = self.l.into_iter().next()?.into();
		let right: Endpoint = self.r.into_iter().next()?.into();
		let link = if inverted {
			Link::new(right, left)
		} else {
			Link::new(left, right)
		};
		Some(link.with_inverted(inverted))
	}
}

impl From<&Link> for LinkObject {
	fn from(link: &Link) -> Self {
		Self::from_link(link)
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;

	fn anchored() -> TextEndpoint {
		TextEndpoint {
			index: 4,
			length: 5,
			hash_index: 0,
			hash_length: 10,
			hash: Some(ContentHash::from_stored("abcdef")),
			left_char: Some('T'),
			right_char: Some(' '),
		}
	}

	#[test]
	fn text_object_omits_defaults() {
		let object = EndpointObject::from(&Endpoint::from(TextEndpoint::unanchored(3, 2)));
		assert_eq!(serde_json::to_value(&object).unwrap(), json!({"t": "t", "i": 3, "l": 2}));

		let object = EndpointObject::from(&Endpoint::from(anchored()));
		assert_eq!(
			serde_json::to_value(&object).unwrap(),
			json!({"t": "t", "i": 4, "l": 5, "hi": 0, "hl": 10, "h": "abcdef", "ll": "T", "rl": " "})
		);
	}

	#[test]
	fn point_object() {
		let object: EndpointObject = serde_json::from_value(json!({"t": "p", "x": 1.5, "y": 2, "r": 4})).unwrap();
		assert_eq!(Endpoint::from(object), Endpoint::Point(PointEndpoint::new(1.5, 2.0, 4.0)));
	}

	#[test]
	fn zero_window_length_means_span_length() {
		let object: EndpointObject = serde_json::from_value(json!({"t": "t", "i": 7, "l": 3, "hl": 0})).unwrap();
		assert_eq!(Endpoint::from(object), Endpoint::Text(TextEndpoint::unanchored(7, 3)));
	}

	#[test]
	fn unknown_tag_is_rejected() {
		assert!(serde_json::from_value::<EndpointObject>(json!({"t": "q", "i": 1})).is_err());
	}

	#[test]
	fn inverted_link_is_written_in_owner_orientation() {
		let point = PointEndpoint::new(1.0, 2.0, 3.0);
		let link = Link::new(anchored(), point).with_inverted(true);

		let object = LinkObject::from_link(&link);
		assert_eq!(object.l, vec![EndpointObject::Point { x: 1.0, y: 2.0, r: 3.0 }]);

		let back = object.into_link(true).unwrap();
		assert_eq!(back, link);
	}

	#[test]
	fn only_first_alternate_is_used() {
		let object: LinkObject = serde_json::from_value(json!({
			"l": [{"t": "t", "i": 1, "l": 2}, {"t": "t", "i": 9, "l": 9}],
			"r": [{"t": "p", "x": 0, "y": 0, "r": 1}],
		}))
		.unwrap();
		let link = object.into_link(false).unwrap();
		assert_eq!(link.left().position(), Some((1, 1)));
		assert!(!link.is_inverted());
	}

	#[test]
	fn empty_side_yields_no_link() {
		let object = LinkObject {
			l: vec![],
			r: vec![EndpointObject::Point { x: 0.0, y: 0.0, r: 1.0 }],
		};
		assert_eq!(object.into_link(false), None);
	}
}
