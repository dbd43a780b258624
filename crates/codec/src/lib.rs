//! Serialization of floating links.
//!
//! Links are persisted inside a host document's connection block, one line
//! per link. This crate owns every encoding of that data:
//!
//! - [`line`]: the compact `key:value` line grammar for endpoints and links.
//! - [`object`]: the structured object form of endpoints and links.
//! - [`connections`]: per-document link lists as a `<connections>` block or
//!   as JSON.
//!
//! Decoding is fault isolated per line: a malformed line is dropped and
//! logged, the rest of the list still decodes.

pub mod connections;
pub mod error;
pub mod line;
pub mod object;

pub use connections::{
	ConnectionFormat, ConnectionRecord, decode_block, decode_connections, decode_json, encode_block,
	encode_json, encode_record,
};
pub use error::{CodecError, LineError, Result};
pub use line::{decode_endpoint, decode_link, decode_links, encode_endpoint, encode_link, encode_link_sides};
pub use object::{EndpointObject, LinkObject};
