//! Core types for floating links: flattened text, content hashes, endpoints and links.

/// Link endpoint types: text spans and 2D points.
pub mod endpoint;
/// Short content hashes used as anchor fingerprints.
pub mod hash;
/// Links between two endpoints and their runtime flags.
pub mod link;
/// Flattened document text and char-indexed views over it.
pub mod text;

pub use endpoint::{Endpoint, PointEndpoint, TextEndpoint};
pub use hash::{ContentHash, SHORT_HASH_LEN};
pub use link::{Link, LinkFlags, Side};
pub use ropey::Rope;
pub use text::{CharIdx, CharLen, FlatText, TextSource};
