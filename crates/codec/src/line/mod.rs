//! The compact line grammar.
//!
//! An endpoint is an optional type prefix (`p|` for points, `t|` or nothing
//! for text) followed by `;`-separated `key:value` fields:
//!
//! ```text
//! i:120;hi:114;l:5;hl:11;h:3fa9c1;e:IHI=
//! p|x:10.5;y:220;r:4
//! ```
//!
//! Text fields are `i` (index), `hi` (window start, omitted when equal to
//! `i`), `l` (length), `hl` (window length, omitted when equal to `l`), `h`
//! (hash) and `e` (base64 of the two boundary chars). A link is
//! `<left>_<right>`, each side optionally listing `^`-separated alternates.

mod endpoint;
mod link;

#[cfg(test)]
mod tests;

pub use endpoint::{decode_endpoint, encode_endpoint};
pub(crate) use link::decode_link_lines;
pub use link::{decode_link, decode_links, encode_link, encode_link_sides};
