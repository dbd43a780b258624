//! Anchoring engine for floating-link text endpoints.
//!
//! A text endpoint stores its linked span together with a fingerprint: an
//! anchor window that was unique in the document when the link was made, a
//! short hash of that window, and the window's first and last characters.
//! Documents are unversioned, so the fingerprint is the only way to tell
//! whether the span still points at the same content.
//!
//! - [`fingerprint`] derives a minimal unique anchor window for a span.
//! - [`integrity`] classifies a stored endpoint against the current text.
//! - [`repair`] searches the current text for the fingerprinted window and
//!   relocates the endpoint when it moved.

pub mod error;
pub mod fingerprint;
pub mod integrity;
pub mod options;
pub mod repair;

pub use error::{AnchorError, Result};
pub use fingerprint::{Fingerprint, anchor_text_endpoint, fingerprint, stamp_endpoint};
pub use integrity::{BreakKind, EndpointStatus, check_endpoint, check_text_endpoint};
pub use options::{AnchorOptions, OutOfBoundsPolicy, RepairOptions};
pub use repair::{Relocation, repair, repair_endpoint};
