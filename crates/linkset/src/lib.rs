//! Link-set management for floating links.
//!
//! A host document keeps one [`LinkSet`] per connected document, grouped in
//! [`Connections`]. Each set pairs the persisted original links with an
//! active working copy that integrity checks, repairs and deletions act on
//! until the user commits or reverts.

pub mod config;
pub mod connections;
pub mod error;
pub mod schedule;
pub mod set;

pub use config::{FlinkConfig, ScheduleConfig};
pub use connections::{Connections, DEFAULT_PALETTE};
pub use error::{ConfigError, Result};
pub use schedule::{DEFAULT_DEBOUNCE, RecomputeScheduler};
pub use set::{EndpointRef, Health, LinkSet, RepairReport, SideHealth};
