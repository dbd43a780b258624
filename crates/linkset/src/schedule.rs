//! Debounced recompute requests.
//!
//! Content mutations, document switches and render ticks all ask for the
//! link sets of a source to be re-checked. Requests for the same source
//! coalesce: a new request cancels the pending one and restarts the delay.

use std::time::{Duration, Instant};

use tracing::trace;

/// Default delay between the last request and the recompute.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Cancel-and-reschedule debouncer keyed by source.
///
/// Holds at most one pending deadline per source. The caller owns the
/// scheduler and drives it with explicit instants, typically from its tick.
#[derive(Debug, Clone)]
pub struct RecomputeScheduler<K> {
	debounce: Duration,
	pending: Vec<(K, Instant)>,
}

impl<K: PartialEq> Default for RecomputeScheduler<K> {
	fn default() -> Self {
		Self::new(DEFAULT_DEBOUNCE)
	}
}

impl<K: PartialEq> RecomputeScheduler<K> {
	pub fn new(debounce: Duration) -> Self {
		Self {
			debounce,
			pending: Vec::new(),
		}
	}

	pub fn debounce(&self) -> Duration {
		self.debounce
	}

	/// Requests a recompute of `source`, replacing any pending request.
	pub fn schedule(&mut self, source: K, now: Instant) {
		let deadline = now + self.debounce;
		match self.pending.iter_mut().find(|(key, _)| *key == source) {
			Some((_, due)) => {
				trace!("rescheduled recompute");
				*due = deadline;
			}
			None => self.pending.push((source, deadline)),
		}
	}

	/// Drops the pending request for `source`. Returns true if there was one.
	pub fn cancel(&mut self, source: &K) -> bool {
		let before = self.pending.len();
		self.pending.retain(|(key, _)| key != source);
		self.pending.len() != before
	}

	pub fn is_pending(&self, source: &K) -> bool {
		self.pending.iter().any(|(key, _)| key == source)
	}

	/// Returns the earliest pending deadline.
	pub fn next_deadline(&self) -> Option<Instant> {
		self.pending.iter().map(|(_, due)| *due).min()
	}

	/// Removes and returns every source whose deadline has passed, in the
	/// order they were first requested.
	pub fn take_due(&mut self, now: Instant) -> Vec<K> {
		let (due, waiting): (Vec<_>, Vec<_>) = self.pending.drain(..).partition(|(_, due)| *due <= now);
		self.pending = waiting;
		due.into_iter().map(|(key, _)| key).collect()
	}

	pub fn len(&self) -> usize {
		self.pending.len()
	}

	pub fn is_empty(&self) -> bool {
		self.pending.is_empty()
	}
}
