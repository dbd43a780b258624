use bitflags::bitflags;

use crate::endpoint::Endpoint;

/// Which document of a pair an endpoint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
	/// The host document (the one whose connection block stores the link).
	Left,
	/// The connected document.
	Right,
}

impl Side {
	/// Both sides, left first.
	pub const ALL: [Side; 2] = [Side::Left, Side::Right];

	/// Returns the other side.
	pub fn opposite(self) -> Self {
		match self {
			Self::Left => Self::Right,
			Self::Right => Self::Left,
		}
	}
}

bitflags! {
	/// Transient runtime state of a link.
	///
	/// None of these flags are persisted; they are recomputed from the live
	/// document text by integrity checks and cleared by repairs.
	#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
	pub struct LinkFlags: u8 {
		/// Left fingerprint no longer matches the left document.
		const LEFT_BROKEN         = 0b0000_0001;
		/// Right fingerprint no longer matches the right document.
		const RIGHT_BROKEN        = 0b0000_0010;
		/// Left span extends past the end of the left document.
		const LEFT_OUT_OF_BOUNDS  = 0b0000_0100;
		/// Right span extends past the end of the right document.
		const RIGHT_OUT_OF_BOUNDS = 0b0000_1000;
		/// Link is selected by the user.
		const SELECTED            = 0b0001_0000;
	}
}

impl LinkFlags {
	/// Returns the broken flag for `side`.
	pub fn broken(side: Side) -> Self {
		match side {
			Side::Left => Self::LEFT_BROKEN,
			Side::Right => Self::RIGHT_BROKEN,
		}
	}

	/// Returns the out-of-bounds flag for `side`.
	pub fn out_of_bounds(side: Side) -> Self {
		match side {
			Side::Left => Self::LEFT_OUT_OF_BOUNDS,
			Side::Right => Self::RIGHT_OUT_OF_BOUNDS,
		}
	}

	/// Returns both integrity flags for `side`.
	pub fn integrity(side: Side) -> Self {
		Self::broken(side) | Self::out_of_bounds(side)
	}
}

/// A floating link between an endpoint in the host document (left) and an
/// endpoint in a connected document (right).
///
/// An inverted link was loaded from the connected document's point of view:
/// its ends are already swapped into host orientation, and it is not written
/// back into the host's connection block.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
	left: Endpoint,
	right: Endpoint,
	inverted: bool,
	flags: LinkFlags,
}

impl Link {
	/// Creates a link in host orientation.
	pub fn new(left: impl Into<Endpoint>, right: impl Into<Endpoint>) -> Self {
		Self {
			left: left.into(),
			right: right.into(),
			inverted: false,
			flags: LinkFlags::empty(),
		}
	}

	/// Returns this link with the inverted marker set or cleared.
	pub fn with_inverted(mut self, inverted: bool) -> Self {
		self.inverted = inverted;
		self
	}

	/// Returns the left endpoint.
	#[inline]
	pub fn left(&self) -> &Endpoint {
		&self.left
	}

	/// Returns the right endpoint.
	#[inline]
	pub fn right(&self) -> &Endpoint {
		&self.right
	}

	/// Returns the endpoint on `side`.
	pub fn endpoint(&self, side: Side) -> &Endpoint {
		match side {
			Side::Left => &self.left,
			Side::Right => &self.right,
		}
	}

	/// Returns the endpoint on `side` mutably.
	///
	/// Only coordinates are expected to change; replacing an endpoint's
	/// variant changes the link's shape.
	pub fn endpoint_mut(&mut self, side: Side) -> &mut Endpoint {
		match side {
			Side::Left => &mut self.left,
			Side::Right => &mut self.right,
		}
	}

	/// Returns true if the link was loaded from the other document's view.
	#[inline]
	pub fn is_inverted(&self) -> bool {
		self.inverted
	}

	/// Returns the current runtime flags.
	#[inline]
	pub fn flags(&self) -> LinkFlags {
		self.flags
	}

	/// Sets or clears `flags`.
	pub fn set_flags(&mut self, flags: LinkFlags, value: bool) {
		self.flags.set(flags, value);
	}

	/// Returns true if the endpoint on `side` is broken.
	pub fn is_broken(&self, side: Side) -> bool {
		self.flags.contains(LinkFlags::broken(side))
	}

	/// Returns true if the endpoint on `side` is out of bounds.
	pub fn is_out_of_bounds(&self, side: Side) -> bool {
		self.flags.contains(LinkFlags::out_of_bounds(side))
	}

	/// Returns true if the endpoint on `side` is broken or out of bounds.
	pub fn needs_repair(&self, side: Side) -> bool {
		self.flags.intersects(LinkFlags::integrity(side))
	}

	/// Returns true if the user selected this link.
	#[inline]
	pub fn is_selected(&self) -> bool {
		self.flags.contains(LinkFlags::SELECTED)
	}

	/// Marks the link as selected or not.
	pub fn set_selected(&mut self, selected: bool) {
		self.flags.set(LinkFlags::SELECTED, selected);
	}
}
