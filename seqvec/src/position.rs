//! Lightweight positional references into a [`SeqVec`](crate::SeqVec) buffer.
//!
//! A [`Position`] is a signed slot index tagged with the generation of the
//! buffer that issued it. It does not borrow the container; instead every
//! operation that consumes a position checks the generation first and rejects
//! positions from a reallocated buffer with
//! [`ContainerError::StalePosition`](crate::ContainerError::StalePosition).
//!
//! Arithmetic and comparisons never look at the container, so a position may
//! be moved outside `[begin, end]` freely; it is only validated when used.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Sub, SubAssign};

mod sealed {
    pub trait Sealed {}
}

/// Capability level of a [`Position`].
pub trait Access: sealed::Sealed {}

/// Capability marker for positions that may be used to write.
#[derive(Debug, Clone, Copy)]
pub struct Writable;

/// Capability marker for positions that may only be used to read.
#[derive(Debug, Clone, Copy)]
pub struct ReadOnly;

impl sealed::Sealed for Writable {}
impl sealed::Sealed for ReadOnly {}
impl Access for Writable {}
impl Access for ReadOnly {}

/// A slot reference into the current buffer of a `SeqVec`.
pub struct Position<A: Access = Writable> {
    slot: isize,
    generation: u64,
    _access: PhantomData<fn() -> A>,
}

/// Read/write position.
pub type Pos = Position<Writable>;

/// Read-only position.
pub type ConstPos = Position<ReadOnly>;

impl<A: Access> Position<A> {
    pub(crate) fn new(slot: isize, generation: u64) -> Self {
        Self {
            slot,
            generation,
            _access: PhantomData,
        }
    }

    /// Slot index this position refers to, relative to the start of the buffer.
    pub fn slot(&self) -> isize {
        self.slot
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Drops write capability.
    pub fn as_const(self) -> ConstPos {
        Position::new(self.slot, self.generation)
    }

    /// Signed distance `self - origin`, or `None` when the two positions were
    /// issued for different buffers.
    pub fn checked_distance<B: Access>(&self, origin: &Position<B>) -> Option<isize> {
        (self.generation == origin.generation).then(|| self.slot - origin.slot)
    }
}

impl<A: Access> Clone for Position<A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A: Access> Copy for Position<A> {}

impl<A: Access> std::fmt::Debug for Position<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Position")
            .field("slot", &self.slot)
            .field("generation", &self.generation)
            .finish()
    }
}

impl From<Pos> for ConstPos {
    fn from(pos: Pos) -> Self {
        pos.as_const()
    }
}

impl<A: Access, B: Access> PartialEq<Position<B>> for Position<A> {
    fn eq(&self, other: &Position<B>) -> bool {
        self.generation == other.generation && self.slot == other.slot
    }
}

impl<A: Access> Eq for Position<A> {}

/// Positions from different buffers are unordered.
impl<A: Access, B: Access> PartialOrd<Position<B>> for Position<A> {
    fn partial_cmp(&self, other: &Position<B>) -> Option<Ordering> {
        (self.generation == other.generation).then(|| self.slot.cmp(&other.slot))
    }
}

impl<A: Access> Hash for Position<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.generation.hash(state);
        self.slot.hash(state);
    }
}

impl<A: Access> Add<isize> for Position<A> {
    type Output = Self;

    fn add(self, n: isize) -> Self {
        Self::new(self.slot + n, self.generation)
    }
}

impl<A: Access> Sub<isize> for Position<A> {
    type Output = Self;

    fn sub(self, n: isize) -> Self {
        Self::new(self.slot - n, self.generation)
    }
}

impl<A: Access> AddAssign<isize> for Position<A> {
    fn add_assign(&mut self, n: isize) {
        self.slot += n;
    }
}

impl<A: Access> SubAssign<isize> for Position<A> {
    fn sub_assign(&mut self, n: isize) {
        self.slot -= n;
    }
}

/// Slot distance between two positions. The result is meaningless when the
/// positions come from different buffers; use [`Position::checked_distance`]
/// to detect that case.
impl<A: Access, B: Access> Sub<Position<B>> for Position<A> {
    type Output = isize;

    fn sub(self, origin: Position<B>) -> isize {
        debug_assert_eq!(self.generation, origin.generation, "positions from different buffers");
        self.slot - origin.slot
    }
}
