//! A contiguous, growable sequence whose capacity is always a power of two.
//!
//! [`SeqVec`] owns one block of storage in which every slot, used or spare, is
//! initialised. Growing reallocates to the next power of two; nothing shrinks
//! the block except an explicit [`SeqVec::shrink_to_fit`]. Lowering the
//! length through [`SeqVec::resize`] or [`SeqVec::clear`] leaves the old values
//! in their slots, and raising it again without a reallocation exposes them.
//!
//! Positional operations take [`Position`] handles, which are checked against
//! the generation of the current buffer when used.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::ops::{Deref, DerefMut};

use log::{debug, trace};

mod capacity;
mod error;
pub mod position;
mod raw;

pub use capacity::{MIN_CAPACITY, round_up_capacity, try_round_up_capacity};
pub use error::{ContainerError, SeqResult};
pub use position::{Access, ConstPos, Pos, Position, ReadOnly, Writable};

use capacity::capacity_overflow;
use raw::RawBuf;

/// Builds a [`SeqVec`] from a literal list, like `vec!`.
///
/// ```
/// use seqvec::seqvec;
///
/// let v = seqvec![1, 2, 3];
/// assert_eq!(v.len(), 3);
/// assert_eq!(v.capacity(), 4);
///
/// let zeros = seqvec![0u8; 5];
/// assert_eq!(zeros.as_slice(), &[0; 5]);
/// ```
#[macro_export]
macro_rules! seqvec {
    () => {
        $crate::SeqVec::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::SeqVec::from_elem($elem, $n)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::SeqVec::from([$($x),+])
    };
}

/// Contiguous growable sequence with power-of-two capacity (minimum 2).
pub struct SeqVec<T> {
    buf: RawBuf<T>,
    len: usize,
}

impl<T: Default> SeqVec<T> {
    /// Creates an empty sequence with the minimum capacity of 2.
    pub fn new() -> Self {
        Self::with_len(0)
    }

    /// Creates a sequence of `len` default values.
    ///
    /// # Panics
    ///
    /// Panics if the capacity for `len` overflows.
    #[track_caller]
    pub fn with_len(len: usize) -> Self {
        match Self::allocate(len) {
            Ok(v) => v,
            Err(err) => capacity_overflow(err),
        }
    }

    /// Creates a sequence of `len` default values from a signed length.
    ///
    /// Negative lengths are rejected with [`ContainerError::InvalidLength`].
    pub fn try_with_len(len: isize) -> SeqResult<Self> {
        let len = usize::try_from(len).map_err(|_| ContainerError::InvalidLength(len))?;
        Self::allocate(len)
    }

    fn allocate(len: usize) -> SeqResult<Self> {
        let cap = try_round_up_capacity(len)?;
        Ok(Self {
            buf: RawBuf::filled(cap)?,
            len,
        })
    }

    /// Sets the length to `new_len`, reallocating when it exceeds the capacity.
    ///
    /// Slots that become part of the sequence without a reallocation keep the
    /// value they last held; use [`SeqVec::resize_default`] to reset them.
    ///
    /// # Panics
    ///
    /// Panics if the capacity for `new_len` overflows.
    #[track_caller]
    pub fn resize(&mut self, new_len: usize) {
        if let Err(err) = self.try_resize(new_len) {
            capacity_overflow(err);
        }
    }

    /// Fallible form of [`SeqVec::resize`].
    pub fn try_resize(&mut self, new_len: usize) -> SeqResult<()> {
        if new_len > self.buf.capacity() {
            self.reallocate(try_round_up_capacity(new_len)?)?;
        }
        self.len = new_len;
        Ok(())
    }

    /// Like [`SeqVec::resize`], but every newly exposed slot holds `T::default()`.
    #[track_caller]
    pub fn resize_default(&mut self, new_len: usize) {
        let old_len = self.len;
        self.resize(new_len);
        if new_len > old_len {
            self.buf.slots_mut()[old_len..new_len].fill_with(T::default);
        }
    }

    /// Shortens the sequence to `len`, resetting the removed slots to
    /// `T::default()`. Does nothing if `len >= self.len()`.
    pub fn truncate(&mut self, len: usize) {
        if len < self.len {
            self.buf.slots_mut()[len..self.len].fill_with(T::default);
            self.len = len;
        }
    }

    /// Resets every spare slot `[len, capacity)` to `T::default()`.
    pub fn scrub_spare(&mut self) {
        let len = self.len;
        self.buf.slots_mut()[len..].fill_with(T::default);
    }

    /// Makes room for at least `additional` more elements.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity overflows.
    #[track_caller]
    pub fn reserve(&mut self, additional: usize) {
        if let Err(err) = self.try_reserve(additional) {
            capacity_overflow(err);
        }
    }

    /// Fallible form of [`SeqVec::reserve`].
    pub fn try_reserve(&mut self, additional: usize) -> SeqResult<()> {
        let required = self
            .len
            .checked_add(additional)
            .ok_or(ContainerError::CapacityOverflow(usize::MAX))?;
        if required > self.buf.capacity() {
            self.reallocate(try_round_up_capacity(required)?)?;
        }
        Ok(())
    }

    /// Reallocates to the smallest power-of-two capacity holding the current
    /// length. Invalidates every outstanding position when it reallocates.
    pub fn shrink_to_fit(&mut self) {
        let target = round_up_capacity(self.len);
        if target < self.buf.capacity() {
            // A layout smaller than the current one is always valid.
            if let Err(err) = self.reallocate(target) {
                capacity_overflow(err);
            }
        }
    }

    fn reallocate(&mut self, new_cap: usize) -> SeqResult<()> {
        let mut fresh = RawBuf::filled(new_cap)?;
        let len = self.len;
        fresh.slots_mut()[..len].swap_with_slice(&mut self.buf.slots_mut()[..len]);
        debug!(
            "seqvec reallocated: capacity {} -> {} (len {len})",
            self.buf.capacity(),
            new_cap
        );
        self.buf = fresh;
        Ok(())
    }

    #[track_caller]
    fn grow_by(&mut self, count: usize) {
        match self.len.checked_add(count) {
            Some(new_len) => self.resize(new_len),
            None => capacity_overflow(ContainerError::CapacityOverflow(usize::MAX)),
        }
    }

    /// Appends `value`.
    pub fn push_back(&mut self, value: T) {
        let slot = self.len;
        self.grow_by(1);
        self.buf.slots_mut()[slot] = value;
    }

    /// Prepends `value`, shifting every element one slot toward the back. O(n).
    pub fn push_front(&mut self, value: T) {
        self.grow_by(1);
        self.shift_toward_back(0, 1);
        self.buf.slots_mut()[0] = value;
    }

    /// Removes the last element and returns it, leaving `T::default()` in the
    /// vacated slot.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(mem::take(&mut self.buf.slots_mut()[self.len]))
    }

    /// Removes the first element and returns it, shifting the rest one slot
    /// toward the front. O(n).
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let value = mem::take(&mut self.buf.slots_mut()[0]);
        self.shift_toward_front(0, 1);
        self.len -= 1;
        Some(value)
    }

    /// Inserts `value` before `pos` and returns a position to it.
    ///
    /// On an empty sequence `pos` is ignored and the result is the
    /// single-element sequence `[value]`.
    pub fn insert(&mut self, pos: Pos, value: T) -> SeqResult<Pos> {
        if self.is_empty() {
            self.resize(1);
            self.buf.slots_mut()[0] = value;
            return Ok(self.begin());
        }

        let at = self.gap_slot(pos)?;
        self.grow_by(1);
        self.shift_toward_back(at, 1);
        self.buf.slots_mut()[at] = value;
        Ok(self.pos_at(at))
    }

    /// Removes the element at `pos` and returns a position to the element that
    /// followed it. Does nothing on an empty sequence.
    pub fn erase(&mut self, pos: Pos) -> SeqResult<Pos> {
        if self.is_empty() {
            return Ok(self.begin());
        }

        let at = self.element_slot(pos)?;
        self.remove_slots(at, 1);
        Ok(self.pos_at(at))
    }

    /// Removes the elements in `[first, last)` and returns a position to the
    /// element that followed them. Does nothing on an empty sequence.
    pub fn erase_range(&mut self, first: Pos, last: Pos) -> SeqResult<Pos> {
        if self.is_empty() {
            return Ok(self.begin());
        }

        let (start, end) = self.slot_range(first.as_const(), last.as_const())?;
        self.remove_slots(start, end - start);
        Ok(self.pos_at(start))
    }

    fn remove_slots(&mut self, at: usize, count: usize) {
        if count == 0 {
            return;
        }
        self.shift_toward_front(at, count);
        let new_len = self.len - count;
        // The erased values were shifted to the tail; drop them now.
        self.buf.slots_mut()[new_len..self.len].fill_with(T::default);
        self.len = new_len;
    }
}

impl<T: Clone + Default> SeqVec<T> {
    /// Creates a sequence of `n` clones of `elem`.
    pub fn from_elem(elem: T, n: usize) -> Self {
        let mut v = Self::with_len(n);
        v.as_mut_slice().fill(elem);
        v
    }

    /// Creates a sequence holding a copy of `src[first..last]`.
    pub fn from_range<A: Access, B: Access>(
        src: &SeqVec<T>,
        first: Position<A>,
        last: Position<B>,
    ) -> SeqResult<Self> {
        Ok(Self::from(src.range(first, last)?))
    }

    /// Replaces the contents with a copy of `items`.
    ///
    /// Resizes to `items.len()` first, then clones element by element.
    pub fn assign(&mut self, items: &[T]) {
        self.resize(items.len());
        self.as_mut_slice().clone_from_slice(items);
    }

    /// Inserts `count` clones of `value` before `pos` and returns a position to
    /// the first of them.
    pub fn insert_n(&mut self, pos: Pos, count: usize, value: T) -> SeqResult<Pos> {
        let at = self.open_gap(pos, count)?;
        self.buf.slots_mut()[at..at + count].fill(value);
        Ok(self.pos_at(at))
    }

    /// Inserts a copy of `items`, in order, before `pos` and returns a position
    /// to the first inserted element.
    pub fn insert_slice(&mut self, pos: Pos, items: &[T]) -> SeqResult<Pos> {
        let at = self.open_gap(pos, items.len())?;
        self.buf.slots_mut()[at..at + items.len()].clone_from_slice(items);
        Ok(self.pos_at(at))
    }

    /// Inserts a copy of `src[first..last]` before `pos`.
    pub fn insert_range<A: Access, B: Access>(
        &mut self,
        pos: Pos,
        src: &SeqVec<T>,
        first: Position<A>,
        last: Position<B>,
    ) -> SeqResult<Pos> {
        self.insert_slice(pos, src.range(first, last)?)
    }

    /// Returns a new sequence holding a copy of `[first, last)`. The source is
    /// left untouched.
    pub fn slice<A: Access, B: Access>(
        &self,
        first: Position<A>,
        last: Position<B>,
    ) -> SeqResult<Self> {
        Self::from_range(self, first, last)
    }

    /// Grows the length by `count` and moves the tail starting at `pos` out of
    /// the way. The position is resolved to an offset before growing since
    /// growth may reallocate.
    fn open_gap(&mut self, pos: Pos, count: usize) -> SeqResult<usize> {
        let at = self.gap_slot(pos)?;
        if count > 0 {
            self.len
                .checked_add(count)
                .ok_or(ContainerError::CapacityOverflow(usize::MAX))
                .and_then(|new_len| self.try_resize(new_len))?;
            self.shift_toward_back(at, count);
        }
        Ok(at)
    }
}

impl<T> SeqVec<T> {
    /// Number of elements in the sequence.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots; always a power of two, at least 2.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.buf.slots()[..self.len]
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len;
        &mut self.buf.slots_mut()[..len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Sets the length to zero. Capacity and slot contents are left as they are.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Checked access: [`ContainerError::OutOfRange`] unless `index < len`.
    pub fn at(&self, index: usize) -> SeqResult<&T> {
        let len = self.len;
        self.as_slice()
            .get(index)
            .ok_or(ContainerError::OutOfRange { index, len })
    }

    /// Checked mutable access.
    pub fn at_mut(&mut self, index: usize) -> SeqResult<&mut T> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(ContainerError::OutOfRange { index, len })
    }

    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Position of the first element.
    pub fn begin(&self) -> Pos {
        self.pos_at(0)
    }

    /// Position one past the last element.
    pub fn end(&self) -> Pos {
        self.pos_at(self.len)
    }

    pub fn cbegin(&self) -> ConstPos {
        self.begin().as_const()
    }

    pub fn cend(&self) -> ConstPos {
        self.end().as_const()
    }

    fn pos_at(&self, slot: usize) -> Pos {
        // Slots never exceed `isize::MAX`: no allocation is larger than that.
        Position::new(slot as isize, self.buf.generation())
    }

    /// Reads the element at `pos`.
    pub fn get_at<A: Access>(&self, pos: Position<A>) -> SeqResult<&T> {
        let at = self.element_slot(pos)?;
        Ok(&self.buf.slots()[at])
    }

    /// Writes through `pos`; only read/write positions are accepted.
    pub fn get_mut_at(&mut self, pos: Pos) -> SeqResult<&mut T> {
        let at = self.element_slot(pos)?;
        Ok(&mut self.buf.slots_mut()[at])
    }

    /// Borrows `[first, last)` as a slice.
    pub fn range<A: Access, B: Access>(
        &self,
        first: Position<A>,
        last: Position<B>,
    ) -> SeqResult<&[T]> {
        let (start, end) = self.slot_range(first, last)?;
        Ok(&self.as_slice()[start..end])
    }

    /// Reverses the order of the elements in place.
    pub fn reverse(&mut self) {
        let slots = self.as_mut_slice();
        let (mut lo, mut hi) = (0, slots.len());
        while lo + 1 < hi {
            hi -= 1;
            slots.swap(lo, hi);
            lo += 1;
        }
    }

    /// Exchanges the buffers of two sequences without touching any element.
    /// Positions follow their buffer.
    pub fn swap(&mut self, other: &mut SeqVec<T>) {
        mem::swap(self, other);
    }

    fn check_generation<A: Access>(&self, pos: &Position<A>) -> SeqResult<()> {
        if pos.generation() == self.buf.generation() {
            Ok(())
        } else {
            Err(ContainerError::StalePosition)
        }
    }

    /// Resolves a position that must address an element, `[0, len)`.
    fn element_slot<A: Access>(&self, pos: Position<A>) -> SeqResult<usize> {
        self.check_generation(&pos)?;
        usize::try_from(pos.slot())
            .ok()
            .filter(|&at| at < self.len)
            .ok_or(ContainerError::InvalidPosition {
                slot: pos.slot(),
                len: self.len,
            })
    }

    /// Resolves a position that may also be `end()`, `[0, len]`.
    fn gap_slot<A: Access>(&self, pos: Position<A>) -> SeqResult<usize> {
        self.check_generation(&pos)?;
        usize::try_from(pos.slot())
            .ok()
            .filter(|&at| at <= self.len)
            .ok_or(ContainerError::InvalidPosition {
                slot: pos.slot(),
                len: self.len,
            })
    }

    fn slot_range<A: Access, B: Access>(
        &self,
        first: Position<A>,
        last: Position<B>,
    ) -> SeqResult<(usize, usize)> {
        self.check_generation(&first)?;
        self.check_generation(&last)?;
        if first.slot() > last.slot() {
            return Err(ContainerError::InvalidRange {
                first: first.slot(),
                last: last.slot(),
            });
        }
        Ok((self.gap_slot(first)?, self.gap_slot(last)?))
    }

    /// Moves `[at, len - count)` to `[at + count, len)`, walking from the tail
    /// down so no element is overwritten before it has moved. Whatever sat in
    /// `[len - count, len)` ends up in the gap `[at, at + count)`.
    fn shift_toward_back(&mut self, at: usize, count: usize) {
        trace!("seqvec shift back: at {at}, by {count}, len {}", self.len);
        let len = self.len;
        let slots = self.buf.slots_mut();
        for i in (at + count..len).rev() {
            slots.swap(i, i - count);
        }
    }

    /// Moves `[at + count, len)` to `[at, len - count)`, walking from the head
    /// up. The `count` displaced values end up at the tail.
    fn shift_toward_front(&mut self, at: usize, count: usize) {
        trace!("seqvec shift front: at {at}, by {count}, len {}", self.len);
        let len = self.len;
        let slots = self.buf.slots_mut();
        for i in at..len - count {
            slots.swap(i, i + count);
        }
    }
}

impl<T: Default> Default for SeqVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Default> Clone for SeqVec<T> {
    fn clone(&self) -> Self {
        Self::from(self.as_slice())
    }

    fn clone_from(&mut self, source: &Self) {
        self.assign(source.as_slice());
    }
}

impl<T: PartialEq> PartialEq for SeqVec<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.len != other.len {
            return false;
        }
        for (a, b) in self.iter().zip(other.iter()) {
            if a != b {
                return false;
            }
        }
        true
    }
}

impl<T: Eq> Eq for SeqVec<T> {}

impl<T: PartialEq> PartialEq<[T]> for SeqVec<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for SeqVec<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T: Hash> Hash for SeqVec<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for SeqVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Deref for SeqVec<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for SeqVec<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> AsRef<[T]> for SeqVec<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Clone + Default> From<&[T]> for SeqVec<T> {
    fn from(items: &[T]) -> Self {
        let mut v = Self::with_len(items.len());
        v.as_mut_slice().clone_from_slice(items);
        v
    }
}

impl<T: Default, const N: usize> From<[T; N]> for SeqVec<T> {
    fn from(items: [T; N]) -> Self {
        let mut v = Self::with_len(N);
        for (slot, item) in v.iter_mut().zip(items) {
            *slot = item;
        }
        v
    }
}

impl<T: Default> From<Vec<T>> for SeqVec<T> {
    fn from(items: Vec<T>) -> Self {
        let mut v = Self::with_len(items.len());
        for (slot, item) in v.iter_mut().zip(items) {
            *slot = item;
        }
        v
    }
}

impl<T: Default> FromIterator<T> for SeqVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut v = Self::new();
        v.extend(iter);
        v
    }
}

impl<T: Default> Extend<T> for SeqVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for item in iter {
            self.push_back(item);
        }
    }
}

/// Owning iterator over the elements of a [`SeqVec`].
pub struct IntoIter<T> {
    buf: RawBuf<T>,
    front: usize,
    back: usize,
}

impl<T: Default> IntoIterator for SeqVec<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let SeqVec { buf, len } = self;
        IntoIter {
            buf,
            front: 0,
            back: len,
        }
    }
}

impl<T: Default> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        let item = mem::take(&mut self.buf.slots_mut()[self.front]);
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T: Default> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(mem::take(&mut self.buf.slots_mut()[self.back]))
    }
}

impl<T: Default> ExactSizeIterator for IntoIter<T> {}

impl<'a, T> IntoIterator for &'a SeqVec<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut SeqVec<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests;
