use crate::error::{ContainerError, SeqResult};

/// Smallest capacity any buffer is allocated with, even for zero elements.
pub const MIN_CAPACITY: usize = 2;

/// Returns the smallest power of two that is at least `n`, never below
/// [`MIN_CAPACITY`].
///
/// Every allocating operation sizes its buffer through this policy, which keeps
/// repeated `push_back` amortised O(1).
///
/// # Panics
///
/// Panics if the result does not fit in `usize`.
///
/// ```
/// use seqvec::round_up_capacity;
///
/// assert_eq!(round_up_capacity(0), 2);
/// assert_eq!(round_up_capacity(3), 4);
/// assert_eq!(round_up_capacity(1025), 2048);
/// ```
#[track_caller]
pub fn round_up_capacity(n: usize) -> usize {
    match try_round_up_capacity(n) {
        Ok(cap) => cap,
        Err(err) => capacity_overflow(err),
    }
}

/// Fallible form of [`round_up_capacity`].
pub fn try_round_up_capacity(n: usize) -> SeqResult<usize> {
    n.max(MIN_CAPACITY)
        .checked_next_power_of_two()
        .ok_or(ContainerError::CapacityOverflow(n))
}

#[cold]
#[track_caller]
pub(crate) fn capacity_overflow(err: ContainerError) -> ! {
    panic!("{err}")
}
