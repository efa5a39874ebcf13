use thiserror::Error;

/// Usage errors reported by [`SeqVec`](crate::SeqVec).
///
/// Every variant is a programming error on the caller's side; none of them is
/// transient and no operation retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// A negative length was requested at construction.
    #[error("invalid length {0}: length must not be negative")]
    InvalidLength(isize),

    /// The start of a range lies after its end.
    #[error("invalid range: first slot {first} is after last slot {last}")]
    InvalidRange { first: isize, last: isize },

    /// Checked access outside `[0, len)`.
    #[error("index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },

    /// A position that does not address a slot the operation may use.
    #[error("position {slot} out of range for length {len}")]
    InvalidPosition { slot: isize, len: usize },

    /// A position issued for a buffer that has since been reallocated, or by
    /// a different container.
    #[error("stale position: the buffer it was issued for no longer exists")]
    StalePosition,

    /// The requested length has no power-of-two capacity that fits in `usize`.
    #[error("capacity overflow: no power-of-two capacity holds {0} elements")]
    CapacityOverflow(usize),
}

pub type SeqResult<T> = Result<T, ContainerError>;
