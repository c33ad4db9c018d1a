//! Error types.

#[cfg(feature = "std")]
use std::error::Error;
use core::fmt;

/// Error value indicating a declared capacity that cannot back a queue.
///
/// This error only occurs when rebuilding a `CircularQueue` from an untrusted
/// representation, see [`CircularQueue::from_parts`].
///
/// [`CircularQueue::from_parts`]: struct.CircularQueue.html#method.from_parts
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum CapacityError {
    /// The capacity cannot hold the elements that come with it.
    TooSmall {
        /// The capacity that was declared.
        capacity: usize,
        /// The number of elements that had to fit in it.
        count: usize,
    },
    /// A buffer of the declared capacity cannot be allocated.
    TooLarge {
        /// The capacity that was declared.
        capacity: usize,
    },
}

const TOO_SMALL: &str = "declared capacity is smaller than the element count";
const TOO_LARGE: &str = "declared capacity cannot be allocated";

impl CapacityError {
    /// The capacity that was declared.
    pub fn capacity(&self) -> usize {
        match *self {
            CapacityError::TooSmall { capacity, .. } |
            CapacityError::TooLarge { capacity } => capacity,
        }
    }
}

#[cfg(feature = "std")]
impl Error for CapacityError {}

impl fmt::Display for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            CapacityError::TooSmall { capacity, count } => {
                write!(f, "{} (capacity: {}, count: {})", TOO_SMALL, capacity, count)
            }
            CapacityError::TooLarge { capacity } => {
                write!(f, "{} (capacity: {})", TOO_LARGE, capacity)
            }
        }
    }
}

impl fmt::Debug for CapacityError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CapacityError: {}", self)
    }
}
