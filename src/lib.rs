//! A ring buffer queue with an explicit capacity and value semantics.
//!
//! `CircularQueue` has `O(1)` amortized inserts and removals from both ends of
//! the container and `O(1)` indexing like a vector. When it is full, pushing at
//! one end overwrites the element at the other end, so it always keeps the
//! latest `capacity()` elements pushed.
//!
//! Clones share their buffer until one of them is mutated (copy-on-write), so
//! passing queues around by value is cheap.
//!
//! # Feature Flags
//! The **circularqueue** crate has the following cargo feature flags:
//!
//! - `std`
//!   - Optional, enabled by default
//!   - Use libstd; without it the crate only needs `alloc`
//!
//!
//! - `serde`
//!   - Optional, enabled by default
//!   - Implement `Serialize` and `Deserialize` for `CircularQueue`
//!
//!
//! # Usage
//!
//! First, add the following to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! circularqueue = "0.1"
//! ```
//!
//! To use circularqueue in a `#![no_std]` crate:
//!
//! ```toml
//! [dependencies]
//! circularqueue = { version = "0.1", default-features = false }
//! ```
//!
//! # Capacity
//!
//! `push_back`, `push_front`, `pop_back` and `pop_front` never change the
//! capacity. `reserve_capacity` grows it. The array-like operations
//! (`replace_subrange` and everything built on it: `insert`, `append`,
//! `remove`, ...) rebuild the buffer to exactly the resulting length.
//!
//! # Examples
//! ```
//! use circularqueue::CircularQueue;
//!
//! let mut queue = CircularQueue::with_capacity(3);
//! queue.push_back(1);
//! queue.push_back(2);
//! queue.push_back(3);
//! assert!(queue.is_full());
//!
//! // full: the oldest element goes
//! assert_eq!(queue.push_back(4), Some(1));
//! assert_eq!(queue, vec![2, 3, 4]);
//! assert_eq!(queue.capacity(), 3);
//!
//! let snapshot = queue.clone();
//! assert_eq!(queue.pop_front(), Some(2));
//! queue.append_iter(vec![5, 6]);
//! assert_eq!(queue, vec![3, 4, 5, 6]);
//! assert_eq!(queue.capacity(), 4);
//!
//! assert_eq!(snapshot, vec![2, 3, 4]);
//! ```

#![deny(missing_docs)]
#![cfg_attr(not(any(feature = "std", test)), no_std)]

extern crate alloc;

pub use odds::IndexRange as RangeArgument;

mod utils;
mod storage;
mod queue;
mod slice;
pub mod error;

#[cfg(feature = "serde")]
mod serde;

pub use error::CapacityError;
pub use queue::CircularQueue;
pub use slice::QueueSlice;
pub use storage::{IntoIter, Iter, IterMut};
