use alloc::vec::Vec;
use core::fmt;
use core::iter;
use core::ops::{Index, IndexMut, Range};

use crate::queue::CircularQueue;
use crate::storage::{Iter, IterMut};
use crate::utils::*;
use crate::RangeArgument;

/// A window on a range of a `CircularQueue`.
///
/// The slice keeps its own copy of the queue, so it never observes later
/// mutations of the queue it was taken from, and mutating the slice never
/// changes that queue. Indices are the ones of the base queue: a slice over
/// `2..5` is indexed with 2, 3 and 4.
///
/// # Examples
///
/// ```
/// use circularqueue::CircularQueue;
///
/// let mut queue: CircularQueue<_> = (0..6).collect();
/// let mut slice = queue.slice(2..5);
/// queue.push_back(6);
/// slice[3] = 30;
///
/// assert_eq!(slice, vec![2, 30, 4]);
/// assert_eq!(queue, vec![1, 2, 3, 4, 5, 6]);
/// ```
pub struct QueueSlice<T> {
    base: CircularQueue<T>,
    bounds: Range<usize>,
}

impl<T> QueueSlice<T> {
    /// Creates an empty slice over an empty queue.
    #[inline]
    pub fn new() -> QueueSlice<T> {
        QueueSlice::new_unchecked(CircularQueue::new(), 0..0)
    }

    pub(crate) fn new_unchecked(base: CircularQueue<T>, bounds: Range<usize>) -> QueueSlice<T> {
        debug_assert!(bounds.start <= bounds.end && bounds.end <= base.len());
        QueueSlice { base, bounds }
    }

    /// A slice over a full queue of `count` copies of `element`.
    pub fn repeating(element: T, count: usize) -> QueueSlice<T>
        where T: Clone
    {
        CircularQueue::repeating(element, count).into()
    }

    /// The base indices this slice covers.
    #[inline]
    pub fn bounds(&self) -> Range<usize> {
        self.bounds.clone()
    }

    /// The queue this slice looks into.
    #[inline]
    pub fn base(&self) -> &CircularQueue<T> {
        &self.base
    }

    /// Returns the number of elements in the slice.
    #[inline]
    pub fn len(&self) -> usize {
        self.bounds.end - self.bounds.start
    }

    /// Returns true if the slice contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bounds.start == self.bounds.end
    }

    /// Retrieves the element at base `index`, or `None` outside the bounds.
    pub fn get(&self, index: usize) -> Option<&T> {
        if self.bounds.contains(&index) {
            self.base.get(index)
        } else {
            None
        }
    }

    /// Returns the first element of the slice.
    #[inline]
    pub fn first(&self) -> Option<&T> {
        self.get(self.bounds.start)
    }

    /// Returns the last element of the slice.
    pub fn last(&self) -> Option<&T> {
        if self.is_empty() {
            None
        } else {
            self.get(self.bounds.end - 1)
        }
    }

    /// Returns a front-to-back iterator over the slice.
    #[inline]
    pub fn iter(&self) -> Iter<T> {
        self.base.iter_range(self.bounds())
    }

    /// A narrower slice, with `range` given in base indices.
    ///
    /// # Panics
    ///
    /// Panics if `range` leaves the bounds of this slice.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let queue: CircularQueue<_> = (0..10).collect();
    /// let slice = queue.slice(2..8).slice(4..);
    /// assert_eq!(slice.bounds(), 4..8);
    /// assert!(slice.base().shares_storage_with(&queue));
    /// ```
    pub fn slice<R>(&self, range: R) -> QueueSlice<T>
        where R: RangeArgument<usize>
    {
        let bounds = resolve_range_within(&range, self.bounds());
        QueueSlice::new_unchecked(self.base.clone(), bounds)
    }
}

impl<T: Clone> QueueSlice<T> {
    /// Retrieves the element at base `index` mutably, or `None` outside the bounds.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if self.bounds.contains(&index) {
            self.base.get_mut(index)
        } else {
            None
        }
    }

    /// Returns a front-to-back iterator over mutable references.
    pub fn iter_mut(&mut self) -> IterMut<T> {
        let bounds = self.bounds();
        self.base.iter_mut_range(bounds)
    }

    /// Replaces the elements in `range`, given in base indices, with
    /// `replacement`. The end of the slice moves with the length change.
    ///
    /// # Panics
    ///
    /// Panics if `range` leaves the bounds of this slice.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let queue: CircularQueue<_> = (0..6).collect();
    /// let mut slice = queue.slice(1..4);
    /// slice.replace_subrange(2..3, vec![20, 21, 22]);
    /// assert_eq!(slice.bounds(), 1..6);
    /// assert_eq!(slice, vec![1, 20, 21, 22, 3]);
    /// ```
    pub fn replace_subrange<R, I>(&mut self, range: R, replacement: I)
        where R: RangeArgument<usize>,
              I: IntoIterator<Item = T>
    {
        let range = resolve_range_within(&range, self.bounds());
        let replacement: Vec<T> = replacement.into_iter().collect();
        let inserted = replacement.len();
        let removed = range.end - range.start;
        self.base.replace_subrange(range, replacement);
        self.bounds.end = self.bounds.end - removed + inserted;
    }

    /// Copies the elements of the slice into a new, full queue.
    pub fn to_queue(&self) -> CircularQueue<T> {
        self.iter().cloned().collect()
    }
}

impl<T> Clone for QueueSlice<T> {
    fn clone(&self) -> QueueSlice<T> {
        QueueSlice::new_unchecked(self.base.clone(), self.bounds())
    }
}

impl<T> Default for QueueSlice<T> {
    fn default() -> QueueSlice<T> {
        QueueSlice::new()
    }
}

/// A slice over the whole queue.
impl<T> From<CircularQueue<T>> for QueueSlice<T> {
    fn from(base: CircularQueue<T>) -> QueueSlice<T> {
        let bounds = 0..base.len();
        QueueSlice::new_unchecked(base, bounds)
    }
}

impl<T> iter::FromIterator<T> for QueueSlice<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter().collect::<CircularQueue<T>>().into()
    }
}

impl<T, U> PartialEq<QueueSlice<U>> for QueueSlice<T>
    where T: PartialEq<U>
{
    fn eq(&self, other: &QueueSlice<U>) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T, U> PartialEq<Vec<U>> for QueueSlice<T>
    where T: PartialEq<U>
{
    fn eq(&self, other: &Vec<U>) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<T: Eq> Eq for QueueSlice<T> {}

impl<T> Index<usize> for QueueSlice<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(element) => element,
            None => {
                panic!("index out of bounds: the bounds are {:?} but the index is {}",
                       self.bounds,
                       index)
            }
        }
    }
}

impl<T: Clone> IndexMut<usize> for QueueSlice<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let bounds = self.bounds();
        match self.get_mut(index) {
            Some(element) => element,
            None => {
                panic!("index out of bounds: the bounds are {:?} but the index is {}",
                       bounds,
                       index)
            }
        }
    }
}

impl<'a, T> IntoIterator for &'a QueueSlice<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for QueueSlice<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self).finish()
    }
}
