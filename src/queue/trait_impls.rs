use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter;
use core::ops::{Index, IndexMut};
use core::ptr;

use super::*;
use crate::storage::IntoIter;

/// Compares two sequences given as pairs of slices, wherever each one is split.
fn slices_eq<A, B>((sa, sb): (&[A], &[A]), (oa, ob): (&[B], &[B])) -> bool
    where A: PartialEq<B>
{
    if sa.len() + sb.len() != oa.len() + ob.len() {
        return false;
    }
    if sa.len() == oa.len() {
        sa == oa && sb == ob
    } else if sa.len() < oa.len() {
        // Always divisible in three sections, for example:
        // self:  [a b c|d e f]
        // other: [0 1 2 3|4 5]
        // front = 3, mid = 1,
        // [a b c] == [0 1 2] && [d] == [3] && [e f] == [4 5]
        let front = sa.len();
        let mid = oa.len() - front;

        let (oa_front, oa_mid) = oa.split_at(front);
        let (sb_mid, sb_back) = sb.split_at(mid);
        debug_assert_eq!(sb_back.len(), ob.len());
        sa == oa_front && sb_mid == oa_mid && sb_back == ob
    } else {
        let front = oa.len();
        let mid = sa.len() - front;

        let (sa_front, sa_mid) = sa.split_at(front);
        let (ob_mid, ob_back) = ob.split_at(mid);
        debug_assert_eq!(sb.len(), ob_back.len());
        sa_front == oa && sa_mid == ob_mid && sb == ob_back
    }
}

impl<T> Clone for CircularQueue<T> {
    /// Shares the buffer; the first mutation of either queue copies it.
    #[inline]
    fn clone(&self) -> CircularQueue<T> {
        CircularQueue { storage: Arc::clone(&self.storage) }
    }
}

impl<T> Default for CircularQueue<T> {
    #[inline]
    fn default() -> CircularQueue<T> {
        CircularQueue::new()
    }
}

impl<T, U> PartialEq<CircularQueue<U>> for CircularQueue<T>
    where T: PartialEq<U>
{
    fn eq(&self, other: &CircularQueue<U>) -> bool {
        let shared = ptr::eq(&*self.storage as *const Storage<T> as *const (),
                             &*other.storage as *const Storage<U> as *const ());
        // two queues sharing one buffer hold the same elements
        if shared && self.len() == other.len() {
            return true;
        }
        slices_eq(self.as_slices(), other.as_slices())
    }
}

impl<T, U> PartialEq<Vec<U>> for CircularQueue<T>
    where T: PartialEq<U>
{
    fn eq(&self, other: &Vec<U>) -> bool {
        slices_eq(self.as_slices(), (&other[..], &[][..]))
    }
}

impl<'a, T, U> PartialEq<&'a [U]> for CircularQueue<T>
    where T: PartialEq<U>
{
    fn eq(&self, other: &&'a [U]) -> bool {
        slices_eq(self.as_slices(), (*other, &[][..]))
    }
}

impl<T, U, const N: usize> PartialEq<[U; N]> for CircularQueue<T>
    where T: PartialEq<U>
{
    fn eq(&self, other: &[U; N]) -> bool {
        slices_eq(self.as_slices(), (&other[..], &[][..]))
    }
}

impl<T: Eq> Eq for CircularQueue<T> {}

impl<T: PartialOrd> PartialOrd for CircularQueue<T> {
    fn partial_cmp(&self, other: &CircularQueue<T>) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for CircularQueue<T> {
    #[inline]
    fn cmp(&self, other: &CircularQueue<T>) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

/// Hashes the length and the elements. Capacity is left out, so equal queues
/// hash alike whatever their capacity.
impl<T: Hash> Hash for CircularQueue<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        let (a, b) = self.as_slices();
        Hash::hash_slice(a, state);
        Hash::hash_slice(b, state);
    }
}

impl<T> Index<usize> for CircularQueue<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        let len = self.len();
        match self.get(index) {
            Some(element) => element,
            None => panic!("index out of bounds: the len is {} but the index is {}", len, index),
        }
    }
}

impl<T: Clone> IndexMut<usize> for CircularQueue<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len();
        match self.get_mut(index) {
            Some(element) => element,
            None => panic!("index out of bounds: the len is {} but the index is {}", len, index),
        }
    }
}

/// Collects into a full queue: capacity equals the number of elements.
impl<T> iter::FromIterator<T> for CircularQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        CircularQueue::from_storage(Storage::from_vec(iter.into_iter().collect()))
    }
}

/// Converts into a full queue without copying the elements.
impl<T> From<Vec<T>> for CircularQueue<T> {
    fn from(elements: Vec<T>) -> Self {
        CircularQueue::from_storage(Storage::from_vec(elements))
    }
}

impl<T: Clone> From<CircularQueue<T>> for Vec<T> {
    fn from(queue: CircularQueue<T>) -> Self {
        queue.into_iter().collect()
    }
}

/// Takes the elements out of the buffer if this is its only queue, otherwise
/// iterates over a copy.
impl<T: Clone> IntoIterator for CircularQueue<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let storage = Arc::try_unwrap(self.storage).unwrap_or_else(|shared| (*shared).clone());
        IntoIter::new(storage)
    }
}

impl<'a, T> IntoIterator for &'a CircularQueue<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T: Clone> IntoIterator for &'a mut CircularQueue<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

/// Extend the `CircularQueue` with an iterator.
///
/// Same as `append_iter`: nothing is dropped, the capacity grows to fit.
impl<T: Clone> Extend<T> for CircularQueue<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.append_iter(iter);
    }
}

impl<T: fmt::Debug> fmt::Debug for CircularQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self).finish()
    }
}

/// Formats as `CircularQueue(capacity: 3)[1, 2]`.
impl<T: fmt::Display> fmt::Display for CircularQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CircularQueue(capacity: {})[", self.capacity())?;
        for (i, element) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(element, f)?;
        }
        f.write_str("]")
    }
}
