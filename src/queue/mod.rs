use alloc::sync::Arc;
use alloc::vec::Vec;
use core::iter;
use core::ops::Range;

use log::debug;

use crate::error::CapacityError;
use crate::slice::QueueSlice;
use crate::storage::{Iter, IterMut, Storage};
use crate::utils::*;
use crate::RangeArgument;

mod trait_impls;

/// `CircularQueue` is a ring buffer with an explicit capacity and value semantics.
///
/// The "default" usage of this type as a queue is to use `push_back` to add to
/// the queue, and `pop_front` to remove from the queue. When the queue is full,
/// `push_back` overwrites the oldest element and `push_front` overwrites the
/// newest one. Iterating over `CircularQueue` goes front to back.
///
/// # Capacity
///
/// Capacity is never changed by the push and pop operations. It grows through
/// [`reserve_capacity`], and the array-like operations built on
/// [`replace_subrange`] (`insert`, `append`, `remove` and friends) leave the
/// queue with exactly as much capacity as it has elements.
///
/// # Copies
///
/// Cloning a `CircularQueue` is O(1): clones share one buffer until either of
/// them is mutated, at which point the mutated one takes a private copy. Methods
/// that mutate therefore require `T: Clone`.
///
/// # Thread safety
///
/// A `CircularQueue<T>` is `Send` and `Sync` when `T` is both. Clones that
/// share a buffer may be handed to different threads and mutated there
/// independently: whether the buffer is shared is decided through the atomic
/// count of an `Arc`, so each thread detaches its own copy. A single queue is
/// mutated only through `&mut self`; sharing one queue between threads for
/// mutation needs external locking such as a `Mutex`.
///
/// [`reserve_capacity`]: #method.reserve_capacity
/// [`replace_subrange`]: #method.replace_subrange
pub struct CircularQueue<T> {
    storage: Arc<Storage<T>>,
}

impl<T> CircularQueue<T> {
    /// Creates an empty `CircularQueue` with zero capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let queue: CircularQueue<i32> = CircularQueue::new();
    /// assert_eq!(queue.capacity(), 0);
    /// ```
    #[inline]
    pub fn new() -> CircularQueue<T> {
        CircularQueue::with_capacity(0)
    }

    /// Creates an empty `CircularQueue` holding up to `capacity` elements.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let queue: CircularQueue<i32> = CircularQueue::with_capacity(3);
    /// assert_eq!(queue.capacity(), 3);
    /// assert!(queue.is_empty());
    /// ```
    #[inline]
    pub fn with_capacity(capacity: usize) -> CircularQueue<T> {
        CircularQueue::from_storage(Storage::new(capacity))
    }

    /// Creates a full `CircularQueue` of `count` copies of `element`.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let queue = CircularQueue::repeating(0, 3);
    /// assert!(queue.is_full());
    /// assert_eq!(queue, vec![0, 0, 0]);
    /// ```
    pub fn repeating(element: T, count: usize) -> CircularQueue<T>
        where T: Clone
    {
        CircularQueue::from_storage(Storage::repeating(element, count))
    }

    /// Rebuilds a `CircularQueue` from its persisted parts: the elements front
    /// to back and the declared capacity.
    ///
    /// # Errors
    ///
    /// Returns `CapacityError::TooSmall` if `capacity` is smaller than the
    /// number of elements, and `CapacityError::TooLarge` if a buffer of
    /// `capacity` slots cannot be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let queue = CircularQueue::from_parts(vec![1, 2], 4).unwrap();
    /// assert_eq!(queue.capacity(), 4);
    /// assert_eq!(queue.residual_capacity(), 2);
    ///
    /// assert!(CircularQueue::from_parts(vec![1, 2, 3], 2).is_err());
    /// assert!(CircularQueue::from_parts(vec![1u64], usize::max_value()).is_err());
    /// ```
    pub fn from_parts<I>(elements: I, capacity: usize) -> Result<CircularQueue<T>, CapacityError>
        where I: IntoIterator<Item = T>
    {
        let elements: Vec<T> = elements.into_iter().collect();
        if capacity < elements.len() {
            return Err(CapacityError::TooSmall {
                capacity,
                count: elements.len(),
            });
        }
        let mut storage = Storage::try_new(capacity)
            .map_err(|_| CapacityError::TooLarge { capacity })?;
        storage.push_back_iter(elements);
        Ok(CircularQueue::from_storage(storage))
    }

    #[inline]
    pub(crate) fn from_storage(storage: Storage<T>) -> CircularQueue<T> {
        CircularQueue { storage: Arc::new(storage) }
    }

    /// Returns the number of elements the queue can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Returns the number of elements in the queue.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let mut queue = CircularQueue::with_capacity(3);
    /// queue.push_back(1);
    /// assert_eq!(queue.len(), 1);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns true if the queue contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Returns true if the next push will overwrite an element.
    ///
    /// A queue with zero capacity is always full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.storage.is_full()
    }

    /// Returns the number of free slots left before the queue is full.
    #[inline]
    pub fn residual_capacity(&self) -> usize {
        self.storage.residual_capacity()
    }

    /// Returns true if `self` and `other` currently share one buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let mut queue = CircularQueue::with_capacity(3);
    /// queue.push_back(1);
    /// let mut copy = queue.clone();
    /// assert!(copy.shares_storage_with(&queue));
    ///
    /// copy.push_back(2);
    /// assert!(!copy.shares_storage_with(&queue));
    /// assert_eq!(queue, vec![1]);
    /// ```
    #[inline]
    pub fn shares_storage_with(&self, other: &CircularQueue<T>) -> bool {
        Arc::ptr_eq(&self.storage, &other.storage)
    }

    /// Retrieves an element in the `CircularQueue` by index.
    ///
    /// Element at index 0 is the front of the queue.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let mut queue = CircularQueue::with_capacity(3);
    /// queue.push_back(3);
    /// queue.push_back(4);
    /// queue.push_back(5);
    /// queue.push_back(6);
    /// assert_eq!(queue.get(0), Some(&4));
    /// assert_eq!(queue.get(3), None);
    /// ```
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.storage.get(index)
    }

    /// Provides a reference to the front element, or `None` if the queue is empty.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        self.storage.get(0)
    }

    /// Provides a reference to the back element, or `None` if the queue is empty.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        match self.len() {
            0 => None,
            len => self.storage.get(len - 1),
        }
    }

    /// The element `dequeue` would return next.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.front()
    }

    /// Returns true if the queue contains an element equal to the given value.
    pub fn contains(&self, x: &T) -> bool
        where T: PartialEq<T>
    {
        let (a, b) = self.as_slices();
        a.contains(x) || b.contains(x)
    }

    /// Returns a front-to-back iterator.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let mut queue = CircularQueue::with_capacity(3);
    /// queue.push_back(5);
    /// queue.push_back(3);
    /// queue.push_front(4);
    /// let b: &[_] = &[&4, &5, &3];
    /// let c: Vec<&i32> = queue.iter().collect();
    /// assert_eq!(&c[..], b);
    /// ```
    #[inline]
    pub fn iter(&self) -> Iter<T> {
        self.storage.iter()
    }

    /// Returns a pair of slices which contain, in order, the contents of the
    /// queue. The second slice is empty unless the content wraps past the end
    /// of the buffer.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let mut queue = CircularQueue::with_capacity(4);
    /// queue.push_back(0);
    /// queue.push_back(1);
    /// queue.push_front(10);
    /// queue.push_front(9);
    ///
    /// assert_eq!(queue.as_slices(), (&[9, 10][..], &[0, 1][..]));
    /// ```
    #[inline]
    pub fn as_slices(&self) -> (&[T], &[T]) {
        self.storage.as_slices()
    }

    /// A view on the elements in `range`, holding its own copy of the queue.
    ///
    /// # Panics
    ///
    /// Panics if the range reaches past the end of the queue.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let queue: CircularQueue<_> = (0..6).collect();
    /// let slice = queue.slice(2..5);
    /// assert_eq!(slice.bounds(), 2..5);
    /// assert_eq!(slice[2], 2);
    /// assert_eq!(slice.iter().cloned().collect::<Vec<_>>(), vec![2, 3, 4]);
    /// ```
    pub fn slice<R>(&self, range: R) -> QueueSlice<T>
        where R: RangeArgument<usize>
    {
        let bounds = resolve_range(&range, self.len());
        QueueSlice::new_unchecked(self.clone(), bounds)
    }

    /// Removes every element.
    ///
    /// With `keeping_capacity` the queue keeps its capacity, otherwise it drops
    /// to zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let mut queue: CircularQueue<_> = (0..4).collect();
    /// queue.remove_all(true);
    /// assert!(queue.is_empty());
    /// assert_eq!(queue.capacity(), 4);
    ///
    /// queue.remove_all(false);
    /// assert_eq!(queue.capacity(), 0);
    /// ```
    pub fn remove_all(&mut self, keeping_capacity: bool) {
        match Arc::get_mut(&mut self.storage) {
            Some(storage) => storage.remove_all(keeping_capacity),
            None => {
                // shared: start over instead of copying what is about to go
                let capacity = if keeping_capacity { self.capacity() } else { 0 };
                self.storage = Arc::new(Storage::new(capacity));
            }
        }
    }

    /// Clears the queue, keeping its capacity.
    #[inline]
    pub fn clear(&mut self) {
        self.remove_all(true);
    }

    pub(crate) fn iter_range(&self, range: Range<usize>) -> Iter<T> {
        self.storage.iter_range(range.start, range.end)
    }

    #[cfg(test)]
    pub(crate) fn storage(&self) -> &Storage<T> {
        &self.storage
    }
}

impl<T: Clone> CircularQueue<T> {
    /// Ensures `self` owns its buffer alone, copying it if shared, and grows it
    /// by `additional` slots.
    fn make_unique(&mut self, additional: usize) -> &mut Storage<T> {
        if Arc::get_mut(&mut self.storage).is_none() {
            debug!("copying shared queue storage: cap={} len={} additional={}",
                   self.capacity(),
                   self.len(),
                   additional);
            self.storage = Arc::new(self.storage.copy_with(additional));
        } else if additional > 0 {
            let storage = Arc::make_mut(&mut self.storage);
            let residual = storage.residual_capacity();
            storage.reserve(residual + additional);
        }
        Arc::make_mut(&mut self.storage)
    }

    /// Appends an element to the back of the queue.
    ///
    /// When the queue is full, the front element is dropped to make room and
    /// returned. With zero capacity `element` itself is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let mut queue = CircularQueue::with_capacity(2);
    /// assert_eq!(queue.push_back(1), None);
    /// assert_eq!(queue.push_back(2), None);
    /// assert_eq!(queue.push_back(3), Some(1));
    /// assert_eq!(queue, vec![2, 3]);
    /// ```
    pub fn push_back(&mut self, element: T) -> Option<T> {
        if self.capacity() == 0 {
            return Some(element);
        }
        self.make_unique(0).push_back(element)
    }

    /// Prepends an element to the queue.
    ///
    /// When the queue is full, the back element is dropped to make room and
    /// returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let mut queue = CircularQueue::with_capacity(2);
    /// queue.push_front(1);
    /// queue.push_front(2);
    /// assert_eq!(queue.push_front(3), Some(1));
    /// assert_eq!(queue, vec![3, 2]);
    /// ```
    pub fn push_front(&mut self, element: T) -> Option<T> {
        if self.capacity() == 0 {
            return Some(element);
        }
        self.make_unique(0).push_front(element)
    }

    /// Pushes each element of `elements` to the back, in order, dropping
    /// front elements as needed. If there are more elements than capacity,
    /// only the last `capacity()` of them are kept.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let mut queue: CircularQueue<_> = vec![1, 2, 3].into();
    /// queue.push_back_iter(vec![4, 5]);
    /// assert_eq!(queue, vec![3, 4, 5]);
    ///
    /// queue.push_back_iter(10..20);
    /// assert_eq!(queue, vec![17, 18, 19]);
    /// ```
    pub fn push_back_iter<I>(&mut self, elements: I)
        where I: IntoIterator<Item = T>
    {
        if self.capacity() == 0 {
            return;
        }
        self.make_unique(0).push_back_iter(elements);
    }

    /// Pushes each element of `elements` to the front, in order, dropping back
    /// elements as needed.
    ///
    /// Each element goes in front of the previous one, so the pushed run reads
    /// reversed from the front.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let mut queue = CircularQueue::with_capacity(5);
    /// queue.push_back(0);
    /// queue.push_front_iter(vec![1, 2, 3]);
    /// assert_eq!(queue, vec![3, 2, 1, 0]);
    /// ```
    pub fn push_front_iter<I>(&mut self, elements: I)
        where I: IntoIterator<Item = T>
    {
        if self.capacity() == 0 {
            return;
        }
        self.make_unique(0).push_front_iter(elements);
    }

    /// Removes the first element and returns it, or `None` if the queue is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let mut queue = CircularQueue::with_capacity(3);
    /// queue.push_back(1);
    /// queue.push_back(2);
    /// assert_eq!(queue.pop_front(), Some(1));
    /// assert_eq!(queue.pop_front(), Some(2));
    /// assert_eq!(queue.pop_front(), None);
    /// assert_eq!(queue.capacity(), 3);
    /// ```
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        self.make_unique(0).pop_front()
    }

    /// Removes the last element and returns it, or `None` if the queue is empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        self.make_unique(0).pop_back()
    }

    /// Same as `push_back`.
    #[inline]
    pub fn enqueue(&mut self, element: T) -> Option<T> {
        self.push_back(element)
    }

    /// Same as `push_back_iter`.
    #[inline]
    pub fn enqueue_iter<I>(&mut self, elements: I)
        where I: IntoIterator<Item = T>
    {
        self.push_back_iter(elements)
    }

    /// Same as `pop_front`.
    #[inline]
    pub fn dequeue(&mut self) -> Option<T> {
        self.pop_front()
    }

    /// Makes room for at least `additional` more elements without dropping
    /// anything, growing the capacity by exactly the missing amount.
    ///
    /// Does nothing if `residual_capacity() >= additional` already.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let mut queue: CircularQueue<_> = vec![1, 2, 3].into();
    /// queue.reserve_capacity(2);
    /// assert_eq!(queue.capacity(), 5);
    ///
    /// queue.push_back(4);
    /// queue.push_back(5);
    /// assert_eq!(queue, vec![1, 2, 3, 4, 5]);
    /// ```
    pub fn reserve_capacity(&mut self, additional: usize) {
        let residual = self.residual_capacity();
        if additional <= residual {
            return;
        }
        self.make_unique(additional - residual);
    }

    /// Replaces the elements in `range` with `replacement`.
    ///
    /// Unless both are empty, the queue ends up with exactly as much capacity as
    /// it has elements.
    ///
    /// # Panics
    ///
    /// Panics if the range reaches past the end of the queue.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let mut queue = CircularQueue::with_capacity(10);
    /// queue.push_back_iter(0..5);
    /// queue.replace_subrange(1..3, vec![7, 8, 9]);
    /// assert_eq!(queue, vec![0, 7, 8, 9, 3, 4]);
    /// assert_eq!(queue.capacity(), 6);
    /// ```
    pub fn replace_subrange<R, I>(&mut self, range: R, replacement: I)
        where R: RangeArgument<usize>,
              I: IntoIterator<Item = T>
    {
        let range = resolve_range(&range, self.len());
        let replacement: Vec<T> = replacement.into_iter().collect();
        if range.start == range.end && replacement.is_empty() {
            return;
        }
        self.make_unique(0).replace_subrange(range.start, range.end, replacement);
    }

    /// Inserts `element` at `index`, shifting everything after it back.
    ///
    /// # Panics
    ///
    /// Panics if `index` is greater than the length.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let mut queue: CircularQueue<_> = vec!['a', 'b', 'c'].into();
    /// queue.insert(1, 'd');
    /// assert_eq!(queue, vec!['a', 'd', 'b', 'c']);
    /// assert_eq!(queue.capacity(), 4);
    /// ```
    pub fn insert(&mut self, index: usize, element: T) {
        self.insert_iter(index, iter::once(element));
    }

    /// Inserts every element of `elements` at `index`, in order.
    pub fn insert_iter<I>(&mut self, index: usize, elements: I)
        where I: IntoIterator<Item = T>
    {
        assert!(index <= self.len(),
                "insertion index (is {}) should be <= len (is {})",
                index,
                self.len());
        self.replace_subrange(index..index, elements);
    }

    /// Appends `element` after the last element, growing the queue by one slot.
    ///
    /// Unlike `push_back` this never drops an element.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let mut queue: CircularQueue<_> = vec![1, 2].into();
    /// queue.append(3);
    /// assert_eq!(queue, vec![1, 2, 3]);
    /// assert_eq!(queue.capacity(), 3);
    /// ```
    pub fn append(&mut self, element: T) {
        self.append_iter(iter::once(element));
    }

    /// Appends every element of `elements`, growing the queue to fit them.
    pub fn append_iter<I>(&mut self, elements: I)
        where I: IntoIterator<Item = T>
    {
        let len = self.len();
        self.replace_subrange(len..len, elements);
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let mut queue: CircularQueue<_> = vec![1, 2, 3].into();
    /// assert_eq!(queue.remove(1), 2);
    /// assert_eq!(queue, vec![1, 3]);
    /// assert_eq!(queue.capacity(), 2);
    /// ```
    pub fn remove(&mut self, index: usize) -> T {
        assert!(index < self.len(),
                "removal index (is {}) should be < len (is {})",
                index,
                self.len());
        self.make_unique(0).remove(index)
    }

    /// Removes the elements in `range`. An empty range is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if the range reaches past the end of the queue.
    pub fn remove_subrange<R>(&mut self, range: R)
        where R: RangeArgument<usize>
    {
        self.replace_subrange(range, iter::empty());
    }

    /// Removes the first `k` elements.
    ///
    /// # Panics
    ///
    /// Panics if `k` is greater than the length.
    pub fn remove_first(&mut self, k: usize) {
        assert!(k <= self.len(),
                "cannot remove {} elements from a queue of len {}",
                k,
                self.len());
        self.remove_subrange(..k);
    }

    /// Removes and returns the front element.
    ///
    /// Unlike `pop_front`, this is a range removal: afterwards the capacity
    /// equals the length.
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let mut queue = CircularQueue::with_capacity(4);
    /// queue.push_back_iter(vec![1, 2, 3]);
    /// assert_eq!(queue.remove_front(), 1);
    /// assert_eq!(queue, vec![2, 3]);
    /// assert_eq!(queue.capacity(), 2);
    /// ```
    pub fn remove_front(&mut self) -> T {
        assert!(!self.is_empty(), "cannot remove an element from an empty queue");
        self.remove(0)
    }

    /// Removes and returns the back element.
    ///
    /// Unlike `pop_back`, this is a range removal: afterwards the capacity
    /// equals the length.
    ///
    /// # Panics
    ///
    /// Panics if the queue is empty.
    pub fn remove_back(&mut self) -> T {
        let len = self.len();
        assert!(len > 0, "cannot remove an element from an empty queue");
        self.remove(len - 1)
    }

    /// Removes the last `k` elements.
    ///
    /// # Panics
    ///
    /// Panics if `k` is greater than the length.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let mut queue: CircularQueue<_> = (0..5).collect();
    /// queue.remove_last(2);
    /// assert_eq!(queue, vec![0, 1, 2]);
    /// ```
    pub fn remove_last(&mut self, k: usize) {
        let len = self.len();
        assert!(k <= len, "cannot remove {} elements from a queue of len {}", k, len);
        self.remove_subrange(len - k..);
    }

    /// Retrieves an element in the `CircularQueue` mutably by index.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let mut queue: CircularQueue<_> = vec![3, 4, 5].into();
    /// if let Some(elem) = queue.get_mut(1) {
    ///     *elem = 7;
    /// }
    ///
    /// assert_eq!(queue[1], 7);
    /// ```
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len() {
            return None;
        }
        self.make_unique(0).get_mut(index)
    }

    /// Provides a mutable reference to the front element, or `None` if the queue is empty.
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    /// Provides a mutable reference to the back element, or `None` if the queue is empty.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        match self.len() {
            0 => None,
            len => self.get_mut(len - 1),
        }
    }

    /// Swaps elements at indices `i` and `j`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn swap(&mut self, i: usize, j: usize) {
        self.make_unique(0).swap(i, j)
    }

    /// Returns a front-to-back iterator that returns mutable references.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let mut queue: CircularQueue<_> = vec![5, 3, 4].into();
    /// for num in queue.iter_mut() {
    ///     *num = *num - 2;
    /// }
    /// assert_eq!(queue, vec![3, 1, 2]);
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<T> {
        self.make_unique(0).iter_mut()
    }

    /// Returns the contents as one slice, rotating the buffer first if they
    /// wrap past its end.
    ///
    /// # Examples
    ///
    /// ```
    /// use circularqueue::CircularQueue;
    ///
    /// let mut queue = CircularQueue::with_capacity(3);
    /// for x in 1..=4 {
    ///     queue.push_back(x);
    /// }
    /// assert_eq!(queue.as_slices(), (&[2, 3][..], &[4][..]));
    /// assert_eq!(queue.as_contiguous(), &[2, 3, 4]);
    /// ```
    pub fn as_contiguous(&mut self) -> &[T] {
        if self.storage.is_contiguous() {
            return self.storage.as_slices().0;
        }
        self.make_unique(0).make_contiguous()
    }

    /// Mutable variant of `as_contiguous`.
    pub fn as_contiguous_mut(&mut self) -> &mut [T] {
        self.make_unique(0).make_contiguous()
    }

    pub(crate) fn iter_mut_range(&mut self, range: Range<usize>) -> IterMut<T> {
        self.make_unique(0).iter_mut_range(range.start, range.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    fn contents<T: Clone>(queue: &CircularQueue<T>) -> Vec<T> {
        queue.iter().cloned().collect()
    }

    #[test]
    fn mutating_a_copy_leaves_the_original_alone() {
        let mut queue: CircularQueue<_> = (1..=5).collect();
        let original = queue.clone();
        assert!(queue.shares_storage_with(&original));

        queue.push_back(6);
        assert!(!queue.shares_storage_with(&original));
        assert_eq!(contents(&original), vec![1, 2, 3, 4, 5]);
        assert_eq!(contents(&queue), vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn reads_never_copy() {
        let queue: CircularQueue<_> = (1..=3).collect();
        let copy = queue.clone();
        let _ = copy.get(1);
        let _ = copy.iter().count();
        let _ = copy.as_slices();
        let _ = copy.slice(..);
        assert!(copy.shares_storage_with(&queue));
    }

    #[test]
    fn unique_mutation_happens_in_place() {
        let mut queue = CircularQueue::with_capacity(4);
        queue.push_back(1);
        let id = queue.storage().buffer_id();
        queue.push_back(2);
        queue.push_front(0);
        queue.pop_back();
        assert_eq!(queue.storage().buffer_id(), id);
    }

    #[test]
    fn shared_copy_keeps_the_physical_layout() {
        let queue = CircularQueue::from_storage(Storage::with_head(4, 2, vec![3, 4, 5, 6]));
        let (head, tail) = (queue.storage().head(), queue.storage().tail());
        assert_eq!((head, tail), (2, 2));

        let mut copy = queue.clone();
        copy.swap(0, 1);
        assert_eq!((copy.storage().head(), copy.storage().tail()), (head, tail));
        assert_eq!(copy.capacity(), 4);
        assert_eq!(contents(&copy), vec![4, 3, 5, 6]);
        assert_eq!(contents(&queue), vec![3, 4, 5, 6]);
    }

    #[test]
    fn reserving_on_a_shared_queue_copies_into_the_larger_block() {
        let mut queue = CircularQueue::with_capacity(3);
        queue.push_back_iter(1..=4);
        let original = queue.clone();

        queue.reserve_capacity(2);
        assert_eq!(queue.capacity(), 5);
        assert_eq!(queue.storage().head(), 0);
        assert_eq!(original.capacity(), 3);
        assert_eq!(contents(&queue), contents(&original));
    }

    #[test]
    fn reserve_capacity_already_satisfied_does_nothing() {
        let mut queue = CircularQueue::with_capacity(5);
        queue.push_back(1);
        let copy = queue.clone();
        queue.reserve_capacity(4);
        assert!(queue.shares_storage_with(&copy));
        assert_eq!(queue.capacity(), 5);
    }

    #[test]
    fn capacity_scenario() {
        let mut queue = CircularQueue::with_capacity(3);
        queue.push_back(1);
        queue.push_back(2);
        queue.push_back(3);
        assert!(queue.is_full());
        assert_eq!(contents(&queue), vec![1, 2, 3]);

        queue.push_back(4);
        assert_eq!(contents(&queue), vec![2, 3, 4]);
        assert!(queue.is_full());
        assert_eq!(queue.capacity(), 3);

        assert_eq!(queue.pop_front(), Some(2));
        assert_eq!(contents(&queue), vec![3, 4]);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.capacity(), 3);

        queue.append_iter(vec![5, 6]);
        assert_eq!(contents(&queue), vec![3, 4, 5, 6]);
        assert_eq!(queue.capacity(), 4);
    }

    #[test]
    fn as_contiguous_on_a_wrapped_buffer() {
        let mut queue = CircularQueue::from_storage(Storage::with_head(5, 3, vec![1, 2, 3, 4, 5]));
        assert_eq!(queue.as_slices(), (&[1, 2][..], &[3, 4, 5][..]));
        assert_eq!(queue.as_contiguous(), &[1, 2, 3, 4, 5]);
        assert_eq!(queue.storage().head(), 0);
    }

    #[test]
    fn as_contiguous_on_a_shared_unwrapped_buffer_does_not_copy() {
        let mut queue: CircularQueue<_> = (1..=3).collect();
        let copy = queue.clone();
        assert_eq!(queue.as_contiguous(), &[1, 2, 3]);
        assert!(queue.shares_storage_with(&copy));
    }

    #[test]
    fn remove_all_on_a_shared_queue() {
        let mut queue: CircularQueue<_> = (1..=3).collect();
        let copy = queue.clone();
        queue.remove_all(true);
        assert_eq!(queue.capacity(), 3);
        assert!(queue.is_empty());
        assert_eq!(contents(&copy), vec![1, 2, 3]);

        let mut queue = copy.clone();
        queue.clear();
        queue.remove_all(false);
        assert_eq!(queue.capacity(), 0);
        assert_eq!(copy.len(), 3);
    }

    #[test]
    fn array_like_operations_leave_no_residual_capacity() {
        let mut queue = CircularQueue::with_capacity(10);
        queue.push_back_iter(0..4);

        queue.insert(0, 10);
        assert_eq!(contents(&queue), vec![10, 0, 1, 2, 3]);
        assert_eq!(queue.capacity(), 5);

        queue.reserve_capacity(3);
        queue.insert_iter(2, vec![20, 21]);
        assert_eq!(contents(&queue), vec![10, 0, 20, 21, 1, 2, 3]);
        assert_eq!(queue.capacity(), 7);

        queue.reserve_capacity(3);
        queue.remove_first(2);
        assert_eq!(contents(&queue), vec![20, 21, 1, 2, 3]);
        assert_eq!(queue.capacity(), 5);

        queue.reserve_capacity(3);
        queue.remove_last(2);
        assert_eq!(contents(&queue), vec![20, 21, 1]);
        assert_eq!(queue.capacity(), 3);

        queue.remove_subrange(1..2);
        assert_eq!(contents(&queue), vec![20, 1]);
        assert_eq!(queue.capacity(), 2);
    }

    #[test]
    fn empty_edits_are_no_ops() {
        let mut queue = CircularQueue::with_capacity(5);
        queue.push_back(1);
        let copy = queue.clone();
        queue.insert_iter(1, Vec::new());
        queue.remove_subrange(1..1);
        queue.remove_first(0);
        queue.append_iter(None);
        assert!(queue.shares_storage_with(&copy));
        assert_eq!(queue.capacity(), 5);
    }

    #[test]
    fn zero_capacity_pushes_hand_the_element_back() {
        let mut queue = CircularQueue::new();
        assert_eq!(queue.push_back(1), Some(1));
        assert_eq!(queue.push_front(2), Some(2));
        queue.push_back_iter(vec![1, 2]);
        queue.push_front_iter(vec![1, 2]);
        assert!(queue.is_empty());
        assert!(queue.is_full());
    }

    #[test]
    fn queue_aliases() {
        let mut queue = CircularQueue::with_capacity(3);
        assert_eq!(queue.peek(), None);
        queue.enqueue(1);
        queue.enqueue_iter(vec![2, 3, 4]);
        assert_eq!(queue.peek(), Some(&2));
        assert_eq!(queue.dequeue(), Some(2));
        assert_eq!(contents(&queue), vec![3, 4]);
    }

    #[test]
    fn front_and_back_access() {
        let mut queue: CircularQueue<_> = vec![1, 2, 3].into();
        assert_eq!(queue.front(), Some(&1));
        assert_eq!(queue.back(), Some(&3));
        *queue.front_mut().unwrap() = 10;
        *queue.back_mut().unwrap() = 30;
        assert_eq!(contents(&queue), vec![10, 2, 30]);
        assert!(queue.contains(&30));
        assert!(!queue.contains(&3));

        let mut empty: CircularQueue<i32> = CircularQueue::new();
        assert_eq!(empty.back(), None);
        assert_eq!(empty.back_mut(), None);
    }

    #[test]
    #[should_panic(expected = "insertion index (is 3) should be <= len (is 2)")]
    fn insert_past_the_end_panics() {
        let mut queue: CircularQueue<_> = vec![1, 2].into();
        queue.insert(3, 0);
    }

    #[test]
    #[should_panic(expected = "cannot remove 3 elements from a queue of len 2")]
    fn remove_last_too_many_panics() {
        let mut queue: CircularQueue<_> = vec![1, 2].into();
        queue.remove_last(3);
    }

    #[test]
    fn remove_front_and_back_pack_the_capacity() {
        let mut queue = CircularQueue::from_storage(Storage::with_head(6, 4, vec![1, 2, 3, 4, 5]));
        let snapshot = queue.clone();
        assert_eq!(queue.remove_front(), 1);
        assert_eq!(queue.remove_back(), 5);
        assert_eq!(contents(&queue), vec![2, 3, 4]);
        assert_eq!(queue.capacity(), 3);
        assert_eq!(contents(&snapshot), vec![1, 2, 3, 4, 5]);
        assert_eq!(snapshot.capacity(), 6);
    }

    #[test]
    #[should_panic(expected = "cannot remove an element from an empty queue")]
    fn remove_back_of_an_empty_queue_panics() {
        let mut queue: CircularQueue<i32> = CircularQueue::with_capacity(2);
        queue.remove_back();
    }

    #[test]
    fn from_parts_rejects_an_unallocatable_capacity() {
        let err = CircularQueue::from_parts(vec![1u64], usize::max_value()).err();
        assert_eq!(err, Some(CapacityError::TooLarge { capacity: usize::max_value() }));

        let err = CircularQueue::from_parts(vec![1u64, 2, 3], 2).err();
        assert_eq!(err, Some(CapacityError::TooSmall { capacity: 2, count: 3 }));
    }

    #[test]
    fn from_parts_with_zero_sized_elements_does_not_walk_the_capacity() {
        let queue = CircularQueue::from_parts(vec![(), ()], usize::max_value()).unwrap();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.capacity(), usize::max_value());
        assert_eq!(queue.residual_capacity(), usize::max_value() - 2);
    }
}
