//! The ring buffer engine behind `CircularQueue`.
//!
//! `Storage` owns a fixed block of `capacity` slots. The `len` live elements
//! start at physical slot `head` and wrap modulo `capacity`; `tail` is the slot
//! one past the last element. Every other slot is uninitialized.
//!
//! ```text
//!          T         H
//!    [o o o . . . . o o o]    head = 7, tail = 3, len = 6
//! ```

use alloc::boxed::Box;
use alloc::collections::TryReserveError;
use alloc::vec::Vec;
use core::iter;
use core::marker::PhantomData;
use core::mem::{self, MaybeUninit};
use core::ptr;
use core::slice;

use log::{debug, trace};

use crate::utils::*;

mod internal;
mod iterator_impls;

use self::internal::{move_out, new_buffer, release, try_new_buffer};

pub struct Storage<T> {
    buf: Box<[MaybeUninit<T>]>,
    head: usize,
    tail: usize,
    len: usize,
}

/// Front-to-back iterator over the elements of a `CircularQueue`.
#[must_use = "iterator adaptors are lazy and do nothing unless consumed"]
pub struct Iter<'a, T: 'a> {
    ring: &'a [MaybeUninit<T>],
    head: usize,
    len: usize,
}

/// Front-to-back iterator over mutable references to the elements of a `CircularQueue`.
#[must_use = "iterator adaptors are lazy and do nothing unless consumed"]
pub struct IterMut<'a, T: 'a> {
    ring: *mut T,
    capacity: usize,
    head: usize,
    len: usize,
    marker: PhantomData<&'a mut T>,
}

/// A by-value `CircularQueue` iterator.
#[must_use = "iterator adaptors are lazy and do nothing unless consumed"]
pub struct IntoIter<T> {
    inner: Storage<T>,
}

impl<T> Storage<T> {
    pub fn new(capacity: usize) -> Storage<T> {
        Storage {
            buf: new_buffer(capacity),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    /// Like `new`, but fails instead of aborting when the block cannot be allocated.
    pub fn try_new(capacity: usize) -> Result<Storage<T>, TryReserveError> {
        Ok(Storage {
            buf: try_new_buffer(capacity)?,
            head: 0,
            tail: 0,
            len: 0,
        })
    }

    /// Takes over the elements of `elements`; capacity equals their count.
    pub fn from_vec(elements: Vec<T>) -> Storage<T> {
        let len = elements.len();
        let buf = elements.into_boxed_slice();
        // `MaybeUninit<T>` has the same layout as `T`.
        let buf = unsafe { Box::from_raw(Box::into_raw(buf) as *mut [MaybeUninit<T>]) };
        Storage {
            buf,
            head: 0,
            tail: 0,
            len,
        }
    }

    pub fn repeating(element: T, count: usize) -> Storage<T>
        where T: Clone
    {
        Storage::from_vec(iter::repeat(element).take(count).collect())
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    #[inline]
    pub fn residual_capacity(&self) -> usize {
        self.capacity() - self.len
    }

    #[cfg(test)]
    pub fn head(&self) -> usize {
        self.head
    }

    #[cfg(test)]
    pub fn tail(&self) -> usize {
        self.tail
    }

    /// Address of the slot block, used to observe reallocation.
    #[cfg(test)]
    pub fn buffer_id(&self) -> *const () {
        self.buf.as_ptr() as *const ()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            let idx = self.wrap_index(index);
            unsafe { Some(&*self.ptr().add(idx)) }
        } else {
            None
        }
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len {
            let idx = self.wrap_index(index);
            unsafe { Some(&mut *self.ptr_mut().add(idx)) }
        } else {
            None
        }
    }

    pub fn swap(&mut self, i: usize, j: usize) {
        assert!(i < self.len, "swap index out of bounds: the len is {} but the index is {}", self.len, i);
        assert!(j < self.len, "swap index out of bounds: the len is {} but the index is {}", self.len, j);
        let ri = self.wrap_index(i);
        let rj = self.wrap_index(j);
        unsafe { ptr::swap(self.ptr_mut().add(ri), self.ptr_mut().add(rj)) }
    }

    #[inline]
    pub fn iter(&self) -> Iter<T> {
        Iter {
            ring: &self.buf,
            head: self.head,
            len: self.len,
        }
    }

    /// Iterates the logical positions `start..end`.
    #[inline]
    pub fn iter_range(&self, start: usize, end: usize) -> Iter<T> {
        debug_assert!(start <= end && end <= self.len);
        Iter {
            ring: &self.buf,
            head: self.wrap_index(start),
            len: end - start,
        }
    }

    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<T> {
        IterMut {
            ring: self.ptr_mut(),
            capacity: self.capacity(),
            head: self.head,
            len: self.len,
            marker: PhantomData,
        }
    }

    #[inline]
    pub fn iter_mut_range(&mut self, start: usize, end: usize) -> IterMut<T> {
        debug_assert!(start <= end && end <= self.len);
        IterMut {
            ring: self.ptr_mut(),
            capacity: self.capacity(),
            head: self.wrap_index(start),
            len: end - start,
            marker: PhantomData,
        }
    }

    /// The live elements as two physical segments, in logical order.
    pub fn as_slices(&self) -> (&[T], &[T]) {
        unsafe {
            if self.is_contiguous() {
                (self.buffer_slice(self.head, self.len), &[])
            } else {
                let pre_wrap_len = self.capacity() - self.head;
                (self.buffer_slice(self.head, pre_wrap_len),
                 self.buffer_slice(0, self.len - pre_wrap_len))
            }
        }
    }

    /// Rotates the block so the content starts at slot 0 if it currently
    /// wraps past the end, then returns it as a single slice.
    pub fn make_contiguous(&mut self) -> &mut [T] {
        if !self.is_contiguous() {
            trace!("relinearizing ring: head={} len={} cap={}", self.head, self.len, self.capacity());
            // moving uninitialized slots along with the live ones is fine
            self.buf.rotate_left(self.head);
            self.head = 0;
            self.tail = self.wrap_add(0, self.len);
        }
        let (head, len) = (self.head, self.len);
        unsafe { slice::from_raw_parts_mut(self.ptr_mut().add(head), len) }
    }

    /// Removes the first element and returns it, or `None` if empty.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let head = self.head;
        self.head = self.wrap_add(head, 1);
        self.len -= 1;
        unsafe { Some(self.buffer_read(head)) }
    }

    /// Removes the last element and returns it, or `None` if empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        self.tail = self.wrap_sub(self.tail, 1);
        self.len -= 1;
        let tail = self.tail;
        unsafe { Some(self.buffer_read(tail)) }
    }

    /// Appends `element`, evicting the first element when full.
    ///
    /// Returns the evicted element. With zero capacity `element` itself is
    /// handed back.
    pub fn push_back(&mut self, element: T) -> Option<T> {
        if self.capacity() == 0 {
            return Some(element);
        }
        let tail = self.tail;
        self.tail = self.wrap_add(tail, 1);
        if self.is_full() {
            //        H
            //        T
            // [o o o o o o]  <-(+)- x
            //
            //          H
            //          T
            // [o o o o x o]
            self.head = self.tail;
            unsafe { Some(self.buffer_replace(tail, element)) }
        } else {
            self.len += 1;
            unsafe { self.buffer_write(tail, element) }
            None
        }
    }

    /// Prepends `element`, evicting the last element when full.
    pub fn push_front(&mut self, element: T) -> Option<T> {
        if self.capacity() == 0 {
            return Some(element);
        }
        let head = self.wrap_sub(self.head, 1);
        self.head = head;
        if self.is_full() {
            self.tail = head;
            unsafe { Some(self.buffer_replace(head, element)) }
        } else {
            self.len += 1;
            unsafe { self.buffer_write(head, element) }
            None
        }
    }

    /// Pushes every element of `elements` to the back in order, evicting from
    /// the front as needed.
    pub fn push_back_iter<I>(&mut self, elements: I)
        where I: IntoIterator<Item = T>
    {
        let capacity = self.capacity();
        if capacity == 0 {
            return;
        }
        let mut elements = elements.into_iter();
        if let Some(added) = exact_len(&elements) {
            if added > capacity {
                // Only the last `capacity` incoming elements survive.
                self.truncate_front(self.len);
                self.head = 0;
                self.tail = 0;
                elements.by_ref().take(added - capacity).for_each(drop);
            } else if added > self.residual_capacity() {
                let evicted = added - self.residual_capacity();
                debug_assert!(evicted <= self.len);
                self.truncate_front(evicted);
            }
        }
        for element in elements {
            self.push_back(element);
        }
    }

    /// Pushes every element of `elements` to the front in order, evicting from
    /// the back as needed. The pushed run ends up reversed at the front.
    pub fn push_front_iter<I>(&mut self, elements: I)
        where I: IntoIterator<Item = T>
    {
        let capacity = self.capacity();
        if capacity == 0 {
            return;
        }
        let mut elements = elements.into_iter();
        if let Some(added) = exact_len(&elements) {
            if added > capacity {
                self.truncate_back(self.len);
                self.head = 0;
                self.tail = 0;
                elements.by_ref().take(added - capacity).for_each(drop);
            } else if added > self.residual_capacity() {
                let evicted = added - self.residual_capacity();
                debug_assert!(evicted <= self.len);
                self.truncate_back(evicted);
            }
        }
        for element in elements {
            self.push_front(element);
        }
    }

    /// Drops the first `count` elements.
    fn truncate_front(&mut self, count: usize) {
        debug_assert!(count <= self.len);
        let head = self.head;
        self.head = self.wrap_add(head, count);
        self.len -= count;
        unsafe {
            release(&mut self.buf, head, count);
        }
    }

    /// Drops the last `count` elements.
    fn truncate_back(&mut self, count: usize) {
        debug_assert!(count <= self.len);
        self.tail = self.wrap_sub(self.tail, count);
        self.len -= count;
        let tail = self.tail;
        unsafe {
            release(&mut self.buf, tail, count);
        }
    }

    /// Grows the block, if needed, so at least `additional` more elements fit
    /// without evicting anything.
    pub fn reserve(&mut self, additional: usize) {
        let residual = self.residual_capacity();
        if additional <= residual {
            return;
        }
        let new_capacity = self.capacity()
            .checked_add(additional - residual)
            .expect("capacity overflow");
        self.reallocate(new_capacity);
    }

    /// Moves the content to the front of a new block of `new_capacity` slots.
    fn reallocate(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity >= self.len);
        debug!("reallocating ring: cap={} -> {} len={}", self.capacity(), new_capacity, self.len);
        let mut buf = new_buffer::<T>(new_capacity);
        unsafe {
            move_out(&self.buf, self.head, self.len, buf.as_mut_ptr() as *mut T);
        }
        // the old block only holds moved-from slots now
        self.buf = buf;
        self.head = 0;
        self.tail = self.wrap_add(0, self.len);
    }

    /// An independent copy.
    ///
    /// With no `additional` capacity the layout is reproduced slot for slot,
    /// otherwise the copy is relinearized into a block `additional` slots larger.
    pub fn copy_with(&self, additional: usize) -> Storage<T>
        where T: Clone
    {
        if additional == 0 {
            return self.clone();
        }
        let capacity = self.capacity()
            .checked_add(additional)
            .expect("capacity overflow");
        let mut copy = Storage::new(capacity);
        for element in self.iter() {
            copy.push_back(element.clone());
        }
        copy
    }

    /// Drops every element. Without `keep_capacity` the block shrinks to nothing.
    pub fn remove_all(&mut self, keep_capacity: bool) {
        let (head, len) = (self.head, self.len);
        self.head = 0;
        self.tail = 0;
        self.len = 0;
        unsafe {
            release(&mut self.buf, head, len);
        }
        if !keep_capacity {
            self.buf = new_buffer(0);
        }
    }

    /// Replaces the logical positions `start..end` with `replacement`.
    ///
    /// Except when it is a no-op, this always rebuilds the ring into a fresh
    /// block with `head == 0` and no residual capacity.
    pub fn replace_subrange(&mut self, start: usize, end: usize, replacement: Vec<T>) {
        assert!(start <= end && end <= self.len,
                "range out of bounds: the len is {} but the range is {}..{}",
                self.len,
                start,
                end);
        let removed = end - start;
        match (removed, replacement.is_empty()) {
            (0, true) => {}
            (_, true) if removed == self.len => self.remove_all(false),
            _ => {
                // insertion (removed == 0), removal (replacement empty) and
                // replacement all go through the same move/copy/move
                let (mut old, gap) = self.splice(start, removed, replacement);
                unsafe {
                    release(&mut old, gap, removed);
                }
            }
        }
    }

    /// Removes and returns the element at logical `index`, rebuilding the ring
    /// like `replace_subrange` does.
    pub fn remove(&mut self, index: usize) -> T {
        assert!(index < self.len,
                "removal index (is {}) should be < len (is {})",
                index,
                self.len);
        let (old, gap) = self.splice(index, 1, Vec::new());
        unsafe { ptr::read(old[gap].as_ptr()) }
    }

    /// Rebuilds the ring into a block of exactly the resulting length: the
    /// first `start` elements, then `replacement`, then everything after the
    /// `removed` elements at `start`.
    ///
    /// The removed elements are left initialized in the returned old block,
    /// starting at the returned physical index; the caller disposes of them.
    fn splice(&mut self,
              start: usize,
              removed: usize,
              mut replacement: Vec<T>)
              -> (Box<[MaybeUninit<T>]>, usize) {
        //        H     S   E
        //  [. . o o o x x o o . .]   +   [r r r]
        //
        //   H
        //  [o o o r r r o o]
        //   M M M C C C M M
        let len = self.len;
        let inserted = replacement.len();
        let suffix = len - start - removed;
        let new_capacity = (len - removed)
            .checked_add(inserted)
            .expect("capacity overflow");
        debug!("rebuilding ring: cap={} -> {} (removed={} inserted={} at {})",
               self.capacity(),
               new_capacity,
               removed,
               inserted,
               start);

        let mut buf = new_buffer::<T>(new_capacity);
        let dst = buf.as_mut_ptr() as *mut T;
        let gap;
        unsafe {
            gap = move_out(&self.buf, self.head, start, dst);
            let next = self.wrap_add(gap, removed);
            ptr::copy_nonoverlapping(replacement.as_ptr(), dst.add(start), inserted);
            replacement.set_len(0);
            move_out(&self.buf, next, suffix, dst.add(start + inserted));
        }

        let old = mem::replace(&mut self.buf, buf);
        self.head = 0;
        self.tail = 0;
        self.len = new_capacity;
        (old, gap)
    }

    /// Builds a storage whose content starts at physical slot `head`.
    #[cfg(test)]
    pub fn with_head<I>(capacity: usize, head: usize, elements: I) -> Storage<T>
        where I: IntoIterator<Item = T>
    {
        assert!(head < capacity || capacity == 0);
        let mut storage = Storage::new(capacity);
        storage.head = head;
        storage.tail = head;
        for element in elements {
            assert!(storage.push_back(element).is_none(), "too many elements");
        }
        storage
    }
}

impl<T: Clone> Clone for Storage<T> {
    /// Copies slot for slot: same capacity, same `head`.
    fn clone(&self) -> Storage<T> {
        let mut copy = Storage::new(self.capacity());
        copy.head = self.head;
        copy.tail = self.head;
        for element in self.iter() {
            copy.push_back(element.clone());
        }
        copy
    }
}

impl<T> Drop for Storage<T> {
    fn drop(&mut self) {
        let (head, len) = (self.head, self.len);
        self.len = 0;
        unsafe {
            release(&mut self.buf, head, len);
        }
        // the boxed slots never drop their contents
    }
}
