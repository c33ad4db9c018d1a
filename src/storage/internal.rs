use alloc::boxed::Box;
use alloc::collections::TryReserveError;
use alloc::vec::Vec;
use core::mem::MaybeUninit;
use core::ptr;
use core::slice;

use super::Storage;
use crate::utils::*;

/// Allocates `capacity` uninitialized slots.
pub fn new_buffer<T>(capacity: usize) -> Box<[MaybeUninit<T>]> {
    let mut buf = Vec::with_capacity(capacity);
    // `MaybeUninit` slots need no initialization
    unsafe { buf.set_len(capacity) };
    buf.into_boxed_slice()
}

/// Allocates `capacity` uninitialized slots, reporting a size overflow or a
/// failed allocation instead of aborting.
pub fn try_new_buffer<T>(capacity: usize) -> Result<Box<[MaybeUninit<T>]>, TryReserveError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(capacity)?;
    unsafe { buf.set_len(capacity) };
    Ok(buf.into_boxed_slice())
}

/// Moves `len` initialized slots starting at physical `start` out of `ring`
/// into `dst`, unwrapping them into one contiguous run.
///
/// Returns the physical index one past the last moved slot. The moved slots
/// must be treated as uninitialized afterwards.
pub unsafe fn move_out<T>(ring: &[MaybeUninit<T>], start: usize, len: usize, dst: *mut T) -> usize {
    let capacity = ring.len();
    debug_assert!(len <= capacity,
                  "mov start={} len={} cap={}",
                  start,
                  len,
                  capacity);
    if len == 0 {
        return start;
    }

    let src = ring.as_ptr() as *const T;
    let pre_wrap_len = capacity - start;
    if pre_wrap_len < len {
        // src wraps
        //
        //    . .         S . .
        // 1 [D E _ _ _ _ A B C]
        // 2 [A B C D E]
        //    D . . . .
        //
        ptr::copy_nonoverlapping(src.add(start), dst, pre_wrap_len);
        ptr::copy_nonoverlapping(src, dst.add(pre_wrap_len), len - pre_wrap_len);
    } else {
        // src doesn't wrap
        //
        //        S . .
        // 1 [_ _ A B C _ _]
        // 2 [A B C]
        //    D . .
        //
        ptr::copy_nonoverlapping(src.add(start), dst, len);
    }
    wrap_add(start, len, capacity)
}

/// Drops `len` initialized slots starting at physical `start`, wrapping past
/// the end of `ring` if needed.
///
/// Returns the physical index one past the last released slot.
pub unsafe fn release<T>(ring: &mut [MaybeUninit<T>], start: usize, len: usize) -> usize {
    let capacity = ring.len();
    debug_assert!(len <= capacity,
                  "rel start={} len={} cap={}",
                  start,
                  len,
                  capacity);
    if len == 0 {
        return start;
    }

    let base = ring.as_mut_ptr() as *mut T;
    let pre_wrap_len = capacity - start;
    if pre_wrap_len < len {
        ptr::drop_in_place(slice::from_raw_parts_mut(base.add(start), pre_wrap_len));
        ptr::drop_in_place(slice::from_raw_parts_mut(base, len - pre_wrap_len));
    } else {
        ptr::drop_in_place(slice::from_raw_parts_mut(base.add(start), len));
    }
    wrap_add(start, len, capacity)
}

impl<T> Storage<T> {
    #[inline]
    pub fn wrap_add(&self, index: usize, addend: usize) -> usize {
        wrap_add(index, addend, self.capacity())
    }

    #[inline]
    pub fn wrap_sub(&self, index: usize, subtrahend: usize) -> usize {
        wrap_sub(index, subtrahend, self.capacity())
    }

    /// Physical slot of the logical `index`.
    #[inline]
    pub fn wrap_index(&self, index: usize) -> usize {
        self.wrap_add(self.head, index)
    }

    #[inline]
    pub fn ptr(&self) -> *const T {
        self.buf.as_ptr() as *const T
    }

    #[inline]
    pub fn ptr_mut(&mut self) -> *mut T {
        self.buf.as_mut_ptr() as *mut T
    }

    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.head + self.len <= self.capacity()
    }

    #[inline]
    pub unsafe fn buffer_read(&mut self, offset: usize) -> T {
        ptr::read(self.ptr().add(offset))
    }

    #[inline]
    pub unsafe fn buffer_replace(&mut self, offset: usize, element: T) -> T {
        ptr::replace(self.ptr_mut().add(offset), element)
    }

    #[inline]
    pub unsafe fn buffer_write(&mut self, offset: usize, element: T) {
        ptr::write(self.ptr_mut().add(offset), element);
    }

    #[inline]
    pub unsafe fn buffer_slice(&self, offset: usize, len: usize) -> &[T] {
        debug_assert!(offset + len <= self.capacity());
        slice::from_raw_parts(self.ptr().add(offset), len)
    }
}
