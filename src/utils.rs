use core::ops::Range;

use odds::IndexRange as RangeArgument;

#[inline]
pub fn wrap_add(index: usize, addend: usize, capacity: usize) -> usize {
    debug_assert!(addend <= capacity);
    let index = index + addend;
    if index >= capacity {
        index - capacity
    } else {
        index
    }
}

#[inline]
pub fn wrap_sub(index: usize, subtrahend: usize, capacity: usize) -> usize {
    debug_assert!(subtrahend <= capacity);
    if index >= subtrahend {
        index - subtrahend
    } else {
        index + capacity - subtrahend
    }
}

/// The exact length promised by an iterator's size hint, if it promises one.
///
/// Only ever used to plan how many elements to drop up front; callers must stay
/// correct when the iterator yields a different number of items.
#[inline]
pub fn exact_len<I: Iterator>(iter: &I) -> Option<usize> {
    match iter.size_hint() {
        (lower, Some(upper)) if lower == upper => Some(lower),
        _ => None,
    }
}

/// Resolves a range argument against `len`.
///
/// Panics if the range is inverted or reaches past `len`.
#[inline]
pub fn resolve_range<R>(range: &R, len: usize) -> Range<usize>
    where R: RangeArgument<usize>
{
    resolve_range_within(range, 0..len)
}

/// Resolves a range argument against `bounds`; open ends take the bounds' ends.
///
/// Panics if the range is inverted or leaves `bounds`.
pub fn resolve_range_within<R>(range: &R, bounds: Range<usize>) -> Range<usize>
    where R: RangeArgument<usize>
{
    let start = range.start().unwrap_or(bounds.start);
    let end = range.end().unwrap_or(bounds.end);
    assert!(bounds.start <= start, "range lower bound was too small");
    assert!(start <= end, "range lower bound was too large");
    assert!(end <= bounds.end, "range upper bound was too large");
    start..end
}
