use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ops::{Add, AddAssign, Deref, DerefMut, Index, IndexMut, Sub, SubAssign};
use core::ptr::NonNull;

use crate::error::{BoundsError, PtrError, unwrap_or_raise};

// -----------------------------------------------------------------------------
// Position

/// A position in `[0, len]` with every move checked.
#[derive(Clone, Copy, PartialEq, Eq)]
struct Position {
    pos: usize,
    len: usize,
}

impl Position {
    #[inline]
    const fn deref(self) -> Result<usize, BoundsError> {
        if self.pos < self.len {
            Ok(self.pos)
        } else {
            Err(BoundsError::Deref {
                pos: self.pos,
                len: self.len,
            })
        }
    }

    #[inline]
    const fn offset(self, by: isize) -> Result<Self, BoundsError> {
        match self.pos.checked_add_signed(by) {
            Some(pos) if pos <= self.len => Ok(Self { pos, len: self.len }),
            Some(_) => Err(BoundsError::Step {
                pos: self.pos,
                by,
                len: self.len,
            }),
            // Below zero is a plain step error, above `usize::MAX` an overflow.
            None if by < 0 => Err(BoundsError::Step {
                pos: self.pos,
                by,
                len: self.len,
            }),
            None => Err(BoundsError::Overflow { pos: self.pos, by }),
        }
    }

    #[inline]
    const fn offset_back(self, by: isize) -> Result<Self, BoundsError> {
        match by.checked_neg() {
            Some(neg) => self.offset(neg),
            None => Err(BoundsError::Overflow { pos: self.pos, by }),
        }
    }

    #[inline]
    const fn peek(self, by: isize) -> Result<usize, BoundsError> {
        match self.offset(by) {
            Ok(pos) => pos.deref(),
            Err(e) => Err(e),
        }
    }

    #[inline]
    const fn distance(self, origin: Self) -> isize {
        self.pos.wrapping_sub(origin.pos) as isize
    }
}

// -----------------------------------------------------------------------------
// CheckedIter

/// A read-only cursor into a [`Slice`](crate::Slice) that checks every move
/// against `[0, len]` and every dereference against `[0, len)`.
///
/// Failures go through the error hook; the `try_*` methods return them
/// instead. Offsets are computed with overflow checks, so even
/// `isize::MIN`/`isize::MAX` jumps fail cleanly.
///
/// Cursors compare by position. Comparing cursors from different slices
/// is unsupported and gives an unspecified (but safe) result.
///
/// # Examples
///
/// ```
/// use np_ptr::pointer_to_array;
///
/// let p = pointer_to_array(&[1, 2, 3, 4, 5]);
///
/// let begin = p.begin();
/// let end = p.end();
///
/// assert_eq!(begin + 5, end);
/// assert_eq!(begin[1], 2);
/// assert!(begin.try_offset(6).is_err());
/// assert!(end.try_get().is_err());
/// ```
pub struct CheckedIter<'a, T> {
    base: NonNull<T>,
    at: Position,
    _marker: PhantomData<&'a [T]>,
}

impl<'a, T> CheckedIter<'a, T> {
    #[inline(always)]
    pub(crate) const fn new(slice: &'a [T], pos: usize) -> Self {
        Self {
            base: NonNull::from_ref(slice).cast(),
            at: Position {
                pos,
                len: slice.len(),
            },
            _marker: PhantomData,
        }
    }

    /// Current position, in `[0, len]`.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.at.pos
    }

    /// Length of the underlying slice.
    #[inline(always)]
    pub const fn bound(&self) -> usize {
        self.at.len
    }

    /// Address of the current position; one past the end for the end cursor.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *const T {
        self.base.as_ptr().wrapping_add(self.at.pos)
    }

    #[inline(always)]
    const fn elem(&self, pos: usize) -> &'a T {
        // SAFETY: `pos < len`, checked by `Position`.
        unsafe { &*self.base.as_ptr().add(pos) }
    }

    /// The element under the cursor, or `OutOfBounds` at the end.
    #[inline]
    pub const fn try_get(&self) -> Result<&'a T, PtrError> {
        match self.at.deref() {
            Ok(pos) => Ok(self.elem(pos)),
            Err(e) => Err(PtrError::OutOfBounds(e)),
        }
    }

    /// The element under the cursor. Raises `OutOfBounds` at the end.
    #[inline]
    #[track_caller]
    pub fn get(&self) -> &'a T {
        unwrap_or_raise(self.try_get())
    }

    /// Moves one element forward. Fails at the end and leaves the cursor as is.
    #[inline]
    pub fn try_advance(&mut self) -> Result<(), PtrError> {
        self.at = self.at.offset(1)?;
        Ok(())
    }

    /// Moves one element forward. Raises `OutOfBounds` at the end.
    #[inline]
    #[track_caller]
    pub fn advance(&mut self) {
        unwrap_or_raise(self.try_advance());
    }

    /// Moves one element back. Fails at the beginning and leaves the cursor as is.
    #[inline]
    pub fn try_retreat(&mut self) -> Result<(), PtrError> {
        self.at = self.at.offset(-1)?;
        Ok(())
    }

    /// Moves one element back. Raises `OutOfBounds` at the beginning.
    #[inline]
    #[track_caller]
    pub fn retreat(&mut self) {
        unwrap_or_raise(self.try_retreat());
    }

    /// A cursor `by` elements away from this one.
    #[inline]
    pub fn try_offset(self, by: isize) -> Result<Self, PtrError> {
        Ok(Self {
            at: self.at.offset(by)?,
            ..self
        })
    }

    /// A cursor `by` elements before this one. `isize::MIN` is an `Overflow`.
    #[inline]
    pub fn try_offset_back(self, by: isize) -> Result<Self, PtrError> {
        Ok(Self {
            at: self.at.offset_back(by)?,
            ..self
        })
    }

    /// The element `by` positions away, without moving.
    #[inline]
    pub fn try_peek(&self, by: isize) -> Result<&'a T, PtrError> {
        Ok(self.elem(self.at.peek(by)?))
    }

    #[inline]
    #[track_caller]
    pub fn peek(&self, by: isize) -> &'a T {
        unwrap_or_raise(self.try_peek(by))
    }

    /// Signed number of elements from `origin` to `self`.
    #[inline]
    pub const fn distance_from(&self, origin: &Self) -> isize {
        self.at.distance(origin.at)
    }
}

impl<T> Clone for CheckedIter<'_, T> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for CheckedIter<'_, T> {}

impl<T> Deref for CheckedIter<'_, T> {
    type Target = T;

    #[inline]
    #[track_caller]
    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T> Index<isize> for CheckedIter<'_, T> {
    type Output = T;

    #[inline]
    #[track_caller]
    fn index(&self, by: isize) -> &T {
        self.peek(by)
    }
}

impl<'a, T> From<CheckedIterMut<'a, T>> for CheckedIter<'a, T> {
    #[inline]
    fn from(value: CheckedIterMut<'a, T>) -> Self {
        Self {
            base: value.base,
            at: value.at,
            _marker: PhantomData,
        }
    }
}

// SAFETY: `CheckedIter<'a, T>` behaves like `&'a [T]`.
unsafe impl<T: Sync> Send for CheckedIter<'_, T> {}
// SAFETY: `CheckedIter<'a, T>` behaves like `&'a [T]`.
unsafe impl<T: Sync> Sync for CheckedIter<'_, T> {}

// -----------------------------------------------------------------------------
// CheckedIterMut

/// The mutable counterpart of [`CheckedIter`].
///
/// It is not `Copy`, so at most one mutable cursor exists per slice borrow.
pub struct CheckedIterMut<'a, T> {
    base: NonNull<T>,
    at: Position,
    _marker: PhantomData<&'a mut [T]>,
}

impl<'a, T> CheckedIterMut<'a, T> {
    #[inline(always)]
    pub(crate) const fn new(slice: &'a mut [T], pos: usize) -> Self {
        let len = slice.len();
        Self {
            base: NonNull::from_mut(slice).cast(),
            at: Position { pos, len },
            _marker: PhantomData,
        }
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.at.pos
    }

    #[inline(always)]
    pub const fn bound(&self) -> usize {
        self.at.len
    }

    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut T {
        self.base.as_ptr().wrapping_add(self.at.pos)
    }

    /// A read-only cursor at the same position, borrowing `self`.
    #[inline]
    pub const fn as_const(&self) -> CheckedIter<'_, T> {
        CheckedIter {
            base: self.base,
            at: self.at,
            _marker: PhantomData,
        }
    }

    #[inline(always)]
    const fn elem(&self, pos: usize) -> &T {
        // SAFETY: `pos < len`, checked by `Position`.
        unsafe { &*self.base.as_ptr().add(pos) }
    }

    /// # Safety
    ///
    /// `pos < len`, and no other reference to that element may be live for `'a`.
    #[inline(always)]
    unsafe fn elem_detached(&self, pos: usize) -> &'a mut T {
        // SAFETY: forwarded to the caller.
        unsafe { &mut *self.base.as_ptr().add(pos) }
    }

    #[inline]
    pub fn try_get(&self) -> Result<&T, PtrError> {
        Ok(self.elem(self.at.deref()?))
    }

    #[inline]
    #[track_caller]
    pub fn get(&self) -> &T {
        unwrap_or_raise(self.try_get())
    }

    #[inline]
    pub fn try_get_mut(&mut self) -> Result<&mut T, PtrError> {
        let pos = self.at.deref()?;
        // SAFETY: `pos < len`, and the result borrows `self` mutably.
        Ok(unsafe { self.elem_detached(pos) })
    }

    #[inline]
    #[track_caller]
    pub fn get_mut(&mut self) -> &mut T {
        unwrap_or_raise(self.try_get_mut())
    }

    #[inline]
    pub fn try_advance(&mut self) -> Result<(), PtrError> {
        self.at = self.at.offset(1)?;
        Ok(())
    }

    #[inline]
    #[track_caller]
    pub fn advance(&mut self) {
        unwrap_or_raise(self.try_advance());
    }

    #[inline]
    pub fn try_retreat(&mut self) -> Result<(), PtrError> {
        self.at = self.at.offset(-1)?;
        Ok(())
    }

    #[inline]
    #[track_caller]
    pub fn retreat(&mut self) {
        unwrap_or_raise(self.try_retreat());
    }

    #[inline]
    pub fn try_offset(self, by: isize) -> Result<Self, PtrError> {
        Ok(Self {
            at: self.at.offset(by)?,
            ..self
        })
    }

    #[inline]
    pub fn try_offset_back(self, by: isize) -> Result<Self, PtrError> {
        Ok(Self {
            at: self.at.offset_back(by)?,
            ..self
        })
    }

    #[inline]
    pub fn try_peek(&self, by: isize) -> Result<&T, PtrError> {
        Ok(self.elem(self.at.peek(by)?))
    }

    #[inline]
    pub fn try_peek_mut(&mut self, by: isize) -> Result<&mut T, PtrError> {
        let pos = self.at.peek(by)?;
        // SAFETY: `pos < len`, and the result borrows `self` mutably.
        Ok(unsafe { self.elem_detached(pos) })
    }

    #[inline]
    #[track_caller]
    pub fn peek(&self, by: isize) -> &T {
        unwrap_or_raise(self.try_peek(by))
    }

    #[inline]
    #[track_caller]
    pub fn peek_mut(&mut self, by: isize) -> &mut T {
        unwrap_or_raise(self.try_peek_mut(by))
    }

    #[inline]
    pub const fn distance_from(&self, origin: &Self) -> isize {
        self.at.distance(origin.at)
    }
}

impl<T> Deref for CheckedIterMut<'_, T> {
    type Target = T;

    #[inline]
    #[track_caller]
    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T> DerefMut for CheckedIterMut<'_, T> {
    #[inline]
    #[track_caller]
    fn deref_mut(&mut self) -> &mut T {
        self.get_mut()
    }
}

impl<T> Index<isize> for CheckedIterMut<'_, T> {
    type Output = T;

    #[inline]
    #[track_caller]
    fn index(&self, by: isize) -> &T {
        self.peek(by)
    }
}

impl<T> IndexMut<isize> for CheckedIterMut<'_, T> {
    #[inline]
    #[track_caller]
    fn index_mut(&mut self, by: isize) -> &mut T {
        self.peek_mut(by)
    }
}

// SAFETY: `CheckedIterMut<'a, T>` behaves like `&'a mut [T]`.
unsafe impl<T: Send> Send for CheckedIterMut<'_, T> {}
// SAFETY: `CheckedIterMut<'a, T>` behaves like `&'a mut [T]`.
unsafe impl<T: Sync> Sync for CheckedIterMut<'_, T> {}

// -----------------------------------------------------------------------------
// Shared cursor operators

macro_rules! impl_cursor_ops {
    ($iter:ident) => {
        impl<T> PartialEq for $iter<'_, T> {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                self.at.pos == other.at.pos
            }
        }

        impl<T> Eq for $iter<'_, T> {}

        impl<T> PartialOrd for $iter<'_, T> {
            #[inline]
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl<T> Ord for $iter<'_, T> {
            #[inline]
            fn cmp(&self, other: &Self) -> Ordering {
                self.at.pos.cmp(&other.at.pos)
            }
        }

        impl<T> Add<isize> for $iter<'_, T> {
            type Output = Self;

            #[inline]
            #[track_caller]
            fn add(self, by: isize) -> Self {
                unwrap_or_raise(self.try_offset(by))
            }
        }

        impl<T> Sub<isize> for $iter<'_, T> {
            type Output = Self;

            #[inline]
            #[track_caller]
            fn sub(self, by: isize) -> Self {
                unwrap_or_raise(self.try_offset_back(by))
            }
        }

        impl<T> AddAssign<isize> for $iter<'_, T> {
            #[inline]
            #[track_caller]
            fn add_assign(&mut self, by: isize) {
                self.at = unwrap_or_raise(self.at.offset(by));
            }
        }

        impl<T> SubAssign<isize> for $iter<'_, T> {
            #[inline]
            #[track_caller]
            fn sub_assign(&mut self, by: isize) {
                self.at = unwrap_or_raise(self.at.offset_back(by));
            }
        }

        impl<T> fmt::Debug for $iter<'_, T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($iter))
                    .field("base", &self.base)
                    .field("index", &self.at.pos)
                    .field("bound", &self.at.len)
                    .finish()
            }
        }
    };
}

impl_cursor_ops!(CheckedIter);
impl_cursor_ops!(CheckedIterMut);

impl<'a, T> Sub for CheckedIter<'a, T> {
    type Output = isize;

    #[inline]
    fn sub(self, origin: Self) -> isize {
        self.distance_from(&origin)
    }
}

// -----------------------------------------------------------------------------
// Reverse cursors

/// A read-only cursor that walks a [`Slice`](crate::Slice) back to front.
///
/// It wraps the forward cursor one position *after* the element it
/// designates, so [`Slice::rbegin`](crate::Slice::rbegin) wraps `end()`
/// and [`Slice::rend`](crate::Slice::rend) wraps `begin()`. Every
/// operator is mirrored: `+` moves toward the front of the slice and
/// `rbegin() < rend()`.
///
/// # Examples
///
/// ```
/// use np_ptr::pointer_to_array;
///
/// let p = pointer_to_array(&[1, 2, 3]);
/// let it = p.rbegin();
///
/// assert_eq!(*it, 3);
/// assert_eq!(it[2], 1);
/// assert_eq!((it + 3).distance_from(&it), 3);
/// assert!(p.rend().try_get().is_err());
/// ```
pub struct RevIter<'a, T>(CheckedIter<'a, T>);

/// The mutable counterpart of [`RevIter`], created by
/// [`Slice::rbegin_mut`](crate::Slice::rbegin_mut) and
/// [`Slice::rend_mut`](crate::Slice::rend_mut).
pub struct RevIterMut<'a, T>(CheckedIterMut<'a, T>);

macro_rules! impl_rev_ops {
    ($rev:ident, $fwd:ident) => {
        impl<'a, T> $rev<'a, T> {
            #[inline(always)]
            pub(crate) const fn new(base: $fwd<'a, T>) -> Self {
                Self(base)
            }

            /// Position of the element `by` steps ahead.
            #[inline]
            fn locate(&self, by: isize) -> Result<usize, BoundsError> {
                self.0.at.offset_back(by)?.peek(-1)
            }

            /// Moves one element toward the front of the slice.
            #[inline]
            pub fn try_advance(&mut self) -> Result<(), PtrError> {
                self.0.at = self.0.at.offset(-1)?;
                Ok(())
            }

            #[inline]
            #[track_caller]
            pub fn advance(&mut self) {
                unwrap_or_raise(self.try_advance());
            }

            #[inline]
            pub fn try_retreat(&mut self) -> Result<(), PtrError> {
                self.0.at = self.0.at.offset(1)?;
                Ok(())
            }

            #[inline]
            #[track_caller]
            pub fn retreat(&mut self) {
                unwrap_or_raise(self.try_retreat());
            }

            #[inline]
            pub fn try_offset(self, by: isize) -> Result<Self, PtrError> {
                self.0.try_offset_back(by).map(Self)
            }

            #[inline]
            pub fn try_offset_back(self, by: isize) -> Result<Self, PtrError> {
                self.0.try_offset(by).map(Self)
            }

            /// Signed number of steps from `origin` to `self`.
            #[inline]
            pub const fn distance_from(&self, origin: &Self) -> isize {
                origin.0.at.distance(self.0.at)
            }
        }

        impl<T> PartialEq for $rev<'_, T> {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                self.0 == other.0
            }
        }

        impl<T> Eq for $rev<'_, T> {}

        impl<T> PartialOrd for $rev<'_, T> {
            #[inline]
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl<T> Ord for $rev<'_, T> {
            #[inline]
            fn cmp(&self, other: &Self) -> Ordering {
                other.0.cmp(&self.0)
            }
        }

        impl<T> Add<isize> for $rev<'_, T> {
            type Output = Self;

            #[inline]
            #[track_caller]
            fn add(self, by: isize) -> Self {
                unwrap_or_raise(self.try_offset(by))
            }
        }

        impl<T> Sub<isize> for $rev<'_, T> {
            type Output = Self;

            #[inline]
            #[track_caller]
            fn sub(self, by: isize) -> Self {
                unwrap_or_raise(self.try_offset_back(by))
            }
        }

        impl<T> AddAssign<isize> for $rev<'_, T> {
            #[inline]
            #[track_caller]
            fn add_assign(&mut self, by: isize) {
                self.0.at = unwrap_or_raise(self.0.at.offset_back(by));
            }
        }

        impl<T> SubAssign<isize> for $rev<'_, T> {
            #[inline]
            #[track_caller]
            fn sub_assign(&mut self, by: isize) {
                self.0.at = unwrap_or_raise(self.0.at.offset(by));
            }
        }

        impl<T> Index<isize> for $rev<'_, T> {
            type Output = T;

            #[inline]
            #[track_caller]
            fn index(&self, by: isize) -> &T {
                self.peek(by)
            }
        }

        impl<T> fmt::Debug for $rev<'_, T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($rev)).field(&self.0).finish()
            }
        }
    };
}

impl_rev_ops!(RevIter, CheckedIter);
impl_rev_ops!(RevIterMut, CheckedIterMut);

impl<'a, T> RevIter<'a, T> {
    /// The forward cursor this one is built on.
    #[inline(always)]
    pub const fn base(&self) -> CheckedIter<'a, T> {
        self.0
    }

    #[inline]
    pub fn try_get(&self) -> Result<&'a T, PtrError> {
        self.try_peek(0)
    }

    #[inline]
    #[track_caller]
    pub fn get(&self) -> &'a T {
        unwrap_or_raise(self.try_get())
    }

    /// The element `by` steps ahead, without moving.
    #[inline]
    pub fn try_peek(&self, by: isize) -> Result<&'a T, PtrError> {
        Ok(self.0.elem(self.locate(by)?))
    }

    #[inline]
    #[track_caller]
    pub fn peek(&self, by: isize) -> &'a T {
        unwrap_or_raise(self.try_peek(by))
    }
}

impl<T> Clone for RevIter<'_, T> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RevIter<'_, T> {}

impl<T> Deref for RevIter<'_, T> {
    type Target = T;

    #[inline]
    #[track_caller]
    fn deref(&self) -> &T {
        self.get()
    }
}

impl<'a, T> Sub for RevIter<'a, T> {
    type Output = isize;

    #[inline]
    fn sub(self, origin: Self) -> isize {
        self.distance_from(&origin)
    }
}

impl<'a, T> From<RevIterMut<'a, T>> for RevIter<'a, T> {
    #[inline]
    fn from(value: RevIterMut<'a, T>) -> Self {
        Self(value.0.into())
    }
}

impl<'a, T> RevIterMut<'a, T> {
    /// The forward cursor this one is built on.
    #[inline(always)]
    pub fn into_base(self) -> CheckedIterMut<'a, T> {
        self.0
    }

    #[inline]
    pub const fn as_const(&self) -> RevIter<'_, T> {
        RevIter(self.0.as_const())
    }

    #[inline]
    pub fn try_get(&self) -> Result<&T, PtrError> {
        self.try_peek(0)
    }

    #[inline]
    #[track_caller]
    pub fn get(&self) -> &T {
        unwrap_or_raise(self.try_get())
    }

    #[inline]
    pub fn try_get_mut(&mut self) -> Result<&mut T, PtrError> {
        self.try_peek_mut(0)
    }

    #[inline]
    #[track_caller]
    pub fn get_mut(&mut self) -> &mut T {
        unwrap_or_raise(self.try_get_mut())
    }

    #[inline]
    pub fn try_peek(&self, by: isize) -> Result<&T, PtrError> {
        Ok(self.0.elem(self.locate(by)?))
    }

    #[inline]
    #[track_caller]
    pub fn peek(&self, by: isize) -> &T {
        unwrap_or_raise(self.try_peek(by))
    }

    #[inline]
    pub fn try_peek_mut(&mut self, by: isize) -> Result<&mut T, PtrError> {
        let pos = self.locate(by)?;
        // SAFETY: `pos < len`, and the result borrows `self` mutably.
        Ok(unsafe { self.0.elem_detached(pos) })
    }

    #[inline]
    #[track_caller]
    pub fn peek_mut(&mut self, by: isize) -> &mut T {
        unwrap_or_raise(self.try_peek_mut(by))
    }
}

impl<T> Deref for RevIterMut<'_, T> {
    type Target = T;

    #[inline]
    #[track_caller]
    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T> DerefMut for RevIterMut<'_, T> {
    #[inline]
    #[track_caller]
    fn deref_mut(&mut self) -> &mut T {
        self.get_mut()
    }
}

impl<T> IndexMut<isize> for RevIterMut<'_, T> {
    #[inline]
    #[track_caller]
    fn index_mut(&mut self, by: isize) -> &mut T {
        self.peek_mut(by)
    }
}

// -----------------------------------------------------------------------------
// Iter

/// Iterator over `&T`, driven by a pair of [`CheckedIter`]s.
pub struct Iter<'a, T> {
    front: CheckedIter<'a, T>,
    back: CheckedIter<'a, T>,
}

impl<'a, T> Iter<'a, T> {
    #[inline(always)]
    pub(crate) const fn new(front: CheckedIter<'a, T>, back: CheckedIter<'a, T>) -> Self {
        Self { front, back }
    }
}

impl<T> Clone for Iter<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        let item = self.front.get();
        self.front.advance();
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        self.back.retreat();
        Some(self.back.get())
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {
    #[inline]
    fn len(&self) -> usize {
        self.back.index() - self.front.index()
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

// -----------------------------------------------------------------------------
// IterMut

/// Iterator over `&mut T`, driven by a [`CheckedIterMut`].
pub struct IterMut<'a, T> {
    front: CheckedIterMut<'a, T>,
    back: usize,
}

impl<'a, T> IterMut<'a, T> {
    #[inline(always)]
    pub(crate) const fn new(front: CheckedIterMut<'a, T>) -> Self {
        let back = front.at.len;
        Self { front, back }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        if self.front.at.pos == self.back {
            return None;
        }
        let pos = unwrap_or_raise(self.front.at.deref());
        self.front.advance();
        // SAFETY: every position in `[front, back)` is handed out at most once.
        Some(unsafe { self.front.elem_detached(pos) })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.len();
        (len, Some(len))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.front.at.pos == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: as in `next`.
        Some(unsafe { self.front.elem_detached(self.back) })
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {
    #[inline]
    fn len(&self) -> usize {
        self.back - self.front.at.pos
    }
}

impl<T> FusedIterator for IterMut<'_, T> {}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use crate::{BoundsError, CheckedIter, PtrError, RevIter, pointer_to_array, pointer_to_mut_array};

    const ARR: [i32; 5] = [1, 2, 3, 4, 5];

    fn cursors(arr: &[i32; 5]) -> (CheckedIter<'_, i32>, CheckedIter<'_, i32>) {
        let p = pointer_to_array(arr);
        (p.into_slice().begin(), p.into_slice().end())
    }

    #[test]
    fn walk_forward_and_back() {
        let (mut it, end) = cursors(&ARR);
        let mut seen = Vec::new();
        while it != end {
            seen.push(*it);
            it.advance();
        }
        assert_eq!(seen, ARR);

        let mut seen = Vec::new();
        while it.index() != 0 {
            it.retreat();
            seen.push(*it);
        }
        seen.reverse();
        assert_eq!(seen, ARR);
    }

    #[test]
    fn comparisons() {
        let (begin, _) = cursors(&ARR);
        let next = begin + 1;

        assert_eq!(begin, begin);
        assert_ne!(begin, next);
        assert!(begin < next);
        assert!(next > begin);
        assert_eq!(next - begin, 1);
        assert_eq!(begin.distance_from(&next), -1);
    }

    #[test]
    fn random_access() {
        let arr = ARR;
        let (begin, end) = cursors(&arr);

        assert_eq!(begin + 5, end);
        assert_eq!(end - 5, begin);
        assert_eq!(begin[1], 2);
        assert_eq!(end[-1], 5);

        let mut it = begin;
        it += 3;
        assert_eq!(*it, 4);
        it -= 2;
        assert_eq!(*it, 2);
        assert_eq!(it.as_ptr(), arr[1..].as_ptr());
    }

    #[test]
    fn bounds_checked_moves() {
        let (begin, end) = cursors(&ARR);
        let n = ARR.len() as isize;

        assert!(end.try_get().is_err());
        assert!({ end }.try_advance().is_err());
        assert!({ begin }.try_retreat().is_err());

        assert!(begin.try_offset(-1).is_err());
        assert!(begin.try_offset_back(1).is_err());
        assert!(begin.try_offset(n + 1).is_err());
        assert!(end.try_offset(1).is_err());
        assert!(end.try_offset_back(n + 1).is_err());

        assert!(begin.try_peek(-1).is_err());
        assert!(begin.try_peek(n).is_err());
        assert!(begin.try_peek(n + 1).is_err());
        assert!(end.try_peek(0).is_err());
        assert!(end.try_peek(-n - 1).is_err());

        assert_eq!(
            end.try_get(),
            Err(PtrError::OutOfBounds(BoundsError::Deref { pos: 5, len: 5 }))
        );
    }

    #[test]
    fn extreme_offsets_are_rejected() {
        let (begin, end) = cursors(&ARR);

        for it in [begin, end] {
            assert!(it.try_offset(isize::MAX).is_err());
            assert!(it.try_offset(isize::MIN).is_err());
            assert!(it.try_offset_back(isize::MAX).is_err());
            assert!(it.try_offset_back(isize::MIN).is_err());
            assert!(it.try_peek(isize::MAX).is_err());
            assert!(it.try_peek(isize::MIN).is_err());
        }

        assert_eq!(
            begin.try_offset_back(isize::MIN),
            Err(PtrError::OutOfBounds(BoundsError::Overflow {
                pos: 0,
                by: isize::MIN
            }))
        );
    }

    #[test]
    #[should_panic(expected = "cannot be dereferenced")]
    fn deref_end_raises() {
        let (_, end) = cursors(&ARR);
        let _value = *end;
    }

    #[test]
    #[should_panic(expected = "cannot move cursor from position 5 by 1")]
    fn advance_end_raises() {
        let (_, mut end) = cursors(&ARR);
        end.advance();
    }

    #[test]
    #[should_panic(expected = "cannot move cursor from position 0 by -1")]
    fn retreat_begin_raises() {
        let (mut begin, _) = cursors(&ARR);
        begin.retreat();
    }

    #[test]
    #[should_panic(expected = "overflows")]
    fn subtract_min_raises() {
        let (begin, _) = cursors(&ARR);
        let _ = begin - isize::MIN;
    }

    #[test]
    fn reverse_cursors() {
        let p = pointer_to_array(&ARR);
        let (mut it, rend) = (p.rbegin(), p.rend());

        let mut seen = Vec::new();
        while it != rend {
            seen.push(*it);
            it.advance();
        }
        assert_eq!(seen, [5, 4, 3, 2, 1]);
        assert!(rend.try_get().is_err());
        assert!(p.rbegin() < rend);
        assert_eq!(p.rbegin() + 5, rend);
        assert_eq!(p.rbegin().try_peek(1), Ok(&4));
        assert!(p.rbegin().try_retreat().is_err());
    }

    #[test]
    fn reverse_cursor_arithmetic() {
        let arr = ARR;
        let p = pointer_to_array(&arr);
        let (rbegin, rend) = (p.rbegin(), p.rend());

        assert_eq!(rend - rbegin, 5);
        assert_eq!(rbegin.distance_from(&rend), -5);
        assert_eq!(rend - 5, rbegin);
        assert_eq!(rbegin[0], 5);
        assert_eq!(rbegin[4], 1);
        assert_eq!(rend[-1], 1);
        assert_eq!(rbegin.base(), p.end());

        let mut it = rbegin;
        it += 3;
        assert_eq!(*it, 2);
        assert_eq!(it.peek(-3), &5);
        it -= 1;
        assert_eq!(*it, 3);
        assert!(it > rbegin && it < rend);

        assert!(rbegin.try_peek(5).is_err());
        assert!(rbegin.try_peek(-1).is_err());
        assert!(rbegin.try_offset_back(1).is_err());
        assert_eq!(rend.try_offset_back(5), Ok(rbegin));
        for it in [rbegin, rend] {
            assert!(it.try_offset(isize::MAX).is_err());
            assert!(it.try_offset(isize::MIN).is_err());
            assert!(it.try_peek(isize::MIN).is_err());
        }
    }

    #[test]
    #[should_panic(expected = "cannot move cursor from position 5 by 1")]
    fn reverse_retreat_past_rbegin_raises() {
        let p = pointer_to_array(&ARR);
        let mut it = p.rbegin();
        it -= 1;
    }

    #[test]
    fn reverse_mutable_cursor() {
        let mut arr = ARR;
        let mut p = pointer_to_mut_array(&mut arr);

        let mut it = p.rbegin_mut();
        *it = 50;
        it.advance();
        *it.get_mut() += 10;
        it[1] = 30;
        it += 3;
        assert_eq!(*it, 1);
        assert_eq!(it.peek(-4), &50);
        *it.peek_mut(0) = 10;
        assert!(it.try_peek_mut(1).is_err());
        assert_eq!(it.as_const().try_get(), Ok(&10));

        let read: RevIter<'_, i32> = it.into();
        assert_eq!(read.base().index(), 1);
        assert_eq!(arr, [10, 2, 30, 14, 50]);
    }

    #[test]
    fn reverse_fill_through_rend_mut() {
        let mut arr = [0; 5];
        let mut p = pointer_to_mut_array(&mut arr);

        let mut it = p.rend_mut();
        let mut n = 0;
        while it.try_retreat().is_ok() {
            n += 1;
            *it = n;
        }
        assert_eq!(it.into_base().index(), 5);
        assert_eq!(arr, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn mutable_cursor_shared_reads() {
        let mut arr = ARR;
        let mut p = pointer_to_mut_array(&mut arr);
        let it = p.begin_mut() + 1;

        let a = it.get();
        let b = it.get();
        let c = it.peek(1);
        let d = &it[1];
        assert_eq!(a, b);
        assert_eq!(c, d);
        assert_eq!((*a, *c), (2, 3));
    }

    #[test]
    fn mutable_cursor() {
        let mut arr = ARR;
        let mut p = pointer_to_mut_array(&mut arr);
        let mut it = p.begin_mut();

        *it = 10;
        it.advance();
        *it.get_mut() += 10;
        it[1] = 30;
        let mut it = it + 2;
        assert_eq!(*it.peek(-3), 10);
        *it.peek_mut(1) = 50;
        assert!(it.try_peek_mut(2).is_err());

        let read: CheckedIter<'_, i32> = it.into();
        assert_eq!(*read, 4);
        assert_eq!(arr, [10, 12, 30, 4, 50]);
    }

    #[test]
    fn iterators() {
        let mut arr = ARR;
        let p = pointer_to_array(&arr);

        let evens: Vec<i32> = p.iter().filter(|x| *x % 2 == 0).copied().collect();
        assert_eq!(evens, [2, 4]);
        assert_eq!(p.iter().rev().copied().collect::<Vec<_>>(), [5, 4, 3, 2, 1]);
        assert_eq!(p.iter().len(), 5);

        let mut both = p.iter();
        assert_eq!(both.next(), Some(&1));
        assert_eq!(both.next_back(), Some(&5));
        assert_eq!(both.len(), 3);

        let mut p = pointer_to_mut_array(&mut arr);
        for x in p.iter_mut().rev().take(2) {
            *x = 0;
        }
        for x in &mut *p {
            *x += 1;
        }
        assert_eq!(arr, [2, 3, 4, 1, 1]);
    }
}
