use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};
use core::ptr::NonNull;

use crate::error::{PtrError, unwrap_or_raise};
use crate::non_null::{Ptr, PtrMut};
use crate::slice::Slice;

// -----------------------------------------------------------------------------
// Contiguous

/// Containers that store their elements in one contiguous block.
///
/// Only these can be pointed to by an [`ArrayPtr`]. Non-contiguous
/// containers such as `VecDeque` do not implement it.
pub trait Contiguous {
    type Elem;

    fn as_contiguous(&self) -> &[Self::Elem];

    fn as_contiguous_mut(&mut self) -> &mut [Self::Elem];
}

impl<T> Contiguous for [T] {
    type Elem = T;

    #[inline(always)]
    fn as_contiguous(&self) -> &[T] {
        self
    }

    #[inline(always)]
    fn as_contiguous_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T, const N: usize> Contiguous for [T; N] {
    type Elem = T;

    #[inline(always)]
    fn as_contiguous(&self) -> &[T] {
        self
    }

    #[inline(always)]
    fn as_contiguous_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T> Contiguous for Slice<T> {
    type Elem = T;

    #[inline(always)]
    fn as_contiguous(&self) -> &[T] {
        self.as_slice()
    }

    #[inline(always)]
    fn as_contiguous_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

#[cfg(feature = "alloc")]
impl<T> Contiguous for alloc::vec::Vec<T> {
    type Elem = T;

    #[inline(always)]
    fn as_contiguous(&self) -> &[T] {
        self
    }

    #[inline(always)]
    fn as_contiguous_mut(&mut self) -> &mut [T] {
        self
    }
}

#[cfg(feature = "alloc")]
impl<T> Contiguous for alloc::boxed::Box<[T]> {
    type Elem = T;

    #[inline(always)]
    fn as_contiguous(&self) -> &[T] {
        self
    }

    #[inline(always)]
    fn as_contiguous_mut(&mut self) -> &mut [T] {
        self
    }
}

// -----------------------------------------------------------------------------
// ArrayPtr

/// A non-null, read-only pointer to a run of `T`s with a runtime length.
///
/// Dereferencing yields a bounds-checked [`Slice`]. Two `ArrayPtr`s are
/// equal when they share base address **and** length; compare the slices
/// (`*a == *b`) for element-wise equality.
///
/// # Examples
///
/// ```
/// use np_ptr::pointer_to_array;
///
/// let a = [1, 2, 3, 4, 5];
/// let b = [1, 2, 3, 4, 5];
///
/// let pa = pointer_to_array(&a);
/// let pb = pointer_to_array(&b);
///
/// assert_ne!(pa, pb);
/// assert_eq!(*pa, *pb);
/// assert_eq!(pa.len(), 5);
/// ```
pub struct ArrayPtr<'a, T> {
    ptr: NonNull<[T]>,
    _marker: PhantomData<&'a [T]>,
}

impl<'a, T> ArrayPtr<'a, T> {
    /// Points to the elements of a contiguous container.
    #[inline]
    pub fn pointer_to<C: Contiguous<Elem = T> + ?Sized>(range: &'a C) -> Self {
        Self::from_slice(range.as_contiguous())
    }

    #[inline(always)]
    pub(crate) const fn from_slice(slice: &'a [T]) -> Self {
        Self {
            ptr: NonNull::from_ref(slice),
            _marker: PhantomData,
        }
    }

    /// Creates an `ArrayPtr` from the address of a first element and a
    /// length, reporting [`PtrError::NullAddress`] through the error hook
    /// when `raw` is null.
    ///
    /// # Safety
    ///
    /// The length cannot be checked. `raw` must point to at least `len`
    /// initialized `T`s that stay valid, and unmodified, for `'a`.
    ///
    /// # Examples
    ///
    /// ```
    /// use np_ptr::ArrayPtr;
    ///
    /// let a = [1, 2, 3, 4, 5];
    /// let p = unsafe { ArrayPtr::from_address_with_size(a.as_ptr(), 3) };
    ///
    /// assert_eq!(p.len(), 3);
    /// assert_eq!(p[2], 3);
    /// ```
    #[inline]
    #[track_caller]
    pub unsafe fn from_address_with_size(raw: *const T, len: usize) -> Self {
        // SAFETY: forwarded to the caller.
        unwrap_or_raise(unsafe { Self::try_from_address_with_size(raw, len) })
    }

    /// Fallible version of [`from_address_with_size`](Self::from_address_with_size).
    ///
    /// # Safety
    ///
    /// See [`from_address_with_size`](Self::from_address_with_size).
    #[inline]
    pub const unsafe fn try_from_address_with_size(
        raw: *const T,
        len: usize,
    ) -> Result<Self, PtrError> {
        match NonNull::new(raw.cast_mut()) {
            Some(base) => Ok(Self {
                ptr: NonNull::slice_from_raw_parts(base, len),
                _marker: PhantomData,
            }),
            None => Err(PtrError::NullAddress),
        }
    }

    #[inline(always)]
    pub(crate) const fn as_non_null(self) -> NonNull<[T]> {
        self.ptr
    }

    /// The address of the first element. Never fails, even when empty.
    #[inline(always)]
    pub const fn as_ptr(self) -> *const T {
        self.ptr.as_ptr().cast::<T>()
    }

    /// The number of elements pointed to.
    #[inline(always)]
    pub const fn len(self) -> usize {
        self.ptr.len()
    }

    /// Returns the view with the full lifetime `'a`.
    #[inline(always)]
    pub const fn into_slice(self) -> &'a Slice<T> {
        // SAFETY: constructed from a `&'a [T]` or under the `from_address_with_size` contract.
        Slice::from_slice(unsafe { self.ptr.as_ref() })
    }
}

impl<'a, T> Clone for ArrayPtr<'a, T> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for ArrayPtr<'a, T> {}

impl<T> Deref for ArrayPtr<'_, T> {
    type Target = Slice<T>;

    #[inline(always)]
    fn deref(&self) -> &Slice<T> {
        self.into_slice()
    }
}

impl<'a, T> From<ArrayPtrMut<'a, T>> for ArrayPtr<'a, T> {
    #[inline]
    fn from(value: ArrayPtrMut<'a, T>) -> Self {
        Self {
            ptr: value.ptr,
            _marker: PhantomData,
        }
    }
}

impl<'a, C: Contiguous + ?Sized> From<Ptr<'a, C>> for ArrayPtr<'a, C::Elem> {
    #[inline]
    fn from(value: Ptr<'a, C>) -> Self {
        value.as_array()
    }
}

impl<'a, C: Contiguous + ?Sized> From<PtrMut<'a, C>> for ArrayPtr<'a, C::Elem> {
    #[inline]
    fn from(value: PtrMut<'a, C>) -> Self {
        value.as_array().into()
    }
}

// SAFETY: `ArrayPtr<'a, T>` behaves like `&'a [T]`.
unsafe impl<T: Sync> Send for ArrayPtr<'_, T> {}
// SAFETY: `ArrayPtr<'a, T>` behaves like `&'a [T]`.
unsafe impl<T: Sync> Sync for ArrayPtr<'_, T> {}

// -----------------------------------------------------------------------------
// ArrayPtrMut

/// A non-null, exclusive pointer to a run of `T`s with a runtime length.
///
/// Dereferencing yields a mutable, bounds-checked [`Slice`].
///
/// # Examples
///
/// ```
/// use np_ptr::pointer_to_mut_array;
///
/// let mut v = vec![1, 2, 3];
/// let mut p = pointer_to_mut_array(&mut v);
///
/// p[0] = 100;
/// *p.back_mut() = 300;
///
/// assert_eq!(v, [100, 2, 300]);
/// ```
pub struct ArrayPtrMut<'a, T> {
    ptr: NonNull<[T]>,
    _marker: PhantomData<&'a mut [T]>,
}

impl<'a, T> ArrayPtrMut<'a, T> {
    /// Points to the elements of a contiguous container.
    #[inline]
    pub fn pointer_to<C: Contiguous<Elem = T> + ?Sized>(range: &'a mut C) -> Self {
        Self {
            ptr: NonNull::from_mut(range.as_contiguous_mut()),
            _marker: PhantomData,
        }
    }

    /// Mutable counterpart of [`ArrayPtr::from_address_with_size`].
    ///
    /// # Safety
    ///
    /// The length cannot be checked. `raw` must point to at least `len`
    /// initialized `T`s that stay valid, and unaliased, for `'a`.
    #[inline]
    #[track_caller]
    pub unsafe fn from_address_with_size(raw: *mut T, len: usize) -> Self {
        // SAFETY: forwarded to the caller.
        unwrap_or_raise(unsafe { Self::try_from_address_with_size(raw, len) })
    }

    /// Fallible version of [`from_address_with_size`](Self::from_address_with_size).
    ///
    /// # Safety
    ///
    /// See [`from_address_with_size`](Self::from_address_with_size).
    #[inline]
    pub const unsafe fn try_from_address_with_size(
        raw: *mut T,
        len: usize,
    ) -> Result<Self, PtrError> {
        match NonNull::new(raw) {
            Some(base) => Ok(Self {
                ptr: NonNull::slice_from_raw_parts(base, len),
                _marker: PhantomData,
            }),
            None => Err(PtrError::NullAddress),
        }
    }

    /// # Safety
    ///
    /// `ptr` must be valid for exclusive access during `'a`.
    #[inline(always)]
    pub(crate) const unsafe fn from_non_null(ptr: NonNull<[T]>) -> Self {
        Self {
            ptr,
            _marker: PhantomData,
        }
    }

    /// The address of the first element. Never fails, even when empty.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr().cast::<T>()
    }

    /// The number of elements pointed to.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.ptr.len()
    }

    /// Gets a read-only pointer with the **smaller** lifetime of `&self`.
    #[inline(always)]
    pub const fn as_const(&self) -> ArrayPtr<'_, T> {
        ArrayPtr {
            ptr: self.ptr,
            _marker: PhantomData,
        }
    }

    /// Gets an `ArrayPtrMut` with the **smaller** lifetime of `&mut self`.
    #[inline(always)]
    pub const fn reborrow(&mut self) -> ArrayPtrMut<'_, T> {
        ArrayPtrMut {
            ptr: self.ptr,
            _marker: PhantomData,
        }
    }

    /// Consumes the pointer and returns the view with the full lifetime `'a`.
    #[inline(always)]
    pub fn into_mut(self) -> &'a mut Slice<T> {
        // SAFETY: constructed from a `&'a mut [T]` or under the `from_address_with_size` contract.
        Slice::from_slice_mut(unsafe { &mut *self.ptr.as_ptr() })
    }
}

impl<T> Deref for ArrayPtrMut<'_, T> {
    type Target = Slice<T>;

    #[inline(always)]
    fn deref(&self) -> &Slice<T> {
        // SAFETY: see `into_mut`.
        Slice::from_slice(unsafe { self.ptr.as_ref() })
    }
}

impl<T> DerefMut for ArrayPtrMut<'_, T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut Slice<T> {
        // SAFETY: see `into_mut`.
        Slice::from_slice_mut(unsafe { self.ptr.as_mut() })
    }
}

impl<'a, C: Contiguous + ?Sized> From<PtrMut<'a, C>> for ArrayPtrMut<'a, C::Elem> {
    #[inline]
    fn from(value: PtrMut<'a, C>) -> Self {
        value.as_array()
    }
}

// SAFETY: `ArrayPtrMut<'a, T>` behaves like `&'a mut [T]`.
unsafe impl<T: Send> Send for ArrayPtrMut<'_, T> {}
// SAFETY: `ArrayPtrMut<'a, T>` behaves like `&'a mut [T]`.
unsafe impl<T: Sync> Sync for ArrayPtrMut<'_, T> {}

// -----------------------------------------------------------------------------
// Identity semantics

macro_rules! impl_identity_ops {
    ($ptr:ident) => {
        impl<T> PartialEq for $ptr<'_, T> {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                self.ptr.cast::<T>() == other.ptr.cast::<T>() && self.ptr.len() == other.ptr.len()
            }
        }

        impl<T> Eq for $ptr<'_, T> {}

        impl<T> PartialOrd for $ptr<'_, T> {
            #[inline]
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl<T> Ord for $ptr<'_, T> {
            #[inline]
            fn cmp(&self, other: &Self) -> Ordering {
                self.ptr
                    .cast::<T>()
                    .cmp(&other.ptr.cast::<T>())
                    .then(self.ptr.len().cmp(&other.ptr.len()))
            }
        }

        /// Hashes the base address, then the length.
        impl<T> Hash for $ptr<'_, T> {
            #[inline]
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.ptr.as_ptr().cast::<T>().cast_const().hash(state);
                state.write_usize(self.ptr.len());
            }
        }

        impl<T> fmt::Pointer for $ptr<'_, T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Pointer::fmt(&self.ptr.as_ptr().cast::<T>(), f)
            }
        }

        impl<T> fmt::Debug for $ptr<'_, T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(
                    f,
                    "{}({:p}; {})",
                    stringify!($ptr),
                    self.ptr.as_ptr().cast::<T>(),
                    self.ptr.len()
                )
            }
        }
    };
}

impl_identity_ops!(ArrayPtr);
impl_identity_ops!(ArrayPtrMut);

// -----------------------------------------------------------------------------
// Constructors

/// Points to the elements of a contiguous container, read-only.
///
/// Borrowed views (`&[T]`) are accepted directly. Owning temporaries are
/// rejected by the borrow checker once the pointer outlives them.
#[inline]
pub fn pointer_to_array<C: Contiguous + ?Sized>(range: &C) -> ArrayPtr<'_, C::Elem> {
    ArrayPtr::pointer_to(range)
}

/// Points to the elements of a contiguous container, mutably.
#[inline]
pub fn pointer_to_mut_array<C: Contiguous + ?Sized>(range: &mut C) -> ArrayPtrMut<'_, C::Elem> {
    ArrayPtrMut::pointer_to(range)
}

/// Short alias of [`pointer_to_array`].
#[inline]
pub fn ptr_to_array<C: Contiguous + ?Sized>(range: &C) -> ArrayPtr<'_, C::Elem> {
    ArrayPtr::pointer_to(range)
}

/// Short alias of [`pointer_to_mut_array`].
#[inline]
pub fn ptr_to_mut_array<C: Contiguous + ?Sized>(range: &mut C) -> ArrayPtrMut<'_, C::Elem> {
    ArrayPtrMut::pointer_to(range)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::hash::BuildHasher;
    use core::ptr;

    use foldhash::fast::FixedState;
    use hashbrown::HashSet;

    use super::{ArrayPtr, ArrayPtrMut, pointer_to_array, pointer_to_mut_array, ptr_to_array};
    use crate::{PtrError, address_of, address_of_mut};

    #[test]
    fn captures_base_and_len() {
        let arr = [1, 2, 3, 4, 5];
        let p = pointer_to_array(&arr);
        assert_eq!(p.as_ptr(), arr.as_ptr());
        assert_eq!(p.len(), 5);
        assert_eq!(p.into_slice().as_slice(), &arr);

        let p = pointer_to_array(&arr[1..3]);
        assert_eq!(p.as_ptr(), arr[1..].as_ptr());
        assert_eq!(p.len(), 2);
    }

    #[test]
    #[cfg(feature = "alloc")]
    fn from_containers() {
        use alloc::vec;

        let v = vec![1.0f32, 2.0, 3.0];
        let p: ArrayPtr<'_, f32> = address_of(&v).into();
        assert_eq!(p.as_ptr(), v.as_ptr());
        assert_eq!(p.len(), 3);

        let mut v = vec![1, 2, 3];
        let mut p: ArrayPtrMut<'_, i32> = address_of_mut(&mut v).into();
        p[1] = 20;
        assert_eq!(v, [1, 20, 3]);
    }

    #[test]
    fn from_address_with_size() {
        let arr = [1, 2, 3, 4, 5];
        let p = unsafe { ArrayPtr::from_address_with_size(arr.as_ptr(), 3) };
        assert_eq!(p.into_slice().as_slice(), &[1, 2, 3]);

        let err = unsafe { ArrayPtr::<i32>::try_from_address_with_size(ptr::null(), 3) };
        assert_eq!(err.unwrap_err(), PtrError::NullAddress);
    }

    #[test]
    #[should_panic(expected = "null address")]
    fn null_base_raises() {
        let _ = unsafe { ArrayPtrMut::<i32>::from_address_with_size(ptr::null_mut(), 0) };
    }

    #[test]
    fn identity_equality() {
        let arr = [1, 2, 3, 4, 5];
        let whole = ptr_to_array(&arr);
        let prefix = unsafe { ArrayPtr::from_address_with_size(arr.as_ptr(), 3) };

        // Same base, different length.
        assert_ne!(whole, prefix);
        assert!(prefix < whole);
        assert_eq!(whole, pointer_to_array(&arr));

        // Same contents, different storage.
        let copy = arr;
        assert_ne!(whole, pointer_to_array(&copy));
        assert_eq!(*whole, *pointer_to_array(&copy));
    }

    #[test]
    fn hash_folds_in_length() {
        let arr = [1, 2, 3, 4, 5];
        let p1 = unsafe { ArrayPtr::from_address_with_size(arr.as_ptr(), 5) };
        let p2 = unsafe { ArrayPtr::from_address_with_size(arr.as_ptr(), 3) };

        let state = FixedState::with_seed(7);
        assert_ne!(state.hash_one(p1), state.hash_one(p2));

        let mut set = HashSet::with_hasher(state);
        set.insert(p1);
        set.insert(p2);
        set.insert(pointer_to_array(&arr));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn mut_to_const() {
        let mut arr = [1, 2, 3];
        let mut p = pointer_to_mut_array(&mut arr);
        let base = p.as_ptr();
        p.reborrow()[0] = 9;
        assert_eq!(p.as_const().as_ptr().cast_mut(), base);

        let c: ArrayPtr<'_, i32> = p.into();
        assert_eq!(c.into_slice().as_slice(), &[9, 2, 3]);
    }

    #[test]
    fn empty_range() {
        let empty: [u8; 0] = [];
        let p = pointer_to_array(&empty);
        assert_eq!(p.len(), 0);
        assert!(p.is_empty());
        assert_eq!(p.as_ptr(), empty.as_ptr());
    }
}
