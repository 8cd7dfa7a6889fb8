use core::any::Any;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};
use core::ptr::{self, NonNull};

use crate::array::{ArrayPtr, ArrayPtrMut, Contiguous};
use crate::cast::Upcast;
use crate::error::{PtrError, unwrap_or_raise};
use crate::type_erased::{VoidPtr, VoidPtrMut};

// -----------------------------------------------------------------------------
// Ptr

/// A non-null, read-only pointer to a `T` that lives for `'a`.
///
/// `Ptr` has the size of `*const T`, is [`Copy`], and compares and hashes
/// by address, not by value. It has no arithmetic: no offset, no indexing.
///
/// # Examples
///
/// ```
/// use np_ptr::{Ptr, address_of};
///
/// let x = 10;
/// let p: Ptr<'_, i32> = address_of(&x);
///
/// assert_eq!(*p, 10);
/// assert_eq!(p.as_ptr(), &raw const x);
/// ```
#[repr(transparent)]
pub struct Ptr<'a, T: ?Sized>(NonNull<T>, PhantomData<&'a T>);

impl<'a, T: ?Sized> Ptr<'a, T> {
    /// Creates a `Ptr` from a reference. Same as [`address_of`].
    #[inline(always)]
    pub const fn pointer_to(r: &'a T) -> Self {
        Self(NonNull::from_ref(r), PhantomData)
    }

    /// Creates a `Ptr` from a raw address, reporting [`PtrError::NullAddress`]
    /// through the error hook when `raw` is null.
    ///
    /// # Safety
    ///
    /// If `raw` is non-null it must be
    /// [convertible to a reference](https://doc.rust-lang.org/stable/core/ptr/index.html#pointer-to-reference-conversion)
    /// that stays valid, and unmodified, for `'a`.
    ///
    /// # Examples
    ///
    /// ```should_panic
    /// use np_ptr::Ptr;
    ///
    /// let p = unsafe { Ptr::<i32>::from_address(core::ptr::null()) };
    /// ```
    #[inline]
    #[track_caller]
    pub unsafe fn from_address(raw: *const T) -> Self {
        // SAFETY: forwarded to the caller.
        unwrap_or_raise(unsafe { Self::try_from_address(raw) })
    }

    /// Fallible version of [`from_address`](Self::from_address).
    ///
    /// # Safety
    ///
    /// See [`from_address`](Self::from_address).
    #[inline]
    pub const unsafe fn try_from_address(raw: *const T) -> Result<Self, PtrError> {
        match NonNull::new(raw.cast_mut()) {
            Some(ptr) => Ok(Self(ptr, PhantomData)),
            None => Err(PtrError::NullAddress),
        }
    }

    /// # Safety
    ///
    /// `ptr` must be valid for shared access during `'a`.
    #[inline(always)]
    pub(crate) const unsafe fn from_non_null(ptr: NonNull<T>) -> Self {
        Self(ptr, PhantomData)
    }

    #[inline(always)]
    pub(crate) const fn as_non_null(self) -> NonNull<T> {
        self.0
    }

    /// Acquires the underlying `*const` pointer. Never fails.
    #[inline(always)]
    pub const fn as_ptr(self) -> *const T {
        self.0.as_ptr()
    }

    /// Returns the pointee with the full lifetime `'a`.
    #[inline(always)]
    pub const fn into_ref(self) -> &'a T {
        // SAFETY: constructed from a `&'a T` or under the `from_address` contract.
        unsafe { self.0.as_ref() }
    }

    /// Converts to a pointer to a "base" type, usually a trait object.
    ///
    /// The address and the dynamic type of the pointee are preserved.
    #[inline]
    pub fn upcast<B: ?Sized>(self) -> Ptr<'a, B>
    where
        T: Upcast<B>,
    {
        Ptr(T::upcast(self.0), PhantomData)
    }

    /// Views a contiguous container as an array pointer to its elements.
    #[inline]
    pub fn as_array(self) -> ArrayPtr<'a, T::Elem>
    where
        T: Contiguous,
    {
        ArrayPtr::pointer_to(self.into_ref())
    }
}

impl<'a, T: Any> Ptr<'a, T> {
    /// Erases the pointee type, see [`VoidPtr`].
    #[inline]
    pub fn erase(self) -> VoidPtr<'a> {
        VoidPtr::from(self)
    }
}

impl<'a, T: ?Sized> From<&'a T> for Ptr<'a, T> {
    #[inline]
    fn from(value: &'a T) -> Self {
        Self::pointer_to(value)
    }
}

impl<'a, T: ?Sized> From<&'a mut T> for Ptr<'a, T> {
    #[inline]
    fn from(value: &'a mut T) -> Self {
        Self(NonNull::from_mut(value), PhantomData)
    }
}

impl<'a, T: ?Sized> From<PtrMut<'a, T>> for Ptr<'a, T> {
    #[inline]
    fn from(value: PtrMut<'a, T>) -> Self {
        Self(value.0, PhantomData)
    }
}

impl<T: ?Sized> Clone for Ptr<'_, T> {
    #[inline(always)]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Ptr<'_, T> {}

impl<T: ?Sized> Deref for Ptr<'_, T> {
    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &T {
        self.into_ref()
    }
}

// SAFETY: `Ptr<'a, T>` behaves like `&'a T`.
unsafe impl<T: ?Sized + Sync> Send for Ptr<'_, T> {}
// SAFETY: `Ptr<'a, T>` behaves like `&'a T`.
unsafe impl<T: ?Sized + Sync> Sync for Ptr<'_, T> {}

// -----------------------------------------------------------------------------
// PtrMut

/// A non-null, exclusive pointer to a `T` that lives for `'a`.
///
/// The mutable counterpart of [`Ptr`]. It is not `Copy`; use
/// [`reborrow`](Self::reborrow) or [`as_const`](Self::as_const) to get
/// shorter-lived pointers, or convert it into a [`Ptr`] with [`From`].
///
/// # Examples
///
/// ```
/// use np_ptr::address_of_mut;
///
/// let mut i = 0;
/// let mut p = address_of_mut(&mut i);
/// *p = 5;
///
/// assert_eq!(i, 5);
/// ```
#[repr(transparent)]
pub struct PtrMut<'a, T: ?Sized>(NonNull<T>, PhantomData<&'a mut T>);

impl<'a, T: ?Sized> PtrMut<'a, T> {
    /// Creates a `PtrMut` from a mutable reference. Same as [`address_of_mut`].
    #[inline(always)]
    pub const fn pointer_to(r: &'a mut T) -> Self {
        Self(NonNull::from_mut(r), PhantomData)
    }

    /// Creates a `PtrMut` from a raw address, reporting [`PtrError::NullAddress`]
    /// through the error hook when `raw` is null.
    ///
    /// # Safety
    ///
    /// If `raw` is non-null it must be convertible to a mutable reference
    /// that stays valid, and unaliased, for `'a`.
    #[inline]
    #[track_caller]
    pub unsafe fn from_address(raw: *mut T) -> Self {
        // SAFETY: forwarded to the caller.
        unwrap_or_raise(unsafe { Self::try_from_address(raw) })
    }

    /// Fallible version of [`from_address`](Self::from_address).
    ///
    /// # Safety
    ///
    /// See [`from_address`](Self::from_address).
    #[inline]
    pub const unsafe fn try_from_address(raw: *mut T) -> Result<Self, PtrError> {
        match NonNull::new(raw) {
            Some(ptr) => Ok(Self(ptr, PhantomData)),
            None => Err(PtrError::NullAddress),
        }
    }

    /// # Safety
    ///
    /// `ptr` must be valid for exclusive access during `'a`.
    #[inline(always)]
    pub(crate) const unsafe fn from_non_null(ptr: NonNull<T>) -> Self {
        Self(ptr, PhantomData)
    }

    #[inline(always)]
    pub(crate) const fn as_non_null(&self) -> NonNull<T> {
        self.0
    }

    /// Acquires the underlying `*mut` pointer. Never fails.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut T {
        self.0.as_ptr()
    }

    /// Gets a read-only pointer with the **smaller** lifetime of `&self`.
    #[inline(always)]
    pub const fn as_const(&self) -> Ptr<'_, T> {
        Ptr(self.0, PhantomData)
    }

    /// Gets a `PtrMut` with the **smaller** lifetime of `&mut self`.
    #[inline(always)]
    pub const fn reborrow(&mut self) -> PtrMut<'_, T> {
        PtrMut(self.0, PhantomData)
    }

    /// Consumes the pointer and returns the pointee with the full lifetime `'a`.
    #[inline(always)]
    pub const fn into_mut(self) -> &'a mut T {
        // SAFETY: constructed from a `&'a mut T` or under the `from_address` contract.
        unsafe { &mut *self.0.as_ptr() }
    }

    /// Mutable counterpart of [`Ptr::upcast`].
    #[inline]
    pub fn upcast<B: ?Sized>(self) -> PtrMut<'a, B>
    where
        T: Upcast<B>,
    {
        PtrMut(T::upcast(self.0), PhantomData)
    }

    /// Views a contiguous container as a mutable array pointer to its elements.
    #[inline]
    pub fn as_array(self) -> ArrayPtrMut<'a, T::Elem>
    where
        T: Contiguous,
    {
        ArrayPtrMut::pointer_to(self.into_mut())
    }
}

impl<'a, T: Any> PtrMut<'a, T> {
    /// Erases the pointee type, see [`VoidPtrMut`].
    #[inline]
    pub fn erase(self) -> VoidPtrMut<'a> {
        VoidPtrMut::from(self)
    }
}

impl<'a, T: ?Sized> From<&'a mut T> for PtrMut<'a, T> {
    #[inline]
    fn from(value: &'a mut T) -> Self {
        Self::pointer_to(value)
    }
}

impl<T: ?Sized> Deref for PtrMut<'_, T> {
    type Target = T;

    #[inline(always)]
    fn deref(&self) -> &T {
        // SAFETY: see `into_mut`.
        unsafe { self.0.as_ref() }
    }
}

impl<T: ?Sized> DerefMut for PtrMut<'_, T> {
    #[inline(always)]
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: see `into_mut`.
        unsafe { self.0.as_mut() }
    }
}

// SAFETY: `PtrMut<'a, T>` behaves like `&'a mut T`.
unsafe impl<T: ?Sized + Send> Send for PtrMut<'_, T> {}
// SAFETY: `PtrMut<'a, T>` behaves like `&'a mut T`.
unsafe impl<T: ?Sized + Sync> Sync for PtrMut<'_, T> {}

// -----------------------------------------------------------------------------
// Address semantics

macro_rules! impl_address_ops {
    ($ptr:ident) => {
        impl<T: ?Sized> PartialEq for $ptr<'_, T> {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                ptr::eq(self.0.as_ptr(), other.0.as_ptr())
            }
        }

        impl<T: ?Sized> Eq for $ptr<'_, T> {}

        impl<T: ?Sized> PartialOrd for $ptr<'_, T> {
            #[inline]
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl<T: ?Sized> Ord for $ptr<'_, T> {
            /// Orders by address, then by metadata for unsized pointees.
            #[inline]
            #[allow(ambiguous_wide_pointer_comparisons)]
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.as_ptr().cast_const().cmp(&other.0.as_ptr().cast_const())
            }
        }

        /// Hashes exactly like the raw pointer, metadata included.
        impl<T: ?Sized> Hash for $ptr<'_, T> {
            #[inline]
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.as_ptr().cast_const().hash(state);
            }
        }

        impl<T: ?Sized> fmt::Pointer for $ptr<'_, T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Pointer::fmt(&self.0.as_ptr(), f)
            }
        }

        impl<T: ?Sized> fmt::Debug for $ptr<'_, T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:p})", stringify!($ptr), self.0.as_ptr())
            }
        }
    };
}

impl_address_ops!(Ptr);
impl_address_ops!(PtrMut);

const _: () = {
    assert!(size_of::<Ptr<'static, u64>>() == size_of::<*const u64>());
    assert!(size_of::<PtrMut<'static, u64>>() == size_of::<*mut u64>());
    assert!(size_of::<Ptr<'static, dyn Any>>() == size_of::<*const dyn Any>());
};

// -----------------------------------------------------------------------------
// Constructors

/// Takes the address of `obj` as a read-only [`Ptr`].
///
/// Temporaries are rejected by the borrow checker as soon as the pointer
/// outlives the statement.
#[inline(always)]
pub const fn address_of<T: ?Sized>(obj: &T) -> Ptr<'_, T> {
    Ptr::pointer_to(obj)
}

/// Takes the address of `obj` as a mutable [`PtrMut`].
#[inline(always)]
pub const fn address_of_mut<T: ?Sized>(obj: &mut T) -> PtrMut<'_, T> {
    PtrMut::pointer_to(obj)
}

/// Short alias of [`address_of`].
#[inline(always)]
pub const fn ptr_to<T: ?Sized>(obj: &T) -> Ptr<'_, T> {
    Ptr::pointer_to(obj)
}

/// Short alias of [`address_of_mut`].
#[inline(always)]
pub const fn ptr_to_mut<T: ?Sized>(obj: &mut T) -> PtrMut<'_, T> {
    PtrMut::pointer_to(obj)
}

/// Returns the raw address held by `ptr`.
#[inline(always)]
pub const fn to_address<T: ?Sized>(ptr: Ptr<'_, T>) -> *const T {
    ptr.as_ptr()
}

// -----------------------------------------------------------------------------
// Tests
