//! `Option<handle>` interop.
//!
//! Handles are never null, so `Option` reuses the null address as `None`
//! and adds no space. The functions here convert between that form and
//! nullable raw pointers at FFI-like boundaries.

use core::ptr::{self, NonNull};

use crate::array::ArrayPtr;
use crate::non_null::{Ptr, PtrMut};
use crate::type_erased::VoidPtr;

/// Conversion of an optional handle back to a nullable raw pointer.
pub trait OptionPtrExt {
    type Raw;

    /// Returns the address, or null for `None`.
    fn into_raw(self) -> Self::Raw;
}

impl<T> OptionPtrExt for Option<Ptr<'_, T>> {
    type Raw = *const T;

    #[inline(always)]
    fn into_raw(self) -> *const T {
        match self {
            Some(p) => p.as_ptr(),
            None => ptr::null(),
        }
    }
}

impl<T> OptionPtrExt for Option<PtrMut<'_, T>> {
    type Raw = *mut T;

    #[inline(always)]
    fn into_raw(self) -> *mut T {
        match self {
            Some(p) => p.as_ptr(),
            None => ptr::null_mut(),
        }
    }
}

impl<'a, T> Ptr<'a, T> {
    /// Creates a `Ptr` from an address that may be null.
    ///
    /// # Safety
    ///
    /// Same as [`Ptr::from_address`] when `raw` is non-null.
    ///
    /// # Examples
    ///
    /// ```
    /// use np_ptr::{OptionPtrExt, Ptr};
    ///
    /// let x = 1;
    /// let p = unsafe { Ptr::from_nullable(&raw const x) };
    /// let none = unsafe { Ptr::<i32>::from_nullable(core::ptr::null()) };
    ///
    /// assert_eq!(p.into_raw(), &raw const x);
    /// assert!(none.is_none());
    /// assert!(none.into_raw().is_null());
    /// ```
    #[inline(always)]
    pub const unsafe fn from_nullable(raw: *const T) -> Option<Self> {
        match NonNull::new(raw.cast_mut()) {
            // SAFETY: forwarded to the caller.
            Some(ptr) => Some(unsafe { Ptr::from_non_null(ptr) }),
            None => None,
        }
    }
}

impl<'a, T> PtrMut<'a, T> {
    /// Creates a `PtrMut` from an address that may be null.
    ///
    /// # Safety
    ///
    /// Same as [`PtrMut::from_address`] when `raw` is non-null.
    #[inline(always)]
    pub const unsafe fn from_nullable(raw: *mut T) -> Option<Self> {
        match NonNull::new(raw) {
            // SAFETY: forwarded to the caller.
            Some(ptr) => Some(unsafe { PtrMut::from_non_null(ptr) }),
            None => None,
        }
    }
}

const _: () = {
    assert!(size_of::<Option<Ptr<'static, u8>>>() == size_of::<*const u8>());
    assert!(size_of::<Option<Ptr<'static, [u64; 4]>>>() == size_of::<*const [u64; 4]>());
    assert!(size_of::<Option<PtrMut<'static, u32>>>() == size_of::<*mut u32>());
    assert!(size_of::<Option<Ptr<'static, str>>>() == size_of::<*const str>());
    assert!(size_of::<Option<ArrayPtr<'static, u16>>>() == size_of::<*const [u16]>());
    assert!(size_of::<Option<VoidPtr<'static>>>() == size_of::<VoidPtr<'static>>());
};
