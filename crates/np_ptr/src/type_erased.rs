use core::any::{Any, TypeId, type_name};
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::ptr::NonNull;

use crate::error::{PtrError, TypeMismatch, unwrap_or_raise};
use crate::non_null::{Ptr, PtrMut};

// -----------------------------------------------------------------------------
// TypeTag

/// Runtime identity of the erased pointee.
#[derive(Clone, Copy)]
pub(crate) struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    #[inline(always)]
    fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    #[inline]
    fn check<T: Any>(self) -> Result<(), TypeMismatch> {
        if self.id == TypeId::of::<T>() {
            Ok(())
        } else {
            Err(TypeMismatch {
                expected: type_name::<T>(),
                found: self.name,
            })
        }
    }
}

// -----------------------------------------------------------------------------
// Common methods

macro_rules! impl_void_ptr {
    ($ptr:ident) => {
        impl $ptr<'_> {
            /// The erased address. Never fails.
            #[inline(always)]
            pub const fn as_ptr(&self) -> *const () {
                self.ptr.as_ptr().cast_const().cast()
            }

            /// [`TypeId`] of the type that was erased.
            #[inline(always)]
            pub const fn type_id(&self) -> TypeId {
                self.tag.id
            }

            /// Name of the type that was erased, for diagnostics only.
            #[inline(always)]
            pub const fn type_name(&self) -> &'static str {
                self.tag.name
            }

            /// Returns `true` if the erased type is `T`.
            #[inline]
            pub fn is<T: Any>(&self) -> bool {
                self.tag.id == TypeId::of::<T>()
            }

            /// Recovers a read-only typed pointer, or reports why it cannot.
            #[inline]
            pub fn try_downcast<T: Any>(&self) -> Result<Ptr<'_, T>, PtrError> {
                self.tag.check::<T>()?;
                // SAFETY: the tag says the pointee is a `T`, borrowed for at least `&self`.
                Ok(unsafe { Ptr::from_non_null(self.ptr.cast()) })
            }
        }

        impl PartialEq for $ptr<'_> {
            #[inline]
            fn eq(&self, other: &Self) -> bool {
                self.ptr == other.ptr
            }
        }

        impl Eq for $ptr<'_> {}

        impl PartialOrd for $ptr<'_> {
            #[inline]
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $ptr<'_> {
            #[inline]
            fn cmp(&self, other: &Self) -> Ordering {
                self.ptr.cmp(&other.ptr)
            }
        }

        /// Hashes exactly like the raw erased address.
        impl Hash for $ptr<'_> {
            #[inline]
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.as_ptr().hash(state);
            }
        }

        impl fmt::Pointer for $ptr<'_> {
            #[inline]
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Pointer::fmt(&self.ptr, f)
            }
        }

        impl fmt::Debug for $ptr<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:p}: {})", stringify!($ptr), self.ptr, self.tag.name)
            }
        }
    };
}

// -----------------------------------------------------------------------------
// VoidPtr

/// A type-erased, read-only pointer, similar to `&'a dyn Any`.
///
/// It remembers the [`TypeId`] of what it points to, so recovering a typed
/// [`Ptr`] is checked: asking for the wrong type reports
/// [`PtrError::TypeMismatch`]. Recovery can never produce a mutable pointer.
///
/// # Examples
///
/// ```
/// use np_ptr::{VoidPtr, address_of};
///
/// let x = 8_i32;
/// let v: VoidPtr<'_> = address_of(&x).into();
///
/// assert!(v.is::<i32>());
/// assert_eq!(*v.downcast::<i32>(), 8);
/// assert!(v.try_downcast::<f32>().is_err());
/// ```
#[derive(Clone, Copy)]
pub struct VoidPtr<'a> {
    ptr: NonNull<u8>,
    tag: TypeTag,
    _marker: PhantomData<&'a ()>,
}

impl_void_ptr!(VoidPtr);

impl<'a> VoidPtr<'a> {
    /// Erases a reference.
    #[inline]
    pub fn from_ref<T: Any>(r: &'a T) -> Self {
        Self::from(Ptr::pointer_to(r))
    }

    /// Recovers a typed pointer with the full lifetime `'a`.
    ///
    /// Reports [`PtrError::TypeMismatch`] through the error hook when `T`
    /// is not the erased type.
    #[inline]
    #[track_caller]
    pub fn downcast<T: Any>(self) -> Ptr<'a, T> {
        unwrap_or_raise(Ptr::try_from(self))
    }

    /// Recovers a typed pointer without checking the tag.
    ///
    /// # Safety
    ///
    /// The erased pointee must be a valid `T`.
    #[inline(always)]
    pub const unsafe fn downcast_unchecked<T>(self) -> Ptr<'a, T> {
        // SAFETY: forwarded to the caller.
        unsafe { Ptr::from_non_null(self.ptr.cast()) }
    }

    #[inline(always)]
    pub(crate) const fn into_parts(self) -> (NonNull<u8>, TypeTag) {
        (self.ptr, self.tag)
    }
}

impl<'a, T: Any> From<Ptr<'a, T>> for VoidPtr<'a> {
    #[inline]
    fn from(value: Ptr<'a, T>) -> Self {
        Self {
            ptr: value.as_non_null().cast(),
            tag: TypeTag::of::<T>(),
            _marker: PhantomData,
        }
    }
}

impl<'a, T: Any> From<PtrMut<'a, T>> for VoidPtr<'a> {
    #[inline]
    fn from(value: PtrMut<'a, T>) -> Self {
        Self::from(Ptr::from(value))
    }
}

impl<'a> From<VoidPtrMut<'a>> for VoidPtr<'a> {
    #[inline]
    fn from(value: VoidPtrMut<'a>) -> Self {
        Self {
            ptr: value.ptr,
            tag: value.tag,
            _marker: PhantomData,
        }
    }
}

impl<'a, T: Any> TryFrom<VoidPtr<'a>> for Ptr<'a, T> {
    type Error = PtrError;

    #[inline]
    fn try_from(value: VoidPtr<'a>) -> Result<Self, PtrError> {
        value.tag.check::<T>()?;
        // SAFETY: the tag says the pointee is a `T`, borrowed for `'a`.
        Ok(unsafe { value.downcast_unchecked() })
    }
}

// -----------------------------------------------------------------------------
// VoidPtrMut

/// A type-erased, exclusive pointer, similar to `&'a mut dyn Any`.
///
/// Recovery through [`downcast_mut`](Self::downcast_mut) keeps mutability;
/// [`downcast`](Self::downcast) and the conversion into [`VoidPtr`] add const.
pub struct VoidPtrMut<'a> {
    ptr: NonNull<u8>,
    tag: TypeTag,
    _marker: PhantomData<&'a mut ()>,
}

impl_void_ptr!(VoidPtrMut);

impl<'a> VoidPtrMut<'a> {
    /// Erases a mutable reference.
    #[inline]
    pub fn from_mut<T: Any>(r: &'a mut T) -> Self {
        Self::from(PtrMut::pointer_to(r))
    }

    /// # Safety
    ///
    /// `ptr` must be valid for exclusive access during `'a`, and `tag` must
    /// describe its pointee.
    #[inline(always)]
    pub(crate) const unsafe fn from_parts(ptr: NonNull<u8>, tag: TypeTag) -> Self {
        Self {
            ptr,
            tag,
            _marker: PhantomData,
        }
    }

    /// Gets a read-only erased pointer with the **smaller** lifetime of `&self`.
    #[inline(always)]
    pub const fn as_const(&self) -> VoidPtr<'_> {
        VoidPtr {
            ptr: self.ptr,
            tag: self.tag,
            _marker: PhantomData,
        }
    }

    /// Gets a `VoidPtrMut` with the **smaller** lifetime of `&mut self`.
    #[inline(always)]
    pub const fn reborrow(&mut self) -> VoidPtrMut<'_> {
        VoidPtrMut {
            ptr: self.ptr,
            tag: self.tag,
            _marker: PhantomData,
        }
    }

    /// Recovers a read-only typed pointer, borrowing `self`.
    #[inline]
    #[track_caller]
    pub fn downcast<T: Any>(&self) -> Ptr<'_, T> {
        unwrap_or_raise(self.try_downcast())
    }

    #[inline]
    pub fn try_downcast_mut<T: Any>(self) -> Result<PtrMut<'a, T>, PtrError> {
        self.tag.check::<T>()?;
        // SAFETY: the tag says the pointee is a `T`, exclusively borrowed for `'a`.
        Ok(unsafe { PtrMut::from_non_null(self.ptr.cast()) })
    }

    /// Recovers a mutable typed pointer with the full lifetime `'a`.
    ///
    /// # Examples
    ///
    /// ```
    /// use np_ptr::VoidPtrMut;
    ///
    /// let mut x = 1_u64;
    /// let v = VoidPtrMut::from_mut(&mut x);
    /// *v.downcast_mut::<u64>() += 1;
    ///
    /// assert_eq!(x, 2);
    /// ```
    #[inline]
    #[track_caller]
    pub fn downcast_mut<T: Any>(self) -> PtrMut<'a, T> {
        unwrap_or_raise(self.try_downcast_mut())
    }

    /// # Safety
    ///
    /// The erased pointee must be a valid `T`.
    #[inline(always)]
    pub const unsafe fn downcast_unchecked_mut<T>(self) -> PtrMut<'a, T> {
        // SAFETY: forwarded to the caller.
        unsafe { PtrMut::from_non_null(self.ptr.cast()) }
    }
}

impl<'a, T: Any> From<PtrMut<'a, T>> for VoidPtrMut<'a> {
    #[inline]
    fn from(value: PtrMut<'a, T>) -> Self {
        Self {
            ptr: value.as_non_null().cast(),
            tag: TypeTag::of::<T>(),
            _marker: PhantomData,
        }
    }
}

impl<'a, T: Any> TryFrom<VoidPtrMut<'a>> for PtrMut<'a, T> {
    type Error = PtrError;

    #[inline]
    fn try_from(value: VoidPtrMut<'a>) -> Result<Self, PtrError> {
        value.try_downcast_mut()
    }
}

// -----------------------------------------------------------------------------
// Tests
