//! Conversions between handle types that the `From` impls cannot express.
//!
//! - [`remove_const`] turns a read-only handle into a mutable one.
//! - [`unsafe_downcast`] reinterprets a "base" handle as a "derived" one.
//! - [`checked_downcast`] does the same after a runtime type check and
//!   returns `None` instead of raising on failure.
//!
//! Class hierarchies are modelled with traits. A base is a trait object
//! `dyn Base`; runtime type information comes from [`Polymorphic`], which
//! every `'static` type implements and which base traits name as a supertrait.
//!
//! ```
//! use np_ptr::{Polymorphic, PtrMut, address_of_mut, checked_downcast, impl_upcast};
//!
//! trait Shape: Polymorphic {}
//!
//! struct Square;
//! struct Circle;
//! impl Shape for Square {}
//! impl Shape for Circle {}
//!
//! impl_upcast!(Square => dyn Shape);
//!
//! let mut d = Square;
//! let b: PtrMut<'_, dyn Shape> = address_of_mut(&mut d).upcast();
//!
//! assert!(checked_downcast::<Square, _>(b.as_const()).is_some());
//! assert!(checked_downcast::<Circle, _>(b.as_const()).is_none());
//! ```

use core::any::Any;
use core::ptr::NonNull;

use crate::array::{ArrayPtr, ArrayPtrMut};
use crate::non_null::{Ptr, PtrMut};
use crate::type_erased::{VoidPtr, VoidPtrMut};

// -----------------------------------------------------------------------------
// Polymorphic

/// Runtime type information for checked downcasts.
///
/// Implemented for every sized `'static` type. Make it a supertrait of a
/// base trait so that `dyn Base` carries it in its vtable.
pub trait Polymorphic: Any {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> Polymorphic for T {
    #[inline(always)]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline(always)]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// -----------------------------------------------------------------------------
// Upcast

/// Derived-to-base conversion of raw handles.
///
/// Use [`impl_upcast!`](crate::impl_upcast) rather than implementing this
/// by hand: the macro only compiles for valid unsizing coercions.
///
/// # Safety
///
/// `upcast` must return a pointer to the same object, viewed as `B`.
pub unsafe trait Upcast<B: ?Sized> {
    fn upcast(ptr: NonNull<Self>) -> NonNull<B>;
}

// SAFETY: identity.
unsafe impl<T: ?Sized> Upcast<T> for T {
    #[inline(always)]
    fn upcast(ptr: NonNull<Self>) -> NonNull<T> {
        ptr
    }
}

/// Declares that handles to `$derived` may be converted to handles to each `$base`.
///
/// Each base is usually a trait object that `$derived` implements, or a
/// supertrait object when `$derived` is itself a trait object.
///
/// ```
/// use np_ptr::{address_of, impl_upcast};
///
/// trait Named {
///     fn name(&self) -> &str;
/// }
///
/// struct Cat;
/// impl Named for Cat {
///     fn name(&self) -> &str {
///         "cat"
///     }
/// }
///
/// impl_upcast!(Cat => dyn Named);
///
/// let cat = Cat;
/// let p = address_of(&cat).upcast::<dyn Named>();
/// assert_eq!(p.name(), "cat");
/// ```
#[macro_export]
macro_rules! impl_upcast {
    ($derived:ty => $($base:ty),+ $(,)?) => {
        $(
            // SAFETY: unsizing coercion keeps the address.
            unsafe impl $crate::Upcast<$base> for $derived {
                #[inline(always)]
                fn upcast(ptr: ::core::ptr::NonNull<Self>) -> ::core::ptr::NonNull<$base> {
                    ptr
                }
            }
        )+
    };
}

// -----------------------------------------------------------------------------
// remove_const

/// Read-only handles that have a mutable counterpart.
pub trait ConstCast {
    type Mut;

    /// # Safety
    ///
    /// See [`remove_const`].
    unsafe fn remove_const(self) -> Self::Mut;
}

impl<'a, T: ?Sized> ConstCast for Ptr<'a, T> {
    type Mut = PtrMut<'a, T>;

    #[inline(always)]
    unsafe fn remove_const(self) -> PtrMut<'a, T> {
        // SAFETY: forwarded to the caller.
        unsafe { PtrMut::from_non_null(self.as_non_null()) }
    }
}

impl<'a, T> ConstCast for ArrayPtr<'a, T> {
    type Mut = ArrayPtrMut<'a, T>;

    #[inline(always)]
    unsafe fn remove_const(self) -> ArrayPtrMut<'a, T> {
        // SAFETY: forwarded to the caller.
        unsafe { ArrayPtrMut::from_non_null(self.as_non_null()) }
    }
}

impl<'a> ConstCast for VoidPtr<'a> {
    type Mut = VoidPtrMut<'a>;

    #[inline(always)]
    unsafe fn remove_const(self) -> VoidPtrMut<'a> {
        let (ptr, tag) = self.into_parts();
        // SAFETY: forwarded to the caller.
        unsafe { VoidPtrMut::from_parts(ptr, tag) }
    }
}

/// Strips const from a handle.
///
/// # Safety
///
/// The pointee must be writable, which means the handle was derived from a
/// `&mut` (directly or through a mutable handle), and no other reference to
/// it may be used while the result is alive.
///
/// # Examples
///
/// ```
/// use np_ptr::{Ptr, address_of_mut, remove_const};
///
/// let mut x = 1;
/// let p: Ptr<'_, i32> = address_of_mut(&mut x).into();
///
/// let mut m = unsafe { remove_const(p) };
/// *m = 2;
/// assert_eq!(x, 2);
/// ```
#[inline(always)]
pub unsafe fn remove_const<P: ConstCast>(ptr: P) -> P::Mut {
    // SAFETY: forwarded to the caller.
    unsafe { ptr.remove_const() }
}

// -----------------------------------------------------------------------------
// Downcasts

/// Reinterprets a handle to a base as a handle to `D`, without checks.
///
/// To recover a type from a [`VoidPtr`] without checking its tag, use
/// [`VoidPtr::downcast_unchecked`].
///
/// # Safety
///
/// The pointee must really be a `D`.
#[inline(always)]
pub unsafe fn unsafe_downcast<'a, D, B: ?Sized>(ptr: Ptr<'a, B>) -> Ptr<'a, D> {
    // SAFETY: forwarded to the caller.
    unsafe { Ptr::from_non_null(ptr.as_non_null().cast()) }
}

/// Mutable counterpart of [`unsafe_downcast`].
///
/// # Safety
///
/// The pointee must really be a `D`.
#[inline(always)]
pub unsafe fn unsafe_downcast_mut<'a, D, B: ?Sized>(ptr: PtrMut<'a, B>) -> PtrMut<'a, D> {
    // SAFETY: forwarded to the caller.
    unsafe { PtrMut::from_non_null(ptr.as_non_null().cast()) }
}

/// Returns a handle to `D` if the pointee's dynamic type is exactly `D`.
///
/// Never raises: a mismatch is `None`.
#[inline]
pub fn checked_downcast<'a, D: Any, B: ?Sized + Polymorphic>(ptr: Ptr<'a, B>) -> Option<Ptr<'a, D>> {
    Polymorphic::as_any(ptr.into_ref())
        .downcast_ref::<D>()
        .map(Ptr::pointer_to)
}

/// Mutable counterpart of [`checked_downcast`].
#[inline]
pub fn checked_downcast_mut<'a, D: Any, B: ?Sized + Polymorphic>(
    ptr: PtrMut<'a, B>,
) -> Option<PtrMut<'a, D>> {
    Polymorphic::as_any_mut(ptr.into_mut())
        .downcast_mut::<D>()
        .map(PtrMut::pointer_to)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::{Polymorphic, checked_downcast, checked_downcast_mut, remove_const};
    use super::{unsafe_downcast, unsafe_downcast_mut};
    use crate::{ArrayPtr, Ptr, PtrMut, VoidPtr, address_of, address_of_mut, pointer_to_mut_array};

    trait Shape: Polymorphic {
        fn area(&self) -> f64;
    }

    trait Polygon: Shape {
        fn sides(&self) -> u32;
    }

    struct Square(f64);
    struct Circle(f64);

    impl Shape for Square {
        fn area(&self) -> f64 {
            self.0 * self.0
        }
    }

    impl Polygon for Square {
        fn sides(&self) -> u32 {
            4
        }
    }

    impl Shape for Circle {
        fn area(&self) -> f64 {
            3.0 * self.0 * self.0
        }
    }

    crate::impl_upcast!(Square => dyn Shape, dyn Polygon);
    crate::impl_upcast!(Circle => dyn Shape);
    crate::impl_upcast!(dyn Polygon => dyn Shape);

    #[test]
    fn upcast_keeps_address_and_dynamic_type() {
        let sq = Square(2.0);
        let p = address_of(&sq);
        let base: Ptr<'_, dyn Shape> = p.upcast();

        assert_eq!(base.as_ptr().cast::<()>(), p.as_ptr().cast::<()>());
        assert_eq!(base.area(), 4.0);

        let poly: Ptr<'_, dyn Polygon> = p.upcast();
        let shape: Ptr<'_, dyn Shape> = poly.upcast();
        assert_eq!(poly.sides(), 4);
        assert_eq!(shape, base);

        let same: Ptr<'_, Square> = p.upcast();
        assert_eq!(same, p);
    }

    #[test]
    fn checked_downcast_to_derived_and_sibling() {
        let mut d = Square(1.5);
        let addr = (&raw const d).cast::<()>();
        let b: PtrMut<'_, dyn Shape> = address_of_mut(&mut d).upcast();

        let hit = checked_downcast::<Square, _>(b.as_const()).unwrap();
        assert_eq!(hit.as_ptr().cast::<()>(), addr);
        assert_eq!(hit.0, 1.5);

        assert!(checked_downcast::<Circle, _>(b.as_const()).is_none());

        let mut hit = checked_downcast_mut::<Square, _>(b).unwrap();
        hit.0 = 3.0;
        assert_eq!(d.0, 3.0);
    }

    #[test]
    fn checked_downcast_mut_to_sibling() {
        let mut c = Circle(1.0);
        let b: PtrMut<'_, dyn Shape> = address_of_mut(&mut c).upcast();
        assert!(checked_downcast_mut::<Square, _>(b).is_none());
    }

    #[test]
    fn unchecked_downcast() {
        let mut c = Circle(2.0);
        let b: Ptr<'_, dyn Shape> = address_of(&c).upcast();
        let d = unsafe { unsafe_downcast::<Circle, _>(b) };
        assert_eq!(d.0, 2.0);

        let b: PtrMut<'_, dyn Shape> = address_of_mut(&mut c).upcast();
        let mut d = unsafe { unsafe_downcast_mut::<Circle, _>(b) };
        d.0 = 5.0;
        assert_eq!(c.0, 5.0);
    }

    #[test]
    fn const_removal() {
        let mut x = 1;
        let p: Ptr<'_, i32> = address_of_mut(&mut x).into();
        let mut m = unsafe { remove_const(p) };
        *m += 1;
        assert_eq!(x, 2);

        let mut arr = [1, 2, 3];
        let p: ArrayPtr<'_, i32> = pointer_to_mut_array(&mut arr).into();
        let mut m = unsafe { remove_const(p) };
        m[2] = 30;
        assert_eq!(arr, [1, 2, 30]);

        let mut y = 0_u8;
        let v: VoidPtr<'_> = address_of_mut(&mut y).erase().into();
        let m = unsafe { remove_const(v) };
        *m.downcast_mut::<u8>() = 9;
        assert_eq!(y, 9);
    }
}
