use core::ptr::{self, NonNull};

use crate::non_null::{Ptr, PtrMut};

// -----------------------------------------------------------------------------
// Pointer

/// A uniform interface over pointer-like types.
///
/// Generic code written against `Pointer` can build a pointer from a
/// reference, read back its address and switch to a pointer of the same
/// family for another element type, without knowing whether it holds a
/// [`Ptr`], a reference or a raw pointer.
///
/// # Examples
///
/// ```
/// use np_ptr::{Pointer, Ptr};
///
/// fn make<'a, P>(r: &'a u32) -> P
/// where
///     P: Pointer<'a, Element = u32, Source = &'a u32>,
/// {
///     P::pointer_to(r)
/// }
///
/// let x = 5;
/// let a: Ptr<'_, u32> = make(&x);
/// let b: *const u32 = make(&x);
///
/// assert_eq!(a.to_address(), b);
/// ```
pub trait Pointer<'a>: Sized {
    /// The pointee type.
    type Element: ?Sized + 'a;

    /// What [`pointer_to`](Self::pointer_to) builds from: `&'a Element`
    /// for read-only pointers, `&'a mut Element` for mutable ones.
    type Source;

    /// The same kind of pointer to a `U`.
    type Rebind<U: ?Sized + 'a>: Pointer<'a, Element = U>;

    fn pointer_to(r: Self::Source) -> Self;

    /// The raw address. Never fails.
    fn to_address(&self) -> *const Self::Element;
}

impl<'a, T: ?Sized + 'a> Pointer<'a> for Ptr<'a, T> {
    type Element = T;
    type Source = &'a T;
    type Rebind<U: ?Sized + 'a> = Ptr<'a, U>;

    #[inline(always)]
    fn pointer_to(r: &'a T) -> Self {
        Ptr::pointer_to(r)
    }

    #[inline(always)]
    fn to_address(&self) -> *const T {
        self.as_ptr()
    }
}

impl<'a, T: ?Sized + 'a> Pointer<'a> for PtrMut<'a, T> {
    type Element = T;
    type Source = &'a mut T;
    type Rebind<U: ?Sized + 'a> = PtrMut<'a, U>;

    #[inline(always)]
    fn pointer_to(r: &'a mut T) -> Self {
        PtrMut::pointer_to(r)
    }

    #[inline(always)]
    fn to_address(&self) -> *const T {
        self.as_ptr().cast_const()
    }
}

impl<'a, T: ?Sized + 'a> Pointer<'a> for &'a T {
    type Element = T;
    type Source = &'a T;
    type Rebind<U: ?Sized + 'a> = &'a U;

    #[inline(always)]
    fn pointer_to(r: &'a T) -> Self {
        r
    }

    #[inline(always)]
    fn to_address(&self) -> *const T {
        ptr::from_ref(*self)
    }
}

impl<'a, T: ?Sized + 'a> Pointer<'a> for *const T {
    type Element = T;
    type Source = &'a T;
    type Rebind<U: ?Sized + 'a> = *const U;

    #[inline(always)]
    fn pointer_to(r: &'a T) -> Self {
        ptr::from_ref(r)
    }

    #[inline(always)]
    fn to_address(&self) -> *const T {
        *self
    }
}

impl<'a, T: ?Sized + 'a> Pointer<'a> for *mut T {
    type Element = T;
    type Source = &'a mut T;
    type Rebind<U: ?Sized + 'a> = *mut U;

    #[inline(always)]
    fn pointer_to(r: &'a mut T) -> Self {
        ptr::from_mut(r)
    }

    #[inline(always)]
    fn to_address(&self) -> *const T {
        self.cast_const()
    }
}

impl<'a, T: ?Sized + 'a> Pointer<'a> for NonNull<T> {
    type Element = T;
    type Source = &'a mut T;
    type Rebind<U: ?Sized + 'a> = NonNull<U>;

    #[inline(always)]
    fn pointer_to(r: &'a mut T) -> Self {
        NonNull::from_mut(r)
    }

    #[inline(always)]
    fn to_address(&self) -> *const T {
        self.as_ptr().cast_const()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::ptr::NonNull;

    use super::Pointer;
    use crate::{Ptr, PtrMut};

    fn address_via<'a, P>(r: P::Source) -> *const P::Element
    where
        P: Pointer<'a>,
    {
        P::pointer_to(r).to_address()
    }

    fn point_at_byte<'a, P>(byte: &'a u8) -> P::Rebind<u8>
    where
        P: Pointer<'a>,
        P::Rebind<u8>: Pointer<'a, Source = &'a u8>,
    {
        <P::Rebind<u8> as Pointer<'a>>::pointer_to(byte)
    }

    #[test]
    fn every_family_reports_the_same_address() {
        let x = 3_i64;
        let raw = &raw const x;

        assert_eq!(address_via::<Ptr<'_, i64>>(&x), raw);
        assert_eq!(address_via::<&i64>(&x), raw);
        assert_eq!(address_via::<*const i64>(&x), raw);

        let mut y = [0_u8; 3];
        let raw = (&raw const y).cast::<u8>();
        assert_eq!(address_via::<PtrMut<'_, [u8]>>(&mut y[..]).cast::<u8>(), raw);
        assert_eq!(address_via::<*mut [u8; 3]>(&mut y).cast::<u8>(), raw);
        assert_eq!(address_via::<NonNull<[u8; 3]>>(&mut y).cast::<u8>(), raw);
    }

    #[test]
    fn rebind_stays_in_the_family() {
        let b = 7_u8;

        let p: Ptr<'_, u8> = point_at_byte::<Ptr<'_, u32>>(&b);
        assert_eq!(*p, 7);

        let r: &u8 = point_at_byte::<&u32>(&b);
        assert_eq!(*r, 7);

        let c: *const u8 = point_at_byte::<*const str>(&b);
        assert_eq!(c, &raw const b);
    }

    #[test]
    fn to_address_of_mutable_handle() {
        let mut z = 1_u16;
        let raw = &raw const z;
        let p = <PtrMut<'_, u16> as Pointer<'_>>::pointer_to(&mut z);
        assert_eq!(Pointer::to_address(&p), raw);
    }
}
