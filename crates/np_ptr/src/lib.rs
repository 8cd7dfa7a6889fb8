//! Non-null, lifetime-carrying pointer handles with checked access.
//!
//! **Ptr** and **PtrMut**
//!
//! [`Ptr<'a, T>`] and [`PtrMut<'a, T>`] hold one address that is never null.
//! They dereference like `&T` / `&mut T`, but compare, order and hash by
//! address. They have no arithmetic.
//!
//! **ArrayPtr** and **ArrayPtrMut**
//!
//! [`ArrayPtr<'a, T>`] and [`ArrayPtrMut<'a, T>`] add an element count.
//! Two of them are equal only when both address and count match.
//! Dereferencing yields a [`Slice`].
//!
//! **Slice**
//!
//! [`Slice<T>`] is a bounds-checked view. Indexing, `front`/`back` and its
//! [`CheckedIter`] cursors check every access. Slices compare by content.
//!
//! **VoidPtr** and **VoidPtrMut**
//!
//! [`VoidPtr<'a>`] and [`VoidPtrMut<'a>`] erase the pointee type but remember
//! its [`TypeId`](core::any::TypeId), so recovering a typed handle is checked.
//!
//! **Casts**
//!
//! [`remove_const`], [`unsafe_downcast`] and [`checked_downcast`] cover the
//! conversions that `From` cannot. Derived-to-base conversions are declared
//! with [`impl_upcast!`].
//!
//! **Errors**
//!
//! Every failed check is reported through a replaceable [`ErrorHook`]. The
//! default hook logs the error with [`log`] and panics. Most checked
//! operations also have a `try_*` form returning [`PtrError`].
#![expect(unsafe_code, reason = "Raw pointers are inherently unsafe.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

#[cfg(any(feature = "alloc", test))]
extern crate alloc;

#[cfg(test)]
extern crate std;

// -----------------------------------------------------------------------------
// Modules

mod array;
mod cast;
mod checked_iter;
mod error;
mod non_null;
mod optional;
mod pointer_traits;
mod slice;
mod type_erased;

// -----------------------------------------------------------------------------
// Top-level exports

pub use array::{ArrayPtr, ArrayPtrMut, Contiguous};
pub use array::{pointer_to_array, pointer_to_mut_array, ptr_to_array, ptr_to_mut_array};
pub use cast::{ConstCast, Polymorphic, Upcast};
pub use cast::{checked_downcast, checked_downcast_mut, remove_const};
pub use cast::{unsafe_downcast, unsafe_downcast_mut};
pub use checked_iter::{CheckedIter, CheckedIterMut, Iter, IterMut, RevIter, RevIterMut};
pub use error::{BoundsError, ErrorHook, PtrError, TypeMismatch};
pub use error::{reset_error_hook, set_error_hook};
pub use non_null::{Ptr, PtrMut};
pub use non_null::{address_of, address_of_mut, ptr_to, ptr_to_mut, to_address};
pub use optional::OptionPtrExt;
pub use pointer_traits::Pointer;
pub use slice::Slice;
pub use type_erased::{VoidPtr, VoidPtrMut};
