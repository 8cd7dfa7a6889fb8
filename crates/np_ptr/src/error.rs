use core::fmt;
use core::ptr;
use core::sync::atomic::{AtomicPtr, Ordering};

use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// A failed bounds check on a [`Slice`](crate::Slice) or one of its cursors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum BoundsError {
    #[error("index {index} is out of bounds for a slice of length {len}")]
    Index { index: usize, len: usize },

    #[error("called `{op}` on an empty slice")]
    Empty { op: &'static str },

    #[error("cursor position {pos} is outside of [0, {len}) and cannot be dereferenced")]
    Deref { pos: usize, len: usize },

    #[error("cannot move cursor from position {pos} by {by}: result leaves [0, {len}]")]
    Step { pos: usize, by: isize, len: usize },

    #[error("cursor offset from position {pos} by {by} overflows")]
    Overflow { pos: usize, by: isize },
}

/// A typed recovery from a [`VoidPtr`](crate::VoidPtr) named the wrong type.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("type mismatch: pointer to `{found}` cannot be cast to pointer to `{expected}`")]
pub struct TypeMismatch {
    pub expected: &'static str,
    pub found: &'static str,
}

/// Every runtime-checked failure of this crate.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PtrError {
    #[error("null address passed to a non-null pointer constructor")]
    NullAddress,

    #[error("out of bounds: {0}")]
    OutOfBounds(BoundsError),

    #[error("{0}")]
    TypeMismatch(TypeMismatch),
}

impl From<BoundsError> for PtrError {
    #[inline]
    fn from(value: BoundsError) -> Self {
        PtrError::OutOfBounds(value)
    }
}

impl From<TypeMismatch> for PtrError {
    #[inline]
    fn from(value: TypeMismatch) -> Self {
        PtrError::TypeMismatch(value)
    }
}

impl PtrError {
    /// Reports this error through the installed [`ErrorHook`].
    ///
    /// This never returns. With the default hook it panics with the
    /// error's `Display` text.
    #[cold]
    #[inline(never)]
    #[track_caller]
    pub fn raise(self) -> ! {
        let hook = HOOK.load(Ordering::Acquire);
        if hook.is_null() {
            default_hook(&self)
        } else {
            // SAFETY: only `set_error_hook` stores non-null values, and it stores `ErrorHook`s.
            let hook: ErrorHook = unsafe { core::mem::transmute::<*mut (), ErrorHook>(hook) };
            hook(&self)
        }
    }
}

impl BoundsError {
    /// Wraps this error in [`PtrError::OutOfBounds`] and raises it.
    ///
    /// ```should_panic
    /// use np_ptr::BoundsError;
    ///
    /// BoundsError::Empty { op: "front" }.raise();
    /// ```
    #[cold]
    #[inline(never)]
    #[track_caller]
    pub fn raise(self) -> ! {
        PtrError::OutOfBounds(self).raise()
    }
}

impl TypeMismatch {
    /// Wraps this error in [`PtrError::TypeMismatch`] and raises it.
    #[cold]
    #[inline(never)]
    #[track_caller]
    pub fn raise(self) -> ! {
        PtrError::TypeMismatch(self).raise()
    }
}

/// Unwraps `res`, or reports the error through the hook.
#[inline(always)]
#[track_caller]
pub(crate) fn unwrap_or_raise<T, E: Into<PtrError>>(res: Result<T, E>) -> T {
    match res {
        Ok(val) => val,
        Err(e) => Into::<PtrError>::into(e).raise(),
    }
}

// -----------------------------------------------------------------------------
// Hook

/// The error-reporting strategy invoked by every failing check.
///
/// A hook must diverge: panic, abort, or unwind with a host-specific payload.
/// Callers who want to recover use the `try_*` and `at` variants instead,
/// which return [`Result`] and never reach the hook.
pub type ErrorHook = fn(&PtrError) -> !;

static HOOK: AtomicPtr<()> = AtomicPtr::new(ptr::null_mut());

/// Installs `hook` as the process-wide error reporter.
///
/// # Examples
///
/// ```should_panic
/// use np_ptr::{PtrError, set_error_hook};
///
/// fn abort_hook(err: &PtrError) -> ! {
///     panic!("contract violation: {err}");
/// }
///
/// set_error_hook(abort_hook);
/// PtrError::NullAddress.raise();
/// ```
pub fn set_error_hook(hook: ErrorHook) {
    log::debug!("np_ptr: installing custom error hook");
    HOOK.store(hook as *mut (), Ordering::Release);
}

/// Restores the default hook, which logs the error and panics.
pub fn reset_error_hook() {
    log::debug!("np_ptr: restoring default error hook");
    HOOK.store(ptr::null_mut(), Ordering::Release);
}

#[cold]
#[track_caller]
fn default_hook(err: &PtrError) -> ! {
    log::error!("{err}");
    panic!("{}", Report(err));
}

struct Report<'a>(&'a PtrError);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "np_ptr: {}", self.0)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use std::panic::catch_unwind;
    use alloc::string::{String, ToString};

    use super::{BoundsError, PtrError, TypeMismatch, reset_error_hook, set_error_hook};

    #[test]
    fn display() {
        let err = PtrError::from(BoundsError::Index { index: 10, len: 5 });
        assert_eq!(
            err.to_string(),
            "out of bounds: index 10 is out of bounds for a slice of length 5"
        );

        let err = PtrError::from(TypeMismatch {
            expected: "f32",
            found: "i32",
        });
        assert_eq!(
            err.to_string(),
            "type mismatch: pointer to `i32` cannot be cast to pointer to `f32`"
        );
    }

    #[test]
    #[should_panic(expected = "null address")]
    fn default_hook_panics() {
        PtrError::NullAddress.raise();
    }

    #[test]
    #[should_panic(expected = "out of bounds: index 3")]
    fn bounds_error_raises_as_out_of_bounds() {
        BoundsError::Index { index: 3, len: 1 }.raise();
    }

    #[test]
    #[should_panic(expected = "type mismatch")]
    fn type_mismatch_raises() {
        TypeMismatch {
            expected: "u8",
            found: "u16",
        }
        .raise();
    }

    // The only test that swaps the hook. The custom hook keeps the original
    // message so that concurrent `should_panic` tests still match.
    #[test]
    fn custom_hook() {
        fn hook(err: &PtrError) -> ! {
            panic!("custom hook: {err}");
        }

        set_error_hook(hook);
        let payload = catch_unwind(|| {
            PtrError::NullAddress.raise();
        })
        .unwrap_err();
        reset_error_hook();

        let msg = payload.downcast_ref::<String>().unwrap();
        assert!(msg.starts_with("custom hook: null address"));
    }
}
