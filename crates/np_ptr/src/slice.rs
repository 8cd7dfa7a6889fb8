use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::{Index, IndexMut};

use crate::checked_iter::{CheckedIter, CheckedIterMut, Iter, IterMut, RevIter, RevIterMut};
use crate::error::{BoundsError, PtrError, unwrap_or_raise};

/// A bounds-checked view over `[T]`, obtained by dereferencing an
/// [`ArrayPtr`](crate::ArrayPtr) or [`ArrayPtrMut`](crate::ArrayPtrMut).
///
/// `Slice` is unsized, so it only ever exists behind a reference: it can be
/// neither copied nor moved, and it lives exactly as long as the array
/// pointer it came from. Constness is deep: `&Slice<T>` permits no element
/// mutation, `&mut Slice<T>` does.
///
/// Indexing and [`front`](Self::front)/[`back`](Self::back) report failures
/// through the error hook; [`at`](Self::at) returns them as a [`Result`].
///
/// # Examples
///
/// ```
/// use np_ptr::pointer_to_mut_array;
///
/// let mut v = vec![3, 1, 2];
/// let mut p = pointer_to_mut_array(&mut v);
///
/// p[0] = 100;
/// assert!(p.at(3).is_err());
///
/// let sum: i32 = p.iter().sum();
/// assert_eq!(sum, 103);
/// ```
#[repr(transparent)]
pub struct Slice<T>([T]);

impl<T> Slice<T> {
    #[inline(always)]
    pub(crate) const fn from_slice(slice: &[T]) -> &Slice<T> {
        // SAFETY: `Slice<T>` is `repr(transparent)` over `[T]`.
        unsafe { &*(slice as *const [T] as *const Slice<T>) }
    }

    #[inline(always)]
    pub(crate) const fn from_slice_mut(slice: &mut [T]) -> &mut Slice<T> {
        // SAFETY: `Slice<T>` is `repr(transparent)` over `[T]`.
        unsafe { &mut *(slice as *mut [T] as *mut Slice<T>) }
    }

    /// Number of elements.
    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the view has no elements.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Address of the first element, dangling but non-null when empty.
    #[inline(always)]
    pub const fn as_ptr(&self) -> *const T {
        self.0.as_ptr()
    }

    /// Mutable counterpart of [`as_ptr`](Self::as_ptr).
    #[inline(always)]
    pub const fn as_mut_ptr(&mut self) -> *mut T {
        self.0.as_mut_ptr()
    }

    /// The elements as a native slice.
    #[inline(always)]
    pub const fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// The elements as a native mutable slice.
    #[inline(always)]
    pub const fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.0
    }

    /// The element at `index`, or `None` out of range.
    ///
    /// Never raises. Use [`at`](Self::at) for the error value, or
    /// indexing to go through the error hook.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.0.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.0.get_mut(index)
    }

    /// Checked access that hands the failure back to the caller.
    ///
    /// # Examples
    ///
    /// ```
    /// use np_ptr::{BoundsError, PtrError, pointer_to_array};
    ///
    /// let p = pointer_to_array(&[1, 2, 3]);
    ///
    /// assert_eq!(p.at(1), Ok(&2));
    /// assert_eq!(
    ///     p.at(5),
    ///     Err(PtrError::OutOfBounds(BoundsError::Index { index: 5, len: 3 })),
    /// );
    /// ```
    #[inline]
    pub fn at(&self, index: usize) -> Result<&T, PtrError> {
        let len = self.len();
        self.0
            .get(index)
            .ok_or(PtrError::OutOfBounds(BoundsError::Index { index, len }))
    }

    /// Mutable counterpart of [`at`](Self::at).
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, PtrError> {
        let len = self.len();
        self.0
            .get_mut(index)
            .ok_or(PtrError::OutOfBounds(BoundsError::Index { index, len }))
    }

    /// The first element. Raises `OutOfBounds` when empty.
    #[inline]
    #[track_caller]
    pub fn front(&self) -> &T {
        match self.0.first() {
            Some(val) => val,
            None => BoundsError::Empty { op: "front" }.raise(),
        }
    }

    /// The last element. Raises `OutOfBounds` when empty.
    #[inline]
    #[track_caller]
    pub fn back(&self) -> &T {
        match self.0.last() {
            Some(val) => val,
            None => BoundsError::Empty { op: "back" }.raise(),
        }
    }

    #[inline]
    #[track_caller]
    pub fn front_mut(&mut self) -> &mut T {
        match self.0.first_mut() {
            Some(val) => val,
            None => BoundsError::Empty { op: "front_mut" }.raise(),
        }
    }

    #[inline]
    #[track_caller]
    pub fn back_mut(&mut self) -> &mut T {
        match self.0.last_mut() {
            Some(val) => val,
            None => BoundsError::Empty { op: "back_mut" }.raise(),
        }
    }

    /// A cursor at the first element.
    #[inline]
    pub fn begin(&self) -> CheckedIter<'_, T> {
        CheckedIter::new(&self.0, 0)
    }

    /// A cursor one past the last element.
    #[inline]
    pub fn end(&self) -> CheckedIter<'_, T> {
        CheckedIter::new(&self.0, self.len())
    }

    /// A mutable cursor at the first element.
    #[inline]
    pub fn begin_mut(&mut self) -> CheckedIterMut<'_, T> {
        CheckedIterMut::new(&mut self.0, 0)
    }

    /// A mutable cursor one past the last element.
    #[inline]
    pub fn end_mut(&mut self) -> CheckedIterMut<'_, T> {
        let len = self.len();
        CheckedIterMut::new(&mut self.0, len)
    }

    /// A reverse cursor at the last element.
    #[inline]
    pub fn rbegin(&self) -> RevIter<'_, T> {
        RevIter::new(self.end())
    }

    /// A reverse cursor one before the first element.
    #[inline]
    pub fn rend(&self) -> RevIter<'_, T> {
        RevIter::new(self.begin())
    }

    /// A mutable reverse cursor at the last element.
    #[inline]
    pub fn rbegin_mut(&mut self) -> RevIterMut<'_, T> {
        RevIterMut::new(self.end_mut())
    }

    #[inline]
    pub fn rend_mut(&mut self) -> RevIterMut<'_, T> {
        RevIterMut::new(self.begin_mut())
    }

    /// An iterator over the elements, usable with every iterator adapter.
    #[inline]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.begin(), self.end())
    }

    #[inline]
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self.begin_mut())
    }
}

// -----------------------------------------------------------------------------
// Indexing

impl<T> Index<usize> for Slice<T> {
    type Output = T;

    #[inline]
    #[track_caller]
    fn index(&self, index: usize) -> &T {
        unwrap_or_raise(self.at(index))
    }
}

impl<T> IndexMut<usize> for Slice<T> {
    #[inline]
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut T {
        unwrap_or_raise(self.at_mut(index))
    }
}

impl<'a, T> IntoIterator for &'a Slice<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Slice<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> IterMut<'a, T> {
        self.iter_mut()
    }
}

impl<T> AsRef<[T]> for Slice<T> {
    #[inline]
    fn as_ref(&self) -> &[T] {
        &self.0
    }
}

impl<T> AsMut<[T]> for Slice<T> {
    #[inline]
    fn as_mut(&mut self) -> &mut [T] {
        &mut self.0
    }
}

// -----------------------------------------------------------------------------
// Structural comparison

impl<T: PartialEq<U>, U> PartialEq<Slice<U>> for Slice<T> {
    #[inline]
    fn eq(&self, other: &Slice<U>) -> bool {
        self.0 == other.0
    }
}

impl<T: Eq> Eq for Slice<T> {}

/// Lexicographic. A shorter slice orders before a longer one with the same
/// prefix; any unordered element pair makes the whole comparison `None`.
impl<T: PartialOrd> PartialOrd for Slice<T> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl<T: Ord> Ord for Slice<T> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T: Hash> Hash for Slice<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T: fmt::Debug> fmt::Debug for Slice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.0).finish()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::cmp::Ordering;

    use crate::{ArrayPtr, BoundsError, PtrError, pointer_to_array, pointer_to_mut_array};

    #[test]
    fn accessors() {
        let arr = [0, 1, 2, 3, 4];
        let p = pointer_to_array(&arr);
        let slice = &*p;

        assert!(core::ptr::eq(&slice[0], &arr[0]));
        assert!(core::ptr::eq(slice.at(1).unwrap(), &arr[1]));
        assert!(core::ptr::eq(slice.front(), &arr[0]));
        assert!(core::ptr::eq(slice.back(), &arr[4]));

        assert_eq!(slice.len(), 5);
        assert!(!slice.is_empty());
        assert_eq!(slice.as_ptr(), arr.as_ptr());
        assert!(slice.iter().eq(arr.iter()));
        assert!(slice.iter().rev().eq(arr.iter().rev()));
    }

    #[test]
    fn mutation_through_view() {
        let mut arr = [5, 4, 3, 2, 1];
        let mut p = pointer_to_mut_array(&mut arr);

        p[0] = 50;
        *p.at_mut(1).unwrap() = 40;
        *p.front_mut() += 1;
        *p.back_mut() = 10;
        for x in p.iter_mut().skip(2).take(2) {
            *x *= 10;
        }
        p.as_mut_slice().sort();

        assert_eq!(arr, [10, 20, 30, 40, 51]);
    }

    #[test]
    fn empty_view() {
        let arr: [i32; 0] = [];
        let p = pointer_to_array(&arr);

        assert_eq!(p.len(), 0);
        assert!(p.is_empty());
        assert_eq!(p.as_ptr(), arr.as_ptr());
        assert_eq!(p.iter().count(), 0);
        assert_eq!(p.get(0), None);
        assert_eq!(
            p.at(0),
            Err(PtrError::OutOfBounds(BoundsError::Index { index: 0, len: 0 }))
        );
    }

    #[test]
    #[should_panic(expected = "index 10 is out of bounds for a slice of length 5")]
    fn index_out_of_bounds() {
        let arr = [1, 2, 3, 4, 5];
        let p = pointer_to_array(&arr);
        let _value = p[10];
    }

    #[test]
    #[should_panic(expected = "index 5 is out of bounds")]
    fn index_mut_out_of_bounds() {
        let mut arr = [1, 2, 3, 4, 5];
        let mut p = pointer_to_mut_array(&mut arr);
        p[5] = 0;
    }

    #[test]
    #[should_panic(expected = "called `front` on an empty slice")]
    fn front_of_empty() {
        let v: [u8; 0] = [];
        let _ = pointer_to_array(&v).front();
    }

    #[test]
    #[should_panic(expected = "called `back_mut` on an empty slice")]
    fn back_of_empty() {
        let mut v: [u8; 0] = [];
        let _ = pointer_to_mut_array(&mut v).into_mut().back_mut();
    }

    #[test]
    fn structural_equality() {
        let array = [1, 2, 3, 4, 5];
        let same = array;
        let shorter = [1, 2, 3, 4];
        let different = [1, 2, 99, 4, 5];

        let p = pointer_to_array(&array);
        assert_eq!(*p, *pointer_to_array(&same));
        assert_ne!(*p, *pointer_to_array(&shorter));
        assert_ne!(*p, *pointer_to_array(&different));
    }

    #[test]
    fn lexicographic_order() {
        let array = [1, 2, 3, 4, 5];
        let shorter = [1, 2, 3, 4];
        let p = pointer_to_array(&array);
        let s = pointer_to_array(&shorter);

        assert_eq!((*p).cmp(&*p), Ordering::Equal);
        assert_eq!((*p).cmp(&*s), Ordering::Greater);
        assert_eq!((*s).cmp(&*p), Ordering::Less);

        let shorter = [1.0f32, 2.0, 3.0];
        let longer = [1.0f32, 2.0, 3.0, 4.0];
        let (ps, pl) = (pointer_to_array(&shorter), pointer_to_array(&longer));
        assert!(*ps < *pl);
        assert_eq!((*ps).partial_cmp(&*pl), Some(Ordering::Less));
    }

    #[test]
    fn nan_is_unordered() {
        let floats = [1.0f32, f32::NAN, 3.0];
        let p: ArrayPtr<'_, f32> = pointer_to_array(&floats);

        assert_eq!((*p).partial_cmp(&*p), None);
        assert_ne!(*p, *p);
    }

    #[test]
    fn partial_order_without_total_order() {
        #[derive(PartialEq, PartialOrd, Debug)]
        struct Weight(u32);

        let ws = [Weight(1), Weight(2), Weight(3)];
        let p = pointer_to_array(&ws);
        assert_eq!((*p).partial_cmp(&*p), Some(Ordering::Equal));
    }

    #[test]
    fn debug_lists_elements() {
        use alloc::format;

        let p = pointer_to_array(&[1, 2]);
        assert_eq!(format!("{:?}", &*p), "[1, 2]");
    }
}
