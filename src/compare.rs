//! Comparators defining the order of a set.

use std::cmp::Ordering;

/// A strict weak ordering over `T`.
///
/// `less` must be consistent across calls, and no two distinct values stored in
/// the same set may be mutually "not less" than each other.
pub trait Compare<T: ?Sized> {
    /// Returns whether `lhs` is ordered before `rhs`.
    fn less(&self, lhs: &T, rhs: &T) -> bool;

    /// Three-way comparison derived from `less`.
    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        if self.less(lhs, rhs) {
            Ordering::Less
        } else if self.less(rhs, lhs) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

/// Ascending order given by [`Ord`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Less;

impl<T: Ord + ?Sized> Compare<T> for Less {
    fn less(&self, lhs: &T, rhs: &T) -> bool {
        lhs < rhs
    }

    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        lhs.cmp(rhs)
    }
}

/// Descending order given by [`Ord`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Greater;

impl<T: Ord + ?Sized> Compare<T> for Greater {
    fn less(&self, lhs: &T, rhs: &T) -> bool {
        rhs < lhs
    }

    fn compare(&self, lhs: &T, rhs: &T) -> Ordering {
        rhs.cmp(lhs)
    }
}

/// Order given by a "less than" closure.
///
/// ```
/// use avl_set::{compare::FromFn, AvlTreeSet};
/// let mut set = AvlTreeSet::with_comparator(FromFn(|a: &i32, b: &i32| a.abs() < b.abs()));
/// set.insert(-3);
/// set.insert(2);
/// assert!(!set.insert(3));
/// assert_eq!(set.iter().copied().collect::<Vec<_>>(), [2, -3]);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct FromFn<F>(pub F);

impl<T: ?Sized, F> Compare<T> for FromFn<F>
where
    F: Fn(&T, &T) -> bool,
{
    fn less(&self, lhs: &T, rhs: &T) -> bool {
        (self.0)(lhs, rhs)
    }
}
