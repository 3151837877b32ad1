//! An ordered set implemented with an AVL tree.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FromIterator;
use std::ops::{Bound, RangeBounds};

use allocator_api2::alloc::{Allocator, Global};

use crate::compare::{Compare, Less};
use crate::cursor::{Cursor, CursorMut};
use crate::error::Error;
use crate::iter::{InorderIter, IntoIter, PreorderIter};
use crate::node::{Link, Node};
use crate::traits;
use crate::tree::Tree;

/// An iterator over the values of a set, in ascending order.
pub type Iter<'a, T> = InorderIter<'a, Node<T>>;

/// An iterator over the values of a set, parents before children.
pub type Preorder<'a, T> = PreorderIter<'a, Node<T>>;

/// An ordered set implemented with an AVL tree.
///
/// Elements are ordered by the comparator `C` and their nodes are allocated
/// with `A`.
///
/// ```
/// use avl_set::AvlTreeSet;
/// let mut set = AvlTreeSet::new();
/// set.insert(0);
/// set.insert(1);
/// set.insert(2);
/// assert_eq!(set.get(&1), Some(&1));
/// set.remove(&1);
/// assert!(set.get(&1).is_none());
/// ```
pub struct AvlTreeSet<T, C = Less, A: Allocator = Global> {
    tree: Tree<T, C, A>,
}

impl<T: Ord> AvlTreeSet<T> {
    /// Creates an empty set.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self::with_comparator_in(Less, Global)
    }
}

impl<T, C: Compare<T>> AvlTreeSet<T, C> {
    /// Creates an empty set ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_comparator_in(cmp, Global)
    }
}

impl<T: Ord, A: Allocator> AvlTreeSet<T, Less, A> {
    /// Creates an empty set whose nodes are allocated with `alloc`.
    pub fn new_in(alloc: A) -> Self {
        Self::with_comparator_in(Less, alloc)
    }
}

impl<T, C: Compare<T>, A: Allocator> AvlTreeSet<T, C, A> {
    /// Creates an empty set ordered by `cmp` whose nodes are allocated with `alloc`.
    pub fn with_comparator_in(cmp: C, alloc: A) -> Self {
        Self {
            tree: Tree::new_in(cmp, alloc),
        }
    }

    /// Inserts a value into the set.
    /// Returns whether the value was newly inserted. An equal value already in
    /// the set is kept and `value` is dropped.
    ///
    /// # Panics
    ///
    /// Aborts through [`std::alloc::handle_alloc_error`] if the node cannot be allocated.
    pub fn insert(&mut self, value: T) -> bool {
        self.try_insert(value).unwrap_or_else(|err| err.fatal())
    }

    /// Inserts a value into the set.
    /// Returns whether the value was newly inserted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocFailed`] if the node cannot be allocated. The set
    /// is left unchanged.
    pub fn try_insert(&mut self, value: T) -> Result<bool, Error> {
        self.tree.insert(value).map(|(_, inserted)| inserted)
    }

    /// Inserts a value into the set and returns a cursor at it. If an equal
    /// value is already in the set, the cursor points at that value instead.
    ///
    /// # Panics
    ///
    /// Aborts through [`std::alloc::handle_alloc_error`] if the node cannot be allocated.
    pub fn insert_cursor(&mut self, value: T) -> CursorMut<'_, T, C, A> {
        let (node_ptr, _) = self.tree.insert(value).unwrap_or_else(|err| err.fatal());
        CursorMut::new(Some(node_ptr), &mut self.tree)
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        self.tree.check_consistency()
    }
}

impl<T, C, A: Allocator> AvlTreeSet<T, C, A> {
    /// Returns true if the set contains no elements.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    #[cfg(test)]
    pub(crate) fn height(&self) -> usize {
        self.tree.height()
    }

    /// Returns the allocator nodes are allocated with.
    pub fn allocator(&self) -> &A {
        self.tree.allocator()
    }

    /// Clears the set, deallocating all memory.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns a reference to the value in the set that is equal to the given value.
    ///
    /// The value may be any borrowed form of the set's value type, but the ordering
    /// on the borrowed form *must* match the ordering on the value type.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.cursor(self.tree.find(value)).get()
    }

    /// Returns true if the set contains a value.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.find(value).is_some()
    }

    /// Returns the number of elements equal to `value`, 0 or 1.
    pub fn count<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        usize::from(self.contains(value))
    }

    /// Returns a cursor at the value equal to `value`, or the end cursor.
    pub fn find<Q>(&self, value: &Q) -> Cursor<'_, Node<T>>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.cursor(self.tree.find(value))
    }

    /// Returns a mutable cursor at the value equal to `value`, or at the end position.
    pub fn find_mut<Q>(&mut self, value: &Q) -> CursorMut<'_, T, C, A>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let found = self.tree.find(value);
        CursorMut::new(found, &mut self.tree)
    }

    /// Returns a cursor at the first value that is not less than `value`.
    ///
    /// ```
    /// use avl_set::AvlTreeSet;
    /// let set: AvlTreeSet<_> = [1, 3, 5].into_iter().collect();
    /// assert_eq!(set.lower_bound(&3).get(), Some(&3));
    /// assert_eq!(set.lower_bound(&4).get(), Some(&5));
    /// assert!(set.lower_bound(&6).is_end());
    /// ```
    pub fn lower_bound<Q>(&self, value: &Q) -> Cursor<'_, Node<T>>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.cursor(self.tree.lower_bound(value))
    }

    /// Returns a cursor at the first value that is greater than `value`.
    pub fn upper_bound<Q>(&self, value: &Q) -> Cursor<'_, Node<T>>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.cursor(self.tree.upper_bound(value))
    }

    /// Mutable counterpart of [`lower_bound`](Self::lower_bound).
    pub fn lower_bound_mut<Q>(&mut self, value: &Q) -> CursorMut<'_, T, C, A>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let found = self.tree.lower_bound(value);
        CursorMut::new(found, &mut self.tree)
    }

    /// Mutable counterpart of [`upper_bound`](Self::upper_bound).
    pub fn upper_bound_mut<Q>(&mut self, value: &Q) -> CursorMut<'_, T, C, A>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let found = self.tree.upper_bound(value);
        CursorMut::new(found, &mut self.tree)
    }

    /// Removes a value from the set.
    /// Returns whether the value was previously in the set.
    ///
    /// The value may be any borrowed form of the set's value type, but the ordering
    /// on the borrowed form *must* match the ordering on the value type.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.remove(value).is_some()
    }

    /// Removes a value from the set.
    /// Returns the value if it was previously in the set.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        self.tree.remove(value)
    }

    /// Gets an iterator over a sub-range of values in the set in sorted order.
    ///
    /// # Panics
    ///
    /// Panics if range `start > end`.
    /// Panics if range `start == end` and both bounds are `Excluded`.
    pub fn range<Q, R>(&self, range: R) -> Iter<'_, T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        R: RangeBounds<Q>,
        Q: ?Sized,
    {
        self.check_range(&range);

        let head = match range.start_bound() {
            Bound::Included(start) => self.tree.lower_bound(start),
            Bound::Excluded(start) => self.tree.upper_bound(start),
            Bound::Unbounded => self.tree.first(),
        };
        // One past the last value in range
        let past_tail = match range.end_bound() {
            Bound::Included(end) => self.tree.upper_bound(end),
            Bound::Excluded(end) => self.tree.lower_bound(end),
            Bound::Unbounded => None,
        };
        let tail = match past_tail {
            Some(node_ptr) => unsafe { traits::prev(node_ptr) },
            None => self.tree.last(),
        };

        // Empty if the range falls between two neighbouring values
        if head.is_some() && head == past_tail {
            return InorderIter::empty();
        }
        unsafe { InorderIter::new(head, tail) }
    }

    fn check_range<Q, R>(&self, range: &R)
    where
        C: Compare<Q>,
        R: RangeBounds<Q>,
        Q: ?Sized,
    {
        let (start, end) = match (range.start_bound(), range.end_bound()) {
            (
                Bound::Included(start) | Bound::Excluded(start),
                Bound::Included(end) | Bound::Excluded(end),
            ) => (start, end),
            _ => return,
        };
        match self.tree.comparator().compare(start, end) {
            Ordering::Greater => panic!("range start is greater than range end"),
            Ordering::Equal => {
                if let (Bound::Excluded(_), Bound::Excluded(_)) =
                    (range.start_bound(), range.end_bound())
                {
                    panic!("range start and end are equal and excluded");
                }
            }
            Ordering::Less => {}
        }
    }

    /// Returns a cursor at the first value, or the end cursor if the set is empty.
    pub fn begin(&self) -> Cursor<'_, Node<T>> {
        self.cursor(self.tree.first())
    }

    /// Returns the end cursor, positioned past the last value.
    pub fn end(&self) -> Cursor<'_, Node<T>> {
        self.cursor(None)
    }

    /// Returns a mutable cursor at the first value.
    pub fn begin_mut(&mut self) -> CursorMut<'_, T, C, A> {
        let first = self.tree.first();
        CursorMut::new(first, &mut self.tree)
    }

    /// Returns a reference to the first (smallest) value in the set.
    pub fn first(&self) -> Option<&T> {
        self.begin().get()
    }

    /// Returns a reference to the last (largest) value in the set.
    pub fn last(&self) -> Option<&T> {
        self.cursor(self.tree.last()).get()
    }

    /// Removes and returns the first value in the set.
    pub fn pop_first(&mut self) -> Option<T> {
        self.tree.pop_first()
    }

    /// Removes and returns the last value in the set.
    pub fn pop_last(&mut self) -> Option<T> {
        self.tree.pop_last()
    }

    /// Gets an iterator over the values of the set in sorted order.
    pub fn iter(&self) -> Iter<'_, T> {
        unsafe { InorderIter::new(self.tree.first(), self.tree.last()) }
    }

    /// Gets an iterator over the values of the set in the order of a
    /// pre-order walk of the underlying tree.
    pub fn iter_preorder(&self) -> Preorder<'_, T> {
        unsafe { PreorderIter::new(self.tree.root()) }
    }

    fn cursor(&self, current: Link<T>) -> Cursor<'_, Node<T>> {
        unsafe { Cursor::new(current, self.tree.root()) }
    }
}

impl<T: Ord> Default for AvlTreeSet<T> {
    /// Creates an empty set.
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C, A> Clone for AvlTreeSet<T, C, A>
where
    T: Clone,
    C: Compare<T> + Clone,
    A: Allocator + Clone,
{
    /// Builds a new tree by inserting every value of `self` in order.
    fn clone(&self) -> Self {
        let mut set =
            Self::with_comparator_in(self.tree.comparator().clone(), self.allocator().clone());
        set.extend(self.iter().cloned());
        set
    }
}

impl<T: PartialEq, C, A: Allocator> PartialEq for AvlTreeSet<T, C, A> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, C, A: Allocator> Eq for AvlTreeSet<T, C, A> {}

impl<T: Ord> FromIterator<T> for AvlTreeSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: fmt::Debug, C, A: Allocator> fmt::Debug for AvlTreeSet<T, C, A> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T, C, A: Allocator> IntoIterator for &'a AvlTreeSet<T, C, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T, C, A: Allocator> IntoIterator for AvlTreeSet<T, C, A> {
    type Item = T;
    type IntoIter = IntoIter<T, C, A>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter { tree: self.tree }
    }
}

impl<T, C: Compare<T>, A: Allocator> Extend<T> for AvlTreeSet<T, C, A> {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        iter.into_iter().for_each(move |value| {
            self.insert(value);
        });
    }
}

impl<'a, T, C, A> Extend<&'a T> for AvlTreeSet<T, C, A>
where
    T: Copy + 'a,
    C: Compare<T>,
    A: Allocator,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = &'a T>,
    {
        self.extend(iter.into_iter().copied());
    }
}
