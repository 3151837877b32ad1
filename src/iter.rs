use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

use allocator_api2::alloc::Allocator;

use crate::traits::{self, BinaryNode, SiblingNode};
use crate::tree::Tree;

/// A double-ended in-order iterator over the nodes between `head` and `tail`.
pub struct InorderIter<'a, N: BinaryNode> {
    head: Option<NonNull<N>>,
    tail: Option<NonNull<N>>,
    _tree: PhantomData<&'a N>,
}

impl<'a, N: BinaryNode> InorderIter<'a, N> {
    /// Creates an iterator over the nodes from `head` to `tail`, both included.
    /// If either is `None` the iterator is empty.
    ///
    /// # Safety
    ///
    /// `head` and `tail` must be nodes of the same tree with `tail` not before
    /// `head` in order, and the tree must stay alive and unmodified for `'a`.
    pub unsafe fn new(head: Option<NonNull<N>>, tail: Option<NonNull<N>>) -> Self {
        match (head, tail) {
            (Some(_), Some(_)) => Self {
                head,
                tail,
                _tree: PhantomData,
            },
            _ => Self::empty(),
        }
    }

    pub(crate) fn empty() -> Self {
        Self {
            head: None,
            tail: None,
            _tree: PhantomData,
        }
    }
}

// Auto derived clone seems to have an invalid type bound of N: Clone
impl<N: BinaryNode> Clone for InorderIter<'_, N> {
    fn clone(&self) -> Self {
        Self {
            head: self.head,
            tail: self.tail,
            _tree: PhantomData,
        }
    }
}

impl<N> fmt::Debug for InorderIter<'_, N>
where
    N: BinaryNode,
    N::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, N: BinaryNode> Iterator for InorderIter<'a, N> {
    type Item = &'a N::Value;

    fn next(&mut self) -> Option<Self::Item> {
        let head = self.head?;

        if Some(head) == self.tail {
            self.head = None;
            self.tail = None;
        } else {
            self.head = unsafe { traits::next(head) };
        }

        Some(unsafe { N::value(head) })
    }
}

impl<N: BinaryNode> DoubleEndedIterator for InorderIter<'_, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let tail = self.tail?;

        if Some(tail) == self.head {
            self.head = None;
            self.tail = None;
        } else {
            self.tail = unsafe { traits::prev(tail) };
        }

        Some(unsafe { N::value(tail) })
    }
}

impl<N: BinaryNode> FusedIterator for InorderIter<'_, N> {}

/// A double-ended pre-order iterator: every node is visited before its
/// children, children in order.
pub struct PreorderIter<'a, N: SiblingNode> {
    head: Option<NonNull<N>>,
    tail: Option<NonNull<N>>,
    _tree: PhantomData<&'a N>,
}

impl<'a, N: SiblingNode> PreorderIter<'a, N> {
    /// Creates an iterator over the whole tree rooted at `root`.
    ///
    /// # Safety
    ///
    /// `root` must be `None` or the root of a tree that stays alive and
    /// unmodified for `'a`.
    pub unsafe fn new(root: Option<NonNull<N>>) -> Self {
        Self {
            head: root,
            tail: root.map(|root| traits::preorder_last(root)),
            _tree: PhantomData,
        }
    }
}

impl<N: SiblingNode> Clone for PreorderIter<'_, N> {
    fn clone(&self) -> Self {
        Self {
            head: self.head,
            tail: self.tail,
            _tree: PhantomData,
        }
    }
}

impl<N> fmt::Debug for PreorderIter<'_, N>
where
    N: SiblingNode,
    N::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a, N: SiblingNode> Iterator for PreorderIter<'a, N> {
    type Item = &'a N::Value;

    fn next(&mut self) -> Option<Self::Item> {
        let head = self.head?;

        if Some(head) == self.tail {
            self.head = None;
            self.tail = None;
        } else {
            self.head = unsafe { traits::preorder_next(head) };
        }

        Some(unsafe { N::value(head) })
    }
}

impl<N: SiblingNode> DoubleEndedIterator for PreorderIter<'_, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let tail = self.tail?;

        if Some(tail) == self.head {
            self.head = None;
            self.tail = None;
        } else {
            self.tail = unsafe { traits::preorder_prev(tail) };
        }

        Some(unsafe { N::value(tail) })
    }
}

impl<N: SiblingNode> FusedIterator for PreorderIter<'_, N> {}

/// An owning iterator over the elements of an [`AvlTreeSet`](crate::AvlTreeSet),
/// in ascending order.
pub struct IntoIter<T, C, A: Allocator> {
    pub(crate) tree: Tree<T, C, A>,
}

impl<T: fmt::Debug, C, A: Allocator> fmt::Debug for IntoIter<T, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let remaining = unsafe { InorderIter::new(self.tree.first(), self.tree.last()) };
        f.debug_list().entries(remaining).finish()
    }
}

impl<T, C, A: Allocator> Iterator for IntoIter<T, C, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.tree.pop_first()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.tree.len(), Some(self.tree.len()))
    }
}

impl<T, C, A: Allocator> DoubleEndedIterator for IntoIter<T, C, A> {
    fn next_back(&mut self) -> Option<T> {
        self.tree.pop_last()
    }
}

impl<T, C, A: Allocator> ExactSizeIterator for IntoIter<T, C, A> {}

impl<T, C, A: Allocator> FusedIterator for IntoIter<T, C, A> {}
