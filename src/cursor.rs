use std::fmt;
use std::marker::PhantomData;
use std::ptr::NonNull;

use allocator_api2::alloc::Allocator;

use crate::error::Error;
use crate::node::{Link, Node};
use crate::traits::{self, BinaryNode, TreeNode};
use crate::tree::Tree;

/// A read-only in-order cursor over a binary tree.
///
/// The cursor points either at a node or at the end position past the last
/// node. It only navigates through the [`BinaryNode`] accessors and works for
/// any node layout that implements them.
pub struct Cursor<'a, N: BinaryNode> {
    current: Option<NonNull<N>>,
    root: Option<NonNull<N>>,
    _tree: PhantomData<&'a N>,
}

impl<'a, N: BinaryNode> Cursor<'a, N> {
    /// Creates a cursor at `current` (or at the end position if `None`) in the
    /// tree rooted at `root`.
    ///
    /// # Safety
    ///
    /// `current` must be `None` or a node of the tree rooted at `root`, and the
    /// whole tree must stay alive and unmodified for `'a`.
    pub unsafe fn new(current: Option<NonNull<N>>, root: Option<NonNull<N>>) -> Self {
        Self {
            current,
            root,
            _tree: PhantomData,
        }
    }

    /// Returns whether the cursor is at the end position.
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Returns the element at the cursor, or `None` at the end position.
    pub fn get(&self) -> Option<&'a N::Value> {
        self.current.map(|node| unsafe { N::value(node) })
    }

    /// Returns the element at the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CursorAtEnd`] at the end position.
    pub fn value(&self) -> Result<&'a N::Value, Error> {
        self.get().ok_or(Error::CursorAtEnd)
    }

    /// Moves to the next element in order, or to the end position after the
    /// last element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CursorAtEnd`] if the cursor already is at the end
    /// position. The cursor does not move.
    pub fn move_next(&mut self) -> Result<(), Error> {
        let node = self.current.ok_or(Error::CursorAtEnd)?;
        self.current = unsafe { traits::next(node) };
        Ok(())
    }

    /// Moves to the previous element in order. From the end position the
    /// cursor moves to the last element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BeforeBegin`] at the first element, or at the end
    /// position of an empty tree. The cursor does not move.
    pub fn move_prev(&mut self) -> Result<(), Error> {
        self.current = Some(unsafe { step_back(self.current, self.root) }?);
        Ok(())
    }

    /// Returns the element after the cursor without moving it.
    pub fn peek_next(&self) -> Option<&'a N::Value> {
        let node = unsafe { traits::next(self.current?) }?;
        Some(unsafe { N::value(node) })
    }

    /// Returns the element before the cursor without moving it.
    pub fn peek_prev(&self) -> Option<&'a N::Value> {
        let node = unsafe { step_back(self.current, self.root) }.ok()?;
        Some(unsafe { N::value(node) })
    }
}

/// Returns the node before `current`, treating `None` as the end position.
unsafe fn step_back<N: BinaryNode>(
    current: Option<NonNull<N>>,
    root: Option<NonNull<N>>,
) -> Result<NonNull<N>, Error> {
    let prev = match current {
        Some(node) => traits::prev(node),
        None => root.map(|root| traits::last(root)),
    };
    prev.ok_or(Error::BeforeBegin)
}

// Auto derived clone seems to have an invalid type bound of N: Clone
impl<N: BinaryNode> Clone for Cursor<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: BinaryNode> Copy for Cursor<'_, N> {}

impl<N: BinaryNode> PartialEq for Cursor<'_, N> {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current
    }
}

impl<N: BinaryNode> Eq for Cursor<'_, N> {}

impl<N> fmt::Debug for Cursor<'_, N>
where
    N: BinaryNode,
    N::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

/// An in-order cursor with mutable access to the tree of an
/// [`AvlTreeSet`](crate::AvlTreeSet).
///
/// Removing the element at the cursor moves the cursor to the element that
/// followed it.
pub struct CursorMut<'a, T, C, A: Allocator> {
    current: Link<T>,
    tree: &'a mut Tree<T, C, A>,
}

impl<'a, T, C, A: Allocator> CursorMut<'a, T, C, A> {
    pub(crate) fn new(current: Link<T>, tree: &'a mut Tree<T, C, A>) -> Self {
        Self { current, tree }
    }

    /// Returns whether the cursor is at the end position.
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Returns the element at the cursor, or `None` at the end position.
    pub fn get(&self) -> Option<&T> {
        self.current.map(|node| unsafe { Node::value(node) })
    }

    /// Returns the element at the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CursorAtEnd`] at the end position.
    pub fn value(&self) -> Result<&T, Error> {
        self.get().ok_or(Error::CursorAtEnd)
    }

    /// See [`Cursor::move_next`].
    pub fn move_next(&mut self) -> Result<(), Error> {
        let node = self.current.ok_or(Error::CursorAtEnd)?;
        self.current = unsafe { traits::next(node) };
        Ok(())
    }

    /// See [`Cursor::move_prev`].
    pub fn move_prev(&mut self) -> Result<(), Error> {
        self.current = Some(unsafe { step_back(self.current, self.tree.root()) }?);
        Ok(())
    }

    /// Removes the element at the cursor and returns it. The cursor moves to
    /// the element that followed the removed one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CursorAtEnd`] at the end position.
    pub fn remove_current(&mut self) -> Result<T, Error> {
        let node = self.current.ok_or(Error::CursorAtEnd)?;
        let (value, next) = unsafe { self.tree.remove_node(node) };
        self.current = next;
        Ok(value)
    }

    /// Returns a read-only cursor at the same position.
    pub fn as_cursor(&self) -> Cursor<'_, Node<T>> {
        unsafe { Cursor::new(self.current, self.tree.root()) }
    }
}

impl<T: fmt::Debug, C, A: Allocator> fmt::Debug for CursorMut<'_, T, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.get()).finish()
    }
}
