//! Node-trait adapter.
//!
//! The cursors and iterators of this crate never look at a concrete node
//! type. They navigate through the accessors below, so the same traversal code
//! serves any tree layout that implements them.

use std::ptr::NonNull;

/// Accessors shared by every traversable node layout.
///
/// # Safety
///
/// Implementors must return pointers to live nodes of the same tree, and the
/// parent of a node must list that node among its children. Every method may
/// only be called with a pointer to a live node.
pub unsafe trait TreeNode {
    /// The element stored in a node.
    type Value;

    /// Returns the parent of `node`, or `None` for the root.
    ///
    /// # Safety
    ///
    /// `node` must point to a live node.
    unsafe fn parent(node: NonNull<Self>) -> Option<NonNull<Self>>;

    /// Returns a reference to the element stored in `node`.
    ///
    /// # Safety
    ///
    /// `node` must point to a live node that outlives `'a` and is not mutated
    /// while the reference is held.
    unsafe fn value<'a>(node: NonNull<Self>) -> &'a Self::Value;
}

/// Accessors of a binary node, used by the in-order cursor.
///
/// # Safety
///
/// Same requirements as [`TreeNode`]. In addition, the parent of
/// `left(n)` and `right(n)` must be `n`.
pub unsafe trait BinaryNode: TreeNode {
    /// # Safety
    ///
    /// `node` must point to a live node.
    unsafe fn left(node: NonNull<Self>) -> Option<NonNull<Self>>;

    /// # Safety
    ///
    /// `node` must point to a live node.
    unsafe fn right(node: NonNull<Self>) -> Option<NonNull<Self>>;
}

/// Accessors of a node with an ordered list of children, used by the pre-order
/// iterator.
///
/// # Safety
///
/// Same requirements as [`TreeNode`]. `nth_child(n, i)` must be `Some` for
/// every `i < children_count(n)`, and the siblings must be consistent with that
/// order.
pub unsafe trait SiblingNode: TreeNode {
    /// # Safety
    ///
    /// `node` must point to a live node.
    unsafe fn next_sibling(node: NonNull<Self>) -> Option<NonNull<Self>>;

    /// # Safety
    ///
    /// `node` must point to a live node.
    unsafe fn prev_sibling(node: NonNull<Self>) -> Option<NonNull<Self>>;

    /// # Safety
    ///
    /// `node` must point to a live node.
    unsafe fn children_count(node: NonNull<Self>) -> usize;

    /// # Safety
    ///
    /// `node` must point to a live node.
    unsafe fn nth_child(node: NonNull<Self>, index: usize) -> Option<NonNull<Self>>;
}

/// Returns the leftmost node of the subtree rooted at `node`.
///
/// # Safety
///
/// `node` must point to a live node.
pub unsafe fn first<N: BinaryNode>(mut node: NonNull<N>) -> NonNull<N> {
    while let Some(left) = N::left(node) {
        node = left;
    }
    node
}

/// Returns the rightmost node of the subtree rooted at `node`.
///
/// # Safety
///
/// `node` must point to a live node.
pub unsafe fn last<N: BinaryNode>(mut node: NonNull<N>) -> NonNull<N> {
    while let Some(right) = N::right(node) {
        node = right;
    }
    node
}

/// Returns the in-order successor of `node`, or `None` if it is the last node.
///
/// # Safety
///
/// `node` must point to a live node.
pub unsafe fn next<N: BinaryNode>(mut node: NonNull<N>) -> Option<NonNull<N>> {
    if let Some(right) = N::right(node) {
        return Some(first(right));
    }

    // Climb until we leave a left subtree
    let mut parent = N::parent(node);
    while let Some(parent_ptr) = parent {
        if N::right(parent_ptr) != Some(node) {
            break;
        }
        node = parent_ptr;
        parent = N::parent(node);
    }
    parent
}

/// Returns the in-order predecessor of `node`, or `None` if it is the first node.
///
/// # Safety
///
/// `node` must point to a live node.
pub unsafe fn prev<N: BinaryNode>(mut node: NonNull<N>) -> Option<NonNull<N>> {
    if let Some(left) = N::left(node) {
        return Some(last(left));
    }

    // Climb until we leave a right subtree
    let mut parent = N::parent(node);
    while let Some(parent_ptr) = parent {
        if N::left(parent_ptr) != Some(node) {
            break;
        }
        node = parent_ptr;
        parent = N::parent(node);
    }
    parent
}

/// Returns the node visited after `node` in pre-order.
///
/// # Safety
///
/// `node` must point to a live node.
pub unsafe fn preorder_next<N: SiblingNode>(mut node: NonNull<N>) -> Option<NonNull<N>> {
    if N::children_count(node) > 0 {
        return N::nth_child(node, 0);
    }
    loop {
        if let Some(sibling) = N::next_sibling(node) {
            return Some(sibling);
        }
        node = N::parent(node)?;
    }
}

/// Returns the node visited before `node` in pre-order.
///
/// # Safety
///
/// `node` must point to a live node.
pub unsafe fn preorder_prev<N: SiblingNode>(node: NonNull<N>) -> Option<NonNull<N>> {
    match N::prev_sibling(node) {
        Some(sibling) => Some(preorder_last(sibling)),
        None => N::parent(node),
    }
}

/// Returns the node visited last in a pre-order walk of the subtree rooted at
/// `node`.
///
/// # Safety
///
/// `node` must point to a live node.
pub unsafe fn preorder_last<N: SiblingNode>(mut node: NonNull<N>) -> NonNull<N> {
    loop {
        let count = N::children_count(node);
        match count.checked_sub(1).and_then(|index| N::nth_child(node, index)) {
            Some(child) => node = child,
            None => return node,
        }
    }
}
