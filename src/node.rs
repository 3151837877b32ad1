use std::cmp;
use std::ptr::NonNull;

use crate::traits::{BinaryNode, SiblingNode, TreeNode};

pub(crate) type NodePtr<T> = NonNull<Node<T>>;
pub(crate) type Link<T> = Option<NodePtr<T>>;
pub(crate) type LinkPtr<T> = NonNull<Link<T>>;

/// A node of the AVL tree backing [`AvlTreeSet`](crate::AvlTreeSet).
///
/// Nodes are only reachable through cursors and iterators; the type is public
/// so that those can be named in signatures.
pub struct Node<T> {
    pub(crate) value: T,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
    pub(crate) parent: Link<T>,
    pub(crate) height: usize,
}

impl<T> Node<T> {
    pub(crate) fn leaf(parent: Link<T>, value: T) -> Self {
        Self {
            value,
            left: None,
            right: None,
            parent,
            height: 1,
        }
    }

    pub(crate) unsafe fn height_of(link: Link<T>) -> usize {
        match link {
            None => 0,
            Some(node_ptr) => node_ptr.as_ref().height,
        }
    }

    pub(crate) unsafe fn left_height(node_ptr: NodePtr<T>) -> usize {
        Self::height_of(node_ptr.as_ref().left)
    }

    pub(crate) unsafe fn right_height(node_ptr: NodePtr<T>) -> usize {
        Self::height_of(node_ptr.as_ref().right)
    }

    /// Height of the left subtree minus height of the right subtree.
    pub(crate) unsafe fn balance_factor(node_ptr: NodePtr<T>) -> isize {
        Self::left_height(node_ptr) as isize - Self::right_height(node_ptr) as isize
    }

    pub(crate) unsafe fn adjust_height(mut node_ptr: NodePtr<T>) {
        let height = 1 + cmp::max(Self::left_height(node_ptr), Self::right_height(node_ptr));
        node_ptr.as_mut().height = height;
    }
}

unsafe impl<T> TreeNode for Node<T> {
    type Value = T;

    unsafe fn parent(node: NonNull<Self>) -> Option<NonNull<Self>> {
        node.as_ref().parent
    }

    unsafe fn value<'a>(node: NonNull<Self>) -> &'a T {
        &(*node.as_ptr()).value
    }
}

unsafe impl<T> BinaryNode for Node<T> {
    unsafe fn left(node: NonNull<Self>) -> Option<NonNull<Self>> {
        node.as_ref().left
    }

    unsafe fn right(node: NonNull<Self>) -> Option<NonNull<Self>> {
        node.as_ref().right
    }
}

unsafe impl<T> SiblingNode for Node<T> {
    unsafe fn next_sibling(node: NonNull<Self>) -> Option<NonNull<Self>> {
        let parent_ptr = node.as_ref().parent?;
        if parent_ptr.as_ref().left == Some(node) {
            parent_ptr.as_ref().right
        } else {
            None
        }
    }

    unsafe fn prev_sibling(node: NonNull<Self>) -> Option<NonNull<Self>> {
        let parent_ptr = node.as_ref().parent?;
        if parent_ptr.as_ref().right == Some(node) {
            parent_ptr.as_ref().left
        } else {
            None
        }
    }

    unsafe fn children_count(node: NonNull<Self>) -> usize {
        let node = node.as_ref();
        usize::from(node.left.is_some()) + usize::from(node.right.is_some())
    }

    unsafe fn nth_child(node: NonNull<Self>, index: usize) -> Option<NonNull<Self>> {
        let node = node.as_ref();
        match (index, node.left) {
            (0, Some(left_ptr)) => Some(left_ptr),
            (0, None) => node.right,
            (1, Some(_)) => node.right,
            _ => None,
        }
    }
}
