use std::alloc::Layout;
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};

use allocator_api2::alloc::Allocator;
use arrayvec::ArrayVec;

use crate::compare::Compare;
use crate::error::Error;
use crate::node::{Link, LinkPtr, Node, NodePtr};
use crate::traits;

/// Upper bound for the height of an AVL tree holding at most `usize::MAX` nodes
/// (about 1.44 * log2(n) + 1). Sizes the teardown stack.
const MAX_HEIGHT: usize = 96;

/// The balanced-tree engine behind [`AvlTreeSet`](crate::AvlTreeSet).
pub(crate) struct Tree<T, C, A: Allocator> {
    root: Link<T>,
    num_nodes: usize,
    cmp: C,
    alloc: A,
    _marker: PhantomData<Node<T>>,
}

enum InsertPos<T> {
    Occupied(NodePtr<T>),
    Vacant(Link<T>, LinkPtr<T>),
}

impl<T, C, A: Allocator> Tree<T, C, A> {
    pub(crate) fn new_in(cmp: C, alloc: A) -> Self {
        Self {
            root: None,
            num_nodes: 0,
            cmp,
            alloc,
            _marker: PhantomData,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn len(&self) -> usize {
        self.num_nodes
    }

    pub(crate) fn root(&self) -> Link<T> {
        self.root
    }

    pub(crate) fn comparator(&self) -> &C {
        &self.cmp
    }

    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }

    #[cfg(test)]
    pub(crate) fn height(&self) -> usize {
        unsafe { Node::height_of(self.root) }
    }

    pub(crate) fn first(&self) -> Link<T> {
        self.root.map(|root_ptr| unsafe { traits::first(root_ptr) })
    }

    pub(crate) fn last(&self) -> Link<T> {
        self.root.map(|root_ptr| unsafe { traits::last(root_ptr) })
    }

    /// Destroys all nodes, walking the tree with an explicit stack.
    pub(crate) fn clear(&mut self) {
        if self.num_nodes > 0 {
            log::debug!("tearing down tree with {} nodes", self.num_nodes);
        }
        let mut stack: ArrayVec<NodePtr<T>, MAX_HEIGHT> = ArrayVec::new();
        if let Some(root_ptr) = self.root.take() {
            stack.push(root_ptr);
        }
        while let Some(node_ptr) = stack.pop() {
            unsafe {
                if let Some(right_ptr) = node_ptr.as_ref().right {
                    stack.push(right_ptr);
                }
                if let Some(left_ptr) = node_ptr.as_ref().left {
                    stack.push(left_ptr);
                }
                self.destroy_node(node_ptr);
            }
        }
        self.num_nodes = 0;
    }

    /// Removes `node_ptr` from the tree.
    ///
    /// Returns the removed value and the node holding the next value in order.
    /// The next node is determined before anything is freed. A node with two
    /// children keeps its place in the tree: it takes over the value of its
    /// successor, whose node is removed instead, so the node itself is the next one.
    ///
    /// # Safety
    ///
    /// `node_ptr` must be a live node of this tree.
    pub(crate) unsafe fn remove_node(&mut self, node_ptr: NodePtr<T>) -> (T, Link<T>) {
        debug_assert!(self.num_nodes >= 1);
        let (victim_ptr, next) = match (node_ptr.as_ref().left, node_ptr.as_ref().right) {
            (Some(_), Some(right_ptr)) => {
                let succ_ptr = traits::first(right_ptr);
                mem::swap(
                    &mut (*node_ptr.as_ptr()).value,
                    &mut (*succ_ptr.as_ptr()).value,
                );
                (succ_ptr, Some(node_ptr))
            }
            _ => (node_ptr, traits::next(node_ptr)),
        };
        self.unlink_node(victim_ptr);
        self.num_nodes -= 1;
        (self.take_node(victim_ptr), next)
    }

    pub(crate) fn pop_first(&mut self) -> Option<T> {
        let first_ptr = self.first()?;
        Some(unsafe { self.remove_node(first_ptr) }.0)
    }

    pub(crate) fn pop_last(&mut self) -> Option<T> {
        let last_ptr = self.last()?;
        Some(unsafe { self.remove_node(last_ptr) }.0)
    }

    /// Replaces a node having at most one child by that child and rebalances
    /// the path up to the root.
    unsafe fn unlink_node(&mut self, node_ptr: NodePtr<T>) {
        let node = node_ptr.as_ref();
        debug_assert!(node.left.is_none() || node.right.is_none());
        let child = node.left.or(node.right);
        if let Some(mut child_ptr) = child {
            child_ptr.as_mut().parent = node.parent;
        }
        match node.parent {
            None => self.root = child,
            Some(mut parent_ptr) => {
                if parent_ptr.as_ref().left == Some(node_ptr) {
                    parent_ptr.as_mut().left = child;
                } else {
                    parent_ptr.as_mut().right = child;
                }
                // Parent node might be out of balance now
                self.rebalance(Some(parent_ptr));
            }
        }
    }

    fn create_node(&self, parent: Link<T>, value: T) -> Result<NodePtr<T>, Error> {
        let layout = Layout::new::<Node<T>>();
        let node_ptr = match self.alloc.allocate(layout) {
            Ok(block) => block.cast::<Node<T>>(),
            Err(_) => {
                log::debug!("allocator refused tree node of {} bytes", layout.size());
                return Err(Error::AllocFailed { layout });
            }
        };
        unsafe { node_ptr.as_ptr().write(Node::leaf(parent, value)) };
        Ok(node_ptr)
    }

    /// Drops the node including its value and returns its memory.
    unsafe fn destroy_node(&self, node_ptr: NodePtr<T>) {
        ptr::drop_in_place(node_ptr.as_ptr());
        self.alloc
            .deallocate(node_ptr.cast(), Layout::new::<Node<T>>());
    }

    /// Moves the value out of the node and returns its memory.
    unsafe fn take_node(&self, node_ptr: NodePtr<T>) -> T {
        let value = ptr::read(&node_ptr.as_ref().value);
        self.alloc
            .deallocate(node_ptr.cast(), Layout::new::<Node<T>>());
        value
    }

    fn rotate_left(&mut self, mut node_ptr: NodePtr<T>) {
        log::trace!("rotate left");
        unsafe {
            if let Some(mut right_ptr) = node_ptr.as_ref().right {
                node_ptr.as_mut().right = right_ptr.as_ref().left;
                if let Some(mut right_left_ptr) = right_ptr.as_ref().left {
                    right_left_ptr.as_mut().parent = Some(node_ptr);
                }

                right_ptr.as_mut().parent = node_ptr.as_ref().parent;
                self.replace_child(node_ptr.as_ref().parent, node_ptr, right_ptr);

                right_ptr.as_mut().left = Some(node_ptr);
                node_ptr.as_mut().parent = Some(right_ptr);

                Node::adjust_height(node_ptr);
                Node::adjust_height(right_ptr);
            }
        }
    }

    fn rotate_right(&mut self, mut node_ptr: NodePtr<T>) {
        log::trace!("rotate right");
        unsafe {
            if let Some(mut left_ptr) = node_ptr.as_ref().left {
                node_ptr.as_mut().left = left_ptr.as_ref().right;
                if let Some(mut left_right_ptr) = left_ptr.as_ref().right {
                    left_right_ptr.as_mut().parent = Some(node_ptr);
                }

                left_ptr.as_mut().parent = node_ptr.as_ref().parent;
                self.replace_child(node_ptr.as_ref().parent, node_ptr, left_ptr);

                left_ptr.as_mut().right = Some(node_ptr);
                node_ptr.as_mut().parent = Some(left_ptr);

                Node::adjust_height(node_ptr);
                Node::adjust_height(left_ptr);
            }
        }
    }

    /// Puts `new_ptr` into the child slot of `parent` that held `old_ptr`,
    /// or makes it the root.
    unsafe fn replace_child(&mut self, parent: Link<T>, old_ptr: NodePtr<T>, new_ptr: NodePtr<T>) {
        match parent {
            None => self.root = Some(new_ptr),
            Some(mut parent_ptr) => {
                if parent_ptr.as_ref().left == Some(old_ptr) {
                    parent_ptr.as_mut().left = Some(new_ptr);
                } else {
                    parent_ptr.as_mut().right = Some(new_ptr);
                }
            }
        }
    }

    /// Rebalances nodes starting from given position up to the root node.
    fn rebalance(&mut self, start_from: Link<T>) {
        let mut current = start_from;
        while let Some(node_ptr) = current {
            let parent = unsafe { node_ptr.as_ref().parent };
            self.rebalance_node(node_ptr);
            current = parent;
        }
    }

    /// Rebalances nodes starting from given position up to the root node.
    /// Stops after the first rotation, which restores the subtree height from
    /// before a single insert, so the ancestors above are unaffected.
    fn rebalance_once(&mut self, start_from: Link<T>) {
        let mut current = start_from;
        while let Some(node_ptr) = current {
            let parent = unsafe { node_ptr.as_ref().parent };
            if self.rebalance_node(node_ptr) {
                break;
            }
            current = parent;
        }
    }

    /// Restores the AVL condition at the given node if necessary and adjusts its height.
    /// Initial balance must not exceed +2 or -2, which always holds after a single update.
    /// Returns whether a rotation was necessary.
    fn rebalance_node(&mut self, node_ptr: NodePtr<T>) -> bool {
        unsafe {
            let factor = Node::balance_factor(node_ptr);
            debug_assert!((-2..=2).contains(&factor));
            if factor > 1 {
                let Some(left_ptr) = node_ptr.as_ref().left else {
                    unreachable!("left-heavy node without left child");
                };
                if Node::balance_factor(left_ptr) < 0 {
                    // LR
                    self.rotate_left(left_ptr);
                }
                // LL
                self.rotate_right(node_ptr);
                true
            } else if factor < -1 {
                let Some(right_ptr) = node_ptr.as_ref().right else {
                    unreachable!("right-heavy node without right child");
                };
                if Node::balance_factor(right_ptr) > 0 {
                    // RL
                    self.rotate_right(right_ptr);
                }
                // RR
                self.rotate_left(node_ptr);
                true
            } else {
                Node::adjust_height(node_ptr);
                false
            }
        }
    }

    #[cfg(any(test, feature = "consistency_check"))]
    fn nodes(&self) -> impl Iterator<Item = NodePtr<T>> + '_ {
        let mut current = self.root;
        std::iter::from_fn(move || {
            let node_ptr = current?;
            current = unsafe { traits::preorder_next(node_ptr) };
            Some(node_ptr)
        })
    }
}

impl<T, C: Compare<T>, A: Allocator> Tree<T, C, A> {
    /// Inserts `value` unless an equal value is present.
    ///
    /// Returns the node holding the value and whether it was newly inserted.
    /// If allocating the node fails the tree is left untouched.
    pub(crate) fn insert(&mut self, value: T) -> Result<(NodePtr<T>, bool), Error> {
        match self.find_insert_pos(&value) {
            InsertPos::Occupied(node_ptr) => Ok((node_ptr, false)),
            InsertPos::Vacant(parent, mut link_ptr) => {
                let node_ptr = self.create_node(parent, value)?;
                unsafe {
                    *link_ptr.as_mut() = Some(node_ptr);
                }
                self.num_nodes += 1;
                self.rebalance_once(parent);
                Ok((node_ptr, true))
            }
        }
    }

    fn find_insert_pos(&mut self, value: &T) -> InsertPos<T> {
        let mut parent: Link<T> = None;
        let mut link_ptr: LinkPtr<T> = NonNull::from(&mut self.root);
        unsafe {
            while let Some(mut node_ptr) = *link_ptr.as_ref() {
                parent = Some(node_ptr);
                link_ptr = match self.cmp.compare(value, &node_ptr.as_ref().value) {
                    Ordering::Equal => return InsertPos::Occupied(node_ptr),
                    Ordering::Less => NonNull::from(&mut node_ptr.as_mut().left),
                    Ordering::Greater => NonNull::from(&mut node_ptr.as_mut().right),
                };
            }
        }
        InsertPos::Vacant(parent, link_ptr)
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub(crate) fn check_consistency(&self) {
        unsafe {
            // Check root link
            if let Some(root_ptr) = self.root {
                assert!(root_ptr.as_ref().parent.is_none());
            }

            // Check tree nodes
            let mut num_nodes = 0;
            for node_ptr in self.nodes() {
                let node = node_ptr.as_ref();

                // Check link for left child node
                if let Some(left_ptr) = node.left {
                    assert!(left_ptr.as_ref().parent == Some(node_ptr));
                    assert!(self.cmp.less(&left_ptr.as_ref().value, &node.value));
                }

                // Check link for right child node
                if let Some(right_ptr) = node.right {
                    assert!(right_ptr.as_ref().parent == Some(node_ptr));
                    assert!(self.cmp.less(&node.value, &right_ptr.as_ref().value));
                }

                // Check height
                let left_height = Node::left_height(node_ptr);
                let right_height = Node::right_height(node_ptr);
                assert_eq!(node.height, 1 + left_height.max(right_height));

                // Check AVL condition (nearly balance)
                assert!(left_height <= right_height + 1);
                assert!(right_height <= left_height + 1);

                num_nodes += 1;
            }

            // Check number of nodes
            assert_eq!(num_nodes, self.num_nodes);

            // Check in-order sequence
            let mut current = self.first();
            while let Some(node_ptr) = current {
                current = traits::next(node_ptr);
                if let Some(next_ptr) = current {
                    assert!(self.cmp.less(&node_ptr.as_ref().value, &next_ptr.as_ref().value));
                }
            }
        }
    }
}

impl<T, C, A: Allocator> Tree<T, C, A> {
    pub(crate) fn find<Q>(&self, key: &Q) -> Link<T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let mut current = self.root;
        while let Some(node_ptr) = current {
            current = unsafe {
                match self.cmp.compare(key, node_ptr.as_ref().value.borrow()) {
                    Ordering::Equal => break,
                    Ordering::Less => node_ptr.as_ref().left,
                    Ordering::Greater => node_ptr.as_ref().right,
                }
            }
        }
        current
    }

    /// Returns the first node whose value is not less than `key`.
    pub(crate) fn lower_bound<Q>(&self, key: &Q) -> Link<T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let mut candidate = None;
        let mut current = self.root;
        while let Some(node_ptr) = current {
            current = unsafe {
                match self.cmp.compare(key, node_ptr.as_ref().value.borrow()) {
                    Ordering::Equal => return Some(node_ptr),
                    Ordering::Less => {
                        candidate = Some(node_ptr);
                        node_ptr.as_ref().left
                    }
                    Ordering::Greater => node_ptr.as_ref().right,
                }
            }
        }
        candidate
    }

    /// Returns the first node whose value is greater than `key`.
    pub(crate) fn upper_bound<Q>(&self, key: &Q) -> Link<T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let lower = self.lower_bound(key)?;
        unsafe {
            if self.cmp.less(key, lower.as_ref().value.borrow()) {
                Some(lower)
            } else {
                traits::next(lower)
            }
        }
    }

    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        C: Compare<Q>,
        Q: ?Sized,
    {
        let node_ptr = self.find(key)?;
        Some(unsafe { self.remove_node(node_ptr) }.0)
    }
}

impl<T, C, A: Allocator> Drop for Tree<T, C, A> {
    fn drop(&mut self) {
        self.clear();
    }
}

// SAFETY: the tree exclusively owns its nodes; the raw links never escape
// except through borrows tied to the tree.
unsafe impl<T: Send, C: Send, A: Allocator + Send> Send for Tree<T, C, A> {}
unsafe impl<T: Sync, C: Sync, A: Allocator + Sync> Sync for Tree<T, C, A> {}
