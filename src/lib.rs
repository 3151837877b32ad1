//! An ordered set implemented with an AVL tree.
//!
//! [`AvlTreeSet`] keeps one element per equivalence class of its comparator
//! and allocates its nodes through a pluggable [`Allocator`].
//! Elements are reached through cursors ([`Cursor`], [`CursorMut`]) that
//! behave like bidirectional iterators with an end position, or through
//! ordinary Rust iterators.
//!
//! Cursors and iterators only navigate through the accessor traits in
//! [`traits`], so they work for any node layout implementing them.
//!
//! ```
//! use avl_set::AvlTreeSet;
//!
//! let mut set: AvlTreeSet<_> = [5, 1, 2, 4, 43, 66, 3].into_iter().collect();
//! assert_eq!(set.lower_bound(&9).get(), Some(&43));
//! assert_eq!(set.upper_bound(&4).get(), Some(&5));
//!
//! // Remove every even value while walking the set
//! let mut cursor = set.begin_mut();
//! while let Some(&value) = cursor.get() {
//!     if value % 2 == 0 {
//!         cursor.remove_current().unwrap();
//!     } else {
//!         cursor.move_next().unwrap();
//!     }
//! }
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), [1, 3, 5, 43]);
//! ```

pub mod compare;
mod cursor;
mod error;
pub mod iter;
mod node;
pub mod set;
pub mod traits;
mod tree;

pub use allocator_api2::alloc::{Allocator, Global};
pub use compare::Compare;
pub use cursor::{Cursor, CursorMut};
pub use error::Error;
pub use node::Node;
pub use set::AvlTreeSet;

#[cfg(test)]
mod tests;
