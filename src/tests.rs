use std::alloc::Layout;
use std::cell::Cell;
use std::collections::BTreeSet;
use std::ops::Bound;
use std::ptr::NonNull;

use allocator_api2::alloc::{AllocError, Allocator, Global};

use super::compare::{FromFn, Greater};
use super::iter::InorderIter;
use super::set::Iter;
use super::traits::{BinaryNode, TreeNode};
use super::{AvlTreeSet, Cursor, Error, Node};

const N: i32 = 1_000;
const LARGE_N: i32 = 10_000_000;

fn scenario_a() -> AvlTreeSet<i32> {
    let mut set = AvlTreeSet::new();
    for value in [5, 1, 2, 4, 43, 66, 3] {
        assert!(set.insert(value));
        set.check_consistency();
    }
    set
}

fn to_vec<T: Copy, C, A: Allocator>(set: &AvlTreeSet<T, C, A>) -> Vec<T> {
    set.iter().copied().collect()
}

#[test]
fn test_new() {
    let set_i32 = AvlTreeSet::<i32>::new();
    assert!(set_i32.is_empty());
    set_i32.check_consistency();

    let set_i8 = AvlTreeSet::<i8>::new();
    assert!(set_i8.is_empty());
    set_i8.check_consistency();

    let set_string = AvlTreeSet::<String>::new();
    assert!(set_string.is_empty());
    set_string.check_consistency();
}

#[test]
fn test_empty() {
    let mut set = AvlTreeSet::<i32>::new();
    assert!(set.begin() == set.end());
    assert!(set.find(&42).is_end());
    assert!(set.lower_bound(&42).is_end());
    assert!(set.upper_bound(&42).is_end());
    assert!(!set.remove(&42));
    assert_eq!(set.count(&42), 0);
    assert_eq!(set.first(), None);
    assert_eq!(set.pop_last(), None);
    assert_eq!(set.iter().next(), None);
    assert_eq!(set.end().value(), Err(Error::CursorAtEnd));
    assert_eq!(set.end().move_prev(), Err(Error::BeforeBegin));
    assert_eq!(set.begin_mut().remove_current(), Err(Error::CursorAtEnd));
    set.check_consistency();
}

#[test]
fn test_rebalance() {
    {
        //     3 ->   2
        //    /      / \
        //   2      1   3
        //  /
        // 1
        let mut set = AvlTreeSet::new();
        set.insert(3);
        set.insert(2);
        set.insert(1);
        set.check_consistency();
        assert_eq!(set.height(), 2);
    }
    {
        //     3   ->     3 ->   2
        //    / \        /      / \
        //   2   4      2      1   3
        //  /          /
        // 1          1
        let mut set = AvlTreeSet::new();
        set.insert(3);
        set.insert(2);
        set.insert(4);
        set.insert(1);
        set.check_consistency();
        assert_eq!(set.height(), 3);
        set.remove(&4);
        set.check_consistency();
        assert_eq!(set.height(), 2);
    }
    {
        //   3  ->   2
        //  /       / \
        // 1       1   3
        //  \
        //   2
        let mut set = AvlTreeSet::new();
        set.insert(3);
        set.insert(1);
        set.insert(2);
        set.check_consistency();
        assert_eq!(set.height(), 2);
    }
    {
        //   3   ->   3  ->   2
        //  / \      /       / \
        // 1   4    1       1   3
        //  \        \
        //   2        2
        let mut set = AvlTreeSet::new();
        set.insert(3);
        set.insert(1);
        set.insert(4);
        set.insert(2);
        set.check_consistency();
        assert_eq!(set.height(), 3);
        set.remove(&4);
        set.check_consistency();
        assert_eq!(set.height(), 2);
    }
    {
        // 1 ->    2
        //  \     / \
        //   2   1   3
        //    \
        //     3
        let mut set = AvlTreeSet::new();
        set.insert(1);
        set.insert(2);
        set.insert(3);
        set.check_consistency();
        assert_eq!(set.height(), 2);
    }
    {
        //   1     -> 1     ->    2
        //  / \        \         / \
        // 0   2        2       1   3
        //      \        \
        //       3        3
        let mut set = AvlTreeSet::new();
        set.insert(1);
        set.insert(0);
        set.insert(2);
        set.insert(3);
        set.check_consistency();
        assert_eq!(set.height(), 3);
        set.remove(&0);
        set.check_consistency();
        assert_eq!(set.height(), 2);
    }
    {
        // 1   ->  2
        //  \     / \
        //   3   1   3
        //  /
        // 2
        let mut set = AvlTreeSet::new();
        set.insert(1);
        set.insert(3);
        set.insert(2);
        set.check_consistency();
        assert_eq!(set.height(), 2);
    }
    {
        //   1   ->  1   ->  2
        //  / \       \     / \
        // 0   3       3   1   3
        //    /       /
        //   2       2
        let mut set = AvlTreeSet::new();
        set.insert(1);
        set.insert(0);
        set.insert(3);
        set.insert(2);
        set.check_consistency();
        assert_eq!(set.height(), 3);
        set.remove(&0);
        set.check_consistency();
        assert_eq!(set.height(), 2);
    }
    {
        // Left child with balance 0 after a removal
        //       30     ->   20
        //      /  \        /  \
        //    20    40     10   30
        //   /  \              /
        //  10   25           25
        let mut set = AvlTreeSet::new();
        for value in [30, 20, 40, 10, 25] {
            set.insert(value);
        }
        set.remove(&40);
        set.check_consistency();
        assert_eq!(set.height(), 3);
        assert_eq!(to_vec(&set), [10, 20, 25, 30]);
    }
}

#[test]
fn test_scenario_a() {
    let set = scenario_a();
    assert_eq!(to_vec(&set), [1, 2, 3, 4, 5, 43, 66]);
    assert_eq!(set.lower_bound(&9).get(), Some(&43));
    assert_eq!(set.lower_bound(&4).get(), Some(&4));
    assert_eq!(set.upper_bound(&4).get(), Some(&5));
    assert!(set.upper_bound(&66).is_end());
    assert_eq!(set.lower_bound(&0).get(), Some(&1));
}

#[test]
fn test_ascending_inserts_stay_balanced() {
    let mut set = AvlTreeSet::new();
    for value in 1..=7 {
        set.insert(value);
        set.check_consistency();
    }
    // Perfect tree rooted at 4
    assert_eq!(set.height(), 3);
    assert_eq!(
        set.iter_preorder().copied().collect::<Vec<_>>(),
        [4, 2, 1, 3, 6, 5, 7]
    );
    assert_eq!(
        set.iter_preorder().rev().copied().collect::<Vec<_>>(),
        [7, 5, 6, 3, 1, 2, 4]
    );
}

#[test]
fn test_remove_node_with_two_children() {
    let mut set = scenario_a();
    assert!(set.remove(&5));
    set.check_consistency();
    assert_eq!(to_vec(&set), [1, 2, 3, 4, 43, 66]);

    let mut set = scenario_a();
    let mut cursor = set.find_mut(&5);
    assert_eq!(cursor.remove_current(), Ok(5));
    assert_eq!(cursor.get(), Some(&43));
    assert_eq!(cursor.remove_current(), Ok(43));
    assert_eq!(cursor.get(), Some(&66));
    set.check_consistency();
    assert_eq!(to_vec(&set), [1, 2, 3, 4, 66]);
}

#[test]
fn test_remove_is_idempotent() {
    let mut set = scenario_a();
    assert!(set.remove(&43));
    assert_eq!(set.len(), 6);
    let before = to_vec(&set);
    assert!(!set.remove(&43));
    assert_eq!(set.len(), 6);
    assert_eq!(to_vec(&set), before);
    set.check_consistency();
}

#[test]
fn test_insert() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
    values.sort();
    values.dedup();

    let mut set = AvlTreeSet::new();
    for value in &values {
        assert!(set.insert(*value));
        set.check_consistency();
    }
    assert!(set.len() == values.len());

    for value in &values {
        assert!(!set.insert(*value));
    }
    assert!(set.len() == values.len());
}

#[test]
fn test_insert_sorted_range() {
    let mut set = AvlTreeSet::new();
    for value in 0..N {
        assert!(set.insert(value));
        set.check_consistency();
    }
    assert!(set.len() == N as usize);
    assert!(set.height() > 0);
    assert!(set.height() < N as usize / 2);
    assert!(set.get(&-42).is_none());
}

#[test]
fn test_insert_shuffled_range() {
    use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

    let mut values: Vec<i32> = (0..N).collect();
    let mut rng = StdRng::seed_from_u64(0);
    values.shuffle(&mut rng);

    let mut set = AvlTreeSet::new();
    for value in &values {
        assert!(set.insert(*value));
        set.check_consistency();
    }
    assert!(set.len() == values.len());

    // Round trip in both directions
    values.sort();
    assert_eq!(to_vec(&set), values);
    values.reverse();
    assert_eq!(set.iter().rev().copied().collect::<Vec<_>>(), values);
}

#[test]
fn test_insert_cursor() {
    let mut set = scenario_a();
    let cursor = set.insert_cursor(10);
    assert_eq!(cursor.get(), Some(&10));
    assert_eq!(cursor.as_cursor().peek_prev(), Some(&5));
    assert_eq!(cursor.as_cursor().peek_next(), Some(&43));

    let cursor = set.insert_cursor(4);
    assert_eq!(cursor.get(), Some(&4));
    assert_eq!(set.len(), 8);
    set.check_consistency();
}

#[test]
fn test_get() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();

    let mut set = AvlTreeSet::new();
    assert!(set.get(&42).is_none());
    for value in &values {
        set.insert(*value);
    }

    for value in &values {
        assert_eq!(set.get(value), Some(value));
        assert_eq!(set.find(value).value(), Ok(value));
        assert!(set.contains(value));
        assert_eq!(set.count(value), 1);
    }
}

#[test]
fn test_get_borrowed() {
    let set: AvlTreeSet<String> = ["pear", "apple", "fig"].iter().map(|s| s.to_string()).collect();
    assert_eq!(set.get("fig").map(String::as_str), Some("fig"));
    assert!(set.contains("apple"));
    assert!(!set.contains("plum"));
    assert_eq!(set.lower_bound("b").get().map(String::as_str), Some("fig"));
}

#[test]
fn test_clear() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
    values.sort();
    values.dedup();

    let mut set = AvlTreeSet::new();
    for value in &values {
        set.insert(value.to_string());
    }
    assert!(!set.is_empty());
    assert!(set.len() == values.len());

    set.clear();
    assert!(set.is_empty());
    assert!(set.len() == 0);
    assert!(set.begin() == set.end());

    for value in &values {
        assert!(set.insert(value.to_string()));
    }
    assert!(!set.is_empty());
    assert!(set.len() == values.len());
    set.check_consistency();
}

#[test]
fn test_remove() {
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();
    values.sort();
    values.dedup();

    let mut set = AvlTreeSet::new();
    for value in &values {
        set.insert(*value);
    }

    values.shuffle(&mut rng);
    for value in &values {
        assert!(set.get(value).is_some());
        assert_eq!(set.take(value), Some(*value));
        assert!(set.get(value).is_none());
        set.check_consistency();
    }
    assert!(set.is_empty());
    assert!(set.len() == 0);
}

#[test]
fn test_remove_with_cursor() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen_range(0..N)).collect();

    let mut set: AvlTreeSet<i32> = values.iter().copied().collect();
    values.sort();
    values.dedup();

    // Remove every value divisible by 3 in a single pass
    let mut cursor = set.begin_mut();
    while let Some(&value) = cursor.get() {
        if value % 3 == 0 {
            assert_eq!(cursor.remove_current(), Ok(value));
        } else {
            cursor.move_next().unwrap();
        }
    }
    assert_eq!(cursor.move_next(), Err(Error::CursorAtEnd));
    set.check_consistency();

    values.retain(|value| value % 3 != 0);
    assert_eq!(to_vec(&set), values);
}

#[test]
fn test_cursor() {
    let set = scenario_a();

    let mut cursor = set.begin();
    assert_eq!(cursor.get(), Some(&1));
    assert_eq!(cursor.move_prev(), Err(Error::BeforeBegin));
    assert_eq!(cursor.get(), Some(&1));

    let mut seen = Vec::new();
    while let Ok(&value) = cursor.value() {
        seen.push(value);
        cursor.move_next().unwrap();
    }
    assert_eq!(seen, [1, 2, 3, 4, 5, 43, 66]);
    assert!(cursor == set.end());
    assert_eq!(cursor.move_next(), Err(Error::CursorAtEnd));

    // Stepping back from the end lands on the last value
    cursor.move_prev().unwrap();
    assert_eq!(cursor.get(), Some(&66));
    assert_eq!(cursor.peek_next(), None);
    assert_eq!(cursor.peek_prev(), Some(&43));

    let mut seen = Vec::new();
    loop {
        seen.push(*cursor.value().unwrap());
        if cursor.move_prev().is_err() {
            break;
        }
    }
    assert_eq!(seen, [66, 43, 5, 4, 3, 2, 1]);
    assert!(cursor == set.begin());
    assert!(set.find(&4) == set.lower_bound(&4));
    assert!(set.find(&4) != set.upper_bound(&4));
}

#[test]
fn test_bounds() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let values: Vec<i32> = (0..N).map(|_| rng.gen_range(0..4 * N)).collect();
    let set: AvlTreeSet<i32> = values.iter().copied().collect();
    let model: BTreeSet<i32> = values.iter().copied().collect();

    for probe in -1..=4 * N {
        assert_eq!(set.lower_bound(&probe).get(), model.range(probe..).next());
        assert_eq!(
            set.upper_bound(&probe).get(),
            model.range((Bound::Excluded(probe), Bound::Unbounded)).next()
        );
    }
}

fn collect(iter: Iter<'_, i32>) -> Vec<i32> {
    iter.copied().collect()
}

#[test]
fn test_range() {
    let set: AvlTreeSet<i32> = (0..20).map(|value| value * 2).collect();
    let empty: Vec<i32> = Vec::new();

    assert_eq!(collect(set.range::<i32, _>(..)), to_vec(&set));
    assert_eq!(collect(set.range(3..9)), [4, 6, 8]);
    assert_eq!(collect(set.range(4..=10)), [4, 6, 8, 10]);
    assert_eq!(collect(set.range(..3)), [0, 2]);
    assert_eq!(collect(set.range(37..)), [38]);
    assert_eq!(collect(set.range(5..5)), empty);
    assert_eq!(collect(set.range(5..=5)), empty);
    assert_eq!(collect(set.range(6..=6)), [6]);
    assert_eq!(collect(set.range(39..100)), empty);
    assert_eq!(collect(set.range(-10..0)), empty);
    assert_eq!(
        collect(set.range((Bound::Excluded(4), Bound::Excluded(10)))),
        [6, 8]
    );
    assert_eq!(set.range(3..9).rev().copied().collect::<Vec<_>>(), [8, 6, 4]);
}

#[test]
#[should_panic(expected = "range start is greater than range end")]
fn test_range_reversed() {
    let set: AvlTreeSet<i32> = (0..10).collect();
    let _ = set.range(7..3);
}

#[test]
fn test_set_iter() {
    use rand::{rngs::StdRng, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..N).map(|_| rng.gen()).collect();

    let mut set = AvlTreeSet::new();
    for value in &values {
        set.insert(*value);
    }

    values.sort();
    values.dedup();

    let mut set_iter = set.iter();
    for value in &values {
        assert_eq!(set_iter.next(), Some(value));
    }
    assert!(set_iter.next().is_none());

    let mut value_iter = values.iter();
    for value_in_set in &set {
        assert_eq!(Some(value_in_set), value_iter.next());
    }
    assert!(value_iter.next().is_none());
    assert_eq!(set.iter().count(), set.len());
    assert_eq!(set.iter_preorder().count(), set.len());

    assert_eq!(set.into_iter().collect::<Vec<_>>(), values);
}

#[test]
fn test_into_iter_both_ends() {
    let set: AvlTreeSet<i32> = (1..=6).collect();
    let mut into_iter = set.into_iter();
    assert_eq!(into_iter.len(), 6);
    assert_eq!(into_iter.next(), Some(1));
    assert_eq!(into_iter.next_back(), Some(6));
    assert_eq!(into_iter.next(), Some(2));
    assert_eq!(format!("{into_iter:?}"), "[3, 4, 5]");
    assert_eq!(into_iter.rev().collect::<Vec<_>>(), [5, 4, 3]);
}

#[test]
fn test_pop() {
    let mut set = scenario_a();
    assert_eq!(set.first(), Some(&1));
    assert_eq!(set.last(), Some(&66));
    assert_eq!(set.pop_first(), Some(1));
    assert_eq!(set.pop_last(), Some(66));
    set.check_consistency();
    assert_eq!(to_vec(&set), [2, 3, 4, 5, 43]);
}

#[test]
fn test_clone() {
    let set = scenario_a();
    let mut copy = set.clone();
    copy.check_consistency();
    assert_eq!(copy, set);

    copy.insert(100);
    copy.remove(&1);
    assert_eq!(to_vec(&set), [1, 2, 3, 4, 5, 43, 66]);
    assert_eq!(set.len(), 7);
    assert_eq!(to_vec(&copy), [2, 3, 4, 5, 43, 66, 100]);
    assert_ne!(copy, set);
}

#[test]
fn test_move() {
    let mut set = scenario_a();
    let moved = std::mem::take(&mut set);
    assert!(set.is_empty());
    assert!(set.begin() == set.end());
    set.check_consistency();
    assert_eq!(moved.len(), 7);
    moved.check_consistency();
}

#[test]
fn test_debug() {
    let set: AvlTreeSet<i32> = [3, 1, 2].into_iter().collect();
    assert_eq!(format!("{set:?}"), "{1, 2, 3}");
    assert_eq!(format!("{:?}", set.find(&2)), "Cursor(Some(2))");
    assert_eq!(format!("{:?}", set.end()), "Cursor(None)");
    assert_eq!(format!("{:?}", set.iter()), "[1, 2, 3]");
}

#[test]
fn test_comparators() {
    let mut set: AvlTreeSet<i32, Greater> = AvlTreeSet::with_comparator(Greater);
    set.extend([5, 1, 2, 4, 43, 66, 3]);
    set.check_consistency();
    assert_eq!(to_vec(&set), [66, 43, 5, 4, 3, 2, 1]);
    assert_eq!(set.lower_bound(&9).get(), Some(&5));

    let mut set = AvlTreeSet::with_comparator(FromFn(|lhs: &String, rhs: &String| {
        lhs.to_lowercase() < rhs.to_lowercase()
    }));
    assert!(set.insert(String::from("Banana")));
    assert!(set.insert(String::from("apple")));
    assert!(!set.insert(String::from("BANANA")));
    set.check_consistency();
    assert_eq!(
        set.iter().map(String::as_str).collect::<Vec<_>>(),
        ["apple", "Banana"]
    );
}

#[derive(Default)]
struct CountingAlloc {
    allocations: Cell<usize>,
    deallocations: Cell<usize>,
    budget: Cell<Option<usize>>,
}

unsafe impl Allocator for CountingAlloc {
    fn allocate(&self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
        if let Some(budget) = self.budget.get() {
            if budget == 0 {
                return Err(AllocError);
            }
            self.budget.set(Some(budget - 1));
        }
        self.allocations.set(self.allocations.get() + 1);
        Global.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        self.deallocations.set(self.deallocations.get() + 1);
        Global.deallocate(ptr, layout)
    }
}

#[test]
fn test_allocator() {
    let alloc = CountingAlloc::default();
    {
        let mut set = AvlTreeSet::new_in(&alloc);
        for value in 0..100 {
            set.insert(value);
        }
        assert_eq!(alloc.allocations.get(), 100);
        for value in 0..50 {
            set.remove(&value);
        }
        assert_eq!(alloc.deallocations.get(), 50);
        set.check_consistency();
    }
    assert_eq!(alloc.deallocations.get(), 100);
}

#[test]
fn test_allocation_failure() {
    let alloc = CountingAlloc::default();
    alloc.budget.set(Some(3));

    let mut set = AvlTreeSet::new_in(&alloc);
    assert_eq!(set.try_insert(2), Ok(true));
    assert_eq!(set.try_insert(1), Ok(true));
    assert_eq!(set.try_insert(3), Ok(true));
    assert_eq!(
        set.try_insert(4),
        Err(Error::AllocFailed {
            layout: Layout::new::<Node<i32>>()
        })
    );
    // Present values need no allocation
    assert_eq!(set.try_insert(3), Ok(false));
    set.check_consistency();
    assert_eq!(to_vec(&set), [1, 2, 3]);
    assert!(Error::AllocFailed {
        layout: Layout::new::<Node<i32>>()
    }
    .to_string()
    .starts_with("failed to allocate tree node"));

    drop(set);
    assert_eq!(alloc.allocations.get(), alloc.deallocations.get());
}

#[test]
fn test_drop_values() {
    use std::rc::Rc;

    let tracker = Rc::new(());
    let mut set = AvlTreeSet::with_comparator(FromFn(|lhs: &(i32, Rc<()>), rhs: &(i32, Rc<()>)| {
        lhs.0 < rhs.0
    }));
    for value in 0..64 {
        set.insert((value, Rc::clone(&tracker)));
    }
    assert_eq!(Rc::strong_count(&tracker), 65);
    set.remove(&(10, Rc::clone(&tracker)));
    assert_eq!(Rc::strong_count(&tracker), 64);
    drop(set);
    assert_eq!(Rc::strong_count(&tracker), 1);
}

/// A bare binary node layout, unrelated to the set's own nodes.
struct PlainNode {
    value: char,
    parent: Option<NonNull<PlainNode>>,
    left: Option<NonNull<PlainNode>>,
    right: Option<NonNull<PlainNode>>,
}

unsafe impl TreeNode for PlainNode {
    type Value = char;

    unsafe fn parent(node: NonNull<Self>) -> Option<NonNull<Self>> {
        node.as_ref().parent
    }

    unsafe fn value<'a>(node: NonNull<Self>) -> &'a char {
        &(*node.as_ptr()).value
    }
}

unsafe impl BinaryNode for PlainNode {
    unsafe fn left(node: NonNull<Self>) -> Option<NonNull<Self>> {
        node.as_ref().left
    }

    unsafe fn right(node: NonNull<Self>) -> Option<NonNull<Self>> {
        node.as_ref().right
    }
}

#[test]
fn test_cursor_over_foreign_nodes() {
    //     b
    //    / \
    //   a   d
    //      /
    //     c
    let [a, b, c, d] = ['a', 'b', 'c', 'd'].map(|value| {
        NonNull::from(Box::leak(Box::new(PlainNode {
            value,
            parent: None,
            left: None,
            right: None,
        })))
    });
    unsafe {
        (*b.as_ptr()).left = Some(a);
        (*b.as_ptr()).right = Some(d);
        (*a.as_ptr()).parent = Some(b);
        (*d.as_ptr()).parent = Some(b);
        (*d.as_ptr()).left = Some(c);
        (*c.as_ptr()).parent = Some(d);

        let mut cursor = Cursor::new(Some(a), Some(b));
        let mut seen = String::new();
        while let Some(&value) = cursor.get() {
            seen.push(value);
            cursor.move_next().unwrap();
        }
        assert_eq!(seen, "abcd");
        cursor.move_prev().unwrap();
        assert_eq!(cursor.get(), Some(&'d'));

        let iter = InorderIter::new(Some(a), Some(d));
        assert_eq!(iter.rev().collect::<String>(), "dcba");

        for node in [a, b, c, d] {
            drop(Box::from_raw(node.as_ptr()));
        }
    }
}

#[test]
#[ignore]
fn test_large() {
    use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0);
    let mut values: Vec<i32> = (0..LARGE_N).map(|_| rng.gen_range(0..LARGE_N)).collect();

    let mut set = AvlTreeSet::new();
    for value in &values {
        set.insert(*value);
    }
    set.check_consistency();

    values.shuffle(&mut rng);
    values.resize(values.len() / 2, 0);
    for value in &values {
        set.remove(value);
    }
    set.check_consistency();
}

mod model {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use crate::AvlTreeSet;

    #[derive(Debug, Clone)]
    enum Op {
        Insert(u8),
        Remove(u8),
        PopFirst,
        RemoveAtLowerBound(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => any::<u8>().prop_map(Op::Insert),
            2 => any::<u8>().prop_map(Op::Remove),
            1 => Just(Op::PopFirst),
            1 => any::<u8>().prop_map(Op::RemoveAtLowerBound),
        ]
    }

    proptest! {
        #[test]
        fn matches_btree_set(ops in proptest::collection::vec(op(), 0..256)) {
            let mut set = AvlTreeSet::new();
            let mut model = BTreeSet::new();
            for op in ops {
                match op {
                    Op::Insert(value) => {
                        prop_assert_eq!(set.insert(value), model.insert(value));
                    }
                    Op::Remove(value) => {
                        prop_assert_eq!(set.remove(&value), model.remove(&value));
                    }
                    Op::PopFirst => {
                        prop_assert_eq!(set.pop_first(), model.pop_first());
                    }
                    Op::RemoveAtLowerBound(value) => {
                        let expected = model.range(value..).next().copied();
                        let mut cursor = set.lower_bound_mut(&value);
                        prop_assert_eq!(cursor.remove_current().ok(), expected);
                        if let Some(removed) = expected {
                            model.remove(&removed);
                            prop_assert_eq!(cursor.get(), model.range(removed..).next());
                        }
                    }
                }
                set.check_consistency();
                prop_assert_eq!(set.len(), model.len());
                prop_assert!(set.iter().eq(model.iter()));
            }
        }
    }
}
