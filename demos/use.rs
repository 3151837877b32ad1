use avl_set::compare::Greater;
use avl_set::AvlTreeSet;

fn main() {
    let mut set = AvlTreeSet::new();
    for x in [5, 1, 2, 4, 43, 66, 3] {
        set.insert(x);
    }
    assert!(set.contains(&4));
    assert!(!set.insert(4));

    println!("lower_bound(9) = {:?}", set.lower_bound(&9).get());
    println!("upper_bound(4) = {:?}", set.upper_bound(&4).get());

    // Erase 5 through a cursor and continue from the returned position
    let mut cursor = set.find_mut(&5);
    cursor.remove_current().unwrap();
    println!("after erasing 5 the cursor is at {:?}", cursor.get());

    print!("{{ ");
    for x in &set {
        print!("{x}, ");
    }
    println!("}}");

    print!("pre-order: ");
    for x in set.iter_preorder() {
        print!("{x} ");
    }
    println!();

    let mut descending: AvlTreeSet<u32, Greater> = AvlTreeSet::with_comparator(Greater);
    descending.extend(1..=10);
    println!("descending: {descending:?}");
}
