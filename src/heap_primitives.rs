// Index arithmetic for implicit d-ary heaps.
//
// A heap is a tree-like structure where every subtree's root has a better
// score than all the other nodes in the subtree, laid out in an array.
//
// With arity 4,
//
// ```text
//                                  0
//         1                2                3                4
//   5  6  7  8       9 10 11 12      13 14 15 16      17 18 19 20
// ```
//
// The last level will often be incomplete.

/// The parent node
///
/// ```
/// use route_search::heap_primitives::index_parent;
/// assert_eq!(index_parent::<2>(1), 0);
/// assert_eq!(index_parent::<2>(6), 2);
/// assert_eq!(index_parent::<4>(4), 0);
/// assert_eq!(index_parent::<4>(5), 1);
/// assert_eq!(index_parent::<4>(20), 4);
/// ```
#[inline(always)]
#[must_use]
pub fn index_parent<const A: usize>(i: usize) -> usize {
    debug_assert!(i > 0, "The root has no parent");
    (i - 1) / A
}

/// The first (left-most) child
///
/// ```
/// use route_search::heap_primitives::index_first_child;
/// assert_eq!(index_first_child::<2>(0), 1);
/// assert_eq!(index_first_child::<2>(3), 7);
/// assert_eq!(index_first_child::<4>(0), 1);
/// assert_eq!(index_first_child::<4>(1), 5);
/// assert_eq!(index_first_child::<4>(4), 17);
/// ```
#[inline(always)]
#[must_use]
pub fn index_first_child<const A: usize>(i: usize) -> usize {
    (A * i) + 1
}

/// Index of the first minimum in a non-empty slice.
///
/// ```
/// use route_search::heap_primitives::argmin;
/// assert_eq!(argmin(&[3, 1, 2, 1]), 1);
/// assert_eq!(argmin(&[7]), 0);
/// ```
#[inline(always)]
#[must_use]
pub fn argmin<T: PartialOrd>(a: &[T]) -> usize {
    debug_assert!(!a.is_empty());
    let mut best = 0;
    for i in 1..a.len() {
        if a[i] < a[best] {
            best = i;
        }
    }
    best
}
