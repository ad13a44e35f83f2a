//! The open list of best-first searches.
//!
//! An indexed d-ary min-heap of search nodes. Each node remembers where it
//! sits in the heap, so a node's rank can change without a linear search for
//! its entry.
use std::cmp::min;

use nonmax::NonMaxUsize;

use crate::heap_primitives::argmin;
use crate::search::SearchTreeIndex;
use crate::space::Cost;

const HEAP_ARITY: usize = 4usize;
#[inline(always)]
#[must_use]
fn up(i: usize) -> usize {
    crate::heap_primitives::index_parent::<HEAP_ARITY>(i)
}
#[inline(always)]
#[must_use]
fn down_left(i: usize) -> usize {
    crate::heap_primitives::index_first_child::<HEAP_ARITY>(i)
}

/// How good a frontier entry is.
///
/// Lower `f` first, then earlier insertions. The insertion order only breaks
/// ties, callers should not rely on any particular order among equal `f`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct FrontierRank<C: Cost> {
    f: C,
    seq: u64,
}

impl<C: Cost> FrontierRank<C> {
    pub fn f(&self) -> C {
        self.f
    }
}

/// Heap entries carry just ranking information and the index of the actual
/// search node, so heap operations move as little data as possible.
#[derive(Debug)]
struct FrontierEntry<C: Cost> {
    rank: FrontierRank<C>,
    node: SearchTreeIndex,
}

/// Comparisons are forwarded to the rank.
impl<C: Cost> PartialEq for FrontierEntry<C> {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.rank.eq(&other.rank)
    }
}
impl<C: Cost> PartialOrd for FrontierEntry<C> {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.rank.cmp(&other.rank))
    }
}

pub struct Frontier<C: Cost> {
    heap: Vec<FrontierEntry<C>>,
    /// Heap position of every search node, `None` when not in the frontier.
    ///
    /// ```pseudocode
    /// for (i, e) in self.heap.enumerate():
    ///   assert_eq(self.positions[e.node], Some(i))
    /// ```
    positions: Vec<Option<NonMaxUsize>>,
    next_seq: u64,
    max_len: usize,
}

impl<C: Cost> Frontier<C> {
    pub fn new() -> Self {
        Self {
            heap: Vec::with_capacity(256),
            positions: Vec::with_capacity(1024),
            next_seq: 0,
            max_len: 0,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.heap.len()
    }
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
    /// Largest size the frontier ever reached.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    #[inline(always)]
    fn position(&self, node: SearchTreeIndex) -> Option<usize> {
        self.positions
            .get(node.index())
            .copied()
            .flatten()
            .map(|p| p.get())
    }
    #[inline(always)]
    fn set_position(&mut self, node: SearchTreeIndex, position: Option<usize>) {
        let i = node.index();
        if i >= self.positions.len() {
            self.positions.resize(i + 1, None);
        }
        self.positions[i] = position.and_then(NonMaxUsize::new);
    }

    pub fn contains(&self, node: SearchTreeIndex) -> bool {
        self.position(node).is_some()
    }

    pub fn rank_of(&self, node: SearchTreeIndex) -> Option<FrontierRank<C>> {
        self.position(node).map(|i| self.heap[i].rank)
    }

    fn next_rank(&mut self, f: C) -> FrontierRank<C> {
        let seq = self.next_seq;
        self.next_seq += 1;
        FrontierRank { f, seq }
    }

    pub fn push(&mut self, node: SearchTreeIndex, f: C) {
        debug_assert!(!self.contains(node), "{node:?} is already in the frontier");
        let rank = self.next_rank(f);
        let i = self.heap.len();
        self.heap.push(FrontierEntry { rank, node });
        self.set_position(node, Some(i));
        self.sift_up(i);
        self.max_len = self.max_len.max(self.heap.len());
        self.verify();
    }

    /// The best node, without removing it.
    pub fn peek(&self) -> Option<(SearchTreeIndex, C)> {
        self.heap.first().map(|e| (e.node, e.rank.f))
    }

    /// Removes the best node, returning it with its `f`.
    pub fn pop(&mut self) -> Option<(SearchTreeIndex, C)> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let top = self.heap.pop()?;
        self.set_position(top.node, None);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        self.verify();
        Some((top.node, top.rank.f))
    }

    /// Changes the `f` of a node already in the frontier.
    ///
    /// The node counts as freshly inserted for tie-breaking.
    pub fn rerank(&mut self, node: SearchTreeIndex, f: C) {
        let Some(i) = self.position(node) else {
            debug_assert!(false, "{node:?} is not in the frontier");
            return;
        };
        let rank = self.next_rank(f);
        let old = std::mem::replace(&mut self.heap[i].rank, rank);
        if rank < old {
            self.sift_up(i);
        } else {
            self.sift_down(i);
        }
        self.verify();
    }

    #[inline(always)]
    fn swap(&mut self, l: usize, r: usize) {
        if l == r {
            return;
        }
        self.heap.swap(l, r);
        let (ln, rn) = (self.heap[l].node, self.heap[r].node);
        self.set_position(ln, Some(l));
        self.set_position(rn, Some(r));
    }

    /// Raises a node, returning its new index.
    fn sift_up(&mut self, mut pos: usize) -> usize {
        while pos > 0 {
            let parent = up(pos);
            if self.heap[parent].rank <= self.heap[pos].rank {
                break;
            }
            self.swap(parent, pos);
            pos = parent;
        }
        pos
    }

    /// Lowers a node, returning its new index.
    fn sift_down(&mut self, mut pos: usize) -> usize {
        let len = self.heap.len();
        loop {
            let first = down_left(pos);
            if first >= len {
                break;
            }
            let last = min(first + HEAP_ARITY, len);
            let child = first + argmin(&self.heap[first..last]);
            if self.heap[pos].rank <= self.heap[child].rank {
                break;
            }
            self.swap(pos, child);
            pos = child;
        }
        pos
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    fn verify(&self) {
        // All good... (hopefully)
    }
    #[inline(always)]
    #[cfg(feature = "verify")]
    fn verify(&self) {
        for (i, e) in self.heap.iter().enumerate() {
            assert_eq!(self.position(e.node), Some(i), "Out of sync index");
            if i > 0 {
                let p = up(i);
                assert!(
                    self.heap[p].rank <= e.rank,
                    "Node[{p}]={:?} !<= child [{i}]={:?}",
                    self.heap[p],
                    e,
                );
            }
        }
    }
}

impl<C: Cost> Default for Frontier<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Cost> std::fmt::Debug for Frontier<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "Frontier{{({} nodes, best {:?})}}",
            self.len(),
            self.peek().map(|(_, f)| f)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchTree;
    use crate::space::Action;
    use crate::space::State;

    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    struct Cell(u32);
    impl State for Cell {}
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    struct Hop;
    impl Action for Hop {}

    /// Makes `n` distinct node handles.
    fn nodes(n: u32) -> Vec<SearchTreeIndex> {
        let mut tree = SearchTree::<Cell, Hop, u32>::new();
        let root = tree.push_root(Cell(0));
        let mut out = vec![root];
        for i in 1..n {
            out.push(tree.push_child(root, Hop, Cell(i), i));
        }
        out
    }

    #[test]
    fn ranking() {
        let r = |f: u32, seq: u64| FrontierRank { f, seq };
        assert!(r(1, 9) < r(2, 0));
        assert!(r(2, 0) < r(2, 1));
        assert_eq!(r(3, 3), r(3, 3));
    }

    #[test]
    fn pops_in_order() {
        let n = nodes(40);
        let mut frontier = Frontier::<u32>::new();
        for (i, node) in n.iter().enumerate() {
            frontier.push(*node, ((i * 7919) % 40) as u32);
        }
        assert_eq!(frontier.len(), 40);
        assert_eq!(frontier.max_len(), 40);

        let mut last = 0;
        while let Some((node, f)) = frontier.pop() {
            assert!(f >= last);
            assert!(!frontier.contains(node));
            last = f;
        }
        assert!(frontier.is_empty());
        assert_eq!(frontier.max_len(), 40);
    }

    #[test]
    fn equal_ranks_all_come_out() {
        let n = nodes(6);
        let mut frontier = Frontier::<u32>::new();
        for node in &n {
            frontier.push(*node, 5);
        }
        let mut popped: Vec<_> =
            std::iter::from_fn(|| frontier.pop().map(|(node, _)| node)).collect();
        popped.sort();
        assert_eq!(popped, n);
    }

    #[test]
    fn rerank_moves_both_ways() {
        let n = nodes(10);
        let mut frontier = Frontier::<u32>::new();
        for (i, node) in n.iter().enumerate() {
            frontier.push(*node, 10 + i as u32);
        }

        frontier.rerank(n[9], 1);
        assert_eq!(frontier.peek(), Some((n[9], 1)));
        assert_eq!(frontier.rank_of(n[9]).map(|r| r.f()), Some(1));

        frontier.rerank(n[9], 100);
        assert_eq!(frontier.peek(), Some((n[0], 10)));

        let popped: Vec<_> = std::iter::from_fn(|| frontier.pop().map(|(node, _)| node)).collect();
        assert_eq!(popped.last(), Some(&n[9]));
        assert_eq!(popped.len(), 10);
    }

    #[test]
    fn unknown_nodes_are_not_contained() {
        let n = nodes(3);
        let mut frontier = Frontier::<u32>::new();
        frontier.push(n[2], 1);
        assert!(!frontier.contains(n[0]));
        assert!(frontier.contains(n[2]));
        assert_eq!(frontier.rank_of(n[0]), None);
    }
}
