use std::fmt::Debug;

use crate::space::Action;
use crate::space::Cost;
use crate::space::Path;
use crate::space::State;

/// A handle to a `SearchTreeNode<St, A, C>` in its `SearchTree`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearchTreeIndex(u32);

impl SearchTreeIndex {
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
pub struct SearchTreeNode<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub(crate) parent: Option<(SearchTreeIndex, A)>,
    pub(crate) state: St,
    pub(crate) g: C,
    pub(crate) depth: u32,
}

impl<St, A, C> SearchTreeNode<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub fn state(&self) -> &St {
        &self.state
    }
    pub fn g(&self) -> C {
        self.g
    }
    pub fn depth(&self) -> u32 {
        self.depth
    }
    pub fn parent(&self) -> Option<SearchTreeIndex> {
        self.parent.map(|(p, _)| p)
    }
}

/// All the Search Nodes of one search.
///
/// Nodes are only appended. Parents are nodes that were already expanded and
/// `reach` only rewires childless nodes, so parent links never form a cycle.
pub(crate) struct SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    nodes: Vec<SearchTreeNode<St, A, C>>,
}

impl<St, A, C> SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::with_capacity(1024),
        }
    }

    #[must_use]
    pub(crate) fn push_root(&mut self, s: St) -> SearchTreeIndex {
        self.push(SearchTreeNode {
            parent: None,
            state: s,
            g: C::zero(),
            depth: 0,
        })
    }

    #[must_use]
    pub(crate) fn push_child(
        &mut self,
        parent: SearchTreeIndex,
        a: A,
        s: St,
        g: C,
    ) -> SearchTreeIndex {
        let depth = self[parent].depth + 1;
        self.push(SearchTreeNode {
            parent: Some((parent, a)),
            state: s,
            g,
            depth,
        })
    }

    #[inline(always)]
    fn push(&mut self, node: SearchTreeNode<St, A, C>) -> SearchTreeIndex {
        let index = SearchTreeIndex(self.nodes.len() as u32);
        self.nodes.push(node);
        index
    }

    /// Gives a childless node a better path through a new parent.
    pub(crate) fn reach(&mut self, node: SearchTreeIndex, new_parent: SearchTreeIndex, a: A, g: C) {
        debug_assert!(new_parent != node);
        debug_assert!(g < self[node].g);
        let depth = self[new_parent].depth + 1;
        let n = &mut self[node];
        n.parent = Some((new_parent, a));
        n.g = g;
        n.depth = depth;
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether `s` is `node`'s state or the state of one of its ancestors.
    pub(crate) fn on_branch(&self, mut node: SearchTreeIndex, s: &St) -> bool {
        loop {
            let n = &self[node];
            if n.state == *s {
                return true;
            }
            match n.parent {
                Some((parent, _)) => node = parent,
                None => return false,
            }
        }
    }

    /// Follows parents back to the root and reverses.
    #[must_use]
    pub fn path(&self, mut node_index: SearchTreeIndex) -> Path<St, A, C> {
        let mut path = Path::<St, A, C>::new_from_start(self[node_index].state);
        let goal_g = self[node_index].g;

        while let Some((parent_index, a)) = self[node_index].parent {
            debug_assert!(parent_index != node_index);
            let step = self[node_index].g - self[parent_index].g;
            path.append((a, self[parent_index].state), step);
            node_index = parent_index;
        }
        path.reverse();

        // Summing the steps again can round differently than the search did.
        path.cost = goal_g;
        path
    }
}

impl<St, A, C> Default for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<St, A, C> std::ops::Index<SearchTreeIndex> for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    type Output = SearchTreeNode<St, A, C>;

    #[inline(always)]
    fn index(&self, index: SearchTreeIndex) -> &Self::Output {
        &self.nodes[index.index()]
    }
}

impl<St, A, C> std::ops::IndexMut<SearchTreeIndex> for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    fn index_mut(&mut self, index: SearchTreeIndex) -> &mut SearchTreeNode<St, A, C> {
        &mut self.nodes[index.index()]
    }
}

impl<St, A, C> std::fmt::Debug for SearchTree<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SearchTree{{({} nodes)}}", self.len())
    }
}
