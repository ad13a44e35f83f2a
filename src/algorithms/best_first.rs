//! Best-first graph search.
//!
//! One procedure covers Uniform-Cost Search, A* and Greedy best-first search,
//! they only differ in how a node is ranked in the frontier.

use std::fmt::Debug;
use std::marker::PhantomData;

use rustc_hash::FxHashMap;

use crate::algorithms::SearchStats;
use crate::frontier::Frontier;
use crate::problem::Problem;
use crate::problem::ProblemHeuristic;
use crate::search::SearchTree;
use crate::search::SearchTreeIndex;
use crate::search::SearchTreeNode;
use crate::space::Action;
use crate::space::Cost;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// The evaluation function `f(node)` that orders the frontier.
pub trait Evaluation<P, Sp, St, A, C>: Debug
where
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    fn f(&self, p: &P, s: &St, g: C) -> C;
}

/// `f = g`
#[derive(Copy, Clone, Debug, Default)]
pub struct UniformCost;

impl<P, Sp, St, A, C> Evaluation<P, Sp, St, A, C> for UniformCost
where
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    fn f(&self, _p: &P, _s: &St, g: C) -> C {
        g
    }
}

/// `f = g + h`
#[derive(Copy, Clone, Debug, Default)]
pub struct AStar<H>(pub H);

impl<H, P, Sp, St, A, C> Evaluation<P, Sp, St, A, C> for AStar<H>
where
    H: ProblemHeuristic<P, Sp, St, A, C>,
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    fn f(&self, p: &P, s: &St, g: C) -> C {
        g.saturating_add(&self.0.h(p, s))
    }
}

/// `f = h`
#[derive(Copy, Clone, Debug, Default)]
pub struct Greedy<H>(pub H);

impl<H, P, Sp, St, A, C> Evaluation<P, Sp, St, A, C> for Greedy<H>
where
    H: ProblemHeuristic<P, Sp, St, A, C>,
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    fn f(&self, p: &P, s: &St, _g: C) -> C {
        self.0.h(p, s)
    }
}

/// Where a reached state's node lives, and whether it was expanded.
#[derive(Copy, Clone, Debug)]
struct NodeEntry {
    node: SearchTreeIndex,
    closed: bool,
}

/// Best-first graph search.
///
/// States are expanded at most once. When a state already in the frontier
/// is reached more cheaply, its node is rewired to the cheaper parent and
/// re-ranked instead of queueing a duplicate.
///
/// Among frontier entries with equal `f` the earliest inserted one is
/// popped first. That order is an implementation detail.
#[derive(Debug)]
pub struct BestFirstSearch<'p, E, P, Sp, St, A, C>
where
    E: Evaluation<P, Sp, St, A, C>,
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    problem: &'p P,
    evaluation: E,

    /// All the Search Nodes. Parents are referenced by index.
    search_tree: SearchTree<St, A, C>,
    /// Nodes generated but not yet expanded.
    frontier: Frontier<C>,
    /// Amalgamation of,
    /// - The `HashMap<St, SearchTreeIndex>` to find frontier nodes by state.
    /// - The "Closed Set" `HashSet<St>` of expanded states.
    node_map: FxHashMap<St, NodeEntry>,

    stats: SearchStats,
    solution: Option<SearchTreeIndex>,

    _phantom_space: PhantomData<Sp>,
}

impl<'p, E, P, Sp, St, A, C> BestFirstSearch<'p, E, P, Sp, St, A, C>
where
    E: Evaluation<P, Sp, St, A, C>,
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    /// Initialises the Search
    #[must_use]
    pub fn new(problem: &'p P, evaluation: E) -> Self {
        let mut search = Self {
            problem,
            evaluation,
            search_tree: SearchTree::new(),
            frontier: Frontier::new(),
            node_map: FxHashMap::default(),
            stats: SearchStats::default(),
            solution: None,
            _phantom_space: PhantomData,
        };

        let start = problem.start();
        let root = search.search_tree.push_root(start);
        let f = search.evaluation.f(problem, &start, C::zero());
        search.frontier.push(root, f);
        search.node_map.insert(
            start,
            NodeEntry {
                node: root,
                closed: false,
            },
        );
        search.stats.generated = 1;
        search.stats.max_frontier = 1;

        search
    }

    /// Runs the search until the goal is popped or the frontier runs out.
    ///
    /// Calling it again after success returns the same path.
    #[must_use]
    pub fn search(&mut self) -> Option<Path<St, A, C>> {
        if let Some(goal) = self.solution {
            return Some(self.search_tree.path(goal));
        }

        while let Some((node_index, f)) = self.frontier.pop() {
            let state = *self.search_tree[node_index].state();
            let g = self.search_tree[node_index].g();

            let Some(entry) = self.node_map.get_mut(&state) else {
                unreachable!("Popped a state without a node");
            };
            if entry.closed {
                continue;
            }
            entry.closed = true;

            if self.problem.is_goal(&state) {
                self.solution = Some(node_index);
                log::debug!("Goal {state:?} found at g={g}. {}", self.stats);
                return Some(self.search_tree.path(node_index));
            }

            self.stats.expanded += 1;
            log::trace!("Expanding {state:?} (g={g}, f={f})");
            self.expand(node_index, &state, g);
            self.stats.max_frontier = self.stats.max_frontier.max(self.frontier.len());
        }

        log::debug!("Frontier exhausted. {}", self.stats);
        None
    }

    fn expand(&mut self, node_index: SearchTreeIndex, state: &St, g: C) {
        for (s, a, c) in self.problem.expand(state) {
            let new_g = g.saturating_add(&c);

            // Have we seen this State?
            match self.node_map.get(&s).copied() {
                Some(NodeEntry { closed: true, .. }) => {
                    // Yes, and we expanded it already.
                    continue;
                }
                Some(NodeEntry { node, .. }) => {
                    // Yes, but it's still in the frontier. Keep the cheaper path.
                    if new_g < self.search_tree[node].g() {
                        self.search_tree.reach(node, node_index, a, new_g);
                        let f = self.evaluation.f(self.problem, &s, new_g);
                        self.frontier.rerank(node, f);
                        self.stats.replaced += 1;
                    }
                }
                None => {
                    let node = self.search_tree.push_child(node_index, a, s, new_g);
                    let f = self.evaluation.f(self.problem, &s, new_g);
                    self.frontier.push(node, f);
                    self.node_map.insert(s, NodeEntry { node, closed: false });
                    self.stats.generated += 1;
                }
            }
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    pub fn write_memory_stats<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        use size::Size;
        use std::mem::size_of;
        use thousands::Separable;

        writeln!(out, "BestFirstSearch Stats:")?;
        let s = size_of::<SearchTreeNode<St, A, C>>();
        let l = self.search_tree.len();
        writeln!(
            out,
            "  - |Nodes|:   {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;

        let s = size_of::<(St, NodeEntry)>();
        let l = self.node_map.len();
        let c = self.node_map.capacity();
        writeln!(
            out,
            "  - |Index|:  {} ({})",
            l.separate_with_commas(),
            Size::from_bytes(l * s)
        )?;
        writeln!(
            out,
            "  - |Index|*: {} ({})",
            c.separate_with_commas(),
            Size::from_bytes(c * s)
        )?;
        writeln!(
            out,
            "  - |Open|:   {} (max {})",
            self.frontier.len().separate_with_commas(),
            self.stats.max_frontier.separate_with_commas()
        )?;
        writeln!(
            out,
            "  - Expanded nodes: {}",
            self.stats.expanded.separate_with_commas()
        )?;

        Ok(())
    }
}
