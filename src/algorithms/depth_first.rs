//! Depth-first search.
//!
//! Tree search over an explicit stack. A successor is skipped when its state
//! is already on the branch leading to it, which is enough to terminate on
//! finite graphs without keeping a global closed set. The result need not be
//! optimal.

use std::marker::PhantomData;

use rustc_hash::FxHashSet;

use crate::algorithms::SearchStats;
use crate::problem::Problem;
use crate::search::SearchTree;
use crate::search::SearchTreeIndex;
use crate::space::Action;
use crate::space::Cost;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

#[derive(Debug)]
pub struct DepthFirstSearch<'p, P, Sp, St, A, C>
where
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    problem: &'p P,
    search_tree: SearchTree<St, A, C>,
    /// Nodes generated but not yet expanded. Last in, first out.
    stack: Vec<SearchTreeIndex>,
    /// States expanded at least once. Only counted, never used for pruning.
    expanded_states: FxHashSet<St>,

    stats: SearchStats,
    solution: Option<SearchTreeIndex>,

    _phantom_space: PhantomData<Sp>,
}

impl<'p, P, Sp, St, A, C> DepthFirstSearch<'p, P, Sp, St, A, C>
where
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    #[must_use]
    pub fn new(problem: &'p P) -> Self {
        let mut search_tree = SearchTree::new();
        let root = search_tree.push_root(problem.start());
        Self {
            problem,
            search_tree,
            stack: vec![root],
            expanded_states: FxHashSet::default(),
            stats: SearchStats {
                generated: 1,
                max_frontier: 1,
                ..SearchStats::default()
            },
            solution: None,
            _phantom_space: PhantomData,
        }
    }

    /// Runs until the goal is popped or the stack runs out.
    ///
    /// Successors are pushed in the order the space lists them, so the last
    /// one listed is explored first.
    #[must_use]
    pub fn search(&mut self) -> Option<Path<St, A, C>> {
        if let Some(goal) = self.solution {
            return Some(self.search_tree.path(goal));
        }

        while let Some(node_index) = self.stack.pop() {
            let state = *self.search_tree[node_index].state();
            let g = self.search_tree[node_index].g();

            if self.problem.is_goal(&state) {
                self.solution = Some(node_index);
                log::debug!(
                    "Goal {state:?} found at g={g}, depth {}. {}",
                    self.search_tree[node_index].depth(),
                    self.stats
                );
                return Some(self.search_tree.path(node_index));
            }

            self.stats.expanded += 1;
            self.expanded_states.insert(state);
            log::trace!("Expanding {state:?} (g={g})");

            for (s, a, c) in self.problem.expand(&state) {
                if self.search_tree.on_branch(node_index, &s) {
                    continue;
                }
                let child = self
                    .search_tree
                    .push_child(node_index, a, s, g.saturating_add(&c));
                self.stack.push(child);
                self.stats.generated += 1;
            }
            self.stats.max_frontier = self.stats.max_frontier.max(self.stack.len());
        }

        log::debug!("Stack exhausted. {}", self.stats);
        None
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Distinct states expanded, at most the number of reachable states.
    pub fn states_expanded(&self) -> usize {
        self.expanded_states.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LatLon;
    use crate::problems::road_network::Miles;
    use crate::problems::road_network::RoadNetwork;
    use crate::problems::road_network::tests::upstate_new_york;
    use crate::problems::route::RouteProblem;

    #[test]
    fn finds_a_valid_route() {
        let network = upstate_new_york();
        let problem = RouteProblem::new(&network, "Buffalo, NY", "Albany, NY").unwrap();
        let mut search = DepthFirstSearch::new(&problem);
        let path = search.search().unwrap();

        assert_eq!(path.start(), network.id("Buffalo, NY"));
        assert_eq!(path.end(), network.id("Albany, NY"));
        assert!(network.valid_path(&path));
        assert!(path.cost >= Miles::new(340.0));
        assert!(search.states_expanded() <= network.len());
    }

    #[test]
    fn last_connected_road_first() {
        let mut network = RoadNetwork::new();
        network.add_location("s", LatLon::new(0.0, 1.0)).unwrap();
        network.add_location("m", LatLon::new(0.0, 0.5)).unwrap();
        network.add_location("t", LatLon::new(0.0, 0.1)).unwrap();
        network.add_location("g", LatLon::new(0.0, 0.0)).unwrap();
        network.connect("s", "m", 40.0).unwrap();
        network.connect("s", "t", 70.0).unwrap();
        network.connect("m", "g", 40.0).unwrap();
        network.connect("t", "g", 150.0).unwrap();

        let problem = RouteProblem::new(&network, "s", "g").unwrap();
        let path = DepthFirstSearch::new(&problem).search().unwrap();
        assert_eq!(problem.names(&path), vec!["s", "t", "g"]);
        assert_eq!(path.cost, Miles::new(220.0));
    }

    #[test]
    fn terminates_on_cycles_without_a_route() {
        // A triangle plus an unreachable goal.
        let mut network = RoadNetwork::new();
        network.connect("a", "b", 1.0).unwrap();
        network.connect("b", "c", 1.0).unwrap();
        network.connect("c", "a", 1.0).unwrap();
        network.connect("x", "y", 1.0).unwrap();

        let problem = RouteProblem::new(&network, "a", "y").unwrap();
        let mut search = DepthFirstSearch::new(&problem);
        assert_eq!(search.search(), None);
        assert_eq!(search.states_expanded(), 3);
        // a, then both simple paths through b and c.
        assert_eq!(search.stats().expanded, 5);
    }

    #[test]
    fn start_is_goal() {
        let network = upstate_new_york();
        let problem = RouteProblem::new(&network, "Albany, NY", "Albany, NY").unwrap();
        let mut search = DepthFirstSearch::new(&problem);
        let path = search.search().unwrap();
        assert_eq!(path.states.len(), 1);
        assert_eq!(path.cost, Miles::new(0.0));
        assert_eq!(search.search(), Some(path));
    }
}
