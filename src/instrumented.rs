//! A problem wrapper that counts how a search uses it.
use std::cell::Cell;
use std::cell::RefCell;

use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::problem::Problem;
use crate::space::Action;
use crate::space::Cost;
use crate::space::Space;
use crate::space::State;

/// What a search asked of a problem.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProblemCounters {
    /// Calls to `expand`.
    pub expansions: usize,
    /// Distinct states passed to `expand`.
    pub states_expanded: usize,
    /// Successors handed back by `expand`.
    pub successors: usize,
    /// Calls to `is_goal`.
    pub goal_tests: usize,
}

/// Delegates every call to the wrapped problem and keeps count.
///
/// Counters use interior mutability since searches only hold `&P`.
#[derive(Debug)]
pub struct Instrumented<P, St: State> {
    inner: P,
    expansions: Cell<usize>,
    successors: Cell<usize>,
    goal_tests: Cell<usize>,
    expanded: RefCell<FxHashSet<St>>,
}

impl<P, St: State> Instrumented<P, St> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            expansions: Cell::new(0),
            successors: Cell::new(0),
            goal_tests: Cell::new(0),
            expanded: RefCell::new(FxHashSet::default()),
        }
    }

    pub fn counters(&self) -> ProblemCounters {
        ProblemCounters {
            expansions: self.expansions.get(),
            states_expanded: self.expanded.borrow().len(),
            successors: self.successors.get(),
            goal_tests: self.goal_tests.get(),
        }
    }
}

impl<P, Sp, St, A, C> Problem<Sp, St, A, C> for Instrumented<P, St>
where
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    fn space(&self) -> &Sp {
        self.inner.space()
    }
    #[inline(always)]
    fn start(&self) -> St {
        self.inner.start()
    }
    #[inline(always)]
    fn goal(&self) -> St {
        self.inner.goal()
    }

    fn is_goal(&self, s: &St) -> bool {
        self.goal_tests.set(self.goal_tests.get() + 1);
        self.inner.is_goal(s)
    }

    fn expand(&self, s: &St) -> Vec<(St, A, C)> {
        self.expansions.set(self.expansions.get() + 1);
        self.expanded.borrow_mut().insert(*s);
        let successors = self.inner.expand(s);
        self.successors.set(self.successors.get() + successors.len());
        successors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::best_first::AStar;
    use crate::algorithms::best_first::BestFirstSearch;
    use crate::algorithms::best_first::UniformCost;
    use crate::algorithms::depth_first::DepthFirstSearch;
    use crate::problems::heuristics::RouteHeuristic;
    use crate::problems::road_network::tests::upstate_new_york;
    use crate::problems::route::RouteProblem;

    #[test]
    fn counts_agree_with_best_first_stats() {
        let network = upstate_new_york();
        let problem = RouteProblem::new(&network, "Buffalo, NY", "Albany, NY").unwrap();
        let instrumented = Instrumented::new(problem);

        let mut search = BestFirstSearch::new(&instrumented, UniformCost);
        assert!(search.search().is_some());
        let stats = search.stats();
        let counters = instrumented.counters();

        assert_eq!(counters.expansions, stats.expanded);
        assert_eq!(counters.states_expanded, stats.expanded);
        // One goal test per expansion plus the final one.
        assert_eq!(counters.goal_tests, stats.expanded + 1);
        // Every road out of Buffalo, Rochester, Syracuse and Ithaca.
        assert_eq!(counters.successors, 1 + 2 + 3 + 1);
    }

    #[test]
    fn counts_agree_with_depth_first_stats() {
        let network = upstate_new_york();
        let problem = RouteProblem::new(&network, "Ithaca, NY", "Buffalo, NY").unwrap();
        let instrumented = Instrumented::new(problem);

        let mut search = DepthFirstSearch::new(&instrumented);
        assert!(search.search().is_some());

        let counters = instrumented.counters();
        assert_eq!(counters.expansions, search.stats().expanded);
        assert_eq!(counters.states_expanded, search.states_expanded());
    }

    #[test]
    fn delegates() {
        let network = upstate_new_york();
        let problem = RouteProblem::new(&network, "Albany, NY", "Ithaca, NY").unwrap();
        let instrumented = Instrumented::new(problem);
        assert_eq!(Problem::start(&instrumented), problem.start());
        assert_eq!(Problem::goal(&instrumented), problem.goal());
        assert_eq!(instrumented.counters(), ProblemCounters::default());

        let path = BestFirstSearch::new(&instrumented, AStar(RouteHeuristic::GreatCircle))
            .search()
            .unwrap();
        assert_eq!(
            problem.names(&path),
            vec!["Albany, NY", "Syracuse, NY", "Ithaca, NY"]
        );
    }
}
