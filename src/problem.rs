use crate::space::Action;
use crate::space::Cost;
use crate::space::Space;
use crate::space::State;

/// A single-start, single-goal search problem over a `Space`.
pub trait Problem<Sp, St, A, C>: std::fmt::Debug
where
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    fn space(&self) -> &Sp;
    fn start(&self) -> St;
    fn goal(&self) -> St;

    fn is_goal(&self, s: &St) -> bool {
        *s == self.goal()
    }

    /// Successors of `s` with the cost of reaching each of them.
    fn expand(&self, s: &St) -> Vec<(St, A, C)> {
        let space = self.space();
        space
            .neighbours(s)
            .into_iter()
            .map(|(n, a)| (n, a, space.cost(s, &a)))
            .collect()
    }
}

/// An instance-specific heuristic.
///
/// Unlike a plain distance function it sees the whole problem, so it can
/// estimate towards the problem's goal.
pub trait ProblemHeuristic<P, Sp, St, A, C>: std::fmt::Debug
where
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    fn h(&self, _p: &P, _s: &St) -> C {
        C::zero()
    }
}

/// The heuristic that knows nothing.
#[derive(Copy, Clone, Debug, Default)]
pub struct BlindHeuristic;

impl<P, Sp, St, A, C> ProblemHeuristic<P, Sp, St, A, C> for BlindHeuristic
where
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
}
