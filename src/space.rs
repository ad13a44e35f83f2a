use std::fmt::Debug;
use std::hash::Hash;

pub use crate::cost::Cost;

pub trait Action: Copy + Clone + Debug + PartialEq + Eq {}
pub trait State: Copy + Clone + Debug + PartialEq + Eq + Hash {}

/// A sequence of states joined by actions, with its accumulated cost.
///
/// `states` has one more element than `actions` unless the path is empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    pub states: Vec<St>,
    pub actions: Vec<A>,
    pub cost: C,
}

impl<St, A, C> Path<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    pub fn new_from_start(start: St) -> Self {
        Self {
            states: vec![start],
            actions: vec![],
            cost: C::zero(),
        }
    }

    #[inline(always)]
    pub fn empty() -> Self {
        Self {
            states: vec![],
            actions: vec![],
            cost: C::zero(),
        }
    }

    #[inline(always)]
    pub fn start(&self) -> Option<St> {
        self.states.first().copied()
    }
    #[inline(always)]
    pub fn end(&self) -> Option<St> {
        self.states.last().copied()
    }

    /// No states at all. A single-state path (start == goal) is not empty.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Number of actions.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Runs sanity checks
    #[inline(always)]
    pub fn seems_valid(&self) -> bool {
        if self.states.is_empty() {
            return self.actions.is_empty() && self.cost == C::zero();
        }
        self.states.len() == self.actions.len() + 1 && self.cost.valid()
    }

    #[inline(always)]
    pub fn append(&mut self, step: (A, St), c: C) {
        let (a, s) = step;
        self.actions.push(a);
        self.states.push(s);
        self.cost = self.cost.saturating_add(&c);
    }

    /// Reverses the Path.
    ///
    /// Useful when naturally reconstructing paths in reverse.
    pub fn reverse(&mut self) {
        self.states.reverse();
        self.actions.reverse();
    }
}

impl<St, A, C> std::fmt::Display for Path<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => {
                write!(
                    f,
                    "Path({}, {:?}:{:?}:{:?})",
                    self.cost,
                    start,
                    self.actions.iter().take(20).collect::<Vec<_>>(),
                    end
                )
            }
            _ => write!(f, "Path()"),
        }
    }
}

pub trait Space<St, A, C>: std::fmt::Debug
where
    St: State,
    A: Action,
    C: Cost,
{
    fn apply(&self, s: &St, a: &A) -> Option<St>;

    fn cost(&self, _s: &St, _a: &A) -> C {
        C::one()
    }
    /// Expands a State
    fn neighbours(&self, s: &St) -> Vec<(St, A)>;
    /// Verify is a State is valid.
    fn valid(&self, s: &St) -> bool;

    fn valid_path(&self, p: &Path<St, A, C>) -> bool {
        let Some(start) = p.start() else {
            // Empty paths are fine
            return p.actions.is_empty();
        };
        if p.states.len() != p.actions.len() + 1 {
            return false;
        }

        let mut state: St = start;
        let mut cost = C::zero();
        for (a, expected) in p.actions.iter().zip(p.states.iter().skip(1)) {
            match self.apply(&state, a) {
                Some(new_state) if new_state == *expected => {
                    cost = cost.saturating_add(&self.cost(&state, a));
                    state = new_state;
                }
                _ => return false,
            }
        }
        cost == p.cost
    }

    fn size(&self) -> Option<usize> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    struct Tile(u8);
    impl State for Tile {}

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    struct Step;
    impl Action for Step {}

    #[test]
    fn reconstruct_in_reverse() {
        let mut path = Path::<Tile, Step, u32>::new_from_start(Tile(3));
        path.append((Step, Tile(2)), 1);
        path.append((Step, Tile(1)), 2);
        path.reverse();

        assert_eq!(path.start(), Some(Tile(1)));
        assert_eq!(path.end(), Some(Tile(3)));
        assert_eq!(path.cost, 3);
        assert_eq!(path.len(), 2);
        assert!(path.seems_valid());
    }

    #[test]
    fn empty_and_trivial() {
        let empty = Path::<Tile, Step, u32>::empty();
        assert!(empty.is_empty());
        assert!(empty.seems_valid());
        assert_eq!(empty.to_string(), "Path()");

        let trivial = Path::<Tile, Step, u32>::new_from_start(Tile(0));
        assert!(!trivial.is_empty());
        assert_eq!(trivial.len(), 0);
        assert_eq!(trivial.start(), trivial.end());
    }
}
