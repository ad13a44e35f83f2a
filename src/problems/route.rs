use derive_more::Display;
use thiserror::Error;

use crate::problem::Problem;
use crate::problems::road_network::LocationId;
use crate::problems::road_network::Miles;
use crate::problems::road_network::RoadAction;
use crate::problems::road_network::RoadNetwork;
use crate::space::Path;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Endpoint {
    #[display("start")]
    Start,
    #[display("goal")]
    Goal,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProblemError {
    #[error("Unknown {role} location '{name}'.")]
    UnknownLocation { role: Endpoint, name: String },
}

/// Find a route from `start` to `goal` on a borrowed network.
///
/// The network can't change while a problem borrows it.
#[derive(Copy, Clone, Display)]
#[display("Route({} -> {})", network.name(*start), network.name(*goal))]
pub struct RouteProblem<'g> {
    network: &'g RoadNetwork,
    start: LocationId,
    goal: LocationId,
}

impl<'g> RouteProblem<'g> {
    pub fn new(network: &'g RoadNetwork, start: &str, goal: &str) -> Result<Self, ProblemError> {
        let lookup = |name: &str, role| {
            network
                .id(name)
                .ok_or_else(|| ProblemError::UnknownLocation {
                    role,
                    name: name.to_string(),
                })
        };
        Ok(Self {
            network,
            start: lookup(start, Endpoint::Start)?,
            goal: lookup(goal, Endpoint::Goal)?,
        })
    }

    /// A random instance, start and goal may coincide.
    pub fn randomize<R: rand::Rng>(network: &'g RoadNetwork, r: &mut R) -> Option<Self> {
        Some(Self {
            network,
            start: network.random_location(r)?,
            goal: network.random_location(r)?,
        })
    }

    pub fn network(&self) -> &'g RoadNetwork {
        self.network
    }

    /// Location names along a path, start to goal.
    pub fn names(&self, path: &Path<LocationId, RoadAction, Miles>) -> Vec<String> {
        path.states
            .iter()
            .map(|s| self.network.name(*s).to_string())
            .collect()
    }
}

impl Problem<RoadNetwork, LocationId, RoadAction, Miles> for RouteProblem<'_> {
    #[inline(always)]
    fn space(&self) -> &RoadNetwork {
        self.network
    }
    #[inline(always)]
    fn start(&self) -> LocationId {
        self.start
    }
    #[inline(always)]
    fn goal(&self) -> LocationId {
        self.goal
    }
}

impl std::fmt::Debug for RouteProblem<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "RouteProblem({:?} -> {:?} on {:?})",
            self.network.name(self.start),
            self.network.name(self.goal),
            self.network
        )
    }
}
