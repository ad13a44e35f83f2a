//! Distance estimates towards a route's goal.
use derive_more::Display;
use serde::Deserialize;
use serde::Serialize;

use crate::problem::Problem;
use crate::problem::ProblemHeuristic;
use crate::problems::road_network::LocationId;
use crate::problems::road_network::Miles;
use crate::problems::road_network::RoadAction;
use crate::problems::road_network::RoadNetwork;

/// The closed set of estimates the strategies can use.
///
/// | Variant          | Admissible on real roads |
/// |------------------|--------------------------|
/// | `GreatCircle`    | yes                      |
/// | `Planar`         | only at low latitudes    |
/// | `Taxicab`        | no                       |
/// | `MinIncidentRoad`| yes                      |
/// | `WeightedBlend`  | no                       |
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum RouteHeuristic {
    #[default]
    #[display("great-circle")]
    GreatCircle,
    #[display("planar")]
    Planar,
    #[display("taxicab")]
    Taxicab,
    #[display("min-road")]
    #[value(name = "min-road")]
    #[serde(rename = "min-road")]
    MinIncidentRoad,
    #[display("weighted")]
    #[value(name = "weighted")]
    #[serde(rename = "weighted")]
    WeightedBlend,
}

impl RouteHeuristic {
    pub const ALL: [RouteHeuristic; 5] = [
        RouteHeuristic::GreatCircle,
        RouteHeuristic::Planar,
        RouteHeuristic::Taxicab,
        RouteHeuristic::MinIncidentRoad,
        RouteHeuristic::WeightedBlend,
    ];

    #[inline(always)]
    pub fn estimate(&self, network: &RoadNetwork, from: LocationId, to: LocationId) -> Miles {
        match self {
            RouteHeuristic::GreatCircle => network.great_circle(from, to),
            RouteHeuristic::Planar => network.planar(from, to),
            RouteHeuristic::Taxicab => network.taxicab(from, to),
            RouteHeuristic::MinIncidentRoad => network.min_incident_road(from),
            RouteHeuristic::WeightedBlend => network.weighted_blend(from, to),
        }
    }

    /// Estimate between two named locations, zero if either is unknown.
    pub fn between(&self, network: &RoadNetwork, from: &str, to: &str) -> Miles {
        match (network.id(from), network.id(to)) {
            (Some(from), Some(to)) => self.estimate(network, from, to),
            _ => Miles::new(0.0),
        }
    }
}

impl std::str::FromStr for RouteHeuristic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as clap::ValueEnum>::from_str(s, true)
    }
}

impl<P> ProblemHeuristic<P, RoadNetwork, LocationId, RoadAction, Miles> for RouteHeuristic
where
    P: Problem<RoadNetwork, LocationId, RoadAction, Miles>,
{
    #[inline(always)]
    fn h(&self, p: &P, s: &LocationId) -> Miles {
        self.estimate(p.space(), *s, p.goal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problems::road_network::tests::upstate_new_york;

    #[test]
    fn parse() {
        assert_eq!(
            "great-circle".parse::<RouteHeuristic>(),
            Ok(RouteHeuristic::GreatCircle)
        );
        assert_eq!(
            "min-road".parse::<RouteHeuristic>(),
            Ok(RouteHeuristic::MinIncidentRoad)
        );
        assert_eq!(
            "Weighted".parse::<RouteHeuristic>(),
            Ok(RouteHeuristic::WeightedBlend)
        );
        assert!("haversine-ish".parse::<RouteHeuristic>().is_err());
        for h in RouteHeuristic::ALL {
            assert_eq!(h.to_string().parse::<RouteHeuristic>(), Ok(h));
        }
    }

    #[test]
    fn never_negative() {
        let network = upstate_new_york();
        for h in RouteHeuristic::ALL {
            for (a, _) in network.locations() {
                for (b, _) in network.locations() {
                    assert!(h.between(&network, a, b) >= Miles::new(0.0), "{h} {a} {b}");
                }
            }
        }
    }

    #[test]
    fn great_circle_is_below_road_distance() {
        let network = upstate_new_york();
        for (a, _) in network.locations() {
            for (b, miles) in network.neighbours(a) {
                assert!(RouteHeuristic::GreatCircle.between(&network, a, b) <= miles);
            }
        }
    }

    #[test]
    fn unknown_locations_estimate_zero() {
        let network = upstate_new_york();
        for h in RouteHeuristic::ALL {
            assert_eq!(h.between(&network, "Atlantis", "Albany, NY"), Miles::new(0.0));
        }
    }
}
