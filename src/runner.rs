//! Runs strategies on route problems and reports how they did.
use std::time::Instant;

use derive_more::Display;
use serde::Serialize;
use thiserror::Error;

use crate::algorithms::best_first::AStar;
use crate::algorithms::best_first::BestFirstSearch;
use crate::algorithms::best_first::Greedy;
use crate::algorithms::best_first::UniformCost;
use crate::algorithms::depth_first::DepthFirstSearch;
use crate::geo::LatLon;
use crate::instrumented::Instrumented;
use crate::problems::heuristics::RouteHeuristic;
use crate::problems::road_network::LocationId;
use crate::problems::road_network::Miles;
use crate::problems::road_network::RoadAction;
use crate::problems::road_network::RoadNetwork;
use crate::problems::route::ProblemError;
use crate::problems::route::RouteProblem;
use crate::space::Path;

/// A search strategy, with its heuristic when it takes one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    UniformCost,
    AStar(RouteHeuristic),
    Greedy(RouteHeuristic),
    DepthFirst,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StrategyError {
    #[error("Unknown strategy '{0}', expected ucs, astar[:heuristic], greedy[:heuristic] or dfs.")]
    Unknown(String),
    #[error("'{0}' doesn't take a heuristic.")]
    UnexpectedHeuristic(String),
    #[error("Bad heuristic for '{strategy}': {reason}")]
    Heuristic { strategy: String, reason: String },
}

impl Strategy {
    /// The name shown to people.
    ///
    /// ```
    /// use route_search::problems::heuristics::RouteHeuristic;
    /// use route_search::runner::Strategy;
    ///
    /// assert_eq!(Strategy::AStar(RouteHeuristic::GreatCircle).name(), "A*");
    /// assert_eq!(Strategy::AStar(RouteHeuristic::Taxicab).name(), "A* (taxicab)");
    /// ```
    pub fn name(&self) -> String {
        match self {
            Strategy::UniformCost => "UCS".to_string(),
            Strategy::AStar(h) => Self::with_heuristic("A*", *h),
            Strategy::Greedy(h) => Self::with_heuristic("Greedy", *h),
            Strategy::DepthFirst => "DFS".to_string(),
        }
    }

    fn with_heuristic(name: &str, h: RouteHeuristic) -> String {
        if h == RouteHeuristic::default() {
            name.to_string()
        } else {
            format!("{name} ({h})")
        }
    }

    /// The short key results are filed under, parses back into `self`.
    pub fn key(&self) -> String {
        let keyed = |key: &str, h: RouteHeuristic| {
            if h == RouteHeuristic::default() {
                key.to_string()
            } else {
                format!("{key}:{h}")
            }
        };
        match self {
            Strategy::UniformCost => "ucs".to_string(),
            Strategy::AStar(h) => keyed("astar", *h),
            Strategy::Greedy(h) => keyed("greedy", *h),
            Strategy::DepthFirst => "dfs".to_string(),
        }
    }

    /// Whether the strategy always returns a cheapest route on networks
    /// where no road is shorter than the straight line between its ends.
    pub fn is_optimal(&self) -> bool {
        match self {
            Strategy::UniformCost => true,
            Strategy::AStar(h) => matches!(
                h,
                RouteHeuristic::GreatCircle | RouteHeuristic::MinIncidentRoad
            ),
            Strategy::Greedy(_) | Strategy::DepthFirst => false,
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl std::str::FromStr for Strategy {
    type Err = StrategyError;

    /// ```
    /// use route_search::problems::heuristics::RouteHeuristic;
    /// use route_search::runner::Strategy;
    ///
    /// assert_eq!("ucs".parse(), Ok(Strategy::UniformCost));
    /// assert_eq!("astar:planar".parse(), Ok(Strategy::AStar(RouteHeuristic::Planar)));
    /// assert!("bfs".parse::<Strategy>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let (name, suffix) = match lowered.split_once(':') {
            Some((name, h)) => (name, Some(h)),
            None => (lowered.as_str(), None),
        };
        let heuristic = || -> Result<RouteHeuristic, StrategyError> {
            suffix
                .map(|h| {
                    h.parse().map_err(|reason| StrategyError::Heuristic {
                        strategy: s.to_string(),
                        reason,
                    })
                })
                .unwrap_or(Ok(RouteHeuristic::default()))
        };

        match name {
            "ucs" | "uniform-cost" => match suffix {
                None => Ok(Strategy::UniformCost),
                Some(_) => Err(StrategyError::UnexpectedHeuristic(s.to_string())),
            },
            "dfs" | "depth-first" => match suffix {
                None => Ok(Strategy::DepthFirst),
                Some(_) => Err(StrategyError::UnexpectedHeuristic(s.to_string())),
            },
            "astar" | "a*" => Ok(Strategy::AStar(heuristic()?)),
            "greedy" => Ok(Strategy::Greedy(heuristic()?)),
            _ => Err(StrategyError::Unknown(s.to_string())),
        }
    }
}

impl Serialize for Strategy {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The outcome of one strategy on one problem.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchReport {
    pub algorithm: String,
    /// Location names from start to goal, empty without a route.
    pub path: Vec<String>,
    /// Route length in miles rounded to two decimals, 0 without a route.
    pub total_distance: f64,
    /// Distinct states expanded.
    pub nodes_expanded: usize,
    pub execution_time_ms: f64,
    pub success: bool,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

type RoutePath = Path<LocationId, RoadAction, Miles>;

fn search(
    strategy: Strategy,
    problem: &Instrumented<RouteProblem, LocationId>,
) -> Option<RoutePath> {
    match strategy {
        Strategy::UniformCost => BestFirstSearch::new(problem, UniformCost).search(),
        Strategy::AStar(h) => BestFirstSearch::new(problem, AStar(h)).search(),
        Strategy::Greedy(h) => BestFirstSearch::new(problem, Greedy(h)).search(),
        Strategy::DepthFirst => DepthFirstSearch::new(problem).search(),
    }
}

/// Runs one strategy, timing the whole search.
pub fn run(strategy: Strategy, problem: &RouteProblem) -> SearchReport {
    let instrumented = Instrumented::new(*problem);

    let start = Instant::now();
    let path = search(strategy, &instrumented);
    let elapsed = start.elapsed();

    let counters = instrumented.counters();
    let execution_time_ms = round2(elapsed.as_secs_f64() * 1e3);
    let report = match path {
        Some(path) => SearchReport {
            algorithm: strategy.name(),
            path: problem.names(&path),
            total_distance: round2(path.cost.get()),
            nodes_expanded: counters.states_expanded,
            execution_time_ms,
            success: true,
        },
        None => SearchReport {
            algorithm: strategy.name(),
            path: vec![],
            total_distance: 0.0,
            nodes_expanded: counters.states_expanded,
            execution_time_ms,
            success: false,
        },
    };

    log::info!(
        "{problem} {}: success={} miles={} expanded={} ({} expand calls, {} goal tests) in {}ms",
        report.algorithm,
        report.success,
        report.total_distance,
        report.nodes_expanded,
        counters.expansions,
        counters.goal_tests,
        report.execution_time_ms,
    );
    report
}

/// Runs one strategy again and writes how much memory its search used.
pub fn write_memory_stats<W: std::io::Write>(
    strategy: Strategy,
    problem: &RouteProblem,
    mut out: W,
) -> std::io::Result<()> {
    writeln!(out, "{} on {problem}", strategy.name())?;
    match strategy {
        Strategy::UniformCost => {
            let mut search = BestFirstSearch::new(problem, UniformCost);
            let _ = search.search();
            search.write_memory_stats(out)
        }
        Strategy::AStar(h) => {
            let mut search = BestFirstSearch::new(problem, AStar(h));
            let _ = search.search();
            search.write_memory_stats(out)
        }
        Strategy::Greedy(h) => {
            let mut search = BestFirstSearch::new(problem, Greedy(h));
            let _ = search.search();
            search.write_memory_stats(out)
        }
        Strategy::DepthFirst => {
            let mut search = DepthFirstSearch::new(problem);
            let _ = search.search();
            writeln!(out, "DepthFirstSearch Stats:")?;
            writeln!(out, "  - {}", search.stats())?;
            writeln!(out, "  - Distinct expanded states: {}", search.states_expanded())
        }
    }
}

/// One strategy's report, with coordinates to draw its route.
#[derive(Clone, Debug, Display, Serialize)]
#[display("{strategy}: {}", report.algorithm)]
pub struct StrategyResult {
    pub strategy: Strategy,
    #[serde(flatten)]
    pub report: SearchReport,
    /// Coordinates along the route, skipping locations without any.
    pub path_coordinates: Vec<LatLon>,
}

/// Several strategies run on the same problem.
#[derive(Clone, Debug, Serialize)]
pub struct Comparison {
    pub start: String,
    pub goal: String,
    pub start_coordinates: Option<LatLon>,
    pub goal_coordinates: Option<LatLon>,
    pub results: Vec<StrategyResult>,
}

impl Comparison {
    /// UCS, A*, Greedy and DFS with the great-circle heuristic.
    ///
    /// DFS only avoids states on its current branch, so when the goal is
    /// unreachable it walks every simple path out of the start. On large
    /// connected networks that takes exponential time.
    pub fn default_lineup() -> Vec<Strategy> {
        vec![
            Strategy::UniformCost,
            Strategy::AStar(RouteHeuristic::GreatCircle),
            Strategy::Greedy(RouteHeuristic::GreatCircle),
            Strategy::DepthFirst,
        ]
    }

    pub fn get(&self, strategy: Strategy) -> Option<&SearchReport> {
        self.results
            .iter()
            .find(|r| r.strategy == strategy)
            .map(|r| &r.report)
    }

    /// Cheapest route among the strategies that are optimal by construction.
    pub fn optimal_distance(&self) -> Option<f64> {
        self.results
            .iter()
            .filter(|r| r.strategy.is_optimal() && r.report.success)
            .map(|r| r.report.total_distance)
            .min_by(f64::total_cmp)
    }

    /// Percentage of `baseline`'s expansions that `other` saved.
    pub fn expansion_savings(&self, baseline: Strategy, other: Strategy) -> Option<f64> {
        let baseline = self.get(baseline).filter(|r| r.success)?;
        let other = self.get(other).filter(|r| r.success)?;
        if baseline.nodes_expanded == 0 {
            return None;
        }
        let b = baseline.nodes_expanded as f64;
        Some((b - other.nodes_expanded as f64) / b * 100.0)
    }

    /// How much longer, in percent, a strategy's route is than the optimum.
    pub fn excess_over_optimal(&self, strategy: Strategy) -> Option<f64> {
        let report = self.get(strategy).filter(|r| r.success)?;
        let optimal = self.optimal_distance().filter(|o| *o > 0.0)?;
        Some((report.total_distance - optimal) / optimal * 100.0)
    }
}

/// Runs every strategy, one after the other, on the same network.
pub fn compare(
    network: &RoadNetwork,
    start: &str,
    goal: &str,
    strategies: &[Strategy],
) -> Result<Comparison, ProblemError> {
    let problem = RouteProblem::new(network, start, goal)?;

    let results = strategies
        .iter()
        .map(|&strategy| {
            let report = run(strategy, &problem);
            let path_coordinates = report
                .path
                .iter()
                .filter_map(|name| network.coordinates(name))
                .collect();
            StrategyResult {
                strategy,
                report,
                path_coordinates,
            }
        })
        .collect();

    Ok(Comparison {
        start: start.to_string(),
        goal: goal.to_string(),
        start_coordinates: network.coordinates(start),
        goal_coordinates: network.coordinates(goal),
        results,
    })
}
