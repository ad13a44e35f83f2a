//! A road network between named locations.
//!
//! Locations are interned into dense `LocationId`s so search states stay
//! `Copy`; names only show up again when a path is reported.
use derive_more::Display;
use rustc_hash::FxHashMap;
use thiserror::Error;
use thousands::Separable;

use crate::float_cost::FloatCost;
use crate::geo;
use crate::geo::LatLon;
use crate::space::Action;
use crate::space::Space;
use crate::space::State;

/// Distance along roads, or an estimate of it.
pub type Miles = FloatCost<f64>;

/// Weight of the great-circle estimate in the blended heuristic.
pub const BLEND_ALPHA: f64 = 0.7;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("Location({_0})")]
pub struct LocationId(u32);

impl LocationId {
    #[inline(always)]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}
impl State for LocationId {}

/// Drive along the road to `to`.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
#[display("Drive({to}, {miles}mi)")]
pub struct RoadAction {
    pub to: LocationId,
    pub miles: Miles,
}
impl Action for RoadAction {}

#[derive(Debug, Error, PartialEq)]
pub enum GraphError {
    #[error("Distance between '{a}' and '{b}' must be a positive number of miles, got {distance}.")]
    InvalidDistance { a: String, b: String, distance: f64 },
    #[error("'{0}' can't be connected to itself.")]
    SelfLoop(String),
    #[error("Invalid coordinates {coordinates} for '{name}'.")]
    InvalidCoordinates { name: String, coordinates: LatLon },
    #[error("'{name}' is already located at {existing}, refusing to move it to {requested}.")]
    ConflictingCoordinates {
        name: String,
        existing: LatLon,
        requested: LatLon,
    },
}

/// The Graph Store.
///
/// Roads are undirected: `connect` always writes both directions, so
/// `distance(a, b) == distance(b, a)` holds for every pair.
#[derive(Clone, Default)]
pub struct RoadNetwork {
    names: Vec<String>,
    ids: FxHashMap<String, LocationId>,
    coordinates: Vec<Option<LatLon>>,
    /// Adjacency lists in the order neighbours were first connected.
    roads: Vec<Vec<(LocationId, Miles)>>,
    num_roads: usize,
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of locations.
    pub fn len(&self) -> usize {
        self.names.len()
    }
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
    /// Number of undirected roads.
    pub fn num_roads(&self) -> usize {
        self.num_roads
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ids.contains_key(name)
    }
    pub fn id(&self, name: &str) -> Option<LocationId> {
        self.ids.get(name).copied()
    }
    /// # Panics
    ///
    /// If `id` was not handed out by this network.
    pub fn name(&self, id: LocationId) -> &str {
        &self.names[id.index()]
    }

    /// All locations in creation order.
    pub fn locations(&self) -> impl Iterator<Item = (&str, Option<LatLon>)> {
        self.names
            .iter()
            .zip(self.coordinates.iter())
            .map(|(name, c)| (name.as_str(), *c))
    }

    /// Registers a location by name only, keeping any coordinates it has.
    pub fn register(&mut self, name: &str) -> LocationId {
        self.intern(name)
    }

    fn intern(&mut self, name: &str) -> LocationId {
        if let Some(id) = self.ids.get(name) {
            return *id;
        }
        let id = LocationId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        self.coordinates.push(None);
        self.roads.push(Vec::new());
        id
    }

    /// Registers a location, or gives coordinates to one only known by name.
    pub fn add_location(&mut self, name: &str, at: LatLon) -> Result<LocationId, GraphError> {
        if !at.is_valid() {
            return Err(GraphError::InvalidCoordinates {
                name: name.to_string(),
                coordinates: at,
            });
        }
        if let Some(id) = self.id(name)
            && let Some(existing) = self.coordinates[id.index()]
        {
            if existing != at {
                return Err(GraphError::ConflictingCoordinates {
                    name: name.to_string(),
                    existing,
                    requested: at,
                });
            }
            return Ok(id);
        }

        let id = self.intern(name);
        self.coordinates[id.index()] = Some(at);
        Ok(id)
    }

    /// Adds (or re-weights) the road between `a` and `b`.
    ///
    /// Unknown names are registered without coordinates.
    pub fn connect(&mut self, a: &str, b: &str, distance: f64) -> Result<(), GraphError> {
        if a == b {
            return Err(GraphError::SelfLoop(a.to_string()));
        }
        if !(distance.is_finite() && distance > 0.0) {
            return Err(GraphError::InvalidDistance {
                a: a.to_string(),
                b: b.to_string(),
                distance,
            });
        }

        let a = self.intern(a);
        let b = self.intern(b);
        let miles = Miles::new(distance);
        let new_a = Self::upsert(&mut self.roads[a.index()], b, miles);
        let new_b = Self::upsert(&mut self.roads[b.index()], a, miles);
        debug_assert_eq!(new_a, new_b, "Roads must be symmetric");
        if new_a {
            self.num_roads += 1;
        }
        Ok(())
    }

    /// Returns whether the road is new.
    fn upsert(roads: &mut Vec<(LocationId, Miles)>, to: LocationId, miles: Miles) -> bool {
        match roads.iter_mut().find(|(n, _)| *n == to) {
            Some(road) => {
                road.1 = miles;
                false
            }
            None => {
                roads.push((to, miles));
                true
            }
        }
    }

    /// Neighbours and road lengths. Empty for unknown locations.
    pub fn neighbours(&self, name: &str) -> Vec<(&str, Miles)> {
        match self.id(name) {
            Some(id) => self
                .roads(id)
                .iter()
                .map(|(n, miles)| (self.name(*n), *miles))
                .collect(),
            None => vec![],
        }
    }

    #[inline(always)]
    pub fn roads(&self, id: LocationId) -> &[(LocationId, Miles)] {
        self.roads
            .get(id.index())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Length of the direct road between `a` and `b`, if any.
    pub fn distance(&self, a: &str, b: &str) -> Option<Miles> {
        self.road_between(self.id(a)?, self.id(b)?)
    }

    pub fn road_between(&self, a: LocationId, b: LocationId) -> Option<Miles> {
        self.roads(a)
            .iter()
            .find(|(n, _)| *n == b)
            .map(|(_, miles)| *miles)
    }

    pub fn coordinates(&self, name: &str) -> Option<LatLon> {
        self.coordinates_of(self.id(name)?)
    }

    #[inline(always)]
    pub fn coordinates_of(&self, id: LocationId) -> Option<LatLon> {
        self.coordinates.get(id.index()).copied().flatten()
    }

    pub fn random_location<R: rand::Rng>(&self, r: &mut R) -> Option<LocationId> {
        if self.is_empty() {
            return None;
        }
        Some(LocationId(r.random_range(0..self.names.len() as u32)))
    }

    // Distance estimates
    // ------------------
    // All of them fall back to zero when coordinates are missing.

    fn estimate(&self, from: LocationId, to: LocationId, f: fn(LatLon, LatLon) -> f64) -> Miles {
        match (self.coordinates_of(from), self.coordinates_of(to)) {
            (Some(a), Some(b)) => Miles::new(f(a, b)),
            _ => Miles::new(0.0),
        }
    }

    pub fn great_circle(&self, from: LocationId, to: LocationId) -> Miles {
        self.estimate(from, to, geo::great_circle_miles)
    }
    pub fn planar(&self, from: LocationId, to: LocationId) -> Miles {
        self.estimate(from, to, geo::planar_miles)
    }
    pub fn taxicab(&self, from: LocationId, to: LocationId) -> Miles {
        self.estimate(from, to, geo::taxicab_miles)
    }

    /// The shortest road leaving `from`, zero for isolated locations.
    pub fn min_incident_road(&self, from: LocationId) -> Miles {
        self.roads(from)
            .iter()
            .map(|(_, miles)| *miles)
            .min()
            .unwrap_or(Miles::new(0.0))
    }

    /// `α·great_circle + (1 − α)·min_incident_road`.
    ///
    /// Not admissible: it is positive at the goal itself, and any graph with
    /// roads shorter than the straight line makes it overestimate.
    pub fn weighted_blend(&self, from: LocationId, to: LocationId) -> Miles {
        let gc = self.great_circle(from, to).get();
        let edge = self.min_incident_road(from).get();
        Miles::new(BLEND_ALPHA * gc + (1.0 - BLEND_ALPHA) * edge)
    }
}

impl Space<LocationId, RoadAction, Miles> for RoadNetwork {
    fn apply(&self, s: &LocationId, a: &RoadAction) -> Option<LocationId> {
        self.road_between(*s, a.to)
            .filter(|miles| *miles == a.miles)
            .map(|_| a.to)
    }
    #[inline(always)]
    fn cost(&self, _s: &LocationId, a: &RoadAction) -> Miles {
        a.miles
    }
    fn neighbours(&self, s: &LocationId) -> Vec<(LocationId, RoadAction)> {
        self.roads(*s)
            .iter()
            .map(|&(to, miles)| (to, RoadAction { to, miles }))
            .collect()
    }
    fn valid(&self, s: &LocationId) -> bool {
        s.index() < self.len()
    }
    fn size(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl std::fmt::Display for RoadNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "RoadNetwork({} locations, {} roads)",
            self.len().separate_with_commas(),
            self.num_roads.separate_with_commas(),
        )
    }
}

impl std::fmt::Debug for RoadNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}
