//! Grows a road network between two places from a places service.
//!
//! Localities are sampled along the great circle between the endpoints, then
//! every location is connected to the next few along the chain with driving
//! distances. The service is abstracted as a `PlacesProvider` so tests (or a
//! cache) can stand in for the real thing.
use thiserror::Error;

use crate::geo;
use crate::geo::LatLon;
use crate::problems::road_network::GraphError;
use crate::problems::road_network::RoadNetwork;

pub const METERS_PER_MILE: f64 = 1609.34;

/// A populated place as reported by a places service.
#[derive(Clone, Debug, PartialEq)]
pub struct Locality {
    pub name: String,
    /// State or province short code, like `NY` or `ON`.
    pub region: Option<String>,
    /// ISO country code, like `US`.
    pub country: Option<String>,
    pub location: LatLon,
}

impl Locality {
    /// `"City, ST"`, with a `" (CA)"` suffix for Canadian places.
    ///
    /// ```
    /// use route_search::geo::LatLon;
    /// use route_search::network_builder::Locality;
    ///
    /// let toronto = Locality {
    ///     name: "Toronto".to_string(),
    ///     region: Some("ON".to_string()),
    ///     country: Some("CA".to_string()),
    ///     location: LatLon::new(43.6532, -79.3832),
    /// };
    /// assert_eq!(toronto.display_name(), "Toronto, ON (CA)");
    /// ```
    pub fn display_name(&self) -> String {
        match (self.region.as_deref(), self.country.as_deref()) {
            (Some(region), Some("CA")) => format!("{}, {region} (CA)", self.name),
            (Some(region), _) => format!("{}, {region}", self.name),
            (None, Some(country)) => format!("{}, {country}", self.name),
            (None, None) => self.name.clone(),
        }
    }
}

/// A geocoding, places and distance service.
pub trait PlacesProvider {
    type Error: std::error::Error + 'static;

    /// Coordinates of a named place, `None` when it isn't known.
    fn geocode(&self, name: &str) -> Result<Option<LatLon>, Self::Error>;

    /// Localities around `at`, best match first.
    fn nearby_localities(&self, at: LatLon, radius_m: f64) -> Result<Vec<Locality>, Self::Error>;

    /// Driving distance in meters, `None` when there is no road route.
    fn driving_distance(&self, from: &str, to: &str) -> Result<Option<f64>, Self::Error>;
}

#[derive(Debug, Error)]
pub enum NetworkError<E>
where
    E: std::error::Error + 'static,
{
    #[error("Couldn't locate '{0}'.")]
    Geocode(String),
    #[error("Places provider failed: {0}")]
    Provider(#[source] E),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// What a `build` added.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BuiltNetwork {
    /// Start, intermediates and goal, in route order.
    pub locations: Vec<String>,
    pub intermediates: Vec<String>,
    pub roads_added: usize,
}

#[derive(Clone, Debug)]
pub struct NetworkBuilder {
    intermediates: usize,
    radius_m: f64,
    candidates_per_sample: usize,
    fan_out: usize,
    countries: Vec<String>,
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self {
            intermediates: 12,
            radius_m: 80_000.0,
            candidates_per_sample: 5,
            fan_out: 3,
            countries: vec!["US".to_string(), "CA".to_string()],
        }
    }
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many points along the route to look for localities around.
    pub fn with_intermediates(mut self, n: usize) -> Self {
        self.intermediates = n;
        self
    }
    pub fn with_radius_m(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }
    pub fn with_candidates_per_sample(mut self, n: usize) -> Self {
        self.candidates_per_sample = n;
        self
    }
    /// How many of the following locations each one gets connected to.
    pub fn with_fan_out(mut self, n: usize) -> Self {
        self.fan_out = n;
        self
    }
    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = countries.into_iter().map(Into::into).collect();
        self
    }

    /// Adds locations and roads between `start` and `goal` to `network`.
    ///
    /// Only failing to locate the endpoints is fatal, any other provider or
    /// graph failure is logged and skipped. Nothing is retried.
    pub fn build<P: PlacesProvider>(
        &self,
        network: &mut RoadNetwork,
        provider: &P,
        start: &str,
        goal: &str,
    ) -> Result<BuiltNetwork, NetworkError<P::Error>> {
        log::info!(
            "Building network {start} -> {goal} with {} samples",
            self.intermediates
        );
        let from = Self::locate(network, provider, start)?;
        let to = Self::locate(network, provider, goal)?;

        let intermediates = self.find_intermediates(network, provider, (start, from), (goal, to));

        let mut locations = Vec::with_capacity(intermediates.len() + 2);
        locations.push(start.to_string());
        locations.extend(intermediates.iter().cloned());
        locations.push(goal.to_string());

        let roads_added = self.connect_chain(network, provider, &locations);
        log::info!(
            "Built {network}: {} intermediates, {roads_added} new roads",
            intermediates.len()
        );

        Ok(BuiltNetwork {
            locations,
            intermediates,
            roads_added,
        })
    }

    fn locate<P: PlacesProvider>(
        network: &mut RoadNetwork,
        provider: &P,
        name: &str,
    ) -> Result<LatLon, NetworkError<P::Error>> {
        if let Some(at) = network.coordinates(name) {
            return Ok(at);
        }
        let at = provider
            .geocode(name)
            .map_err(NetworkError::Provider)?
            .ok_or_else(|| NetworkError::Geocode(name.to_string()))?;
        network.add_location(name, at)?;
        Ok(at)
    }

    /// Degrees of slack around the endpoints' bounding box.
    fn tolerance(from: LatLon, to: LatLon) -> f64 {
        if (to.lat - from.lat).abs() > 2.0 { 3.0 } else { 1.0 }
    }

    fn find_intermediates<P: PlacesProvider>(
        &self,
        network: &mut RoadNetwork,
        provider: &P,
        (start, from): (&str, LatLon),
        (goal, to): (&str, LatLon),
    ) -> Vec<String> {
        let city = |name: &str| name.split(',').next().unwrap_or(name).trim().to_lowercase();
        let endpoints = [city(start), city(goal)];

        let tolerance = Self::tolerance(from, to);
        let in_box = |at: LatLon| {
            let (lat_min, lat_max) = (from.lat.min(to.lat), from.lat.max(to.lat));
            let (lon_min, lon_max) = (from.lon.min(to.lon), from.lon.max(to.lon));
            (lat_min - tolerance..=lat_max + tolerance).contains(&at.lat)
                && (lon_min - tolerance..=lon_max + tolerance).contains(&at.lon)
        };

        let mut intermediates: Vec<String> = vec![];
        for i in 1..=self.intermediates {
            let t = i as f64 / (self.intermediates + 1) as f64;
            let point = geo::intermediate_point(from, to, t);

            let candidates = match provider.nearby_localities(point, self.radius_m) {
                Ok(candidates) => candidates,
                Err(e) => {
                    log::warn!("No localities around sample {i} {point}: {e}");
                    continue;
                }
            };

            for locality in candidates.iter().take(self.candidates_per_sample) {
                if endpoints.contains(&locality.name.trim().to_lowercase()) {
                    continue;
                }
                let allowed = locality
                    .country
                    .as_ref()
                    .is_some_and(|c| self.countries.contains(c));
                if !allowed {
                    log::debug!("Skipping {}, country {:?}", locality.name, locality.country);
                    continue;
                }
                let name = locality.display_name();
                if intermediates.contains(&name) {
                    continue;
                }
                if !in_box(locality.location) {
                    log::debug!("Skipping {name} at {}, off route", locality.location);
                    continue;
                }
                if let Err(e) = network.add_location(&name, locality.location) {
                    log::warn!("Skipping {name}: {e}");
                    continue;
                }
                log::debug!("Sample {i} {point}: {name}");
                intermediates.push(name);
                break;
            }
        }
        intermediates
    }

    fn connect_chain<P: PlacesProvider>(
        &self,
        network: &mut RoadNetwork,
        provider: &P,
        locations: &[String],
    ) -> usize {
        let mut roads_added = 0;
        for (i, a) in locations.iter().enumerate() {
            for b in locations.iter().skip(i + 1).take(self.fan_out) {
                if a == b || network.distance(a, b).is_some() {
                    continue;
                }
                let meters = match provider.driving_distance(a, b) {
                    Ok(Some(meters)) => meters,
                    Ok(None) => {
                        log::warn!("No driving route {a} <-> {b}");
                        continue;
                    }
                    Err(e) => {
                        log::warn!("Driving distance {a} <-> {b} failed: {e}");
                        continue;
                    }
                };
                match network.connect(a, b, meters / METERS_PER_MILE) {
                    Ok(()) => roads_added += 1,
                    Err(e) => log::warn!("Skipping road {a} <-> {b}: {e}"),
                }
            }
        }
        roads_added
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use rustc_hash::FxHashMap;

    use super::*;
    use crate::problems::road_network::Miles;
    use crate::problems::route::RouteProblem;
    use crate::runner;
    use crate::runner::Strategy;

    #[derive(Debug, Error)]
    #[error("places service is down")]
    struct Down;

    /// Answers from a fixed set of places, driving 25% longer than the
    /// great circle.
    #[derive(Default)]
    struct FakePlaces {
        places: FxHashMap<String, LatLon>,
        localities: Vec<Locality>,
        closed: Vec<(String, String)>,
        /// 1-based `nearby_localities` calls that fail.
        failing_samples: Vec<usize>,
        samples: Cell<usize>,
        down: bool,
    }

    impl FakePlaces {
        fn place(mut self, name: &str, lat: f64, lon: f64) -> Self {
            self.places.insert(name.to_string(), LatLon::new(lat, lon));
            self
        }
        fn locality(mut self, name: &str, region: &str, country: &str, lat: f64, lon: f64) -> Self {
            let locality = Locality {
                name: name.to_string(),
                region: Some(region.to_string()),
                country: Some(country.to_string()),
                location: LatLon::new(lat, lon),
            };
            self.places
                .entry(locality.display_name())
                .or_insert(locality.location);
            self.localities.push(locality);
            self
        }
        fn closed(mut self, a: &str, b: &str) -> Self {
            self.closed.push((a.to_string(), b.to_string()));
            self
        }
        fn failing_sample(mut self, i: usize) -> Self {
            self.failing_samples.push(i);
            self
        }
    }

    impl PlacesProvider for FakePlaces {
        type Error = Down;

        fn geocode(&self, name: &str) -> Result<Option<LatLon>, Down> {
            if self.down {
                return Err(Down);
            }
            Ok(self.places.get(name).copied())
        }

        fn nearby_localities(&self, at: LatLon, radius_m: f64) -> Result<Vec<Locality>, Down> {
            let sample = self.samples.get() + 1;
            self.samples.set(sample);
            if self.down || self.failing_samples.contains(&sample) {
                return Err(Down);
            }
            let radius = radius_m / METERS_PER_MILE;
            let mut found: Vec<_> = self
                .localities
                .iter()
                .map(|l| (geo::great_circle_miles(at, l.location), l))
                .filter(|(d, _)| *d <= radius)
                .collect();
            found.sort_by(|a, b| a.0.total_cmp(&b.0));
            Ok(found.into_iter().map(|(_, l)| l.clone()).collect())
        }

        fn driving_distance(&self, from: &str, to: &str) -> Result<Option<f64>, Down> {
            let is_closed = self
                .closed
                .iter()
                .any(|(a, b)| (a == from && b == to) || (a == to && b == from));
            if is_closed {
                return Err(Down);
            }
            Ok(self
                .places
                .get(from)
                .zip(self.places.get(to))
                .map(|(a, b)| geo::great_circle_miles(*a, *b) * 1.25 * METERS_PER_MILE))
        }
    }

    fn thruway() -> FakePlaces {
        FakePlaces::default()
            .place("Albany, NY", 42.6526, -73.7562)
            .place("Buffalo, NY", 42.8864, -78.8784)
            .locality("Albany", "NY", "US", 42.8, -75.0)
            .locality("Utica", "NY", "US", 43.1009, -75.2327)
            .locality("Tijuana", "BC", "MX", 42.85, -76.3)
            .locality("Syracuse", "NY", "US", 43.0481, -76.1474)
            .locality("Rochester", "NY", "US", 43.1566, -77.6088)
    }

    #[test]
    fn builds_a_chain() {
        let provider = thruway();
        let mut network = RoadNetwork::new();
        let built = NetworkBuilder::new()
            .with_intermediates(3)
            .build(&mut network, &provider, "Albany, NY", "Buffalo, NY")
            .unwrap();

        assert_eq!(
            built.intermediates,
            vec!["Utica, NY", "Syracuse, NY", "Rochester, NY"]
        );
        assert_eq!(built.locations.len(), 5);
        assert_eq!(built.locations[0], "Albany, NY");
        assert_eq!(built.locations[4], "Buffalo, NY");
        // Each location to the next three.
        assert_eq!(built.roads_added, 3 + 3 + 2 + 1);
        assert_eq!(network.num_roads(), 9);
        assert_eq!(network.distance("Albany, NY", "Buffalo, NY"), None);

        let utica = network.coordinates("Utica, NY").unwrap();
        let syracuse = network.coordinates("Syracuse, NY").unwrap();
        let expected = geo::great_circle_miles(utica, syracuse) * 1.25;
        let miles = network.distance("Utica, NY", "Syracuse, NY").unwrap();
        assert!((miles.get() - expected).abs() < 1e-6);

        // Building again only confirms what is there.
        let again = NetworkBuilder::new()
            .with_intermediates(3)
            .build(&mut network, &provider, "Albany, NY", "Buffalo, NY")
            .unwrap();
        assert_eq!(again.intermediates, built.intermediates);
        assert_eq!(again.roads_added, 0);
        assert_eq!(network.num_roads(), 9);
    }

    #[test]
    fn skips_failed_roads() {
        let provider = thruway().closed("Utica, NY", "Syracuse, NY");
        let mut network = RoadNetwork::new();
        let built = NetworkBuilder::new()
            .with_intermediates(3)
            .build(&mut network, &provider, "Albany, NY", "Buffalo, NY")
            .unwrap();
        assert_eq!(built.roads_added, 8);
        assert_eq!(network.distance("Utica, NY", "Syracuse, NY"), None);
        assert!(network.distance("Utica, NY", "Rochester, NY") > Some(Miles::new(0.0)));
    }

    #[test]
    fn skips_failed_samples() {
        // The middle sample is the only one that reaches Syracuse.
        let provider = thruway().failing_sample(2);
        let mut network = RoadNetwork::new();
        let built = NetworkBuilder::new()
            .with_intermediates(3)
            .build(&mut network, &provider, "Albany, NY", "Buffalo, NY")
            .unwrap();
        assert_eq!(provider.samples.get(), 3);
        assert_eq!(built.intermediates, vec!["Utica, NY", "Rochester, NY"]);
        assert!(!network.contains("Syracuse, NY"));
        assert_eq!(built.roads_added, 3 + 2 + 1);

        let problem = RouteProblem::new(&network, "Albany, NY", "Buffalo, NY").unwrap();
        let report = runner::run(Strategy::UniformCost, &problem);
        assert!(report.success);
        assert_eq!(report.path.first().map(String::as_str), Some("Albany, NY"));
        assert_eq!(report.path.last().map(String::as_str), Some("Buffalo, NY"));
    }

    #[test]
    fn filters_off_route_places() {
        let provider = FakePlaces::default()
            .place("Albany, NY", 42.6526, -73.7562)
            .place("Buffalo, NY", 42.8864, -78.8784)
            .locality("Kingston", "ON", "CA", 44.2312, -76.4860)
            .locality("Fort Erie", "ON", "CA", 42.9018, -78.9722)
            .locality("Montreal", "QC", "CA", 45.5017, -73.5673);

        let builder = NetworkBuilder::new()
            .with_intermediates(1)
            .with_radius_m(500_000.0);

        let mut network = RoadNetwork::new();
        let built = builder
            .clone()
            .build(&mut network, &provider, "Albany, NY", "Buffalo, NY")
            .unwrap();
        assert_eq!(built.intermediates, vec!["Fort Erie, ON (CA)"]);
        assert!(!network.contains("Kingston, ON (CA)"));

        // Only Kingston is considered, and it is too far north.
        let mut network = RoadNetwork::new();
        let built = builder
            .clone()
            .with_candidates_per_sample(1)
            .build(&mut network, &provider, "Albany, NY", "Buffalo, NY")
            .unwrap();
        assert!(built.intermediates.is_empty());
        assert_eq!(built.roads_added, 1);

        // Canada isn't allowed.
        let mut network = RoadNetwork::new();
        let built = builder
            .with_countries(["US"])
            .build(&mut network, &provider, "Albany, NY", "Buffalo, NY")
            .unwrap();
        assert!(built.intermediates.is_empty());
    }

    #[test]
    fn endpoints_must_be_found() {
        let mut network = RoadNetwork::new();
        let provider = thruway();
        let err = NetworkBuilder::new()
            .build(&mut network, &provider, "Albany, NY", "Atlantis")
            .unwrap_err();
        assert!(matches!(err, NetworkError::Geocode(ref name) if name == "Atlantis"));

        let provider = FakePlaces {
            down: true,
            ..thruway()
        };
        let err = NetworkBuilder::new()
            .build(&mut network, &provider, "Albany, NY", "Buffalo, NY")
            .unwrap_err();
        assert!(matches!(err, NetworkError::Provider(Down)));
    }

    #[test]
    fn known_endpoints_are_not_geocoded() {
        let mut network = RoadNetwork::new();
        network
            .add_location("Albany, NY", LatLon::new(42.6526, -73.7562))
            .unwrap();
        network
            .add_location("Buffalo, NY", LatLon::new(42.8864, -78.8784))
            .unwrap();
        let provider = FakePlaces {
            down: true,
            ..FakePlaces::default()
        };
        let built = NetworkBuilder::new()
            .with_intermediates(2)
            .build(&mut network, &provider, "Albany, NY", "Buffalo, NY")
            .unwrap();
        assert!(built.intermediates.is_empty());
        // Distances aren't available for anything.
        assert_eq!(built.roads_added, 0);
    }

    #[test]
    fn names() {
        let mut place = Locality {
            name: "Erie".to_string(),
            region: Some("PA".to_string()),
            country: Some("US".to_string()),
            location: LatLon::new(42.1292, -80.0851),
        };
        assert_eq!(place.display_name(), "Erie, PA");
        place.region = None;
        assert_eq!(place.display_name(), "Erie, US");
        place.country = None;
        assert_eq!(place.display_name(), "Erie");
    }
}
