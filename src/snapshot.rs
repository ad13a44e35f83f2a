//! Saving and loading road networks as JSON.
//!
//! ```json
//! {
//!   "locations": { "Buffalo, NY": { "lat": 42.8864, "lon": -78.8784 } },
//!   "edges": { "Buffalo, NY": { "Rochester, NY": 85.0 } }
//! }
//! ```
//!
//! Every location gets an `edges` entry, even without roads, so locations
//! without coordinates survive a round trip. Maps are sorted so saving the
//! same network always writes the same bytes.
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::geo::LatLon;
use crate::problems::road_network::GraphError;
use crate::problems::road_network::RoadNetwork;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Snapshot I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error("Road '{a}' -> '{b}' is {forward} miles, but '{b}' -> '{a}' is {backward} miles.")]
    AsymmetricEdge {
        a: String,
        b: String,
        forward: f64,
        backward: f64,
    },
}

/// The serialised shape of a `RoadNetwork`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub locations: BTreeMap<String, LatLon>,
    #[serde(default)]
    pub edges: BTreeMap<String, BTreeMap<String, f64>>,
}

impl GraphSnapshot {
    pub fn from_network(network: &RoadNetwork) -> Self {
        let mut snapshot = Self::default();
        for (name, coordinates) in network.locations() {
            if let Some(at) = coordinates {
                snapshot.locations.insert(name.to_string(), at);
            }
            let roads = network
                .neighbours(name)
                .into_iter()
                .map(|(b, miles)| (b.to_string(), miles.get()))
                .collect();
            snapshot.edges.insert(name.to_string(), roads);
        }
        snapshot
    }

    /// Builds the network, validating every location and road on the way.
    ///
    /// A road listed in one direction only is connected both ways, a road
    /// listed both ways with different lengths is rejected.
    pub fn into_network(self) -> Result<RoadNetwork, SnapshotError> {
        let mut network = RoadNetwork::new();
        for (name, at) in &self.locations {
            network.add_location(name, *at)?;
        }
        for (a, roads) in &self.edges {
            network.register(a);
            for (b, &forward) in roads {
                match self.edges.get(b).and_then(|back| back.get(a)) {
                    Some(&backward) if backward != forward => {
                        return Err(SnapshotError::AsymmetricEdge {
                            a: a.clone(),
                            b: b.clone(),
                            forward,
                            backward,
                        });
                    }
                    Some(_) => {}
                    None => log::debug!("Road '{a}' -> '{b}' has no way back listed"),
                }
                network.connect(a, b, forward)?;
            }
        }
        Ok(network)
    }

    pub fn read_json(path: &Path) -> Result<Self, SnapshotError> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<(), SnapshotError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}

/// Reads a network saved with `save`.
pub fn load(path: &Path) -> Result<RoadNetwork, SnapshotError> {
    let network = GraphSnapshot::read_json(path)?.into_network()?;
    log::info!("Loaded {network} from {}", path.display());
    Ok(network)
}

pub fn save(network: &RoadNetwork, path: &Path) -> Result<(), SnapshotError> {
    GraphSnapshot::from_network(network).write_json(path)?;
    log::info!("Saved {network} to {}", path.display());
    Ok(())
}
