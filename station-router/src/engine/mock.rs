//! In-process engine backed by a JSON network file.
//!
//! The "network" is a list of routable nodes, each tagged with a connected
//! component. Snapping moves a coordinate to the closest node. Travel time
//! between two positions is the straight-line distance through their nodes
//! divided by a constant speed, and positions whose nodes sit in different
//! components are unreachable (`null` in the duration matrix, as OSRM
//! reports it).

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::domain::{Coordinate, Hint};

use super::RoutingEngine;
use super::error::EngineError;
use super::types::{CODE_OK, Snapped, TableRequest, Waypoint};

/// A routable node in a mock network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockNode {
    pub id: u32,
    /// `[lon, lat]`
    pub location: Coordinate,
    /// Nodes are mutually reachable only within the same component.
    #[serde(default)]
    pub component: u32,
}

/// Contents of a mock network file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockNetwork {
    /// Travel speed in metres per second.
    pub speed_mps: f64,
    pub nodes: Vec<MockNode>,
}

/// Routing engine serving a [`MockNetwork`].
#[derive(Debug, Clone)]
pub struct MockEngine {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    network: MockNetwork,
    by_id: HashMap<u32, usize>,
}

impl MockEngine {
    /// Build an engine from an in-memory network.
    pub fn new(network: MockNetwork) -> Result<Self, EngineError> {
        if network.nodes.is_empty() {
            return Err(EngineError::init("mock network has no nodes"));
        }
        if !(network.speed_mps.is_finite() && network.speed_mps > 0.0) {
            return Err(EngineError::init(format!(
                "mock network speed must be positive, got {}",
                network.speed_mps
            )));
        }

        let mut by_id = HashMap::with_capacity(network.nodes.len());
        for (pos, node) in network.nodes.iter().enumerate() {
            if by_id.insert(node.id, pos).is_some() {
                return Err(EngineError::init(format!(
                    "duplicate node id {} in mock network",
                    node.id
                )));
            }
        }

        Ok(Self {
            inner: Arc::new(Inner { network, by_id }),
        })
    }

    /// Load a network from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| EngineError::init(format!("failed to read {}: {e}", path.display())))?;
        let network: MockNetwork = serde_json::from_str(&json)
            .map_err(|e| EngineError::init(format!("failed to parse {}: {e}", path.display())))?;
        Self::new(network)
    }

    /// Number of nodes in the network.
    pub fn node_count(&self) -> usize {
        self.inner.network.nodes.len()
    }

    /// Closest node to `coordinate` and its distance in metres.
    fn nearest_node(&self, coordinate: &Coordinate) -> (&MockNode, f64) {
        let nodes = &self.inner.network.nodes;
        let mut best = (&nodes[0], nodes[0].location.distance_m(coordinate));
        for node in &nodes[1..] {
            let d = node.location.distance_m(coordinate);
            if d < best.1 {
                best = (node, d);
            }
        }
        best
    }

    fn hint_for(node: &MockNode) -> Hint {
        Hint::encode(format!("node:{}", node.id).as_bytes())
    }

    /// Resolve the node a hint points at.
    fn node_for_hint(&self, hint: &Hint) -> Option<&MockNode> {
        let bytes = hint.decode().ok()?;
        let text = std::str::from_utf8(&bytes).ok()?;
        let id: u32 = text.strip_prefix("node:")?.parse().ok()?;
        let pos = self.inner.by_id.get(&id)?;
        Some(&self.inner.network.nodes[*pos])
    }

    /// Node a table waypoint is attached to, plus the access distance.
    fn attach(&self, waypoint: &Waypoint) -> Result<(&MockNode, f64), String> {
        match &waypoint.hint {
            Some(hint) => {
                let node = self
                    .node_for_hint(hint)
                    .ok_or_else(|| format!("hint {hint} does not match any node"))?;
                Ok((node, node.location.distance_m(&waypoint.coordinate)))
            }
            None => Ok(self.nearest_node(&waypoint.coordinate)),
        }
    }

    fn duration(&self, from: (&MockNode, f64), to: (&MockNode, f64)) -> Option<f64> {
        if from.0.component != to.0.component {
            return None;
        }
        let metres = from.1 + from.0.location.distance_m(&to.0.location) + to.1;
        // OSRM reports durations with one decimal
        Some((metres / self.inner.network.speed_mps * 10.0).round() / 10.0)
    }
}

impl RoutingEngine for MockEngine {
    async fn snap_nearest(
        &self,
        coordinate: Coordinate,
        radius: Option<f64>,
    ) -> Result<Option<Snapped>, EngineError> {
        let (node, distance) = self.nearest_node(&coordinate);
        if radius.is_some_and(|r| distance > r) {
            return Ok(None);
        }

        Ok(Some(Snapped {
            location: node.location,
            hint: Self::hint_for(node),
            distance: Some(distance),
        }))
    }

    async fn table(&self, request: &TableRequest) -> Result<Value, EngineError> {
        request.validate()?;

        let attached: Result<Vec<_>, String> =
            request.waypoints.iter().map(|w| self.attach(w)).collect();
        let attached = match attached {
            Ok(attached) => attached,
            Err(message) => return Ok(json!({"code": "InvalidValue", "message": message})),
        };

        let durations: Vec<Vec<Option<f64>>> = request
            .sources
            .iter()
            .map(|&s| {
                request
                    .destinations
                    .iter()
                    .map(|&d| self.duration(attached[s], attached[d]))
                    .collect()
            })
            .collect();

        let describe = |positions: &[usize]| -> Vec<Value> {
            positions
                .iter()
                .map(|&p| {
                    let (node, distance) = attached[p];
                    json!({
                        "hint": Self::hint_for(node).as_str(),
                        "location": [node.location.lon(), node.location.lat()],
                        "distance": distance,
                    })
                })
                .collect()
        };

        Ok(json!({
            "code": CODE_OK,
            "durations": durations,
            "sources": describe(&request.sources),
            "destinations": describe(&request.destinations),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn coord(lon: f64, lat: f64) -> Coordinate {
        Coordinate::new(lon, lat).unwrap()
    }

    fn node(id: u32, lon: f64, lat: f64, component: u32) -> MockNode {
        MockNode {
            id,
            location: coord(lon, lat),
            component,
        }
    }

    fn two_islands() -> MockEngine {
        MockEngine::new(MockNetwork {
            speed_mps: 10.0,
            nodes: vec![
                node(0, 10.0, 50.0, 0),
                node(1, 10.1, 50.1, 0),
                node(2, 12.0, 55.0, 1),
            ],
        })
        .unwrap()
    }

    #[test]
    fn rejects_invalid_networks() {
        let empty = MockNetwork {
            speed_mps: 10.0,
            nodes: vec![],
        };
        assert!(matches!(MockEngine::new(empty), Err(EngineError::Init { .. })));

        let stopped = MockNetwork {
            speed_mps: 0.0,
            nodes: vec![node(0, 0.0, 0.0, 0)],
        };
        assert!(matches!(MockEngine::new(stopped), Err(EngineError::Init { .. })));

        let duplicate = MockNetwork {
            speed_mps: 1.0,
            nodes: vec![node(0, 0.0, 0.0, 0), node(0, 1.0, 1.0, 0)],
        };
        assert!(matches!(MockEngine::new(duplicate), Err(EngineError::Init { .. })));
    }

    #[test]
    fn load_fixture_network() {
        let engine = MockEngine::load("data/mock_network.json").unwrap();
        assert!(engine.node_count() >= 4);
    }

    #[test]
    fn load_missing_file_fails() {
        let err = MockEngine::load("data/does_not_exist.json").unwrap_err();
        assert!(matches!(err, EngineError::Init { .. }));
    }

    #[test]
    fn load_corrupt_file_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"speed_mps\": 10.0, \"nodes\": [").unwrap();
        let err = MockEngine::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }

    #[tokio::test]
    async fn snap_within_radius() {
        let engine = two_islands();
        let snapped = engine
            .snap_nearest(coord(10.0003, 50.0), Some(100.0))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(snapped.location, coord(10.0, 50.0));
        assert_eq!(snapped.hint.decode().unwrap(), b"node:0");
        assert!(snapped.distance.unwrap() < 100.0);
    }

    #[tokio::test]
    async fn snap_outside_radius_is_none() {
        let engine = two_islands();
        let far = coord(11.0, 52.0);
        assert!(engine.snap_nearest(far, Some(100.0)).await.unwrap().is_none());
        assert!(engine.snap_nearest(far, None).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn table_reports_unreachable_as_null() {
        let engine = two_islands();
        let request = TableRequest::one_to_many(
            coord(10.05, 50.05),
            vec![
                Waypoint::bare(coord(10.1, 50.1)),
                Waypoint::bare(coord(12.0, 55.0)),
            ],
        );

        let value = engine.table(&request).await.unwrap();
        assert_eq!(value["code"], "Ok");
        let row = value["durations"][0].as_array().unwrap();
        assert_eq!(row.len(), 2);
        assert!(row[0].as_f64().unwrap() > 0.0);
        assert!(row[1].is_null());
    }

    #[tokio::test]
    async fn table_uses_hints() {
        let engine = two_islands();
        // Coordinate near node 0, but the hint pins it to node 1
        let pinned = Waypoint {
            coordinate: coord(10.0, 50.0),
            hint: Some(MockEngine::hint_for(&node(1, 10.1, 50.1, 0))),
        };
        let request = TableRequest::one_to_many(coord(10.0, 50.0), vec![pinned]);

        let value = engine.table(&request).await.unwrap();
        assert_eq!(value["destinations"][0]["location"][0], 10.1);
        assert!(value["durations"][0][0].as_f64().unwrap() > 0.0);
    }

    #[tokio::test]
    async fn table_unknown_hint_is_error_code() {
        let engine = two_islands();
        let request = TableRequest::one_to_many(
            coord(10.0, 50.0),
            vec![Waypoint {
                coordinate: coord(10.1, 50.1),
                hint: Some(Hint::encode(b"node:99")),
            }],
        );

        let value = engine.table(&request).await.unwrap();
        assert_eq!(value["code"], "InvalidValue");
        assert!(value.get("durations").is_none());
    }

    #[tokio::test]
    async fn table_rejects_empty_destinations() {
        let engine = two_islands();
        let request = TableRequest::one_to_many(coord(10.0, 50.0), vec![]);
        assert!(matches!(
            engine.table(&request).await,
            Err(EngineError::InvalidRequest(_))
        ));
    }
}
