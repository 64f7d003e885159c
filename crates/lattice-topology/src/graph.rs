//! The directed link graph (spec §3 `Graph`). A single authoritative
//! adjacency map; `delay`/`available_bandwidth`/`packet_loss` are overlays
//! written by the measurement engine, defaulting to zero until populated
//! (I4, and spec §4.11 "missing measurements treated as 0").

use std::collections::{BTreeSet, HashMap};

use lattice_common::{DatapathId, PortPair};

/// Per-edge annotations. All default to zero — "unknown" is represented as
/// zero per spec §4.4/§4.11, not as `Option`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeData {
    pub port_pair: PortPair,
    pub delay_s: f64,
    pub available_bandwidth_kbps: f64,
    pub packet_loss: f64,
}

/// Directed graph of datapaths and their links, rebuilt wholesale on every
/// topology event (spec §4.1). Node/edge set equality is the input to the
/// stability detector.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: BTreeSet<DatapathId>,
    edges: HashMap<DatapathId, HashMap<DatapathId, EdgeData>>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> impl Iterator<Item = DatapathId> + '_ {
        self.nodes.iter().copied()
    }

    pub fn edges(&self) -> impl Iterator<Item = (DatapathId, DatapathId, &EdgeData)> {
        self.edges
            .iter()
            .flat_map(|(src, out)| out.iter().map(move |(dst, data)| (*src, *dst, data)))
    }

    pub fn edge(&self, src: DatapathId, dst: DatapathId) -> Option<&EdgeData> {
        self.edges.get(&src).and_then(|m| m.get(&dst))
    }

    pub fn edge_mut(&mut self, src: DatapathId, dst: DatapathId) -> Option<&mut EdgeData> {
        self.edges.get_mut(&src).and_then(|m| m.get_mut(&dst))
    }

    pub fn neighbors(&self, dpid: DatapathId) -> impl Iterator<Item = DatapathId> + '_ {
        self.edges
            .get(&dpid)
            .into_iter()
            .flat_map(|m| m.keys().copied())
    }

    pub fn has_node(&self, dpid: DatapathId) -> bool {
        self.nodes.contains(&dpid)
    }

    pub fn add_node(&mut self, dpid: DatapathId) {
        self.nodes.insert(dpid);
        self.edges.entry(dpid).or_default();
    }

    /// Adds a directed edge with its port pair, preserving any measurement
    /// overlay already present for that edge (a rebuild must not wipe
    /// delay/bandwidth/loss that the measurement engine already computed).
    pub fn add_edge(&mut self, src: DatapathId, dst: DatapathId, port_pair: PortPair) {
        self.add_node(src);
        self.add_node(dst);
        let entry = self.edges.entry(src).or_default().entry(dst).or_default();
        entry.port_pair = port_pair;
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    /// Node and edge (including port-pair) set equality, per spec §4.1's
    /// `are_graphs_equal`. Measurement overlays are deliberately excluded —
    /// the original compares only topology, not live metrics.
    pub fn topologically_equal(&self, other: &Graph) -> bool {
        if self.nodes != other.nodes {
            return false;
        }
        for (src, out) in &self.edges {
            let Some(other_out) = other.edges.get(src) else {
                return if out.is_empty() { continue } else { false };
            };
            if out.len() != other_out.len() {
                return false;
            }
            for (dst, data) in out {
                match other_out.get(dst) {
                    Some(od) if od.port_pair == data.port_pair => {}
                    _ => return false,
                }
            }
        }
        for (src, out) in &other.edges {
            if !out.is_empty() && !self.edges.contains_key(src) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dp(n: u64) -> DatapathId {
        DatapathId(n)
    }

    #[test]
    fn rebuild_from_line_topology_matches_reference() {
        // 1 -- 2 -- 3
        let mut g = Graph::new();
        g.add_edge(dp(1), dp(2), PortPair::new(2u32, 1u32));
        g.add_edge(dp(2), dp(1), PortPair::new(1u32, 2u32));
        g.add_edge(dp(2), dp(3), PortPair::new(2u32, 1u32));
        g.add_edge(dp(3), dp(2), PortPair::new(1u32, 2u32));

        let mut reference = Graph::new();
        reference.add_edge(dp(1), dp(2), PortPair::new(2u32, 1u32));
        reference.add_edge(dp(2), dp(1), PortPair::new(1u32, 2u32));
        reference.add_edge(dp(2), dp(3), PortPair::new(2u32, 1u32));
        reference.add_edge(dp(3), dp(2), PortPair::new(1u32, 2u32));

        assert!(g.topologically_equal(&reference));
        assert_eq!(g.nodes().count(), 3);
        assert_eq!(g.edges().count(), 4);
    }

    #[test]
    fn differing_port_pair_is_not_equal() {
        let mut a = Graph::new();
        a.add_edge(dp(1), dp(2), PortPair::new(2u32, 1u32));
        let mut b = Graph::new();
        b.add_edge(dp(1), dp(2), PortPair::new(3u32, 1u32));
        assert!(!a.topologically_equal(&b));
    }

    #[test]
    fn measurement_overlay_survives_rebuild_of_same_edge() {
        let mut g = Graph::new();
        g.add_edge(dp(1), dp(2), PortPair::new(2u32, 1u32));
        g.edge_mut(dp(1), dp(2)).unwrap().delay_s = 0.004;
        // simulate a rebuild that re-adds the same edge
        g.add_edge(dp(1), dp(2), PortPair::new(2u32, 1u32));
        assert_eq!(g.edge(dp(1), dp(2)).unwrap().delay_s, 0.004);
    }

    #[test]
    fn missing_edge_defaults_to_zero_metrics() {
        let mut g = Graph::new();
        g.add_edge(dp(1), dp(2), PortPair::new(2u32, 1u32));
        let e = g.edge(dp(1), dp(2)).unwrap();
        assert_eq!(e.delay_s, 0.0);
        assert_eq!(e.available_bandwidth_kbps, 0.0);
        assert_eq!(e.packet_loss, 0.0);
    }
}
