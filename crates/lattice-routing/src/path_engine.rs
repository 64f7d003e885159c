//! PathEngine (spec §4.8): policy-weighted shortest paths over the
//! annotated graph. Additive policies (hop, delay, loss) use Dijkstra;
//! max-bandwidth uses bounded widest-path enumeration since bottleneck
//! capacity isn't additive.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use lattice_common::{DatapathId, Policy};
use lattice_topology::Graph;

/// Enumeration caps for the widest-path search, so a dense graph can't make
/// path enumeration blow up. Chosen generously for controller-scale
/// topologies (tens of switches).
const MAX_BANDWIDTH_HOPS: usize = 12;
const MAX_BANDWIDTH_PATHS: usize = 4096;

pub struct PathEngine;

impl PathEngine {
    /// Returns an ordered list of dpids `[src, ..., dst]`, or empty if
    /// unreachable (or `src == dst`, trivially reachable as a single-node
    /// path).
    pub fn route(
        graph: &Graph,
        policy: Policy,
        src: DatapathId,
        dst: DatapathId,
    ) -> Vec<DatapathId> {
        if !graph.has_node(src) || !graph.has_node(dst) {
            return Vec::new();
        }
        if src == dst {
            return vec![src];
        }
        match policy {
            Policy::Bandwidth => widest_path(graph, src, dst),
            _ => dijkstra(graph, policy, src, dst),
        }
    }
}

fn edge_weight(graph: &Graph, policy: Policy, a: DatapathId, b: DatapathId) -> Option<f64> {
    let data = graph.edge(a, b)?;
    Some(match policy {
        Policy::Hop => 1.0,
        Policy::Delay => data.delay_s,
        Policy::Loss => data.packet_loss,
        Policy::Bandwidth => unreachable!("bandwidth uses widest_path"),
    })
}

/// Priority-queue entry ordered by (weight asc, hops asc, dpid asc) so ties
/// break by fewest hops, then lexicographic dpid — matching spec §4.8's
/// tie-break table.
#[derive(PartialEq)]
struct HeapItem {
    weight: f64,
    hops: u32,
    dpid: DatapathId,
}

impl Eq for HeapItem {}

impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .partial_cmp(&self.weight)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.hops.cmp(&self.hops))
            .then_with(|| other.dpid.0.cmp(&self.dpid.0))
    }
}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dijkstra(graph: &Graph, policy: Policy, src: DatapathId, dst: DatapathId) -> Vec<DatapathId> {
    let mut best: HashMap<DatapathId, (f64, u32)> = HashMap::new();
    let mut prev: HashMap<DatapathId, DatapathId> = HashMap::new();
    let mut heap = BinaryHeap::new();

    best.insert(src, (0.0, 0));
    heap.push(HeapItem { weight: 0.0, hops: 0, dpid: src });

    while let Some(HeapItem { weight, hops, dpid }) = heap.pop() {
        if dpid == dst {
            break;
        }
        if let Some(&(known_w, known_h)) = best.get(&dpid) {
            if (weight, hops) != (known_w, known_h) {
                continue;
            }
        }
        let mut neighbors: Vec<DatapathId> = graph.neighbors(dpid).collect();
        neighbors.sort_by_key(|d| d.0);
        for next in neighbors {
            let Some(w) = edge_weight(graph, policy, dpid, next) else { continue };
            let cand = (weight + w, hops + 1);
            let better = match best.get(&next) {
                None => true,
                Some(&(bw, bh)) => (cand.0, cand.1) < (bw, bh),
            };
            if better {
                best.insert(next, cand);
                prev.insert(next, dpid);
                heap.push(HeapItem { weight: cand.0, hops: cand.1, dpid: next });
            }
        }
    }

    if !best.contains_key(&dst) {
        return Vec::new();
    }

    let mut path = vec![dst];
    let mut cur = dst;
    while cur != src {
        let Some(&p) = prev.get(&cur) else { return Vec::new() };
        path.push(p);
        cur = p;
    }
    path.reverse();
    path
}

fn widest_path(graph: &Graph, src: DatapathId, dst: DatapathId) -> Vec<DatapathId> {
    let mut best_path: Option<Vec<DatapathId>> = None;
    let mut best_bottleneck = f64::NEG_INFINITY;
    let mut paths_seen = 0usize;
    let mut stack = vec![(vec![src], f64::INFINITY)];

    while let Some((path, bottleneck)) = stack.pop() {
        if paths_seen >= MAX_BANDWIDTH_PATHS {
            break;
        }
        let last = *path.last().unwrap();
        if last == dst {
            paths_seen += 1;
            if bottleneck > best_bottleneck {
                best_bottleneck = bottleneck;
                best_path = Some(path);
            }
            continue;
        }
        if path.len() > MAX_BANDWIDTH_HOPS {
            continue;
        }
        let mut neighbors: Vec<DatapathId> = graph.neighbors(last).collect();
        neighbors.sort_by_key(|d| d.0);
        for next in neighbors.into_iter().rev() {
            if path.contains(&next) {
                continue;
            }
            let Some(edge) = graph.edge(last, next) else { continue };
            let next_bottleneck = bottleneck.min(edge.available_bandwidth_kbps);
            let mut next_path = path.clone();
            next_path.push(next);
            stack.push((next_path, next_bottleneck));
        }
    }

    best_path.unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_common::PortPair;

    fn dp(n: u64) -> DatapathId {
        DatapathId(n)
    }

    fn line_graph() -> Graph {
        let mut g = Graph::new();
        g.add_edge(dp(1), dp(2), PortPair::new(2u32, 1u32));
        g.add_edge(dp(2), dp(1), PortPair::new(1u32, 2u32));
        g.add_edge(dp(2), dp(3), PortPair::new(2u32, 1u32));
        g.add_edge(dp(3), dp(2), PortPair::new(1u32, 2u32));
        g
    }

    #[test]
    fn hop_policy_walks_the_line() {
        let g = line_graph();
        let path = PathEngine::route(&g, Policy::Hop, dp(1), dp(3));
        assert_eq!(path, vec![dp(1), dp(2), dp(3)]);
    }

    #[test]
    fn unreachable_node_yields_empty_path() {
        let mut g = line_graph();
        g.add_node(dp(9));
        let path = PathEngine::route(&g, Policy::Hop, dp(1), dp(9));
        assert!(path.is_empty());
    }

    #[test]
    fn same_src_dst_is_single_node_path() {
        let g = line_graph();
        assert_eq!(PathEngine::route(&g, Policy::Hop, dp(1), dp(1)), vec![dp(1)]);
    }

    #[test]
    fn min_delay_prefers_lower_delay_over_fewer_hops() {
        // Two parallel options: 1->3 directly (high delay) vs 1->2->3 (low delay).
        let mut g = Graph::new();
        g.add_edge(dp(1), dp(3), PortPair::new(9u32, 9u32));
        g.add_edge(dp(3), dp(1), PortPair::new(9u32, 9u32));
        g.edge_mut(dp(1), dp(3)).unwrap().delay_s = 1.0;
        g.add_edge(dp(1), dp(2), PortPair::new(2u32, 1u32));
        g.add_edge(dp(2), dp(1), PortPair::new(1u32, 2u32));
        g.add_edge(dp(2), dp(3), PortPair::new(2u32, 1u32));
        g.add_edge(dp(3), dp(2), PortPair::new(1u32, 2u32));
        g.edge_mut(dp(1), dp(2)).unwrap().delay_s = 0.001;
        g.edge_mut(dp(2), dp(3)).unwrap().delay_s = 0.001;

        let path = PathEngine::route(&g, Policy::Delay, dp(1), dp(3));
        assert_eq!(path, vec![dp(1), dp(2), dp(3)]);
    }

    #[test]
    fn max_bandwidth_picks_widest_bottleneck() {
        let mut g = Graph::new();
        // path A: 1->2->4, bottleneck 100
        g.add_edge(dp(1), dp(2), PortPair::new(1u32, 1u32));
        g.edge_mut(dp(1), dp(2)).unwrap().available_bandwidth_kbps = 100.0;
        g.add_edge(dp(2), dp(4), PortPair::new(2u32, 1u32));
        g.edge_mut(dp(2), dp(4)).unwrap().available_bandwidth_kbps = 100.0;
        // path B: 1->3->4, bottleneck 10
        g.add_edge(dp(1), dp(3), PortPair::new(2u32, 1u32));
        g.edge_mut(dp(1), dp(3)).unwrap().available_bandwidth_kbps = 10.0;
        g.add_edge(dp(3), dp(4), PortPair::new(2u32, 2u32));
        g.edge_mut(dp(3), dp(4)).unwrap().available_bandwidth_kbps = 500.0;

        let path = PathEngine::route(&g, Policy::Bandwidth, dp(1), dp(4));
        assert_eq!(path, vec![dp(1), dp(2), dp(4)]);
    }
}
