//! TopologyTracker (spec §4.1): rebuilds the graph from the discovery
//! service on every topology event and runs the stability detector
//! (`UNKNOWN → CHANGING ⇌ SETTLING → STABLE`, spec §4.10).

use std::time::{Duration, Instant};

use lattice_common::{DatapathId, PortPair};
use lattice_openflow::DiscoveryService;

use crate::graph::Graph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stability {
    Unknown,
    Changing,
    Settling,
    Stable,
}

/// What happened as a result of feeding in an event or a periodic tick —
/// the controller uses this to decide whether to fan out a PortDesc refresh
/// (spec §4.1 "on stabilization") or to (re)spawn/terminate collectors
/// (spec §4.10 "collector lifecycle").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StabilityEdge {
    /// No change in the reported stability boolean.
    None,
    /// Became stable: collectors should (re)spawn, PortDesc should refresh.
    BecameStable,
    /// Became unstable: collectors should terminate.
    BecameUnstable,
}

pub struct TopologyTracker {
    graph: Graph,
    prev_snapshot: Graph,
    stability: Stability,
    unchanged_since: Option<Instant>,
    stable_after: Duration,
}

impl TopologyTracker {
    pub fn new(stable_after: Duration) -> Self {
        TopologyTracker {
            graph: Graph::new(),
            prev_snapshot: Graph::new(),
            stability: Stability::Unknown,
            unchanged_since: None,
            stable_after,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn is_stable(&self) -> bool {
        self.stability == Stability::Stable
    }

    pub fn stability(&self) -> Stability {
        self.stability
    }

    /// Requeries the discovery service in full and rebuilds the graph, per
    /// spec §4.1 ("on any event it requeries the full switch and link sets").
    /// Call on every switch/port/link lifecycle event.
    pub fn rebuild(&mut self, discovery: &dyn DiscoveryService, now: Instant) -> StabilityEdge {
        let mut rebuilt = Graph::new();
        for switch in discovery.get_switches() {
            rebuilt.add_node(switch.dpid);
        }
        for link in discovery.get_links() {
            rebuilt.add_edge(
                link.src_dpid,
                link.dst_dpid,
                PortPair::new(link.src_port, link.dst_port),
            );
            rebuilt.add_edge(
                link.dst_dpid,
                link.src_dpid,
                PortPair::new(link.dst_port, link.src_port),
            );
        }

        let unchanged = rebuilt.topologically_equal(&self.prev_snapshot);
        self.prev_snapshot = rebuilt.clone();
        self.graph = rebuilt;

        if !unchanged {
            self.unchanged_since = None;
            let was_stable = self.stability == Stability::Stable;
            self.stability = Stability::Changing;
            return if was_stable {
                StabilityEdge::BecameUnstable
            } else {
                StabilityEdge::None
            };
        }

        if self.unchanged_since.is_none() {
            self.unchanged_since = Some(now);
        }
        self.stability = Stability::Settling;
        self.maybe_settle(now)
    }

    /// Periodic re-check with no new event, so a quiescent topology can
    /// still cross the STABLE_SECONDS threshold (mirrors the original's
    /// separate 1s polling loop rather than relying on another event to
    /// arrive).
    pub fn tick(&mut self, now: Instant) -> StabilityEdge {
        if self.stability == Stability::Settling {
            return self.maybe_settle(now);
        }
        StabilityEdge::None
    }

    fn maybe_settle(&mut self, now: Instant) -> StabilityEdge {
        let Some(since) = self.unchanged_since else {
            return StabilityEdge::None;
        };
        if now.duration_since(since) >= self.stable_after {
            if self.stability != Stability::Stable {
                self.stability = Stability::Stable;
                return StabilityEdge::BecameStable;
            }
        }
        StabilityEdge::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_common::DatapathId;
    use lattice_openflow::fake::FakeOpenFlow;
    use lattice_openflow::{LinkInfo, SwitchInfo};

    fn line_topology() -> FakeOpenFlow {
        FakeOpenFlow::new(
            vec![
                SwitchInfo { dpid: DatapathId(1), ports: vec![] },
                SwitchInfo { dpid: DatapathId(2), ports: vec![] },
                SwitchInfo { dpid: DatapathId(3), ports: vec![] },
            ],
            vec![
                LinkInfo { src_dpid: DatapathId(1), src_port: 2u32.into(), dst_dpid: DatapathId(2), dst_port: 1u32.into() },
                LinkInfo { src_dpid: DatapathId(2), src_port: 2u32.into(), dst_dpid: DatapathId(3), dst_port: 1u32.into() },
            ],
        )
    }

    #[test]
    fn stabilizes_after_quiet_period() {
        let discovery = line_topology();
        let mut tracker = TopologyTracker::new(Duration::from_secs(5));
        let t0 = Instant::now();

        assert_eq!(tracker.rebuild(&discovery, t0), StabilityEdge::None);
        assert!(!tracker.is_stable());

        // Same topology reported again 6s later with no intervening change.
        let t1 = t0 + Duration::from_secs(6);
        assert_eq!(tracker.rebuild(&discovery, t1), StabilityEdge::BecameStable);
        assert!(tracker.is_stable());
    }

    #[test]
    fn flap_keeps_it_unstable() {
        let discovery = line_topology();
        let mut tracker = TopologyTracker::new(Duration::from_secs(5));
        let t0 = Instant::now();
        tracker.rebuild(&discovery, t0);

        // A change resets the clock even if it settles again quickly.
        let mut flapped = line_topology();
        flapped.links.get_mut().unwrap().pop();
        let t1 = t0 + Duration::from_millis(500);
        tracker.rebuild(&flapped, t1);
        assert!(!tracker.is_stable());

        let t2 = t1 + Duration::from_millis(500);
        tracker.rebuild(&discovery, t2); // back to original, but clock restarts
        assert!(!tracker.is_stable());

        // Still under 5s since the last actual change at t1.
        let t3 = t1 + Duration::from_secs(2);
        assert_eq!(tracker.tick(t3), StabilityEdge::None);
        assert!(!tracker.is_stable());
    }

    #[test]
    fn stable_then_change_emits_became_unstable() {
        let discovery = line_topology();
        let mut tracker = TopologyTracker::new(Duration::from_secs(5));
        let t0 = Instant::now();
        tracker.rebuild(&discovery, t0);
        tracker.rebuild(&discovery, t0 + Duration::from_secs(6));
        assert!(tracker.is_stable());

        let mut changed = line_topology();
        changed.links.get_mut().unwrap().pop();
        let edge = tracker.rebuild(&changed, t0 + Duration::from_secs(7));
        assert_eq!(edge, StabilityEdge::BecameUnstable);
        assert!(!tracker.is_stable());
    }

    #[test]
    fn tick_without_new_event_can_cross_threshold() {
        let discovery = line_topology();
        let mut tracker = TopologyTracker::new(Duration::from_secs(5));
        let t0 = Instant::now();
        tracker.rebuild(&discovery, t0);
        assert_eq!(tracker.tick(t0 + Duration::from_secs(6)), StabilityEdge::BecameStable);
    }
}
