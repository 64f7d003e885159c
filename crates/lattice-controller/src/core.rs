//! The dispatch core: owns every stateful component and reacts to
//! switch/link/packet events. Kept free of any transport concerns so it can
//! be driven directly by tests, or by the event loop in `dispatch.rs`
//! against a real OpenFlow collaborator.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Instant;

use lattice_common::{Config, DatapathId, PortNo};
use lattice_measure::{
    available_bandwidth_kbps, load_kbps, DelayFuser, EchoProbe, LLDPDelayProbe, LossEstimator,
    PortStatsCollector,
};
use lattice_openflow::{
    DiscoveryService, LldpTimestamps, OpenFlowChannel, PortDesc, PortStatsEntry, PortStatus,
};
use lattice_routing::{Classified, FlowInstaller, HostLocator, PacketInRouter, PathOracle};
use lattice_topology::{PortCatalog, StabilityEdge, SwitchRegistry, TopologyTracker};

pub struct ControllerCore {
    pub registry: SwitchRegistry,
    pub ports: PortCatalog,
    pub tracker: TopologyTracker,
    pub echo: EchoProbe,
    pub lldp: LLDPDelayProbe,
    pub stats: PortStatsCollector,
    pub hosts: HostLocator,
    pub oracle: PathOracle,
    discovery: Arc<dyn DiscoveryService>,
    lldp_framing: Arc<dyn LldpTimestamps>,
    config: Config,
}

impl ControllerCore {
    pub fn new(
        config: Config,
        discovery: Arc<dyn DiscoveryService>,
        lldp_framing: Arc<dyn LldpTimestamps>,
    ) -> Self {
        let oracle = match &config.persisted_paths_file {
            Some(path) => PathOracle::load(path),
            None => PathOracle::empty(),
        };
        ControllerCore {
            registry: SwitchRegistry::default(),
            ports: PortCatalog::default(),
            tracker: TopologyTracker::new(config.stable_seconds),
            echo: EchoProbe::new(),
            lldp: LLDPDelayProbe::new(),
            stats: PortStatsCollector::new(config.port_stat_history),
            hosts: HostLocator::new(),
            oracle,
            discovery,
            lldp_framing,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn rebuild(&mut self, now: Instant) -> StabilityEdge {
        self.tracker.rebuild(self.discovery.as_ref(), now)
    }

    pub fn on_switch_enter(&mut self, dpid: DatapathId, channel: Arc<dyn OpenFlowChannel>, now: Instant) -> StabilityEdge {
        self.registry.on_switch_enter(dpid, channel);
        self.rebuild(now)
    }

    pub fn on_switch_leave(&mut self, dpid: DatapathId, now: Instant) -> StabilityEdge {
        self.registry.on_switch_leave(dpid);
        self.rebuild(now)
    }

    pub fn on_port_add(&mut self, dpid: DatapathId, port: PortNo, now: Instant) -> StabilityEdge {
        self.registry.on_port_add(dpid, port);
        self.rebuild(now)
    }

    pub fn on_port_delete(&mut self, dpid: DatapathId, port: PortNo, now: Instant) -> StabilityEdge {
        self.registry.on_port_delete(dpid, port);
        self.rebuild(now)
    }

    pub fn on_port_modify(&mut self, now: Instant) -> StabilityEdge {
        self.rebuild(now)
    }

    pub fn on_link_event(&mut self, now: Instant) -> StabilityEdge {
        self.rebuild(now)
    }

    pub fn on_tick(&mut self, now: Instant) -> StabilityEdge {
        self.tracker.tick(now)
    }

    /// Requests a PortDesc refresh from every known datapath — the action
    /// the tracker takes on stabilization (spec §4.1).
    pub async fn refresh_port_desc(&self) {
        for dpid in self.registry.ids() {
            if let Some(chan) = self.registry.channel(dpid) {
                if let Err(e) = chan.send_port_desc_request(dpid).await {
                    tracing::warn!(%dpid, error = %e, "port-desc refresh request failed");
                }
            }
        }
    }

    pub fn echo_payload(&self, now_s: f64) -> Vec<u8> {
        EchoProbe::encode_payload(now_s)
    }

    pub fn on_echo_reply(&mut self, dpid: DatapathId, payload: &[u8], now_s: f64) {
        if let Err(e) = self.echo.on_echo_reply(dpid, payload, now_s) {
            tracing::debug!(%dpid, error = %e, "discarding malformed echo reply");
        }
    }

    pub fn on_lldp_received(&mut self, src_dpid: DatapathId, src_port: PortNo, dst_dpid: DatapathId, now_s: f64) {
        self.lldp
            .on_lldp_received(src_dpid, src_port, dst_dpid, now_s, self.lldp_framing.as_ref());
    }

    pub fn on_port_desc_reply(&mut self, dpid: DatapathId, descs: &[PortDesc]) {
        self.ports.apply_port_desc_reply(dpid, descs);
    }

    pub fn on_port_status(&mut self, dpid: DatapathId, status: PortStatus) {
        self.ports.apply_port_status(dpid, &status);
    }

    pub fn on_port_stats_reply(&mut self, dpid: DatapathId, entries: &[PortStatsEntry], now_s: f64) {
        for entry in entries {
            self.stats.record(dpid, *entry, now_s);
        }
    }

    /// Recomputes fused delay, available bandwidth, and loss for every graph
    /// edge from the latest probe/counter data (spec §4.4-§4.7). Call once
    /// per measurement cycle, only while the topology is stable.
    pub fn refresh_measurements(&mut self) {
        let pairs: Vec<(DatapathId, DatapathId)> =
            self.tracker.graph().edges().map(|(a, b, _)| (a, b)).collect();

        for (a, b) in &pairs {
            if let Some(fused) = DelayFuser::fuse(*a, *b, &self.lldp, &self.echo) {
                if let Some(edge) = self.tracker.graph_mut().edge_mut(*a, *b) {
                    edge.delay_s = fused;
                }
            }
        }

        for (a, b) in &pairs {
            let Some(edge) = self.tracker.graph().edge(*a, *b).copied() else { continue };
            let src_port = edge.port_pair.src_port;
            let dst_port = edge.port_pair.dst_port;

            if let Some((prev, curr)) = self.stats.last_two(*a, src_port) {
                if let Some(load) = load_kbps(prev, curr) {
                    let curr_speed = self.ports.curr_speed_kbps(*a, src_port).unwrap_or(0);
                    if let Some(edge) = self.tracker.graph_mut().edge_mut(*a, *b) {
                        edge.available_bandwidth_kbps = available_bandwidth_kbps(curr_speed, load);
                    }
                }
            }

            let src_sample = self.stats.latest(*a, src_port);
            let dst_sample = self.stats.latest(*b, dst_port);
            if let Some(loss) = LossEstimator::estimate(src_sample, dst_sample) {
                if let Some(edge) = self.tracker.graph_mut().edge_mut(*a, *b) {
                    edge.packet_loss = loss;
                }
            }
        }
    }

    pub async fn on_packet_in(
        &mut self,
        dpid: DatapathId,
        in_port: PortNo,
        packet: Classified,
    ) {
        let channels: Vec<(DatapathId, Arc<dyn OpenFlowChannel>)> = self
            .registry
            .ids()
            .filter_map(|id| self.registry.channel(id).map(|c| (id, c)))
            .collect();
        let channel_for = |d: DatapathId| -> Option<&dyn OpenFlowChannel> {
            channels.iter().find(|(id, _)| *id == d).map(|(_, c)| c.as_ref())
        };

        let result = PacketInRouter::handle(
            self.tracker.graph(),
            &mut self.hosts,
            &self.oracle,
            channel_for,
            dpid,
            in_port,
            packet,
        )
        .await;

        if let Err(e) = result {
            tracing::debug!(%dpid, error = %e, "packet-in handling failed");
        }
    }

    /// Convenience used by tests and by the HTTP status surface — not part
    /// of the event-handling path.
    pub async fn install_demo_path(
        &self,
        path: &[DatapathId],
        src_ip: Ipv4Addr,
        dst_ip: Ipv4Addr,
    ) -> Result<(), lattice_common::LatticeError> {
        let channels: Vec<(DatapathId, Arc<dyn OpenFlowChannel>)> = self
            .registry
            .ids()
            .filter_map(|id| self.registry.channel(id).map(|c| (id, c)))
            .collect();
        let channel_for = |d: DatapathId| -> Option<&dyn OpenFlowChannel> {
            channels.iter().find(|(id, _)| *id == d).map(|(_, c)| c.as_ref())
        };
        FlowInstaller::install_path(self.tracker.graph(), &self.hosts, channel_for, path, src_ip, dst_ip).await
    }
}
