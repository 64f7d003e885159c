//! PacketInRouter (spec §4.10): classifies inbound packets and dispatches
//! ARP to HostLocator, IPv4 to PathEngine + FlowInstaller.

use std::net::Ipv4Addr;

use lattice_common::{DatapathId, LatticeError, Policy, PortNo};
use lattice_openflow::{OpenFlowChannel, PacketOut};
use lattice_topology::Graph;

use crate::host_locator::HostLocator;
use crate::oracle::PathOracle;
use crate::path_engine::PathEngine;

/// A decoded packet-in. LLDP/ARP/IPv4 framing/decoding is out of scope
/// (spec §1) — the dispatch loop hands this router the already-parsed
/// shape.
pub enum Classified {
    Arp { src_ip: Ipv4Addr, dst_ip: Option<Ipv4Addr> },
    Ipv4 { src_ip: Ipv4Addr, dst_ip: Ipv4Addr },
}

pub struct PacketInRouter;

impl PacketInRouter {
    /// Handles one classified packet-in observed at `(dpid, in_port)`.
    pub async fn handle(
        graph: &Graph,
        hosts: &mut HostLocator,
        oracle: &PathOracle,
        channel_for: impl Fn(DatapathId) -> Option<&'_ dyn OpenFlowChannel>,
        dpid: DatapathId,
        in_port: PortNo,
        packet: Classified,
    ) -> Result<(), LatticeError> {
        match packet {
            Classified::Arp { src_ip, dst_ip } => {
                hosts.observe(src_ip, dpid, in_port);
                let Some(dst_ip) = dst_ip else { return Ok(()) };
                let Some(dst_loc) = hosts.locate(dst_ip) else {
                    // Unknown destination: drop silently, no flooding.
                    return Ok(());
                };
                let Some(chan) = channel_for(dst_loc.dpid) else {
                    return Ok(());
                };
                chan.send_packet_out(
                    dst_loc.dpid,
                    PacketOut { buffer_data: None, in_port: PortNo::CONTROLLER, out_port: dst_loc.port },
                )
                .await
                .map_err(|e| LatticeError::TransientNetwork(e.to_string()))?;
                Ok(())
            }
            Classified::Ipv4 { src_ip, dst_ip } => {
                let Some(src_loc) = hosts.locate(src_ip) else {
                    return Err(LatticeError::MissingTopologyData(format!(
                        "no known attachment point for {src_ip}"
                    )));
                };
                let Some(dst_loc) = hosts.locate(dst_ip) else {
                    return Err(LatticeError::MissingTopologyData(format!(
                        "no known attachment point for {dst_ip}"
                    )));
                };

                let path = if let Some(pinned) = oracle.lookup(src_loc.dpid, dst_loc.dpid) {
                    pinned.to_vec()
                } else {
                    PathEngine::route(graph, Policy::Hop, src_loc.dpid, dst_loc.dpid)
                };

                if path.is_empty() {
                    return Err(LatticeError::PlanningFailure(format!(
                        "no path {} -> {}",
                        src_loc.dpid, dst_loc.dpid
                    )));
                }

                crate::flow_installer::FlowInstaller::install_path(
                    graph, hosts, channel_for, &path, src_ip, dst_ip,
                )
                .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lattice_common::PortPair;
    use lattice_openflow::fake::FakeOpenFlow;
    use std::sync::Arc;

    fn dp(n: u64) -> DatapathId {
        DatapathId(n)
    }

    fn ip(s: &str) -> Ipv4Addr {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn arp_with_known_destination_emits_packet_out() {
        let graph = Graph::new();
        let mut hosts = HostLocator::new();
        let dst_ip = ip("10.0.0.2");
        hosts.observe(dst_ip, dp(2), 5u32.into());
        let oracle = PathOracle::empty();

        let sw2 = Arc::new(FakeOpenFlow::default());
        let channels = vec![(dp(2), sw2.clone())];
        let channel_for = |d: DatapathId| -> Option<&dyn OpenFlowChannel> {
            channels.iter().find(|(id, _)| *id == d).map(|(_, c)| c.as_ref() as &dyn OpenFlowChannel)
        };

        PacketInRouter::handle(
            &graph,
            &mut hosts,
            &oracle,
            channel_for,
            dp(1),
            3u32.into(),
            Classified::Arp { src_ip: ip("10.0.0.1"), dst_ip: Some(dst_ip) },
        )
        .await
        .unwrap();

        assert_eq!(sw2.sent_packet_outs.lock().unwrap().len(), 1);
        assert_eq!(hosts.locate(ip("10.0.0.1")), Some(crate::host_locator::HostLocation { dpid: dp(1), port: 3u32.into() }));
    }

    #[tokio::test]
    async fn arp_with_unknown_destination_drops_silently() {
        let graph = Graph::new();
        let mut hosts = HostLocator::new();
        let oracle = PathOracle::empty();
        let channel_for = |_: DatapathId| -> Option<&dyn OpenFlowChannel> { None };

        let result = PacketInRouter::handle(
            &graph,
            &mut hosts,
            &oracle,
            channel_for,
            dp(1),
            3u32.into(),
            Classified::Arp { src_ip: ip("10.0.0.1"), dst_ip: Some(ip("10.0.0.99")) },
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn ipv4_installs_path_via_hop_policy() {
        let mut graph = Graph::new();
        graph.add_edge(dp(1), dp(2), PortPair::new(2u32, 1u32));
        graph.add_edge(dp(2), dp(1), PortPair::new(1u32, 2u32));

        let mut hosts = HostLocator::new();
        let src_ip = ip("10.0.0.1");
        let dst_ip = ip("10.0.0.2");
        hosts.observe(src_ip, dp(1), 10u32.into());
        hosts.observe(dst_ip, dp(2), 20u32.into());
        let oracle = PathOracle::empty();

        let sw1 = Arc::new(FakeOpenFlow::default());
        let sw2 = Arc::new(FakeOpenFlow::default());
        let channels = vec![(dp(1), sw1.clone()), (dp(2), sw2.clone())];
        let channel_for = |d: DatapathId| -> Option<&dyn OpenFlowChannel> {
            channels.iter().find(|(id, _)| *id == d).map(|(_, c)| c.as_ref() as &dyn OpenFlowChannel)
        };

        PacketInRouter::handle(
            &graph,
            &mut hosts,
            &oracle,
            channel_for,
            dp(1),
            10u32.into(),
            Classified::Ipv4 { src_ip, dst_ip },
        )
        .await
        .unwrap();

        assert!(!sw1.flow_mods_for(dp(1)).is_empty());
        assert!(!sw2.flow_mods_for(dp(2)).is_empty());
    }
}
