//! FlowInstaller (spec §4.9): emits OF flow-mod sequences along a chosen
//! path, bidirectionally, idempotently.

use std::net::Ipv4Addr;

use lattice_common::{DatapathId, LatticeError, PortNo};
use lattice_openflow::{Action, FlowMod, Ipv4Match, OpenFlowChannel};
use lattice_topology::Graph;

use crate::host_locator::HostLocator;

const FLOW_PRIORITY: u16 = 1;
const IDLE_TIMEOUT_SECS: u16 = 250;
const HARD_TIMEOUT_SECS: u16 = 0;

pub struct FlowInstaller;

impl FlowInstaller {
    /// Installs forward and reverse rules for `src_ip -> dst_ip` along
    /// `path`. `path` is the dpid sequence `PathEngine` returned.
    pub async fn install_path(
        graph: &Graph,
        hosts: &HostLocator,
        channel_for: impl Fn(DatapathId) -> Option<&'_ dyn OpenFlowChannel>,
        path: &[DatapathId],
        src_ip: Ipv4Addr,
        dst_ip: Ipv4Addr,
    ) -> Result<(), LatticeError> {
        match path.len() {
            0 => Err(LatticeError::PlanningFailure("no path".into())),
            1 => {
                let dpid = path[0];
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
                let Some(chan) = channel_for(dpid) else {
                    return Err(LatticeError::MissingTopologyData(format!(
                        "no channel for datapath {dpid}"
                    )));
                };
                install_rule(chan, dpid, src_ip, dst_ip, dst_loc.port).await?;
                install_rule(chan, dpid, dst_ip, src_ip, src_loc.port).await?;
                Ok(())
            }
            _ => {
                let Some(dst_loc) = hosts.locate(dst_ip) else {
                    return Err(LatticeError::MissingTopologyData(format!(
                        "no known attachment point for {dst_ip}"
                    )));
                };
                let Some(src_loc) = hosts.locate(src_ip) else {
                    return Err(LatticeError::MissingTopologyData(format!(
                        "no known attachment point for {src_ip}"
                    )));
                };

                for window in path.windows(2) {
                    let (a, b) = (window[0], window[1]);
                    let Some(edge) = graph.edge(a, b) else {
                        return Err(LatticeError::MissingTopologyData(format!(
                            "no link data for {a} -> {b}"
                        )));
                    };
                    let out_on_a = edge.port_pair.src_port;
                    let out_on_b = edge.port_pair.dst_port;

                    let Some(chan_a) = channel_for(a) else {
                        return Err(LatticeError::MissingTopologyData(format!("no channel for {a}")));
                    };
                    install_rule(chan_a, a, src_ip, dst_ip, out_on_a).await?;

                    let Some(chan_b) = channel_for(b) else {
                        return Err(LatticeError::MissingTopologyData(format!("no channel for {b}")));
                    };
                    install_rule(chan_b, b, dst_ip, src_ip, out_on_b).await?;
                }

                // Egress hop on the last switch toward the destination host,
                // and ingress hop on the first switch back toward the source.
                let last = *path.last().unwrap();
                if let Some(chan) = channel_for(last) {
                    install_rule(chan, last, src_ip, dst_ip, dst_loc.port).await?;
                }
                let first = path[0];
                if let Some(chan) = channel_for(first) {
                    install_rule(chan, first, dst_ip, src_ip, src_loc.port).await?;
                }
                Ok(())
            }
        }
    }
}

async fn install_rule(
    chan: &dyn OpenFlowChannel,
    dpid: DatapathId,
    ipv4_src: Ipv4Addr,
    ipv4_dst: Ipv4Addr,
    out_port: PortNo,
) -> Result<(), LatticeError> {
    let matc = Ipv4Match { ipv4_src, ipv4_dst, in_port: None };
    chan.send_flow_mod(dpid, FlowMod::Delete { matc, priority: FLOW_PRIORITY })
        .await
        .map_err(|e| LatticeError::TransientNetwork(e.to_string()))?;
    chan.send_flow_mod(
        dpid,
        FlowMod::Add {
            matc,
            action: Action::Output(out_port),
            priority: FLOW_PRIORITY,
            idle_timeout: IDLE_TIMEOUT_SECS,
            hard_timeout: HARD_TIMEOUT_SECS,
        },
    )
    .await
    .map_err(|e| LatticeError::TransientNetwork(e.to_string()))
}
