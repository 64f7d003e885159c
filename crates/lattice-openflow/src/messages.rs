//! OF 1.3 message shapes the core needs to speak about. These are plain
//! data — encoding them onto a socket is the wire codec's job, out of scope
//! per spec §1.

use bytes::Bytes;
use lattice_common::{DatapathId, PortNo};

/// Administrative state of a port, as reported by port-desc/port-status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminState {
    Up,
    Down,
    NoRecv,
    NoFwd,
    NoPacketIn,
}

/// Link (carrier) state of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Up,
    Down,
    Blocked,
    Live,
}

/// One entry of an `OFPPortDescStatsReply`.
#[derive(Debug, Clone, Copy)]
pub struct PortDesc {
    pub port_no: PortNo,
    pub admin_state: AdminState,
    pub link_state: LinkState,
    pub curr_speed_kbps: u64,
    pub max_speed_kbps: u64,
}

/// One entry of an `OFPPortStatsReply`, matching spec §3 `PortStatsSample`
/// field-for-field.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortStatsEntry {
    pub port_no: PortNo,
    pub rx_packets: u64,
    pub tx_packets: u64,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_dropped: u64,
    pub tx_dropped: u64,
    pub rx_errors: u64,
    pub tx_errors: u64,
    pub duration_sec: u32,
    pub duration_nsec: u32,
}

/// A PortStatus event (link coming up/down/blocked).
#[derive(Debug, Clone, Copy)]
pub struct PortStatus {
    pub port_no: PortNo,
    pub state: LinkState,
    pub curr_speed_kbps: u64,
}

/// An inbound packet, already stripped of the OF envelope.
#[derive(Debug, Clone)]
pub struct PacketIn {
    pub in_port: PortNo,
    pub data: Bytes,
}

/// An IPv4 match, the only match kind this controller installs (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Match {
    pub ipv4_src: std::net::Ipv4Addr,
    pub ipv4_dst: std::net::Ipv4Addr,
    pub in_port: Option<PortNo>,
}

/// The action list for a flow-mod. The core only ever emits a single output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Output(PortNo),
}

/// A flow-table modification. `FlowMod::delete` is sent before every add to
/// evict a stale rule at the same priority (spec §4.9).
#[derive(Debug, Clone, Copy)]
pub enum FlowMod {
    Add {
        matc: Ipv4Match,
        action: Action,
        priority: u16,
        idle_timeout: u16,
        hard_timeout: u16,
    },
    Delete {
        matc: Ipv4Match,
        priority: u16,
    },
}

impl FlowMod {
    /// The table-miss entry installed on feature handshake (spec §6):
    /// match-any, output to controller, no buffering, priority 0.
    pub fn table_miss() -> Self {
        FlowMod::Add {
            matc: Ipv4Match {
                ipv4_src: std::net::Ipv4Addr::UNSPECIFIED,
                ipv4_dst: std::net::Ipv4Addr::UNSPECIFIED,
                in_port: None,
            },
            action: Action::Output(PortNo::CONTROLLER),
            priority: 0,
            idle_timeout: 0,
            hard_timeout: 0,
        }
    }
}

/// A packet-out, used to unicast an ARP reply toward a known host port.
#[derive(Debug, Clone)]
pub struct PacketOut {
    pub buffer_data: Option<Bytes>,
    pub in_port: PortNo,
    pub out_port: PortNo,
}

/// Minimal switch/link facts as reported by the discovery service
/// (`get_switch()`/`get_link()` in spec §6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchInfo {
    pub dpid: DatapathId,
    pub ports: Vec<PortNo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkInfo {
    pub src_dpid: DatapathId,
    pub src_port: PortNo,
    pub dst_dpid: DatapathId,
    pub dst_port: PortNo,
}

/// Topology lifecycle events the discovery service emits (spec §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyEvent {
    SwitchEnter(DatapathId),
    SwitchLeave(DatapathId),
    PortAdd(DatapathId, PortNo),
    PortDelete(DatapathId, PortNo),
    PortModify(DatapathId, PortNo),
    LinkAdd(DatapathId, DatapathId),
    LinkDelete(DatapathId, DatapathId),
}
