//! The event shapes the dispatch loop consumes. Everything upstream of
//! these — OF wire decode, LLDP/ARP framing — is out of scope (spec §1);
//! whatever owns that decoding pushes already-classified events here.

use std::sync::Arc;

use lattice_common::{DatapathId, PortNo};
use lattice_openflow::{OpenFlowChannel, PortDesc, PortStatsEntry, PortStatus};
use lattice_routing::Classified;

pub enum ControllerEvent {
    SwitchEnter(DatapathId, Arc<dyn OpenFlowChannel>),
    SwitchLeave(DatapathId),
    PortAdd(DatapathId, PortNo),
    PortDelete(DatapathId, PortNo),
    PortModify(DatapathId, PortNo),
    LinkAdd(DatapathId, DatapathId),
    LinkDelete(DatapathId, DatapathId),
    EchoReply(DatapathId, Vec<u8>),
    LldpReceived { src_dpid: DatapathId, src_port: PortNo, dst_dpid: DatapathId },
    PortDescReply(DatapathId, Vec<PortDesc>),
    PortStatsReply(DatapathId, Vec<PortStatsEntry>),
    PortStatus(DatapathId, PortStatus),
    PacketIn { dpid: DatapathId, in_port: PortNo, packet: Classified },
}
