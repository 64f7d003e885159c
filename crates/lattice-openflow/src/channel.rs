//! Traits for the collaborators spec §6 names: the per-switch OpenFlow
//! channel, the discovery service, and the LLDP framing service. The
//! dispatch loop in `lattice-controller` is written against these, never
//! against a concrete transport, so the core stays testable without a real
//! switch.

use async_trait::async_trait;
use lattice_common::{DatapathId, PortNo};

use crate::messages::{FlowMod, LinkInfo, PacketOut, SwitchInfo};

/// Everything a component needs to talk to one connected datapath.
#[async_trait]
pub trait OpenFlowChannel: Send + Sync {
    /// Sends an echo request; payload is an opaque, controller-chosen blob
    /// (spec §4.2 encodes a monotonic timestamp in it).
    async fn send_echo_request(&self, dpid: DatapathId, payload: Vec<u8>) -> anyhow::Result<()>;

    /// Requests a refresh of `curr_speed` for every port.
    async fn send_port_desc_request(&self, dpid: DatapathId) -> anyhow::Result<()>;

    /// Requests port counters. `port` is `PortNo::ANY` to poll every port.
    async fn send_port_stats_request(&self, dpid: DatapathId, port: PortNo) -> anyhow::Result<()>;

    /// Installs or deletes a flow entry.
    async fn send_flow_mod(&self, dpid: DatapathId, mod_: FlowMod) -> anyhow::Result<()>;

    /// Emits a packet out of a specific port.
    async fn send_packet_out(&self, dpid: DatapathId, out: PacketOut) -> anyhow::Result<()>;
}

/// The topology discovery service: answers `get_switch()`/`get_link()` with
/// the current authoritative lists (spec §6).
pub trait DiscoveryService: Send + Sync {
    fn get_switches(&self) -> Vec<SwitchInfo>;
    fn get_links(&self) -> Vec<LinkInfo>;
}

/// The LLDP framing service: exposes the last send-timestamp embedded in the
/// beacon emitted on a given (dpid, port), in seconds since an arbitrary
/// monotonic epoch.
pub trait LldpTimestamps: Send + Sync {
    fn send_timestamp(&self, dpid: DatapathId, port: PortNo) -> Option<f64>;
}
