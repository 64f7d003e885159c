//! In-memory fakes for the collaborator traits, used by unit and scenario
//! tests across the workspace. Not part of the spec's core — purely test
//! scaffolding, kept here so every crate's tests can share one fake.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use lattice_common::{DatapathId, PortNo};

use crate::channel::{DiscoveryService, LldpTimestamps, OpenFlowChannel};
use crate::messages::{FlowMod, LinkInfo, PacketOut, SwitchInfo};

/// A fixed topology the fake discovery service reports, plus a recorder of
/// every flow-mod / echo / stats request sent to it, so tests can assert on
/// what the core *would* have written to the wire.
#[derive(Default)]
pub struct FakeOpenFlow {
    pub switches: Mutex<Vec<SwitchInfo>>,
    pub links: Mutex<Vec<LinkInfo>>,
    pub lldp_send_ts: Mutex<HashMap<(DatapathId, PortNo), f64>>,
    pub sent_flow_mods: Mutex<Vec<(DatapathId, FlowMod)>>,
    pub sent_packet_outs: Mutex<Vec<(DatapathId, PacketOut)>>,
    pub echo_requests: Mutex<Vec<(DatapathId, Vec<u8>)>>,
    pub port_desc_requests: Mutex<Vec<DatapathId>>,
    pub port_stats_requests: Mutex<Vec<(DatapathId, PortNo)>>,
}

impl FakeOpenFlow {
    pub fn new(switches: Vec<SwitchInfo>, links: Vec<LinkInfo>) -> Self {
        FakeOpenFlow {
            switches: Mutex::new(switches),
            links: Mutex::new(links),
            ..Default::default()
        }
    }

    pub fn set_lldp_send_timestamp(&self, dpid: DatapathId, port: PortNo, ts: f64) {
        self.lldp_send_ts.lock().unwrap().insert((dpid, port), ts);
    }

    pub fn flow_mods_for(&self, dpid: DatapathId) -> Vec<FlowMod> {
        self.sent_flow_mods
            .lock()
            .unwrap()
            .iter()
            .filter(|(d, _)| *d == dpid)
            .map(|(_, m)| *m)
            .collect()
    }
}

#[async_trait]
impl OpenFlowChannel for FakeOpenFlow {
    async fn send_echo_request(&self, dpid: DatapathId, payload: Vec<u8>) -> anyhow::Result<()> {
        self.echo_requests.lock().unwrap().push((dpid, payload));
        Ok(())
    }

    async fn send_port_desc_request(&self, dpid: DatapathId) -> anyhow::Result<()> {
        self.port_desc_requests.lock().unwrap().push(dpid);
        Ok(())
    }

    async fn send_port_stats_request(&self, dpid: DatapathId, port: PortNo) -> anyhow::Result<()> {
        self.port_stats_requests.lock().unwrap().push((dpid, port));
        Ok(())
    }

    async fn send_flow_mod(&self, dpid: DatapathId, mod_: FlowMod) -> anyhow::Result<()> {
        self.sent_flow_mods.lock().unwrap().push((dpid, mod_));
        Ok(())
    }

    async fn send_packet_out(&self, dpid: DatapathId, out: PacketOut) -> anyhow::Result<()> {
        self.sent_packet_outs.lock().unwrap().push((dpid, out));
        Ok(())
    }
}

impl DiscoveryService for FakeOpenFlow {
    fn get_switches(&self) -> Vec<SwitchInfo> {
        self.switches.lock().unwrap().clone()
    }

    fn get_links(&self) -> Vec<LinkInfo> {
        self.links.lock().unwrap().clone()
    }
}

impl LldpTimestamps for FakeOpenFlow {
    fn send_timestamp(&self, dpid: DatapathId, port: PortNo) -> Option<f64> {
        self.lldp_send_ts.lock().unwrap().get(&(dpid, port)).copied()
    }
}
