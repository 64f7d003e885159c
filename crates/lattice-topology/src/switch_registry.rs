//! SwitchRegistry (spec §4 table, §3 `SwitchEntry`): tracks live datapaths
//! and their OF channel handles, independent of the link graph. Entries are
//! created when a switch enters MAIN dispatch and destroyed on DEAD.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use lattice_common::{DatapathId, PortNo};
use lattice_openflow::OpenFlowChannel;

pub struct SwitchEntry {
    pub id: DatapathId,
    pub channel: Arc<dyn OpenFlowChannel>,
    pub ports: HashSet<PortNo>,
}

#[derive(Default)]
pub struct SwitchRegistry {
    switches: HashMap<DatapathId, SwitchEntry>,
}

impl SwitchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A switch has completed the MAIN-dispatch handshake.
    pub fn on_switch_enter(&mut self, id: DatapathId, channel: Arc<dyn OpenFlowChannel>) {
        self.switches.insert(
            id,
            SwitchEntry {
                id,
                channel,
                ports: HashSet::new(),
            },
        );
        tracing::info!(dpid = %id, "switch entered");
    }

    /// A switch has gone DEAD (control channel dropped).
    pub fn on_switch_leave(&mut self, id: DatapathId) {
        if self.switches.remove(&id).is_some() {
            tracing::info!(dpid = %id, "switch left");
        }
    }

    pub fn on_port_add(&mut self, id: DatapathId, port: PortNo) {
        if let Some(entry) = self.switches.get_mut(&id) {
            entry.ports.insert(port);
        }
    }

    pub fn on_port_delete(&mut self, id: DatapathId, port: PortNo) {
        if let Some(entry) = self.switches.get_mut(&id) {
            entry.ports.remove(&port);
        }
    }

    pub fn get(&self, id: DatapathId) -> Option<&SwitchEntry> {
        self.switches.get(&id)
    }

    pub fn channel(&self, id: DatapathId) -> Option<Arc<dyn OpenFlowChannel>> {
        self.switches.get(&id).map(|e| e.channel.clone())
    }

    pub fn ids(&self) -> impl Iterator<Item = DatapathId> + '_ {
        self.switches.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.switches.is_empty()
    }

    pub fn len(&self) -> usize {
        self.switches.len()
    }
}
