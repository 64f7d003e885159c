//! PortCatalog (spec §3 `PortDescriptor`): per-port administrative/link
//! state and speed, mutated by port-desc replies and PortStatus events.

use std::collections::HashMap;

use lattice_common::{DatapathId, PortNo};
use lattice_openflow::{AdminState, LinkState, PortDesc, PortStatus};

#[derive(Debug, Clone, Copy)]
pub struct PortDescriptor {
    pub admin_state: AdminState,
    pub link_state: LinkState,
    pub curr_speed_kbps: u64,
    pub max_speed_kbps: u64,
}

impl Default for PortDescriptor {
    fn default() -> Self {
        PortDescriptor {
            admin_state: AdminState::Down,
            link_state: LinkState::Down,
            curr_speed_kbps: 0,
            max_speed_kbps: 0,
        }
    }
}

#[derive(Default)]
pub struct PortCatalog {
    descriptors: HashMap<(DatapathId, PortNo), PortDescriptor>,
}

impl PortCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_port_desc_reply(&mut self, dpid: DatapathId, entries: &[PortDesc]) {
        for desc in entries {
            if desc.port_no.is_local() {
                continue;
            }
            self.descriptors.insert(
                (dpid, desc.port_no),
                PortDescriptor {
                    admin_state: desc.admin_state,
                    link_state: desc.link_state,
                    curr_speed_kbps: desc.curr_speed_kbps,
                    max_speed_kbps: desc.max_speed_kbps,
                },
            );
        }
    }

    /// PortStatus handling per spec §4.1: link down/blocked zeroes the
    /// recorded speed; live restores it from the reported current speed.
    pub fn apply_port_status(&mut self, dpid: DatapathId, status: &PortStatus) {
        let entry = self
            .descriptors
            .entry((dpid, status.port_no))
            .or_default();
        entry.link_state = status.state;
        match status.state {
            LinkState::Down | LinkState::Blocked => {
                entry.curr_speed_kbps = 0;
            }
            LinkState::Live => {
                entry.curr_speed_kbps = status.curr_speed_kbps;
            }
            LinkState::Up => {}
        }
    }

    pub fn curr_speed_kbps(&self, dpid: DatapathId, port: PortNo) -> Option<u64> {
        self.descriptors.get(&(dpid, port)).map(|d| d.curr_speed_kbps)
    }

    pub fn get(&self, dpid: DatapathId, port: PortNo) -> Option<&PortDescriptor> {
        self.descriptors.get(&(dpid, port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_desc_reply_records_speed_and_skips_local() {
        let mut cat = PortCatalog::new();
        cat.apply_port_desc_reply(
            DatapathId(1),
            &[
                PortDesc {
                    port_no: PortNo(1),
                    admin_state: AdminState::Up,
                    link_state: LinkState::Live,
                    curr_speed_kbps: 100_000,
                    max_speed_kbps: 100_000,
                },
                PortDesc {
                    port_no: PortNo::LOCAL,
                    admin_state: AdminState::Up,
                    link_state: LinkState::Live,
                    curr_speed_kbps: 1,
                    max_speed_kbps: 1,
                },
            ],
        );
        assert_eq!(cat.curr_speed_kbps(DatapathId(1), PortNo(1)), Some(100_000));
        assert!(cat.get(DatapathId(1), PortNo::LOCAL).is_none());
    }

    #[test]
    fn link_down_zeroes_speed() {
        let mut cat = PortCatalog::new();
        cat.apply_port_status(
            DatapathId(1),
            &PortStatus {
                port_no: PortNo(2),
                state: LinkState::Live,
                curr_speed_kbps: 50_000,
            },
        );
        assert_eq!(cat.curr_speed_kbps(DatapathId(1), PortNo(2)), Some(50_000));

        cat.apply_port_status(
            DatapathId(1),
            &PortStatus {
                port_no: PortNo(2),
                state: LinkState::Down,
                curr_speed_kbps: 50_000,
            },
        );
        assert_eq!(cat.curr_speed_kbps(DatapathId(1), PortNo(2)), Some(0));
    }
}
