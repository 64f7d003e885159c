//! HostLocator (spec §4.10): learns (host IP -> attached switch, port) from
//! ARP traffic. Stores the latest observation only — a host that moves is
//! picked up on its next ARP, no lease or aging logic.

use std::collections::HashMap;
use std::net::Ipv4Addr;

use lattice_common::{DatapathId, PortNo};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostLocation {
    pub dpid: DatapathId,
    pub port: PortNo,
}

#[derive(Default)]
pub struct HostLocator {
    hosts: HashMap<Ipv4Addr, HostLocation>,
}

impl HostLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites any prior binding for `ip`, per spec §4.10.
    pub fn observe(&mut self, ip: Ipv4Addr, dpid: DatapathId, port: PortNo) {
        self.hosts.insert(ip, HostLocation { dpid, port });
    }

    pub fn locate(&self, ip: Ipv4Addr) -> Option<HostLocation> {
        self.hosts.get(&ip).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observes_and_locates() {
        let mut loc = HostLocator::new();
        let ip: Ipv4Addr = "10.0.0.1".parse().unwrap();
        loc.observe(ip, DatapathId(1), 3u32.into());
        assert_eq!(
            loc.locate(ip),
            Some(HostLocation { dpid: DatapathId(1), port: 3u32.into() })
        );
    }

    #[test]
    fn later_observation_overwrites_earlier() {
        let mut loc = HostLocator::new();
        let ip: Ipv4Addr = "10.0.0.1".parse().unwrap();
        loc.observe(ip, DatapathId(1), 3u32.into());
        loc.observe(ip, DatapathId(2), 5u32.into());
        assert_eq!(
            loc.locate(ip),
            Some(HostLocation { dpid: DatapathId(2), port: 5u32.into() })
        );
    }

    #[test]
    fn unknown_host_is_none() {
        let loc = HostLocator::new();
        assert!(loc.locate("10.0.0.9".parse().unwrap()).is_none());
    }
}
