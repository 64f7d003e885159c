//! Core identifiers shared by every component: datapaths, ports, and the
//! directed link key that ties a pair of ports together.

use std::fmt;

/// A 64-bit OpenFlow switch identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DatapathId(pub u64);

impl fmt::Display for DatapathId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<u64> for DatapathId {
    fn from(v: u64) -> Self {
        DatapathId(v)
    }
}

/// A 32-bit OpenFlow port number, plus the reserved sentinels we care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PortNo(pub u32);

impl PortNo {
    /// OFPP_LOCAL — the switch's local (management) port.
    pub const LOCAL: PortNo = PortNo(0xffff_fffe);
    /// OFPP_CONTROLLER — reserved port representing the control channel.
    pub const CONTROLLER: PortNo = PortNo(0xffff_fffd);
    /// OFPP_ANY — wildcard used in flow-mod delete requests.
    pub const ANY: PortNo = PortNo(0xffff_ffff);
    /// Conventional host-facing port in the target topology.
    pub const HOST: PortNo = PortNo(1);

    pub fn is_local(self) -> bool {
        self == Self::LOCAL
    }
}

impl fmt::Display for PortNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PortNo {
    fn from(v: u32) -> Self {
        PortNo(v)
    }
}

/// A directed edge identity: which switch, to which switch. Two of these
/// (forward and reverse) are created for every physical link (I2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkKey {
    pub src: DatapathId,
    pub dst: DatapathId,
}

impl LinkKey {
    pub fn new(src: DatapathId, dst: DatapathId) -> Self {
        LinkKey { src, dst }
    }

    pub fn reverse(self) -> Self {
        LinkKey {
            src: self.dst,
            dst: self.src,
        }
    }
}

/// The (egress, ingress) port pair for a directed link a→b: a's port facing
/// b, and b's port facing a.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PortPair {
    pub src_port: PortNo,
    pub dst_port: PortNo,
}

impl PortPair {
    pub fn new(src_port: impl Into<PortNo>, dst_port: impl Into<PortNo>) -> Self {
        PortPair {
            src_port: src_port.into(),
            dst_port: dst_port.into(),
        }
    }

    /// The reverse pair, as seen from the other side of the link.
    pub fn swapped(self) -> Self {
        PortPair {
            src_port: self.dst_port,
            dst_port: self.src_port,
        }
    }
}

/// Routing policy selectable per spec §4.8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Policy {
    #[default]
    Hop,
    Delay,
    Bandwidth,
    Loss,
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Policy::Hop => "hop",
            Policy::Delay => "delay",
            Policy::Bandwidth => "bandwidth",
            Policy::Loss => "loss",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Policy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hop" => Ok(Policy::Hop),
            "delay" => Ok(Policy::Delay),
            "bandwidth" => Ok(Policy::Bandwidth),
            "loss" => Ok(Policy::Loss),
            other => Err(format!("unknown policy: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_key_reverse_swaps_endpoints() {
        let a = DatapathId(1);
        let b = DatapathId(2);
        let k = LinkKey::new(a, b);
        assert_eq!(k.reverse(), LinkKey::new(b, a));
    }

    #[test]
    fn port_pair_swap_is_involutive() {
        let p = PortPair::new(3u32, 7u32);
        assert_eq!(p.swapped().swapped(), p);
    }

    #[test]
    fn policy_round_trips_through_str() {
        for p in [Policy::Hop, Policy::Delay, Policy::Bandwidth, Policy::Loss] {
            let parsed: Policy = p.to_string().parse().unwrap();
            assert_eq!(parsed, p);
        }
    }

    #[test]
    fn local_port_is_recognized() {
        assert!(PortNo::LOCAL.is_local());
        assert!(!PortNo::HOST.is_local());
    }
}
