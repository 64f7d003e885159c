//! Collaborator contracts (spec §6): the OpenFlow channel, the discovery
//! service, and the LLDP framing service. The OF wire codec, the switch
//! lifecycle/packet-in base event loop, and the discovery service's own
//! internals are out of scope — this crate only defines what the core needs
//! from them, plus an in-memory fake for tests.

pub mod channel;
pub mod fake;
pub mod messages;

pub use channel::{DiscoveryService, LldpTimestamps, OpenFlowChannel};
pub use messages::*;
