//! Policy-based path computation and flow installation: PathEngine,
//! FlowInstaller, HostLocator, PacketInRouter, and the persisted-path
//! override oracle (spec §4.8-§4.10).

pub mod flow_installer;
pub mod host_locator;
pub mod oracle;
pub mod packet_router;
pub mod path_engine;

pub use flow_installer::FlowInstaller;
pub use host_locator::{HostLocation, HostLocator};
pub use oracle::PathOracle;
pub use packet_router::{Classified, PacketInRouter};
pub use path_engine::PathEngine;
