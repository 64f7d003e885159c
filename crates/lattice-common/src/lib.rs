//! Shared types, configuration, and error kinds for the lattice SDN
//! controller. No OpenFlow wire codec or discovery logic lives here — see
//! `lattice-openflow` for the collaborator contracts those concerns sit
//! behind.

pub mod config;
pub mod error;
pub mod ids;
pub mod logging;

pub use config::{Config, ConfigInput};
pub use error::{LatticeError, Result};
pub use ids::{DatapathId, LinkKey, Policy, PortNo, PortPair};
