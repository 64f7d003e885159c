//! Live switch/link topology: SwitchRegistry, PortCatalog, the directed
//! Graph, and the TopologyTracker stability detector (spec §4.1).

pub mod graph;
pub mod port_catalog;
pub mod switch_registry;
pub mod tracker;

pub use graph::{EdgeData, Graph};
pub use port_catalog::{PortCatalog, PortDescriptor};
pub use switch_registry::{SwitchEntry, SwitchRegistry};
pub use tracker::{Stability, StabilityEdge, TopologyTracker};
