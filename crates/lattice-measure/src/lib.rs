//! The measurement engine: EchoProbe, LLDPDelayProbe, DelayFuser,
//! PortStatsCollector, BandwidthEstimator, LossEstimator (spec §4.2-§4.7).
//! Runs only while the topology is stable (spec §4.10 collector lifecycle);
//! the controller crate owns that gating.

pub mod bandwidth;
pub mod echo;
pub mod fuser;
pub mod lldp;
pub mod loss;
pub mod stats;

pub use bandwidth::{available_bandwidth_kbps, load_kbps};
pub use echo::EchoProbe;
pub use fuser::DelayFuser;
pub use lldp::LLDPDelayProbe;
pub use loss::{counter_based_loss, port_based_loss, LossEstimator};
pub use stats::{PortStatsCollector, Sample};
