//! Error kinds per spec §7. `TransientNetwork` and `InvalidMeasurement` are
//! meant to be absorbed locally by the component that raises them (logged,
//! metric reported as its sentinel); `MissingTopologyData`, `PlanningFailure`
//! and `ConfigError` propagate to the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LatticeError {
    /// A send failed or an expected reply never arrived.
    #[error("transient network error: {0}")]
    TransientNetwork(String),

    /// A host, link, or port-pair needed to complete an operation is unknown.
    #[error("missing topology data: {0}")]
    MissingTopologyData(String),

    /// Counters or timestamps violated a monotonicity assumption.
    #[error("invalid measurement: {0}")]
    InvalidMeasurement(String),

    /// Path computation failed (disconnected graph, empty path).
    #[error("planning failure: {0}")]
    PlanningFailure(String),

    /// Configuration is missing or malformed; aborts startup.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, LatticeError>;
