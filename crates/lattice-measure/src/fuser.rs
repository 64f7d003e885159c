//! DelayFuser (spec §4.4): combines a link's two one-way LLDP legs with the
//! two endpoints' echo round-trips into a single fused one-way delay,
//! written back onto the graph's edge overlay.
//!
//! fused(a,b) = max(0, (lldp(a,b) + lldp(b,a) - echo(a) - echo(b)) / 2)
//!
//! The echo terms approximate each switch's half of its own control-channel
//! latency, which the raw LLDP one-way figures otherwise double-count.

use lattice_common::DatapathId;

use crate::echo::EchoProbe;
use crate::lldp::LLDPDelayProbe;

pub struct DelayFuser;

impl DelayFuser {
    /// Returns `None` if either LLDP leg hasn't been observed yet; a missing
    /// echo sample is treated as 0 (I4 — unmeasured contributes nothing).
    pub fn fuse(
        a: DatapathId,
        b: DatapathId,
        lldp: &LLDPDelayProbe,
        echo: &EchoProbe,
    ) -> Option<f64> {
        let ab = lldp.delay(a, b)?;
        let ba = lldp.delay(b, a)?;
        let echo_a = echo.echo_delay(a).unwrap_or(0.0);
        let echo_b = echo.echo_delay(b).unwrap_or(0.0);
        Some(((ab + ba - echo_a - echo_b) / 2.0).max(0.0))
    }
}
